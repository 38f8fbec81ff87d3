use std::sync::Arc;

use async_trait::async_trait;
use ferrocam_model::Camera;

use crate::{api_client::ApiClient, error::Result};

/// Source of full camera snapshots for the synchronizer.
#[async_trait]
pub trait CameraFeed: Send + Sync {
    async fn fetch_cameras(&self) -> Result<Vec<Camera>>;
}

#[async_trait]
impl CameraFeed for ApiClient {
    async fn fetch_cameras(&self) -> Result<Vec<Camera>> {
        ApiClient::fetch_cameras(self).await
    }
}

#[async_trait]
impl<T: CameraFeed + ?Sized> CameraFeed for Arc<T> {
    async fn fetch_cameras(&self) -> Result<Vec<Camera>> {
        (**self).fetch_cameras().await
    }
}
