use crate::ident::Ident;

/// Partial configuration update for one camera.
///
/// Omitted fields are left unchanged. When both are present the format switch
/// is applied first so that the quality is attributed to the new format.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConfigPatch {
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub image_format: Option<Ident>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub quality: Option<u32>,
}

impl ConfigPatch {
    pub fn format(id: impl Into<Ident>) -> Self {
        Self {
            image_format: Some(id.into()),
            quality: None,
        }
    }

    pub fn quality(value: u32) -> Self {
        Self {
            image_format: None,
            quality: Some(value),
        }
    }

    pub fn with_format(mut self, id: impl Into<Ident>) -> Self {
        self.image_format = Some(id.into());
        self
    }

    pub fn with_quality(mut self, value: u32) -> Self {
        self.quality = Some(value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.image_format.is_none() && self.quality.is_none()
    }
}
