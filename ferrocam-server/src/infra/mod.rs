pub mod app;
pub mod app_state;
pub mod errors;
