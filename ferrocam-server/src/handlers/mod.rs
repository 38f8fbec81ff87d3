pub mod camera_handlers;
pub mod capture_handlers;
pub mod ping;
