//! Admin surface configuration: model index ordering and image thumbnails.

pub mod registry;
pub mod thumbnail;

pub use registry::{AdminApp, AdminModel, app_list};
pub use thumbnail::{ImageChoice, image_display};
