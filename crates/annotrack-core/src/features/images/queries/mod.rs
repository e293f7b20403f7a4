pub mod get;
pub mod list;
pub mod next_id;

pub use get::{GetImageError, GetImageQuery};
pub use list::{ListImagesError, ListImagesQuery, ListImagesResponse};
pub use next_id::NextImageIdQuery;
