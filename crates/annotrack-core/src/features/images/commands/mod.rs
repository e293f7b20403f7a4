pub mod create;
pub mod delete;
pub mod update;

pub use create::{CreateImageCommand, CreateImageError, NewImage};
pub use delete::{DeleteImageCommand, DeleteImageError, DeleteImageResponse};
pub use update::{ImageChanges, UpdateImageCommand, UpdateImageError};
