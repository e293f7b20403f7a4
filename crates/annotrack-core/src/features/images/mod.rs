//! Images: annotated files produced by a run

pub mod commands;
pub mod queries;

pub use commands::{
    CreateImageCommand, CreateImageError, DeleteImageCommand, DeleteImageError,
    DeleteImageResponse, UpdateImageCommand, UpdateImageError,
};

pub use queries::{
    GetImageError, GetImageQuery, ListImagesError, ListImagesQuery, ListImagesResponse,
    NextImageIdQuery,
};
