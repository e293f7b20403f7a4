pub mod create;
pub mod delete;
pub mod update;

pub use create::{CreateRunCommand, CreateRunError, NewRun};
pub use delete::{DeleteRunCommand, DeleteRunError, DeleteRunResponse};
pub use update::{UpdateRunCommand, UpdateRunError};
