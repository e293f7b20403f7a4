pub mod get;
pub mod list;
pub mod next_id;

pub use get::{GetRunError, GetRunQuery};
pub use list::{ListRunsError, ListRunsQuery, ListRunsResponse};
pub use next_id::NextRunIdQuery;
