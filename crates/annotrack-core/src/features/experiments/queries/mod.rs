pub mod get;
pub mod list;
pub mod next_id;

pub use get::{GetExperimentError, GetExperimentQuery};
pub use list::{ListExperimentsError, ListExperimentsQuery, ListExperimentsResponse};
pub use next_id::NextExperimentIdQuery;
