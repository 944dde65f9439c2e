//! Typed façades over the executor, one method per API endpoint.
//!
//! Services hold a cloned [`Client`](crate::Client) and no other state. Each
//! method is a single round trip: no filtering, caching or retrying happens
//! here, and errors from the client are returned unchanged.

mod folders;
mod health;
mod posts;

pub use folders::FolderService;
pub use health::{HealthService, DEFAULT_HEALTH_PATH};
pub use posts::PostService;
