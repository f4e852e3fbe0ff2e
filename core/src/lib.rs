pub mod discovery;
pub mod error;
pub mod models;
pub mod providers;

pub use discovery::DiscoveryService;
pub use error::*;
pub use models::*;
pub use providers::{OmdbClient, TmdbClient};
