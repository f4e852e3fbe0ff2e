pub mod omdb;
pub mod tmdb;

pub use omdb::OmdbClient;
pub use tmdb::{TmdbClient, TrendWindow, search_endpoint};
