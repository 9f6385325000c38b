pub mod config;
pub mod logging;

pub mod asset;
pub mod checksum;
pub mod coordinator;
pub mod error;
pub mod fetch;
pub mod formula;
pub mod pipeline;
pub mod release;

pub use error::BrewError;
