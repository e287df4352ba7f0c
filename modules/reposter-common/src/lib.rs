pub mod config;
pub mod error;
pub mod types;

pub use config::{Config, HarvestMode};
pub use error::ReposterError;
pub use types::*;
