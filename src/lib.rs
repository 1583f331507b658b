pub mod config;
pub mod error;
pub mod keepalive;
pub mod model;
pub mod server;

pub use error::{Error, Result};
