pub mod board;
pub mod config;
pub mod error;
pub mod geometry;
pub mod math;
pub mod operations;
pub mod session;

pub use error::{MusterError, Result};
