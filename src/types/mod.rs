//! Type definitions for seasoncost

mod cost;
mod error;
mod summary;

pub use cost::*;
pub use error::*;
pub use summary::*;
