//! Error types

mod engine;
mod storage;
mod submit;

pub use engine::*;
pub use storage::*;
pub use submit::*;
