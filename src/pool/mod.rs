//! Value pool resolution
//!
//! The packed form stores every distinct value once in a shared pool and
//! refers to it by index. This module turns indices back into values.

mod resolver;
mod value;

pub use resolver::{PoolResolver, MAX_NESTING_DEPTH};
pub use value::ResolvedValue;
