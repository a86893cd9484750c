//! Object instantiation
//!
//! Turns a type id plus a positional array of pool indices into a typed
//! record, using the class registry for field names and kinds.

mod component;
mod instantiator;
mod value_type;

pub use component::{Component, Field, FieldValue};
pub use instantiator::{positional_name, Instantiator};
pub use value_type::{decode_engine_value, EngineValue};
