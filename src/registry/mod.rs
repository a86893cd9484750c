//! Class registry subsystem
//!
//! Maps a type identifier to the ordered field layout used to decode its
//! positional field arrays.
//!
//! # Design Principles
//!
//! - One fixed table per bundle format revision
//! - Shipped layouts are immutable
//! - Field order is packed order
//! - Unknown types are reported, the caller decides whether they abort

mod builtin;
mod errors;
mod loader;
mod registry;
mod types;

pub use builtin::{BUILTIN_REVISION, NODE_CLASS};
pub use errors::{RegistryError, RegistryResult};
pub use loader::SchemaLoader;
pub use registry::ClassRegistry;
pub use types::{ClassSchema, FieldDef, FieldKind};
