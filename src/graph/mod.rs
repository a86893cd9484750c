//! Node graph reconstruction
//!
//! # Design Principles
//!
//! - Nodes live in an arena indexed by `NodeId`; links are ids, not pointers
//! - Every non-root node has exactly one parent
//! - Multiple roots form a forest, with no implicit super-root
//! - Components are owned by exactly one node

mod builder;
mod decoded;
mod node;
mod report;

pub use builder::GraphBuilder;
pub use decoded::DecodedGraph;
pub use node::{Node, NodeId};
pub use report::ResolutionReport;
