//! scenepack - A strict, deterministic decoder for packed scene-graph bundles
//!
//! A packed document stores every value once in a shared pool and refers to
//! it by index. Decoding resolves the pool, instantiates components against
//! a versioned class registry, links nodes into a forest and resolves asset
//! slots against the document's asset table.

pub mod assets;
pub mod cli;
pub mod decode;
pub mod document;
pub mod graph;
pub mod instantiate;
pub mod observability;
pub mod pool;
pub mod registry;
