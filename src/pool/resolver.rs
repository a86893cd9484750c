//! Memoizing pool resolver
//!
//! Each pool entry is materialized at most once per decode. Entries are
//! resolved lazily, on first reference, and the cached `Arc` is handed out
//! on every later reference.

use std::sync::Arc;

use crate::decode::{DecodeError, DecodeResult, IndexTable};
use crate::document::PoolEntry;

use super::value::ResolvedValue;

/// Deepest composite nesting a pool value may have.
///
/// Bounds both the resolver's recursion and the depth of every value it
/// hands out, so formatting, comparing and dropping values stay shallow.
pub const MAX_NESTING_DEPTH: usize = 128;

#[derive(Debug)]
enum Slot {
    Pending,
    InProgress,
    /// Resolved value and its composite nesting depth
    Done(Arc<ResolvedValue>, usize),
}

/// Resolves pool indices to shared values.
///
/// Scoped to one decode; never shared between decodes.
#[derive(Debug)]
pub struct PoolResolver<'a> {
    pool: &'a [PoolEntry],
    /// Upper bound for object references
    node_count: usize,
    slots: Vec<Slot>,
    resolved: usize,
}

impl<'a> PoolResolver<'a> {
    /// Creates a resolver over `pool`. Object references must name one of
    /// `node_count` nodes.
    pub fn new(pool: &'a [PoolEntry], node_count: usize) -> Self {
        let mut slots = Vec::with_capacity(pool.len());
        slots.resize_with(pool.len(), || Slot::Pending);
        Self {
            pool,
            node_count,
            slots,
            resolved: 0,
        }
    }

    /// Resolves one pool index.
    ///
    /// # Errors
    ///
    /// - `IndexOutOfRange` if `index` (or a nested index) is outside the
    ///   pool, or an object reference names a missing node
    /// - `CyclicReference` if the entry transitively contains itself
    /// - `NestingTooDeep` if composites nest more than
    ///   `MAX_NESTING_DEPTH` levels
    pub fn resolve(&mut self, index: usize) -> DecodeResult<Arc<ResolvedValue>> {
        self.resolve_at(index, 0).map(|(value, _)| value)
    }

    /// `level` counts the composites enclosing this entry.
    fn resolve_at(&mut self, index: usize, level: usize) -> DecodeResult<(Arc<ResolvedValue>, usize)> {
        match self.slots.get(index) {
            None => {
                return Err(DecodeError::index_out_of_range(
                    IndexTable::Pool,
                    index,
                    self.pool.len(),
                ))
            }
            Some(Slot::Done(value, depth)) => return Ok((Arc::clone(value), *depth)),
            Some(Slot::InProgress) => return Err(DecodeError::cyclic_reference(index)),
            Some(Slot::Pending) => {}
        }
        if level > MAX_NESTING_DEPTH {
            return Err(DecodeError::nesting_too_deep(index, MAX_NESTING_DEPTH));
        }

        self.slots[index] = Slot::InProgress;
        match self.materialize(index, level) {
            Ok((value, depth)) => {
                let value = Arc::new(value);
                self.slots[index] = Slot::Done(Arc::clone(&value), depth);
                self.resolved += 1;
                Ok((value, depth))
            }
            Err(err) => {
                self.slots[index] = Slot::Pending;
                Err(err)
            }
        }
    }

    fn materialize(&mut self, index: usize, level: usize) -> DecodeResult<(ResolvedValue, usize)> {
        let pool = self.pool;
        let value = match &pool[index] {
            PoolEntry::Null => ResolvedValue::Null,
            PoolEntry::Bool(b) => ResolvedValue::Bool(*b),
            PoolEntry::Number(n) => ResolvedValue::Number(*n),
            PoolEntry::String(s) => ResolvedValue::String(s.clone()),
            PoolEntry::Composite(items) => {
                let mut resolved = Vec::with_capacity(items.len());
                let mut depth = 1;
                for &item in items {
                    let (value, item_depth) = self.resolve_at(item, level + 1)?;
                    depth = depth.max(item_depth + 1);
                    resolved.push(value);
                }
                // Memoized entries can be deeper than the current chain.
                if depth > MAX_NESTING_DEPTH {
                    return Err(DecodeError::nesting_too_deep(index, MAX_NESTING_DEPTH));
                }
                return Ok((ResolvedValue::Array(resolved), depth));
            }
            PoolEntry::ObjectRef(node) => {
                if *node >= self.node_count {
                    return Err(DecodeError::index_out_of_range(
                        IndexTable::Nodes,
                        *node,
                        self.node_count,
                    ));
                }
                ResolvedValue::ObjectRef(*node)
            }
        };
        Ok((value, 0))
    }

    /// Returns the cached value for `index` without resolving it
    pub fn cached(&self, index: usize) -> Option<&Arc<ResolvedValue>> {
        match self.slots.get(index) {
            Some(Slot::Done(value, _)) => Some(value),
            _ => None,
        }
    }

    /// Number of entries materialized so far
    pub fn resolved_count(&self) -> usize {
        self.resolved
    }

    pub fn len(&self) -> usize {
        self.pool.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }
}
