//! Decoder facade
//!
//! Wires the pool resolver, instantiator, graph builder and asset resolver
//! into one call:
//!
//! ```ignore
//! let registry = ClassRegistry::builtin();
//! let graph = Decoder::new(&registry).decode(&document)?;
//! for root in graph.roots() { ... }
//! ```
//!
//! A decode is pure and single-threaded. Its memo table lives only for the
//! duration of the call.

mod errors;
mod options;

pub use errors::{DecodeError, DecodeErrorCode, DecodeResult, IndexTable, Severity};
pub use options::{DecodeOptions, UnknownTypePolicy};

use tracing::{field, info_span, warn};

use crate::assets::resolve_assets;
use crate::document::PackedDocument;
use crate::graph::{DecodedGraph, GraphBuilder};
use crate::observability::{log_event, Event, ObservationScope};
use crate::registry::ClassRegistry;

/// Decodes packed documents against one class registry.
#[derive(Debug, Clone, Copy)]
pub struct Decoder<'a> {
    registry: &'a ClassRegistry,
    options: DecodeOptions,
}

impl<'a> Decoder<'a> {
    pub fn new(registry: &'a ClassRegistry) -> Self {
        Self {
            registry,
            options: DecodeOptions::default(),
        }
    }

    pub fn with_options(mut self, options: DecodeOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> DecodeOptions {
        self.options
    }

    /// Decodes a document into a linked graph.
    ///
    /// Recoverable issues land in the graph's report. Fatal errors abort
    /// and no partial graph is returned.
    pub fn decode(&self, document: &PackedDocument) -> DecodeResult<DecodedGraph> {
        let span = info_span!(
            "decode",
            nodes = document.node_count(),
            components = document.components.len(),
            issues = field::Empty
        );
        let _entered = span.enter();
        let scope = ObservationScope::new("DECODE");

        if document.revision != self.registry.revision() {
            warn!(
                document_revision = document.revision,
                registry_revision = self.registry.revision(),
                "decoding with a registry for a different revision"
            );
        }

        let graph = match GraphBuilder::new(document, self.registry)
            .with_unknown_types(self.options.unknown_types)
            .build()
        {
            Ok(graph) => graph,
            Err(err) => {
                scope.fail(&err.to_string());
                return Err(err);
            }
        };

        let graph = if self.options.resolve_assets {
            let graph = resolve_assets(&graph, &document.asset_table);
            log_event!(
                Event::AssetsResolved,
                resolved = graph.report().resolved_asset_count,
                unresolved = graph.report().unresolved_asset_count
            );
            graph
        } else {
            graph
        };

        span.record("issues", graph.report().issues.len());
        scope.complete();
        Ok(graph)
    }
}

/// Decodes with the default options
pub fn decode(document: &PackedDocument, registry: &ClassRegistry) -> DecodeResult<DecodedGraph> {
    Decoder::new(registry).decode(document)
}
