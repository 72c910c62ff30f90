//! Compiled state tables for individual grammar productions, plus the
//! [`build_registry`] entry point that wires them all into a
//! [`crate::registry::Registry`].
//!
//! Each submodule owns one family of productions. Tables are hand-written
//! here rather than generated, but follow the on-disk table shape from §6
//! directly: a `StateDef` per row, a `Guard`, an `actions` list, and a
//! `transitions` list ending in an unconditional default where the
//! grammar allows one.

mod collections;
mod framing;
mod scalars;
mod structural;

use crate::registry::{Production, Registry};

/// Build a registry containing every YEAST production this crate
/// implements: stream framing (BOM, stream end), line-break and
/// white-space classification, comments, document boundary markers,
/// plain/single-quoted/double-quoted scalars, block and folded scalars,
/// anchors/tags/properties, aliases, flow and block collections, node
/// dispatch (block and flow context), directives, and the top-level
/// document-stream loop.
pub fn build_registry() -> Registry {
    let mut registry = Registry::new();
    registry.register(&Production::simple("stream"), framing::STREAM);
    registry.register(&Production::simple("break"), structural::BREAK_TABLE);
    registry.register(&Production::simple("white"), structural::WHITE);
    registry.register(&Production::simple("comment"), structural::COMMENT);
    registry.register(
        &Production::simple("document-marker"),
        structural::DOCUMENT_MARKER,
    );
    registry.register(&Production::simple("plain-scalar"), scalars::PLAIN);
    registry.register(&Production::simple("single-quoted"), scalars::SINGLE_QUOTED);
    registry.register(
        &Production::simple("double-quoted-scalar"),
        scalars::DOUBLE_QUOTED,
    );
    registry.register(&Production::simple("anchor"), collections::ANCHOR);
    registry.register(&Production::simple("tag"), collections::TAG);
    registry.register(&Production::simple("properties"), collections::PROPERTIES);
    registry.register(&Production::simple("alias"), collections::ALIAS);
    registry.register(
        &Production::contextual("node", "block"),
        collections::NODE_BLOCK,
    );
    registry.register(
        &Production::contextual("node", "flow"),
        collections::NODE_FLOW,
    );
    registry.register(&Production::simple("flow-sequence"), collections::FLOW_SEQUENCE);
    registry.register(&Production::simple("flow-mapping"), collections::FLOW_MAPPING);
    registry.register(&Production::simple("block-mapping"), collections::BLOCK_MAPPING);
    registry.register(&Production::simple("block-sequence"), collections::BLOCK_SEQUENCE);
    registry.register(
        &Production::simple("block-scalar-literal"),
        collections::BLOCK_SCALAR_LITERAL,
    );
    registry.register(
        &Production::simple("block-scalar-folded"),
        collections::BLOCK_SCALAR_FOLDED,
    );
    registry.register(&Production::simple("directive"), collections::DIRECTIVE);
    registry.register(
        &Production::simple("document-stream"),
        collections::DOCUMENT_STREAM,
    );
    registry
}
