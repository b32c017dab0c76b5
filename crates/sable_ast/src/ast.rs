//! The parsed expression tree: arena, roots, side lists and span table.

use rustc_hash::FxHashMap;
use sable_core::intern::{StringInterner, Symbol};
use sable_core::text::SourceSpan;

use crate::dense::{DenseList, Handle, MemoryFootprint};
use crate::node::{AstItem, HandleRange};

/// Backing store for every expression node of one parse.
pub type AstArena = DenseList<AstItem>;

/// Everything one parse produces.
///
/// Nodes live in the [`AstArena`]. Their source spans are kept apart in
/// insertion order so the arena's hot layout stays free of diagnostics data.
pub struct Ast<'src> {
    arena: AstArena,
    roots: Vec<Handle>,
    spans: Vec<SourceSpan<'src>>,
    ordinals: FxHashMap<Handle, u32>,
    lists: Vec<Handle>,
    interner: StringInterner,
}

impl<'src> Ast<'src> {
    pub fn new() -> Self {
        Self {
            arena: AstArena::new(),
            roots: Vec::new(),
            spans: Vec::new(),
            ordinals: FxHashMap::default(),
            lists: Vec::new(),
            interner: StringInterner::new(),
        }
    }

    /// Append a node together with the span it was parsed from.
    pub fn push(&mut self, item: AstItem, span: SourceSpan<'src>) -> Handle {
        let handle = self.arena.append(&item);
        let ordinal = self.spans.len() as u32;
        self.spans.push(span);
        self.ordinals.insert(handle, ordinal);
        tracing::trace!(?handle, kind = ?item.kind(), "push node");
        handle
    }

    /// Record a completed top-level expression.
    pub fn push_root(&mut self, handle: Handle) {
        self.roots.push(handle);
    }

    /// Copy a run of handles into the side list.
    pub fn push_list(&mut self, handles: &[Handle]) -> HandleRange {
        if handles.is_empty() {
            return HandleRange::EMPTY;
        }
        let start = self.lists.len() as u32;
        self.lists.extend_from_slice(handles);
        HandleRange {
            start,
            len: handles.len() as u32,
        }
    }

    /// Decode the node at `handle`.
    #[inline]
    pub fn get(&self, handle: Handle) -> AstItem {
        self.arena.get(handle)
    }

    pub fn list(&self, range: HandleRange) -> &[Handle] {
        &self.lists[range.as_range()]
    }

    /// Top-level expressions in source order.
    pub fn roots(&self) -> &[Handle] {
        &self.roots
    }

    /// Spans of every node, in insertion order.
    pub fn spans(&self) -> &[SourceSpan<'src>] {
        &self.spans
    }

    pub fn span_of(&self, handle: Handle) -> Option<SourceSpan<'src>> {
        self.ordinals
            .get(&handle)
            .map(|&ordinal| self.spans[ordinal as usize])
    }

    pub fn intern(&mut self, text: &str) -> Symbol {
        self.interner.intern(text)
    }

    pub fn resolve(&self, symbol: Symbol) -> &str {
        self.interner.resolve(symbol)
    }

    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    pub fn arena(&self) -> &AstArena {
        &self.arena
    }

    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    pub fn memory_footprint(&self) -> MemoryFootprint {
        self.arena.memory_footprint()
    }
}

impl Default for Ast<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Ast<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ast")
            .field("nodes", &self.arena.len())
            .field("roots", &self.roots)
            .field("symbols", &self.interner.len())
            .finish()
    }
}
