//! String interning for the front end.
//!
//! Identifier names, field names and string-literal text are interned so that
//! AST payloads can refer to them with a fixed-width 32-bit [`Symbol`].

use lasso::{Key, Rodeo, Spur};
use std::fmt;

/// An interned string identifier. Comparing two symbols is an integer
/// comparison; the text is recovered through the interner that produced it.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Symbol(Spur);

impl Symbol {
    /// The raw index of this symbol, suitable for fixed-width storage.
    #[inline]
    pub fn to_raw(self) -> u32 {
        self.0.into_usize() as u32
    }

    /// Rebuild a symbol from a value produced by [`Symbol::to_raw`].
    #[inline]
    pub fn from_raw(raw: u32) -> Option<Self> {
        Spur::try_from_usize(raw as usize).map(Symbol)
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.to_raw())
    }
}

/// Single-threaded string interner. One instance lives for one parse.
#[derive(Default)]
pub struct StringInterner {
    rodeo: Rodeo,
}

impl StringInterner {
    pub fn new() -> Self {
        Self { rodeo: Rodeo::new() }
    }

    /// Intern a string, returning the existing symbol if it was seen before.
    #[inline]
    pub fn intern(&mut self, s: &str) -> Symbol {
        Symbol(self.rodeo.get_or_intern(s))
    }

    /// Look up an already-interned string without interning it if absent.
    #[inline]
    pub fn get(&self, s: &str) -> Option<Symbol> {
        self.rodeo.get(s).map(Symbol)
    }

    /// Resolve a symbol back to its text.
    ///
    /// Panics if the symbol came from a different interner.
    #[inline]
    pub fn resolve(&self, symbol: Symbol) -> &str {
        self.rodeo.resolve(&symbol.0)
    }

    pub fn len(&self) -> usize {
        self.rodeo.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rodeo.is_empty()
    }
}

impl fmt::Debug for StringInterner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StringInterner")
            .field("len", &self.len())
            .finish()
    }
}
