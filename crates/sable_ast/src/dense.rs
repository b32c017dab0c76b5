//! Dense, size-bucketed storage for tagged unions.
//!
//! A plain `Vec<Enum>` pays the size of the largest variant for every
//! element. [`DenseList`] instead groups variants into *size classes* keyed by
//! their payload size and keeps one growable byte buffer per class. Appending
//! copies the active variant's payload bytes onto its class buffer and returns
//! a [`Handle`] of `{tag, slot}`; reading decodes those bytes back into a full
//! value. The list is append-only, so handles never invalidate.
//!
//! Payloads are encoded field by field through [`ByteWriter`] and
//! [`ByteReader`]. Any element type implements [`TaggedUnion`], usually via
//! [`dense_union!`](crate::dense_union).

use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;

use sable_core::intern::Symbol;
use thiserror::Error;

/// Address of one element in a [`DenseList`].
///
/// Handles are only meaningful for the list that produced them. They order
/// by slot within one tag and are unordered across tags.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle {
    pub tag: u8,
    pub slot: u32,
}

impl Handle {
    /// Bytes used by a handle inside an encoded payload.
    pub const ENCODED_SIZE: usize = 5;

    #[inline]
    pub fn new(tag: u8, slot: u32) -> Self {
        Self { tag, slot }
    }
}

impl PartialOrd for Handle {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.tag == other.tag {
            Some(self.slot.cmp(&other.slot))
        } else {
            None
        }
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}:{}", self.tag, self.slot)
    }
}

/// A fixed-layout variant payload that can be copied in and out of bytes.
pub trait Payload: Copy {
    /// Bytes reserved per element: the in-memory size, which Rust already
    /// rounds up to the type's alignment.
    const SIZE: usize = std::mem::size_of::<Self>();

    /// Write the payload into `out`, which is exactly `SIZE` zeroed bytes.
    fn encode(&self, out: &mut ByteWriter<'_>);

    /// Rebuild the payload from bytes previously written by `encode`.
    fn decode(input: &mut ByteReader<'_>) -> Self;
}

/// A closed set of payload variants addressed by a `u8` tag.
pub trait TaggedUnion: Sized {
    /// Type name used in panic and error messages.
    const NAME: &'static str;
    /// The declared tag value of each variant, in declaration order.
    const TAGS: &'static [u8];
    /// The payload size of each variant, in declaration order.
    const SIZES: &'static [usize];

    /// Tag of the active variant.
    fn tag(&self) -> u8;

    /// Encode the active variant's payload.
    fn encode_payload(&self, out: &mut ByteWriter<'_>);

    /// Rebuild a full value of variant `tag` from its payload bytes.
    fn decode(tag: u8, input: &mut ByteReader<'_>) -> Self;
}

/// Rejections raised while computing the size-class layout of a union.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("{union} declares no variants")]
    Empty { union: &'static str },

    #[error("{union} lists {tags} tags but {sizes} payload sizes")]
    MismatchedTables {
        union: &'static str,
        tags: usize,
        sizes: usize,
    },

    #[error("{union} variant {index} has tag {found}; tags must be the sequence 0..N-1")]
    NonSequentialTags {
        union: &'static str,
        index: usize,
        found: u8,
    },
}

/// Size-class membership of every variant of a union.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnionLayout {
    /// Indexed by tag ordinal.
    class_of_tag: Vec<usize>,
    /// Byte size of each class, in first-seen order.
    class_sizes: Vec<usize>,
    max_size: usize,
}

impl UnionLayout {
    /// Compute the layout of `U`, rejecting tag sets other than `0..N-1`.
    pub fn of<U: TaggedUnion>() -> Result<Self, LayoutError> {
        if U::TAGS.is_empty() {
            return Err(LayoutError::Empty { union: U::NAME });
        }
        if U::TAGS.len() != U::SIZES.len() {
            return Err(LayoutError::MismatchedTables {
                union: U::NAME,
                tags: U::TAGS.len(),
                sizes: U::SIZES.len(),
            });
        }

        let mut class_of_tag = Vec::with_capacity(U::TAGS.len());
        let mut class_sizes: Vec<usize> = Vec::new();
        for (index, (&tag, &size)) in U::TAGS.iter().zip(U::SIZES).enumerate() {
            if tag as usize != index {
                return Err(LayoutError::NonSequentialTags {
                    union: U::NAME,
                    index,
                    found: tag,
                });
            }
            let class = match class_sizes.iter().position(|&s| s == size) {
                Some(class) => class,
                None => {
                    class_sizes.push(size);
                    class_sizes.len() - 1
                }
            };
            class_of_tag.push(class);
        }

        let max_size = class_sizes.iter().copied().max().unwrap_or(0);
        Ok(Self {
            class_of_tag,
            class_sizes,
            max_size,
        })
    }

    pub fn variant_count(&self) -> usize {
        self.class_of_tag.len()
    }

    pub fn class_count(&self) -> usize {
        self.class_sizes.len()
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Size class of `tag`. Panics when the tag is outside the declared range.
    #[inline]
    pub fn class_of(&self, tag: u8) -> usize {
        match self.class_of_tag.get(tag as usize) {
            Some(&class) => class,
            None => panic!(
                "tag {tag} is outside the declared range 0..{}",
                self.class_of_tag.len()
            ),
        }
    }

    #[inline]
    pub fn class_size(&self, class: usize) -> usize {
        self.class_sizes[class]
    }
}

/// Bytes used by a [`DenseList`] compared with a plain one-enum-per-slot list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryFootprint {
    /// Total bytes across all size-class buffers.
    pub actual: usize,
    /// `len * max_variant_size`.
    pub naive: usize,
}

#[derive(Debug, Clone)]
struct ClassBuffer {
    size: usize,
    bytes: Vec<u8>,
    count: u32,
}

/// Append-only list of tagged-union values stored in per-size-class buffers.
pub struct DenseList<U: TaggedUnion> {
    layout: UnionLayout,
    buffers: Vec<ClassBuffer>,
    len: usize,
    _marker: PhantomData<fn() -> U>,
}

impl<U: TaggedUnion> DenseList<U> {
    /// Create an empty list, or reject `U` if its tags are not `0..N-1`.
    pub fn try_new() -> Result<Self, LayoutError> {
        let layout = UnionLayout::of::<U>()?;
        let buffers = (0..layout.class_count())
            .map(|class| ClassBuffer {
                size: layout.class_size(class),
                bytes: Vec::new(),
                count: 0,
            })
            .collect();
        Ok(Self {
            layout,
            buffers,
            len: 0,
            _marker: PhantomData,
        })
    }

    /// Create an empty list.
    ///
    /// Panics if `U` has an invalid tag layout; that is a defect in the type
    /// definition, not in any input.
    pub fn new() -> Self {
        match Self::try_new() {
            Ok(list) => list,
            Err(err) => panic!("{err}"),
        }
    }

    /// Copy `item`'s payload onto its size class buffer.
    pub fn append(&mut self, item: &U) -> Handle {
        let tag = item.tag();
        let class = self.layout.class_of(tag);
        let buffer = &mut self.buffers[class];

        let start = buffer.bytes.len();
        buffer.bytes.resize(start + buffer.size, 0);
        item.encode_payload(&mut ByteWriter::new(&mut buffer.bytes[start..]));

        let slot = buffer.count;
        buffer.count += 1;
        self.len += 1;
        Handle { tag, slot }
    }

    /// Decode the value stored at `handle`. Callers receive a copy.
    ///
    /// Panics if the handle did not come from this list.
    pub fn get(&self, handle: Handle) -> U {
        let class = self.layout.class_of(handle.tag);
        let buffer = &self.buffers[class];
        assert!(
            handle.slot < buffer.count,
            "{handle:?} is out of range for {} (size class holds {} items)",
            U::NAME,
            buffer.count
        );
        let start = handle.slot as usize * buffer.size;
        let bytes = &buffer.bytes[start..start + buffer.size];
        U::decode(handle.tag, &mut ByteReader::new(bytes))
    }

    /// Number of appended values.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn layout(&self) -> &UnionLayout {
        &self.layout
    }

    pub fn memory_footprint(&self) -> MemoryFootprint {
        MemoryFootprint {
            actual: self.buffers.iter().map(|b| b.bytes.len()).sum(),
            naive: self.len * self.layout.max_size(),
        }
    }
}

impl<U: TaggedUnion> Default for DenseList<U> {
    fn default() -> Self {
        Self::new()
    }
}

impl<U: TaggedUnion> fmt::Debug for DenseList<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DenseList")
            .field("union", &U::NAME)
            .field("len", &self.len)
            .field("classes", &self.layout.class_count())
            .finish()
    }
}

// ============================================================================
// Byte encoding
// ============================================================================

/// Sequential little-endian writer over one payload slot.
pub struct ByteWriter<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> ByteWriter<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    #[inline]
    fn put(&mut self, bytes: &[u8]) {
        let end = self.pos + bytes.len();
        self.buf[self.pos..end].copy_from_slice(bytes);
        self.pos = end;
    }

    #[inline]
    pub fn u8(&mut self, value: u8) {
        self.put(&[value]);
    }

    #[inline]
    pub fn bool(&mut self, value: bool) {
        self.u8(value as u8);
    }

    #[inline]
    pub fn u32(&mut self, value: u32) {
        self.put(&value.to_le_bytes());
    }

    #[inline]
    pub fn u64(&mut self, value: u64) {
        self.put(&value.to_le_bytes());
    }

    #[inline]
    pub fn handle(&mut self, handle: Handle) {
        self.u8(handle.tag);
        self.u32(handle.slot);
    }

    #[inline]
    pub fn symbol(&mut self, symbol: Symbol) {
        self.u32(symbol.to_raw());
    }
}

/// Sequential little-endian reader over one payload slot.
pub struct ByteReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    #[inline]
    fn take<const N: usize>(&mut self) -> [u8; N] {
        let mut out = [0; N];
        out.copy_from_slice(&self.buf[self.pos..self.pos + N]);
        self.pos += N;
        out
    }

    #[inline]
    pub fn u8(&mut self) -> u8 {
        self.take::<1>()[0]
    }

    #[inline]
    pub fn bool(&mut self) -> bool {
        self.u8() != 0
    }

    #[inline]
    pub fn u32(&mut self) -> u32 {
        u32::from_le_bytes(self.take())
    }

    #[inline]
    pub fn u64(&mut self) -> u64 {
        u64::from_le_bytes(self.take())
    }

    #[inline]
    pub fn handle(&mut self) -> Handle {
        let tag = self.u8();
        let slot = self.u32();
        Handle { tag, slot }
    }

    /// Panics if the bytes were not written by [`ByteWriter::symbol`].
    #[inline]
    pub fn symbol(&mut self) -> Symbol {
        let raw = self.u32();
        match Symbol::from_raw(raw) {
            Some(symbol) => symbol,
            None => panic!("corrupt symbol {raw} in payload"),
        }
    }
}

/// Declare a tagged union together with its tag enum and [`TaggedUnion`] impl.
///
/// ```ignore
/// dense_union! {
///     pub enum Shape / ShapeTag {
///         Dot(Dot) = 0,
///         Line(Line) = 1,
///     }
/// }
/// ```
#[macro_export]
macro_rules! dense_union {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident / $tag_name:ident {
            $( $(#[$vmeta:meta])* $variant:ident($payload:ty) = $tag:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant($payload), )+
        }

        #[doc = concat!("Tag of each [`", stringify!($name), "`] variant.")]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(u8)]
        $vis enum $tag_name {
            $( $variant = $tag, )+
        }

        impl $tag_name {
            pub fn from_u8(tag: u8) -> Option<Self> {
                $( if tag == $tag { return Some($tag_name::$variant); } )+
                None
            }
        }

        impl $name {
            pub fn kind(&self) -> $tag_name {
                match self {
                    $( $name::$variant(_) => $tag_name::$variant, )+
                }
            }
        }

        impl $crate::dense::TaggedUnion for $name {
            const NAME: &'static str = stringify!($name);
            const TAGS: &'static [u8] = &[ $( $tag ),+ ];
            const SIZES: &'static [usize] = &[ $( <$payload as $crate::dense::Payload>::SIZE ),+ ];

            #[inline]
            fn tag(&self) -> u8 {
                self.kind() as u8
            }

            fn encode_payload(&self, out: &mut $crate::dense::ByteWriter<'_>) {
                match self {
                    $( $name::$variant(payload) => $crate::dense::Payload::encode(payload, out), )+
                }
            }

            fn decode(tag: u8, input: &mut $crate::dense::ByteReader<'_>) -> Self {
                $(
                    if tag == $tag {
                        return $name::$variant(<$payload as $crate::dense::Payload>::decode(input));
                    }
                )+
                panic!("tag {} is outside the declared range of {}", tag, stringify!($name))
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Small {
        a: u32,
    }

    impl Payload for Small {
        fn encode(&self, out: &mut ByteWriter<'_>) {
            out.u32(self.a);
        }
        fn decode(input: &mut ByteReader<'_>) -> Self {
            Small { a: input.u32() }
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Other {
        b: u32,
    }

    impl Payload for Other {
        fn encode(&self, out: &mut ByteWriter<'_>) {
            out.u32(self.b);
        }
        fn decode(input: &mut ByteReader<'_>) -> Self {
            Other { b: input.u32() }
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Wide {
        x: u64,
        y: u64,
        link: Handle,
    }

    impl Payload for Wide {
        fn encode(&self, out: &mut ByteWriter<'_>) {
            out.u64(self.x);
            out.u64(self.y);
            out.handle(self.link);
        }
        fn decode(input: &mut ByteReader<'_>) -> Self {
            Wide {
                x: input.u64(),
                y: input.u64(),
                link: input.handle(),
            }
        }
    }

    crate::dense_union! {
        pub enum Shape / ShapeTag {
            Small(Small) = 0,
            Wide(Wide) = 1,
            Other(Other) = 2,
        }
    }

    crate::dense_union! {
        pub enum Gapped / GappedTag {
            First(Small) = 0,
            Third(Wide) = 2,
        }
    }

    #[test]
    fn test_layout_groups_by_size_not_tag() {
        let layout = UnionLayout::of::<Shape>().unwrap();
        assert_eq!(layout.variant_count(), 3);
        assert_eq!(layout.class_count(), 2);
        assert_eq!(layout.class_of(0), layout.class_of(2));
        assert_ne!(layout.class_of(0), layout.class_of(1));
        assert_eq!(layout.max_size(), std::mem::size_of::<Wide>());
    }

    #[test]
    fn test_non_sequential_tags_rejected() {
        let err = DenseList::<Gapped>::try_new().unwrap_err();
        assert_eq!(
            err,
            LayoutError::NonSequentialTags { union: "Gapped", index: 1, found: 2 }
        );
    }

    #[test]
    #[should_panic(expected = "tags must be the sequence")]
    fn test_new_panics_on_invalid_layout() {
        let _ = DenseList::<Gapped>::new();
    }

    #[test]
    fn test_append_get_interleaved() {
        let mut list = DenseList::<Shape>::new();
        let values = [
            Shape::Small(Small { a: 1 }),
            Shape::Wide(Wide { x: 2, y: 3, link: Handle::new(0, 0) }),
            Shape::Other(Other { b: 4 }),
            Shape::Small(Small { a: 5 }),
            Shape::Wide(Wide { x: u64::MAX, y: 0, link: Handle::new(2, 7) }),
        ];
        let handles: Vec<Handle> = values.iter().map(|v| list.append(v)).collect();

        assert_eq!(list.len(), values.len());
        for (handle, value) in handles.iter().zip(&values) {
            assert_eq!(list.get(*handle), *value);
        }
    }

    #[test]
    fn test_slots_follow_shared_buffer() {
        let mut list = DenseList::<Shape>::new();
        let a = list.append(&Shape::Small(Small { a: 1 }));
        let b = list.append(&Shape::Other(Other { b: 2 }));
        let c = list.append(&Shape::Small(Small { a: 3 }));
        assert_eq!((a.tag, a.slot), (0, 0));
        assert_eq!((b.tag, b.slot), (2, 1));
        assert_eq!((c.tag, c.slot), (0, 2));
    }

    #[test]
    fn test_handle_ordering_is_per_tag() {
        assert!(Handle::new(0, 1) < Handle::new(0, 2));
        assert_eq!(Handle::new(0, 1).partial_cmp(&Handle::new(1, 0)), None);
    }

    #[test]
    fn test_footprint() {
        let mut list = DenseList::<Shape>::new();
        assert_eq!(list.memory_footprint(), MemoryFootprint { actual: 0, naive: 0 });

        list.append(&Shape::Wide(Wide { x: 0, y: 0, link: Handle::new(0, 0) }));
        list.append(&Shape::Wide(Wide { x: 1, y: 1, link: Handle::new(0, 0) }));
        let footprint = list.memory_footprint();
        assert_eq!(footprint.actual, footprint.naive);

        list.append(&Shape::Small(Small { a: 9 }));
        let footprint = list.memory_footprint();
        assert!(footprint.actual < footprint.naive);
        assert_eq!(footprint.actual, 2 * std::mem::size_of::<Wide>() + 4);
    }

    #[test]
    #[should_panic(expected = "outside the declared range")]
    fn test_get_with_foreign_tag_panics() {
        let list = DenseList::<Shape>::new();
        let _ = list.get(Handle::new(9, 0));
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_get_with_unknown_slot_panics() {
        let mut list = DenseList::<Shape>::new();
        list.append(&Shape::Small(Small { a: 1 }));
        let _ = list.get(Handle::new(0, 3));
    }
}
