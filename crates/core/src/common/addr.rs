//! Address decomposition for set-associative lookup.
//!
//! Every cache level views an address as `tag | set-index | block-offset`.
//! This module captures that split as a small value type so the geometry is
//! computed once at construction and shared by the lookup, eviction and
//! prefetch paths. It provides:
//! 1. **Bit-field extraction:** Set index and tag from a raw address.
//! 2. **Reconstruction:** Rebuilding a block's base address from its tag and
//!    set index, used when evicted blocks are written back to the parent.
//! 3. **Geometry helpers:** Ceiling log2 for non-power-of-two set counts.

/// Returns the number of bits needed to index `n` entries (ceiling log2).
///
/// Matches hardware indexing conventions: a 192-entry array needs 8 index
/// bits even though 192 is not a power of two. `ceil_log2(1)` is 0.
///
/// # Panics
///
/// Debug builds assert that `n` is non-zero; zero-sized geometries are
/// rejected at configuration time.
#[inline]
pub fn ceil_log2(n: u64) -> u32 {
    debug_assert!(n > 0, "ceil_log2 of zero");
    if n <= 1 { 0 } else { 64 - (n - 1).leading_zeros() }
}

/// The bit-field layout a cache level uses to decompose addresses.
///
/// Constructed once per level from the block size and set count. All
/// extraction methods are pure bit arithmetic over the raw `u64` address.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AddressLayout {
    /// Bits covering the byte offset within one block.
    block_offset_bits: u32,
    /// Bits selecting the set (ceiling log2 of the set count).
    set_index_bits: u32,
}

impl AddressLayout {
    /// Derives the layout for `block_bytes`-sized blocks across `num_sets`
    /// sets.
    ///
    /// `block_bytes` must be a power of two; the configuration layer
    /// validates this before any layout is built.
    pub fn new(block_bytes: u64, num_sets: u64) -> Self {
        debug_assert!(
            block_bytes.is_power_of_two(),
            "block size must be a power of two"
        );
        Self {
            block_offset_bits: block_bytes.trailing_zeros(),
            set_index_bits: ceil_log2(num_sets),
        }
    }

    /// Returns the number of block-offset bits.
    #[inline(always)]
    pub fn block_offset_bits(&self) -> u32 {
        self.block_offset_bits
    }

    /// Returns the number of set-index bits.
    #[inline(always)]
    pub fn set_index_bits(&self) -> u32 {
        self.set_index_bits
    }

    /// Extracts the set index from an address.
    ///
    /// With a non-power-of-two set count the index mask covers the next
    /// power of two, so the result may exceed the real set count; the cache
    /// level treats that as a fatal configuration error at access time.
    #[inline(always)]
    pub fn set_index(&self, addr: u64) -> u64 {
        (addr >> self.block_offset_bits) & ((1u64 << self.set_index_bits) - 1)
    }

    /// Extracts the tag (the address bits above offset and index).
    #[inline(always)]
    pub fn tag(&self, addr: u64) -> u64 {
        addr >> (self.block_offset_bits + self.set_index_bits)
    }

    /// Rebuilds a block's base address from its tag and set index.
    ///
    /// The block-offset bits come back as zero, which is exactly what the
    /// write-back path wants: evicted blocks are propagated at block
    /// granularity.
    #[inline(always)]
    pub fn block_addr(&self, tag: u64, set_index: u64) -> u64 {
        (tag << (self.block_offset_bits + self.set_index_bits))
            | (set_index << self.block_offset_bits)
    }
}
