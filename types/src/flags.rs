use bitflags::bitflags;

bitflags! {
    /// Header bits of a host array.
    ///
    /// Only the bits the converter inspects are named. Unknown bits coming
    /// from a host are preserved by `from_bits_retain` and ignored.
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
    pub struct ArrayFlags: u8 {
        /// The array carries a null bitmap, so some elements may be NULL.
        const HAS_NULLS = 1;
    }
}
