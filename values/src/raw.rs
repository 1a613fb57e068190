use core::fmt;

/// A host value word.
///
/// Like raw memory, a `Datum` carries no type: it is meaningless without the
/// [`Oid`](datumbridge_types::Oid) that travels next to it. Pass-by-value
/// scalars are stored in the word itself; arrays and tuples store a reference
/// that only the host can decode.
///
/// The `*_unchecked` accessors reinterpret the word. They never fault, but the
/// caller must have established the kind first (via the type identifier).
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct Datum(u64);

static_assertions::assert_eq_size!(Datum, u64);

impl fmt::Debug for Datum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Datum({:#x})", self.0)
    }
}

impl Datum {
    pub const ZERO: Datum = Datum(0);

    pub const fn from_raw(word: u64) -> Self {
        Datum(word)
    }

    pub const fn into_raw(self) -> u64 {
        self.0
    }

    // --- Constructors ---

    pub const fn from_bool(value: bool) -> Self {
        Datum(value as u64)
    }

    // Signed integers are sign-extended to the full word.

    pub const fn from_i16(value: i16) -> Self {
        Datum(value as i64 as u64)
    }

    pub const fn from_i32(value: i32) -> Self {
        Datum(value as i64 as u64)
    }

    pub const fn from_i64(value: i64) -> Self {
        Datum(value as u64)
    }

    pub fn from_f32(value: f32) -> Self {
        Datum(u64::from(value.to_bits()))
    }

    pub fn from_f64(value: f64) -> Self {
        Datum(value.to_bits())
    }

    // --- Accessors (unchecked) ---

    pub const fn as_bool_unchecked(self) -> bool {
        self.0 != 0
    }

    pub const fn as_i16_unchecked(self) -> i16 {
        self.0 as i16
    }

    pub const fn as_i32_unchecked(self) -> i32 {
        self.0 as i32
    }

    pub const fn as_i64_unchecked(self) -> i64 {
        self.0 as i64
    }

    pub fn as_f32_unchecked(self) -> f32 {
        f32::from_bits(self.0 as u32)
    }

    pub fn as_f64_unchecked(self) -> f64 {
        f64::from_bits(self.0)
    }
}
