use core::fmt;

/// Opaque type identifier issued by the host runtime.
///
/// Equality is the only meaningful operation. The constants below are the
/// well-known identifiers of the builtin types the converter knows about;
/// anything else is resolved by asking the host.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Oid(u32);

static_assertions::assert_eq_size!(Oid, u32);

impl Oid {
    pub const INVALID: Oid = Oid(0);

    pub const BOOL: Oid = Oid(16);
    pub const INT8: Oid = Oid(20);
    pub const INT2: Oid = Oid(21);
    pub const INT4: Oid = Oid(23);
    pub const TEXT: Oid = Oid(25);
    pub const FLOAT4: Oid = Oid(700);
    pub const FLOAT8: Oid = Oid(701);

    pub const BOOL_ARRAY: Oid = Oid(1000);
    pub const INT2_ARRAY: Oid = Oid(1005);
    pub const INT4_ARRAY: Oid = Oid(1007);
    pub const TEXT_ARRAY: Oid = Oid(1009);
    pub const INT8_ARRAY: Oid = Oid(1016);
    pub const FLOAT4_ARRAY: Oid = Oid(1021);
    pub const FLOAT8_ARRAY: Oid = Oid(1022);

    /// The anonymous record pseudo-type.
    pub const RECORD: Oid = Oid(2249);

    /// First identifier available for user-defined types.
    pub const FIRST_NORMAL: Oid = Oid(16384);

    pub const fn new(raw: u32) -> Self {
        Oid(raw)
    }

    pub const fn as_u32(self) -> u32 {
        self.0
    }

    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }
}

impl From<u32> for Oid {
    fn from(raw: u32) -> Self {
        Oid(raw)
    }
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "oid {}", self.0)
    }
}
