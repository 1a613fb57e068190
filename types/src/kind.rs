use core::fmt;

use crate::Oid;

/// Scalar kinds that have a native representation.
///
/// This is the fixed, compile-time table the dispatcher matches a scalar
/// [`Oid`] against. Adding a kind means adding a variant here, a row in
/// [`ScalarKind::from_oid`], and a `Marshal` implementation for its native type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ScalarKind {
    /// `bool`
    Bool,

    /// 16-bit signed integer (`i16`)
    Int2,

    /// 32-bit signed integer (`i32`)
    Int4,

    /// 64-bit signed integer (`i64`)
    Int8,

    /// 32-bit float (`f32`)
    Float4,

    /// 64-bit float (`f64`)
    Float8,
}

impl ScalarKind {
    pub const ALL: [ScalarKind; 6] = [
        ScalarKind::Bool,
        ScalarKind::Int2,
        ScalarKind::Int4,
        ScalarKind::Int8,
        ScalarKind::Float4,
        ScalarKind::Float8,
    ];

    /// Look up the scalar kind for a type identifier.
    ///
    /// Returns `None` for anything outside the supported table, including
    /// array and composite identifiers.
    pub const fn from_oid(oid: Oid) -> Option<Self> {
        match oid {
            Oid::BOOL => Some(ScalarKind::Bool),
            Oid::INT2 => Some(ScalarKind::Int2),
            Oid::INT4 => Some(ScalarKind::Int4),
            Oid::INT8 => Some(ScalarKind::Int8),
            Oid::FLOAT4 => Some(ScalarKind::Float4),
            Oid::FLOAT8 => Some(ScalarKind::Float8),
            _ => None,
        }
    }

    pub const fn oid(self) -> Oid {
        match self {
            ScalarKind::Bool => Oid::BOOL,
            ScalarKind::Int2 => Oid::INT2,
            ScalarKind::Int4 => Oid::INT4,
            ScalarKind::Int8 => Oid::INT8,
            ScalarKind::Float4 => Oid::FLOAT4,
            ScalarKind::Float8 => Oid::FLOAT8,
        }
    }

    /// Identifier of the builtin one-dimensional array type of this kind.
    pub const fn array_oid(self) -> Oid {
        match self {
            ScalarKind::Bool => Oid::BOOL_ARRAY,
            ScalarKind::Int2 => Oid::INT2_ARRAY,
            ScalarKind::Int4 => Oid::INT4_ARRAY,
            ScalarKind::Int8 => Oid::INT8_ARRAY,
            ScalarKind::Float4 => Oid::FLOAT4_ARRAY,
            ScalarKind::Float8 => Oid::FLOAT8_ARRAY,
        }
    }

    /// Width of the value in bytes.
    pub const fn width(self) -> usize {
        match self {
            ScalarKind::Bool => 1,
            ScalarKind::Int2 => 2,
            ScalarKind::Int4 | ScalarKind::Float4 => 4,
            ScalarKind::Int8 | ScalarKind::Float8 => 8,
        }
    }

    /// The host's name for the type.
    pub const fn name(self) -> &'static str {
        match self {
            ScalarKind::Bool => "bool",
            ScalarKind::Int2 => "int2",
            ScalarKind::Int4 => "int4",
            ScalarKind::Int8 => "int8",
            ScalarKind::Float4 => "float4",
            ScalarKind::Float8 => "float8",
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oid_table_is_consistent() {
        for kind in ScalarKind::ALL {
            assert_eq!(ScalarKind::from_oid(kind.oid()), Some(kind));
            assert_eq!(ScalarKind::from_oid(kind.array_oid()), None);
        }
    }

    #[test]
    fn unknown_oids_are_not_scalars() {
        assert_eq!(ScalarKind::from_oid(Oid::TEXT), None);
        assert_eq!(ScalarKind::from_oid(Oid::RECORD), None);
        assert_eq!(ScalarKind::from_oid(Oid::INVALID), None);
        assert_eq!(ScalarKind::from_oid(Oid::new(123_456)), None);
    }

    #[test]
    fn widths() {
        assert_eq!(ScalarKind::Bool.width(), 1);
        assert_eq!(ScalarKind::Int2.width(), 2);
        assert_eq!(ScalarKind::Float4.width(), 4);
        assert_eq!(ScalarKind::Int8.width(), 8);
    }
}
