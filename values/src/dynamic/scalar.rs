use core::fmt;

use datumbridge_types::{Oid, ScalarKind};

use crate::raw::Datum;
use crate::typed::Marshal;

/// A converted scalar: exactly one native value of a supported kind.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Scalar {
    Bool(bool),
    Int2(i16),
    Int4(i32),
    Int8(i64),
    Float4(f32),
    Float8(f64),
}

impl Scalar {
    /// Decode a datum of the given kind.
    pub fn from_datum(kind: ScalarKind, datum: Datum) -> Self {
        match kind {
            ScalarKind::Bool => Scalar::Bool(bool::from_datum(datum)),
            ScalarKind::Int2 => Scalar::Int2(i16::from_datum(datum)),
            ScalarKind::Int4 => Scalar::Int4(i32::from_datum(datum)),
            ScalarKind::Int8 => Scalar::Int8(i64::from_datum(datum)),
            ScalarKind::Float4 => Scalar::Float4(f32::from_datum(datum)),
            ScalarKind::Float8 => Scalar::Float8(f64::from_datum(datum)),
        }
    }

    pub fn kind(&self) -> ScalarKind {
        match self {
            Scalar::Bool(_) => ScalarKind::Bool,
            Scalar::Int2(_) => ScalarKind::Int2,
            Scalar::Int4(_) => ScalarKind::Int4,
            Scalar::Int8(_) => ScalarKind::Int8,
            Scalar::Float4(_) => ScalarKind::Float4,
            Scalar::Float8(_) => ScalarKind::Float8,
        }
    }

    /// Encode back into a tagged value for the host.
    pub fn into_datum(self) -> (Oid, Datum) {
        let datum = match self {
            Scalar::Bool(v) => v.into_datum(),
            Scalar::Int2(v) => v.into_datum(),
            Scalar::Int4(v) => v.into_datum(),
            Scalar::Int8(v) => v.into_datum(),
            Scalar::Float4(v) => v.into_datum(),
            Scalar::Float8(v) => v.into_datum(),
        };
        (self.kind().oid(), datum)
    }

    pub fn get<T: Marshal>(&self) -> Option<T> {
        T::from_scalar(*self)
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(v) => write!(f, "{v}"),
            Scalar::Int2(v) => write!(f, "{v}"),
            Scalar::Int4(v) => write!(f, "{v}"),
            Scalar::Int8(v) => write!(f, "{v}"),
            Scalar::Float4(v) => write!(f, "{v}"),
            Scalar::Float8(v) => write!(f, "{v}"),
        }
    }
}

macro_rules! impl_from_native {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Scalar {
                fn from(value: $ty) -> Self {
                    Scalar::$variant(value)
                }
            }
        )*
    };
}

impl_from_native!(
    bool => Bool,
    i16 => Int2,
    i32 => Int4,
    i64 => Int8,
    f32 => Float4,
    f64 => Float8,
);
