//! Marshalling between native Rust types and host storage.
//!
//! [`Marshal`] maps a native scalar type to its [`ScalarKind`], its [`Datum`]
//! encoding and its slot in host array storage. [`Element`] narrows that to
//! the element types the dispatcher can expose as typed array views.
//!
//! # Implemented for
//!
//! - `bool`, `i16`, `i32`, `i64`, `f32`, `f64` ([`Marshal`])
//! - `f64` ([`Element`])

use datumbridge_types::ScalarKind;

use crate::dynamic::{AnyArray, Scalar};
use crate::host::ArrayData;
use crate::raw::Datum;
use crate::typed::Array;

/// Marshalling between a native scalar type and the host's representation.
pub trait Marshal: Copy + Sized + 'static {
    const KIND: ScalarKind;

    /// Reinterpret a datum as this type.
    ///
    /// The caller must have verified the datum's type identifier matches
    /// [`Self::KIND`]. Calling this on a mismatched datum is a logic error.
    fn from_datum(datum: Datum) -> Self;

    /// Encode this value as a datum of kind [`Self::KIND`].
    fn into_datum(self) -> Datum;

    /// Extract this type from a converted scalar, if the kinds match.
    fn from_scalar(scalar: Scalar) -> Option<Self>;

    fn into_scalar(self) -> Scalar;

    /// View host array storage as elements of this type.
    fn from_array_data<'h>(data: &ArrayData<'h>) -> Option<&'h [Self]>;

    /// Describe a slice of this type as host array storage.
    fn into_array_data(elements: &[Self]) -> ArrayData<'_>;
}

/// Element types the dispatcher exposes as typed array views.
///
/// Each implementation corresponds to one variant of [`AnyArray`]. Supporting
/// a new element kind means adding the variant, implementing this trait, and
/// adding a row to the dispatcher's element table.
pub trait Element: Marshal {
    fn wrap(array: Array<'_, Self>) -> AnyArray<'_>;

    fn project<'a, 'h>(array: &'a AnyArray<'h>) -> Option<&'a Array<'h, Self>>;

    /// Mutable projection, handing the array back on mismatch.
    fn project_mut<'a, 'h>(
        array: &'a mut AnyArray<'h>,
    ) -> Result<&'a mut Array<'h, Self>, &'a mut AnyArray<'h>>;

    /// Unwrap the typed view, handing the array back on mismatch.
    fn unwrap(array: AnyArray<'_>) -> Result<Array<'_, Self>, AnyArray<'_>>;
}

macro_rules! impl_marshal {
    ($ty:ty, $kind:ident, $from:ident, $as:ident) => {
        impl Marshal for $ty {
            const KIND: ScalarKind = ScalarKind::$kind;

            fn from_datum(datum: Datum) -> Self {
                datum.$as()
            }

            fn into_datum(self) -> Datum {
                Datum::$from(self)
            }

            fn from_scalar(scalar: Scalar) -> Option<Self> {
                match scalar {
                    Scalar::$kind(value) => Some(value),
                    _ => None,
                }
            }

            fn into_scalar(self) -> Scalar {
                Scalar::$kind(self)
            }

            fn from_array_data<'h>(data: &ArrayData<'h>) -> Option<&'h [Self]> {
                match data {
                    ArrayData::$kind(elements) => Some(*elements),
                    _ => None,
                }
            }

            fn into_array_data(elements: &[Self]) -> ArrayData<'_> {
                ArrayData::$kind(elements)
            }
        }
    };
}

impl_marshal!(bool, Bool, from_bool, as_bool_unchecked);
impl_marshal!(i16, Int2, from_i16, as_i16_unchecked);
impl_marshal!(i32, Int4, from_i32, as_i32_unchecked);
impl_marshal!(i64, Int8, from_i64, as_i64_unchecked);
impl_marshal!(f32, Float4, from_f32, as_f32_unchecked);
impl_marshal!(f64, Float8, from_f64, as_f64_unchecked);

impl Element for f64 {
    fn wrap(array: Array<'_, Self>) -> AnyArray<'_> {
        AnyArray::Float8(array)
    }

    fn project<'a, 'h>(array: &'a AnyArray<'h>) -> Option<&'a Array<'h, Self>> {
        match array {
            AnyArray::Float8(array) => Some(array),
        }
    }

    fn project_mut<'a, 'h>(
        array: &'a mut AnyArray<'h>,
    ) -> Result<&'a mut Array<'h, Self>, &'a mut AnyArray<'h>> {
        match array {
            AnyArray::Float8(array) => Ok(array),
        }
    }

    fn unwrap(array: AnyArray<'_>) -> Result<Array<'_, Self>, AnyArray<'_>> {
        match array {
            AnyArray::Float8(array) => Ok(array),
        }
    }
}
