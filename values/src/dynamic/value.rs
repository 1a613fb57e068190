use alloc::format;
use alloc::string::String;

use datumbridge_types::{Oid, ScalarKind, ShapeKind};

use crate::error::{ConversionError, Result};
use crate::raw::Datum;
use crate::traits::ValueView;
use crate::typed::{Array, Element, Marshal};

use super::{AnyArray, Scalar, Tuple};

/// A converted value: a scalar, a typed array view, or a tuple.
///
/// Shape and kind are fixed once the value is built. Typed access goes
/// through [`Value::get`], [`Value::as_array`] and friends, which fail with
/// [`ConversionError::TypeMismatch`] when the requested native type is not
/// the stored one.
///
/// # Example
///
/// ```
/// use datumbridge_values::dynamic::{Scalar, Value};
/// use datumbridge_values::traits::ValueView;
///
/// let v = Value::from(Scalar::Int8(42));
/// assert!(v.is_scalar());
/// assert_eq!(v.get::<i64>().unwrap(), 42);
/// assert!(v.get::<i32>().is_err());
/// ```
#[derive(Debug)]
pub enum Value<'h> {
    Scalar(Scalar),
    Array(AnyArray<'h>),
    Tuple(Tuple<'h>),
}

impl<'h> Value<'h> {
    /// Host-style description of what this value holds, e.g. `int4` or
    /// `float8[] (read-only)`.
    pub fn describe(&self) -> String {
        match self {
            Value::Scalar(scalar) => String::from(scalar.kind().name()),
            Value::Array(array) if array.is_writable() => array.type_name(),
            Value::Array(array) => format!("{} (read-only)", array.type_name()),
            Value::Tuple(tuple) => format!("tuple of {}", tuple.type_oid()),
        }
    }

    fn mismatch(&self, expected: impl Into<String>) -> ConversionError {
        ConversionError::TypeMismatch {
            expected: expected.into(),
            found: self.describe(),
        }
    }

    // --- Scalars ---

    /// Extract a native scalar.
    pub fn get<T: Marshal>(&self) -> Result<T> {
        self.as_scalar()
            .and_then(|scalar| scalar.get::<T>())
            .ok_or_else(|| self.mismatch(T::KIND.name()))
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Value::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }

    /// Encode a scalar back into a tagged value for the host.
    ///
    /// Only scalars travel in this direction.
    pub fn to_datum(&self) -> Result<(Oid, Datum)> {
        match self {
            Value::Scalar(scalar) => Ok(scalar.into_datum()),
            _ => Err(self.mismatch("scalar")),
        }
    }

    // --- Arrays ---

    pub fn as_any_array(&self) -> Option<&AnyArray<'h>> {
        match self {
            Value::Array(array) => Some(array),
            _ => None,
        }
    }

    pub fn as_array<E: Element>(&self) -> Result<&Array<'h, E>> {
        self.as_any_array()
            .and_then(|array| array.typed::<E>())
            .ok_or_else(|| self.mismatch(array_type_name::<E>()))
    }

    /// Mutable access to a typed array view.
    ///
    /// Writes through a view that borrows host memory still fail with
    /// [`ConversionError::ImmutableViolation`].
    pub fn as_array_mut<E: Element>(&mut self) -> Result<&mut Array<'h, E>> {
        match self {
            Value::Array(array) => E::project_mut(array).map_err(|array| {
                ConversionError::TypeMismatch {
                    expected: array_type_name::<E>(),
                    found: array.type_name(),
                }
            }),
            other => Err(other.mismatch(array_type_name::<E>())),
        }
    }

    pub fn into_array<E: Element>(self) -> Result<Array<'h, E>> {
        match self {
            Value::Array(array) => E::unwrap(array).map_err(|array| ConversionError::TypeMismatch {
                expected: array_type_name::<E>(),
                found: array.type_name(),
            }),
            other => Err(other.mismatch(array_type_name::<E>())),
        }
    }

    // --- Tuples ---

    pub fn as_tuple(&self) -> Result<&Tuple<'h>> {
        match self {
            Value::Tuple(tuple) => Ok(tuple),
            _ => Err(self.mismatch("tuple")),
        }
    }

    pub fn into_tuple(self) -> Result<Tuple<'h>> {
        match self {
            Value::Tuple(tuple) => Ok(tuple),
            other => Err(other.mismatch("tuple")),
        }
    }
}

fn array_type_name<E: Element>() -> String {
    format!("{}[]", E::KIND)
}

impl ValueView for Value<'_> {
    fn shape_kind(&self) -> ShapeKind {
        match self {
            Value::Scalar(_) => ShapeKind::Scalar,
            Value::Array(_) => ShapeKind::Array,
            Value::Tuple(_) => ShapeKind::Tuple,
        }
    }

    fn scalar_kind(&self) -> Option<ScalarKind> {
        self.as_scalar().map(Scalar::kind)
    }

    fn element_kind(&self) -> Option<ScalarKind> {
        self.as_any_array().map(AnyArray::element_kind)
    }

    fn is_writable(&self) -> bool {
        self.as_any_array().is_some_and(AnyArray::is_writable)
    }
}

impl From<Scalar> for Value<'_> {
    fn from(scalar: Scalar) -> Self {
        Value::Scalar(scalar)
    }
}

impl<'h> From<AnyArray<'h>> for Value<'h> {
    fn from(array: AnyArray<'h>) -> Self {
        Value::Array(array)
    }
}

impl<'h, E: Element> From<Array<'h, E>> for Value<'h> {
    fn from(array: Array<'h, E>) -> Self {
        Value::Array(E::wrap(array))
    }
}
