//! Copying host memory into native memory.
//!
//! A borrowed view dies with the host call that produced it. Copying the
//! elements into a native allocation yields an owned, writable value with a
//! `'static` lifetime that can outlive the host call.
//!
//! # Example
//!
//! ```
//! use datumbridge_values::memory::MemoryHandle;
//!
//! let detached = {
//!     let host_memory = vec![1.0_f64, 2.0];
//!     MemoryHandle::borrowed(&host_memory[..]).into_owned()
//! };
//! assert!(detached.is_owned());
//! assert_eq!(detached.as_slice(), &[1.0, 2.0]);
//! ```

use alloc::boxed::Box;

use crate::dynamic::{AnyArray, Value};
use crate::error::{ConversionError, Result};
use crate::memory::MemoryHandle;
use crate::typed::{Array, Element};

/// Copy elements into a fresh native allocation.
pub fn detach<E: Copy>(elements: &[E]) -> MemoryHandle<'static, E> {
    MemoryHandle::Owned(Box::from(elements))
}

impl<E: Copy> MemoryHandle<'_, E> {
    /// Turn this handle into an owned one, copying borrowed memory.
    ///
    /// Owned memory is moved, not copied.
    pub fn into_owned(self) -> MemoryHandle<'static, E> {
        match self {
            MemoryHandle::Borrowed(elements) => detach(elements),
            MemoryHandle::Owned(elements) => MemoryHandle::Owned(elements),
        }
    }
}

impl<E: Element> Array<'_, E> {
    /// Copy this view into a writable array that owns its elements.
    pub fn to_owned(&self) -> Array<'static, E> {
        Array::from_handle(detach(self.as_slice()))
    }
}

impl AnyArray<'_> {
    pub fn to_owned(&self) -> AnyArray<'static> {
        match self {
            AnyArray::Float8(array) => AnyArray::Float8(array.to_owned()),
        }
    }
}

impl Value<'_> {
    /// Copy this value out of host memory.
    ///
    /// Scalars are copied by value and arrays into native memory. Tuples stay
    /// bound to the host that decodes their fields and fail with
    /// [`ConversionError::TypeMismatch`].
    pub fn detach(&self) -> Result<Value<'static>> {
        match self {
            Value::Scalar(scalar) => Ok(Value::Scalar(*scalar)),
            Value::Array(array) => Ok(Value::Array(array.to_owned())),
            Value::Tuple(_) => Err(ConversionError::TypeMismatch {
                expected: "scalar or array".into(),
                found: self.describe(),
            }),
        }
    }
}
