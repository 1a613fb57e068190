//! Statically-typed, one-dimensional array views.
//!
//! `Array<'h, E>` binds an element type to a [`MemoryHandle`]. Reads are
//! bounds-checked and always available. Writes are only possible when the
//! view owns its memory; a view over borrowed host memory rejects them with
//! [`ConversionError::ImmutableViolation`].
//!
//! # Example
//!
//! ```
//! use datumbridge_values::error::ConversionError;
//! use datumbridge_values::traits::ArrayView;
//! use datumbridge_values::typed::Array;
//!
//! let host_memory = [1.0_f64, 2.0, 3.0];
//! let mut view = Array::borrowed(&host_memory);
//! assert_eq!(view.get(1), Some(2.0));
//! assert!(matches!(view.set(1, 5.0), Err(ConversionError::ImmutableViolation)));
//!
//! let mut owned = view.to_owned();
//! owned.set(1, 5.0).unwrap();
//! assert_eq!(owned.get(1), Some(5.0));
//! ```

use alloc::boxed::Box;
use core::fmt::Debug;

use crate::error::{ConversionError, Result};
use crate::memory::MemoryHandle;
use crate::traits::ArrayView;

use super::Element;

pub struct Array<'h, E> {
    memory: MemoryHandle<'h, E>,
}

impl<E: Debug> Debug for Array<'_, E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Array")
            .field("writable", &self.memory.is_owned())
            .field("elements", &self.memory.as_slice())
            .finish()
    }
}

impl<'h, E: Element> Array<'h, E> {
    /// A read-only view over host-owned elements.
    pub fn borrowed(elements: &'h [E]) -> Self {
        Self::from_handle(MemoryHandle::borrowed(elements))
    }

    /// A writable array that owns its elements.
    pub fn owned(elements: impl Into<Box<[E]>>) -> Self {
        Self::from_handle(MemoryHandle::owned(elements))
    }

    /// Bind a memory handle. The extent of the single dimension is the
    /// handle's length; writability follows the handle's ownership.
    pub fn from_handle(memory: MemoryHandle<'h, E>) -> Self {
        Array { memory }
    }

    pub fn memory(&self) -> &MemoryHandle<'h, E> {
        &self.memory
    }

    pub fn into_memory(self) -> MemoryHandle<'h, E> {
        self.memory
    }

    pub fn is_writable(&self) -> bool {
        self.memory.is_owned()
    }

    pub fn as_slice(&self) -> &[E] {
        self.memory.as_slice()
    }

    /// Overwrite the element at `index`.
    pub fn set(&mut self, index: usize, value: E) -> Result<()> {
        let len = self.memory.len();
        let elements = self
            .memory
            .as_mut_slice()
            .ok_or(ConversionError::ImmutableViolation)?;
        let slot = elements
            .get_mut(index)
            .ok_or(ConversionError::ElementIndexOutOfRange { index, len })?;
        *slot = value;
        Ok(())
    }

    /// Mutable access to all elements, only for writable views.
    pub fn as_mut_slice(&mut self) -> Result<&mut [E]> {
        self.memory
            .as_mut_slice()
            .ok_or(ConversionError::ImmutableViolation)
    }
}

impl<E: Element> ArrayView<E> for Array<'_, E> {
    fn len(&self) -> usize {
        self.memory.len()
    }

    fn get(&self, index: usize) -> Option<E> {
        self.memory.as_slice().get(index).copied()
    }
}
