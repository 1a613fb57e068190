//! Memory handles over host-owned or native-owned element storage.
//!
//! A [`MemoryHandle`] fixes its ownership at construction:
//!
//! - `Borrowed` points into memory the host runtime manages. Dropping the
//!   handle does nothing, and the handle never hands out mutable access. The
//!   `'h` lifetime ties it to the host call that produced it.
//! - `Owned` holds a native allocation that is released exactly once, when
//!   the handle is dropped.
//!
//! Consumers see the length and the elements; they never need to know which
//! of the two they hold.

use alloc::boxed::Box;
use core::fmt;
use core::mem::size_of;

pub enum MemoryHandle<'h, E> {
    Borrowed(&'h [E]),
    Owned(Box<[E]>),
}

impl<'h, E> MemoryHandle<'h, E> {
    pub fn borrowed(elements: &'h [E]) -> Self {
        MemoryHandle::Borrowed(elements)
    }

    pub fn owned(elements: impl Into<Box<[E]>>) -> Self {
        MemoryHandle::Owned(elements.into())
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn size_in_bytes(&self) -> usize {
        self.len() * size_of::<E>()
    }

    pub fn is_owned(&self) -> bool {
        matches!(self, MemoryHandle::Owned(_))
    }

    pub fn as_slice(&self) -> &[E] {
        match self {
            MemoryHandle::Borrowed(elements) => elements,
            MemoryHandle::Owned(elements) => elements,
        }
    }

    /// Mutable access to the elements, only available for owned memory.
    pub fn as_mut_slice(&mut self) -> Option<&mut [E]> {
        match self {
            MemoryHandle::Borrowed(_) => None,
            MemoryHandle::Owned(elements) => Some(elements),
        }
    }
}

impl<E> fmt::Debug for MemoryHandle<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ownership = if self.is_owned() { "owned" } else { "borrowed" };
        f.debug_struct("MemoryHandle")
            .field("ownership", &ownership)
            .field("len", &self.len())
            .field("element_type", &core::any::type_name::<E>())
            .finish()
    }
}
