use alloc::format;
use alloc::string::String;

use datumbridge_types::ScalarKind;

use crate::traits::ArrayView;
use crate::typed::{Array, Element};

/// A typed array view whose element type is known only at runtime.
///
/// One variant per supported element kind.
#[derive(Debug)]
pub enum AnyArray<'h> {
    Float8(Array<'h, f64>),
}

impl<'h> AnyArray<'h> {
    pub fn element_kind(&self) -> ScalarKind {
        match self {
            AnyArray::Float8(_) => ScalarKind::Float8,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            AnyArray::Float8(array) => array.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_writable(&self) -> bool {
        match self {
            AnyArray::Float8(array) => array.is_writable(),
        }
    }

    pub fn typed<E: Element>(&self) -> Option<&Array<'h, E>> {
        E::project(self)
    }

    pub fn typed_mut<E: Element>(&mut self) -> Option<&mut Array<'h, E>> {
        E::project_mut(self).ok()
    }

    /// Host-style type name, e.g. `float8[]`.
    pub fn type_name(&self) -> String {
        format!("{}[]", self.element_kind())
    }
}

impl<'h, E: Element> From<Array<'h, E>> for AnyArray<'h> {
    fn from(array: Array<'h, E>) -> Self {
        E::wrap(array)
    }
}
