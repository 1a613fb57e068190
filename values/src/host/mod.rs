//! The boundary to the host runtime.
//!
//! The host owns type catalogs, array and tuple storage, and its own error
//! mechanism. This module describes the few introspection operations the
//! dispatcher needs from it.
//!
//! # Host faults
//!
//! Any [`Host`] method may raise a [`HostFault`] instead of returning. A fault
//! is a non-local transfer of control (it unwinds out of the host call), so
//! it must never be allowed to travel through native frames. Every call into
//! a host goes through [`contain`], which stops the unwind at the call site
//! and turns it into an ordinary `Err`.

mod arena_host;
mod guard;

pub use arena_host::ArenaHost;
pub use guard::{HostFault, contain};

use datumbridge_types::{ArrayShape, Oid, ScalarKind};

use crate::raw::Datum;

/// Introspection operations supplied by the host runtime.
pub trait Host {
    /// Whether `oid` names a composite (row) type.
    fn type_is_rowtype(&self, oid: Oid) -> bool;

    /// Whether `oid` names an array type.
    fn type_is_array(&self, oid: Oid) -> bool;

    /// Decode a datum known to hold a tuple.
    fn tuple_header(&self, datum: Datum) -> TupleHeader;

    /// Decode a datum known to hold an array.
    ///
    /// The returned storage stays valid for as long as the host is borrowed.
    fn array_header(&self, datum: Datum) -> ArrayHeader<'_>;

    /// Type and value of the field at `index`; `None` for a NULL field.
    ///
    /// `index` has already been checked against [`TupleHeader::natts`].
    fn tuple_field(&self, tuple: &TupleHeader, index: usize) -> (Oid, Option<Datum>);
}

/// Decoded header of a host tuple.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TupleHeader {
    pub type_oid: Oid,
    pub natts: usize,
    pub datum: Datum,
}

/// Decoded header of a host array: its shape and its element storage.
#[derive(Clone, Debug, PartialEq)]
pub struct ArrayHeader<'h> {
    pub shape: ArrayShape,
    pub data: ArrayData<'h>,
}

/// Element storage of a host array, typed by storage kind.
///
/// `Opaque` covers element types that have no native representation; the
/// dispatcher never looks inside it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ArrayData<'h> {
    Bool(&'h [bool]),
    Int2(&'h [i16]),
    Int4(&'h [i32]),
    Int8(&'h [i64]),
    Float4(&'h [f32]),
    Float8(&'h [f64]),
    Opaque(&'h [u8]),
}

impl ArrayData<'_> {
    /// Storage kind, `None` for opaque storage.
    pub fn kind(&self) -> Option<ScalarKind> {
        match self {
            ArrayData::Bool(_) => Some(ScalarKind::Bool),
            ArrayData::Int2(_) => Some(ScalarKind::Int2),
            ArrayData::Int4(_) => Some(ScalarKind::Int4),
            ArrayData::Int8(_) => Some(ScalarKind::Int8),
            ArrayData::Float4(_) => Some(ScalarKind::Float4),
            ArrayData::Float8(_) => Some(ScalarKind::Float8),
            ArrayData::Opaque(_) => None,
        }
    }

    /// Number of stored elements (bytes for opaque storage).
    pub fn len(&self) -> usize {
        match self {
            ArrayData::Bool(e) => e.len(),
            ArrayData::Int2(e) => e.len(),
            ArrayData::Int4(e) => e.len(),
            ArrayData::Int8(e) => e.len(),
            ArrayData::Float4(e) => e.len(),
            ArrayData::Float8(e) => e.len(),
            ArrayData::Opaque(bytes) => bytes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
