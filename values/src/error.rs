//! Conversion errors.
//!
//! Every failure is local and synchronous: it is returned to the immediate
//! caller, never retried, and leaves no partially built value behind. The
//! only outcome that is not an error is an unsupported scalar type, which
//! converts to `None`.

use alloc::string::String;

use datumbridge_types::{Oid, ShapeViolation};
use miette::Diagnostic;
use thiserror::Error;

use crate::host::HostFault;

#[derive(Debug, Error, Diagnostic)]
pub enum ConversionError {
    #[diagnostic(code(datumbridge::introspection_fault))]
    #[error("host runtime raised an error while inspecting a value of {oid}: {fault}")]
    IntrospectionFault {
        oid: Oid,
        #[source]
        fault: HostFault,
    },

    #[diagnostic(
        code(datumbridge::unsupported_shape),
        help("only one-dimensional arrays without NULL elements can be converted")
    )]
    #[error("unsupported array shape: {0}")]
    UnsupportedShape(ShapeViolation),

    #[diagnostic(code(datumbridge::unsupported_element_kind))]
    #[error("arrays with elements of {element} are not supported")]
    UnsupportedElementKind { element: Oid },

    #[diagnostic(code(datumbridge::type_mismatch))]
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    #[diagnostic(code(datumbridge::field_index_out_of_range))]
    #[error("field index {index} is out of range for a tuple with {len} field(s)")]
    FieldIndexOutOfRange { index: usize, len: usize },

    #[diagnostic(code(datumbridge::element_index_out_of_range))]
    #[error("element index {index} is out of range for an array of length {len}")]
    ElementIndexOutOfRange { index: usize, len: usize },

    #[diagnostic(
        code(datumbridge::immutable_violation),
        help("convert with `writable = true` or copy the array with `to_owned` first")
    )]
    #[error("cannot write through a read-only view of host memory")]
    ImmutableViolation,

    #[diagnostic(code(datumbridge::nesting_too_deep))]
    #[error("tuple nesting exceeds the limit of {limit} level(s)")]
    NestingTooDeep { limit: u16 },
}

pub type Result<T, E = ConversionError> = core::result::Result<T, E>;
