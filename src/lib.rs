//! Datumbridge - typed views over a host runtime's datums
//!
//! # Overview
//!
//! A host runtime (a database server, an interpreter) hands values to native
//! extension code as an untyped machine word plus a type identifier. This
//! crate turns such a pair into a strongly typed [`Value`]:
//!
//! - scalars (`bool`, `int2`, `int4`, `int8`, `float4`, `float8`) are copied
//!   into a [`Scalar`]
//! - one-dimensional `float8[]` arrays become an [`Array`] that either borrows
//!   the host's memory read-only or owns a writable native copy
//! - composite records become a lazy [`Tuple`] whose fields are converted on
//!   access
//!
//! Every call into the host is contained: an error raised by the host
//! surfaces as [`ConversionError::IntrospectionFault`] instead of unwinding
//! through native frames.
//!
//! # Quick Start
//!
//! ```
//! use bumpalo::Bump;
//! use datumbridge::{ArenaHost, ArrayView, Datum, Oid, ValueView};
//!
//! // The arena plays the role of the host's memory context
//! let arena = Bump::new();
//! let mut host = ArenaHost::new(&arena);
//! let (oid, datum) = host.alloc_array(&[1.0_f64, 2.0, 3.0]);
//!
//! // Read-only conversions borrow host memory
//! let value = datumbridge::convert(&host, false, oid, datum).unwrap().unwrap();
//! assert!(!value.is_writable());
//! assert_eq!(value.as_array::<f64>().unwrap().get(2), Some(3.0));
//!
//! // Writable conversions own a copy
//! let mut value = datumbridge::convert(&host, true, oid, datum).unwrap().unwrap();
//! value.as_array_mut::<f64>().unwrap().set(0, 10.0).unwrap();
//!
//! // Unsupported scalar types have no value
//! assert!(datumbridge::convert(&host, false, Oid::TEXT, Datum::ZERO).unwrap().is_none());
//! ```
//!
//! # Host faults
//!
//! Implement [`Host`] for a real runtime. Its methods may raise a
//! [`HostFault`] (see [`HostFault::raise`]); the dispatcher stops the unwind
//! at the call site. Containment needs unwinding, so builds with
//! `panic = "abort"` terminate the process on a host fault instead.

// Error rendering utilities
pub mod error_renderer;
pub use error_renderer::{CharSet, RenderConfig, render_error, render_error_to};

// Re-export the type vocabulary
pub use datumbridge_types::{
    self as types, ArrayFlags, ArrayShape, Oid, ScalarKind, Shape, ShapeKind, ShapeViolation,
};

// Re-export commonly used values
pub use datumbridge_values::{
    self as values,
    dispatch::Dispatcher,
    dynamic::{AnyArray, Scalar, Tuple, Value},
    error::{ConversionError, Result},
    host::{ArenaHost, ArrayData, ArrayHeader, Host, HostFault, TupleHeader},
    options::ConvertOptions,
    raw::Datum,
    traits::{ArrayView, ValueView},
    typed::{Array, Marshal},
};

/// Convert a tagged host value with default options.
///
/// Shorthand for [`Dispatcher::new`] followed by [`Dispatcher::convert`].
pub fn convert<'h>(
    host: &'h dyn Host,
    writable: bool,
    oid: Oid,
    datum: Datum,
) -> Result<Option<Value<'h>>> {
    Dispatcher::new(host).convert(writable, oid, datum)
}

/// Shape descriptor of a tagged host value, without converting it.
pub fn shape_of(host: &dyn Host, oid: Oid, datum: Datum) -> Result<Shape> {
    Dispatcher::new(host).shape_of(oid, datum)
}
