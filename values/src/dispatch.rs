//! The type-dispatch conversion engine.
//!
//! Given a type identifier and a datum, the [`Dispatcher`] decides the
//! value's shape and builds the matching [`Value`]:
//!
//! 1. Tuple types become a lazy [`Tuple`](crate::dynamic::Tuple); its fields
//!    are dispatched again when accessed.
//! 2. Array types must be one-dimensional without NULLs, and their element
//!    kind must be in the element table. Read-only conversions borrow host
//!    memory; writable ones copy it into native memory.
//! 3. Everything else is looked up in the scalar table. An identifier that
//!    is not there converts to `None`.
//!
//! The tuple check runs before the array check, which runs before the scalar
//! fallback. Every host call is made through [`contain`], one call at a time.

use alloc::format;
use core::fmt;

use datumbridge_types::{Oid, ScalarKind, Shape};

use crate::copy::detach;
use crate::dynamic::{AnyArray, Scalar, Tuple, Value};
use crate::error::{ConversionError, Result};
use crate::host::{ArrayData, ArrayHeader, Host, HostFault, TupleHeader, contain};
use crate::memory::MemoryHandle;
use crate::options::ConvertOptions;
use crate::raw::Datum;
use crate::typed::{Array, Element};

enum Classified<'h> {
    Tuple(TupleHeader),
    Array(ArrayHeader<'h>),
    Scalar,
}

/// Converts host datums into native values.
///
/// A dispatcher borrows the host for `'h`, the span during which the host
/// keeps the memory behind its datums alive. Borrowed values it produces
/// carry the same lifetime.
///
/// # Example
///
/// ```
/// use bumpalo::Bump;
/// use datumbridge_types::Oid;
/// use datumbridge_values::dispatch::Dispatcher;
/// use datumbridge_values::host::ArenaHost;
/// use datumbridge_values::raw::Datum;
/// use datumbridge_values::traits::ArrayView;
///
/// let arena = Bump::new();
/// let mut host = ArenaHost::new(&arena);
/// let (oid, datum) = host.alloc_array(&[0.5_f64, 1.5]);
///
/// let dispatcher = Dispatcher::new(&host);
/// let value = dispatcher.convert(false, oid, datum).unwrap().unwrap();
/// assert_eq!(value.as_array::<f64>().unwrap().get(1), Some(1.5));
///
/// let value = dispatcher.convert(false, Oid::INT4, Datum::from_i32(7)).unwrap().unwrap();
/// assert_eq!(value.get::<i32>().unwrap(), 7);
///
/// assert!(dispatcher.convert(false, Oid::TEXT, Datum::ZERO).unwrap().is_none());
/// ```
#[derive(Copy, Clone)]
pub struct Dispatcher<'h> {
    host: &'h dyn Host,
    options: ConvertOptions,
    depth: u16,
}

impl fmt::Debug for Dispatcher<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("options", &self.options)
            .field("depth", &self.depth)
            .finish_non_exhaustive()
    }
}

impl<'h> Dispatcher<'h> {
    pub fn new(host: &'h dyn Host) -> Self {
        Self::with_options(host, ConvertOptions::default())
    }

    pub fn with_options(host: &'h dyn Host, options: ConvertOptions) -> Self {
        Self {
            host,
            options,
            depth: 0,
        }
    }

    pub fn options(&self) -> ConvertOptions {
        self.options
    }

    /// Number of tuples enclosing values this dispatcher converts.
    pub fn depth(&self) -> u16 {
        self.depth
    }

    fn nested(self) -> Self {
        Self {
            depth: self.depth.saturating_add(1),
            ..self
        }
    }

    /// Run a single host interaction, turning a raised fault into
    /// [`ConversionError::IntrospectionFault`] attributed to `oid`.
    pub(crate) fn contained<T>(&self, oid: Oid, op: impl FnOnce(&'h dyn Host) -> T) -> Result<T> {
        let host = self.host;
        contain(|| op(host)).map_err(|fault| {
            tracing::warn!(%oid, error = %fault, "contained host fault");
            ConversionError::IntrospectionFault { oid, fault }
        })
    }

    fn classify(&self, oid: Oid, datum: Datum) -> Result<Classified<'h>> {
        tracing::trace!(%oid, ?datum, depth = self.depth, "classifying datum");

        if self.contained(oid, |host| host.type_is_rowtype(oid))? {
            let header = self.contained(oid, |host| host.tuple_header(datum))?;
            return Ok(Classified::Tuple(header));
        }
        if self.contained(oid, |host| host.type_is_array(oid))? {
            let header = self.contained(oid, |host| host.array_header(datum))?;
            return Ok(Classified::Array(header));
        }
        Ok(Classified::Scalar)
    }

    /// Shape descriptor of a tagged value, without converting it.
    pub fn shape_of(&self, oid: Oid, datum: Datum) -> Result<Shape> {
        Ok(match self.classify(oid, datum)? {
            Classified::Tuple(header) => Shape::Tuple(header.type_oid),
            Classified::Array(header) => Shape::Array(header.shape),
            Classified::Scalar => Shape::Scalar(oid),
        })
    }

    /// Convert a tagged value.
    ///
    /// `writable` asks for arrays that can be modified in place; they are
    /// copied out of host memory. Otherwise arrays borrow host memory
    /// read-only. Returns `Ok(None)` for scalar types outside the supported
    /// table.
    pub fn convert(&self, writable: bool, oid: Oid, datum: Datum) -> Result<Option<Value<'h>>> {
        match self.classify(oid, datum)? {
            Classified::Tuple(header) => self.convert_tuple(writable, header).map(Some),
            Classified::Array(header) => self.convert_array(writable, oid, header).map(Some),
            Classified::Scalar => Ok(Self::convert_scalar(oid, datum)),
        }
    }

    /// Convert a datum of a scalar type. No host interaction is needed.
    pub fn convert_scalar(oid: Oid, datum: Datum) -> Option<Value<'h>> {
        let Some(kind) = ScalarKind::from_oid(oid) else {
            tracing::trace!(%oid, "no native representation");
            return None;
        };
        Some(Value::Scalar(Scalar::from_datum(kind, datum)))
    }

    fn convert_tuple(&self, writable: bool, header: TupleHeader) -> Result<Value<'h>> {
        let limit = self.options.max_nesting_depth;
        if self.depth >= limit {
            tracing::debug!(oid = %header.type_oid, limit, "tuple nested too deeply");
            return Err(ConversionError::NestingTooDeep { limit });
        }
        Ok(Value::Tuple(Tuple::new(self.nested(), header, writable)))
    }

    fn convert_array(&self, writable: bool, oid: Oid, header: ArrayHeader<'h>) -> Result<Value<'h>> {
        let extent = header.shape.check_supported().map_err(|violation| {
            tracing::debug!(%oid, %violation, "rejecting array shape");
            ConversionError::UnsupportedShape(violation)
        })?;

        let element = header.shape.element;
        let array = match ScalarKind::from_oid(element) {
            Some(ScalarKind::Float8) => Self::build_array::<f64>(writable, oid, extent, &header.data)?,
            _ => {
                tracing::debug!(%oid, %element, "unsupported array element kind");
                return Err(ConversionError::UnsupportedElementKind { element });
            }
        };
        Ok(Value::Array(array))
    }

    fn build_array<E: Element>(
        writable: bool,
        oid: Oid,
        extent: usize,
        data: &ArrayData<'h>,
    ) -> Result<AnyArray<'h>> {
        let elements = E::from_array_data(data)
            .filter(|elements| elements.len() == extent)
            .ok_or_else(|| ConversionError::IntrospectionFault {
                oid,
                fault: HostFault::new(format!(
                    "array payload does not hold {extent} {} element(s)",
                    E::KIND
                )),
            })?;

        let memory = if writable {
            detach(elements)
        } else {
            MemoryHandle::borrowed(elements)
        };
        Ok(E::wrap(Array::from_handle(memory)))
    }
}
