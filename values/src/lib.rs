//! Conversion of host datums into strongly typed native values.
//!
//! A host runtime hands out values as an untyped word ([`raw::Datum`]) plus
//! a type identifier. The [`dispatch::Dispatcher`] classifies the pair as a
//! tuple, an array, or a scalar and builds a [`dynamic::Value`]:
//!
//! - scalars are copied out of the word into a [`dynamic::Scalar`]
//! - arrays become a [`typed::Array`] view that either borrows host memory
//!   read-only or owns a native copy that can be written to
//! - tuples become a lazy [`dynamic::Tuple`] whose fields are converted on
//!   access
//!
//! Every call into the host goes through [`host::contain`], so faults raised
//! by the host surface as [`error::ConversionError::IntrospectionFault`]
//! instead of unwinding through native frames.
//!
//! # Example
//!
//! ```
//! use bumpalo::Bump;
//! use datumbridge_types::Oid;
//! use datumbridge_values::dispatch::Dispatcher;
//! use datumbridge_values::host::ArenaHost;
//! use datumbridge_values::raw::Datum;
//! use datumbridge_values::traits::{ArrayView, ValueView};
//!
//! let arena = Bump::new();
//! let mut host = ArenaHost::new(&arena);
//! let (_, weights) = host.alloc_array(&[0.25_f64, 0.75]);
//! let sample = host.define_composite(&[Oid::INT8, Oid::FLOAT8_ARRAY]);
//! let row = host.alloc_tuple(sample, &[Some(Datum::from_i64(7)), Some(weights)]);
//!
//! let dispatcher = Dispatcher::new(&host);
//! let value = dispatcher.convert(false, sample, row).unwrap().unwrap();
//! let tuple = value.as_tuple().unwrap();
//!
//! assert_eq!(tuple.field(0).unwrap().unwrap().get::<i64>().unwrap(), 7);
//! let weights = tuple.field(1).unwrap().unwrap();
//! assert!(weights.is_array() && !weights.is_writable());
//! assert_eq!(weights.as_array::<f64>().unwrap().get(1), Some(0.75));
//! ```

#![deny(unsafe_code)]

extern crate alloc;

pub mod copy;
pub mod dispatch;
pub mod dynamic;
pub mod error;
pub mod host;
pub mod memory;
pub mod options;
pub mod raw;
pub mod traits;
pub mod typed;

#[cfg(test)]
mod dispatch_test;
