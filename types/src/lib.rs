//! Host type identifiers and shape descriptors.
//!
//! A host value arrives as an untyped word plus an [`Oid`]. This crate holds
//! the vocabulary used to interpret that pair:
//!
//! - [`Oid`]: the opaque type identifier handed out by the host runtime
//! - [`ScalarKind`]: the fixed table of scalar kinds that convert natively
//! - [`Shape`] and [`ArrayShape`]: the structural category of a value
//! - [`ArrayFlags`]: per-array header bits (null bitmap presence)
//!
//! # Example
//!
//! ```
//! use datumbridge_types::{Oid, ScalarKind};
//!
//! assert_eq!(ScalarKind::from_oid(Oid::FLOAT8), Some(ScalarKind::Float8));
//! assert_eq!(ScalarKind::from_oid(Oid::TEXT), None);
//! assert_eq!(ScalarKind::Float8.array_oid(), Oid::FLOAT8_ARRAY);
//! ```

#![no_std]

mod flags;
mod kind;
mod oid;
mod shape;

pub use flags::ArrayFlags;
pub use kind::ScalarKind;
pub use oid::Oid;
pub use shape::{ArrayShape, Dims, MAX_DIMS, Shape, ShapeKind, ShapeViolation};
