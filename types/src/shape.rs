use core::fmt;

use smallvec::SmallVec;

use crate::{ArrayFlags, Oid};

/// Maximum number of array dimensions a host array header can describe.
pub const MAX_DIMS: usize = 6;

/// Per-dimension lengths of an array, stored inline up to [`MAX_DIMS`].
pub type Dims = SmallVec<[usize; MAX_DIMS]>;

/// Structural category of a value, without its payload.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Scalar,
    Array,
    Tuple,
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ShapeKind::Scalar => "scalar",
            ShapeKind::Array => "array",
            ShapeKind::Tuple => "tuple",
        })
    }
}

/// Shape descriptor derived from a tagged value.
///
/// Every tagged value classifies into exactly one of these. A scalar keeps its
/// identifier even when the kind is unsupported; deciding what to do with it
/// is the dispatcher's business.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Shape {
    Scalar(Oid),
    Array(ArrayShape),
    Tuple(Oid),
}

impl Shape {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Scalar(_) => ShapeKind::Scalar,
            Shape::Array(_) => ShapeKind::Array,
            Shape::Tuple(_) => ShapeKind::Tuple,
        }
    }
}

/// Header information of a host array.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ArrayShape {
    pub element: Oid,
    pub dims: Dims,
    pub flags: ArrayFlags,
}

impl ArrayShape {
    /// A one-dimensional array without a null bitmap.
    pub fn vector(element: Oid, len: usize) -> Self {
        Self {
            element,
            dims: smallvec::smallvec![len],
            flags: ArrayFlags::empty(),
        }
    }

    pub fn ndim(&self) -> usize {
        self.dims.len()
    }

    /// Total number of elements over all dimensions, `None` when the
    /// product of the host's dimensions overflows `usize`.
    ///
    /// A zero-dimensional array is empty.
    pub fn len(&self) -> Option<usize> {
        if self.dims.is_empty() {
            return Some(0);
        }
        self.dims.iter().try_fold(1usize, |acc, &d| acc.checked_mul(d))
    }

    pub fn is_empty(&self) -> bool {
        self.dims.is_empty() || self.dims.contains(&0)
    }

    pub fn has_nulls(&self) -> bool {
        self.flags.contains(ArrayFlags::HAS_NULLS)
    }

    /// Check that the array can be viewed natively and return its length.
    ///
    /// Only one-dimensional arrays without a null bitmap qualify. The
    /// dimension check runs first.
    pub fn check_supported(&self) -> Result<usize, ShapeViolation> {
        if self.ndim() != 1 {
            return Err(ShapeViolation::MultiDimensional { ndim: self.ndim() });
        }
        if self.has_nulls() {
            return Err(ShapeViolation::ContainsNulls);
        }
        Ok(self.dims[0])
    }
}

/// Reason an array shape cannot be converted.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
pub enum ShapeViolation {
    #[error("arrays with {ndim} dimensions are not supported, expected exactly one")]
    MultiDimensional { ndim: usize },

    #[error("arrays containing NULL elements are not supported")]
    ContainsNulls,
}
