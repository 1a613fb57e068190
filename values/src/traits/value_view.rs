use datumbridge_types::{ScalarKind, ShapeKind};

/// Capability queries over a converted value.
///
/// Answers what a value is without exposing how it is stored.
pub trait ValueView {
    fn shape_kind(&self) -> ShapeKind;

    /// Kind of a scalar value, `None` for arrays and tuples.
    fn scalar_kind(&self) -> Option<ScalarKind>;

    /// Element kind of an array value, `None` for scalars and tuples.
    fn element_kind(&self) -> Option<ScalarKind>;

    /// Whether the value can be modified in place. Only owned arrays can.
    fn is_writable(&self) -> bool;

    fn is_scalar(&self) -> bool {
        self.shape_kind() == ShapeKind::Scalar
    }

    fn is_array(&self) -> bool {
        self.shape_kind() == ShapeKind::Array
    }

    fn is_tuple(&self) -> bool {
        self.shape_kind() == ShapeKind::Tuple
    }
}
