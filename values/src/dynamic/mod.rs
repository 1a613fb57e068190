mod array;
mod scalar;
mod tuple;
mod value;

pub use array::AnyArray;
pub use scalar::Scalar;
pub use tuple::Tuple;
pub use value::Value;
