mod array;
mod marshal;

pub use array::Array;
pub use marshal::{Element, Marshal};
