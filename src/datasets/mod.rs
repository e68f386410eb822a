mod vector_set;
pub use vector_set::*;
