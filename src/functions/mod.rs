mod inverse;
pub use inverse::*;

mod special;
pub use special::*;
