mod observer;
pub use observer::*;

mod orchestrator;
pub use orchestrator::*;

mod result;
pub use result::*;
