mod batched;
pub use batched::*;

mod convergence;
pub use convergence::*;

mod kolmogorov_smirnov;
pub use kolmogorov_smirnov::*;

mod mode_detection;
pub use mode_detection::*;

mod moments;
pub use moments::*;
