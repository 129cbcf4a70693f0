pub mod logging;
pub mod progress;

pub use logging::*;
pub use progress::*;
