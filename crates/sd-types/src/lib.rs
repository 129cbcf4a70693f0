pub mod error;
pub mod portfolio;
pub mod project;
pub mod report;
pub mod smell;

pub use error::*;
pub use portfolio::*;
pub use project::*;
pub use report::*;
pub use smell::*;
