pub mod aggregate;
pub mod recent;

pub use aggregate::*;
pub use recent::*;
