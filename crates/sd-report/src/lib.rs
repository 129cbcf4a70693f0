pub mod builder;
pub mod score;

pub use builder::*;
pub use score::*;
