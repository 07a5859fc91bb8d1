pub mod extraction;
pub mod approximation;
pub mod georeference;

pub use extraction::*;
pub use approximation::*;
pub use georeference::*;
