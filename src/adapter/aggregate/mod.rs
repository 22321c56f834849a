mod actor;
mod registry;

pub use actor::*;
pub use registry::*;
