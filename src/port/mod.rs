mod aggregate;
mod gateway;
mod store;

pub use aggregate::*;
pub use gateway::*;
pub use store::*;
