mod aggregate;
mod gateway;
pub mod http;
mod ledger;

pub use aggregate::*;
pub use gateway::*;
pub use ledger::*;
