mod campaign;
mod donation;
mod error;
mod gateway;
mod policy;
mod reconcile;

pub use campaign::*;
pub use donation::*;
pub use error::*;
pub use gateway::*;
pub use policy::*;
pub use reconcile::*;
