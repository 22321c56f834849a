mod boot;
mod config;
mod intent;
mod queries;
mod reconcile;

pub use boot::*;
pub use config::*;
pub use intent::*;
pub use queries::*;
pub use reconcile::*;
