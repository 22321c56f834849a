mod error;
mod routes;
mod state;

pub use routes::*;
pub use state::*;
