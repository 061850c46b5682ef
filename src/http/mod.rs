pub mod request;
pub mod state;

pub use request::{get, get_observed, Response};
pub use state::ReadyState;
