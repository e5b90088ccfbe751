mod controller;
mod state;

pub use controller::Controller;
pub use state::{Phase, ViewState};
