//! Runs view (`/workflows`): every run, newest first.

mod runs_component;
mod state;

pub use runs_component::RunsComponent;
pub use state::RunsState;
