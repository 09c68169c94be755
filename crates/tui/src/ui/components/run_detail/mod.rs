//! Run detail view (`/workflow/:id`): one run, its jobs, and their logs.

mod run_detail_component;
mod state;

pub use run_detail_component::RunDetailComponent;
pub use state::RunDetailState;
