//! Logs panel: recent user-facing messages (request failures, run lifecycle).
//! Toggled with `Ctrl+L`.

pub mod logs_component;
pub mod state;

pub use logs_component::LogsComponent;
pub use state::LogsState;
