//! Definitions view (`/`): lists workflow definitions and starts runs.

mod definitions_component;
mod state;

pub use definitions_component::DefinitionsComponent;
pub use state::DefinitionsState;
