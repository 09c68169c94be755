//! UI layer of the TUI application: the runtime loop, the root view, its
//! components, and theming.

pub mod components;
pub mod main_component;
pub mod runtime;
pub mod theme;
