//! Header bar: product title, route entries, request throbber, and the
//! sign-out link.
//!
//! The header is a pure function of the current route. Entries come from the
//! fixed `HEADER_ROUTES` table, in declaration order; the entry whose path
//! equals the current path exactly is highlighted, so detail routes highlight
//! nothing.

mod header_component;
mod state;

pub use header_component::HeaderComponent;
pub use state::HeaderState;
