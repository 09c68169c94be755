//! UI components: header, the three page views, and the logs panel.

pub mod common;
pub mod component;
pub mod definitions;
pub mod header;
pub mod logs;
pub mod run_detail;
pub mod runs;

pub use component::*;
