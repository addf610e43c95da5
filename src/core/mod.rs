//! Core types shared across the codebase.

mod context;
mod driver;

pub use context::BuildContext;
pub use driver::BuildMode;
