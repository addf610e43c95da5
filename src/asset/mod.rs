//! Asset-pipeline orchestrator.
//!
//! Maps every registered package's `assets/` folder through one pipeline
//! into `<output>/<key>/`.
//!
//! ```text
//! <root>/assets<suffix>  ──scan──►  AssetMatch  ──transform──►  <output>/<key>/<relative>
//! ```

mod pattern;
mod process;
mod scan;

// Patterns (pure functions)
pub use pattern::{globs, location_patterns};

// Processing (side effects)
pub use process::{TaskReport, iterate};
