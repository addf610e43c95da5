//! Configuration section definitions.
//!
//! Each module corresponds to a section in `assetpipe.toml`:
//!
//! | Module     | TOML Section   | Purpose                              |
//! |------------|----------------|--------------------------------------|
//! | `build`    | `[build]`      | Output root, browser targets, images |
//! | `packages` | `[packages]`   | Location registry                    |

mod build;
mod packages;

pub use build::BuildConfig;
pub use packages::{Location, LocationRegistry};
