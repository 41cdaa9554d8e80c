//! Configuration resolution
//!
//! Implements the two-level inheritance merge:
//! 1. Built-in defaults
//! 2. Provider block (service-wide)
//! 3. Function block (per-function overrides)
//!
//! Scalars: function wins, else provider, else built-in. Maps
//! (environment, tags): key-wise union with function precedence.

mod defaults;
mod effective;
mod merge;

pub use defaults::BuiltinDefaults;
pub use effective::{resolve, resolve_all, EffectiveConfig, ValueOrigin};
pub use merge::merge_maps;
