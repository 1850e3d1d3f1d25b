//! # Versified Config
//!
//! Settings for the Versified return estimator.
//!
//! An [`EngineSettings`] value carries the investor's base currency, an
//! optional position size, and the fee and tax configuration. It is
//! resolved from up to three layers on top of the built-in defaults:
//!
//! - a TOML, JSON or YAML settings file
//! - `VERSIFIED_*` environment variables, optionally seeded from a `.env` file
//! - explicit overrides such as command-line flags
//!
//! ## Example
//!
//! ```rust
//! use versified_config::prelude::*;
//! use rust_decimal_macros::dec;
//!
//! let settings = EngineSettings::parse(
//!     "[fees]\ncustody_fee = 0.002\n",
//!     ConfigFormat::Toml,
//! )
//! .unwrap();
//! assert_eq!(settings.fees.custody_fee, dec!(0.002));
//! assert!(settings.is_valid());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]

pub mod env;
pub mod error;
pub mod overrides;
pub mod settings;

pub use env::EnvVars;
pub use error::{ConfigError, ConfigResult, Validate, ValidationError};
pub use overrides::{FeeOverrides, SettingsLoader, SettingsOverrides, TaxOverrides};
pub use settings::{ConfigFormat, EngineSettings};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::env::{parse_dotenv, EnvVars};
    pub use crate::error::{ConfigError, ConfigResult, Validate, ValidationError};
    pub use crate::overrides::{FeeOverrides, SettingsLoader, SettingsOverrides, TaxOverrides};
    pub use crate::settings::{ConfigFormat, EngineSettings};
}
