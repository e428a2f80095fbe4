//! Shared configuration library for ticker hosts.
//!
//! Centralizes where a [`TickerConfig`] comes from (file, inline JSON,
//! defaults), the `TICKER_*` environment overrides layered on top, and the
//! guard rails that flag legal but surprising settings.

pub mod loader;
pub mod util;
pub mod validation;

pub use loader::{
    ConfigLoad, ConfigSource, EnvSource, TickerConfigLoader, error::ConfigLoadError,
    to_toml_string,
};
pub use ticker_core::TickerConfig;
pub use validation::{ConfigWarning, ConfigWarnings, collect_warnings};
