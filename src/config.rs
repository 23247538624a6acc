//! Storefront configuration
//!
//! Command line and environment settings for hosts that embed the storefront core.

use std::path::PathBuf;

use clap::Parser;

use crate::{
    catalog::Catalog,
    fixtures::{DEFAULT_CATALOG, Fixture, FixtureError},
    session::Session,
};

mod logging;
mod storage;

pub use logging::{LogFormat, LoggingConfig};
pub use storage::StorageConfig;

/// Storefront configuration
#[derive(Debug, Parser)]
#[command(name = "confection", about = "Sweets storefront core", long_about = None)]
pub struct StorefrontConfig {
    /// Persistence settings.
    #[command(flatten)]
    pub storage: StorageConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Catalog fixture name
    #[arg(long, env = "STOREFRONT_CATALOG", default_value = DEFAULT_CATALOG)]
    pub catalog: String,

    /// Directory containing `catalog/<name>.yml` fixtures
    #[arg(long, env = "STOREFRONT_FIXTURES_DIR")]
    pub fixtures_dir: Option<PathBuf>,
}

impl StorefrontConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        Self::try_parse()
    }

    /// Load the configured catalog fixture.
    ///
    /// # Errors
    ///
    /// Returns a [`FixtureError`] if the fixture cannot be read or is invalid.
    pub fn open_catalog(&self) -> Result<Catalog, FixtureError> {
        let fixture = match &self.fixtures_dir {
            Some(dir) => Fixture::with_base_path(dir),
            None => Fixture::new(),
        };

        fixture.load_catalog(&self.catalog)
    }

    /// Open a session over the configured storage.
    #[must_use]
    pub fn open_session(&self) -> Session {
        Session::new(self.storage.open())
    }
}
