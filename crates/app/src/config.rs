//! Application configuration module

use clap::Parser;

/// Folio bookstore backend configuration
#[derive(Debug, Clone, Parser)]
#[command(name = "folio-app", about = "Folio bookstore backend", long_about = None)]
pub struct AppConfig {
    /// Store display name used in buyer notifications
    #[arg(long, env = "FOLIO_STORE_NAME", default_value = "Folio Books")]
    pub store_name: String,

    /// Contact address shown to buyers
    #[arg(long, env = "FOLIO_CONTACT_EMAIL", default_value = "support@folio.example")]
    pub contact_email: String,

    /// Public base URL used to build order tracking links
    #[arg(long, env = "FOLIO_BASE_URL", default_value = "http://localhost:8698")]
    pub base_url: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,
}

impl AppConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }
}
