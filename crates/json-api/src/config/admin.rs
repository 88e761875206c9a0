//! Admin Config

use clap::Args;

/// Admin endpoint settings.
#[derive(Debug, Args)]
pub struct AdminConfig {
    /// Bearer token required by `/admin` routes. An empty token disables them.
    #[arg(long, env = "ADMIN_TOKEN", hide_env_values = true, default_value = "")]
    pub admin_token: String,
}
