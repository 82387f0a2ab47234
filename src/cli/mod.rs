//! Command line front end for the analysis API.

mod commands;

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use eyre::{Result, WrapErr};
use secrecy::SecretString;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use codeq_nlp_api::{ClientConfig, Settings};

pub use commands::Commands;

#[derive(Parser, Debug)]
#[command(name = "codeq", version, about = "Analyze text with the Codeq NLP API")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// TOML file with endpoint, user_id, user_key and timeout_seconds
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Analysis endpoint URL
    #[arg(long, global = true, env = "CODEQ_ENDPOINT")]
    pub endpoint: Option<String>,

    #[arg(long, global = true, env = "CODEQ_USER_ID")]
    pub user_id: Option<String>,

    #[arg(long, global = true, env = "CODEQ_USER_KEY", hide_env_values = true)]
    pub user_key: Option<String>,

    /// Request timeout
    #[arg(long, global = true, value_name = "SECONDS", env = "CODEQ_TIMEOUT_SECONDS")]
    pub timeout: Option<u64>,

    /// More log output on stderr (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn run(&self) -> Result<()> {
        match &self.command {
            Commands::Analyze(args) => args.execute(self.client_config()?),
            Commands::Annotators => commands::list_annotators(),
        }
    }

    /// Config file first, then environment and flags on top.
    fn client_config(&self) -> Result<ClientConfig> {
        let mut settings = match &self.config {
            Some(path) => load_settings(path)?,
            None => Settings::default(),
        };
        if let Some(endpoint) = &self.endpoint {
            settings.endpoint = endpoint.clone();
        }
        if let Some(user_id) = &self.user_id {
            settings.user_id = Some(user_id.clone());
        }
        if let Some(user_key) = &self.user_key {
            settings.user_key = Some(SecretString::from(user_key.as_str()));
        }
        if let Some(timeout) = self.timeout {
            settings.timeout_seconds = timeout;
        }
        debug!(endpoint = %settings.endpoint, "resolved client settings");

        settings
            .into_client_config()
            .wrap_err("invalid client settings")
    }
}

fn load_settings(path: &Path) -> Result<Settings> {
    let content = fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read config {}", path.display()))?;
    toml::from_str(&content).wrap_err_with(|| format!("invalid config {}", path.display()))
}

pub fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::io::Write;

    #[test]
    fn flags_override_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "endpoint = \"http://file.example\"\nuser_id = \"file-id\"\nuser_key = \"file-key\"\ntimeout_seconds = 3"
        )
        .unwrap();

        let cli = Cli::parse_from([
            "codeq",
            "--config",
            file.path().to_str().unwrap(),
            "--user-id",
            "flag-id",
            "annotators",
        ]);
        let config = cli.client_config().unwrap();

        assert_eq!(config.endpoint, "http://file.example");
        assert_eq!(config.user_id, "flag-id");
        assert_eq!(config.user_key.expose_secret(), "file-key");
        assert_eq!(config.timeout.as_secs(), 3);
    }

    #[test]
    fn zero_timeout_flag_is_rejected() {
        let cli = Cli::parse_from([
            "codeq",
            "--user-id",
            "id",
            "--user-key",
            "key",
            "--timeout",
            "0",
            "annotators",
        ]);
        let err = cli.client_config().unwrap_err();
        assert!(format!("{err:#}").contains("timeout_seconds"));
    }

    #[test]
    fn unreadable_config_is_reported() {
        let cli = Cli::parse_from([
            "codeq",
            "--config",
            "/nonexistent/codeq.toml",
            "annotators",
        ]);
        let err = cli.client_config().unwrap_err();
        assert!(format!("{err:#}").contains("failed to read config"));
    }
}
