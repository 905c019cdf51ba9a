// Command-line surface and credential resolution. Credentials resolve in
// order: explicit flag, then environment variable (clap's `env` feature
// folds those two together), then an interactive prompt.

use clap::Parser;
use dialoguer::{Input, Password};
use std::path::PathBuf;

/// Find Instagram accounts you follow that don't follow you back.
#[derive(Debug, Parser)]
#[command(name = "igcheck", version)]
pub struct Cli {
    /// Instagram username (or set IG_USERNAME)
    #[arg(short, long, env = "IG_USERNAME")]
    pub username: Option<String>,

    /// Instagram password (or set IG_PASSWORD)
    #[arg(short, long, env = "IG_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Output results as JSON
    #[arg(long, conflicts_with = "csv")]
    pub json: bool,

    /// Output results as CSV
    #[arg(long)]
    pub csv: bool,

    /// Output file path (defaults to non-followers.json or non-followers.csv)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Offer to unfollow listed accounts interactively
    #[arg(short, long)]
    pub interactive: bool,
}

impl Cli {
    /// Fills in whatever flag and environment did not provide by asking
    /// on the terminal. The password prompt hides input.
    pub fn resolve_credentials(&self) -> anyhow::Result<(String, String)> {
        let username = match &self.username {
            Some(username) => username.clone(),
            None => Input::new().with_prompt("Instagram username").interact_text()?,
        };
        let password = match &self.password {
            Some(password) => password.clone(),
            None => Password::new().with_prompt("Instagram password").interact()?,
        };
        Ok((username, password))
    }

    /// Destination for a file export, honouring the default filenames.
    /// Only called when `--json` or `--csv` is set; `--output` is ignored
    /// otherwise.
    pub fn output_path(&self, extension: &str) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| PathBuf::from(format!("non-followers.{}", extension)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_to_console_table_mode() {
        let cli = Cli::try_parse_from(["igcheck"]).unwrap();
        assert!(!cli.json);
        assert!(!cli.csv);
        assert!(!cli.interactive);
        assert!(cli.output.is_none());
    }

    #[test]
    fn json_and_csv_are_mutually_exclusive() {
        assert!(Cli::try_parse_from(["igcheck", "--json", "--csv"]).is_err());
    }

    #[test]
    fn short_flags_match_the_long_ones() {
        let cli = Cli::try_parse_from(["igcheck", "-u", "alice", "-p", "pw", "-i"]).unwrap();
        assert_eq!(cli.username.as_deref(), Some("alice"));
        assert_eq!(cli.password.as_deref(), Some("pw"));
        assert!(cli.interactive);
    }

    #[test]
    fn dotenv_file_feeds_the_environment_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let env_file = dir.path().join(".env");
        // unique name so parallel tests cannot race on it
        std::fs::write(&env_file, "IGCHECK_DOTENV_PROBE_USER=alice\n").unwrap();

        dotenvy::from_path(&env_file).unwrap();
        assert_eq!(
            std::env::var("IGCHECK_DOTENV_PROBE_USER").as_deref(),
            Ok("alice")
        );
    }

    #[test]
    fn output_path_defaults_per_format() {
        let cli = Cli::try_parse_from(["igcheck", "--json"]).unwrap();
        assert_eq!(cli.output_path("json"), PathBuf::from("non-followers.json"));
        assert_eq!(cli.output_path("csv"), PathBuf::from("non-followers.csv"));

        let cli = Cli::try_parse_from(["igcheck", "--csv", "-o", "custom.csv"]).unwrap();
        assert_eq!(cli.output_path("csv"), PathBuf::from("custom.csv"));
    }
}
