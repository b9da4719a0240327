//! CLI argument definitions for sleuth-server.
//!
//! Uses `clap` v4 derive macros to parse command-line arguments.

use std::path::PathBuf;

use clap::Parser;

/// Sleuth username lookup API server.
///
/// Wraps the external scanner executable behind an HTTP API:
/// `/lookup/{username}`, `/status`, `/platforms`, `/health`.
#[derive(Parser, Debug)]
#[command(name = "sleuth-server")]
#[command(version, about, long_about = None)]
pub struct ServerCli {
    /// Path to config.toml configuration file.
    #[arg(short, long, default_value = "/etc/sleuth/config.toml")]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    ///
    /// Takes precedence over the config file and environment variables.
    #[arg(long)]
    pub log_level: Option<String>,

    /// Override log format (json, pretty).
    ///
    /// Takes precedence over the config file and environment variables.
    #[arg(long)]
    pub log_format: Option<String>,

    /// Validate configuration file and exit without starting the server.
    #[arg(long)]
    pub validate: bool,

    /// Override PID file path (takes precedence over config file).
    #[arg(long)]
    pub pid_file: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_no_arguments_given() {
        let cli = ServerCli::try_parse_from(["sleuth-server"]).expect("should parse");

        assert_eq!(cli.config, PathBuf::from("/etc/sleuth/config.toml"));
        assert_eq!(cli.log_level, None);
        assert_eq!(cli.log_format, None);
        assert!(!cli.validate);
        assert_eq!(cli.pid_file, None);
    }

    #[test]
    fn config_path_accepts_short_and_long_forms() {
        let short = ServerCli::try_parse_from(["sleuth-server", "-c", "/tmp/a.toml"])
            .expect("short form should parse");
        let long = ServerCli::try_parse_from(["sleuth-server", "--config", "/tmp/a.toml"])
            .expect("long form should parse");

        assert_eq!(short.config, PathBuf::from("/tmp/a.toml"));
        assert_eq!(long.config, short.config);
    }

    #[test]
    fn overrides_and_validate_flag_parse_together() {
        let cli = ServerCli::try_parse_from([
            "sleuth-server",
            "--log-level",
            "debug",
            "--log-format",
            "json",
            "--pid-file",
            "/run/sleuth.pid",
            "--validate",
        ])
        .expect("should parse");

        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert_eq!(cli.log_format.as_deref(), Some("json"));
        assert_eq!(cli.pid_file.as_deref(), Some("/run/sleuth.pid"));
        assert!(cli.validate);
    }

    #[test]
    fn unknown_flag_is_rejected() {
        let result = ServerCli::try_parse_from(["sleuth-server", "--daemonize"]);
        assert!(result.is_err());
    }
}
