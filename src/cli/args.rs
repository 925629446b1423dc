use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::ConnectionOverrides;
use crate::core::constants::{env_vars, DEFAULT_CRITICAL, DEFAULT_WARNING};

/// Monitoring plugin for Prometheus: alert rule states, query results and
/// server health, reported in the Nagios/Icinga plugin format.
///
/// # Examples
///
/// ```bash
/// # All alerting rules
/// check_prometheus alert
///
/// # One metric against thresholds
/// check_prometheus query -q 'go_goroutines' -w 100 -c 200
///
/// # Readiness including build information
/// check_prometheus health --ready --info
/// ```
#[derive(Debug, Parser)]
#[command(name = "check_prometheus")]
#[command(about = "Checks the state of a Prometheus server, its alerts and query results")]
#[command(version)]
pub struct Cli {
    /// The check to run
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Connection settings file (TOML)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Checks the status of Prometheus alerts (firing = 2, pending = 1, inactive = 0)
    Alert(AlertArgs),

    /// Checks the result of a Prometheus query against thresholds
    Query(QueryArgs),

    /// Checks the health or readiness of the Prometheus server
    Health(HealthArgs),
}

/// Where and how to reach the server. Every flag can also come from the
/// environment or the settings file.
#[derive(Debug, Clone, Default, Args)]
pub struct ConnectionArgs {
    /// Address of the Prometheus instance
    #[arg(short = 'H', long, global = true, env = env_vars::HOSTNAME)]
    pub hostname: Option<String>,

    /// Port of the Prometheus instance
    #[arg(short, long, global = true)]
    pub port: Option<u16>,

    /// URL path prefix of the Prometheus instance
    #[arg(short = 'U', long, global = true, env = env_vars::URL)]
    pub url: Option<String>,

    /// Use a secure (https) connection
    #[arg(short, long, global = true)]
    pub secure: bool,

    /// Allow self-signed or otherwise unverifiable certificates
    #[arg(short, long, global = true)]
    pub insecure: bool,

    /// Bearer token for authentication
    #[arg(long, global = true, env = env_vars::BEARER, hide_env_values = true)]
    pub bearer: Option<String>,

    /// Basic auth credentials as <user:password>
    #[arg(short, long = "user", global = true, env = env_vars::BASIC_AUTH, hide_env_values = true)]
    pub user: Option<String>,

    /// CA bundle used to verify the server certificate
    #[arg(long, global = true, env = env_vars::CA_FILE)]
    pub ca_file: Option<PathBuf>,

    /// Client certificate for mutual TLS
    #[arg(long, global = true, env = env_vars::CERT_FILE)]
    pub cert_file: Option<PathBuf>,

    /// Private key of the client certificate
    #[arg(long, global = true, env = env_vars::KEY_FILE)]
    pub key_file: Option<PathBuf>,

    /// Extra request header as 'Name: value', can be repeated
    #[arg(long = "header", global = true)]
    pub headers: Vec<String>,

    /// Timeout for the whole check in seconds
    #[arg(short, long, global = true)]
    pub timeout: Option<u64>,
}

impl From<ConnectionArgs> for ConnectionOverrides {
    fn from(args: ConnectionArgs) -> Self {
        Self {
            hostname: args.hostname,
            port: args.port,
            url: args.url,
            secure: args.secure,
            insecure: args.insecure,
            bearer: args.bearer,
            basic_auth: args.user,
            ca_file: args.ca_file,
            cert_file: args.cert_file,
            key_file: args.key_file,
            headers: args.headers,
            timeout_secs: args.timeout,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct AlertArgs {
    /// Name of an alert to check, can be repeated. All alerts when omitted
    #[arg(short, long = "name")]
    pub names: Vec<String>,

    /// Only check alerts of this rule group, can be repeated
    #[arg(short, long = "group")]
    pub groups: Vec<String>,

    /// Ignore alerts whose name matches this regular expression, can be repeated
    #[arg(long = "exclude-alert")]
    pub exclude: Vec<String>,

    /// Display only alerts which are not inactive
    #[arg(short = 'P', long = "problems")]
    pub problems_only: bool,

    /// State when no alerts are found (0, 1, 2, 3, OK, WARNING, CRITICAL, UNKNOWN)
    #[arg(short = 'T', long, default_value = "OK")]
    pub no_alerts_state: String,

    /// List every alert, also when all of them are OK
    #[arg(long)]
    pub show_all: bool,
}

#[derive(Debug, Clone, Args)]
pub struct QueryArgs {
    /// PromQL expression to evaluate. For range vectors only the latest value counts
    #[arg(short, long)]
    pub query: String,

    /// Warning threshold
    #[arg(short, long, default_value = DEFAULT_WARNING, allow_hyphen_values = true)]
    pub warning: String,

    /// Critical threshold
    #[arg(short, long, default_value = DEFAULT_CRITICAL, allow_hyphen_values = true)]
    pub critical: String,

    /// List every metric, also when all of them are OK
    #[arg(long)]
    pub show_all: bool,
}

#[derive(Debug, Clone, Copy, Args)]
pub struct HealthArgs {
    /// Check the readiness endpoint instead of the health endpoint
    #[arg(short, long)]
    pub ready: bool,

    /// Add build information of the server
    #[arg(short = 'I', long)]
    pub info: bool,
}
