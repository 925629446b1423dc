/// Fixed strings shared by the classifiers, the HTTP client and the report renderer.
///
/// Monitoring front-ends parse the plugin output, so any text that ends up
/// on stdout lives here rather than being spelled out at each call site.
/// Prometheus HTTP endpoints, relative to the configured base URL
pub mod endpoints {
    pub const RULES: &str = "api/v1/rules";
    pub const QUERY: &str = "api/v1/query";
    pub const BUILD_INFO: &str = "api/v1/status/buildinfo";
    pub const HEALTHY: &str = "-/healthy";
    pub const READY: &str = "-/ready";
}

/// Bodies returned by a Prometheus server that is up
pub mod health_bodies {
    pub const HEALTHY: &str = "Prometheus Server is Healthy.";
    pub const READY: &str = "Prometheus Server is Ready.";
}

/// Sub-line texts used when a report has no items
pub mod empty_texts {
    pub const NO_ALERTS_DEFINED: &str = "No alerts defined";
    pub const NO_SUCH_ALERT: &str = "No such alert defined";
    pub const NO_ALERTS_RETRIEVED: &str = "No alerts retrieved";
    pub const NO_STATUS_INFORMATION: &str = "No status information";
}

/// Label names with a dedicated place in alert output
pub mod labels {
    pub const METRIC_NAME: &str = "__name__";
    pub const JOB: &str = "job";
    pub const INSTANCE: &str = "instance";
}

/// Environment variables recognised by the connection settings
pub mod env_vars {
    pub const HOSTNAME: &str = "CHECK_PROMETHEUS_HOSTNAME";
    pub const URL: &str = "CHECK_PROMETHEUS_URL";
    pub const BASIC_AUTH: &str = "CHECK_PROMETHEUS_BASICAUTH";
    pub const BEARER: &str = "CHECK_PROMETHEUS_BEARER";
    pub const CA_FILE: &str = "CHECK_PROMETHEUS_CA_FILE";
    pub const CERT_FILE: &str = "CHECK_PROMETHEUS_CERT_FILE";
    pub const KEY_FILE: &str = "CHECK_PROMETHEUS_KEY_FILE";
    pub const CONFIG_DIR: &str = "PROMCHECK_CONFIG_DIR";
}

pub const DEFAULT_HOSTNAME: &str = "localhost";
pub const DEFAULT_PORT: u16 = 9090;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_WARNING: &str = "10";
pub const DEFAULT_CRITICAL: &str = "20";
pub const CONFIG_FILE_NAME: &str = "config.toml";
