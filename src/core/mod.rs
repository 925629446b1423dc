pub mod constants;
pub mod errors;
pub mod traits;
pub mod types;

pub use errors::{ClientError, ConfigError, ProbeError, ProbeResult, ThresholdError};
pub use traits::PrometheusApi;
pub use types::{Severity, Verdict};
