//! Runs the built plugin binary end to end against a canned server, and
//! the overall watchdog against a slow in-memory backend.

use pretty_assertions::assert_eq;
use std::process::Output;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::process::Command;

use promcheck::cli::args::{Commands, HealthArgs};
use promcheck::cli::{run_with, CheckCommand};
use promcheck::core::constants::env_vars;
use promcheck::evaluation::Evaluator;
use promcheck::{ProbeError, Report};

use crate::common::{CannedServer, StaticApi, RULES_MIXED, VECTOR_UP};

async fn run_plugin(args: &[&str]) -> (String, i32) {
    let config_dir = TempDir::new().unwrap();
    let output: Output = Command::new(env!("CARGO_BIN_EXE_check_prometheus"))
        .args(args)
        .env(env_vars::CONFIG_DIR, config_dir.path())
        .env_remove(env_vars::HOSTNAME)
        .env_remove(env_vars::URL)
        .env_remove(env_vars::BEARER)
        .env_remove(env_vars::BASIC_AUTH)
        .env_remove("RUST_LOG")
        .output()
        .await
        .expect("plugin binary runs");
    let stdout = String::from_utf8_lossy(&output.stdout).trim_end().to_string();
    (stdout, output.status.code().unwrap_or(-1))
}

#[tokio::test(flavor = "multi_thread")]
async fn alert_check_against_a_server() {
    let server = CannedServer::start(&[("/api/v1/rules", 200, RULES_MIXED)]).await;
    let port = server.port.to_string();

    let (stdout, code) = run_plugin(&["-H", "127.0.0.1", "-p", &port, "alert", "--group", "SQL"]).await;

    assert_eq!(
        stdout,
        "WARNING - 1 Alerts: 0 Firing - 1 Pending - 0 Inactive\n \
         \\_[WARNING] [SqlAccessDeniedRate] - Job: [mysql] on Instance: [localhost] is pending - value: 0.40\n \
         | total=1 firing=0 pending=1 inactive=0"
    );
    assert_eq!(code, 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn connection_flags_work_after_the_subcommand() {
    let server = CannedServer::start(&[("/api/v1/query", 200, VECTOR_UP)]).await;
    let port = server.port.to_string();

    let (stdout, code) = run_plugin(&[
        "query", "-q", "up", "-w", "0", "-c", "5", "--hostname", "127.0.0.1", "--port", &port,
        "--bearer", "t0k3n",
    ])
    .await;

    assert!(stdout.starts_with("WARNING - 2 Metrics: 0 Critical - 2 Warning - 0 Ok"), "{stdout}");
    assert_eq!(code, 1);
    assert_eq!(
        server.requests()[0].headers.get("authorization").map(String::as_str),
        Some("Bearer t0k3n")
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn health_check_reports_status_code() {
    let server = CannedServer::start(&[("/-/healthy", 503, "Service Unavailable")]).await;
    let port = server.port.to_string();

    let (stdout, code) = run_plugin(&["-H", "127.0.0.1", "-p", &port, "health"]).await;

    assert_eq!(stdout, "CRITICAL - Service Unavailable | statuscode=503");
    assert_eq!(code, 2);
}

#[tokio::test]
async fn malformed_threshold_is_unknown_without_network() {
    // Port 1 is never contacted: thresholds are checked first.
    let (stdout, code) = run_plugin(&["-p", "1", "query", "-q", "up", "-w", "10:5"]).await;

    assert_eq!(stdout, "UNKNOWN - invalid threshold '10:5': start is greater than end");
    assert_eq!(code, 3);
}

#[tokio::test]
async fn unreachable_server_is_unknown() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port().to_string()
    };

    let (stdout, code) = run_plugin(&["-H", "127.0.0.1", "-p", &port, "health"]).await;

    assert!(stdout.starts_with("UNKNOWN - "), "{stdout}");
    assert_eq!(code, 3);
}

#[tokio::test]
async fn usage_errors_exit_unknown() {
    let (stdout, code) = run_plugin(&["alert", "--no-such-flag"]).await;

    assert!(stdout.starts_with("UNKNOWN - "), "{stdout}");
    assert!(stdout.contains("--no-such-flag"));
    assert_eq!(code, 3);
}

#[tokio::test]
async fn missing_config_file_is_unknown() {
    let (stdout, code) = run_plugin(&["--config", "/nonexistent/promcheck.toml", "health"]).await;

    assert_eq!(stdout, "UNKNOWN - Config file not found: /nonexistent/promcheck.toml");
    assert_eq!(code, 3);
}

#[tokio::test]
async fn bare_invocation_is_unknown_on_stdout() {
    let (stdout, code) = run_plugin(&[]).await;

    assert!(stdout.starts_with("UNKNOWN - "), "{stdout:?}");
    assert!(stdout.contains("alert"));
    assert_eq!(code, 3);
}

fn health_check() -> CheckCommand {
    CheckCommand::from_args(&Commands::Health(HealthArgs {
        ready: false,
        info: false,
    }))
    .unwrap()
}

#[tokio::test]
async fn slow_backend_trips_the_watchdog() {
    let api = StaticApi {
        delay: Some(Duration::from_secs(5)),
        ..StaticApi::with_health(200, "Prometheus Server is Healthy.")
    };
    let calls = Arc::clone(&api.calls);
    let evaluator = Evaluator::new(api);

    let err = run_with(&health_check(), &evaluator, Duration::from_secs(1))
        .await
        .unwrap_err();

    assert!(matches!(err, ProbeError::Timeout(1)));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(
        Report::unknown(err.to_string()).render(),
        "UNKNOWN - check timed out after 1s"
    );
}

#[tokio::test]
async fn fast_backend_finishes_within_the_watchdog() {
    let api = StaticApi {
        delay: Some(Duration::from_millis(10)),
        ..StaticApi::with_health(200, "Prometheus Server is Healthy.")
    };

    let report = run_with(&health_check(), &Evaluator::new(api), Duration::from_secs(5))
        .await
        .unwrap();

    assert_eq!(report.render(), "OK - Prometheus Server is Healthy. | statuscode=200");
}

#[tokio::test]
async fn help_exits_cleanly() {
    let (stdout, code) = run_plugin(&["--help"]).await;

    assert!(stdout.contains("alert"));
    assert!(stdout.contains("query"));
    assert!(stdout.contains("health"));
    assert_eq!(code, 0);
}
