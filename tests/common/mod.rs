//! Shared test utilities: a canned in-memory backend, recorded API payloads
//! and a minimal HTTP server for exercising the real client.
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

use promcheck::client::models;
use promcheck::core::errors::{ClientError, ProbeResult};
use promcheck::core::traits::PrometheusApi;
use promcheck::evaluation::health::{BuildInfo, HealthResponse, Probe};
use promcheck::evaluation::rules::AlertRule;
use promcheck::evaluation::samples::QueryResponse;

/// Rule groups as served by Prometheus: one inactive, one pending and one firing rule.
pub const RULES_MIXED: &str = r#"{"status":"success","data":{"groups":[{"name":"Foo","file":"alerts.yaml","rules":[{"state":"inactive","name":"HostOutOfMemory","query":"up","duration":120,"labels":{"severity":"critical"},"annotations":{"description":"Foo","summary":"Foo"},"alerts":[],"health":"ok","evaluationTime":0.000553928,"lastEvaluation":"2022-11-24T14:08:17.597083058Z","type":"alerting"}],"interval":10,"limit":0,"evaluationTime":0.000581212,"lastEvaluation":"2022-11-24T14:08:17.59706083Z"},{"name":"SQL","file":"alerts.yaml","rules":[{"state":"pending","name":"SqlAccessDeniedRate","query":"mysql","duration":17280000,"labels":{"severity":"warning"},"annotations":{"description":"MySQL","summary":"MySQL"},"alerts":[{"labels":{"alertname":"SqlAccessDeniedRate","instance":"localhost","job":"mysql","severity":"warning"},"annotations":{"description":"MySQL","summary":"MySQL"},"state":"pending","activeAt":"2022-11-21T10:38:35.373483748Z","value":"4.03448275862069e-01"}],"health":"ok","evaluationTime":0.002909617,"lastEvaluation":"2022-11-24T14:08:25.375220595Z","type":"alerting"}],"interval":10,"limit":0,"evaluationTime":0.003046259,"lastEvaluation":"2022-11-24T14:08:25.375096825Z"},{"name":"TLS","file":"alerts.yaml","rules":[{"state":"firing","name":"BlackboxTLS","query":"SSL","duration":0,"labels":{"severity":"critical"},"annotations":{"description":"TLS","summary":"TLS"},"alerts":[{"labels":{"alertname":"TLS","instance":"https://localhost:443","job":"blackbox","severity":"critical"},"annotations":{"description":"TLS","summary":"TLS"},"state":"firing","activeAt":"2022-11-24T05:11:27.211699259Z","value":"-6.065338210999966e+06"}],"health":"ok","evaluationTime":0.000713955,"lastEvaluation":"2022-11-24T14:08:17.212720815Z","type":"alerting"}],"interval":10,"limit":0,"evaluationTime":0.000738927,"lastEvaluation":"2022-11-24T14:08:17.212700182Z"}]}}"#;

/// A recording rule group next to a single inactive alerting rule.
pub const RULES_WITH_RECORDING: &str = r#"{"status":"success","data":{"groups":[{"name":"example","file":"recoding.yaml","rules":[{"name":"job:foo","query":"sum by(job) (requests_total)","health":"ok","evaluationTime":0.000391321,"lastEvaluation":"2023-01-13T14:26:08.687065894Z","type":"recording"}],"interval":10,"evaluationTime":0.000403777,"lastEvaluation":"2023-01-13T14:26:08.687058029Z"},{"name":"Foo","file":"alerts.yaml","rules":[{"state":"inactive","name":"InactiveAlert","query":"foo","duration":120,"labels":{"severity":"critical"},"annotations":{"description":"Inactive","summary":"Inactive"},"alerts":[],"health":"ok","evaluationTime":0.000462382,"lastEvaluation":"2022-11-18T14:01:07.597034323Z","type":"alerting"}],"interval":10,"limit":0,"evaluationTime":0.000478395,"lastEvaluation":"2022-11-18T14:01:07.597021953Z"}]}}"#;

pub const VECTOR_UP: &str = r#"{"status":"success","data":{"resultType":"vector","result":[{"metric":{"__name__":"up","instance":"localhost","job":"node"},"value":[1668782473.835,"1"]},{"metric":{"__name__":"up","instance":"localhost","job":"prometheus"},"value":[1668782473.835,"1"]}]}}"#;

pub const VECTOR_WITH_WARNINGS: &str = r#"{"status":"success","warnings":["PromQL info: metric might not be a counter"],"data":{"resultType":"vector","result":[{"metric":{"__name__":"up","job":"prometheus"},"value":[1668782473.835,"1"]}]}}"#;

pub const MATRIX_GOROUTINES: &str = r#"{"status":"success","data":{"resultType":"matrix","result":[{"metric":{"__name__":"go_goroutines","instance":"localhost:9090","job":"prometheus"},"values":[[1668786977.058,"33"],[1668786982.058,"35"],[1668786987.058,"38"]]}]}}"#;

pub const VECTOR_EMPTY: &str = r#"{"status":"success","data":{"resultType":"vector","result":[]}}"#;

pub const SCALAR_RESULT: &str = r#"{"status":"success","data":{"resultType":"scalar","result":[1670340712.988,"1"]}}"#;

pub const STRING_RESULT: &str = r#"{"status":"success","data":{"resultType":"string","result":[1670340712.988,"up"]}}"#;

pub const QUERY_ERROR: &str = r#"{"status":"error","errorType":"bad_data","error":"invalid parameter \"query\": 1:4: parse error: unexpected end of input"}"#;

pub const BUILD_INFO: &str = r#"{"status":"success","data":{"version":"2.45.0","revision":"8ef767e396bf8445f009f945b0162fd71827f445","branch":"HEAD","buildUser":"root@920118f645b7","buildDate":"20230623-15:09:49","goVersion":"go1.20.5"}}"#;

pub fn rules(body: &str) -> Vec<AlertRule> {
    models::decode_rules(body.as_bytes()).expect("fixture decodes")
}

pub fn query(body: &str) -> QueryResponse {
    models::decode_query(body.as_bytes()).expect("fixture decodes")
}

/// In-memory backend serving fixed payloads and counting calls.
#[derive(Default)]
pub struct StaticApi {
    pub rules: Option<Vec<AlertRule>>,
    pub query: Option<QueryResponse>,
    pub health: Option<HealthResponse>,
    pub build_info: Option<BuildInfo>,
    pub delay: Option<Duration>,
    pub calls: Arc<AtomicUsize>,
    pub last_query: Arc<Mutex<Option<String>>>,
}

impl StaticApi {
    pub fn with_rules(body: &str) -> Self {
        Self {
            rules: Some(rules(body)),
            ..Self::default()
        }
    }

    pub fn with_query(body: &str) -> Self {
        Self {
            query: Some(query(body)),
            ..Self::default()
        }
    }

    pub fn with_health(status: u16, body: &str) -> Self {
        Self {
            health: Some(HealthResponse {
                status,
                body: body.to_string(),
            }),
            ..Self::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn enter(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

fn missing(what: &str) -> ClientError {
    ClientError::UnexpectedStatus {
        url: format!("static://{what}"),
        status: 404,
        body: "not configured".to_string(),
    }
}

#[async_trait]
impl PrometheusApi for StaticApi {
    async fn rules(&self) -> ProbeResult<Vec<AlertRule>> {
        self.enter().await;
        Ok(self.rules.clone().ok_or_else(|| missing("rules"))?)
    }

    async fn query(&self, query: &str, _at: DateTime<Utc>) -> ProbeResult<QueryResponse> {
        self.enter().await;
        *self.last_query.lock().unwrap() = Some(query.to_string());
        Ok(self.query.clone().ok_or_else(|| missing("query"))?)
    }

    async fn probe(&self, _probe: Probe) -> ProbeResult<HealthResponse> {
        self.enter().await;
        Ok(self.health.clone().ok_or_else(|| missing("probe"))?)
    }

    async fn build_info(&self) -> ProbeResult<BuildInfo> {
        self.enter().await;
        Ok(self.build_info.clone().ok_or_else(|| missing("buildinfo"))?)
    }
}

/// A request as seen by [`CannedServer`].
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub headers: HashMap<String, String>,
    pub body: String,
}

/// Minimal HTTP/1.1 server answering every path with a fixed status and body.
pub struct CannedServer {
    pub port: u16,
    pub requests: Arc<Mutex<Vec<RecordedRequest>>>,
    handle: JoinHandle<()>,
}

impl CannedServer {
    pub async fn start(routes: &[(&str, u16, &str)]) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let port = listener.local_addr().expect("local addr").port();
        let routes: Arc<HashMap<String, (u16, String)>> = Arc::new(
            routes
                .iter()
                .map(|(path, status, body)| (path.to_string(), (*status, body.to_string())))
                .collect(),
        );
        let requests = Arc::new(Mutex::new(Vec::new()));

        let recorded = Arc::clone(&requests);
        let handle = tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    break;
                };
                let routes = Arc::clone(&routes);
                let recorded = Arc::clone(&recorded);
                tokio::spawn(async move {
                    let _ = serve(stream, &routes, &recorded).await;
                });
            }
        });

        Self {
            port,
            requests,
            handle,
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Drop for CannedServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn serve(
    mut stream: TcpStream,
    routes: &HashMap<String, (u16, String)>,
    recorded: &Mutex<Vec<RecordedRequest>>,
) -> std::io::Result<()> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    let header_end = loop {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Ok(());
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.lines();
    let request_line = lines.next().unwrap_or_default();
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let target = parts.next().unwrap_or_default().to_string();
    let path = target.split('?').next().unwrap_or_default().to_string();

    let headers: HashMap<String, String> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_ascii_lowercase(), v.trim().to_string()))
        .collect();

    let content_length: usize = headers
        .get("content-length")
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);
    while buf.len() < header_end + content_length {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    let body = String::from_utf8_lossy(&buf[header_end..]).to_string();

    recorded.lock().unwrap().push(RecordedRequest {
        method,
        path: path.clone(),
        headers,
        body,
    });

    let (status, payload) = routes
        .get(&path)
        .cloned()
        .unwrap_or((404, "404 page not found".to_string()));
    let reason = match status {
        200 => "OK",
        400 => "Bad Request",
        401 => "Unauthorized",
        404 => "Not Found",
        422 => "Unprocessable Entity",
        503 => "Service Unavailable",
        _ => "Status",
    };
    let response = format!(
        "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{payload}",
        payload.len()
    );
    stream.write_all(response.as_bytes()).await?;
    stream.shutdown().await?;
    Ok(())
}
