//! Dataset loader
//!
//! Reads the input document from a string, a file, or an HTTP(S) URL.
//!
//! Structural problems (not JSON, no `periods`/`sages` arrays) fail fast.
//! Individual records are decoded one by one so that every malformed record is
//! reported, not just the first one serde trips over.

use crate::dataset::{Collection, Dataset, DatasetError, DatasetResult, Period, RecordIssue, Sage};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Where a dataset comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    File(PathBuf),
    Url(String),
}

impl DataSource {
    /// Interpret a CLI argument: anything starting with http:// or https:// is a URL
    pub fn parse(raw: &str) -> Self {
        let scheme = raw.get(..8).unwrap_or(raw).to_ascii_lowercase();
        if scheme.starts_with("http://") || scheme.starts_with("https://") {
            DataSource::Url(raw.to_string())
        } else {
            DataSource::File(PathBuf::from(raw))
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::File(path) => write!(f, "{}", path.display()),
            DataSource::Url(url) => write!(f, "{}", url),
        }
    }
}

/// Configuration for fetching datasets
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Upper bound for reading a file or completing an HTTP request
    pub fetch_timeout_ms: u64,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_ms: 10_000,
        }
    }
}

impl Dataset {
    /// Parse a dataset document
    pub fn from_json_str(content: &str) -> DatasetResult<Self> {
        let document: Value = serde_json::from_str(content)
            .map_err(|e| DatasetError::Structure(format!("not valid JSON: {}", e)))?;
        Self::from_json_value(document)
    }

    /// Decode an already parsed document
    pub fn from_json_value(document: Value) -> DatasetResult<Self> {
        let mut object = match document {
            Value::Object(map) => map,
            other => {
                return Err(DatasetError::Structure(format!(
                    "expected a top-level object, found {}",
                    json_type(&other)
                )))
            }
        };

        let raw_periods = take_array(&mut object, Collection::Periods)?;
        let raw_sages = take_array(&mut object, Collection::Sages)?;

        let mut issues = Vec::new();
        let periods: Vec<Period> = decode_records(raw_periods, Collection::Periods, &mut issues);
        let sages: Vec<Sage> = decode_records(raw_sages, Collection::Sages, &mut issues);

        if !issues.is_empty() {
            return Err(DatasetError::Records(issues));
        }

        tracing::debug!(
            periods = periods.len(),
            sages = sages.len(),
            "Decoded dataset"
        );

        Ok(Dataset::new(periods, sages))
    }

    /// Read and parse a dataset file
    pub fn from_path(path: &Path) -> DatasetResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }
}

/// Fetch and parse a dataset, bounded by the configured timeout
pub async fn load_source(source: &DataSource, config: &LoaderConfig) -> DatasetResult<Dataset> {
    let timeout = Duration::from_millis(config.fetch_timeout_ms);

    let content = match tokio::time::timeout(timeout, fetch_content(source, timeout)).await {
        Ok(result) => result?,
        Err(_) => {
            tracing::warn!(source = %source, timeout_ms = config.fetch_timeout_ms, "Dataset fetch timed out");
            return Err(DatasetError::Timeout(config.fetch_timeout_ms));
        }
    };

    let dataset = Dataset::from_json_str(&content)?;

    tracing::info!(
        source = %source,
        periods = dataset.periods.len(),
        sages = dataset.sages.len(),
        "Loaded dataset"
    );

    Ok(dataset)
}

async fn fetch_content(source: &DataSource, timeout: Duration) -> DatasetResult<String> {
    match source {
        DataSource::File(path) => Ok(tokio::fs::read_to_string(path).await?),
        DataSource::Url(url) => {
            let client = reqwest::Client::builder().timeout(timeout).build()?;

            let response = client.get(url).send().await.map_err(|e| {
                if e.is_timeout() {
                    DatasetError::Timeout(timeout.as_millis() as u64)
                } else {
                    DatasetError::from(e)
                }
            })?;

            if !response.status().is_success() {
                return Err(DatasetError::Fetch(format!(
                    "HTTP {} from {}",
                    response.status(),
                    url
                )));
            }

            Ok(response.text().await?)
        }
    }
}

fn take_array(object: &mut Map<String, Value>, collection: Collection) -> DatasetResult<Vec<Value>> {
    let key = collection.to_string();
    match object.remove(&key) {
        Some(Value::Array(items)) => Ok(items),
        Some(other) => Err(DatasetError::Structure(format!(
            "`{}` must be an array, found {}",
            key,
            json_type(&other)
        ))),
        None => Err(DatasetError::Structure(format!("missing `{}` array", key))),
    }
}

fn decode_records<T: DeserializeOwned>(
    raw: Vec<Value>,
    collection: Collection,
    issues: &mut Vec<RecordIssue>,
) -> Vec<T> {
    let mut records = Vec::with_capacity(raw.len());

    for (index, value) in raw.into_iter().enumerate() {
        match serde_json::from_value::<T>(value) {
            Ok(record) => records.push(record),
            Err(e) => issues.push(RecordIssue {
                collection,
                index,
                message: e.to_string(),
            }),
        }
    }

    records
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve one canned HTTP response on a local port, returning the dataset URL
    async fn serve_once(response: String) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 1024];
            let _ = socket.read(&mut buf).await;
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        });

        format!("http://{}/data.json", addr)
    }

    const SAMPLE: &str = r#"{
        "periods": [
            {"id": "zugot", "name": "Zugot", "start": -200, "end": 10},
            {"id": "tanaim_temple", "name": "Tannaim (Temple)", "start": 10, "end": 70}
        ],
        "sages": [
            {"name": "Hillel", "periodId": "zugot", "groupId": "5", "year": -30, "bio": "Elder"},
            {"name": "Yohanan ben Zakkai", "periodId": "tanaim_temple", "groupId": "1", "year": 50}
        ]
    }"#;

    #[test]
    fn test_parse_document() {
        let dataset = Dataset::from_json_str(SAMPLE).unwrap();

        assert_eq!(dataset.periods.len(), 2);
        assert_eq!(dataset.sages.len(), 2);
        assert_eq!(dataset.sages[0].bio.as_deref(), Some("Elder"));
        assert_eq!(dataset.sages[1].period_id, "tanaim_temple");
    }

    #[test]
    fn test_empty_arrays_are_legal() {
        let dataset = Dataset::from_json_str(r#"{"periods": [], "sages": []}"#).unwrap();
        assert!(dataset.is_empty());
    }

    #[test]
    fn test_missing_array_fails_fast() {
        let err = Dataset::from_json_str(r#"{"periods": []}"#).unwrap_err();
        assert!(matches!(err, DatasetError::Structure(ref m) if m == "missing `sages` array"));

        let err = Dataset::from_json_str(r#"{"periods": {}, "sages": []}"#).unwrap_err();
        assert!(
            matches!(err, DatasetError::Structure(ref m) if m == "`periods` must be an array, found an object")
        );
    }

    #[test]
    fn test_non_object_document() {
        let err = Dataset::from_json_str("[1, 2]").unwrap_err();
        assert!(matches!(err, DatasetError::Structure(_)));

        let err = Dataset::from_json_str("not json").unwrap_err();
        assert!(matches!(err, DatasetError::Structure(ref m) if m.starts_with("not valid JSON")));
    }

    #[test]
    fn test_malformed_records_are_all_reported() {
        let content = r#"{
            "periods": [{"id": "p1", "name": "P1", "start": -100}],
            "sages": [
                {"name": "ok", "periodId": "p1", "groupId": "1", "year": -50},
                {"name": "bad", "periodId": "p1", "groupId": "1", "year": "circa -40"}
            ]
        }"#;

        match Dataset::from_json_str(content).unwrap_err() {
            DatasetError::Records(issues) => {
                assert_eq!(issues.len(), 2);
                assert_eq!(issues[0].collection, Collection::Periods);
                assert_eq!(issues[0].index, 0);
                assert!(issues[0].message.contains("end"));
                assert_eq!(issues[1].collection, Collection::Sages);
                assert_eq!(issues[1].index, 1);
            }
            other => panic!("expected record errors, got {:?}", other),
        }
    }

    #[test]
    fn test_from_path() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let dataset = Dataset::from_path(file.path()).unwrap();
        assert_eq!(dataset.periods[0].id, "zugot");
    }

    #[test]
    fn test_data_source_parse() {
        assert_eq!(
            DataSource::parse("https://example.org/data.json"),
            DataSource::Url("https://example.org/data.json".to_string())
        );
        assert_eq!(
            DataSource::parse("HTTPS://example.org/data.json"),
            DataSource::Url("HTTPS://example.org/data.json".to_string())
        );
        assert_eq!(
            DataSource::parse("Http://example.org/data.json"),
            DataSource::Url("Http://example.org/data.json".to_string())
        );
        assert_eq!(
            DataSource::parse("http"),
            DataSource::File(PathBuf::from("http"))
        );
        assert_eq!(
            DataSource::parse("data.json"),
            DataSource::File(PathBuf::from("data.json"))
        );
    }

    #[tokio::test]
    async fn test_load_source_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.json");
        std::fs::write(&path, SAMPLE).unwrap();

        let dataset = load_source(&DataSource::File(path), &LoaderConfig::default())
            .await
            .unwrap();
        assert_eq!(dataset.sages.len(), 2);
    }

    #[tokio::test]
    async fn test_load_source_missing_file() {
        let dir = tempdir().unwrap();
        let source = DataSource::File(dir.path().join("absent.json"));

        let err = load_source(&source, &LoaderConfig::default()).await.unwrap_err();
        assert!(matches!(err, DatasetError::Io(_)));
    }

    #[tokio::test]
    async fn test_load_source_from_url() {
        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            SAMPLE.len(),
            SAMPLE
        );
        let url = serve_once(response).await;

        let dataset = load_source(&DataSource::Url(url), &LoaderConfig::default())
            .await
            .unwrap();
        assert_eq!(dataset.periods.len(), 2);
        assert_eq!(dataset.sages[0].name, "Hillel");
    }

    #[tokio::test]
    async fn test_load_source_http_error_status() {
        let url = serve_once(
            "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n".to_string(),
        )
        .await;

        let err = load_source(&DataSource::Url(url.clone()), &LoaderConfig::default())
            .await
            .unwrap_err();
        match err {
            DatasetError::Fetch(message) => {
                assert!(message.contains("404"), "{}", message);
                assert!(message.contains(&url), "{}", message);
            }
            other => panic!("expected fetch error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_load_source_url_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        // Accept the connection and never answer
        let server = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(5)).await;
            drop(socket);
        });

        let config = LoaderConfig {
            fetch_timeout_ms: 200,
        };
        let source = DataSource::Url(format!("http://{}/data.json", addr));

        let err = load_source(&source, &config).await.unwrap_err();
        assert!(matches!(err, DatasetError::Timeout(200)), "{:?}", err);

        server.abort();
    }
}
