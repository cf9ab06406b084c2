//! Blocking LDP client for a single pod.
//!
//! Every operation is synchronous: it resolves the target URL, issues its
//! HTTP round trip(s) and blocks until the pod answers or the transport
//! reports an error. The client holds no mutable state, only the immutable
//! config and the underlying HTTP client, so it can be shared between
//! threads without synchronization.

use std::thread::sleep;

use error_stack::bail;
use error_stack::ResultExt;
use reqwest::blocking::Client as BlockingClient;
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use tracing::debug;
use tracing::info;
use tracing::warn;
use url::Url;

use crate::config::PodConfig;
use crate::error::PodError;
use crate::error::PodResult;
use crate::record::parse_records;
use crate::record::serialize_records;
use crate::record::Record;
use crate::urls::resolve;

/// Content type sent when creating a container.
const CONTAINER_CONTENT_TYPE: &str = "text/turtle";
/// Content type sent when writing a leaf resource.
const RECORD_CONTENT_TYPE: &str = "text/plain; charset=UTF-8";

/// Outcome of [`PodClient::create_container`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerState {
    /// The existence probe found the container, nothing was written
    AlreadyExists,
    /// The container was created by this call
    Created,
}

/// Blocking client for LDP resources under one pod.
pub struct PodClient {
    config: PodConfig,
    http: BlockingClient,
}

impl PodClient {
    /// Create a client for the pod named in `config`.
    pub fn new(config: PodConfig) -> PodResult<Self> {
        let http = BlockingClient::builder()
            .timeout(config.request_timeout)
            .build()
            .change_context(PodError::Configuration {
                message: "Failed to create blocking HTTP client".into(),
            })?;

        info!(pod_url = %config.pod_url, "Pod client created");

        Ok(Self { config, http })
    }

    /// Ensure a container exists under the pod.
    ///
    /// An existing container is never recreated or altered: a probe that
    /// finds the container short-circuits the operation. Any other probe
    /// outcome, a transport failure included, falls through to the creation
    /// request; "not found" and "unreachable" are deliberately not told
    /// apart.
    pub fn create_container(&self, container_name: &str) -> PodResult<ContainerState> {
        let url = self.container_url(container_name)?;

        match self.http.get(url.clone()).send() {
            Ok(response) if response.status() == StatusCode::OK => {
                info!(url = %url, "Container already exists");
                return Ok(ContainerState::AlreadyExists);
            }
            Ok(response) => {
                debug!(
                    url = %url,
                    status = response.status().as_u16(),
                    "Container not found, proceeding with creation"
                );
            }
            Err(err) => {
                debug!(url = %url, error = %err, "Container probe failed, proceeding with creation");
            }
        }

        let status = self.put(&url, CONTAINER_CONTENT_TYPE, String::new())?;
        match status {
            StatusCode::OK | StatusCode::CREATED | StatusCode::NO_CONTENT => {
                info!(url = %url, "Container created");
                Ok(ContainerState::Created)
            }
            other => bail!(PodError::UnexpectedStatus {
                status: other.as_u16(),
            }),
        }
    }

    /// Replace the full contents of a leaf resource with the given records.
    ///
    /// The resource is created if it does not exist yet. The write is one
    /// request; there is no chunking and no rollback.
    pub fn publish_records(
        &self,
        container_name: &str,
        resource_name: &str,
        records: &[Record],
    ) -> PodResult<()> {
        let url = self.resource_url(container_name, resource_name)?;
        let body = serialize_records(records);

        let status = self.put(&url, RECORD_CONTENT_TYPE, body)?;
        match status {
            StatusCode::OK
            | StatusCode::CREATED
            | StatusCode::NO_CONTENT
            | StatusCode::RESET_CONTENT => {
                info!(url = %url, count = records.len(), "Records published");
                Ok(())
            }
            other => bail!(PodError::UnexpectedStatus {
                status: other.as_u16(),
            }),
        }
    }

    /// Read the current record set of a leaf resource.
    pub fn read_records(&self, container_name: &str, resource_name: &str) -> PodResult<Vec<Record>> {
        let url = self.resource_url(container_name, resource_name)?;

        let response = self
            .http
            .get(url.clone())
            .send()
            .change_context(PodError::Network {
                message: format!("GET {url} failed"),
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            bail!(PodError::UnexpectedStatus {
                status: status.as_u16(),
            });
        }

        let body = response.text().change_context(PodError::Network {
            message: format!("Failed to read response body of {url}"),
        })?;

        let records = parse_records(&body);
        info!(url = %url, count = records.len(), "Records read");
        Ok(records)
    }

    /// Append records to a leaf resource, keeping its current contents.
    ///
    /// Known limitation: the read and the subsequent write are two
    /// independent round trips, so a concurrent writer between them is
    /// silently overwritten (lost update). An unreadable resource is treated
    /// as empty, which makes updating a missing resource behave like a first
    /// publish.
    pub fn update_records(
        &self,
        container_name: &str,
        resource_name: &str,
        records: &[Record],
    ) -> PodResult<()> {
        let mut all = match self.read_records(container_name, resource_name) {
            Ok(existing) => existing,
            Err(report) => {
                warn!(error = ?report, "Treating unreadable resource as empty for update");
                Vec::new()
            }
        };
        all.extend_from_slice(records);
        self.publish_records(container_name, resource_name, &all)
    }

    fn container_url(&self, container_name: &str) -> PodResult<Url> {
        self.parse_url(resolve(&self.config.pod_url, container_name, true))
    }

    fn resource_url(&self, container_name: &str, resource_name: &str) -> PodResult<Url> {
        let path = format!("{container_name}/{resource_name}");
        self.parse_url(resolve(&self.config.pod_url, &path, false))
    }

    fn parse_url(&self, url: String) -> PodResult<Url> {
        Url::parse(&url).change_context(PodError::Configuration {
            message: format!("Invalid resource URL: {url}"),
        })
    }

    /// Issue a PUT, retrying transport-level failures per the retry policy.
    ///
    /// Status codes are returned as-is; classifying them is the caller's
    /// job, and an unexpected status is never retried.
    fn put(&self, url: &Url, content_type: &'static str, body: String) -> PodResult<StatusCode> {
        let mut attempts = 0;
        loop {
            attempts += 1;
            match self
                .http
                .put(url.clone())
                .header(CONTENT_TYPE, content_type)
                .body(body.clone())
                .send()
            {
                Ok(response) => return Ok(response.status()),
                Err(err) if attempts <= self.config.max_retries => {
                    warn!(url = %url, error = %err, "PUT failed, retrying after delay");
                    sleep(self.config.retry_delay);
                }
                Err(err) => {
                    return Err(err).change_context(PodError::Network {
                        message: format!("PUT {url} failed"),
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use similar_asserts::assert_eq;
    use wiremock::matchers::body_string;
    use wiremock::matchers::header;
    use wiremock::matchers::method;
    use wiremock::matchers::path;
    use wiremock::Mock;
    use wiremock::MockServer;
    use wiremock::ResponseTemplate;

    use super::*;

    fn client_for(uri: &str) -> PodClient {
        PodClient::new(PodConfig::new(uri)).expect("create client")
    }

    #[tokio::test]
    async fn creates_missing_container() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/measurements/"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("PUT"))
            .and(path("/measurements/"))
            .and(header("content-type", "text/turtle"))
            .and(body_string(""))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&mock_server)
            .await;

        let uri = mock_server.uri();
        let state = tokio::task::spawn_blocking(move || {
            client_for(&uri).create_container("measurements")
        })
        .await
        .expect("join")
        .expect("create container");

        assert_eq!(state, ContainerState::Created);
    }

    #[tokio::test]
    async fn container_creation_is_idempotent() {
        let mock_server = MockServer::start().await;

        // The first probe misses, every later probe finds the container.
        Mock::given(method("GET"))
            .and(path("/measurements/"))
            .respond_with(ResponseTemplate::new(404))
            .up_to_n_times(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/measurements/"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&mock_server)
            .await;

        Mock::given(method("PUT"))
            .and(path("/measurements/"))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&mock_server)
            .await;

        let uri = mock_server.uri();
        let (first, second) = tokio::task::spawn_blocking(move || {
            let client = client_for(&uri);
            let first = client.create_container("measurements");
            let second = client.create_container("measurements");
            (first, second)
        })
        .await
        .expect("join");

        assert_eq!(first.expect("first call"), ContainerState::Created);
        assert_eq!(second.expect("second call"), ContainerState::AlreadyExists);
    }

    #[tokio::test]
    async fn publish_writes_serialized_records() {
        let mock_server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/measurements/today.txt"))
            .and(header("content-type", "text/plain; charset=UTF-8"))
            .and(body_string("a\nb\nc\n"))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&mock_server)
            .await;

        let uri = mock_server.uri();
        let result = tokio::task::spawn_blocking(move || {
            let records = [Record::from("a"), Record::from("b"), Record::from("c")];
            client_for(&uri).publish_records("measurements", "today.txt", &records)
        })
        .await
        .expect("join");

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn publish_accepts_reset_content_status() {
        let mock_server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/measurements/today.txt"))
            .respond_with(ResponseTemplate::new(205))
            .mount(&mock_server)
            .await;

        let uri = mock_server.uri();
        let result = tokio::task::spawn_blocking(move || {
            client_for(&uri).publish_records("measurements", "today.txt", &[Record::from("x")])
        })
        .await
        .expect("join");

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn read_splits_body_into_records() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/measurements/today.txt"))
            .respond_with(ResponseTemplate::new(200).set_body_string("a\nb\nc\n"))
            .mount(&mock_server)
            .await;

        let uri = mock_server.uri();
        let records = tokio::task::spawn_blocking(move || {
            client_for(&uri).read_records("measurements", "today.txt")
        })
        .await
        .expect("join")
        .expect("read records");

        let expected = vec![Record::from("a"), Record::from("b"), Record::from("c")];
        assert_eq!(records, expected);
    }

    #[tokio::test]
    async fn read_reports_unexpected_status() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/measurements/today.txt"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let uri = mock_server.uri();
        let result = tokio::task::spawn_blocking(move || {
            client_for(&uri).read_records("measurements", "today.txt")
        })
        .await
        .expect("join");

        let report = result.expect_err("status 500 must be reported");
        assert!(matches!(
            report.current_context(),
            PodError::UnexpectedStatus { status: 500 }
        ));
    }

    #[tokio::test]
    async fn update_appends_to_existing_records() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/measurements/today.txt"))
            .respond_with(ResponseTemplate::new(200).set_body_string("a\nb\nc\n"))
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("PUT"))
            .and(path("/measurements/today.txt"))
            .and(body_string("a\nb\nc\nd\n"))
            .respond_with(ResponseTemplate::new(205))
            .expect(1)
            .mount(&mock_server)
            .await;

        let uri = mock_server.uri();
        let result = tokio::task::spawn_blocking(move || {
            client_for(&uri).update_records("measurements", "today.txt", &[Record::from("d")])
        })
        .await
        .expect("join");

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn update_treats_unreadable_resource_as_first_write() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/measurements/today.txt"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        Mock::given(method("PUT"))
            .and(path("/measurements/today.txt"))
            .and(body_string("d\n"))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&mock_server)
            .await;

        let uri = mock_server.uri();
        let result = tokio::task::spawn_blocking(move || {
            client_for(&uri).update_records("measurements", "today.txt", &[Record::from("d")])
        })
        .await
        .expect("join");

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn publish_read_update_cycle() {
        let mock_server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/logs/run.txt"))
            .respond_with(ResponseTemplate::new(201))
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/logs/run.txt"))
            .respond_with(ResponseTemplate::new(200).set_body_string("a\nb\nc\n"))
            .mount(&mock_server)
            .await;

        let uri = mock_server.uri();
        tokio::task::spawn_blocking(move || {
            let client = client_for(&uri);
            let records = [Record::from("a"), Record::from("b"), Record::from("c")];
            client
                .publish_records("logs", "run.txt", &records)
                .expect("publish");
            let read_back = client.read_records("logs", "run.txt").expect("read");
            assert_eq!(read_back, records.to_vec());
            client
                .update_records("logs", "run.txt", &[Record::from("d")])
                .expect("update");
        })
        .await
        .expect("join");

        let put_bodies: Vec<String> = mock_server
            .received_requests()
            .await
            .expect("recorded requests")
            .into_iter()
            .filter(|request| request.method == wiremock::http::Method::PUT)
            .map(|request| String::from_utf8_lossy(&request.body).into_owned())
            .collect();
        assert_eq!(put_bodies, vec!["a\nb\nc\n", "a\nb\nc\nd\n"]);
    }

    #[tokio::test]
    async fn status_failures_are_not_retried() {
        let mock_server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/measurements/today.txt"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&mock_server)
            .await;

        let uri = mock_server.uri();
        let result = tokio::task::spawn_blocking(move || {
            let config = PodConfig::new(&uri)
                .with_retry_policy(3, std::time::Duration::from_millis(10));
            let client = PodClient::new(config).expect("create client");
            client.publish_records("measurements", "today.txt", &[Record::from("x")])
        })
        .await
        .expect("join");

        let report = result.expect_err("status 500 must be reported");
        assert!(matches!(
            report.current_context(),
            PodError::UnexpectedStatus { status: 500 }
        ));
    }
}
