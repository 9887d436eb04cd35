mod run;

use std::time::Duration;

use log::debug;
use reqwest::{header::CONTENT_TYPE, Client, RequestBuilder, StatusCode};
use serde_json::Value;
use thiserror::Error;

pub use run::RunCommand;

#[derive(Error, Debug)]
pub enum HttpClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Server replied with {status}: {body}")]
    Status {
        status: StatusCode,
        body: String
    },

    #[error("Got an empty reply")]
    EmptyReply,
    #[error("Unexpected reply: {0}")]
    UnexpectedReply(String),
    #[error("Malformed reply: {0}")]
    MalformedReply(String),
    #[error("Reply is missing the \"{0}\" field")]
    MissingField(&'static str)
}

impl HttpClientError {
    /// transport failures end the process; reply shape problems are only reported
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Status { .. })
    }

    /// process exit code for a fatal error, following curl's numbering
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Http(e) if e.is_connect() => 7,
            Self::Http(e) if e.is_timeout() => 28,
            Self::Status { .. } => 22,
            _ => 1
        }
    }
}

type Result<T> = std::result::Result<T, HttpClientError>;

trait IntoResult<T> {
    fn ir(self, field: &'static str) -> Result<T>;
}

impl<T> IntoResult<T> for Option<T> {
    fn ir(self, field: &'static str) -> Result<T> {
        match self {
            Self::Some(v) => Ok(v),
            None => Err(HttpClientError::MissingField(field))
        }
    }
}

/// strip every trailing path separator
pub fn normalize_host(host: &str) -> &str {
    host.trim_end_matches('/')
}

/// `<host>/run/<segments...>`
pub fn run_url(host: &str, segments: &[&str]) -> String {
    format!("{}/run/{}", normalize_host(host), segments.join("/"))
}

pub struct HttpClient {
    client: Client
}

impl HttpClient {
    pub fn init(timeout: Duration) -> Result<Self> {
        // no idle connections: every call opens and releases its own
        let client = Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(0)
            .build()?;
        Ok(Self { client })
    }

    /// send a request and return the body of a successful response
    async fn request(&self, req: RequestBuilder) -> Result<String> {
        let res = req
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;
        debug!("Response {} with {} byte body", status, body.len());

        if status.is_success() {
            Ok(body)
        } else {
            Err(HttpClientError::Status { status, body })
        }
    }

    /// GET that must reply with a JSON document
    async fn get_json(&self, url: &str) -> Result<Value> {
        debug!("GET {}", url);
        let body = self.request(self.client.get(url)).await?;
        if body.is_empty() {
            return Err(HttpClientError::EmptyReply);
        }
        serde_json::from_str(&body).map_err(|_| HttpClientError::MalformedReply(body))
    }

    /// POST without a body that must reply with nothing
    async fn post_empty(&self, url: &str) -> Result<()> {
        debug!("POST {}", url);
        let body = self.request(self.client.post(url)).await?;
        if body.is_empty() {
            Ok(())
        } else {
            Err(HttpClientError::UnexpectedReply(body))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client() -> HttpClient {
        HttpClient::init(Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn normalize_strips_all_trailing_slashes() {
        assert_eq!(normalize_host("http://localhost:8080"), "http://localhost:8080");
        assert_eq!(normalize_host("http://localhost:8080/"), "http://localhost:8080");
        assert_eq!(normalize_host("http://localhost:8080///"), "http://localhost:8080");
        assert_eq!(normalize_host("http://h/base//"), "http://h/base");
    }

    #[test]
    fn normalize_is_idempotent() {
        for host in ["", "/", "http://a", "http://a/", "http://a/b///"] {
            let once = normalize_host(host);
            assert_eq!(normalize_host(once), once);
        }
    }

    #[test]
    fn run_url_has_no_double_slashes() {
        for host in ["http://h:8080", "http://h:8080/", "http://h:8080////"] {
            let url = run_url(host, &["tok", "pause-toggle"]);
            assert_eq!(url, "http://h:8080/run/tok/pause-toggle");
            assert!(!url["http://".len()..].contains("//"));
        }
    }

    #[test]
    fn fatal_errors_are_transport_errors() {
        let status = HttpClientError::Status {
            status: StatusCode::NOT_FOUND,
            body: "Failed to find the token".into()
        };
        assert!(status.is_fatal());
        assert_eq!(status.exit_code(), 22);

        assert!(!HttpClientError::EmptyReply.is_fatal());
        assert!(!HttpClientError::UnexpectedReply("x".into()).is_fatal());
        assert!(!HttpClientError::MalformedReply("x".into()).is_fatal());
        assert!(!HttpClientError::MissingField("Token").is_fatal());
    }

    #[tokio::test]
    async fn get_json_sends_content_type() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/run/timer/abc"))
            .and(header("content-type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"Time":0}"#))
            .expect(1)
            .mount(&server)
            .await;

        let value = client()
            .get_json(&run_url(&server.uri(), &["timer", "abc"]))
            .await
            .unwrap();
        assert_eq!(value["Time"], 0);
    }

    #[tokio::test]
    async fn get_json_rejects_empty_and_garbage() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/run/timer/empty"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/run/timer/garbage"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = client();
        let empty = client.get_json(&run_url(&server.uri(), &["timer", "empty"])).await;
        assert!(matches!(empty, Err(HttpClientError::EmptyReply)));

        let garbage = client.get_json(&run_url(&server.uri(), &["timer", "garbage"])).await;
        match garbage {
            Err(HttpClientError::MalformedReply(body)) => assert_eq!(body, "not json"),
            other => panic!("expected malformed reply, got {:?}", other)
        }
    }

    #[tokio::test]
    async fn post_empty_rejects_a_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/run/abc/start"))
            .and(header("content-type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("surprise"))
            .mount(&server)
            .await;

        let result = client().post_empty(&run_url(&server.uri(), &["abc", "start"])).await;
        match result {
            Err(HttpClientError::UnexpectedReply(body)) => assert_eq!(body, "surprise"),
            other => panic!("expected unexpected reply, got {:?}", other)
        }
    }

    #[tokio::test]
    async fn error_status_keeps_the_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/run/missing/start"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Failed to find the token"))
            .mount(&server)
            .await;

        let err = client()
            .post_empty(&run_url(&server.uri(), &["missing", "start"]))
            .await
            .unwrap_err();
        assert!(err.is_fatal());
        assert_eq!(err.exit_code(), 22);
        assert!(err.to_string().contains("Failed to find the token"));
    }

    #[tokio::test]
    async fn connection_failure_is_fatal() {
        // grab a free port, then close it again
        let uri = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            format!("http://{}", listener.local_addr().unwrap())
        };

        let err = client().get_json(&run_url(&uri, &["timer", "abc"])).await.unwrap_err();
        assert!(err.is_fatal());
        assert_eq!(err.exit_code(), 7);
    }
}
