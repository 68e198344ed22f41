use crate::config::Config;
use crate::model::{List, Task, TaskPage};

use http::header::{ACCEPT, HeaderValue};
use http::{Request, StatusCode, Uri};
use http_body_util::BodyExt;
use hyper_rustls::HttpsConnectorBuilder;
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;
use tower_http::auth::AddAuthorization;
use tracing::{debug, instrument, warn};

type HttpsClient = AddAuthorization<Client<hyper_rustls::HttpsConnector<HttpConnector>, String>>;

// Everything outside unreserved characters, so an id stays one path segment.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Everything that can go wrong talking to the task API.
/// The `Display` text is what ends up on the status line.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("invalid API url '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: http::uri::InvalidUri,
    },
    #[error("token contains characters that are not allowed in a header")]
    InvalidToken,
    #[error("could not build request: {0}")]
    Request(#[from] http::Error),
    #[error("request failed: {0}")]
    Transport(#[from] hyper_util::client::legacy::Error),
    #[error("could not read response: {0}")]
    Body(#[from] hyper::Error),
    #[error("{status}: {message}")]
    Status { status: StatusCode, message: String },
    #[error("unexpected response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("request timed out after {}s", .0.as_secs())]
    Timeout(Duration),
}

#[derive(Clone, Debug)]
pub struct ApiClient {
    base: String,
    http: HttpsClient,
    timeout: Duration,
}

impl ApiClient {
    pub fn new(url: &str, token: &str, insecure: bool) -> Result<Self, ApiError> {
        let base = url.trim_end_matches('/').to_string();
        base.parse::<Uri>().map_err(|source| ApiError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;

        // AddAuthorization panics on a bad header value, so check first
        HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|_| ApiError::InvalidToken)?;

        let https_connector = if insecure {
            let tls_config = rustls::ClientConfig::builder()
                .dangerous()
                .with_custom_certificate_verifier(Arc::new(NoVerifier))
                .with_no_client_auth();

            HttpsConnectorBuilder::new()
                .with_tls_config(tls_config)
                .https_or_http()
                .enable_http1()
                .build()
        } else {
            let mut root_store = rustls::RootCertStore::empty();
            let result = rustls_native_certs::load_native_certs();
            root_store.add_parsable_certificates(result.certs);

            if root_store.is_empty() {
                warn!("no system certificates found, https requests will fail");
            }

            let tls_config = rustls::ClientConfig::builder()
                .with_root_certificates(root_store)
                .with_no_client_auth();

            HttpsConnectorBuilder::new()
                .with_tls_config(tls_config)
                .https_or_http()
                .enable_http1()
                .build()
        };

        let http_client = Client::builder(TokioExecutor::new()).build(https_connector);
        let auth_client = AddAuthorization::bearer(http_client, token).as_sensitive(true);

        Ok(Self {
            base,
            http: auth_client,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        Ok(Self::new(&config.url, &config.token, config.allow_insecure_certs)?
            .with_timeout(Duration::from_secs(config.request_timeout_secs)))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[instrument(skip(self))]
    pub async fn get_lists(&self) -> Result<Vec<List>, ApiError> {
        let lists: Vec<List> = self.get_json("/lists").await?;
        debug!(count = lists.len(), "lists fetched");
        Ok(lists)
    }

    #[instrument(skip(self))]
    pub async fn get_tasks(&self, list_id: &str) -> Result<Vec<Task>, ApiError> {
        let segment = utf8_percent_encode(list_id, PATH_SEGMENT);
        let page: TaskPage = self.get_json(&format!("/lists/{}/tasks", segment)).await?;
        debug!(count = page.tasks.len(), "tasks fetched");
        Ok(page.tasks)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base, path);
        let uri: Uri = url
            .parse()
            .map_err(|source| ApiError::InvalidUrl { url, source })?;

        let req = Request::get(uri)
            .header(ACCEPT, "application/json")
            .body(String::new())?;

        let request = async {
            let resp = self.http.clone().oneshot(req).await?;
            let status = resp.status();
            let body = resp.into_body().collect().await?.to_bytes();
            Ok::<_, ApiError>((status, body))
        };
        let (status, body) = tokio::time::timeout(self.timeout, request)
            .await
            .map_err(|_| ApiError::Timeout(self.timeout))??;

        if !status.is_success() {
            let message = error_message(&body, status);
            warn!(%status, %message, path, "API returned an error");
            return Err(ApiError::Status { status, message });
        }

        Ok(serde_json::from_slice(&body)?)
    }
}

/// Picks the human readable part out of an error body.
fn error_message(body: &[u8], status: StatusCode) -> String {
    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(body) {
        for key in ["ErrorMessageEN", "ErrorMessageJP", "message", "error"] {
            if let Some(msg) = value.get(key).and_then(|v| v.as_str())
                && !msg.is_empty()
            {
                return msg.to_string();
            }
        }
    }
    let text = String::from_utf8_lossy(body).trim().to_string();
    if text.is_empty() {
        status.canonical_reason().unwrap_or("error").to_string()
    } else {
        text
    }
}

#[derive(Debug)]
struct NoVerifier;
impl rustls::client::danger::ServerCertVerifier for NoVerifier {
    fn verify_server_cert(
        &self,
        _: &rustls::pki_types::CertificateDer<'_>,
        _: &[rustls::pki_types::CertificateDer<'_>],
        _: &rustls::pki_types::ServerName<'_>,
        _: &[u8],
        _: rustls::pki_types::UnixTime,
    ) -> Result<rustls::client::danger::ServerCertVerified, rustls::Error> {
        Ok(rustls::client::danger::ServerCertVerified::assertion())
    }
    fn verify_tls12_signature(
        &self,
        _: &[u8],
        _: &rustls::pki_types::CertificateDer<'_>,
        _: &rustls::DigitallySignedStruct,
    ) -> Result<rustls::client::danger::HandshakeSignatureValid, rustls::Error> {
        Ok(rustls::client::danger::HandshakeSignatureValid::assertion())
    }
    fn verify_tls13_signature(
        &self,
        _: &[u8],
        _: &rustls::pki_types::CertificateDer<'_>,
        _: &rustls::DigitallySignedStruct,
    ) -> Result<rustls::client::danger::HandshakeSignatureValid, rustls::Error> {
        Ok(rustls::client::danger::HandshakeSignatureValid::assertion())
    }
    fn supported_verify_schemes(&self) -> Vec<rustls::SignatureScheme> {
        use rustls::SignatureScheme::*;
        vec![
            RSA_PKCS1_SHA256,
            RSA_PKCS1_SHA384,
            RSA_PKCS1_SHA512,
            ECDSA_NISTP256_SHA256,
            RSA_PSS_SHA256,
            ED25519,
        ]
    }
}
