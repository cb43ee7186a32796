// File: src/client/core.rs
use futures::future::BoxFuture;
use http::{Method, Request, header};
use http_body_util::BodyExt;
use hyper_rustls::HttpsConnectorBuilder;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use std::sync::Arc;

type HttpsClient =
    Client<hyper_rustls::HttpsConnector<hyper_util::client::legacy::connect::HttpConnector>, String>;

/// A JSON POST to an upstream model API.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    pub url: String,
    /// Bearer token, for providers that authenticate by header.
    pub bearer: Option<String>,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundResponse {
    pub status: u16,
    pub body: String,
}

impl InboundResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends one request and returns the raw reply. Errors are transport
/// failures only; HTTP error statuses come back as responses.
pub trait ChatTransport: Send + Sync {
    fn post_json<'a>(
        &'a self,
        request: OutboundRequest,
    ) -> BoxFuture<'a, Result<InboundResponse, String>>;
}

#[derive(Clone, Debug)]
pub struct HttpsTransport {
    client: HttpsClient,
    user_agent: String,
}

impl HttpsTransport {
    pub fn new() -> Result<Self, String> {
        let provider = Arc::new(rustls::crypto::ring::default_provider());
        let mut root_store = rustls::RootCertStore::empty();
        let result = rustls_native_certs::load_native_certs();
        for err in &result.errors {
            log::debug!("Skipping native certificate: {}", err);
        }
        root_store.add_parsable_certificates(result.certs);
        if root_store.is_empty() {
            // Plain-http endpoints (local proxies, mock servers) still work.
            log::warn!("No valid system certificates found; HTTPS requests will fail.");
        }

        let tls_config = rustls::ClientConfig::builder_with_provider(provider)
            .with_safe_default_protocol_versions()
            .map_err(|e| format!("Failed to init TLS: {}", e))?
            .with_root_certificates(root_store)
            .with_no_client_auth();

        let https_connector = HttpsConnectorBuilder::new()
            .with_tls_config(tls_config)
            .https_or_http()
            .enable_http1()
            .build();

        let client = Client::builder(TokioExecutor::new()).build(https_connector);
        Ok(Self {
            client,
            user_agent: format!("scholar/{}", env!("CARGO_PKG_VERSION")),
        })
    }

    async fn send(&self, request: OutboundRequest) -> Result<InboundResponse, String> {
        let mut builder = Request::builder()
            .method(Method::POST)
            .uri(&request.url)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::USER_AGENT, &self.user_agent);
        if let Some(token) = &request.bearer {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let req = builder.body(request.body).map_err(|e| e.to_string())?;

        let resp = self.client.request(req).await.map_err(|e| e.to_string())?;
        let status = resp.status().as_u16();
        let bytes = resp
            .into_body()
            .collect()
            .await
            .map_err(|e| e.to_string())?
            .to_bytes();
        Ok(InboundResponse {
            status,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        })
    }
}

impl ChatTransport for HttpsTransport {
    fn post_json<'a>(
        &'a self,
        request: OutboundRequest,
    ) -> BoxFuture<'a, Result<InboundResponse, String>> {
        Box::pin(self.send(request))
    }
}
