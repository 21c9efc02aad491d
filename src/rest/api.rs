/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::rest::errors::FlickrError;
use crate::rest::parsers::from_str_number;
use crate::rest::signer::{ApiParams, sign_params};
use crate::rest::xml;
use bytes::Bytes;
use futures::future::BoxFuture;
use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use url::Url;

// Root Flickr REST API
pub const REST_ENDPOINT: &str = "https://api.flickr.com/services/rest/";

// Where users are sent to grant an application access
pub const AUTH_ENDPOINT: &str = "https://www.flickr.com/services/auth/";

/// Sends a fully signed parameter set to the service and hands back the raw body.
///
/// Timeouts and cancellation belong to the implementation; nothing above this layer retries.
pub trait Transport: Send + Sync {
    fn perform<'a>(&'a self, params: &'a ApiParams) -> BoxFuture<'a, Result<Bytes, FlickrError>>;
}

/// [`Transport`] issuing an HTTP GET with the parameters as the query string
#[derive(Debug, Clone)]
pub struct HttpTransport {
    endpoint: Url,
    https_client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(endpoint: Url) -> Self {
        Self {
            endpoint,
            https_client: reqwest::Client::new(),
        }
    }

    /// Transport for the public [`REST_ENDPOINT`]
    pub fn flickr() -> Result<Self, FlickrError> {
        Ok(Self::new(Url::parse(REST_ENDPOINT)?))
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl Transport for HttpTransport {
    fn perform<'a>(&'a self, params: &'a ApiParams) -> BoxFuture<'a, Result<Bytes, FlickrError>> {
        Box::pin(async move {
            let mut req_url = self.endpoint.clone();
            req_url.query_pairs_mut().extend_pairs(params);
            let resp = self
                .https_client
                .get(req_url)
                .header("Accept", "text/xml")
                .send()
                .await?
                .error_for_status()?;
            Ok(resp.bytes().await?)
        })
    }
}

/// Application credentials issued by Flickr.
///
/// The shared secret is only ever used to compute signatures; it is never sent.
#[derive(Default, Clone)]
pub struct Creds {
    api_key: String,
    shared_secret: String,
}

impl Creds {
    pub fn new(api_key: &str, shared_secret: &str) -> Self {
        Self {
            api_key: api_key.into(),
            shared_secret: shared_secret.into(),
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

impl std::fmt::Debug for Creds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Creds")
            .field("api_key", &"xxx")
            .field("shared_secret", &"xxx")
            .finish()
    }
}

/// Directly communicates with the API.
#[derive(Clone)]
pub struct ApiClient {
    creds: Creds,
    transport: Arc<dyn Transport>,
}

impl ApiClient {
    pub fn new(creds: Creds, transport: Arc<dyn Transport>) -> Self {
        Self { creds, transport }
    }

    pub fn api_key(&self) -> &str {
        self.creds.api_key()
    }

    /// Signs the parameters in place with the shared secret
    pub fn sign(&self, params: &mut ApiParams) {
        sign_params(params, &self.creds.shared_secret);
    }

    /// Calls an API method and returns the `rsp` node of a successful response.
    ///
    /// `api_key` is always added, `auth_token` only when a token is supplied. Signing happens
    /// last so every parameter is covered.
    pub async fn call(
        &self,
        method: &str,
        mut params: ApiParams,
        token: Option<&str>,
    ) -> Result<Value, FlickrError> {
        params.insert("method".to_string(), method.to_string());
        params.insert("api_key".to_string(), self.creds.api_key.clone());
        if let Some(token) = token {
            params.insert("auth_token".to_string(), token.to_string());
        }
        self.sign(&mut params);

        log::debug!("Calling {} (authenticated: {})", method, token.is_some());
        let body = self.transport.perform(&params).await?;
        let tree = xml::parse(&body)?;
        unwrap_envelope(tree)
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("creds", &self.creds)
            .finish()
    }
}

/// Service wide error codes per the Flickr API site.
///
/// Codes below 95 are method specific and are only reported as raw numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive)]
#[repr(u32)]
pub enum ApiErrorCodes {
    SslRequired = 95,
    InvalidSignature = 96,
    MissingSignature = 97,
    InvalidAuthToken = 98,
    InsufficientPermissions = 99,
    InvalidApiKey = 100,
    ServiceUnavailable = 105,
    WriteOperationFailed = 106,
    InvalidFrob = 108,
    FormatNotFound = 111,
    MethodNotFound = 112,
    InvalidSoapEnvelope = 114,
    InvalidXmlRpcCall = 115,
    BadUrlFound = 116,
}

// Failure details carried by a `stat="fail"` response
#[derive(Deserialize, Debug)]
struct ErrorNode {
    #[serde(rename = "@code", deserialize_with = "from_str_number")]
    code: u32,

    #[serde(default, rename = "@msg")]
    msg: String,
}

// Splits the envelope into the payload or a service error
fn unwrap_envelope(mut tree: Value) -> Result<Value, FlickrError> {
    let rsp = tree
        .get_mut("rsp")
        .map(Value::take)
        .ok_or(FlickrError::ResponseMissing())?;
    match rsp.get("@stat").and_then(Value::as_str) {
        Some("ok") => Ok(rsp),
        Some("fail") => {
            let err = rsp.get("err").cloned().ok_or(FlickrError::ResponseMissing())?;
            let err: ErrorNode =
                serde_json::from_value(err).map_err(FlickrError::ApiResponseMalformed)?;
            log::debug!("Service reported error {}: {}", err.code, err.msg);
            Err(FlickrError::ApiResponse(err.code, err.msg))
        }
        _ => Err(FlickrError::ResponseMissing()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::signer::{SIGNATURE_PARAM, sign};
    use crate::rest::test_support::ScriptedTransport;

    #[tokio::test]
    async fn call_adds_key_method_and_signature() {
        let transport = ScriptedTransport::new(["<rsp stat=\"ok\"><frob>f1</frob></rsp>"]);
        let api = ApiClient::new(Creds::new("key", "secret"), transport.clone());

        let mut params = ApiParams::new();
        params.insert("extra".into(), "1".into());
        let rsp = api.call("flickr.test.echo", params, None).await.unwrap();
        assert_eq!(rsp["frob"]["#text"], "f1");

        let sent = transport.calls();
        assert_eq!(sent.len(), 1);
        let sent = &sent[0];
        assert_eq!(sent["api_key"], "key");
        assert_eq!(sent["method"], "flickr.test.echo");
        assert!(!sent.contains_key("auth_token"));

        let unsigned = sent.iter().filter(|(k, _)| k.as_str() != SIGNATURE_PARAM);
        assert_eq!(sent[SIGNATURE_PARAM], sign(unsigned, "secret"));
    }

    #[tokio::test]
    async fn call_includes_token_in_signature() {
        let transport = ScriptedTransport::new(["<rsp stat=\"ok\"/>"]);
        let api = ApiClient::new(Creds::new("key", "secret"), transport.clone());

        api.call("flickr.test.login", ApiParams::new(), Some("tok"))
            .await
            .unwrap();

        let sent = &transport.calls()[0];
        assert_eq!(sent["auth_token"], "tok");
        let unsigned = sent.iter().filter(|(k, _)| k.as_str() != SIGNATURE_PARAM);
        assert_eq!(sent[SIGNATURE_PARAM], sign(unsigned, "secret"));
    }

    #[tokio::test]
    async fn failed_status_is_a_service_error() {
        let transport = ScriptedTransport::new([
            r#"<rsp stat="fail"><err code="112" msg="Method &quot;x&quot; not found" /></rsp>"#,
        ]);
        let api = ApiClient::new(Creds::new("key", "secret"), transport);

        let err = api.call("x", ApiParams::new(), None).await.unwrap_err();
        match &err {
            FlickrError::ApiResponse(code, msg) => {
                assert_eq!(*code, 112);
                assert_eq!(msg, "Method \"x\" not found");
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert_eq!(err.api_error_code(), Some(ApiErrorCodes::MethodNotFound));
    }

    #[tokio::test]
    async fn garbage_body_is_a_transport_error() {
        let transport = ScriptedTransport::new(["<rsp stat=\"ok\"><oops></rsp>"]);
        let api = ApiClient::new(Creds::new("key", "secret"), transport);

        let err = api.call("x", ApiParams::new(), None).await.unwrap_err();
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn cut_off_or_empty_body_is_a_transport_error() {
        for body in ["", "<rsp stat=\"ok\">", "<rsp stat=\"ok\"><photos page=\"1\">"] {
            let transport = ScriptedTransport::new([body]);
            let api = ApiClient::new(Creds::new("key", "secret"), transport);

            let err = api.call("x", ApiParams::new(), None).await.unwrap_err();
            assert!(matches!(err, FlickrError::MalformedXml(_)), "{body:?}: {err:?}");
            assert!(err.is_transport());
        }
    }

    #[test]
    fn default_transport_targets_rest_endpoint() {
        let transport = HttpTransport::flickr().unwrap();
        assert_eq!(transport.endpoint().as_str(), REST_ENDPOINT);
        assert_eq!(transport.endpoint().path(), "/services/rest/");
    }

    #[tokio::test]
    async fn missing_envelope_is_reported() {
        let transport = ScriptedTransport::new(["<html><body/></html>"]);
        let api = ApiClient::new(Creds::new("key", "secret"), transport);

        let err = api.call("x", ApiParams::new(), None).await.unwrap_err();
        assert!(matches!(err, FlickrError::ResponseMissing()));
    }

    #[test]
    fn creds_debug_is_redacted() {
        let shown = format!("{:?}", Creds::new("my-key", "my-secret"));
        assert!(!shown.contains("my-key"));
        assert!(!shown.contains("my-secret"));
    }
}
