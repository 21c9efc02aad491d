/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */

use crate::rest::errors::FlickrError;
use crate::rest::paged::{PageFetcher, PageInfo, PagedResult};
use crate::rest::signer::ApiParams;
use crate::rest::{ApiClient, AuthSession, Creds, HttpTransport, Transport, xml};
use futures::future::BoxFuture;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

/// Entry point for talking to Flickr.
///
/// Cloning is cheap; clones share the transport. A client optionally carries an access token,
/// which is attached to authenticated operations only.
///
/// ```rust,no_run
/// use flickr::rest::{Client, Creds, Photo, SearchOptions};
///
/// async fn first_page() -> Result<(), flickr::rest::FlickrError> {
///     let client = Client::new(Creds::new("api key", "shared secret"))?;
///     let photos = Photo::search(client, SearchOptions::new().tags(["sunset"])).await?;
///     for photo in &photos {
///         println!("{}", photo.title);
///     }
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct Client {
    api_client: ApiClient,
    token: Option<String>,
}

impl Client {
    /// Client talking to the public REST endpoint over HTTPS
    pub fn new(creds: Creds) -> Result<Self, FlickrError> {
        Ok(Self::with_transport(creds, Arc::new(HttpTransport::flickr()?)))
    }

    /// Client sending its requests through the given transport
    pub fn with_transport(creds: Creds, transport: Arc<dyn Transport>) -> Self {
        Self {
            api_client: ApiClient::new(creds, transport),
            token: None,
        }
    }

    /// Returns this client carrying the given access token
    pub fn with_token(mut self, token: &str) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn api_client(&self) -> &ApiClient {
        &self.api_client
    }

    /// Starts an authorization handshake for this application
    pub fn auth_session(&self) -> AuthSession {
        AuthSession::new(self.clone())
    }

    /// Calls an API method and returns the `rsp` node of the response.
    ///
    /// The access token, if any, is only sent when `requires_auth` is set.
    pub async fn call(
        &self,
        method: &str,
        params: ApiParams,
        requires_auth: bool,
    ) -> Result<Value, FlickrError> {
        let token = if requires_auth {
            self.token.as_deref()
        } else {
            None
        };
        self.api_client.call(method, params, token).await
    }

    /// Calls an API method and maps the `rsp` node onto `T`
    pub async fn get<T: DeserializeOwned>(
        &self,
        method: &str,
        params: ApiParams,
        requires_auth: bool,
    ) -> Result<T, FlickrError> {
        let rsp = self.call(method, params, requires_auth).await?;
        serde_json::from_value(rsp).map_err(FlickrError::ApiResponseMalformed)
    }

    /// Calls a paginated API method.
    ///
    /// `container` names the element carrying the paging attributes and `item` its repeated
    /// children, e.g. `photos` and `photo`. The returned page remembers the method and the
    /// options (minus `page`) so adjacent pages can be requested later.
    pub fn paged<T>(
        &self,
        method: &'static str,
        mut options: ApiParams,
        container: &'static str,
        item: &'static str,
    ) -> BoxFuture<'static, Result<PagedResult<T>, FlickrError>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let client = self.clone();
        Box::pin(async move {
            let params = options.clone();
            options.remove("page");

            let mut rsp = client.call(method, params, true).await?;
            let node = rsp
                .get_mut(container)
                .map(Value::take)
                .ok_or(FlickrError::ResponseMissing())?;
            let info = PageInfo::deserialize(&node).map_err(FlickrError::ApiResponseMalformed)?;

            let fetch: PageFetcher<T> = {
                let client = client.clone();
                let options = options.clone();
                Arc::new(move |page: u32| {
                    let mut options = options.clone();
                    options.insert("page".to_string(), page.to_string());
                    client.paged(method, options, container, item)
                })
            };

            let mut result = PagedResult::new(info, options, fetch);
            for entry in xml::children(node.get(item)) {
                result.append(entry);
            }
            Ok(result)
        })
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("api_client", &self.api_client)
            .field("token", &self.token.as_ref().map(|_| "xxx"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::test_support::{ScriptedTransport, client};

    const PAGE_TWO: &str = r#"<rsp stat="ok">
        <items page="2" pages="5" perpage="1" total="5">
            <item name="b" />
        </items>
    </rsp>"#;

    const PAGE_THREE: &str = r#"<rsp stat="ok">
        <items page="3" pages="5" perpage="1" total="5">
            <item name="c" />
        </items>
    </rsp>"#;

    #[derive(Deserialize, Debug)]
    struct Item {
        #[serde(rename = "@name")]
        name: String,
    }

    #[tokio::test]
    async fn token_only_sent_for_authenticated_calls() {
        let transport = ScriptedTransport::new(["<rsp stat=\"ok\"/>", "<rsp stat=\"ok\"/>"]);
        let client = client(transport.clone()).with_token("tok");

        client.call("flickr.a", ApiParams::new(), false).await.unwrap();
        client.call("flickr.b", ApiParams::new(), true).await.unwrap();

        let calls = transport.calls();
        assert!(!calls[0].contains_key("auth_token"));
        assert_eq!(calls[1]["auth_token"], "tok");
    }

    #[tokio::test]
    async fn get_reports_unexpected_shape() {
        #[derive(Deserialize, Debug)]
        #[allow(dead_code)]
        struct Needs {
            missing: Value,
        }

        let transport = ScriptedTransport::new(["<rsp stat=\"ok\"/>"]);
        let err = client(transport)
            .get::<Needs>("flickr.a", ApiParams::new(), false)
            .await
            .unwrap_err();
        assert!(matches!(err, FlickrError::ApiResponseMalformed(_)));
    }

    #[tokio::test]
    async fn paged_replays_original_options() {
        let transport = ScriptedTransport::new([PAGE_TWO, PAGE_THREE]);
        let client = client(transport.clone());

        let mut options = ApiParams::new();
        options.insert("filter".into(), "x".into());
        options.insert("page".into(), "2".into());

        let page: PagedResult<Item> = client
            .paged("flickr.items.list", options, "items", "item")
            .await
            .unwrap();
        assert_eq!(page.page(), 2);
        assert_eq!(page.pages(), 5);
        assert_eq!(page[0].name, "b");
        assert!(!page.options().contains_key("page"));

        let next = page.next_page().await.unwrap().unwrap();
        assert_eq!(next.page(), 3);
        assert_eq!(next[0].name, "c");
        assert_eq!(next.options(), page.options());

        let calls = transport.calls();
        assert_eq!(calls[0]["page"], "2");
        assert_eq!(calls[1]["page"], "3");
        assert_eq!(calls[1]["filter"], "x");
        assert_eq!(calls[1]["method"], "flickr.items.list");
    }

    #[tokio::test]
    async fn paged_without_container_is_missing_response() {
        let transport = ScriptedTransport::new(["<rsp stat=\"ok\"/>"]);
        let err = client(transport)
            .paged::<Item>("flickr.items.list", ApiParams::new(), "items", "item")
            .await
            .unwrap_err();
        assert!(matches!(err, FlickrError::ResponseMissing()));
    }

    #[test]
    fn debug_hides_token() {
        let shown = format!("{:?}", client(ScriptedTransport::empty()).with_token("secret-token"));
        assert!(!shown.contains("secret-token"));
    }
}
