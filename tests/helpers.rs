/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use flickr::rest::{Client, Creds, HttpTransport};
use std::sync::Arc;
use url::Url;

#[allow(dead_code)]
pub(crate) fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[allow(dead_code)]
pub(crate) fn get_creds() -> anyhow::Result<Creds> {
    let api_key = std::env::var("FLICKR_API_KEY")?;
    let shared_secret = std::env::var("FLICKR_SHARED_SECRET")?;
    Ok(Creds::new(&api_key, &shared_secret))
}

#[allow(dead_code)]
pub(crate) fn get_token_cache() -> anyhow::Result<String> {
    Ok(std::env::var("FLICKR_TOKEN_CACHE")?)
}

// Client pointed at a mock server's REST path
#[allow(dead_code)]
pub(crate) fn mock_client(server_url: &str) -> anyhow::Result<Client> {
    let endpoint = Url::parse(&format!("{}/services/rest/", server_url))?;
    Ok(Client::with_transport(
        Creds::new("key", "secret"),
        Arc::new(HttpTransport::new(endpoint)),
    ))
}
