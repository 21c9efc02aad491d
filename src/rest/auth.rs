/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::rest::errors::FlickrError;
use crate::rest::signer::ApiParams;
use crate::rest::xml::Text;
use crate::rest::{AUTH_ENDPOINT, ApiErrorCodes, Client, Permission};
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use url::Url;

const GET_FROB: &str = "flickr.auth.getFrob";
const GET_TOKEN: &str = "flickr.auth.getToken";

/// Where an [`AuthSession`] is in the handshake
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    NoFrob,
    HasFrob,
    HasToken,
}

/// The Flickr user an access token was issued for
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct AuthUser {
    #[serde(rename = "@nsid")]
    pub nsid: String,

    #[serde(default, rename = "@username")]
    pub username: String,

    #[serde(default, rename = "@fullname")]
    pub full_name: String,
}

/// An access token along with what the service reported about it.
///
/// Tokens read back from a cache file only carry the token itself.
#[derive(Clone, PartialEq)]
pub struct AuthToken {
    pub token: String,
    pub perms: Option<Permission>,
    pub user: Option<AuthUser>,
}

impl std::fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthToken")
            .field("token", &"xxx")
            .field("perms", &self.perms)
            .field("user", &self.user)
            .finish()
    }
}

/// Drives the frob → authorization URL → token handshake and owns its results.
///
/// 1. [`AuthSession::authorization_url`] obtains a frob and returns the page the user must
///    visit to approve the application.
/// 2. Once approved, [`AuthSession::token`] exchanges the frob for an access token. Until then
///    it fails with [`FlickrError::AuthorizationPending`] and can simply be retried.
/// 3. [`AuthSession::cache_token`] saves the token so later sessions skip the handshake.
///
/// A session is not meant to be shared between tasks; use one per task or serialize access.
/// Concurrent writers to the same cache file race and the last write wins.
pub struct AuthSession {
    client: Client,
    token_cache: Option<PathBuf>,
    frob: Option<String>,
    auth: Option<AuthToken>,
}

impl AuthSession {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            token_cache: None,
            frob: None,
            auth: None,
        }
    }

    /// Reads and writes the access token at `path`.
    ///
    /// The file holds the raw token string and nothing else.
    pub fn with_token_cache(mut self, path: impl Into<PathBuf>) -> Self {
        self.token_cache = Some(path.into());
        self
    }

    pub fn token_cache(&self) -> Option<&Path> {
        self.token_cache.as_deref()
    }

    pub fn state(&self) -> AuthState {
        match (&self.auth, &self.frob) {
            (Some(_), _) => AuthState::HasToken,
            (None, Some(_)) => AuthState::HasFrob,
            (None, None) => AuthState::NoFrob,
        }
    }

    /// Returns the frob for this session, requesting one the first time
    pub async fn frob(&mut self) -> Result<String, FlickrError> {
        if let Some(frob) = &self.frob {
            return Ok(frob.clone());
        }
        let rsp: FrobResponse = self.client.get(GET_FROB, ApiParams::new(), false).await?;
        log::debug!("Obtained a new frob");
        self.frob = Some(rsp.frob.text.clone());
        Ok(rsp.frob.text)
    }

    /// Forgets the current frob so the next handshake step requests a fresh one
    pub fn reset_frob(&mut self) {
        self.frob = None;
    }

    /// Builds the signed URL where the user grants this application `perms`
    pub async fn authorization_url(&mut self, perms: Permission) -> Result<Url, FlickrError> {
        let frob = self.frob().await?;

        let mut params = ApiParams::new();
        params.insert("api_key".to_string(), self.client.api_client().api_key().to_string());
        params.insert("perms".to_string(), perms.to_string());
        params.insert("frob".to_string(), frob);
        self.client.api_client().sign(&mut params);

        Ok(Url::parse_with_params(AUTH_ENDPOINT, &params)?)
    }

    /// Returns the access token.
    ///
    /// A token in the configured cache file wins over everything else and costs no request.
    /// Otherwise the frob is exchanged; if the user has not approved it yet this fails with
    /// [`FlickrError::AuthorizationPending`] and the session keeps its frob for a later retry.
    pub async fn token(&mut self) -> Result<String, FlickrError> {
        if let Some(auth) = &self.auth {
            return Ok(auth.token.clone());
        }

        if let Some(token) = self.read_cached_token()? {
            self.auth = Some(AuthToken {
                token: token.clone(),
                perms: None,
                user: None,
            });
            return Ok(token);
        }

        let frob = self.frob().await?;
        let mut params = ApiParams::new();
        params.insert("frob".to_string(), frob);

        let rsp = match self.client.get::<TokenResponse>(GET_TOKEN, params, false).await {
            Err(FlickrError::ApiResponse(code, msg))
                if code == u32::from(ApiErrorCodes::InvalidFrob) =>
            {
                log::info!("Frob not authorized yet: {}", msg);
                return Err(FlickrError::AuthorizationPending(code, msg));
            }
            rsp => rsp?,
        };

        let auth = AuthToken::from(rsp.auth);
        log::info!("Obtained access token with {:?} permission", auth.perms);
        let token = auth.token.clone();
        self.auth = Some(auth);
        Ok(token)
    }

    /// The token and its details, once obtained
    pub fn auth_token(&self) -> Option<&AuthToken> {
        self.auth.as_ref()
    }

    /// A client carrying the access token, or a plain one before it is obtained
    pub fn client(&self) -> Client {
        match &self.auth {
            Some(auth) => self.client.clone().with_token(&auth.token),
            None => self.client.clone(),
        }
    }

    /// Writes the current token to `path`, or to the configured cache file when `None`.
    ///
    /// Returns whether anything was written. Nothing is written without both a token and a path.
    pub fn cache_token(&self, path: Option<&Path>) -> Result<bool, FlickrError> {
        let Some(path) = path.or(self.token_cache.as_deref()) else {
            return Ok(false);
        };
        let Some(auth) = &self.auth else {
            return Ok(false);
        };
        fs::write(path, &auth.token)?;
        log::info!("Cached access token to {}", path.display());
        Ok(true)
    }

    fn read_cached_token(&self) -> Result<Option<String>, FlickrError> {
        let Some(path) = self.token_cache.as_deref() else {
            return Ok(None);
        };
        match fs::read_to_string(path) {
            Ok(contents) => {
                let token = contents.trim();
                if token.is_empty() {
                    log::warn!("Token cache {} is empty", path.display());
                    return Ok(None);
                }
                log::info!("Using access token cached in {}", path.display());
                Ok(Some(token.to_string()))
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}

impl std::fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSession")
            .field("state", &self.state())
            .field("token_cache", &self.token_cache)
            .finish()
    }
}

// Expected response from a getFrob request
#[derive(Deserialize, Debug)]
struct FrobResponse {
    frob: Text,
}

// Expected response from a getToken request
#[derive(Deserialize, Debug)]
struct TokenResponse {
    auth: AuthNode,
}

#[derive(Deserialize, Debug)]
struct AuthNode {
    token: Text,

    #[serde(default)]
    perms: Option<Text>,

    #[serde(default)]
    user: Option<AuthUser>,
}

impl From<AuthNode> for AuthToken {
    fn from(node: AuthNode) -> Self {
        Self {
            token: node.token.text,
            perms: node.perms.and_then(|p| Permission::from_str(&p.text).ok()),
            user: node.user,
        }
    }
}
