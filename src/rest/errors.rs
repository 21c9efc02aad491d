/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */

use crate::rest::ApiErrorCodes;
use std::io;
use thiserror::Error;

/// Error conditions that can be returned
#[derive(Error, Debug)]
pub enum FlickrError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Request network error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Response is not well formed XML: {0}")]
    MalformedXml(#[from] quick_xml::Error),

    #[error("URL Parse error")]
    UrlParsing(#[from] url::ParseError),

    #[error("Expected response missing")]
    ResponseMissing(),

    #[error("API Response was error: {0}, msg: {1}")]
    ApiResponse(u32, String),

    #[error("Authorization has not been granted yet: {0}, msg: {1}")]
    AuthorizationPending(u32, String),

    #[error("API Response is malformed: {0:?}")]
    ApiResponseMalformed(serde_json::Error),
}

impl FlickrError {
    /// True when the service could not be reached or did not answer with XML
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Request(_) | Self::MalformedXml(_))
    }

    /// True when the token exchange should be retried once the user has approved the frob
    pub fn is_authorization_pending(&self) -> bool {
        matches!(self, Self::AuthorizationPending(..))
    }

    /// The service wide error code, if this is a service error carrying one.
    ///
    /// Method specific codes (below 95) are not mapped and yield `None`; the raw value is still
    /// available on the variant itself.
    pub fn api_error_code(&self) -> Option<ApiErrorCodes> {
        match self {
            Self::ApiResponse(code, _) | Self::AuthorizationPending(code, _) => {
                ApiErrorCodes::try_from(*code).ok()
            }
            _ => None,
        }
    }
}
