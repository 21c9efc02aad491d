/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */

//! # Flickr
//!
//! This Flickr library was created for working with the Flickr REST API.
//!
//! For further details on the API refer to the [Flickr API Docs](https://www.flickr.com/services/api/)
//!
//! ## Features
//!
//! - Request signing (every call is signed with the shared secret)
//! - Authorization handshake
//!     - Frob and authorization URL
//!     - Token exchange, with an optional token cache file
//! - Photo search with forward/backward paging
//!     - Recently uploaded photos
//!     - Available sizes and image URLs of a photo
//! - Lower level interface for handling the raw communication
//!
//! *If you want to use this library for more that is currently implemented,
//! [`rest::Client::call`] and [`rest::Client::get`] make signed requests in a more direct way*
//!
//! ## Installation
//!
//! ```toml
//! [dependencies]
//! flickr = "0.1.0"
//! ```
//!
//! ## Usage
//!
//! **You will need to acquire an API key/shared secret from Flickr prior to using the API**
//!
//! ```rust,no_run
//! use flickr::rest::{Client, Creds, FlickrError, Permission, Photo, PhotoSize, SearchOptions};
//!
//!async fn print_my_photos(api_key: &str, shared_secret: &str) -> anyhow::Result<()> {
//!    let client = Client::new(Creds::new(api_key, shared_secret))?;
//!
//!    // Reuse a previously cached token or walk the user through authorization
//!    let mut session = client.auth_session().with_token_cache("flickr.token");
//!    while let Err(err) = session.token().await {
//!        match err {
//!            FlickrError::AuthorizationPending(..) => {
//!                let url = session.authorization_url(Permission::Read).await?;
//!                println!("Please approve access at {url} and press enter");
//!                std::io::stdin().read_line(&mut String::new())?;
//!            }
//!            other => return Err(other.into()),
//!        }
//!    }
//!    session.cache_token(None)?;
//!
//!    // Page through the authenticated user's photos
//!    let mut page = Some(Photo::search(session.client(), SearchOptions::new().user_id("me")).await?);
//!    while let Some(photos) = page {
//!        for photo in &photos {
//!            println!("{}: {:?}", photo.title, photo.url(PhotoSize::Medium));
//!        }
//!        page = photos.next_page().await?;
//!    }
//!    Ok(())
//!}
//! ```
//!
pub mod rest;
