/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */

extern crate flickr;

use anyhow::Result;
use dotenvy::dotenv;
use flickr::rest::{
    AuthSession, Client, Creds, Extra, FlickrError, Permission, Photo, PhotoSize, SearchOptions,
    SortOrder,
};

// Walks the user through authorization unless a cached token is found.
async fn authorize(session: &mut AuthSession) -> Result<()> {
    loop {
        match session.token().await {
            Ok(_) => break,
            Err(FlickrError::AuthorizationPending(..)) => {
                let url = session.authorization_url(Permission::Read).await?;
                println!("Approve access at:\n{}\nthen press enter", url);
                std::io::stdin().read_line(&mut String::new())?;
            }
            Err(err) => return Err(err.into()),
        }
    }

    if session.cache_token(None)? {
        println!("Token saved for next time");
    }
    Ok(())
}

// Prints a page of search results
fn print_page(photos: &flickr::rest::PagedResult<Photo>) {
    println!(
        "Page {} of {} ({} photos in total)",
        photos.page(),
        photos.pages(),
        photos.total()
    );
    for photo in photos {
        println!(
            "  {} by {}: {}",
            photo.title,
            photo.owner_name.as_deref().unwrap_or(&photo.owner),
            photo.url(PhotoSize::Medium).unwrap_or_default()
        );
        // Original is only available for some photos
        if let Some(original) = photo.url(PhotoSize::Original) {
            println!("    original: {}", original);
        }
    }
}

// main
#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    env_logger::init();

    // The API key/secret is obtained from your Flickr account.
    let api_key = std::env::var("FLICKR_API_KEY")?;
    let shared_secret = std::env::var("FLICKR_SHARED_SECRET")?;
    let client = Client::new(Creds::new(&api_key, &shared_secret))?;

    let mut session = client.auth_session();
    if let Ok(token_cache) = std::env::var("FLICKR_TOKEN_CACHE") {
        session = session.with_token_cache(token_cache);
    }
    authorize(&mut session).await?;

    let tags = std::env::args().skip(1).collect::<Vec<_>>();
    let options = SearchOptions::new()
        .tags(&tags)
        .sort(SortOrder::InterestingnessDesc)
        .extras([Extra::OwnerName, Extra::OriginalFormat])
        .per_page(10);

    let photos = Photo::search(session.client(), options).await?;
    print_page(&photos);

    if let Some(next) = photos.next_page().await? {
        print_page(&next);
    }
    Ok(())
}
