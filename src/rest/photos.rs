/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::rest::errors::FlickrError;
use crate::rest::parsers::{
    MYSQL_DATETIME, from_empty_str_to_none, from_flag, from_optional_mysql_datetime,
    from_optional_str_number, from_optional_unix_timestamp, from_space_separated, from_str_number,
};
use crate::rest::signer::ApiParams;
use crate::rest::{
    Client, ContentType, Extra, PagedResult, PhotoSize, PrivacyFilter, SafeSearch, SortOrder,
    TagMode, xml,
};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;

const SEARCH: &str = "flickr.photos.search";
const GET_RECENT: &str = "flickr.photos.getRecent";
const GET_SIZES: &str = "flickr.photos.getSizes";

// Largest page the service will return
const MAX_PER_PAGE: u32 = 500;

/// Holds information returned for a photo in a search result.
///
/// The optional fields are only filled in when the matching [`Extra`] was requested. Attributes
/// the service sends that are not listed here are ignored.
///
/// See [Flickr API Docs](https://www.flickr.com/services/api/flickr.photos.search.html) for more
/// details on the individual fields.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Photo {
    #[serde(rename = "@id")]
    pub id: String,

    #[serde(rename = "@owner")]
    pub owner: String,

    #[serde(rename = "@secret")]
    pub secret: String,

    #[serde(rename = "@server")]
    pub server: String,

    #[serde(rename = "@farm", deserialize_with = "from_str_number")]
    pub farm: u32,

    #[serde(default, rename = "@title")]
    pub title: String,

    #[serde(default, rename = "@ispublic", deserialize_with = "from_flag")]
    pub is_public: bool,

    #[serde(default, rename = "@isfriend", deserialize_with = "from_flag")]
    pub is_friend: bool,

    #[serde(default, rename = "@isfamily", deserialize_with = "from_flag")]
    pub is_family: bool,

    // Extras
    #[serde(default, rename = "@license", deserialize_with = "from_empty_str_to_none")]
    pub license: Option<String>,

    #[serde(
        default,
        rename = "@dateupload",
        deserialize_with = "from_optional_unix_timestamp"
    )]
    pub date_upload: Option<DateTime<Utc>>,

    #[serde(
        default,
        rename = "@datetaken",
        deserialize_with = "from_optional_mysql_datetime"
    )]
    pub date_taken: Option<NaiveDateTime>,

    #[serde(default, rename = "@ownername", deserialize_with = "from_empty_str_to_none")]
    pub owner_name: Option<String>,

    #[serde(default, rename = "@iconserver", deserialize_with = "from_empty_str_to_none")]
    pub icon_server: Option<String>,

    #[serde(
        default,
        rename = "@originalsecret",
        deserialize_with = "from_empty_str_to_none"
    )]
    pub original_secret: Option<String>,

    #[serde(
        default,
        rename = "@originalformat",
        deserialize_with = "from_empty_str_to_none"
    )]
    pub original_format: Option<String>,

    #[serde(
        default,
        rename = "@lastupdate",
        deserialize_with = "from_optional_unix_timestamp"
    )]
    pub last_update: Option<DateTime<Utc>>,

    #[serde(default, rename = "@latitude", deserialize_with = "from_optional_str_number")]
    pub latitude: Option<f64>,

    #[serde(default, rename = "@longitude", deserialize_with = "from_optional_str_number")]
    pub longitude: Option<f64>,

    #[serde(default, rename = "@accuracy", deserialize_with = "from_optional_str_number")]
    pub accuracy: Option<u32>,

    #[serde(default, rename = "@tags", deserialize_with = "from_space_separated")]
    pub tags: Vec<String>,

    #[serde(default, rename = "@machine_tags", deserialize_with = "from_space_separated")]
    pub machine_tags: Vec<String>,

    #[serde(default, rename = "@o_width", deserialize_with = "from_optional_str_number")]
    pub original_width: Option<u32>,

    #[serde(default, rename = "@o_height", deserialize_with = "from_optional_str_number")]
    pub original_height: Option<u32>,

    #[serde(default, rename = "@views", deserialize_with = "from_optional_str_number")]
    pub views: Option<u64>,
}

impl Photo {
    /// Searches photos visible to the calling user.
    ///
    /// Unauthenticated calls only see public photos; a client carrying a token with `read`
    /// permission also sees the private photos it is allowed to.
    pub async fn search(
        client: Client,
        options: SearchOptions,
    ) -> Result<PagedResult<Photo>, FlickrError> {
        client.paged(SEARCH, options.into(), "photos", "photo").await
    }

    /// Latest public photos uploaded to Flickr
    pub async fn recent(
        client: Client,
        extras: &[Extra],
        per_page: Option<u32>,
    ) -> Result<PagedResult<Photo>, FlickrError> {
        let mut options = SearchOptions::new().extras(extras.iter().copied());
        if let Some(per_page) = per_page {
            options = options.per_page(per_page);
        }
        client.paged(GET_RECENT, options.into(), "photos", "photo").await
    }

    /// Sizes the service has available for this photo
    pub async fn sizes(&self, client: Client) -> Result<Vec<Size>, FlickrError> {
        Size::from_photo_id(client, &self.id).await
    }

    /// URL of the image in the given size.
    ///
    /// [`PhotoSize::Original`] needs the original secret and format, which are only present
    /// when [`Extra::OriginalFormat`] was requested; without them `None` is returned.
    pub fn url(&self, size: PhotoSize) -> Option<String> {
        let base = format!(
            "http://farm{}.static.flickr.com/{}/{}",
            self.farm, self.server, self.id
        );
        match size {
            PhotoSize::Medium => Some(format!("{}_{}.jpg", base, self.secret)),
            PhotoSize::Original => {
                let secret = self.original_secret.as_deref()?;
                let format = self.original_format.as_deref()?;
                Some(format!("{}_{}_o.{}", base, secret, format))
            }
            other => Some(format!("{}_{}_{}.jpg", base, self.secret, size_code(other))),
        }
    }

    /// Location the photo was taken at, when geo data was requested and is set
    pub fn geo(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }
}

// Suffix used in the static image URL
fn size_code(size: PhotoSize) -> &'static str {
    match size {
        PhotoSize::Square => "s",
        PhotoSize::Thumbnail => "t",
        PhotoSize::Small => "m",
        PhotoSize::Medium => "",
        PhotoSize::Large => "b",
        PhotoSize::Original => "o",
    }
}

/// One available size of a photo
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Size {
    #[serde(rename = "@label")]
    pub label: String,

    #[serde(default, rename = "@width", deserialize_with = "from_optional_str_number")]
    pub width: Option<u32>,

    #[serde(default, rename = "@height", deserialize_with = "from_optional_str_number")]
    pub height: Option<u32>,

    /// Direct link to the image file
    #[serde(rename = "@source")]
    pub source: String,

    /// Page on flickr.com showing this size
    #[serde(default, rename = "@url")]
    pub url: String,

    #[serde(default, rename = "@media", deserialize_with = "from_empty_str_to_none")]
    pub media: Option<String>,
}

impl Size {
    /// Returns the available sizes for the specified photo id
    pub async fn from_photo_id(client: Client, photo_id: &str) -> Result<Vec<Size>, FlickrError> {
        let mut params = ApiParams::new();
        params.insert("photo_id".to_string(), photo_id.to_string());
        let rsp = client.call(GET_SIZES, params, true).await?;
        xml::children(rsp.get("sizes").and_then(|s| s.get("size")))
            .into_iter()
            .map(|node| serde_json::from_value(node).map_err(FlickrError::ApiResponseMalformed))
            .collect()
    }
}

/// Filters and paging controls for [`Photo::search`].
///
/// Anything the builder does not cover can be passed through [`SearchOptions::param`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchOptions {
    params: ApiParams,
}

impl SearchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an arbitrary option
    pub fn param(mut self, key: &str, value: &str) -> Self {
        self.params.insert(key.to_string(), value.to_string());
        self
    }

    /// Only photos of this user. `me` means the authenticated user.
    pub fn user_id(self, user_id: &str) -> Self {
        self.param("user_id", user_id)
    }

    pub fn tags<I, S>(self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tags = join(tags);
        self.param("tags", &tags)
    }

    pub fn tag_mode(self, mode: TagMode) -> Self {
        self.param("tag_mode", mode.into())
    }

    /// Free text matched against title, description and tags
    pub fn text(self, text: &str) -> Self {
        self.param("text", text)
    }

    pub fn min_upload_date(self, date: DateTime<Utc>) -> Self {
        self.param("min_upload_date", &date.timestamp().to_string())
    }

    pub fn max_upload_date(self, date: DateTime<Utc>) -> Self {
        self.param("max_upload_date", &date.timestamp().to_string())
    }

    pub fn min_taken_date(self, date: NaiveDateTime) -> Self {
        self.param("min_taken_date", &date.format(MYSQL_DATETIME).to_string())
    }

    pub fn max_taken_date(self, date: NaiveDateTime) -> Self {
        self.param("max_taken_date", &date.format(MYSQL_DATETIME).to_string())
    }

    /// License ids as listed by `flickr.photos.licenses.getInfo`
    pub fn licenses<I: IntoIterator<Item = u32>>(self, licenses: I) -> Self {
        let licenses = join(licenses.into_iter().map(|l| l.to_string()));
        self.param("license", &licenses)
    }

    pub fn sort(self, order: SortOrder) -> Self {
        self.param("sort", order.into())
    }

    /// Only honoured for authenticated calls on the caller's own photos
    pub fn privacy_filter(self, filter: PrivacyFilter) -> Self {
        self.param("privacy_filter", &u8::from(filter).to_string())
    }

    /// Bounding box as bottom-left and top-right corners
    pub fn bbox(self, min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
        self.param("bbox", &format!("{},{},{},{}", min_lon, min_lat, max_lon, max_lat))
    }

    /// Recorded location accuracy, 1 (world) to 16 (street)
    pub fn accuracy(self, accuracy: u8) -> Self {
        self.param("accuracy", &accuracy.clamp(1, 16).to_string())
    }

    pub fn safe_search(self, level: SafeSearch) -> Self {
        self.param("safe_search", &u8::from(level).to_string())
    }

    pub fn content_type(self, content: ContentType) -> Self {
        self.param("content_type", &u8::from(content).to_string())
    }

    pub fn machine_tags<I, S>(self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tags = join(tags);
        self.param("machine_tags", &tags)
    }

    pub fn machine_tag_mode(self, mode: TagMode) -> Self {
        self.param("machine_tag_mode", mode.into())
    }

    /// Only photos in this group's pool
    pub fn group_id(self, group_id: &str) -> Self {
        self.param("group_id", group_id)
    }

    /// Ignored by the service when a bounding box is set
    pub fn woe_id(self, woe_id: &str) -> Self {
        self.param("woe_id", woe_id)
    }

    /// Ignored by the service when a bounding box is set
    pub fn place_id(self, place_id: &str) -> Self {
        self.param("place_id", place_id)
    }

    pub fn extras<I: IntoIterator<Item = Extra>>(self, extras: I) -> Self {
        let extras = join(extras.into_iter().map(<&str>::from));
        self.param("extras", &extras)
    }

    /// Results per page, capped at 500
    pub fn per_page(self, per_page: u32) -> Self {
        self.param("per_page", &per_page.min(MAX_PER_PAGE).to_string())
    }

    /// Page to start at, starting at 1
    pub fn page(self, page: u32) -> Self {
        self.param("page", &page.max(1).to_string())
    }
}

impl From<SearchOptions> for ApiParams {
    fn from(options: SearchOptions) -> Self {
        options.params
    }
}

fn join<I, S>(values: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    values
        .into_iter()
        .map(|v| v.as_ref().to_string())
        .collect::<Vec<_>>()
        .join(",")
}
