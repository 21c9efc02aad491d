/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use num_enum::IntoPrimitive;
use strum_macros::{Display, EnumString, IntoStaticStr};

/// Access level granted to the application. Each level includes the ones below it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Display, EnumString, IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum Permission {
    /// Read private information
    #[default]
    Read,
    /// Add, edit and delete photo metadata
    Write,
    /// Delete photos
    Delete,
}

/// Image variants that can be derived for a [`crate::rest::Photo`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum PhotoSize {
    /// 75x75
    Square,
    /// 100 on longest side
    #[strum(to_string = "thumbnail", serialize = "thumb")]
    Thumbnail,
    /// 240 on longest side
    Small,
    /// 500 on longest side
    #[default]
    Medium,
    /// 1024 on longest side, only exists for very large originals
    Large,
    /// Original upload, in its source format
    Original,
}

/// Additional per photo fields a search can ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Extra {
    License,
    DateUpload,
    DateTaken,
    OwnerName,
    IconServer,
    OriginalFormat,
    LastUpdate,
    Geo,
    Tags,
    MachineTags,
    #[strum(to_string = "o_dims")]
    ODims,
    Views,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum SortOrder {
    DatePostedAsc,
    DatePostedDesc,
    DateTakenAsc,
    DateTakenDesc,
    InterestingnessDesc,
    InterestingnessAsc,
    Relevance,
}

/// How multiple tags are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum TagMode {
    /// OR
    Any,
    /// AND
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive)]
#[repr(u8)]
pub enum PrivacyFilter {
    Public = 1,
    Friends = 2,
    Family = 3,
    FriendsAndFamily = 4,
    Private = 5,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive)]
#[repr(u8)]
pub enum SafeSearch {
    Safe = 1,
    Moderate = 2,
    Restricted = 3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive)]
#[repr(u8)]
pub enum ContentType {
    Photos = 1,
    Screenshots = 2,
    Other = 3,
    PhotosAndScreenshots = 4,
    ScreenshotsAndOther = 5,
    PhotosAndOther = 6,
    All = 7,
}
