/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */

pub mod api;
pub mod auth;
pub mod client;
pub mod errors;
pub mod paged;
mod parsers;
pub mod photos;
pub mod properties;
pub mod signer;
pub mod xml;

#[cfg(test)]
pub(crate) mod test_support;

pub use api::*;
pub use auth::*;
pub use client::*;
pub use errors::*;
pub use paged::*;
pub use photos::*;
pub use properties::*;
pub use signer::*;
