// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP layer: request descriptors, responses and the transport boundary

mod cookie;
mod request;
mod response;
mod transport;

pub use cookie::{Cookie, CookieJar};
pub use request::{CredentialsMode, FetchOptions, FetchParameters, FilePart, FormData, FormValue};
pub use response::Response;
pub use transport::{HttpTransport, Transport};

/// Common HTTP headers
pub mod headers {
    pub const ACCEPT: &str = "accept";
    pub const CONTENT_TYPE: &str = "content-type";
    pub const COOKIE: &str = "cookie";
    pub const SET_COOKIE: &str = "set-cookie";
}

/// MIME type every framework action answers with
pub const APPLICATION_JSON: &str = "application/json";
