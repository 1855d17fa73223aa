// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Dynamic request headers
//!
//! Headers are contributed by extenders registered per header name and
//! scoped to HTTP methods. The CSRF extender is the main consumer.

mod csrf;
mod registry;

pub use csrf::{CsrfTokenExtender, RefresherHandle, MIN_REFRESH_INTERVAL};
pub use registry::{FnHeader, HeaderExtender, HeaderRegistry, HeaderValueProvider, StaticHeader};
