//! apk-depot: static download sites for an Android app
//!
//! Two sites share one request pipeline:
//! - **portal**: a generated web root plus `/api/info` and `/api/files`
//! - **mirror**: a whole project tree, a landing page and a latest-APK redirect

pub mod api;
pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;
