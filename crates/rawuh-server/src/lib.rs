#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod error;

pub mod extract;
pub mod handler;
pub mod middleware;
pub mod service;

pub use crate::error::{BoxedError, Error, ErrorKind, Result};

/// Tracing target for bearer token resolution.
pub const TRACING_TARGET_AUTHENTICATION: &str = "rawuh_server::authentication";

/// Tracing target for tenant authorization decisions.
pub const TRACING_TARGET_AUTHORIZATION: &str = "rawuh_server::authorization";

/// Tracing target for session store operations.
pub const TRACING_TARGET_SESSION: &str = "rawuh_server::session";
