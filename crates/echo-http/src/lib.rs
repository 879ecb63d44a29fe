//! Access layer for the Echo REST API.
//!
//! This crate provides:
//! - A cloneable [`ApiClient`] that attaches the bearer credential and unwraps payloads
//! - Per-call timeout and fixed-delay retry options
//! - A single [`HttpError`] shape for transport, authorization, validation and server failures
//! - The [`SessionAccessor`] seam through which a 401 tears the session down

mod accessor;
mod client;
mod error;
mod request;

pub use accessor::{NoSession, SessionAccessor};
pub use client::ApiClient;
pub use error::{HttpError, HttpResult};
pub use request::{ApiRequest, RequestBody, RequestOptions, RetryPolicy};
pub use reqwest::Method;
