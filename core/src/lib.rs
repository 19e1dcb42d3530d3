//! Synchronous API client core for the PastUs service.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). The caller executes the
//! actual HTTP round-trip, making the core fully deterministic and testable.
//!
//! # Design
//! - `PastusClient` is stateless; it holds only `base_url`.
//! - Each endpoint is split into `build_*` (produces request) and `parse_*`
//!   (consumes response), so the I/O boundary is explicit.
//! - Every parse returns `Result<_, ApiError>`; enveloped endpoints yield
//!   `Envelope<T>`, a handful return a bare domain shape (`LikeState`,
//!   `Availability`, `TokenReceipt`).
//! - Form validation and display formatting live here too, since they are
//!   pure and must run before a request exists.

pub mod client;
pub mod envelope;
pub mod error;
pub mod format;
pub mod http;
pub mod search;
pub mod types;
pub mod validation;

pub use client::PastusClient;
pub use envelope::Envelope;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use search::SearchTerm;
pub use validation::ValidationError;
