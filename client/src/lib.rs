//! PastUs client runtime: data sources, session storage and screen state.
//!
//! # Overview
//! `pastus-core` describes every endpoint as plain data. This crate supplies
//! what a running app needs around it:
//!
//! - `source`: per-domain service traits with a fixture-backed and an
//!   HTTP-backed implementation, bundled in `Services` and chosen once from
//!   configuration.
//! - `transport`: the `reqwest` executor that injects the stored bearer token.
//! - `storage` / `history`: the credential store and recent searches.
//! - `countdown`, `wizard`, `search`: screen state machines.
//! - `screens`: loaders that fetch a screen's data concurrently.
//!
//! # Design
//! Every service call returns `Result<_, pastus_core::ApiError>`, whichever
//! source is active. Assembly-time problems (bad config, unreadable store)
//! are `ClientError`.

pub mod config;
pub mod countdown;
pub mod error;
pub mod history;
pub mod logging;
pub mod screens;
pub mod search;
pub mod source;
pub mod storage;
pub mod transport;
pub mod wizard;

pub use config::{load_config, ClientConfig, DataSourceKind};
pub use countdown::{Countdown, CountdownState};
pub use error::{ClientError, StorageError};
pub use logging::init_tracing;
pub use history::SearchHistory;
pub use search::{SearchInput, SearchMode};
pub use source::Services;
pub use storage::Credentials;
pub use wizard::{SignupStep, SignupWizard};
