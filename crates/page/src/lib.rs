//! Page layer for EV Tracker progress.
//!
//! Reads tables and metric cards out of rendered pages, resolves each
//! page's percentage, relays values between pages through the cache, and
//! talks to the progress API.

#![warn(missing_docs)]

pub mod client;
pub mod config;
pub mod error;
pub mod html;
pub mod ready;
pub mod resolver;

pub use client::{ProgressClient, ProgressPayload};
pub use config::{CacheConfig, EvTrackConfig, PageDefaults};
pub use error::{ConfigError, FetchError, FetchResult};
pub use html::{extract_metric_cards, extract_tables, find_table, first_sub_job_id, PageDocument};
pub use ready::{ready_channel, ReadyNotifier, ReadySignal};
pub use resolver::PageResolver;
