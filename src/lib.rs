#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::unnecessary_literal_bound,
    clippy::module_name_repetitions,
    clippy::struct_field_names,
    clippy::must_use_candidate,
    clippy::new_without_default,
    clippy::return_self_not_must_use
)]

#[macro_use]
extern crate rust_i18n;

i18n!("locales", fallback = "en");

pub mod app;
pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod http;
pub mod logger;
pub mod media;
pub mod notify;
pub mod orchestrator;
pub mod runtime;
pub mod store;
pub mod transport;

pub use config::Config;
pub use context::Context;
pub use error::{CheckinError, Result};
pub use http::{HttpClient, Reply, RequestSpec};
pub use logger::Logger;
pub use notify::{Notifier, NotifyExtras};
pub use orchestrator::{Orchestrator, RunSummary, ScriptedWorkflow, SiteWorkflow};
pub use runtime::{HostCapabilities, HostEnvironment};
pub use store::{KeyValueStore, StorageAddress};
