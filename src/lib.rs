pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::{CliArgs, Command};

pub use crate::adapters::GeminiService;
pub use crate::config::AdvisorConfig;
pub use crate::core::advisor::{Advice, AdvisoryClient, RequestFailure};
pub use crate::core::inflight::RequestSlot;
pub use crate::core::session::{Panel, Session};
pub use crate::utils::error::{AdvisorError, FailureKind, Result};
