//! Club information collector: a terminal form that gathers a club's details
//! (or a sparse update to them) and emails a plain-text report to the
//! activities office.
//!
//! The binary only wires configuration and logging to [`App`]; everything it
//! drives is exposed here so the pieces can be exercised on their own.
pub mod config;
pub mod error;
pub mod example;
pub mod image;
pub mod lists;
pub mod logging;
pub mod mailer;
pub mod models;
pub mod report;
pub mod session;
pub mod ui;

pub use config::{data_dir, MailConfig};
pub use error::{ConfigError, MailError, ValidationError};
pub use logging::{init_logger, init_logger_or_warn};
pub use models::{ClubRecord, UpdateRequest};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
