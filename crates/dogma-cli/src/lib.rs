//! Dogma token CLI
//!
//! Creates application tokens from the command line, going through the same
//! rule editor and form as the console.

pub mod args;
pub mod config;
pub mod logging;
pub mod notifier;
pub mod run;

pub use args::{Cli, RuleArg};
pub use config::Configuration;
pub use logging::{LoggingConfig, LoggingGuard, init_logging};
pub use notifier::StderrNotifier;
pub use run::run;
