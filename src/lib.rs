//! `chanlog` - named logging channels with rotating file output and console mirroring.
//!
//! A [`Registry`] hands out [`Channel`]s by name. The first request for a
//! name opens `<log_dir>/<file>` as a size-bounded rotating file (10 MiB,
//! 5 backups by default) and mirrors every line to stdout; repeated requests
//! return the same channel without adding sinks.
//!
//! # Example
//!
//! ```no_run
//! use chanlog::{Fields, Level, Registry};
//!
//! let registry = Registry::new();
//! let app = registry.setup_logger("app_logger", "app.log", Level::Info)?;
//! app.info("Application started");
//!
//! let llm = registry.setup_llm_logger()?;
//! llm.log_with(
//!     Level::Info,
//!     "LLM Call",
//!     Fields::new().with("tokens", 100).with("cost", 0.01),
//! );
//! # Ok::<(), chanlog::Error>(())
//! ```
//!
//! Lines look like `2025-01-15 14:30:00,123 - app_logger - INFO - Application started`.

pub mod channel;
pub mod config;
pub mod error;
pub mod fmt;
pub mod internal;
pub mod level;
pub mod llm;
pub mod registry;
pub mod sink;

pub use channel::Channel;
pub use config::Config;
pub use error::Error;
pub use fmt::{FieldValue, Fields, Formatter};
pub use level::{Level, ParseLevelError};
pub use llm::{LLM_CHANNEL, LLM_LOG_FILE, LlmCall};
pub use registry::{DEFAULT_CHANNEL, DEFAULT_LOG_FILE, Registry, RegistryBuilder};
pub use sink::{ConsoleSink, ConsoleStream, Record, RotatingFileSink, RotationPolicy, Sink};
