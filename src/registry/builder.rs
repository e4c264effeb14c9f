//! Stepwise construction for registries that need more than `Config` defaults.

use super::{Inner, Registry};
use crate::config::Config;
use crate::internal;
use crate::sink::{ConsoleSink, RotationPolicy};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

#[derive(Default)]
pub struct RegistryBuilder {
    config: Config,
    log_dir: Option<PathBuf>,
    console: Option<ConsoleSink>,
}

impl RegistryBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Overrides `[general] log_dir`.
    #[must_use]
    pub fn log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = Some(dir.into());
        self
    }

    /// Overrides the `[rotation]` section.
    #[must_use]
    pub fn rotation(mut self, policy: RotationPolicy) -> Self {
        self.config.rotation.max_bytes = policy.max_bytes;
        self.config.rotation.max_size = None;
        self.config.rotation.backup_count = policy.backup_count;
        self.config.rotation.compress = policy.compress;
        self
    }

    /// Console sinks of every channel write here instead of the configured stream.
    #[must_use]
    pub fn console(mut self, sink: ConsoleSink) -> Self {
        self.console = Some(sink);
        self
    }

    #[must_use]
    pub fn build(self) -> Registry {
        internal::init_with_config(&self.config);

        let log_dir = self.log_dir.unwrap_or_else(|| self.config.log_dir());
        let console = self
            .console
            .unwrap_or_else(|| ConsoleSink::new(self.config.console.stream));

        internal::debug(
            "REGISTRY",
            &format!("Registry created, log dir {}", log_dir.display()),
        );

        Registry {
            inner: Arc::new(Inner {
                log_dir,
                policy: self.config.rotation_policy(),
                formatter: self.config.formatter(),
                console,
                config: self.config,
                channels: Mutex::new(HashMap::new()),
                files: Mutex::new(HashMap::new()),
            }),
        }
    }
}
