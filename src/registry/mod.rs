//! The registry owns every configured channel. Create one at startup, hand
//! clones to whoever needs to log, and keep it for the life of the process;
//! channels are never torn down.
//!
//! Configuration is idempotent per name: the first `configure` for a name
//! opens its file and attaches a rotating file sink plus a console sink,
//! later calls only update the channel's threshold. The lookup, sink
//! creation and insert all happen under one lock, so racing callers can
//! neither duplicate the pair nor observe a channel without sinks.
//!
//! Channels naming the same file share one [`RotatingFileSink`], so a single
//! size counter governs rotation of that file.

mod builder;

pub use builder::RegistryBuilder;

use crate::Error;
use crate::channel::Channel;
use crate::config::Config;
use crate::fmt::Formatter;
use crate::internal;
use crate::level::Level;
use crate::sink::{ConsoleSink, RotatingFileSink, RotationPolicy};
use std::collections::HashMap;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

/// Channel configured by [`Registry::configure_default`].
pub const DEFAULT_CHANNEL: &str = "app_logger";
/// File backing [`DEFAULT_CHANNEL`].
pub const DEFAULT_LOG_FILE: &str = "app.log";

struct Inner {
    config: Config,
    log_dir: PathBuf,
    policy: RotationPolicy,
    formatter: Formatter,
    console: ConsoleSink,
    channels: Mutex<HashMap<String, Arc<Channel>>>,
    /// Keyed by resolved path. Only locked while `channels` is held.
    files: Mutex<HashMap<PathBuf, Arc<RotatingFileSink>>>,
}

/// Cheap to clone; clones share the same channels.
#[derive(Clone)]
pub struct Registry {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("log_dir", &self.inner.log_dir)
            .field("channels", &self.names())
            .finish_non_exhaustive()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// Defaults: `logs/` under the working directory, 10 MiB × 5, console on stdout.
    #[must_use]
    pub fn new() -> Self {
        RegistryBuilder::new().build()
    }

    #[must_use]
    pub fn with_config(config: Config) -> Self {
        RegistryBuilder::new().config(config).build()
    }

    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    #[must_use]
    pub fn log_dir(&self) -> &Path {
        &self.inner.log_dir
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Creates the log directory if it is missing. Safe to call repeatedly
    /// and concurrently, including from other processes.
    ///
    /// # Errors
    /// [`Error::CreateDir`] when the directory cannot be created.
    pub fn ensure_log_directory(&self) -> Result<&Path, Error> {
        let dir = self.log_dir();
        if dir.is_dir() {
            return Ok(dir);
        }
        // create_dir_all treats a concurrent creator's directory as success
        fs::create_dir_all(dir).map_err(|source| {
            internal::error(
                "REGISTRY",
                &format!("Cannot create {}: {source}", dir.display()),
            );
            Error::CreateDir {
                path: dir.to_path_buf(),
                source,
            }
        })?;
        internal::debug("REGISTRY", &format!("Created {}", dir.display()));
        Ok(dir)
    }

    /// Returns the channel for `name`, creating it with a rotating file sink on
    /// `<log_dir>/<file_name>` and a console sink on first use. On later calls
    /// only the channel threshold is updated; the sinks keep their original one.
    ///
    /// `[channels.<name>]` config overrides replace `file_name` and `level`.
    ///
    /// # Errors
    /// [`Error::InvalidName`] for an empty name, [`Error::InvalidPath`] for a
    /// file name that is empty, absolute or climbs out of the log directory,
    /// [`Error::CreateDir`] / [`Error::OpenFile`] for filesystem failures.
    pub fn configure(
        &self,
        name: &str,
        file_name: &str,
        level: Level,
    ) -> Result<Arc<Channel>, Error> {
        if name.trim().is_empty() {
            return Err(Error::InvalidName(name.to_string()));
        }

        let overrides = self.inner.config.channel(name);
        let level = overrides.and_then(|o| o.level).unwrap_or(level);
        let file_name = overrides
            .and_then(|o| o.file.as_deref())
            .unwrap_or(file_name);
        let console = overrides
            .and_then(|o| o.console)
            .unwrap_or(self.inner.config.console.enabled);
        validate_file_name(file_name)?;

        let dir = self.ensure_log_directory()?;

        let mut channels = self
            .inner
            .channels
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(existing) = channels.get(name) {
            existing.set_level(level);
            internal::debug(
                "REGISTRY",
                &format!("Reusing channel {name}, level {level}"),
            );
            return Ok(Arc::clone(existing));
        }

        let path: PathBuf = dir.join(file_name).components().collect();
        let file_sink = self.file_sink(&path)?;

        let mut channel = Channel::new(name, level)
            .formatter(self.inner.formatter.clone())
            .sink(level, file_sink);
        if console {
            channel = channel.sink(level, self.inner.console.clone());
        }

        let channel = Arc::new(channel);
        channels.insert(name.to_string(), Arc::clone(&channel));
        internal::info(
            "REGISTRY",
            &format!(
                "Configured channel {name} -> {} ({} sinks, {level})",
                path.display(),
                channel.sink_count()
            ),
        );

        Ok(channel)
    }

    /// Existing sink for `path`, or a newly opened one. Callers hold the
    /// `channels` lock.
    fn file_sink(&self, path: &Path) -> Result<Arc<RotatingFileSink>, Error> {
        let mut files = self
            .inner
            .files
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(existing) = files.get(path) {
            internal::debug("REGISTRY", &format!("Sharing {}", path.display()));
            return Ok(Arc::clone(existing));
        }

        let sink = Arc::new(RotatingFileSink::open(path, self.inner.policy)?);
        files.insert(path.to_path_buf(), Arc::clone(&sink));
        Ok(sink)
    }

    /// Alias of [`Registry::configure`].
    ///
    /// # Errors
    /// Same as [`Registry::configure`].
    pub fn setup_logger(
        &self,
        name: &str,
        log_file: &str,
        level: Level,
    ) -> Result<Arc<Channel>, Error> {
        self.configure(name, log_file, level)
    }

    /// `app_logger` on `app.log` at INFO.
    ///
    /// # Errors
    /// Same as [`Registry::configure`].
    pub fn configure_default(&self) -> Result<Arc<Channel>, Error> {
        self.configure(DEFAULT_CHANNEL, DEFAULT_LOG_FILE, Level::Info)
    }

    /// The LLM analytics channel (`llm_logger` on `llm_analytics.log` unless
    /// `[llm]` says otherwise) at INFO.
    ///
    /// # Errors
    /// Same as [`Registry::configure`].
    pub fn configure_llm_channel(&self) -> Result<Arc<Channel>, Error> {
        let llm = &self.inner.config.llm;
        self.configure(&llm.channel, &llm.file, Level::Info)
    }

    /// Alias of [`Registry::configure_llm_channel`].
    ///
    /// # Errors
    /// Same as [`Registry::configure`].
    pub fn setup_llm_logger(&self) -> Result<Arc<Channel>, Error> {
        self.configure_llm_channel()
    }

    /// Already-configured channel, if any.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<Channel>> {
        self.inner
            .channels
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    /// Sorted names of configured channels.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .inner
            .channels
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner
            .channels
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flushes every channel, continuing past failures.
    ///
    /// # Errors
    /// Returns the first error encountered.
    pub fn flush(&self) -> Result<(), Error> {
        let channels: Vec<Arc<Channel>> = self
            .inner
            .channels
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();

        let mut first_err = None;
        for channel in channels {
            if let Err(e) = channel.flush() {
                first_err.get_or_insert(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }
}

/// File names stay inside the log directory.
fn validate_file_name(file_name: &str) -> Result<(), Error> {
    if file_name.trim().is_empty() {
        return Err(Error::InvalidPath("empty file name".to_string()));
    }
    let path = Path::new(file_name);
    let escapes = path.components().any(|c| {
        matches!(
            c,
            Component::RootDir | Component::Prefix(_) | Component::ParentDir
        )
    });
    if escapes || path.is_absolute() {
        return Err(Error::InvalidPath(file_name.to_string()));
    }
    Ok(())
}
