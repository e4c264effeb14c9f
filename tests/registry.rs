use chanlog::config::ChannelOverride;
use chanlog::{Config, Error, LLM_CHANNEL, Level, Registry};
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

fn registry(tmp: &TempDir) -> Registry {
    Registry::builder().log_dir(tmp.path().join("logs")).build()
}

#[test]
fn configure_creates_directory_and_file() {
    let tmp = TempDir::new().unwrap();
    let registry = registry(&tmp);

    let channel = registry.setup_logger("app_logger", "app.log", Level::Info).unwrap();

    assert!(tmp.path().join("logs").is_dir());
    assert!(tmp.path().join("logs").join("app.log").exists());
    assert_eq!(channel.name(), "app_logger");
    assert_eq!(channel.level(), Level::Info);
    assert_eq!(channel.sink_count(), 2);
}

#[test]
fn configure_twice_keeps_two_sinks() {
    let tmp = TempDir::new().unwrap();
    let registry = registry(&tmp);

    let first = registry.configure("app_logger", "app.log", Level::Info).unwrap();
    let second = registry.configure("app_logger", "app.log", Level::Info).unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(second.sink_count(), 2);
    assert_eq!(registry.len(), 1);
}

#[test]
fn reconfigure_updates_level_only() {
    let tmp = TempDir::new().unwrap();
    let registry = registry(&tmp);

    registry.configure("svc", "svc.log", Level::Info).unwrap();
    let channel = registry.configure("svc", "other.log", Level::Error).unwrap();

    assert_eq!(channel.level(), Level::Error);
    assert_eq!(channel.sink_count(), 2);
    // The second file name is ignored once sinks exist
    assert!(!tmp.path().join("logs").join("other.log").exists());
}

#[test]
fn llm_channel_uses_dedicated_file() {
    let tmp = TempDir::new().unwrap();
    let registry = registry(&tmp);

    let channel = registry.setup_llm_logger().unwrap();

    assert!(tmp.path().join("logs").join("llm_analytics.log").exists());
    assert_eq!(channel.name(), LLM_CHANNEL);
    assert_eq!(channel.level(), Level::Info);
    assert_eq!(channel.sink_count(), 2);
}

#[test]
fn info_record_reaches_file() {
    let tmp = TempDir::new().unwrap();
    let registry = registry(&tmp);

    let channel = registry.configure_default().unwrap();
    channel.info("Test log message");
    channel.flush().unwrap();

    let content = fs::read_to_string(tmp.path().join("logs").join("app.log")).unwrap();
    assert!(content.contains("Test log message"));
    assert!(content.contains(" - app_logger - INFO - Test log message\n"));
}

#[test]
fn record_below_threshold_is_dropped() {
    let tmp = TempDir::new().unwrap();
    let registry = registry(&tmp);

    let channel = registry.configure_default().unwrap();
    channel.debug("too quiet");

    let content = fs::read_to_string(tmp.path().join("logs").join("app.log")).unwrap();
    assert!(content.is_empty());
}

#[test]
fn llm_record_with_fields_is_written() {
    let tmp = TempDir::new().unwrap();
    let registry = registry(&tmp);

    let channel = registry.configure_llm_channel().unwrap();
    channel.log_with(
        Level::Info,
        "LLM Call",
        chanlog::Fields::new().with("tokens", 100).with("cost", 0.01),
    );

    let content =
        fs::read_to_string(tmp.path().join("logs").join("llm_analytics.log")).unwrap();
    assert!(content.contains("LLM Call"));
}

#[test]
fn channels_write_to_separate_files() {
    let tmp = TempDir::new().unwrap();
    let registry = registry(&tmp);

    let app = registry.configure_default().unwrap();
    let llm = registry.configure_llm_channel().unwrap();
    app.info("for app");
    llm.info("for llm");

    let logs = tmp.path().join("logs");
    let app_log = fs::read_to_string(logs.join("app.log")).unwrap();
    let llm_log = fs::read_to_string(logs.join("llm_analytics.log")).unwrap();
    assert!(app_log.contains("for app") && !app_log.contains("for llm"));
    assert!(llm_log.contains("for llm") && !llm_log.contains("for app"));
    assert_eq!(registry.names(), vec!["app_logger", "llm_logger"]);
}

#[test]
fn nested_file_name_creates_subdirectory() {
    let tmp = TempDir::new().unwrap();
    let registry = registry(&tmp);

    registry.configure("calls", "llm/calls.log", Level::Info).unwrap();

    assert!(tmp.path().join("logs").join("llm").join("calls.log").exists());
}

#[test]
fn ensure_log_directory_is_idempotent() {
    let tmp = TempDir::new().unwrap();
    let registry = registry(&tmp);

    registry.ensure_log_directory().unwrap();
    registry.ensure_log_directory().unwrap();

    assert!(registry.log_dir().is_dir());
}

#[test]
fn empty_name_is_rejected() {
    let tmp = TempDir::new().unwrap();
    let registry = registry(&tmp);

    let err = registry.configure("  ", "app.log", Level::Info).unwrap_err();
    assert!(matches!(err, Error::InvalidName(_)));
    assert!(registry.is_empty());
}

#[test]
fn escaping_file_name_is_rejected() {
    let tmp = TempDir::new().unwrap();
    let registry = registry(&tmp);

    let err = registry.configure("x", "../x.log", Level::Info).unwrap_err();
    assert!(matches!(err, Error::InvalidPath(_)));
}

#[test]
fn uncreatable_directory_is_a_filesystem_error() {
    let tmp = TempDir::new().unwrap();
    let blocker = tmp.path().join("not_a_dir");
    fs::write(&blocker, "").unwrap();
    let registry = Registry::builder().log_dir(blocker.join("logs")).build();

    let err = registry.configure_default().unwrap_err();
    assert!(matches!(err, Error::CreateDir { .. }));
    assert!(registry.get("app_logger").is_none());
}

#[test]
fn unopenable_file_is_a_filesystem_error() {
    let tmp = TempDir::new().unwrap();
    let registry = registry(&tmp);
    // A directory where the log file should be
    fs::create_dir_all(tmp.path().join("logs").join("app.log")).unwrap();

    let err = registry.configure_default().unwrap_err();
    assert!(matches!(err, Error::OpenFile { .. }));
    assert!(registry.is_empty());
}

#[test]
fn channel_override_replaces_level_and_file() {
    let tmp = TempDir::new().unwrap();
    let mut config = Config::default();
    config.channels.insert(
        "app_logger".to_string(),
        ChannelOverride {
            level: Some(Level::Debug),
            file: Some("custom.log".to_string()),
            console: Some(false),
        },
    );
    let registry = Registry::builder()
        .config(config)
        .log_dir(tmp.path().join("logs"))
        .build();

    let channel = registry.configure_default().unwrap();

    assert_eq!(channel.level(), Level::Debug);
    assert_eq!(channel.sink_count(), 1);
    assert!(tmp.path().join("logs").join("custom.log").exists());
    assert!(!tmp.path().join("logs").join("app.log").exists());
}

#[test]
fn get_returns_configured_channel() {
    let tmp = TempDir::new().unwrap();
    let registry = registry(&tmp);
    assert!(registry.get("app_logger").is_none());

    let channel = registry.configure_default().unwrap();
    let found = registry.get("app_logger").unwrap();
    assert!(Arc::ptr_eq(&channel, &found));
}

#[test]
fn clones_share_channels() {
    let tmp = TempDir::new().unwrap();
    let registry = registry(&tmp);
    let handle = registry.clone();

    let a = registry.configure_default().unwrap();
    let b = handle.configure_default().unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    assert!(registry.flush().is_ok());
}
