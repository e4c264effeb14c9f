use chanlog::{ConsoleSink, Level, Registry, RotationPolicy};
use flate2::read::GzDecoder;
use std::fs::{self, File};
use std::io::{Read, sink};
use std::path::Path;
use tempfile::TempDir;

fn small_registry(dir: &Path, policy: RotationPolicy) -> Registry {
    Registry::builder()
        .log_dir(dir)
        .rotation(policy)
        .console(ConsoleSink::writer(sink()))
        .build()
}

/// Layout `{msg}` keeps every line at a known length.
fn msg_only(dir: &Path, policy: RotationPolicy) -> Registry {
    let mut config = chanlog::Config::default();
    config.format.layout = "{msg}".to_string();
    Registry::builder()
        .config(config)
        .log_dir(dir)
        .rotation(policy)
        .console(ConsoleSink::writer(sink()))
        .build()
}

#[test]
fn default_policy_is_ten_mib_five_backups() {
    let policy = RotationPolicy::default();
    assert_eq!(policy.max_bytes, 10 * 1024 * 1024);
    assert_eq!(policy.backup_count, 5);
    assert!(!policy.compress);
}

#[test]
fn rotates_when_limit_would_be_exceeded() {
    let tmp = TempDir::new().unwrap();
    let policy = RotationPolicy {
        max_bytes: 10,
        backup_count: 3,
        compress: false,
    };
    let registry = msg_only(tmp.path(), policy);
    let channel = registry.configure("r", "r.log", Level::Info).unwrap();

    // Each line is 5 bytes with its newline; two fit exactly, the third rotates
    channel.info("aaaa");
    channel.info("bbbb");
    assert!(!tmp.path().join("r.log.1").exists());
    channel.info("cccc");

    assert_eq!(fs::read_to_string(tmp.path().join("r.log.1")).unwrap(), "aaaa\nbbbb\n");
    assert_eq!(fs::read_to_string(tmp.path().join("r.log")).unwrap(), "cccc\n");
}

#[test]
fn keeps_at_most_backup_count_generations() {
    let tmp = TempDir::new().unwrap();
    let policy = RotationPolicy {
        max_bytes: 1,
        backup_count: 2,
        compress: false,
    };
    let registry = msg_only(tmp.path(), policy);
    let channel = registry.configure("r", "r.log", Level::Info).unwrap();

    for msg in ["one", "two", "three", "four"] {
        channel.info(msg);
    }

    let read = |name: &str| fs::read_to_string(tmp.path().join(name)).unwrap();
    assert_eq!(read("r.log"), "four\n");
    assert_eq!(read("r.log.1"), "three\n");
    assert_eq!(read("r.log.2"), "two\n");
    assert!(!tmp.path().join("r.log.3").exists());
}

#[test]
fn zero_max_bytes_never_rotates() {
    let tmp = TempDir::new().unwrap();
    let policy = RotationPolicy {
        max_bytes: 0,
        backup_count: 2,
        compress: false,
    };
    let registry = small_registry(tmp.path(), policy);
    let channel = registry.configure("r", "r.log", Level::Info).unwrap();

    for _ in 0..50 {
        channel.info("no rotation expected");
    }

    assert!(!tmp.path().join("r.log.1").exists());
    let content = fs::read_to_string(tmp.path().join("r.log")).unwrap();
    assert_eq!(content.lines().count(), 50);
}

#[test]
fn compressed_generations_are_gzip() {
    let tmp = TempDir::new().unwrap();
    let policy = RotationPolicy {
        max_bytes: 1,
        backup_count: 2,
        compress: true,
    };
    let registry = msg_only(tmp.path(), policy);
    let channel = registry.configure("r", "r.log", Level::Info).unwrap();

    channel.info("old");
    channel.info("new");

    let mut decoded = String::new();
    GzDecoder::new(File::open(tmp.path().join("r.log.1.gz")).unwrap())
        .read_to_string(&mut decoded)
        .unwrap();
    assert_eq!(decoded, "old\n");
    assert!(!tmp.path().join("r.log.1").exists());
    assert_eq!(fs::read_to_string(tmp.path().join("r.log")).unwrap(), "new\n");
}

#[test]
fn rotation_is_per_channel() {
    let tmp = TempDir::new().unwrap();
    let policy = RotationPolicy {
        max_bytes: 1,
        backup_count: 5,
        compress: false,
    };
    let registry = msg_only(tmp.path(), policy);
    let app = registry.configure("app", "app.log", Level::Info).unwrap();
    let llm = registry.configure("llm", "llm.log", Level::Info).unwrap();

    app.info("a1");
    app.info("a2");
    llm.info("l1");

    assert!(tmp.path().join("app.log.1").exists());
    assert!(!tmp.path().join("llm.log.1").exists());
}

#[test]
fn channels_sharing_a_file_rotate_together() {
    let tmp = TempDir::new().unwrap();
    let policy = RotationPolicy {
        max_bytes: 20,
        backup_count: 5,
        compress: false,
    };
    let registry = msg_only(tmp.path(), policy);
    let a = registry.configure("a", "app.log", Level::Info).unwrap();
    let b = registry.configure("b", "app.log", Level::Info).unwrap();

    // 3-byte lines: six fit under the limit, the seventh rotates
    let mut expected = String::new();
    for i in 0..10 {
        a.info(&format!("a{i}"));
        b.info(&format!("b{i}"));
        expected.push_str(&format!("a{i}\nb{i}\n"));
    }

    let read = |name: &str| fs::read_to_string(tmp.path().join(name)).unwrap();
    let generations = ["app.log.3", "app.log.2", "app.log.1", "app.log"];
    for name in generations {
        assert!(read(name).len() <= 20, "{name} exceeds max_bytes");
    }
    assert!(!tmp.path().join("app.log.4").exists());

    let joined: String = generations.iter().map(|&name| read(name)).collect();
    assert_eq!(joined, expected);
    assert_eq!(read("app.log"), "a9\nb9\n");
}

#[test]
fn zero_backup_count_keeps_every_line() {
    let tmp = TempDir::new().unwrap();
    let policy = RotationPolicy {
        max_bytes: 10,
        backup_count: 0,
        compress: false,
    };
    let registry = msg_only(tmp.path(), policy);
    let channel = registry.configure("z", "z.log", Level::Info).unwrap();

    for i in 0..5 {
        channel.info(&format!("line{i}"));
    }

    let content = fs::read_to_string(tmp.path().join("z.log")).unwrap();
    assert_eq!(content, "line0\nline1\nline2\nline3\nline4\n");
    assert!(!tmp.path().join("z.log.1").exists());
}
