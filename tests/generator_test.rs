use confgen::cli::Args;
use confgen::config::Config;
use confgen::constants::GENERATED_COMMENT;
use confgen::encoding::{Json, Yaml};
use confgen::{Error, Generator};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn config_for(output_dir: PathBuf) -> Config {
    Config {
        output_dir: Some(output_dir),
        ..Config::default()
    }
}

fn kv(key: &str, value: &str) -> BTreeMap<String, String> {
    BTreeMap::from([(key.to_string(), value.to_string())])
}

#[test_log::test]
fn test_generate_writes_provenance_marker() {
    let temp_dir = TempDir::new().unwrap();
    let mut config = config_for(temp_dir.path().to_path_buf());
    config.header_comments = vec!["Source: deploy.rs".to_string()];

    let mut generator = Generator::new(config).unwrap();
    generator
        .with(&["providers", "prometheus"])
        .unwrap()
        .add("prom.yaml", Yaml::new(&kv("global", "x")))
        .unwrap();
    generator.add("settings.json", Json::new(&kv("k", "v"))).unwrap();

    let report = generator.generate().unwrap();
    assert_eq!(report.written.len(), 2);
    assert!(report.removed.is_empty());

    let yaml = fs::read_to_string(temp_dir.path().join("providers/prometheus/prom.yaml")).unwrap();
    assert_eq!(
        yaml,
        format!("# {}\n# Source: deploy.rs\nglobal: x\n", GENERATED_COMMENT)
    );
    let json = fs::read_to_string(temp_dir.path().join("settings.json")).unwrap();
    assert!(json.starts_with('{'));
}

#[test]
fn test_scope_is_released_after_use() {
    let temp_dir = TempDir::new().unwrap();
    let mut generator = Generator::new(config_for(temp_dir.path().to_path_buf())).unwrap();

    generator
        .with(&["a"])
        .unwrap()
        .add("x.yaml", Yaml::new(&kv("k", "v")))
        .unwrap();
    generator.add("x.yaml", Yaml::new(&kv("k", "v"))).unwrap();

    let err = generator
        .with(&["a"])
        .unwrap()
        .add("x.yaml", Yaml::new(&kv("k", "v")))
        .unwrap_err();
    assert!(matches!(err, Error::FilenameClash { .. }));
    assert_eq!(generator.pool().len(), 2);
}

#[test]
fn test_stale_files_kept_by_default() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("old.yaml"), "old").unwrap();

    let mut generator = Generator::new(config_for(temp_dir.path().to_path_buf())).unwrap();
    generator.add("new.yaml", Yaml::new(&kv("k", "v"))).unwrap();
    let report = generator.generate().unwrap();

    assert!(report.removed.is_empty());
    assert!(temp_dir.path().join("old.yaml").exists());
}

#[test]
fn test_clean_stale_removes_leftovers() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::create_dir_all(root.join("old/dir")).unwrap();
    fs::write(root.join("old/dir/stale.yaml"), "stale").unwrap();
    fs::write(root.join("README.md"), "docs").unwrap();

    let config = Config {
        output_dir: Some(root.to_path_buf()),
        clean_stale: true,
        keep: vec!["README.md".to_string()],
        ..Config::default()
    };
    let mut generator = Generator::new(config).unwrap();
    generator
        .with(&["current"])
        .unwrap()
        .add("x.yaml", Yaml::new(&kv("k", "v")))
        .unwrap();
    let report = generator.generate().unwrap();

    assert_eq!(report.removed, vec![root.join("old/dir/stale.yaml")]);
    assert!(!root.join("old").exists());
    assert!(root.join("README.md").exists());
    assert!(root.join("current/x.yaml").exists());
}

#[test]
fn test_invalid_keep_pattern() {
    let config = Config {
        keep: vec!["[".to_string()],
        ..Config::default()
    };
    assert!(matches!(Generator::new(config), Err(Error::ConfigError(_))));
}

#[test]
fn test_from_args_reads_config_and_overrides() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("confgen.yaml");
    fs::write(
        &config_path,
        "output_dir: from-file\nheader_comments:\n  - Source: deploy.rs\n",
    )
    .unwrap();

    let args = Args {
        output_dir: Some(temp_dir.path().join("out")),
        config: Some(config_path),
        clean_stale: false,
        verbose: false,
    };
    let mut generator = Generator::from_args(&args).unwrap();
    assert_eq!(generator.output_dir(), temp_dir.path().join("out"));

    generator.add("x.yaml", Yaml::new(&kv("k", "v"))).unwrap();
    assert_eq!(
        generator.pool().get("x.yaml"),
        Some(format!("# {}\n# Source: deploy.rs\nk: v\n", GENERATED_COMMENT).as_bytes())
    );
}

#[test]
fn test_from_args_missing_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let args = Args {
        output_dir: None,
        config: Some(temp_dir.path().join("absent.yaml")),
        clean_stale: false,
        verbose: false,
    };
    assert!(matches!(
        Generator::from_args(&args),
        Err(Error::ConfigError(_))
    ));
}

#[cfg(unix)]
#[test]
fn test_clean_stale_keeps_files_written_through_symlinked_directory() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("out");
    let target = temp_dir.path().join("real");
    fs::create_dir_all(&root).unwrap();
    fs::create_dir_all(&target).unwrap();
    std::os::unix::fs::symlink(&target, root.join("a")).unwrap();

    let config = Config {
        output_dir: Some(root.clone()),
        clean_stale: true,
        ..Config::default()
    };
    let mut generator = Generator::new(config).unwrap();
    generator
        .with(&["a"])
        .unwrap()
        .add("x.yaml", Yaml::new(&kv("k", "v")))
        .unwrap();
    let report = generator.generate().unwrap();

    assert_eq!(report.written, vec![root.join("a/x.yaml")]);
    assert!(report.removed.is_empty());
    assert!(root.join("a/x.yaml").exists());
    assert!(target.join("x.yaml").exists());
}
