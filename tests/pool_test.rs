use confgen::encoding::{CommentStyle, Json, Raw, Template, Yaml};
use confgen::{Error, FilePool};
use std::collections::BTreeMap;
use std::fs;
use tempfile::TempDir;

fn kv(key: &str, value: &str) -> BTreeMap<String, String> {
    BTreeMap::from([(key.to_string(), value.to_string())])
}

#[test_log::test]
fn test_write_is_idempotent() {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();

    let mut pool = FilePool::default();
    pool.add_top_level_comment("GEN");
    {
        let mut scope = pool.scoped(&["kubernetes", "monitoring"]).unwrap();
        scope.add("svc.yaml", Yaml::new(&kv("kind", "Service"))).unwrap();
        scope.add("cfg.json", Json::new(&kv("a", "b"))).unwrap();
    }
    pool.add("top.txt", Raw::new("text\n", CommentStyle::Hash)).unwrap();

    pool.write(first.path()).unwrap();
    pool.write(second.path()).unwrap();
    let snapshot = fs::read(first.path().join("kubernetes/monitoring/svc.yaml")).unwrap();
    pool.write(first.path()).unwrap();

    assert!(!dir_diff::is_different(first.path(), second.path()).unwrap());
    assert_eq!(
        fs::read(first.path().join("kubernetes/monitoring/svc.yaml")).unwrap(),
        snapshot
    );
}

#[test_log::test]
fn test_write_creates_intermediate_directories() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("does/not/exist");

    let mut pool = FilePool::default();
    pool.push_path(&["a", "b", "c"]).unwrap();
    pool.add("deep.yaml", Yaml::new(&kv("k", "v"))).unwrap();

    let written = pool.write(&output).unwrap();
    assert_eq!(written, vec![output.join("a/b/c/deep.yaml")]);
    assert!(output.join("a/b/c").is_dir());
}

#[test]
fn test_comment_syntax_follows_encoder() {
    let mut pool = FilePool::default();
    pool.add_top_level_comment("GEN");
    pool.add("a.yaml", Yaml::new(&kv("k", "v"))).unwrap();
    pool.add("b.json", Json::new(&kv("k", "v"))).unwrap();
    pool.add(
        "c.tf",
        Template::new("x = {{ x }}\n", serde_json::json!({"x": 1}), CommentStyle::DoubleSlash),
    )
    .unwrap();

    assert_eq!(pool.get("a.yaml"), Some(&b"# GEN\nk: v\n"[..]));
    assert_eq!(pool.get("b.json"), Some(&b"{\n  \"k\": \"v\"\n}\n"[..]));
    assert_eq!(pool.get("c.tf"), Some(&b"// GEN\nx = 1\n"[..]));
}

#[test]
fn test_clash_across_encoders() {
    let mut pool = FilePool::default();
    pool.add("x.yaml", Yaml::new(&kv("k", "v"))).unwrap();
    let err = pool
        .add("x.yaml", Raw::new("k: v\n", CommentStyle::Hash))
        .unwrap_err();
    assert!(matches!(err, Error::FilenameClash { .. }));
    assert_eq!(pool.len(), 1);
}

#[test]
fn test_template_error_is_encoding_failure() {
    let mut pool = FilePool::default();
    let err = pool
        .add("bad.tf", Template::new("{% if %}", (), CommentStyle::DoubleSlash))
        .unwrap_err();
    assert!(matches!(err, Error::EncodingFailure { .. }));
    assert!(pool.is_empty());
}

#[test]
fn test_add_through_mutable_reference() {
    let mut pool = FilePool::default();
    let mut encoder = Yaml::new(&kv("k", "v"));
    pool.add("x.yaml", &mut encoder).unwrap();
    assert_eq!(pool.get("x.yaml"), Some(&b"k: v\n"[..]));
}
