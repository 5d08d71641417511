// log-anonymizer-core/tests/discovery_tests.rs
//! Walks over real temporary trees.

use anyhow::Result;
use std::fs;
use std::path::Path;
use tempfile::tempdir;
use test_log::test;

use log_anonymizer_core::{
    discover, discover_anonymized, AnonymizerConfiguration, AnonymizerError, ConfigStore,
};

fn engine_store() -> Result<ConfigStore> {
    let yaml = r#"
anonymizer:
  - axcVersion: default
    logs:
      - kind: engine
        namingPatterns: ['^engine-\d+\.log$']
        regexPatterns: ['user=(\w+)']
      - kind: access
        namingPatterns: ['^access.*\.log$']
        regexPatterns: ['ip=(\S+)']
"#;
    let config: AnonymizerConfiguration = serde_yml::from_str(yaml)?;
    Ok(ConfigStore::activate(config.select("default")?.clone())?)
}

fn touch(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, "line\n")?;
    Ok(())
}

#[test]
fn test_discover_identifies_and_skips() -> Result<()> {
    let store = engine_store()?;
    let dir = tempdir()?;
    touch(&dir.path().join("engine-01.log"))?;
    touch(&dir.path().join("nested/deeper/access.log"))?;
    touch(&dir.path().join("readme.txt"))?;
    touch(&dir.path().join("engine-01.log.anonymized.20240101-000000"))?;

    let mut files = discover(&store, dir.path(), "*")?;
    files.sort_by(|a, b| a.absolute_path.cmp(&b.absolute_path));

    assert_eq!(files.len(), 2);
    assert!(files.iter().all(|f| f.absolute_path.is_absolute()));
    let kinds: Vec<_> = files.iter().map(|f| f.kind.as_str()).collect();
    assert!(kinds.contains(&"engine"));
    assert!(kinds.contains(&"access"));
    assert!(files.iter().all(|f| !f.absolute_path.to_string_lossy().contains("readme")));
    Ok(())
}

#[test]
fn test_forced_kind_takes_every_non_output_file() -> Result<()> {
    let store = engine_store()?;
    let dir = tempdir()?;
    touch(&dir.path().join("anything.log"))?;
    touch(&dir.path().join("readme.txt"))?;
    touch(&dir.path().join("anything.log.anonymized.20240101-000000"))?;

    let files = discover(&store, dir.path(), "engine")?;
    assert_eq!(files.len(), 2);
    assert!(files.iter().all(|f| f.kind == "engine"));
    Ok(())
}

#[test]
fn test_single_file_root() -> Result<()> {
    let store = engine_store()?;
    let dir = tempdir()?;
    let file = dir.path().join("engine-42.log");
    touch(&file)?;

    let files = discover(&store, &file, "*")?;
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].kind, "engine");
    Ok(())
}

#[test]
fn test_missing_root_aborts_the_walk() -> Result<()> {
    let store = engine_store()?;
    let dir = tempdir()?;
    let err = discover(&store, &dir.path().join("missing"), "*").unwrap_err();
    assert!(matches!(err, AnonymizerError::Walk(_)));
    Ok(())
}

#[test]
fn test_discover_anonymized_keeps_only_outputs() -> Result<()> {
    let dir = tempdir()?;
    touch(&dir.path().join("engine-01.log"))?;
    touch(&dir.path().join("engine-01.log.anonymized.20240101-000000"))?;
    touch(&dir.path().join("sub/access.log.anonymized.20240101-000000.1"))?;

    let outputs = discover_anonymized(dir.path())?;
    assert_eq!(outputs.len(), 2);
    assert!(outputs
        .iter()
        .all(|p| p.is_absolute() && p.to_string_lossy().contains(".anonymized.")));
    Ok(())
}
