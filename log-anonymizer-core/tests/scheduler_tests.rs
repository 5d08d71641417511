// log-anonymizer-core/tests/scheduler_tests.rs
//! End-to-end runs of the worker pool on temporary trees.

use anyhow::Result;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::tempdir;

use log_anonymizer_core::{
    discover_anonymized, AnonymizerConfiguration, ConfigStore, LogFile, Scheduler,
    SchedulerOptions, MAX_LINE_LENGTH,
};

const CONFIG: &str = r#"
anonymizer:
  - axcVersion: default
    logs:
      - kind: engine
        namingPatterns: ['^engine-\d+\.log$']
        regexPatterns: ['user=(\w+)', 'host=(\w+):(\d+)']
      - kind: nameless
        namingPatterns: ['^nameless\.log$']
"#;

fn store() -> Result<Arc<ConfigStore>> {
    let config: AnonymizerConfiguration = serde_yml::from_str(CONFIG)?;
    Ok(Arc::new(ConfigStore::activate(config.select("default")?.clone())?))
}

fn scheduler(workers: usize, token: &str) -> Result<Scheduler> {
    Ok(Scheduler::new(
        store()?,
        SchedulerOptions {
            worker_count: workers,
            obfuscation: token.to_string(),
        },
    ))
}

/// Maps each output's source name to its content.
fn outputs_by_source(root: &Path) -> Result<BTreeMap<String, String>> {
    let mut map = BTreeMap::new();
    for path in discover_anonymized(root)? {
        let name = path.to_string_lossy().into_owned();
        let source = name
            .split(".anonymized.")
            .next()
            .unwrap_or_default()
            .to_string();
        map.insert(source, fs::read_to_string(&path)?);
    }
    Ok(map)
}

#[test_log::test(tokio::test(flavor = "multi_thread", worker_threads = 2))]
async fn test_single_line_is_redacted() -> Result<()> {
    let dir = tempdir()?;
    let input = dir.path().join("engine-01.log");
    fs::write(&input, "ts=1 user=alice action=login\n")?;

    let report = scheduler(2, "X")?.run(dir.path(), "*").await?;
    assert_eq!(report.outputs.len(), 1);
    assert_eq!(report.failed, 0);

    let output = &report.outputs[0];
    let name = output.file_name().unwrap().to_string_lossy().into_owned();
    let ts = name.strip_prefix("engine-01.log.anonymized.").unwrap();
    assert_eq!(ts.len(), "YYYYMMDD-HHMMSS".len());
    assert_eq!(ts.as_bytes()[8], b'-');
    assert!(ts.chars().enumerate().all(|(i, c)| i == 8 || c.is_ascii_digit()));

    assert_eq!(fs::read_to_string(output)?, "ts=1 user=X action=login\n");
    assert_eq!(fs::read_to_string(&input)?, "ts=1 user=alice action=login\n");
    Ok(())
}

#[test_log::test(tokio::test(flavor = "multi_thread", worker_threads = 2))]
async fn test_unmatched_content_is_copied() -> Result<()> {
    let dir = tempdir()?;
    fs::write(dir.path().join("engine-01.log"), "no match here")?;

    let report = scheduler(1, "X")?.run(dir.path(), "*").await?;
    assert_eq!(fs::read_to_string(&report.outputs[0])?, "no match here\n");
    Ok(())
}

#[test_log::test(tokio::test(flavor = "multi_thread", worker_threads = 2))]
async fn test_crlf_and_multiple_patterns() -> Result<()> {
    let dir = tempdir()?;
    fs::write(
        dir.path().join("engine-02.log"),
        "user=bob a host=db:5432 b\r\nplain\r\n",
    )?;

    let report = scheduler(2, "Z")?.run(dir.path(), "*").await?;
    assert_eq!(
        fs::read_to_string(&report.outputs[0])?,
        "user=Z a host=Z:Z b\nplain\n"
    );
    Ok(())
}

#[test_log::test(tokio::test(flavor = "multi_thread", worker_threads = 2))]
async fn test_non_utf8_bytes_are_copied_verbatim() -> Result<()> {
    let dir = tempdir()?;
    fs::write(
        dir.path().join("engine-03.log"),
        b"caf\xe9 no match\nname=\xe9t\xe9 user=alice\r\n".as_slice(),
    )?;

    let report = scheduler(1, "X")?.run(dir.path(), "*").await?;
    assert_eq!(report.failed, 0);
    assert_eq!(
        fs::read(&report.outputs[0])?,
        b"caf\xe9 no match\nname=\xe9t\xe9 user=X\n".to_vec()
    );
    Ok(())
}

#[test_log::test(tokio::test(flavor = "multi_thread", worker_threads = 2))]
async fn test_second_run_produces_nothing_new() -> Result<()> {
    let dir = tempdir()?;
    fs::write(dir.path().join("engine-01.log"), "user=a\n")?;
    fs::write(dir.path().join("engine-02.log"), "user=b\n")?;

    let s = scheduler(2, "X")?;
    let first = s.run(dir.path(), "*").await?;
    assert_eq!(first.outputs.len(), 2);

    let second = s.run(dir.path(), "*").await?;
    // Inputs are re-anonymized, but outputs are never taken as inputs.
    assert_eq!(second.outputs.len(), 2);
    assert!(second
        .outputs
        .iter()
        .all(|p| p.to_string_lossy().matches(".anonymized.").count() == 1));
    Ok(())
}

#[test_log::test(tokio::test(flavor = "multi_thread", worker_threads = 4))]
async fn test_worker_count_does_not_change_results() -> Result<()> {
    let mut results = Vec::new();
    for workers in [1usize, 2, 7] {
        let dir = tempdir()?;
        for i in 0..12 {
            fs::write(
                dir.path().join(format!("engine-{:02}.log", i)),
                format!("user=u{} seq={}\nhost=h{}:{} end\n", i, i, i, 1000 + i),
            )?;
        }
        let report = scheduler(workers, "#")?.run(dir.path(), "*").await?;
        assert_eq!(report.outputs.len(), 12);

        let by_name: BTreeMap<String, String> = outputs_by_source(dir.path())?
            .into_iter()
            .map(|(src, content)| {
                let name = Path::new(&src).file_name().unwrap().to_string_lossy().into_owned();
                (name, content)
            })
            .collect();
        results.push(by_name);
    }
    assert_eq!(results[0], results[1]);
    assert_eq!(results[1], results[2]);
    assert_eq!(results[0]["engine-03.log"], "user=# seq=3\nhost=#:# end\n");
    Ok(())
}

#[test_log::test(tokio::test(flavor = "multi_thread", worker_threads = 2))]
async fn test_kind_without_patterns_is_skipped() -> Result<()> {
    let dir = tempdir()?;
    fs::write(dir.path().join("nameless.log"), "user=a\n")?;
    fs::write(dir.path().join("engine-01.log"), "user=a\n")?;

    let report = scheduler(2, "X")?.run(dir.path(), "*").await?;
    assert_eq!(report.outputs.len(), 1);
    assert_eq!(report.failed, 1);
    Ok(())
}

#[test_log::test(tokio::test(flavor = "multi_thread", worker_threads = 2))]
async fn test_missing_input_fails_only_that_file() -> Result<()> {
    let dir = tempdir()?;
    let present = dir.path().join("engine-01.log");
    fs::write(&present, "user=a\n")?;

    let files = vec![
        LogFile { absolute_path: dir.path().join("engine-99.log"), kind: "engine".into() },
        LogFile { absolute_path: present, kind: "engine".into() },
    ];
    let report = scheduler(2, "X")?.process(files).await;
    assert_eq!(report.outputs.len(), 1);
    assert_eq!(report.failed, 1);
    Ok(())
}

#[test_log::test(tokio::test(flavor = "multi_thread", worker_threads = 2))]
async fn test_overlong_line_aborts_file_and_keeps_partial_output() -> Result<()> {
    let dir = tempdir()?;
    let long = "x".repeat(MAX_LINE_LENGTH + 10);
    fs::write(dir.path().join("engine-01.log"), format!("user=a\n{}\nuser=b\n", long))?;

    let report = scheduler(1, "X")?.run(dir.path(), "*").await?;
    assert_eq!(report.failed, 1);
    assert!(report.outputs.is_empty());

    let partial = discover_anonymized(dir.path())?;
    assert_eq!(partial.len(), 1);
    Ok(())
}

#[test_log::test(tokio::test(flavor = "multi_thread", worker_threads = 2))]
async fn test_cleanup_removes_only_outputs() -> Result<()> {
    let dir = tempdir()?;
    let input = dir.path().join("engine-01.log");
    fs::write(&input, "user=alice\n")?;
    fs::create_dir_all(dir.path().join("sub"))?;
    fs::write(dir.path().join("sub/engine-02.log"), "user=bob\n")?;

    let report = scheduler(2, "X")?.run(dir.path(), "*").await?;
    assert_eq!(report.outputs.len(), 2);

    let cleaned = Scheduler::cleanup(dir.path()).await?;
    assert_eq!(cleaned.removed.len(), 2);
    assert_eq!(cleaned.failed, 0);
    assert!(discover_anonymized(dir.path())?.is_empty());
    assert!(input.exists());
    assert!(dir.path().join("sub/engine-02.log").exists());
    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_cleanup_on_clean_tree_is_ok() -> Result<()> {
    let dir = tempdir()?;
    fs::write(dir.path().join("engine-01.log"), "user=alice\n")?;
    let cleaned = Scheduler::cleanup(dir.path()).await?;
    assert!(cleaned.removed.is_empty());
    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_empty_input_list_finishes() -> Result<()> {
    let report = scheduler(3, "X")?.process(Vec::new()).await;
    assert!(report.outputs.is_empty());
    assert_eq!(report.failed, 0);
    Ok(())
}
