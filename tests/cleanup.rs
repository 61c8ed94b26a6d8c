// ABOUTME: Integration tests for cgroup cleanup execution.
// ABOUTME: Covers idempotence, empty sets, and abort-on-first-failure.

mod support;

use reclaim::cgroups::{HostCgroupFs, ResourcePathSet, cleanup};
use std::path::PathBuf;
use support::fakes::{Call, RecordingFs, Trace};

#[tokio::test]
async fn empty_set_touches_nothing() {
    support::init_tracing();
    let trace = Trace::default();
    let fs = RecordingFs::new(&trace);

    let outcome = cleanup(&fs, &ResourcePathSet::empty()).await.unwrap();

    assert!(outcome.removed.is_empty());
    assert!(outcome.already_absent.is_empty());
    assert!(trace.calls().is_empty());
}

#[tokio::test]
async fn first_failure_aborts_remaining_paths() {
    support::init_tracing();
    let trace = Trace::default();
    let mut fs = RecordingFs::new(&trace);
    let paths: Vec<PathBuf> = ["memory", "cpu", "pids"]
        .iter()
        .map(|c| PathBuf::from("/sys/fs/cgroup").join(c).join("c1"))
        .collect();
    fs.fail_on.insert(paths[1].clone());

    let err = cleanup(&fs, &ResourcePathSet::from(paths.clone()))
        .await
        .unwrap_err();

    assert_eq!(err.path(), paths[1].as_path());
    assert_eq!(
        trace.calls(),
        vec![Call::Remove(paths[0].clone()), Call::Remove(paths[1].clone())]
    );
}

#[tokio::test]
async fn host_cleanup_is_idempotent() {
    support::init_tracing();
    let root = tempfile::tempdir().unwrap();
    let memory = root.path().join("memory/reclaim/c1");
    let cpu = root.path().join("cpu/reclaim/c1");
    std::fs::create_dir_all(memory.join("nested/deeper")).unwrap();
    std::fs::create_dir_all(&cpu).unwrap();
    std::fs::write(cpu.join("cgroup.procs"), "").unwrap();
    let set = ResourcePathSet::from(vec![memory.clone(), cpu.clone()]);

    let first = cleanup(&HostCgroupFs, &set).await.unwrap();
    assert_eq!(first.removed, vec![memory.clone(), cpu.clone()]);
    assert!(!memory.exists());
    assert!(!cpu.exists());

    let second = cleanup(&HostCgroupFs, &set).await.unwrap();
    assert!(second.removed.is_empty());
    assert_eq!(second.already_absent, vec![memory, cpu]);
    // Parents outside the set are left alone.
    assert!(root.path().join("memory/reclaim").exists());
}
