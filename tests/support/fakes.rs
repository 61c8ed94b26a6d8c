// ABOUTME: Recording fakes for the sandbox runtime, translator, probe, and cgroup fs.
// ABOUTME: All fakes append to one shared trace so tests can assert call order.

use std::collections::{HashMap, HashSet};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use reclaim::cgroups::{CgroupFs, CgroupLayout, CgroupResolver};
use reclaim::delete::DeleteContext;
use reclaim::liveness::{LookupError, ProcessProbe};
use reclaim::oci::{
    AnnotationTranslator, BUNDLE_PATH_ANNOTATION, CONFIG_JSON_ANNOTATION, OciConfig, OciState,
    OciTranslator, TranslationError,
};
use reclaim::runtime::{
    SandboxError, SandboxHandle, SandboxOps, SandboxPhase, SandboxStatus, SandboxSummary,
};
use reclaim::types::ContainerId;

pub const CGROUP_ROOT: &str = "/sys/fs/cgroup";

/// One observed collaborator call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List,
    FetchStatus(String),
    StateOf(String),
    Probe(u32),
    Stop(String),
    ConfigOf(String),
    Delete(String),
    Remove(PathBuf),
}

/// Shared, ordered log of calls.
#[derive(Debug, Clone, Default)]
pub struct Trace(Arc<Mutex<Vec<Call>>>);

impl Trace {
    pub fn push(&self, call: Call) {
        self.0.lock().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.0.lock().clone()
    }

    pub fn position(&self, pred: impl Fn(&Call) -> bool) -> Option<usize> {
        self.0.lock().iter().position(pred)
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.0.lock().iter().filter(|c| pred(c)).count()
    }
}

/// Build a sandbox status with bundle and OCI config annotations.
pub fn sandbox(id: &str, phase: SandboxPhase, pid: u32, config_json: &str) -> SandboxStatus {
    SandboxStatus {
        id: ContainerId::new(id).unwrap(),
        phase,
        pid,
        created_at: None,
        annotations: HashMap::from([
            (BUNDLE_PATH_ANNOTATION.to_string(), format!("/run/bundles/{id}")),
            (CONFIG_JSON_ANNOTATION.to_string(), config_json.to_string()),
        ]),
    }
}

/// OCI config JSON declaring the given controllers under `cgroups_path`.
pub fn config_json(cgroups_path: &str, controllers: &[&str]) -> String {
    let mut resources = serde_json::Map::new();
    for controller in controllers {
        let (key, value) = match *controller {
            "memory" => ("memory", serde_json::json!({"limit": 536870912})),
            "cpu" => ("cpu", serde_json::json!({"shares": 512})),
            "pids" => ("pids", serde_json::json!({"limit": 64})),
            "blkio" => ("blockIO", serde_json::json!({"weight": 100})),
            "net_cls" => ("network", serde_json::json!({"classID": 1})),
            other => panic!("unsupported controller in test: {other}"),
        };
        resources.insert(key.to_string(), value);
    }

    serde_json::json!({
        "ociVersion": "1.0.2",
        "linux": {
            "cgroupsPath": cgroups_path,
            "resources": resources,
        }
    })
    .to_string()
}

/// In-memory sandbox runtime.
pub struct FakeSandboxes {
    trace: Trace,
    sandboxes: Mutex<HashMap<String, SandboxStatus>>,
    pub fail_status: bool,
    pub fail_stop: bool,
    pub fail_delete: bool,
}

impl FakeSandboxes {
    pub fn new(trace: &Trace) -> Self {
        Self {
            trace: trace.clone(),
            sandboxes: Mutex::new(HashMap::new()),
            fail_status: false,
            fail_stop: false,
            fail_delete: false,
        }
    }

    pub fn insert(&self, status: SandboxStatus) {
        self.sandboxes
            .lock()
            .insert(status.id.as_str().to_string(), status);
    }

    pub fn contains(&self, id: &str) -> bool {
        self.sandboxes.lock().contains_key(id)
    }

    pub fn phase(&self, id: &str) -> Option<SandboxPhase> {
        self.sandboxes.lock().get(id).map(|s| s.phase)
    }
}

#[async_trait]
impl SandboxOps for FakeSandboxes {
    async fn list_sandboxes(&self) -> Result<Vec<SandboxSummary>, SandboxError> {
        self.trace.push(Call::List);
        Ok(self.sandboxes.lock().values().map(|s| s.summary()).collect())
    }

    async fn fetch_status(&self, id: &ContainerId) -> Result<SandboxStatus, SandboxError> {
        self.trace.push(Call::FetchStatus(id.to_string()));
        if self.fail_status {
            return Err(SandboxError::Runtime("status unavailable".to_string()));
        }
        self.sandboxes
            .lock()
            .get(id.as_str())
            .cloned()
            .ok_or_else(|| SandboxError::NotFound(id.to_string()))
    }

    async fn stop_sandbox(&self, id: &ContainerId) -> Result<SandboxHandle, SandboxError> {
        self.trace.push(Call::Stop(id.to_string()));
        if self.fail_stop {
            return Err(SandboxError::Runtime("stop failed".to_string()));
        }
        let mut sandboxes = self.sandboxes.lock();
        let status = sandboxes
            .get_mut(id.as_str())
            .ok_or_else(|| SandboxError::NotFound(id.to_string()))?;
        status.phase = SandboxPhase::Stopped;
        status.pid = 0;
        Ok(status.handle())
    }

    async fn delete_sandbox(&self, id: &ContainerId) -> Result<(), SandboxError> {
        self.trace.push(Call::Delete(id.to_string()));
        if self.fail_delete {
            return Err(SandboxError::Runtime("delete failed".to_string()));
        }
        self.sandboxes
            .lock()
            .remove(id.as_str())
            .map(|_| ())
            .ok_or_else(|| SandboxError::NotFound(id.to_string()))
    }
}

/// Annotation translator that records each call.
pub struct RecordingTranslator {
    trace: Trace,
}

impl RecordingTranslator {
    pub fn new(trace: &Trace) -> Self {
        Self {
            trace: trace.clone(),
        }
    }
}

impl OciTranslator for RecordingTranslator {
    fn state_of(&self, status: &SandboxStatus) -> Result<OciState, TranslationError> {
        self.trace.push(Call::StateOf(status.id.to_string()));
        AnnotationTranslator.state_of(status)
    }

    fn config_of(&self, handle: &SandboxHandle) -> Result<OciConfig, TranslationError> {
        self.trace.push(Call::ConfigOf(handle.id.to_string()));
        AnnotationTranslator.config_of(handle)
    }
}

/// Liveness probe with a fixed answer.
pub struct FakeProbe {
    trace: Trace,
    pub answer: Result<bool, LookupError>,
}

impl FakeProbe {
    pub fn new(trace: &Trace) -> Self {
        Self {
            trace: trace.clone(),
            answer: Ok(false),
        }
    }
}

impl ProcessProbe for FakeProbe {
    fn is_running(&self, pid: u32) -> Result<bool, LookupError> {
        self.trace.push(Call::Probe(pid));
        self.answer.clone()
    }
}

/// Cgroup filesystem that records removals instead of touching disk.
pub struct RecordingFs {
    trace: Trace,
    pub fail_on: HashSet<PathBuf>,
    pub missing: HashSet<PathBuf>,
}

impl RecordingFs {
    pub fn new(trace: &Trace) -> Self {
        Self {
            trace: trace.clone(),
            fail_on: HashSet::new(),
            missing: HashSet::new(),
        }
    }
}

#[async_trait]
impl CgroupFs for RecordingFs {
    async fn remove_all(&self, path: &Path) -> std::io::Result<()> {
        self.trace.push(Call::Remove(path.to_path_buf()));
        if self.fail_on.contains(path) {
            return Err(std::io::Error::other("device or resource busy"));
        }
        if self.missing.contains(path) {
            return Err(ErrorKind::NotFound.into());
        }
        Ok(())
    }
}

/// All fakes wired to one trace.
pub struct Harness {
    pub trace: Trace,
    pub sandboxes: FakeSandboxes,
    pub translator: RecordingTranslator,
    pub probe: FakeProbe,
    pub resolver: CgroupResolver,
    pub fs: RecordingFs,
}

impl Harness {
    pub fn new() -> Self {
        let trace = Trace::default();
        Self {
            sandboxes: FakeSandboxes::new(&trace),
            translator: RecordingTranslator::new(&trace),
            probe: FakeProbe::new(&trace),
            resolver: CgroupResolver::new(CGROUP_ROOT, CgroupLayout::V1),
            fs: RecordingFs::new(&trace),
            trace,
        }
    }

    pub fn ctx(&self) -> DeleteContext<'_> {
        DeleteContext {
            sandboxes: &self.sandboxes,
            translator: &self.translator,
            probe: &self.probe,
            resolver: &self.resolver,
            cgroup_fs: &self.fs,
        }
    }
}

/// Path the v1 resolver produces for `controller` under [`CGROUP_ROOT`].
pub fn cgroup_path(controller: &str, cgroups_path: &str) -> PathBuf {
    Path::new(CGROUP_ROOT)
        .join(controller)
        .join(cgroups_path.trim_start_matches('/'))
}
