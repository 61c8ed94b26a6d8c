// ABOUTME: Diagnostics accumulator for non-fatal notes during deletion.
// ABOUTME: Collects notes that shouldn't fail a deletion but should be shown to users.

use crate::delete::DeletionReport;

/// Collects non-fatal warnings during a batch of deletions.
#[derive(Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Record a warning, auto-logging it via tracing.
    pub fn warn(&mut self, warning: Warning) {
        tracing::warn!("{}", warning.message);
        self.warnings.push(warning);
    }

    /// Record the notes a successful deletion carries.
    pub fn record(&mut self, report: &DeletionReport) {
        for path in &report.cgroups.already_absent {
            self.warn(Warning::cgroup_absent(format!(
                "cgroup path {} of {} was already removed",
                path.display(),
                report.container_id
            )));
        }
    }

    /// Get all collected warnings.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Check if any warnings were collected.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// A non-fatal warning collected during deletion.
#[derive(Debug, Clone)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

impl Warning {
    /// Create a warning for a cgroup path that was gone before cleanup.
    pub fn cgroup_absent(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::CgroupAbsent,
            message: message.into(),
        }
    }
}

/// Categories of warnings that can occur during deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// A cgroup path had already been removed by someone else.
    CgroupAbsent,
}
