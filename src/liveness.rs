// ABOUTME: Process liveness checks used before a non-forced delete.
// ABOUTME: Distinguishes "no such process" from lookups that genuinely failed.

use nix::errno::Errno;
use nix::sys::signal::kill;
use nix::unistd::Pid;

/// Liveness lookup that could not be answered.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("pid {0} is not a valid process ID")]
    InvalidPid(u32),

    #[error("failed to look up process {pid}: {errno}")]
    Failed { pid: u32, errno: Errno },
}

/// Answers whether a process is currently running.
pub trait ProcessProbe: Send + Sync {
    /// `Ok(false)` only when the process is known not to exist.
    fn is_running(&self, pid: u32) -> Result<bool, LookupError>;
}

/// Probes processes with kill(2) and no signal.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignalProbe;

impl ProcessProbe for SignalProbe {
    fn is_running(&self, pid: u32) -> Result<bool, LookupError> {
        if pid == 0 {
            return Ok(false);
        }

        let raw = i32::try_from(pid).map_err(|_| LookupError::InvalidPid(pid))?;
        interpret(pid, kill(Pid::from_raw(raw), None))
    }
}

/// Map a kill(2) probe result onto liveness.
///
/// EPERM means the process exists but belongs to someone else.
fn interpret(pid: u32, probe: nix::Result<()>) -> Result<bool, LookupError> {
    match probe {
        Ok(()) | Err(Errno::EPERM) => Ok(true),
        Err(Errno::ESRCH) => Ok(false),
        Err(errno) => Err(LookupError::Failed { pid, errno }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pid_zero_is_not_running() {
        assert_eq!(SignalProbe.is_running(0), Ok(false));
    }

    #[test]
    fn own_process_is_running() {
        assert_eq!(SignalProbe.is_running(std::process::id()), Ok(true));
    }

    #[test]
    fn out_of_range_pid_is_a_lookup_error() {
        assert_eq!(
            SignalProbe.is_running(u32::MAX),
            Err(LookupError::InvalidPid(u32::MAX))
        );
    }

    #[test]
    fn reaped_child_is_not_running() {
        let mut child = std::process::Command::new("true").spawn().unwrap();
        let pid = child.id();
        child.wait().unwrap();
        assert_eq!(SignalProbe.is_running(pid), Ok(false));
    }

    #[test]
    fn errno_mapping() {
        assert_eq!(interpret(7, Ok(())), Ok(true));
        assert_eq!(interpret(7, Err(Errno::EPERM)), Ok(true));
        assert_eq!(interpret(7, Err(Errno::ESRCH)), Ok(false));
        assert_eq!(
            interpret(7, Err(Errno::EINVAL)),
            Err(LookupError::Failed {
                pid: 7,
                errno: Errno::EINVAL
            })
        );
    }
}
