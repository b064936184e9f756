// src/exec/kill.rs

//! Forced termination of a process and everything it spawned.

use tracing::debug;

/// Kill the process group led by `pid`.
///
/// Processes are spawned as group leaders, so this also reaches their
/// descendants. A group that no longer exists is not an error.
#[cfg(unix)]
pub fn kill_process_tree(pid: u32) {
    use nix::errno::Errno;
    use nix::sys::signal::{Signal, kill};
    use nix::unistd::Pid;

    let Ok(raw) = i32::try_from(pid) else {
        return;
    };
    if raw <= 0 {
        return;
    }

    match kill(Pid::from_raw(-raw), Signal::SIGKILL) {
        Ok(()) => debug!(pid, "sent SIGKILL to process group"),
        Err(Errno::ESRCH) => debug!(pid, "process group already gone"),
        Err(err) => debug!(pid, error = %err, "failed to kill process group"),
    }
}

/// Kill `pid` and its child processes with `taskkill /T /F`.
#[cfg(windows)]
pub fn kill_process_tree(pid: u32) {
    let result = std::process::Command::new("taskkill")
        .args(["/T", "/F", "/PID", &pid.to_string()])
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status();
    if let Err(err) = result {
        debug!(pid, error = %err, "taskkill failed");
    }
}

#[cfg(not(any(unix, windows)))]
pub fn kill_process_tree(pid: u32) {
    debug!(pid, "process tree kill not supported on this platform");
}
