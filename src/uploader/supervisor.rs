//! Upload-service subprocess supervision.
//!
//! # Responsibilities
//! - Spawn the upload service with its fixed argument set
//! - Stream child stdout/stderr into the gateway log, tagged by origin
//! - Observe child exit: log the code, never restart
//! - Expose a single terminate() capability to the gateway
//!
//! # Design Decisions
//! - The monitor task exclusively owns the Child handle; nothing else
//!   touches the process after spawn
//! - terminate() is best-effort and returns without waiting for exit; the
//!   shutdown path that needs ordering calls wait_for_exit() afterwards
//! - The child never outlives the gateway: kill_on_drop covers the case
//!   where the runtime tears the monitor task down before it can deliver
//!   the kill itself
//! - A spawn failure is fatal for the whole gateway

use std::io;
use std::process::Stdio;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::sync::watch;

use crate::config::schema::UploaderConfig;
use crate::lifecycle::Shutdown;

/// Lifecycle state of the supervised upload service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadState {
    /// Spawn requested, process not yet confirmed running.
    Starting,
    /// Child process is alive.
    Running,
    /// Child process has exited; carries the exit code when the OS reported
    /// one (killed-by-signal exits carry none).
    Exited(Option<i32>),
}

/// Owner of the external upload-service process.
///
/// Created once at startup; the gateway holds it only to request
/// termination during shutdown.
pub struct UploadSupervisor {
    pid: Option<u32>,
    terminate: Shutdown,
    state: watch::Receiver<UploadState>,
}

impl UploadSupervisor {
    /// Spawn the upload service and begin supervising it.
    ///
    /// The child is launched with the fixed argument set the service expects
    /// when all of its traffic arrives through the gateway's proxy: an
    /// upload storage directory, a hooks directory, and the behind-proxy
    /// flag that makes it trust forwarded headers.
    pub fn spawn(config: &UploaderConfig) -> io::Result<Self> {
        let (state_tx, state_rx) = watch::channel(UploadState::Starting);

        let mut child = Command::new(&config.binary)
            .arg("-upload-dir")
            .arg(&config.upload_dir)
            .arg("-hooks-dir")
            .arg(&config.hooks_dir)
            .arg("-behind-proxy")
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // A quiet child must not survive runtime teardown: if the
            // monitor task is dropped before it delivers the kill, dropping
            // the handle kills the process instead.
            .kill_on_drop(true)
            .spawn()?;

        let pid = child.id();
        let _ = state_tx.send(UploadState::Running);

        tracing::info!(
            binary = %config.binary,
            pid = ?pid,
            upload_dir = %config.upload_dir.display(),
            "Upload service started"
        );

        // Drain both output streams on their own tasks so slow or chatty
        // child output never stalls request routing.
        if let Some(stdout) = child.stdout.take() {
            tokio::spawn(forward_output(stdout, "stdout"));
        }
        if let Some(stderr) = child.stderr.take() {
            tokio::spawn(forward_output(stderr, "stderr"));
        }

        let terminate = Shutdown::new();
        let mut stop = terminate.subscribe();

        tokio::spawn(async move {
            let status = tokio::select! {
                status = child.wait() => status,
                _ = stop.recv() => {
                    // Best-effort kill; if the child already exited this
                    // fails and wait() below returns the real status.
                    if let Err(e) = child.start_kill() {
                        tracing::debug!(error = %e, "Upload service already gone");
                    }
                    child.wait().await
                }
            };

            match status {
                Ok(status) => {
                    let code = status.code();
                    tracing::warn!(code = ?code, "Upload service exited");
                    let _ = state_tx.send(UploadState::Exited(code));
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to observe upload service exit");
                    let _ = state_tx.send(UploadState::Exited(None));
                }
            }
        });

        Ok(Self {
            pid,
            terminate,
            state: state_rx,
        })
    }

    /// Request termination of the upload service.
    ///
    /// Returns immediately; the monitor task delivers the kill and reaps
    /// the child. Safe to call when the child has already exited and safe
    /// to call more than once.
    pub fn terminate(&self) {
        tracing::info!(pid = ?self.pid, "Terminating upload service");
        self.terminate.trigger();
    }

    /// Wait until the child has exited, up to `timeout`.
    ///
    /// Returns `true` when the child is gone. Used by the shutdown path to
    /// guarantee the parent never exits while the child is still running.
    pub async fn wait_for_exit(&self, timeout: Duration) -> bool {
        let mut state = self.state.clone();
        tokio::time::timeout(timeout, async move {
            while !matches!(*state.borrow_and_update(), UploadState::Exited(_)) {
                if state.changed().await.is_err() {
                    break;
                }
            }
        })
        .await
        .is_ok()
    }

    /// OS process id of the child.
    pub fn pid(&self) -> Option<u32> {
        self.pid
    }

    /// Current lifecycle state of the child.
    pub fn state(&self) -> UploadState {
        *self.state.borrow()
    }
}

/// Re-emit one child output stream into the gateway log, line by line.
async fn forward_output<R>(stream: R, origin: &'static str)
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(stream).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        if origin == "stderr" {
            tracing::warn!(stream = origin, "{}", line);
        } else {
            tracing::info!(stream = origin, "{}", line);
        }
    }
}
