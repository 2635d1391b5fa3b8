//! Process execution adapter for the external worker.
//!
//! One call spawns the launcher with the requested process count, feeds the
//! protocol script on stdin, captures both output streams and waits for exit.
//! The child is killed and reaped on every path that does not end in a
//! normal exit. The timeout covers the whole invocation, including draining
//! output that processes spawned by the launcher may keep open.

use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use parbench_core::cancel::CancellationToken;
use parbench_core::constants::{DEFAULT_LAUNCHER, DEFAULT_NP_FLAG, DEFAULT_WORKER};
use parbench_core::error::{BenchError, TrialContext};
use parbench_core::protocol::WorkerRequest;

/// How often a running worker is checked for exit, timeout and cancellation.
const POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Captured result of one successful worker invocation.
#[derive(Debug, Clone)]
pub struct WorkerOutput {
    pub stdout: String,
    pub stderr: String,
    /// Wall-clock time of the whole invocation, launcher included.
    pub wall_time: Duration,
}

/// Something that can execute a worker request with a given parallelism.
pub trait Worker {
    /// Run `request` once with `context.processes` participants.
    fn run(&self, request: &WorkerRequest, context: &TrialContext)
        -> Result<WorkerOutput, BenchError>;
}

/// `<launcher> [launcher args...] <np flag> <p> <worker>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchCommand {
    pub launcher: String,
    pub launcher_args: Vec<String>,
    pub np_flag: String,
    pub worker: PathBuf,
}

impl Default for LaunchCommand {
    fn default() -> Self {
        Self {
            launcher: DEFAULT_LAUNCHER.to_string(),
            launcher_args: Vec::new(),
            np_flag: DEFAULT_NP_FLAG.to_string(),
            worker: PathBuf::from(DEFAULT_WORKER),
        }
    }
}

impl LaunchCommand {
    /// Arguments passed to the launcher for `processes` participants.
    #[must_use]
    pub fn args(&self, processes: u32) -> Vec<String> {
        self.args_with(processes.to_string())
    }

    /// Human-readable command line, for logs.
    #[must_use]
    pub fn describe(&self, processes: u32) -> String {
        self.render(processes.to_string())
    }

    /// Command line with the process count shown as `<p>`.
    #[must_use]
    pub fn template(&self) -> String {
        self.render("<p>".to_string())
    }

    fn args_with(&self, processes: String) -> Vec<String> {
        let mut args = self.launcher_args.clone();
        args.push(self.np_flag.clone());
        args.push(processes);
        args.push(self.worker.display().to_string());
        args
    }

    fn render(&self, processes: String) -> String {
        let mut parts = vec![self.launcher.clone()];
        parts.extend(self.args_with(processes));
        parts.join(" ")
    }

    fn command(&self, processes: u32) -> Command {
        let mut cmd = Command::new(&self.launcher);
        cmd.args(self.args(processes))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }
}

/// Runs the worker as a real child process.
pub struct ProcessWorker {
    command: LaunchCommand,
    timeout: Option<Duration>,
    cancel: CancellationToken,
}

impl ProcessWorker {
    #[must_use]
    pub fn new(command: LaunchCommand) -> Self {
        Self {
            command,
            timeout: None,
            cancel: CancellationToken::new(),
        }
    }

    /// Kill the worker and fail the trial once `timeout` elapses.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Kill the worker and fail the trial when `cancel` fires.
    #[must_use]
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    #[must_use]
    pub fn command(&self) -> &LaunchCommand {
        &self.command
    }

    fn wait(
        &self,
        guard: &mut ChildGuard,
        start: Instant,
        context: &TrialContext,
    ) -> Result<ExitStatus, BenchError> {
        loop {
            match guard.try_wait() {
                Ok(Some(status)) => return Ok(status),
                Ok(None) => {}
                Err(e) => {
                    return Err(BenchError::Execution {
                        context: context.clone(),
                        status: format!("wait failed: {e}"),
                        stderr: String::new(),
                    })
                }
            }

            if let Err(e) = self.check_limits(start, context) {
                guard.terminate();
                return Err(e);
            }
            thread::sleep(POLL_INTERVAL);
        }
    }

    /// Wait for a reader to reach end of stream within the same deadline.
    fn drain(
        &self,
        stream: Option<Receiver<String>>,
        start: Instant,
        context: &TrialContext,
    ) -> Result<String, BenchError> {
        let Some(rx) = stream else {
            return Ok(String::new());
        };
        loop {
            match rx.recv_timeout(POLL_INTERVAL) {
                Ok(text) => return Ok(text),
                Err(RecvTimeoutError::Disconnected) => return Ok(String::new()),
                Err(RecvTimeoutError::Timeout) => self.check_limits(start, context)?,
            }
        }
    }

    fn check_limits(&self, start: Instant, context: &TrialContext) -> Result<(), BenchError> {
        if self.cancel.is_cancelled() {
            return Err(BenchError::Cancelled);
        }
        match self.timeout {
            Some(limit) if start.elapsed() >= limit => Err(BenchError::Timeout {
                context: context.clone(),
                limit,
            }),
            _ => Ok(()),
        }
    }
}

impl Worker for ProcessWorker {
    fn run(
        &self,
        request: &WorkerRequest,
        context: &TrialContext,
    ) -> Result<WorkerOutput, BenchError> {
        tracing::debug!(
            command = %self.command.describe(context.processes),
            trial = context.trial,
            "launching worker"
        );
        let start = Instant::now();
        let child = self
            .command
            .command(context.processes)
            .spawn()
            .map_err(|source| BenchError::Spawn {
                context: context.clone(),
                source,
            })?;
        let mut guard = ChildGuard::new(child);

        let stdout = guard.child.stdout.take().map(capture);
        let stderr = guard.child.stderr.take().map(capture);

        if let Some(mut stdin) = guard.child.stdin.take() {
            // a worker that exits before reading everything is judged by its exit status
            match stdin.write_all(request.script().as_bytes()) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
                    tracing::debug!("worker closed stdin early");
                }
                Err(source) => {
                    return Err(BenchError::Spawn {
                        context: context.clone(),
                        source,
                    })
                }
            }
        }

        // On timeout or cancellation the readers are left detached: processes
        // spawned by the launcher may still hold the pipes open.
        let status = self.wait(&mut guard, start, context)?;
        let stdout = self.drain(stdout, start, context)?;
        let stderr = self.drain(stderr, start, context)?;

        if !status.success() {
            return Err(BenchError::Execution {
                context: context.clone(),
                status: status.to_string(),
                stderr,
            });
        }

        Ok(WorkerOutput {
            stdout,
            stderr,
            wall_time: start.elapsed(),
        })
    }
}

/// Owns a child process; kills and reaps it unless it was seen to exit.
struct ChildGuard {
    child: Child,
    reaped: bool,
}

impl ChildGuard {
    fn new(child: Child) -> Self {
        Self {
            child,
            reaped: false,
        }
    }

    fn try_wait(&mut self) -> io::Result<Option<ExitStatus>> {
        let status = self.child.try_wait()?;
        if status.is_some() {
            self.reaped = true;
        }
        Ok(status)
    }

    fn terminate(&mut self) {
        if self.reaped {
            return;
        }
        if let Err(e) = self.child.kill() {
            tracing::debug!(error = %e, "kill failed, worker probably already exited");
        }
        let _ = self.child.wait();
        self.reaped = true;
    }
}

impl Drop for ChildGuard {
    fn drop(&mut self) {
        self.terminate();
    }
}

/// Read `stream` to its end on a detached thread; the text arrives on the channel.
fn capture<R: Read + Send + 'static>(mut stream: R) -> Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = stream.read_to_end(&mut buf);
        let _ = tx.send(String::from_utf8_lossy(&buf).into_owned());
    });
    rx
}
