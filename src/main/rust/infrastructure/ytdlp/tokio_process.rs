use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncReadExt;
use tokio::process::{Child, ChildStderr, Command};
use tokio::task::JoinHandle;

use crate::domain::ports::{ByteSource, ExternalProcess, ProcessExit, ProcessOutput, ProcessSpawner};

/// Upper bound on retained stderr (the tool logs progress there while streaming)
const STDERR_TAIL_BYTES: usize = 4 * 1024;

/// Launches the extraction tool as a tokio child process
pub struct TokioProcessSpawner {
    program: PathBuf,
}

impl TokioProcessSpawner {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    fn command(&self, args: &[String]) -> Command {
        let mut command = Command::new(&self.program);
        command.args(args).stdin(Stdio::null()).kill_on_drop(true);
        // Own group, so terminate() also reaches the muxer the tool forks
        #[cfg(unix)]
        command.process_group(0);
        command
    }
}

#[async_trait]
impl ProcessSpawner for TokioProcessSpawner {
    async fn output(&self, args: &[String]) -> io::Result<ProcessOutput> {
        tracing::debug!("Running {} {:?}", self.program.display(), args);

        let output = self.command(args).output().await?;

        Ok(ProcessOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: output.stdout,
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    fn spawn(&self, args: &[String]) -> io::Result<Box<dyn ExternalProcess>> {
        tracing::debug!("Spawning {} {:?}", self.program.display(), args);

        let mut child = self
            .command(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        // Drain stderr concurrently so a chatty tool never blocks on a full pipe
        let stderr_task = child
            .stderr
            .take()
            .map(|stderr| tokio::spawn(collect_stderr_tail(stderr, STDERR_TAIL_BYTES)));

        Ok(Box::new(TokioProcess { child, stderr_task }))
    }
}

struct TokioProcess {
    child: Child,
    stderr_task: Option<JoinHandle<String>>,
}

#[async_trait]
impl ExternalProcess for TokioProcess {
    fn pid(&self) -> Option<u32> {
        self.child.id()
    }

    fn take_stdout(&mut self) -> Option<ByteSource> {
        self.child
            .stdout
            .take()
            .map(|stdout| Box::pin(stdout) as ByteSource)
    }

    async fn wait(&mut self) -> io::Result<ProcessExit> {
        let status = self.child.wait().await?;

        let stderr_tail = match self.stderr_task.take() {
            Some(task) => task.await.unwrap_or_default(),
            None => String::new(),
        };

        Ok(ProcessExit {
            success: status.success(),
            code: status.code(),
            stderr_tail,
        })
    }

    fn terminate(&mut self) {
        // id() is None once the child has been reaped
        #[cfg(unix)]
        if let Some(pid) = self.child.id() {
            kill_process_group(pid);
        }

        if let Err(e) = self.child.start_kill() {
            // InvalidInput means the child was already reaped
            if e.kind() != io::ErrorKind::InvalidInput {
                tracing::warn!("Failed to kill process {:?}: {}", self.child.id(), e);
            }
        }
        if let Some(task) = self.stderr_task.take() {
            task.abort();
        }
    }
}

#[cfg(unix)]
fn kill_process_group(pgid: u32) {
    // A negative pid signals every process in the group
    let result = unsafe { libc::kill(-(pgid as libc::pid_t), libc::SIGKILL) };
    if result != 0 {
        let e = io::Error::last_os_error();
        if e.raw_os_error() != Some(libc::ESRCH) {
            tracing::warn!("Failed to kill process group {}: {}", pgid, e);
        }
    }
}

async fn collect_stderr_tail(mut stderr: ChildStderr, limit: usize) -> String {
    let mut tail: Vec<u8> = Vec::with_capacity(limit);
    let mut buffer = [0u8; 1024];

    loop {
        match stderr.read(&mut buffer).await {
            Ok(0) | Err(_) => break,
            Ok(n) => {
                tail.extend_from_slice(&buffer[..n]);
                if tail.len() > limit {
                    let excess = tail.len() - limit;
                    tail.drain(..excess);
                }
            }
        }
    }

    String::from_utf8_lossy(&tail).into_owned()
}
