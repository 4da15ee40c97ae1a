use std::io;
use std::pin::Pin;

use async_trait::async_trait;
use tokio::io::AsyncRead;

/// Readable stdout channel of a running external process
pub type ByteSource = Pin<Box<dyn AsyncRead + Send>>;

/// Collected result of a run-to-completion invocation
#[derive(Debug, Clone, Default)]
pub struct ProcessOutput {
    pub success: bool,
    pub code: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: String,
}

/// Exit report of a streaming process
#[derive(Debug, Clone, Default)]
pub struct ProcessExit {
    pub success: bool,
    pub code: Option<i32>,
    /// Bounded tail of everything the process wrote to stderr
    pub stderr_tail: String,
}

/// Last non-empty stderr line, which is where extraction tools put their error
pub fn last_error_line(stderr: &str) -> Option<&str> {
    stderr.lines().map(str::trim).filter(|l| !l.is_empty()).last()
}

/// Handle to one running external process
#[async_trait]
pub trait ExternalProcess: Send {
    fn pid(&self) -> Option<u32>;

    /// Detach the stdout channel; returns `None` when it was never attached
    fn take_stdout(&mut self) -> Option<ByteSource>;

    /// Wait for the process to exit
    async fn wait(&mut self) -> io::Result<ProcessExit>;

    /// Request termination without waiting; safe to call more than once
    fn terminate(&mut self);
}

/// Port for launching the external extraction tool
#[async_trait]
pub trait ProcessSpawner: Send + Sync {
    /// Run to completion and collect both output channels
    async fn output(&self, args: &[String]) -> io::Result<ProcessOutput>;

    /// Start a long-running process with stdout piped to the caller
    fn spawn(&self, args: &[String]) -> io::Result<Box<dyn ExternalProcess>>;
}
