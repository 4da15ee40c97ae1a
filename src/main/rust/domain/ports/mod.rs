mod metrics_reporter;
mod process;

pub use metrics_reporter::MetricsReporter;
pub use process::{
    last_error_line, ByteSource, ExternalProcess, ProcessExit, ProcessOutput, ProcessSpawner,
};
