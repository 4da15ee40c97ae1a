use crate::domain::value_objects::{ContainerFormat, DownloadRequest};

/// Flags shared by every invocation: no interactive warnings, lax TLS,
/// free containers first, no DASH-manifest-only listings, single video only
const PERMISSIVE_FLAGS: [&str; 5] = [
    "--no-warnings",
    "--no-check-certificates",
    "--prefer-free-formats",
    "--youtube-skip-dash-manifest",
    "--no-playlist",
];

pub struct CommandBuilder;

impl CommandBuilder {
    /// Arguments for a single consolidated JSON description of `url`
    pub fn info_args(url: &str) -> Vec<String> {
        let mut args = vec!["--dump-single-json".to_string()];
        args.extend(PERMISSIVE_FLAGS.iter().map(|f| f.to_string()));
        Self::push_url(&mut args, url);
        args
    }

    /// Arguments that mux the requested encoding with best audio and write
    /// the container to stdout
    pub fn stream_args(request: &DownloadRequest, merge_format: ContainerFormat) -> Vec<String> {
        let mut args = vec![
            "-f".to_string(),
            request.format_selector(),
            "-o".to_string(),
            "-".to_string(),
            "--merge-output-format".to_string(),
            merge_format.extension().to_string(),
            "--no-part".to_string(),
        ];
        args.extend(PERMISSIVE_FLAGS.iter().map(|f| f.to_string()));
        Self::push_url(&mut args, request.source_url());
        args
    }

    // "--" keeps a URL starting with '-' from being read as an option
    fn push_url(args: &mut Vec<String>, url: &str) {
        args.push("--".to_string());
        args.push(url.to_string());
    }
}
