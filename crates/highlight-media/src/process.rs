//! Subprocess plumbing shared by the FFmpeg collaborators.

use highlight_core::{HighlightError, Result};
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::debug;

/// Run a tool to completion and return everything it wrote to stdout.
///
/// Both pipes are drained concurrently, so a tool that floods stderr cannot
/// stall on a full pipe. The child is reaped before this returns.
/// `what` names the operation in error messages.
pub(crate) fn run_capture(program: &Path, args: &[String], what: &str) -> Result<Vec<u8>> {
    debug!(program = %program.display(), ?args, "Spawning");

    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .map_err(|e| {
            HighlightError::Decoder(format!("Failed to spawn {}: {e}", program.display()))
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(HighlightError::Decoder(format!(
            "{what}: {} exited with {}: {}",
            program.display(),
            output.status,
            tail(stderr.trim(), 2048)
        )));
    }

    Ok(output.stdout)
}

/// Last `max` bytes of `text`, on a char boundary.
fn tail(text: &str, max: usize) -> &str {
    if text.len() <= max {
        return text;
    }
    let mut start = text.len() - max;
    while !text.is_char_boundary(start) {
        start += 1;
    }
    &text[start..]
}

/// Format seconds for `-ss` / `-t`.
pub(crate) fn format_seconds(seconds: f64) -> String {
    format!("{:.3}", seconds.max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sh(script: &str) -> Vec<String> {
        vec!["-c".into(), script.into()]
    }

    #[test]
    fn test_format_seconds() {
        assert_eq!(format_seconds(1.0), "1.000");
        assert_eq!(format_seconds(12.3456), "12.346");
        assert_eq!(format_seconds(-3.0), "0.000");
    }

    #[test]
    fn test_missing_program_is_decoder_error() {
        let err = run_capture(Path::new("/nonexistent/ffmpeg-binary"), &[], "media info");
        assert!(matches!(err, Err(HighlightError::Decoder(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_large_stderr_does_not_block_stdout() {
        // Well past one pipe buffer of stderr before any stdout
        let out = run_capture(
            Path::new("/bin/sh"),
            &sh("head -c 200000 /dev/zero >&2; printf ok"),
            "noisy tool",
        )
        .unwrap();
        assert_eq!(out, b"ok");
    }

    #[cfg(unix)]
    #[test]
    fn test_failure_reports_stderr_tail() {
        let err = run_capture(
            Path::new("/bin/sh"),
            &sh("head -c 100000 /dev/zero | tr '\\0' x >&2; echo broken input >&2; exit 3"),
            "frame decode",
        );
        let Err(HighlightError::Decoder(msg)) = err else {
            panic!("expected a decoder error");
        };
        assert!(msg.starts_with("frame decode:"));
        assert!(msg.ends_with("broken input"));
        assert!(msg.len() < 4096);
    }

    #[test]
    fn test_tail_respects_char_boundaries() {
        assert_eq!(tail("short", 10), "short");
        assert_eq!(tail("abcdef", 3), "def");
        assert_eq!(tail("aé", 1), "");
    }
}
