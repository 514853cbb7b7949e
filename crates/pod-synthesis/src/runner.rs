//! External process invocation.

use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// A synchronous tool run: `program < stdin`, started in `cwd`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    pub program: PathBuf,
    /// File fed to the tool's standard input.
    pub stdin: PathBuf,
    pub cwd: PathBuf,
}

/// Exit status of a finished tool run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolExit {
    /// Exit code, or `None` when the process was killed by a signal.
    pub code: Option<i32>,
}

impl ToolExit {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

impl fmt::Display for ToolExit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "exit code {code}"),
            None => write!(f, "no exit code (terminated by signal)"),
        }
    }
}

/// Runs external tools, streaming their output line by line.
pub trait CommandRunner {
    /// Run to completion, calling `on_line` for every stdout line in order.
    /// Blocks until the tool exits; there is no timeout.
    fn run(
        &self,
        invocation: &ToolInvocation,
        on_line: &mut dyn FnMut(&str),
    ) -> io::Result<ToolExit>;
}

/// Runs tools as child processes of this one.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    fn run(
        &self,
        invocation: &ToolInvocation,
        on_line: &mut dyn FnMut(&str),
    ) -> io::Result<ToolExit> {
        let stdin = File::open(&invocation.stdin)?;
        tracing::debug!(
            "running {} < {} in {}",
            invocation.program.display(),
            invocation.stdin.display(),
            invocation.cwd.display()
        );

        let mut child = Command::new(&invocation.program)
            .current_dir(&invocation.cwd)
            .stdin(Stdio::from(stdin))
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()?;

        let streamed = match child.stdout.take() {
            Some(stdout) => stream_lines(BufReader::new(stdout), on_line),
            None => Ok(()),
        };

        // Reap the child even when reading its output failed.
        let status = child.wait()?;
        streamed?;
        Ok(ToolExit {
            code: status.code(),
        })
    }
}

/// Forward each line of `reader` without its terminator. Bytes that are not
/// valid UTF-8 are replaced rather than ending the stream.
fn stream_lines(mut reader: impl BufRead, on_line: &mut dyn FnMut(&str)) -> io::Result<()> {
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            return Ok(());
        }
        if buf.last() == Some(&b'\n') {
            buf.pop();
            if buf.last() == Some(&b'\r') {
                buf.pop();
            }
        }
        on_line(&String::from_utf8_lossy(&buf));
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn streams_lines_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("script.sh");
        std::fs::write(&script, "echo first\necho second\necho third\n").unwrap();

        let invocation = ToolInvocation {
            program: PathBuf::from("sh"),
            stdin: script,
            cwd: dir.path().to_path_buf(),
        };
        let mut lines = Vec::new();
        let exit = ProcessRunner
            .run(&invocation, &mut |line| lines.push(line.to_string()))
            .unwrap();

        assert!(exit.success());
        assert_eq!(lines, vec!["first", "second", "third"]);
    }

    #[test]
    fn invalid_utf8_line_is_forwarded_lossily() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("script.sh");
        std::fs::write(&script, "echo before\nprintf 'caf\\351\\n'\necho after\nexit 0\n").unwrap();

        let invocation = ToolInvocation {
            program: PathBuf::from("sh"),
            stdin: script,
            cwd: dir.path().to_path_buf(),
        };
        let mut lines = Vec::new();
        let exit = ProcessRunner
            .run(&invocation, &mut |line| lines.push(line.to_string()))
            .unwrap();

        assert!(exit.success());
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "before");
        assert_eq!(lines[1], "caf\u{FFFD}");
        assert_eq!(lines[2], "after");
    }

    #[test]
    fn crlf_and_unterminated_lines() {
        let mut lines = Vec::new();
        stream_lines(&b"one\r\ntwo\nthree"[..], &mut |line| lines.push(line.to_string())).unwrap();
        assert_eq!(lines, vec!["one", "two", "three"]);
    }

    #[test]
    fn reports_failure_code() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("script.sh");
        std::fs::write(&script, "exit 3\n").unwrap();

        let invocation = ToolInvocation {
            program: PathBuf::from("sh"),
            stdin: script,
            cwd: dir.path().to_path_buf(),
        };
        let exit = ProcessRunner.run(&invocation, &mut |_| {}).unwrap();
        assert!(!exit.success());
        assert_eq!(exit.code, Some(3));
        assert_eq!(exit.to_string(), "exit code 3");
    }

    #[test]
    fn missing_program_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("script.tcl");
        std::fs::write(&script, "").unwrap();

        let invocation = ToolInvocation {
            program: PathBuf::from("/nonexistent/pod-test-tool"),
            stdin: script,
            cwd: dir.path().to_path_buf(),
        };
        assert!(ProcessRunner.run(&invocation, &mut |_| {}).is_err());
    }
}
