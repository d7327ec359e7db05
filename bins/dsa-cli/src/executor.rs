// Child-process execution with captured output and a bounded wait.
use std::path::Path;
use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::process::Command;
use tracing::{debug, warn};

use dsa_common::types::ExecutionResult;

/// Synthetic exit code reported when the executable could not be spawned.
pub const SPAWN_FAILURE_EXIT_CODE: i32 = 127;

/// How long to keep reading output after a killed child, in case a
/// grandchild inherited the pipes and holds them open.
const DRAIN_GRACE: Duration = Duration::from_secs(1);

/// Runs `command` to completion, feeding `stdin` and capturing both output
/// streams in full.
///
/// The wait is bounded by `timeout`; an overrunning child is killed and
/// reported with `timed_out` set, keeping whatever output it produced. A
/// spawn failure (missing executable) becomes an `ExecutionResult` with a
/// synthetic exit code rather than a harness error. The child is always
/// fully drained before this returns, so invocations never overlap.
pub async fn execute(
    command: &[String],
    stdin: Option<&str>,
    cwd: Option<&Path>,
    env: &[(String, String)],
    timeout: Duration,
) -> ExecutionResult {
    let Some((program, args)) = command.split_first() else {
        return spawn_failure("<empty>", "empty command line");
    };

    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdin(if stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }
    for (key, value) in env {
        cmd.env(key, value);
    }

    debug!(program = %program, "spawning child process");
    let started = Instant::now();

    let mut child = match cmd.spawn() {
        Ok(child) => child,
        Err(e) => {
            warn!(program = %program, error = %e, "failed to spawn");
            return spawn_failure(program, &e.to_string());
        }
    };

    if let Some(input) = stdin {
        if let Some(mut pipe) = child.stdin.take() {
            // A child that exits without reading stdin closes the pipe early;
            // that is its business, not a harness failure.
            let _ = pipe.write_all(input.as_bytes()).await;
            let _ = pipe.shutdown().await;
        }
    }

    // Drain both pipes concurrently with the wait so a chatty child cannot
    // deadlock on a full pipe buffer.
    let mut stdout_pipe = child.stdout.take();
    let mut stderr_pipe = child.stderr.take();
    let mut drain = tokio::spawn(async move {
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        tokio::join!(
            async {
                if let Some(pipe) = stdout_pipe.as_mut() {
                    let _ = pipe.read_to_end(&mut stdout).await;
                }
            },
            async {
                if let Some(pipe) = stderr_pipe.as_mut() {
                    let _ = pipe.read_to_end(&mut stderr).await;
                }
            },
        );
        (stdout, stderr)
    });

    let mut timed_out = false;
    let status = match tokio::time::timeout(timeout, child.wait()).await {
        Ok(Ok(status)) => Some(status),
        Ok(Err(e)) => {
            warn!(program = %program, error = %e, "failed to wait for child");
            None
        }
        Err(_) => {
            warn!(
                program = %program,
                timeout_ms = timeout.as_millis() as u64,
                "child overran the timeout, killing"
            );
            timed_out = true;
            let _ = child.kill().await;
            child.wait().await.ok()
        }
    };

    // Killing the child closes its pipes; a grandchild that inherited them
    // gets a short grace before the output is abandoned.
    let (stdout, stderr) = if timed_out {
        match tokio::time::timeout(DRAIN_GRACE, &mut drain).await {
            Ok(output) => output.unwrap_or_default(),
            Err(_) => {
                warn!(program = %program, "output pipes held open past the timeout, abandoning");
                drain.abort();
                Default::default()
            }
        }
    } else {
        drain.await.unwrap_or_default()
    };
    let exit_code = status.and_then(|s| s.code()).unwrap_or(-1);
    let duration_ms = started.elapsed().as_millis() as u64;

    debug!(program = %program, exit_code, timed_out, duration_ms, "child finished");
    ExecutionResult {
        exit_code,
        stdout: String::from_utf8_lossy(&stdout).into_owned(),
        stderr: String::from_utf8_lossy(&stderr).into_owned(),
        timed_out,
        duration_ms,
    }
}

fn spawn_failure(program: &str, detail: &str) -> ExecutionResult {
    ExecutionResult {
        exit_code: SPAWN_FAILURE_EXIT_CODE,
        stdout: String::new(),
        stderr: format!("{}: {}", program, detail),
        timed_out: false,
        duration_ms: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sh(script: &str) -> Vec<String> {
        vec!["sh".to_string(), "-c".to_string(), script.to_string()]
    }

    const TIMEOUT: Duration = Duration::from_secs(5);

    #[tokio::test]
    async fn test_captures_stdout() {
        let result = execute(&sh("echo hello"), None, None, &[], TIMEOUT).await;
        assert_eq!(result.exit_code, 0);
        assert_eq!(result.stdout, "hello\n");
        assert!(result.stderr.is_empty());
        assert!(!result.timed_out);
    }

    #[tokio::test]
    async fn test_feeds_stdin() {
        let result = execute(&sh("cat"), Some("abc\ndef"), None, &[], TIMEOUT).await;
        assert_eq!(result.exit_code, 0);
        assert_eq!(result.stdout, "abc\ndef");
    }

    #[tokio::test]
    async fn test_captures_stderr_and_exit_code() {
        let result = execute(&sh("echo oops >&2; exit 3"), None, None, &[], TIMEOUT).await;
        assert_eq!(result.exit_code, 3);
        assert_eq!(result.stderr, "oops\n");
        assert!(!result.success());
    }

    #[tokio::test]
    async fn test_passes_environment() {
        let env = vec![("DSA_PROBE".to_string(), "42".to_string())];
        let result = execute(&sh("printf %s \"$DSA_PROBE\""), None, None, &env, TIMEOUT).await;
        assert_eq!(result.stdout, "42");
    }

    #[tokio::test]
    async fn test_missing_executable_is_not_a_crash() {
        let command = vec!["definitely-not-a-real-binary-0b1".to_string()];
        let result = execute(&command, None, None, &[], TIMEOUT).await;
        assert_eq!(result.exit_code, SPAWN_FAILURE_EXIT_CODE);
        assert!(result.stderr.contains("definitely-not-a-real-binary-0b1"));
    }

    #[tokio::test]
    async fn test_timeout_kills_the_child() {
        let result = execute(
            &sh("sleep 30"),
            None,
            None,
            &[],
            Duration::from_millis(100),
        )
        .await;
        assert!(result.timed_out);
        assert!(!result.success());
        assert!(result.duration_ms < 5_000);
    }

}
