//! Running external programs (`git`, `brew`, `ssh-keygen`, `code`, ...).
//!
//! Resources and tasks never spawn processes themselves. They hold an
//! [`Executor`] so tests can swap in a scripted one.
use anyhow::{Context as _, Result, bail};
use std::io::Write as _;
use std::process::{Command, Output, Stdio};

/// Captured outcome of a finished program.
#[derive(Debug, Clone, Default)]
pub struct ExecResult {
    /// Standard output, decoded lossily.
    pub stdout: String,
    /// Standard error, decoded lossily.
    pub stderr: String,
    /// Whether the program exited with status zero.
    pub success: bool,
    /// Exit code, `None` when killed by a signal.
    pub code: Option<i32>,
}

impl ExecResult {
    fn from_output(output: &Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            success: output.status.success(),
            code: output.status.code(),
        }
    }

    /// Turn a non-zero exit into an error naming `program` and its stderr.
    fn require_success(self, program: &str) -> Result<Self> {
        if self.success {
            return Ok(self);
        }
        let status = self
            .code
            .map_or_else(|| "a signal".to_string(), |code| format!("status {code}"));
        bail!("{program} exited with {status}: {}", self.stderr.trim())
    }
}

/// Runs external programs on behalf of resources and tasks.
pub trait Executor: Send + Sync + std::fmt::Debug {
    /// Run `program` and require a zero exit.
    ///
    /// # Errors
    ///
    /// Fails if the program cannot be started or exits non-zero.
    fn run(&self, program: &str, args: &[&str]) -> Result<ExecResult>;

    /// Like [`run`](Self::run) with extra environment variables set.
    ///
    /// # Errors
    ///
    /// Fails if the program cannot be started or exits non-zero.
    fn run_with_env(
        &self,
        program: &str,
        args: &[&str],
        env: &[(&str, &str)],
    ) -> Result<ExecResult>;

    /// Like [`run`](Self::run) with `input` piped to stdin.
    ///
    /// # Errors
    ///
    /// Fails if the program cannot be started, stdin cannot be written, or
    /// the program exits non-zero.
    fn run_with_input(&self, program: &str, args: &[&str], input: &str) -> Result<ExecResult>;

    /// Run `program` and hand back its result whatever the exit status.
    ///
    /// # Errors
    ///
    /// Fails only if the program cannot be started.
    fn run_unchecked(&self, program: &str, args: &[&str]) -> Result<ExecResult>;

    /// Whether `program` resolves on `PATH`.
    fn which(&self, program: &str) -> bool;
}

/// [`Executor`] that spawns real processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemExecutor;

impl SystemExecutor {
    fn capture(
        program: &str,
        args: &[&str],
        env: &[(&str, &str)],
        input: Option<&str>,
    ) -> Result<ExecResult> {
        let mut cmd = Command::new(program);
        cmd.args(args).envs(env.iter().copied());

        let output = if let Some(input) = input {
            let mut child = cmd
                .stdin(Stdio::piped())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .spawn()
                .with_context(|| format!("cannot start {program}"))?;
            // stdin is dropped at the end of this block so the child sees EOF.
            if let Some(mut stdin) = child.stdin.take() {
                stdin
                    .write_all(input.as_bytes())
                    .with_context(|| format!("cannot write to {program}"))?;
            }
            child.wait_with_output()
        } else {
            cmd.output()
        }
        .with_context(|| format!("cannot run {program}"))?;

        Ok(ExecResult::from_output(&output))
    }
}

impl Executor for SystemExecutor {
    fn run(&self, program: &str, args: &[&str]) -> Result<ExecResult> {
        Self::capture(program, args, &[], None)?.require_success(program)
    }

    fn run_with_env(
        &self,
        program: &str,
        args: &[&str],
        env: &[(&str, &str)],
    ) -> Result<ExecResult> {
        Self::capture(program, args, env, None)?.require_success(program)
    }

    fn run_with_input(&self, program: &str, args: &[&str], input: &str) -> Result<ExecResult> {
        Self::capture(program, args, &[], Some(input))?.require_success(program)
    }

    fn run_unchecked(&self, program: &str, args: &[&str]) -> Result<ExecResult> {
        Self::capture(program, args, &[], None)
    }

    fn which(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }
}


#[cfg(all(test, unix))]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::scripted::ScriptedExecutor;
    use super::*;

    #[test]
    fn run_captures_stdout() {
        let result = SystemExecutor.run("echo", &["hello"]).unwrap();
        assert!(result.success);
        assert_eq!(result.stdout.trim(), "hello");
    }

    #[test]
    fn run_reports_exit_status_and_stderr() {
        let err = SystemExecutor
            .run("sh", &["-c", "echo boom >&2; exit 3"])
            .unwrap_err();
        assert_eq!(err.to_string(), "sh exited with status 3: boom");
    }

    #[test]
    fn run_unchecked_keeps_failure() {
        let result = SystemExecutor.run_unchecked("false", &[]).unwrap();
        assert!(!result.success);
        assert_eq!(result.code, Some(1));
    }

    #[test]
    fn missing_program_is_an_error_even_unchecked() {
        let err = SystemExecutor
            .run_unchecked("bootstrap-no-such-program", &[])
            .unwrap_err();
        assert!(err.to_string().contains("bootstrap-no-such-program"));
    }

    #[test]
    fn run_with_env_passes_variables() {
        let result = SystemExecutor
            .run_with_env("sh", &["-c", "printf %s \"$NONINTERACTIVE\""], &[("NONINTERACTIVE", "1")])
            .unwrap();
        assert_eq!(result.stdout, "1");
    }

    #[test]
    fn run_with_input_feeds_stdin() {
        let result = SystemExecutor
            .run_with_input("cat", &[], "ssh-ed25519 AAAA dev@example.com\n")
            .unwrap();
        assert_eq!(result.stdout, "ssh-ed25519 AAAA dev@example.com\n");
    }

    #[test]
    fn which_finds_sh_only() {
        assert!(SystemExecutor.which("sh"));
        assert!(!SystemExecutor.which("bootstrap-no-such-program"));
    }

    #[test]
    fn scripted_executor_replays_in_order_then_fails() {
        let executor = ScriptedExecutor::replies([(true, "Dev\n"), (false, "")]);

        assert_eq!(
            executor.run("git", &["config", "--get", "user.name"]).unwrap().stdout,
            "Dev\n"
        );
        assert!(!executor.run_unchecked("brew", &["bundle", "check"]).unwrap().success);
        assert!(executor.run("pbcopy", &[]).is_err(), "replies exhausted");
        assert_eq!(
            executor.calls(),
            ["git config --get user.name", "brew bundle check", "pbcopy"]
        );
    }
}
