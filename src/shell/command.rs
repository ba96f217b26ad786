//! Typed external-command descriptors and pipe-chain execution.
//!
//! Commands are built from structured data (program + ordered argument
//! list + endpoint redirections), never by string concatenation, so
//! arguments like read-group headers containing literal tab escapes need
//! no quoting or escaping. A [`CommandChain`] is an ordered pipe of
//! commands executed as one fail-fast unit.

use crate::error::{Result, SeqpipeError};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

/// A single external command: program plus ordered arguments.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    program: PathBuf,
    args: Vec<String>,
}

impl CommandSpec {
    /// Create a command for the given program.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append one argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Append a path argument.
    #[must_use]
    pub fn path_arg(self, path: impl AsRef<Path>) -> Self {
        self.arg(path.as_ref().to_string_lossy().into_owned())
    }

    /// The program this command runs.
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Render for logs: shell-style, arguments with whitespace quoted.
    pub fn render(&self) -> String {
        let mut out = self.program.to_string_lossy().into_owned();
        for arg in &self.args {
            out.push(' ');
            if arg.contains(char::is_whitespace) || arg.is_empty() {
                out.push('\'');
                out.push_str(arg);
                out.push('\'');
            } else {
                out.push_str(arg);
            }
        }
        out
    }

    fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }
}

/// An ordered pipe of commands with optional endpoint redirections.
///
/// The chain is executed as one unit: every member's exit status must be
/// zero for the chain to count as successful.
#[derive(Debug, Clone)]
pub struct CommandChain {
    stages: Vec<CommandSpec>,
    stdin: Option<PathBuf>,
    stdout: Option<PathBuf>,
}

impl CommandChain {
    /// Start a chain with its first command.
    pub fn new(first: CommandSpec) -> Self {
        Self {
            stages: vec![first],
            stdin: None,
            stdout: None,
        }
    }

    /// Pipe the chain's output into another command.
    #[must_use]
    pub fn pipe(mut self, next: CommandSpec) -> Self {
        self.stages.push(next);
        self
    }

    /// Splice a command into the pipe directly after position `index`.
    ///
    /// Used for conditional filters (e.g. the quality-encoding fix) that
    /// must run inside the same fail-fast unit as the commands around them.
    pub fn splice_after(&mut self, index: usize, command: CommandSpec) {
        self.stages.insert(index + 1, command);
    }

    /// Redirect the first command's stdin from a file.
    #[must_use]
    pub fn stdin_from(mut self, path: impl Into<PathBuf>) -> Self {
        self.stdin = Some(path.into());
        self
    }

    /// Redirect the last command's stdout to a file.
    #[must_use]
    pub fn stdout_to(mut self, path: impl Into<PathBuf>) -> Self {
        self.stdout = Some(path.into());
        self
    }

    /// Number of commands in the pipe.
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Whether the chain has no commands. Chains are built non-empty.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Render for logs: `cmd1 | cmd2 > out`.
    pub fn render(&self) -> String {
        let mut out = self
            .stages
            .iter()
            .map(CommandSpec::render)
            .collect::<Vec<_>>()
            .join(" | ");
        if let Some(path) = &self.stdin {
            out = format!("{} < {}", out, path.display());
        }
        if let Some(path) = &self.stdout {
            out.push_str(&format!(" > {}", path.display()));
        }
        out
    }
}

/// Outcome of executing a [`CommandChain`].
#[derive(Debug, Clone)]
pub struct ChainResult {
    /// Exit code of the first failing member, or 0 (None if signal-killed).
    pub exit_code: Option<i32>,

    /// Wall time for the whole pipe.
    pub duration: Duration,

    /// Whether every member exited zero.
    pub success: bool,
}

/// Execute a command chain, blocking until every member exits.
///
/// stderr of every member is inherited, so tool diagnostics land in the
/// scheduler-captured stream for the stage. No timeout is applied here;
/// wall-clock limits are the scheduler's responsibility.
///
/// # Errors
///
/// Returns an error if a member cannot be spawned (e.g. the tool is not
/// installed on the compute node). Non-zero exits are reported through
/// [`ChainResult`], not as `Err`.
pub fn execute_chain(chain: &CommandChain) -> Result<ChainResult> {
    let start = Instant::now();
    let last = chain.stages.len() - 1;

    let mut children = Vec::with_capacity(chain.stages.len());
    let mut prev_stdout = None;

    for (i, spec) in chain.stages.iter().enumerate() {
        let mut cmd = spec.to_command();

        match prev_stdout.take() {
            Some(stdout) => {
                cmd.stdin(Stdio::from(stdout));
            }
            None if i == 0 => {
                if let Some(path) = &chain.stdin {
                    cmd.stdin(Stdio::from(File::open(path)?));
                } else {
                    cmd.stdin(Stdio::null());
                }
            }
            None => {}
        }

        if i < last {
            cmd.stdout(Stdio::piped());
        } else if let Some(path) = &chain.stdout {
            cmd.stdout(Stdio::from(File::create(path)?));
        }

        let mut child = cmd.spawn().map_err(|e| {
            tracing::error!(program = %spec.program.display(), error = %e, "failed to spawn tool");
            SeqpipeError::Other(anyhow::anyhow!(
                "failed to spawn '{}': {}",
                spec.program.display(),
                e
            ))
        })?;

        if i < last {
            prev_stdout = child.stdout.take();
        }
        children.push(child);
    }

    let mut exit_code = Some(0);
    let mut success = true;
    for mut child in children {
        let status = child.wait()?;
        if !status.success() && success {
            success = false;
            exit_code = status.code();
        }
    }

    Ok(ChainResult {
        exit_code,
        duration: start.elapsed(),
        success,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn render_quotes_whitespace_arguments() {
        let spec = CommandSpec::new("bwa")
            .arg("mem")
            .arg("-R")
            .arg("@RG\tID:S1\tSM:S1");
        let rendered = spec.render();
        assert!(rendered.starts_with("bwa mem -R '"));
        assert!(rendered.contains("ID:S1"));
    }

    #[test]
    fn render_chain_shows_pipe_and_redirection() {
        let chain = CommandChain::new(CommandSpec::new("cat"))
            .pipe(CommandSpec::new("gzip").arg("-c"))
            .stdout_to("/tmp/out.gz");
        assert_eq!(chain.render(), "cat | gzip -c > /tmp/out.gz");
    }

    #[test]
    fn splice_after_inserts_between_members() {
        let mut chain = CommandChain::new(CommandSpec::new("producer"))
            .pipe(CommandSpec::new("consumer"));
        chain.splice_after(0, CommandSpec::new("filter"));
        assert_eq!(chain.len(), 3);
        assert_eq!(chain.render(), "producer | filter | consumer");
    }

    #[test]
    fn successful_chain_reports_success() {
        let result = execute_chain(&CommandChain::new(CommandSpec::new("true"))).unwrap();
        assert!(result.success);
        assert_eq!(result.exit_code, Some(0));
    }

    #[test]
    fn failing_member_reports_failure() {
        let chain = CommandChain::new(CommandSpec::new("false"));
        let result = execute_chain(&chain).unwrap();
        assert!(!result.success);
        assert_eq!(result.exit_code, Some(1));
    }

    #[test]
    fn pipe_carries_data_between_members() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("in.txt");
        let output = dir.path().join("out.txt");
        fs::write(&input, "beta\nalpha\n").unwrap();

        let chain = CommandChain::new(CommandSpec::new("cat"))
            .pipe(CommandSpec::new("sort"))
            .stdin_from(&input)
            .stdout_to(&output);

        let result = execute_chain(&chain).unwrap();
        assert!(result.success);
        assert_eq!(fs::read_to_string(&output).unwrap(), "alpha\nbeta\n");
    }

    #[test]
    fn missing_tool_is_a_spawn_error() {
        let chain = CommandChain::new(CommandSpec::new("/no/such/tool-xyz"));
        assert!(execute_chain(&chain).is_err());
    }

    #[test]
    fn failure_anywhere_in_pipe_fails_the_chain() {
        let chain = CommandChain::new(CommandSpec::new("true"))
            .pipe(CommandSpec::new("false"));
        let result = execute_chain(&chain).unwrap();
        assert!(!result.success);
    }
}
