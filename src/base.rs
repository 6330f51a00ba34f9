//! External formatter run before and after the engine (`gofumpt`, `gofmt`).

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use tracing::{debug, warn};

use crate::error::ToolError;

/// Tried in order when no command is configured.
pub const CANDIDATES: [&str; 2] = ["gofumpt", "gofmt"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseFormatter {
    program: PathBuf,
    args: Vec<String>,
}

impl BaseFormatter {
    /// A program and its arguments, used as given.
    pub fn new<I, A>(program: impl Into<PathBuf>, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Parses a command line such as `gofumpt -extra`. The program is looked
    /// up on `PATH` unless it contains a path separator.
    pub fn from_command(command: &str) -> Result<Self, ToolError> {
        let mut words = command.split_whitespace();
        let Some(program) = words.next() else {
            return Err(ToolError::NotFound(command.to_string()));
        };
        let program = if program.contains(std::path::MAIN_SEPARATOR) || program.contains('/') {
            PathBuf::from(program)
        } else {
            find_on_path(program).ok_or_else(|| ToolError::NotFound(program.to_string()))?
        };
        Ok(Self::new(program, words))
    }

    /// First of [`CANDIDATES`] found on `PATH`.
    pub fn detect() -> Option<Self> {
        let found = CANDIDATES.iter().find_map(|name| find_on_path(name));
        match &found {
            Some(program) => debug!(program = %program.display(), "base formatter detected"),
            None => warn!("neither gofumpt nor gofmt found on PATH; skipping base formatting"),
        }
        found.map(|program| Self::new(program, Vec::<String>::new()))
    }

    fn display(&self) -> String {
        let mut s = self.program.display().to_string();
        for arg in &self.args {
            s.push(' ');
            s.push_str(arg);
        }
        s
    }

    /// Pipes `src` through the command and returns its stdout.
    pub fn run(&self, src: &str) -> Result<String, ToolError> {
        let command = self.display();
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| ToolError::Spawn {
                command: command.clone(),
                source,
            })?;

        // Feed stdin from another thread so a full stdout pipe cannot block us.
        let writer = child.stdin.take().map(|mut stdin| {
            let input = src.as_bytes().to_vec();
            std::thread::spawn(move || stdin.write_all(&input))
        });

        let output = child.wait_with_output().map_err(|source| ToolError::Spawn {
            command: command.clone(),
            source,
        })?;
        if let Some(Ok(Err(source))) = writer.map(|w| w.join()) {
            if output.status.success() {
                return Err(ToolError::Spawn { command, source });
            }
        }

        if !output.status.success() {
            return Err(ToolError::Failed {
                command,
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        String::from_utf8(output.stdout).map_err(|_| ToolError::InvalidOutput(command))
    }
}

fn find_on_path(name: &str) -> Option<PathBuf> {
    let paths = std::env::var_os("PATH")?;
    std::env::split_paths(&paths)
        .flat_map(|dir| {
            let plain = dir.join(name);
            let exe = dir.join(format!("{name}{}", std::env::consts::EXE_SUFFIX));
            [plain, exe]
        })
        .find(|candidate| candidate.is_file())
}
