//! Structured external-tool invocations.
//!
//! Builders produce a [`ToolCommand`] instead of a shell string: every
//! argument is a discrete token handed straight to the process, so paths
//! and filter graphs never pass through a shell.

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::process::{Command, Output};

use log::debug;

use crate::error::MixError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    program: String,
    args: Vec<OsString>,
}

impl ToolCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(&mut self, arg: impl AsRef<OsStr>) -> &mut Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn args<I, S>(&mut self, args: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        for arg in args {
            self.arg(arg);
        }
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn get_args(&self) -> &[OsString] {
        &self.args
    }

    /// Value following the first occurrence of `flag`, e.g. the filter graph
    /// after `-filter_complex`.
    #[cfg(test)]
    pub fn value_of(&self, flag: &str) -> Option<&str> {
        self.args
            .iter()
            .position(|a| a == flag)
            .and_then(|i| self.args.get(i + 1))
            .and_then(|a| a.to_str())
    }

    /// Runs the command to completion, capturing stdout and stderr.
    ///
    /// A non-zero exit becomes [`MixError::ToolFailed`] carrying the rendered
    /// command, its exit code and everything it printed.
    pub fn run(&self) -> Result<Output, MixError> {
        debug!("running {self}");
        let output = Command::new(self.program())
            .args(self.get_args())
            .output()
            .map_err(|source| MixError::ToolLaunch {
                program: self.program.clone(),
                source,
            })?;

        if output.status.success() {
            return Ok(output);
        }

        let mut captured = String::from_utf8_lossy(&output.stdout).into_owned();
        captured.push_str(&String::from_utf8_lossy(&output.stderr));
        Err(MixError::ToolFailed {
            command: self.to_string(),
            code: output.status.code(),
            output: captured,
        })
    }
}

/// Shell-like rendering for display only; quotes tokens that need it.
/// Non-UTF-8 bytes are shown lossily but passed to the process untouched.
impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", quote(&self.program))?;
        for arg in &self.args {
            write!(f, " {}", quote(&arg.to_string_lossy()))?;
        }
        Ok(())
    }
}

fn quote(token: &str) -> String {
    let plain = !token.is_empty()
        && token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:=@,+".contains(c));
    if plain {
        token.to_string()
    } else {
        format!("'{}'", token.replace('\'', r"'\''"))
    }
}
