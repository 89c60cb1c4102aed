//! Step actions and their handlers
//!
//! A resolved step has the form `<ACTION> <params>`. Each action kind is a
//! variant of [`Action`]; [`SystemHandler`] performs them for real.

use crate::error::{ExecutionError, ExecutionResult, StepError, StepResult};
use crate::runner::{Context, Logger, Verbosity, ENV_PLACEHOLDER};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command as StdCommand, Stdio};

/// A classified step, ready to be executed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Ensure a directory exists
    Mkdir(PathBuf),

    /// Write text to standard output
    Print(String),

    /// Run a command line through the interpreter
    Run(String),
}

impl Action {
    /// Token naming this action in a step
    pub fn kind(&self) -> &'static str {
        match self {
            Action::Mkdir(_) => "MKDIR",
            Action::Print(_) => "PRINT",
            Action::Run(_) => "RUN",
        }
    }

    /// Parse a resolved step.
    ///
    /// The action token ends at the first whitespace run; everything after it
    /// is the parameter string, which must not be empty.
    pub fn parse(step: &str) -> StepResult<Action> {
        let (token, params) = match step.trim_start().split_once(char::is_whitespace) {
            Some((token, rest)) => (token, rest.trim_start()),
            None => return Err(StepError::Malformed(step.to_string())),
        };

        if params.trim().is_empty() {
            return Err(StepError::Malformed(step.to_string()));
        }

        match token {
            "MKDIR" => Ok(Action::Mkdir(PathBuf::from(params.trim_end()))),
            "PRINT" => Ok(Action::Print(params.to_string())),
            "RUN" => Ok(Action::Run(params.to_string())),
            _ => Err(StepError::UnknownAction(step.to_string())),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Mkdir(path) => write!(f, "{} {}", self.kind(), path.display()),
            Action::Print(text) | Action::Run(text) => write!(f, "{} {}", self.kind(), text),
        }
    }
}

/// Performs actions on behalf of the dispatcher
pub trait ActionHandler {
    fn handle(
        &mut self,
        action: &Action,
        ctx: &Context,
        logger: &dyn Logger,
    ) -> ExecutionResult<()>;
}

/// Handler touching the real filesystem, stdout and processes
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemHandler;

impl ActionHandler for SystemHandler {
    fn handle(
        &mut self,
        action: &Action,
        ctx: &Context,
        logger: &dyn Logger,
    ) -> ExecutionResult<()> {
        match action {
            Action::Mkdir(path) => make_dir(&ctx.working_dir.join(path), logger),
            Action::Print(text) => {
                print_text(text);
                Ok(())
            }
            Action::Run(command_line) => run_process(command_line, ctx, logger),
        }
    }
}

/// Ensure `path` is a directory, creating it and any missing parents.
///
/// An existing directory counts as success; any other existing entry is a
/// name collision.
pub fn make_dir(path: &Path, logger: &dyn Logger) -> ExecutionResult<()> {
    if path.exists() {
        if path.is_dir() {
            logger.info(Verbosity::Debug, &format!("{} already exists", path.display()));
            return Ok(());
        }
        return Err(ExecutionError::NameCollision(path.to_path_buf()));
    }

    fs::create_dir_all(path).map_err(|e| ExecutionError::CreateDir {
        path: path.to_path_buf(),
        error: e.to_string(),
    })
}

/// Write a line of text to standard output
pub fn print_text(text: &str) {
    println!("{}", text);
}

/// Run a command line through the context's interpreter and wait for it
pub fn run_process(command_line: &str, ctx: &Context, logger: &dyn Logger) -> ExecutionResult<()> {
    let (program, interpreter_args) = match ctx.interpreter.split_first() {
        Some(split) => split,
        None => {
            return Err(ExecutionError::Spawn {
                command: command_line.to_string(),
                error: "no interpreter configured".to_string(),
            })
        }
    };

    logger.info(Verbosity::Debug, &format!("[RUN] {}", command_line));

    let mut command = StdCommand::new(program);
    command.args(interpreter_args);
    command.arg(command_line);
    command.current_dir(&ctx.working_dir);

    command.stdin(Stdio::inherit());
    command.stdout(Stdio::inherit());
    command.stderr(Stdio::inherit());

    // `${ENV}` inside alias text is left for the shell to expand
    if let Some(environment) = &ctx.environment {
        command.env(ENV_PLACEHOLDER, environment);
    }

    let status = command.status().map_err(|e| ExecutionError::Spawn {
        command: command_line.to_string(),
        error: e.to_string(),
    })?;

    if !status.success() {
        return Err(ExecutionError::CommandFailed {
            command: command_line.to_string(),
            code: status.code(),
        });
    }

    Ok(())
}
