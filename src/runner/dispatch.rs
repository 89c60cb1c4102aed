//! Sequential, fail-fast step dispatch
//!
//! A [`Dispatcher`] walks a command's steps in order. Each step is resolved,
//! classified and handed to an [`ActionHandler`]. The first failure stops
//! the walk; effects of earlier steps are kept.

use crate::config::{Command, Config};
use crate::error::{DoshError, ExecutionError, Result};
use crate::runner::{
    Action, ActionHandler, Context, EnvironmentPolicy, Logger, Substitutions, Verbosity,
};

/// Progress of a dispatcher through its steps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// No step executed yet
    Pending,
    /// `step` is the next step to execute
    Running { step: usize },
    /// Every step succeeded
    Succeeded,
    /// `step` failed; later steps were not attempted
    Failed { step: usize },
}

impl RunState {
    pub fn is_terminal(self) -> bool {
        matches!(self, RunState::Succeeded | RunState::Failed { .. })
    }
}

/// Executes the steps of one command
pub struct Dispatcher<'a> {
    steps: &'a [String],
    substitutions: Substitutions<'a>,
    state: RunState,
}

impl<'a> Dispatcher<'a> {
    pub fn new(steps: &'a [String], substitutions: Substitutions<'a>) -> Self {
        Dispatcher {
            steps,
            substitutions,
            state: RunState::Pending,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Execute the next step and return the new state.
    ///
    /// Terminal states are returned unchanged without executing anything.
    pub fn advance(
        &mut self,
        ctx: &Context,
        handler: &mut dyn ActionHandler,
        logger: &dyn Logger,
    ) -> Result<RunState> {
        let index = match self.state {
            RunState::Pending => 0,
            RunState::Running { step } => step,
            RunState::Succeeded | RunState::Failed { .. } => return Ok(self.state),
        };

        if index >= self.steps.len() {
            self.state = RunState::Succeeded;
            return Ok(self.state);
        }

        self.state = RunState::Running { step: index };

        if let Err(e) = self.execute_step(index, ctx, handler, logger) {
            self.state = RunState::Failed { step: index };
            logger.error(Verbosity::Normal, &e.to_string());
            logger.error(
                Verbosity::Debug,
                "The last step was not successful, stopping.",
            );
            return Err(e);
        }

        self.state = if index + 1 == self.steps.len() {
            RunState::Succeeded
        } else {
            RunState::Running { step: index + 1 }
        };
        Ok(self.state)
    }

    /// Execute every remaining step, stopping at the first failure
    pub fn run(
        mut self,
        ctx: &Context,
        handler: &mut dyn ActionHandler,
        logger: &dyn Logger,
    ) -> Result<()> {
        while !self.state.is_terminal() {
            self.advance(ctx, handler, logger)?;
        }
        Ok(())
    }

    fn execute_step(
        &self,
        index: usize,
        ctx: &Context,
        handler: &mut dyn ActionHandler,
        logger: &dyn Logger,
    ) -> Result<()> {
        let resolved = self.substitutions.resolve(&self.steps[index]);
        logger.info(Verbosity::Debug, &format!("{}. {}", index + 1, resolved));

        let action = Action::parse(&resolved)?;
        handler.handle(&action, ctx, logger)?;
        Ok(())
    }
}

/// Check the context's environment against the command's restrictions
pub fn check_environment(name: &str, command: &Command, ctx: &Context) -> Result<()> {
    if ctx.environment_policy == EnvironmentPolicy::Ignore
        || command.is_allowed_in(ctx.environment.as_deref())
    {
        return Ok(());
    }

    Err(DoshError::Execution(ExecutionError::EnvironmentNotAllowed {
        command: name.to_string(),
        environment: ctx.environment.clone(),
    }))
}

/// Run the command `name` from `config`
pub fn run_command(
    config: &Config,
    name: &str,
    ctx: &Context,
    handler: &mut dyn ActionHandler,
    logger: &dyn Logger,
) -> Result<()> {
    let command = config.command(name)?;

    if let Err(e) = check_environment(name, command, ctx) {
        logger.error(Verbosity::Normal, &e.to_string());
        return Err(e);
    }

    logger.info(Verbosity::Debug, &format!("Running command: {}", name));

    let substitutions = Substitutions::new(config, &ctx.args, ctx.environment.as_deref());
    Dispatcher::new(&command.run, substitutions).run(ctx, handler, logger)?;

    logger.success(Verbosity::Debug, &format!("Command '{}' completed", name));
    Ok(())
}
