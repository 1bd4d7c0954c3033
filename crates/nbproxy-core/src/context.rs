//! Execution context: a named run and the listeners observing it.
//!
//! Tasks never log directly; they report through the context so that every
//! attached listener (the console sink, or a recorder in tests) sees the same
//! events.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::Level;

/// How a run ended, as reported to listeners.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildOutcome {
    Success,
    /// Failure with its rendered message.
    Failed(String),
}

/// Observer of run events.
pub trait BuildListener: Send + Sync {
    fn build_started(&self, _build: &str) {}

    /// A message emitted by the named task (or by the run itself when `task` is `None`).
    fn message(&self, level: Level, task: Option<&str>, text: &str);

    fn build_finished(&self, _build: &str, _outcome: &BuildOutcome, _elapsed: Duration) {}
}

/// Named run plus its listeners. Created at process entry, passed by
/// reference to the task, dropped at exit.
pub struct ExecutionContext {
    name: String,
    listeners: Vec<Arc<dyn BuildListener>>,
}

impl fmt::Debug for ExecutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionContext")
            .field("name", &self.name)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl ExecutionContext {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            listeners: Vec::new(),
        }
    }

    pub fn with_listener(mut self, listener: Arc<dyn BuildListener>) -> Self {
        self.add_listener(listener);
        self
    }

    pub fn add_listener(&mut self, listener: Arc<dyn BuildListener>) {
        self.listeners.push(listener);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn log(&self, level: Level, task: Option<&str>, text: &str) {
        for l in &self.listeners {
            l.message(level, task, text);
        }
    }

    pub fn build_started(&self) {
        for l in &self.listeners {
            l.build_started(&self.name);
        }
    }

    pub fn build_finished(&self, outcome: &BuildOutcome, elapsed: Duration) {
        for l in &self.listeners {
            l.build_finished(&self.name, outcome, elapsed);
        }
    }

    /// Logging handle bound to one task name.
    pub fn task_log<'a>(&'a self, task: &'a str) -> TaskLog<'a> {
        TaskLog { ctx: self, task }
    }
}

/// Shorthand for logging on behalf of a task.
#[derive(Clone, Copy)]
pub struct TaskLog<'a> {
    ctx: &'a ExecutionContext,
    task: &'a str,
}

impl TaskLog<'_> {
    pub fn error(&self, text: impl AsRef<str>) {
        self.ctx.log(Level::ERROR, Some(self.task), text.as_ref());
    }

    pub fn warn(&self, text: impl AsRef<str>) {
        self.ctx.log(Level::WARN, Some(self.task), text.as_ref());
    }

    pub fn info(&self, text: impl AsRef<str>) {
        self.ctx.log(Level::INFO, Some(self.task), text.as_ref());
    }

    pub fn debug(&self, text: impl AsRef<str>) {
        self.ctx.log(Level::DEBUG, Some(self.task), text.as_ref());
    }
}

/// The console sink: forwards every event to `tracing`, whose subscriber
/// (see [`crate::logging`]) splits stdout and stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingListener;

impl BuildListener for TracingListener {
    fn build_started(&self, build: &str) {
        tracing::debug!(build, "build started");
    }

    fn message(&self, level: Level, task: Option<&str>, text: &str) {
        let task = task.unwrap_or("-");
        match level {
            Level::ERROR => tracing::error!(task, "{}", text),
            Level::WARN => tracing::warn!(task, "{}", text),
            Level::INFO => tracing::info!(task, "{}", text),
            Level::DEBUG => tracing::debug!(task, "{}", text),
            _ => tracing::trace!(task, "{}", text),
        }
    }

    fn build_finished(&self, build: &str, outcome: &BuildOutcome, elapsed: Duration) {
        match outcome {
            BuildOutcome::Success => tracing::info!(build, "BUILD SUCCESSFUL"),
            BuildOutcome::Failed(message) => {
                tracing::error!(build, "BUILD FAILED");
                tracing::error!(build, "{}", message);
            }
        }
        tracing::info!(build, "Total time: {:.1} seconds", elapsed.as_secs_f64());
    }
}
