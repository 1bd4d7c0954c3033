//! `ProxyTestRunner`: configure a download task with the fixed request,
//! execute it once and turn the result into an exit status.

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;

use crate::context::{BuildOutcome, ExecutionContext, TracingListener};
use crate::request::DownloadRequest;
use crate::task::{DownloadTask, TaskFailure};

/// Name of the run as seen by listeners.
pub const PROJECT_NAME: &str = "NetBeans Proxy Tests";

/// Context for a proxy test run with the console sink attached.
pub fn proxy_test_context() -> ExecutionContext {
    ExecutionContext::new(PROJECT_NAME).with_listener(Arc::new(TracingListener))
}

pub struct ProxyTestRunner<T> {
    task: T,
    request: DownloadRequest,
}

impl<T: DownloadTask> ProxyTestRunner<T> {
    pub fn new(task: T) -> Self {
        Self::with_request(task, DownloadRequest::netbeans())
    }

    pub fn with_request(task: T, request: DownloadRequest) -> Self {
        Self { task, request }
    }

    /// Hand the request to the task and run it. The runner is consumed: a
    /// request is executed exactly once.
    pub fn execute(self, ctx: &ExecutionContext) -> Result<(), TaskFailure> {
        let Self { mut task, request } = self;
        ctx.build_started();
        let started = Instant::now();

        task.configure(request.into_options());
        let result = task.execute(ctx);

        let outcome = match &result {
            Ok(()) => BuildOutcome::Success,
            Err(e) => BuildOutcome::Failed(e.to_string()),
        };
        ctx.build_finished(&outcome, started.elapsed());
        result
    }

    /// Like [`execute`](Self::execute) but mapped to a process exit status.
    /// The failure has already reached the listeners (stderr for the console sink).
    pub fn run(self, ctx: &ExecutionContext) -> ExitCode {
        ExitCode::from(exit_status(&self.execute(ctx)))
    }
}

/// 0 on success, 1 on any task failure.
pub fn exit_status(result: &Result<(), TaskFailure>) -> u8 {
    match result {
        Ok(()) => 0,
        Err(_) => 1,
    }
}
