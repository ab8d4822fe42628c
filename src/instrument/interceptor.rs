// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! The record sequence around one wrapped call.

use std::any::Any;
use std::fmt::Display;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use crate::event::{CognitiveEvent, Level, OperationStatus, OperationalEvent};
use crate::logger::{Logger, RecordOptions};
use crate::trace::CallContext;

use super::output::{short_type_name, truncate_summary, MethodOutput};
use super::CallShape;

/// Goal recorded on cognitive events extracted from a result.
fn goal_for(method: &str) -> String {
    format!("Execute {}", method)
}

/// Model recorded on cognitive events extracted from a result.
const EXTRACTED_MODEL: &str = "agent_method";

/// Error type recorded for a panicking call.
pub(crate) const PANIC_ERROR_TYPE: &str = "panic";

#[derive(Debug)]
pub(crate) struct Interceptor {
    logger: Arc<Logger>,
    agent: String,
    methods: Vec<String>,
}

impl Interceptor {
    pub(crate) fn new(logger: Arc<Logger>, agent: String, methods: Vec<String>) -> Self {
        Self {
            logger,
            agent,
            methods,
        }
    }

    pub(crate) fn wraps(&self, method: &str) -> bool {
        self.methods.iter().any(|m| m == method)
    }

    pub(crate) fn methods(&self) -> &[String] {
        &self.methods
    }

    pub(crate) fn agent(&self) -> &str {
        &self.agent
    }

    pub(crate) fn logger(&self) -> &Arc<Logger> {
        &self.logger
    }

    /// Run a synchronous call, recording start and its outcome.
    pub(crate) fn run<R, E, F>(
        &self,
        method: &str,
        shape: &CallShape,
        ctx: Option<&CallContext>,
        body: F,
    ) -> Result<R, E>
    where
        R: MethodOutput,
        E: Display,
        F: FnOnce() -> Result<R, E>,
    {
        let started = self.start(method, shape, ctx);
        match panic::catch_unwind(AssertUnwindSafe(body)) {
            Ok(Ok(value)) => Ok(self.complete(method, ctx, started, value)),
            Ok(Err(error)) => {
                self.fail(method, shape, ctx, started, &error);
                Err(error)
            }
            Err(payload) => {
                self.panicked(method, shape, ctx, started, payload.as_ref());
                panic::resume_unwind(payload)
            }
        }
    }

    fn options(&self, ctx: Option<&CallContext>, level: Level) -> RecordOptions {
        let options = RecordOptions::at(level);
        match ctx {
            Some(ctx) => options.with_trace_id(ctx.trace_id().clone()),
            None => options,
        }
    }

    fn operational(&self, method: &str, status: OperationStatus, ctx: Option<&CallContext>) -> OperationalEvent {
        let event = OperationalEvent::new(method, status);
        match ctx.and_then(|c| c.caller()) {
            Some(caller) => event.with_caller(caller),
            None => event,
        }
    }

    /// Record the start event. The returned instant is taken before the
    /// event is written, so the write counts toward the call's duration.
    pub(crate) fn start(&self, method: &str, shape: &CallShape, ctx: Option<&CallContext>) -> Instant {
        let started = Instant::now();
        let event = self
            .operational(method, OperationStatus::Start, ctx)
            .with_metadata("args_count", shape.positional)
            .with_metadata("kwargs_keys", shape.keywords.clone());
        self.logger
            .record_operational(&self.agent, event, self.options(ctx, Level::Info));
        started
    }

    pub(crate) fn complete<R: MethodOutput>(
        &self,
        method: &str,
        ctx: Option<&CallContext>,
        started: Instant,
        value: R,
    ) -> R {
        let event = self
            .operational(method, OperationStatus::Complete, ctx)
            .with_duration(started.elapsed())
            .with_result_summary(truncate_summary(value.summary()))
            .with_metadata("result_type", value.type_tag());
        self.logger
            .record_operational(&self.agent, event, self.options(ctx, Level::Info));

        let (value, reasoning) = value.split_reasoning();
        if let Some(thought) = reasoning {
            let event = CognitiveEvent::new()
                .with_thought(thought)
                .with_goal(goal_for(method))
                .with_model(EXTRACTED_MODEL);
            self.logger
                .record_cognitive(&self.agent, event, self.options(ctx, Level::Info));
        }
        value
    }

    pub(crate) fn fail<E: Display>(
        &self,
        method: &str,
        shape: &CallShape,
        ctx: Option<&CallContext>,
        started: Instant,
        error: &E,
    ) {
        let error_type = short_type_name::<E>();
        self.record_error(method, shape, ctx, started, &error_type, &error.to_string());
    }

    fn panicked(
        &self,
        method: &str,
        shape: &CallShape,
        ctx: Option<&CallContext>,
        started: Instant,
        payload: &(dyn Any + Send),
    ) {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string panic payload".to_string());
        self.record_error(method, shape, ctx, started, PANIC_ERROR_TYPE, &message);
    }

    fn record_error(
        &self,
        method: &str,
        shape: &CallShape,
        ctx: Option<&CallContext>,
        started: Instant,
        error_type: &str,
        message: &str,
    ) {
        let event = self
            .operational(method, OperationStatus::Error, ctx)
            .with_duration(started.elapsed())
            .with_error(format!("{}: {}", error_type, message))
            .with_metadata("error_type", error_type)
            .with_metadata("args_count", shape.positional)
            .with_metadata("kwargs_keys", shape.keywords.clone());
        self.logger
            .record_operational(&self.agent, event, self.options(ctx, Level::Error));
    }
}
