// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Runtime instrumentation of agent operations.
//!
//! An agent type declares its operation table through [`Instrumentable`].
//! [`instrument`] resolves which of those operations to wrap and returns an
//! [`Instrumented`] handle. Calls routed through the handle record a
//! `start` envelope, then `complete` or `error` (and a cognitive envelope
//! when the result carries a reasoning trace), without changing the result
//! or error the caller sees.
//!
//! ```rust,ignore
//! let planner = instrument(logger, Planner::new(), "planner", None);
//! let plan = planner.call("plan", CallShape::positional(1), |p| p.plan(goal))?;
//! ```

mod interceptor;
mod output;

use std::fmt::{self, Display};
use std::future::Future;
use std::sync::Arc;

use tracing::{debug, info, warn};

pub use output::{short_type_name, truncate_summary, MethodOutput, MAX_SUMMARY_CHARS};

use crate::logger::Logger;
use crate::trace::CallContext;

use interceptor::Interceptor;

/// A type whose operations can be wrapped.
pub trait Instrumentable {
    /// Names of the public operations this type exposes.
    fn operations(&self) -> &'static [&'static str];
}

impl<T: Instrumentable + ?Sized> Instrumentable for Arc<T> {
    fn operations(&self) -> &'static [&'static str] {
        (**self).operations()
    }
}

impl<T: Instrumentable + ?Sized> Instrumentable for Box<T> {
    fn operations(&self) -> &'static [&'static str] {
        (**self).operations()
    }
}

/// Argument shape of one call. Only counts and keyword names are recorded,
/// never argument values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallShape {
    pub positional: usize,
    pub keywords: Vec<String>,
}

impl CallShape {
    /// A call with no arguments.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn positional(count: usize) -> Self {
        Self {
            positional: count,
            keywords: Vec::new(),
        }
    }

    pub fn with_keyword(mut self, name: impl Into<String>) -> Self {
        self.keywords.push(name.into());
        self
    }
}

/// Resolve the operations to wrap on `target`.
///
/// With `methods`, only names present in the target's operation table are
/// kept; without, every declared operation is. When nothing remains the
/// handle is a pass-through that records nothing.
pub fn instrument<T: Instrumentable>(
    logger: Arc<Logger>,
    target: T,
    name: &str,
    methods: Option<&[&str]>,
) -> Instrumented<T> {
    let table = target.operations();
    let declared = |name: &str| table.iter().any(|op| *op == name);

    let candidates: Vec<&str> = match methods {
        Some(requested) => {
            for missing in requested.iter().filter(|m| !declared(m)) {
                debug!(agent = name, method = %missing, "Skipping undeclared operation");
            }
            requested.iter().copied().filter(|m| declared(m)).collect()
        }
        None => table.to_vec(),
    };

    // First occurrence wins.
    let mut selected: Vec<String> = Vec::with_capacity(candidates.len());
    for method in candidates {
        if !selected.iter().any(|s| s == method) {
            selected.push(method.to_string());
        }
    }

    if selected.is_empty() {
        warn!(agent = name, "No valid methods found to instrument");
        return Instrumented {
            interceptor: None,
            target,
        };
    }

    info!(
        agent = name,
        count = selected.len(),
        methods = ?selected,
        "Agent instrumented"
    );

    Instrumented {
        interceptor: Some(Interceptor::new(logger, name.to_string(), selected)),
        target,
    }
}

/// An agent whose declared operations are recorded when called through
/// this handle.
pub struct Instrumented<T> {
    interceptor: Option<Interceptor>,
    target: T,
}

impl<T> Instrumented<T> {
    /// Whether any operation is wrapped.
    pub fn is_active(&self) -> bool {
        self.interceptor.is_some()
    }

    /// The wrapped operation names.
    pub fn methods(&self) -> &[String] {
        match &self.interceptor {
            Some(interceptor) => interceptor.methods(),
            None => &[],
        }
    }

    pub fn wraps(&self, method: &str) -> bool {
        self.interceptor.as_ref().is_some_and(|i| i.wraps(method))
    }

    pub fn agent_name(&self) -> Option<&str> {
        self.interceptor.as_ref().map(|i| i.agent())
    }

    pub fn logger(&self) -> Option<&Arc<Logger>> {
        self.interceptor.as_ref().map(|i| i.logger())
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    /// Direct mutable access. Calls made this way are not recorded.
    pub fn target_mut(&mut self) -> &mut T {
        &mut self.target
    }

    pub fn into_inner(self) -> T {
        self.target
    }

    fn active_for(&self, method: &str) -> Option<&Interceptor> {
        self.interceptor.as_ref().filter(|i| i.wraps(method))
    }

    /// Call `method` through `f`.
    ///
    /// The value or error returned by `f` is handed back unchanged, except
    /// that a text result carrying a reasoning trace is replaced by its main
    /// text. A panic in `f` is recorded and then resumed.
    pub fn call<R, E, F>(&self, method: &str, shape: CallShape, f: F) -> Result<R, E>
    where
        R: MethodOutput,
        E: Display,
        F: FnOnce(&T) -> Result<R, E>,
    {
        let target = &self.target;
        match self.active_for(method) {
            Some(interceptor) => interceptor.run(method, &shape, None, || f(target)),
            None => f(target),
        }
    }

    /// Like [`call`](Self::call) for operations that need `&mut T`.
    pub fn call_mut<R, E, F>(&mut self, method: &str, shape: CallShape, f: F) -> Result<R, E>
    where
        R: MethodOutput,
        E: Display,
        F: FnOnce(&mut T) -> Result<R, E>,
    {
        let target = &mut self.target;
        match self.interceptor.as_ref().filter(|i| i.wraps(method)) {
            Some(interceptor) => interceptor.run(method, &shape, None, || f(target)),
            None => f(target),
        }
    }

    /// Call `method` within an explicit call chain.
    ///
    /// Every envelope of the call uses the chain's trace id instead of the
    /// logger's retained one, and carries the chain's caller. `f` receives a
    /// child context naming this call as the caller, for nested calls.
    pub fn call_in<R, E, F>(&self, ctx: &CallContext, method: &str, shape: CallShape, f: F) -> Result<R, E>
    where
        R: MethodOutput,
        E: Display,
        F: FnOnce(&T, &CallContext) -> Result<R, E>,
    {
        let target = &self.target;
        match self.active_for(method) {
            Some(interceptor) => {
                let child = ctx.child(format!("{}.{}", interceptor.agent(), method));
                interceptor.run(method, &shape, Some(ctx), || f(target, &child))
            }
            None => f(target, ctx),
        }
    }

    /// Call an async operation. Panics are not intercepted.
    pub async fn call_async<'a, R, E, F, Fut>(&'a self, method: &str, shape: CallShape, f: F) -> Result<R, E>
    where
        R: MethodOutput,
        E: Display,
        F: FnOnce(&'a T) -> Fut,
        Fut: Future<Output = Result<R, E>>,
    {
        self.run_async(None, method, shape, f).await
    }

    /// Async counterpart of [`call_in`](Self::call_in).
    pub async fn call_async_in<'a, R, E, F, Fut>(
        &'a self,
        ctx: &CallContext,
        method: &str,
        shape: CallShape,
        f: F,
    ) -> Result<R, E>
    where
        R: MethodOutput,
        E: Display,
        F: FnOnce(&'a T) -> Fut,
        Fut: Future<Output = Result<R, E>>,
    {
        self.run_async(Some(ctx), method, shape, f).await
    }

    async fn run_async<'a, R, E, F, Fut>(
        &'a self,
        ctx: Option<&CallContext>,
        method: &str,
        shape: CallShape,
        f: F,
    ) -> Result<R, E>
    where
        R: MethodOutput,
        E: Display,
        F: FnOnce(&'a T) -> Fut,
        Fut: Future<Output = Result<R, E>>,
    {
        let Some(interceptor) = self.active_for(method) else {
            return f(&self.target).await;
        };

        let started = interceptor.start(method, &shape, ctx);
        match f(&self.target).await {
            Ok(value) => Ok(interceptor.complete(method, ctx, started, value)),
            Err(error) => {
                interceptor.fail(method, &shape, ctx, started, &error);
                Err(error)
            }
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Instrumented<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instrumented")
            .field("agent", &self.agent_name())
            .field("methods", &self.methods())
            .field("target", &self.target)
            .finish()
    }
}
