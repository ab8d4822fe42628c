// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! End-to-end tests for instrumented agents.

use std::convert::Infallible;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use alog::bridge::{AttributeValue, RecordingBackend, SpanBridge};
use alog::event::{OperationStatus, Surface};
use alog::reasoning::{TRACE_END, TRACE_START};
use alog::sink::SinkSet;
use alog::{instrument, CallContext, CallShape, Instrumentable, Level, Logger, Reasoned};

#[derive(Debug, PartialEq)]
struct LookupError {
    key: String,
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no entry for {}", self.key)
    }
}

impl std::error::Error for LookupError {}

struct ResearchAgent {
    answer: String,
}

impl ResearchAgent {
    fn new(answer: &str) -> Self {
        Self {
            answer: answer.to_string(),
        }
    }

    fn respond(&self, _question: &str) -> String {
        self.answer.clone()
    }

    fn lookup(&self, key: &str) -> Result<String, LookupError> {
        Err(LookupError {
            key: key.to_string(),
        })
    }

    fn score(&self) -> Reasoned<f64> {
        Reasoned::new(0.75, "two of four sources agree")
    }

    async fn fetch(&self, delay_ms: u64) -> Result<Vec<String>, LookupError> {
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        Ok(vec!["doc-1".to_string(), "doc-2".to_string()])
    }
}

impl Instrumentable for ResearchAgent {
    fn operations(&self) -> &'static [&'static str] {
        &["respond", "lookup", "score", "fetch"]
    }
}

fn memory_logger() -> Arc<Logger> {
    Arc::new(Logger::new(SinkSet::memory(false)))
}

fn operational_statuses(logger: &Logger) -> Vec<OperationStatus> {
    logger
        .get_logs(Some(Surface::Operational))
        .unwrap()
        .iter()
        .filter_map(|e| e.operational().map(|o| o.status))
        .collect()
}

#[test]
fn test_answer_with_reasoning_trace() {
    let logger = memory_logger();
    let text = format!("ANSWER{}R{}", TRACE_START, TRACE_END);
    let agent = instrument(logger.clone(), ResearchAgent::new(&text), "researcher", None);

    let out: Result<String, Infallible> =
        agent.call("respond", CallShape::positional(1), |a| Ok(a.respond("q")));
    assert_eq!(out.unwrap(), "ANSWER");

    let cognitive = logger.get_logs(Some(Surface::Cognitive)).unwrap();
    assert_eq!(cognitive.len(), 1);
    assert_eq!(cognitive[0].cognitive().unwrap().thought.as_deref(), Some("R"));

    // The summary records the raw result, before extraction.
    let ops = logger.get_logs(Some(Surface::Operational)).unwrap();
    let summary = ops[1].operational().unwrap().result_summary.clone().unwrap();
    assert!(summary.starts_with("ANSWER==="));
}

#[test]
fn test_plain_text_is_returned_untouched() {
    let logger = memory_logger();
    let agent = instrument(logger.clone(), ResearchAgent::new("  spaced  "), "researcher", None);

    let out: Result<String, Infallible> = agent.call("respond", CallShape::positional(1), |a| Ok(a.respond("q")));
    assert_eq!(out.unwrap(), "  spaced  ");
    assert!(logger.get_logs(Some(Surface::Cognitive)).unwrap().is_empty());
}

#[test]
fn test_long_result_summary_is_truncated() {
    let logger = memory_logger();
    let agent = instrument(logger.clone(), ResearchAgent::new(&"z".repeat(250)), "researcher", None);

    let out: Result<String, Infallible> = agent.call("respond", CallShape::positional(1), |a| Ok(a.respond("q")));
    assert_eq!(out.unwrap().len(), 250);

    let ops = logger.get_logs(Some(Surface::Operational)).unwrap();
    let summary = ops[1].operational().unwrap().result_summary.clone().unwrap();
    assert_eq!(summary, format!("{}...", "z".repeat(100)));
}

#[test]
fn test_failing_call_records_start_and_error_only() {
    let logger = memory_logger();
    let agent = instrument(logger.clone(), ResearchAgent::new(""), "researcher", None);

    let err = agent
        .call("lookup", CallShape::positional(1), |a| a.lookup("missing"))
        .unwrap_err();
    assert_eq!(err, LookupError { key: "missing".to_string() });

    assert_eq!(
        operational_statuses(&logger),
        vec![OperationStatus::Start, OperationStatus::Error]
    );
    let ops = logger.get_logs(Some(Surface::Operational)).unwrap();
    assert_eq!(ops[1].level(), Level::Error);
    assert_eq!(
        ops[1].operational().unwrap().error.as_deref(),
        Some("LookupError: no entry for missing")
    );
}

#[test]
fn test_zero_methods_hands_back_identical_target() {
    let logger = memory_logger();
    let target = Arc::new(ResearchAgent::new("x"));

    let agent = instrument(logger.clone(), Arc::clone(&target), "researcher", Some(&["unknown"]));
    assert!(!agent.is_active());

    let back = agent.into_inner();
    assert!(Arc::ptr_eq(&back, &target));
    assert_eq!(logger.get_stats().unwrap().total_events, 0);
}

#[test]
fn test_structured_reasoning() {
    let logger = memory_logger();
    let agent = instrument(logger.clone(), ResearchAgent::new(""), "researcher", Some(&["score"]));

    let out: Result<Reasoned<f64>, Infallible> = agent.call("score", CallShape::new(), |a| Ok(a.score()));
    let out = out.unwrap();
    assert_eq!(out.value, 0.75);
    assert!(out.reasoning.is_none());

    let cognitive = logger.get_logs(Some(Surface::Cognitive)).unwrap();
    let event = cognitive[0].cognitive().unwrap();
    assert_eq!(event.thought.as_deref(), Some("two of four sources agree"));
    assert_eq!(event.goal.as_deref(), Some("Execute score"));
}

#[test]
fn test_separate_chains_get_separate_traces() {
    let logger = memory_logger();
    let agent = instrument(logger.clone(), ResearchAgent::new("ok"), "researcher", None);

    let first = CallContext::new();
    let second = CallContext::new();
    for ctx in [&first, &second] {
        let _: Result<String, Infallible> =
            agent.call_in(ctx, "respond", CallShape::positional(1), |a, _| Ok(a.respond("q")));
    }

    let groups = alog::merge::group_by_trace(&logger.get_logs(None).unwrap());
    assert_eq!(groups.len(), 2);
    assert_eq!(&groups[0].trace_id, first.trace_id());
    assert_eq!(&groups[1].trace_id, second.trace_id());
}

#[test]
fn test_spans_exported_per_envelope() {
    let backend = Arc::new(RecordingBackend::new());
    let logger = Arc::new(Logger::new(SinkSet::memory(false)).with_bridge(SpanBridge::new(backend.clone())));
    let agent = instrument(logger, ResearchAgent::new("ok"), "researcher", None);

    let _ = agent.call("lookup", CallShape::positional(1), |a| a.lookup("k"));

    let spans = backend.spans();
    assert_eq!(spans.len(), 2);
    assert!(spans.iter().all(|s| s.name == "researcher.operational"));
    assert_eq!(spans[1].attribute("status"), Some(&AttributeValue::from("error")));
    assert_eq!(
        spans[1].attribute("error"),
        Some(&AttributeValue::from("LookupError: no entry for k"))
    );
}

#[tokio::test]
async fn test_async_call_is_recorded() {
    let logger = memory_logger();
    let agent = instrument(logger.clone(), ResearchAgent::new(""), "researcher", Some(&["fetch"]));

    let docs = agent
        .call_async("fetch", CallShape::positional(1), |a| a.fetch(5))
        .await
        .unwrap();
    assert_eq!(docs.len(), 2);

    assert_eq!(
        operational_statuses(&logger),
        vec![OperationStatus::Start, OperationStatus::Complete]
    );
    let ops = logger.get_logs(Some(Surface::Operational)).unwrap();
    let complete = ops[1].operational().unwrap();
    assert_eq!(complete.metadata["result_type"], "Vec");
    assert!(complete.duration_sec.unwrap() >= 0.005);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_async_chains() {
    let logger = memory_logger();
    let agent = Arc::new(instrument(logger.clone(), ResearchAgent::new(""), "researcher", None));

    let tasks: Vec<_> = (0..4)
        .map(|_| {
            let agent = Arc::clone(&agent);
            tokio::spawn(async move {
                let ctx = CallContext::new();
                agent
                    .call_async_in(&ctx, "fetch", CallShape::positional(1), |a| a.fetch(1))
                    .await
                    .map(|_| ctx)
            })
        })
        .collect();

    let mut contexts = Vec::new();
    for task in tasks {
        contexts.push(task.await.unwrap().unwrap());
    }

    let logs = logger.get_logs(Some(Surface::Operational)).unwrap();
    assert_eq!(logs.len(), 8);
    for ctx in &contexts {
        assert_eq!(logs.iter().filter(|e| e.trace_id() == ctx.trace_id()).count(), 2);
    }
}
