//! Cascade workflow span helpers.

use tracing::Span;

/// Start a span for one cascade workflow run.
///
/// `workflow.outcome` is declared empty and filled in by
/// [`record_outcome`].
pub fn start_workflow_span(workflow: &'static str) -> Span {
    tracing::info_span!(
        "workflow.run",
        "workflow.name" = workflow,
        "workflow.outcome" = tracing::field::Empty,
    )
}

/// Record a finished step as an event scoped to the workflow span.
pub fn record_step(span: &Span, step: &str, ok: bool) {
    span.in_scope(|| {
        if ok {
            tracing::debug!(step, "step_ok");
        } else {
            tracing::warn!(step, "step_failed");
        }
    });
}

pub fn record_outcome(span: &Span, outcome: &str) {
    span.record("workflow.outcome", outcome);
}
