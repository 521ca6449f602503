use crate::edit::{self, EditKind};
use crate::rebase::{self, TargetRef};
use crate::{Span, SpanEdit};

/// Net effect of a recommendation. `document: None` means the final text is
/// identical to the input, even if intermediate edits changed and reverted
/// it; `spans: None` means no rebase ran, so annotation positions are
/// untouched.
pub struct Outcome {
    pub document: Option<Vec<u16>>,
    pub spans: Option<Vec<Span>>,
}

/// Apply a recommendation's edits in order, threading the evolving document
/// and span collection through each step. Edits that cannot anchor or
/// relocate are skipped; the rest of the batch still applies.
pub fn apply_recommendation(document: &[u16], spans: &[Span], edits: &[SpanEdit]) -> Outcome {
    let mut working_doc = document.to_vec();
    let mut working_spans = spans.to_vec();
    let mut spans_changed = false;

    for span_edit in edits {
        let Some(kind) = EditKind::parse(&span_edit.edit_type) else {
            continue;
        };

        // Targets resolve against the current collection, not the input one:
        // earlier edits in the batch may already have moved or dropped spans.
        let target = span_edit.target_span_id.as_deref().and_then(|id| {
            working_spans
                .iter()
                .find(|span| span.id.as_deref() == Some(id))
                .cloned()
        });

        let Some(outcome) = edit::apply_span_edit(&working_doc, span_edit, target.as_ref())
        else {
            continue;
        };

        // The spliced-in length falls out of the size change plus the size of
        // the range it displaced.
        let replacement_len =
            outcome.document.len() + (outcome.end - outcome.start) - working_doc.len();

        let target_ref = TargetRef {
            id: target
                .as_ref()
                .and_then(|span| span.id.as_deref())
                .or(span_edit.target_span_id.as_deref()),
            start: target.as_ref().map(|span| span.start),
            end: target.as_ref().map(|span| span.end),
            category: target.as_ref().and_then(|span| span.category.as_deref()),
        };

        working_spans = rebase::rebase(
            &working_spans,
            outcome.start as u32,
            outcome.end as u32,
            replacement_len as u32,
            &target_ref,
            kind == EditKind::Remove,
        );
        spans_changed = true;
        working_doc = outcome.document;
    }

    Outcome {
        document: (working_doc.as_slice() != document).then_some(working_doc),
        spans: spans_changed.then_some(working_spans),
    }
}
