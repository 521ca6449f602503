mod display;
mod edit;
mod rebase;
mod recommend;
mod relocate;
mod text;

use napi_derive::napi;

use crate::rebase::TargetRef;
use crate::relocate::Hints;
use crate::text::{canonicalize, from_utf16, is_blank, to_utf16};

/// A categorized annotation over a half-open `[start, end)` range of the
/// prompt, measured in UTF-16 code units over the canonical (NFC) form.
#[napi(object)]
#[derive(Clone)]
pub struct Span {
    pub id: Option<String>,
    pub category: Option<String>,
    /// The annotated text as it read when the span was created. Allowed to
    /// drift stale once other edits touch the document.
    pub quote: String,
    /// Text captured immediately before the span at creation time. A
    /// disambiguation hint only, never required to still be accurate.
    #[napi(js_name = "leftCtx")]
    pub left_ctx: Option<String>,
    /// Text captured immediately after the span at creation time.
    #[napi(js_name = "rightCtx")]
    pub right_ctx: Option<String>,
    pub start: u32,
    pub end: u32,
    /// Cached grapheme offset of `start`; cleared whenever the span moves.
    #[napi(js_name = "displayStart")]
    pub display_start: Option<u32>,
    /// Cached grapheme offset of `end`; cleared whenever the span moves.
    #[napi(js_name = "displayEnd")]
    pub display_end: Option<u32>,
}

/// One edit of a recommendation: `"replaceSpanText"` or `"removeSpan"`,
/// targeting a span by id or, failing that, by anchor quote.
#[napi(object)]
#[derive(Clone)]
pub struct SpanEdit {
    #[napi(js_name = "type")]
    pub edit_type: String,
    #[napi(js_name = "targetSpanId")]
    pub target_span_id: Option<String>,
    #[napi(js_name = "replacementText")]
    pub replacement_text: Option<String>,
    #[napi(js_name = "anchorQuote")]
    pub anchor_quote: Option<String>,
}

#[napi(object)]
#[derive(Clone, Default)]
pub struct RelocateHints {
    #[napi(js_name = "leftCtx")]
    pub left_ctx: Option<String>,
    #[napi(js_name = "rightCtx")]
    pub right_ctx: Option<String>,
    #[napi(js_name = "preferredIndex")]
    pub preferred_index: Option<u32>,
}

#[napi(object)]
pub struct QuoteMatch {
    pub start: u32,
    pub end: u32,
}

#[napi(object)]
pub struct EditResult {
    /// Absent when the edit was a no-op and the editor need not re-render.
    #[napi(js_name = "updatedDocument")]
    pub updated_document: Option<String>,
    #[napi(js_name = "matchStart")]
    pub match_start: Option<u32>,
    #[napi(js_name = "matchEnd")]
    pub match_end: Option<u32>,
}

/// Identity of the span an edit was aimed at, as last known to the caller.
#[napi(object)]
#[derive(Clone, Default)]
pub struct RebaseTargetRef {
    pub id: Option<String>,
    pub start: Option<u32>,
    pub end: Option<u32>,
    pub category: Option<String>,
}

/// Highlight snapshot wrapper some callers hold spans in. The signature
/// describes the document version the spans were derived from; rebasing
/// passes it through untouched, since the rebaser never sees the new text.
#[napi(object)]
#[derive(Clone)]
pub struct SpanSnapshot {
    pub signature: Option<String>,
    pub spans: Vec<Span>,
}

#[napi(object)]
pub struct RecommendationResult {
    /// Absent when the final document equals the input document.
    #[napi(js_name = "updatedDocument")]
    pub updated_document: Option<String>,
    /// Absent when no edit moved any annotation.
    #[napi(js_name = "updatedSpans")]
    pub updated_spans: Option<Vec<Span>>,
}

#[napi(object)]
pub struct DisplayRange {
    #[napi(js_name = "displayStart")]
    pub display_start: u32,
    #[napi(js_name = "displayEnd")]
    pub display_end: u32,
}

/// Find the best occurrence of a remembered quote in a possibly-changed
/// document. Returns `null` when the quote is blank or no longer occurs.
#[napi(js_name = "relocateQuote")]
pub fn relocate_quote(
    document: String,
    quote: String,
    hints: Option<RelocateHints>,
) -> Option<QuoteMatch> {
    if is_blank(&quote) {
        return None;
    }

    let document_units = to_utf16(&canonicalize(&document));
    let quote_units = to_utf16(&canonicalize(&quote));
    let hints = hints.unwrap_or_default();
    let left_units = hint_units(hints.left_ctx.as_deref());
    let right_units = hint_units(hints.right_ctx.as_deref());

    let range = relocate::relocate(
        &document_units,
        &quote_units,
        &Hints {
            left_ctx: left_units.as_deref(),
            right_ctx: right_units.as_deref(),
            preferred_index: hints.preferred_index.map(|index| index as usize),
        },
    )?;

    Some(QuoteMatch {
        start: range.start as u32,
        end: range.end as u32,
    })
}

/// Apply one edit to the document, anchoring by the target span's quote when
/// a target is supplied. A failed or degenerate edit returns an empty result
/// rather than erroring.
#[napi(js_name = "applySpanEdit")]
pub fn apply_span_edit(document: String, edit: SpanEdit, target: Option<Span>) -> EditResult {
    let document_units = to_utf16(&canonicalize(&document));

    match edit::apply_span_edit(&document_units, &edit, target.as_ref()) {
        Some(outcome) => EditResult {
            updated_document: Some(from_utf16(&outcome.document)),
            match_start: Some(outcome.start as u32),
            match_end: Some(outcome.end as u32),
        },
        None => EditResult {
            updated_document: None,
            match_start: None,
            match_end: None,
        },
    }
}

/// Rebase a span collection after an edit replaced `[matchStart, matchEnd)`
/// with `replacementLength` code units. `removal` marks edits that deleted
/// the target span outright.
#[napi(js_name = "rebaseSpans")]
pub fn rebase_spans(
    spans: Vec<Span>,
    match_start: u32,
    match_end: u32,
    replacement_length: u32,
    target: RebaseTargetRef,
    removal: Option<bool>,
) -> Vec<Span> {
    rebase::rebase(
        &spans,
        match_start,
        match_end,
        replacement_length,
        &to_target_ref(&target),
        removal.unwrap_or(false),
    )
}

/// Same rebase over the snapshot-wrapped span container.
#[napi(js_name = "rebaseSnapshot")]
pub fn rebase_snapshot(
    snapshot: SpanSnapshot,
    match_start: u32,
    match_end: u32,
    replacement_length: u32,
    target: RebaseTargetRef,
    removal: Option<bool>,
) -> SpanSnapshot {
    SpanSnapshot {
        signature: snapshot.signature,
        spans: rebase::rebase(
            &snapshot.spans,
            match_start,
            match_end,
            replacement_length,
            &to_target_ref(&target),
            removal.unwrap_or(false),
        ),
    }
}

/// Apply a whole recommendation: each edit in order against the evolving
/// document, rebasing the span collection after every successful edit.
#[napi(js_name = "applyRecommendation")]
pub fn apply_recommendation(
    document: String,
    spans: Vec<Span>,
    edits: Vec<SpanEdit>,
) -> RecommendationResult {
    let document_units = to_utf16(&canonicalize(&document));
    let outcome = recommend::apply_recommendation(&document_units, &spans, &edits);

    RecommendationResult {
        updated_document: outcome.document.as_deref().map(from_utf16),
        updated_spans: outcome.spans,
    }
}

/// Bring a prompt into the canonical composition the engine measures every
/// offset against. Hosts normalize once and keep their offsets in the same
/// coordinate space.
#[napi(js_name = "canonicalizeDocument")]
pub fn canonicalize_document(text: String) -> String {
    canonicalize(&text)
}

/// Recompute a span's display (grapheme) offsets from its UTF-16 range.
#[napi(js_name = "displayRange")]
pub fn display_range(document: String, start: u32, end: u32) -> DisplayRange {
    let document = canonicalize(&document);
    let (display_start, display_end) =
        display::display_offsets(&document, start as usize, end as usize);

    DisplayRange {
        display_start: display_start as u32,
        display_end: display_end as u32,
    }
}

fn hint_units(hint: Option<&str>) -> Option<Vec<u16>> {
    hint.filter(|value| !value.is_empty())
        .map(|value| to_utf16(&canonicalize(value)))
}

fn to_target_ref(target: &RebaseTargetRef) -> TargetRef<'_> {
    TargetRef {
        id: target.id.as_deref(),
        start: target.start,
        end: target.end,
        category: target.category.as_deref(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(id: &str, start: u32, end: u32, quote: &str) -> Span {
        Span {
            id: Some(id.to_string()),
            category: None,
            quote: quote.to_string(),
            left_ctx: None,
            right_ctx: None,
            start,
            end,
            display_start: None,
            display_end: None,
        }
    }

    #[test]
    fn relocate_quote_uses_left_context_to_pick_occurrence() {
        let found = relocate_quote(
            "Paint the wall red. Paint the wall red again.".to_string(),
            "Paint the wall red".to_string(),
            Some(RelocateHints {
                left_ctx: Some("red. ".to_string()),
                ..RelocateHints::default()
            }),
        )
        .expect("quote occurs");
        assert_eq!((found.start, found.end), (20, 38));
    }

    #[test]
    fn relocate_quote_rejects_blank_quote() {
        assert!(relocate_quote("text".to_string(), "   ".to_string(), None).is_none());
    }

    #[test]
    fn relocate_quote_matches_across_unicode_forms() {
        // Decomposed document, composed quote; both canonicalize to NFC.
        let found = relocate_quote(
            "a cafe\u{0301} at night".to_string(),
            "caf\u{00e9}".to_string(),
            None,
        )
        .expect("quote occurs after canonicalization");
        assert_eq!((found.start, found.end), (2, 6));
    }

    #[test]
    fn apply_span_edit_replaces_second_occurrence_by_recorded_context() {
        let mut target = span("t", 20, 38, "Paint the wall red");
        target.left_ctx = Some("red. ".to_string());

        let edit = SpanEdit {
            edit_type: "replaceSpanText".to_string(),
            target_span_id: Some("t".to_string()),
            replacement_text: Some("Paint the wall crimson".to_string()),
            anchor_quote: None,
        };
        let result = apply_span_edit(
            "Paint the wall red. Paint the wall red again.".to_string(),
            edit,
            Some(target),
        );

        assert_eq!(
            result.updated_document.as_deref(),
            Some("Paint the wall red. Paint the wall crimson again.")
        );
        assert_eq!(result.match_start, Some(20));
        assert_eq!(result.match_end, Some(38));
    }

    #[test]
    fn apply_span_edit_reports_noop_when_quote_is_gone() {
        let edit = SpanEdit {
            edit_type: "replaceSpanText".to_string(),
            target_span_id: None,
            replacement_text: Some("anything".to_string()),
            anchor_quote: Some("vanished".to_string()),
        };
        let result = apply_span_edit("some other text".to_string(), edit, None);

        assert!(result.updated_document.is_none());
        assert!(result.match_start.is_none());
        assert!(result.match_end.is_none());
    }

    #[test]
    fn apply_span_edit_without_any_anchor_is_a_noop() {
        let edit = SpanEdit {
            edit_type: "removeSpan".to_string(),
            target_span_id: None,
            replacement_text: None,
            anchor_quote: None,
        };
        let result = apply_span_edit("text".to_string(), edit, None);
        assert!(result.updated_document.is_none());
    }

    #[test]
    fn rebase_spans_matches_bare_and_snapshot_surfaces() {
        let spans = vec![span("a", 0, 5, "alpha"), span("b", 10, 15, "bravo")];
        let target = RebaseTargetRef {
            id: Some("a".to_string()),
            start: Some(0),
            end: Some(5),
            category: None,
        };

        let bare = rebase_spans(spans.clone(), 0, 5, 9, target.clone(), None);
        let snapshot = rebase_snapshot(
            SpanSnapshot {
                signature: Some("v1".to_string()),
                spans,
            },
            0,
            5,
            9,
            target,
            None,
        );

        assert_eq!(snapshot.signature.as_deref(), Some("v1"));
        assert_eq!(bare.len(), snapshot.spans.len());
        for (left, right) in bare.iter().zip(snapshot.spans.iter()) {
            assert_eq!((left.start, left.end), (right.start, right.end));
        }
        assert_eq!((bare[0].start, bare[0].end), (0, 9));
        assert_eq!((bare[1].start, bare[1].end), (14, 19));
    }

    #[test]
    fn apply_recommendation_round_trip() {
        let spans = vec![span("a", 0, 3, "red"), span("b", 4, 8, "barn")];
        let edits = vec![SpanEdit {
            edit_type: "replaceSpanText".to_string(),
            target_span_id: Some("a".to_string()),
            replacement_text: Some("weathered".to_string()),
            anchor_quote: None,
        }];

        let result = apply_recommendation("red barn".to_string(), spans, edits);
        assert_eq!(result.updated_document.as_deref(), Some("weathered barn"));
        let spans = result.updated_spans.expect("spans rebased");
        assert_eq!((spans[0].start, spans[0].end), (0, 9));
        assert_eq!((spans[1].start, spans[1].end), (10, 14));
    }

    #[test]
    fn apply_recommendation_with_no_effective_edit_reports_null() {
        let spans = vec![span("a", 0, 3, "red")];
        let edits = vec![SpanEdit {
            edit_type: "replaceSpanText".to_string(),
            target_span_id: Some("a".to_string()),
            replacement_text: Some("red".to_string()),
            anchor_quote: None,
        }];

        let result = apply_recommendation("red barn".to_string(), spans, edits);
        assert!(result.updated_document.is_none());
        assert!(result.updated_spans.is_none());
    }

    #[test]
    fn canonicalize_document_composes() {
        assert_eq!(canonicalize_document("cafe\u{0301}".to_string()), "caf\u{00e9}");
    }

    #[test]
    fn display_range_counts_grapheme_clusters() {
        let result = display_range("\u{1f3a5}\u{1f39e}cut".to_string(), 4, 7);
        assert_eq!((result.display_start, result.display_end), (2, 5));
    }
}
