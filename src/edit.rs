use crate::relocate::{self, Hints};
use crate::text::{canonicalize, is_blank, splice, to_utf16};
use crate::{Span, SpanEdit};

/// Width of the context window derived around a span's last-known range when
/// the span carries no recorded context. Approximate by design; it is only a
/// disambiguation hint.
pub const CONTEXT_WINDOW: usize = 24;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditKind {
    Replace,
    Remove,
}

impl EditKind {
    /// Parse the wire discriminant. Unknown tags yield `None`, which callers
    /// treat as a skipped edit rather than an error.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "replaceSpanText" => Some(Self::Replace),
            "removeSpan" => Some(Self::Remove),
            _ => None,
        }
    }
}

/// One edit with its anchor already resolved to canonical UTF-16.
#[derive(Clone, Copy, Debug)]
pub struct EditRequest<'a> {
    pub kind: EditKind,
    pub quote: &'a [u16],
    pub replacement: &'a [u16],
    pub left_ctx: Option<&'a [u16]>,
    pub right_ctx: Option<&'a [u16]>,
    /// Target span's last-known `[start, end)`, if a target span is known.
    pub last_range: Option<(usize, usize)>,
}

#[derive(Clone, Debug)]
pub struct EditOutcome {
    pub document: Vec<u16>,
    pub start: usize,
    pub end: usize,
}

/// The quote an edit anchors to: the target span's recorded quote when it is
/// usable, otherwise the edit's own anchor quote. Blank quotes anchor nothing.
pub fn resolve_quote<'a>(
    span_quote: Option<&'a str>,
    anchor_quote: Option<&'a str>,
) -> Option<&'a str> {
    span_quote
        .filter(|quote| !is_blank(quote))
        .or_else(|| anchor_quote.filter(|quote| !is_blank(quote)))
}

/// Resolve a wire-level edit against its optional target span and apply it.
/// `document` must already be in canonical UTF-16; the edit's own strings are
/// canonicalized here.
pub fn apply_span_edit(
    document: &[u16],
    span_edit: &SpanEdit,
    target: Option<&Span>,
) -> Option<EditOutcome> {
    let kind = EditKind::parse(&span_edit.edit_type)?;
    let quote = resolve_quote(
        target.map(|span| span.quote.as_str()),
        span_edit.anchor_quote.as_deref(),
    )?;

    let quote_units = to_utf16(&canonicalize(quote));
    let replacement_units = match kind {
        EditKind::Replace => to_utf16(&canonicalize(
            span_edit.replacement_text.as_deref().unwrap_or(""),
        )),
        EditKind::Remove => Vec::new(),
    };
    let left_units = recorded_context(target.and_then(|span| span.left_ctx.as_deref()));
    let right_units = recorded_context(target.and_then(|span| span.right_ctx.as_deref()));

    let request = EditRequest {
        kind,
        quote: &quote_units,
        replacement: &replacement_units,
        left_ctx: left_units.as_deref(),
        right_ctx: right_units.as_deref(),
        last_range: target.map(|span| (span.start as usize, span.end as usize)),
    };

    apply_edit(document, &request)
}

fn recorded_context(ctx: Option<&str>) -> Option<Vec<u16>> {
    ctx.filter(|value| !value.is_empty())
        .map(|value| to_utf16(&canonicalize(value)))
}

/// Apply one edit to `document`. Returns `None` when the edit is a no-op:
/// unanchored, quote not found, or replacement identical to the text it
/// replaces. A `None` never aborts a batch; the caller just moves on.
pub fn apply_edit(document: &[u16], request: &EditRequest<'_>) -> Option<EditOutcome> {
    if request.quote.is_empty() {
        return None;
    }

    let derived = if request.left_ctx.is_none() && request.right_ctx.is_none() {
        request
            .last_range
            .map(|(start, end)| derive_context(document, start, end))
            .unwrap_or((None, None))
    } else {
        (None, None)
    };

    let hints = Hints {
        left_ctx: request.left_ctx.or(derived.0),
        right_ctx: request.right_ctx.or(derived.1),
        preferred_index: request.last_range.map(|(start, _)| start),
    };

    let range = relocate::relocate(document, request.quote, &hints)?;
    let replacement: &[u16] = match request.kind {
        EditKind::Replace => request.replacement,
        EditKind::Remove => &[],
    };

    let updated = splice(document, range.start, range.end, replacement);
    if updated.as_slice() == document {
        return None;
    }

    Some(EditOutcome {
        document: updated,
        start: range.start,
        end: range.end,
    })
}

/// Snip a short window of the current document on each side of the span's
/// last-known range. Stale ranges clamp to the document bounds.
fn derive_context(document: &[u16], start: usize, end: usize) -> (Option<&[u16]>, Option<&[u16]>) {
    let start = start.min(document.len());
    let end = end.clamp(start, document.len());

    let left = &document[start.saturating_sub(CONTEXT_WINDOW)..start];
    let right = &document[end..(end + CONTEXT_WINDOW).min(document.len())];

    (
        (!left.is_empty()).then_some(left),
        (!right.is_empty()).then_some(right),
    )
}
