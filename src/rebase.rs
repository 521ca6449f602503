use crate::Span;

/// Identity of the span an edit was aimed at. Everything is optional: edits
/// that anchored by quote alone carry no id and no last-known range, and the
/// overlap strategy still finds their span.
#[derive(Clone, Copy, Debug, Default)]
pub struct TargetRef<'a> {
    pub id: Option<&'a str>,
    pub start: Option<u32>,
    pub end: Option<u32>,
    pub category: Option<&'a str>,
}

/// Recompute every span's range after one edit replaced `[match_start,
/// match_end)` with `replacement_len` code units.
///
/// The target span is repositioned onto the replacement (or dropped for a
/// removal); any other span touching the edited range is dropped, since its
/// backing text no longer means what it did; spans past the range translate
/// by the length delta; spans before it are untouched. Surviving spans keep
/// their original relative order. When no span can be identified as the
/// target, or the range is inverted, the input is returned unchanged.
pub fn rebase(
    spans: &[Span],
    match_start: u32,
    match_end: u32,
    replacement_len: u32,
    target: &TargetRef<'_>,
    removal: bool,
) -> Vec<Span> {
    if match_end < match_start {
        return spans.to_vec();
    }

    let Some(target_index) = find_target_index(spans, match_start, match_end, target) else {
        return spans.to_vec();
    };

    let delta = i64::from(replacement_len) - i64::from(match_end - match_start);
    let mut survivors = Vec::with_capacity(spans.len());

    for (index, span) in spans.iter().enumerate() {
        if index == target_index {
            if removal {
                continue;
            }
            let mut updated = span.clone();
            updated.start = match_start;
            updated.end = match_start + replacement_len;
            // Cached display offsets describe the old text; recomputed lazily.
            updated.display_start = None;
            updated.display_end = None;
            survivors.push(updated);
        } else if span.start < match_end && span.end > match_start {
            // Someone else's edit rewrote this span's text out from under it.
            continue;
        } else if span.start >= match_end {
            let mut updated = span.clone();
            updated.start = shift(span.start, delta);
            updated.end = shift(span.end, delta);
            updated.display_start = span.display_start.map(|offset| shift(offset, delta));
            updated.display_end = span.display_end.map(|offset| shift(offset, delta));
            survivors.push(updated);
        } else {
            survivors.push(span.clone());
        }
    }

    survivors
}

/// First match wins, across four strategies in decreasing confidence: by id,
/// by exact last-known range, by exact range plus category, then by overlap
/// with the edited range.
fn find_target_index(
    spans: &[Span],
    match_start: u32,
    match_end: u32,
    target: &TargetRef<'_>,
) -> Option<usize> {
    if let Some(id) = target.id {
        if let Some(index) = spans.iter().position(|span| span.id.as_deref() == Some(id)) {
            return Some(index);
        }
    }

    if let (Some(start), Some(end)) = (target.start, target.end) {
        if let Some(index) = spans
            .iter()
            .position(|span| span.start == start && span.end == end)
        {
            return Some(index);
        }
        if let Some(index) = spans.iter().position(|span| {
            span.start == start && span.end == end && span.category.as_deref() == target.category
        }) {
            return Some(index);
        }
    }

    spans
        .iter()
        .position(|span| span.start < match_end && span.end > match_start)
}

fn shift(offset: u32, delta: i64) -> u32 {
    (i64::from(offset) + delta).max(0) as u32
}
