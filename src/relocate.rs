use crate::text::find_occurrences;

/// Half-open UTF-16 range of a relocated quote.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Range {
    pub start: usize,
    pub end: usize,
}

/// Disambiguation hints for a quote that may occur more than once. None of
/// these is required to still be accurate; they only bias which occurrence
/// wins.
#[derive(Clone, Copy, Debug, Default)]
pub struct Hints<'a> {
    pub left_ctx: Option<&'a [u16]>,
    pub right_ctx: Option<&'a [u16]>,
    pub preferred_index: Option<usize>,
}

/// Find the best occurrence of `quote` in `document`.
///
/// Candidates are tried in priority order: an occurrence whose surrounding
/// text matches the supplied context, then the occurrence closest to
/// `preferred_index`, then the first plain occurrence. Returns `None` when
/// the quote does not occur at all. Both inputs are expected in canonical
/// composition; callers normalize before converting to UTF-16.
pub fn relocate(document: &[u16], quote: &[u16], hints: &Hints<'_>) -> Option<Range> {
    if quote.is_empty() {
        return None;
    }

    let occurrences = find_occurrences(document, quote);
    if occurrences.is_empty() {
        return None;
    }

    if hints.left_ctx.is_some() || hints.right_ctx.is_some() {
        let contextual = occurrences
            .iter()
            .copied()
            .find(|&start| context_matches(document, start, quote.len(), hints));
        if let Some(start) = contextual {
            return Some(Range {
                start,
                end: start + quote.len(),
            });
        }
    }

    if let Some(preferred) = hints.preferred_index {
        // min_by_key keeps the first minimum, so equidistant occurrences
        // resolve to the earlier one.
        let start = occurrences
            .iter()
            .copied()
            .min_by_key(|&start| start.abs_diff(preferred))?;
        return Some(Range {
            start,
            end: start + quote.len(),
        });
    }

    let start = occurrences[0];
    Some(Range {
        start,
        end: start + quote.len(),
    })
}

fn context_matches(document: &[u16], start: usize, quote_len: usize, hints: &Hints<'_>) -> bool {
    if let Some(left) = hints.left_ctx {
        if !document[..start].ends_with(left) {
            return false;
        }
    }
    if let Some(right) = hints.right_ctx {
        if !document[start + quote_len..].starts_with(right) {
            return false;
        }
    }
    true
}
