use unicode_normalization::{UnicodeNormalization, is_nfc};

/// Bring text into the canonical composition every offset in the engine is
/// measured against. Offsets computed over a decomposed variant of the same
/// text would not line up with offsets computed here.
pub fn canonicalize(text: &str) -> String {
    if is_nfc(text) {
        text.to_string()
    } else {
        text.nfc().collect()
    }
}

pub fn to_utf16(value: &str) -> Vec<u16> {
    value.encode_utf16().collect()
}

pub fn from_utf16(units: &[u16]) -> String {
    String::from_utf16_lossy(units)
}

pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Start offsets of every occurrence of `needle` in `haystack`, overlapping
/// occurrences included.
pub fn find_occurrences(haystack: &[u16], needle: &[u16]) -> Vec<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return Vec::new();
    }

    haystack
        .windows(needle.len())
        .enumerate()
        .filter(|(_, window)| *window == needle)
        .map(|(start, _)| start)
        .collect()
}

/// Replace `[start, end)` of `document` with `replacement`. Bounds are
/// clamped; callers pass ranges produced by the relocator, which are always
/// in bounds.
pub fn splice(document: &[u16], start: usize, end: usize, replacement: &[u16]) -> Vec<u16> {
    let start = start.min(document.len());
    let end = end.clamp(start, document.len());

    let mut updated = Vec::with_capacity(document.len() - (end - start) + replacement.len());
    updated.extend_from_slice(&document[..start]);
    updated.extend_from_slice(replacement);
    updated.extend_from_slice(&document[end..]);
    updated
}
