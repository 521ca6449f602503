use unicode_segmentation::UnicodeSegmentation;

/// Map a UTF-16 range onto grapheme-cluster offsets for the renderer. An
/// offset landing inside a cluster clamps to that cluster's index; offsets
/// past the end of the document clamp to the total cluster count. `document`
/// is expected in canonical composition, like every other offset consumer.
pub fn display_offsets(document: &str, start: usize, end: usize) -> (usize, usize) {
    let end = end.max(start);
    (
        cluster_index(document, start),
        cluster_index(document, end),
    )
}

/// Index of the grapheme cluster containing UTF-16 offset `offset`, which is
/// also the number of complete clusters before it.
fn cluster_index(document: &str, offset: usize) -> usize {
    let mut utf16_pos = 0usize;
    let mut cluster = 0usize;

    for grapheme in document.graphemes(true) {
        utf16_pos += grapheme.encode_utf16().count();
        if offset < utf16_pos {
            return cluster;
        }
        cluster += 1;
    }

    cluster
}
