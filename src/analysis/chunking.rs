//! Character-window chunking for long page content

/// Split `text` into windows of at most `max_len` characters with `overlap`
/// characters shared between adjacent windows.
///
/// Operates on char boundaries, so multi-byte input never splits mid
/// character. `overlap` is clamped below `max_len` so the window always
/// advances. Content at or under the limit comes back as a single chunk.
pub fn split_with_overlap(text: &str, max_len: usize, overlap: usize) -> Vec<String> {
    assert!(max_len > 0, "chunk size must be positive");

    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_len {
        return vec![text.to_string()];
    }

    let overlap = overlap.min(max_len - 1);
    let step = max_len - overlap;

    let mut chunks = Vec::new();
    let mut start = 0;
    loop {
        let end = (start + max_len).min(chars.len());
        chunks.push(chars[start..end].iter().collect());
        if end == chars.len() {
            break;
        }
        start += step;
    }

    chunks
}
