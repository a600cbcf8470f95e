/// Split `text` into consecutive pieces of at most `max_bytes` bytes.
///
/// Pieces never split a UTF-8 character, so each one is valid on its own.
/// A character wider than `max_bytes` still becomes its own piece.
pub fn chunk_content(text: &str, max_bytes: usize) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        let mut end = rest.len().min(max_bytes);
        while end > 0 && !rest.is_char_boundary(end) {
            end -= 1;
        }
        if end == 0 {
            end = rest.chars().next().map_or(rest.len(), char::len_utf8);
        }
        let (chunk, tail) = rest.split_at(end);
        chunks.push(chunk);
        rest = tail;
    }
    chunks
}
