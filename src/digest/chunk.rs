/// Largest chunk that stays under Slack's per-message limit with some margin.
pub const DEFAULT_CHUNK_SIZE: usize = 2900;

/// Split `text` into trimmed chunks of at most `max_size` characters.
///
/// Chunk boundaries only fall on line breaks. A line that is longer than
/// `max_size` on its own is emitted as a single oversized chunk rather than
/// being cut. Chunks that are blank after trimming are dropped, so empty
/// input yields no chunks.
pub fn split(text: &str, max_size: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut buffer = String::new();
    let mut buffer_len = 0usize;

    for line in text.split('\n') {
        let line_len = line.chars().count();
        let joined_len = if buffer.is_empty() {
            line_len
        } else {
            buffer_len + 1 + line_len
        };

        if joined_len > max_size && !buffer.is_empty() {
            flush(&mut chunks, &buffer);
            buffer.clear();
            buffer.push_str(line);
            buffer_len = line_len;
        } else {
            if !buffer.is_empty() {
                buffer.push('\n');
            }
            buffer.push_str(line);
            buffer_len = joined_len;
        }
    }
    flush(&mut chunks, &buffer);

    chunks
}

fn flush(chunks: &mut Vec<String>, buffer: &str) {
    let trimmed = buffer.trim();
    if !trimmed.is_empty() {
        chunks.push(trimmed.to_string());
    }
}
