//! Outbound message sizing for Discord
//!
//! - **Version**: 1.2.0
//! - **Since**: 0.2.0
//!
//! ## Changelog
//! - 1.2.0: Keep blank lines that open a chunk
//! - 1.1.0: Plain-message helpers only
//! - 1.0.0: Line-aware chunking for long task texts

/// Discord message content limit
pub const MESSAGE_LIMIT: usize = 2000;

/// Split text into pieces no longer than `max_size` bytes.
///
/// Splits prefer line boundaries and never cut a UTF-8 character in half.
/// Text that already fits is returned as a single piece, even when empty.
pub fn chunk_text(text: &str, max_size: usize) -> Vec<String> {
    if text.len() <= max_size {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    // Whether `current` holds a line yet; a blank line is a line too
    let mut open = false;

    for line in text.lines() {
        // +1 for the newline that joins this line to the previous one
        let needed = if open { line.len() + 1 } else { line.len() };

        if current.len() + needed <= max_size {
            if open {
                current.push('\n');
            }
            current.push_str(line);
            open = true;
            continue;
        }

        if open {
            push_chunk(&mut chunks, std::mem::take(&mut current));
        }

        if line.len() <= max_size {
            current.push_str(line);
        } else {
            let mut pieces = split_at_char_boundaries(line, max_size);
            // The tail may still share a chunk with the following lines
            if let Some(last) = pieces.pop() {
                chunks.extend(pieces);
                current = last;
            }
        }
        open = true;
    }

    if open {
        push_chunk(&mut chunks, current);
    }
    chunks
}

/// Discord rejects messages with no visible content
fn push_chunk(chunks: &mut Vec<String>, chunk: String) {
    if !chunk.trim().is_empty() {
        chunks.push(chunk);
    }
}

fn split_at_char_boundaries(line: &str, max_size: usize) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut start = 0;

    for (idx, ch) in line.char_indices() {
        if idx + ch.len_utf8() - start > max_size && idx > start {
            pieces.push(line[start..idx].to_string());
            start = idx;
        }
    }
    if start < line.len() {
        pieces.push(line[start..].to_string());
    }
    pieces
}

/// Chunk text for message content (2000 byte limit)
pub fn chunk_for_message(text: &str) -> Vec<String> {
    chunk_text(text, MESSAGE_LIMIT)
}
