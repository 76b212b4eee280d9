//! Splits long replies into platform-legal message segments.
//!
//! Lines are never split. When the body is wrapped in a code block every
//! chunk is closed with a fence and the next one re-opens it, so each
//! message renders on its own.

use crate::constants::CODE_FENCE;

/// How the line body of a chunked payload is framed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyWrapper {
    CodeBlock,
    Plain,
}

impl BodyWrapper {
    fn open(self) -> &'static str {
        match self {
            Self::CodeBlock => "```\n",
            Self::Plain => "",
        }
    }

    fn close(self) -> &'static str {
        match self {
            Self::CodeBlock => CODE_FENCE,
            Self::Plain => "",
        }
    }
}

/// One segment of a longer reply. Chunks are delivered in `index` order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub index: usize,
    pub content: String,
}

struct Buffer {
    text: String,
    len: usize,
    lines: usize,
}

impl Buffer {
    fn seeded(seed: String) -> Self {
        let len = seed.chars().count();
        Self {
            text: seed,
            len,
            lines: 0,
        }
    }

    fn push_line(&mut self, line: &str, line_len: usize) {
        self.text.push_str(line);
        self.text.push('\n');
        self.len += line_len + 1;
        self.lines += 1;
    }
}

/// Split `lines` into chunks of at most `limit` characters each, the first
/// one starting with `prefix`.
///
/// Length is counted in chars, the unit Discord applies its limit to. A
/// single line that is longer than the limit on its own still gets a chunk
/// of its own, which will be over the limit.
pub fn chunk<S: AsRef<str>>(
    prefix: &str,
    lines: &[S],
    wrapper: BodyWrapper,
    limit: usize,
) -> Vec<Chunk> {
    let close = wrapper.close();
    let close_len = close.chars().count();

    let mut chunks = Vec::new();
    let mut buffer = Buffer::seeded(format!("{prefix}{}", wrapper.open()));

    let emit = |buffer: Buffer, chunks: &mut Vec<Chunk>| {
        let mut content = buffer.text;
        content.push_str(close);
        let len = buffer.len + close_len;
        if len > limit {
            tracing::warn!(
                target = "chunk",
                len,
                limit,
                "line exceeds message limit; emitting oversized chunk"
            );
        }
        chunks.push(Chunk {
            index: chunks.len(),
            content,
        });
    };

    for line in lines {
        let line = line.as_ref();
        let line_len = line.chars().count();
        if buffer.lines > 0 && buffer.len + line_len + 1 + close_len > limit {
            let full = std::mem::replace(&mut buffer, Buffer::seeded(wrapper.open().to_string()));
            emit(full, &mut chunks);
        }
        buffer.push_line(line, line_len);
    }

    if buffer.lines > 0 {
        emit(buffer, &mut chunks);
    }
    chunks
}
