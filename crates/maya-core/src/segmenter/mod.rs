//! Stream segmentation: turns the model's delta stream into what the client sees.
//!
//! Chunked presentation buffers deltas and cuts at natural breaks, pacing each
//! emission. Raw presentation forwards every non-empty delta as is.

mod breaks;
mod pacer;

pub use breaks::is_natural_break;
pub use pacer::ChunkPacer;

use crate::completion::DeltaStream;
use crate::error::ChatResult;
use crate::modes::Presentation;
use futures_util::stream::{BoxStream, StreamExt};

/// Appended to every chunk in chunked presentation.
pub const CHUNK_DELIMITER: &str = "\n---CHUNK---\n";

/// A buffer longer than this is emitted only at a natural break.
const MIN_BREAK_LEN: usize = 15;
/// A buffer longer than this is emitted regardless of breaks.
const MAX_CHUNK_LEN: usize = 150;

/// Output units for the client, ending when the upstream ends.
pub type SegmentStream = BoxStream<'static, ChatResult<String>>;

/// Owns the buffer for the chunk being assembled. Fresh per request.
#[derive(Debug, Default)]
pub struct ChunkBuffer {
    text: String,
    len: usize,
}

impl ChunkBuffer {
    pub fn push(&mut self, delta: &str) {
        self.text.push_str(delta);
        self.len += delta.chars().count();
    }

    /// Length in characters.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// `(len > 15 && natural break) || len > 150`.
    pub fn should_emit(&self) -> bool {
        (self.len > MIN_BREAK_LEN && is_natural_break(&self.text)) || self.len > MAX_CHUNK_LEN
    }

    /// Trimmed contents plus delimiter; resets the buffer.
    pub fn take_chunk(&mut self) -> String {
        let chunk = format!("{}{}", self.text.trim(), CHUNK_DELIMITER);
        self.text.clear();
        self.len = 0;
        chunk
    }
}

/// Segments one model stream. Consumes the stream; not restartable.
pub fn segment(deltas: DeltaStream, presentation: Presentation, pacer: ChunkPacer) -> SegmentStream {
    match presentation {
        Presentation::Chunked => chunked(deltas, pacer),
        Presentation::Raw => raw(deltas),
    }
}

fn chunked(mut deltas: DeltaStream, mut pacer: ChunkPacer) -> SegmentStream {
    let stream = async_stream::try_stream! {
        let mut buffer = ChunkBuffer::default();
        let mut emitted = 0usize;

        while let Some(delta) = deltas.next().await {
            let delta = delta?;
            buffer.push(&delta);

            if buffer.should_emit() && !buffer.is_blank() {
                pacer.pace().await;
                emitted += 1;
                yield buffer.take_chunk();
            }
        }

        if !buffer.is_blank() {
            emitted += 1;
            yield buffer.take_chunk();
        }

        tracing::debug!(target: "maya::segmenter", chunks = emitted, "chunked stream complete");
    };
    stream.boxed()
}

fn raw(deltas: DeltaStream) -> SegmentStream {
    deltas
        .filter(|delta| {
            let keep = !matches!(delta, Ok(text) if text.is_empty());
            futures_util::future::ready(keep)
        })
        .boxed()
}
