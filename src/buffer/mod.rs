//! Output buffer with a discard cursor
//!
//! The reader loop is the sole appender; expect calls and `clear_buffer`
//! are the sole consumers. All access goes through one
//! `tokio::sync::Mutex`, which is what makes the append/read pair safe.

use bytes::BytesMut;

/// Accumulated child output plus a cursor marking consumed bytes.
///
/// Raw chunks are normalized to UTF-8 on append (invalid sequences become
/// replacement characters), so the buffer content is always valid text and
/// the "live window" can be handed to the matcher as `&str`.
///
/// Invariant: `0 <= discard <= raw.len()`.
pub struct OutputBuffer {
    raw: BytesMut,
    discard: usize,
}

impl OutputBuffer {
    /// Create an empty buffer, pre-sized to one read chunk.
    pub fn new(chunk_size: usize) -> Self {
        Self {
            raw: BytesMut::with_capacity(chunk_size),
            discard: 0,
        }
    }

    /// Append a chunk of raw child output.
    ///
    /// Invalid UTF-8 is replaced rather than rejected; binary output must
    /// never abort the reader loop.
    pub fn append(&mut self, data: &[u8]) {
        let text = String::from_utf8_lossy(data);
        self.raw.extend_from_slice(text.as_bytes());
    }

    /// The live window: everything not yet consumed.
    pub fn live(&self) -> &str {
        // Always valid UTF-8 because append normalizes, and consume only
        // advances to match boundaries within that text.
        std::str::from_utf8(&self.raw[self.discard..]).unwrap_or("")
    }

    /// Advance the discard cursor `n` bytes into the live window.
    pub fn consume(&mut self, n: usize) {
        self.discard = (self.discard + n).min(self.raw.len());
    }

    /// Consume the entire live window (forced match).
    pub fn consume_all(&mut self) {
        self.discard = self.raw.len();
    }

    /// Reset to empty: raw bytes and discard cursor both cleared.
    pub fn clear(&mut self) {
        self.raw.clear();
        self.discard = 0;
    }

    /// Total bytes accumulated, consumed or not.
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Whether nothing has been accumulated.
    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Position of the discard cursor.
    #[cfg(test)]
    pub fn discard_len(&self) -> usize {
        self.discard
    }
}
