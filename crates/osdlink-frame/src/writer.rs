use std::io::Write;

use tracing::{debug, warn};

use crate::codec::{encode, Frame};
use crate::error::{FrameError, Result};

/// Writes command frames to any `Write` stream.
///
/// Each send is exactly one `write` call. Nothing is retried: a short write
/// is reported through the returned count (or as [`FrameError::ShortWrite`]
/// by [`send_exact`](FrameWriter::send_exact)), and write errors, including
/// `Interrupted`, are returned as they came from the stream.
pub struct FrameWriter<T> {
    inner: T,
}

impl<T: Write> FrameWriter<T> {
    /// Create a new frame writer.
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    /// Write an already encoded frame. Returns the bytes the stream accepted.
    ///
    /// Once the write has succeeded the count is returned even if the
    /// following flush fails; the bytes are already with the stream.
    pub fn write_frame(&mut self, frame: &Frame) -> Result<usize> {
        let written = self.inner.write(frame.as_bytes())?;
        if let Err(err) = self.inner.flush() {
            warn!(error = %err, written, "flush after frame write failed");
        }

        if written < frame.len() {
            warn!(written, expected = frame.len(), "short frame write");
        } else {
            debug!(written, "wrote frame");
        }
        Ok(written)
    }

    /// Encode `payload` and write the frame. Returns the bytes accepted.
    pub fn send(&mut self, payload: &[u8]) -> Result<usize> {
        let frame = encode(payload);
        self.write_frame(&frame)
    }

    /// Like [`send`](FrameWriter::send), but a partial write is an error.
    pub fn send_exact(&mut self, payload: &[u8]) -> Result<usize> {
        let frame = encode(payload);
        let written = self.write_frame(&frame)?;
        if written != frame.len() {
            return Err(FrameError::ShortWrite {
                written,
                expected: frame.len(),
            });
        }
        Ok(written)
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}
