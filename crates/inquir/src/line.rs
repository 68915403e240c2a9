//! The line interface adapter.
//!
//! Wraps an async reader/writer pair the way the prompt engine consumes
//! it: read one line, read one raw key, write styled text, track the
//! current prompt text for redraws. The underlying line-editing primitive
//! (cursor movement, raw-mode toggling, history) is an external
//! collaborator; this adapter only drives its streams.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::io::{AsyncBufRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader, Stdin, Stdout};

use crate::error::{PromptError, Result};

/// A process line interface over an async reader/writer pair.
///
/// The closed flag is shared with the signal coordinator so emergency
/// handling can force the interface shut between reads.
#[derive(Debug)]
pub struct LineInterface<R, W> {
    reader: R,
    writer: W,
    prompt: String,
    /// Bytes of a partially read line, kept across a cancelled
    /// [`read_line`](Self::read_line) so typed input is never lost to a
    /// racing lifecycle event.
    pending: Vec<u8>,
    closed: Arc<AtomicBool>,
}

/// The standard-stream line interface used by real sessions.
pub type StdioLineInterface = LineInterface<BufReader<Stdin>, Stdout>;

impl StdioLineInterface {
    /// Build a line interface over the process standard streams.
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
    }
}

impl<R, W> LineInterface<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    /// Create a line interface over the given streams.
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader,
            writer,
            prompt: String::new(),
            pending: Vec::new(),
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// The current prompt text.
    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Set the prompt text used by [`draw_prompt`](Self::draw_prompt).
    pub fn set_prompt(&mut self, text: impl Into<String>) {
        self.prompt = text.into();
    }

    /// Write the current prompt text and flush.
    pub async fn draw_prompt(&mut self) -> Result<()> {
        let prompt = self.prompt.clone();
        self.write_str(&prompt).await?;
        self.flush().await
    }

    /// Read one line of input, stripping the trailing line break.
    ///
    /// Cancel safe: bytes consumed before a cancellation stay buffered and
    /// are returned as the prefix of the next completed line.
    ///
    /// # Errors
    ///
    /// Returns [`PromptError::Closed`] when the interface has been closed
    /// or the input stream reached EOF with nothing buffered.
    pub async fn read_line(&mut self) -> Result<String> {
        self.ensure_open()?;
        loop {
            match self.reader.read_u8().await {
                Ok(b'\n') => {
                    if self.pending.last() == Some(&b'\r') {
                        self.pending.pop();
                    }
                    return Ok(self.take_pending());
                }
                Ok(byte) => self.pending.push(byte),
                Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                    // A final line without a terminator is still a line.
                    if self.pending.is_empty() {
                        self.close();
                        return Err(PromptError::Closed);
                    }
                    return Ok(self.take_pending());
                }
                Err(e) => return Err(PromptError::io_context("reading input line", e)),
            }
        }
    }

    /// Take the buffered partial line, leaving the buffer empty.
    pub(crate) fn take_pending(&mut self) -> String {
        String::from_utf8_lossy(&std::mem::take(&mut self.pending)).into_owned()
    }

    /// Restore a previously taken partial line.
    pub(crate) fn set_pending(&mut self, partial: String) {
        self.pending = partial.into_bytes();
    }

    /// Read one raw key byte. Used by the masked-input controller.
    ///
    /// # Errors
    ///
    /// Returns [`PromptError::Closed`] on close or EOF.
    pub async fn read_key(&mut self) -> Result<u8> {
        self.ensure_open()?;
        match self.reader.read_u8().await {
            Ok(byte) => Ok(byte),
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                self.close();
                Err(PromptError::Closed)
            }
            Err(e) => Err(PromptError::io_context("reading raw key", e)),
        }
    }

    /// Write raw bytes to the output stream.
    pub async fn write_raw(&mut self, bytes: &[u8]) -> Result<()> {
        self.writer
            .write_all(bytes)
            .await
            .map_err(|e| PromptError::io_context("writing to output stream", e))
    }

    /// Write a string to the output stream.
    pub async fn write_str(&mut self, text: &str) -> Result<()> {
        self.write_raw(text.as_bytes()).await
    }

    /// Flush the output stream.
    pub async fn flush(&mut self) -> Result<()> {
        self.writer
            .flush()
            .await
            .map_err(|e| PromptError::io_context("flushing output stream", e))
    }

    /// Close the interface. Idempotent; subsequent reads fail with
    /// [`PromptError::Closed`].
    pub fn close(&mut self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    /// Check whether the interface is closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// The shared closed flag, handed to the signal coordinator.
    #[must_use]
    pub fn closed_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.closed)
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_closed() {
            return Err(PromptError::Closed);
        }
        Ok(())
    }
}
