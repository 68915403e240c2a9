//! The masked-input controller.
//!
//! Takes exclusive control of the raw input stream for a single question,
//! rendering one mask glyph per typed character instead of echoing the
//! text. Exclusivity with normal line-based reading is enforced by the
//! `&mut` borrow on the line interface for the duration of the read.

use tokio::io::{AsyncBufRead, AsyncWrite};

use crate::error::{PromptError, Result};
use crate::line::LineInterface;
use crate::style::clear_line_sequence;

/// Backspace as sent by most terminals.
const DEL: u8 = 0x7f;
/// Backspace as a control character.
const BS: u8 = 0x08;
/// Ctrl+C.
const ETX: u8 = 0x03;
/// Ctrl+D.
const EOT: u8 = 0x04;

/// Reads one secret value, echoing a mask glyph per character.
#[derive(Debug, Clone, Copy)]
pub struct MaskedReader {
    mask: char,
}

impl MaskedReader {
    /// Create a masked reader with the given mask glyph.
    #[must_use]
    pub const fn new(mask: char) -> Self {
        Self { mask }
    }

    /// Read raw keystrokes until a terminator, redrawing the line as the
    /// prompt text plus one mask glyph per buffered character.
    ///
    /// Backspace shrinks the buffer by one character. An empty `prompt` is
    /// an idle reset: the controller returns immediately without touching
    /// the stream. Ctrl+C cancels the read with
    /// [`PromptError::Interrupted`]; Ctrl+D with [`PromptError::Closed`].
    pub async fn read<R, W>(&self, line: &mut LineInterface<R, W>, prompt: &str) -> Result<String>
    where
        R: AsyncBufRead + Unpin + Send,
        W: AsyncWrite + Unpin + Send,
    {
        if prompt.is_empty() {
            return Ok(String::new());
        }

        line.write_str(prompt).await?;
        line.flush().await?;

        let mut buffer: Vec<u8> = Vec::new();
        loop {
            match line.read_key().await? {
                b'\r' | b'\n' => {
                    line.write_str("\r\n").await?;
                    line.flush().await?;
                    return Ok(String::from_utf8_lossy(&buffer).into_owned());
                }
                DEL | BS => {
                    pop_char(&mut buffer);
                    self.redraw(line, prompt, &buffer).await?;
                }
                ETX => return Err(PromptError::Interrupted),
                EOT => return Err(PromptError::Closed),
                byte if byte < 0x20 => {
                    // Other control sequences are not part of the secret.
                }
                byte => {
                    buffer.push(byte);
                    self.redraw(line, prompt, &buffer).await?;
                }
            }
        }
    }

    async fn redraw<R, W>(
        &self,
        line: &mut LineInterface<R, W>,
        prompt: &str,
        buffer: &[u8],
    ) -> Result<()>
    where
        R: AsyncBufRead + Unpin + Send,
        W: AsyncWrite + Unpin + Send,
    {
        let glyphs = String::from_utf8_lossy(buffer).chars().count();
        let mut frame = clear_line_sequence();
        frame.push_str(prompt);
        frame.extend(std::iter::repeat_n(self.mask, glyphs));
        line.write_str(&frame).await?;
        line.flush().await
    }
}

/// Drop the last character (not byte) from a UTF-8 byte buffer.
fn pop_char(buffer: &mut Vec<u8>) {
    let text = String::from_utf8_lossy(buffer);
    let trimmed: String = {
        let mut chars = text.chars().collect::<Vec<_>>();
        chars.pop();
        chars.into_iter().collect()
    };
    *buffer = trimmed.into_bytes();
}
