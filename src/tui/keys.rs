//! Raw byte stream to logical key decoding.
//!
//! The decoder is a small `Normal -> Escape -> CSI` state machine. It pulls
//! exactly the bytes one key needs from a [`ByteSource`] and never reads
//! ahead into the next key.

use std::collections::VecDeque;
use std::io;
use std::time::Duration;

/// Logical key produced by one decode cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEvent {
    Rune(char),
    Enter,
    Tab,
    Backspace,
    Delete,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    CtrlC,
    CtrlD,
    CtrlJ,
    Escape,
    Unknown,
}

/// Source of raw input bytes.
///
/// `wait = None` blocks until a byte arrives. `wait = Some(d)` gives up after
/// `d` and returns `Ok(None)`, which is how a lone `ESC` is told apart from
/// the start of a sequence. `Ok(None)` with `wait = None` means end of input.
pub trait ByteSource {
    fn next_byte(&mut self, wait: Option<Duration>) -> io::Result<Option<u8>>;
}

/// In-memory byte source, mainly for tests and scripted input.
impl ByteSource for VecDeque<u8> {
    fn next_byte(&mut self, _wait: Option<Duration>) -> io::Result<Option<u8>> {
        Ok(self.pop_front())
    }
}

/// Byte-level key decoder.
#[derive(Debug, Clone, Copy)]
pub struct KeyDecoder {
    /// Treat `0x0A` as Ctrl-J instead of Enter.
    linefeed_is_ctrl_j: bool,
    /// How long to wait for the rest of an escape sequence.
    escape_timeout: Duration,
}

impl Default for KeyDecoder {
    fn default() -> Self {
        Self {
            linefeed_is_ctrl_j: false,
            escape_timeout: Duration::from_millis(crate::tui::settings::ESCAPE_TIMEOUT_MS),
        }
    }
}

impl KeyDecoder {
    /// Decoder for a terminal in raw mode, where Enter arrives as `\r` and
    /// a bare `\n` can only come from Ctrl-J.
    pub fn raw_terminal(escape_timeout: Duration) -> Self {
        Self {
            linefeed_is_ctrl_j: true,
            escape_timeout,
        }
    }

    /// Decode one key. Returns `Ok(None)` when the source is exhausted before
    /// the first byte of a key.
    pub fn decode<S: ByteSource + ?Sized>(&self, src: &mut S) -> io::Result<Option<KeyEvent>> {
        let Some(first) = src.next_byte(None)? else {
            return Ok(None);
        };
        let key = match first {
            0x03 => KeyEvent::CtrlC,
            0x04 => KeyEvent::CtrlD,
            0x09 => KeyEvent::Tab,
            0x0A if self.linefeed_is_ctrl_j => KeyEvent::CtrlJ,
            0x0A | 0x0D => KeyEvent::Enter,
            0x7F | 0x08 => KeyEvent::Backspace,
            0x1B => self.decode_escape(src)?,
            0x20..=0x7E => KeyEvent::Rune(first as char),
            0xC2..=0xF4 => self.decode_utf8(first, src)?,
            _ => KeyEvent::Unknown,
        };
        if key == KeyEvent::Unknown {
            tracing::trace!(byte = first, "dropping undecodable input");
        }
        Ok(Some(key))
    }

    fn decode_escape<S: ByteSource + ?Sized>(&self, src: &mut S) -> io::Result<KeyEvent> {
        match src.next_byte(Some(self.escape_timeout))? {
            Some(b'[') => {}
            // Lone ESC, or ESC + something that is not a CSI.
            _ => return Ok(KeyEvent::Escape),
        }
        let Some(final_byte) = src.next_byte(Some(self.escape_timeout))? else {
            return Ok(KeyEvent::Escape);
        };
        let key = match final_byte {
            b'A' => KeyEvent::ArrowUp,
            b'B' => KeyEvent::ArrowDown,
            b'C' => KeyEvent::ArrowRight,
            b'D' => KeyEvent::ArrowLeft,
            b'3' => match src.next_byte(Some(self.escape_timeout))? {
                Some(b'~') => KeyEvent::Delete,
                _ => KeyEvent::Unknown,
            },
            _ => KeyEvent::Unknown,
        };
        Ok(key)
    }

    fn decode_utf8<S: ByteSource + ?Sized>(&self, lead: u8, src: &mut S) -> io::Result<KeyEvent> {
        let width = match lead {
            0xC2..=0xDF => 2,
            0xE0..=0xEF => 3,
            _ => 4,
        };
        let mut bytes = [lead, 0, 0, 0];
        for slot in bytes.iter_mut().take(width).skip(1) {
            match src.next_byte(Some(self.escape_timeout))? {
                Some(b) if b & 0xC0 == 0x80 => *slot = b,
                _ => return Ok(KeyEvent::Unknown),
            }
        }
        Ok(std::str::from_utf8(&bytes[..width])
            .ok()
            .and_then(|s| s.chars().next())
            .map(KeyEvent::Rune)
            .unwrap_or(KeyEvent::Unknown))
    }
}
