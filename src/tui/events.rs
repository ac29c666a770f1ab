//! Single-consumer event channel feeding the read loop.
//!
//! Two producers post to one `mpsc` channel: the stdin byte pump and the
//! interrupt expiry timer. The read loop is the only consumer, so editor
//! state is only ever touched from one thread.

use crate::tui::keys::{ByteSource, KeyDecoder, KeyEvent};
use std::collections::VecDeque;
use std::io::{self, IsTerminal, Read};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;

/// Raw event posted by a producer thread.
#[derive(Debug)]
pub enum PumpEvent {
    Byte(u8),
    /// Input reached end of file.
    Closed,
    Failed(io::Error),
    /// The interrupt window armed with this generation elapsed.
    InterruptExpired(u64),
}

/// Decoded event handed to the read loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorEvent {
    Key(KeyEvent),
    InterruptExpired(u64),
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Producer {
    /// Bytes come from a stdin pump thread started on first use.
    ///
    /// On a TTY each Ctrl-D in cooked mode is a one-off end of input and the
    /// pump keeps reading afterwards.
    Stdin { started: bool, tty: bool },
    /// Bytes are posted by the owner through [`InputChannel::sender`].
    External,
}

/// Receiving end of the editor's event channel.
#[derive(Debug)]
pub struct InputChannel {
    tx: Sender<PumpEvent>,
    rx: Receiver<PumpEvent>,
    /// Non-byte events that arrived while a key sequence was being decoded.
    deferred: VecDeque<PumpEvent>,
    producer: Producer,
    closed: bool,
}

impl InputChannel {
    /// Channel fed by the process's stdin.
    ///
    /// The pump thread owns stdin for the rest of the process, so create at
    /// most one terminal channel and route every stdin read through it.
    pub fn terminal() -> Self {
        Self::with_producer(Producer::Stdin {
            started: false,
            tty: io::stdin().is_terminal(),
        })
    }

    /// Channel with no producer attached; feed it through [`Self::sender`].
    pub fn new() -> Self {
        Self::with_producer(Producer::External)
    }

    /// Channel pre-loaded with `bytes` followed by end of input.
    pub fn from_bytes(bytes: impl AsRef<[u8]>) -> Self {
        let channel = Self::new();
        for &b in bytes.as_ref() {
            let _ = channel.tx.send(PumpEvent::Byte(b));
        }
        let _ = channel.tx.send(PumpEvent::Closed);
        channel
    }

    fn with_producer(producer: Producer) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            tx,
            rx,
            deferred: VecDeque::new(),
            producer,
            closed: false,
        }
    }

    /// Handle for producers (timers, tests, embedding applications).
    pub fn sender(&self) -> Sender<PumpEvent> {
        self.tx.clone()
    }

    pub fn is_closed(&self) -> bool {
        self.closed && self.deferred.is_empty()
    }

    /// Block for the next event and decode keys from byte events.
    pub fn next_event(&mut self, decoder: &KeyDecoder) -> io::Result<EditorEvent> {
        let event = match self.deferred.pop_front() {
            Some(event) => event,
            None => match self.recv(None)? {
                Some(event) => event,
                None => return Ok(EditorEvent::Closed),
            },
        };
        match event {
            PumpEvent::Byte(first) => {
                let mut source = ChannelSource {
                    channel: self,
                    first: Some(first),
                };
                Ok(decoder
                    .decode(&mut source)?
                    .map(EditorEvent::Key)
                    .unwrap_or(EditorEvent::Closed))
            }
            PumpEvent::Closed => {
                self.closed = self.end_of_input_is_final();
                Ok(EditorEvent::Closed)
            }
            PumpEvent::Failed(err) => Err(err),
            PumpEvent::InterruptExpired(generation) => {
                Ok(EditorEvent::InterruptExpired(generation))
            }
        }
    }

    /// Read raw bytes up to and including `\n` for cooked-mode input.
    ///
    /// Returns `None` at end of input before any byte arrived. Interrupt
    /// expiries are irrelevant here and dropped.
    pub fn read_raw_line(&mut self) -> io::Result<Option<Vec<u8>>> {
        let mut line = Vec::new();
        loop {
            let event = match self.deferred.pop_front() {
                Some(event) => event,
                None => match self.recv(None)? {
                    Some(event) => event,
                    None => break,
                },
            };
            match event {
                PumpEvent::Byte(b) => {
                    line.push(b);
                    if b == b'\n' {
                        return Ok(Some(line));
                    }
                }
                PumpEvent::Closed => {
                    self.closed = self.end_of_input_is_final();
                    break;
                }
                PumpEvent::Failed(err) => return Err(err),
                PumpEvent::InterruptExpired(_) => {}
            }
        }
        Ok((!line.is_empty()).then_some(line))
    }

    /// Receive one event, or `None` once input is closed.
    fn recv(&mut self, wait: Option<Duration>) -> io::Result<Option<PumpEvent>> {
        if self.closed {
            return Ok(self.rx.try_recv().ok());
        }
        self.ensure_pump()?;
        match wait {
            None => Ok(self.rx.recv().ok()),
            Some(wait) => match self.rx.recv_timeout(wait) {
                Ok(event) => Ok(Some(event)),
                Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => Ok(None),
            },
        }
    }

    fn end_of_input_is_final(&self) -> bool {
        !matches!(self.producer, Producer::Stdin { tty: true, .. })
    }

    fn ensure_pump(&mut self) -> io::Result<()> {
        let Producer::Stdin { started: false, tty } = self.producer else {
            return Ok(());
        };
        let tx = self.tx.clone();
        thread::Builder::new()
            .name("termline-stdin".to_string())
            .spawn(move || pump_stdin(tx, tty))?;
        tracing::debug!(tty, "stdin pump started");
        self.producer = Producer::Stdin { started: true, tty };
        Ok(())
    }
}

impl Default for InputChannel {
    fn default() -> Self {
        Self::new()
    }
}

fn pump_stdin(tx: Sender<PumpEvent>, tty: bool) {
    let stdin = io::stdin();
    let mut handle = stdin.lock();
    let mut buf = [0u8; 64];
    loop {
        match handle.read(&mut buf) {
            Ok(0) => {
                if tx.send(PumpEvent::Closed).is_err() || !tty {
                    return;
                }
            }
            Ok(n) => {
                for &b in &buf[..n] {
                    if tx.send(PumpEvent::Byte(b)).is_err() {
                        return;
                    }
                }
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                let _ = tx.send(PumpEvent::Failed(e));
                return;
            }
        }
    }
}

/// Byte view of the channel for one decode cycle.
///
/// A non-byte event ends the current sequence and is kept for the loop.
struct ChannelSource<'a> {
    channel: &'a mut InputChannel,
    first: Option<u8>,
}

impl ByteSource for ChannelSource<'_> {
    fn next_byte(&mut self, wait: Option<Duration>) -> io::Result<Option<u8>> {
        if let Some(b) = self.first.take() {
            return Ok(Some(b));
        }
        if !self.channel.deferred.is_empty() {
            return Ok(None);
        }
        match self.channel.recv(wait)? {
            Some(PumpEvent::Byte(b)) => Ok(Some(b)),
            Some(other) => {
                self.channel.deferred.push_back(other);
                Ok(None)
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decoder() -> KeyDecoder {
        KeyDecoder::raw_terminal(Duration::from_millis(20))
    }

    #[test]
    fn scripted_bytes_decode_then_close() {
        let mut channel = InputChannel::from_bytes(b"a\x1b[A\r");
        let d = decoder();
        assert_eq!(
            channel.next_event(&d).unwrap(),
            EditorEvent::Key(KeyEvent::Rune('a'))
        );
        assert_eq!(
            channel.next_event(&d).unwrap(),
            EditorEvent::Key(KeyEvent::ArrowUp)
        );
        assert_eq!(
            channel.next_event(&d).unwrap(),
            EditorEvent::Key(KeyEvent::Enter)
        );
        assert_eq!(channel.next_event(&d).unwrap(), EditorEvent::Closed);
        // Stays closed instead of blocking.
        assert_eq!(channel.next_event(&d).unwrap(), EditorEvent::Closed);
        assert!(channel.is_closed());
    }

    #[test]
    fn lone_escape_times_out() {
        let mut channel = InputChannel::new();
        let tx = channel.sender();
        tx.send(PumpEvent::Byte(0x1B)).unwrap();
        assert_eq!(
            channel.next_event(&decoder()).unwrap(),
            EditorEvent::Key(KeyEvent::Escape)
        );
    }

    #[test]
    fn expiry_mid_sequence_is_deferred_not_lost() {
        let mut channel = InputChannel::new();
        let tx = channel.sender();
        tx.send(PumpEvent::Byte(0x1B)).unwrap();
        tx.send(PumpEvent::InterruptExpired(7)).unwrap();
        tx.send(PumpEvent::Byte(b'x')).unwrap();

        let d = decoder();
        assert_eq!(
            channel.next_event(&d).unwrap(),
            EditorEvent::Key(KeyEvent::Escape)
        );
        assert_eq!(
            channel.next_event(&d).unwrap(),
            EditorEvent::InterruptExpired(7)
        );
        assert_eq!(
            channel.next_event(&d).unwrap(),
            EditorEvent::Key(KeyEvent::Rune('x'))
        );
    }

    #[test]
    fn failures_surface_as_io_errors() {
        let mut channel = InputChannel::new();
        channel
            .sender()
            .send(PumpEvent::Failed(io::Error::other("boom")))
            .unwrap();
        let err = channel.next_event(&decoder()).expect_err("failure");
        assert_eq!(err.to_string(), "boom");
    }

    #[test]
    fn read_raw_line_splits_on_newline() {
        let mut channel = InputChannel::from_bytes(b"one\ntwo");
        assert_eq!(channel.read_raw_line().unwrap(), Some(b"one\n".to_vec()));
        assert_eq!(channel.read_raw_line().unwrap(), Some(b"two".to_vec()));
        assert_eq!(channel.read_raw_line().unwrap(), None);
    }
}
