//! Two-press Ctrl+C protocol.
//!
//! `Idle -> Warned` on the first press arms a one-shot timer. A second press
//! while warned exits. Expiry returns to `Idle`. The timer never touches
//! editor state; it posts [`PumpEvent::InterruptExpired`] to the read loop's
//! channel and the loop calls [`InterruptState::on_expiry`].

use crate::tui::events::PumpEvent;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;

/// What the read loop should do after a Ctrl+C.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterruptAction {
    /// First press: show the warning and keep editing.
    Warn,
    /// Second press inside the window: end the read with `Interrupted`.
    Exit,
}

/// One-shot timer thread. Dropping the handle cancels it.
#[derive(Debug)]
pub struct ExpiryTimer {
    _cancel: Sender<()>,
}

impl ExpiryTimer {
    /// Post `InterruptExpired(generation)` to `tx` after `window` unless
    /// dropped first.
    pub fn spawn(tx: Sender<PumpEvent>, generation: u64, window: Duration) -> std::io::Result<Self> {
        let (cancel_tx, cancel_rx) = mpsc::channel::<()>();
        thread::Builder::new()
            .name("termline-interrupt".to_string())
            .spawn(move || {
                // Disconnection means the handle was dropped: cancelled.
                if let Err(RecvTimeoutError::Timeout) = cancel_rx.recv_timeout(window) {
                    let _ = tx.send(PumpEvent::InterruptExpired(generation));
                }
            })?;
        Ok(Self { _cancel: cancel_tx })
    }
}

/// Ctrl+C state owned by the read loop.
#[derive(Debug)]
pub struct InterruptState {
    armed: bool,
    /// Bumped on every arm so a late expiry from an old timer is ignored.
    generation: u64,
    timer: Option<ExpiryTimer>,
    window: Duration,
}

impl InterruptState {
    pub fn new(window: Duration) -> Self {
        Self {
            armed: false,
            generation: 0,
            timer: None,
            window,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Handle a Ctrl+C press.
    pub fn on_ctrl_c(&mut self, tx: &Sender<PumpEvent>) -> InterruptAction {
        if self.armed {
            self.disarm();
            return InterruptAction::Exit;
        }
        self.generation += 1;
        self.armed = true;
        self.timer = match ExpiryTimer::spawn(tx.clone(), self.generation, self.window) {
            Ok(timer) => Some(timer),
            Err(err) => {
                // Still warned; the next key or press resolves it instead.
                tracing::warn!(error = %err, "failed to start interrupt timer");
                None
            }
        };
        InterruptAction::Warn
    }

    /// Handle a posted expiry. Returns `true` when the warning should clear.
    pub fn on_expiry(&mut self, generation: u64) -> bool {
        if !self.armed || generation != self.generation {
            return false;
        }
        self.armed = false;
        self.timer = None;
        true
    }

    /// Cancel any pending warning. Returns whether one was armed.
    pub fn disarm(&mut self) -> bool {
        self.timer = None;
        std::mem::replace(&mut self.armed, false)
    }
}

impl Default for InterruptState {
    fn default() -> Self {
        Self::new(Duration::from_millis(
            crate::tui::settings::INTERRUPT_WINDOW_MS,
        ))
    }
}
