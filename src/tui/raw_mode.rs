//! Raw terminal mode acquisition with guaranteed release.

use crate::error::ReadError;
use crossterm::terminal;
use std::io::{self, IsTerminal};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Once;

/// Live guards. Raw mode is entered on 0 -> 1 and left on 1 -> 0.
static RAW_DEPTH: AtomicUsize = AtomicUsize::new(0);
static PANIC_HOOK: Once = Once::new();
#[cfg(unix)]
static SIGNAL_WATCH: Once = Once::new();

/// Signals whose default action ends the process without unwinding.
#[cfg(unix)]
const RESTORE_SIGNALS: [i32; 3] = [
    signal_hook::consts::SIGTERM,
    signal_hook::consts::SIGHUP,
    signal_hook::consts::SIGQUIT,
];

/// Raw mode lifetime guard so terminal state is restored on any return path.
///
/// Dropping the guard (including during unwinding) restores cooked mode. A
/// panic hook additionally restores the terminal before the panic message is
/// printed, so the message is readable. On unix, SIGTERM, SIGHUP and SIGQUIT
/// are watched from a background thread that restores the terminal and then
/// performs the signal's default action.
#[derive(Debug)]
pub struct RawModeGuard {
    released: bool,
}

impl RawModeGuard {
    /// Enable raw mode, failing with `NotATerminal` when stdin is not a TTY.
    pub fn acquire() -> Result<Self, ReadError> {
        if !io::stdin().is_terminal() {
            return Err(ReadError::NotATerminal);
        }
        install_panic_hook();
        #[cfg(unix)]
        install_signal_restore();
        if RAW_DEPTH.fetch_add(1, Ordering::SeqCst) == 0 {
            if let Err(e) = terminal::enable_raw_mode() {
                RAW_DEPTH.fetch_sub(1, Ordering::SeqCst);
                return Err(ReadError::Io(e));
            }
        }
        Ok(Self { released: false })
    }

    /// Restore cooked mode now. Calling this more than once is a no-op.
    pub fn release(&mut self) -> io::Result<()> {
        if self.released {
            return Ok(());
        }
        self.released = true;
        if RAW_DEPTH.fetch_sub(1, Ordering::SeqCst) == 1 {
            terminal::disable_raw_mode()?;
        }
        Ok(())
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = self.release();
    }
}

/// Whether any guard currently holds the terminal in raw mode.
pub fn raw_mode_active() -> bool {
    RAW_DEPTH.load(Ordering::SeqCst) > 0
}

fn install_panic_hook() {
    PANIC_HOOK.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            if raw_mode_active() {
                let _ = terminal::disable_raw_mode();
            }
            previous(info);
        }));
    });
}

#[cfg(unix)]
fn install_signal_restore() {
    SIGNAL_WATCH.call_once(|| {
        let mut signals = match signal_hook::iterator::Signals::new(RESTORE_SIGNALS) {
            Ok(signals) => signals,
            Err(err) => {
                tracing::warn!(error = %err, "failed to watch termination signals");
                return;
            }
        };
        let spawned = std::thread::Builder::new()
            .name("termline-signals".to_string())
            .spawn(move || {
                for signal in signals.forever() {
                    if let Err(err) = restore_for_signal(&RAW_DEPTH, terminal::disable_raw_mode) {
                        tracing::warn!(error = %err, signal, "failed to restore terminal");
                    }
                    if let Err(err) = signal_hook::low_level::emulate_default_handler(signal) {
                        tracing::warn!(error = %err, signal, "failed to re-raise signal");
                    }
                }
            });
        if let Err(err) = spawned {
            tracing::warn!(error = %err, "failed to start signal watcher");
        }
    });
}

/// Leave raw mode if any guard holds it. Returns whether `disable` ran.
///
/// The depth is left alone; the process is about to end.
#[cfg(unix)]
fn restore_for_signal(
    depth: &AtomicUsize,
    disable: impl FnOnce() -> io::Result<()>,
) -> io::Result<bool> {
    if depth.load(Ordering::SeqCst) == 0 {
        return Ok(false);
    }
    disable()?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acquire_without_tty_reports_not_a_terminal() {
        // Test harness stdin is never an interactive terminal.
        if io::stdin().is_terminal() {
            return;
        }
        let err = RawModeGuard::acquire().expect_err("stdin is not a tty under test");
        assert!(matches!(err, ReadError::NotATerminal));
        assert!(!raw_mode_active());
    }

    #[cfg(unix)]
    #[test]
    fn signal_restore_skips_cooked_terminal() {
        let depth = AtomicUsize::new(0);
        let restored = restore_for_signal(&depth, || panic!("nothing to restore"));
        assert!(!restored.unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn signal_restore_leaves_raw_mode_once() {
        let depth = AtomicUsize::new(2);
        let mut calls = 0;
        let restored = restore_for_signal(&depth, || {
            calls += 1;
            Ok(())
        });
        assert!(restored.unwrap());
        assert_eq!(calls, 1);
        assert_eq!(depth.load(Ordering::SeqCst), 2);
    }

    #[cfg(unix)]
    #[test]
    fn signal_restore_reports_terminal_errors() {
        let depth = AtomicUsize::new(1);
        let err = restore_for_signal(&depth, || Err(io::Error::other("tty gone")))
            .expect_err("error propagates");
        assert_eq!(err.to_string(), "tty gone");
    }
}
