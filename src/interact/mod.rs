//! Interactive pass-through mode
//!
//! Lets a human drive the child directly: the controlling terminal goes
//! raw, keystrokes are forwarded one at a time, and control signals are
//! re-routed — SIGINT and SIGTSTP become the equivalent control bytes on
//! the child's stdin, SIGWINCH becomes a pty resize. The reader loop keeps
//! running and mirrors output to the terminal for the duration.

use crate::result::Error;
use crate::session::Session;
use std::sync::atomic::Ordering;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio::signal::unix::{signal, SignalKind};

/// How long the keystroke loop waits for input before re-checking that the
/// child is alive and the session is still active.
const INPUT_POLL: Duration = Duration::from_secs(1);

const CTRL_C: u8 = 0x03;
const CTRL_Z: u8 = 0x1A;

/// Puts the controlling terminal into raw mode and restores it on drop,
/// whatever the exit path.
struct RawModeGuard;

impl RawModeGuard {
    fn new() -> Result<Self, Error> {
        crossterm::terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        // Best effort; surfaced but never allowed to pre-empt cleanup.
        if let Err(e) = crossterm::terminal::disable_raw_mode() {
            tracing::warn!(error = %e, "failed to restore terminal mode");
        }
    }
}

/// Run an interactive session to completion.
///
/// Transition idle → active: set the running flag, force output mirroring
/// on, switch the terminal to raw mode, hook up signal routing. Transition
/// active → idle: restore the mirroring flag and terminal mode regardless
/// of how the loop ended.
pub(crate) async fn run(session: &mut Session) -> Result<(), Error> {
    if !session.is_running() {
        return Ok(());
    }

    session.interacting.store(true, Ordering::SeqCst);
    let prev_flush = session.flush.swap(true, Ordering::SeqCst);

    let result = drive(session).await;

    session.flush.store(prev_flush, Ordering::SeqCst);
    session.interacting.store(false, Ordering::SeqCst);
    result
}

async fn drive(session: &Session) -> Result<(), Error> {
    let _guard = RawModeGuard::new()?;

    // Dropping these streams at scope exit detaches the routing again.
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigtstp = signal(SignalKind::from_raw(libc::SIGTSTP))?;
    let mut sigwinch = signal(SignalKind::window_change())?;

    let mut stdin = tokio::io::stdin();
    let mut key = [0u8; 1];

    tracing::debug!("entering interactive mode");

    loop {
        if !session.is_running() || !session.interacting.load(Ordering::SeqCst) {
            break;
        }

        tokio::select! {
            _ = sigint.recv() => {
                if session.send(&[CTRL_C]).await.is_err() {
                    break;
                }
            }
            _ = sigtstp.recv() => {
                if session.send(&[CTRL_Z]).await.is_err() {
                    break;
                }
            }
            _ = sigwinch.recv() => {
                if let Ok((cols, rows)) = crossterm::terminal::size() {
                    if let Err(e) = session.resize(rows, cols) {
                        tracing::warn!(error = %e, "failed to propagate window size");
                    }
                }
            }
            read = tokio::time::timeout(INPUT_POLL, stdin.read(&mut key)) => {
                match read {
                    // Poll deadline; loop back and re-check liveness.
                    Err(_) => {}
                    // Our own stdin closed.
                    Ok(Ok(0)) => break,
                    Ok(Ok(_)) => match session.send(&key).await {
                        Ok(()) => {}
                        Err(Error::ProcessNotRunning) => break,
                        Err(e) => return Err(e),
                    },
                    Ok(Err(e)) => return Err(Error::Io(e)),
                }
            }
        }
    }

    tracing::debug!("leaving interactive mode");
    Ok(())
}
