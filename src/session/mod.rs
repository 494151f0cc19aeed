//! Session management for PTY-based process automation

mod builder;
pub(crate) mod interface;
mod reader;

pub use builder::SessionBuilder;
pub use interface::Backend;

use crate::buffer::OutputBuffer;
use crate::pattern::Pattern;
use crate::result::{Error, ExpectMatch};
use interface::ProcessHandle;
use portable_pty::{ExitStatus, PtySize};
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// How often the expect matcher re-checks the live window.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// A child process attached to a pseudo-terminal.
///
/// The session owns exactly one child. A background reader loop drains the
/// child's output into a shared buffer from the moment of spawn, so no
/// output is lost between [`expect`](Session::expect) calls. Matching is
/// resolved against the buffer's live window (everything not yet consumed
/// by a previous match).
///
/// # Examples
///
/// ```no_run
/// use ptyexpect::Session;
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let mut session = Session::builder()
///     .timeout(Duration::from_secs(5))
///     .flush_buffer(false)
///     .spawn("ls /dev && sleep 5")?;
///
/// let m = session.expect("null").await?;
/// println!("entries before the match: {}", m.discarded);
/// # Ok(())
/// # }
/// ```
pub struct Session {
    pub(crate) handle: ProcessHandle,
    pub(crate) buffer: Arc<Mutex<OutputBuffer>>,
    pub(crate) flush: Arc<AtomicBool>,
    pub(crate) interacting: Arc<AtomicBool>,
    timeout: Duration,
    force_match: bool,
    // Exits on its own once the child dies and the pty closes.
    pub(crate) _reader_task: tokio::task::JoinHandle<()>,
}

impl Session {
    /// Create a new session builder.
    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    /// Spawn a command with default options (convenience method).
    ///
    /// Shorthand for `Session::builder().spawn(command)`.
    pub fn spawn(command: &str) -> Result<Self, Error> {
        SessionBuilder::new().spawn(command)
    }

    /// The child's pid, or 0 once it has terminated.
    pub fn pid(&self) -> u32 {
        self.handle.pid.load(Ordering::SeqCst)
    }

    /// Whether the child is still considered running.
    pub fn is_running(&self) -> bool {
        self.pid() > 0
    }

    /// Wait for a pattern in the output, using the session's force policy.
    ///
    /// Blocks until the pattern appears in the live window, the session
    /// timeout elapses, or the child dies. On a match the matched region
    /// and everything before it are consumed and returned; a second
    /// identical call will not re-match the same bytes.
    ///
    /// # Errors
    ///
    /// [`Error::MatchTimeout`] if the deadline elapses (or the child dies)
    /// without a match and force matching is off. The buffer is left
    /// untouched in that case.
    pub async fn expect(&mut self, pattern: impl Into<Pattern>) -> Result<ExpectMatch, Error> {
        let force = self.force_match;
        self.expect_with(pattern, force).await
    }

    /// Wait for a pattern with an explicit force policy.
    ///
    /// With `force` on, a timed-out wait consumes the entire live window
    /// and returns it as the match instead of failing. Use this to drain
    /// unpredictable or binary output without stalling forever.
    pub async fn expect_with(
        &mut self,
        pattern: impl Into<Pattern>,
        force: bool,
    ) -> Result<ExpectMatch, Error> {
        let pattern = pattern.into();
        let deadline = Instant::now() + self.timeout;

        loop {
            if let Some(m) = self.try_match(&pattern).await {
                return Ok(m);
            }

            // Stop promptly on child death rather than waiting out the
            // full deadline; the buffer is complete at that point because
            // the reader zeroes the pid only after the final append.
            if Instant::now() >= deadline || !self.is_running() {
                if let Some(m) = self.try_match(&pattern).await {
                    return Ok(m);
                }
                if force {
                    return Ok(self.drain_window().await);
                }
                return Err(Error::MatchTimeout {
                    duration: self.timeout,
                });
            }

            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    /// Test the live window once and consume through any match found.
    async fn try_match(&self, pattern: &Pattern) -> Option<ExpectMatch> {
        let mut buf = self.buffer.lock().await;
        let found = pattern.find(buf.live())?;

        let live = buf.live();
        let discarded = live[..found.start].to_string();
        let matched = live[found.start..found.end].to_string();
        buf.consume(found.end);

        Some(ExpectMatch {
            discarded,
            matched,
            captures: found.captures,
        })
    }

    /// Consume the whole live window as a forced match.
    async fn drain_window(&self) -> ExpectMatch {
        let mut buf = self.buffer.lock().await;
        let matched = buf.live().to_string();
        buf.consume_all();
        ExpectMatch {
            discarded: String::new(),
            matched,
            captures: Vec::new(),
        }
    }

    /// Send bytes to the child's stdin.
    ///
    /// Fire-and-forget with respect to matching; this never waits for the
    /// child to produce output.
    ///
    /// # Errors
    ///
    /// [`Error::ProcessNotRunning`] if the child has exited; a failed
    /// write (broken pipe) also marks the process dead first.
    pub async fn send(&self, data: &[u8]) -> Result<(), Error> {
        if !self.is_running() {
            return Err(Error::ProcessNotRunning);
        }

        let writer = Arc::clone(&self.handle.writer);
        let data = data.to_vec();
        let written = tokio::task::spawn_blocking(move || {
            let mut writer = writer.blocking_lock();
            writer.write_all(&data)?;
            writer.flush()
        })
        .await
        .map_err(|e| Error::Io(std::io::Error::other(e)))?;

        if let Err(e) = written {
            tracing::debug!(error = %e, "write to child failed, marking process dead");
            self.handle.pid.store(0, Ordering::SeqCst);
            return Err(Error::ProcessNotRunning);
        }
        Ok(())
    }

    /// Send a string followed by a newline.
    pub async fn send_line(&self, line: &str) -> Result<(), Error> {
        self.send(line.as_bytes()).await?;
        self.send(b"\n").await
    }

    /// Deliver an OS signal (e.g. `libc::SIGTERM`) to the child.
    ///
    /// Returns whether the OS accepted delivery; follow-up is the
    /// caller's decision, there are no retries.
    ///
    /// # Errors
    ///
    /// [`Error::ProcessNotRunning`] if the child has already terminated.
    pub fn kill(&self, signal: i32) -> Result<bool, Error> {
        let pid = self.pid();
        if pid == 0 {
            return Err(Error::ProcessNotRunning);
        }
        let accepted = unsafe { libc::kill(pid as libc::pid_t, signal) } == 0;
        tracing::debug!(pid, signal, accepted, "delivered signal to child");
        Ok(accepted)
    }

    /// The current live window (captured output not yet consumed).
    pub async fn buffer(&self) -> String {
        self.buffer.lock().await.live().to_string()
    }

    /// Discard everything captured so far.
    pub async fn clear_buffer(&self) {
        self.buffer.lock().await.clear();
    }

    /// The pty's window size as `(rows, cols)`.
    pub fn winsize(&self) -> Result<(u16, u16), Error> {
        let size = self
            .handle
            .master
            .get_size()
            .map_err(|e| Error::Pty(e.to_string()))?;
        Ok((size.rows, size.cols))
    }

    /// Apply a window size to the pty.
    pub fn resize(&self, rows: u16, cols: u16) -> Result<(), Error> {
        self.handle
            .master
            .resize(PtySize {
                rows,
                cols,
                pixel_width: 0,
                pixel_height: 0,
            })
            .map_err(|e| Error::Pty(e.to_string()))
    }

    /// Hand the session over to the user until the child exits or
    /// [`stop_interact`](Session::stop_interact) is called.
    ///
    /// Switches the controlling terminal to raw mode, forwards keystrokes
    /// byte by byte, translates SIGINT/SIGTSTP into the matching control
    /// bytes, and propagates SIGWINCH to the pty. The terminal mode is
    /// restored on every exit path.
    pub async fn interact(&mut self) -> Result<(), Error> {
        crate::interact::run(self).await
    }

    /// Ask a running interactive session to end after its next poll.
    pub fn stop_interact(&self) {
        self.interacting.store(false, Ordering::SeqCst);
    }

    /// Wait for the child to exit and reap its exit status.
    ///
    /// Consumes the child handle; subsequent calls fail.
    pub async fn wait(&mut self) -> Result<ExitStatus, Error> {
        let mut child = self.handle.child.take().ok_or(Error::ProcessNotRunning)?;

        let status = tokio::task::spawn_blocking(move || child.wait())
            .await
            .map_err(|e| Error::Io(std::io::Error::other(e)))??;

        self.handle.pid.store(0, Ordering::SeqCst);
        Ok(status)
    }
}
