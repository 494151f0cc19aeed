//! Session builder for configuration

use crate::buffer::OutputBuffer;
use crate::result::Error;
use crate::session::interface::{spawner_for, Backend};
use crate::session::{reader, Session};
use portable_pty::PtySize;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Default deadline for expect operations (in seconds)
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default maximum bytes per read chunk
const DEFAULT_BUFFER_SIZE: usize = 8192;

/// Default PTY rows
const DEFAULT_PTY_ROWS: u16 = 24;

/// Default PTY columns
const DEFAULT_PTY_COLS: u16 = 80;

/// Builder for configuring and spawning sessions.
///
/// # Defaults
///
/// - `flush_buffer`: on (child output is mirrored to our stdout)
/// - `timeout`: 30 seconds
/// - `buffer_size`: 8192 bytes per read chunk
/// - `force_match`: off
/// - `interface`: pty-backed
/// - PTY size: 24 rows × 80 columns
///
/// # Examples
///
/// ```no_run
/// use ptyexpect::Session;
/// use std::time::Duration;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let session = Session::builder()
///     .timeout(Duration::from_secs(60))
///     .flush_buffer(false)
///     .buffer_size(4096)
///     .spawn("python -i")?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SessionBuilder {
    flush_buffer: bool,
    timeout: Duration,
    buffer_size: usize,
    force_match: bool,
    backend: Backend,
    pty_size: PtySize,
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionBuilder {
    /// Create a new session builder with default configuration.
    pub fn new() -> Self {
        Self {
            flush_buffer: true,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            buffer_size: DEFAULT_BUFFER_SIZE,
            force_match: false,
            backend: Backend::Pty,
            pty_size: PtySize {
                rows: DEFAULT_PTY_ROWS,
                cols: DEFAULT_PTY_COLS,
                pixel_width: 0,
                pixel_height: 0,
            },
        }
    }

    /// Mirror captured output to the controlling terminal's stdout.
    ///
    /// On by default; turn off for headless automation where echoing the
    /// child's output is just noise.
    pub fn flush_buffer(mut self, flush: bool) -> Self {
        self.flush_buffer = flush;
        self
    }

    /// Set the default deadline for expect operations.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the maximum number of bytes read from the child per chunk.
    pub fn buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size;
        self
    }

    /// Set the default force policy for expect operations.
    ///
    /// When on, a timed-out expect consumes and returns whatever arrived
    /// instead of failing. Individual calls can still override this via
    /// [`Session::expect_with`](crate::Session::expect_with).
    pub fn force_match(mut self, force: bool) -> Self {
        self.force_match = force;
        self
    }

    /// Select the process-handle implementation.
    ///
    /// Only the pty-backed variant exists today.
    pub fn interface(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }

    /// Set the initial PTY (terminal) size.
    ///
    /// If our own stdout is a real terminal its size takes precedence
    /// right after spawn.
    pub fn pty_size(mut self, rows: u16, cols: u16) -> Self {
        self.pty_size = PtySize {
            rows,
            cols,
            pixel_width: 0,
            pixel_height: 0,
        };
        self
    }

    /// Spawn a command and return a configured session.
    ///
    /// The output reader loop starts immediately, so this must be called
    /// from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for an empty command,
    /// [`Error::Pty`] if the pseudo-terminal cannot be created, and
    /// [`Error::Spawn`] if the process cannot be started.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use ptyexpect::Session;
    /// use std::time::Duration;
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let session = Session::builder()
    ///     .timeout(Duration::from_secs(5))
    ///     .spawn("ls /dev && sleep 5")?;
    /// assert!(session.pid() > 0);
    /// # Ok(())
    /// # }
    /// ```
    pub fn spawn(self, command: &str) -> Result<Session, Error> {
        let mut handle = spawner_for(self.backend).spawn(command, self.pty_size)?;

        let buffer = Arc::new(Mutex::new(OutputBuffer::new(self.buffer_size)));
        let flush = Arc::new(AtomicBool::new(self.flush_buffer));

        let pty_reader = handle
            .reader
            .take()
            .ok_or_else(|| Error::Pty("spawned handle has no reader".to_string()))?;
        let reader_task = reader::spawn_reader(
            pty_reader,
            Arc::clone(&buffer),
            Arc::clone(&handle.pid),
            Arc::clone(&flush),
            self.buffer_size,
        );

        Ok(Session {
            handle,
            buffer,
            flush,
            timeout: self.timeout,
            force_match: self.force_match,
            interacting: Arc::new(AtomicBool::new(false)),
            _reader_task: reader_task,
        })
    }
}
