//! Error types for ptyexpect

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while driving a session.
///
/// Most methods return `Result<T, Error>`. The variants a caller usually
/// wants to branch on are `MatchTimeout` (retry, or retry with force) and
/// `ProcessNotRunning` (stop the session).
///
/// # Examples
///
/// ```no_run
/// use ptyexpect::{Error, Session};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let mut session = Session::spawn("some-command")?;
///
/// match session.expect("done").await {
///     Ok(m) => println!("matched: {}", m.matched),
///     Err(Error::MatchTimeout { duration }) => {
///         eprintln!("no match after {duration:?}");
///     }
///     Err(e) => return Err(e.into()),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The constructor was given a command it cannot use (empty or blank).
    ///
    /// Raised before anything is spawned; no process exists after this error.
    #[error("invalid command: {0}")]
    InvalidArgument(String),

    /// The child process is no longer running (pid = 0).
    ///
    /// Returned by `send` and `kill` once the child has exited or its pipe
    /// has closed. Recoverable; the caller decides whether to tear down.
    #[error("process is not running")]
    ProcessNotRunning,

    /// No match appeared before the deadline and force matching was off.
    ///
    /// The buffer is left untouched, so the caller may retry, retry with a
    /// longer timeout, or drain the window with a forced expect.
    #[error("timed out waiting for pattern (after {duration:?})")]
    MatchTimeout {
        /// Deadline that elapsed without a match.
        duration: Duration,
    },

    /// The spawn collaborator failed to start the command.
    ///
    /// Fatal; propagated to the caller untouched, no retries.
    #[error("failed to spawn process: {0}")]
    Spawn(String),

    /// Pseudo-terminal creation or manipulation failed.
    #[error("pty error: {0}")]
    Pty(String),

    /// An invalid regular expression was supplied as a pattern.
    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// An underlying I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
