//! ptyexpect: automate interactive command-line programs
//!
//! ptyexpect spawns a child process attached to a pseudo-terminal,
//! continuously captures its output into a buffer, and lets you wait for
//! patterns in that output with a bounded deadline — the classic `expect`
//! workflow. It also provides an interactive pass-through mode in which a
//! human takes over the session while keystrokes and control signals are
//! routed transparently.
//!
//! # Features
//!
//! - **Always-on capture**: a background reader loop drains the child's
//!   output from the moment of spawn, so nothing is dropped between
//!   `expect` calls
//! - **Pattern matching**: exact strings and regular expressions
//! - **Deadline semantics**: every wait is bounded; a forced match drains
//!   whatever arrived instead of stalling on unpredictable output
//! - **Interactive mode**: raw-mode keystroke forwarding with
//!   SIGINT/SIGTSTP translated to control bytes and SIGWINCH propagated
//!   to the pty
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use ptyexpect::Session;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut session = Session::builder()
//!         .timeout(Duration::from_secs(10))
//!         .spawn("python -i")?;
//!
//!     session.expect(">>> ").await?;
//!     session.send_line("print('Hello, World!')").await?;
//!
//!     let m = session.expect(">>> ").await?;
//!     println!("output: {}", m.discarded);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Expect semantics
//!
//! `expect` polls the live window — everything captured but not yet
//! consumed — and on a match consumes through the end of the matched
//! region. The returned [`ExpectMatch`] carries both the skipped preamble
//! (`discarded`) and the match itself (`matched`):
//!
//! ```rust,no_run
//! use ptyexpect::Session;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! # let mut session = Session::spawn("ls /dev && sleep 5")?;
//! let m = session.expect("null").await?;
//! assert!(!m.discarded.is_empty()); // listing entries before /dev/null
//!
//! // Drain whatever arrived without requiring a literal hit:
//! let rest = session.expect_with("wontMatch", true).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Interactive mode
//!
//! ```rust,no_run
//! use ptyexpect::Session;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut session = Session::spawn("bash")?;
//! // Hands the terminal to the user until bash exits.
//! session.interact().await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod buffer;
mod interact;
mod pattern;
mod result;
mod session;

// Public API exports
pub use pattern::Pattern;
pub use result::{Error, ExpectMatch};
pub use session::{Backend, Session, SessionBuilder};

// Re-export commonly used types
pub use portable_pty::ExitStatus;
