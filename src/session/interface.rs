//! Process-handle variants behind a spawn interface
//!
//! A session does not care how its child got a stdin, a stdout and a pid;
//! it only needs the capability set {spawn, send, kill, reader loop,
//! winsize}. `ProcessInterface` is that seam, and `PtySpawner` is the one
//! specified variant: a child running inside a pseudo-terminal.

use crate::result::Error;
use portable_pty::{native_pty_system, Child, CommandBuilder, MasterPty, PtySize};
use std::io::{IsTerminal, Read, Write};
use std::sync::atomic::AtomicU32;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Which process-handle implementation a session is built on.
///
/// Only the pty-backed variant is specified; the enum exists so a
/// pipe-backed variant can slot in without touching the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    /// Child attached to a pseudo-terminal (the default).
    #[default]
    Pty,
}

/// A spawned child and the endpoints the session drives it through.
///
/// Created once at spawn and never recreated. `pid` is the liveness flag:
/// whoever detects death (reader EOF, failed write) stores 0; everyone
/// else only reads it.
pub struct ProcessHandle {
    pub(crate) pid: Arc<AtomicU32>,
    pub(crate) reader: Option<Box<dyn Read + Send>>,
    pub(crate) writer: Arc<Mutex<Box<dyn Write + Send>>>,
    pub(crate) master: Box<dyn MasterPty + Send>,
    pub(crate) child: Option<Box<dyn Child + Send + Sync>>,
}

/// Capability seam over "how to get stdin/stdout/pid for a command".
pub trait ProcessInterface {
    /// Spawn `command` and return a connected handle with pid > 0.
    fn spawn(&self, command: &str, size: PtySize) -> Result<ProcessHandle, Error>;
}

/// Resolve a configured backend to its spawner.
pub(crate) fn spawner_for(backend: Backend) -> Box<dyn ProcessInterface> {
    match backend {
        Backend::Pty => Box::new(PtySpawner),
    }
}

/// The pty-backed process interface.
pub struct PtySpawner;

impl ProcessInterface for PtySpawner {
    fn spawn(&self, command: &str, size: PtySize) -> Result<ProcessHandle, Error> {
        let command = command.trim();
        if command.is_empty() {
            return Err(Error::InvalidArgument(
                "command must be a non-empty string".to_string(),
            ));
        }

        let pty_system = native_pty_system();
        let pair = pty_system
            .openpty(size)
            .map_err(|e| Error::Pty(e.to_string()))?;

        // Run through the shell so compound commands ("ls /dev && sleep 5")
        // behave exactly as typed.
        let mut cmd = CommandBuilder::new("/bin/sh");
        cmd.arg("-c");
        cmd.arg(command);

        let child = pair
            .slave
            .spawn_command(cmd)
            .map_err(|e| Error::Spawn(e.to_string()))?;

        let pid = child
            .process_id()
            .ok_or_else(|| Error::Spawn("spawned process has no pid".to_string()))?;

        let reader = pair
            .master
            .try_clone_reader()
            .map_err(|e| Error::Pty(e.to_string()))?;
        let writer = pair
            .master
            .take_writer()
            .map_err(|e| Error::Pty(e.to_string()))?;

        // Drop the slave end now that the child holds it; otherwise the
        // master never sees EOF and death goes undetected.
        drop(pair.slave);

        // Pass our terminal's dimensions on to the new pty when we have one.
        if std::io::stdout().is_terminal() {
            if let Ok((cols, rows)) = crossterm::terminal::size() {
                pair.master
                    .resize(PtySize {
                        rows,
                        cols,
                        pixel_width: 0,
                        pixel_height: 0,
                    })
                    .map_err(|e| Error::Pty(e.to_string()))?;
            }
        }

        tracing::debug!(pid, command, "spawned child on pty");

        Ok(ProcessHandle {
            pid: Arc::new(AtomicU32::new(pid)),
            reader: Some(reader),
            writer: Arc::new(Mutex::new(writer)),
            master: pair.master,
            child: Some(child),
        })
    }
}
