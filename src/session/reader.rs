//! Background output-capture loop
//!
//! One blocking task per session, started at spawn and running until the
//! child dies. It is the sole appender to the shared buffer, so nothing is
//! lost between expect calls, and it detects process death for everyone
//! else by zeroing the pid when the read side closes.

use crate::buffer::OutputBuffer;
use std::io::{Read, Write};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Start the reader loop for a spawned process.
///
/// Reads up to `chunk_size` bytes at a time, appends them to `buffer`
/// (normalized), and mirrors the raw bytes to our stdout while `flush` is
/// set. EOF or a read error (EIO once the child exits) flips `pid` to 0
/// and ends the loop.
pub(crate) fn spawn_reader(
    mut reader: Box<dyn Read + Send>,
    buffer: Arc<Mutex<OutputBuffer>>,
    pid: Arc<AtomicU32>,
    flush: Arc<AtomicBool>,
    chunk_size: usize,
) -> tokio::task::JoinHandle<()> {
    tokio::task::spawn_blocking(move || {
        let mut chunk = vec![0u8; chunk_size.max(1)];

        while pid.load(Ordering::SeqCst) > 0 {
            match reader.read(&mut chunk) {
                Ok(0) => {
                    tracing::debug!("child output closed, marking process dead");
                    pid.store(0, Ordering::SeqCst);
                    break;
                }
                Ok(n) => {
                    tracing::trace!(bytes = n, "captured child output");
                    if flush.load(Ordering::SeqCst) {
                        let mut stdout = std::io::stdout();
                        let _ = stdout.write_all(&chunk[..n]);
                        let _ = stdout.flush();
                    }
                    buffer.blocking_lock().append(&chunk[..n]);
                }
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    // EIO on the master side means the child is gone.
                    tracing::debug!(error = %e, "read failed, marking process dead");
                    pid.store(0, Ordering::SeqCst);
                    break;
                }
            }
        }
    })
}
