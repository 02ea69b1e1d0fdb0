use std::io::{self, ErrorKind, Read};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use osdlink_frame::FrameWriter;
use osdlink_transport::{DuplexStream, TransportError};
use tracing::{debug, info, warn};

use crate::config::SessionConfig;
use crate::error::{Result, SessionError};
use crate::sink::{ObservationSink, TextSink};

/// Backoff after a `WouldBlock` read from a non-blocking stream.
const WOULD_BLOCK_BACKOFF: Duration = Duration::from_millis(5);

/// Whether the background reader is still draining the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderState {
    Reading,
    Stopped,
}

/// Why the read loop ended without an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadExit {
    /// The device side closed the stream.
    EndOfStream,
    /// The session was closed or dropped.
    Cancelled,
}

/// An open link to a serial OSD device.
///
/// Construction starts the reader thread. [`send`](LinkSession::send) may be
/// called from any thread holding a reference; sends are serialized so two
/// frames never interleave on the wire. The reader uses its own stream
/// handle and never waits on the send lock.
pub struct LinkSession<S: DuplexStream> {
    writer: Mutex<FrameWriter<S>>,
    reader: Option<JoinHandle<io::Result<ReadExit>>>,
    cancel: Arc<AtomicBool>,
    reading: Arc<AtomicBool>,
}

impl<S: DuplexStream> LinkSession<S> {
    /// Take ownership of `stream` and start echoing incoming bytes to stdout.
    pub fn open(stream: S) -> Result<Self> {
        Self::open_with_config(stream, SessionConfig::default(), TextSink::stdout())
    }

    /// Take ownership of `stream` and start feeding incoming bytes to `sink`.
    pub fn open_with_config<K>(stream: S, config: SessionConfig, sink: K) -> Result<Self>
    where
        K: ObservationSink + 'static,
    {
        let read_half = stream
            .try_clone_handle()
            .map_err(|err| SessionError::Transport(TransportError::Io(err)))?;

        let cancel = Arc::new(AtomicBool::new(false));
        let reading = Arc::new(AtomicBool::new(true));
        let chunk_size = config.read_chunk_size.max(1);

        let reader = {
            let cancel = Arc::clone(&cancel);
            let reading = Arc::clone(&reading);
            thread::Builder::new()
                .name(config.thread_name.clone())
                .spawn(move || {
                    let _running = RunningFlag(reading);
                    read_loop(read_half, sink, chunk_size, &cancel)
                })
                .map_err(SessionError::Spawn)?
        };

        info!(chunk_size, thread = %config.thread_name, "link session started");

        Ok(Self {
            writer: Mutex::new(FrameWriter::new(stream)),
            reader: Some(reader),
            cancel,
            reading,
        })
    }

    /// Encode `payload` and write the frame. Returns the bytes accepted.
    ///
    /// A short write is not an error here; compare the count against the
    /// frame length or use [`send_exact`](LinkSession::send_exact).
    pub fn send(&self, payload: &[u8]) -> osdlink_frame::Result<usize> {
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        writer.send(payload)
    }

    /// Like [`send`](LinkSession::send), but a partial write is an error.
    pub fn send_exact(&self, payload: &[u8]) -> osdlink_frame::Result<usize> {
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        writer.send_exact(payload)
    }

    /// Current reader state.
    pub fn state(&self) -> ReaderState {
        if self.reading.load(Ordering::Acquire) {
            ReaderState::Reading
        } else {
            ReaderState::Stopped
        }
    }

    /// Stop the reader, release the stream and report how reading ended.
    ///
    /// A read error that ended the loop earlier is returned here as
    /// [`SessionError::Read`].
    pub fn close(mut self) -> Result<ReadExit> {
        self.stop().unwrap_or(Ok(ReadExit::Cancelled))
    }

    fn stop(&mut self) -> Option<Result<ReadExit>> {
        let handle = self.reader.take()?;
        self.cancel.store(true, Ordering::Release);

        let writer = self.writer.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Err(err) = writer.get_ref().shutdown() {
            debug!(error = %err, "stream shutdown failed");
        }

        let result = match handle.join() {
            Ok(Ok(exit)) => Ok(exit),
            Ok(Err(err)) => Err(SessionError::Read(err)),
            Err(_) => Err(SessionError::ReaderPanicked),
        };
        debug!(?result, "link session closed");
        Some(result)
    }
}

impl<S: DuplexStream> Drop for LinkSession<S> {
    fn drop(&mut self) {
        if let Some(Err(err)) = self.stop() {
            warn!(error = %err, "link session ended with error");
        }
    }
}

impl<S: DuplexStream> std::fmt::Debug for LinkSession<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinkSession")
            .field("state", &self.state())
            .finish()
    }
}

/// Clears the reader's running flag when the thread exits, unwinding included.
struct RunningFlag(Arc<AtomicBool>);

impl Drop for RunningFlag {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

fn read_loop<R, K>(
    mut stream: R,
    mut sink: K,
    chunk_size: usize,
    cancel: &AtomicBool,
) -> io::Result<ReadExit>
where
    R: Read,
    K: ObservationSink,
{
    let mut buf = vec![0u8; chunk_size];
    let result = loop {
        if cancel.load(Ordering::Acquire) {
            break Ok(ReadExit::Cancelled);
        }

        match stream.read(&mut buf) {
            Ok(0) if cancel.load(Ordering::Acquire) => break Ok(ReadExit::Cancelled),
            Ok(0) => {
                info!("device closed the link");
                break Ok(ReadExit::EndOfStream);
            }
            Ok(n) => sink.observe(&buf[..n]),
            Err(err) if matches!(err.kind(), ErrorKind::Interrupted | ErrorKind::TimedOut) => {
                continue
            }
            Err(err) if err.kind() == ErrorKind::WouldBlock => thread::sleep(WOULD_BLOCK_BACKOFF),
            Err(_) if cancel.load(Ordering::Acquire) => break Ok(ReadExit::Cancelled),
            Err(err) => {
                warn!(error = %err, "read loop stopped on error");
                break Err(err);
            }
        }
    };

    sink.finish();
    result
}
