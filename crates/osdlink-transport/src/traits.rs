use std::io::{self, Read, Write};

/// An open, configured byte stream with independently usable directions.
///
/// The link session keeps one handle for writing and moves a second handle,
/// obtained from [`try_clone_handle`](DuplexStream::try_clone_handle), to its
/// reader thread. Both handles must refer to the same underlying device.
pub trait DuplexStream: Read + Write + Send + Sized + 'static {
    /// Open a second handle onto the same stream.
    fn try_clone_handle(&self) -> io::Result<Self>;

    /// Release the stream so that a read blocked on another handle returns.
    ///
    /// Streams that cannot interrupt a pending read (serial ports) return
    /// `Ok(())` and rely on their read timeout instead.
    fn shutdown(&self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(unix)]
impl DuplexStream for std::os::unix::net::UnixStream {
    fn try_clone_handle(&self) -> io::Result<Self> {
        self.try_clone()
    }

    fn shutdown(&self) -> io::Result<()> {
        match std::os::unix::net::UnixStream::shutdown(self, std::net::Shutdown::Both) {
            Err(err) if err.kind() == io::ErrorKind::NotConnected => Ok(()),
            other => other,
        }
    }
}
