/// Default size of one read from the device.
pub const DEFAULT_READ_CHUNK_SIZE: usize = 128;

/// Link session configuration.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Buffer size for each read. Default: 128 bytes.
    pub read_chunk_size: usize,
    /// Name given to the reader thread.
    pub thread_name: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            read_chunk_size: DEFAULT_READ_CHUNK_SIZE,
            thread_name: "osdlink-reader".to_string(),
        }
    }
}
