use std::io::Write;

/// Receives the raw bytes drained from the device.
///
/// Called on the reader thread, once per successful read, in stream order.
pub trait ObservationSink: Send {
    /// Handle one chunk of incoming bytes.
    fn observe(&mut self, bytes: &[u8]);

    /// Called once when the read loop stops, for any reason.
    fn finish(&mut self) {}
}

impl<F> ObservationSink for F
where
    F: FnMut(&[u8]) + Send,
{
    fn observe(&mut self, bytes: &[u8]) {
        self(bytes)
    }
}

/// Writes incoming bytes as text, one line per chunk.
///
/// A multi-byte UTF-8 character split across two reads is held back and
/// printed whole with the next chunk. Invalid sequences are replaced with
/// U+FFFD.
pub struct TextSink<W> {
    out: W,
    carry: Utf8Carry,
}

impl TextSink<std::io::Stdout> {
    /// A sink printing to standard output.
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> TextSink<W> {
    /// A sink writing to `out`.
    pub fn new(out: W) -> Self {
        Self {
            out,
            carry: Utf8Carry::new(),
        }
    }

    /// Borrow the destination.
    pub fn get_ref(&self) -> &W {
        &self.out
    }

    /// Consume the sink and return the destination.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, bytes: &[u8]) {
        if bytes.is_empty() {
            return;
        }
        let text = String::from_utf8_lossy(bytes);
        let _ = writeln!(self.out, "{text}");
        let _ = self.out.flush();
    }
}

impl<W: Write + Send> ObservationSink for TextSink<W> {
    fn observe(&mut self, bytes: &[u8]) {
        let complete = self.carry.push(bytes);
        self.emit(&complete);
    }

    fn finish(&mut self) {
        let rest = self.carry.take_rest();
        self.emit(&rest);
    }
}

/// Re-chunks a byte stream on UTF-8 character boundaries.
///
/// A multi-byte sequence cut off at the end of one chunk is held until the
/// next chunk completes it.
#[derive(Debug, Default)]
pub struct Utf8Carry {
    pending: Vec<u8>,
}

impl Utf8Carry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `bytes` to any held tail and return everything up to the last
    /// character boundary.
    pub fn push(&mut self, bytes: &[u8]) -> Vec<u8> {
        let mut data = std::mem::take(&mut self.pending);
        data.extend_from_slice(bytes);

        let split = data.len() - incomplete_tail_len(&data);
        self.pending = data.split_off(split);
        data
    }

    /// Return whatever is still held, complete or not.
    pub fn take_rest(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.pending)
    }
}

/// Length of a trailing UTF-8 sequence that has started but not finished.
fn incomplete_tail_len(data: &[u8]) -> usize {
    for back in 1..=data.len().min(3) {
        let b = data[data.len() - back];
        if b & 0xC0 == 0x80 {
            continue;
        }
        let need = match b {
            0xC0..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF7 => 4,
            _ => 1,
        };
        return if need > back { back } else { 0 };
    }
    0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(sink: TextSink<Vec<u8>>) -> String {
        String::from_utf8(sink.into_inner()).unwrap()
    }

    #[test]
    fn ascii_chunk_becomes_one_line() {
        let mut sink = TextSink::new(Vec::new());
        sink.observe(b"VBAT 12.4");
        sink.observe(b"RSSI 87");
        assert_eq!(output(sink), "VBAT 12.4\nRSSI 87\n");
    }

    #[test]
    fn split_multibyte_char_is_carried_to_next_chunk() {
        let degree = "23\u{00B0}C".as_bytes();
        let (head, tail) = degree.split_at(3);

        let mut sink = TextSink::new(Vec::new());
        sink.observe(head);
        sink.observe(tail);
        assert_eq!(output(sink), "23\n\u{00B0}C\n");
    }

    #[test]
    fn chunk_holding_only_a_partial_char_prints_nothing_yet() {
        let euro = "\u{20AC}".as_bytes();

        let mut sink = TextSink::new(Vec::new());
        sink.observe(&euro[..1]);
        sink.observe(&euro[1..2]);
        assert!(sink.get_ref().is_empty());
        sink.observe(&euro[2..]);
        assert_eq!(output(sink), "\u{20AC}\n");
    }

    #[test]
    fn finish_flushes_dangling_bytes_lossily() {
        let mut sink = TextSink::new(Vec::new());
        sink.observe(&[b'o', b'k', 0xE2, 0x82]);
        sink.finish();
        assert_eq!(output(sink), "ok\n\u{FFFD}\n");
    }

    #[test]
    fn invalid_bytes_are_replaced() {
        let mut sink = TextSink::new(Vec::new());
        sink.observe(&[b'a', 0xFF, b'b']);
        assert_eq!(output(sink), "a\u{FFFD}b\n");
    }

    #[test]
    fn incomplete_tail_detection() {
        assert_eq!(incomplete_tail_len(b""), 0);
        assert_eq!(incomplete_tail_len(b"abc"), 0);
        assert_eq!(incomplete_tail_len(&[b'a', 0xC3]), 1);
        assert_eq!(incomplete_tail_len(&[0xC3, 0xA9]), 0);
        assert_eq!(incomplete_tail_len(&[0xF0, 0x9F, 0x98]), 3);
        assert_eq!(incomplete_tail_len(&[0xF0, 0x9F, 0x98, 0x80]), 0);
    }

    #[test]
    fn carry_holds_partial_char_until_completed() {
        let mut carry = Utf8Carry::new();
        assert_eq!(carry.push(b"23\xC2"), b"23");
        assert_eq!(carry.push(b"\xB0C"), "\u{00B0}C".as_bytes());
        assert!(carry.take_rest().is_empty());

        assert!(carry.push(&[0xE2, 0x82]).is_empty());
        assert_eq!(carry.take_rest(), vec![0xE2, 0x82]);
    }

    #[test]
    fn closures_are_sinks() {
        let mut seen = Vec::new();
        {
            let mut sink = |bytes: &[u8]| seen.extend_from_slice(bytes);
            sink.observe(b"abc");
            sink.finish();
        }
        assert_eq!(seen, b"abc");
    }
}
