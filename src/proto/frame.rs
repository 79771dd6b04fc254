//! Serial frame decoder.
//!
//! The command link delivers an untrusted, arbitrarily fragmented byte
//! stream. The decoder owns a bounded receive buffer, consumes one byte
//! at a time, and classifies the buffered prefix after every append:
//!
//! ```text
//! offset 0: 0x57            (HEAD1)
//! offset 1: 0xAB            (HEAD2)
//! offset 2: address         (ignored)
//! offset 3: command         (opcode)
//! offset 4: length          (N = payload byte count)
//! offset 5..5+N-1: payload
//! offset 5+N: checksum = sum of all preceding bytes, mod 256
//! ```
//!
//! Every terminal classification (discard or accept) empties the buffer
//! before returning, so the next byte starts a fresh frame. A checksum
//! mismatch is a discard like any other framing error; the protocol has
//! no negative acknowledgement.

use crate::config::RX_BUFFER_CAPACITY;

/// First frame header byte.
pub const FRAME_HEAD1: u8 = 0x57;
/// Second frame header byte.
pub const FRAME_HEAD2: u8 = 0xAB;

/// Bytes before the payload: head1, head2, address, command, length.
const FRAME_OVERHEAD: usize = 5;

/// Classification of the buffered bytes after an append.
#[derive(Debug, PartialEq, Eq)]
pub enum FrameEvent<'a> {
    /// The buffer holds a valid frame prefix; keep feeding.
    NeedMore,
    /// The buffer held garbage or a corrupt frame; it has been emptied.
    Discard,
    /// A complete, checksum-valid frame; the buffer has been emptied.
    /// `payload` stays readable until the next `feed` call.
    Accept { command: u8, payload: &'a [u8] },
}

/// Byte-at-a-time frame decoder with a fixed-capacity receive buffer.
pub struct FrameDecoder {
    buf: [u8; RX_BUFFER_CAPACITY],
    len: usize,
}

impl FrameDecoder {
    pub const fn new() -> Self {
        Self {
            buf: [0; RX_BUFFER_CAPACITY],
            len: 0,
        }
    }

    /// Number of buffered bytes awaiting classification.
    pub fn pending(&self) -> usize {
        self.len
    }

    /// Append one received byte and classify the buffered frame prefix.
    pub fn feed(&mut self, byte: u8) -> FrameEvent<'_> {
        if self.len == RX_BUFFER_CAPACITY {
            // Unreachable with a one-byte length field (largest frame is
            // 261 bytes), but the cursor must never pass the capacity.
            self.len = 0;
            return FrameEvent::Discard;
        }
        self.buf[self.len] = byte;
        self.len += 1;

        if self.buf[0] != FRAME_HEAD1 {
            self.len = 0;
            return FrameEvent::Discard;
        }
        if self.len < 2 {
            return FrameEvent::NeedMore;
        }
        if self.buf[1] != FRAME_HEAD2 {
            self.len = 0;
            return FrameEvent::Discard;
        }
        if self.len < FRAME_OVERHEAD + 1 {
            return FrameEvent::NeedMore;
        }

        let data_len = self.buf[4] as usize;
        let expected = FRAME_OVERHEAD + data_len + 1;
        if expected > RX_BUFFER_CAPACITY {
            self.len = 0;
            return FrameEvent::Discard;
        }
        if self.len < expected {
            return FrameEvent::NeedMore;
        }

        let sum = self.buf[..expected - 1]
            .iter()
            .fold(0u8, |s, &b| s.wrapping_add(b));
        if sum != self.buf[expected - 1] {
            self.len = 0;
            return FrameEvent::Discard;
        }

        self.len = 0;
        FrameEvent::Accept {
            command: self.buf[3],
            payload: &self.buf[FRAME_OVERHEAD..expected - 1],
        }
    }
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::new()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Unit Tests (run on host, not embedded)
// ═══════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a well-formed frame around `command`/`payload`.
    fn make_frame(command: u8, payload: &[u8]) -> std::vec::Vec<u8> {
        let mut frame = vec![FRAME_HEAD1, FRAME_HEAD2, 0x00, command, payload.len() as u8];
        frame.extend_from_slice(payload);
        let sum = frame.iter().fold(0u8, |s, &b| s.wrapping_add(b));
        frame.push(sum);
        frame
    }

    /// Feed all of `bytes`, asserting NeedMore until the last byte, and
    /// return the classification of the last byte.
    fn feed_expecting_tail(decoder: &mut FrameDecoder, bytes: &[u8]) -> (u8, std::vec::Vec<u8>) {
        let (last, head) = bytes.split_last().unwrap();
        for &b in head {
            assert_eq!(decoder.feed(b), FrameEvent::NeedMore);
        }
        match decoder.feed(*last) {
            FrameEvent::Accept { command, payload } => (command, payload.to_vec()),
            other => panic!("expected Accept, got {:?}", other),
        }
    }

    #[test]
    fn bad_first_header_byte_discards() {
        let mut decoder = FrameDecoder::new();
        assert_eq!(decoder.feed(0x00), FrameEvent::Discard);
        assert_eq!(decoder.pending(), 0);
    }

    #[test]
    fn bad_second_header_byte_discards() {
        let mut decoder = FrameDecoder::new();
        assert_eq!(decoder.feed(FRAME_HEAD1), FrameEvent::NeedMore);
        assert_eq!(decoder.feed(0x42), FrameEvent::Discard);
        assert_eq!(decoder.pending(), 0);
    }

    #[test]
    fn header_prefix_needs_more_bytes() {
        // 57 AB, then the address byte, then anything short of the
        // declared frame length keeps asking for more input.
        let mut decoder = FrameDecoder::new();
        assert_eq!(decoder.feed(0x57), FrameEvent::NeedMore);
        assert_eq!(decoder.feed(0xAB), FrameEvent::NeedMore);
        assert_eq!(decoder.feed(0x00), FrameEvent::NeedMore);
        assert_eq!(decoder.feed(0x02), FrameEvent::NeedMore); // command
        assert_eq!(decoder.feed(0x08), FrameEvent::NeedMore); // length = 8
        for b in 0..7 {
            assert_eq!(decoder.feed(b), FrameEvent::NeedMore);
        }
        assert_eq!(decoder.pending(), 12);
    }

    #[test]
    fn well_formed_frame_round_trips() {
        let payload = [0x11, 0x22, 0x33];
        let frame = make_frame(0x02, &payload);

        let mut decoder = FrameDecoder::new();
        let (command, got) = feed_expecting_tail(&mut decoder, &frame);
        assert_eq!(command, 0x02);
        assert_eq!(got, payload);
        assert_eq!(decoder.pending(), 0);
    }

    #[test]
    fn empty_payload_frame_round_trips() {
        let frame = make_frame(0x01, &[]);
        assert_eq!(frame, [0x57, 0xAB, 0x00, 0x01, 0x00, 0x57]);

        let mut decoder = FrameDecoder::new();
        let (command, payload) = feed_expecting_tail(&mut decoder, &frame);
        assert_eq!(command, 0x01);
        assert!(payload.is_empty());
    }

    #[test]
    fn checksum_mismatch_discards_not_accepts() {
        let mut frame = make_frame(0x02, &[0xAA, 0xBB]);
        let last = frame.len() - 1;
        frame[last] = frame[last].wrapping_add(1);

        let mut decoder = FrameDecoder::new();
        let (tail, head) = frame.split_last().unwrap();
        for &b in head {
            assert_eq!(decoder.feed(b), FrameEvent::NeedMore);
        }
        assert_eq!(decoder.feed(*tail), FrameEvent::Discard);
        assert_eq!(decoder.pending(), 0);
    }

    #[test]
    fn any_single_byte_corruption_discards() {
        let payload = [0x01, 0x02, 0x03, 0x04];
        let clean = make_frame(0x05, &payload);

        // Flipping any single byte must never yield an Accept of the
        // corrupted frame. Corrupting HEAD1/HEAD2/length may leave the
        // decoder waiting for more input; that is fine - what is
        // forbidden is an Accept.
        for i in 0..clean.len() {
            let mut corrupt = clean.clone();
            corrupt[i] ^= 0x20;
            let mut decoder = FrameDecoder::new();
            for &b in &corrupt {
                if let FrameEvent::Accept { payload: got, .. } = decoder.feed(b) {
                    panic!("byte {} corruption accepted payload {:?}", i, got);
                }
            }
        }
    }

    #[test]
    fn feed_is_deterministic() {
        let frame = make_frame(0x04, &[0x02, 0x00, 0x01, 0x00, 0x02, 0x00, 0x00]);
        let run = |bytes: &[u8]| {
            let mut decoder = FrameDecoder::new();
            bytes
                .iter()
                .map(|&b| match decoder.feed(b) {
                    FrameEvent::NeedMore => 0u8,
                    FrameEvent::Discard => 1,
                    FrameEvent::Accept { .. } => 2,
                })
                .collect::<std::vec::Vec<_>>()
        };
        assert_eq!(run(&frame), run(&frame));
    }

    #[test]
    fn decoder_recovers_after_terminal_outcomes() {
        let frame = make_frame(0x02, &[0u8; 8]);
        let mut decoder = FrameDecoder::new();

        // Garbage, then a valid frame.
        assert_eq!(decoder.feed(0xFF), FrameEvent::Discard);
        let (command, _) = feed_expecting_tail(&mut decoder, &frame);
        assert_eq!(command, 0x02);

        // Immediately after an accept, the same frame parses again
        // exactly as it does from a fresh decoder.
        let (command, payload) = feed_expecting_tail(&mut decoder, &frame);
        assert_eq!(command, 0x02);
        assert_eq!(payload.len(), 8);
    }

    #[test]
    fn max_length_frame_fits_the_buffer() {
        let payload = [0x5A; 255];
        let frame = make_frame(0x02, &payload);
        assert_eq!(frame.len(), 261);

        let mut decoder = FrameDecoder::new();
        let (command, got) = feed_expecting_tail(&mut decoder, &frame);
        assert_eq!(command, 0x02);
        assert_eq!(got.len(), 255);
    }
}
