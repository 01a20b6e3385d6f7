//! A bit reader for LZ streams that interleave control bits with data bytes.

use thiserror::Error;

/// A read ran past the end of the buffer.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unexpected end of stream at offset {offset:#x}")]
pub struct EndOfStream {
    pub offset: usize,
}

/// Serves the bits of 16-bit little-endian control words one at a time,
/// least significant first, while also handing out the bytes that follow
/// them in the same buffer.
///
/// The next control word is fetched as soon as the last bit of the current
/// one has been consumed, not when the next bit is requested. Encoders rely
/// on this: a control word always precedes the data bytes of the tokens whose
/// bits it holds.
#[derive(Debug)]
pub struct BitCursor<'a> {
    buf: &'a [u8],
    pos: usize,
    bits: u16,
    remaining: u8,
}

impl<'a> BitCursor<'a> {
    /// Starts reading at `buf[pos..]`, fetching the first control word.
    pub fn new(buf: &'a [u8], pos: usize) -> Result<Self, EndOfStream> {
        let mut cursor = Self { buf, pos, bits: 0, remaining: 0 };
        cursor.refill()?;
        Ok(cursor)
    }

    fn refill(&mut self) -> Result<(), EndOfStream> {
        self.bits = self.word()?;
        self.remaining = 16;
        Ok(())
    }

    pub fn bit(&mut self) -> Result<bool, EndOfStream> {
        // Only after an earlier refill failed.
        if self.remaining == 0 {
            self.refill()?;
        }
        let bit = self.bits & 1 != 0;
        self.bits >>= 1;
        self.remaining -= 1;
        if self.remaining == 0 {
            self.refill()?;
        }
        Ok(bit)
    }

    pub fn byte(&mut self) -> Result<u8, EndOfStream> {
        let b = *self.buf.get(self.pos).ok_or(EndOfStream { offset: self.pos })?;
        self.pos += 1;
        Ok(b)
    }

    pub fn word(&mut self) -> Result<u16, EndOfStream> {
        let bytes = self.buf.get(self.pos..self.pos + 2).ok_or(EndOfStream { offset: self.pos })?;
        self.pos += 2;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    /// Offset of the next unread byte in the underlying buffer.
    pub fn position(&self) -> usize {
        self.pos
    }
}
