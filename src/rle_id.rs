//! id Software's byte RLE, used by Commander Keen and other games of that era.
//!
//! Each code byte is followed by its data:
//!
//! * `0x00..=0x7f`: the next byte repeated `code + 3` times.
//! * `0x80..=0xff`: `(code & 0x7f) + 1` literal bytes.
//!
//! Data is compressed in independent chunks (normally 0xff00 bytes). When the
//! decoder passes a chunk boundary it moves its output position back to the
//! last 16-byte boundary it reached, the way a 16-bit program would reload its
//! output segment. Bytes written past that point are overwritten by the next
//! chunk.

use std::iter;

use tracing::{trace, warn};

use crate::chunked;
use crate::options::{Metadata, Options};

pub const METADATA: Metadata = Metadata {
    id: "cmp-rle-id",
    title: "id Software RLE compression",
    options: &[
        ("chunkLength", "Number of bytes in each RLE chunk (RLE codes producing \
            0-15 bytes beyond this point are lost)"),
        ("outputLength", "Stop revealing when this number of output bytes have \
            been produced (default read all input data until EOF)"),
    ],
};

pub const DEFAULT_CHUNK_LENGTH: usize = 0xff00;

/// Longest run a single code can express.
const MAX_RUN: usize = 0x7f + 3;
/// Most literal bytes a single escape can carry.
const MAX_ESCAPE: usize = 0x80;

fn chunk_length(options: &Options) -> usize {
    options.chunk_length.filter(|&n| n != 0).unwrap_or(DEFAULT_CHUNK_LENGTH)
}

/// An output buffer with a write position that may be moved back over bytes
/// already written.
#[derive(Debug, Default)]
struct Output {
    buf: Vec<u8>,
    pos: usize,
}

impl Output {
    fn put(&mut self, b: u8) {
        if self.pos < self.buf.len() {
            self.buf[self.pos] = b;
        } else {
            self.buf.push(b);
        }
        self.pos += 1;
    }

    fn put_slice(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.put(b);
        }
    }
}

pub fn reveal(input: &[u8], options: &Options) -> Vec<u8> {
    let chunk_length = chunk_length(options);
    let output_length = options.output_length.filter(|&n| n != 0);

    let mut output = Output::default();
    // Where the current chunk began in the output.
    let mut segment = 0;
    let mut i = 0;
    // A run may be partly overwritten by the next chunk, so keep going to the
    // end of the input and truncate afterward.
    while input.len() - i >= 2 {
        let code = input[i];
        i += 1;
        if code & 0x80 != 0 {
            let mut len = usize::from(code & 0x7f) + 1;
            let remaining = input.len() - i;
            if len > remaining {
                warn!("tried to escape {} bytes at offset {:#x}, but there are only {} bytes left",
                    len, i - 1, remaining);
                len = remaining;
            }
            output.put_slice(&input[i..i + len]);
            i += len;
        } else {
            let b = input[i];
            i += 1;
            for _ in 0..usize::from(code) + 3 {
                output.put(b);
            }
        }

        let offset = output.buf.len() - segment;
        if offset >= chunk_length {
            segment += offset & !0x0f;
            output.pos = segment;
            trace!("next chunk at output {:#x}", segment);
        }
    }

    let mut output = output.buf;
    if let Some(n) = output_length {
        output.truncate(n);
    }
    output
}

/// Encoder state within one chunk: a run of identical bytes that hasn't been
/// written yet, and literal bytes waiting for an escape code.
#[derive(Debug, Default)]
struct Encoder {
    output: Vec<u8>,
    run_byte: u8,
    run: usize,
    literals: Vec<u8>,
}

impl Encoder {
    fn push(&mut self, b: u8) {
        if self.run > 0 && b == self.run_byte {
            if self.run == MAX_RUN {
                self.flush_run();
            }
            self.run += 1;
        } else {
            self.flush_run();
            self.run_byte = b;
            self.run = 1;
        }
    }

    /// Runs of 3 or more become a run code. Shorter ones join the literals.
    fn flush_run(&mut self) {
        if self.run > 2 {
            self.flush_literals();
            self.output.extend([(self.run - 3) as u8, self.run_byte]);
        } else {
            self.literals.extend(iter::repeat(self.run_byte).take(self.run));
        }
        self.run = 0;
    }

    fn flush_literals(&mut self) {
        for escape in self.literals.chunks(MAX_ESCAPE) {
            self.output.push(0x80 + (escape.len() - 1) as u8);
            self.output.extend_from_slice(escape);
        }
        self.literals.clear();
    }

    fn finish(mut self) -> Vec<u8> {
        self.flush_run();
        self.flush_literals();
        self.output
    }
}

fn obscure_block(block: &[u8]) -> Vec<u8> {
    let mut encoder = Encoder::default();
    for &b in block {
        encoder.push(b);
    }
    encoder.finish()
}

pub fn obscure(input: &[u8], options: &Options) -> Vec<u8> {
    chunked::obscure_chunked(input, chunk_length(options), obscure_block)
}
