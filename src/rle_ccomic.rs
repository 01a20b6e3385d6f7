//! The byte RLE used by Captain Comic for its level data.
//!
//! * `0x00..=0x7f`: that many literal bytes follow.
//! * `0x80..=0xff`: the next byte repeated `code & 0x7f` times.

use std::iter;

use tracing::warn;

use crate::options::{Metadata, Options};

pub const METADATA: Metadata = Metadata {
    id: "cmp-rle-ccomic",
    title: "Captain Comic RLE compression",
    options: &[
        ("outputLength", "Stop revealing when this number of output bytes have \
            been produced (default read all input data until EOF)"),
    ],
};

const MAX_RUN: usize = 0x7f;
const MAX_ESCAPE: usize = 0x7f;

/// Decompresses `input`, stopping early once `output_length` bytes (if given)
/// have been produced. Also returns how many bytes of `input` were read, which
/// tells where the next compressed item starts when several are stored back to
/// back.
pub fn reveal_with_consumed(input: &[u8], output_length: Option<usize>) -> (Vec<u8>, usize) {
    let output_length = output_length.filter(|&n| n != 0);
    let mut output = Vec::with_capacity(input.len() * 3 / 2);
    let mut i = 0;
    while input.len() - i >= 2 && output_length.map_or(true, |n| output.len() < n) {
        let code = input[i];
        i += 1;
        if code & 0x80 != 0 {
            let b = input[i];
            i += 1;
            output.extend(iter::repeat(b).take(usize::from(code & 0x7f)));
        } else {
            let mut len = usize::from(code);
            let remaining = input.len() - i;
            if len > remaining {
                warn!("tried to escape {} bytes at offset {:#x}, but there are only {} bytes left",
                    len, i - 1, remaining);
                len = remaining;
            }
            output.extend_from_slice(&input[i..i + len]);
            i += len;
        }
    }
    (output, i)
}

pub fn reveal(input: &[u8], options: &Options) -> Vec<u8> {
    reveal_with_consumed(input, options.output_length).0
}

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

    fn flush_run(&mut self) {
        if self.run > 1 {
            self.flush_literals();
            self.output.extend([0x80 | self.run as u8, self.run_byte]);
        } else {
            self.literals.extend(iter::repeat(self.run_byte).take(self.run));
        }
        self.run = 0;
    }

    fn flush_literals(&mut self) {
        for escape in self.literals.chunks(MAX_ESCAPE) {
            self.output.push(escape.len() as u8);
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

pub fn obscure(input: &[u8], _options: &Options) -> Vec<u8> {
    let mut encoder = Encoder::default();
    for &b in input {
        encoder.push(b);
    }
    encoder.finish()
}
