//! The XOR cipher that Blood applies to the start of files in its RFF
//! archives. The key byte for position `i` is `seed + (i + offset) / 2`, so
//! each key value covers two bytes. The cipher is its own inverse.

use tracing::debug;

use crate::options::{Metadata, Options};

pub const METADATA: Metadata = Metadata {
    id: "enc-xor-blood",
    title: "Blood XOR encryption",
    options: &[
        ("offset", "Key offset (v3.1 = 0, v3.0 = 1)"),
        ("seed", "Initial seed for the first XOR byte"),
        ("limit", "Number of bytes to affect (0=all, default is 256)"),
    ],
};

/// Number of bytes encrypted from the start of a file when no limit is given.
pub const DEFAULT_LIMIT: usize = 256;

pub fn reveal(input: &[u8], options: &Options) -> Vec<u8> {
    let offset = u64::from(options.offset.unwrap_or(0));
    let seed = options.seed.unwrap_or(0);
    let len = match options.limit {
        None => DEFAULT_LIMIT.min(input.len()),
        Some(0) => input.len(),
        Some(limit) => limit.min(input.len()),
    };
    debug!("xor {} of {} bytes, seed {:#04x}, offset {}", len, input.len(), seed, offset);

    let mut output = input.to_vec();
    for (i, b) in output[..len].iter_mut().enumerate() {
        *b ^= seed.wrapping_add(((i as u64 + offset) >> 1) as u8);
    }
    output
}

pub fn obscure(input: &[u8], options: &Options) -> Vec<u8> {
    reveal(input, options)
}
