//! id Software's "Carmackization", a word-oriented LZ77 scheme used for the
//! map planes of Wolfenstein 3-D and related games.
//!
//! The stream is a sequence of little-endian words. A word whose high byte is
//! `0xa7` or `0xa8` is a pointer and its low byte is a count of words to copy:
//!
//! ```text
//! [count] a7 [distance:u8]      near pointer
//! [count] a8 [distance:u16le]   far pointer
//! ```
//!
//! The distance counts words back from the current end of the output. A count
//! of 0 is an escape for a literal word that happens to have a pointer tag in
//! its high byte; the literal's low byte follows the tag.
//!
//! <https://moddingwiki.shikadi.net/wiki/Carmack_compression>

use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::options::{Metadata, Options};

pub const METADATA: Metadata = Metadata {
    id: "cmp-carmackize",
    title: "id Software Carmackization compression",
    options: &[
        ("outputLength", "Stop revealing when this number of output bytes have \
            been produced (default read all input data until EOF)"),
    ],
};

const NEAR: u8 = 0xa7;
const FAR: u8 = 0xa8;

/// The longest run, in words, that the encoder emits as one pointer.
pub const MAX_RUN: usize = 254;
/// The farthest back, in words, that the encoder looks for a match.
pub const MAX_DISTANCE: usize = 0xffff;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    /// Only whole words can be compressed.
    #[error("input of {len} bytes is not a whole number of words")]
    OddLength { len: usize },
    /// A pointer or escape at `offset` is missing the bytes that follow it.
    #[error("pointer at offset {offset:#x} is cut off")]
    TruncatedStream { offset: usize },
    /// A pointer refers to a word before the start of the output, or has a
    /// distance of 0.
    #[error("copy of {count} words from {distance} words back at output word {pos} is out of range")]
    CopyOutOfRange { pos: usize, distance: u16, count: u8 },
}

/// Appends `count` words copied from `distance` words back. The source may
/// overlap the words being appended.
fn copy_words(output: &mut Vec<u8>, distance: u16, count: u8) -> Result<(), FormatError> {
    let back = usize::from(distance) * 2;
    if distance == 0 || back > output.len() {
        return Err(FormatError::CopyOutOfRange { pos: output.len() / 2, distance, count });
    }
    let src = output.len() - back;
    for i in 0..usize::from(count) * 2 {
        let b = output[src + i];
        output.push(b);
    }
    Ok(())
}

/// Decompresses `input`. If `output_length` is given, stops as soon as that
/// many bytes have been produced and cuts the output to that length.
pub fn decode(input: &[u8], output_length: Option<usize>) -> Result<Vec<u8>, FormatError> {
    let wanted = |output: &Vec<u8>| output_length.map_or(true, |n| output.len() < n);
    let mut output = Vec::with_capacity(input.len() * 2);
    let mut i = 0;
    while input.len() - i >= 2 && wanted(&output) {
        let start = i;
        let (low, high) = (input[i], input[i + 1]);
        i += 2;
        let truncated = FormatError::TruncatedStream { offset: start };
        match high {
            NEAR | FAR if low == 0 => {
                let low = *input.get(i).ok_or(truncated)?;
                i += 1;
                output.extend([low, high]);
            }
            NEAR => {
                let distance = *input.get(i).ok_or(truncated)?;
                i += 1;
                trace!("near copy of {} words from {} back", low, distance);
                copy_words(&mut output, u16::from(distance), low)?;
            }
            FAR => {
                let distance = input.get(i..i + 2).ok_or(truncated)?;
                let distance = u16::from_le_bytes([distance[0], distance[1]]);
                i += 2;
                trace!("far copy of {} words from {} back", low, distance);
                copy_words(&mut output, distance, low)?;
            }
            _ => output.extend([low, high]),
        }
    }
    if input.len() - i == 1 && wanted(&output) {
        warn!("ignoring trailing byte at offset {:#x}", i);
    }
    if let Some(n) = output_length {
        output.truncate(n);
    }
    debug!("decoded {} bytes into {}", input.len(), output.len());
    Ok(output)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Match {
    distance: usize,
    length: usize,
}

/// Finds the longest run of words starting at `pos` that also occurs starting
/// `distance` words earlier, for every `distance` up to `MAX_DISTANCE`. The
/// earlier run may extend into the current one. Among runs of equal length,
/// the nearest wins. Runs shorter than 2 words are not worth a pointer and
/// give `None`.
fn longest_match(words: &[u16], pos: usize) -> Option<Match> {
    let limit = MAX_RUN.min(words.len() - pos);
    if limit < 2 {
        return None;
    }
    let mut best = Match { distance: 0, length: 0 };
    for distance in 1..=pos.min(MAX_DISTANCE) {
        let src = pos - distance;
        let length = (0..limit)
            .take_while(|&k| words[src + k] == words[pos + k])
            .count();
        if length > best.length {
            best = Match { distance, length };
            if length == limit {
                break;
            }
        }
    }
    if best.length >= 2 {
        Some(best)
    } else {
        None
    }
}

/// Compresses `input` with an exhaustive greedy search. The output is fully
/// determined by the input.
pub fn encode(input: &[u8]) -> Result<Vec<u8>, FormatError> {
    if input.len() % 2 != 0 {
        return Err(FormatError::OddLength { len: input.len() });
    }
    let words: Vec<u16> = input.chunks_exact(2)
        .map(|w| u16::from_le_bytes([w[0], w[1]]))
        .collect();

    let mut output = Vec::with_capacity(input.len());
    let mut pos = 0;
    while pos < words.len() {
        match longest_match(&words, pos) {
            Some(Match { distance, length }) => {
                trace!("word {}: copy {} words from {} back", pos, length, distance);
                if distance > 0xff {
                    output.extend([length as u8, FAR]);
                    output.extend(&(distance as u16).to_le_bytes());
                } else {
                    output.extend([length as u8, NEAR, distance as u8]);
                }
                pos += length;
            }
            None => {
                let [low, high] = words[pos].to_le_bytes();
                match high {
                    NEAR | FAR => output.extend([0, high, low]),
                    _ => output.extend([low, high]),
                }
                pos += 1;
            }
        }
    }
    debug!("encoded {} bytes into {}", input.len(), output.len());
    Ok(output)
}

/// An `outputLength` of 0 means no limit.
pub fn reveal(input: &[u8], options: &Options) -> Result<Vec<u8>, FormatError> {
    decode(input, options.output_length.filter(|&n| n != 0))
}

pub fn obscure(input: &[u8], _options: &Options) -> Result<Vec<u8>, FormatError> {
    encode(input)
}
