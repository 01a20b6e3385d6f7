//! The byte RLE used by Monster Bash, with `0x90` as the trigger byte.
//!
//! `0x90 n` repeats the previous byte until it has appeared `n` times in a
//! row. `0x90 0x00` stands for a literal `0x90`. Every other byte is a
//! literal.

use std::iter;

use tracing::warn;

use crate::options::{Metadata, Options};

pub const METADATA: Metadata = Metadata {
    id: "cmp-rle-bash",
    title: "Monster Bash RLE compression",
    options: &[],
};

const TRIGGER: u8 = 0x90;

pub fn reveal(input: &[u8], _options: &Options) -> Vec<u8> {
    let mut output = Vec::with_capacity(input.len());
    let mut i = 0;
    while i < input.len() {
        let b = input[i];
        i += 1;
        if b != TRIGGER {
            output.push(b);
            continue;
        }
        match input.get(i) {
            None => warn!("ignoring RLE trigger at end of input"),
            Some(0) => output.push(TRIGGER),
            Some(&n) => match output.last() {
                Some(&prev) => output.extend(iter::repeat(prev).take(usize::from(n) - 1)),
                None => warn!("ignoring RLE code at offset {:#x} with no previous byte", i - 1),
            },
        }
        i += 1;
    }
    output
}

fn push_literal(output: &mut Vec<u8>, b: u8) {
    output.push(b);
    if b == TRIGGER {
        output.push(0);
    }
}

pub fn obscure(input: &[u8], _options: &Options) -> Vec<u8> {
    let mut output = Vec::with_capacity(input.len());
    let mut i = 0;
    while i < input.len() {
        let b = input[i];
        let run = input[i..].iter().take_while(|&&x| x == b).count();
        i += run;

        push_literal(&mut output, b);
        // A repeat of 2 costs as much as the literal it replaces.
        let mut extra = run - 1;
        while extra >= 2 {
            let n = extra.min(0xfe);
            output.extend([TRIGGER, (n + 1) as u8]);
            extra -= n;
        }
        if extra == 1 {
            push_literal(&mut output, b);
        }
    }
    output
}
