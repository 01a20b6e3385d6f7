//! Synthetic LZEXE executables. There is no packer in the library, so tests
//! build packed files themselves: a greedy LZ encoder for the load module, the
//! two relocation table encodings, and the layout LZEXE gives its output.

#![allow(dead_code)]

use std::env;
use std::fs;
use std::path;

use gamecomp::exe;
use gamecomp::lzexe::Version;
use gamecomp::Pointer;

pub fn store_u16le(buf: &mut [u8], i: usize, v: u16) {
    buf[i..i + 2].clone_from_slice(&u16::to_le_bytes(v));
}

pub fn fetch_u16le(buf: &[u8], i: usize) -> u16 {
    u16::from_le_bytes(buf[i..i + 2].try_into().unwrap())
}

/// Saves `buf` to `path` if the environment variable GAMECOMP_TEST_SAVE is
/// set, for inspecting samples with other tools.
pub fn maybe_save<P: AsRef<path::Path>>(path: P, buf: &[u8]) -> Result<(), Box<dyn std::error::Error>> {
    if env::var_os("GAMECOMP_TEST_SAVE").is_some() {
        fs::write(path, buf)?;
    }
    Ok(())
}

/// Deterministic filler bytes that don't compress much.
pub fn noise(len: usize, mut seed: u32) -> Vec<u8> {
    (0..len).map(|_| {
        seed = seed.wrapping_mul(1103515245).wrapping_add(12345);
        (seed >> 16) as u8
    }).collect()
}

/// Packs bits into 16-bit control words, interleaved with data bytes the way
/// `gamecomp::bits::BitCursor` expects: a control word is reserved in the
/// output as soon as the previous one fills up, so it precedes the data bytes
/// of the tokens whose bits it holds.
pub struct BitWriter {
    out: Vec<u8>,
    control_pos: usize,
    control: u16,
    nbits: u32,
}

impl BitWriter {
    pub fn new() -> Self {
        Self { out: vec![0, 0], control_pos: 0, control: 0, nbits: 0 }
    }

    pub fn bit(&mut self, bit: bool) {
        if bit {
            self.control |= 1 << self.nbits;
        }
        self.nbits += 1;
        if self.nbits == 16 {
            store_u16le(&mut self.out, self.control_pos, self.control);
            self.control_pos = self.out.len();
            self.out.extend([0, 0]);
            self.control = 0;
            self.nbits = 0;
        }
    }

    pub fn byte(&mut self, b: u8) {
        self.out.push(b);
    }

    pub fn finish(mut self) -> Vec<u8> {
        store_u16le(&mut self.out, self.control_pos, self.control);
        self.out
    }
}

/// The farthest back a long copy can reach.
const MAX_DISTANCE: usize = 0x2000;
const MAX_LENGTH: usize = 256;

fn longest_match(data: &[u8], pos: usize) -> (usize, usize) {
    let mut best = (0, 0);
    for distance in 1..=pos.min(MAX_DISTANCE) {
        let length = (0..MAX_LENGTH.min(data.len() - pos))
            .take_while(|&k| data[pos - distance + k] == data[pos + k])
            .count();
        if length > best.1 {
            best = (distance, length);
        }
    }
    best
}

/// Compresses a load module the way LZEXE does, greedily, emitting a
/// segment-change code every `segment_every` bytes of output.
pub fn compress_body(data: &[u8], segment_every: usize) -> Vec<u8> {
    let mut w = BitWriter::new();
    let mut pos = 0;
    let mut next_segment = segment_every;
    while pos < data.len() {
        if pos >= next_segment {
            w.bit(false);
            w.bit(true);
            w.byte(0x00);
            w.byte(0x00);
            w.byte(0x01);
            next_segment += segment_every;
        }
        let (distance, length) = longest_match(data, pos);
        let span = (0x10000 - distance) as u16;
        if (2..=5).contains(&length) && distance <= 0x100 {
            let code = length - 2;
            w.bit(false);
            w.bit(false);
            w.bit(code & 2 != 0);
            w.bit(code & 1 != 0);
            w.byte(span as u8);
            pos += length;
        } else if length >= 3 {
            w.bit(false);
            w.bit(true);
            w.byte(span as u8);
            let high = ((span >> 5) & 0xf8) as u8;
            if length <= 9 {
                w.byte(high | (length - 2) as u8);
            } else {
                w.byte(high);
                w.byte((length - 1) as u8);
            }
            pos += length;
        } else {
            w.bit(true);
            w.byte(data[pos]);
            pos += 1;
        }
    }
    w.bit(false);
    w.bit(true);
    w.byte(0x00);
    w.byte(0x00);
    w.byte(0x00);
    w.finish()
}

fn relocs_offset(version: Version) -> usize {
    match version {
        Version::V0_90 => 0x19d,
        Version::V0_91 | Version::V0_91e => 0x158,
    }
}

/// The relocations in the form the given version's table reproduces them.
/// 0.90 stores each 64 KB band separately; 0.91 stores sorted addresses.
pub fn normalize(relocs: &[Pointer], version: Version) -> Vec<Pointer> {
    match version {
        Version::V0_90 => {
            let mut normalized = Vec::new();
            for band in 0..16 {
                for p in relocs.iter().filter(|p| p.abs() >> 16 == band) {
                    normalized.push(Pointer { segment: (band * 0x1000) as u16, offset: p.abs() as u16 });
                }
            }
            normalized
        }
        Version::V0_91 | Version::V0_91e => {
            let mut addrs: Vec<u32> = relocs.iter().map(Pointer::abs).collect();
            addrs.sort();
            addrs.iter().map(|&a| Pointer { segment: (a >> 4) as u16, offset: (a & 0xf) as u16 }).collect()
        }
    }
}

fn encode_relocs(relocs: &[Pointer], version: Version) -> Vec<u8> {
    let mut out = Vec::new();
    match version {
        Version::V0_90 => {
            for band in 0..16 {
                let offsets: Vec<u16> = relocs.iter()
                    .filter(|p| p.abs() >> 16 == band)
                    .map(|p| p.abs() as u16)
                    .collect();
                out.extend(&(offsets.len() as u16).to_le_bytes());
                for offset in offsets {
                    out.extend(&offset.to_le_bytes());
                }
            }
        }
        Version::V0_91 | Version::V0_91e => {
            let mut pos = 0;
            for p in normalize(relocs, version) {
                let mut span = p.abs() - pos;
                assert!(span > 0, "duplicate relocation {}", p);
                while span > 0xffff {
                    out.extend([0x00, 0x00, 0x00]);
                    span -= 0xfff0;
                }
                if span <= 0xff {
                    out.push(span as u8);
                } else {
                    out.push(0x00);
                    out.extend(&(span as u16).to_le_bytes());
                }
                pos = p.abs();
            }
            out.extend([0x00, 0x01, 0x00]);
        }
    }
    out
}

/// The parts of an unpacked executable.
#[derive(Debug, Clone)]
pub struct Sample {
    /// Only the fields that survive packing matter: `e_minalloc`,
    /// `e_maxalloc`, `e_ss`, `e_sp`, `e_csum`, `e_ip`, and `e_cs`.
    pub header: exe::Header,
    pub relocs: Vec<Pointer>,
    pub body: Vec<u8>,
}

impl Sample {
    pub fn new(body: Vec<u8>, relocs: Vec<Pointer>) -> Self {
        Self {
            header: exe::Header {
                e_magic: exe::MAGIC,
                e_cblp: 0,
                e_cp: 0,
                e_crlc: 0,
                e_cparhdr: 0,
                e_minalloc: 0x0100,
                e_maxalloc: 0x4000,
                e_ss: 0x0123,
                e_sp: 0x0400,
                e_csum: 0xbeef,
                e_ip: 0x0010,
                e_cs: 0x0001,
                e_lfarlc: exe::HEADER_LEN as u16,
                e_ovno: 0,
            },
            relocs,
            body,
        }
    }

    /// The unpacked executable, as revealing a file packed by `version`
    /// should reproduce it.
    pub fn unpacked(&self, version: Version) -> Vec<u8> {
        let relocs = normalize(&self.relocs, version);
        let header_len = (exe::HEADER_LEN + 4 * relocs.len() + 511) / 512 * 512;
        let (e_cblp, e_cp) = exe::encode_exe_len(header_len + self.body.len()).unwrap();
        let mut out = Vec::new();
        exe::Header {
            e_cblp,
            e_cp,
            e_crlc: relocs.len() as u16,
            e_cparhdr: (header_len / 16) as u16,
            e_lfarlc: exe::HEADER_LEN as u16,
            e_ovno: 0,
            ..self.header.clone()
        }.write(&mut out);
        for p in relocs.iter() {
            p.write(&mut out);
        }
        out.resize(header_len, 0);
        out.extend_from_slice(&self.body);
        out
    }

    /// Packs the sample into an executable that looks like the output of
    /// `version` of LZEXE: the compressed load module, then at `cs:0000` the
    /// info block, the stub, and the packed relocation table.
    pub fn pack(&self, version: Version) -> Vec<u8> {
        let mut buf = vec![0; 0x20];
        buf[0x1c..0x20].copy_from_slice(match version {
            Version::V0_90 => b"LZ09",
            Version::V0_91 | Version::V0_91e => b"LZ91",
        });
        buf.extend(compress_body(&self.body, 0x1000));
        buf.resize((buf.len() + 15) / 16 * 16, 0);
        let compressed_paragraphs = ((buf.len() - 0x20) / 16) as u16;
        let extra_paragraphs = ((self.body.len() + 15) / 16) as u16 + 1;

        let cs = buf.len();
        buf.resize(cs + 0x10, 0);
        buf.extend(version.signature());
        buf.resize(cs + relocs_offset(version), 0);
        buf.extend(encode_relocs(&self.relocs, version));
        let decompressor_len = (buf.len() - cs) as u16;

        let info = [
            self.header.e_ip,
            self.header.e_cs,
            self.header.e_sp,
            self.header.e_ss,
            compressed_paragraphs,
            extra_paragraphs,
            decompressor_len,
            0,
        ];
        for (i, &word) in info.iter().enumerate() {
            store_u16le(&mut buf, cs + 2 * i, word);
        }

        // The packed program needs room for the load module to grow and for
        // the decompressor.
        let mut e_minalloc = self.header.e_minalloc;
        let mut e_maxalloc = self.header.e_maxalloc;
        if e_maxalloc != 0 {
            e_minalloc = e_minalloc
                .wrapping_add(extra_paragraphs)
                .wrapping_add((decompressor_len + 15) >> 4)
                .wrapping_add(9);
            if e_maxalloc != 0xffff {
                e_maxalloc = e_maxalloc.wrapping_add(e_minalloc.wrapping_sub(self.header.e_minalloc));
            }
        }

        let (e_cblp, e_cp) = exe::encode_exe_len(buf.len()).unwrap();
        let mut header = Vec::new();
        exe::Header {
            e_magic: exe::MAGIC,
            e_cblp,
            e_cp,
            e_crlc: 0,
            e_cparhdr: 2,
            e_minalloc,
            e_maxalloc,
            e_ss: compressed_paragraphs + 0x20,
            e_sp: 0x80,
            e_csum: self.header.e_csum,
            e_ip: 0x10,
            e_cs: compressed_paragraphs,
            e_lfarlc: exe::HEADER_LEN as u16,
            e_ovno: 0,
        }.write(&mut header);
        buf[..exe::HEADER_LEN].copy_from_slice(&header);
        buf
    }
}

/// A load module with a mix of literals, short and long copies, and runs
/// long enough to need a length byte.
pub fn sample_body() -> Vec<u8> {
    let mut body = Vec::new();
    body.extend(b"\xb8\x00\x4c\xcd\x21");
    for i in 0..40u8 {
        body.extend(b"Hello, world! ");
        body.push(i);
    }
    body.extend(noise(300, 1));
    body.extend(vec![0x90; 700]);
    body.extend(noise(200, 2));
    body.extend(noise(0x2000, 3));
    // Repeat the start of the last block, from the farthest a copy can reach.
    let start = body.len() - 0x2000;
    body.extend_from_within(start..start + 50);
    body
}
