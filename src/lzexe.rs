//! Decompressor for DOS executables packed with LZEXE.
//!
//! LZEXE (Fabrice Bellard, 1989–1990) compresses the load module of an EXE
//! file with an LZ77 variant and prepends a small decompressor that runs
//! before the original program. The packed file looks like this:
//!
//! ```text
//! [MZ header] [compressed load module] [info block] [stub] [packed relocations]
//!                                      ^cs:0000      ^cs:ip
//! ```
//!
//! The version of LZEXE that produced a file is found by comparing the code at
//! the entry point against the known stubs in the `stubs` module. The version
//! decides where the packed relocation table lives and how it is encoded.
//!
//! Revealing a file rebuilds the original MZ header and relocation table, then
//! decodes the load module. Obscuring (packing) is not supported.
//!
//! # References
//!
//! * <https://moddingwiki.shikadi.net/wiki/LZEXE>
//! * UNLZEXE 0.8 by Mitugu (Kou) Kurizono

use std::fmt;

use thiserror::Error;
use tracing::{debug, trace};

use crate::bits::{BitCursor, EndOfStream};
use crate::exe;
use crate::options::{Metadata, Options};
use crate::pointer::Pointer;
use crate::stubs;
use crate::Identification;

pub const METADATA: Metadata = Metadata {
    id: "cmp-lzexe",
    title: "LZEXE compression",
    options: &[
        ("finalSize", "Size of the revealed file in bytes (default is the size \
            of the rebuilt header plus the decompressed load module)"),
    ],
};

/// The shortest file that can hold an EXE header and a decompression stub.
pub const MIN_LEN: usize = exe::HEADER_LEN + stubs::SIGNATURE_LEN;

/// The version of LZEXE that packed a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Version {
    V0_90,
    V0_91,
    /// 0.91 as distributed in later years, with a slightly different stub.
    V0_91e,
}

impl Version {
    pub const ALL: [Version; 3] = [Version::V0_90, Version::V0_91, Version::V0_91e];

    pub fn signature(&self) -> &'static [u8; stubs::SIGNATURE_LEN] {
        match self {
            Version::V0_90 => &stubs::SIG_090,
            Version::V0_91 => &stubs::SIG_091,
            Version::V0_91e => &stubs::SIG_091E,
        }
    }

    /// Offset of the packed relocation table from `cs:0000`.
    fn relocs_offset(&self) -> usize {
        match self {
            Version::V0_90 => 0x19d,
            Version::V0_91 | Version::V0_91e => 0x158,
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Version::V0_90 => "0.90",
            Version::V0_91 => "0.91",
            Version::V0_91e => "0.91e",
        })
    }
}

/// An LZEXE format error.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    /// The file is too short to hold a header and a decompression stub.
    #[error("file of {len} bytes is too short to be packed with LZEXE")]
    TooShort { len: usize },
    /// The EXE header fields that LZEXE always sets have other values.
    #[error("not packed with LZEXE (magic {magic:#06x}, e_lfarlc {relocs_offset:#06x}, e_ovno {overlay})")]
    NotThisFormat { magic: u16, relocs_offset: u16, overlay: u16 },
    /// `cs:ip` points past the end of the file.
    #[error("entry point {entry:#x} is beyond the end of the file ({len} bytes); the file may be truncated")]
    EntryOutOfRange { entry: usize, len: usize },
    /// The code at `cs:ip` is not a stub we recognize.
    #[error("unknown LZEXE decompression stub at {entry:#x}")]
    UnknownStubVariant { entry: usize },
    /// The info block, the packed relocation table, or the compressed data
    /// ended early.
    #[error("read overflow: data ended at offset {offset:#x}")]
    TruncatedStream { offset: usize },
    /// The info block claims more compressed data than precedes `cs:0000`.
    #[error("{paragraphs} paragraphs of compressed data do not fit before offset {cs_offset:#x}")]
    BodyOutOfRange { cs_offset: usize, paragraphs: u16 },
    /// A copy command refers to data before the start of the output.
    #[error("copy from {span} bytes away at output index {pos} is out of range")]
    CopyOutOfRange { pos: usize, span: i16 },
    /// The relocation count does not fit in `e_crlc`.
    #[error("{count} relocations are too many to fit in 16 bits")]
    TooManyRelocations { count: usize },
    /// The decompressed file is too large for `e_cblp` and `e_cp`.
    #[error("decompressed size of {len} bytes is too large to represent")]
    OutputTooLarge { len: usize },
}

impl From<EndOfStream> for FormatError {
    fn from(err: EndOfStream) -> Self {
        FormatError::TruncatedStream { offset: err.offset }
    }
}

/// Offset of `cs:0000` in the file.
fn cs_offset(header: &exe::Header) -> usize {
    (usize::from(header.e_cparhdr) + usize::from(header.e_cs)) << 4
}

/// Checks the fixed header fields and identifies the LZEXE version from the
/// code at the entry point. Returns the packed file's header along with the
/// version.
pub fn detect(buf: &[u8]) -> Result<(exe::Header, Version), FormatError> {
    if buf.len() < MIN_LEN {
        return Err(FormatError::TooShort { len: buf.len() });
    }
    let header = exe::Header::parse(buf).ok_or(FormatError::TooShort { len: buf.len() })?;
    if !header.has_magic() || usize::from(header.e_lfarlc) != exe::HEADER_LEN || header.e_ovno != 0 {
        return Err(FormatError::NotThisFormat {
            magic: header.e_magic,
            relocs_offset: header.e_lfarlc,
            overlay: header.e_ovno,
        });
    }

    let entry = cs_offset(&header) + usize::from(header.e_ip);
    if entry >= buf.len() {
        return Err(FormatError::EntryOutOfRange { entry, len: buf.len() });
    }
    debug!("entry={:#x}", entry);

    let code = &buf[entry..];
    let version = Version::ALL.iter()
        .copied()
        .find(|version| code.starts_with(version.signature()))
        .ok_or(FormatError::UnknownStubVariant { entry })?;
    debug!("compressed by LZEXE {}", version);
    Ok((header, version))
}

/// Like `detect`, but reports the outcome as a verdict with a reason instead
/// of an error, for sniffing the format of unknown files.
pub fn identify(buf: &[u8]) -> Identification {
    match detect(buf) {
        Ok((_, version)) => Identification::valid(format!("Compressed with LZEXE {}.", version)),
        Err(FormatError::TooShort { .. }) => Identification::invalid("File too short."),
        Err(FormatError::NotThisFormat { .. }) => Identification::invalid("Not compressed with LZEXE."),
        Err(FormatError::EntryOutOfRange { .. }) => Identification::invalid("Entry point is beyond end of file."),
        Err(FormatError::UnknownStubVariant { .. }) => Identification::invalid("Compressed with an unknown version of LZEXE."),
        Err(err) => Identification::invalid(err.to_string()),
    }
}

fn fetch_u8(buf: &[u8], i: usize) -> Result<u8, FormatError> {
    buf.get(i).copied().ok_or(FormatError::TruncatedStream { offset: i })
}

fn fetch_u16le(buf: &[u8], i: usize) -> Result<u16, FormatError> {
    buf.get(i..i + 2)
        .map(|b| u16::from_le_bytes([b[0], b[1]]))
        .ok_or(FormatError::TruncatedStream { offset: i })
}

/// The variables that LZEXE stores at `cs:0000`.
#[derive(Debug)]
struct Info {
    real_ip: u16,
    real_cs: u16,
    real_sp: u16,
    real_ss: u16,
    /// Size of the compressed load module, in paragraphs.
    compressed_paragraphs: u16,
    /// How much the load module grows when decompressed, in paragraphs.
    extra_paragraphs: u16,
    /// Size of the stub and the packed relocation table, in bytes.
    decompressor_len: u16,
    // The last word is a checksum in 0.90 and unused in 0.91.
}

impl Info {
    const LEN: usize = 16;

    fn parse(buf: &[u8], offset: usize) -> Result<Self, FormatError> {
        let word = |i: usize| fetch_u16le(buf, offset + 2 * i);
        Ok(Self {
            real_ip: word(0)?,
            real_cs: word(1)?,
            real_sp: word(2)?,
            real_ss: word(3)?,
            compressed_paragraphs: word(4)?,
            extra_paragraphs: word(5)?,
            decompressor_len: word(6)?,
        })
    }
}

/// Parses an LZEXE 0.90 relocation table: for each of the 16 64 KB bands, a
/// count followed by that many offsets. The band determines the segment.
fn parse_relocs_090(buf: &[u8], mut i: usize) -> Result<Vec<Pointer>, FormatError> {
    let mut relocs = Vec::new();
    for band in 0..16u16 {
        let count = fetch_u16le(buf, i)?;
        i += 2;
        for _ in 0..count {
            let offset = fetch_u16le(buf, i)?;
            i += 2;
            relocs.push(Pointer { segment: band * 0x1000, offset });
        }
    }
    Ok(relocs)
}

/// Parses an LZEXE 0.91 relocation table: a stream of distances between
/// consecutive relocation addresses. A distance is a byte, or if that byte is
/// 0, a word. The word 0 advances the segment by 0x0fff without an entry, and
/// the word 1 ends the table. Entries come out normalized, with offsets below
/// 16.
fn parse_relocs_091(buf: &[u8], mut i: usize) -> Result<Vec<Pointer>, FormatError> {
    let mut relocs = Vec::new();
    let mut segment: u16 = 0;
    let mut offset: u32 = 0;
    loop {
        let mut span = u32::from(fetch_u8(buf, i)?);
        i += 1;
        if span == 0 {
            span = u32::from(fetch_u16le(buf, i)?);
            i += 2;
            match span {
                0 => {
                    segment = segment.wrapping_add(0x0fff);
                    continue;
                }
                1 => break,
                _ => (),
            }
        }
        offset += span;
        segment = segment.wrapping_add((offset >> 4) as u16);
        offset &= 0x0f;
        relocs.push(Pointer { segment, offset: offset as u16 });
    }
    Ok(relocs)
}

/// Rounds a header of `len` bytes up to a 512-byte boundary. Returns the
/// padded length and the matching `e_cparhdr`, or `None` if the paragraph
/// count doesn't fit in 16 bits. The padding is computed from `len` as a
/// signed 16-bit quantity, as UNLZEXE does. Only the low 9 bits matter for
/// that, so the padded length is always a multiple of 512.
fn pad_header(len: usize) -> Option<(usize, u16)> {
    let signed = i32::from(len as u16 as i16);
    let padded = len + ((0x200 - signed) & 0x1ff) as usize;
    Some((padded, u16::try_from(padded >> 4).ok()?))
}

/// The parts of the original executable that are known before the load
/// module is decompressed.
#[derive(Debug)]
pub struct Rebuilt {
    /// The original header. `e_cblp` and `e_cp` still have the packed file's
    /// values; `e_minalloc` and `e_maxalloc` are not yet adjusted.
    pub header: exe::Header,
    pub relocs: Vec<Pointer>,
    /// Length of the header, relocations, and padding, in bytes.
    pub header_len: usize,
    info: Info,
}

/// Reads the info block at `cs:0000` and the packed relocation table of a
/// file that `detect` identified as `version`, and rebuilds the original
/// header and relocation table from them.
pub fn rebuild_relocations(buf: &[u8], version: Version, packed: &exe::Header) -> Result<Rebuilt, FormatError> {
    let cs = cs_offset(packed);
    let info = Info::parse(buf, cs)?;

    let table = cs + version.relocs_offset();
    let relocs = match version {
        Version::V0_90 => parse_relocs_090(buf, table)?,
        Version::V0_91 | Version::V0_91e => parse_relocs_091(buf, table)?,
    };
    debug!("{} relocations", relocs.len());

    let e_crlc = u16::try_from(relocs.len())
        .or(Err(FormatError::TooManyRelocations { count: relocs.len() }))?;
    let (header_len, e_cparhdr) = pad_header(exe::HEADER_LEN + 4 * relocs.len())
        .ok_or(FormatError::TooManyRelocations { count: relocs.len() })?;

    Ok(Rebuilt {
        header: exe::Header {
            e_crlc,
            e_cparhdr,
            e_ss: info.real_ss,
            e_sp: info.real_sp,
            e_ip: info.real_ip,
            e_cs: info.real_cs,
            e_lfarlc: exe::HEADER_LEN as u16,
            ..packed.clone()
        },
        relocs,
        header_len,
        info,
    })
}

/// The basic decompression loop. Decodes the compressed load module starting
/// at `buf[start..]` and returns it.
///
/// Each command starts with one or two control bits:
///
/// * `1`: copy one literal byte.
/// * `00ll`, then a byte `d`: copy `ll + 2` bytes from `0xff00 | d` bytes back.
/// * `01`, then bytes `d` and `h`: copy `(h & 7) + 2` bytes from
///   `0xe000 | (h & 0xf8) << 5 | d` bytes back. If `h & 7` is 0, a third byte
///   gives the length instead: 0 ends the data, 1 marks a segment change and
///   copies nothing, and any other `n` means `n + 1` bytes.
///
/// The distances are signed 16-bit values. Copies go byte by byte from low to
/// high, so a copy may overlap its own output.
pub fn decode_body(buf: &[u8], start: usize) -> Result<Vec<u8>, FormatError> {
    let mut input = BitCursor::new(buf, start)?;
    let mut output: Vec<u8> = Vec::new();
    loop {
        if input.bit()? {
            output.push(input.byte()?);
            continue;
        }
        let (span, length) = if !input.bit()? {
            let high = usize::from(input.bit()?);
            let low = usize::from(input.bit()?);
            let span = (0xff00 | u16::from(input.byte()?)) as i16;
            (span, (high << 1 | low) + 2)
        } else {
            let low = input.byte()?;
            let high = input.byte()?;
            let span = (u16::from(low) | u16::from(high & !0x07) << 5 | 0xe000) as i16;
            let mut length = usize::from(high & 0x07) + 2;
            if length == 2 {
                match input.byte()? {
                    0 => break,
                    1 => {
                        trace!("segment change at output {:#x}", output.len());
                        continue;
                    }
                    n => length = usize::from(n) + 1,
                }
            }
            (span, length)
        };

        let pos = output.len();
        let src = pos.checked_add_signed(isize::from(span))
            .filter(|&src| src < pos)
            .ok_or(FormatError::CopyOutOfRange { pos, span })?;
        trace!("copy {} bytes from {} at {:#x}", length, span, pos);
        for i in 0..length {
            let b = output[src + i];
            output.push(b);
        }
    }
    debug!("end of compressed data at {:#x}, load size {:#x}", input.position(), output.len());
    Ok(output)
}

/// Decompresses an LZEXE-packed executable and returns the original
/// executable.
pub fn reveal(buf: &[u8], options: &Options) -> Result<Vec<u8>, FormatError> {
    let (packed, version) = detect(buf)?;
    let Rebuilt { mut header, relocs, header_len, info } = rebuild_relocations(buf, version, &packed)?;

    // The compressed load module ends where the code segment begins.
    let cs = cs_offset(&packed);
    let start = (usize::from(packed.e_cparhdr) + usize::from(packed.e_cs))
        .checked_sub(usize::from(info.compressed_paragraphs))
        .ok_or(FormatError::BodyOutOfRange { cs_offset: cs, paragraphs: info.compressed_paragraphs })? << 4;
    debug!("compressed data at {:#x}", start);
    let body = decode_body(buf, start)?;

    // LZEXE raised the memory requirements to make room for the decompressor.
    if packed.e_maxalloc != 0 {
        let stub_paragraphs = ((u32::from(info.decompressor_len) + 16 - 1) >> 4) as u16;
        header.e_minalloc = header.e_minalloc
            .wrapping_sub(info.extra_paragraphs.wrapping_add(stub_paragraphs).wrapping_add(9));
        if packed.e_maxalloc != 0xffff {
            header.e_maxalloc = header.e_maxalloc
                .wrapping_sub(packed.e_minalloc.wrapping_sub(header.e_minalloc));
        }
    }

    let exe_len = body.len() + (usize::from(header.e_cparhdr) << 4);
    let (e_cblp, e_cp) = exe::encode_exe_len(exe_len)
        .ok_or(FormatError::OutputTooLarge { len: exe_len })?;
    header.e_cblp = e_cblp;
    header.e_cp = e_cp;

    let mut output = Vec::with_capacity(header_len + body.len());
    header.write(&mut output);
    for pointer in relocs.iter() {
        pointer.write(&mut output);
    }
    output.resize(header_len, 0);
    output.extend_from_slice(&body);

    if let Some(final_size) = options.final_size {
        output.resize(final_size, 0);
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A file with a plausible LZEXE header and `code` at the entry point
    /// `cs:ip` = `0000:0010`.
    fn stub_sample(code: &[u8]) -> Vec<u8> {
        let mut buf = Vec::new();
        exe::Header {
            e_magic: exe::MAGIC,
            e_cblp: 0,
            e_cp: 1,
            e_crlc: 0,
            e_cparhdr: 2,
            e_minalloc: 0,
            e_maxalloc: 0xffff,
            e_ss: 0,
            e_sp: 0x80,
            e_csum: 0,
            e_ip: 0x10,
            e_cs: 0,
            e_lfarlc: 0x1c,
            e_ovno: 0,
        }.write(&mut buf);
        buf.extend(b"LZ91");
        buf.resize(0x30, 0);
        buf.extend_from_slice(code);
        buf.resize(0x30 + 256, 0);
        buf
    }

    #[test]
    fn test_detect_versions() {
        for &version in Version::ALL.iter() {
            let sample = stub_sample(version.signature());
            assert_eq!(detect(&sample).map(|(_, v)| v), Ok(version));
        }
    }

    #[test]
    fn test_detect_too_short() {
        for len in [0, 8, MIN_LEN - 1] {
            let mut sample = stub_sample(&stubs::SIG_091);
            sample.truncate(len);
            assert_eq!(detect(&sample).map(|(_, v)| v), Err(FormatError::TooShort { len }));
        }
        assert_eq!(identify(b"12345678"), Identification::invalid("File too short."));
    }

    #[test]
    fn test_detect_not_this_format() {
        for &(i, v) in &[(0, b'X'), (0x18, 0x1e), (0x1a, 0x01)] {
            let mut sample = stub_sample(&stubs::SIG_091);
            sample[i] = v;
            match detect(&sample) {
                Err(FormatError::NotThisFormat { .. }) => (),
                x => panic!("{:?}", x),
            }
            assert_eq!(identify(&sample), Identification::invalid("Not compressed with LZEXE."));
        }
        // Either byte order of the magic is fine.
        let mut sample = stub_sample(&stubs::SIG_091);
        sample[0..2].copy_from_slice(b"ZM");
        assert_eq!(detect(&sample).map(|(_, v)| v), Ok(Version::V0_91));
    }

    #[test]
    fn test_detect_entry_out_of_range() {
        let mut sample = stub_sample(&stubs::SIG_090);
        // e_cs
        sample[0x16] = 0x40;
        let len = sample.len();
        assert_eq!(detect(&sample).map(|(_, v)| v), Err(FormatError::EntryOutOfRange { entry: 0x430, len }));
        assert_eq!(identify(&sample), Identification::invalid("Entry point is beyond end of file."));
    }

    #[test]
    fn test_detect_unknown_stub() {
        let mut sample = stub_sample(&stubs::SIG_091E);
        sample[0x30 + 100] ^= 0xff;
        assert_eq!(detect(&sample).map(|(_, v)| v), Err(FormatError::UnknownStubVariant { entry: 0x30 }));
        assert_eq!(identify(&sample), Identification::invalid("Compressed with an unknown version of LZEXE."));

        // A stub cut off by the end of the file doesn't match either.
        let mut sample = stub_sample(&stubs::SIG_091E);
        sample.truncate(0x30 + 222);
        assert_eq!(detect(&sample).map(|(_, v)| v), Err(FormatError::UnknownStubVariant { entry: 0x30 }));
    }

    #[test]
    fn test_identify_valid() {
        for &(version, reason) in &[
            (Version::V0_90, "Compressed with LZEXE 0.90."),
            (Version::V0_91, "Compressed with LZEXE 0.91."),
            (Version::V0_91e, "Compressed with LZEXE 0.91e."),
        ] {
            assert_eq!(identify(&stub_sample(version.signature())), Identification::valid(reason));
        }
    }

    #[test]
    fn test_parse_relocs_090() {
        let mut buf = vec![0xaa];
        for &word in &[2u16, 0x0010, 0x0020, 0, 1, 0x0030] {
            buf.extend(&word.to_le_bytes());
        }
        buf.resize(1 + 2 * 6 + 2 * 13, 0);
        assert_eq!(parse_relocs_090(&buf, 1), Ok(vec![
            Pointer { segment: 0x0000, offset: 0x0010 },
            Pointer { segment: 0x0000, offset: 0x0020 },
            Pointer { segment: 0x2000, offset: 0x0030 },
        ]));
        // Fewer than 16 bands.
        assert_eq!(parse_relocs_090(&buf[..buf.len() - 1], 1), Err(FormatError::TruncatedStream { offset: buf.len() - 2 }));
    }

    #[test]
    fn test_parse_relocs_091() {
        let buf = [
            0x05,
            0x20,
            0x00, 0x00, 0x00,
            0x00, 0x34, 0x12,
            0x05,
            0x00, 0x01, 0x00,
        ];
        assert_eq!(parse_relocs_091(&buf, 0), Ok(vec![
            Pointer { segment: 0x0000, offset: 0x5 },
            Pointer { segment: 0x0002, offset: 0x5 },
            Pointer { segment: 0x1124, offset: 0x9 },
            Pointer { segment: 0x1124, offset: 0xe },
        ]));
        // No end marker.
        assert_eq!(parse_relocs_091(&buf[..9], 0), Err(FormatError::TruncatedStream { offset: 9 }));
    }

    #[test]
    fn test_pad_header() {
        assert_eq!(pad_header(28), Some((512, 32)));
        assert_eq!(pad_header(512), Some((512, 32)));
        assert_eq!(pad_header(28 + 4 * 121), Some((512, 32)));
        assert_eq!(pad_header(28 + 4 * 122), Some((1024, 64)));
    }

    #[test]
    fn test_pad_header_large_table() {
        // The length is negative as a 16-bit value from 0x8000 bytes on, but
        // e_cparhdr still counts the whole header.
        assert_eq!(pad_header(0x8000), Some((0x8000, 0x800)));
        assert_eq!(pad_header(28 + 4 * 8200), Some((33280, 2080)));
        assert_eq!(pad_header(28 + 4 * 20000), Some((80384, 5024)));
        assert_eq!(pad_header(28 + 4 * 0xffff), Some((262656, 16416)));
        assert_eq!(pad_header(0x100000), None);
    }

    #[test]
    fn test_rebuild_large_table() {
        let mut buf = stub_sample(&stubs::SIG_090);
        let (header, version) = detect(&buf).unwrap();
        // 8200 relocations in the first band of a 0.90 table.
        buf.resize(0x20 + 0x19d, 0);
        buf.extend(&8200u16.to_le_bytes());
        for i in 0..8200u16 {
            buf.extend(&(2 * i).to_le_bytes());
        }
        buf.extend([0; 2 * 15]);
        let rebuilt = rebuild_relocations(&buf, version, &header).unwrap();
        assert_eq!(rebuilt.relocs.len(), 8200);
        assert_eq!(rebuilt.header_len, 33280);
        assert_eq!(usize::from(rebuilt.header.e_cparhdr) * 16, rebuilt.header_len);
    }

    #[test]
    fn test_info_truncated() {
        let buf = [0u8; 0x20 + 11];
        match Info::parse(&buf, 0x20) {
            Err(FormatError::TruncatedStream { offset: 0x2a }) => (),
            x => panic!("{:?}", x),
        }
        assert!(Info::parse(&[0u8; 0x20 + 16], 0x20).is_ok());
    }

    fn decode(buf: &[u8]) -> Result<Vec<u8>, FormatError> {
        decode_body(buf, 0)
    }

    #[test]
    fn test_decode_short_copy() {
        // 1 'A', 1 'B', 00 10 -2 (length 4), 01 end
        let buf = [0x93, 0x00, b'A', b'B', 0xfe, 0x00, 0x00, 0x00];
        assert_eq!(decode(&buf), Ok(b"ABABAB".to_vec()));
    }

    #[test]
    fn test_decode_long_copy() {
        // 1 'A', 1 'B', 1 'C', 01 -3 (length 3), 01 -3 (length 5 + 1),
        // 01 segment change, 01 end
        let buf = [
            0x57, 0x05, b'A', b'B', b'C',
            0xfd, 0xf9,
            0xfd, 0xf8, 0x05,
            0x00, 0x00, 0x01,
            0x00, 0x00, 0x00,
        ];
        assert_eq!(decode(&buf), Ok(b"ABCABCABCABC".to_vec()));
    }

    #[test]
    fn test_decode_start_offset() {
        let buf = [0xee, 0xee, 0x93, 0x00, b'A', b'B', 0xfe, 0x00, 0x00, 0x00];
        assert_eq!(decode_body(&buf, 2), Ok(b"ABABAB".to_vec()));
    }

    #[test]
    fn test_decode_copy_out_of_range() {
        // 00 00 -1 with no output yet
        assert_eq!(decode(&[0x00, 0x00, 0xff]), Err(FormatError::CopyOutOfRange { pos: 0, span: -1 }));
        // 1 'A', 00 00 -2
        assert_eq!(decode(&[0x01, 0x00, b'A', 0xfe]), Err(FormatError::CopyOutOfRange { pos: 1, span: -2 }));
    }

    #[test]
    fn test_decode_truncated() {
        for (input, offset) in [
            (&[] as &[u8], 0),
            (&[0x01], 0),
            // literal byte missing
            (&[0x01, 0x00], 2),
            // long copy missing its second byte
            (&[0x02, 0x00, 0xfd], 3),
            // end marker cut short
            (&[0x02, 0x00, 0x00, 0x00], 4),
        ] {
            assert_eq!(decode(input), Err(FormatError::TruncatedStream { offset }), "{:?}", input);
        }
    }
}
