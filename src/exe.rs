//! The fixed part of a 16-bit DOS MZ executable header.

use std::io::{self, prelude::*};

/// "MZ", interpreted as a little-endian integer.
pub const MAGIC: u16 = 0x5a4d;
/// "ZM". Early DOS loaders accept either byte order.
pub const MAGIC_SWAPPED: u16 = 0x4d5a;

/// The length of an EXE header, excluding relocations and variable-sized
/// padding. It is also the usual value of `e_lfarlc`, since the relocation
/// table normally starts right after the fixed fields.
pub const HEADER_LEN: usize = 28;

pub(crate) fn read_u16le<R: Read + ?Sized>(r: &mut R) -> io::Result<u16> {
    let mut buf = [0; 2];
    r.read_exact(&mut buf)?;
    Ok(u16::from_le_bytes(buf))
}

fn push_u16le(buf: &mut Vec<u8>, v: u16) {
    buf.extend(&u16::to_le_bytes(v));
}

/// The 14 words at the start of an EXE file, kept verbatim. Unlike a
/// loader's view of the header, nothing here is recomputed on write: callers
/// that change the size of the image are responsible for `e_cblp`, `e_cp`,
/// `e_crlc`, and `e_cparhdr`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub e_magic: u16,
    pub e_cblp: u16,
    pub e_cp: u16,
    pub e_crlc: u16,
    pub e_cparhdr: u16,
    pub e_minalloc: u16,
    pub e_maxalloc: u16,
    pub e_ss: u16,
    pub e_sp: u16,
    pub e_csum: u16,
    pub e_ip: u16,
    pub e_cs: u16,
    pub e_lfarlc: u16,
    pub e_ovno: u16,
}

impl Header {
    /// Parses the fixed header fields from the start of `buf`. Returns `None`
    /// if `buf` is shorter than `HEADER_LEN`. Doesn't check the magic.
    pub fn parse(mut buf: &[u8]) -> Option<Self> {
        if buf.len() < HEADER_LEN {
            return None;
        }
        let mut words = [0u16; HEADER_LEN / 2];
        for word in words.iter_mut() {
            *word = read_u16le(&mut buf).ok()?;
        }
        let [e_magic, e_cblp, e_cp, e_crlc, e_cparhdr, e_minalloc, e_maxalloc,
             e_ss, e_sp, e_csum, e_ip, e_cs, e_lfarlc, e_ovno] = words;
        Some(Self {
            e_magic, e_cblp, e_cp, e_crlc, e_cparhdr, e_minalloc, e_maxalloc,
            e_ss, e_sp, e_csum, e_ip, e_cs, e_lfarlc, e_ovno,
        })
    }

    pub fn has_magic(&self) -> bool {
        self.e_magic == MAGIC || self.e_magic == MAGIC_SWAPPED
    }

    /// Appends the encoded header fields to `buf`.
    pub fn write(&self, buf: &mut Vec<u8>) {
        let start = buf.len();
        push_u16le(buf, self.e_magic);
        push_u16le(buf, self.e_cblp);
        push_u16le(buf, self.e_cp);
        push_u16le(buf, self.e_crlc);
        push_u16le(buf, self.e_cparhdr);
        push_u16le(buf, self.e_minalloc);
        push_u16le(buf, self.e_maxalloc);
        push_u16le(buf, self.e_ss);
        push_u16le(buf, self.e_sp);
        push_u16le(buf, self.e_csum);
        push_u16le(buf, self.e_ip);
        push_u16le(buf, self.e_cs);
        push_u16le(buf, self.e_lfarlc);
        push_u16le(buf, self.e_ovno);
        debug_assert_eq!(buf.len() - start, HEADER_LEN);
    }
}

/// Returns a tuple `(e_cblp, e_cp)` that encodes `len` as appropriate for the
/// so-named EXE header fields. Returns `None` if the `len` is too large to be
/// represented (> 0x1fffe00).
pub fn encode_exe_len(len: usize) -> Option<(u16, u16)> {
    // Number of 512-byte blocks needed to store len, rounded up.
    let e_cp: u16 = ((len + 511) / 512).try_into().ok()?;
    // Number of bytes remaining after all the full blocks.
    let e_cblp: u16 = (len % 512).try_into().ok()?;
    Some((e_cblp, e_cp))
}

#[test]
fn test_encode_exe_len() {
    assert_eq!(encode_exe_len(0), Some((0, 0)));
    assert_eq!(encode_exe_len(1), Some((1, 1)));
    assert_eq!(encode_exe_len(511), Some((511, 1)));
    assert_eq!(encode_exe_len(512), Some((0, 1)));
    assert_eq!(encode_exe_len(513), Some((1, 2)));
    assert_eq!(encode_exe_len(512 * 0xffff - 1), Some((511, 0xffff)));
    assert_eq!(encode_exe_len(512 * 0xffff), Some((0, 0xffff)));

    assert_eq!(encode_exe_len(512 * 0xffff + 1), None);
}

#[test]
fn test_header_parse_write() {
    let mut buf = Vec::new();
    for i in 0..(HEADER_LEN as u16 / 2) {
        push_u16le(&mut buf, 0x0101 * i);
    }
    // Trailing bytes are not part of the header.
    buf.extend(&[0xaa, 0xbb]);

    let header = Header::parse(&buf).unwrap();
    assert_eq!(header.e_magic, 0x0000);
    assert_eq!(header.e_cs, 0x0b0b);
    assert_eq!(header.e_ovno, 0x0d0d);

    let mut out = Vec::new();
    header.write(&mut out);
    assert_eq!(out, &buf[..HEADER_LEN]);

    assert_eq!(Header::parse(&buf[..HEADER_LEN - 1]), None);
}

#[test]
fn test_has_magic() {
    let mut buf = vec![0; HEADER_LEN];
    buf[0..2].copy_from_slice(b"MZ");
    assert!(Header::parse(&buf).unwrap().has_magic());
    buf[0..2].copy_from_slice(b"ZM");
    assert!(Header::parse(&buf).unwrap().has_magic());
    buf[0..2].copy_from_slice(b"XY");
    assert!(!Header::parse(&buf).unwrap().has_magic());
}
