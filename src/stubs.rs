//! Known LZEXE decompression stubs.
//!
//! LZEXE replaces the entry point of an executable with its own decompressor.
//! The code at `cs:ip` is therefore a fingerprint of the LZEXE version that
//! produced the file, and the version in turn determines how the relocation
//! table was packed. Only the first `SIGNATURE_LEN` bytes of each stub are
//! compared; they cover the whole decompression loop.

/// The number of bytes compared at the entry point.
pub const SIGNATURE_LEN: usize = 232;

/// Entry-point code of executables packed by LZEXE 0.90.
///
/// The packed relocation table of this version sits at `cs:019d` and is a
/// list of 16 count-prefixed groups of offsets, one group per 64 KB band.
pub const SIG_090: [u8; SIGNATURE_LEN] = [
    0x06, 0x0e, 0x1f, 0x8b, 0x0e, 0x0c, 0x00, 0x8b, 0xf1, 0x4e, 0x89, 0xf7,
    0x8c, 0xdb, 0x03, 0x1e, 0x0a, 0x00, 0x8e, 0xc3, 0xb4, 0x00, 0x31, 0xed,
    0xfd, 0xac, 0x01, 0xc5, 0xaa, 0xe2, 0xfa, 0x8b, 0x16, 0x0e, 0x00, 0x8a,
    0xc2, 0x29, 0xc5, 0x8a, 0xc6, 0x29, 0xc5, 0x39, 0xd5, 0x74, 0x0c, 0xba,
    0x91, 0x01, 0xb4, 0x09, 0xcd, 0x21, 0xb8, 0xff, 0x4c, 0xcd, 0x21, 0x53,
    0xb8, 0x53, 0x00, 0x50, 0xcb, 0x2e, 0x8b, 0x2e, 0x08, 0x00, 0x8c, 0xda,
    0x89, 0xe8, 0x3d, 0x00, 0x10, 0x76, 0x03, 0xb8, 0x00, 0x10, 0x29, 0xc5,
    0x29, 0xc2, 0x29, 0xc3, 0x8e, 0xda, 0x8e, 0xc3, 0xb1, 0x03, 0xd3, 0xe0,
    0x89, 0xc1, 0xd1, 0xe0, 0x48, 0x48, 0x8b, 0xf0, 0x8b, 0xf8, 0xf3, 0xa5,
    0x09, 0xed, 0x75, 0xd8, 0xfc, 0x8e, 0xc2, 0x8e, 0xdb, 0x31, 0xf6, 0x31,
    0xff, 0xba, 0x10, 0x00, 0xad, 0x89, 0xc5, 0xd1, 0xed, 0x4a, 0x75, 0x05,
    0xad, 0x89, 0xc5, 0xb2, 0x10, 0x73, 0x03, 0xa4, 0xeb, 0xf1, 0x31, 0xc9,
    0xd1, 0xed, 0x4a, 0x75, 0x05, 0xad, 0x89, 0xc5, 0xb2, 0x10, 0x72, 0x22,
    0xd1, 0xed, 0x4a, 0x75, 0x05, 0xad, 0x89, 0xc5, 0xb2, 0x10, 0xd1, 0xd1,
    0xd1, 0xed, 0x4a, 0x75, 0x05, 0xad, 0x89, 0xc5, 0xb2, 0x10, 0xd1, 0xd1,
    0x41, 0x41, 0xac, 0xb7, 0xff, 0x8a, 0xd8, 0xe9, 0x13, 0x00, 0xad, 0x8b,
    0xd8, 0xb1, 0x03, 0xd2, 0xef, 0x80, 0xcf, 0xe0, 0x80, 0xe4, 0x07, 0x74,
    0x0c, 0x88, 0xe1, 0x41, 0x41, 0x26, 0x8a, 0x01, 0xaa, 0xe2, 0xfa, 0xeb,
    0xa6, 0xac, 0x08, 0xc0, 0x74, 0x40, 0x3c, 0x01, 0x74, 0x05, 0x88, 0xc1,
    0x41, 0xeb, 0xea, 0x89,
];

/// Entry-point code of executables packed by LZEXE 0.91.
///
/// From this version on, the packed relocation table sits at `cs:0158` and is
/// a stream of byte or word deltas between consecutive relocation addresses.
pub const SIG_091: [u8; SIGNATURE_LEN] = [
    0x06, 0x0e, 0x1f, 0x8b, 0x0e, 0x0c, 0x00, 0x8b, 0xf1, 0x4e, 0x89, 0xf7,
    0x8c, 0xdb, 0x03, 0x1e, 0x0a, 0x00, 0x8e, 0xc3, 0xfd, 0xf3, 0xa4, 0x53,
    0xb8, 0x2b, 0x00, 0x50, 0xcb, 0x2e, 0x8b, 0x2e, 0x08, 0x00, 0x8c, 0xda,
    0x89, 0xe8, 0x3d, 0x00, 0x10, 0x76, 0x03, 0xb8, 0x00, 0x10, 0x29, 0xc5,
    0x29, 0xc2, 0x29, 0xc3, 0x8e, 0xda, 0x8e, 0xc3, 0xb1, 0x03, 0xd3, 0xe0,
    0x89, 0xc1, 0xd1, 0xe0, 0x48, 0x48, 0x8b, 0xf0, 0x8b, 0xf8, 0xf3, 0xa5,
    0x09, 0xed, 0x75, 0xd8, 0xfc, 0x8e, 0xc2, 0x8e, 0xdb, 0x31, 0xf6, 0x31,
    0xff, 0xba, 0x10, 0x00, 0xad, 0x89, 0xc5, 0xd1, 0xed, 0x4a, 0x75, 0x05,
    0xad, 0x89, 0xc5, 0xb2, 0x10, 0x73, 0x03, 0xa4, 0xeb, 0xf1, 0x31, 0xc9,
    0xd1, 0xed, 0x4a, 0x75, 0x05, 0xad, 0x89, 0xc5, 0xb2, 0x10, 0x72, 0x22,
    0xd1, 0xed, 0x4a, 0x75, 0x05, 0xad, 0x89, 0xc5, 0xb2, 0x10, 0xd1, 0xd1,
    0xd1, 0xed, 0x4a, 0x75, 0x05, 0xad, 0x89, 0xc5, 0xb2, 0x10, 0xd1, 0xd1,
    0x41, 0x41, 0xac, 0xb7, 0xff, 0x8a, 0xd8, 0xe9, 0x13, 0x00, 0xad, 0x8b,
    0xd8, 0xb1, 0x03, 0xd2, 0xef, 0x80, 0xcf, 0xe0, 0x80, 0xe4, 0x07, 0x74,
    0x0c, 0x88, 0xe1, 0x41, 0x41, 0x26, 0x8a, 0x01, 0xaa, 0xe2, 0xfa, 0xeb,
    0xa6, 0xac, 0x08, 0xc0, 0x74, 0x34, 0x3c, 0x01, 0x74, 0x05, 0x88, 0xc1,
    0x41, 0xeb, 0xea, 0x89, 0xfb, 0x83, 0xe7, 0x0f, 0x81, 0xc7, 0x00, 0x20,
    0xb1, 0x04, 0xd3, 0xeb, 0x8c, 0xc0, 0x01, 0xd8, 0x2d, 0x00, 0x02, 0x8e,
    0xc0, 0x89, 0xf3, 0x83, 0xe6, 0x0f, 0xd3, 0xeb, 0x8c, 0xd8, 0x01, 0xd8,
    0x8e, 0xd8, 0xe9, 0x72,
];

/// Entry-point code produced by the LZEXE that is distributed from Fabrice
/// Bellard's website. It still calls itself 0.91, but the stub begins with an
/// extra `push ax` and differs in a few instructions after that, so UNLZEXE
/// utilities that only know 0.91 reject it. The data layout is the same as
/// 0.91.
pub const SIG_091E: [u8; SIGNATURE_LEN] = [
    0x50, 0x06, 0x0e, 0x1f, 0x8b, 0x0e, 0x0c, 0x00, 0x8b, 0xf1, 0x4e, 0x89,
    0xf7, 0x8c, 0xdb, 0x03, 0x1e, 0x0a, 0x00, 0x8e, 0xc3, 0xfd, 0xf3, 0xa4,
    0x53, 0xb8, 0x2c, 0x00, 0x50, 0xcb, 0x2e, 0x8b, 0x2e, 0x08, 0x00, 0x8c,
    0xda, 0x89, 0xe8, 0x3d, 0x00, 0x10, 0x76, 0x03, 0xb8, 0x00, 0x10, 0x29,
    0xc5, 0x29, 0xc2, 0x29, 0xc3, 0x8e, 0xda, 0x8e, 0xc3, 0xb1, 0x03, 0xd3,
    0xe0, 0x89, 0xc1, 0x48, 0xd1, 0xe0, 0x8b, 0xf0, 0x8b, 0xf8, 0xf3, 0xa5,
    0x09, 0xed, 0x75, 0xd9, 0xfc, 0x8e, 0xc2, 0x8e, 0xdb, 0x31, 0xf6, 0x31,
    0xff, 0xba, 0x10, 0x00, 0xad, 0x89, 0xc5, 0xd1, 0xed, 0x4a, 0x75, 0x05,
    0xad, 0x89, 0xc5, 0xb2, 0x10, 0x73, 0x03, 0xa4, 0xeb, 0xf1, 0x31, 0xc9,
    0xd1, 0xed, 0x4a, 0x75, 0x05, 0xad, 0x89, 0xc5, 0xb2, 0x10, 0x72, 0x22,
    0xd1, 0xed, 0x4a, 0x75, 0x05, 0xad, 0x89, 0xc5, 0xb2, 0x10, 0xd1, 0xd1,
    0xd1, 0xed, 0x4a, 0x75, 0x05, 0xad, 0x89, 0xc5, 0xb2, 0x10, 0xd1, 0xd1,
    0x41, 0x41, 0xac, 0xb7, 0xff, 0x8a, 0xd8, 0xe9, 0x13, 0x00, 0xad, 0x8b,
    0xd8, 0xb1, 0x03, 0xd2, 0xef, 0x80, 0xcf, 0xe0, 0x80, 0xe4, 0x07, 0x74,
    0x0c, 0x88, 0xe1, 0x41, 0x41, 0x26, 0x8a, 0x01, 0xaa, 0xe2, 0xfa, 0xeb,
    0xa6, 0xac, 0x08, 0xc0, 0x74, 0x34, 0x3c, 0x01, 0x74, 0x05, 0x88, 0xc1,
    0x41, 0xeb, 0xea, 0x89, 0xfb, 0x83, 0xe7, 0x0f, 0x81, 0xc7, 0x00, 0x20,
    0xb1, 0x04, 0xd3, 0xeb, 0x8c, 0xc0, 0x01, 0xd8, 0x2d, 0x00, 0x02, 0x8e,
    0xc0, 0x89, 0xf3, 0x83, 0xe6, 0x0f, 0xd3, 0xeb, 0x8c, 0xd8, 0x01, 0xd8,
    0x8e, 0xd8, 0xe9, 0x72,
];
