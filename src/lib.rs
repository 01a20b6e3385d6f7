//! Decompression and decryption of the storage layers found in DOS-era game
//! files and executables, along with the inverse transforms where they make
//! sense.
//!
//! Each transform has two directions. *Reveal* turns stored data back into
//! plain data (decompressing or decrypting it). *Obscure* turns plain data into
//! the stored form. Transforms are looked up by short identifiers and take
//! their parameters as named `Options`:
//!
//! | id | format | obscure |
//! |---|---|---|
//! | `cmp-lzexe` | DOS executables packed with LZEXE 0.90 or 0.91 | no |
//! | `cmp-carmackize` | id Software Carmack compression | yes |
//! | `cmp-rle-id` | id Software RLE | yes |
//! | `cmp-rle-ccomic` | Captain Comic RLE | yes |
//! | `cmp-rle-bash` | Monster Bash RLE | yes |
//! | `enc-xor-blood` | Blood RFF XOR encryption | yes |
//!
//! LZEXE executables are identified by looking up the executable portion of
//! the file (the "decompression stub") in a table of known stubs. See the
//! `stubs` module. Files packed by a version we don't recognize can't be
//! revealed.
//!
//! # Inconsistencies
//!
//! Doesn't try to be bug-compatible with every historical tool. Known
//! differences:
//!
//! - A revealed LZEXE executable has its `e_minalloc` and `e_maxalloc`
//!   adjusted using the sizes LZEXE records at `cs:0000`, as UNLZEXE does.
//! - The Carmack encoder never emits a run longer than 254 words.

use std::fmt;

use thiserror::Error;

pub mod bits;
pub mod carmack;
pub mod chunked;
pub mod exe;
pub mod lzexe;
pub mod options;
mod pointer;
pub mod rle_bash;
pub mod rle_ccomic;
pub mod rle_id;
pub mod stubs;
pub mod xor_blood;

pub use options::{Metadata, OptionError, Options};
pub use pointer::Pointer;

/// The verdict of a format probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identification {
    pub valid: bool,
    /// A short sentence explaining the verdict.
    pub reason: String,
}

impl Identification {
    pub fn valid<S: Into<String>>(reason: S) -> Self {
        Self { valid: true, reason: reason.into() }
    }

    pub fn invalid<S: Into<String>>(reason: S) -> Self {
        Self { valid: false, reason: reason.into() }
    }
}

impl fmt::Display for Identification {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", if self.valid { "valid" } else { "invalid" }, self.reason)
    }
}

/// An error from any of the transforms.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    Lzexe(#[from] lzexe::FormatError),
    #[error(transparent)]
    Carmack(#[from] carmack::FormatError),
    #[error(transparent)]
    Options(#[from] OptionError),
    /// The transform can only reveal.
    #[error("{id} does not support obscuring")]
    ObscureUnsupported { id: &'static str },
}

/// Every transform this crate implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Codec {
    Lzexe,
    Carmackize,
    RleId,
    RleCComic,
    RleBash,
    XorBlood,
}

impl Codec {
    pub const ALL: [Codec; 6] = [
        Codec::Lzexe,
        Codec::Carmackize,
        Codec::RleId,
        Codec::RleCComic,
        Codec::RleBash,
        Codec::XorBlood,
    ];

    /// Looks up a transform by its `Metadata::id`.
    pub fn from_id(id: &str) -> Option<Codec> {
        Self::ALL.iter().copied().find(|codec| codec.metadata().id == id)
    }

    pub fn metadata(&self) -> Metadata {
        match self {
            Codec::Lzexe => lzexe::METADATA,
            Codec::Carmackize => carmack::METADATA,
            Codec::RleId => rle_id::METADATA,
            Codec::RleCComic => rle_ccomic::METADATA,
            Codec::RleBash => rle_bash::METADATA,
            Codec::XorBlood => xor_blood::METADATA,
        }
    }

    pub fn reveal(&self, input: &[u8], options: &Options) -> Result<Vec<u8>, Error> {
        Ok(match self {
            Codec::Lzexe => lzexe::reveal(input, options)?,
            Codec::Carmackize => carmack::reveal(input, options)?,
            Codec::RleId => rle_id::reveal(input, options),
            Codec::RleCComic => rle_ccomic::reveal(input, options),
            Codec::RleBash => rle_bash::reveal(input, options),
            Codec::XorBlood => xor_blood::reveal(input, options),
        })
    }

    pub fn obscure(&self, input: &[u8], options: &Options) -> Result<Vec<u8>, Error> {
        Ok(match self {
            Codec::Lzexe => return Err(Error::ObscureUnsupported { id: lzexe::METADATA.id }),
            Codec::Carmackize => carmack::obscure(input, options)?,
            Codec::RleId => rle_id::obscure(input, options),
            Codec::RleCComic => rle_ccomic::obscure(input, options),
            Codec::RleBash => rle_bash::obscure(input, options),
            Codec::XorBlood => xor_blood::obscure(input, options),
        })
    }

    /// Probes whether `input` is in this format. Returns `None` for formats
    /// that have nothing to check, such as headerless compression streams.
    pub fn identify(&self, input: &[u8]) -> Option<Identification> {
        match self {
            Codec::Lzexe => Some(lzexe::identify(input)),
            _ => None,
        }
    }
}

impl fmt::Display for Codec {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.metadata().id)
    }
}
