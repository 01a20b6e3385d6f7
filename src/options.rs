//! Named options accepted by the transforms, and the descriptors that
//! advertise them.

use thiserror::Error;

/// A static description of one transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Metadata {
    /// Short identifier, e.g. `"cmp-lzexe"`.
    pub id: &'static str,
    /// Human-readable name.
    pub title: &'static str,
    /// `(name, description)` of every option the transform reads.
    pub options: &'static [(&'static str, &'static str)],
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OptionError {
    #[error("unknown option {name:?}")]
    UnknownOption { name: String },
    #[error("invalid value {value:?} for option {name}")]
    InvalidValue { name: &'static str, value: String },
    #[error("expected NAME=VALUE, got {arg:?}")]
    MissingValue { arg: String },
}

/// Options for a single reveal or obscure call. Every field is optional and
/// each transform documents its own default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    /// `chunkLength`: size of independently coded blocks.
    pub chunk_length: Option<usize>,
    /// `outputLength`: stop revealing once this many bytes are produced.
    pub output_length: Option<usize>,
    /// `finalSize`: exact length of the revealed executable.
    pub final_size: Option<usize>,
    /// `offset`: XOR key offset.
    pub offset: Option<u32>,
    /// `seed`: XOR key seed.
    pub seed: Option<u8>,
    /// `limit`: number of bytes the XOR cipher touches, 0 for all.
    pub limit: Option<usize>,
}

/// Parses a decimal or `0x`-prefixed hexadecimal integer.
fn parse_int<T: TryFrom<u64>>(name: &'static str, value: &str) -> Result<T, OptionError> {
    let invalid = || OptionError::InvalidValue { name, value: value.to_owned() };
    let trimmed = value.trim();
    let n = if let Some(hex) = trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16).map_err(|_| invalid())?
    } else {
        trimmed.parse::<u64>().map_err(|_| invalid())?
    };
    T::try_from(n).map_err(|_| invalid())
}

impl Options {
    /// Sets the option called `name` (using the camelCase names published in
    /// `Metadata`) from its string form.
    pub fn set(&mut self, name: &str, value: &str) -> Result<(), OptionError> {
        match name {
            "chunkLength" => self.chunk_length = Some(parse_int("chunkLength", value)?),
            "outputLength" => self.output_length = Some(parse_int("outputLength", value)?),
            "finalSize" => self.final_size = Some(parse_int("finalSize", value)?),
            "offset" => self.offset = Some(parse_int("offset", value)?),
            "seed" => self.seed = Some(parse_int("seed", value)?),
            "limit" => self.limit = Some(parse_int("limit", value)?),
            _ => return Err(OptionError::UnknownOption { name: name.to_owned() }),
        }
        Ok(())
    }

    /// Sets an option from a `NAME=VALUE` argument.
    pub fn set_pair(&mut self, arg: &str) -> Result<(), OptionError> {
        let (name, value) = arg.split_once('=')
            .ok_or_else(|| OptionError::MissingValue { arg: arg.to_owned() })?;
        self.set(name.trim(), value)
    }
}
