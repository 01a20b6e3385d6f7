//! gamecomp reveals and obscures the compression and encryption layers of
//! DOS-era game files and executables.
//!
//! # Obscuring
//!
//! ```sh
//! gamecomp cmp-carmackize map.bin map.cmp
//! ```
//!
//! # Revealing
//!
//! ```sh
//! gamecomp -d cmp-lzexe packed.exe unpacked.exe
//! gamecomp -d -o outputLength=8192 cmp-rle-id level.rle level.bin
//! ```
//!
//! # Identifying
//!
//! ```sh
//! gamecomp --identify cmp-lzexe program.exe
//! ```
//!
//! # Exit status
//!
//! Exit status is 0 if there was no error, or 1 if there was any kind of error
//! (usage error, I/O error, or format error). With `--identify`, exit status is
//! 1 also when the file is not in the given format.

use std::ffi::OsString;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process;

use thiserror::Error;
use tracing::debug;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use gamecomp::{Codec, Options};

/// An error that may occur while transforming a file.
#[derive(Debug, Error)]
enum Error {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Codec(#[from] gamecomp::Error),
}

/// An `Error` annotated with a `Path`.
#[derive(Debug)]
struct PathError {
    path: Option<PathBuf>,
    err: Error,
}

impl PathError {
    fn new<P: AsRef<Path>>(path: P, err: Error) -> Self {
        let path = path.as_ref().to_owned();
        Self { path: Some(path), err }
    }
}

impl std::error::Error for PathError {}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PathError { path: None, err } => err.fmt(f),
            PathError { path: Some(path), err } => write!(f, "{}: {}", path.display(), err),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Reveal,
    Obscure,
}

/// Reads `input_path`, runs `codec` on it in the given direction, and writes
/// the result to `output_path`.
fn process<P, Q>(
    input_path: P, output_path: Q,
    codec: Codec, direction: Direction, options: &Options,
) -> Result<(), PathError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    // Read and transform the input. Any error here gets annotated with
    // input_path.
    let output = (|| -> Result<_, Error> {
        let input = fs::read(&input_path)?;
        let output = match direction {
            Direction::Reveal => codec.reveal(&input, options)?,
            Direction::Obscure => codec.obscure(&input, options)?,
        };
        debug!("{:?} {}: {} bytes in, {} bytes out", direction, codec, input.len(), output.len());
        Ok(output)
    })()
        .map_err(|err| PathError::new(&input_path, err))?;

    // Save the output. Any error here gets annotated with output_path.
    fs::write(&output_path, &output)
        .map_err(|err| PathError::new(&output_path, err.into()))?;

    Ok(())
}

/// Prints whether `input_path` is in the format of `codec`. Returns the
/// verdict.
fn identify<P: AsRef<Path>>(input_path: P, codec: Codec) -> Result<bool, PathError> {
    let input = fs::read(&input_path)
        .map_err(|err| PathError::new(&input_path, err.into()))?;
    match codec.identify(&input) {
        Some(identification) => {
            println!("{}: {}", input_path.as_ref().display(), identification);
            Ok(identification.valid)
        }
        None => {
            eprintln!("{}: {} has no way to identify files", input_path.as_ref().display(), codec);
            Ok(false)
        }
    }
}

fn list() {
    for codec in Codec::ALL.iter() {
        let metadata = codec.metadata();
        println!("{:<16}{}", metadata.id, metadata.title);
        for (name, description) in metadata.options.iter() {
            println!("    -o {}=...: {}", name, description);
        }
    }
}

const USAGE: &str = "\
Usage: gamecomp [OPTION]... FORMAT INPUT OUTPUT
       gamecomp --identify FORMAT INPUT
       gamecomp --list
Obscure (compress or encrypt) INPUT in the given FORMAT, or reveal it with -d.

Options:
    -d, --reveal        reveal (decompress or decrypt) instead of obscuring
    -o, --option NAME=VALUE
                        set a format option; may be repeated
        --identify      check whether INPUT is in FORMAT
        --list          list the supported formats and their options
        --debug         show debugging output
    -h, --help          show this help
";

#[derive(Debug)]
struct Args {
    direction: Direction,
    options: Options,
    identify: bool,
    list: bool,
    debug: bool,
    help: bool,
    free: Vec<OsString>,
}

fn parse_args() -> Result<Args, lexopt::Error> {
    use lexopt::prelude::*;

    let mut args = Args {
        direction: Direction::Obscure,
        options: Options::default(),
        identify: false,
        list: false,
        debug: false,
        help: false,
        free: Vec::new(),
    };
    let mut parser = lexopt::Parser::from_env();
    while let Some(arg) = parser.next()? {
        match arg {
            Short('d') | Long("reveal") => args.direction = Direction::Reveal,
            Short('o') | Long("option") => {
                let value = parser.value()?.string()?;
                args.options.set_pair(&value)
                    .map_err(|err| lexopt::Error::Custom(Box::new(err)))?;
            }
            Long("identify") => args.identify = true,
            Long("list") => args.list = true,
            Long("debug") => args.debug = true,
            Short('h') | Long("help") => args.help = true,
            Value(value) => args.free.push(value),
            _ => return Err(arg.unexpected()),
        }
    }
    Ok(args)
}

fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::builder()
            .with_default_directive(LevelFilter::WARN.into())
            .from_env_lossy()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Looks up the FORMAT argument.
fn codec_arg(arg: &OsString) -> Result<Codec, String> {
    let id = arg.to_string_lossy();
    Codec::from_id(&id).ok_or_else(|| format!("unknown format {:?}; see --list", id))
}

fn exit_usage(msg: &str) -> ! {
    eprint!("{}", USAGE);
    eprintln!("\n{}", msg);
    process::exit(1);
}

fn main() {
    let args = match parse_args() {
        Ok(args) => args,
        Err(err) => {
            eprintln!("{}", err);
            process::exit(1);
        }
    };

    if args.help {
        print!("{}", USAGE);
        return;
    }

    init_logging(args.debug);

    if args.list {
        list();
        return;
    }

    if args.identify {
        if args.free.len() != 2 {
            exit_usage("Need FORMAT and INPUT arguments");
        }
        let codec = codec_arg(&args.free[0]).unwrap_or_else(|msg| exit_usage(&msg));
        match identify(&args.free[1], codec) {
            Ok(true) => (),
            Ok(false) => process::exit(1),
            Err(err) => {
                eprintln!("{}", err);
                process::exit(1);
            }
        }
        return;
    }

    if args.free.len() != 3 {
        exit_usage("Need FORMAT, INPUT, and OUTPUT arguments");
    }
    let codec = codec_arg(&args.free[0]).unwrap_or_else(|msg| exit_usage(&msg));
    let input_path = &args.free[1];
    let output_path = &args.free[2];

    if let Err(err) = process(input_path, output_path, codec, args.direction, &args.options) {
        eprintln!("{}", err);
        process::exit(1);
    }
}
