//! Line filter built on a witness memory.
//!
//! Inputs are read in order, line by line; each line (without its `\n` or
//! `\r\n` terminator) is witnessed once and forwarded to the output
//! depending on [`Mode`].

use crate::error::Result;
use crate::witness::Witness;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// Path that stands for standard input.
pub const STDIN_PATH: &str = "-";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Forward the first occurrence of each line, drop repeats.
    #[default]
    Unique,
    /// Forward only lines seen before.
    Duplicates,
}

impl Mode {
    fn forwards(self, seen: bool) -> bool {
        match self {
            Mode::Unique => !seen,
            Mode::Duplicates => seen,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamStats {
    pub lines_read: u64,
    pub lines_written: u64,
}

/// Witness every line of `inputs`, in order, writing forwarded lines to `out`.
pub fn process<W, O, I, R>(
    witness: &W,
    mode: Mode,
    out: &mut O,
    inputs: I,
) -> Result<StreamStats>
where
    W: Witness + ?Sized,
    O: Write + ?Sized,
    I: IntoIterator<Item = R>,
    R: BufRead,
{
    let mut stats = StreamStats::default();
    let mut line = Vec::new();

    for mut input in inputs {
        loop {
            line.clear();
            if input.read_until(b'\n', &mut line)? == 0 {
                break;
            }
            let record = line.strip_suffix(b"\n").unwrap_or(&line[..]);
            let record = record.strip_suffix(b"\r").unwrap_or(record);

            stats.lines_read += 1;
            if mode.forwards(witness.witness(record)) {
                out.write_all(record)?;
                out.write_all(b"\n")?;
                stats.lines_written += 1;
            }
        }
    }

    out.flush()?;
    debug!(
        lines_read = stats.lines_read,
        lines_written = stats.lines_written,
        ?mode,
        "stream processed"
    );
    Ok(stats)
}

/// Open every path for reading; `-` is standard input and may appear more
/// than once. Fails on the first path that cannot be opened.
pub fn open_inputs<P: AsRef<Path>>(
    paths: &[P],
) -> Result<Vec<Box<dyn BufRead>>> {
    paths
        .iter()
        .map(|path| {
            let path = path.as_ref();
            let reader: Box<dyn BufRead> = if path == Path::new(STDIN_PATH) {
                // locked per read, a held lock would block a repeated `-`
                Box::new(BufReader::new(io::stdin()))
            } else {
                Box::new(BufReader::new(File::open(path)?))
            };
            Ok(reader)
        })
        .collect()
}

/// Create (or truncate) `path` for writing, standard output if `None`.
pub fn open_output<P: AsRef<Path>>(path: Option<P>) -> Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    })
}

/// [`open_inputs`] and [`open_output`] followed by [`process`].
pub fn process_paths<W, P, Q>(
    witness: &W,
    mode: Mode,
    output: Option<Q>,
    inputs: &[P],
) -> Result<StreamStats>
where
    W: Witness + ?Sized,
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let readers = open_inputs(inputs)?;
    let mut writer = open_output(output)?;
    process(witness, mode, &mut writer, readers)
}
