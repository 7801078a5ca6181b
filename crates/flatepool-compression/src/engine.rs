//! Resettable raw DEFLATE engines
//!
//! A [`Compressor`] or [`Decompressor`] owns the expensive codec state and is
//! meant to live in a pool. Each use starts with `attach`, which resets the
//! state and binds it to a sink or source for the duration of one borrow.
//! Once the returned [`Encoder`] or [`Decoder`] is dropped the engine holds no
//! reference to caller memory.

use flate2::{Compress, Compression, Decompress, FlushCompress, FlushDecompress, Status};
use flatepool_types::CompressionLevel;
use std::fmt;
use std::io::{self, Read, Write};

/// Free space guaranteed in the sink before each deflate call
const MIN_OUTPUT_SPACE: usize = 4 * 1024;

/// Reusable raw DEFLATE compressor with a fixed level
pub struct Compressor {
    raw: Compress,
    level: CompressionLevel,
}

impl Compressor {
    /// Create a compressor for `level`
    pub fn new(level: CompressionLevel) -> Self {
        Self {
            raw: Compress::new(Compression::new(level.get()), false),
            level,
        }
    }

    /// Level this compressor was built with
    pub fn level(&self) -> CompressionLevel {
        self.level
    }

    /// Reset the compressor and direct its output into `sink`
    ///
    /// Compressed bytes are appended after any existing contents of `sink`.
    pub fn attach<'a>(&'a mut self, sink: &'a mut Vec<u8>) -> Encoder<'a> {
        self.raw.reset();
        Encoder {
            raw: &mut self.raw,
            sink,
        }
    }
}

impl fmt::Debug for Compressor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Compressor")
            .field("level", &self.level)
            .finish_non_exhaustive()
    }
}

/// A [`Compressor`] bound to an output buffer
///
/// Data written is compressed into the sink. [`Write::flush`] emits a sync
/// point and [`Encoder::finish`] terminates the stream.
pub struct Encoder<'a> {
    raw: &'a mut Compress,
    sink: &'a mut Vec<u8>,
}

impl Encoder<'_> {
    /// Write the final block and end the stream
    pub fn finish(mut self) -> io::Result<()> {
        loop {
            self.reserve();
            let before = self.raw.total_out();
            let status = self
                .raw
                .compress_vec(&[], self.sink, FlushCompress::Finish)
                .map_err(io::Error::other)?;

            if status == Status::StreamEnd {
                return Ok(());
            }
            if self.raw.total_out() == before {
                return Err(io::Error::new(
                    io::ErrorKind::WriteZero,
                    "deflate stream could not be finished",
                ));
            }
        }
    }

    /// Bytes written to the sink by this encoder so far
    pub fn total_out(&self) -> u64 {
        self.raw.total_out()
    }

    fn reserve(&mut self) -> usize {
        if self.sink.capacity() - self.sink.len() < MIN_OUTPUT_SPACE {
            self.sink.reserve(MIN_OUTPUT_SPACE);
        }
        self.sink.capacity() - self.sink.len()
    }

    /// Run one deflate call, returning `(consumed, produced)`
    fn step(&mut self, input: &[u8], flush: FlushCompress) -> io::Result<(usize, usize)> {
        let before_in = self.raw.total_in();
        let before_out = self.raw.total_out();
        self.raw
            .compress_vec(input, self.sink, flush)
            .map_err(io::Error::other)?;
        let consumed = (self.raw.total_in() - before_in) as usize;
        let produced = (self.raw.total_out() - before_out) as usize;
        Ok((consumed, produced))
    }
}

impl Write for Encoder<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        loop {
            self.reserve();
            let (consumed, produced) = self.step(buf, FlushCompress::None)?;
            if consumed > 0 {
                return Ok(consumed);
            }
            if produced == 0 {
                return Err(io::Error::new(
                    io::ErrorKind::WriteZero,
                    "deflate accepted no input",
                ));
            }
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        loop {
            let spare = self.reserve();
            let (_, produced) = self.step(&[], FlushCompress::Sync)?;
            if produced < spare {
                return Ok(());
            }
        }
    }
}

impl fmt::Debug for Encoder<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Encoder")
            .field("total_in", &self.raw.total_in())
            .field("total_out", &self.raw.total_out())
            .finish_non_exhaustive()
    }
}

/// Reusable raw DEFLATE decompressor
pub struct Decompressor {
    raw: Decompress,
}

impl Decompressor {
    /// Create a decompressor
    pub fn new() -> Self {
        Self {
            raw: Decompress::new(false),
        }
    }

    /// Reset the decompressor and bind it to `source`
    ///
    /// Raw DEFLATE has no header, so binding never fails; malformed input
    /// is reported by the first read that reaches it.
    pub fn attach<'a>(&'a mut self, source: &'a [u8]) -> Decoder<'a> {
        self.raw.reset(false);
        Decoder {
            raw: &mut self.raw,
            input: source,
            finished: false,
        }
    }
}

impl Default for Decompressor {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Decompressor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Decompressor").finish_non_exhaustive()
    }
}

/// A [`Decompressor`] bound to its compressed input
///
/// Reading yields decompressed bytes until the end-of-stream marker. A source
/// that runs out before the marker fails with [`io::ErrorKind::UnexpectedEof`];
/// corrupt data fails with [`io::ErrorKind::InvalidData`].
pub struct Decoder<'a> {
    raw: &'a mut Decompress,
    input: &'a [u8],
    finished: bool,
}

impl Decoder<'_> {
    /// Whether the end-of-stream marker has been decoded
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Input not yet consumed by the decoder
    ///
    /// After the stream finished this is whatever followed the final block.
    pub fn remaining_input(&self) -> &[u8] {
        self.input
    }
}

impl Read for Decoder<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.finished || buf.is_empty() {
            return Ok(0);
        }

        loop {
            let before_in = self.raw.total_in();
            let before_out = self.raw.total_out();
            let status = self
                .raw
                .decompress(self.input, buf, FlushDecompress::None)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
            let consumed = (self.raw.total_in() - before_in) as usize;
            let produced = (self.raw.total_out() - before_out) as usize;
            self.input = &self.input[consumed..];

            if status == Status::StreamEnd {
                self.finished = true;
                return Ok(produced);
            }
            if produced > 0 {
                return Ok(produced);
            }
            if self.input.is_empty() {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "deflate stream ended before its final block",
                ));
            }
            if consumed == 0 {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    "deflate stream made no progress",
                ));
            }
        }
    }
}

impl fmt::Debug for Decoder<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Decoder")
            .field("remaining_input", &self.input.len())
            .field("finished", &self.finished)
            .finish_non_exhaustive()
    }
}
