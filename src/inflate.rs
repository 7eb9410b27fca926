//! Contains the deflate codec for compressed array properties.

use std::io::{self, Read};

use flate2::{Decompress, FlushDecompress, Status};


/// Raw deflate decompressor, reusable across compressed buffers.
///
/// The state is reset each time it is bound to a new buffer, so one codec serves every
/// compressed property of a parse.
pub struct InflateCodec {
    state: Decompress,
}

impl InflateCodec {
    pub fn new() -> Self {
        InflateCodec {
            // The 2-byte zlib header is skipped by the caller.
            state: Decompress::new(false),
        }
    }

    /// Binds the codec to a raw deflate stream.
    pub fn bind<'a>(&'a mut self, input: &'a [u8]) -> InflateStream<'a> {
        self.state.reset(false);
        InflateStream {
            state: &mut self.state,
            input: input,
            finished: false,
        }
    }
}

impl Default for InflateCodec {
    fn default() -> Self {
        InflateCodec::new()
    }
}

/// Pull-style reader of decompressed bytes.
///
/// A single `read()` may return fewer bytes than requested; callers loop (e.g. with
/// `read_exact()`) until the destination is full.
pub struct InflateStream<'a> {
    state: &'a mut Decompress,
    input: &'a [u8],
    finished: bool,
}

impl<'a> Read for InflateStream<'a> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() || self.finished {
            return Ok(0);
        }
        loop {
            let in_before = self.state.total_in();
            let out_before = self.state.total_out();
            let status = self.state
                .decompress(self.input, buf, FlushDecompress::None)
                .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
            let consumed = (self.state.total_in() - in_before) as usize;
            let produced = (self.state.total_out() - out_before) as usize;
            self.input = &self.input[consumed..];

            if status == Status::StreamEnd {
                self.finished = true;
                return Ok(produced);
            }
            if produced > 0 {
                return Ok(produced);
            }
            if consumed == 0 {
                // No progress possible: the compressed data ended before the stream did.
                return Ok(0);
            }
        }
    }
}
