//! zlib compression of the plaintext payload.

use std::io::Write;

use flate2::{write::ZlibEncoder, Compression, Decompress, FlushDecompress, Status};
use zeroize::Zeroizing;

use tricrypt_common::{DecryptError, Error, Result};

const INFLATE_CHUNK: usize = 4096;

/// Compress `data` into a single zlib stream.
pub fn compress(data: &[u8], level: u32) -> Result<Zeroizing<Vec<u8>>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::new(level));
    encoder
        .write_all(data)
        .map_err(|e| Error::Compression(e.to_string()))?;
    let compressed = encoder
        .finish()
        .map_err(|e| Error::Compression(e.to_string()))?;
    Ok(Zeroizing::new(compressed))
}

/// Inflate a zlib stream produced by [`compress`].
///
/// The stream must be complete: input that ends before the zlib trailer is
/// rejected instead of yielding partial output.
pub fn decompress(data: &[u8]) -> std::result::Result<Zeroizing<Vec<u8>>, DecryptError> {
    let mut inflater = Decompress::new(true);
    let mut out = Zeroizing::new(Vec::with_capacity(data.len().saturating_mul(4)));

    loop {
        if out.capacity() - out.len() < INFLATE_CHUNK {
            out.reserve(INFLATE_CHUNK);
        }

        let (before_in, before_out) = (inflater.total_in(), inflater.total_out());
        let status = inflater
            .decompress_vec(&data[before_in as usize..], &mut out, FlushDecompress::None)
            .map_err(|e| DecryptError::Decompression(e.to_string()))?;

        if status == Status::StreamEnd {
            return Ok(out);
        }
        if inflater.total_in() == before_in && inflater.total_out() == before_out {
            return Err(DecryptError::Decompression(
                "truncated zlib stream".to_string(),
            ));
        }
    }
}
