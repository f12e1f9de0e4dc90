//! Compressed bitstring codec.
//!
//! Byte 0 holds bits 0-7 with bit 0 in the least significant position. `bit-vec` indexes
//! most significant bit first, so each byte is reversed at the boundary.

use std::io::{Read, Write};

use bit_vec::BitVec;
use ct_codecs::{Base64UrlSafeNoPadding, Decoder, Encoder};
use flate2::{bufread::GzDecoder, write::GzEncoder};
use thiserror::Error;

/// 16KB, the minimum list size recommended for herd privacy.
pub const MINIMUM_BITSTRING_SIZE: usize = 131072;

/// Upper bound on a decompressed list, 2^27 entries.
pub const MAX_DECODED_BYTES: usize = 16 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum BitstringError {
    #[error("Bitstring encoding error: `{0}`")]
    Base64Encoding(ct_codecs::Error),
    #[error("Bitstring decoding error: `{0}`")]
    Base64Decoding(ct_codecs::Error),
    #[error("Bitstring compression error: `{0}`")]
    Compression(std::io::Error),
    #[error("Bitstring decompression error: `{0}`")]
    Decompression(std::io::Error),
    #[error("Bitstring exceeds {0} bytes once decompressed")]
    TooLarge(usize),
}

/// Encodes the given states, padded to [`MINIMUM_BITSTRING_SIZE`].
pub fn encode_bitstring(input: Vec<bool>) -> Result<String, BitstringError> {
    let size = std::cmp::max(input.len(), MINIMUM_BITSTRING_SIZE);
    let mut bits = BitVec::from_elem(size, false);
    input.into_iter().enumerate().for_each(|(index, state)| {
        if state {
            bits.set(index, true)
        }
    });

    let bytes: Vec<u8> = bits.to_bytes().into_iter().map(u8::reverse_bits).collect();
    let compressed = gzip_compress(bytes).map_err(BitstringError::Compression)?;

    Base64UrlSafeNoPadding::encode_to_string(compressed).map_err(BitstringError::Base64Encoding)
}

/// Decodes a whole list. Trailing `=` padding is accepted.
pub fn decode_bitstring(input: &str) -> Result<BitVec, BitstringError> {
    let input = input.trim().trim_end_matches('=');
    let compressed = Base64UrlSafeNoPadding::decode_to_vec(input, None)
        .map_err(BitstringError::Base64Decoding)?;

    let bytes = gzip_decompress(&compressed, MAX_DECODED_BYTES)?;
    let bytes: Vec<u8> = bytes.into_iter().map(u8::reverse_bits).collect();

    Ok(BitVec::from_bytes(&bytes))
}

fn gzip_compress(input: Vec<u8>) -> Result<Vec<u8>, std::io::Error> {
    let mut encoder = GzEncoder::new(Vec::new(), Default::default());
    encoder.write_all(&input)?;
    encoder.finish()
}

fn gzip_decompress(input: &[u8], limit: usize) -> Result<Vec<u8>, BitstringError> {
    let mut decoder = GzDecoder::new(input).take(limit as u64 + 1);
    let mut result = Vec::new();
    decoder
        .read_to_end(&mut result)
        .map_err(BitstringError::Decompression)?;

    if result.len() > limit {
        return Err(BitstringError::TooLarge(limit));
    }
    Ok(result)
}
