//! Block splitting for encoders whose output is decoded in fixed-size pieces.

/// Encodes each consecutive `length`-byte block of `content` with
/// `encode_block` and concatenates the results. The last block may be
/// shorter. A `length` of 0 makes all of `content` one block.
pub fn obscure_chunked<F>(content: &[u8], length: usize, mut encode_block: F) -> Vec<u8>
where
    F: FnMut(&[u8]) -> Vec<u8>,
{
    if length == 0 {
        return encode_block(content);
    }
    content.chunks(length)
        .flat_map(|block| encode_block(block))
        .collect()
}
