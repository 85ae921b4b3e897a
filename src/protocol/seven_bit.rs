//! 7-bit transcoding of binary data
//!
//! SysEx bodies may only carry bytes below 0x80, so binary data travels in groups: every
//! run of up to seven bytes is preceded by one byte collecting their stripped high bits.

use super::{Error, Result};

/// Binary bytes per group
pub const GROUP_SIZE: usize = 7;

/// Encoded bytes per full group
pub const ENCODED_GROUP_SIZE: usize = GROUP_SIZE + 1;

/// Encode binary data for a 7-bit transport
///
/// # Format
///
/// ```text
/// binary:  [b0 b1 b2 b3 b4 b5 b6] [b7 b8 b9]
/// encoded: [H0 b0' .. b6']        [H1 b7' b8' b9']
/// ```
///
/// `bN'` is `bN & 0x7F`. For a group of `L` bytes, the high bit of group byte `j` lands in
/// bit `7 - L + j` of the leading byte, so a full group uses bits 0..=6 in order. The last
/// group may be shorter than seven bytes.
#[must_use]
pub fn encode(bin: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(encoded_len(bin.len()));

    for group in bin.chunks(GROUP_SIZE) {
        let len = group.len();
        let high = group
            .iter()
            .enumerate()
            .fold(0u8, |acc, (j, byte)| acc | ((byte & 0x80) >> (len - j)));

        out.push(high);
        out.extend(group.iter().map(|byte| byte & 0x7F));
    }

    out
}

/// Decode 7-bit transport data back to binary
///
/// Inverse of [`encode`]. Input is consumed in groups of up to eight bytes; a group of `K`
/// bytes yields `K - 1` binary bytes.
///
/// # Errors
///
/// Returns an error if:
/// - the final group holds only a high-bit byte and no data
/// - a byte has its top bit set
pub fn decode(sysex: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(decoded_len(sysex.len()));

    for (index, group) in sysex.chunks(ENCODED_GROUP_SIZE).enumerate() {
        let offset = index * ENCODED_GROUP_SIZE;

        if group.len() < 2 {
            return Err(Error::TruncatedGroup {
                offset,
                len: group.len(),
            });
        }

        if let Some(pos) = group.iter().position(|byte| byte & 0x80 != 0) {
            return Err(Error::NotSevenBit {
                offset: offset + pos,
                byte: group[pos],
            });
        }

        let high = group[0];
        let len = group.len();
        for (i, low) in group.iter().enumerate().skip(1) {
            out.push(low | ((high << (len - i)) & 0x80));
        }
    }

    Ok(out)
}

/// Encoded length of `len` binary bytes
#[must_use]
pub const fn encoded_len(len: usize) -> usize {
    len + len.div_ceil(GROUP_SIZE)
}

/// Binary length of `len` encoded bytes, assuming well-formed groups
#[must_use]
pub const fn decoded_len(len: usize) -> usize {
    len - len.div_ceil(ENCODED_GROUP_SIZE)
}
