//! Raw bloom membership.
//!
//! A logs bloom is a 2048-bit vector stored big-endian: bit `i` lives in
//! byte `255 - i / 8` at offset `i % 8`. Three 11-bit positions are read
//! directly from the first six bytes of the tested value.
//!
//! Note that the canonical Ethereum construction hashes the value with
//! keccak-256 before deriving positions. The functions here deliberately
//! index the raw bytes, so a correctly built bloom does not necessarily
//! report its own addresses as members. Callers treat the result as a
//! diagnostic signal, never as a verdict.

use ethers_core::types::Bloom;

use crate::error::{CoreError, Result};

/// Size of a logs bloom in bytes.
pub const BLOOM_BYTES: usize = 256;

/// Number of bytes a value needs before positions can be derived.
pub const MIN_VALUE_BYTES: usize = 6;

/// Derive the three bit positions (each in `0..2048`) for `value`.
///
/// Returns `None` when `value` is shorter than [`MIN_VALUE_BYTES`].
pub fn bit_positions(value: &[u8]) -> Option<[usize; 3]> {
    if value.len() < MIN_VALUE_BYTES {
        return None;
    }

    let mut positions = [0usize; 3];
    for (i, pos) in positions.iter_mut().enumerate() {
        let high = (value[i * 2] & 0x07) as usize;
        let low = value[i * 2 + 1] as usize;
        *pos = (high << 8) | low;
    }
    Some(positions)
}

/// Locate the byte index and mask for a bit position.
///
/// `None` if the position falls outside the filter.
fn locate(position: usize) -> Option<(usize, u8)> {
    let byte_index = (BLOOM_BYTES - 1).checked_sub(position / 8)?;
    Some((byte_index, 1u8 << (position % 8)))
}

/// Test whether all three positions derived from `value` are set in `bloom`.
///
/// Values shorter than six bytes are never members.
pub fn is_member(bloom: &Bloom, value: &[u8]) -> bool {
    let Some(positions) = bit_positions(value) else {
        return false;
    };

    let bytes = bloom.as_bytes();
    positions.iter().all(|&pos| match locate(pos) {
        Some((byte_index, mask)) => bytes
            .get(byte_index)
            .map(|b| b & mask != 0)
            .unwrap_or(false),
        None => false,
    })
}

/// Hex-string variant of [`is_member`].
///
/// The `0x` prefix is optional. A string that does not decode is treated
/// as "not a member".
pub fn is_member_hex(bloom: &Bloom, value: &str) -> bool {
    match decode_hex(value) {
        Ok(bytes) => is_member(bloom, &bytes),
        Err(_) => false,
    }
}

/// Set the three positions derived from `value` in `bloom`.
///
/// Returns `false` (leaving the bloom untouched) if the value is too short.
pub fn accrue_raw(bloom: &mut Bloom, value: &[u8]) -> bool {
    let Some(positions) = bit_positions(value) else {
        return false;
    };

    for pos in positions {
        if let Some((byte_index, mask)) = locate(pos) {
            bloom.0[byte_index] |= mask;
        }
    }
    true
}

/// Clear a single bit position in `bloom`.
pub fn clear_bit(bloom: &mut Bloom, position: usize) {
    if let Some((byte_index, mask)) = locate(position) {
        bloom.0[byte_index] &= !mask;
    }
}

/// Whether the first `nibbles` hex characters of the bloom are all zero.
///
/// Characters are counted the way the bloom is rendered on the wire:
/// most significant nibble of byte 0 first.
pub fn prefix_is_zero(bloom: &Bloom, nibbles: usize) -> bool {
    let nibbles = nibbles.min(BLOOM_BYTES * 2);
    let bytes = bloom.as_bytes();

    let full = nibbles / 2;
    if bytes[..full].iter().any(|b| *b != 0) {
        return false;
    }
    if nibbles % 2 == 1 && bytes[full] & 0xF0 != 0 {
        return false;
    }
    true
}

fn decode_hex(value: &str) -> Result<Vec<u8>> {
    let trimmed = value.strip_prefix("0x").unwrap_or(value);
    hex::decode(trimmed).map_err(|e| CoreError::InvalidHex {
        value: value.to_string(),
        reason: e.to_string(),
    })
}
