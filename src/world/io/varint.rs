//! Variable length integers as used by the `BlockData` stream: 7 bits per byte,
//! least significant group first, high bit set while more bytes follow.

use crate::{McError, McResult};

/// The most bytes a 32-bit value can take.
pub const MAX_VARINT_LEN: usize = 5;

/// Appends the encoding of `value` and returns the number of bytes written.
pub fn encode(mut value: u32, buffer: &mut Vec<u8>) -> usize {
	let mut written = 0;
	loop {
		let byte = (value & 0x7F) as u8;
		value >>= 7;
		written += 1;
		if value == 0 {
			buffer.push(byte);
			return written;
		}
		buffer.push(byte | 0x80);
	}
}

/// Number of bytes [encode] writes for `value`.
pub const fn encoded_len(value: u32) -> usize {
	match value {
		0..=0x7F => 1,
		0x80..=0x3FFF => 2,
		0x4000..=0x1F_FFFF => 3,
		0x20_0000..=0xFFF_FFFF => 4,
		_ => 5,
	}
}

/// Decodes the value starting at `offset`.
/// Returns the value and the offset of the byte after it.
pub fn decode(bytes: &[u8], offset: usize) -> McResult<(u32, usize)> {
	let mut value = 0u64;
	for i in 0..MAX_VARINT_LEN {
		let position = offset + i;
		let byte = *bytes.get(position).ok_or(McError::CorruptStream {
			offset: position,
			reason: "stream ended inside a value",
		})?;
		value |= ((byte & 0x7F) as u64) << (7 * i);
		if byte & 0x80 == 0 {
			let value = u32::try_from(value).map_err(|_| McError::CorruptStream {
				offset,
				reason: "value does not fit in 32 bits",
			})?;
			return Ok((value, position + 1));
		}
	}
	Err(McError::CorruptStream {
		offset,
		reason: "value is longer than 5 bytes",
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::{Rng, SeedableRng, rngs::StdRng};

	#[test]
	fn round_trip() {
		let mut rng = StdRng::seed_from_u64(0x5C4E);
		let boundaries = [0, 1, 0x7F, 0x80, 0x3FFF, 0x4000, 0x1F_FFFF, 0x20_0000, 0xFFF_FFFF, 0x1000_0000, u32::MAX];
		let values = boundaries.into_iter()
			.chain((0..1000).map(|_| rng.gen::<u32>()));
		for value in values {
			let mut buffer = Vec::new();
			let written = encode(value, &mut buffer);
			assert_eq!(written, buffer.len());
			assert_eq!(written, encoded_len(value));
			assert!(written <= MAX_VARINT_LEN);
			assert_eq!(decode(&buffer, 0).unwrap(), (value, written));
		}
	}

	#[test]
	fn known_encodings() {
		let mut buffer = Vec::new();
		encode(300, &mut buffer);
		assert_eq!(buffer, vec![0xAC, 0x02]);
		buffer.clear();
		encode(u32::MAX, &mut buffer);
		assert_eq!(buffer, vec![0xFF, 0xFF, 0xFF, 0xFF, 0x0F]);
	}

	#[test]
	fn stops_at_terminator() {
		let bytes = [0x05, 0xAC, 0x02, 0x7F];
		let (first, next) = decode(&bytes, 0).unwrap();
		assert_eq!((first, next), (5, 1));
		let (second, next) = decode(&bytes, next).unwrap();
		assert_eq!((second, next), (300, 3));
		assert_eq!(decode(&bytes, next).unwrap(), (0x7F, 4));
	}

	#[test]
	fn unterminated_value_is_corrupt() {
		let bytes = [0x80; 5];
		assert!(matches!(decode(&bytes, 0), Err(McError::CorruptStream { offset: 0, .. })));
		let bytes = [0x80, 0x80, 0x80, 0x80, 0x80, 0x01];
		assert!(matches!(decode(&bytes, 0), Err(McError::CorruptStream { offset: 0, .. })));
	}

	#[test]
	fn oversize_value_is_corrupt() {
		let bytes = [0xFF, 0xFF, 0xFF, 0xFF, 0x1F];
		assert!(matches!(decode(&bytes, 0), Err(McError::CorruptStream { .. })));
	}

	#[test]
	fn truncated_value_is_corrupt() {
		let bytes = [0x01, 0xAC];
		assert!(matches!(decode(&bytes, 1), Err(McError::CorruptStream { offset: 2, .. })));
		assert!(matches!(decode(&bytes, 2), Err(McError::CorruptStream { offset: 2, .. })));
	}
}
