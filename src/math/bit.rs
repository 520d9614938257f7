//! Module for bit level manipulation.

/// Access to 4-bit values packed two to a byte.
/// Even indices are stored in the low nibble, odd indices in the high nibble.
pub trait Nibbles {
	fn get_nibble(&self, index: usize) -> u8;
	fn set_nibble(&mut self, index: usize, value: u8);
}

impl Nibbles for [u8] {
	fn get_nibble(&self, index: usize) -> u8 {
		let byte = self[index >> 1];
		if index & 1 == 0 {
			byte & 0xF
		} else {
			byte >> 4
		}
	}

	fn set_nibble(&mut self, index: usize, value: u8) {
		let byte = &mut self[index >> 1];
		let value = value & 0xF;
		if index & 1 == 0 {
			*byte = (*byte & 0xF0) | value;
		} else {
			*byte = (*byte & 0x0F) | (value << 4);
		}
	}
}

/// Number of bytes needed to hold `count` nibbles.
pub const fn nibble_len(count: usize) -> usize {
	count / 2 + count % 2
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn nibble_packing() {
		let mut nibbles = vec![0u8; nibble_len(3)];
		assert_eq!(nibbles.len(), 2);
		nibbles.set_nibble(0, 0x3);
		nibbles.set_nibble(1, 0xA);
		nibbles.set_nibble(2, 0x1F);
		assert_eq!(nibbles, vec![0xA3, 0x0F]);
		assert_eq!(nibbles.get_nibble(0), 0x3);
		assert_eq!(nibbles.get_nibble(1), 0xA);
		assert_eq!(nibbles.get_nibble(2), 0xF);
		nibbles.set_nibble(1, 0);
		assert_eq!(nibbles[0], 0x03);
		assert_eq!(nibble_len(0), 0);
		assert_eq!(nibble_len(4), 2);
	}
}
