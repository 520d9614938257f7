//! Gzip compressed NBT, the container used by schematic files.

use std::io::{
	Read,
	Write,
};

use flate2::{
	Compression,
	read::GzDecoder,
	write::GzEncoder,
};

use crate::{
	McResult,
	nbt::io::*,
};

/// Reads an NBT value from a gzip compressed stream.
pub fn read_compressed<R: Read, T: NbtRead>(reader: R) -> McResult<T> {
	let mut decoder = GzDecoder::new(reader);
	decoder.read_nbt()
}

/// Writes an NBT value to a gzip compressed stream.
/// Returns the number of uncompressed bytes written.
pub fn write_compressed<W: Write, T: NbtWrite + ?Sized>(writer: W, value: &T) -> McResult<usize> {
	let mut encoder = GzEncoder::new(writer, Compression::default());
	let size = encoder.write_nbt(value)?;
	encoder.finish()?;
	Ok(size)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{
		compound,
		nbt::NamedTag,
	};

	#[test]
	fn gzip_round_trip() {
		let root = NamedTag::new("Schematic", compound!{
			("Materials", "Alpha"),
			("Blocks", vec![0i8, 1, 2, 3]),
		});
		let mut buffer = Vec::new();
		let size = write_compressed(&mut buffer, &root).unwrap();
		assert!(size > 0);
		// gzip magic
		assert_eq!(&buffer[..2], &[0x1F, 0x8B]);
		let read: NamedTag = read_compressed(buffer.as_slice()).unwrap();
		assert_eq!(read, root);
	}

	#[test]
	fn uncompressed_input_is_rejected() {
		let bytes = vec![0x0A, 0x00, 0x00, 0x00];
		let result: McResult<NamedTag> = read_compressed(bytes.as_slice());
		assert!(result.is_err());
	}
}
