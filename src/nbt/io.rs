//! Binary (big-endian) NBT reading and writing.

use std::io::{Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use crate::{
	McError,
	McResult,
	nbt::{
		Map,
		tag::*,
	},
};

pub trait NbtRead: Sized {
	fn nbt_read<R: Read>(reader: &mut R) -> McResult<Self>;
}

/// Writes the payload of a value and returns the number of bytes written.
pub trait NbtWrite {
	fn nbt_write<W: Write>(&self, writer: &mut W) -> McResult<usize>;
}

pub trait ReadNbt {
	fn read_nbt<T: NbtRead>(&mut self) -> McResult<T>;
}

pub trait WriteNbt {
	fn write_nbt<T: NbtWrite + ?Sized>(&mut self, value: &T) -> McResult<usize>;
}

impl<R: Read> ReadNbt for R {
	fn read_nbt<T: NbtRead>(&mut self) -> McResult<T> {
		T::nbt_read(self)
	}
}

impl<W: Write> WriteNbt for W {
	fn write_nbt<T: NbtWrite + ?Sized>(&mut self, value: &T) -> McResult<usize> {
		value.nbt_write(self)
	}
}

impl NbtRead for i8 {
	fn nbt_read<R: Read>(reader: &mut R) -> McResult<Self> {
		Ok(reader.read_i8()?)
	}
}

impl NbtWrite for i8 {
	fn nbt_write<W: Write>(&self, writer: &mut W) -> McResult<usize> {
		writer.write_i8(*self)?;
		Ok(1)
	}
}

macro_rules! primitive_io {
	($($type:ty => $read:ident, $write:ident;)+) => {
		$(
			impl NbtRead for $type {
				fn nbt_read<R: Read>(reader: &mut R) -> McResult<Self> {
					Ok(reader.$read::<BigEndian>()?)
				}
			}

			impl NbtWrite for $type {
				fn nbt_write<W: Write>(&self, writer: &mut W) -> McResult<usize> {
					writer.$write::<BigEndian>(*self)?;
					Ok(std::mem::size_of::<$type>())
				}
			}
		)+
	};
}

primitive_io!(
	i16 => read_i16, write_i16;
	i32 => read_i32, write_i32;
	i64 => read_i64, write_i64;
	f32 => read_f32, write_f32;
	f64 => read_f64, write_f64;
);

/// Reads an i32 length prefix, rejecting negative lengths.
fn read_length<R: Read>(reader: &mut R) -> McResult<usize> {
	let length = reader.read_i32::<BigEndian>()?;
	usize::try_from(length).map_err(|_| McError::NbtDecodeError)
}

fn write_length<W: Write>(writer: &mut W, length: usize) -> McResult<usize> {
	let length = i32::try_from(length).map_err(|_| McError::NbtDecodeError)?;
	writer.write_i32::<BigEndian>(length)?;
	Ok(4)
}

// Strings are written as plain UTF-8. Java's modified UTF-8 only differs for
// NUL and characters outside of the BMP.
impl NbtRead for String {
	fn nbt_read<R: Read>(reader: &mut R) -> McResult<Self> {
		let length = reader.read_u16::<BigEndian>()? as usize;
		let mut buffer = vec![0u8; length];
		reader.read_exact(&mut buffer)?;
		Ok(String::from_utf8(buffer)?)
	}
}

impl NbtWrite for str {
	fn nbt_write<W: Write>(&self, writer: &mut W) -> McResult<usize> {
		let bytes = self.as_bytes();
		let length = u16::try_from(bytes.len())
			.map_err(|_| McError::StringTooLong(bytes.len()))?;
		writer.write_u16::<BigEndian>(length)?;
		writer.write_all(bytes)?;
		Ok(2 + bytes.len())
	}
}

impl NbtWrite for String {
	fn nbt_write<W: Write>(&self, writer: &mut W) -> McResult<usize> {
		self.as_str().nbt_write(writer)
	}
}

impl NbtRead for Vec<i8> {
	fn nbt_read<R: Read>(reader: &mut R) -> McResult<Self> {
		let length = read_length(reader)?;
		// Read through `take` so a corrupt length can't force a huge allocation up front.
		let mut bytes = Vec::new();
		reader.take(length as u64).read_to_end(&mut bytes)?;
		if bytes.len() != length {
			return Err(McError::NbtDecodeError);
		}
		Ok(bytemuck::cast_slice::<u8, i8>(&bytes).to_vec())
	}
}

impl NbtWrite for Vec<i8> {
	fn nbt_write<W: Write>(&self, writer: &mut W) -> McResult<usize> {
		write_length(writer, self.len())?;
		writer.write_all(bytemuck::cast_slice::<i8, u8>(self))?;
		Ok(4 + self.len())
	}
}

macro_rules! array_io {
	($($type:ty => $read:ident, $write:ident;)+) => {
		$(
			impl NbtRead for Vec<$type> {
				fn nbt_read<R: Read>(reader: &mut R) -> McResult<Self> {
					let length = read_length(reader)?;
					let mut values = Vec::with_capacity(length.min(4096));
					for _ in 0..length {
						values.push(reader.$read::<BigEndian>()?);
					}
					Ok(values)
				}
			}

			impl NbtWrite for Vec<$type> {
				fn nbt_write<W: Write>(&self, writer: &mut W) -> McResult<usize> {
					write_length(writer, self.len())?;
					for value in self.iter() {
						writer.$write::<BigEndian>(*value)?;
					}
					Ok(4 + self.len() * std::mem::size_of::<$type>())
				}
			}
		)+
	};
}

array_io!(
	i32 => read_i32, write_i32;
	i64 => read_i64, write_i64;
);

/// Deepest nesting of Lists and Compounds that will be read.
pub const MAX_DEPTH: usize = 512;

/// Reads the payload of a tag whose [TagID] has already been read.
pub fn read_payload<R: Read>(reader: &mut R, id: TagID) -> McResult<Tag> {
	read_nested_payload(reader, id, 0)
}

/// `depth` is the nesting level of the container holding the payload.
fn read_nested_payload<R: Read>(reader: &mut R, id: TagID, depth: usize) -> McResult<Tag> {
	Ok(match id {
		TagID::End => return Err(McError::NbtDecodeError),
		TagID::Byte => Tag::Byte(reader.read_nbt()?),
		TagID::Short => Tag::Short(reader.read_nbt()?),
		TagID::Int => Tag::Int(reader.read_nbt()?),
		TagID::Long => Tag::Long(reader.read_nbt()?),
		TagID::Float => Tag::Float(reader.read_nbt()?),
		TagID::Double => Tag::Double(reader.read_nbt()?),
		TagID::ByteArray => Tag::ByteArray(reader.read_nbt()?),
		TagID::String => Tag::String(reader.read_nbt()?),
		TagID::List => Tag::List(read_list(reader, depth + 1)?),
		TagID::Compound => Tag::Compound(read_compound(reader, depth + 1)?),
		TagID::IntArray => Tag::IntArray(reader.read_nbt()?),
		TagID::LongArray => Tag::LongArray(reader.read_nbt()?),
	})
}

fn read_list<R: Read>(reader: &mut R, depth: usize) -> McResult<ListTag> {
	if depth > MAX_DEPTH {
		return Err(McError::NbtDecodeError);
	}
	let id = TagID::try_from(reader.read_u8()?)?;
	let length = read_length(reader)?;
	macro_rules! read_elements {
		($variant:ident, $read:expr) => {
			ListTag::$variant(
				(0..length)
					.map(|_| $read)
					.collect::<McResult<Vec<_>>>()?
			)
		};
	}
	if length == 0 {
		return Ok(ListTag::Empty);
	}
	Ok(match id {
		// A non-empty list must declare an element type.
		TagID::End => return Err(McError::NbtDecodeError),
		TagID::Byte => read_elements!(Byte, reader.read_nbt()),
		TagID::Short => read_elements!(Short, reader.read_nbt()),
		TagID::Int => read_elements!(Int, reader.read_nbt()),
		TagID::Long => read_elements!(Long, reader.read_nbt()),
		TagID::Float => read_elements!(Float, reader.read_nbt()),
		TagID::Double => read_elements!(Double, reader.read_nbt()),
		TagID::ByteArray => read_elements!(ByteArray, reader.read_nbt()),
		TagID::String => read_elements!(String, reader.read_nbt()),
		TagID::List => read_elements!(List, read_list(reader, depth + 1)),
		TagID::Compound => read_elements!(Compound, read_compound(reader, depth + 1)),
		TagID::IntArray => read_elements!(IntArray, reader.read_nbt()),
		TagID::LongArray => read_elements!(LongArray, reader.read_nbt()),
	})
}

fn read_compound<R: Read>(reader: &mut R, depth: usize) -> McResult<Map> {
	if depth > MAX_DEPTH {
		return Err(McError::NbtDecodeError);
	}
	let mut map = Map::new();
	loop {
		let id = TagID::try_from(reader.read_u8()?)?;
		if id == TagID::End {
			break;
		}
		let name: String = reader.read_nbt()?;
		let tag = read_nested_payload(reader, id, depth)?;
		map.insert(name, tag);
	}
	Ok(map)
}

impl NbtRead for Tag {
	/// Reads a tag ID followed by that tag's payload.
	fn nbt_read<R: Read>(reader: &mut R) -> McResult<Self> {
		let id = TagID::try_from(reader.read_u8()?)?;
		read_payload(reader, id)
	}
}

impl NbtWrite for Tag {
	fn nbt_write<W: Write>(&self, writer: &mut W) -> McResult<usize> {
		match self {
			Tag::Byte(value) => value.nbt_write(writer),
			Tag::Short(value) => value.nbt_write(writer),
			Tag::Int(value) => value.nbt_write(writer),
			Tag::Long(value) => value.nbt_write(writer),
			Tag::Float(value) => value.nbt_write(writer),
			Tag::Double(value) => value.nbt_write(writer),
			Tag::ByteArray(value) => value.nbt_write(writer),
			Tag::String(value) => value.nbt_write(writer),
			Tag::List(value) => value.nbt_write(writer),
			Tag::Compound(value) => value.nbt_write(writer),
			Tag::IntArray(value) => value.nbt_write(writer),
			Tag::LongArray(value) => value.nbt_write(writer),
		}
	}
}

impl NbtRead for ListTag {
	fn nbt_read<R: Read>(reader: &mut R) -> McResult<Self> {
		read_list(reader, 1)
	}
}

impl NbtWrite for ListTag {
	fn nbt_write<W: Write>(&self, writer: &mut W) -> McResult<usize> {
		macro_rules! write_list {
			($list:expr) => {
				{
					let mut size = 1 + write_length(writer, $list.len())?;
					for item in $list.iter() {
						size += item.nbt_write(writer)?;
					}
					size
				}
			};
		}
		writer.write_u8(self.id() as u8)?;
		Ok(match self {
			ListTag::Empty => 1 + write_length(writer, 0)?,
			ListTag::Byte(list) => write_list!(list),
			ListTag::Short(list) => write_list!(list),
			ListTag::Int(list) => write_list!(list),
			ListTag::Long(list) => write_list!(list),
			ListTag::Float(list) => write_list!(list),
			ListTag::Double(list) => write_list!(list),
			ListTag::ByteArray(list) => write_list!(list),
			ListTag::String(list) => write_list!(list),
			ListTag::List(list) => write_list!(list),
			ListTag::Compound(list) => write_list!(list),
			ListTag::IntArray(list) => write_list!(list),
			ListTag::LongArray(list) => write_list!(list),
		})
	}
}

impl NbtRead for Map {
	fn nbt_read<R: Read>(reader: &mut R) -> McResult<Self> {
		read_compound(reader, 1)
	}
}

impl NbtWrite for Map {
	fn nbt_write<W: Write>(&self, writer: &mut W) -> McResult<usize> {
		let mut size = 0;
		for (name, tag) in self.iter() {
			writer.write_u8(tag.id() as u8)?;
			size += 1 + name.nbt_write(writer)? + tag.nbt_write(writer)?;
		}
		writer.write_u8(TagID::End as u8)?;
		Ok(size + 1)
	}
}

impl NbtRead for NamedTag {
	fn nbt_read<R: Read>(reader: &mut R) -> McResult<Self> {
		let id = TagID::try_from(reader.read_u8()?)?;
		if id == TagID::End {
			return Err(McError::NbtDecodeError);
		}
		let name: String = reader.read_nbt()?;
		let tag = read_payload(reader, id)?;
		Ok(NamedTag {
			name,
			tag,
		})
	}
}

impl NbtWrite for NamedTag {
	fn nbt_write<W: Write>(&self, writer: &mut W) -> McResult<usize> {
		writer.write_u8(self.tag.id() as u8)?;
		Ok(1 + self.name.nbt_write(writer)? + self.tag.nbt_write(writer)?)
	}
}
