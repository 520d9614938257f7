//! Named-field access to a structured document.
//!
//! The schematic codecs only need to get and set named fields, so they are
//! written against [DataView] and [DataViewMut] rather than a concrete container.

use crate::{
	McError,
	McResult,
	nbt::{
		Map,
		tag::Tag,
		tagtype::*,
	},
};

/// Typed getter: `Ok(None)` when the field is absent, [McError::InvalidField]
/// when it is present with another type.
macro_rules! typed_getters {
	($($name:ident($variant:ident) -> $type:ty;)+) => {
		$(
			fn $name(&self, key: &str) -> McResult<Option<$type>> {
				match self.get_tag(key) {
					None => Ok(None),
					Some(Tag::$variant(value)) => Ok(Some(value)),
					Some(_) => Err(McError::InvalidField {
						field: key.to_owned(),
						expected: <$variant as TypeId>::tag_id(),
					}),
				}
			}
		)+
	};
}

pub trait DataView {
	fn get_tag(&self, key: &str) -> Option<&Tag>;
	fn keys(&self) -> Vec<&str>;

	fn contains_key(&self, key: &str) -> bool {
		self.get_tag(key).is_some()
	}

	fn get_byte(&self, key: &str) -> McResult<Option<Byte>> {
		Ok(self.get_byte_ref(key)?.copied())
	}

	fn get_short(&self, key: &str) -> McResult<Option<Short>> {
		Ok(self.get_short_ref(key)?.copied())
	}

	/// Reads an Int. Byte and Short tags are widened.
	fn get_int(&self, key: &str) -> McResult<Option<Int>> {
		match self.get_tag(key) {
			None => Ok(None),
			Some(Tag::Byte(value)) => Ok(Some(*value as Int)),
			Some(Tag::Short(value)) => Ok(Some(*value as Int)),
			Some(Tag::Int(value)) => Ok(Some(*value)),
			Some(_) => Err(McError::InvalidField {
				field: key.to_owned(),
				expected: Int::tag_id(),
			}),
		}
	}

	fn get_string(&self, key: &str) -> McResult<Option<&str>> {
		Ok(self.get_string_ref(key)?.map(String::as_str))
	}

	/// Reads a ByteArray as unsigned bytes.
	fn get_byte_array(&self, key: &str) -> McResult<Option<&[u8]>> {
		Ok(self.get_byte_array_ref(key)?.map(|bytes| bytemuck::cast_slice::<i8, u8>(bytes)))
	}

	fn get_int_array(&self, key: &str) -> McResult<Option<&[i32]>> {
		Ok(self.get_int_array_ref(key)?.map(Vec::as_slice))
	}

	fn get_view(&self, key: &str) -> McResult<Option<&Map>> {
		self.get_compound_ref(key)
	}

	typed_getters!{
		get_byte_ref(Byte) -> &Byte;
		get_short_ref(Short) -> &Short;
		get_string_ref(String) -> &String;
		get_byte_array_ref(ByteArray) -> &ByteArray;
		get_int_array_ref(IntArray) -> &IntArray;
		get_compound_ref(Compound) -> &Compound;
	}
}

pub trait DataViewMut: DataView {
	fn set<T: Into<Tag>>(&mut self, key: &str, value: T);

	/// Writes unsigned bytes as a ByteArray.
	fn set_byte_array(&mut self, key: &str, bytes: &[u8]) {
		self.set(key, bytemuck::cast_slice::<u8, i8>(bytes).to_vec());
	}
}

impl DataView for Map {
	fn get_tag(&self, key: &str) -> Option<&Tag> {
		self.get(key)
	}

	fn keys(&self) -> Vec<&str> {
		Map::keys(self).map(String::as_str).collect()
	}
}

impl DataViewMut for Map {
	fn set<T: Into<Tag>>(&mut self, key: &str, value: T) {
		self.insert(key.to_owned(), value.into());
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::nbt::tag::TagID;

	#[test]
	fn typed_access() {
		let mut map = Map::new();
		map.set("Width", 7i16);
		map.set("Materials", "Alpha");
		map.set_byte_array("Blocks", &[0, 1, 255]);
		assert_eq!(map.get_short("Width").unwrap(), Some(7));
		assert_eq!(map.get_int("Width").unwrap(), Some(7));
		assert_eq!(map.get_string("Materials").unwrap(), Some("Alpha"));
		assert_eq!(map.get_byte_array("Blocks").unwrap(), Some(&[0u8, 1, 255][..]));
		assert_eq!(map.get_int("Missing").unwrap(), None);
		assert!(map.contains_key("Blocks"));
		let mut keys = DataView::keys(&map);
		keys.sort();
		assert_eq!(keys, vec!["Blocks", "Materials", "Width"]);
	}

	#[test]
	fn wrong_type_is_an_error() {
		let mut map = Map::new();
		map.set("Version", "one");
		match map.get_int("Version") {
			Err(McError::InvalidField { field, expected }) => {
				assert_eq!(field, "Version");
				assert_eq!(expected, TagID::Int);
			},
			other => panic!("Unexpected result: {other:?}"),
		}
		assert!(map.get_view("Version").is_err());
	}
}
