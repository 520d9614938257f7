use std::fmt::Display;
use std::str::FromStr;

use chumsky::prelude::*;
use sorted_vec::SortedVec;

use crate::{McError, McResult};

/// Create a [BlockState].
///
/// Syntax:
/// ```no_run,rust
/// # use mcschem::blockstate;
/// blockstate!(air);
/// // Becomes
/// // BlockState::new("minecraft:air", BlockProperties::none())
///
/// blockstate!(namespace:tile[prop1="string_literal", prop2=identifier, prop3=10]);
/// // Becomes
/// // BlockState::new("namespace:tile", BlockProperties::from([
/// // 	("prop1".to_owned(), "string_literal".to_owned()),
/// // 	("prop2".to_owned(), "identifier".to_owned()),
/// // 	("prop3".to_owned(), "10".to_owned())
/// // ]))
/// ```
#[macro_export]
macro_rules! blockstate {
	($id:ident) => {
		// We assume 'minecraft' namespace by default.
		$crate::blockstate!(minecraft:$id)
	};
	($id:ident [ $($name:tt = $value:tt),+$(,)? ]) => {
		$crate::blockstate!(minecraft:$id[ $($name = $value),+ ])
	};
	($namespace:ident:$id:ident) => {
		$crate::world::blockstate::BlockState::new(
			format!("{}:{}", stringify!($namespace), stringify!($id)),
			$crate::world::blockstate::BlockProperties::none()
		)
	};
	($namespace:ident:$id:ident [ $($name:tt = $value:tt),+$(,)? ]) => {
		$crate::world::blockstate::BlockState::new(
			format!("{}:{}", stringify!($namespace), stringify!($id)),
			$crate::world::blockstate::BlockProperties::from([
				$(
					(
						$crate::blockstate!(@decode_token; $name),
						$crate::blockstate!(@decode_token; $value)
					),
				)+
			])
		)
	};
	(@decode_token; $value:literal) => {
		$value.to_string()
	};
	(@decode_token; $value:ident) => {
		stringify!($value).to_owned()
	};
}

/// Namespace assumed when a block state string doesn't specify one.
pub const DEFAULT_NAMESPACE: &str = "minecraft";

#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct BlockProperty {
	pub name: String,
	pub value: String,
}

impl BlockProperty {
	pub fn new<S1: AsRef<str>, S2: AsRef<str>>(name: S1, value: S2) -> Self {
		Self {
			name: name.as_ref().to_owned(),
			value: value.as_ref().to_owned(),
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn value(&self) -> &str {
		&self.value
	}
}

impl PartialOrd for BlockProperty {
	fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
		Some(self.cmp(other))
	}
}

impl Ord for BlockProperty {
	fn cmp(&self, other: &Self) -> std::cmp::Ordering {
		(&self.name, &self.value).cmp(&(&other.name, &other.value))
	}
}

impl<S1: AsRef<str>, S2: AsRef<str>> From<(S1, S2)> for BlockProperty {
	fn from(value: (S1, S2)) -> Self {
		BlockProperty::new(value.0, value.1)
	}
}

/// The properties of a [BlockState], kept sorted so that two states
/// with the same properties compare (and hash) equal.
/// An empty set of properties is always stored as `None`.
#[derive(Debug, Default, Hash, PartialEq, Eq, PartialOrd, Ord, Clone)]
pub struct BlockProperties {
	properties: Option<SortedVec<BlockProperty>>
}

impl BlockProperties {
	pub fn none() -> Self {
		Self {
			properties: None
		}
	}

	pub fn is_empty(&self) -> bool {
		self.properties.is_none()
	}

	pub fn properties(&self) -> Option<&[BlockProperty]> {
		self.properties.as_ref().map(|props| props.as_slice())
	}

	/// Finds the value of a property by name.
	pub fn get(&self, name: &str) -> Option<&str> {
		self.properties()?
			.iter()
			.find(|prop| prop.name == name)
			.map(BlockProperty::value)
	}
}

impl<T: Into<BlockProperty>, It: IntoIterator<Item = T>> From<It> for BlockProperties {
	fn from(value: It) -> Self {
		let properties = value.into_iter()
			.map(T::into)
			.collect::<Vec<BlockProperty>>();
		if properties.is_empty() {
			return Self::none();
		}
		Self {
			properties: Some(properties.into())
		}
	}
}

#[derive(Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Clone)]
pub struct BlockState {
	name: String,
	properties: BlockProperties,
}

impl BlockState {
	/// A name without a namespace is given the `minecraft` namespace.
	pub fn new<S: AsRef<str>, P: Into<BlockProperties>>(name: S, properties: P) -> Self {
		let name = name.as_ref();
		let name = if name.contains(':') {
			name.to_owned()
		} else {
			format!("{DEFAULT_NAMESPACE}:{name}")
		};
		Self {
			name,
			properties: properties.into(),
		}
	}

	pub fn air() -> Self {
		blockstate!(air)
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	/// The part of the name before the `:`.
	pub fn namespace(&self) -> &str {
		self.name.split_once(':').map_or(DEFAULT_NAMESPACE, |(namespace, _)| namespace)
	}

	/// The part of the name after the `:`.
	pub fn path(&self) -> &str {
		self.name.split_once(':').map_or(self.name.as_str(), |(_, path)| path)
	}

	pub fn properties(&self) -> Option<&[BlockProperty]> {
		self.properties.properties()
	}

	pub fn property(&self, name: &str) -> Option<&str> {
		self.properties.get(name)
	}

	/// Parses the textual form `namespace:name[key=value,...]`.
	/// The namespace defaults to `minecraft` and the properties are optional.
	pub fn parse<S: AsRef<str>>(source: S) -> McResult<Self> {
		let source = source.as_ref();
		blockstate_parser()
			.parse(source)
			.map_err(|errors| McError::BlockStateParse {
				input: source.to_owned(),
				errors,
			})
	}
}

// Allows for creating BlockState from strings.
// This does not parse properties, use `BlockState::parse` for that.
impl<S: AsRef<str>> From<S> for BlockState {
	fn from(value: S) -> Self {
		BlockState::new(value, BlockProperties::none())
	}
}

impl FromStr for BlockState {
	type Err = McError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		BlockState::parse(s)
	}
}

fn blockstate_parser() -> impl Parser<char, BlockState, Error = Simple<char>> {
	let ident = filter(|c: &char| c.is_ascii_alphanumeric() || ['_', '-', '.', '/'].contains(c))
		.repeated().at_least(1)
		.collect::<String>()
		.labelled("Identifier");

	let name = ident.clone()
		.then(just(':').ignore_then(ident.clone()).or_not())
		.map(|(first, second)| match second {
			Some(path) => format!("{first}:{path}"),
			None => first,
		})
		.labelled("Name");

	let property = ident.clone().padded()
		.then_ignore(just('='))
		.then(ident.padded())
		.map(|(name, value)| BlockProperty::new(name, value))
		.labelled("Property");

	let properties = property
		.separated_by(just(','))
		.delimited_by(just('['), just(']'))
		.or_not()
		.map(|properties| BlockProperties::from(properties.unwrap_or_default()));

	name.then(properties)
		.padded()
		.then_ignore(end())
		.map(|(name, properties)| BlockState::new(name, properties))
}

impl Display for BlockState {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", &self.name)?;
		if !self.properties.is_empty() {
			write!(f, "{}", &self.properties)?;
		}
		Ok(())
	}
}

impl Display for BlockProperties {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "[")?;
		if let Some(props) = &self.properties {
			props.iter()
				.enumerate()
				.try_for_each(|(index, prop)| {
					if index > 0 {
						write!(f, ",")?;
					}
					write!(f, "{}={}", &prop.name, &prop.value)
				})?;
		}
		write!(f, "]")
	}
}
