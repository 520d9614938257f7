use std::ops::{Add, Neg, Sub};

/// A block position (or offset) in 3D space.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Coord3 {
	pub x: i32,
	pub y: i32,
	pub z: i32,
}

impl Coord3 {
	pub const ZERO: Coord3 = Coord3::new(0, 0, 0);

	#[inline(always)]
	pub const fn new(x: i32, y: i32, z: i32) -> Self {
		Self {
			x,
			y,
			z
		}
	}

	#[inline(always)]
	pub fn map<F: Fn(i32)->i32>(self, map: F) -> Self {
		Self {
			x: map(self.x),
			y: map(self.y),
			z: map(self.z)
		}
	}

	#[inline(always)]
	pub fn xyz(self) -> (i32, i32, i32) {
		(
			self.x,
			self.y,
			self.z
		)
	}

	/// Creates a [Coord3] from the first three values of a slice.
	pub fn from_slice(values: &[i32]) -> Option<Self> {
		match values {
			[x, y, z, ..] => Some(Self::new(*x, *y, *z)),
			_ => None,
		}
	}

	pub fn to_array(self) -> [i32; 3] {
		[self.x, self.y, self.z]
	}
}

impl From<(i32, i32, i32)> for Coord3 {
	#[inline(always)]
	fn from(value: (i32, i32, i32)) -> Self {
		Coord3::new(value.0, value.1, value.2)
	}
}

impl From<[i32; 3]> for Coord3 {
	#[inline(always)]
	fn from(value: [i32; 3]) -> Self {
		Coord3::new(value[0], value[1], value[2])
	}
}

impl From<Coord3> for (i32, i32, i32) {
	#[inline(always)]
	fn from(value: Coord3) -> Self {
		value.xyz()
	}
}

impl Neg for Coord3 {
	type Output = Coord3;

	fn neg(self) -> Self::Output {
		self.map(|v| v.wrapping_neg())
	}
}

impl Add for Coord3 {
	type Output = Coord3;

	fn add(self, rhs: Coord3) -> Self::Output {
		Coord3::new(
			self.x.wrapping_add(rhs.x),
			self.y.wrapping_add(rhs.y),
			self.z.wrapping_add(rhs.z)
		)
	}
}

impl Sub for Coord3 {
	type Output = Coord3;

	fn sub(self, rhs: Coord3) -> Self::Output {
		Coord3::new(
			self.x.wrapping_sub(rhs.x),
			self.y.wrapping_sub(rhs.y),
			self.z.wrapping_sub(rhs.z)
		)
	}
}

impl std::fmt::Display for Coord3 {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "({}, {}, {})", self.x, self.y, self.z)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn arithmetic() {
		let a = Coord3::new(1, -2, 3);
		let b = Coord3::from((4, 5, 6));
		assert_eq!(a + b, Coord3::new(5, 3, 9));
		assert_eq!(b - a, Coord3::new(3, 7, 3));
		assert_eq!(-a, Coord3::new(-1, 2, -3));
		assert_eq!(Coord3::from_slice(&[7, 8, 9, 10]), Some(Coord3::new(7, 8, 9)));
		assert_eq!(Coord3::from_slice(&[7, 8]), None);
		assert_eq!(a.to_string(), "(1, -2, 3)");
	}
}
