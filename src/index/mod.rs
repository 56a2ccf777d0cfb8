//! AVL tree of the distinct colors of an image or a quadtree, ordered
//! lexicographically on (R, G, B).

pub mod node;
pub mod query;

use std::fmt;
use std::iter::FromIterator;

use crate::color::{self, Color, Hex};
use crate::node::error::{ParseColorError, ParseError};
use crate::node::image::PixelSource;
use crate::node::text;
use crate::tree::Quadtree;

use self::node::Link;

pub use self::query::Iter;

/// Balanced search tree over distinct colors.
#[derive(Clone, Debug, Default)]
pub struct ColorIndex {
	root: Link,
	len: usize,
}

impl ColorIndex {
	pub fn new() -> Self {
		Self::default()
	}

	/// Indexes every pixel of an image, row by row.
	pub fn from_source<S: PixelSource + ?Sized>(source: &S) -> Self {
		let mut index = Self::new();
		for y in 0..source.height() {
			for x in 0..source.width() {
				index.insert(source.pixel(x, y));
			}
		}
		index
	}

	/// Indexes the leaf colors of a quadtree, padding leaves included.
	pub fn from_quadtree(tree: &Quadtree) -> Self {
		tree.leaf_colors().into_iter().collect()
	}

	/// Indexes every leaf color of a serialized quadtree.
	pub fn from_quadtree_text(text: &str) -> Result<Self, ParseError> {
		Ok(text::leaf_colors(text)?.into_iter().collect())
	}

	/// Number of distinct colors.
	pub fn len(&self) -> usize {
		self.len
	}

	pub fn is_empty(&self) -> bool {
		self.len == 0
	}

	pub fn clear(&mut self) {
		self.root = None;
		self.len = 0;
	}

	pub fn root(&self) -> Option<&node::IndexNode> {
		self.root.as_deref()
	}

	/// Adds a color; returns `false` if it was already present.
	pub fn insert(&mut self, c: Color) -> bool {
		let mut added = false;
		self.root = Some(node::insert(self.root.take(), c, &mut added));
		if added {
			self.len += 1;
		}
		added
	}

	pub fn insert_hex(&mut self, hex: &str) -> Result<bool, ParseColorError> {
		Ok(self.insert(color::from_hex(hex)?))
	}

	/// Removes a color; returns `false` if it was absent.
	pub fn remove(&mut self, c: &Color) -> bool {
		let mut removed = false;
		self.root = node::remove(self.root.take(), c, &mut removed);
		if removed {
			self.len -= 1;
		}
		removed
	}

	pub fn remove_hex(&mut self, hex: &str) -> Result<bool, ParseColorError> {
		Ok(self.remove(&color::from_hex(hex)?))
	}

	/// Text form: `(hex)` tokens in ascending order, separated by spaces.
	pub fn to_text(&self) -> String {
		self.to_string()
	}
}

impl FromIterator<Color> for ColorIndex {
	fn from_iter<I: IntoIterator<Item = Color>>(iter: I) -> Self {
		let mut index = Self::new();
		index.extend(iter);
		index
	}
}

impl Extend<Color> for ColorIndex {
	fn extend<I: IntoIterator<Item = Color>>(&mut self, iter: I) {
		for c in iter {
			self.insert(c);
		}
	}
}

impl<'a> IntoIterator for &'a ColorIndex {
	type Item = Color;
	type IntoIter = Iter<'a>;

	fn into_iter(self) -> Iter<'a> {
		self.iter()
	}
}

impl fmt::Display for ColorIndex {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for (i, c) in self.iter().enumerate() {
			if i > 0 {
				f.write_str(" ")?;
			}
			write!(f, "({})", Hex(c))?;
		}
		Ok(())
	}
}
