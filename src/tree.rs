use std::collections::HashMap;
use std::fmt;

use crate::color::{self, Color};
use crate::node::error::{ParseError, QueryError};
use crate::node::image::PixelSource;
use crate::node::text::{Prefix, Suffix, WithSizes};
use crate::node::QuadtreeNode;

/// Region quadtree of an image.
///
/// The root covers the smallest power-of-two square containing the image;
/// `width` and `height` remember the part of that square the image covers.
#[derive(Clone, Debug)]
pub struct Quadtree {
	pub(crate) root: QuadtreeNode,
	width: u32,
	height: u32,
}

/// Side of the smallest power-of-two square holding a `width`x`height`
/// image, or `None` when that side does not fit in a `u32`.
pub fn padded_size(width: u32, height: u32) -> Option<u32> {
	std::cmp::max(width, height).checked_next_power_of_two()
}

impl Quadtree {
	/// Builds the tree of an image, collapsing uniform squares as it goes.
	///
	/// # Panics
	///
	/// Panics if a side of the image exceeds 2^31 pixels.
	pub fn from_source<S: PixelSource + ?Sized>(source: &S) -> Self {
		let (width, height) = (source.width(), source.height());
		let size = match padded_size(width, height) {
			Some(size) => size,
			None => panic!("{}x{} image is too large for a quadtree", width, height),
		};
		Self {
			root: QuadtreeNode::build(source, 0, 0, size),
			width,
			height,
		}
	}

	/// Rebuilds a tree from its text form.
	///
	/// The text carries no dimensions, so those of the original image
	/// must be supplied.
	pub fn from_text(text: &str, width: u32, height: u32) -> Result<Self, ParseError> {
		let size = padded_size(width, height).ok_or(ParseError::TooLarge { width, height })?;
		Ok(Self {
			root: QuadtreeNode::from_text(text, size)?,
			width,
			height,
		})
	}

	pub fn width(&self) -> u32 {
		self.width
	}

	pub fn height(&self) -> u32 {
		self.height
	}

	/// Side length of the padded square.
	pub fn size(&self) -> u32 {
		self.root.size
	}

	pub fn root(&self) -> &QuadtreeNode {
		&self.root
	}

	pub fn leaf_count(&self) -> usize {
		self.root.leaf_count()
	}

	/// Number of branch (non-leaf) nodes.
	pub fn internal_count(&self) -> usize {
		self.root.internal_count()
	}

	/// Number of levels; a single-leaf tree has depth 1.
	pub fn depth(&self) -> usize {
		self.root.height()
	}

	/// Leaf colors in NO, NE, SE, SO order, padding included.
	pub fn leaf_colors(&self) -> Vec<Color> {
		let mut colors = Vec::with_capacity(self.leaf_count());
		self.root.for_each_leaf(&mut |l| colors.push(l.color));
		colors
	}

	/// Number of leaves of exactly this color.
	pub fn count_color(&self, c: Color) -> usize {
		let mut count = 0;
		self.root.for_each_leaf(&mut |l| if l.color == c { count += 1 });
		count
	}

	/// Color carried by the most leaves; on a tie, the first one met.
	pub fn most_frequent_color(&self) -> Color {
		// Leaf count and order of first appearance, per color.
		let mut counts: HashMap<Color, (usize, usize)> = HashMap::new();
		let mut seen = 0;
		self.root.for_each_leaf(&mut |l| {
			counts.entry(l.color)
				.or_insert_with(|| {
					seen += 1;
					(0, seen)
				})
				.0 += 1;
		});
		counts.into_iter()
			.max_by(|(_, (n1, first1)), (_, (n2, first2))| n1.cmp(n2).then(first2.cmp(first1)))
			.map_or(self.root.color, |(c, _)| c)
	}

	/// Color of the pixel at `(x, y)` as the tree currently renders it.
	pub fn color_at(&self, x: u32, y: u32) -> Result<Color, QueryError> {
		if x >= self.width || y >= self.height {
			return Err(QueryError::OutOfBounds { x, y, width: self.width, height: self.height });
		}
		Ok(self.root.color_at(x, y))
	}

	/// Renders the tree into a buffer of the original dimensions.
	pub fn to_image(&self) -> image::RgbImage {
		let mut img = image::RgbImage::from_pixel(self.width, self.height, color::WHITE);
		self.root.to_image(&mut img);
		img
	}

	/// Hierarchical text form; see the `Display` impl of `QuadtreeNode`.
	pub fn to_text(&self) -> String {
		self.root.to_string()
	}

	/// Text form with leaves written as `hex:size`.
	pub fn to_text_with_sizes(&self) -> String {
		WithSizes(&self.root).to_string()
	}

	/// Pre-order listing, branches as `[ ... ]`.
	pub fn to_text_prefix(&self) -> String {
		Prefix(&self.root).to_string()
	}

	/// Post-order listing, each branch as a `>` after its children.
	pub fn to_text_suffix(&self) -> String {
		Suffix(&self.root).to_string()
	}

	/// Replaces every leaf by the gray level of its luminance.
	pub fn to_grayscale(&mut self) {
		self.root.map_leaves(&mut |l| {
			let gray = (l.luminance * 255.).floor().max(0.).min(255.) as u8;
			image::Rgb([gray, gray, gray])
		});
	}

	/// Inverts every channel of every leaf.
	pub fn to_negative(&mut self) {
		self.root.map_leaves(&mut |l| {
			let [r, g, b] = l.color.0;
			image::Rgb([255 - r, 255 - g, 255 - b])
		});
	}

	/// Mirrors the padded square left to right.
	pub fn mirror_horizontal(&mut self) {
		self.root.mirror_horizontal();
	}

	/// Mirrors the padded square top to bottom.
	pub fn mirror_vertical(&mut self) {
		self.root.mirror_vertical();
	}
}

/// Equal dimensions, equal shape, equal leaf colors.
impl PartialEq for Quadtree {
	fn eq(&self, other: &Self) -> bool {
		self.width == other.width && self.height == other.height
			&& self.root.same_shape(&other.root)
	}
}

impl fmt::Display for Quadtree {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::Display::fmt(&self.root, f)
	}
}
