pub mod error;
pub mod image;
pub mod text;

use crate::color::{self, Color};

use self::image::PixelSource;

/// Node in a region quadtree covering a square of the image.
///
/// May contain four subnodes (branch node) or none (leaf node).
///
/// It always carries a color and a luminance: the region's own color for a
/// leaf, the average of the four subnodes for a branch, such that tree
/// descent can stop at any level and give a meaningful preview.
#[derive(Clone, Debug)]
pub struct QuadtreeNode {
	pub x: u32,
	pub y: u32,
	/// Side length; always a power of two.
	pub size: u32,
	pub color: Color,
	pub luminance: f64,
	/// Subnodes in NO, NE, SE, SO order.
	pub sections: Option<Box<[QuadtreeNode; 4]>>,
}

/// Offsets of the four quadrants, in units of half the parent size,
/// in NO, NE, SE, SO order.
pub const QUADRANTS: [(u32, u32); 4] = [(0, 0), (1, 0), (1, 1), (0, 1)];

impl QuadtreeNode {
	/// Makes a leaf of the given color.
	pub fn leaf(x: u32, y: u32, size: u32, color: Color) -> Self {
		Self {
			x,
			y,
			size,
			color,
			luminance: color::luminance(&color),
			sections: None,
		}
	}

	/// Makes a branch from four subnodes and sets its average.
	pub fn branch(x: u32, y: u32, size: u32, sections: [QuadtreeNode; 4]) -> Self {
		let mut node = Self {
			x,
			y,
			size,
			color: color::WHITE,
			luminance: color::WHITE_LUMINANCE,
			sections: Some(Box::new(sections)),
		};
		node.update_average();
		node
	}

	/// Recursively builds the subtree for the square at `(x, y)`.
	///
	/// Squares of four identical leaves collapse into a single leaf on the
	/// way up. Pixels outside the source are white.
	pub fn build<S: PixelSource + ?Sized>(source: &S, x: u32, y: u32, size: u32) -> Self {
		if size == 1 {
			return if x < source.width() && y < source.height() {
				Self::leaf(x, y, 1, source.pixel(x, y))
			} else {
				Self {
					luminance: color::WHITE_LUMINANCE,
					..Self::leaf(x, y, 1, color::WHITE)
				}
			};
		}
		let half = size / 2;
		let sections = [
			Self::build(source, x, y, half),
			Self::build(source, x + half, y, half),
			Self::build(source, x + half, y + half, half),
			Self::build(source, x, y + half, half),
		];
		let mut node = Self::branch(x, y, size, sections);
		if node.is_homogeneous() {
			node.merge();
		}
		node
	}

	pub fn is_leaf(&self) -> bool {
		self.sections.is_none()
	}

	/// Whether all four subnodes exist and are leaves.
	pub fn has_leaf_sections(&self) -> bool {
		match self.sections {
			Some(ref sects) => sects.iter().all(QuadtreeNode::is_leaf),
			None => false,
		}
	}

	/// Whether the four subnodes are leaves of one identical color.
	fn is_homogeneous(&self) -> bool {
		match self.sections {
			Some(ref sects) if self.has_leaf_sections() => {
				sects.iter().all(|s| s.color == sects[0].color)
			}
			_ => false,
		}
	}

	/// Recomputes color and luminance from the subnodes, if any.
	pub fn update_average(&mut self) {
		if let Some(ref sects) = self.sections {
			self.color = color::average([
				&sects[0].color,
				&sects[1].color,
				&sects[2].color,
				&sects[3].color,
			]);
			self.luminance = sects.iter().map(|s| s.luminance).sum::<f64>() / 4.;
		}
	}

	/// Turns this node into a leaf carrying the average of its subnodes.
	pub fn merge(&mut self) {
		self.update_average();
		self.sections = None;
	}

	/// Sets a leaf's color and the matching luminance.
	pub fn set_color(&mut self, c: Color) {
		self.color = c;
		self.luminance = color::luminance(&c);
	}

	/// Largest deviation of a subnode's luminance from this node's own.
	pub fn max_luminance_deviation(&self) -> f64 {
		self.sections.as_ref().map_or(0., |sects| {
			sects.iter()
				.map(|s| (s.luminance - self.luminance).abs())
				.fold(0., f64::max)
		})
	}

	/// Luminance variance of the subnodes about this node's luminance.
	pub fn luminance_variance(&self) -> f64 {
		self.sections.as_ref().map_or(0., |sects| {
			sects.iter()
				.map(|s| (s.luminance - self.luminance).powi(2))
				.sum::<f64>() / 4.
		})
	}

	/// Descends along a sequence of quadrant indices.
	pub fn descend_mut(&mut self, path: &[usize]) -> Option<&mut QuadtreeNode> {
		let mut node = self;
		for &q in path {
			node = &mut node.sections.as_mut()?[q];
		}
		Some(node)
	}

	pub fn leaf_count(&self) -> usize {
		match self.sections {
			Some(ref sects) => sects.iter().map(QuadtreeNode::leaf_count).sum(),
			None => 1,
		}
	}

	/// Number of branch nodes in this subtree.
	pub fn internal_count(&self) -> usize {
		match self.sections {
			Some(ref sects) => 1 + sects.iter().map(QuadtreeNode::internal_count).sum::<usize>(),
			None => 0,
		}
	}

	/// Height of this subtree; a leaf has height 1.
	pub fn height(&self) -> usize {
		match self.sections {
			Some(ref sects) => 1 + sects.iter().map(QuadtreeNode::height).max().unwrap_or(0),
			None => 1,
		}
	}

	/// Calls `f` on every leaf, in NO, NE, SE, SO order.
	pub fn for_each_leaf<'a, F: FnMut(&'a QuadtreeNode)>(&'a self, f: &mut F) {
		match self.sections {
			Some(ref sects) => sects.iter().for_each(|s| s.for_each_leaf(f)),
			None => f(self),
		}
	}

	/// Color of the leaf covering `(x, y)`, which must lie inside this node.
	pub fn color_at(&self, x: u32, y: u32) -> Color {
		match self.sections {
			Some(ref sects) => {
				let half = self.size / 2;
				let east = x >= self.x + half;
				let south = y >= self.y + half;
				let q = match (east, south) {
					(false, false) => 0,
					(true, false) => 1,
					(true, true) => 2,
					(false, true) => 3,
				};
				sects[q].color_at(x, y)
			}
			None => self.color,
		}
	}

	/// Applies `f` to every leaf color and refreshes every average.
	pub fn map_leaves<F: FnMut(&QuadtreeNode) -> Color>(&mut self, f: &mut F) {
		if self.is_leaf() {
			let c = f(self);
			self.set_color(c);
			return;
		}
		if let Some(ref mut sects) = self.sections {
			sects.iter_mut().for_each(|s| s.map_leaves(f));
		}
		self.update_average();
	}

	/// Swaps the east and west halves at every level.
	pub fn mirror_horizontal(&mut self) {
		self.swap_sections(&[(0, 1), (2, 3)]);
		self.relocate(self.x, self.y);
	}

	/// Swaps the north and south halves at every level.
	pub fn mirror_vertical(&mut self) {
		self.swap_sections(&[(0, 3), (1, 2)]);
		self.relocate(self.x, self.y);
	}

	fn swap_sections(&mut self, pairs: &[(usize, usize)]) {
		if let Some(ref mut sects) = self.sections {
			for &(a, b) in pairs {
				sects.swap(a, b);
			}
			sects.iter_mut().for_each(|s| s.swap_sections(pairs));
		}
	}

	/// Moves this subtree so its corner sits at `(x, y)`, placing every
	/// subnode in the quadrant its slot stands for.
	fn relocate(&mut self, x: u32, y: u32) {
		self.x = x;
		self.y = y;
		let half = self.size / 2;
		if let Some(ref mut sects) = self.sections {
			for (s, &(qx, qy)) in sects.iter_mut().zip(QUADRANTS.iter()) {
				s.relocate(x + qx * half, y + qy * half);
			}
		}
	}

	/// Same shape and same leaf colors.
	pub fn same_shape(&self, other: &QuadtreeNode) -> bool {
		match (&self.sections, &other.sections) {
			(Some(a), Some(b)) => a.iter().zip(b.iter()).all(|(a, b)| a.same_shape(b)),
			(None, None) => self.color == other.color,
			_ => false,
		}
	}
}
