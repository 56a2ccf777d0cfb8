use std::cmp::Ordering;

use super::node::{self, IndexNode, Link};
use super::ColorIndex;
use crate::color::{self, Color};
use crate::node::error::ParseColorError;

/// In-order iterator over the colors of a `ColorIndex`.
#[derive(Clone, Debug)]
pub struct Iter<'a> {
	stack: Vec<&'a IndexNode>,
}

impl<'a> Iter<'a> {
	fn new(root: &'a Link) -> Self {
		let mut iter = Self { stack: Vec::new() };
		iter.push_left(root);
		iter
	}

	fn push_left(&mut self, mut link: &'a Link) {
		while let Some(ref n) = *link {
			self.stack.push(n);
			link = &n.left;
		}
	}
}

impl<'a> Iterator for Iter<'a> {
	type Item = Color;

	fn next(&mut self) -> Option<Color> {
		let n = self.stack.pop()?;
		self.push_left(&n.right);
		Some(n.color)
	}
}

fn preorder(link: &Link, out: &mut Vec<Color>) {
	if let Some(ref n) = *link {
		out.push(n.color);
		preorder(&n.left, out);
		preorder(&n.right, out);
	}
}

fn postorder(link: &Link, out: &mut Vec<Color>) {
	if let Some(ref n) = *link {
		postorder(&n.left, out);
		postorder(&n.right, out);
		out.push(n.color);
	}
}

fn leaves(link: &Link) -> usize {
	match *link {
		Some(ref n) if n.left.is_none() && n.right.is_none() => 1,
		Some(ref n) => leaves(&n.left) + leaves(&n.right),
		None => 0,
	}
}

/// Recomputes every height; `None` as soon as a node is off balance or
/// carries a stale height.
fn checked_height(link: &Link) -> Option<usize> {
	match *link {
		Some(ref n) => {
			let l = checked_height(&n.left)?;
			let r = checked_height(&n.right)?;
			let h = 1 + l.max(r);
			if (l as isize - r as isize).abs() > 1 || h != n.height {
				return None;
			}
			Some(h)
		}
		None => Some(0),
	}
}

fn count_in_range(link: &Link, lo: &Color, hi: &Color) -> usize {
	let n = match *link {
		Some(ref n) => n,
		None => return 0,
	};
	let above_lo = color::key_cmp(&n.color, lo);
	let below_hi = color::key_cmp(&n.color, hi);
	let mut count = 0;
	if above_lo != Ordering::Less && below_hi != Ordering::Greater {
		count += 1;
	}
	if above_lo == Ordering::Greater {
		count += count_in_range(&n.left, lo, hi);
	}
	if below_hi == Ordering::Less {
		count += count_in_range(&n.right, lo, hi);
	}
	count
}

fn closest<'a>(link: &'a Link, target: &Color, best: &mut Option<(u32, &'a IndexNode)>) {
	if let Some(ref n) = *link {
		let d = color::distance_squared(&n.color, target);
		if best.map_or(true, |(bd, _)| d < bd) {
			*best = Some((d, &**n));
		}
		closest(&n.left, target, best);
		closest(&n.right, target, best);
	}
}

impl ColorIndex {
	pub fn iter(&self) -> Iter<'_> {
		Iter::new(&self.root)
	}

	/// All colors in ascending order.
	pub fn colors(&self) -> Vec<Color> {
		self.iter().collect()
	}

	/// Looks a color up by its (R, G, B) key.
	pub fn search(&self, c: &Color) -> Option<Color> {
		let mut link = &self.root;
		while let Some(ref n) = *link {
			link = match color::key_cmp(c, &n.color) {
				Ordering::Less => &n.left,
				Ordering::Greater => &n.right,
				Ordering::Equal => return Some(n.color),
			};
		}
		None
	}

	pub fn search_hex(&self, hex: &str) -> Result<Option<Color>, ParseColorError> {
		Ok(self.search(&color::from_hex(hex)?))
	}

	pub fn contains(&self, c: &Color) -> bool {
		self.search(c).is_some()
	}

	pub fn min(&self) -> Option<Color> {
		self.root.as_deref().map(|n| node::leftmost(n).color)
	}

	pub fn max(&self) -> Option<Color> {
		self.root.as_deref().map(|n| node::rightmost(n).color)
	}

	/// Smallest color strictly greater than `c`, which need not be indexed.
	pub fn successor(&self, c: &Color) -> Option<Color> {
		let mut found = None;
		let mut link = &self.root;
		while let Some(ref n) = *link {
			if color::key_cmp(c, &n.color) == Ordering::Less {
				found = Some(n.color);
				link = &n.left;
			} else {
				link = &n.right;
			}
		}
		found
	}

	/// Largest color strictly less than `c`, which need not be indexed.
	pub fn predecessor(&self, c: &Color) -> Option<Color> {
		let mut found = None;
		let mut link = &self.root;
		while let Some(ref n) = *link {
			if color::key_cmp(c, &n.color) == Ordering::Greater {
				found = Some(n.color);
				link = &n.right;
			} else {
				link = &n.left;
			}
		}
		found
	}

	/// Height of the tree; 0 when empty.
	pub fn height(&self) -> usize {
		node::height(&self.root)
	}

	/// Number of nodes without children.
	pub fn leaf_count(&self) -> usize {
		leaves(&self.root)
	}

	/// Whether every node is AVL-balanced and has an up to date height.
	pub fn is_balanced(&self) -> bool {
		checked_height(&self.root).is_some()
	}

	/// Number of colors in `[lo, hi]`.
	pub fn count_in_range(&self, lo: &Color, hi: &Color) -> usize {
		count_in_range(&self.root, lo, hi)
	}

	/// Indexed color nearest to `target` in RGB space; on a tie, the one
	/// a pre-order walk meets first.
	pub fn closest(&self, target: &Color) -> Option<Color> {
		let mut best = None;
		closest(&self.root, target, &mut best);
		best.map(|(_, n)| n.color)
	}

	/// Colors in pre-order (node, left, right).
	pub fn preorder(&self) -> Vec<Color> {
		let mut out = Vec::with_capacity(self.len());
		preorder(&self.root, &mut out);
		out
	}

	/// Colors in post-order (left, right, node).
	pub fn postorder(&self) -> Vec<Color> {
		let mut out = Vec::with_capacity(self.len());
		postorder(&self.root, &mut out);
		out
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn gray(v: u8) -> Color {
		image::Rgb([v, v, v])
	}

	fn sample() -> ColorIndex {
		[40, 20, 60, 10, 30, 50, 70].iter().map(|&v| gray(v)).collect()
	}

	#[test]
	fn successor_and_predecessor() {
		let index = sample();
		assert_eq!(index.successor(&gray(30)), Some(gray(40)));
		assert_eq!(index.successor(&gray(35)), Some(gray(40)));
		assert_eq!(index.successor(&gray(70)), None);
		assert_eq!(index.predecessor(&gray(30)), Some(gray(20)));
		assert_eq!(index.predecessor(&gray(5)), None);
		assert_eq!(index.predecessor(&gray(255)), Some(gray(70)));
	}

	#[test]
	fn traversals() {
		let index = sample();
		let values = |v: Vec<Color>| v.into_iter().map(|c| c.0[0]).collect::<Vec<_>>();
		assert_eq!(values(index.colors()), vec![10, 20, 30, 40, 50, 60, 70]);
		assert_eq!(values(index.preorder()), vec![40, 20, 10, 30, 60, 50, 70]);
		assert_eq!(values(index.postorder()), vec![10, 30, 20, 50, 70, 60, 40]);
		assert_eq!(index.height(), 3);
		assert_eq!(index.leaf_count(), 4);
	}

	#[test]
	fn ranges() {
		let index = sample();
		assert_eq!(index.count_in_range(&gray(20), &gray(50)), 4);
		assert_eq!(index.count_in_range(&gray(21), &gray(29)), 0);
		assert_eq!(index.count_in_range(&gray(0), &gray(255)), 7);
	}

	#[test]
	fn nearest_color() {
		let index = sample();
		assert_eq!(index.closest(&gray(44)), Some(gray(40)));
		assert_eq!(index.closest(&gray(60)), Some(gray(60)));
		// 45 is as far from 40 as from 50; 40 is the root.
		assert_eq!(index.closest(&gray(45)), Some(gray(40)));
		assert_eq!(ColorIndex::new().closest(&gray(1)), None);
	}

	#[test]
	fn search_by_key() {
		let index = sample();
		assert!(index.contains(&gray(50)));
		assert_eq!(index.search(&gray(51)), None);
		assert_eq!(index.search_hex("0a0a0a").unwrap(), Some(gray(10)));
		assert!(index.search_hex("xyz").is_err());
	}
}
