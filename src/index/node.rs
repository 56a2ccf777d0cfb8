//! Owned AVL nodes and the recursive insert/remove that rebuild each
//! subtree on the way back up.

use std::cmp::{self, Ordering};

use crate::color::{self, Color};

pub(crate) type Link = Option<Box<IndexNode>>;

/// One distinct color of the index.
#[derive(Clone, Debug)]
pub struct IndexNode {
	pub color: Color,
	/// Height of the subtree rooted here; a lone node has height 1.
	pub height: usize,
	pub left: Link,
	pub right: Link,
}

pub(crate) fn height(link: &Link) -> usize {
	link.as_ref().map_or(0, |n| n.height)
}

impl IndexNode {
	fn new(color: Color) -> Self {
		Self { color, height: 1, left: None, right: None }
	}

	fn update_height(&mut self) {
		self.height = 1 + cmp::max(height(&self.left), height(&self.right));
	}

	/// `height(left) - height(right)`.
	pub fn balance_factor(&self) -> isize {
		height(&self.left) as isize - height(&self.right) as isize
	}
}

fn rotate_right(mut y: Box<IndexNode>) -> Box<IndexNode> {
	match y.left.take() {
		Some(mut x) => {
			y.left = x.right.take();
			y.update_height();
			x.right = Some(y);
			x.update_height();
			x
		}
		None => y,
	}
}

fn rotate_left(mut x: Box<IndexNode>) -> Box<IndexNode> {
	match x.right.take() {
		Some(mut y) => {
			x.right = y.left.take();
			x.update_height();
			y.left = Some(x);
			y.update_height();
			y
		}
		None => x,
	}
}

fn balance_of(link: &Link) -> isize {
	link.as_ref().map_or(0, |n| n.balance_factor())
}

/// Restores the AVL condition at `node`, whose subtrees are already
/// balanced, and returns the new root of the subtree.
fn rebalance(mut node: Box<IndexNode>) -> Box<IndexNode> {
	node.update_height();
	let balance = node.balance_factor();
	if balance > 1 {
		if balance_of(&node.left) < 0 {
			node.left = node.left.take().map(rotate_left);
		}
		return rotate_right(node);
	}
	if balance < -1 {
		if balance_of(&node.right) > 0 {
			node.right = node.right.take().map(rotate_right);
		}
		return rotate_left(node);
	}
	node
}

/// Inserts `c` below `link`, setting `added` when the key was absent.
///
/// An existing key only has its payload overwritten.
pub(crate) fn insert(link: Link, c: Color, added: &mut bool) -> Box<IndexNode> {
	let mut node = match link {
		Some(n) => n,
		None => {
			*added = true;
			return Box::new(IndexNode::new(c));
		}
	};
	match color::key_cmp(&c, &node.color) {
		Ordering::Less => node.left = Some(insert(node.left.take(), c, added)),
		Ordering::Greater => node.right = Some(insert(node.right.take(), c, added)),
		Ordering::Equal => {
			node.color = c;
			return node;
		}
	}
	rebalance(node)
}

/// Removes `c` from below `link`, setting `removed` when it was present.
///
/// A node with two children takes over its in-order successor's key,
/// which is then removed from the right subtree.
pub(crate) fn remove(link: Link, c: &Color, removed: &mut bool) -> Link {
	let mut node = link?;
	match color::key_cmp(c, &node.color) {
		Ordering::Less => node.left = remove(node.left.take(), c, removed),
		Ordering::Greater => node.right = remove(node.right.take(), c, removed),
		Ordering::Equal => {
			*removed = true;
			match (node.left.take(), node.right.take()) {
				(None, right) => return right,
				(left, None) => return left,
				(left, Some(right)) => {
					let successor = leftmost(&right).color;
					node.left = left;
					node.right = remove(Some(right), &successor, &mut false);
					node.color = successor;
				}
			}
		}
	}
	Some(rebalance(node))
}

pub(crate) fn leftmost(mut node: &IndexNode) -> &IndexNode {
	while let Some(ref l) = node.left {
		node = &**l;
	}
	node
}

pub(crate) fn rightmost(mut node: &IndexNode) -> &IndexNode {
	while let Some(ref r) = node.right {
		node = &**r;
	}
	node
}

#[cfg(test)]
mod tests {
	use super::*;

	fn gray(v: u8) -> Color {
		image::Rgb([v, v, v])
	}

	fn build(values: &[u8]) -> Link {
		values.iter().fold(None, |root, &v| Some(insert(root, gray(v), &mut false)))
	}

	#[test]
	fn ascending_inserts_rotate_left() {
		let root = build(&[1, 2, 3]).unwrap();
		assert_eq!(root.color, gray(2));
		assert_eq!(root.height, 2);
		assert_eq!(root.left.as_ref().unwrap().color, gray(1));
		assert_eq!(root.right.as_ref().unwrap().color, gray(3));
	}

	#[test]
	fn descending_inserts_rotate_right() {
		let root = build(&[3, 2, 1]).unwrap();
		assert_eq!(root.color, gray(2));
		assert_eq!(root.balance_factor(), 0);
	}

	#[test]
	fn zigzag_inserts_rotate_twice() {
		let root = build(&[3, 1, 2]).unwrap();
		assert_eq!(root.color, gray(2));
		let root = build(&[1, 3, 2]).unwrap();
		assert_eq!(root.color, gray(2));
		assert_eq!(root.height, 2);
	}

	#[test]
	fn duplicate_is_not_added() {
		let mut added = false;
		let root = insert(build(&[5, 7]), gray(5), &mut added);
		assert!(!added);
		assert_eq!(root.height, 2);
	}

	#[test]
	fn two_child_removal_uses_successor() {
		let root = build(&[2, 1, 3]);
		let mut removed = false;
		let root = remove(root, &gray(2), &mut removed).unwrap();
		assert!(removed);
		assert_eq!(root.color, gray(3));
		assert_eq!(root.left.as_ref().unwrap().color, gray(1));
		assert!(root.right.is_none());
	}

	#[test]
	fn removal_rebalances() {
		// 4 at the root, removing 5 leaves the left side two levels taller.
		let root = build(&[4, 2, 5, 1, 3]);
		let root = remove(root, &gray(5), &mut false).unwrap();
		assert_eq!(root.color, gray(2));
		assert_eq!(root.right.as_ref().unwrap().color, gray(4));
		assert_eq!(root.right.as_ref().unwrap().left.as_ref().unwrap().color, gray(3));
		assert_eq!(root.height, 3);
	}

	#[test]
	fn missing_key_is_not_removed() {
		let mut removed = false;
		let root = remove(build(&[1, 2, 3]), &gray(9), &mut removed);
		assert!(!removed);
		assert_eq!(root.unwrap().height, 2);
	}
}
