//! Lossy passes that merge subtrees of a `Quadtree` into single leaves.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use crate::color;
use crate::node::error::CompressError;
use crate::node::QuadtreeNode;
use crate::tree::Quadtree;

/// A node whose four subnodes are all leaves, keyed for the phi pass.
///
/// `path` holds the quadrant indices from the root. Comparing paths
/// lexicographically orders nodes exactly as a NO, NE, SE, SO pre-order
/// walk meets them, so equal variances go to the node such a walk would
/// find first.
#[derive(Debug)]
struct Candidate {
	variance: f64,
	path: Vec<usize>,
}

impl Ord for Candidate {
	fn cmp(&self, other: &Self) -> Ordering {
		self.variance.total_cmp(&other.variance)
			.then_with(|| self.path.cmp(&other.path))
	}
}

impl PartialOrd for Candidate {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl PartialEq for Candidate {
	fn eq(&self, other: &Self) -> bool {
		self.cmp(other) == Ordering::Equal
	}
}

impl Eq for Candidate {}

fn collect_candidates(node: &QuadtreeNode, path: &mut Vec<usize>, out: &mut BinaryHeap<Reverse<Candidate>>) {
	if let Some(ref sects) = node.sections {
		if node.has_leaf_sections() {
			out.push(Reverse(Candidate { variance: node.luminance_variance(), path: path.clone() }));
			return;
		}
		for (q, s) in sects.iter().enumerate() {
			path.push(q);
			collect_candidates(s, path, out);
			path.pop();
		}
	}
}

fn lambda_pass(node: &mut QuadtreeNode, lambda: f64) {
	if let Some(ref mut sects) = node.sections {
		sects.iter_mut().for_each(|s| lambda_pass(s, lambda));
	} else {
		return;
	}
	if node.has_leaf_sections() && node.max_luminance_deviation() <= lambda {
		node.merge();
	}
}

fn color_pass(node: &mut QuadtreeNode, threshold: u8) {
	if let Some(ref mut sects) = node.sections {
		sects.iter_mut().for_each(|s| color_pass(s, threshold));
	} else {
		return;
	}
	if !node.has_leaf_sections() {
		return;
	}
	let close_enough = node.sections.as_ref().map_or(false, |sects| {
		(0..4).all(|i| (i + 1..4).all(|j| {
			color::channel_distance(&sects[i].color, &sects[j].color) <= threshold
		}))
	});
	if close_enough {
		node.merge();
	}
}

impl Quadtree {
	/// Quality-bounded compression.
	///
	/// Bottom-up, merges every node whose four leaf subnodes all stay
	/// within `lambda / 255` of the node's average luminance. `lambda`
	/// must lie in `[0, 255]`. Applying the same `lambda` twice merges
	/// nothing the second time.
	pub fn compress_lambda(&mut self, lambda: f64) -> Result<(), CompressError> {
		if !(0. ..=255.).contains(&lambda) {
			return Err(CompressError::LambdaOutOfRange(lambda));
		}
		lambda_pass(&mut self.root, lambda / 255.);
		Ok(())
	}

	/// Budget-bounded compression.
	///
	/// Greedily merges the mergeable node of least luminance variance
	/// until at most `phi` leaves remain. Each merge removes three leaves,
	/// so the result may land up to two below `phi`. Stops early, without
	/// error, once the whole tree is a single leaf.
	pub fn compress_phi(&mut self, phi: usize) -> Result<(), CompressError> {
		if phi == 0 {
			return Err(CompressError::PhiNotPositive);
		}
		let mut leaves = self.leaf_count();
		if leaves <= phi {
			return Ok(());
		}
		let mut heap = BinaryHeap::new();
		collect_candidates(&self.root, &mut Vec::new(), &mut heap);
		while leaves > phi {
			let Reverse(best) = match heap.pop() {
				Some(c) => c,
				None => break,
			};
			let node = match self.root.descend_mut(&best.path) {
				Some(n) if n.has_leaf_sections() => n,
				_ => continue,
			};
			node.merge();
			leaves -= 3;

			// Merging can only make the parent newly eligible.
			let mut path = best.path;
			if path.pop().is_some() {
				if let Some(parent) = self.root.descend_mut(&path) {
					if parent.has_leaf_sections() {
						let variance = parent.luminance_variance();
						heap.push(Reverse(Candidate { variance, path }));
					}
				}
			}
		}
		Ok(())
	}

	/// Merges every node whose four leaf subnodes differ pairwise by at
	/// most `threshold` on every RGB channel. `threshold` must lie in
	/// `[0, 255]`.
	pub fn compress_color(&mut self, threshold: i32) -> Result<(), CompressError> {
		if threshold < 0 || threshold > 255 {
			return Err(CompressError::ThresholdOutOfRange(threshold));
		}
		color_pass(&mut self.root, threshold as u8);
		Ok(())
	}
}
