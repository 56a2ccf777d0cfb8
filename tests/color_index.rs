use rquadtree::{color, Color, ColorIndex, Quadtree};

fn rgb(r: u8, g: u8, b: u8) -> Color {
	image::Rgb([r, g, b])
}

fn palette() -> Vec<Color> {
	let mut state: u32 = 7;
	(0..300).map(|_| {
		state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
		let [r, g, b, _] = state.to_be_bytes();
		rgb(r % 8 * 32, g % 4 * 64, b)
	}).collect()
}

#[test]
fn three_colors_scenario() {
	let mut index = ColorIndex::new();
	index.insert_hex("ff0000").unwrap();
	index.insert_hex("00ff00").unwrap();
	index.insert_hex("0000ff").unwrap();
	assert_eq!(index.search_hex("00ff00").unwrap(), Some(rgb(0, 255, 0)));
	assert_eq!(index.min(), Some(rgb(0, 0, 255)));
	assert_eq!(index.max(), Some(rgb(255, 0, 0)));
	assert_eq!(index.len(), 3);
	assert_eq!(index.height(), 2);
}

#[test]
fn duplicate_insert_changes_nothing() {
	let mut index: ColorIndex = palette().into_iter().collect();
	let (len, text) = (index.len(), index.to_text());
	for c in palette() {
		assert!(!index.insert(c));
	}
	assert_eq!(index.len(), len);
	assert_eq!(index.to_text(), text);
}

#[test]
fn stays_balanced_and_sorted() {
	let colors = palette();
	let mut index: ColorIndex = colors.iter().cloned().collect();
	assert!(index.is_balanced());
	let n = index.len() as f64;
	assert!((index.height() as f64) <= 1.45 * (n + 2.).log2());

	for c in colors.iter().step_by(3) {
		index.remove(c);
		assert!(index.is_balanced());
	}
	let listed = index.colors();
	assert!(listed.windows(2).all(|w| color::key_cmp(&w[0], &w[1]).is_lt()));
	assert_eq!(listed.len(), index.len());
	assert_eq!(index.iter().count(), index.len());
}

#[test]
fn range_count_matches_filter() {
	let index: ColorIndex = palette().into_iter().collect();
	let bounds = [
		(rgb(0, 0, 0), rgb(255, 255, 255)),
		(rgb(32, 64, 0), rgb(96, 0, 128)),
		(rgb(64, 0, 0), rgb(64, 255, 255)),
		(rgb(200, 0, 0), rgb(100, 0, 0)),
	];
	for (lo, hi) in bounds.iter() {
		let expected = index.iter()
			.filter(|c| color::key_cmp(c, lo).is_ge() && color::key_cmp(c, hi).is_le())
			.count();
		assert_eq!(index.count_in_range(lo, hi), expected);
	}
}

#[test]
fn closest_of_present_color_is_itself() {
	let index: ColorIndex = palette().into_iter().collect();
	for c in index.colors() {
		assert_eq!(index.closest(&c), Some(c));
	}
	let target = rgb(1, 2, 3);
	let best = index.closest(&target).unwrap();
	let d = color::distance_squared(&best, &target);
	assert!(index.iter().all(|c| color::distance_squared(&c, &target) >= d));
}

#[test]
fn neighbours_of_absent_keys() {
	let index: ColorIndex = vec![rgb(10, 0, 0), rgb(20, 0, 0), rgb(30, 0, 0)].into_iter().collect();
	assert_eq!(index.successor(&rgb(15, 0, 0)), Some(rgb(20, 0, 0)));
	assert_eq!(index.predecessor(&rgb(15, 0, 0)), Some(rgb(10, 0, 0)));
	assert_eq!(index.successor(&rgb(30, 0, 0)), None);
	assert_eq!(index.predecessor(&rgb(10, 0, 0)), None);
}

#[test]
fn compressed_tree_colors() {
	let img = image::RgbImage::from_fn(6, 6, |x, y| rgb((x / 3 * 100) as u8, (y / 3 * 100) as u8, 0));
	let mut tree = Quadtree::from_source(&img);
	let full = ColorIndex::from_quadtree(&tree);
	// Four image colors plus the white padding of the 8x8 square.
	assert_eq!(full.len(), 5);

	tree.compress_lambda(255.).unwrap();
	let merged = ColorIndex::from_quadtree(&tree);
	assert_eq!(merged.len(), 1);
	assert_eq!(merged.to_text(), format!("({})", rquadtree::Hex(tree.root().color)));

	let text = ColorIndex::from_quadtree_text(&tree.to_text()).unwrap();
	assert_eq!(text.to_text(), merged.to_text());
}

#[test]
fn malformed_tree_text_builds_no_index() {
	for text in &[
		"((( ffffff ) 000000",
		"(ffffff 000000 ffffff)",
		"(ffffff 000000 ffffff 000000))",
		"ffffff 000000",
		"(ffffff 000000 ffffff 000000",
	] {
		assert!(ColorIndex::from_quadtree_text(text).is_err(), "{:?} was accepted", text);
	}
	let index = ColorIndex::from_quadtree_text("(ffffff (000000 000000 000000 0000ff) ffffff ff0000)").unwrap();
	assert_eq!(index.to_text(), "(000000) (0000ff) (ff0000) (ffffff)");
}
