use crate::color::Color;

/// Read access to a rectangular grid of colors.
///
/// `pixel` is only ever called with `x < width()` and `y < height()`.
pub trait PixelSource {
	fn width(&self) -> u32;
	fn height(&self) -> u32;
	fn pixel(&self, x: u32, y: u32) -> Color;
}

impl PixelSource for image::RgbImage {
	fn width(&self) -> u32 {
		self.dimensions().0
	}
	fn height(&self) -> u32 {
		self.dimensions().1
	}
	fn pixel(&self, x: u32, y: u32) -> Color {
		*self.get_pixel(x, y)
	}
}

/// Alpha is dropped; the quadtree only deals in opaque colors.
impl PixelSource for image::RgbaImage {
	fn width(&self) -> u32 {
		self.dimensions().0
	}
	fn height(&self) -> u32 {
		self.dimensions().1
	}
	fn pixel(&self, x: u32, y: u32) -> Color {
		let [r, g, b, _] = self.get_pixel(x, y).0;
		image::Rgb([r, g, b])
	}
}

impl super::QuadtreeNode {
	/// Paints this node's leaves into the supplied buffer.
	///
	/// Every leaf fills its whole square, clipped to the buffer; the
	/// subnodes are visited in NO, NE, SE, SO order.
	pub fn to_image(&self, img: &mut image::RgbImage) {
		match self.sections {
			Some(ref sects) => sects.iter().for_each(|s| s.to_image(img)),
			None => {
				let (width, height) = img.dimensions();
				let x_end = std::cmp::min(self.x.saturating_add(self.size), width);
				let y_end = std::cmp::min(self.y.saturating_add(self.size), height);
				for row in self.y..y_end {
					for col in self.x..x_end {
						img.put_pixel(col, row, self.color);
					}
				}
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use crate::node::QuadtreeNode;

	use super::PixelSource;

	#[test]
	fn rgba_drops_alpha() {
		let img = image::RgbaImage::from_pixel(1, 1, image::Rgba([1, 2, 3, 4]));
		assert_eq!(img.pixel(0, 0), image::Rgb([1, 2, 3]));
		assert_eq!((PixelSource::width(&img), PixelSource::height(&img)), (1, 1));
	}

	#[test]
	fn padding_is_clipped() {
		let src = image::RgbImage::from_fn(3, 2, |x, _| image::Rgb([x as u8 * 50, 0, 0]));
		let node = QuadtreeNode::build(&src, 0, 0, 4);
		let mut out = image::RgbImage::new(3, 2);
		node.to_image(&mut out);
		assert_eq!(out, src);
	}
}
