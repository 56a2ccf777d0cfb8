//! Comparison of an original image with its compressed rendering.

use std::io;
use std::path::Path;

use crate::node::error::MetricsError;
use crate::node::image::PixelSource;

/// Mean squared error between two grids, as a percentage.
///
/// Channels are normalized to `[0, 1]` before differencing, so identical
/// grids give 0 and black against white gives 100.
pub fn mean_squared_error<A, B>(a: &A, b: &B) -> Result<f64, MetricsError>
where
	A: PixelSource + ?Sized,
	B: PixelSource + ?Sized,
{
	let (dims_a, dims_b) = ((a.width(), a.height()), (b.width(), b.height()));
	if dims_a != dims_b {
		return Err(MetricsError::DimensionMismatch(dims_a, dims_b));
	}
	let samples = dims_a.0 as u64 * dims_a.1 as u64 * 3;
	if samples == 0 {
		return Ok(0.);
	}
	let mut sum = 0.;
	for y in 0..dims_a.1 {
		for x in 0..dims_a.0 {
			let (pa, pb) = (a.pixel(x, y), b.pixel(x, y));
			for (ca, cb) in pa.0.iter().zip(pb.0.iter()) {
				let d = (*ca as f64 - *cb as f64) / 255.;
				sum += d * d;
			}
		}
	}
	Ok(100. * sum / samples as f64)
}

/// Size of `compressed` relative to `original`, as a percentage.
pub fn size_ratio<P: AsRef<Path>, Q: AsRef<Path>>(original: P, compressed: Q) -> io::Result<f64> {
	let original = std::fs::metadata(original)?.len();
	let compressed = std::fs::metadata(compressed)?.len();
	if original == 0 {
		return Err(io::Error::new(io::ErrorKind::InvalidData, "original file is empty"));
	}
	Ok(100. * compressed as f64 / original as f64)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn identical_grids_have_no_error() {
		let img = image::RgbImage::from_fn(3, 2, |x, y| image::Rgb([x as u8, y as u8, 9]));
		assert_eq!(mean_squared_error(&img, &img), Ok(0.));
	}

	#[test]
	fn black_against_white_is_full_error() {
		let black = image::RgbImage::new(2, 2);
		let white = image::RgbImage::from_pixel(2, 2, image::Rgb([255, 255, 255]));
		assert!((mean_squared_error(&black, &white).unwrap() - 100.).abs() < 1e-9);
	}

	#[test]
	fn dimensions_must_match() {
		let a = image::RgbImage::new(2, 2);
		let b = image::RgbImage::new(2, 3);
		assert_eq!(
			mean_squared_error(&a, &b),
			Err(MetricsError::DimensionMismatch((2, 2), (2, 3)))
		);
	}
}
