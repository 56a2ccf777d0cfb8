use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::ParseColorError;

/// An opaque RGB color, as stored in quadtree leaves and in the color index.
pub type Color = image::Rgb<u8>;

/// Background color of the padding around images that are not power-of-two squares.
pub const WHITE: Color = image::Rgb([0xff, 0xff, 0xff]);

/// Luminance of `WHITE`.
pub const WHITE_LUMINANCE: f64 = 1.0;

/// Perceptual weight of each channel in the luminance of a color.
const LUMA_WEIGHTS: [f64; 3] = [0.2126, 0.7152, 0.0722];

/// Perceptual brightness of a color, in `[0, 1]`.
pub fn luminance(c: &Color) -> f64 {
	c.0.iter()
		.zip(LUMA_WEIGHTS.iter())
		.map(|(&ch, w)| w * (ch as f64 / 255.))
		.sum()
}

/// Lexicographic order on (R, G, B).
///
/// `image::Rgb` has no `Ord` of its own; this is the one order used by
/// the color index for every comparison.
pub fn key_cmp(a: &Color, b: &Color) -> Ordering {
	a.0.cmp(&b.0)
}

fn abs_sub(a: u8, b: u8) -> u8 {
	(a as i16 - b as i16).abs() as u8
}

/// Largest absolute difference between two colors over any single channel.
pub fn channel_distance(a: &Color, b: &Color) -> u8 {
	a.0.iter()
		.zip(b.0.iter())
		.map(|(&x, &y)| abs_sub(x, y))
		.max()
		.unwrap_or(0)
}

/// Squared Euclidean distance between two colors in RGB space.
pub fn distance_squared(a: &Color, b: &Color) -> u32 {
	a.0.iter()
		.zip(b.0.iter())
		.map(|(&x, &y)| {
			let d = abs_sub(x, y) as u32;
			d * d
		})
		.sum()
}

/// Unweighted mean of four colors, truncated per channel.
pub fn average(colors: [&Color; 4]) -> Color {
	let mut sum = [0u32; 3];
	for c in colors.iter() {
		for (s, &ch) in sum.iter_mut().zip(c.0.iter()) {
			*s += ch as u32;
		}
	}
	image::Rgb([(sum[0] / 4) as u8, (sum[1] / 4) as u8, (sum[2] / 4) as u8])
}

/// Six lowercase hex digits, two per channel, in R, G, B order.
pub fn to_hex(c: &Color) -> String {
	Hex(*c).to_string()
}

/// Parses six hex digits (either case) into a color.
pub fn from_hex(s: &str) -> Result<Color, ParseColorError> {
	s.parse::<Hex>().map(|h| h.0)
}

/// Wrapper giving a `Color` its canonical hex text form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Hex(pub Color);

impl fmt::Display for Hex {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let [r, g, b] = (self.0).0;
		write!(f, "{:02x}{:02x}{:02x}", r, g, b)
	}
}

impl FromStr for Hex {
	type Err = ParseColorError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		if s.len() != 6 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
			return Err(ParseColorError::InvalidHex(s.to_owned()));
		}
		let mut ch = [0u8; 3];
		for (i, c) in ch.iter_mut().enumerate() {
			*c = u8::from_str_radix(&s[2 * i..2 * i + 2], 16)
				.map_err(|_| ParseColorError::InvalidHex(s.to_owned()))?;
		}
		Ok(Hex(image::Rgb(ch)))
	}
}
