use thiserror::Error;

/// Reason why a compression pass was refused.
///
/// A refused pass never touches the tree.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompressError {
	/// Lambda must lie in `[0, 255]`.
	#[error("lambda must be between 0 and 255, got {0}")]
	LambdaOutOfRange(f64),
	/// Phi is a leaf budget and must be at least one.
	#[error("phi must be greater than 0")]
	PhiNotPositive,
	/// The channel threshold must lie in `[0, 255]`.
	#[error("color threshold must be between 0 and 255, got {0}")]
	ThresholdOutOfRange(i32),
}

/// Reason why a point query on a quadtree failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
	/// The coordinate lies outside the original image.
	#[error("pixel ({x}, {y}) is outside the {width}x{height} image")]
	OutOfBounds { x: u32, y: u32, width: u32, height: u32 },
}

/// Reason why a hex color code couldn't be read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseColorError {
	/// Not exactly six hexadecimal digits.
	#[error("invalid hex color code {0:?}")]
	InvalidHex(String),
}

/// Reason why a serialized quadtree couldn't be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
	/// The text ended while a node was still expected.
	#[error("unexpected end of input")]
	UnexpectedEnd,
	/// A `)` closed a group that had no matching `(`.
	#[error("unmatched ')' at token {0}")]
	UnmatchedClose(usize),
	/// An internal node did not have exactly four children.
	#[error("internal node at token {at} has {found} children instead of 4")]
	WrongArity { at: usize, found: usize },
	/// A leaf token was not a hex color code.
	#[error("token {at}: {source}")]
	BadLeaf { at: usize, source: ParseColorError },
	/// The nesting splits a region below a single pixel.
	#[error("node at token {0} subdivides a single pixel")]
	TooDeep(usize),
	/// Input continued after the root node was complete.
	#[error("trailing input at token {0}")]
	Trailing(usize),
	/// No power-of-two square of `u32` side holds the stated dimensions.
	#[error("a {width}x{height} image is too large for a quadtree")]
	TooLarge { width: u32, height: u32 },
}

/// Reason why two pixel grids couldn't be compared.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetricsError {
	/// The grids do not have the same dimensions.
	#[error("dimension mismatch: {0:?} vs {1:?}")]
	DimensionMismatch((u32, u32), (u32, u32)),
}
