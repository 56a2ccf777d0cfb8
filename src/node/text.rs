use std::convert::TryFrom;
use std::fmt;

use super::error::ParseError;
use super::{QuadtreeNode, QUADRANTS};
use crate::color::{Color, Hex};

/// One lexical unit of the text form.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Token<'a> {
	Open,
	Close,
	Leaf(&'a str),
}

/// Splits on whitespace, treating each parenthesis as a token of its own,
/// so both `(a b c d)` and `( a b c d )` read the same.
fn tokenize(text: &str) -> Vec<Token<'_>> {
	let mut tokens = Vec::new();
	for word in text.split_whitespace() {
		let mut rest = word;
		while !rest.is_empty() {
			match rest.find(|c: char| c == '(' || c == ')') {
				Some(0) => {
					tokens.push(if rest.starts_with('(') { Token::Open } else { Token::Close });
					rest = &rest[1..];
				}
				Some(i) => {
					tokens.push(Token::Leaf(&rest[..i]));
					rest = &rest[i..];
				}
				None => {
					tokens.push(Token::Leaf(rest));
					rest = "";
				}
			}
		}
	}
	tokens
}

/// Recursive descent over the token stream, tracking the square each
/// node covers.
struct Parser<'a> {
	tokens: Vec<Token<'a>>,
	pos: usize,
}

impl<'a> Parser<'a> {
	fn node(&mut self, x: u32, y: u32, size: u32) -> Result<QuadtreeNode, ParseError> {
		let at = self.pos;
		match self.tokens.get(at).copied() {
			None => Err(ParseError::UnexpectedEnd),
			Some(Token::Close) => Err(ParseError::UnmatchedClose(at)),
			Some(Token::Leaf(word)) => {
				self.pos += 1;
				let Hex(c) = word.parse::<Hex>()
					.map_err(|source| ParseError::BadLeaf { at, source })?;
				Ok(QuadtreeNode::leaf(x, y, size, c))
			}
			Some(Token::Open) => {
				if size == 1 {
					return Err(ParseError::TooDeep(at));
				}
				self.pos += 1;
				let half = size / 2;
				let mut sects = Vec::with_capacity(4);
				loop {
					match self.tokens.get(self.pos).copied() {
						None => return Err(ParseError::UnexpectedEnd),
						Some(Token::Close) => {
							self.pos += 1;
							break;
						}
						Some(_) if sects.len() == 4 => {
							return Err(ParseError::WrongArity { at, found: 5 });
						}
						Some(_) => {
							let (qx, qy) = QUADRANTS[sects.len()];
							sects.push(self.node(x + qx * half, y + qy * half, half)?);
						}
					}
				}
				let found = sects.len();
				let sects = <[QuadtreeNode; 4]>::try_from(sects)
					.map_err(|_| ParseError::WrongArity { at, found })?;
				Ok(QuadtreeNode::branch(x, y, size, sects))
			}
		}
	}
}

impl QuadtreeNode {
	/// Parses the text form of a tree covering the square `[0, size)²`.
	///
	/// Averages of rebuilt branches are recomputed from their leaves.
	pub fn from_text(text: &str, size: u32) -> Result<Self, ParseError> {
		let mut parser = Parser { tokens: tokenize(text), pos: 0 };
		let root = parser.node(0, 0, size)?;
		if parser.pos < parser.tokens.len() {
			return Err(ParseError::Trailing(parser.pos));
		}
		Ok(root)
	}

	fn write_text(&self, f: &mut fmt::Formatter<'_>, style: Style) -> fmt::Result {
		let sects = match self.sections {
			Some(ref sects) => sects,
			None if style == Style::Sized => return write!(f, "{}:{}", Hex(self.color), self.size),
			None => return write!(f, "{}", Hex(self.color)),
		};
		match style {
			Style::Nested | Style::Sized => f.write_str("(")?,
			Style::Prefix => f.write_str("[ ")?,
			Style::Suffix => (),
		}
		for (i, s) in sects.iter().enumerate() {
			if i > 0 {
				f.write_str(" ")?;
			}
			s.write_text(f, style)?;
		}
		match style {
			Style::Nested | Style::Sized => f.write_str(")"),
			Style::Prefix => f.write_str(" ]"),
			Style::Suffix => f.write_str(" >"),
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Style {
	Nested,
	Sized,
	Prefix,
	Suffix,
}

/// Leaves print as their hex code, branches as `(` + four children + `)`.
impl fmt::Display for QuadtreeNode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		self.write_text(f, Style::Nested)
	}
}

/// Text form with every leaf annotated by its side length, as `hex:size`.
#[derive(Clone, Copy, Debug)]
pub struct WithSizes<'a>(pub &'a QuadtreeNode);

impl fmt::Display for WithSizes<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		self.0.write_text(f, Style::Sized)
	}
}

/// Pre-order listing: a branch opens with `[` before its children and
/// closes with `]`, e.g. `[ a b c d ]`.
#[derive(Clone, Copy, Debug)]
pub struct Prefix<'a>(pub &'a QuadtreeNode);

impl fmt::Display for Prefix<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		self.0.write_text(f, Style::Prefix)
	}
}

/// Post-order listing: a branch is written as `>` after its children,
/// e.g. `a b c d >`.
#[derive(Clone, Copy, Debug)]
pub struct Suffix<'a>(pub &'a QuadtreeNode);

impl fmt::Display for Suffix<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		self.0.write_text(f, Style::Suffix)
	}
}

/// Every leaf color of a serialized tree, in text order.
///
/// The nesting is checked as well: every group must hold exactly four
/// children and nothing may follow the root. Only the region sizes are
/// not, since the text carries no dimensions.
pub fn leaf_colors(text: &str) -> Result<Vec<Color>, ParseError> {
	let tokens = tokenize(text);
	let mut colors = Vec::new();
	// Position of each open `(` and the children it has so far.
	let mut open: Vec<(usize, usize)> = Vec::new();
	let mut done = false;
	for (at, t) in tokens.into_iter().enumerate() {
		if done {
			return Err(ParseError::Trailing(at));
		}
		let completed = match t {
			Token::Open => {
				open.push((at, 0));
				false
			}
			Token::Close => {
				let (start, found) = open.pop().ok_or(ParseError::UnmatchedClose(at))?;
				if found != 4 {
					return Err(ParseError::WrongArity { at: start, found });
				}
				true
			}
			Token::Leaf(word) => {
				let Hex(c) = word.parse::<Hex>()
					.map_err(|source| ParseError::BadLeaf { at, source })?;
				colors.push(c);
				true
			}
		};
		if completed {
			match open.last_mut() {
				Some(parent) => parent.1 += 1,
				None => done = true,
			}
		}
	}
	if !done {
		return Err(ParseError::UnexpectedEnd);
	}
	Ok(colors)
}
