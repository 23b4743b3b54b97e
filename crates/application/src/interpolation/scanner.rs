//! Placeholder scanner for `${name}` syntax
//!
//! Finds placeholder occurrences in a string together with their byte spans.

use std::iter::FusedIterator;
use std::ops::Range;

const OPEN: &str = "${";
const CLOSE: char = '}';

/// A placeholder occurrence in a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder<'a> {
    /// The property name between `${` and `}`.
    pub name: &'a str,

    /// Byte range of the whole `${name}` token in the scanned string.
    pub span: Range<usize>,
}

/// Lazy iterator over the placeholders of a string, left to right.
///
/// Created by [`scan`]. Occurrences never overlap. An unterminated `${` and
/// an empty `${}` are not placeholders and stay literal text.
#[derive(Debug, Clone)]
pub struct Placeholders<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Iterator for Placeholders<'a> {
    type Item = Placeholder<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let start = self.pos + self.input.get(self.pos..)?.find(OPEN)?;
            let name_start = start + OPEN.len();

            let Some(len) = self.input[name_start..].find(CLOSE) else {
                // No closing brace anywhere after this point
                self.pos = self.input.len();
                return None;
            };

            if len == 0 {
                // `${}`: resume right after the opening delimiter
                self.pos = name_start;
                continue;
            }

            let end = name_start + len + CLOSE.len_utf8();
            self.pos = end;
            return Some(Placeholder {
                name: &self.input[name_start..name_start + len],
                span: start..end,
            });
        }
    }
}

impl FusedIterator for Placeholders<'_> {}

/// Scans a string for `${name}` placeholders.
///
/// # Examples
///
/// ```
/// use deployable_application::interpolation::scan;
///
/// let found: Vec<_> = scan("1.0.0-${revision}${changelist}").collect();
/// assert_eq!(found.len(), 2);
/// assert_eq!(found[0].name, "revision");
/// assert_eq!(found[0].span, 6..17);
/// assert_eq!(found[1].name, "changelist");
/// ```
#[must_use]
pub const fn scan(input: &str) -> Placeholders<'_> {
    Placeholders { input, pos: 0 }
}

/// Returns true if the input contains at least one placeholder.
#[must_use]
pub fn has_placeholders(input: &str) -> bool {
    scan(input).next().is_some()
}

/// Extracts just the placeholder names, in order of appearance.
#[must_use]
pub fn placeholder_names(input: &str) -> Vec<&str> {
    scan(input).map(|p| p.name).collect()
}
