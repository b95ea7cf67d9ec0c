// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Selector strings and selector predicates for element matching.
//!
//! This module intentionally stays small: selectors are single-element
//! ("compound") predicates joined into comma-separated lists. Combinators
//! (descendant, child, sibling) are rejected at parse time.
//!
//! ```
//! use tvnav_dom::{Element, SelectorList};
//!
//! let list: SelectorList = "button.primary, [data-tile]".parse().unwrap();
//! assert!(list.matches(&Element::new("button").with_class("primary")));
//! assert!(list.matches(&Element::new("div").with_attribute("data-tile", "")));
//! assert!(!list.matches(&Element::new("button")));
//! ```

use alloc::string::String;
use alloc::vec::Vec;
use core::str::FromStr;

use crate::element::{ClassList, Element};

/// Error returned when a selector string cannot be parsed.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    /// The selector (or one entry of a list) is empty.
    #[error("empty selector at offset {offset}")]
    Empty {
        /// Byte offset where a selector was expected.
        offset: usize,
    },
    /// A character that cannot start or continue a selector.
    #[error("unexpected character {ch:?} at offset {offset}")]
    UnexpectedChar {
        /// The offending character.
        ch: char,
        /// Byte offset of the character.
        offset: usize,
    },
    /// An identifier was required (after `#`, `.`, or `[`).
    #[error("expected an identifier at offset {offset}")]
    ExpectedIdent {
        /// Byte offset where the identifier was expected.
        offset: usize,
    },
    /// An attribute selector or quoted value was not closed.
    #[error("unterminated attribute selector starting at offset {offset}")]
    UnterminatedAttribute {
        /// Byte offset of the opening `[`.
        offset: usize,
    },
    /// Combinators are not supported.
    #[error("combinators are not supported (offset {offset})")]
    UnsupportedCombinator {
        /// Byte offset of the combinator.
        offset: usize,
    },
}

/// An attribute predicate: presence, or exact value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttributeMatch {
    /// Attribute name.
    pub name: String,
    /// Required value; `None` only tests presence.
    pub value: Option<String>,
}

/// A compound selector predicate over a single [`Element`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selector {
    /// Required tag; `None` matches any tag.
    pub tag: Option<String>,
    /// Required id.
    pub id: Option<String>,
    /// Required classes.
    pub classes: ClassList,
    /// Required attributes.
    pub attributes: Vec<AttributeMatch>,
}

impl Selector {
    /// Returns `true` if this selector matches `element`.
    #[must_use]
    pub fn matches(&self, element: &Element) -> bool {
        if let Some(tag) = &self.tag
            && tag != element.tag()
        {
            return false;
        }
        if let Some(id) = &self.id
            && element.id() != Some(id.as_str())
        {
            return false;
        }
        self.classes.is_subset_of(element.classes())
            && self.attributes.iter().all(|a| match &a.value {
                None => element.attribute(&a.name).is_some(),
                Some(v) => element.attribute(&a.name) == Some(v.as_str()),
            })
    }
}

/// A comma-separated list of [`Selector`]s; matches when any entry does.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectorList(Vec<Selector>);

impl SelectorList {
    /// Returns `true` if any selector in the list matches `element`.
    #[must_use]
    pub fn matches(&self, element: &Element) -> bool {
        self.0.iter().any(|s| s.matches(element))
    }

    /// Returns the selectors in source order.
    #[must_use]
    pub fn selectors(&self) -> &[Selector] {
        &self.0
    }
}

impl FromStr for SelectorList {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Parser::new(s).parse_list().map(Self)
    }
}

impl FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut list = Parser::new(s).parse_list()?;
        if list.len() != 1 {
            return Err(SelectorError::UnexpectedChar {
                ch: ',',
                offset: s.find(',').unwrap_or(0),
            });
        }
        Ok(list.remove(0))
    }
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_ws(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
        self.pos != start
    }

    fn parse_list(&mut self) -> Result<Vec<Selector>, SelectorError> {
        let mut out = Vec::new();
        loop {
            self.skip_ws();
            out.push(self.parse_compound()?);
            let skipped = self.skip_ws();
            match self.peek() {
                None => return Ok(out),
                Some(',') => {
                    self.bump();
                }
                Some('>' | '+' | '~') => {
                    return Err(SelectorError::UnsupportedCombinator { offset: self.pos });
                }
                Some(c) if skipped && starts_compound(c) => {
                    return Err(SelectorError::UnsupportedCombinator { offset: self.pos });
                }
                Some(ch) => return Err(SelectorError::UnexpectedChar { ch, offset: self.pos }),
            }
        }
    }

    fn parse_compound(&mut self) -> Result<Selector, SelectorError> {
        let start = self.pos;
        let mut selector = Selector::default();
        let mut classes = Vec::new();

        match self.peek() {
            Some('*') => {
                self.bump();
            }
            Some(c) if is_ident_char(c) => {
                selector.tag = Some(self.ident()?.to_ascii_lowercase());
            }
            _ => {}
        }

        loop {
            match self.peek() {
                Some('#') => {
                    self.bump();
                    selector.id = Some(String::from(self.ident()?));
                }
                Some('.') => {
                    self.bump();
                    classes.push(String::from(self.ident()?));
                }
                Some('[') => {
                    let open = self.pos;
                    self.bump();
                    selector.attributes.push(self.attribute(open)?);
                }
                _ => break,
            }
        }

        if self.pos == start {
            return match self.peek() {
                None | Some(',') => Err(SelectorError::Empty { offset: start }),
                Some(ch) => Err(SelectorError::UnexpectedChar { ch, offset: start }),
            };
        }
        selector.classes = ClassList::from_names(classes);
        Ok(selector)
    }

    fn attribute(&mut self, open: usize) -> Result<AttributeMatch, SelectorError> {
        self.skip_ws();
        let name = String::from(self.ident()?);
        self.skip_ws();
        let value = if self.peek() == Some('=') {
            self.bump();
            self.skip_ws();
            let v = match self.peek() {
                Some(q @ ('"' | '\'')) => {
                    self.bump();
                    let begin = self.pos;
                    loop {
                        match self.bump() {
                            Some(c) if c == q => break,
                            Some(_) => {}
                            None => return Err(SelectorError::UnterminatedAttribute { offset: open }),
                        }
                    }
                    String::from(&self.src[begin..self.pos - q.len_utf8()])
                }
                _ => String::from(self.ident()?),
            };
            self.skip_ws();
            Some(v)
        } else {
            None
        };
        match self.bump() {
            Some(']') => Ok(AttributeMatch { name, value }),
            _ => Err(SelectorError::UnterminatedAttribute { offset: open }),
        }
    }

    fn ident(&mut self) -> Result<&'a str, SelectorError> {
        let start = self.pos;
        while self.peek().is_some_and(is_ident_char) {
            self.bump();
        }
        if self.pos == start {
            Err(SelectorError::ExpectedIdent { offset: start })
        } else {
            Ok(&self.src[start..self.pos])
        }
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

fn starts_compound(c: char) -> bool {
    is_ident_char(c) || matches!(c, '*' | '#' | '.' | '[')
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn parse(s: &str) -> SelectorList {
        s.parse().unwrap()
    }

    #[test]
    fn parses_compound_parts() {
        let list = parse("Button#play.tile.hero[data-row=\"2\"][hidden]");
        let s = &list.selectors()[0];
        assert_eq!(s.tag.as_deref(), Some("button"));
        assert_eq!(s.id.as_deref(), Some("play"));
        assert_eq!(s.classes.as_slice(), &["hero", "tile"]);
        assert_eq!(
            s.attributes,
            vec![
                AttributeMatch {
                    name: "data-row".into(),
                    value: Some("2".into()),
                },
                AttributeMatch {
                    name: "hidden".into(),
                    value: None,
                },
            ]
        );
    }

    #[test]
    fn parses_lists_with_whitespace() {
        let list = parse("  .a ,#b,  * ");
        assert_eq!(list.selectors().len(), 3);
        assert_eq!(list.selectors()[2], Selector::default());
    }

    #[test]
    fn matches_by_parts() {
        let el = Element::new("div")
            .with_id("menu")
            .with_class("tile")
            .with_attribute("data-kind", "movie");
        assert!(parse("#menu").matches(&el));
        assert!(parse("div.tile").matches(&el));
        assert!(parse("[data-kind=movie]").matches(&el));
        assert!(parse("[data-kind='movie']").matches(&el));
        assert!(!parse("[data-kind=show]").matches(&el));
        assert!(!parse("span.tile").matches(&el));
        assert!(!parse(".tile.hero").matches(&el));
        assert!(parse("*").matches(&el));
    }

    #[test]
    fn rejects_malformed_input() {
        assert_eq!(
            "".parse::<SelectorList>(),
            Err(SelectorError::Empty { offset: 0 })
        );
        assert_eq!(
            "a,,b".parse::<SelectorList>(),
            Err(SelectorError::Empty { offset: 2 })
        );
        assert_eq!(
            "#".parse::<SelectorList>(),
            Err(SelectorError::ExpectedIdent { offset: 1 })
        );
        assert_eq!(
            "[x=1".parse::<SelectorList>(),
            Err(SelectorError::UnterminatedAttribute { offset: 0 })
        );
        assert_eq!(
            "[x='1]".parse::<SelectorList>(),
            Err(SelectorError::UnterminatedAttribute { offset: 0 })
        );
        assert_eq!(
            "div > a".parse::<SelectorList>(),
            Err(SelectorError::UnsupportedCombinator { offset: 4 })
        );
        assert_eq!(
            "div a".parse::<SelectorList>(),
            Err(SelectorError::UnsupportedCombinator { offset: 4 })
        );
        assert_eq!(
            "div!".parse::<SelectorList>(),
            Err(SelectorError::UnexpectedChar { ch: '!', offset: 3 })
        );
    }

    #[test]
    fn single_selector_rejects_lists() {
        assert!(".a".parse::<Selector>().is_ok());
        assert!(".a, .b".parse::<Selector>().is_err());
    }
}
