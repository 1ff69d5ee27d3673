//! State shared by every node: source position and original text.

use std::fmt;
use std::sync::{Arc, OnceLock};

use super::span::Span;
use super::visitor::Visitor;
use crate::charset::Encoding;

/// The source text of a node and its lazily decoded UTF-8 form.
///
/// The raw bytes are kept in the client charset. [`NodeText::text`]
/// decodes them once; concurrent first calls agree on one result.
#[derive(Clone, Default)]
pub struct NodeText {
    raw: Vec<u8>,
    encoding: Option<Arc<dyn Encoding>>,
    utf8: OnceLock<String>,
}

impl NodeText {
    /// Creates a text decoded with `encoding`, or taken verbatim without one.
    pub fn new(encoding: Option<Arc<dyn Encoding>>, raw: impl Into<Vec<u8>>) -> Self {
        Self {
            raw: raw.into(),
            encoding,
            utf8: OnceLock::new(),
        }
    }

    /// The text as UTF-8.
    pub fn text(&self) -> &str {
        self.utf8.get_or_init(|| match &self.encoding {
            Some(enc) => enc.decode(&self.raw).into_owned(),
            None => String::from_utf8_lossy(&self.raw).into_owned(),
        })
    }

    /// The raw bytes as they appeared in the statement.
    #[must_use]
    pub fn original_text(&self) -> &[u8] {
        &self.raw
    }

    /// Returns true once [`NodeText::text`] has been computed.
    #[must_use]
    pub fn is_decoded(&self) -> bool {
        self.utf8.get().is_some()
    }
}

impl fmt::Debug for NodeText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeText")
            .field("raw", &String::from_utf8_lossy(&self.raw))
            .field("encoding", &self.encoding.as_ref().map(|e| e.name().to_string()))
            .finish()
    }
}

impl PartialEq for NodeText {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

/// Position and text of a node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeBase {
    /// Where the node sits in its statement.
    pub span: Span,
    text: NodeText,
}

impl NodeBase {
    /// Sets the original text. The decode cache starts empty.
    pub fn set_text(&mut self, encoding: Option<Arc<dyn Encoding>>, text: impl Into<Vec<u8>>) {
        self.text = NodeText::new(encoding, text);
    }

    /// The original text as UTF-8.
    pub fn text(&self) -> &str {
        self.text.text()
    }

    /// The original text as raw bytes.
    #[must_use]
    pub fn original_text(&self) -> &[u8] {
        self.text.original_text()
    }

    /// The shared text state.
    #[must_use]
    pub const fn node_text(&self) -> &NodeText {
        &self.text
    }

    /// Offset of the node in its statement.
    #[must_use]
    pub const fn origin_text_position(&self) -> usize {
        self.span.start
    }

    /// Moves the node to `offset`, keeping its length.
    pub fn set_origin_text_position(&mut self, offset: usize) {
        self.span = Span::new(offset, offset + self.span.len());
    }
}

/// An AST node.
pub trait Node {
    /// Shared node state.
    fn base(&self) -> &NodeBase;

    /// Shared node state, mutably.
    fn base_mut(&mut self) -> &mut NodeBase;

    /// Walks the node with `visitor`. Returns false when the visitor
    /// stopped the walk.
    fn accept<V: Visitor + ?Sized>(&mut self, visitor: &mut V) -> bool;

    /// The original text as UTF-8.
    fn text(&self) -> &str {
        self.base().text()
    }

    /// Sets the original text.
    fn set_text(&mut self, encoding: Option<Arc<dyn Encoding>>, text: &[u8]) {
        self.base_mut().set_text(encoding, text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charset::find_encoding;

    #[test]
    fn test_text_verbatim_without_encoding() {
        let text = NodeText::new(None, "select 1");
        assert!(!text.is_decoded());
        assert_eq!(text.text(), "select 1");
        assert!(text.is_decoded());
        assert_eq!(text.original_text(), b"select 1");
    }

    #[test]
    fn test_text_decoded_once() {
        let latin1 = find_encoding("latin1");
        let text = NodeText::new(latin1, vec![b'c', b'a', b'f', 0xe9]);
        assert_eq!(text.text(), "caf\u{e9}");
        let first = text.text().as_ptr();
        assert_eq!(text.text().as_ptr(), first);
        assert_eq!(text.original_text(), &[b'c', b'a', b'f', 0xe9]);
    }

    #[test]
    fn test_set_text_resets_cache() {
        let mut base = NodeBase::default();
        base.set_text(None, "a");
        assert_eq!(base.text(), "a");
        base.set_text(None, "b");
        assert!(!base.node_text().is_decoded());
        assert_eq!(base.text(), "b");
    }

    #[test]
    fn test_origin_position() {
        let mut base = NodeBase {
            span: Span::new(0, 3),
            ..NodeBase::default()
        };
        base.set_origin_text_position(7);
        assert_eq!(base.origin_text_position(), 7);
        assert_eq!(base.span, Span::new(7, 10));
    }
}
