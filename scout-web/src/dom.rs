//! Minimal document-tree interface.
//!
//! The normalizer walks anything implementing [`MarkupNode`]. [`DomNode`] is
//! the owned implementation built from `scraper` output; other parsers can
//! either convert into it or implement the trait directly.

use scraper::node::Node;
use scraper::{ElementRef, Html};

/// What a node is, as far as rendering cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind<'a> {
    Text(&'a str),
    /// Lower-case tag name.
    Element(&'a str),
}

pub trait MarkupNode: Sized {
    fn kind(&self) -> NodeKind<'_>;

    /// Ordered children; text nodes have none.
    fn children(&self) -> &[Self];

    fn attr(&self, name: &str) -> Option<&str>;

    /// Concatenated text of this node and all descendants.
    fn text_content(&self) -> String {
        let mut out = String::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            match node.kind() {
                NodeKind::Text(text) => out.push_str(text),
                NodeKind::Element(_) => stack.extend(node.children().iter().rev()),
            }
        }
        out
    }
}

/// Owned markup tree. Comments, doctypes and processing instructions are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomNode {
    Text(String),
    Element {
        tag: String,
        attrs: Vec<(String, String)>,
        children: Vec<DomNode>,
    },
}

impl DomNode {
    pub fn element(tag: &str, children: Vec<DomNode>) -> Self {
        DomNode::Element {
            tag: tag.to_ascii_lowercase(),
            attrs: Vec::new(),
            children,
        }
    }

    pub fn text(text: &str) -> Self {
        DomNode::Text(text.to_string())
    }

    /// Parse a markup fragment and return its top-level nodes.
    pub fn parse_fragment(html: &str) -> Vec<DomNode> {
        let fragment = Html::parse_fragment(html);
        convert_children(fragment.root_element())
    }

    /// Convert a `scraper` element and its subtree.
    pub fn from_element(el: ElementRef<'_>) -> DomNode {
        let mut pending = Pending::open(el);
        pending.children = convert_children(el);
        pending.close()
    }
}

/// Element whose children are still being converted.
#[derive(Default)]
struct Pending {
    tag: String,
    attrs: Vec<(String, String)>,
    children: Vec<DomNode>,
}

impl Pending {
    fn open(el: ElementRef<'_>) -> Self {
        let value = el.value();
        Pending {
            tag: value.name().to_ascii_lowercase(),
            attrs: value
                .attrs()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            children: Vec::new(),
        }
    }

    fn close(self) -> DomNode {
        DomNode::Element {
            tag: self.tag,
            attrs: self.attrs,
            children: self.children,
        }
    }
}

/// Convert the children of `root` with an explicit stack, so nesting depth
/// is bounded by memory rather than by the thread's stack.
fn convert_children(root: ElementRef<'_>) -> Vec<DomNode> {
    let mut stack = vec![(Pending::default(), root.children())];
    loop {
        let next = match stack.last_mut() {
            Some((_, siblings)) => siblings.next(),
            None => return Vec::new(),
        };

        match next {
            Some(child) => match child.value() {
                Node::Text(text) => {
                    if let Some((parent, _)) = stack.last_mut() {
                        parent.children.push(DomNode::Text(text.text.to_string()));
                    }
                }
                Node::Element(_) => {
                    if let Some(child_el) = ElementRef::wrap(child) {
                        stack.push((Pending::open(child_el), child_el.children()));
                    }
                }
                _ => {}
            },
            None => {
                let Some((done, _)) = stack.pop() else {
                    return Vec::new();
                };
                match stack.last_mut() {
                    Some((parent, _)) => parent.children.push(done.close()),
                    None => return done.children,
                }
            }
        }
    }
}

// Dropping a deep tree field by field would recurse once per level.
impl Drop for DomNode {
    fn drop(&mut self) {
        let DomNode::Element { children, .. } = self else {
            return;
        };
        let mut stack = std::mem::take(children);
        while let Some(mut node) = stack.pop() {
            if let DomNode::Element { children, .. } = &mut node {
                stack.append(children);
            }
        }
    }
}

impl MarkupNode for DomNode {
    fn kind(&self) -> NodeKind<'_> {
        match self {
            DomNode::Text(text) => NodeKind::Text(text),
            DomNode::Element { tag, .. } => NodeKind::Element(tag),
        }
    }

    fn children(&self) -> &[Self] {
        match self {
            DomNode::Text(_) => &[],
            DomNode::Element { children, .. } => children,
        }
    }

    fn attr(&self, name: &str) -> Option<&str> {
        match self {
            DomNode::Text(_) => None,
            DomNode::Element { attrs, .. } => attrs
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(name))
                .map(|(_, v)| v.as_str()),
        }
    }
}
