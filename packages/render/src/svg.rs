//! Minimal SVG element tree.
//!
//! Elements keep attributes in insertion order so serialized output is
//! stable across renders.

use std::fmt::Write as _;

/// A child of an [`Element`].
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Nested element.
    Element(Element),
    /// Escaped character data.
    Text(String),
}

/// One SVG element with attributes and children.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    name: String,
    attrs: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    /// Creates an empty element.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Element name, e.g. `path`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sets attribute `key`, replacing any previous value.
    #[must_use]
    pub fn attr(mut self, key: &str, value: impl Into<String>) -> Self {
        self.set_attr(key, value);
        self
    }

    /// Sets a numeric attribute, formatted with [`num`].
    #[must_use]
    pub fn attr_num(self, key: &str, value: f64) -> Self {
        self.attr(key, num(value))
    }

    /// Sets attribute `key` in place.
    pub fn set_attr(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attrs.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => *v = value,
            None => self.attrs.push((key.to_string(), value)),
        }
    }

    /// Returns attribute `key`.
    #[must_use]
    pub fn get_attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Appends a child element.
    #[must_use]
    pub fn child(mut self, child: Self) -> Self {
        self.push(child);
        self
    }

    /// Appends text content.
    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    /// Appends a child element in place.
    pub fn push(&mut self, child: Self) {
        self.children.push(Node::Element(child));
    }

    /// Children in document order.
    #[must_use]
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Child elements in document order, skipping text.
    pub fn elements(&self) -> impl Iterator<Item = &Self> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        })
    }

    /// Concatenated text content of the direct children.
    #[must_use]
    pub fn text_content(&self) -> String {
        self.children
            .iter()
            .filter_map(|node| match node {
                Node::Text(t) => Some(t.as_str()),
                Node::Element(_) => None,
            })
            .collect()
    }

    /// Depth-first search for the element with `id`, including `self`.
    #[must_use]
    pub fn find_by_id(&self, id: &str) -> Option<&Self> {
        if self.get_attr("id") == Some(id) {
            return Some(self);
        }
        self.elements().find_map(|e| e.find_by_id(id))
    }

    /// Inserts `child` before the direct child with `id`, or appends it
    /// when there is none.
    pub fn insert_before(&mut self, id: &str, child: Self) {
        let position = self.children.iter().position(|node| {
            matches!(node, Node::Element(e) if e.get_attr("id") == Some(id))
        });
        match position {
            Some(i) => self.children.insert(i, Node::Element(child)),
            None => self.push(child),
        }
    }

    /// Serializes the element and its subtree into `out`.
    pub fn write_to(&self, out: &mut String) {
        let _ = write!(out, "<{}", self.name);
        for (key, value) in &self.attrs {
            let _ = write!(out, " {key}=\"{}\"", escape(value));
        }
        if self.children.is_empty() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        for node in &self.children {
            match node {
                Node::Element(e) => e.write_to(out),
                Node::Text(t) => out.push_str(&escape(t)),
            }
        }
        let _ = write!(out, "</{}>", self.name);
    }

    /// Serializes the element and its subtree.
    #[must_use]
    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        self.write_to(&mut out);
        out
    }
}

/// Escapes XML special characters for text and attribute values.
#[must_use]
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Formats a coordinate or length with at most three decimals and no
/// trailing zeros.
#[must_use]
pub fn num(value: f64) -> String {
    if !value.is_finite() {
        return format!("{value}");
    }
    let mut s = format!("{value:.3}");
    while s.contains('.') && s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }
    if s == "-0" {
        s = "0".to_string();
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn num_trims_and_rounds() {
        assert_eq!(num(1.0), "1");
        assert_eq!(num(1.25), "1.25");
        assert_eq!(num(2.0 / 3.0), "0.667");
        assert_eq!(num(-0.0001), "0");
        assert_eq!(num(-12.5), "-12.5");
    }

    #[test]
    fn writes_nested_markup_with_escaping() {
        let root = Element::new("g")
            .attr("id", "labels")
            .child(Element::new("text").attr_num("x", 3.5).text("A & B <C>"))
            .child(Element::new("rect").attr("fill", "\"none\""));

        assert_eq!(
            root.to_markup(),
            "<g id=\"labels\"><text x=\"3.5\">A &amp; B &lt;C&gt;</text><rect fill=\"&quot;none&quot;\"/></g>"
        );
    }

    #[test]
    fn set_attr_replaces_in_place() {
        let e = Element::new("path").attr("d", "M0,0").attr("fill", "red").attr("d", "M1,1");
        assert_eq!(e.get_attr("d"), Some("M1,1"));
        assert_eq!(e.to_markup(), "<path d=\"M1,1\" fill=\"red\"/>");
    }

    #[test]
    fn insert_before_and_find() {
        let mut g = Element::new("g")
            .child(Element::new("g").attr("id", "land"))
            .child(Element::new("g").attr("id", "county-boundaries"));
        g.insert_before("county-boundaries", Element::new("g").attr("id", "tracts"));
        g.insert_before("missing", Element::new("rect").attr("id", "map-frame"));

        let ids: Vec<&str> = g.elements().filter_map(|e| e.get_attr("id")).collect();
        assert_eq!(ids, ["land", "tracts", "county-boundaries", "map-frame"]);
        assert!(g.find_by_id("tracts").is_some());
        assert!(g.find_by_id("nope").is_none());
    }
}
