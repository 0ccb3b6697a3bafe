//! Typed HTML fragment builder.
//!
//! # Responsibility
//! - Build markup from elements, attributes and text.
//! - Escape every text node and attribute value on the way in.
//!
//! # Invariants
//! - A `Markup` value is only produced by this module, so it never holds
//!   unescaped caller text.
//! - Tag and attribute names are `'static` literals chosen by the crate.
//! - Escaping covers `&`, `<`, `>` and `"`.

use std::fmt::{Display, Formatter};

/// Escapes markup-significant characters in `text`.
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Rendered, escape-safe markup fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Markup(String);

impl Markup {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Escaped text node.
    pub fn text(text: &str) -> Self {
        Self(escape(text))
    }

    /// Concatenates fragments in order.
    pub fn concat(parts: impl IntoIterator<Item = Markup>) -> Self {
        let mut out = Self::empty();
        for part in parts {
            out.push(part);
        }
        out
    }

    pub fn push(&mut self, other: impl Into<Markup>) {
        self.0.push_str(&other.into().0);
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Display for Markup {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone)]
enum Attribute {
    Value(&'static str, String),
    Flag(&'static str),
}

/// One HTML element under construction.
#[derive(Debug, Clone)]
pub struct Element {
    tag: &'static str,
    attributes: Vec<Attribute>,
    children: Vec<Markup>,
    void: bool,
}

impl Element {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            attributes: Vec::new(),
            children: Vec::new(),
            void: false,
        }
    }

    /// Element without content or closing tag (`input`).
    pub fn void(tag: &'static str) -> Self {
        Self {
            void: true,
            ..Self::new(tag)
        }
    }

    pub fn attr(mut self, name: &'static str, value: impl AsRef<str>) -> Self {
        self.attributes
            .push(Attribute::Value(name, value.as_ref().to_string()));
        self
    }

    /// Adds `name="value"` only when `value` is present.
    pub fn attr_opt(self, name: &'static str, value: Option<impl AsRef<str>>) -> Self {
        match value {
            Some(value) => self.attr(name, value),
            None => self,
        }
    }

    /// Adds a boolean attribute such as `required` when `enabled`.
    pub fn flag(mut self, name: &'static str, enabled: bool) -> Self {
        if enabled {
            self.attributes.push(Attribute::Flag(name));
        }
        self
    }

    pub fn class(self, value: &str) -> Self {
        self.attr("class", value)
    }

    /// Adds an inline style; empty values are skipped.
    pub fn style(self, value: &str) -> Self {
        if value.is_empty() {
            self
        } else {
            self.attr("style", value)
        }
    }

    pub fn text(mut self, text: impl AsRef<str>) -> Self {
        self.children.push(Markup::text(text.as_ref()));
        self
    }

    pub fn child(mut self, child: impl Into<Markup>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn children<I, M>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<Markup>,
    {
        self.children.extend(children.into_iter().map(Into::into));
        self
    }

    pub fn render(self) -> Markup {
        let mut out = String::new();
        out.push('<');
        out.push_str(self.tag);
        for attribute in &self.attributes {
            match attribute {
                Attribute::Value(name, value) => {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    out.push_str(&escape(value));
                    out.push('"');
                }
                Attribute::Flag(name) => {
                    out.push(' ');
                    out.push_str(name);
                }
            }
        }
        out.push('>');
        if self.void {
            return Markup(out);
        }
        for child in &self.children {
            out.push_str(child.as_str());
        }
        out.push_str("</");
        out.push_str(self.tag);
        out.push('>');
        Markup(out)
    }
}

impl From<Element> for Markup {
    fn from(element: Element) -> Self {
        element.render()
    }
}
