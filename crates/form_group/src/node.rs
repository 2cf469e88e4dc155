//! Markup tree produced by field rendering.
//!
//! Elements are assembled with fluent builders in the same shape as the rest of
//! the UI code:
//!
//! ```ignore
//! div()
//!     .class("Form-group")
//!     .when_some(label, |this, label| this.child(label))
//!     .child(input().attr("type", "email"))
//! ```
//!
//! Event handlers are carried on the element but never serialised; call
//! [`Element::dispatch`] to simulate user interaction.

use indexmap::IndexMap;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::warn;

use crate::value::{Binding, attr_string};

pub type Attrs = IndexMap<String, Value>;
pub type Callback = Arc<dyn Fn(Value) + Send + Sync>;

/// Passthrough key that is merged into `class` instead of emitted as-is.
pub const CLASS_NAME_KEY: &str = "className";

const VOID_TAGS: &[&str] = &["input", "img", "br", "hr", "meta", "link"];

/// Combine a base class with an optional extra class, base first.
pub fn class_list(base: &str, extra: Option<&str>) -> String {
    match extra.map(str::trim).filter(|e| !e.is_empty()) {
        Some(extra) if base.is_empty() => extra.to_string(),
        Some(extra) => format!("{base} {extra}"),
        None => base.to_string(),
    }
}

#[derive(Clone)]
pub enum Handler {
    /// Write the event value into the bound cell.
    Bind(Binding),
    Callback(Callback),
}

impl Handler {
    pub fn callback(f: impl Fn(Value) + Send + Sync + 'static) -> Self {
        Handler::Callback(Arc::new(f))
    }

    pub fn call(&self, value: Value) {
        match self {
            Handler::Bind(binding) => binding.set(value),
            Handler::Callback(f) => f(value),
        }
    }
}

impl PartialEq for Handler {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Handler::Bind(a), Handler::Bind(b)) => a.ptr_eq(b),
            (Handler::Callback(a), Handler::Callback(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handler::Bind(binding) => f.debug_tuple("Bind").field(binding).finish(),
            Handler::Callback(_) => f.write_str("Callback(..)"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Text(String),
    Element(Element),
    Fragment(Vec<Node>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: String,
    pub attrs: Attrs,
    pub handlers: IndexMap<String, Handler>,
    pub children: Vec<Node>,
}

pub fn el(tag: impl Into<String>) -> Element {
    Element::new(tag)
}

pub fn div() -> Element {
    Element::new("div")
}

pub fn span() -> Element {
    Element::new("span")
}

pub fn label() -> Element {
    Element::new("label")
}

pub fn input() -> Element {
    Element::new("input")
}

pub fn textarea() -> Element {
    Element::new("textarea")
}

pub fn text(content: impl Into<String>) -> Node {
    Node::Text(content.into())
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Attrs::new(),
            handlers: IndexMap::new(),
            children: Vec::new(),
        }
    }

    pub fn id(self, id: impl Into<String>) -> Self {
        self.attr("id", id.into())
    }

    /// Append a class token; existing classes are kept in front.
    pub fn class(mut self, class: impl AsRef<str>) -> Self {
        let merged = class_list(
            self.attrs.get("class").and_then(Value::as_str).unwrap_or(""),
            Some(class.as_ref()),
        );
        if !merged.is_empty() {
            self.attrs.insert("class".into(), Value::String(merged));
        }
        self
    }

    pub fn attr(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    /// Forward raw attributes. `className` is merged into `class`; later keys win.
    pub fn attrs<K, I>(mut self, attrs: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        for (key, value) in attrs {
            let key = key.into();
            if key == CLASS_NAME_KEY {
                if let Some(extra) = value.as_str() {
                    self = self.class(extra);
                }
            } else {
                self.attrs.insert(key, value);
            }
        }
        self
    }

    pub fn child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn children<N, I>(mut self, children: I) -> Self
    where
        N: Into<Node>,
        I: IntoIterator<Item = N>,
    {
        self.children.extend(children.into_iter().map(Into::into));
        self
    }

    pub fn on(mut self, event: impl Into<String>, handler: Handler) -> Self {
        self.handlers.insert(event.into(), handler);
        self
    }

    /// Two-way bind: render the current value and write back on `input`.
    pub fn bind(self, binding: &Binding) -> Self {
        let this = match attr_string(&binding.get()) {
            Some(value) => self.attr("value", value),
            None => self,
        };
        this.on("input", Handler::Bind(binding.clone()))
    }

    pub fn when(self, condition: bool, then: impl FnOnce(Self) -> Self) -> Self {
        if condition { then(self) } else { self }
    }

    pub fn when_some<T>(self, option: Option<T>, then: impl FnOnce(Self, T) -> Self) -> Self {
        match option {
            Some(value) => then(self, value),
            None => self,
        }
    }

    pub fn get_attr(&self, key: &str) -> Option<&Value> {
        self.attrs.get(key)
    }

    pub fn attr_str(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).and_then(Value::as_str)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attr_str("class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }

    /// Invoke the handler registered for `event`. Returns false if there is none.
    pub fn dispatch(&self, event: &str, value: impl Into<Value>) -> bool {
        match self.handlers.get(event) {
            Some(handler) => {
                handler.call(value.into());
                true
            }
            None => false,
        }
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

impl From<String> for Node {
    fn from(content: String) -> Self {
        Node::Text(content)
    }
}

impl From<&str> for Node {
    fn from(content: &str) -> Self {
        Node::Text(content.to_string())
    }
}

impl From<Vec<Node>> for Node {
    fn from(nodes: Vec<Node>) -> Self {
        Node::Fragment(nodes)
    }
}

impl Node {
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Depth-first, pre-order search.
    pub fn find(&self, predicate: impl Fn(&Element) -> bool) -> Option<&Element> {
        self.find_all(predicate).into_iter().next()
    }

    pub fn find_all(&self, predicate: impl Fn(&Element) -> bool) -> Vec<&Element> {
        let mut found = Vec::new();
        self.collect(&predicate, &mut found);
        found
    }

    fn collect<'a>(&'a self, predicate: &dyn Fn(&Element) -> bool, found: &mut Vec<&'a Element>) {
        match self {
            Node::Text(_) => {}
            Node::Element(e) => {
                if predicate(e) {
                    found.push(e);
                }
                for child in &e.children {
                    child.collect(predicate, found);
                }
            }
            Node::Fragment(nodes) => {
                for node in nodes {
                    node.collect(predicate, found);
                }
            }
        }
    }

    pub fn find_by_tag(&self, tag: &str) -> Option<&Element> {
        self.find(|e| e.tag == tag)
    }

    pub fn find_by_class(&self, class: &str) -> Option<&Element> {
        self.find(|e| e.has_class(class))
    }

    /// Concatenated text of this subtree.
    pub fn text_content(&self) -> String {
        match self {
            Node::Text(t) => t.clone(),
            Node::Element(e) => e.children.iter().map(Node::text_content).collect(),
            Node::Fragment(nodes) => nodes.iter().map(Node::text_content).collect(),
        }
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        match self {
            Node::Text(t) => escape_into(t, out),
            Node::Fragment(nodes) => nodes.iter().for_each(|n| n.write_html(out)),
            Node::Element(e) => {
                out.push('<');
                out.push_str(&e.tag);
                for (key, value) in &e.attrs {
                    if !is_valid_attr_name(key) {
                        warn!(tag = %e.tag, key = %key, "skipping invalid attribute name");
                        continue;
                    }
                    match value {
                        Value::Null | Value::Bool(false) => {}
                        Value::Bool(true) => {
                            out.push(' ');
                            out.push_str(key);
                        }
                        other => {
                            out.push(' ');
                            out.push_str(key);
                            out.push_str("=\"");
                            escape_into(&attr_string(other).unwrap_or_default(), out);
                            out.push('"');
                        }
                    }
                }
                out.push('>');
                if VOID_TAGS.contains(&e.tag.as_str()) {
                    return;
                }
                for child in &e.children {
                    child.write_html(out);
                }
                out.push_str("</");
                out.push_str(&e.tag);
                out.push('>');
            }
        }
    }
}

/// HTML attribute names: non-empty, no whitespace, quotes, `>`, `/`, `=` or controls.
fn is_valid_attr_name(name: &str) -> bool {
    !name.is_empty()
        && !name.chars().any(|c| {
            c.is_whitespace() || c.is_control() || matches!(c, '"' | '\'' | '>' | '<' | '/' | '=')
        })
}

fn escape_into(raw: &str, out: &mut String) {
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
}
