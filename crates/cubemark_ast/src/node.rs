//! Node definition.
//!
//! The document tree element produced by the compiler and handed to a renderer.

use std::collections::BTreeMap;
use std::ops::ControlFlow;

use serde::{Deserialize, Serialize};

use crate::Span;
use crate::visitor::{VisitResult, Visitor, walk_node};

/// A node in the compiled document tree.
///
/// Every node carries a string `type` tag so that syntax extensions can
/// introduce new node kinds without touching this crate. Leaf nodes keep
/// their content in `value`; containers keep an ordered list of children.
///
/// # Example
///
/// ```rust
/// use cubemark_ast::{Node, Span};
///
/// let mut paragraph = Node::new("paragraph", Span::new(0, 5));
/// paragraph.children.push(Node::text("hello", Span::new(0, 5)));
///
/// assert!(paragraph.has_children());
/// assert_eq!(paragraph.children[0].value, "hello");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// The type tag of this node (`paragraph`, `text`, `symbol`, ...).
    #[serde(rename = "type")]
    pub node_type: String,

    /// Text value. Empty for containers and for leaves not yet resolved.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub value: String,

    /// Render hints and node-specific fields.
    #[serde(default, skip_serializing_if = "NodeData::is_empty")]
    pub data: NodeData,

    /// Child nodes, in document order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,

    /// Byte span in the source text.
    #[serde(rename = "range")]
    pub span: Span,
}

/// Auxiliary data attached to a [`Node`].
///
/// `h_name` and `h_properties` are read by renderers: the first names the
/// output element, the second supplies its attributes. `fields` holds any
/// other key/value pairs an extension wants to expose (for example a
/// symbol's `value`, or a heading's `depth`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeData {
    /// Output element name for the renderer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub h_name: Option<String>,

    /// Attributes for the output element.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub h_properties: BTreeMap<String, AttrValue>,

    /// Free-form fields, flattened into the serialized data object.
    #[serde(flatten)]
    pub fields: BTreeMap<String, AttrValue>,
}

/// A scalar stored in [`NodeData`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Bool(bool),
    Int(i64),
    Str(String),
}

impl Node {
    /// Creates a node with no value, data or children.
    pub fn new(node_type: impl Into<String>, span: Span) -> Self {
        Self {
            node_type: node_type.into(),
            value: String::new(),
            data: NodeData::default(),
            children: Vec::new(),
            span,
        }
    }

    /// Creates a `text` leaf.
    pub fn text(value: impl Into<String>, span: Span) -> Self {
        Self {
            value: value.into(),
            ..Self::new("text", span)
        }
    }

    /// Sets the render element name.
    pub fn with_h_name(mut self, h_name: impl Into<String>) -> Self {
        self.data.h_name = Some(h_name.into());
        self
    }

    /// Returns true if the node has the given type tag.
    #[inline]
    pub fn is(&self, node_type: &str) -> bool {
        self.node_type == node_type
    }

    /// Returns true if this node has children.
    #[inline]
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Returns the render element name, if any.
    #[inline]
    pub fn h_name(&self) -> Option<&str> {
        self.data.h_name.as_deref()
    }

    /// Collects every descendant (including `self`) with the given type.
    pub fn find_all<'a>(&'a self, node_type: &str) -> Vec<&'a Node> {
        struct Collector<'a, 't> {
            node_type: &'t str,
            found: Vec<&'a Node>,
        }

        impl<'a> Visitor<'a> for Collector<'a, '_> {
            fn enter_node(&mut self, node: &'a Node) -> VisitResult {
                if node.is(self.node_type) {
                    self.found.push(node);
                }
                ControlFlow::Continue(())
            }
        }

        let mut collector = Collector {
            node_type,
            found: Vec::new(),
        };
        let _ = walk_node(&mut collector, self);
        collector.found
    }

    /// Concatenates the values of all `text` descendants.
    pub fn text_content(&self) -> String {
        self.find_all("text")
            .into_iter()
            .map(|node| node.value.as_str())
            .collect()
    }
}

impl NodeData {
    /// Returns true if no hint or field is set.
    pub fn is_empty(&self) -> bool {
        self.h_name.is_none() && self.h_properties.is_empty() && self.fields.is_empty()
    }

    /// Looks up a free-form field.
    pub fn get(&self, key: &str) -> Option<&AttrValue> {
        self.fields.get(key)
    }

    /// Sets a free-form field, replacing any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<AttrValue>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Sets a render attribute, replacing any previous value.
    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<AttrValue>) {
        self.h_properties.insert(key.into(), value.into());
    }
}

impl AttrValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttrValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            AttrValue::Int(i) => Some(*i),
            _ => None,
        }
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Str(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Str(value)
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        AttrValue::Bool(value)
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        AttrValue::Int(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_node_is_empty() {
        let node = Node::new("paragraph", Span::new(0, 5));

        assert_eq!(node.node_type, "paragraph");
        assert!(node.value.is_empty());
        assert!(node.data.is_empty());
        assert!(!node.has_children());
    }

    #[test]
    fn test_text_node() {
        let node = Node::text("hello", Span::new(0, 5));

        assert!(node.is("text"));
        assert_eq!(node.value, "hello");
    }

    #[test]
    fn test_with_h_name() {
        let node = Node::new("symbol", Span::new(0, 3)).with_h_name("symbol");
        assert_eq!(node.h_name(), Some("symbol"));
    }

    #[test]
    fn test_node_data_fields() {
        let mut data = NodeData::default();
        data.set("value", "W");
        data.set("depth", 2i64);
        data.set_property("dfc", true);

        assert_eq!(data.get("value").and_then(AttrValue::as_str), Some("W"));
        assert_eq!(data.get("depth").and_then(AttrValue::as_int), Some(2));
        assert_eq!(
            data.h_properties.get("dfc").and_then(AttrValue::as_bool),
            Some(true)
        );
        assert!(data.get("missing").is_none());
    }

    #[test]
    fn test_find_all_includes_nested() {
        let mut inner = Node::new("emphasis", Span::new(2, 7));
        inner.children.push(Node::text("deep", Span::new(3, 6)));

        let mut root = Node::new("root", Span::new(0, 9));
        root.children.push(Node::text("a ", Span::new(0, 2)));
        root.children.push(inner);

        let texts = root.find_all("text");
        assert_eq!(texts.len(), 2);
        assert_eq!(root.text_content(), "a deep");
    }

    #[test]
    fn test_serialization_leaf() {
        let mut node = Node::new("symbol", Span::new(0, 3)).with_h_name("symbol");
        node.value = "W".to_string();
        node.data.set("value", "W");

        let json = serde_json::to_value(&node).unwrap();

        assert_eq!(json["type"], "symbol");
        assert_eq!(json["value"], "W");
        assert_eq!(json["data"]["hName"], "symbol");
        assert_eq!(json["data"]["value"], "W");
        assert_eq!(json["range"]["start"], 0);
        assert!(json.get("children").is_none());
    }

    #[test]
    fn test_serialization_omits_empty_data() {
        let node = Node::new("paragraph", Span::new(0, 0));
        let json = serde_json::to_value(&node).unwrap();
        let obj = json.as_object().unwrap();

        // type, range
        assert_eq!(obj.len(), 2);
        assert!(!obj.contains_key("data"));
        assert!(!obj.contains_key("value"));
    }

    #[test]
    fn test_deserialization_roundtrip_keeps_properties() {
        let json = r#"{
            "type": "cardimage",
            "value": "Delver of Secrets",
            "data": {
                "hName": "cardimage",
                "hProperties": { "id": "Delver of Secrets", "dfc": true }
            },
            "range": { "start": 0, "end": 22 }
        }"#;

        let node: Node = serde_json::from_str(json).unwrap();

        assert_eq!(node.h_name(), Some("cardimage"));
        assert_eq!(
            node.data.h_properties.get("dfc"),
            Some(&AttrValue::Bool(true))
        );
        assert!(node.data.fields.is_empty());
    }
}
