//! Wire codec for the node model.
//!
//! On the wire a node is a name-first tagged tuple: `["#t", content]` for
//! text, `[name, children, attributes?, slots?]` for tags, with trailing
//! empty maps elided. There is no version tag and no schema; compatibility
//! is purely structural equality of this shape. Malformed shapes (wrong
//! arity, non-string name) are rejected here, at the decode boundary;
//! the sum type makes them unrepresentable afterwards.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, SeqAccess};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::error::DomError;
use crate::node::{Node, TEXT_MARKER};

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Node::Text { content } => {
                let mut seq = serializer.serialize_seq(Some(2))?;
                seq.serialize_element(TEXT_MARKER)?;
                seq.serialize_element(content)?;
                seq.end()
            }
            Node::Tag {
                name,
                children,
                attributes,
                slots,
            } => {
                let arity = if !slots.is_empty() {
                    4
                } else if !attributes.is_empty() {
                    3
                } else {
                    2
                };
                let mut seq = serializer.serialize_seq(Some(arity))?;
                seq.serialize_element(name)?;
                seq.serialize_element(children)?;
                if arity >= 3 {
                    seq.serialize_element(attributes)?;
                }
                if arity == 4 {
                    seq.serialize_element(slots)?;
                }
                seq.end()
            }
        }
    }
}

struct NodeTupleVisitor;

impl<'de> de::Visitor<'de> for NodeTupleVisitor {
    type Value = Node;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a name-first node tuple")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Node, A::Error> {
        let name: String = seq
            .next_element()?
            .ok_or_else(|| de::Error::custom("node tuple is empty"))?;

        if name == TEXT_MARKER {
            let content: Option<String> = seq.next_element()?;
            if seq.next_element::<de::IgnoredAny>()?.is_some() {
                return Err(de::Error::custom(
                    "text node carries more than a marker and content",
                ));
            }
            return Ok(Node::Text {
                content: content.unwrap_or_default(),
            });
        }
        if name.starts_with('#') {
            return Err(de::Error::custom(format!(
                "unknown reserved node marker `{name}`"
            )));
        }

        let children: Vec<Node> = seq.next_element()?.unwrap_or_default();
        let attributes: BTreeMap<String, Value> = seq.next_element()?.unwrap_or_default();
        let slots: BTreeMap<String, Vec<Node>> = seq.next_element()?.unwrap_or_default();
        if seq.next_element::<de::IgnoredAny>()?.is_some() {
            return Err(de::Error::custom("tag node tuple longer than four elements"));
        }
        Ok(Node::Tag {
            name,
            children,
            attributes,
            slots,
        })
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_seq(NodeTupleVisitor)
    }
}

impl Node {
    /// Decodes a node from its wire value, rejecting malformed shapes.
    pub fn from_value(value: Value) -> Result<Node, DomError> {
        serde_json::from_value(value).map_err(|err| DomError::malformed(err.to_string()))
    }

    /// Encodes the node into its wire value.
    pub fn to_value(&self) -> Result<Value, DomError> {
        serde_json::to_value(self).map_err(|err| DomError::malformed(err.to_string()))
    }
}
