//! Graph document structures as delivered by the knowledge-graph backend.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Number;

/// Kind of a node in the knowledge graph.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
	/// An ingested source file.
	File,
	/// A content chunk extracted from a file.
	Chunk,
	/// Any kind this viewer does not know about. Rendered like a chunk.
	#[default]
	#[serde(other)]
	Other,
}

impl NodeKind {
	pub fn as_str(self) -> &'static str {
		match self {
			NodeKind::File => "file",
			NodeKind::Chunk => "chunk",
			NodeKind::Other => "other",
		}
	}
}

/// Relation type of an edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum EdgeKind {
	/// Containment: file -> chunk.
	#[serde(rename = "HAS_CHUNK")]
	HasChunk,
	/// Sequence: chunk -> following chunk.
	#[serde(rename = "NEXT")]
	Next,
	/// Unknown relation type. Laid out and drawn like `NEXT`.
	#[default]
	#[serde(other)]
	Other,
}

impl EdgeKind {
	pub fn as_str(self) -> &'static str {
		match self {
			EdgeKind::HasChunk => "HAS_CHUNK",
			EdgeKind::Next => "NEXT",
			EdgeKind::Other => "OTHER",
		}
	}
}

/// A single display-only property value.
///
/// Closed set of shapes the backend emits; anything else is a parse error.
/// Numbers keep their JSON form, so integers re-serialize without a
/// fraction and without rounding.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum PropertyValue {
	Null,
	Bool(bool),
	Number(Number),
	String(String),
	List(Vec<PropertyValue>),
}

impl PropertyValue {
	/// Whether the side panel should show this value as missing.
	pub fn is_blank(&self) -> bool {
		match self {
			PropertyValue::Null => true,
			PropertyValue::String(s) => s.is_empty(),
			PropertyValue::List(items) => items.is_empty(),
			PropertyValue::Bool(_) | PropertyValue::Number(_) => false,
		}
	}
}

impl fmt::Display for PropertyValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			PropertyValue::Null => f.write_str("null"),
			PropertyValue::Bool(b) => write!(f, "{b}"),
			PropertyValue::Number(n) => write!(f, "{n}"),
			PropertyValue::String(s) => f.write_str(s),
			PropertyValue::List(items) => {
				for (i, item) in items.iter().enumerate() {
					if i > 0 {
						f.write_str(", ")?;
					}
					write!(f, "{item}")?;
				}
				Ok(())
			}
		}
	}
}

/// String-keyed property bag, ordered by key for stable display.
pub type Properties = BTreeMap<String, PropertyValue>;

/// A node in the graph document.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct GraphNode {
	/// Unique identifier. Edges reference nodes by this id.
	pub id: String,
	/// File or chunk.
	#[serde(rename = "type", default)]
	pub kind: NodeKind,
	/// Display label. Falls back to the id when empty or null.
	#[serde(default, deserialize_with = "null_as_empty")]
	pub label: String,
	/// Arbitrary properties, shown in the details panel only.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub properties: Option<Properties>,
}

impl GraphNode {
	pub fn display_label(&self) -> &str {
		if self.label.is_empty() {
			&self.id
		} else {
			&self.label
		}
	}
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
	Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// A directed, typed edge between two nodes.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct GraphEdge {
	/// Source node id.
	pub source: String,
	/// Target node id.
	pub target: String,
	/// Relation type.
	#[serde(rename = "type", default)]
	pub kind: EdgeKind,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub properties: Option<Properties>,
}

/// Complete graph document: nodes and edges. Missing arrays default to empty.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct GraphDocument {
	#[serde(default)]
	pub nodes: Vec<GraphNode>,
	#[serde(default)]
	pub edges: Vec<GraphEdge>,
}

impl GraphDocument {
	/// Parses a document from the backend's JSON body.
	pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(text)
	}
}
