//! Side-panel model for the selected node.

use super::graph::ResolvedGraph;
use super::types::{EdgeKind, NodeKind, Properties};

/// Direction of a connection relative to the selected node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
	Outgoing,
	Incoming,
}

impl Direction {
	pub fn as_str(self) -> &'static str {
		match self {
			Direction::Outgoing => "OUTGOING",
			Direction::Incoming => "INCOMING",
		}
	}

	pub fn arrow(self) -> &'static str {
		match self {
			Direction::Outgoing => "→",
			Direction::Incoming => "←",
		}
	}
}

/// One `(key, value)` row ready for display.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PropertyRow {
	pub key: String,
	pub value: String,
}

/// An edge touching the selected node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Connection {
	pub kind: EdgeKind,
	pub direction: Direction,
	pub neighbor_id: String,
	pub neighbor_label: String,
	pub properties: Vec<PropertyRow>,
}

/// Everything the details panel shows for one node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeDetails {
	pub id: String,
	pub label: String,
	pub kind: NodeKind,
	pub properties: Vec<PropertyRow>,
	pub connections: Vec<Connection>,
}

/// `file_name` -> `File Name`.
pub fn humanize_key(key: &str) -> String {
	let mut out = String::with_capacity(key.len());
	let mut at_word_start = true;
	for ch in key.chars() {
		let ch = if ch == '_' { ' ' } else { ch };
		if at_word_start {
			out.extend(ch.to_uppercase());
		} else {
			out.push(ch);
		}
		at_word_start = !ch.is_alphanumeric();
	}
	out
}

fn property_rows(properties: Option<&Properties>, humanize: bool) -> Vec<PropertyRow> {
	properties
		.into_iter()
		.flatten()
		.map(|(key, value)| PropertyRow {
			key: if humanize {
				humanize_key(key)
			} else {
				key.clone()
			},
			value: if value.is_blank() {
				"N/A".to_string()
			} else {
				value.to_string()
			},
		})
		.collect()
}

impl NodeDetails {
	/// Details for `id`, or `None` if the node is not in `graph`.
	pub fn for_node(graph: &ResolvedGraph, id: &str) -> Option<Self> {
		let index = graph.index_of(id)?;
		let node = graph.node(index)?;

		let connections = graph
			.edges()
			.iter()
			.zip(graph.edge_data())
			.filter_map(|(edge, data)| {
				let (direction, other) = if edge.source == index {
					(Direction::Outgoing, edge.target)
				} else if edge.target == index {
					(Direction::Incoming, edge.source)
				} else {
					return None;
				};
				let neighbor = graph.node(other);
				Some(Connection {
					kind: edge.kind,
					direction,
					neighbor_id: neighbor.map_or_else(String::new, |n| n.id.clone()),
					neighbor_label: neighbor
						.map_or_else(String::new, |n| n.display_label().to_string()),
					properties: property_rows(data.properties.as_ref(), false),
				})
			})
			.collect();

		Some(Self {
			id: node.id.clone(),
			label: node.display_label().to_string(),
			kind: node.kind,
			properties: property_rows(node.properties.as_ref(), true),
			connections,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::types::GraphDocument;

	fn graph() -> ResolvedGraph {
		ResolvedGraph::resolve(
			GraphDocument::from_json(
				r#"{"nodes": [
					{"id": "f", "type": "file", "label": "paper.pdf",
					 "properties": {"file_name": "paper.pdf", "page_count": 12, "author": null}},
					{"id": "c1", "type": "chunk", "label": "Intro"},
					{"id": "c2", "type": "chunk", "label": "Methods"}
				], "edges": [
					{"source": "f", "target": "c1", "type": "HAS_CHUNK", "properties": {"order": 0}},
					{"source": "c1", "target": "c2", "type": "NEXT"},
					{"source": "c1", "target": "gone", "type": "NEXT"}
				]}"#,
			)
			.unwrap(),
		)
	}

	#[test]
	fn humanizes_keys() {
		assert_eq!(humanize_key("file_name"), "File Name");
		assert_eq!(humanize_key("page-count"), "Page-Count");
		assert_eq!(humanize_key("id"), "Id");
		assert_eq!(humanize_key(""), "");
	}

	#[test]
	fn file_details_list_properties_and_children() {
		let details = NodeDetails::for_node(&graph(), "f").unwrap();
		assert_eq!(details.kind, NodeKind::File);
		assert_eq!(details.label, "paper.pdf");
		assert_eq!(
			details.properties,
			vec![
				PropertyRow {
					key: "Author".into(),
					value: "N/A".into()
				},
				PropertyRow {
					key: "File Name".into(),
					value: "paper.pdf".into()
				},
				PropertyRow {
					key: "Page Count".into(),
					value: "12".into()
				},
			]
		);
		assert_eq!(details.connections.len(), 1);
		let child = &details.connections[0];
		assert_eq!(child.direction, Direction::Outgoing);
		assert_eq!(child.neighbor_label, "Intro");
		assert_eq!(child.properties[0].key, "order");
		assert_eq!(child.properties[0].value, "0");
	}

	#[test]
	fn chunk_sees_both_directions_but_not_dropped_edges() {
		let details = NodeDetails::for_node(&graph(), "c1").unwrap();
		let directions: Vec<_> = details
			.connections
			.iter()
			.map(|c| (c.kind, c.direction, c.neighbor_id.as_str()))
			.collect();
		assert_eq!(
			directions,
			vec![
				(EdgeKind::HasChunk, Direction::Incoming, "f"),
				(EdgeKind::Next, Direction::Outgoing, "c2"),
			]
		);
	}

	#[test]
	fn unknown_node_has_no_details() {
		assert!(NodeDetails::for_node(&graph(), "nope").is_none());
	}
}
