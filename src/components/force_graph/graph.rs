//! Validated view of a [`GraphDocument`].
//!
//! Resolution drops duplicate node ids and edges whose endpoints do not exist,
//! assigns every node a dense index, and precomputes the statistics shown in
//! the side panel. Everything downstream (layout, simulation, rendering,
//! hit-testing) works on indices into this structure.

use std::collections::HashMap;

use log::{info, warn};

use super::types::{EdgeKind, GraphDocument, GraphEdge, GraphNode, NodeKind};

/// An edge whose endpoints both resolved to nodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolvedEdge {
	pub source: usize,
	pub target: usize,
	pub kind: EdgeKind,
}

impl ResolvedEdge {
	pub fn is_self_loop(&self) -> bool {
		self.source == self.target
	}

	/// The endpoint opposite `index`, if the edge touches it.
	pub fn other(&self, index: usize) -> Option<usize> {
		if self.source == index {
			Some(self.target)
		} else if self.target == index {
			Some(self.source)
		} else {
			None
		}
	}
}

/// Node and edge counts by kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GraphStats {
	pub files: usize,
	pub chunks: usize,
	pub other_nodes: usize,
	pub has_chunk_edges: usize,
	pub next_edges: usize,
	pub other_edges: usize,
	/// Edges excluded because an endpoint id was unknown.
	pub dropped_edges: usize,
}

impl GraphStats {
	pub fn total_nodes(&self) -> usize {
		self.files + self.chunks + self.other_nodes
	}

	pub fn total_edges(&self) -> usize {
		self.has_chunk_edges + self.next_edges + self.other_edges
	}
}

/// A graph document after validation.
#[derive(Clone, Debug, Default)]
pub struct ResolvedGraph {
	nodes: Vec<GraphNode>,
	edge_data: Vec<GraphEdge>,
	edges: Vec<ResolvedEdge>,
	index_by_id: HashMap<String, usize>,
	stats: GraphStats,
}

impl ResolvedGraph {
	pub fn resolve(document: GraphDocument) -> Self {
		let mut nodes = Vec::with_capacity(document.nodes.len());
		let mut index_by_id = HashMap::with_capacity(document.nodes.len());
		let mut stats = GraphStats::default();

		for node in document.nodes {
			if index_by_id.contains_key(&node.id) {
				warn!("chunk-graph: duplicate node id {:?} ignored", node.id);
				continue;
			}
			match node.kind {
				NodeKind::File => stats.files += 1,
				NodeKind::Chunk => stats.chunks += 1,
				NodeKind::Other => stats.other_nodes += 1,
			}
			index_by_id.insert(node.id.clone(), nodes.len());
			nodes.push(node);
		}

		let mut edges = Vec::with_capacity(document.edges.len());
		let mut edge_data = Vec::with_capacity(document.edges.len());
		for edge in document.edges {
			let (Some(&source), Some(&target)) =
				(index_by_id.get(&edge.source), index_by_id.get(&edge.target))
			else {
				warn!(
					"chunk-graph: dropping {} edge {:?} -> {:?}: unknown endpoint",
					edge.kind.as_str(),
					edge.source,
					edge.target
				);
				stats.dropped_edges += 1;
				continue;
			};
			match edge.kind {
				EdgeKind::HasChunk => stats.has_chunk_edges += 1,
				EdgeKind::Next => stats.next_edges += 1,
				EdgeKind::Other => stats.other_edges += 1,
			}
			edges.push(ResolvedEdge {
				source,
				target,
				kind: edge.kind,
			});
			edge_data.push(edge);
		}

		info!(
			"chunk-graph: resolved {} nodes, {} edges ({} dropped)",
			nodes.len(),
			edges.len(),
			stats.dropped_edges
		);

		Self {
			nodes,
			edge_data,
			edges,
			index_by_id,
			stats,
		}
	}

	pub fn nodes(&self) -> &[GraphNode] {
		&self.nodes
	}

	pub fn node(&self, index: usize) -> Option<&GraphNode> {
		self.nodes.get(index)
	}

	pub fn node_by_id(&self, id: &str) -> Option<&GraphNode> {
		self.index_of(id).and_then(|i| self.nodes.get(i))
	}

	pub fn index_of(&self, id: &str) -> Option<usize> {
		self.index_by_id.get(id).copied()
	}

	/// Edges that survived resolution, parallel to [`Self::edge_data`].
	pub fn edges(&self) -> &[ResolvedEdge] {
		&self.edges
	}

	/// The source edge records for [`Self::edges`], same order.
	pub fn edge_data(&self) -> &[GraphEdge] {
		&self.edge_data
	}

	pub fn stats(&self) -> GraphStats {
		self.stats
	}

	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn doc(json: &str) -> GraphDocument {
		GraphDocument::from_json(json).unwrap()
	}

	#[test]
	fn drops_edges_with_unknown_endpoints() {
		let graph = ResolvedGraph::resolve(doc(
			r#"{"nodes": [{"id": "f", "type": "file"}, {"id": "c", "type": "chunk"}],
			    "edges": [
					{"source": "f", "target": "c", "type": "HAS_CHUNK"},
					{"source": "f", "target": "ghost", "type": "HAS_CHUNK"},
					{"source": "nobody", "target": "c", "type": "NEXT"}
				]}"#,
		));

		assert_eq!(graph.edges().len(), 1);
		assert_eq!(graph.edge_data().len(), 1);
		assert_eq!(graph.edge_data()[0].target, "c");
		let stats = graph.stats();
		assert_eq!(stats.dropped_edges, 2);
		assert_eq!(stats.has_chunk_edges, 1);
		assert_eq!(stats.total_edges(), 1);
	}

	#[test]
	fn first_duplicate_id_wins() {
		let graph = ResolvedGraph::resolve(doc(
			r#"{"nodes": [
				{"id": "a", "type": "file", "label": "first"},
				{"id": "a", "type": "chunk", "label": "second"}
			]}"#,
		));
		assert_eq!(graph.len(), 1);
		assert_eq!(graph.node_by_id("a").unwrap().label, "first");
		assert_eq!(graph.stats().files, 1);
		assert_eq!(graph.stats().chunks, 0);
	}

	#[test]
	fn empty_document_has_zero_stats() {
		let graph = ResolvedGraph::resolve(GraphDocument::default());
		assert!(graph.is_empty());
		assert_eq!(graph.stats(), GraphStats::default());
		assert_eq!(graph.stats().total_nodes(), 0);
	}

	#[test]
	fn self_loops_are_kept() {
		let graph = ResolvedGraph::resolve(doc(
			r#"{"nodes": [{"id": "c", "type": "chunk"}],
			    "edges": [{"source": "c", "target": "c", "type": "NEXT"}]}"#,
		));
		let edge = graph.edges()[0];
		assert!(edge.is_self_loop());
		assert_eq!(edge.other(0), Some(0));
		assert_eq!(edge.other(1), None);
	}
}
