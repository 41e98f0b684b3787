//! Projection of the graph into a drawable scene.
//!
//! [`build_scene`] is a pure function of the resolved graph, the current
//! layout, the viewport and the selection. It produces screen-space shapes in
//! paint order; [`super::render`] draws them on a canvas and tests inspect
//! them directly.

use super::graph::ResolvedGraph;
use super::interaction::SelectionState;
use super::layout::LayoutState;
use super::theme::{Color, Theme};
use super::types::{EdgeKind, NodeKind};
use super::viewport::ViewportTransform;

/// Smallest on-screen hit radius, so tiny nodes stay grabbable when zoomed out.
const MIN_HIT_RADIUS_PX: f64 = 5.0;

/// Visual emphasis of a node. Selection wins over hover.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Emphasis {
	Default,
	Hovered,
	Selected,
}

impl Emphasis {
	pub fn of(id: &str, selection: &SelectionState) -> Self {
		if selection.selected.as_deref() == Some(id) {
			Emphasis::Selected
		} else if selection.hovered.as_deref() == Some(id) {
			Emphasis::Hovered
		} else {
			Emphasis::Default
		}
	}
}

/// Node radius in simulation units.
pub fn node_radius(theme: &Theme, kind: NodeKind, emphasis: Emphasis) -> f64 {
	let base = theme.node.base_radius(kind);
	match emphasis {
		Emphasis::Default => base,
		Emphasis::Hovered => base * theme.node.hovered_scale,
		Emphasis::Selected => base * theme.node.selected_scale,
	}
}

pub fn node_color(theme: &Theme, kind: NodeKind, emphasis: Emphasis) -> Color {
	match emphasis {
		Emphasis::Default => theme.node.base_color(kind),
		Emphasis::Hovered => theme.node.hovered_color,
		Emphasis::Selected => theme.node.selected_color,
	}
}

/// A node circle in screen space.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeShape {
	/// Index into the resolved graph.
	pub index: usize,
	pub kind: NodeKind,
	pub emphasis: Emphasis,
	pub x: f64,
	pub y: f64,
	pub radius: f64,
	pub fill: Color,
}

/// An edge line in screen space, trimmed to the node outlines.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeShape {
	pub kind: EdgeKind,
	pub from: (f64, f64),
	pub to: (f64, f64),
	pub color: Color,
	pub width: f64,
	/// Arrowhead triangle at the target: tip, then the two back corners.
	pub arrow: Option<[(f64, f64); 3]>,
}

/// Text anchored at its horizontal centre.
#[derive(Clone, Debug, PartialEq)]
pub struct TextShape {
	pub text: String,
	pub x: f64,
	pub y: f64,
	pub color: Color,
	pub font_size: f64,
}

/// Everything to draw for one frame, in paint order within each list.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
	pub width: f64,
	pub height: f64,
	pub edges: Vec<EdgeShape>,
	pub captions: Vec<TextShape>,
	pub nodes: Vec<NodeShape>,
	pub labels: Vec<TextShape>,
}

/// Node indices in paint order: document order, then hovered, then selected
/// on top.
pub fn draw_order(graph: &ResolvedGraph, selection: &SelectionState) -> Vec<usize> {
	let raised = |id: &Option<String>| id.as_deref().and_then(|id| graph.index_of(id));
	let hovered = raised(&selection.hovered);
	let selected = raised(&selection.selected);

	let mut order: Vec<usize> = (0..graph.len())
		.filter(|&i| Some(i) != hovered && Some(i) != selected)
		.collect();
	order.extend(hovered.filter(|&i| Some(i) != selected));
	order.extend(selected);
	order
}

/// Topmost node under the screen point `(sx, sy)`.
pub fn node_at(
	graph: &ResolvedGraph,
	layout: &LayoutState,
	viewport: &ViewportTransform,
	selection: &SelectionState,
	theme: &Theme,
	sx: f64,
	sy: f64,
) -> Option<usize> {
	let (gx, gy) = viewport.to_sim(sx, sy);
	let min_radius = MIN_HIT_RADIUS_PX / viewport.scale();
	draw_order(graph, selection).into_iter().rev().find(|&i| {
		let (Some(node), Some(point)) = (graph.node(i), layout.point(i)) else {
			return false;
		};
		let radius = node_radius(theme, node.kind, Emphasis::of(&node.id, selection)).max(min_radius);
		let (dx, dy) = (point.x - gx, point.y - gy);
		dx * dx + dy * dy <= radius * radius
	})
}

fn arrow_head(tip: (f64, f64), ux: f64, uy: f64, size: f64) -> [(f64, f64); 3] {
	let (back_x, back_y) = (tip.0 - ux * size, tip.1 - uy * size);
	let (px, py) = (-uy * size * 0.35, ux * size * 0.35);
	[tip, (back_x + px, back_y + py), (back_x - px, back_y - py)]
}

/// Builds the scene for a `width` x `height` canvas.
pub fn build_scene(
	graph: &ResolvedGraph,
	layout: &LayoutState,
	viewport: &ViewportTransform,
	selection: &SelectionState,
	theme: &Theme,
	width: f64,
	height: f64,
) -> Scene {
	let k = viewport.scale();
	let show_text = k >= theme.label.min_scale;
	let mut scene = Scene {
		width,
		height,
		..Scene::default()
	};

	let screen_node = |i: usize| {
		let node = graph.node(i)?;
		let point = layout.point(i).filter(|p| p.x.is_finite() && p.y.is_finite())?;
		let emphasis = Emphasis::of(&node.id, selection);
		let (x, y) = viewport.to_screen(point.x, point.y);
		Some((node, emphasis, x, y, node_radius(theme, node.kind, emphasis) * k))
	};

	for edge in graph.edges() {
		let (Some((_, _, x1, y1, r1)), Some((_, _, x2, y2, r2))) =
			(screen_node(edge.source), screen_node(edge.target))
		else {
			continue;
		};

		let color = theme.edge.color(edge.kind).with_alpha(theme.edge.opacity);
		let width = theme.edge.width(edge.kind);
		let (dx, dy) = (x2 - x1, y2 - y1);
		let dist = (dx * dx + dy * dy).sqrt();
		let arrow_len = theme.edge.arrow_size * k;

		let shape = if edge.is_self_loop() || dist <= r1 + r2 + arrow_len * 0.5 {
			EdgeShape {
				kind: edge.kind,
				from: (x1, y1),
				to: (x2, y2),
				color,
				width,
				arrow: None,
			}
		} else {
			let (ux, uy) = (dx / dist, dy / dist);
			let tip = (x2 - ux * r2, y2 - uy * r2);
			EdgeShape {
				kind: edge.kind,
				from: (x1 + ux * r1, y1 + uy * r1),
				to: tip,
				color,
				width,
				arrow: (arrow_len > 0.0).then(|| arrow_head(tip, ux, uy, arrow_len)),
			}
		};

		if show_text && theme.edge.caption_size > 0.0 && !edge.is_self_loop() {
			scene.captions.push(TextShape {
				text: edge.kind.as_str().to_string(),
				x: (x1 + x2) / 2.0,
				y: (y1 + y2) / 2.0 - 5.0,
				color: theme.edge.caption_color,
				font_size: theme.edge.caption_size,
			});
		}
		scene.edges.push(shape);
	}

	for i in draw_order(graph, selection) {
		let Some((node, emphasis, x, y, radius)) = screen_node(i) else {
			continue;
		};
		scene.nodes.push(NodeShape {
			index: i,
			kind: node.kind,
			emphasis,
			x,
			y,
			radius,
			fill: node_color(theme, node.kind, emphasis),
		});
		if show_text {
			scene.labels.push(TextShape {
				text: node.display_label().to_string(),
				x,
				y: y + radius + theme.label.offset * k,
				color: theme.label.color,
				font_size: theme.label.font_size,
			});
		}
	}

	scene
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::config::SimulationConfig;
	use crate::components::force_graph::layout::KinematicPoint;
	use crate::components::force_graph::types::GraphDocument;

	fn fixture() -> (ResolvedGraph, LayoutState) {
		let graph = ResolvedGraph::resolve(
			GraphDocument::from_json(
				r#"{"nodes": [
					{"id": "f", "type": "file", "label": "notes.pdf"},
					{"id": "c1", "type": "chunk", "label": "Chunk 1"},
					{"id": "c2", "type": "chunk"}
				], "edges": [
					{"source": "f", "target": "c1", "type": "HAS_CHUNK"},
					{"source": "c1", "target": "c2", "type": "NEXT"},
					{"source": "c2", "target": "missing", "type": "NEXT"}
				]}"#,
			)
			.unwrap(),
		);
		let layout = LayoutState::from_points(
			&graph,
			&SimulationConfig::default(),
			&[
				KinematicPoint::at(100.0, 100.0),
				KinematicPoint::at(300.0, 100.0),
				KinematicPoint::at(300.0, 300.0),
			],
		);
		(graph, layout)
	}

	#[test]
	fn empty_graph_renders_empty_scene() {
		let graph = ResolvedGraph::resolve(GraphDocument::default());
		let scene = build_scene(
			&graph,
			&LayoutState::default(),
			&ViewportTransform::default(),
			&SelectionState::default(),
			&Theme::default(),
			800.0,
			600.0,
		);
		assert_eq!((scene.width, scene.height), (800.0, 600.0));
		assert!(scene.nodes.is_empty() && scene.edges.is_empty() && scene.labels.is_empty());
	}

	#[test]
	fn dangling_edges_are_not_drawn() {
		let (graph, layout) = fixture();
		let theme = Theme::default();
		let scene = build_scene(
			&graph,
			&layout,
			&ViewportTransform::default(),
			&SelectionState::default(),
			&theme,
			800.0,
			600.0,
		);
		assert_eq!(scene.edges.len(), 2);
		assert_eq!(scene.edges[0].kind, EdgeKind::HasChunk);
		assert_eq!(scene.edges[0].width, theme.edge.has_chunk_width);
		assert_eq!(scene.edges[1].color, theme.edge.next_color.with_alpha(0.7));
		assert_eq!(scene.captions[1].text, "NEXT");
	}

	#[test]
	fn edges_are_trimmed_to_node_outlines() {
		let (graph, layout) = fixture();
		let theme = Theme::default();
		let scene = build_scene(
			&graph,
			&layout,
			&ViewportTransform::default(),
			&SelectionState::default(),
			&theme,
			800.0,
			600.0,
		);
		let edge = &scene.edges[0];
		assert_eq!(edge.from, (120.0, 100.0));
		assert_eq!(edge.to, (288.0, 100.0));
		let arrow = edge.arrow.unwrap();
		assert_eq!(arrow[0], edge.to);
	}

	#[test]
	fn selection_beats_hover_and_draws_on_top() {
		let (graph, layout) = fixture();
		let theme = Theme::default();
		let selection = SelectionState {
			selected: Some("f".into()),
			hovered: Some("f".into()),
		};
		let scene = build_scene(
			&graph,
			&layout,
			&ViewportTransform::default(),
			&selection,
			&theme,
			800.0,
			600.0,
		);
		let top = scene.nodes.last().unwrap();
		assert_eq!(top.index, 0);
		assert_eq!(top.emphasis, Emphasis::Selected);
		assert_eq!(top.fill, theme.node.selected_color);
		assert_eq!(top.radius, 30.0);
	}

	#[test]
	fn hovered_node_grows_and_recolors() {
		let (graph, layout) = fixture();
		let theme = Theme::default();
		let selection = SelectionState {
			selected: None,
			hovered: Some("c1".into()),
		};
		let scene = build_scene(
			&graph,
			&layout,
			&ViewportTransform::default(),
			&selection,
			&theme,
			800.0,
			600.0,
		);
		let hovered = scene.nodes.iter().find(|n| n.index == 1).unwrap();
		assert_eq!(hovered.emphasis, Emphasis::Hovered);
		assert_eq!(hovered.fill, theme.node.hovered_color);
		assert!((hovered.radius - 12.0 * 1.3).abs() < 1e-9);
	}

	#[test]
	fn labels_follow_zoom_and_fall_back_to_id() {
		let (graph, layout) = fixture();
		let theme = Theme::default();
		let mut view = ViewportTransform::default();
		view.zoom_at(0.0, 0.0, 2.0);
		let scene = build_scene(
			&graph,
			&layout,
			&view,
			&SelectionState::default(),
			&theme,
			800.0,
			600.0,
		);
		let file = &scene.nodes[0];
		assert_eq!((file.x, file.y), (200.0, 200.0));
		assert_eq!(file.radius, 40.0);
		assert_eq!(scene.labels[0].text, "notes.pdf");
		assert_eq!(scene.labels[2].text, "c2");

		view.reset();
		for _ in 0..20 {
			view.zoom_at(0.0, 0.0, 0.9);
		}
		let zoomed_out = build_scene(
			&graph,
			&layout,
			&view,
			&SelectionState::default(),
			&theme,
			800.0,
			600.0,
		);
		assert!(zoomed_out.labels.is_empty());
		assert_eq!(zoomed_out.nodes.len(), 3);
	}

	#[test]
	fn hit_test_prefers_topmost() {
		let (graph, layout) = fixture();
		let theme = Theme::default();
		let view = ViewportTransform::default();
		let none = SelectionState::default();
		assert_eq!(node_at(&graph, &layout, &view, &none, &theme, 105.0, 95.0), Some(0));
		assert_eq!(node_at(&graph, &layout, &view, &none, &theme, 200.0, 200.0), None);
		assert_eq!(node_at(&graph, &layout, &view, &none, &theme, 311.0, 300.0), Some(2));
		assert_eq!(node_at(&graph, &layout, &view, &none, &theme, 313.0, 300.0), None);
	}
}
