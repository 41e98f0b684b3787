//! Pointer and wheel handling: node dragging, hover, selection, pan and zoom.
//!
//! Every press on a node both selects it and starts a drag; there is no
//! click-versus-drag threshold. Dragging pins the node under the pointer;
//! releasing hands it back to the simulation where it was dropped, without
//! restarting a stopped scheduler.

use log::debug;

use super::config::ViewportConfig;
use super::graph::ResolvedGraph;
use super::layout::LayoutCommand;
use super::scene;
use super::scheduler::SimulationScheduler;
use super::theme::Theme;
use super::viewport::ViewportTransform;

/// A pointer event in canvas-relative screen pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
	Down { x: f64, y: f64 },
	Move { x: f64, y: f64 },
	Up { x: f64, y: f64 },
	/// Pointer left the canvas.
	Leave,
	/// Positive `delta_y` scrolls away from the user (zoom out).
	Wheel { x: f64, y: f64, delta_y: f64 },
}

/// Which node is selected and which is under the pointer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionState {
	pub selected: Option<String>,
	pub hovered: Option<String>,
}

/// Gesture in progress between a press and its release.
#[derive(Clone, Debug, Default, PartialEq)]
enum Gesture {
	#[default]
	None,
	DragNode {
		id: String,
		last_x: f64,
		last_y: f64,
	},
	Pan {
		last_x: f64,
		last_y: f64,
	},
}

/// Everything a handler may read or mutate.
pub struct InteractionTarget<'a> {
	pub graph: &'a ResolvedGraph,
	pub scheduler: &'a mut SimulationScheduler,
	pub viewport: &'a mut ViewportTransform,
	pub theme: &'a Theme,
}

/// Turns raw pointer events into drag, hover, select, pan and zoom.
#[derive(Clone, Debug)]
pub struct InteractionController {
	gesture: Gesture,
	selection: SelectionState,
	wheel_in_factor: f64,
	wheel_out_factor: f64,
}

impl Default for InteractionController {
	fn default() -> Self {
		Self::new(&ViewportConfig::default())
	}
}

impl InteractionController {
	pub fn new(config: &ViewportConfig) -> Self {
		Self {
			gesture: Gesture::None,
			selection: SelectionState::default(),
			wheel_in_factor: config.wheel_in_factor,
			wheel_out_factor: config.wheel_out_factor,
		}
	}

	pub fn selection(&self) -> &SelectionState {
		&self.selection
	}

	/// Id of the node being dragged, if any.
	pub fn dragged(&self) -> Option<&str> {
		match &self.gesture {
			Gesture::DragNode { id, .. } => Some(id.as_str()),
			_ => None,
		}
	}

	pub fn is_panning(&self) -> bool {
		matches!(self.gesture, Gesture::Pan { .. })
	}

	/// Handles one event. Returns `true` if the selected node changed.
	pub fn handle(&mut self, event: PointerEvent, target: &mut InteractionTarget<'_>) -> bool {
		let before = self.selection.selected.clone();
		match event {
			PointerEvent::Down { x, y } => self.on_down(x, y, target),
			PointerEvent::Move { x, y } => self.on_move(x, y, target),
			PointerEvent::Up { x, y } => {
				self.on_move(x, y, target);
				self.finish_gesture(target);
			}
			PointerEvent::Leave => {
				self.finish_gesture(target);
				self.selection.hovered = None;
			}
			PointerEvent::Wheel { x, y, delta_y } => {
				let factor = if delta_y > 0.0 {
					self.wheel_out_factor
				} else {
					self.wheel_in_factor
				};
				target.viewport.zoom_at(x, y, factor);
			}
		}
		self.selection.selected != before
	}

	fn hit(&self, x: f64, y: f64, target: &InteractionTarget<'_>) -> Option<String> {
		scene::node_at(
			target.graph,
			target.scheduler.layout(),
			target.viewport,
			&self.selection,
			target.theme,
			x,
			y,
		)
		.and_then(|i| target.graph.node(i))
		.map(|node| node.id.clone())
	}

	fn on_down(&mut self, x: f64, y: f64, target: &mut InteractionTarget<'_>) {
		if !matches!(self.gesture, Gesture::None) {
			return;
		}

		let Some(id) = self.hit(x, y, target) else {
			self.gesture = Gesture::Pan {
				last_x: x,
				last_y: y,
			};
			return;
		};

		let Some(point) = target.scheduler.layout().point_by_id(&id).copied() else {
			return;
		};
		target.scheduler.apply(&LayoutCommand::Pin {
			id: id.clone(),
			x: point.x,
			y: point.y,
		});
		debug!("chunk-graph: drag start {id}");
		self.selection.selected = Some(id.clone());
		self.gesture = Gesture::DragNode {
			id,
			last_x: x,
			last_y: y,
		};
	}

	fn on_move(&mut self, x: f64, y: f64, target: &mut InteractionTarget<'_>) {
		if matches!(self.gesture, Gesture::None) {
			self.selection.hovered = self.hit(x, y, target);
			return;
		}
		match &mut self.gesture {
			Gesture::DragNode { id, last_x, last_y } => {
				*last_x = x;
				*last_y = y;
				let (gx, gy) = target.viewport.to_sim(x, y);
				target.scheduler.apply(&LayoutCommand::Pin {
					id: id.clone(),
					x: gx,
					y: gy,
				});
			}
			Gesture::Pan { last_x, last_y } => {
				target.viewport.drag_by_screen(x - *last_x, y - *last_y);
				*last_x = x;
				*last_y = y;
			}
			Gesture::None => {}
		}
	}

	fn finish_gesture(&mut self, target: &mut InteractionTarget<'_>) {
		if let Gesture::DragNode { id, last_x, last_y } = std::mem::take(&mut self.gesture) {
			let (gx, gy) = target.viewport.to_sim(last_x, last_y);
			target.scheduler.apply(&LayoutCommand::Pin {
				id: id.clone(),
				x: gx,
				y: gy,
			});
			target.scheduler.apply(&LayoutCommand::Unpin { id: id.clone() });
			debug!("chunk-graph: drag end {id} at ({gx:.1}, {gy:.1})");
		}
	}

	/// Clears the selection, e.g. when the details panel is closed.
	pub fn clear_selection(&mut self) -> bool {
		self.selection.selected.take().is_some()
	}

	/// Drops gesture state and any selection or hover that no longer
	/// refers to a node of `graph`. Called when the document is replaced.
	pub fn retarget(&mut self, graph: &ResolvedGraph) {
		self.gesture = Gesture::None;
		let keep = |id: &mut Option<String>| {
			if id.as_deref().is_some_and(|id| graph.index_of(id).is_none()) {
				*id = None;
			}
		};
		keep(&mut self.selection.selected);
		keep(&mut self.selection.hovered);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::config::SimulationConfig;
	use crate::components::force_graph::layout::{KinematicPoint, LayoutState, PinState};
	use crate::components::force_graph::types::GraphDocument;

	struct Fixture {
		graph: ResolvedGraph,
		scheduler: SimulationScheduler,
		viewport: ViewportTransform,
		theme: Theme,
		controller: InteractionController,
	}

	impl Fixture {
		fn new() -> Self {
			let graph = ResolvedGraph::resolve(
				GraphDocument::from_json(
					r#"{"nodes": [
						{"id": "f", "type": "file", "label": "F"},
						{"id": "c", "type": "chunk", "label": "C"}
					], "edges": [{"source": "f", "target": "c", "type": "HAS_CHUNK"}]}"#,
				)
				.unwrap(),
			);
			let config = SimulationConfig::default();
			let layout = LayoutState::from_points(
				&graph,
				&config,
				&[KinematicPoint::at(200.0, 200.0), KinematicPoint::at(400.0, 200.0)],
			);
			let scheduler = SimulationScheduler::new(layout, graph.edges().to_vec(), config);
			Self {
				graph,
				scheduler,
				viewport: ViewportTransform::default(),
				theme: Theme::default(),
				controller: InteractionController::default(),
			}
		}

		fn send(&mut self, event: PointerEvent) -> bool {
			let mut target = InteractionTarget {
				graph: &self.graph,
				scheduler: &mut self.scheduler,
				viewport: &mut self.viewport,
				theme: &self.theme,
			};
			self.controller.handle(event, &mut target)
		}

		fn point(&self, id: &str) -> KinematicPoint {
			*self.scheduler.layout().point_by_id(id).unwrap()
		}
	}

	#[test]
	fn press_on_node_selects_and_pins() {
		let mut fx = Fixture::new();
		assert!(fx.send(PointerEvent::Down { x: 402.0, y: 201.0 }));
		assert_eq!(fx.controller.selection().selected.as_deref(), Some("c"));
		assert_eq!(fx.controller.dragged(), Some("c"));
		assert_eq!(fx.point("c").pin, PinState::Pinned { x: 400.0, y: 200.0 });
	}

	#[test]
	fn drag_follows_pointer_then_releases() {
		let mut fx = Fixture::new();
		fx.viewport.zoom_at(0.0, 0.0, 2.0);
		fx.send(PointerEvent::Down { x: 800.0, y: 400.0 });
		fx.send(PointerEvent::Move { x: 900.0, y: 500.0 });
		let p = fx.point("c");
		assert_eq!((p.x, p.y), (450.0, 250.0));
		assert!(p.is_pinned());

		fx.send(PointerEvent::Up { x: 1000.0, y: 600.0 });
		let p = fx.point("c");
		assert_eq!((p.x, p.y), (500.0, 300.0));
		assert_eq!(p.pin, PinState::Free);
		assert_eq!(fx.controller.dragged(), None);
		assert_eq!(fx.controller.selection().selected.as_deref(), Some("c"));
	}

	#[test]
	fn press_on_empty_canvas_pans_without_touching_selection() {
		let mut fx = Fixture::new();
		fx.send(PointerEvent::Down { x: 200.0, y: 200.0 });
		fx.send(PointerEvent::Up { x: 200.0, y: 200.0 });
		assert_eq!(fx.controller.selection().selected.as_deref(), Some("f"));

		assert!(!fx.send(PointerEvent::Down { x: 10.0, y: 10.0 }));
		assert!(fx.controller.is_panning());
		fx.send(PointerEvent::Move { x: 60.0, y: 30.0 });
		assert_eq!(fx.viewport.pan(), (-50.0, -20.0));
		fx.send(PointerEvent::Up { x: 60.0, y: 30.0 });
		assert!(!fx.controller.is_panning());
		assert_eq!(fx.controller.selection().selected.as_deref(), Some("f"));
		assert!(!fx.point("f").is_pinned());
	}

	#[test]
	fn second_press_during_drag_is_ignored() {
		let mut fx = Fixture::new();
		fx.send(PointerEvent::Down { x: 400.0, y: 200.0 });
		fx.send(PointerEvent::Down { x: 200.0, y: 200.0 });
		assert_eq!(fx.controller.dragged(), Some("c"));
		assert!(!fx.point("f").is_pinned());
		assert!(fx.point("c").is_pinned());
	}

	#[test]
	fn hover_tracks_pointer_and_clears_on_leave() {
		let mut fx = Fixture::new();
		fx.send(PointerEvent::Move { x: 205.0, y: 195.0 });
		assert_eq!(fx.controller.selection().hovered.as_deref(), Some("f"));
		fx.send(PointerEvent::Move { x: 300.0, y: 300.0 });
		assert_eq!(fx.controller.selection().hovered, None);
		fx.send(PointerEvent::Move { x: 400.0, y: 200.0 });
		fx.send(PointerEvent::Leave);
		assert_eq!(fx.controller.selection().hovered, None);
	}

	#[test]
	fn leave_during_drag_releases_the_node() {
		let mut fx = Fixture::new();
		fx.send(PointerEvent::Down { x: 400.0, y: 200.0 });
		fx.send(PointerEvent::Move { x: 420.0, y: 230.0 });
		fx.send(PointerEvent::Leave);
		let p = fx.point("c");
		assert_eq!((p.x, p.y), (420.0, 230.0));
		assert!(!p.is_pinned());
	}

	#[test]
	fn wheel_zooms_around_cursor() {
		let mut fx = Fixture::new();
		fx.send(PointerEvent::Wheel {
			x: 100.0,
			y: 100.0,
			delta_y: -120.0,
		});
		assert!((fx.viewport.scale() - 1.1).abs() < 1e-12);
		fx.send(PointerEvent::Wheel {
			x: 100.0,
			y: 100.0,
			delta_y: 120.0,
		});
		assert!((fx.viewport.scale() - 0.99).abs() < 1e-12);
		let (sx, sy) = fx.viewport.to_screen(100.0, 100.0);
		assert!((sx - 100.0).abs() < 1e-9 && (sy - 100.0).abs() < 1e-9);
	}

	#[test]
	fn retarget_drops_stale_ids() {
		let mut fx = Fixture::new();
		fx.send(PointerEvent::Down { x: 400.0, y: 200.0 });
		let other = ResolvedGraph::resolve(
			GraphDocument::from_json(r#"{"nodes": [{"id": "f", "type": "file"}]}"#).unwrap(),
		);
		fx.controller.retarget(&other);
		assert_eq!(fx.controller.dragged(), None);
		assert_eq!(fx.controller.selection().selected, None);

		fx.send(PointerEvent::Down { x: 200.0, y: 200.0 });
		fx.controller.retarget(&other);
		assert_eq!(fx.controller.selection().selected.as_deref(), Some("f"));
		assert!(fx.controller.clear_selection());
		assert!(!fx.controller.clear_selection());
	}
}
