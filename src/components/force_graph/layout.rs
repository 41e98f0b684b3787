//! Per-node kinematic state driven by the simulation and by dragging.

use std::collections::HashMap;
use std::f64::consts::TAU;
use std::rc::Rc;

use super::config::SimulationConfig;
use super::graph::ResolvedGraph;
use super::types::NodeKind;

/// Who controls a node's position.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum PinState {
	/// Integrated by the simulation.
	#[default]
	Free,
	/// Held at a fixed coordinate by the user. Still repels and attracts
	/// other nodes.
	Pinned { x: f64, y: f64 },
}

/// Position, velocity and pin state of one node, in simulation space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct KinematicPoint {
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	pub pin: PinState,
}

impl KinematicPoint {
	pub fn at(x: f64, y: f64) -> Self {
		Self {
			x,
			y,
			..Self::default()
		}
	}

	pub fn is_pinned(&self) -> bool {
		matches!(self.pin, PinState::Pinned { .. })
	}

	pub fn is_finite(&self) -> bool {
		self.x.is_finite() && self.y.is_finite() && self.vx.is_finite() && self.vy.is_finite()
	}
}

/// A mutation requested by interaction, applied between simulation ticks.
#[derive(Clone, Debug, PartialEq)]
pub enum LayoutCommand {
	/// Pin the node at `(x, y)`, moving it there and zeroing its velocity.
	Pin { id: String, x: f64, y: f64 },
	/// Return the node to simulation control where it currently stands.
	Unpin { id: String },
}

/// Kinematic points for every node of one resolved graph, keyed by node id.
///
/// Id tables are shared between successive states so a simulation step only
/// copies the point vector.
#[derive(Clone, Debug, Default)]
pub struct LayoutState {
	ids: Rc<[String]>,
	index_by_id: Rc<HashMap<String, usize>>,
	points: Vec<KinematicPoint>,
}

/// Deterministic pseudo-random value in `[0, 1)`.
fn pseudo_random(seed: f64) -> f64 {
	let x = (seed * 12.9898 + seed * 78.233).sin() * 43758.5453;
	x - x.floor()
}

impl LayoutState {
	/// Places nodes on a ring around the canvas centre (files further out than
	/// chunks) with seeded jitter. Velocities start at zero.
	pub fn initial(graph: &ResolvedGraph, config: &SimulationConfig, seed: f64) -> Self {
		let count = graph.len();
		let (cx, cy) = config.center();
		let points = graph
			.nodes()
			.iter()
			.enumerate()
			.map(|(i, node)| {
				let angle = TAU * i as f64 / count.max(1) as f64;
				let radius = match node.kind {
					NodeKind::File => 200.0,
					NodeKind::Chunk | NodeKind::Other => 150.0,
				};
				let jitter_seed = seed + i as f64;
				let jx = (pseudo_random(jitter_seed * 1.1 + 0.31) - 0.5) * 100.0;
				let jy = (pseudo_random(jitter_seed * 2.3 + 0.67) - 0.5) * 100.0;
				let (x, y) = config.clamp_to_bounds(
					cx + radius * angle.cos() + jx,
					cy + radius * angle.sin() + jy,
				);
				KinematicPoint::at(x, y)
			})
			.collect();

		let ids: Rc<[String]> = graph.nodes().iter().map(|n| n.id.clone()).collect();
		let index_by_id = ids
			.iter()
			.enumerate()
			.map(|(i, id)| (id.clone(), i))
			.collect();

		Self {
			ids,
			index_by_id: Rc::new(index_by_id),
			points,
		}
	}

	/// Builds a layout with explicit points, one per node of `graph`.
	///
	/// Extra points are ignored; missing ones start at the canvas centre.
	pub fn from_points(graph: &ResolvedGraph, config: &SimulationConfig, points: &[KinematicPoint]) -> Self {
		let mut layout = Self::initial(graph, config, 0.0);
		let (cx, cy) = config.center();
		for (i, slot) in layout.points.iter_mut().enumerate() {
			*slot = points.get(i).copied().unwrap_or(KinematicPoint::at(cx, cy));
		}
		layout
	}

	/// Same ids, new points. `points` must have one entry per node.
	pub(super) fn with_points(&self, points: Vec<KinematicPoint>) -> Self {
		debug_assert_eq!(points.len(), self.points.len());
		Self {
			ids: Rc::clone(&self.ids),
			index_by_id: Rc::clone(&self.index_by_id),
			points,
		}
	}

	pub fn len(&self) -> usize {
		self.points.len()
	}

	pub fn is_empty(&self) -> bool {
		self.points.is_empty()
	}

	pub fn points(&self) -> &[KinematicPoint] {
		&self.points
	}

	pub fn point(&self, index: usize) -> Option<&KinematicPoint> {
		self.points.get(index)
	}

	pub fn point_by_id(&self, id: &str) -> Option<&KinematicPoint> {
		self.index_of(id).and_then(|i| self.points.get(i))
	}

	pub fn index_of(&self, id: &str) -> Option<usize> {
		self.index_by_id.get(id).copied()
	}

	pub fn contains(&self, id: &str) -> bool {
		self.index_by_id.contains_key(id)
	}

	pub fn ids(&self) -> &[String] {
		&self.ids
	}

	/// Applies an interaction command. Returns `false` if the id is unknown
	/// or the coordinate is not finite.
	pub fn apply(&mut self, command: &LayoutCommand) -> bool {
		match command {
			LayoutCommand::Pin { id, x, y } => {
				if !x.is_finite() || !y.is_finite() {
					return false;
				}
				let Some(point) = self.index_of(id).and_then(|i| self.points.get_mut(i)) else {
					return false;
				};
				point.pin = PinState::Pinned { x: *x, y: *y };
				point.x = *x;
				point.y = *y;
				point.vx = 0.0;
				point.vy = 0.0;
				true
			}
			LayoutCommand::Unpin { id } => {
				let Some(point) = self.index_of(id).and_then(|i| self.points.get_mut(i)) else {
					return false;
				};
				point.pin = PinState::Free;
				true
			}
		}
	}
}
