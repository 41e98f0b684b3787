//! One integration step of the force-directed layout.
//!
//! Forces for every node are computed from the same pre-step snapshot, then
//! all nodes are integrated at once, so the result does not depend on node
//! order. Pinned nodes are force sources but are not moved. Repulsion is
//! all-pairs; the graphs this view targets are small.

use std::f64::consts::TAU;

use super::config::SimulationConfig;
use super::graph::ResolvedEdge;
use super::layout::{KinematicPoint, LayoutState, PinState};

/// Unit vector for a coincident pair. Opposite for `(i, j)` and `(j, i)`.
fn separation_direction(i: usize, j: usize) -> (f64, f64) {
	let (low, high) = (i.min(j), i.max(j));
	let angle = ((low as f64) * 0.618_034 + (high as f64) * 0.414_214) * TAU;
	let sign = if i < j { 1.0 } else { -1.0 };
	(angle.cos() * sign, angle.sin() * sign)
}

/// Repulsion acting on `points[i]` from `points[j]`.
fn repulsion(points: &[KinematicPoint], i: usize, j: usize, config: &SimulationConfig) -> (f64, f64) {
	let (dx, dy) = (points[i].x - points[j].x, points[i].y - points[j].y);
	let raw = (dx * dx + dy * dy).sqrt();
	let (ux, uy) = if raw >= config.min_distance && raw.is_finite() {
		(dx / raw, dy / raw)
	} else {
		separation_direction(i, j)
	};
	let distance = raw.max(config.min_distance);
	let magnitude = config.charge / (distance * distance);
	(ux * magnitude, uy * magnitude)
}

fn accumulate_forces(
	points: &[KinematicPoint],
	edges: &[ResolvedEdge],
	config: &SimulationConfig,
) -> Vec<(f64, f64)> {
	let count = points.len();
	let mut forces = vec![(0.0, 0.0); count];

	for (i, force) in forces.iter_mut().enumerate() {
		if points[i].is_pinned() {
			continue;
		}
		for j in 0..count {
			if i == j {
				continue;
			}
			let (fx, fy) = repulsion(points, i, j, config);
			force.0 += fx;
			force.1 += fy;
		}
	}

	for edge in edges {
		if edge.is_self_loop() || edge.source >= count || edge.target >= count {
			continue;
		}
		let (a, b) = (&points[edge.source], &points[edge.target]);
		let (dx, dy) = (b.x - a.x, b.y - a.y);
		let raw = (dx * dx + dy * dy).sqrt();
		if !raw.is_finite() {
			continue;
		}
		let distance = raw.max(config.min_distance);
		let (ux, uy) = (dx / distance, dy / distance);
		let pull = (distance - config.rest_length(edge.kind)) * config.spring;

		forces[edge.source].0 += ux * pull;
		forces[edge.source].1 += uy * pull;
		forces[edge.target].0 -= ux * pull;
		forces[edge.target].1 -= uy * pull;
	}

	let (cx, cy) = config.center();
	for (point, force) in points.iter().zip(forces.iter_mut()) {
		force.0 += (cx - point.x) * config.center_pull;
		force.1 += (cy - point.y) * config.center_pull;
	}

	forces
}

fn integrate(point: &KinematicPoint, force: (f64, f64), config: &SimulationConfig) -> KinematicPoint {
	if let PinState::Pinned { x, y } = point.pin {
		return KinematicPoint {
			x,
			y,
			vx: 0.0,
			vy: 0.0,
			pin: point.pin,
		};
	}

	let vx = (point.vx + force.0) * config.damping;
	let vy = (point.vy + force.1) * config.damping;
	let (x, y) = config.clamp_to_bounds(point.x + vx, point.y + vy);
	let next = KinematicPoint {
		x,
		y,
		vx,
		vy,
		pin: PinState::Free,
	};
	if next.is_finite() {
		return next;
	}

	// Keep the last valid position; fall back to the centre if there was none.
	let (x, y) = if point.x.is_finite() && point.y.is_finite() {
		(point.x, point.y)
	} else {
		config.center()
	};
	KinematicPoint {
		x,
		y,
		vx: 0.0,
		vy: 0.0,
		pin: PinState::Free,
	}
}

/// Advances the layout by one tick and returns the new state.
///
/// `edges` must index into `layout`; out-of-range edges are ignored.
pub fn step(layout: &LayoutState, edges: &[ResolvedEdge], config: &SimulationConfig) -> LayoutState {
	let points = layout.points();
	if points.is_empty() {
		return layout.clone();
	}

	let forces = accumulate_forces(points, edges, config);
	let next = points
		.iter()
		.zip(forces)
		.map(|(point, force)| integrate(point, force, config))
		.collect();
	layout.with_points(next)
}
