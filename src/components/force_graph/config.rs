//! Tunable constants for the simulation, the scheduler and the viewport.
//!
//! Every value has a default that reproduces the stock layout. A page can
//! override any subset by embedding JSON in a
//! `<script id="graph-config" type="application/json">` element; missing keys
//! keep their defaults.

use serde::Deserialize;

use super::types::EdgeKind;

/// Force and integration parameters for [`super::simulation::step`].
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
	/// Repulsion numerator: force magnitude is `charge / distance²`.
	pub charge: f64,
	/// Spring stiffness applied to `(distance - rest_length)`.
	pub spring: f64,
	/// Rest length of `HAS_CHUNK` edges. Shorter than `next_rest_length` so
	/// chunks cluster around their file.
	pub has_chunk_rest_length: f64,
	/// Rest length of `NEXT` (and unknown) edges.
	pub next_rest_length: f64,
	/// Pull toward the canvas centre, proportional to the offset.
	pub center_pull: f64,
	/// Velocity retained per step, in (0, 1).
	pub damping: f64,
	/// Distance floor for repulsion and spring direction.
	pub min_distance: f64,
	/// Simulation canvas width.
	pub width: f64,
	/// Simulation canvas height.
	pub height: f64,
	/// Nodes are kept this far inside the canvas edges.
	pub margin: f64,
	/// Wall-clock interval between ticks, in milliseconds.
	pub tick_interval_ms: f64,
	/// Wall-clock run budget after which the scheduler stops, in milliseconds.
	pub run_budget_ms: f64,
	/// Most ticks a single `advance` call may run to catch up after a stall.
	pub max_catch_up_ticks: u32,
}

impl Default for SimulationConfig {
	fn default() -> Self {
		Self {
			charge: 500.0,
			spring: 0.1,
			has_chunk_rest_length: 80.0,
			next_rest_length: 120.0,
			center_pull: 0.01,
			damping: 0.8,
			min_distance: 1.0,
			width: 1200.0,
			height: 800.0,
			margin: 50.0,
			tick_interval_ms: 50.0,
			run_budget_ms: 10_000.0,
			max_catch_up_ticks: 8,
		}
	}
}

impl SimulationConfig {
	pub fn rest_length(&self, kind: EdgeKind) -> f64 {
		match kind {
			EdgeKind::HasChunk => self.has_chunk_rest_length,
			EdgeKind::Next | EdgeKind::Other => self.next_rest_length,
		}
	}

	pub fn center(&self) -> (f64, f64) {
		(self.width / 2.0, self.height / 2.0)
	}

	/// Clamps a point into the canvas rectangle shrunk by `margin`.
	///
	/// A margin larger than half the canvas collapses the range onto the centre.
	pub fn clamp_to_bounds(&self, x: f64, y: f64) -> (f64, f64) {
		let (cx, cy) = self.center();
		let (min_x, max_x) = (self.margin.min(cx), (self.width - self.margin).max(cx));
		let (min_y, max_y) = (self.margin.min(cy), (self.height - self.margin).max(cy));
		(x.clamp(min_x, max_x), y.clamp(min_y, max_y))
	}
}

/// Zoom limits and wheel step factors.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
	pub min_scale: f64,
	pub max_scale: f64,
	/// Scale multiplier for a wheel step away from the user (zoom out).
	pub wheel_out_factor: f64,
	/// Scale multiplier for a wheel step toward the user (zoom in).
	pub wheel_in_factor: f64,
}

impl Default for ViewportConfig {
	fn default() -> Self {
		Self {
			min_scale: 0.1,
			max_scale: 3.0,
			wheel_out_factor: 0.9,
			wheel_in_factor: 1.1,
		}
	}
}

/// Complete viewer configuration.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
	/// Base URL of the backend; the graph is fetched from
	/// `{api_base}/knowledge-graph/graph`.
	pub api_base: String,
	/// Theme name, see [`Theme::named`](super::theme::Theme::named).
	pub theme: String,
	pub simulation: SimulationConfig,
	pub viewport: ViewportConfig,
}

impl Default for GraphConfig {
	fn default() -> Self {
		Self {
			api_base: "http://localhost:8000".to_string(),
			theme: "light".to_string(),
			simulation: SimulationConfig::default(),
			viewport: ViewportConfig::default(),
		}
	}
}

impl GraphConfig {
	pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(text)
	}

	pub fn graph_url(&self) -> String {
		format!("{}/knowledge-graph/graph", self.api_base.trim_end_matches('/'))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn partial_override_keeps_defaults() {
		let config = GraphConfig::from_json(
			r#"{"api_base": "https://kg.example/", "simulation": {"charge": 900}}"#,
		)
		.unwrap();
		assert_eq!(config.simulation.charge, 900.0);
		assert_eq!(config.simulation.damping, 0.8);
		assert_eq!(config.viewport, ViewportConfig::default());
		assert_eq!(config.theme, "light");
		assert_eq!(config.graph_url(), "https://kg.example/knowledge-graph/graph");
	}

	#[test]
	fn containment_rests_shorter_than_sequence() {
		let config = SimulationConfig::default();
		assert!(config.rest_length(EdgeKind::HasChunk) < config.rest_length(EdgeKind::Next));
		assert_eq!(
			config.rest_length(EdgeKind::Other),
			config.rest_length(EdgeKind::Next)
		);
	}

	#[test]
	fn clamp_respects_margin() {
		let config = SimulationConfig::default();
		assert_eq!(config.clamp_to_bounds(-10.0, 5000.0), (50.0, 750.0));
		assert_eq!(config.clamp_to_bounds(300.0, 300.0), (300.0, 300.0));
	}
}
