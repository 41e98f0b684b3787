//! Fixed-cadence driver for the layout simulation.
//!
//! The scheduler owns the [`LayoutState`]. Ticks run at a fixed wall-clock
//! interval, independent of how often frames are drawn, until a run budget
//! elapses. Interaction mutates the layout only through [`SimulationScheduler::apply`],
//! which cannot overlap a tick because both need `&mut self`.

use std::cell::Cell;
use std::rc::Rc;

use log::{debug, info};

use super::config::SimulationConfig;
use super::graph::ResolvedEdge;
use super::layout::{LayoutCommand, LayoutState};
use super::simulation;

/// Source of wall-clock time in milliseconds.
pub trait Clock {
	fn now_ms(&self) -> f64;
}

/// `Date.now()` in the browser.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserClock;

impl Clock for BrowserClock {
	fn now_ms(&self) -> f64 {
		js_sys::Date::now()
	}
}

/// A clock that only moves when told to. Clones share the same time.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
	now: Rc<Cell<f64>>,
}

impl ManualClock {
	pub fn new(start_ms: f64) -> Self {
		Self {
			now: Rc::new(Cell::new(start_ms)),
		}
	}

	pub fn advance(&self, ms: f64) {
		self.now.set(self.now.get() + ms);
	}

	pub fn set(&self, ms: f64) {
		self.now.set(ms);
	}
}

impl Clock for ManualClock {
	fn now_ms(&self) -> f64 {
		self.now.get()
	}
}

/// Lifecycle of the simulation loop.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SchedulerState {
	/// Never started.
	Idle,
	/// Stepping. `started_at` is when the current budget began.
	Running { started_at: f64, next_tick_at: f64 },
	/// Budget elapsed or stopped externally. Layout retained.
	Stopped,
}

/// Runs [`simulation::step`] on a fixed cadence with a finite budget.
#[derive(Debug)]
pub struct SimulationScheduler {
	state: SchedulerState,
	layout: LayoutState,
	edges: Vec<ResolvedEdge>,
	config: SimulationConfig,
	ticks: u64,
}

impl SimulationScheduler {
	pub fn new(layout: LayoutState, edges: Vec<ResolvedEdge>, config: SimulationConfig) -> Self {
		Self {
			state: SchedulerState::Idle,
			layout,
			edges,
			config,
			ticks: 0,
		}
	}

	/// Creates a scheduler and immediately starts it at `now`.
	pub fn start(
		layout: LayoutState,
		edges: Vec<ResolvedEdge>,
		config: SimulationConfig,
		now: f64,
	) -> Self {
		let mut scheduler = Self::new(layout, edges, config);
		scheduler.restart(now);
		scheduler
	}

	/// Begins (or resumes) stepping the current layout with a fresh budget.
	pub fn restart(&mut self, now: f64) {
		info!(
			"chunk-graph: simulation running over {} nodes, {} edges",
			self.layout.len(),
			self.edges.len()
		);
		self.state = SchedulerState::Running {
			started_at: now,
			next_tick_at: now + self.config.tick_interval_ms,
		};
	}

	/// Halts stepping immediately. The layout is kept as is.
	pub fn stop(&mut self) {
		if self.is_running() {
			info!("chunk-graph: simulation stopped after {} ticks", self.ticks);
		}
		self.state = SchedulerState::Stopped;
	}

	/// Runs every tick due at `now` and returns how many ran.
	///
	/// At most `max_catch_up_ticks` run per call; after a longer stall the
	/// schedule is realigned to `now` instead of replaying the backlog.
	pub fn advance(&mut self, now: f64) -> u32 {
		let SchedulerState::Running {
			started_at,
			mut next_tick_at,
		} = self.state
		else {
			return 0;
		};

		let deadline = started_at + self.config.run_budget_ms;
		let interval = self.config.tick_interval_ms.max(1.0);
		let mut ran = 0;

		while next_tick_at <= now && next_tick_at <= deadline {
			if ran >= self.config.max_catch_up_ticks {
				debug!("chunk-graph: tick backlog dropped");
				next_tick_at = now + interval;
				break;
			}
			self.layout = simulation::step(&self.layout, &self.edges, &self.config);
			self.ticks += 1;
			ran += 1;
			next_tick_at += interval;
		}

		if now >= deadline {
			info!(
				"chunk-graph: simulation budget elapsed after {} ticks",
				self.ticks
			);
			self.state = SchedulerState::Stopped;
		} else {
			self.state = SchedulerState::Running {
				started_at,
				next_tick_at,
			};
		}
		ran
	}

	/// Applies an interaction command between ticks.
	pub fn apply(&mut self, command: &LayoutCommand) -> bool {
		self.layout.apply(command)
	}

	/// The most recently published layout.
	pub fn layout(&self) -> &LayoutState {
		&self.layout
	}

	pub fn edges(&self) -> &[ResolvedEdge] {
		&self.edges
	}

	pub fn state(&self) -> SchedulerState {
		self.state
	}

	pub fn is_running(&self) -> bool {
		matches!(self.state, SchedulerState::Running { .. })
	}

	/// Total ticks run since creation.
	pub fn ticks(&self) -> u64 {
		self.ticks
	}
}
