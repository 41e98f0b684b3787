//! Single consumer of simulation ticks, pointer input and document loads.
//!
//! Producers (the tick interval, DOM event listeners, the fetch task) only
//! [`push`](GraphEngine::push) events. The animation frame calls
//! [`process_pending`](GraphEngine::process_pending), which applies them in
//! arrival order, and then draws. Nothing else mutates the layout, so a
//! handler never observes a half-applied tick.

use std::collections::VecDeque;

use log::{debug, info, warn};

use super::config::GraphConfig;
use super::details::NodeDetails;
use super::error::GraphError;
use super::graph::{GraphStats, ResolvedGraph};
use super::interaction::{InteractionController, InteractionTarget, PointerEvent, SelectionState};
use super::layout::LayoutState;
use super::scene::{self, Scene};
use super::scheduler::{Clock, SimulationScheduler};
use super::theme::Theme;
use super::types::GraphDocument;
use super::viewport::ViewportTransform;

/// Work queued for the engine.
#[derive(Debug)]
pub enum EngineEvent {
	/// Run any simulation ticks that are due.
	Tick,
	Pointer(PointerEvent),
	ResetView,
	ClearSelection,
	/// Resume stepping the current layout with a fresh run budget.
	RestartSimulation,
	/// Fetch number `attempt` is in flight. Attempts count up per request.
	FetchStarted { attempt: u32 },
	DocumentLoaded { attempt: u32, document: GraphDocument },
	FetchFailed { attempt: u32, error: GraphError },
}

/// Where the graph document stands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadStatus {
	Loading,
	Ready,
	/// Last fetch failed. Any previously loaded graph is still shown.
	Failed(String),
}

/// What changed while processing the queue.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EngineUpdate {
	pub processed: usize,
	pub ticks: u32,
	pub selection_changed: bool,
	pub document_changed: bool,
	pub status_changed: bool,
}

impl EngineUpdate {
	/// Whether the canvas content may differ from the last frame.
	pub fn needs_redraw(&self) -> bool {
		self.processed > 0
	}
}

struct LoadedGraph {
	graph: ResolvedGraph,
	scheduler: SimulationScheduler,
}

/// Owns the current graph, its scheduler, the viewport and the selection.
pub struct GraphEngine<C: Clock> {
	config: GraphConfig,
	theme: Theme,
	clock: C,
	seed: f64,
	generation: u64,
	latest_attempt: u32,
	queue: VecDeque<EngineEvent>,
	loaded: Option<LoadedGraph>,
	viewport: ViewportTransform,
	controller: InteractionController,
	status: LoadStatus,
}

impl<C: Clock> GraphEngine<C> {
	/// `seed` drives the initial jitter of every document this engine loads.
	pub fn new(config: GraphConfig, theme: Theme, clock: C, seed: f64) -> Self {
		Self {
			viewport: ViewportTransform::new(&config.viewport),
			controller: InteractionController::new(&config.viewport),
			config,
			theme,
			clock,
			seed,
			generation: 0,
			latest_attempt: 0,
			queue: VecDeque::new(),
			loaded: None,
			status: LoadStatus::Loading,
		}
	}

	/// Queues `event`. A tick right behind another tick is dropped, since one
	/// tick already catches up on everything due.
	pub fn push(&mut self, event: EngineEvent) {
		if matches!(event, EngineEvent::Tick)
			&& matches!(self.queue.back(), Some(EngineEvent::Tick))
		{
			return;
		}
		self.queue.push_back(event);
	}

	/// Applies every queued event in order.
	pub fn process_pending(&mut self) -> EngineUpdate {
		let mut update = EngineUpdate::default();
		while let Some(event) = self.queue.pop_front() {
			update.processed += 1;
			self.apply(event, &mut update);
		}
		update
	}

	fn apply(&mut self, event: EngineEvent, update: &mut EngineUpdate) {
		match event {
			EngineEvent::Tick => {
				let now = self.clock.now_ms();
				if let Some(loaded) = self.loaded.as_mut() {
					update.ticks += loaded.scheduler.advance(now);
				}
			}
			EngineEvent::Pointer(pointer) => {
				update.selection_changed |= self.handle_pointer(pointer);
			}
			EngineEvent::ResetView => {
				debug!("chunk-graph: view reset");
				self.viewport.reset();
			}
			EngineEvent::ClearSelection => {
				update.selection_changed |= self.controller.clear_selection();
			}
			EngineEvent::RestartSimulation => {
				let now = self.clock.now_ms();
				if let Some(loaded) = self.loaded.as_mut() {
					loaded.scheduler.restart(now);
				}
			}
			EngineEvent::FetchStarted { attempt } => {
				self.latest_attempt = self.latest_attempt.max(attempt);
				update.status_changed |= self.set_status(LoadStatus::Loading);
			}
			EngineEvent::DocumentLoaded { attempt, .. } | EngineEvent::FetchFailed { attempt, .. }
				if attempt < self.latest_attempt =>
			{
				debug!(
					"chunk-graph: dropping response to fetch {attempt}, fetch {} is newer",
					self.latest_attempt
				);
			}
			EngineEvent::DocumentLoaded { document, .. } => {
				let before = self.controller.selection().selected.clone();
				self.replace_document(document);
				update.document_changed = true;
				update.status_changed = true;
				update.selection_changed |= self.controller.selection().selected != before;
			}
			EngineEvent::FetchFailed { error, .. } => {
				warn!("chunk-graph: graph fetch failed: {error}");
				update.status_changed |= self.set_status(LoadStatus::Failed(error.to_string()));
			}
		}
	}

	fn set_status(&mut self, status: LoadStatus) -> bool {
		if self.status == status {
			return false;
		}
		self.status = status;
		true
	}

	fn handle_pointer(&mut self, pointer: PointerEvent) -> bool {
		let Some(loaded) = self.loaded.as_mut() else {
			if let PointerEvent::Wheel { x, y, delta_y } = pointer {
				let factor = if delta_y > 0.0 {
					self.config.viewport.wheel_out_factor
				} else {
					self.config.viewport.wheel_in_factor
				};
				self.viewport.zoom_at(x, y, factor);
			}
			return false;
		};
		let mut target = InteractionTarget {
			graph: &loaded.graph,
			scheduler: &mut loaded.scheduler,
			viewport: &mut self.viewport,
			theme: &self.theme,
		};
		self.controller.handle(pointer, &mut target)
	}

	/// Replaces the current graph and starts a fresh simulation over it.
	///
	/// The previous scheduler is stopped before the new one starts and is
	/// handed back to the caller. Drag state is discarded; selection and hover
	/// survive only if their node still exists.
	pub fn replace_document(&mut self, document: GraphDocument) -> Option<SimulationScheduler> {
		let retired = self.loaded.take().map(|mut old| {
			old.scheduler.stop();
			old.scheduler
		});

		let graph = ResolvedGraph::resolve(document);
		let seed = self.seed + self.generation as f64 * 101.0;
		self.generation += 1;
		let layout = LayoutState::initial(&graph, &self.config.simulation, seed);
		let scheduler = SimulationScheduler::start(
			layout,
			graph.edges().to_vec(),
			self.config.simulation.clone(),
			self.clock.now_ms(),
		);
		self.controller.retarget(&graph);
		info!(
			"chunk-graph: loaded document #{} with {} nodes",
			self.generation,
			graph.len()
		);

		self.loaded = Some(LoadedGraph { graph, scheduler });
		self.status = LoadStatus::Ready;
		retired
	}

	/// The frame to draw on a `width` x `height` canvas.
	pub fn scene(&self, width: f64, height: f64) -> Scene {
		match &self.loaded {
			Some(loaded) => scene::build_scene(
				&loaded.graph,
				loaded.scheduler.layout(),
				&self.viewport,
				self.controller.selection(),
				&self.theme,
				width,
				height,
			),
			None => Scene {
				width,
				height,
				..Scene::default()
			},
		}
	}

	pub fn stats(&self) -> GraphStats {
		self.loaded
			.as_ref()
			.map(|l| l.graph.stats())
			.unwrap_or_default()
	}

	pub fn selected_details(&self) -> Option<NodeDetails> {
		let loaded = self.loaded.as_ref()?;
		let id = self.controller.selection().selected.as_deref()?;
		NodeDetails::for_node(&loaded.graph, id)
	}

	pub fn selection(&self) -> &SelectionState {
		self.controller.selection()
	}

	pub fn dragged(&self) -> Option<&str> {
		self.controller.dragged()
	}

	pub fn viewport(&self) -> &ViewportTransform {
		&self.viewport
	}

	pub fn status(&self) -> &LoadStatus {
		&self.status
	}

	pub fn has_graph(&self) -> bool {
		self.loaded.is_some()
	}

	pub fn graph(&self) -> Option<&ResolvedGraph> {
		self.loaded.as_ref().map(|l| &l.graph)
	}

	pub fn scheduler(&self) -> Option<&SimulationScheduler> {
		self.loaded.as_ref().map(|l| &l.scheduler)
	}

	pub fn layout(&self) -> Option<&LayoutState> {
		self.scheduler().map(SimulationScheduler::layout)
	}

	pub fn theme(&self) -> &Theme {
		&self.theme
	}

	/// CSS cursor for the canvas in the current gesture state.
	pub fn cursor(&self) -> &'static str {
		if self.controller.dragged().is_some() || self.controller.is_panning() {
			"grabbing"
		} else if self.controller.selection().hovered.is_some() {
			"pointer"
		} else {
			"grab"
		}
	}
}
