//! Leptos component wrapping the knowledge graph canvas.
//!
//! The component owns a [`GraphEngine`] behind `Rc<RefCell<..>>`. Canvas
//! handlers, the tick interval and the fetch task only push events into it;
//! the `requestAnimationFrame` loop drains the queue, mirrors the results into
//! signals for the side panel and paints the frame.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{error, info};
use wasm_bindgen::prelude::*;
use web_sys::{
	CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent, MouseEvent, WheelEvent, Window,
};

use super::config::GraphConfig;
use super::details::NodeDetails;
use super::engine::{EngineEvent, GraphEngine, LoadStatus};
use super::fetch::fetch_graph;
use super::graph::GraphStats;
use super::interaction::PointerEvent;
use super::render;
use super::scheduler::BrowserClock;
use super::theme::Theme;
use super::types::NodeKind;

type SharedEngine = Rc<RefCell<GraphEngine<BrowserClock>>>;
type SharedClosure = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

fn window_size(window: &Window) -> (f64, f64) {
	(
		window
			.inner_width()
			.ok()
			.and_then(|v| v.as_f64())
			.unwrap_or(1200.0),
		window
			.inner_height()
			.ok()
			.and_then(|v| v.as_f64())
			.unwrap_or(800.0),
	)
}

/// Window size when `fullscreen`, otherwise the size of the canvas' parent.
fn target_size(fullscreen: bool, canvas: &HtmlCanvasElement, window: &Window) -> (f64, f64) {
	if fullscreen {
		return window_size(window);
	}
	canvas
		.parent_element()
		.map(|p| (p.client_width() as f64, p.client_height() as f64))
		.filter(|&(w, h)| w > 0.0 && h > 0.0)
		.unwrap_or((1200.0, 800.0))
}

/// Mouse position relative to the canvas' top-left corner.
fn canvas_point(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

/// Interactive view of the file/chunk graph served at `config.graph_url()`.
///
/// `theme` defaults to the one named in `config`. The canvas fills its parent
/// container and follows window resizes; set `fullscreen = true` to size it to
/// the window instead.
#[component]
pub fn ForceGraphCanvas(
	config: GraphConfig,
	#[prop(optional)] theme: Option<Theme>,
	#[prop(default = false)] fullscreen: bool,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let url = config.graph_url();
	let tick_ms = config.simulation.tick_interval_ms.max(1.0) as i32;
	let theme = theme.unwrap_or_else(|| Theme::named(&config.theme));
	let legend = theme
		.node
		.legend()
		.map(|(kind, color)| (kind, color.to_css()))
		.to_vec();
	let engine: SharedEngine = Rc::new(RefCell::new(GraphEngine::new(
		config,
		theme,
		BrowserClock,
		js_sys::Math::random() * 1000.0,
	)));

	let status = RwSignal::new(LoadStatus::Loading);
	let stats = RwSignal::new(GraphStats::default());
	let details = RwSignal::new(None::<NodeDetails>);
	let reload = RwSignal::new(0u32);

	let engine_fetch = engine.clone();
	Effect::new(move |_| {
		let attempt = reload.get();
		info!("chunk-graph: fetching graph (attempt {})", attempt + 1);
		engine_fetch
			.borrow_mut()
			.push(EngineEvent::FetchStarted { attempt });
		let (engine, url) = (engine_fetch.clone(), url.clone());
		spawn_local(async move {
			let event = match fetch_graph(&url).await {
				Ok(document) => EngineEvent::DocumentLoaded { attempt, document },
				Err(error) => EngineEvent::FetchFailed { attempt, error },
			};
			engine.borrow_mut().push(event);
		});
	});

	let animate: SharedClosure = Rc::new(RefCell::new(None));
	let ticker: SharedClosure = Rc::new(RefCell::new(None));
	let resize_cb: SharedClosure = Rc::new(RefCell::new(None));
	let engine_init = engine.clone();

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		let (w, h) = target_size(fullscreen, &canvas, &window);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx = match canvas.get_context("2d") {
			Ok(Some(ctx)) => ctx,
			_ => {
				error!("chunk-graph: canvas 2d context unavailable");
				return;
			}
		};
		let Ok(ctx) = ctx.dyn_into::<CanvasRenderingContext2d>() else {
			error!("chunk-graph: unexpected canvas context type");
			return;
		};

		let canvas_resize = canvas.clone();
		*resize_cb.borrow_mut() = Some(Closure::new(move || {
			let Some(win) = web_sys::window() else {
				return;
			};
			let (nw, nh) = target_size(fullscreen, &canvas_resize, &win);
			canvas_resize.set_width(nw as u32);
			canvas_resize.set_height(nh as u32);
		}));
		if let Some(ref cb) = *resize_cb.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		let engine_tick = engine_init.clone();
		*ticker.borrow_mut() = Some(Closure::new(move || {
			engine_tick.borrow_mut().push(EngineEvent::Tick);
		}));
		if let Some(ref cb) = *ticker.borrow() {
			if let Ok(handle) = window.set_interval_with_callback_and_timeout_and_arguments_0(
				cb.as_ref().unchecked_ref(),
				tick_ms,
			) {
				on_cleanup(move || {
					if let Some(win) = web_sys::window() {
						win.clear_interval_with_handle(handle);
					}
				});
			}
		}

		let (engine_anim, animate_inner, canvas_anim) =
			(engine_init.clone(), animate.clone(), canvas.clone());
		let mut painted_size = (0.0, 0.0);
		*animate.borrow_mut() = Some(Closure::new(move || {
			{
				let mut engine = engine_anim.borrow_mut();
				let update = engine.process_pending();
				if update.status_changed {
					status.set(engine.status().clone());
				}
				if update.document_changed {
					stats.set(engine.stats());
				}
				if update.selection_changed || update.document_changed {
					details.set(engine.selected_details());
				}
				let (cw, ch) = (canvas_anim.width() as f64, canvas_anim.height() as f64);
				if update.needs_redraw() || painted_size != (cw, ch) {
					let _ = web_sys::HtmlElement::style(&canvas_anim)
						.set_property("cursor", engine.cursor());
					let scene = engine.scene(cw, ch);
					render::paint(&scene, engine.viewport(), &ctx, engine.theme());
					painted_size = (cw, ch);
				}
			}
			if let Some(ref cb) = *animate_inner.borrow() {
				if let Some(win) = web_sys::window() {
					let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
				}
			}
		}));
		if let Some(ref cb) = *animate.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let push_pointer = {
		let engine = engine.clone();
		move |event: PointerEvent| engine.borrow_mut().push(EngineEvent::Pointer(event))
	};

	let pointer_md = push_pointer.clone();
	let on_mousedown = move |ev: MouseEvent| {
		if let Some((x, y)) = canvas_point(canvas_ref, &ev) {
			pointer_md(PointerEvent::Down { x, y });
		}
	};

	let pointer_mm = push_pointer.clone();
	let on_mousemove = move |ev: MouseEvent| {
		if let Some((x, y)) = canvas_point(canvas_ref, &ev) {
			pointer_mm(PointerEvent::Move { x, y });
		}
	};

	let pointer_mu = push_pointer.clone();
	let on_mouseup = move |ev: MouseEvent| {
		if let Some((x, y)) = canvas_point(canvas_ref, &ev) {
			pointer_mu(PointerEvent::Up { x, y });
		}
	};

	let pointer_ml = push_pointer.clone();
	let on_mouseleave = move |_: MouseEvent| pointer_ml(PointerEvent::Leave);

	let pointer_wh = push_pointer;
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		if let Some((x, y)) = canvas_point(canvas_ref, &ev) {
			pointer_wh(PointerEvent::Wheel {
				x,
				y,
				delta_y: ev.delta_y(),
			});
		}
	};

	let engine_key = engine.clone();
	let on_keydown = move |ev: KeyboardEvent| {
		if ev.key() == "Escape" {
			engine_key.borrow_mut().push(EngineEvent::ClearSelection);
		}
	};

	let engine_reset = engine.clone();
	let on_reset_view = move |_: MouseEvent| {
		engine_reset.borrow_mut().push(EngineEvent::ResetView);
	};

	let engine_relayout = engine.clone();
	let on_relayout = move |_: MouseEvent| {
		engine_relayout
			.borrow_mut()
			.push(EngineEvent::RestartSimulation);
	};

	let engine_close = engine;
	let on_close_details = move |_: MouseEvent| {
		engine_close.borrow_mut().push(EngineEvent::ClearSelection);
	};

	let refresh = move |_: MouseEvent| reload.update(|n| *n += 1);

	view! {
		<div class="graph-layout">
			<div class="graph-canvas-host">
				<canvas
					node_ref=canvas_ref
					class="graph-canvas"
					tabindex="0"
					on:mousedown=on_mousedown
					on:mousemove=on_mousemove
					on:mouseup=on_mouseup
					on:mouseleave=on_mouseleave
					on:wheel=on_wheel
					on:keydown=on_keydown
					style="display: block; cursor: grab;"
				/>
			</div>
			<aside class="graph-panel">
				<div class="graph-controls">
					<button on:click=refresh>"Refresh"</button>
					<button on:click=on_reset_view>"Reset View"</button>
					<button on:click=on_relayout>"Re-run Layout"</button>
				</div>

				<div class="graph-status">
					{move || match status.get() {
						LoadStatus::Loading => view! { <p class="loading">"Loading graph..."</p> }.into_any(),
						LoadStatus::Failed(message) => view! {
							<p class="error">"Failed to load graph: " {message}</p>
							<button on:click=move |_| reload.update(|n| *n += 1)>"Retry"</button>
						}.into_any(),
						LoadStatus::Ready => ().into_any(),
					}}
				</div>

				<StatsPanel stats=stats />
				<NodeLegend entries=legend />

				<section
					class="node-details"
					style:display=move || if details.with(Option::is_some) { "block" } else { "none" }
				>
					<button class="close" on:click=on_close_details>"Close"</button>
					{move || details.get().map(|d| view! { <NodeDetailsView details=d /> })}
				</section>
			</aside>
		</div>
	}
}

#[component]
fn StatsPanel(stats: RwSignal<GraphStats>) -> impl IntoView {
	view! {
		<section class="graph-stats">
			<h2>"Graph"</h2>
			{move || {
				let s = stats.get();
				view! {
					<ul>
						<li>"Nodes: " {s.total_nodes()}</li>
						<li>"Edges: " {s.total_edges()}</li>
						<li>"Files: " {s.files}</li>
						<li>"Chunks: " {s.chunks}</li>
						<li>"Other nodes: " {s.other_nodes}</li>
						<li>"HAS_CHUNK edges: " {s.has_chunk_edges}</li>
						<li>"NEXT edges: " {s.next_edges}</li>
						<li>"Other edges: " {s.other_edges}</li>
						<li>"Dropped edges: " {s.dropped_edges}</li>
					</ul>
				}
			}}
		</section>
	}
}

#[component]
fn NodeLegend(entries: Vec<(NodeKind, String)>) -> impl IntoView {
	let items = entries
		.into_iter()
		.map(|(kind, css)| {
			let name = match kind {
				NodeKind::File => "File",
				NodeKind::Chunk => "Chunk",
				NodeKind::Other => "Other",
			};
			view! {
				<li>
					<span class="swatch" style:background-color=css></span>
					{name}
				</li>
			}
		})
		.collect_view();
	view! {
		<section class="graph-legend">
			<h2>"Node Types"</h2>
			<ul>{items}</ul>
		</section>
	}
}

#[component]
fn NodeDetailsView(details: NodeDetails) -> impl IntoView {
	let properties = details
		.properties
		.into_iter()
		.map(|row| view! { <li><strong>{row.key}": "</strong>{row.value}</li> })
		.collect_view();
	let connections = details
		.connections
		.into_iter()
		.map(|c| {
			view! {
				<li>
					<span class="edge-kind">{c.kind.as_str()}</span>
					" " {c.direction.arrow()} " " {c.neighbor_label}
					<span class="direction">" (" {c.direction.as_str()} ")"</span>
				</li>
			}
		})
		.collect_view();

	view! {
		<h2>{details.label}</h2>
		<p class="node-kind">{details.kind.as_str()}</p>
		<p class="node-id"><code>{details.id}</code></p>
		<h3>"Properties"</h3>
		<ul class="properties">{properties}</ul>
		<h3>"Connections"</h3>
		<ul class="connections">{connections}</ul>
	}
}
