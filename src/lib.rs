//! chunk-graph: interactive force-directed view of a document knowledge graph.
//!
//! Files and the chunks they were split into are fetched from the ingestion
//! API and laid out with a small spring/repulsion simulation on a canvas,
//! with pan/zoom, node dragging and a details panel for the selected node.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;

pub use components::force_graph::{
	EdgeKind, ForceGraphCanvas, GraphConfig, GraphDocument, GraphEdge, GraphError, GraphNode,
	NodeKind, Theme,
};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("chunk-graph: logging initialized");
}

fn config_script_text() -> Option<String> {
	let window: Window = web_sys::window()?;
	let element = window.document()?.get_element_by_id("graph-config")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	script.text().ok()
}

/// Load overrides from a script element with id="graph-config".
/// Missing fields keep their defaults; a missing element means all defaults.
fn load_config() -> GraphConfig {
	let Some(text) = config_script_text() else {
		return GraphConfig::default();
	};
	match GraphConfig::from_json(&text) {
		Ok(config) => {
			info!("chunk-graph: graph endpoint {}", config.graph_url());
			config
		}
		Err(e) => {
			warn!("chunk-graph: ignoring invalid graph config: {}", e);
			GraphConfig::default()
		}
	}
}

const STYLE: &str = r#"
body { margin: 0; font-family: sans-serif; }
.graph-layout { display: flex; height: 100vh; }
.graph-canvas-host { flex: 1; min-width: 0; overflow: hidden; }
.graph-canvas-host > canvas { outline: none; }
.graph-panel { width: 320px; overflow-y: auto; padding: 12px; border-left: 1px solid #e5e7eb; background: #f9fafb; }
.graph-controls button { margin-right: 6px; }
.graph-status .error { color: #b91c1c; }
.node-details .close { float: right; }
.edge-kind { font-family: monospace; color: #475569; }
.graph-legend ul { list-style: none; padding: 0; }
.graph-legend .swatch { display: inline-block; width: 12px; height: 12px; border-radius: 50%; margin-right: 6px; vertical-align: middle; }
"#;

/// Main application component.
/// Reads configuration from the DOM and renders the graph with its side panel.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let config = load_config();

	view! {
		<Html attr:lang="en" attr:dir="ltr" />
		<Title text="Knowledge Graph" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />
		<Style>{STYLE}</Style>

		<ForceGraphCanvas config=config />
	}
}
