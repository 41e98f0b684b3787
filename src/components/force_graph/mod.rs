//! Knowledge graph view of ingested files and their chunks.
//!
//! Layered bottom-up:
//! - [`types`] and [`graph`]: the wire document and its resolved, index-based form
//! - [`layout`], [`simulation`] and [`scheduler`]: kinematic state, the pure force
//!   step, and the fixed-cadence loop that publishes new layouts
//! - [`viewport`], [`interaction`] and [`scene`]: pan/zoom, pointer gestures and
//!   the screen-space frame description
//! - [`engine`]: the single consumer tying the above together
//! - `component` and `render`: the Leptos canvas and its painter
//!
//! # Example
//!
//! ```ignore
//! use chunk_graph::{ForceGraphCanvas, GraphConfig};
//!
//! view! { <ForceGraphCanvas config=GraphConfig::default() fullscreen=true /> }
//! ```

mod component;
pub mod config;
pub mod details;
pub mod engine;
pub mod error;
mod fetch;
pub mod graph;
pub mod interaction;
pub mod layout;
mod render;
pub mod scene;
pub mod scheduler;
pub mod simulation;
pub mod theme;
pub mod types;
pub mod viewport;

pub use component::ForceGraphCanvas;
pub use config::{GraphConfig, SimulationConfig, ViewportConfig};
pub use engine::{EngineEvent, GraphEngine, LoadStatus};
pub use error::GraphError;
pub use fetch::fetch_graph;
pub use theme::Theme;
pub use types::{EdgeKind, GraphDocument, GraphEdge, GraphNode, NodeKind};
