//! Loading the graph document over HTTP.

use log::{debug, info};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::Response;

use super::error::GraphError;
use super::types::GraphDocument;

/// GETs `url` and parses the body as a [`GraphDocument`].
pub async fn fetch_graph(url: &str) -> Result<GraphDocument, GraphError> {
	let window = web_sys::window().ok_or(GraphError::Unavailable("window"))?;
	debug!("chunk-graph: fetching {url}");

	let response = JsFuture::from(window.fetch_with_str(url))
		.await
		.map_err(GraphError::from_js)?;
	let response: Response = response
		.dyn_into()
		.map_err(|_| GraphError::Network("fetch did not return a Response".into()))?;

	if !response.ok() {
		return Err(GraphError::Http {
			status: response.status(),
			status_text: response.status_text(),
		});
	}

	let body = JsFuture::from(response.text().map_err(GraphError::from_js)?)
		.await
		.map_err(GraphError::from_js)?
		.as_string()
		.ok_or(GraphError::Network("response body is not text".into()))?;

	let document = GraphDocument::from_json(&body)?;
	info!(
		"chunk-graph: fetched {} nodes, {} edges",
		document.nodes.len(),
		document.edges.len()
	);
	Ok(document)
}
