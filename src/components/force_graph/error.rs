//! Errors raised while fetching the graph document.

use thiserror::Error;

/// Why a graph fetch failed. Every variant is retryable.
#[derive(Error, Debug)]
pub enum GraphError {
	#[error("HTTP {status}: {status_text}")]
	Http { status: u16, status_text: String },

	#[error("network error: {0}")]
	Network(String),

	#[error("invalid graph document: {0}")]
	Parse(#[from] serde_json::Error),

	#[error("{0} unavailable")]
	Unavailable(&'static str),
}

impl GraphError {
	/// Wraps a JavaScript exception thrown by `fetch` or a body reader.
	pub fn from_js(value: wasm_bindgen::JsValue) -> Self {
		let message = value
			.as_string()
			.or_else(|| {
				js_sys::Reflect::get(&value, &"message".into())
					.ok()
					.and_then(|m| m.as_string())
			})
			.unwrap_or_else(|| format!("{value:?}"));
		GraphError::Network(message)
	}
}
