//! Visual theming for the knowledge graph view.
//!
//! Colours and sizes for each node and edge kind, plus the selection/hover
//! emphasis applied on top of them.

use super::types::{EdgeKind, NodeKind};

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Lighten the color by a factor (0.0 = unchanged, 1.0 = white)
	pub fn lighten(self, factor: f64) -> Self {
		let f = factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 + (255.0 - self.r as f64) * f) as u8,
			g: (self.g as f64 + (255.0 - self.g as f64) * f) as u8,
			b: (self.b as f64 + (255.0 - self.b as f64) * f) as u8,
			a: self.a,
		}
	}

	/// Darken the color by a factor (0.0 = unchanged, 1.0 = black)
	pub fn darken(self, factor: f64) -> Self {
		let f = 1.0 - factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 * f) as u8,
			g: (self.g as f64 * f) as u8,
			b: (self.b as f64 * f) as u8,
			a: self.a,
		}
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Canvas background.
#[derive(Clone, Debug)]
pub struct BackgroundStyle {
	pub color: Color,
	/// Grid line color
	pub grid_color: Color,
	/// Grid cell size in simulation units (0 = no grid)
	pub grid_spacing: f64,
}

/// Node fill, size and emphasis.
#[derive(Clone, Debug)]
pub struct NodeStyle {
	pub file_color: Color,
	pub chunk_color: Color,
	pub other_color: Color,
	pub hovered_color: Color,
	pub selected_color: Color,
	/// Radius of file nodes in simulation units
	pub file_radius: f64,
	/// Radius of chunk (and unknown) nodes in simulation units
	pub chunk_radius: f64,
	pub hovered_scale: f64,
	pub selected_scale: f64,
	pub outline_color: Color,
	/// Outline width in screen pixels
	pub outline_width: f64,
	pub shadow_color: Color,
	/// Shadow offset in simulation units
	pub shadow_offset: f64,
	/// Whether fills use a radial highlight gradient
	pub use_gradient: bool,
}

impl NodeStyle {
	pub fn base_color(&self, kind: NodeKind) -> Color {
		match kind {
			NodeKind::File => self.file_color,
			NodeKind::Chunk => self.chunk_color,
			NodeKind::Other => self.other_color,
		}
	}

	pub fn base_radius(&self, kind: NodeKind) -> f64 {
		match kind {
			NodeKind::File => self.file_radius,
			NodeKind::Chunk | NodeKind::Other => self.chunk_radius,
		}
	}

	/// Swatches for the node-type legend.
	pub fn legend(&self) -> [(NodeKind, Color); 2] {
		[
			(NodeKind::File, self.base_color(NodeKind::File)),
			(NodeKind::Chunk, self.base_color(NodeKind::Chunk)),
		]
	}
}

/// Edge stroke per relation type.
#[derive(Clone, Debug)]
pub struct EdgeStyle {
	pub has_chunk_color: Color,
	pub next_color: Color,
	pub other_color: Color,
	/// Stroke widths in screen pixels
	pub has_chunk_width: f64,
	pub next_width: f64,
	pub other_width: f64,
	pub opacity: f64,
	/// Arrowhead length in simulation units (0 = no arrows)
	pub arrow_size: f64,
	pub caption_color: Color,
	/// Caption font size in screen pixels (0 = no captions)
	pub caption_size: f64,
}

impl EdgeStyle {
	pub fn color(&self, kind: EdgeKind) -> Color {
		match kind {
			EdgeKind::HasChunk => self.has_chunk_color,
			EdgeKind::Next => self.next_color,
			EdgeKind::Other => self.other_color,
		}
	}

	pub fn width(&self, kind: EdgeKind) -> f64 {
		match kind {
			EdgeKind::HasChunk => self.has_chunk_width,
			EdgeKind::Next => self.next_width,
			EdgeKind::Other => self.other_width,
		}
	}
}

/// Node label text.
#[derive(Clone, Debug)]
pub struct LabelStyle {
	pub color: Color,
	/// Font size in screen pixels
	pub font_size: f64,
	/// Gap between node edge and label baseline, in simulation units
	pub offset: f64,
	/// Labels are hidden below this zoom level
	pub min_scale: f64,
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	pub name: &'static str,
	pub background: BackgroundStyle,
	pub node: NodeStyle,
	pub edge: EdgeStyle,
	pub label: LabelStyle,
}

impl Theme {
	/// Light theme matching the rest of the ingestion UI (default)
	pub fn light() -> Self {
		Self {
			name: "light",
			background: BackgroundStyle {
				color: Color::rgb(255, 255, 255),
				grid_color: Color::rgb(241, 245, 249),
				grid_spacing: 50.0,
			},
			node: NodeStyle {
				file_color: Color::rgb(59, 130, 246),
				chunk_color: Color::rgb(16, 185, 129),
				other_color: Color::rgb(139, 92, 246),
				hovered_color: Color::rgb(245, 158, 11),
				selected_color: Color::rgb(239, 68, 68),
				file_radius: 20.0,
				chunk_radius: 12.0,
				hovered_scale: 1.3,
				selected_scale: 1.5,
				outline_color: Color::rgb(255, 255, 255),
				outline_width: 3.0,
				shadow_color: Color::rgba(0, 0, 0, 0.2),
				shadow_offset: 2.0,
				use_gradient: false,
			},
			edge: EdgeStyle {
				has_chunk_color: Color::rgb(96, 165, 250),
				next_color: Color::rgb(148, 163, 184),
				other_color: Color::rgb(203, 213, 225),
				has_chunk_width: 3.0,
				next_width: 2.0,
				other_width: 1.5,
				opacity: 0.7,
				arrow_size: 10.0,
				caption_color: Color::rgb(107, 114, 128),
				caption_size: 10.0,
			},
			label: LabelStyle {
				color: Color::rgb(55, 65, 81),
				font_size: 13.0,
				offset: 16.0,
				min_scale: 0.35,
			},
		}
	}

	/// Dark theme with gradient-shaded nodes
	pub fn midnight() -> Self {
		Self {
			name: "midnight",
			background: BackgroundStyle {
				color: Color::rgb(18, 20, 28),
				grid_color: Color::rgb(25, 28, 38),
				grid_spacing: 50.0,
			},
			node: NodeStyle {
				file_color: Color::rgb(94, 129, 172),
				chunk_color: Color::rgb(100, 148, 160),
				other_color: Color::rgb(130, 120, 150),
				hovered_color: Color::rgb(235, 190, 110),
				selected_color: Color::rgb(220, 110, 100),
				file_radius: 20.0,
				chunk_radius: 12.0,
				hovered_scale: 1.3,
				selected_scale: 1.5,
				outline_color: Color::rgba(255, 255, 255, 0.6),
				outline_width: 1.5,
				shadow_color: Color::rgba(0, 0, 0, 0.4),
				shadow_offset: 2.0,
				use_gradient: true,
			},
			edge: EdgeStyle {
				has_chunk_color: Color::rgb(100, 120, 150),
				next_color: Color::rgb(80, 95, 115),
				other_color: Color::rgb(70, 80, 95),
				has_chunk_width: 2.5,
				next_width: 1.5,
				other_width: 1.0,
				opacity: 0.6,
				arrow_size: 8.0,
				caption_color: Color::rgb(120, 130, 150),
				caption_size: 10.0,
			},
			label: LabelStyle {
				color: Color::rgb(220, 225, 235),
				font_size: 13.0,
				offset: 16.0,
				min_scale: 0.35,
			},
		}
	}
}

impl Theme {
	/// Looks up a built-in theme, falling back to [`Theme::light`].
	pub fn named(name: &str) -> Self {
		match name {
			"midnight" | "dark" => Self::midnight(),
			_ => Self::light(),
		}
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::light()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn css_output() {
		assert_eq!(Color::rgb(59, 130, 246).to_css(), "#3b82f6");
		assert_eq!(
			Color::rgb(0, 0, 0).with_alpha(0.5).to_css(),
			"rgba(0, 0, 0, 0.5)"
		);
	}

	#[test]
	fn lighten_and_darken_bounds() {
		let c = Color::rgb(100, 100, 100);
		assert_eq!(c.lighten(1.0), Color::rgb(255, 255, 255));
		assert_eq!(c.darken(1.0), Color::rgb(0, 0, 0));
		assert_eq!(c.lighten(0.0), c);
	}

	#[test]
	fn named_lookup() {
		assert_eq!(Theme::named("midnight").name, "midnight");
		assert!(Theme::named("dark").node.use_gradient);
		assert_eq!(Theme::named("solarized").name, "light");
	}

	#[test]
	fn legend_follows_node_colors() {
		let theme = Theme::midnight();
		let legend = theme.node.legend();
		assert_eq!(legend[0], (NodeKind::File, theme.node.file_color));
		assert_eq!(legend[1], (NodeKind::Chunk, theme.node.chunk_color));
		assert_ne!(Theme::light().node.legend()[0].1, legend[0].1);
	}

	#[test]
	fn files_are_larger_than_chunks() {
		let theme = Theme::default();
		assert!(theme.node.base_radius(NodeKind::File) > theme.node.base_radius(NodeKind::Chunk));
		assert_eq!(
			theme.node.base_radius(NodeKind::Other),
			theme.node.base_radius(NodeKind::Chunk)
		);
	}
}
