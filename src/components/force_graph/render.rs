//! Canvas painting for a built [`Scene`].
//!
//! Everything in the scene is already in screen space, so painting is a
//! straight walk over its lists in order:
//! 1. Background and grid
//! 2. Edges with arrowheads, then edge captions
//! 3. Node shadows, fills and outlines
//! 4. Node labels

use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::scene::{EdgeShape, Emphasis, NodeShape, Scene, TextShape};
use super::theme::Theme;
use super::viewport::ViewportTransform;

/// Grid lines closer than this on screen are skipped.
const MIN_GRID_STEP_PX: f64 = 8.0;

/// Paints `scene` onto `ctx`.
pub fn paint(
	scene: &Scene,
	viewport: &ViewportTransform,
	ctx: &CanvasRenderingContext2d,
	theme: &Theme,
) {
	draw_background(scene, viewport, ctx, theme);

	for edge in &scene.edges {
		draw_edge(ctx, edge);
	}
	ctx.set_text_align("center");
	for caption in &scene.captions {
		draw_text(ctx, caption);
	}

	let k = viewport.scale();
	for node in &scene.nodes {
		draw_node(ctx, node, theme, k);
	}
	for label in &scene.labels {
		draw_text(ctx, label);
	}
}

fn draw_background(
	scene: &Scene,
	viewport: &ViewportTransform,
	ctx: &CanvasRenderingContext2d,
	theme: &Theme,
) {
	let bg = &theme.background;
	ctx.set_fill_style_str(&bg.color.to_css());
	ctx.fill_rect(0.0, 0.0, scene.width, scene.height);

	let step = bg.grid_spacing * viewport.scale();
	if bg.grid_spacing <= 0.0 || !step.is_finite() || step < MIN_GRID_STEP_PX {
		return;
	}

	// Grid lines pass through the simulation origin.
	let (origin_x, origin_y) = viewport.to_screen(0.0, 0.0);
	let start_x = origin_x.rem_euclid(step);
	let start_y = origin_y.rem_euclid(step);

	ctx.set_stroke_style_str(&bg.grid_color.to_css());
	ctx.set_line_width(1.0);
	ctx.begin_path();
	let mut x = start_x;
	while x <= scene.width {
		ctx.move_to(x, 0.0);
		ctx.line_to(x, scene.height);
		x += step;
	}
	let mut y = start_y;
	while y <= scene.height {
		ctx.move_to(0.0, y);
		ctx.line_to(scene.width, y);
		y += step;
	}
	ctx.stroke();
}

fn draw_edge(ctx: &CanvasRenderingContext2d, edge: &EdgeShape) {
	let css = edge.color.to_css();
	ctx.set_stroke_style_str(&css);
	ctx.set_line_width(edge.width);
	ctx.begin_path();
	ctx.move_to(edge.from.0, edge.from.1);
	ctx.line_to(edge.to.0, edge.to.1);
	ctx.stroke();

	if let Some([tip, left, right]) = edge.arrow {
		ctx.set_fill_style_str(&css);
		ctx.begin_path();
		ctx.move_to(tip.0, tip.1);
		ctx.line_to(left.0, left.1);
		ctx.line_to(right.0, right.1);
		ctx.close_path();
		ctx.fill();
	}
}

fn draw_node(ctx: &CanvasRenderingContext2d, node: &NodeShape, theme: &Theme, k: f64) {
	let style = &theme.node;
	let (x, y, r) = (node.x, node.y, node.radius);
	if r.is_nan() || r <= 0.0 {
		return;
	}

	let shadow = style.shadow_offset * k;
	if shadow > 0.0 {
		ctx.set_fill_style_str(&style.shadow_color.to_css());
		ctx.begin_path();
		let _ = ctx.arc(x + shadow, y + shadow, r, 0.0, 2.0 * PI);
		ctx.fill();
	}

	let gradient = style
		.use_gradient
		.then(|| ctx.create_radial_gradient(x - r * 0.3, y - r * 0.3, r * 0.1, x, y, r).ok())
		.flatten();
	match gradient {
		Some(gradient) => {
			let _ = gradient.add_color_stop(0.0, &node.fill.lighten(0.35).to_css());
			let _ = gradient.add_color_stop(1.0, &node.fill.darken(0.15).to_css());
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
		}
		None => ctx.set_fill_style_str(&node.fill.to_css()),
	}
	ctx.begin_path();
	let _ = ctx.arc(x, y, r, 0.0, 2.0 * PI);
	ctx.fill();

	let outline = match node.emphasis {
		Emphasis::Selected => style.outline_width * 1.5,
		_ => style.outline_width,
	};
	if outline > 0.0 {
		ctx.set_stroke_style_str(&style.outline_color.to_css());
		ctx.set_line_width(outline);
		ctx.stroke();
	}
}

fn draw_text(ctx: &CanvasRenderingContext2d, text: &TextShape) {
	if text.text.is_empty() {
		return;
	}
	ctx.set_font(&format!("{}px sans-serif", text.font_size));
	ctx.set_fill_style_str(&text.color.to_css());
	let _ = ctx.fill_text(&text.text, text.x, text.y);
}
