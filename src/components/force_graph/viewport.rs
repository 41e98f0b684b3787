//! Pan and zoom mapping between simulation space and screen space.
//!
//! `screen = (sim - pan) * scale` and `sim = screen / scale + pan`. Pan is
//! expressed in simulation units and is unbounded; scale is clamped to the
//! configured range.

use super::config::ViewportConfig;

/// Pan offset and zoom scale applied to the whole graph.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewportTransform {
	pan_x: f64,
	pan_y: f64,
	scale: f64,
	min_scale: f64,
	max_scale: f64,
}

impl Default for ViewportTransform {
	fn default() -> Self {
		Self::new(&ViewportConfig::default())
	}
}

impl ViewportTransform {
	pub fn new(config: &ViewportConfig) -> Self {
		let min_scale = config.min_scale.max(f64::MIN_POSITIVE);
		let max_scale = config.max_scale.max(min_scale);
		Self {
			pan_x: 0.0,
			pan_y: 0.0,
			scale: 1.0_f64.clamp(min_scale, max_scale),
			min_scale,
			max_scale,
		}
	}

	pub fn pan(&self) -> (f64, f64) {
		(self.pan_x, self.pan_y)
	}

	pub fn scale(&self) -> f64 {
		self.scale
	}

	pub fn to_screen(&self, x: f64, y: f64) -> (f64, f64) {
		((x - self.pan_x) * self.scale, (y - self.pan_y) * self.scale)
	}

	pub fn to_sim(&self, sx: f64, sy: f64) -> (f64, f64) {
		(sx / self.scale + self.pan_x, sy / self.scale + self.pan_y)
	}

	/// Translates the pan offset by `(dx, dy)` simulation units.
	pub fn pan_by(&mut self, dx: f64, dy: f64) {
		if dx.is_finite() && dy.is_finite() {
			self.pan_x += dx;
			self.pan_y += dy;
		}
	}

	/// Moves the view so content follows a pointer drag of `(dx, dy)` pixels.
	pub fn drag_by_screen(&mut self, dx: f64, dy: f64) {
		self.pan_by(-dx / self.scale, -dy / self.scale);
	}

	/// Multiplies the scale by `factor`, clamped to the configured range,
	/// keeping the simulation point under `(sx, sy)` fixed on screen.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, factor: f64) {
		if !factor.is_finite() || factor <= 0.0 {
			return;
		}
		let (anchor_x, anchor_y) = self.to_sim(sx, sy);
		self.scale = (self.scale * factor).clamp(self.min_scale, self.max_scale);
		self.pan_x = anchor_x - sx / self.scale;
		self.pan_y = anchor_y - sy / self.scale;
	}

	/// Restores pan `(0, 0)` and scale 1.
	pub fn reset(&mut self) {
		self.pan_x = 0.0;
		self.pan_y = 0.0;
		self.scale = 1.0_f64.clamp(self.min_scale, self.max_scale);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn close(a: (f64, f64), b: (f64, f64)) -> bool {
		(a.0 - b.0).abs() < 1e-9 && (a.1 - b.1).abs() < 1e-9
	}

	#[test]
	fn identity_by_default() {
		let view = ViewportTransform::default();
		assert_eq!(view.to_screen(12.0, 34.0), (12.0, 34.0));
		assert_eq!(view.to_sim(12.0, 34.0), (12.0, 34.0));
	}

	#[test]
	fn zoom_keeps_cursor_point_fixed() {
		let mut view = ViewportTransform::default();
		view.pan_by(40.0, -15.0);
		let cursor = (320.0, 240.0);
		let before = view.to_sim(cursor.0, cursor.1);
		view.zoom_at(cursor.0, cursor.1, 1.1);
		assert!(close(view.to_screen(before.0, before.1), cursor));
		view.zoom_at(cursor.0, cursor.1, 0.9);
		assert!(close(view.to_screen(before.0, before.1), cursor));
	}

	#[test]
	fn scale_is_clamped() {
		let mut view = ViewportTransform::default();
		for _ in 0..100 {
			view.zoom_at(0.0, 0.0, 1.1);
		}
		assert_eq!(view.scale(), 3.0);
		for _ in 0..200 {
			view.zoom_at(0.0, 0.0, 0.9);
		}
		assert_eq!(view.scale(), 0.1);
	}

	#[test]
	fn invalid_factors_are_ignored() {
		let mut view = ViewportTransform::default();
		view.zoom_at(10.0, 10.0, 0.0);
		view.zoom_at(10.0, 10.0, f64::NAN);
		view.zoom_at(10.0, 10.0, -2.0);
		assert_eq!(view, ViewportTransform::default());
	}

	#[test]
	fn screen_drag_moves_content_with_pointer() {
		let mut view = ViewportTransform::default();
		view.zoom_at(0.0, 0.0, 2.0);
		let before = view.to_screen(100.0, 100.0);
		view.drag_by_screen(30.0, -10.0);
		let after = view.to_screen(100.0, 100.0);
		assert!(close(after, (before.0 + 30.0, before.1 - 10.0)));
	}

	#[test]
	fn reset_restores_identity() {
		let mut view = ViewportTransform::default();
		view.pan_by(1e6, -1e6);
		view.zoom_at(5.0, 5.0, 1.1);
		view.reset();
		assert_eq!(view.pan(), (0.0, 0.0));
		assert_eq!(view.scale(), 1.0);
	}
}
