use serde::{Deserialize, Serialize};

/// Hard zoom range; configured bounds are narrowed into it.
pub const ZOOM_MIN: f32 = 0.5;
pub const ZOOM_MAX: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewportConfig {
    pub min_zoom: f32,
    pub max_zoom: f32,
    pub zoom_step: f32,
    /// Assumed chart width used for the initial horizontal centering.
    pub estimated_content_width: f32,
    pub min_center_pan_x: f32,
    pub mount_pan_y: f32,
    /// Pan applied when jumping to an employee.
    pub jump_anchor: (f32, f32),
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            min_zoom: ZOOM_MIN,
            max_zoom: ZOOM_MAX,
            zoom_step: 0.1,
            estimated_content_width: 800.0,
            min_center_pan_x: 50.0,
            mount_pan_y: 50.0,
            jump_anchor: (50.0, 100.0),
        }
    }
}

/// Zoom and pan of the chart surface. Independent of the tree contents.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    config: ViewportConfig,
    zoom: f32,
    pan_x: f32,
    pan_y: f32,
    centered: bool,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(ViewportConfig::default())
    }
}

impl Viewport {
    pub fn new(mut config: ViewportConfig) -> Self {
        let defaults = ViewportConfig::default();
        if !config.min_zoom.is_finite() {
            config.min_zoom = defaults.min_zoom;
        }
        if !config.max_zoom.is_finite() {
            config.max_zoom = defaults.max_zoom;
        }
        if !config.zoom_step.is_finite() || config.zoom_step <= 0.0 {
            config.zoom_step = defaults.zoom_step;
        }
        if config.min_zoom > config.max_zoom {
            std::mem::swap(&mut config.min_zoom, &mut config.max_zoom);
        }
        config.min_zoom = config.min_zoom.clamp(ZOOM_MIN, ZOOM_MAX);
        config.max_zoom = config.max_zoom.clamp(ZOOM_MIN, ZOOM_MAX);
        Self {
            config,
            zoom: 1.0_f32.clamp(config.min_zoom, config.max_zoom),
            pan_x: 0.0,
            pan_y: 0.0,
            centered: false,
        }
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn pan(&self) -> (f32, f32) {
        (self.pan_x, self.pan_y)
    }

    pub fn config(&self) -> &ViewportConfig {
        &self.config
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom + self.config.zoom_step);
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom - self.config.zoom_step);
    }

    /// Clamped to the configured range. NaN is ignored.
    pub fn set_zoom(&mut self, zoom: f32) {
        if zoom.is_nan() {
            return;
        }
        self.zoom = zoom.clamp(self.config.min_zoom, self.config.max_zoom);
    }

    pub fn set_pan(&mut self, x: f32, y: f32) {
        self.pan_x = x;
        self.pan_y = y;
    }

    pub fn pan_by(&mut self, dx: f32, dy: f32) {
        self.pan_x += dx;
        self.pan_y += dy;
    }

    /// Rough horizontal centering for the first layout. Later calls do nothing.
    pub fn center_on_mount(&mut self, container_width: f32) {
        if self.centered {
            return;
        }
        let x = (container_width - self.config.estimated_content_width) / 2.0;
        self.pan_x = x.max(self.config.min_center_pan_x);
        self.pan_y = self.config.mount_pan_y;
        self.centered = true;
    }

    pub fn reset_to_anchor(&mut self) {
        let (x, y) = self.config.jump_anchor;
        self.set_pan(x, y);
    }
}
