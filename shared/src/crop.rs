use serde::{Deserialize, Serialize};

pub const MIN_ZOOM: f64 = 1.0;
pub const MAX_ZOOM: f64 = 5.0;

/// Offset of the media from the viewport center, in viewport pixels.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
pub struct CropPoint {
    pub x: f64,
    pub y: f64,
}

impl CropPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Natural pixel dimensions of the loaded image.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct MediaSize {
    pub width: u32,
    pub height: u32,
}

impl MediaSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    fn shorter_side(&self) -> f64 {
        self.width.min(self.height) as f64
    }
}

/// Crop rectangle in natural image pixels.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct CropArea {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

pub fn clamp_zoom(zoom: f64) -> f64 {
    if zoom.is_nan() {
        return MIN_ZOOM;
    }
    zoom.clamp(MIN_ZOOM, MAX_ZOOM)
}

/// Wheel delta (in pixels) that moves the zoom by one whole step.
pub const WHEEL_PIXELS_PER_ZOOM: f64 = 200.0;

/// Scrolling down zooms out, scrolling up zooms in.
pub fn wheel_zoom(zoom: f64, delta_y: f64) -> f64 {
    clamp_zoom(zoom - delta_y / WHEEL_PIXELS_PER_ZOOM)
}

/// Square viewport showing the media scaled to fit, with a centered square crop box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub side: f64,
}

impl Viewport {
    pub fn new(side: f64) -> Self {
        Self { side }
    }

    /// Viewport pixels per natural pixel at zoom 1.
    pub fn display_scale(&self, media: MediaSize) -> f64 {
        let longer = media.width.max(media.height).max(1) as f64;
        self.side / longer
    }

    /// Size of the media as drawn at zoom 1.
    pub fn media_display_size(&self, media: MediaSize) -> (f64, f64) {
        let scale = self.display_scale(media);
        (media.width as f64 * scale, media.height as f64 * scale)
    }

    /// Side of the crop box in viewport pixels.
    pub fn crop_box_side(&self, media: MediaSize) -> f64 {
        media.shorter_side() * self.display_scale(media)
    }

    /// Keeps the crop box inside the media for the given zoom.
    pub fn restrict_position(&self, media: MediaSize, position: CropPoint, zoom: f64) -> CropPoint {
        let zoom = clamp_zoom(zoom);
        let scale = self.display_scale(media);
        let crop_side = self.crop_box_side(media);
        let max_x = ((media.width as f64 * scale * zoom - crop_side) / 2.0).max(0.0);
        let max_y = ((media.height as f64 * scale * zoom - crop_side) / 2.0).max(0.0);
        CropPoint {
            x: position.x.clamp(-max_x, max_x),
            y: position.y.clamp(-max_y, max_y),
        }
    }

    /// Pixel-space rectangle under the crop box.
    pub fn crop_area(&self, media: MediaSize, position: CropPoint, zoom: f64) -> CropArea {
        let zoom = clamp_zoom(zoom);
        let position = self.restrict_position(media, position, zoom);
        let scale = self.display_scale(media);

        let side = (media.shorter_side() / zoom).max(1.0);
        let center_x = media.width as f64 / 2.0 - position.x / (scale * zoom);
        let center_y = media.height as f64 / 2.0 - position.y / (scale * zoom);

        let side_px = (side.round() as u32).clamp(1, media.width.min(media.height).max(1));
        let x = clamp_origin(center_x - side / 2.0, side_px, media.width);
        let y = clamp_origin(center_y - side / 2.0, side_px, media.height);

        CropArea {
            x,
            y,
            width: side_px,
            height: side_px,
        }
    }
}

fn clamp_origin(origin: f64, side: u32, extent: u32) -> u32 {
    let max = extent.saturating_sub(side) as f64;
    origin.round().clamp(0.0, max) as u32
}
