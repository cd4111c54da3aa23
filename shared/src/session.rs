//! Per-tab crop-and-classify session, driven by a reducer.
//!
//! `P` is the preview handle. In the browser it owns an object URL that is
//! revoked when the handle is dropped, so replacing or clearing the preview
//! here is what releases it.

use crate::crop::{CropArea, CropPoint, MIN_ZOOM, MediaSize, Viewport, clamp_zoom};
use crate::Outcome;

/// Upload cycle a request belongs to; responses from older cycles are dropped.
pub type Epoch = u64;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    ImageSelected,
    Rasterizing,
    Submitting,
    Classified,
    Failed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Stage {
    Rasterizing,
    Submitting,
}

pub enum Action<P> {
    ImageSelected(P),
    MediaLoaded(MediaSize),
    CropMoved(CropPoint),
    ZoomChanged(f64),
    RasterizeStarted { epoch: Epoch },
    SubmitStarted { epoch: Epoch },
    Finished { epoch: Epoch, outcome: Outcome },
    Reset,
}

#[derive(Debug, PartialEq)]
pub struct Session<P> {
    viewport: Viewport,
    preview: Option<P>,
    crop: CropPoint,
    zoom: f64,
    media: Option<MediaSize>,
    crop_area: Option<CropArea>,
    result: Option<Outcome>,
    image_loaded: bool,
    epoch: Epoch,
    in_flight: usize,
    stage: Option<Stage>,
}

impl<P> Session<P> {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            preview: None,
            crop: CropPoint::default(),
            zoom: MIN_ZOOM,
            media: None,
            crop_area: None,
            result: None,
            image_loaded: false,
            epoch: 0,
            in_flight: 0,
            stage: None,
        }
    }

    /// Applies one action; returns whether anything visible changed.
    pub fn apply(&mut self, action: Action<P>) -> bool {
        match action {
            Action::ImageSelected(preview) => {
                self.clear_cycle();
                self.preview = Some(preview);
                true
            }
            Action::MediaLoaded(media) => {
                if self.preview.is_none() {
                    return false;
                }
                self.media = Some(media);
                self.image_loaded = true;
                self.recompute_crop();
                true
            }
            Action::CropMoved(position) => {
                if self.preview.is_none() {
                    return false;
                }
                self.crop = position;
                self.recompute_crop();
                true
            }
            Action::ZoomChanged(zoom) => {
                if self.preview.is_none() {
                    return false;
                }
                self.zoom = clamp_zoom(zoom);
                self.recompute_crop();
                true
            }
            Action::RasterizeStarted { epoch } => {
                if epoch != self.epoch || self.preview.is_none() {
                    return false;
                }
                self.in_flight += 1;
                self.stage = Some(Stage::Rasterizing);
                true
            }
            Action::SubmitStarted { epoch } => {
                if epoch != self.epoch || self.in_flight == 0 {
                    return false;
                }
                self.stage = Some(Stage::Submitting);
                true
            }
            Action::Finished { epoch, outcome } => {
                if epoch != self.epoch || self.in_flight == 0 {
                    log::debug!("dropping response from stale cycle {}", epoch);
                    return false;
                }
                self.in_flight -= 1;
                if self.in_flight == 0 {
                    self.stage = None;
                }
                self.result = Some(outcome);
                true
            }
            Action::Reset => {
                self.clear_cycle();
                true
            }
        }
    }

    /// Returns everything to the initial state and opens a new cycle.
    fn clear_cycle(&mut self) {
        let epoch = self.epoch + 1;
        *self = Self {
            epoch,
            ..Self::new(self.viewport)
        };
    }

    fn recompute_crop(&mut self) {
        if let Some(media) = self.media {
            self.crop = self.viewport.restrict_position(media, self.crop, self.zoom);
            self.crop_area = Some(self.viewport.crop_area(media, self.crop, self.zoom));
        }
    }

    pub fn phase(&self) -> Phase {
        if self.preview.is_none() {
            return Phase::Idle;
        }
        match (self.stage, &self.result) {
            (Some(Stage::Rasterizing), _) => Phase::Rasterizing,
            (Some(Stage::Submitting), _) => Phase::Submitting,
            (None, Some(Ok(_))) => Phase::Classified,
            (None, Some(Err(_))) => Phase::Failed,
            (None, None) => Phase::ImageSelected,
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn preview(&self) -> Option<&P> {
        self.preview.as_ref()
    }

    pub fn crop(&self) -> CropPoint {
        self.crop
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn media(&self) -> Option<MediaSize> {
        self.media
    }

    /// Only present while an image is selected and its size is known.
    pub fn crop_area(&self) -> Option<CropArea> {
        self.crop_area
    }

    pub fn result(&self) -> Option<&Outcome> {
        self.result.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    pub fn is_image_loaded(&self) -> bool {
        self.image_loaded
    }

    pub fn epoch(&self) -> Epoch {
        self.epoch
    }
}
