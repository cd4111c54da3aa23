use super::super::{DragState, Model, Msg, SelectedImage};
use super::utils::first_image_file;
use crate::api;
use gloo_file::{File as GlooFile, ObjectUrl};
use gloo_timers::callback::Timeout;
use shared::CLASSIFIER_INPUT_SIZE;
use shared::crop::{CropPoint, MediaSize};
use shared::debounce::{SETTLE_QUIET_MS, Ticket};
use shared::raster::SourceImage;
use shared::session::{Action, Epoch};
use shared::{ClassifyFailure, Outcome};
use std::cell::OnceCell;
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use web_sys::{ClipboardEvent, DragEvent, FileList};
use yew::prelude::*;

pub fn handle_file_chosen(model: &mut Model, file: GlooFile) -> bool {
    log::info!("Selected image {} ({} bytes)", file.name(), file.size());
    cancel_pending_settle(model);
    model.pan = None;

    // the previous object URL is revoked here, before a new one is created
    model.session.apply(Action::Reset);
    let url = ObjectUrl::from(file.clone());
    model.session.apply(Action::ImageSelected(SelectedImage {
        file,
        url,
        source: Rc::default(),
    }))
}

pub fn handle_reset(model: &mut Model) -> bool {
    cancel_pending_settle(model);
    model.pan = None;
    model.is_dragging = false;
    model.session.apply(Action::Reset)
}

pub fn handle_drop(model: &mut Model, ctx: &Context<Model>, event: DragEvent) -> bool {
    event.prevent_default();
    model.is_dragging = false;

    if let Some(data_transfer) = event.data_transfer() {
        if let Some(file_list) = data_transfer.files() {
            process_file_list(ctx, file_list);
        }
    }

    true
}

pub fn handle_paste(ctx: &Context<Model>, event: ClipboardEvent) -> bool {
    if let Some(data_transfer) = event.clipboard_data() {
        if let Some(file_list) = data_transfer.files() {
            if file_list.length() > 0 {
                event.prevent_default();
                process_file_list(ctx, file_list);
            }
        }
    }
    false
}

pub fn process_file_list(ctx: &Context<Model>, file_list: FileList) {
    if let Some(file) = first_image_file(&file_list) {
        ctx.link().send_message(Msg::FileChosen(file));
    }
}

pub fn handle_media_loaded(model: &mut Model, ctx: &Context<Model>, media: MediaSize) -> bool {
    log::debug!("Image loaded: {}x{}", media.width, media.height);
    let changed = model.session.apply(Action::MediaLoaded(media));
    if changed {
        schedule_settle(model, ctx);
    }
    changed
}

pub fn handle_pan_start(model: &mut Model, x: f64, y: f64) -> bool {
    if model.session.is_image_loaded() {
        model.pan = Some(DragState {
            pointer: (x, y),
            crop: model.session.crop(),
        });
    }
    false
}

pub fn handle_pan_move(model: &mut Model, ctx: &Context<Model>, x: f64, y: f64) -> bool {
    let Some(pan) = model.pan else {
        return false;
    };
    let position = CropPoint::new(pan.crop.x + x - pan.pointer.0, pan.crop.y + y - pan.pointer.1);
    let changed = model.session.apply(Action::CropMoved(position));
    if changed {
        schedule_settle(model, ctx);
    }
    changed
}

pub fn handle_zoom(model: &mut Model, ctx: &Context<Model>, zoom: f64) -> bool {
    let changed = model.session.apply(Action::ZoomChanged(zoom));
    if changed {
        schedule_settle(model, ctx);
    }
    changed
}

/// Re-arms the quiet period; the previous timer is cancelled.
fn schedule_settle(model: &mut Model, ctx: &Context<Model>) {
    let Some(area) = model.session.crop_area() else {
        return;
    };

    if let Some(old_timeout) = model.settle_timeout.take() {
        old_timeout.cancel();
    }

    let ticket = model.settle.arm(area);
    let link = ctx.link().clone();
    model.settle_timeout = Some(Timeout::new(SETTLE_QUIET_MS, move || {
        link.send_message(Msg::CropSettled(ticket));
    }));
}

fn cancel_pending_settle(model: &mut Model) {
    if let Some(timeout) = model.settle_timeout.take() {
        timeout.cancel();
    }
    if model.settle.is_armed() {
        log::debug!("Dropping unsent crop");
    }
    model.settle.disarm();
}

pub fn handle_crop_settled(model: &mut Model, ctx: &Context<Model>, ticket: Ticket) -> bool {
    let Some(area) = model.settle.fire(ticket) else {
        return false;
    };
    model.settle_timeout = None;

    let Some((file, cache)) = model
        .session
        .preview()
        .map(|image| (image.file.clone(), image.source.clone()))
    else {
        return false;
    };

    let epoch = model.session.epoch();
    if !model.session.apply(Action::RasterizeStarted { epoch }) {
        return false;
    }

    let endpoint = model.classifier_url.clone();
    let link = ctx.link().clone();
    spawn_local(async move {
        let outcome = match load_source(&file, &cache).await {
            Ok(source) => match source.rasterize(area, CLASSIFIER_INPUT_SIZE) {
                Ok(jpeg) => {
                    link.send_message(Msg::Submitting(epoch));
                    log::info!("Submitting {:?} crop ({} bytes)", area, jpeg.len());
                    api::classify(&endpoint, jpeg).await
                }
                Err(e) => Err(ClassifyFailure::Raster(e.to_string())),
            },
            Err(failure) => Err(failure),
        };
        link.send_message(Msg::Classified(epoch, outcome));
    });

    true
}

async fn load_source(
    file: &GlooFile,
    cache: &OnceCell<Rc<SourceImage>>,
) -> Result<Rc<SourceImage>, ClassifyFailure> {
    if let Some(source) = cache.get() {
        return Ok(source.clone());
    }
    let bytes = gloo_file::futures::read_as_bytes(file)
        .await
        .map_err(|e| ClassifyFailure::Raster(e.to_string()))?;
    let source =
        SourceImage::decode(&bytes).map_err(|e| ClassifyFailure::Raster(e.to_string()))?;
    Ok(cache.get_or_init(|| Rc::new(source)).clone())
}

pub fn handle_submitting(model: &mut Model, epoch: Epoch) -> bool {
    model.session.apply(Action::SubmitStarted { epoch })
}

pub fn handle_classified(model: &mut Model, epoch: Epoch, outcome: Outcome) -> bool {
    match &outcome {
        Ok(prediction) => log::info!(
            "Classified as {} ({:?})",
            prediction.label,
            prediction.confidence
        ),
        Err(failure) => log::error!("Classification failed: {}", failure),
    }
    model.session.apply(Action::Finished { epoch, outcome })
}
