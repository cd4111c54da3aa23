mod api;
mod components;

use components::{cropper, handlers, header, results, upload_section};
use gloo_events::{EventListener, EventListenerOptions};
use gloo_file::{File as GlooFile, ObjectUrl};
use gloo_timers::callback::Timeout;
use shared::Outcome;
use shared::crop::{CropArea, CropPoint, MediaSize, Viewport, wheel_zoom};
use shared::debounce::{Debounce, Ticket};
use shared::raster::SourceImage;
use shared::session::{Epoch, Session};
use std::cell::OnceCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys::{ClipboardEvent, DragEvent, Element, WheelEvent};
use yew::prelude::*;

/// Side of the square crop surface, in CSS pixels.
pub const CROP_VIEWPORT_PX: f64 = 480.0;

// Models
pub struct SelectedImage {
    file: GlooFile,
    url: ObjectUrl,
    // decoded on the first settle, reused by later ones
    source: Rc<OnceCell<Rc<SourceImage>>>,
}

#[derive(Clone, Copy)]
struct DragState {
    pointer: (f64, f64),
    crop: CropPoint,
}

// Yew msg components
pub enum Msg {
    // Capture
    FileChosen(GlooFile),
    HandleDrop(DragEvent),
    HandlePaste(ClipboardEvent),
    SetDragging(bool),
    Reset,

    // Crop surface
    MediaLoaded(MediaSize),
    PanStart(f64, f64),
    PanMove(f64, f64),
    PanEnd,
    SetZoom(f64),
    Wheel(f64),

    // Submission
    CropSettled(Ticket),
    Submitting(Epoch),
    Classified(Epoch, Outcome),
}

// Main component
pub struct Model {
    session: Session<SelectedImage>,
    settle: Debounce<CropArea>,
    settle_timeout: Option<Timeout>,
    pan: Option<DragState>,
    is_dragging: bool,
    paste_listener: Option<EventListener>,
    wheel_listener: Option<EventListener>,
    classifier_url: String,
}

impl Component for Model {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let classifier_url = api::classifier_url();
        log::info!("Classifier endpoint: {}", classifier_url);

        let mut model = Self {
            session: Session::new(Viewport::new(CROP_VIEWPORT_PX)),
            settle: Debounce::new(),
            settle_timeout: None,
            pan: None,
            is_dragging: false,
            paste_listener: None,
            wheel_listener: None,
            classifier_url,
        };

        if let Some(window) = web_sys::window() {
            let link = ctx.link().clone();
            let listener = EventListener::new(&window, "paste", move |event| {
                if let Some(clipboard_event) = event.dyn_ref::<ClipboardEvent>() {
                    link.send_message(Msg::HandlePaste(clipboard_event.clone()));
                }
            });
            model.paste_listener = Some(listener);

            // wheel handlers from html! are passive and cannot prevent_default
            let link = ctx.link().clone();
            let options = EventListenerOptions::enable_prevent_default();
            let listener = EventListener::new_with_options(&window, "wheel", options, move |event| {
                let Some(wheel_event) = event.dyn_ref::<WheelEvent>() else {
                    return;
                };
                let over_surface = event
                    .target()
                    .and_then(|target| target.dyn_into::<Element>().ok())
                    .and_then(|element| element.closest(".crop-surface").ok().flatten())
                    .is_some();
                if over_surface {
                    event.prevent_default();
                    link.send_message(Msg::Wheel(wheel_event.delta_y()));
                }
            });
            model.wheel_listener = Some(listener);
        }

        model
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::FileChosen(file) => handlers::handle_file_chosen(self, file),
            Msg::HandleDrop(event) => handlers::handle_drop(self, ctx, event),
            Msg::HandlePaste(event) => handlers::handle_paste(ctx, event),
            Msg::SetDragging(is_dragging) => {
                self.is_dragging = is_dragging;
                true
            }
            Msg::Reset => handlers::handle_reset(self),

            Msg::MediaLoaded(media) => handlers::handle_media_loaded(self, ctx, media),
            Msg::PanStart(x, y) => handlers::handle_pan_start(self, x, y),
            Msg::PanMove(x, y) => handlers::handle_pan_move(self, ctx, x, y),
            Msg::PanEnd => {
                self.pan = None;
                false
            }
            Msg::SetZoom(zoom) => handlers::handle_zoom(self, ctx, zoom),
            Msg::Wheel(delta_y) => {
                let zoom = wheel_zoom(self.session.zoom(), delta_y);
                handlers::handle_zoom(self, ctx, zoom)
            }

            Msg::CropSettled(ticket) => handlers::handle_crop_settled(self, ctx, ticket),
            Msg::Submitting(epoch) => handlers::handle_submitting(self, epoch),
            Msg::Classified(epoch, outcome) => handlers::handle_classified(self, epoch, outcome),
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let has_image = self.session.preview().is_some();
        let link = ctx.link();

        // drops replace the image in both the picker and the cropper view
        let handle_drag_over = link.callback(|e: DragEvent| {
            e.prevent_default();
            Msg::SetDragging(true)
        });
        let handle_drag_leave = link.callback(|e: DragEvent| {
            e.prevent_default();
            Msg::SetDragging(false)
        });
        let handle_drop = link.callback(Msg::HandleDrop);

        html! {
            <div class="container">
                { header::render_header() }

                <main class={classes!("main-content", (!has_image).then_some("centered"))}>
                    <section
                        class={classes!("capture-panel", self.is_dragging.then_some("drag-over"))}
                        ondragover={handle_drag_over}
                        ondragleave={handle_drag_leave}
                        ondrop={handle_drop}
                    >
                        {
                            if has_image {
                                cropper::render_cropper(self, ctx)
                            } else {
                                upload_section::render_upload_section(self, ctx)
                            }
                        }
                    </section>
                    {
                        if has_image {
                            html! {
                                <section class="result-panel-wrapper">
                                    { results::render_result_panel(self) }
                                </section>
                            }
                        } else {
                            html! {}
                        }
                    }
                </main>

                <footer class="app-footer">
                    <p>{"Bird Identification | Fullstack Rust WASM"}</p>
                </footer>
            </div>
        }
    }
}

fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("App starting...");
    yew::Renderer::<Model>::new().render();
}
