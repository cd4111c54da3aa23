use super::super::{Model, Msg};
use shared::crop::{MAX_ZOOM, MIN_ZOOM, MediaSize};
use shared::panel::caption;
use web_sys::{HtmlImageElement, HtmlInputElement, MouseEvent};
use yew::prelude::*;

pub fn render_cropper(model: &Model, ctx: &Context<Model>) -> Html {
    let Some(image) = model.session.preview() else {
        return html! {};
    };
    let link = ctx.link();
    let (name, sex) = caption(model.session.result());

    let on_zoom_input = link.batch_callback(|e: InputEvent| {
        let input: HtmlInputElement = e.target_unchecked_into();
        input.value().parse::<f64>().ok().map(Msg::SetZoom)
    });

    html! {
        <div class="cropper-section">
            <p class="species-caption">{ name }</p>
            {
                match sex {
                    Some(sex) => html! { <p class="sex-caption">{ sex }</p> },
                    None => html! {},
                }
            }
            { render_crop_surface(model, ctx, image.url.to_string()) }
            <div class="zoom-control">
                <label for="zoom-range">{"Zoom"}</label>
                <input
                    id="zoom-range"
                    type="range"
                    min={MIN_ZOOM.to_string()}
                    max={MAX_ZOOM.to_string()}
                    step="0.01"
                    value={model.session.zoom().to_string()}
                    oninput={on_zoom_input}
                />
            </div>
            <button
                type="button"
                class="analyze-btn"
                onclick={link.callback(|_| Msg::Reset)}
            >
                <i class="fa-solid fa-rotate-left"></i>{" Load another image"}
            </button>
        </div>
    }
}

fn render_crop_surface(model: &Model, ctx: &Context<Model>, src: String) -> Html {
    let link = ctx.link();
    let viewport = model.session.viewport();
    let side = viewport.side;

    let on_load = link.callback(|e: Event| {
        let img: HtmlImageElement = e.target_unchecked_into();
        Msg::MediaLoaded(MediaSize::new(img.natural_width(), img.natural_height()))
    });
    let on_mouse_down = link.callback(|e: MouseEvent| {
        e.prevent_default();
        Msg::PanStart(e.client_x() as f64, e.client_y() as f64)
    });
    let on_mouse_move =
        link.callback(|e: MouseEvent| Msg::PanMove(e.client_x() as f64, e.client_y() as f64));
    let on_mouse_up = link.callback(|_: MouseEvent| Msg::PanEnd);
    let on_mouse_leave = link.callback(|_: MouseEvent| Msg::PanEnd);

    let (image_style, crop_box) = match model.session.media() {
        Some(media) => {
            let (width, height) = viewport.media_display_size(media);
            let crop = model.session.crop();
            let image_style = format!(
                "left: {:.2}px; top: {:.2}px; width: {:.2}px; height: {:.2}px; \
                 transform: translate({:.2}px, {:.2}px) scale({});",
                (side - width) / 2.0,
                (side - height) / 2.0,
                width,
                height,
                crop.x,
                crop.y,
                model.session.zoom(),
            );
            let box_side = viewport.crop_box_side(media);
            let offset = (side - box_side) / 2.0;
            let crop_box = html! {
                <div
                    class="crop-box"
                    style={format!(
                        "left: {:.2}px; top: {:.2}px; width: {:.2}px; height: {:.2}px;",
                        offset, offset, box_side, box_side
                    )}
                ></div>
            };
            (image_style, crop_box)
        }
        None => ("visibility: hidden;".to_string(), html! {}),
    };

    html! {
        <div
            class="crop-surface"
            style={format!("width: {0}px; height: {0}px;", side)}
            onmousedown={on_mouse_down}
            onmousemove={on_mouse_move}
            onmouseup={on_mouse_up}
            onmouseleave={on_mouse_leave}
        >
            <img
                key={src.clone()}
                class="crop-media"
                src={src}
                alt="Selected image"
                draggable="false"
                style={image_style}
                onload={on_load}
            />
            { crop_box }
            {
                if model.session.is_image_loaded() {
                    html! {}
                } else {
                    html! {
                        <div class="loading-preview">
                            <i class="fa-solid fa-spinner fa-spin fa-2x"></i>
                        </div>
                    }
                }
            }
        </div>
    }
}
