use super::super::{Model, Msg};
use super::utils::{debounce, first_image_file};
use shared::raster::DECODABLE_MIME_TYPES;
use wasm_bindgen::JsCast;
use web_sys::HtmlInputElement;
use yew::prelude::*;

const FILE_INPUT_ID: &str = "file-input";

pub fn render_upload_section(model: &Model, ctx: &Context<Model>) -> Html {
    let link = ctx.link();

    let handle_change = link.batch_callback(|e: Event| {
        let input: HtmlInputElement = e.target_unchecked_into();
        let file = input.files().as_ref().and_then(first_image_file);

        input.set_value("");
        file.map(Msg::FileChosen)
    });

    let trigger_file_input = Callback::from(|_| {
        let input = web_sys::window()
            .and_then(|window| window.document())
            .and_then(|document| document.get_element_by_id(FILE_INPUT_ID));
        if let Some(input) = input {
            if let Ok(html_input) = input.dyn_into::<web_sys::HtmlElement>() {
                html_input.click();
            }
        }
    });

    html! {
        <div class="upload-section">
            <h2 class="panel-title"><i class="fa-solid fa-dove"></i>{" Bird Identification"}</h2>
            <input
                type="file"
                id={FILE_INPUT_ID}
                accept={DECODABLE_MIME_TYPES.join(",")}
                style="display: none;"
                onchange={handle_change}
            />

            <div
                id="drop-zone"
                class={classes!("upload-area", model.is_dragging.then_some("drag-over"))}
                role="button"
                tabindex="0"
                onclick={debounce(300, {
                    let trigger_file_input = trigger_file_input.clone();
                    move || trigger_file_input.emit(())
                })}
            >
                <div class="upload-placeholder">
                    <i class="fa-solid fa-binoculars"></i>
                    <p>{"Drag & drop a photo here, paste it, or click to choose one"}</p>
                    <p class="file-types">{"Supported formats: JPG, PNG, WEBP, GIF, BMP"}</p>
                </div>
            </div>
        </div>
    }
}
