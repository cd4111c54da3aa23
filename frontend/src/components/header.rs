use yew::prelude::*;

/// Renders the application header
pub fn render_header() -> Html {
    html! {
        <header class="app-header">
            <h1><i class="fa-solid fa-feather"></i> {" Bird Recognition"}</h1>
            <p class="subtitle">{"Drop a photo, frame the bird, and get its species"}</p>
        </header>
    }
}
