use super::super::Model;
use shared::EbirdInfo;
use shared::panel::{Panel, SpeciesView};
use yew::prelude::*;

pub fn render_result_panel(model: &Model) -> Html {
    match Panel::build(model.session.phase(), model.session.result()) {
        Panel::Hidden => html! {},
        Panel::Loading { caption } => html! {
            <div class="loading-result">
                <i class="fa-solid fa-spinner fa-spin fa-3x"></i>
                <p>{ caption }</p>
            </div>
        },
        Panel::Failed { reason } => html! {
            <div class="results-container failed">
                <h2><i class="fa-solid fa-circle-exclamation"></i>{" Error"}</h2>
                <p class="error-message">{ reason }</p>
            </div>
        },
        Panel::Unidentified { confidence } => html! {
            <div class="results-container unidentified">
                <h2><i class="fa-solid fa-question"></i>{" No bird identified"}</h2>
                { render_confidence(confidence.as_deref()) }
                <p>{"Try cropping closer around the bird."}</p>
            </div>
        },
        Panel::Identified(view) => render_species(&view),
    }
}

fn render_species(view: &SpeciesView) -> Html {
    html! {
        <div class="results-container identified">
            <div class="result-header">
                <h2><i class="fa-solid fa-dove"></i>{ format!(" {}", view.name) }</h2>
                {
                    match &view.sex {
                        Some(sex) => html! { <span class="sex-badge">{ sex.clone() }</span> },
                        None => html! {},
                    }
                }
            </div>
            { render_confidence(view.confidence.as_deref()) }
            {
                match view.lookup {
                    Some(info) => render_lookup(info),
                    None => html! {
                        <p class="no-results-message">{"No eBird information found."}</p>
                    },
                }
            }
        </div>
    }
}

fn render_confidence(confidence: Option<&str>) -> Html {
    match confidence {
        Some(confidence) => html! {
            <div class="confidence-meter">
                <i class="fa-solid fa-gauge"></i>
                <span class="meter-label">{" Confidence: "}</span>
                <span class="meter-value">{ confidence }</span>
            </div>
        },
        None => html! {},
    }
}

fn render_lookup(info: &EbirdInfo) -> Html {
    let rows = [
        ("Common name", &info.com_name, false),
        ("Scientific name", &info.sci_name, true),
        ("Family", &info.family_com_name, false),
        ("Order", &info.order, false),
        ("Category", &info.category, false),
    ];

    html! {
        <div class="detailed-results">
            { for rows.iter().map(|(label, value, italic)| html! {
                <div class="result-item">
                    <span class="result-label">{ format!("{}: ", label) }</span>
                    <span class={classes!("result-value", italic.then_some("italic"))}>
                        { value.as_deref().unwrap_or("-") }
                    </span>
                </div>
            })}
        </div>
    }
}
