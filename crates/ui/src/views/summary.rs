use dioxus::prelude::*;

use crate::context::AppContext;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{CategoryBarVm, map_category_bars};

#[derive(Clone, Debug, PartialEq)]
struct SummaryData {
    bars: Vec<CategoryBarVm>,
}

#[component]
pub fn SummaryView() -> Element {
    let ctx = use_context::<AppContext>();
    let sync = ctx.sync_service();

    let resource = use_resource(move || {
        let sync = sync.clone();
        async move {
            let summary = sync
                .course_summary()
                .await
                .map_err(|_| ViewError::Unknown)?;
            Ok(SummaryData {
                bars: map_category_bars(&summary),
            })
        }
    });

    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page summary-page",
            header { class: "view-header",
                h2 { class: "view-title", "Overview" }
                p { class: "view-subtitle", "Completion across every category." }
            }
            div { class: "view-divider" }
            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Error(err) => rsx! {
                    p { "{err.message()}" }
                    button {
                        class: "btn btn-secondary",
                        r#type: "button",
                        onclick: move |_| {
                            let mut resource = resource;
                            resource.restart();
                        },
                        "Retry"
                    }
                },
                ViewState::Ready(data) => rsx! {
                    if data.bars.is_empty() {
                        p { class: "summary-empty", "No progress recorded yet." }
                    } else {
                        ul { class: "summary-list",
                            for bar in data.bars {
                                li { class: "summary-row",
                                    span { class: "summary-name", "{bar.name}" }
                                    div { class: "progress-track",
                                        div {
                                            class: "progress-bar",
                                            style: "{bar.width_style}",
                                            "{bar.percent_label}"
                                        }
                                    }
                                }
                            }
                        }
                    }
                },
            }
        }
    }
}
