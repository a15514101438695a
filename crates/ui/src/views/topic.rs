use std::time::Duration;

use chrono::Utc;
use dioxus::prelude::*;

use client::ToggleStart;
use prep_core::board::ProgressBoard;
use prep_core::model::ProblemId;
use prep_core::notice::{DISMISS_AFTER_MS, Notice, NoticeCenter};

use crate::context::AppContext;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{map_notices, map_problem_rows, map_progress};

/// Flash a notice and schedule its removal after the fixed dismiss delay.
fn push_notice(mut notices: Signal<NoticeCenter>, notice: Notice) {
    notices.write().push(notice);
    spawn(async move {
        tokio::time::sleep(Duration::from_millis(DISMISS_AFTER_MS.unsigned_abs())).await;
        notices.write().prune(Utc::now());
    });
}

#[component]
pub fn TopicView() -> Element {
    let ctx = use_context::<AppContext>();
    let sync = ctx.sync_service();
    let toggles = ctx.toggle_service();
    let topic_id = ctx.topic_id();
    let topic_title = ctx.topic_title().to_string();
    let roster = ctx.roster();

    let board = use_signal(|| None::<ProgressBoard>);
    let notices = use_signal(NoticeCenter::new);

    let sync_for_resource = sync.clone();
    let resource = use_resource(move || {
        let sync = sync_for_resource.clone();
        let roster = roster.clone();
        let mut board = board;
        let notices = notices;
        async move {
            let mut fresh = ProgressBoard::new(topic_id);
            fresh.bind_rows(roster);
            if let Err(_err) = sync.refresh(&mut fresh).await {
                push_notice(notices, sync.load_failure_notice());
                return Err(ViewError::Unknown);
            }
            board.set(Some(fresh));
            Ok::<_, ViewError>(())
        }
    });

    let dispatch_toggle = use_callback(move |id: ProblemId| {
        let toggles = toggles.clone();
        let mut board = board;
        let notices = notices;

        // Optimistic phase: paint the pending state before the request goes out.
        let start = {
            let mut guard = board.write();
            let Some(active) = guard.as_mut() else {
                return;
            };
            toggles.begin(active, &id)
        };

        match start {
            ToggleStart::Settled(report) => {
                if let Some(notice) = report.notice {
                    push_notice(notices, notice);
                }
            }
            ToggleStart::InFlight { seq, problem } => {
                spawn(async move {
                    let result = toggles.submit(&problem, topic_id).await;
                    let report = {
                        let mut guard = board.write();
                        let Some(active) = guard.as_mut() else {
                            return;
                        };
                        toggles.resolve(active, &id, seq, result)
                    };
                    if let Some(notice) = report.notice {
                        push_notice(notices, notice);
                    }
                });
            }
        }
    });

    let state = view_state_from_resource(&resource);
    let notice_vms = map_notices(&notices.read());

    rsx! {
        div { class: "page topic-page",
            header { class: "view-header",
                h2 { class: "view-title", "{topic_title}" }
                p { class: "view-subtitle", "Mark problems complete as you finish them." }
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
                ViewState::Ready(()) => {
                    let mapped = {
                        let guard = board.read();
                        guard
                            .as_ref()
                            .map(|active| (map_progress(active), map_problem_rows(active)))
                    };
                    match mapped {
                        None => rsx! {
                            p { "Loading..." }
                        },
                        Some((progress, rows)) => {
                            let row_nodes = rows.iter().map(|row| {
                                let id = row.id.clone();
                                let dispatch_toggle = dispatch_toggle;
                                rsx! {
                                    tr {
                                        td { class: "problem-number", "{row.number}" }
                                        td { class: "problem-title", "{row.title}" }
                                        td { class: "problem-action",
                                            button {
                                                class: "{row.button_class}",
                                                r#type: "button",
                                                disabled: row.disabled,
                                                onclick: move |_| {
                                                    dispatch_toggle.call(ProblemId::new(id.clone()));
                                                },
                                                "{row.button_label}"
                                            }
                                        }
                                    }
                                }
                            });
                            rsx! {
                                div { class: "progress-summary",
                                    div { class: "progress-track",
                                        div {
                                            class: "progress-bar",
                                            style: "width: {progress.percent}%",
                                            "{progress.percent}%"
                                        }
                                    }
                                    p { class: "progress-counts",
                                        span { class: "completed-count", "{progress.completed}" }
                                        " / "
                                        span { class: "total-count", "{progress.total}" }
                                        " problems completed"
                                    }
                                    if let Some(label) = progress.overall_label.as_ref() {
                                        p { class: "progress-overall", "{label}" }
                                    }
                                }
                                table { class: "problem-table",
                                    tbody {
                                        {row_nodes}
                                    }
                                }
                            }
                        }
                    }
                }
            }
            div { class: "notice-stack",
                for notice in notice_vms {
                    div { class: "{notice.class}", "{notice.message}" }
                }
            }
        }
    }
}
