use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable};

use crate::views::{SummaryView, TopicView};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", TopicView)] Topic {},
        #[route("/summary", SummaryView)] Summary {},
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app",
            Sidebar {}
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}

#[component]
fn Sidebar() -> Element {
    rsx! {
        nav { class: "sidebar",
            h1 { "Prep" }
            ul {
                li { Link { to: Route::Topic {}, "Problems" } }
                li { Link { to: Route::Summary {}, "Overview" } }
            }
        }
    }
}
