use std::fmt;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use url::Url;

use client::{HttpProgressApi, SyncService, ToggleService};
use prep_core::model::{Problem, ProblemId, TopicId, Track};
use ui::{App, UiApp, build_app_context};

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000/";

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidBaseUrl { raw: String },
    InvalidTopicId { raw: String },
    InvalidTrack { raw: String },
    InvalidTotal { raw: String },
    EmptyRoster,
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidBaseUrl { raw } => write!(f, "invalid --base-url value: {raw}"),
            ArgsError::InvalidTopicId { raw } => write!(f, "invalid --topic-id value: {raw}"),
            ArgsError::InvalidTrack { raw } => write!(f, "invalid --track value: {raw}"),
            ArgsError::InvalidTotal { raw } => write!(f, "invalid --total value: {raw}"),
            ArgsError::EmptyRoster => write!(f, "the problem roster is empty"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!(
        "  cargo run -p app -- [--base-url <url>] [--track <aptitude|dsa>] [--topic-id <id>]"
    );
    eprintln!("                      [--title <text>] [--total <n> | --problems <id,id,...>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --base-url {DEFAULT_BASE_URL}");
    eprintln!("  --track dsa  --topic-id 1  --total 10");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  PREP_BASE_URL, PREP_TRACK, PREP_TOPIC_ID, PREP_TITLE, PREP_TOTAL, PREP_PROBLEMS");
}

struct Args {
    base_url: Url,
    track: Track,
    topic_id: TopicId,
    title: Option<String>,
    total: Option<u32>,
    problem_ids: Option<Vec<String>>,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut base_url = std::env::var("PREP_BASE_URL")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let mut track = std::env::var("PREP_TRACK")
            .ok()
            .and_then(|value| value.parse::<Track>().ok())
            .unwrap_or(Track::Dsa);
        let mut topic_id = std::env::var("PREP_TOPIC_ID")
            .ok()
            .and_then(|value| value.parse::<TopicId>().ok())
            .unwrap_or_else(|| TopicId::new(1));
        let mut title = std::env::var("PREP_TITLE").ok();
        let mut total = std::env::var("PREP_TOTAL")
            .ok()
            .and_then(|value| value.parse::<u32>().ok());
        let mut problem_ids = std::env::var("PREP_PROBLEMS").ok().map(split_ids);

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--base-url" => {
                    base_url = require_value(args, "--base-url")?;
                }
                "--track" => {
                    let value = require_value(args, "--track")?;
                    track = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidTrack { raw: value.clone() })?;
                }
                "--topic-id" => {
                    let value = require_value(args, "--topic-id")?;
                    topic_id = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidTopicId { raw: value.clone() })?;
                }
                "--title" => {
                    title = Some(require_value(args, "--title")?);
                }
                "--total" => {
                    let value = require_value(args, "--total")?;
                    let parsed: u32 = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidTotal { raw: value.clone() })?;
                    total = Some(parsed);
                }
                "--problems" => {
                    problem_ids = Some(split_ids(require_value(args, "--problems")?));
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        let base_url = Url::parse(&normalize_base_url(base_url.clone()))
            .map_err(|_| ArgsError::InvalidBaseUrl { raw: base_url })?;

        Ok(Self {
            base_url,
            track,
            topic_id,
            title,
            total,
            problem_ids,
        })
    }

    /// Build the page's problem roster from explicit ids or a row count.
    fn roster(&self) -> Result<Vec<Problem>, ArgsError> {
        if let Some(ids) = &self.problem_ids {
            if ids.is_empty() {
                return Err(ArgsError::EmptyRoster);
            }
            #[allow(clippy::cast_possible_truncation)]
            let problems = ids
                .iter()
                .enumerate()
                .map(|(index, id)| {
                    Problem::new(
                        ProblemId::new(id.clone()),
                        index as u32 + 1,
                        format!("Problem {id}"),
                    )
                })
                .collect();
            return Ok(problems);
        }

        let total = self.total.unwrap_or(10);
        if total == 0 {
            return Err(ArgsError::EmptyRoster);
        }
        Ok((1..=total)
            .map(|n| Problem::new(ProblemId::new(n.to_string()), n, format!("Problem {n}")))
            .collect())
    }

    fn title(&self) -> String {
        self.title
            .clone()
            .unwrap_or_else(|| format!("Topic {} problems", self.topic_id))
    }
}

fn split_ids(raw: String) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

// `Url::join` replaces the last path segment unless the base ends in '/'.
fn normalize_base_url(raw: String) -> String {
    let trimmed = raw.trim();
    if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    }
}

struct DesktopApp {
    topic_id: TopicId,
    topic_title: String,
    roster: Vec<Problem>,
    toggles: Arc<ToggleService>,
    sync: Arc<SyncService>,
}

impl UiApp for DesktopApp {
    fn topic_id(&self) -> TopicId {
        self.topic_id
    }

    fn topic_title(&self) -> String {
        self.topic_title.clone()
    }

    fn roster(&self) -> Vec<Problem> {
        self.roster.clone()
    }

    fn toggle_service(&self) -> Arc<ToggleService> {
        Arc::clone(&self.toggles)
    }

    fn sync_service(&self) -> Arc<SyncService> {
        Arc::clone(&self.sync)
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let parsed = Args::parse(&mut argv).map_err(|err| {
        eprintln!("{err}");
        print_usage();
        err
    })?;

    let roster = parsed.roster()?;
    log::info!(
        "starting prep client: track={}, topic={}, {} problems, server={}",
        parsed.track,
        parsed.topic_id,
        roster.len(),
        parsed.base_url
    );

    let http = reqwest::Client::new();
    let api = Arc::new(HttpProgressApi::new(http, parsed.base_url.clone(), parsed.track));
    let toggles = Arc::new(ToggleService::new(api.clone()));
    let sync = Arc::new(SyncService::new(api));

    let app = DesktopApp {
        topic_id: parsed.topic_id,
        topic_title: parsed.title(),
        roster,
        toggles,
        sync,
    };

    let context = build_app_context(&(Arc::new(app) as Arc<dyn UiApp>));

    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("Prep")
            .with_always_on_top(false),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
    Ok(())
}

#[tokio::main]
async fn main() {
    env_logger::init();
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
