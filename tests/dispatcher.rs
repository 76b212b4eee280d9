//! End-to-end dispatch against fake platform and card source adapters.
use async_trait::async_trait;
use cubebot::cards::{CardRecord, CardSource};
use cubebot::constants::DM_REMEDIATION;
use cubebot::context::{ArgValue, Invocation, Invoker};
use cubebot::dispatch::{Dispatcher, GENERIC_FAILURE, ReplySurface};
use cubebot::error::{FetchError, ReplyError};
use cubebot::reply::ReplyChannel;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
struct Recorder {
    sent: Arc<Mutex<Vec<String>>>,
    fail: Option<ReplyError>,
}

impl Recorder {
    fn failing(error: ReplyError) -> Self {
        Self {
            sent: Arc::default(),
            fail: Some(error),
        }
    }

    fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReplyChannel for Recorder {
    async fn reply(&self, text: &str) -> Result<(), ReplyError> {
        if let Some(e) = &self.fail {
            return Err(e.clone());
        }
        self.sent.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

#[derive(Default)]
struct FakeSurface {
    visible: Recorder,
    direct: Recorder,
    /// "defer" and "reply:<deferred>" in call order.
    calls: Mutex<Vec<String>>,
}

impl FakeSurface {
    fn with_direct(direct: Recorder) -> Self {
        Self {
            direct,
            ..Self::default()
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReplySurface for FakeSurface {
    async fn defer(&self) -> Result<(), ReplyError> {
        self.calls.lock().unwrap().push("defer".into());
        Ok(())
    }

    fn reply_channel(&self, deferred: bool) -> Box<dyn ReplyChannel> {
        self.calls.lock().unwrap().push(format!("reply:{deferred}"));
        Box::new(self.visible.clone())
    }

    fn direct_channel(&self) -> Box<dyn ReplyChannel> {
        Box::new(self.direct.clone())
    }
}

enum Upstream {
    Cards(Vec<CardRecord>),
    NotConfigured(&'static str),
    Down,
}

struct StaticSource {
    upstream: Upstream,
    fetches: AtomicUsize,
}

impl StaticSource {
    fn new(upstream: Upstream) -> Arc<Self> {
        Arc::new(Self {
            upstream,
            fetches: AtomicUsize::new(0),
        })
    }

    fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CardSource for StaticSource {
    async fn fetch_records(&self) -> Result<Vec<CardRecord>, FetchError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        match &self.upstream {
            Upstream::Cards(cards) => Ok(cards.clone()),
            Upstream::NotConfigured(var) => Err(FetchError::NotConfigured(*var)),
            Upstream::Down => Err(FetchError::Status {
                status: 503,
                body: "unavailable".into(),
            }),
        }
    }
}

fn card(name: &str, status: &str) -> CardRecord {
    CardRecord {
        mana_value: 2,
        name: name.into(),
        category: "Creature".into(),
        attribute: "Green".into(),
        collection: "Beta".into(),
        status: status.into(),
    }
}

fn deck() -> Vec<CardRecord> {
    vec![
        card("Llanowar Elves", "owned"),
        card("Grizzly Bears", ""),
        card("Giant Growth", "Ordered"),
        card("Fog", "OWNED"),
        card("Regrowth", ""),
    ]
}

fn invoker() -> Invoker {
    Invoker {
        id: 42,
        name: "drafter".into(),
    }
}

fn text(content: &str) -> Invocation {
    Invocation::from_text(content, "!", invoker()).unwrap()
}

fn slash(command: &str, options: Vec<(&str, ArgValue)>) -> Invocation {
    let options = options.into_iter().map(|(n, v)| (n.to_string(), v)).collect();
    Invocation::structured(command, options, invoker())
}

fn dispatcher(source: Arc<StaticSource>) -> Dispatcher {
    Dispatcher::new(source, "!")
}

#[tokio::test]
async fn unknown_command_is_silent() {
    let source = StaticSource::new(Upstream::Cards(deck()));
    let surface = FakeSurface::default();
    dispatcher(source.clone()).dispatch(text("!dance now"), &surface).await;
    dispatcher(source.clone())
        .dispatch(slash("dance", vec![]), &surface)
        .await;
    assert!(surface.calls().is_empty());
    assert!(surface.visible.sent().is_empty());
    assert_eq!(source.fetches(), 0);
}

#[tokio::test]
async fn invalid_pack_count_gets_usage_and_no_fetch() {
    let source = StaticSource::new(Upstream::Cards(deck()));
    let surface = FakeSurface::default();
    dispatcher(source.clone()).dispatch(text("!pack 99"), &surface).await;
    dispatcher(source.clone()).dispatch(text("!pack lots"), &surface).await;
    let sent = surface.visible.sent();
    assert_eq!(sent.len(), 2);
    for reply in sent {
        assert_eq!(
            reply,
            "❌ Please provide a valid number between 1 and 50. Usage: `!pack [count]`"
        );
    }
    assert_eq!(source.fetches(), 0);
}

#[tokio::test]
async fn structured_commands_defer_before_validation() {
    let source = StaticSource::new(Upstream::Cards(deck()));
    let surface = FakeSurface::default();
    dispatcher(source.clone())
        .dispatch(slash("pack", vec![("count", ArgValue::Integer(0))]), &surface)
        .await;
    assert_eq!(surface.calls(), ["defer", "reply:true"]);
    assert_eq!(
        surface.visible.sent(),
        ["❌ Please provide a valid number between 1 and 50. Usage: `/pack [count]`"]
    );
    assert_eq!(source.fetches(), 0);
}

#[tokio::test]
async fn text_triggers_and_quick_commands_never_defer() {
    let source = StaticSource::new(Upstream::Cards(deck()));
    let surface = FakeSurface::default();
    dispatcher(source.clone()).dispatch(text("!pack 2"), &surface).await;
    dispatcher(source.clone()).dispatch(slash("help", vec![]), &surface).await;
    assert_eq!(surface.calls(), ["reply:false", "reply:false"]);
}

#[tokio::test]
async fn pack_returns_requested_number_of_distinct_cards() {
    let source = StaticSource::new(Upstream::Cards(deck()));
    let surface = FakeSurface::default();
    dispatcher(source)
        .dispatch(slash("pack", vec![("count", ArgValue::Integer(3))]), &surface)
        .await;
    let sent = surface.visible.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].starts_with("🎲 **Random Pack** - 3 cards:"));
    let listed = deck().iter().filter(|c| sent[0].contains(&format!("**{}**", c.name))).count();
    assert_eq!(listed, 3);
}

#[tokio::test]
async fn status_matches_case_insensitively() {
    let source = StaticSource::new(Upstream::Cards(deck()));
    let surface = FakeSurface::default();
    dispatcher(source).dispatch(text("!status giant growth"), &surface).await;
    let sent = surface.visible.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].starts_with("**Giant Growth**"));
    assert!(sent[0].ends_with("Status: **Ordered**"));
}

#[tokio::test]
async fn status_reports_missing_card() {
    let source = StaticSource::new(Upstream::Cards(deck()));
    let surface = FakeSurface::default();
    dispatcher(source)
        .dispatch(
            slash("status", vec![("name", ArgValue::Text("Black Lotus".into()))]),
            &surface,
        )
        .await;
    assert_eq!(surface.visible.sent(), ["❌ **Black Lotus** is not on the list."]);
}

#[tokio::test]
async fn status_without_name_gets_usage() {
    let source = StaticSource::new(Upstream::Cards(deck()));
    let surface = FakeSurface::default();
    dispatcher(source.clone()).dispatch(text("!status   "), &surface).await;
    assert_eq!(
        surface.visible.sent(),
        ["❌ Please provide a card name. Usage: `!status <card name>`"]
    );
    assert_eq!(source.fetches(), 0);
}

#[tokio::test]
async fn buylist_sends_full_list_by_dm_and_preview_in_channel() {
    let source = StaticSource::new(Upstream::Cards(deck()));
    let surface = FakeSurface::default();
    dispatcher(source).dispatch(text("!buylist"), &surface).await;

    let dms = surface.direct.sent();
    assert_eq!(dms.len(), 1);
    assert!(dms[0].starts_with("🛒 **Buylist** - 3 cards needed:\n```\n"));
    assert!(dms[0].contains("Grizzly Bears"));
    assert!(dms[0].contains("Giant Growth"));
    assert!(dms[0].contains("Regrowth"));
    assert!(!dms[0].contains("Llanowar Elves"));
    assert!(!dms[0].contains("Fog"));

    let channel = surface.visible.sent();
    assert_eq!(channel.len(), 1);
    assert!(channel[0].ends_with("📬 *Full list sent via DM!*"));
}

#[tokio::test]
async fn buylist_dm_rejection_shows_remediation() {
    let source = StaticSource::new(Upstream::Cards(deck()));
    let surface =
        FakeSurface::with_direct(Recorder::failing(ReplyError::Delivery("50007".into())));
    dispatcher(source).dispatch(text("!buylist"), &surface).await;
    assert_eq!(surface.visible.sent(), [DM_REMEDIATION]);
}

#[tokio::test]
async fn buylist_of_owned_cards_is_empty() {
    let source = StaticSource::new(Upstream::Cards(vec![card("Fog", "owned")]));
    let surface = FakeSurface::default();
    dispatcher(source).dispatch(text("!buylist"), &surface).await;
    assert_eq!(surface.visible.sent(), ["✅ Buylist is empty - you own all cards!"]);
    assert!(surface.direct.sent().is_empty());
}

#[tokio::test]
async fn handler_error_becomes_generic_failure() {
    let source = StaticSource::new(Upstream::Cards(deck()));
    let surface = FakeSurface::with_direct(Recorder::failing(ReplyError::Send("gateway".into())));
    dispatcher(source).dispatch(text("!buylist"), &surface).await;
    assert_eq!(surface.visible.sent(), [GENERIC_FAILURE]);
}

#[tokio::test]
async fn unconfigured_source_names_the_variable() {
    let source = StaticSource::new(Upstream::NotConfigured("SPREADSHEET_ID"));
    let surface = FakeSurface::default();
    dispatcher(source).dispatch(text("!sheet"), &surface).await;
    assert_eq!(surface.visible.sent(), ["❌ `SPREADSHEET_ID` is not configured."]);
}

#[tokio::test]
async fn upstream_failure_gets_command_specific_message() {
    let source = StaticSource::new(Upstream::Down);
    let surface = FakeSurface::default();
    dispatcher(source).dispatch(text("!pack"), &surface).await;
    assert_eq!(
        surface.visible.sent(),
        ["❌ Failed to generate pack. Please try again."]
    );
}

#[tokio::test]
async fn empty_catalog_is_reported() {
    let source = StaticSource::new(Upstream::Cards(vec![]));
    let surface = FakeSurface::default();
    dispatcher(source).dispatch(text("!cube"), &surface).await;
    assert_eq!(surface.visible.sent(), ["❌ No cards found in the catalog."]);
}

#[tokio::test]
async fn ping_reports_latency_without_gateway() {
    let source = StaticSource::new(Upstream::Cards(deck()));
    let surface = FakeSurface::default();
    dispatcher(source.clone()).dispatch(text("!ping"), &surface).await;
    let sent = surface.visible.sent();
    assert_eq!(sent[0], "Pinging...");
    assert!(sent[1].starts_with("🏓 Pong! Latency: "));
    assert!(sent[1].ends_with("| API: N/A"));
    assert_eq!(source.fetches(), 0);
}

#[tokio::test]
async fn text_and_slash_triggers_reply_identically() {
    let source = StaticSource::new(Upstream::Cards(deck()));
    let by_text = FakeSurface::default();
    let by_slash = FakeSurface::default();
    dispatcher(source.clone())
        .dispatch(text("!status giant growth"), &by_text)
        .await;
    dispatcher(source.clone())
        .dispatch(
            slash("status", vec![("name", ArgValue::Text("giant growth".into()))]),
            &by_slash,
        )
        .await;
    assert_eq!(by_text.visible.sent().len(), 1);
    assert_eq!(by_text.visible.sent(), by_slash.visible.sent());
}

#[tokio::test]
async fn full_pack_is_the_same_for_both_triggers() {
    // Three cards and count=3: every pack holds all of them, so the sorted
    // lines must match whatever order the shuffle picked.
    let three = vec![card("Fog", ""), card("Regrowth", "owned"), card("Shock", "")];
    let source = StaticSource::new(Upstream::Cards(three));
    let by_text = FakeSurface::default();
    let by_slash = FakeSurface::default();
    dispatcher(source.clone()).dispatch(text("!pack 3"), &by_text).await;
    dispatcher(source.clone())
        .dispatch(slash("pack", vec![("count", ArgValue::Integer(3))]), &by_slash)
        .await;

    let cards_of = |surface: &FakeSurface| {
        let sent = surface.visible.sent();
        assert_eq!(sent.len(), 1);
        let mut lines: Vec<String> = sent[0]
            .lines()
            .skip(2)
            .map(|l| l.split_once(". ").map(|(_, rest)| rest.to_string()).unwrap_or_default())
            .collect();
        lines.sort();
        (sent[0].lines().next().map(str::to_string), lines)
    };
    let (text_header, text_cards) = cards_of(&by_text);
    let (slash_header, slash_cards) = cards_of(&by_slash);
    assert_eq!(text_header, slash_header);
    assert_eq!(text_cards.len(), 3);
    assert_eq!(text_cards, slash_cards);
}

#[tokio::test]
async fn help_footer_follows_configured_prefix() {
    let source = StaticSource::new(Upstream::Cards(deck()));
    let surface = FakeSurface::default();
    Dispatcher::new(source, "cb?")
        .dispatch(
            Invocation::from_text("cb?help", "cb?", invoker()).unwrap(),
            &surface,
        )
        .await;
    let sent = surface.visible.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].contains("cb?ping"));
    assert!(!sent[0].contains("!ping"));
}
