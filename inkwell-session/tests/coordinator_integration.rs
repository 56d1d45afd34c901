//! Coordinator integration tests.
//!
//! Drives the coordinator through widget events with a scripted client whose
//! replies can be held back and released in any order.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use inkwell_analysis::{
    AnalysisCallbacks, AnalysisClient, AnalysisConfig, AnalysisError, AnalysisRequest,
    AnalysisResult, GeminiClient,
};
use inkwell_core::{
    CharacterChange, InputEvent, LanguageChange, Point, PracticeContext, Stroke, StrokeSequence,
};
use inkwell_renderer::decode_data_url;
use inkwell_session::{Coordinator, SessionError};
use serde_json::json;
use tokio::sync::oneshot;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

enum Outcome {
    Reply(&'static str),
    Fail,
    Unsent,
}

struct Script {
    release: Option<oneshot::Receiver<()>>,
    outcome: Outcome,
}

#[derive(Default)]
struct ScriptedClient {
    scripts: Mutex<VecDeque<Script>>,
    requests: Mutex<Vec<AnalysisRequest>>,
}

impl ScriptedClient {
    fn reply(&self, text: &'static str) {
        self.push(None, Outcome::Reply(text));
    }

    /// Queue a reply that waits for the returned sender.
    fn held(&self, text: &'static str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.push(Some(rx), Outcome::Reply(text));
        tx
    }

    fn push(&self, release: Option<oneshot::Receiver<()>>, outcome: Outcome) {
        self.scripts
            .lock()
            .expect("lock")
            .push_back(Script { release, outcome });
    }

    fn requests(&self) -> Vec<AnalysisRequest> {
        self.requests.lock().expect("lock").clone()
    }
}

#[async_trait]
impl AnalysisClient for ScriptedClient {
    async fn analyze(
        &self,
        request: &AnalysisRequest,
        callbacks: &dyn AnalysisCallbacks,
    ) -> AnalysisResult<()> {
        self.requests.lock().expect("lock").push(request.clone());
        let script = self.scripts.lock().expect("lock").pop_front();
        let Some(script) = script else {
            return Ok(());
        };

        if let Some(release) = script.release {
            let _ = release.await;
        }
        match script.outcome {
            Outcome::Reply(text) => {
                callbacks.on_stroke_quality(text);
                callbacks.on_raw_response(text);
                Ok(())
            }
            Outcome::Fail => {
                callbacks.on_error(&AnalysisError::EmptyResponse);
                Ok(())
            }
            Outcome::Unsent => Err(AnalysisError::InvalidUrl("unreachable".into())),
        }
    }
}

fn letter_a() -> StrokeSequence {
    StrokeSequence::new(vec![
        Stroke::new(vec![Point::new(60.0, 360.0), Point::new(200.0, 40.0)]),
        Stroke::new(vec![Point::new(200.0, 40.0), Point::new(340.0, 360.0)]),
        Stroke::new(vec![Point::new(110.0, 240.0), Point::new(290.0, 240.0)]),
    ])
}

fn english_a() -> PracticeContext {
    PracticeContext::new("english", "beginner", Some("A".to_string()))
}

/// Let spawned analyses run until the client has seen `count` requests.
async fn wait_for_requests(client: &ScriptedClient, count: usize) {
    while client.requests().len() < count {
        tokio::task::yield_now().await;
    }
}

fn setup() -> (Arc<ScriptedClient>, Coordinator) {
    let client = Arc::new(ScriptedClient::default());
    let coordinator = Coordinator::with_context(client.clone(), english_a());
    (client, coordinator)
}

#[tokio::test]
async fn pen_up_with_strokes_analyzes_once() {
    let (client, coordinator) = setup();
    client.reply("Steady.");

    assert!(coordinator.on_drawing_state_change(true).is_none());
    assert!(
        coordinator.on_stroke_update(letter_a()).is_none(),
        "no analysis while the pen is down"
    );

    let task = coordinator
        .on_drawing_state_change(false)
        .expect("pen up triggers analysis");
    task.await.expect("join").expect("analyze");

    assert_eq!(client.requests().len(), 1);
    let snapshot = coordinator.snapshot();
    assert_eq!(snapshot.results.stroke_quality.as_deref(), Some("Steady."));
    assert_eq!(snapshot.raw_response.as_deref(), Some("Steady."));
    assert!(!snapshot.is_analyzing);
    assert!(snapshot.last_error.is_none());
}

#[tokio::test]
async fn pen_up_without_strokes_does_nothing() {
    let (client, coordinator) = setup();

    assert!(coordinator.on_drawing_state_change(true).is_none());
    assert!(coordinator.on_drawing_state_change(false).is_none());
    assert!(coordinator
        .on_stroke_update(StrokeSequence::empty())
        .is_none());

    assert!(client.requests().is_empty());
    assert!(!coordinator.snapshot().is_analyzing);
}

#[tokio::test]
async fn stroke_update_with_pen_up_analyzes() {
    let (client, coordinator) = setup();
    client.reply("Good.");

    let task = coordinator
        .on_stroke_update(letter_a())
        .expect("pen is up");
    task.await.expect("join").expect("analyze");

    assert_eq!(client.requests().len(), 1);
    assert_eq!(coordinator.snapshot().strokes, letter_a());
}

#[tokio::test]
async fn analyzing_flag_tracks_request() {
    let (client, coordinator) = setup();
    let release = client.held("Done.");

    coordinator.on_drawing_state_change(true);
    assert!(coordinator.on_stroke_update(letter_a()).is_none());
    let task = coordinator
        .on_drawing_state_change(false)
        .expect("pen up triggers analysis");
    assert!(coordinator.snapshot().is_analyzing);

    release.send(()).expect("release");
    task.await.expect("join").expect("analyze");

    let snapshot = coordinator.snapshot();
    assert!(!snapshot.is_analyzing);
    assert_eq!(snapshot.results.stroke_quality.as_deref(), Some("Done."));
}

#[tokio::test]
async fn later_completion_wins_within_one_context() {
    let (client, coordinator) = setup();
    let first = client.held("First.");
    let second = client.held("Second.");

    let first_task = coordinator.on_stroke_update(letter_a()).expect("first");
    wait_for_requests(&client, 1).await;
    let second_task = coordinator.on_stroke_update(letter_a()).expect("second");
    wait_for_requests(&client, 2).await;

    second.send(()).expect("release second");
    second_task.await.expect("join").expect("analyze");
    assert!(
        coordinator.snapshot().is_analyzing,
        "first request still in flight"
    );

    first.send(()).expect("release first");
    first_task.await.expect("join").expect("analyze");

    let snapshot = coordinator.snapshot();
    assert_eq!(snapshot.results.stroke_quality.as_deref(), Some("First."));
    assert!(!snapshot.is_analyzing);
}

#[tokio::test]
async fn context_change_discards_pending_results() {
    let (client, coordinator) = setup();
    let release = client.held("About the old character.");

    let task = coordinator.on_stroke_update(letter_a()).expect("trigger");
    wait_for_requests(&client, 1).await;
    coordinator.on_language_change(&LanguageChange {
        language: "japanese".into(),
        level: "beginner".into(),
        character: None,
    });

    release.send(()).expect("release");
    task.await.expect("join").expect("analyze");

    let snapshot = coordinator.snapshot();
    assert!(snapshot.results.is_empty());
    assert!(snapshot.raw_response.is_none());
    assert!(snapshot.strokes.is_empty());
    assert!(!snapshot.is_analyzing);
    assert_eq!(snapshot.language_info.script, "Hiragana & Katakana");
}

#[tokio::test]
async fn character_change_resets_attempt() {
    let (client, coordinator) = setup();
    client.reply("Steady.");

    coordinator
        .on_stroke_update(letter_a())
        .expect("trigger")
        .await
        .expect("join")
        .expect("analyze");
    assert!(!coordinator.snapshot().results.is_empty());

    coordinator.on_character_change(&CharacterChange {
        character: Some("B".into()),
        level: "beginner".into(),
    });

    let snapshot = coordinator.snapshot();
    assert!(snapshot.results.is_empty());
    assert!(snapshot.strokes.is_empty());
    assert!(snapshot.quality_score.is_none());
    assert_eq!(snapshot.context.character.as_deref(), Some("B"));
}

#[tokio::test]
async fn reported_failure_clears_flag_and_records_error() {
    let (client, coordinator) = setup();
    client.push(None, Outcome::Fail);

    let task = coordinator.on_stroke_update(letter_a()).expect("trigger");
    task.await.expect("join").expect("failure is not returned");

    let snapshot = coordinator.snapshot();
    assert!(!snapshot.is_analyzing);
    assert!(snapshot.results.is_empty());
    assert_eq!(
        snapshot.last_error.as_deref(),
        Some("model returned an empty response")
    );
}

#[tokio::test]
async fn unsent_request_is_returned_and_recorded() {
    let (client, coordinator) = setup();
    client.push(None, Outcome::Unsent);

    let task = coordinator.on_stroke_update(letter_a()).expect("trigger");
    let err = task.await.expect("join").unwrap_err();

    assert!(matches!(
        err,
        SessionError::Analysis(AnalysisError::InvalidUrl(_))
    ));
    let snapshot = coordinator.snapshot();
    assert!(!snapshot.is_analyzing);
    assert!(snapshot.last_error.is_some());
}

#[tokio::test]
async fn request_describes_drawing_and_context() {
    let (client, coordinator) = setup();

    coordinator
        .on_stroke_update(letter_a())
        .expect("trigger")
        .await
        .expect("join")
        .expect("analyze");

    let requests = client.requests();
    let request = requests.first().expect("one request");

    let prompt = request.prompt().expect("prompt");
    assert!(prompt.starts_with(
        "Analyze this handwritten english character \"A\" at beginner level."
    ));
    let headers = [
        "Current Stroke Quality",
        "Letter Formation",
        "Next Expected Strokes",
        "Common Mistakes to Avoid",
        "Overall Quality Score (%)",
    ];
    let positions: Vec<usize> = headers
        .iter()
        .map(|h| prompt.find(h).expect("header present"))
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]), "headers in order");

    let inline = request.image().expect("image");
    assert_eq!(inline.mime_type, "image/png");
    let png = decode_data_url(&format!("data:image/png;base64,{}", inline.data)).expect("decode");
    let raster = image::load_from_memory(&png).expect("png").to_rgba8();
    assert_eq!(raster.dimensions(), (400, 400));
    assert!(
        raster.pixels().any(|p| p.0[0] < 128),
        "strokes are drawn in dark ink"
    );
}

#[tokio::test]
async fn clones_share_state_and_client() {
    let (client, coordinator) = setup();
    let other = coordinator.clone();

    other
        .on_stroke_update(letter_a())
        .expect("trigger")
        .await
        .expect("join")
        .expect("analyze");
    coordinator
        .on_stroke_update(letter_a())
        .expect("trigger")
        .await
        .expect("join")
        .expect("analyze");

    assert_eq!(client.requests().len(), 2);
    assert_eq!(coordinator.snapshot(), other.snapshot());
}

#[tokio::test]
async fn json_events_drive_the_session() {
    let (client, coordinator) = setup();
    client.reply("Neat.");

    let events = [
        json!({ "type": "languageChange", "data": { "language": "english", "level": "beginner", "character": "A" } }),
        json!({ "type": "drawingStateChange", "data": true }),
        json!({ "type": "strokeUpdate", "data": [[[60, 360], [200, 40]], [{ "x": 200, "y": 40 }, { "x": 340, "y": 360 }]] }),
    ];
    for event in events {
        let event = InputEvent::from_json(&event.to_string()).expect("event");
        assert!(coordinator.handle_event(event).is_none());
    }

    let pen_up = InputEvent::from_json(r#"{"type":"drawingStateChange","data":false}"#)
        .expect("event");
    coordinator
        .handle_event(pen_up)
        .expect("trigger")
        .await
        .expect("join")
        .expect("analyze");

    let snapshot = coordinator.snapshot();
    assert_eq!(snapshot.strokes.len(), 2);
    assert_eq!(snapshot.results.stroke_quality.as_deref(), Some("Neat."));
}

#[tokio::test]
#[cfg_attr(
    target_os = "macos",
    ignore = "wiremock/reqwest system-configuration issue on macOS"
)]
async fn gemini_reply_fills_every_slot() {
    let server = MockServer::start().await;
    let reply = "1. Current Stroke Quality: Confident lines.\n\
2. Letter Formation: Apex centered.\n\
3. Next Expected Strokes: Crossbar.\n\
4. Common Mistakes to Avoid: Crossbar too high.\n\
5. Overall Quality Score (%): 82";

    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-1.5-flash:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "content": { "role": "model", "parts": [{ "text": reply }] } }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = AnalysisConfig::new("test-key")
        .expect("config")
        .with_base_url(&server.uri())
        .expect("base url");
    let client = GeminiClient::new(config).expect("client");
    let coordinator = Coordinator::with_context(Arc::new(client), english_a());

    coordinator
        .on_stroke_update(letter_a())
        .expect("trigger")
        .await
        .expect("join")
        .expect("analyze");

    let snapshot = coordinator.snapshot();
    assert_eq!(
        snapshot.results.stroke_quality.as_deref(),
        Some("Confident lines.")
    );
    assert_eq!(
        snapshot.results.letter_formation.as_deref(),
        Some("Apex centered.")
    );
    assert_eq!(snapshot.results.next_strokes.as_deref(), Some("Crossbar."));
    assert_eq!(
        snapshot.results.common_mistakes.as_deref(),
        Some("Crossbar too high.")
    );
    assert_eq!(snapshot.quality_score, Some(82));
    assert_eq!(snapshot.raw_response.as_deref(), Some(reply));
}
