// Integration tests for the presentation controller
// A recording surface captures every UI change in order

#[path = "../src/classify/mod.rs"]
mod classify;
#[path = "../src/invoke/mod.rs"]
mod invoke;
#[path = "../src/locator/mod.rs"]
mod locator;
#[path = "../src/present/mod.rs"]
mod present;

use async_trait::async_trait;
use classify::{ExitInfo, Outcome, UNAUTHORIZED_HINT};
use invoke::{
    ExecutionConstraints, ExecutionRequest, Invoker, LocalInvoker, Operation, RawResult,
    RawStatus, RunResponse,
};
use locator::{ExecutorKind, LocalSettings, SourceFile};
use present::{
    Controller, ControllerState, Credential, CredentialStore, MemoryCredentialStore, Status,
    Surface, Trigger,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::oneshot;

fn init_tracing() {
    use std::sync::Once;
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_target(true)
            .init();
    });
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Event {
    Status(Status),
    SetOutput(String),
    AppendOutput(String),
    Trigger(bool),
    FocusCredential,
    /// Recorded by the invoker while the call is in flight
    Invoked(Option<String>),
}

type Log = Arc<Mutex<Vec<Event>>>;

struct Recording(Log);

impl Surface for Recording {
    fn set_status(&mut self, status: &Status) {
        self.0.lock().unwrap().push(Event::Status(status.clone()));
    }
    fn set_output(&mut self, text: &str) {
        self.0.lock().unwrap().push(Event::SetOutput(text.to_string()));
    }
    fn append_output(&mut self, text: &str) {
        self.0.lock().unwrap().push(Event::AppendOutput(text.to_string()));
    }
    fn set_trigger_enabled(&mut self, enabled: bool) {
        self.0.lock().unwrap().push(Event::Trigger(enabled));
    }
    fn focus_credential(&mut self) {
        self.0.lock().unwrap().push(Event::FocusCredential);
    }
}

/// Returns a canned result and logs the credential it was handed
struct Canned {
    result: RawResult,
    log: Log,
}

#[async_trait]
impl Invoker for Canned {
    fn kind(&self) -> ExecutorKind {
        ExecutorKind::Remote
    }

    async fn invoke(&self, request: &ExecutionRequest) -> RawResult {
        self.log
            .lock()
            .unwrap()
            .push(Event::Invoked(request.credential_header().map(str::to_string)));
        self.result.clone()
    }
}

/// Holds each inline request until its reply is sent, keyed by the code text
#[derive(Default)]
struct Gated {
    replies: Mutex<HashMap<String, oneshot::Receiver<RawResult>>>,
}

impl Gated {
    fn gate(&self, code: &str) -> oneshot::Sender<RawResult> {
        let (tx, rx) = oneshot::channel();
        self.replies.lock().unwrap().insert(code.to_string(), rx);
        tx
    }
}

#[async_trait]
impl Invoker for Gated {
    fn kind(&self) -> ExecutorKind {
        ExecutorKind::Remote
    }

    async fn invoke(&self, request: &ExecutionRequest) -> RawResult {
        let invoke::Source::Inline(code) = &request.source else {
            return RawResult::unresolved("inline code only");
        };
        let reply = self.replies.lock().unwrap().remove(code);
        match reply {
            Some(reply) => reply.await.unwrap_or_default(),
            None => RawResult::unresolved("no reply registered"),
        }
    }
}

fn success(output: &str) -> RawResult {
    RawResult::http(
        200,
        RunResponse {
            success: true,
            output: Some(output.to_string()),
            ..Default::default()
        },
    )
}

fn controller(result: RawResult, credential: Credential) -> (Controller<Recording>, Log) {
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let invoker = Canned {
        result,
        log: log.clone(),
    };
    let controller = Controller::new(Arc::new(invoker), credential, Recording(log.clone()));
    (controller, log)
}

fn empty_credential() -> Credential {
    Credential::load(Box::new(MemoryCredentialStore::default()))
}

fn events(log: &Log) -> Vec<Event> {
    log.lock().unwrap().clone()
}

/// The trigger is disabled before the call and re-enabled only after it
fn assert_trigger_brackets_call(events: &[Event]) {
    let toggles: Vec<(usize, bool)> = events
        .iter()
        .enumerate()
        .filter_map(|(i, e)| match e {
            Event::Trigger(enabled) => Some((i, *enabled)),
            _ => None,
        })
        .collect();
    let invoked = events
        .iter()
        .position(|e| matches!(e, Event::Invoked(_)))
        .expect("invoker was not called");

    assert_eq!(toggles.len(), 3, "events: {:?}", events);
    assert!(toggles[0].1);
    assert!(!toggles[1].1 && toggles[1].0 < invoked);
    assert!(toggles[2].1 && toggles[2].0 > invoked);
}

fn every_outcome() -> Vec<RawResult> {
    vec![
        RawResult::http(
            200,
            RunResponse {
                success: true,
                output: Some("Hello Jatti!\n".to_string()),
                ..Default::default()
            },
        ),
        RawResult::process(RawStatus::Exit(1), b"", b"boom\n", false),
        RawResult::http(401, RunResponse::default()),
        RawResult::transport("Network error: connection refused"),
        RawResult::unresolved("Could not find cli.py"),
        RawResult::process(
            RawStatus::TimedOut {
                after: Duration::from_secs(30),
            },
            b"partial",
            b"",
            false,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_trigger_disabled_exactly_while_running() {
        init_tracing();
        for raw in every_outcome() {
            let (controller, log) = controller(raw, empty_credential());

            let outcome = controller.run_code(Trigger::Button, "sun_we\nja_we\n").await;
            assert!(outcome.is_some());
            assert_eq!(controller.state(), ControllerState::Idle);
            assert_trigger_brackets_call(&events(&log));
        }
    }

    /// An accelerator run overlapping a button run keeps the trigger disabled
    /// until both are done; the later response owns the output
    #[tokio::test]
    async fn test_overlapping_runs() {
        init_tracing();
        let gated = Arc::new(Gated::default());
        let first_reply = gated.gate("first");
        let second_reply = gated.gate("second");
        let log: Log = Arc::new(Mutex::new(Vec::new()));
        let controller =
            Controller::new(gated.clone(), empty_credential(), Recording(log.clone()));

        let first = controller.run_code(Trigger::Button, "first");
        assert_eq!(controller.run_code(Trigger::Button, "ignored").await, None);
        let second = controller.run_code(Trigger::Accelerator, "second");
        assert_eq!(controller.in_flight(), 2);

        let (first, second) = tokio::join!(first, async {
            second_reply.send(success("second out")).unwrap();
            let outcome = second.await;

            // The button run is still pending
            assert_eq!(controller.state(), ControllerState::Running);
            assert_eq!(
                events(&log).iter().rev().find(|e| matches!(e, Event::Trigger(_))),
                Some(&Event::Trigger(false))
            );

            first_reply.send(success("first out")).unwrap();
            outcome
        });

        assert!(first.is_some_and(|o| o.is_success()));
        assert!(second.is_some_and(|o| o.is_success()));
        assert_eq!(controller.state(), ControllerState::Idle);

        let events = events(&log);
        let toggles: Vec<&Event> = events
            .iter()
            .filter(|e| matches!(e, Event::Trigger(_)))
            .collect();
        assert_eq!(
            toggles,
            vec![
                &Event::Trigger(true),
                &Event::Trigger(false),
                &Event::Trigger(false),
                &Event::Trigger(true)
            ]
        );
        let last_output = events.iter().rev().find_map(|e| match e {
            Event::SetOutput(text) => Some(text.as_str()),
            _ => None,
        });
        assert_eq!(last_output, Some("first out"));
    }

    #[tokio::test]
    async fn test_success_shows_output_verbatim() {
        init_tracing();
        let (controller, log) = controller(every_outcome().remove(0), empty_credential());

        controller.run_code(Trigger::Accelerator, "sun_we\nja_we\n").await;

        let events = events(&log);
        assert!(events.contains(&Event::Status(Status::info("running\u{2026}"))));
        assert!(events.contains(&Event::Status(Status::ok("ok"))));
        assert!(events.contains(&Event::SetOutput("Hello Jatti!\n".to_string())));
        assert!(!events.contains(&Event::FocusCredential));
    }

    #[tokio::test]
    async fn test_unauthorized_focuses_credential() {
        init_tracing();
        let (controller, log) = controller(
            RawResult::http(
                200,
                RunResponse {
                    error: Some("Unauthorized".to_string()),
                    ..Default::default()
                },
            ),
            empty_credential(),
        );

        let outcome = controller.run_code(Trigger::Button, "sun_we\nja_we\n").await;
        assert_eq!(
            outcome,
            Some(Outcome::Unauthorized {
                hint: UNAUTHORIZED_HINT.to_string()
            })
        );

        let events = events(&log);
        assert!(events.contains(&Event::FocusCredential));
        assert!(events.contains(&Event::Status(Status::error("error"))));
    }

    #[tokio::test]
    async fn test_transport_failure_status() {
        init_tracing();
        let (controller, log) = controller(
            RawResult::transport("Network error: connection refused"),
            empty_credential(),
        );

        controller.run_code(Trigger::Button, "sun_we\nja_we\n").await;
        assert!(events(&log).contains(&Event::Status(Status::error("offline?"))));
    }

    #[tokio::test]
    async fn test_credential_attached_to_request() {
        init_tracing();
        let store = MemoryCredentialStore::default();
        store.save(present::CREDENTIAL_STORAGE_KEY, "demo-key").unwrap();
        let (controller, log) =
            controller(every_outcome().remove(0), Credential::load(Box::new(store)));

        controller.run_code(Trigger::Button, "sun_we\nja_we\n").await;
        controller.set_credential("").unwrap();
        controller.run_code(Trigger::Button, "sun_we\nja_we\n").await;

        let sent: Vec<Event> = events(&log)
            .into_iter()
            .filter(|e| matches!(e, Event::Invoked(_)))
            .collect();
        assert_eq!(
            sent,
            vec![
                Event::Invoked(Some("demo-key".to_string())),
                Event::Invoked(None)
            ]
        );
    }

    #[test]
    fn test_clear_resets_surface() {
        init_tracing();
        let (controller, log) = controller(every_outcome().remove(0), empty_credential());

        tokio_test::block_on(controller.run_code(Trigger::Button, "sun_we\nja_we\n"));
        log.lock().unwrap().clear();

        controller.clear();
        assert_eq!(
            events(&log),
            vec![Event::SetOutput(String::new()), Event::Status(Status::none())]
        );
        assert_eq!(controller.state(), ControllerState::Idle);
    }

    #[tokio::test]
    async fn test_editor_failure_lines() {
        init_tracing();
        let (controller, log) = controller(
            RawResult::process(RawStatus::Exit(2), b"", b"bad token\n", false),
            empty_credential(),
        );
        let file = SourceFile::new("/work/hello.jatti").unwrap();

        let outcome = controller
            .run_file(Trigger::Button, Operation::Build, file)
            .await;
        assert_eq!(
            outcome,
            Some(Outcome::ToolFailure {
                output: "bad token\n".to_string(),
                exit_info: ExitInfo::Code(2),
            })
        );

        let appended: String = events(&log)
            .into_iter()
            .filter_map(|e| match e {
                Event::AppendOutput(text) => Some(text),
                _ => None,
            })
            .collect();
        assert!(appended.starts_with("\u{1f528} Building: hello.jatti\n"));
        assert!(appended.contains("bad token\n"));
        assert!(appended.ends_with("\u{274c} Build failed with code 2\n"));
    }

    /// A missing tool re-enables the trigger without launching anything
    #[tokio::test]
    async fn test_missing_tool_returns_to_idle() {
        init_tracing();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hello.jatti");
        std::fs::write(&path, "sun_we\nja_we\n").unwrap();

        let log: Log = Arc::new(Mutex::new(Vec::new()));
        let invoker = LocalInvoker::new(
            LocalSettings {
                interpreter_path: "false".to_string(),
                ..Default::default()
            },
            ExecutionConstraints::default(),
        );
        let controller =
            Controller::new(Arc::new(invoker), empty_credential(), Recording(log.clone()));

        let outcome = controller
            .run_file(Trigger::Button, Operation::Run, SourceFile::new(path).unwrap())
            .await;
        assert!(matches!(outcome, Some(Outcome::ToolNotFound { .. })));
        assert_eq!(controller.state(), ControllerState::Idle);
        assert_eq!(events(&log).last(), Some(&Event::Trigger(true)));
    }
}
