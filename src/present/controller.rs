// Presentation controller - Idle/Running state machine over a Surface

use super::credential::Credential;
use super::error::CredentialError;
use super::render::{self, Status};
use crate::classify::{Outcome, classify};
use crate::invoke::{ExecutionRequest, Invoker, Operation};
use crate::locator::SourceFile;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;
use tracing::{debug, info};

/// The UI collaborator
pub trait Surface {
    fn set_status(&mut self, status: &Status);
    /// Replace the output area
    fn set_output(&mut self, text: &str);
    /// Append to the output area
    fn append_output(&mut self, text: &str);
    fn set_trigger_enabled(&mut self, enabled: bool);
    fn focus_credential(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    Idle,
    Running,
}

/// What started an execution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// The run control; ignored while it is disabled
    Button,
    /// Keyboard accelerator; bypasses the disabled control
    Accelerator,
}

struct Shared<S> {
    credential: Credential,
    surface: S,
    in_flight: usize,
}

/// Drives one trigger control and its output surface.
///
/// Methods take `&self`, so an accelerator run can overlap one already in
/// flight. The trigger comes back only when the last of them finishes, and
/// each finished run renders its own outcome (the last to arrive wins).
pub struct Controller<S: Surface> {
    invoker: Arc<dyn Invoker>,
    shared: Mutex<Shared<S>>,
}

impl<S: Surface> Controller<S> {
    pub fn new(invoker: Arc<dyn Invoker>, credential: Credential, mut surface: S) -> Self {
        surface.set_trigger_enabled(true);
        Self {
            invoker,
            shared: Mutex::new(Shared {
                credential,
                surface,
                in_flight: 0,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Shared<S>> {
        self.shared.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn state(&self) -> ControllerState {
        if self.lock().in_flight == 0 {
            ControllerState::Idle
        } else {
            ControllerState::Running
        }
    }

    pub fn in_flight(&self) -> usize {
        self.lock().in_flight
    }

    /// Overwrite the credential and its stored copy; empty clears it
    pub fn set_credential(&self, value: &str) -> Result<(), CredentialError> {
        self.lock().credential.set(value)
    }

    /// Claim the trigger; `false` when a button press arrives while running
    fn begin(&self, trigger: Trigger) -> bool {
        let mut shared = self.lock();
        if shared.in_flight > 0 && trigger == Trigger::Button {
            debug!(in_flight = shared.in_flight, "trigger disabled while running, ignoring");
            return false;
        }
        if shared.in_flight > 0 {
            info!(in_flight = shared.in_flight, "accelerator run overlaps one in flight");
        }
        shared.in_flight += 1;
        shared.surface.set_trigger_enabled(false);
        true
    }

    /// Back to Idle once nothing is in flight, whatever the outcome
    fn finish(&self, shared: &mut Shared<S>, outcome: &Outcome, start: Instant) {
        info!(
            executor = ?self.invoker.kind(),
            outcome = outcome.label(),
            duration_ms = start.elapsed().as_millis() as u64,
            "execution finished"
        );
        shared.in_flight = shared.in_flight.saturating_sub(1);
        if shared.in_flight == 0 {
            shared.surface.set_trigger_enabled(true);
        }
    }

    /// Playground run of inline code. The trigger is claimed when this is
    /// called; the future yields `None` when it was ignored.
    pub fn run_code(
        &self,
        trigger: Trigger,
        code: impl Into<String>,
    ) -> impl Future<Output = Option<Outcome>> + '_ {
        let started = self.begin(trigger);
        let request = {
            let mut shared = self.lock();
            if started {
                shared.surface.set_status(&Status::info("running\u{2026}"));
            }
            ExecutionRequest::inline(code, shared.credential.header_value())
        };

        async move {
            if !started {
                return None;
            }
            let start = Instant::now();
            let outcome = classify(self.invoker.invoke(&request).await);

            let view = render::playground(&outcome);
            let mut shared = self.lock();
            shared.surface.set_status(&view.status);
            shared.surface.set_output(&view.output);
            if view.focus_credential {
                shared.surface.focus_credential();
            }

            self.finish(&mut shared, &outcome, start);
            Some(outcome)
        }
    }

    /// Editor command on a file. `None` when the trigger was ignored.
    pub async fn run_file(
        &self,
        trigger: Trigger,
        operation: Operation,
        file: SourceFile,
    ) -> Option<Outcome> {
        if !self.begin(trigger) {
            return None;
        }
        let start = Instant::now();
        {
            let mut shared = self.lock();
            shared.surface.set_output("");
            shared
                .surface
                .append_output(&render::editor_header(operation, &file));
        }

        let request = ExecutionRequest::file(file.clone(), operation);
        let outcome = classify(self.invoker.invoke(&request).await);

        let view = render::editor(operation, &file, &outcome);
        let mut shared = self.lock();
        shared.surface.append_output(&view.output);
        shared.surface.set_status(&view.status);

        self.finish(&mut shared, &outcome, start);
        Some(outcome)
    }

    /// Reset output and status; an in-flight request is not interrupted
    pub fn clear(&self) {
        let mut shared = self.lock();
        shared.surface.set_output("");
        shared.surface.set_status(&Status::none());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoke::RawResult;
    use crate::locator::ExecutorKind;
    use crate::present::credential::MemoryCredentialStore;
    use async_trait::async_trait;

    /// Never answers
    struct Stalled;

    #[async_trait]
    impl Invoker for Stalled {
        fn kind(&self) -> ExecutorKind {
            ExecutorKind::Remote
        }

        async fn invoke(&self, _request: &ExecutionRequest) -> RawResult {
            std::future::pending().await
        }
    }

    struct Toggles(Arc<Mutex<Vec<bool>>>);

    impl Surface for Toggles {
        fn set_status(&mut self, _status: &Status) {}
        fn set_output(&mut self, _text: &str) {}
        fn append_output(&mut self, _text: &str) {}
        fn set_trigger_enabled(&mut self, enabled: bool) {
            self.0.lock().unwrap().push(enabled);
        }
        fn focus_credential(&mut self) {}
    }

    fn stalled() -> (Controller<Toggles>, Arc<Mutex<Vec<bool>>>) {
        let toggles = Arc::new(Mutex::new(Vec::new()));
        let controller = Controller::new(
            Arc::new(Stalled),
            Credential::load(Box::new(MemoryCredentialStore::default())),
            Toggles(toggles.clone()),
        );
        (controller, toggles)
    }

    #[tokio::test]
    async fn test_button_ignored_while_running() {
        let (controller, toggles) = stalled();

        let _pending = controller.run_code(Trigger::Button, "sun_we\nja_we\n");
        assert_eq!(controller.state(), ControllerState::Running);

        assert_eq!(controller.run_code(Trigger::Button, "x").await, None);
        assert_eq!(controller.in_flight(), 1);
        assert_eq!(*toggles.lock().unwrap(), vec![true, false]);
    }

    #[test]
    fn test_accelerator_claimed_while_running() {
        let (controller, toggles) = stalled();

        let _first = controller.run_code(Trigger::Button, "a");
        let _second = controller.run_code(Trigger::Accelerator, "b");
        assert_eq!(controller.in_flight(), 2);
        assert_eq!(*toggles.lock().unwrap(), vec![true, false, false]);
    }
}
