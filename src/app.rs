use chrono::{DateTime, Local};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::form::{FormState, TopicQuery};
use crate::openai::CompletionClient;
use crate::prompt;

/// Which of the four views is active. Exactly one is ever shown, so illegal
/// combinations (loading and results at once) cannot be represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Idle,
    Collecting,
    Loading,
    Results,
}

/// Settlement of the one in-flight completion request, delivered from the
/// request task back to the UI loop.
#[derive(Debug)]
pub enum CompletionOutcome {
    Completed { text: String },
    Failed { error: String },
}

/// Session controller: owns the current mode, the form, the last query and
/// result text, and the single in-flight request.
pub struct App {
    pub mode: Mode,
    pub form: FormState,
    pub last_query: Option<TopicQuery>,
    pub result_text: String,
    pub generated_at: Option<DateTime<Local>>,
    pub results_scroll: u16,
    pub tick: usize,
    client: CompletionClient,
    outcome_tx: mpsc::Sender<CompletionOutcome>,
    outcome_rx: mpsc::Receiver<CompletionOutcome>,
    request_task: Option<JoinHandle<()>>,
}

impl App {
    pub fn new(client: CompletionClient) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::channel(1);
        Self {
            mode: Mode::Idle,
            form: FormState::new(),
            last_query: None,
            result_text: String::new(),
            generated_at: None,
            results_scroll: 0,
            tick: 0,
            client,
            outcome_tx,
            outcome_rx,
            request_task: None,
        }
    }

    /// Idle -> Collecting. Opens a fresh form.
    pub fn open_form(&mut self) {
        if self.mode == Mode::Idle {
            self.form = FormState::new();
            self.mode = Mode::Collecting;
        }
    }

    /// Collecting -> Idle without submitting.
    pub fn cancel_form(&mut self) {
        if self.mode == Mode::Collecting {
            self.mode = Mode::Idle;
        }
    }

    /// Validates the form; on success stores the query, dismisses the form
    /// and fires the request (Collecting -> Loading). On failure the error
    /// is shown on the form and the user may retry.
    pub fn submit_form(&mut self) {
        if self.mode != Mode::Collecting {
            return;
        }
        match self.form.submit() {
            Ok(query) => self.start_generation(query),
            Err(err) => {
                warn!(%err, "form validation failed");
                self.form.error = Some(err.to_string());
            }
        }
    }

    /// Spawns the one completion request. Only one may be in flight; the
    /// Loading mode gates re-entry.
    fn start_generation(&mut self, query: TopicQuery) {
        if self.request_task.is_some() {
            return;
        }

        let prompt = prompt::build_prompt(&query);
        info!(
            topics_count = query.topics_count,
            institution = %query.institution,
            "requesting topic generation"
        );
        self.last_query = Some(query);
        self.mode = Mode::Loading;

        let client = self.client.clone();
        let tx = self.outcome_tx.clone();
        self.request_task = Some(tokio::spawn(async move {
            let outcome = match client.complete(&prompt).await {
                Ok(text) => CompletionOutcome::Completed { text },
                Err(err) => CompletionOutcome::Failed {
                    error: err.to_string(),
                },
            };
            let _ = tx.send(outcome).await;
        }));
    }

    /// Drains request settlements. Called once per frame by the run loop.
    /// Success stores the parsed text; failure is logged and leaves the text
    /// empty. Either way the session moves to Results.
    pub fn drain_outcomes(&mut self) {
        while let Ok(outcome) = self.outcome_rx.try_recv() {
            match outcome {
                CompletionOutcome::Completed { text } => {
                    info!(result_len = text.len(), "topic generation completed");
                    self.result_text = text;
                }
                CompletionOutcome::Failed { error } => {
                    error!(%error, "topic generation failed");
                    self.result_text = String::new();
                }
            }
            self.generated_at = Some(Local::now());
            self.results_scroll = 0;
            self.request_task = None;
            self.mode = Mode::Results;
        }
    }

    /// Results -> Idle. The last query and result text stay around until the
    /// next run.
    pub fn close_results(&mut self) {
        if self.mode == Mode::Results {
            self.mode = Mode::Idle;
        }
    }

    pub fn scroll_results_up(&mut self, lines: u16) {
        self.results_scroll = self.results_scroll.saturating_sub(lines);
    }

    pub fn scroll_results_down(&mut self, lines: u16) {
        self.results_scroll = self.results_scroll.saturating_add(lines);
    }

    /// Aborts the in-flight request task, if any. Called on application exit.
    pub fn shutdown(&mut self) {
        if let Some(task) = self.request_task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::form::Field;

    fn test_app() -> App {
        App::new(CompletionClient::new(Config {
            api_key: "test-key".to_string(),
            // Nothing listens here; tests below never let a request settle.
            completions_url: "http://127.0.0.1:9/v1/completions".to_string(),
            model: "text-davinci-003".to_string(),
        }))
    }

    fn fill_form(app: &mut App) {
        app.form.set_value(Field::Faculty, "Science");
        app.form.set_value(Field::Department, "Computer Science");
        app.form.set_value(Field::Institution, "Test University");
        app.form.set_value(Field::TopicsCount, "2");
        app.form.set_value(Field::Keywords, "AI, IOT");
    }

    #[test]
    fn test_starts_idle() {
        let app = test_app();
        assert_eq!(app.mode, Mode::Idle);
        assert!(app.last_query.is_none());
        assert!(app.result_text.is_empty());
    }

    #[test]
    fn test_open_and_cancel_form() {
        let mut app = test_app();
        app.open_form();
        assert_eq!(app.mode, Mode::Collecting);
        app.cancel_form();
        assert_eq!(app.mode, Mode::Idle);
    }

    #[test]
    fn test_open_form_only_from_idle() {
        let mut app = test_app();
        app.mode = Mode::Results;
        app.open_form();
        assert_eq!(app.mode, Mode::Results);
    }

    #[test]
    fn test_invalid_submit_stays_collecting_with_error() {
        let mut app = test_app();
        app.open_form();
        app.submit_form();
        assert_eq!(app.mode, Mode::Collecting);
        assert!(app.form.error.is_some());
        assert!(app.last_query.is_none());
    }

    #[tokio::test]
    async fn test_valid_submit_enters_loading() {
        let mut app = test_app();
        app.open_form();
        fill_form(&mut app);
        app.submit_form();
        assert_eq!(app.mode, Mode::Loading);
        let query = app.last_query.as_ref().unwrap();
        assert_eq!(query.topics_count, 2);
        assert_eq!(query.keywords, vec!["AI", "IOT"]);
        app.shutdown();
    }

    #[tokio::test]
    async fn test_only_one_request_in_flight() {
        let mut app = test_app();
        app.open_form();
        fill_form(&mut app);
        app.submit_form();
        assert_eq!(app.mode, Mode::Loading);
        // A second submit while loading must not spawn another request.
        app.submit_form();
        assert_eq!(app.mode, Mode::Loading);
        app.shutdown();
    }

    #[test]
    fn test_close_results_keeps_last_result() {
        let mut app = test_app();
        app.mode = Mode::Results;
        app.result_text = "Topic1: Desc1".to_string();
        app.close_results();
        assert_eq!(app.mode, Mode::Idle);
        assert_eq!(app.result_text, "Topic1: Desc1");
    }

    #[test]
    fn test_results_scroll_saturates() {
        let mut app = test_app();
        app.scroll_results_up(5);
        assert_eq!(app.results_scroll, 0);
        app.scroll_results_down(3);
        app.scroll_results_up(1);
        assert_eq!(app.results_scroll, 2);
    }
}
