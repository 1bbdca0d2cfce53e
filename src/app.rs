use std::sync::{Arc, mpsc};
use std::thread;

use crate::catalog::{self, COMPANIES, TOPICS};
use crate::config::Config;
use crate::error::RemoteError;
use crate::event::{AppEvent, RemoteReply, ReplyPayload};
use crate::model::CodingProblem;
use crate::remote::RemoteSource;
use crate::session::assessment::AssessmentSession;
use crate::session::workspace::Workspace;
use crate::store::topic_cache::TopicCache;
use crate::ui::components::menu::Menu;
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Portal,
    Companies,
    Assessment,
    Roadmap,
    Problems,
    Workspace,
}

/// The last request that failed, so the user can re-issue it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RetryTarget {
    Aptitude(String),
    Coding(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub is_error: bool,
}

impl Notice {
    fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    fn error(err: &RemoteError) -> Self {
        Self {
            text: format!("{} [r] retry", err.user_message()),
            is_error: true,
        }
    }
}

pub struct App {
    pub screen: AppScreen,
    pub config: Config,
    pub theme: &'static Theme,
    pub menu: Menu<'static>,
    pub company_selected: usize,
    pub topic_selected: usize,
    pub problem_selected: usize,
    pub assessment: Option<AssessmentSession>,
    pub active_topic: Option<String>,
    pub topic_problems: Vec<CodingProblem>,
    pub workspace: Option<Workspace>,
    pub notice: Option<Notice>,
    pub retry: Option<RetryTarget>,
    pub should_quit: bool,
    remote: Arc<dyn RemoteSource>,
    cache: TopicCache,
    tx: mpsc::Sender<AppEvent>,
    /// Outstanding question fetch, if any. At most one at a time.
    fetch_ticket: Option<u64>,
    /// Outstanding code execution for the open workspace.
    run_ticket: Option<u64>,
    next_ticket: u64,
}

impl App {
    pub fn new(
        config: Config,
        theme: &'static Theme,
        remote: Arc<dyn RemoteSource>,
        cache: TopicCache,
        tx: mpsc::Sender<AppEvent>,
    ) -> Self {
        Self {
            screen: AppScreen::Portal,
            config,
            theme,
            menu: Menu::new(theme),
            company_selected: 0,
            topic_selected: 0,
            problem_selected: 0,
            assessment: None,
            active_topic: None,
            topic_problems: Vec::new(),
            workspace: None,
            notice: None,
            retry: None,
            should_quit: false,
            remote,
            cache,
            tx,
            fetch_ticket: None,
            run_ticket: None,
            next_ticket: 1,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.fetch_ticket.is_some()
    }

    pub fn cache(&self) -> &TopicCache {
        &self.cache
    }

    pub fn go_to_portal(&mut self) {
        self.abandon_fetch();
        self.screen = AppScreen::Portal;
    }

    pub fn go_to_companies(&mut self) {
        self.abandon_fetch();
        self.screen = AppScreen::Companies;
    }

    pub fn go_to_roadmap(&mut self) {
        self.abandon_fetch();
        self.screen = AppScreen::Roadmap;
    }

    pub fn go_to_problems(&mut self) {
        self.screen = AppScreen::Problems;
    }

    fn abandon_fetch(&mut self) {
        if let Some(ticket) = self.fetch_ticket.take() {
            tracing::debug!(ticket, "abandoning in-flight fetch");
        }
        self.notice = None;
        self.retry = None;
    }

    pub fn start_selected_assessment(&mut self) {
        if let Some(company) = COMPANIES.get(self.company_selected) {
            self.start_assessment(company.name);
        }
    }

    /// Request a question set for `company`. Ignored while another fetch is
    /// outstanding.
    pub fn start_assessment(&mut self, company: &str) {
        if self.is_loading() {
            return;
        }
        let ticket = self.issue_ticket();
        self.fetch_ticket = Some(ticket);
        self.notice = None;
        tracing::info!(company, ticket, "requesting aptitude set");

        let company = company.to_string();
        self.spawn_request(ticket, move |remote| {
            let result = remote.fetch_aptitude(&company);
            ReplyPayload::Aptitude { company, result }
        });
    }

    /// Drop the current assessment and return to the company picker.
    pub fn terminate_assessment(&mut self) {
        if let Some(session) = self.assessment.take() {
            tracing::debug!(company = %session.company, "assessment terminated");
        }
        self.go_to_companies();
    }

    pub fn open_selected_topic(&mut self) {
        if let Some(topic) = TOPICS.get(self.topic_selected) {
            self.open_topic(topic.name);
        }
    }

    /// Show the problem list for `topic`, from the cache when possible.
    pub fn open_topic(&mut self, topic: &str) {
        if self.is_loading() {
            return;
        }
        if catalog::find_topic(topic).is_some_and(|t| !t.unlocked) {
            self.notice = Some(Notice::info(format!("{topic} is locked")));
            return;
        }

        if let Some(problems) = self.cache.cached(topic) {
            self.show_problems(topic, problems);
            self.notice = Some(Notice::info("Loaded from cache"));
            return;
        }

        let ticket = self.issue_ticket();
        self.fetch_ticket = Some(ticket);
        self.notice = None;
        tracing::info!(topic, ticket, "requesting coding set");

        let topic = topic.to_string();
        self.spawn_request(ticket, move |remote| {
            let result = remote.fetch_coding(&topic);
            ReplyPayload::Coding { topic, result }
        });
    }

    fn show_problems(&mut self, topic: &str, problems: Vec<CodingProblem>) {
        self.active_topic = Some(topic.to_string());
        self.topic_problems = problems;
        self.problem_selected = 0;
        self.screen = AppScreen::Problems;
    }

    pub fn purge_cache(&mut self) {
        self.cache.purge();
        self.notice = Some(Notice::info("Topic cache purged"));
    }

    pub fn open_selected_problem(&mut self) {
        let Some(problem) = self.topic_problems.get(self.problem_selected).cloned() else {
            return;
        };
        self.workspace = Some(Workspace::new(
            problem,
            self.config.language(),
            self.config.logic_gate_enabled,
        ));
        self.run_ticket = None;
        self.screen = AppScreen::Workspace;
    }

    /// Leave the workspace; a pending run's result will be discarded.
    pub fn leave_workspace(&mut self) {
        self.workspace = None;
        self.run_ticket = None;
        self.go_to_problems();
    }

    pub fn run_code(&mut self) {
        let Some(request) = self.workspace.as_mut().and_then(Workspace::begin_run) else {
            return;
        };
        let ticket = self.issue_ticket();
        self.run_ticket = Some(ticket);
        self.spawn_request(ticket, move |remote| {
            ReplyPayload::Execution(remote.execute(&request))
        });
    }

    /// Re-issue the last failed request of this view. Kept for later while
    /// another fetch is outstanding.
    pub fn retry(&mut self) {
        if self.is_loading() {
            return;
        }
        match self.retry.take() {
            Some(RetryTarget::Aptitude(company)) => self.start_assessment(&company),
            Some(RetryTarget::Coding(topic)) => self.open_topic(&topic),
            None => {}
        }
    }

    pub fn handle_reply(&mut self, reply: RemoteReply) {
        let RemoteReply { ticket, payload } = reply;
        match payload {
            ReplyPayload::Aptitude { company, result } => {
                if !self.accept_fetch(ticket) {
                    return;
                }
                match result {
                    Ok(questions) => match AssessmentSession::new(&company, questions) {
                        Some(session) => {
                            self.assessment = Some(session);
                            self.retry = None;
                            self.screen = AppScreen::Assessment;
                        }
                        None => self.fail(
                            RemoteError::malformed("empty question set"),
                            RetryTarget::Aptitude(company),
                        ),
                    },
                    Err(err) => self.fail(err, RetryTarget::Aptitude(company)),
                }
            }
            ReplyPayload::Coding { topic, result } => {
                if !self.accept_fetch(ticket) {
                    return;
                }
                match result {
                    Ok(problems) => {
                        self.cache.store(&topic, problems.clone());
                        self.retry = None;
                        self.show_problems(&topic, problems);
                    }
                    Err(err) => self.fail(err, RetryTarget::Coding(topic)),
                }
            }
            ReplyPayload::Execution(result) => {
                if self.run_ticket != Some(ticket) {
                    tracing::debug!(ticket, "discarding stale execution result");
                    return;
                }
                self.run_ticket = None;
                if let Some(ws) = self.workspace.as_mut() {
                    ws.finish_run(result);
                }
            }
        }
    }

    fn accept_fetch(&mut self, ticket: u64) -> bool {
        if self.fetch_ticket != Some(ticket) {
            tracing::debug!(ticket, "discarding stale fetch result");
            return false;
        }
        self.fetch_ticket = None;
        true
    }

    fn fail(&mut self, err: RemoteError, target: RetryTarget) {
        tracing::warn!(error = %err, target = ?target, "request failed");
        self.notice = Some(Notice::error(&err));
        self.retry = Some(target);
    }

    fn issue_ticket(&mut self) -> u64 {
        let ticket = self.next_ticket;
        self.next_ticket += 1;
        ticket
    }

    fn spawn_request<F>(&self, ticket: u64, job: F)
    where
        F: FnOnce(&dyn RemoteSource) -> ReplyPayload + Send + 'static,
    {
        let remote = Arc::clone(&self.remote);
        let tx = self.tx.clone();
        thread::spawn(move || {
            let payload = job(remote.as_ref());
            // The receiver is gone only when the app is shutting down.
            let _ = tx.send(AppEvent::Remote(RemoteReply { ticket, payload }));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use crate::model::{ExecutionReport, ExecutionRequest, Question};

    #[derive(Default)]
    struct FakeRemote {
        coding_calls: AtomicUsize,
        aptitude_calls: AtomicUsize,
        fail_coding: Mutex<bool>,
    }

    impl RemoteSource for FakeRemote {
        fn fetch_aptitude(&self, _company: &str) -> Result<Vec<Question>, RemoteError> {
            self.aptitude_calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![Question {
                question: "2+2?".into(),
                options: vec!["3".into(), "4".into()],
                answer: "4".into(),
                explanation: String::new(),
                category: "Quantitative".into(),
            }])
        }

        fn fetch_coding(&self, topic: &str) -> Result<Vec<CodingProblem>, RemoteError> {
            self.coding_calls.fetch_add(1, Ordering::SeqCst);
            if *self.fail_coding.lock().unwrap() {
                return Err(RemoteError::link("connection refused"));
            }
            Ok(vec![CodingProblem {
                name: format!("{topic} #1"),
                description: "d".into(),
                difficulty: "Easy".into(),
                examples: Vec::new(),
                ds: None,
                tc: None,
            }])
        }

        fn execute(&self, _request: &ExecutionRequest) -> Result<ExecutionReport, RemoteError> {
            Ok(ExecutionReport {
                results: Vec::new(),
                compile_error: Some("boom".into()),
            })
        }
    }

    fn make_app() -> (App, Arc<FakeRemote>, mpsc::Receiver<AppEvent>) {
        let (tx, rx) = mpsc::channel();
        let remote = Arc::new(FakeRemote::default());
        let theme: &'static Theme = Box::leak(Box::new(Theme::default()));
        let app = App::new(
            Config::default(),
            theme,
            remote.clone(),
            TopicCache::in_memory(),
            tx,
        );
        (app, remote, rx)
    }

    fn next_reply(rx: &mpsc::Receiver<AppEvent>) -> RemoteReply {
        match rx.recv_timeout(Duration::from_secs(5)).unwrap() {
            AppEvent::Remote(reply) => reply,
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn test_assessment_fetch_opens_session() {
        let (mut app, remote, rx) = make_app();
        app.start_assessment("TCS");
        assert!(app.is_loading());
        app.start_assessment("TCS");
        let reply = next_reply(&rx);
        app.handle_reply(reply);
        assert_eq!(app.screen, AppScreen::Assessment);
        assert!(!app.is_loading());
        assert_eq!(remote.aptitude_calls.load(Ordering::SeqCst), 1);
        assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
    }

    #[test]
    fn test_topic_second_open_served_from_cache() {
        let (mut app, remote, rx) = make_app();
        app.open_topic("Two Pointers");
        let reply = next_reply(&rx);
        app.handle_reply(reply);
        assert_eq!(app.screen, AppScreen::Problems);
        assert_eq!(app.topic_problems.len(), 1);

        app.go_to_roadmap();
        app.open_topic("Two Pointers");
        assert_eq!(app.screen, AppScreen::Problems);
        assert!(!app.is_loading());
        assert_eq!(remote.coding_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_purge_forces_refetch() {
        let (mut app, remote, rx) = make_app();
        app.open_topic("Two Pointers");
        let reply = next_reply(&rx);
        app.handle_reply(reply);
        app.purge_cache();
        app.go_to_roadmap();
        app.open_topic("Two Pointers");
        assert!(app.is_loading());
        let reply = next_reply(&rx);
        app.handle_reply(reply);
        assert_eq!(remote.coding_calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_locked_topic_not_fetched() {
        let (mut app, remote, _rx) = make_app();
        app.open_topic("Sliding Window");
        assert!(!app.is_loading());
        assert_eq!(app.screen, AppScreen::Portal);
        assert!(app.notice.as_ref().is_some_and(|n| n.text.contains("locked")));
        assert_eq!(remote.coding_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_failed_fetch_sets_retry_and_leaves_cache() {
        let (mut app, remote, rx) = make_app();
        *remote.fail_coding.lock().unwrap() = true;
        app.open_topic("Two Pointers");
        let reply = next_reply(&rx);
        app.handle_reply(reply);
        assert!(app.notice.as_ref().is_some_and(|n| n.is_error));
        assert_eq!(app.retry, Some(RetryTarget::Coding("Two Pointers".into())));
        assert!(app.cache().is_empty());

        *remote.fail_coding.lock().unwrap() = false;
        app.retry();
        let reply = next_reply(&rx);
        app.handle_reply(reply);
        assert_eq!(app.screen, AppScreen::Problems);
        assert!(app.cache().contains("Two Pointers"));
    }

    #[test]
    fn test_retry_target_stays_with_its_view() {
        let (mut app, remote, rx) = make_app();
        *remote.fail_coding.lock().unwrap() = true;
        app.go_to_roadmap();
        app.open_topic("Two Pointers");
        let reply = next_reply(&rx);
        app.handle_reply(reply);
        assert!(app.retry.is_some());

        app.go_to_portal();
        app.go_to_companies();
        assert_eq!(app.retry, None);
        assert!(app.notice.is_none());

        app.retry();
        assert!(!app.is_loading());
        assert_eq!(app.screen, AppScreen::Companies);
        assert_eq!(remote.coding_calls.load(Ordering::SeqCst), 1);
        assert_eq!(remote.aptitude_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_retry_while_loading_keeps_target() {
        let (mut app, remote, rx) = make_app();
        *remote.fail_coding.lock().unwrap() = true;
        app.go_to_roadmap();
        app.open_topic("Two Pointers");
        let reply = next_reply(&rx);
        app.handle_reply(reply);

        *remote.fail_coding.lock().unwrap() = false;
        app.open_topic("Arrays & Hashing");
        assert!(app.is_loading());
        app.retry();
        assert_eq!(app.retry, Some(RetryTarget::Coding("Two Pointers".into())));

        let reply = next_reply(&rx);
        app.handle_reply(reply);
        app.go_to_roadmap();
        assert_eq!(remote.coding_calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_abandoned_fetch_result_discarded() {
        let (mut app, _remote, rx) = make_app();
        app.open_topic("Two Pointers");
        app.go_to_portal();
        let reply = next_reply(&rx);
        app.handle_reply(reply);
        assert_eq!(app.screen, AppScreen::Portal);
        assert!(app.topic_problems.is_empty());
    }

    #[test]
    fn test_run_result_discarded_after_leaving_workspace() {
        let (mut app, _remote, rx) = make_app();
        app.open_topic("Two Pointers");
        let reply = next_reply(&rx);
        app.handle_reply(reply);
        app.open_selected_problem();
        app.run_code();
        assert!(app.workspace.as_ref().is_some_and(|w| w.is_running()));
        app.leave_workspace();
        let reply = next_reply(&rx);
        app.handle_reply(reply);
        assert!(app.workspace.is_none());
        assert_eq!(app.screen, AppScreen::Problems);
    }

    #[test]
    fn test_run_result_delivered_to_workspace() {
        let (mut app, _remote, rx) = make_app();
        app.open_topic("Two Pointers");
        let reply = next_reply(&rx);
        app.handle_reply(reply);
        app.open_selected_problem();
        app.run_code();
        app.run_code();
        let reply = next_reply(&rx);
        app.handle_reply(reply);
        let ws = app.workspace.as_ref().unwrap();
        assert!(!ws.is_running());
        assert!(ws.outcome().is_some());
        assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
    }
}
