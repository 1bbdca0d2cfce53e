use crate::error::RemoteError;
use crate::model::{CodingProblem, ExecutionReport, ExecutionRequest, Language};
use crate::remote::RemoteSource;
use crate::session::gate::LogicGate;
use crate::session::source::SourceBuffer;

/// What the last run produced. Exactly one of these is shown; a failed run is
/// never silent.
#[derive(Clone, Debug, PartialEq)]
pub enum RunOutcome {
    Completed(ExecutionReport),
    LinkFailed(RemoteError),
}

/// Working state of one coding problem: the editor buffer, the selected
/// language, the optional logic gate, and the last run.
pub struct Workspace {
    pub problem: CodingProblem,
    language: Language,
    source: SourceBuffer,
    gate: Option<LogicGate>,
    running: bool,
    outcome: Option<RunOutcome>,
}

impl Workspace {
    pub fn new(problem: CodingProblem, language: Language, gate_enabled: bool) -> Self {
        let gate = if gate_enabled {
            problem.gate_pair().map(|(ds, tc)| LogicGate::new(ds, tc))
        } else {
            None
        };
        Self {
            problem,
            language,
            source: SourceBuffer::new(language.starter()),
            gate,
            running: false,
            outcome: None,
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn source(&self) -> &SourceBuffer {
        &self.source
    }

    pub fn code(&self) -> &str {
        self.source.text()
    }

    pub fn gate(&self) -> Option<&LogicGate> {
        self.gate.as_ref()
    }

    pub fn gate_mut(&mut self) -> Option<&mut LogicGate> {
        self.gate.as_mut()
    }

    /// The editor is read-only while a gate is present and locked.
    pub fn is_read_only(&self) -> bool {
        self.gate.as_ref().is_some_and(LogicGate::is_locked)
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn outcome(&self) -> Option<&RunOutcome> {
        self.outcome.as_ref()
    }

    /// Switch language and reset the buffer to its starter template. Edits
    /// made under the previous language are discarded.
    pub fn set_language(&mut self, language: Language) {
        self.language = language;
        self.source = SourceBuffer::new(language.starter());
        tracing::debug!(language = language.key(), "workspace language changed");
    }

    pub fn cycle_language(&mut self) {
        self.set_language(self.language.next());
    }

    /// Apply an edit to the buffer unless the editor is read-only.
    pub fn edit(&mut self, f: impl FnOnce(&mut SourceBuffer)) {
        if self.is_read_only() {
            return;
        }
        f(&mut self.source);
    }

    /// Start a run. Returns the request to send, or `None` if one is already
    /// in flight.
    pub fn begin_run(&mut self) -> Option<ExecutionRequest> {
        if self.running {
            return None;
        }
        self.running = true;
        self.outcome = None;
        Some(ExecutionRequest {
            code: self.source.text().to_string(),
            language: self.language,
            test_cases: self.problem.examples.clone(),
        })
    }

    pub fn finish_run(&mut self, result: Result<ExecutionReport, RemoteError>) {
        self.running = false;
        self.outcome = Some(match result {
            Ok(report) => {
                tracing::info!(
                    problem = %self.problem.name,
                    passed = report.passed_count(),
                    total = report.results.len(),
                    compile_error = report.compile_error.is_some(),
                    "execution finished"
                );
                RunOutcome::Completed(report)
            }
            Err(err) => {
                tracing::warn!(problem = %self.problem.name, error = %err, "execution failed");
                RunOutcome::LinkFailed(err)
            }
        });
    }

    /// Run synchronously against `remote`. Returns false if a run was already
    /// in flight.
    pub fn execute(&mut self, remote: &dyn RemoteSource) -> bool {
        let Some(request) = self.begin_run() else {
            return false;
        };
        let result = remote.execute(&request);
        self.finish_run(result);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CaseResult, Example};
    use serde_json::json;

    fn problem(gated: bool) -> CodingProblem {
        CodingProblem {
            name: "First Non-Repeating Character".to_string(),
            description: "Return the first unique char.".to_string(),
            difficulty: "Easy".to_string(),
            examples: vec![
                Example {
                    input: json!("aabc"),
                    output: json!("b"),
                },
                Example {
                    input: json!("xx"),
                    output: json!(""),
                },
            ],
            ds: gated.then(|| "Hash Map".to_string()),
            tc: gated.then(|| "O(n)".to_string()),
        }
    }

    #[test]
    fn test_new_uses_starter() {
        let ws = Workspace::new(problem(false), Language::Java, true);
        assert_eq!(ws.code(), Language::Java.starter());
        assert!(ws.gate().is_none());
        assert!(!ws.is_read_only());
    }

    #[test]
    fn test_set_language_discards_edits() {
        let mut ws = Workspace::new(problem(false), Language::Python3, true);
        ws.edit(|b| b.insert_str("\nprint('hi')"));
        assert_ne!(ws.code(), Language::Python3.starter());
        ws.set_language(Language::Cpp);
        assert_eq!(ws.code(), Language::Cpp.starter());
        ws.set_language(Language::Python3);
        assert_eq!(ws.code(), Language::Python3.starter());
    }

    #[test]
    fn test_locked_gate_makes_editor_read_only() {
        let mut ws = Workspace::new(problem(true), Language::Python3, true);
        assert!(ws.is_read_only());
        ws.edit(|b| b.insert_char('x'));
        assert_eq!(ws.code(), Language::Python3.starter());

        ws.gate_mut().unwrap().check("Hash Map", "O(n)");
        assert!(!ws.is_read_only());
        ws.edit(|b| b.insert_char('x'));
        assert!(ws.code().ends_with('x'));
    }

    #[test]
    fn test_gate_disabled_by_config() {
        let ws = Workspace::new(problem(true), Language::Python3, false);
        assert!(ws.gate().is_none());
    }

    #[test]
    fn test_begin_run_guards_second_request() {
        let mut ws = Workspace::new(problem(false), Language::Python3, true);
        let req = ws.begin_run().unwrap();
        assert_eq!(req.language, Language::Python3);
        assert_eq!(req.test_cases.len(), 2);
        assert!(ws.is_running());
        assert!(ws.begin_run().is_none());

        ws.finish_run(Err(RemoteError::link("refused")));
        assert!(!ws.is_running());
        assert!(matches!(ws.outcome(), Some(RunOutcome::LinkFailed(_))));
        assert!(ws.begin_run().is_some());
    }

    #[test]
    fn test_begin_run_clears_previous_outcome() {
        let mut ws = Workspace::new(problem(false), Language::Python3, true);
        ws.begin_run();
        ws.finish_run(Ok(ExecutionReport {
            results: vec![CaseResult {
                passed: true,
                expected: json!("b"),
                actual: json!("b"),
            }],
            compile_error: None,
        }));
        assert!(ws.outcome().is_some());
        ws.begin_run();
        assert!(ws.outcome().is_none());
    }
}
