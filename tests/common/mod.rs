#![allow(dead_code)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use preptime::error::RemoteError;
use preptime::model::{
    CaseResult, CodingProblem, Example, ExecutionReport, ExecutionRequest, Question,
};
use preptime::remote::RemoteSource;
use serde_json::json;

pub fn question(text: &str, options: &[&str], answer: &str) -> Question {
    Question {
        question: text.to_string(),
        options: options.iter().map(|s| s.to_string()).collect(),
        answer: answer.to_string(),
        explanation: format!("Because {answer}."),
        category: "Quantitative".to_string(),
    }
}

pub fn problem(name: &str, gated: bool) -> CodingProblem {
    CodingProblem {
        name: name.to_string(),
        description: format!("Solve {name}."),
        difficulty: "Easy".to_string(),
        examples: vec![
            Example {
                input: json!([2, 7, 11, 15]),
                output: json!([0, 1]),
            },
            Example {
                input: json!([3, 3]),
                output: json!([0, 1]),
            },
        ],
        ds: gated.then(|| "Hash Map".to_string()),
        tc: gated.then(|| "O(n)".to_string()),
    }
}

/// Answers every call from canned data and counts the calls.
#[derive(Default)]
pub struct CountingRemote {
    pub aptitude_calls: AtomicUsize,
    pub coding_calls: AtomicUsize,
    pub execute_calls: AtomicUsize,
    pub fail: Mutex<bool>,
    pub last_request: Mutex<Option<ExecutionRequest>>,
}

impl CountingRemote {
    pub fn coding_calls(&self) -> usize {
        self.coding_calls.load(Ordering::SeqCst)
    }

    pub fn execute_calls(&self) -> usize {
        self.execute_calls.load(Ordering::SeqCst)
    }

    pub fn set_failing(&self, failing: bool) {
        *self.fail.lock().unwrap() = failing;
    }

    fn failing(&self) -> bool {
        *self.fail.lock().unwrap()
    }
}

impl RemoteSource for CountingRemote {
    fn fetch_aptitude(&self, _company: &str) -> Result<Vec<Question>, RemoteError> {
        self.aptitude_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing() {
            return Err(RemoteError::link("connection refused"));
        }
        Ok(vec![question("2+2?", &["3", "4"], "4")])
    }

    fn fetch_coding(&self, topic: &str) -> Result<Vec<CodingProblem>, RemoteError> {
        self.coding_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing() {
            return Err(RemoteError::link("connection refused"));
        }
        Ok(vec![problem(&format!("{topic} #1"), true)])
    }

    fn execute(&self, request: &ExecutionRequest) -> Result<ExecutionReport, RemoteError> {
        self.execute_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());
        if self.failing() {
            return Err(RemoteError::link("connection refused"));
        }
        let results = request
            .test_cases
            .iter()
            .map(|case| CaseResult {
                passed: true,
                expected: case.output.clone(),
                actual: case.output.clone(),
            })
            .collect();
        Ok(ExecutionReport {
            results,
            compile_error: None,
        })
    }
}
