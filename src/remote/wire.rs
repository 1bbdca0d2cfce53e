//! Boundary validation for service payloads.
//!
//! The services are schema-less, so everything is parsed as `serde_json::Value`
//! first and coerced into the typed model here. Anything that does not fit is
//! a `RemoteError::Malformed`; the rest of the crate only sees typed records.

use std::cmp::Ordering;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::RemoteError;
use crate::model::{CaseResult, CodingProblem, ExecutionReport, Question};

pub fn parse_questions(body: &str) -> Result<Vec<Question>, RemoteError> {
    let questions: Vec<Question> = parse_records(body, "question")?;
    if questions.is_empty() {
        return Err(RemoteError::malformed("empty question set"));
    }
    for (i, q) in questions.iter().enumerate() {
        if q.options.is_empty() {
            return Err(RemoteError::malformed(format!("question {i} has no options")));
        }
        if !q.options.contains(&q.answer) {
            return Err(RemoteError::malformed(format!(
                "question {i}: answer {:?} is not one of its options",
                q.answer
            )));
        }
    }
    Ok(questions)
}

pub fn parse_problems(body: &str) -> Result<Vec<CodingProblem>, RemoteError> {
    parse_records(body, "problem")
}

/// Parse an `/execute-code` response. `case_count` is the number of examples
/// that were submitted. Without a compile error there must be exactly one
/// result per example.
pub fn parse_execution(body: &str, case_count: usize) -> Result<ExecutionReport, RemoteError> {
    let value: Value = serde_json::from_str(body)?;
    let Value::Object(mut obj) = value else {
        return Err(RemoteError::malformed("execution response is not an object"));
    };

    let results = normalize_results(obj.remove("results").unwrap_or(Value::Null))?;
    let compile_error = match obj.remove("compile_error") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.is_empty() => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    };

    if compile_error.is_none() && results.len() != case_count {
        if results.is_empty() {
            return Err(RemoteError::malformed("execution response carried no results"));
        }
        return Err(RemoteError::malformed(format!(
            "execution returned {} results for {case_count} cases",
            results.len()
        )));
    }

    Ok(ExecutionReport {
        results,
        compile_error,
    })
}

/// Accept either a sequence or a keyed mapping of results and return them in
/// order. Mapping keys follow object iteration order: integer-like keys
/// ascending, then the rest lexicographically.
pub fn normalize_results(raw: Value) -> Result<Vec<CaseResult>, RemoteError> {
    match raw {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => items.into_iter().map(coerce_result).collect(),
        Value::Object(map) => ordered_values(map).into_iter().map(coerce_result).collect(),
        other => Err(RemoteError::malformed(format!(
            "results must be a list or a mapping, got {}",
            kind_of(&other)
        ))),
    }
}

fn coerce_result(value: Value) -> Result<CaseResult, RemoteError> {
    serde_json::from_value(value).map_err(|e| RemoteError::malformed(format!("bad result: {e}")))
}

fn ordered_values(map: Map<String, Value>) -> Vec<Value> {
    let mut entries: Vec<(String, Value)> = map.into_iter().collect();
    entries.sort_by(|(a, _), (b, _)| compare_keys(a, b));
    entries.into_iter().map(|(_, v)| v).collect()
}

fn compare_keys(a: &str, b: &str) -> Ordering {
    match (array_index(a), array_index(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

/// Canonical non-negative integer keys only ("01" is a plain string key).
fn array_index(key: &str) -> Option<u64> {
    if key.is_empty() || (key.len() > 1 && key.starts_with('0')) {
        return None;
    }
    if !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    key.parse().ok()
}

fn parse_records<T: DeserializeOwned>(body: &str, what: &str) -> Result<Vec<T>, RemoteError> {
    let value: Value = serde_json::from_str(body)?;
    let Value::Array(items) = value else {
        return Err(RemoteError::malformed(format!(
            "expected a list of {what}s, got {}",
            kind_of(&value)
        )));
    };
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            serde_json::from_value(item)
                .map_err(|e| RemoteError::malformed(format!("{what} {i}: {e}")))
        })
        .collect()
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
