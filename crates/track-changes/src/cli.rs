//! Core logic of the `track-changes` binary.
//!
//! The binary loads a document, replays a list of mutation steps through a
//! [`TrackedDocument`], and answers one query about the result:
//!
//! - `changed:<pointer>`  whether the path changed
//! - `previous:<pointer>` the value the path held before the steps
//! - `log`                the reconciled change log, newest first

use serde::Deserialize;
use serde_json::{json, Value as JsonValue};
use thiserror::Error;

use crate::config::TrackerConfig;
use crate::error::TrackError;
use crate::log::ChangeRecord;
use crate::tracked::TrackedDocument;

// ── Errors ────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Track(#[from] TrackError),
    #[error("unknown query: {0}")]
    UnknownQuery(String),
}

// ── Steps ─────────────────────────────────────────────────────────────────

/// One mutation replayed against the document.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum Step {
    Set { path: String, value: JsonValue },
    Assign { path: String, value: JsonValue },
    Push { path: String, value: JsonValue },
    Unset { path: String },
}

impl Step {
    fn apply(&self, doc: &mut TrackedDocument) -> Result<(), TrackError> {
        match self {
            Step::Set { path, value } => doc.set(path, value).map(drop),
            Step::Assign { path, value } => doc.assign(path, value).map(drop),
            Step::Push { path, value } => doc.push(path, value).map(drop),
            Step::Unset { path } => doc.unset(path).map(drop),
        }
    }
}

// ── Queries ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    Changed(String),
    Previous(String),
    Log,
}

impl Query {
    pub fn parse(query: &str) -> Result<Self, CliError> {
        if query == "log" {
            return Ok(Query::Log);
        }
        if let Some(pointer) = query.strip_prefix("changed:") {
            return Ok(Query::Changed(pointer.to_string()));
        }
        if let Some(pointer) = query.strip_prefix("previous:") {
            return Ok(Query::Previous(pointer.to_string()));
        }
        Err(CliError::UnknownQuery(query.to_string()))
    }
}

/// Replay `steps_json` over `doc_json` and answer `query`.
///
/// Returns a pretty-printed JSON string. An absent previous value is
/// reported by omitting the `previous` key.
pub fn run(doc_json: &str, steps_json: &str, query: &str) -> Result<String, CliError> {
    run_with_config(doc_json, steps_json, query, TrackerConfig::default())
}

pub fn run_with_config(
    doc_json: &str,
    steps_json: &str,
    query: &str,
    config: TrackerConfig,
) -> Result<String, CliError> {
    let query = Query::parse(query)?;
    let doc: JsonValue = serde_json::from_str(doc_json)?;
    let steps: Vec<Step> = serde_json::from_str(steps_json)?;

    let mut doc = TrackedDocument::load_with_config(doc, config);
    for step in &steps {
        step.apply(&mut doc)?;
    }

    let out = match query {
        Query::Changed(pointer) => {
            let changed = doc.path_has_changed(&pointer)?;
            json!({ "path": pointer, "changed": changed })
        }
        Query::Previous(pointer) => {
            let mut out = json!({ "path": pointer });
            if let Some(previous) = doc.previous_value(&pointer)? {
                out["previous"] = previous.to_json();
            }
            out
        }
        Query::Log => JsonValue::Array(doc.change_log().iter().map(ChangeRecord::to_json).collect()),
    };
    Ok(serde_json::to_string_pretty(&out)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(out: &str) -> JsonValue {
        serde_json::from_str(out).unwrap()
    }

    #[test]
    fn test_changed_query() {
        let out = run(
            r#"{"a": {"b": 1}}"#,
            r#"[{"op": "set", "path": "/a/b", "value": 2}]"#,
            "changed:/a",
        )
        .unwrap();
        assert_eq!(parse(&out), json!({"path": "/a", "changed": true}));
    }

    #[test]
    fn test_previous_query() {
        let out = run(
            r#"{"list": [1, 2]}"#,
            r#"[{"op": "push", "path": "/list", "value": 3}, {"op": "set", "path": "/n", "value": 0}]"#,
            "previous:/list",
        )
        .unwrap();
        assert_eq!(parse(&out), json!({"path": "/list", "previous": [1, 2]}));

        let out = run("{}", r#"[{"op": "set", "path": "/n", "value": 0}]"#, "previous:/n").unwrap();
        assert_eq!(parse(&out), json!({"path": "/n"}));
    }

    #[test]
    fn test_log_query() {
        let out = run(
            r#"{"a": 1, "b": 2}"#,
            r#"[
                {"op": "set", "path": "/a", "value": 10},
                {"op": "assign", "path": "/b", "value": 2},
                {"op": "unset", "path": "/a"}
            ]"#,
            "log",
        )
        .unwrap();
        assert_eq!(parse(&out), json!([{"path": "/a", "old_value": 1}]));
    }

    #[test]
    fn test_float_rewrite_of_integer_is_not_a_change() {
        for op in ["set", "assign"] {
            let steps = format!(r#"[{{"op": "{op}", "path": "/a", "value": 1.0}}]"#);
            let out = run(r#"{"a": 1}"#, &steps, "changed:/a").unwrap();
            assert_eq!(parse(&out), json!({"path": "/a", "changed": false}));
            let out = run(r#"{"a": 1}"#, &steps, "log").unwrap();
            assert_eq!(parse(&out), json!([]));
        }
    }

    #[test]
    fn test_errors() {
        assert!(matches!(run("{}", "[]", "diff"), Err(CliError::UnknownQuery(_))));
        assert!(matches!(run("{", "[]", "log"), Err(CliError::Json(_))));
        assert!(matches!(
            run("{}", r#"[{"op": "move", "path": "/a"}]"#, "log"),
            Err(CliError::Json(_))
        ));
        assert!(matches!(
            run("{}", "[]", "changed:no-slash"),
            Err(CliError::Track(TrackError::InvalidPath(_)))
        ));
    }
}
