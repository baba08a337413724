use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{InputError, PersistError};
use crate::http_probe::prelude::ProbeResult;

/// Point-in-time capture of one audit run.
///
/// Exactly one of `results` or `error` is present in the serialized form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(with = "timestamp")]
    pub generated_at: DateTime<Utc>,
    pub api: String,
    #[serde(flatten)]
    pub outcome: Outcome,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Outcome {
    Results { results: BTreeMap<String, ProbeResult> },
    Error { error: String },
}

/// Wrap the probe results of a completed run.
pub fn assemble(base_url: &str, results: BTreeMap<String, ProbeResult>) -> Snapshot {
    Snapshot {
        generated_at: Utc::now(),
        api: base_url.to_string(),
        outcome: Outcome::Results { results },
    }
}

/// Snapshot for a run that failed before probing started.
pub fn failed(base_url: &str, error: impl Into<String>) -> Snapshot {
    Snapshot {
        generated_at: Utc::now(),
        api: base_url.to_string(),
        outcome: Outcome::Error {
            error: error.into(),
        },
    }
}

impl Snapshot {
    pub fn results(&self) -> Option<&BTreeMap<String, ProbeResult>> {
        match &self.outcome {
            Outcome::Results { results } => Some(results),
            Outcome::Error { .. } => None,
        }
    }

    /// The snapshot as a JSON document, the same shape that `persist` writes.
    pub fn to_json(&self) -> Value {
        let mut doc = Map::new();
        doc.insert(
            "generated_at".to_string(),
            Value::String(timestamp::format(&self.generated_at)),
        );
        doc.insert("api".to_string(), Value::String(self.api.clone()));
        match &self.outcome {
            Outcome::Results { results } => {
                let results = results
                    .iter()
                    .map(|(name, result)| {
                        let mut entry = Map::new();
                        entry.insert("status".to_string(), Value::from(result.status));
                        entry.insert("body".to_string(), result.body.clone());
                        (name.clone(), Value::Object(entry))
                    })
                    .collect();
                doc.insert("results".to_string(), Value::Object(results));
            }
            Outcome::Error { error } => {
                doc.insert("error".to_string(), Value::String(error.clone()));
            }
        }
        Value::Object(doc)
    }

    pub fn to_pretty_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn to_compact_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Write the snapshot to `path`, replacing any previous file.
///
/// The document is written to a temporary file next to `path` and renamed
/// into place, so readers never observe a half-written snapshot.
pub fn persist(snapshot: &Snapshot, path: &Path) -> Result<(), PersistError> {
    let json = snapshot.to_pretty_string()?;
    let write_err = |source: std::io::Error| PersistError::Write {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = tempfile::NamedTempFile::new_in(dir).map_err(write_err)?;
    file.write_all(json.as_bytes()).map_err(write_err)?;
    file.persist(path).map_err(|e| write_err(e.error))?;

    log::info!("Snapshot written to {}", path.display());
    Ok(())
}

/// Read a saved snapshot for reporting.
///
/// Returns the raw document rather than a [`Snapshot`] so that reporting
/// tolerates whatever the service put inside each probe body.
pub fn load(path: &Path) -> Result<Value, InputError> {
    if !path.exists() {
        return Err(InputError::NotFound(path.to_path_buf()));
    }
    let text = std::fs::read_to_string(path).map_err(|source| InputError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;
    let doc: Value =
        serde_json::from_str(&text).map_err(|_| InputError::Invalid(path.to_path_buf()))?;
    if doc.get("results").is_none() {
        return Err(InputError::Invalid(path.to_path_buf()));
    }
    Ok(doc)
}

/// RFC 3339 in UTC with microseconds and an explicit `+00:00` offset.
mod timestamp {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn format(at: &DateTime<Utc>) -> String {
        at.to_rfc3339_opts(SecondsFormat::Micros, false)
    }

    pub fn serialize<S: Serializer>(at: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(at))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let text = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&text)
            .map(|at| at.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
