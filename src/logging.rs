//! JSON line-delimited evaluation logging.
//!
//! Opt-in helper for callers that want a record of evaluations on disk.
//! The engine itself never writes here; `evaluate` stays pure.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

use crate::engine::EngineResult;

fn log_dir() -> io::Result<()> {
    fs::create_dir_all("logs")
}

fn append_json_line<P: AsRef<Path>, T: Serialize>(path: P, value: &T) -> io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    serde_json::to_writer(&mut file, value)
        .map_err(|err| io::Error::new(io::ErrorKind::Other, err))?;
    file.write_all(b"\n")
}

#[derive(Debug, Serialize)]
pub struct EvaluationLogEntry<'a> {
    pub hex: &'a str,
    pub timestamp_ms: u128,
    pub pad: [f64; 3],
    pub family: &'a str,
    pub bin: &'a str,
    pub top: &'a [(&'static str, f64)],
}

/// Append one evaluation record to `logs/evaluations.jsonl`.
pub fn log_evaluation(hex: &str, result: &EngineResult) -> io::Result<()> {
    log_dir()?;
    let entry = EvaluationLogEntry {
        hex,
        timestamp_ms: SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis(),
        pad: [
            result.pad.pleasure,
            result.pad.arousal,
            result.pad.dominance,
        ],
        family: result.family,
        bin: result.bin.name(),
        top: &result.top,
    };
    append_json_line("logs/evaluations.jsonl", &entry)
}
