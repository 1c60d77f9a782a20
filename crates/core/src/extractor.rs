// crates/core/src/extractor.rs
//! Field extraction from task documents.
//!
//! Task documents are written from one fixed template, so extraction is a
//! set of marker-anchored heuristics rather than a markdown parser. Every
//! function here is total: a missing marker yields an empty field, never an
//! error, because half-filled documents are the normal case.

use regex_lite::Regex;
use std::sync::OnceLock;

use crate::naming::{id_from_filename, status_from_filename, title_from_filename};
use crate::types::{TaskRecord, MAX_FEATURES};

/// Marker for the priority line (`優先度: 高 (フェーズ1)`).
pub const PRIORITY_MARKER: &str = "優先度:";
/// Marker for the phase number inside the priority line.
pub const PHASE_MARKER: &str = "フェーズ";
/// Section marker whose following line is the background summary.
pub const BACKGROUND_MARKER: &str = "背景";
/// Section marker that precedes the feature list.
pub const FEATURES_MARKER: &str = "実装内容";
/// Section marker that precedes the list of prerequisite tasks.
pub const DEPENDENCIES_MARKER: &str = "依存するタスク";

/// Lines examined for features, counting the marker line itself.
pub const FEATURE_SCAN_WINDOW: usize = 20;

/// Feature lines must be longer than this (in UTF-16 code units) to count.
const MIN_FEATURE_LEN: usize = 5;

fn title_prefix_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // "Task 12: ", "タスク001: " -- a word ending in a non-digit, optional space, digits, colon.
    RE.get_or_init(|| Regex::new(r"^[^\s:]*[^\s:\d]\s?\d+:\s+").expect("valid title prefix regex"))
}

fn phase_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"フェーズ(\d)").expect("valid phase regex"))
}

fn task_ref_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b\d+\b").expect("valid task reference regex"))
}

/// Split into lines the way the documents were authored, tolerating CRLF.
fn lines(content: &str) -> Vec<&str> {
    content
        .split('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
        .collect()
}

/// Build a [`TaskRecord`] from a document and its filename.
///
/// `content` on the returned record is left unset; callers that need the
/// raw text attach it themselves.
pub fn extract_task(content: &str, filename: &str) -> TaskRecord {
    let lines = lines(content);

    let title = heading_title(&lines).unwrap_or_else(|| title_from_filename(filename));
    let priority_line = lines.iter().find(|l| l.contains(PRIORITY_MARKER)).copied();

    TaskRecord {
        id: id_from_filename(filename).to_string(),
        title,
        status: status_from_filename(filename).to_string(),
        priority: priority_line.map(priority_from_line).unwrap_or_default(),
        phase: priority_line.map(phase_from_line).unwrap_or_default(),
        background: background(&lines),
        features: features(&lines),
        filename: filename.to_string(),
        content: None,
    }
}

/// First `# ` heading with any `<word> <digits>: ` prefix removed.
fn heading_title(lines: &[&str]) -> Option<String> {
    let heading = lines.iter().find_map(|l| l.strip_prefix("# "))?;
    let title = title_prefix_regex().replace(heading, "");
    let title = title.trim();
    (!title.is_empty()).then(|| title.to_string())
}

fn priority_from_line(line: &str) -> String {
    line.rsplit_once(PRIORITY_MARKER)
        .map(|(_, rest)| rest.trim().to_string())
        .unwrap_or_default()
}

fn phase_from_line(line: &str) -> String {
    phase_regex()
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

fn background(lines: &[&str]) -> String {
    lines
        .windows(2)
        .find(|pair| pair[0].contains(BACKGROUND_MARKER))
        .map(|pair| pair[1].trim().to_string())
        .unwrap_or_default()
}

fn features(lines: &[&str]) -> Vec<String> {
    let Some(start) = lines.iter().position(|l| l.contains(FEATURES_MARKER)) else {
        return Vec::new();
    };

    let mut features = Vec::new();
    for line in lines.iter().skip(start + 1).take(FEATURE_SCAN_WINDOW - 1) {
        let line = line.trim();
        if line.encode_utf16().count() <= MIN_FEATURE_LEN {
            continue;
        }
        if let Some(item) = strip_list_marker(line) {
            features.push(item.replace("**", ""));
        }
        if features.len() >= MAX_FEATURES {
            break;
        }
    }
    features
}

/// The text of a `1.` or `-` list item, or `None` for any other line.
fn strip_list_marker(line: &str) -> Option<&str> {
    let digits = line.bytes().take_while(|b| b.is_ascii_digit()).count();
    if digits > 0 && line.as_bytes().get(digits) == Some(&b'.') {
        return Some(line[digits + 1..].trim_start());
    }
    line.strip_prefix('-').map(str::trim_start)
}

/// Ids of prerequisite tasks listed under the dependencies section.
///
/// The section runs from the marker line to the next heading. Every
/// standalone number on a list item counts as a reference; callers filter
/// the result against the ids that actually exist.
pub fn extract_dependencies(content: &str) -> Vec<String> {
    let lines = lines(content);
    let Some(start) = lines.iter().position(|l| l.contains(DEPENDENCIES_MARKER)) else {
        return Vec::new();
    };

    let mut deps: Vec<String> = Vec::new();
    for line in lines.iter().skip(start + 1) {
        let line = line.trim();
        if line.starts_with('#') {
            break;
        }
        let Some(item) = strip_list_marker(line) else {
            continue;
        };
        for m in task_ref_regex().find_iter(item) {
            let id = m.as_str().to_string();
            if !deps.contains(&id) {
                deps.push(id);
            }
        }
    }
    deps
}
