//! Descriptor linting - static analysis of fixture descriptor files.
//!
//! Checks descriptor files for:
//! - JSON syntax errors and malformed descriptors
//! - Annotations the mapper would silently ignore or skip
//! - Identity problems (no `primary` field, more than one)

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::dynamic::Descriptor;
use crate::loader::{load_json, parse_descriptor};
use crate::tag::parse_tag;
use crate::types::{Role, KNOWN_ROLES};

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// A single diagnostic message from linting.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: String,
    pub file: PathBuf,
    /// JSON path to the issue (e.g., "/fields/2/tag")
    pub path: String,
    pub message: String,
}

/// Result of linting a single file.
#[derive(Debug, Clone, Serialize)]
pub struct FileResult {
    pub file: PathBuf,
    pub status: FileStatus,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

/// Status of a linted file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Ok,
    Error,
    Warning,
}

/// Result of linting a directory or set of files.
#[derive(Debug, Clone, Serialize)]
pub struct LintResult {
    pub path: PathBuf,
    pub files_checked: usize,
    pub passed: usize,
    pub failed: usize,
    pub errors: usize,
    pub warnings: usize,
    pub results: Vec<FileResult>,
}

impl LintResult {
    /// Returns true if no file failed under the mode the lint ran in.
    pub fn is_ok(&self) -> bool {
        self.failed == 0
    }
}

/// Lint a file or directory.
///
/// If path is a directory, recursively finds all .json files.
/// If `strict` is true, files with warnings count as failed.
pub fn lint(path: &Path, strict: bool) -> LintResult {
    let files = collect_descriptor_files(path);
    let mut results = Vec::new();
    let mut total_errors = 0;
    let mut total_warnings = 0;

    for file in &files {
        let file_result = lint_file(file, path);
        total_errors += count(&file_result, Severity::Error);
        total_warnings += count(&file_result, Severity::Warning);
        results.push(file_result);
    }

    let failed = results
        .iter()
        .filter(|r| {
            if strict {
                r.status != FileStatus::Ok
            } else {
                r.status == FileStatus::Error
            }
        })
        .count();

    tracing::debug!(
        files = files.len(),
        errors = total_errors,
        warnings = total_warnings,
        "lint finished"
    );

    LintResult {
        path: path.to_path_buf(),
        files_checked: files.len(),
        passed: files.len() - failed,
        failed,
        errors: total_errors,
        warnings: total_warnings,
        results,
    }
}

/// Lint a single descriptor file.
pub fn lint_file(file: &Path, base_path: &Path) -> FileResult {
    let mut sink = Sink {
        file,
        diagnostics: Vec::new(),
    };

    let descriptor = load_json(file)
        .map_err(|e| sink.error("E001", "/", format!("syntax error: {}", e)))
        .ok()
        .and_then(|value| {
            parse_descriptor(value)
                .map_err(|e| sink.error("E002", "/", e.to_string()))
                .ok()
        });

    if let Some(descriptor) = descriptor {
        check_descriptor(&descriptor, "", &mut sink);
    }

    let diagnostics = sink.diagnostics;
    let has_errors = diagnostics.iter().any(|d| d.severity == Severity::Error);
    let has_warnings = diagnostics.iter().any(|d| d.severity == Severity::Warning);

    let status = if has_errors {
        FileStatus::Error
    } else if has_warnings {
        FileStatus::Warning
    } else {
        FileStatus::Ok
    };

    FileResult {
        file: file.strip_prefix(base_path).unwrap_or(file).to_path_buf(),
        status,
        diagnostics,
    }
}

struct Sink<'a> {
    file: &'a Path,
    diagnostics: Vec<Diagnostic>,
}

impl Sink<'_> {
    fn push(&mut self, severity: Severity, code: &str, path: &str, message: String) {
        self.diagnostics.push(Diagnostic {
            severity,
            code: code.to_string(),
            file: self.file.to_path_buf(),
            path: path.to_string(),
            message,
        });
    }

    fn error(&mut self, code: &str, path: &str, message: String) {
        self.push(Severity::Error, code, path, message);
    }

    fn warning(&mut self, code: &str, path: &str, message: String) {
        self.push(Severity::Warning, code, path, message);
    }
}

/// Check one descriptor and, recursively, its relation descriptors.
fn check_descriptor(descriptor: &Descriptor, path: &str, sink: &mut Sink<'_>) {
    let fields_path = format!("{}/fields", path);
    let mut primaries = Vec::new();
    let mut names = HashSet::new();

    for (i, spec) in descriptor.fields.iter().enumerate() {
        let field_path = format!("{}/{}", fields_path, i);
        let tag_path = format!("{}/tag", field_path);
        let tokens = parse_tag(&spec.tag);

        // Untagged fields have no role.
        let Some(kind) = tokens.first() else {
            continue;
        };

        let Some(role) = Role::parse(&tokens) else {
            sink.warning(
                "W001",
                &tag_path,
                format!(
                    "unknown role \"{}\" on field \"{}\": expected {}",
                    kind,
                    spec.field,
                    KNOWN_ROLES.join(", ")
                ),
            );
            continue;
        };

        match role {
            Role::Primary { type_name } => {
                primaries.push(spec.field.as_str());
                if type_name.is_none() {
                    sink.warning(
                        "W002",
                        &tag_path,
                        format!("primary field \"{}\" has no type name", spec.field),
                    );
                }
            }
            Role::Attr { name: None } | Role::Relation { name: None } => {
                sink.warning(
                    "W003",
                    &tag_path,
                    format!(
                        "{} field \"{}\" has no name and is skipped",
                        role.kind(),
                        spec.field
                    ),
                );
            }
            Role::Attr { name: Some(name) } | Role::Relation { name: Some(name) } => {
                if !names.insert(name) {
                    sink.warning(
                        "W006",
                        &tag_path,
                        format!("name \"{}\" is used by more than one field", name),
                    );
                }
            }
        }

        if let Role::Relation { .. } = role {
            match &spec.descriptor {
                Some(nested) => {
                    check_descriptor(nested, &format!("{}/descriptor", field_path), sink)
                }
                None => sink.warning(
                    "W004",
                    &field_path,
                    format!(
                        "relation field \"{}\" has no descriptor; relationship is never emitted",
                        spec.field
                    ),
                ),
            }
        }
    }

    match primaries.len() {
        0 => sink.warning(
            "W005",
            &fields_path,
            "descriptor has no primary field".to_string(),
        ),
        1 => {}
        _ => sink.error(
            "E003",
            &fields_path,
            format!("multiple primary fields: {}", primaries.join(", ")),
        ),
    }
}

fn count(result: &FileResult, severity: Severity) -> usize {
    result
        .diagnostics
        .iter()
        .filter(|d| d.severity == severity)
        .count()
}

/// Collect all .json files in a path (file or directory).
fn collect_descriptor_files(path: &Path) -> Vec<PathBuf> {
    if path.is_file() {
        if path.extension().map(|e| e == "json").unwrap_or(false) {
            return vec![path.to_path_buf()];
        }
        return vec![];
    }

    let mut files = Vec::new();
    collect_files_recursive(path, &mut files);
    files.sort();
    files
}

fn collect_files_recursive(dir: &Path, files: &mut Vec<PathBuf>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_files_recursive(&path, files);
        } else if path.extension().map(|e| e == "json").unwrap_or(false) {
            files.push(path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn lint_str(content: &str) -> FileResult {
        let dir = tempdir().unwrap();
        let file = dir.path().join("descriptor.json");
        fs::write(&file, content).unwrap();
        lint_file(&file, dir.path())
    }

    fn codes(result: &FileResult) -> Vec<&str> {
        result.diagnostics.iter().map(|d| d.code.as_str()).collect()
    }

    #[test]
    fn clean_descriptor_passes() {
        let result = lint_str(
            r#"{"fields": [
                {"field": "ID", "tag": "primary,widgets"},
                {"field": "Name", "tag": "attr,name"},
                {"field": "Notes"}
            ]}"#,
        );
        assert_eq!(result.status, FileStatus::Ok);
        assert!(result.diagnostics.is_empty());
        assert_eq!(result.file, PathBuf::from("descriptor.json"));
    }

    #[test]
    fn syntax_error() {
        let result = lint_str("{ not json");
        assert_eq!(result.status, FileStatus::Error);
        assert_eq!(codes(&result), vec!["E001"]);
    }

    #[test]
    fn wrong_shape() {
        let result = lint_str(r#"{"fields": [{"tag": "attr,name"}]}"#);
        assert_eq!(result.status, FileStatus::Error);
        assert_eq!(codes(&result), vec!["E002"]);
    }

    #[test]
    fn multiple_primaries() {
        let result = lint_str(
            r#"{"fields": [
                {"field": "ID", "tag": "primary,widgets"},
                {"field": "Key", "tag": "primary,widgets"}
            ]}"#,
        );
        assert_eq!(result.status, FileStatus::Error);
        assert_eq!(codes(&result), vec!["E003"]);
        assert_eq!(result.diagnostics[0].path, "/fields");
        assert!(result.diagnostics[0].message.contains("ID, Key"));
    }

    #[test]
    fn unknown_role_warns() {
        let result = lint_str(
            r#"{"fields": [
                {"field": "ID", "tag": "primary,widgets"},
                {"field": "Self", "tag": "link,self"}
            ]}"#,
        );
        assert_eq!(result.status, FileStatus::Warning);
        assert_eq!(codes(&result), vec!["W001"]);
        assert_eq!(result.diagnostics[0].path, "/fields/1/tag");
    }

    #[test]
    fn anonymous_roles_warn() {
        let result = lint_str(
            r#"{"fields": [
                {"field": "ID", "tag": "primary"},
                {"field": "Name", "tag": "attr"}
            ]}"#,
        );
        assert_eq!(codes(&result), vec!["W002", "W003"]);
    }

    #[test]
    fn relation_without_descriptor_warns() {
        let result = lint_str(
            r#"{"fields": [
                {"field": "ID", "tag": "primary,widgets"},
                {"field": "Owner", "tag": "relation,owner"}
            ]}"#,
        );
        assert_eq!(codes(&result), vec!["W004"]);
        assert_eq!(result.diagnostics[0].path, "/fields/1");
    }

    #[test]
    fn nested_descriptor_checked() {
        let result = lint_str(
            r#"{"fields": [
                {"field": "ID", "tag": "primary,widgets"},
                {"field": "Owner", "tag": "relation,owner", "descriptor": {
                    "fields": [{"field": "Name", "tag": "attr,name"}]
                }}
            ]}"#,
        );
        assert_eq!(codes(&result), vec!["W005"]);
        assert_eq!(result.diagnostics[0].path, "/fields/1/descriptor/fields");
    }

    #[test]
    fn missing_primary_warns() {
        let result = lint_str(r#"{"fields": [{"field": "Name", "tag": "attr,name"}]}"#);
        assert_eq!(codes(&result), vec!["W005"]);
    }

    #[test]
    fn duplicate_names_warn() {
        let result = lint_str(
            r#"{"fields": [
                {"field": "ID", "tag": "primary,widgets"},
                {"field": "Name", "tag": "attr,name"},
                {"field": "Label", "tag": "attr,name"}
            ]}"#,
        );
        assert_eq!(codes(&result), vec!["W006"]);
        assert_eq!(result.diagnostics[0].path, "/fields/2/tag");
    }

    #[test]
    fn lint_directory_aggregates() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("good.json"),
            r#"{"fields": [{"field": "ID", "tag": "primary,widgets"}]}"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("warn.json"),
            r#"{"fields": [{"field": "ID", "tag": "primary"}]}"#,
        )
        .unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested/bad.json"), "nope").unwrap();
        fs::write(dir.path().join("readme.txt"), "ignored").unwrap();

        let result = lint(dir.path(), false);
        assert_eq!(result.files_checked, 3);
        assert_eq!(result.failed, 1);
        assert_eq!(result.passed, 2);
        assert_eq!(result.errors, 1);
        assert_eq!(result.warnings, 1);
        assert!(!result.is_ok());

        let strict = lint(dir.path(), true);
        assert_eq!(strict.failed, 2);
    }

    #[test]
    fn warnings_fail_only_in_strict_mode() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("anon.json"),
            r#"{"fields": [{"field": "ID", "tag": "primary"}]}"#,
        )
        .unwrap();

        assert!(lint(dir.path(), false).is_ok());
        assert!(!lint(dir.path(), true).is_ok());
    }

    #[test]
    fn lint_non_json_file_checks_nothing() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("notes.txt");
        fs::write(&file, "text").unwrap();

        let result = lint(&file, false);
        assert_eq!(result.files_checked, 0);
        assert!(result.is_ok());
    }
}
