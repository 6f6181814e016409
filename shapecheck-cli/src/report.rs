//! Checking documents and rendering the results.

use std::path::{Path, PathBuf};

use colored::{ColoredString, Colorize};
use serde_json::json;
use shapecheck::{Issue, Type, Value};
use tracing::debug;

use crate::config::{OutputConfig, OutputFormat};
use crate::error::CliResult;
use crate::loader;

/// Outcome of checking one document.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentReport {
    pub path: PathBuf,
    pub outcome: Result<Value, Issue>,
}

impl DocumentReport {
    pub fn is_valid(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Parse every document in `paths` against `ty`.
///
/// A document that cannot be read is an error; a document the schema
/// rejects is a report.
pub fn check_documents(ty: &Type, paths: &[PathBuf]) -> CliResult<Vec<DocumentReport>> {
    paths
        .iter()
        .map(|path| -> CliResult<DocumentReport> {
            let value = loader::load_document(path)?;
            let outcome = ty.parse(&value);
            debug!(path = %path.display(), valid = outcome.is_ok(), "Checked document");
            Ok(DocumentReport {
                path: path.clone(),
                outcome,
            })
        })
        .collect()
}

/// Renders reports according to the `[output]` configuration.
pub struct Reporter {
    config: OutputConfig,
}

impl Reporter {
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }

    pub fn render(&self, reports: &[DocumentReport]) -> CliResult<String> {
        match self.config.format {
            OutputFormat::Text => Ok(self.render_text(reports)),
            OutputFormat::Json => self.render_json(reports),
        }
    }

    fn paint(&self, text: &str, style: fn(&str) -> ColoredString) -> String {
        if self.config.color {
            style(text).to_string()
        } else {
            text.to_string()
        }
    }

    fn render_text(&self, reports: &[DocumentReport]) -> String {
        let mut out = String::new();
        for report in reports {
            match &report.outcome {
                Ok(_) => {
                    let mark = self.paint("✓", |s| s.green());
                    out.push_str(&format!("{} {}\n", mark, report.path.display()));
                }
                Err(issue) => {
                    let mark = self.paint("✗", |s| s.red());
                    out.push_str(&format!("{} {}\n", mark, report.path.display()));
                    if self.config.flatten {
                        for leaf in issue.leaves() {
                            out.push_str(&format!("  {}\n", self.issue_line(leaf)));
                        }
                    } else {
                        self.write_tree(&mut out, issue, 1);
                    }
                }
            }
        }

        let failed = reports.iter().filter(|r| !r.is_valid()).count();
        let summary = format!("{} of {} document(s) valid", reports.len() - failed, reports.len());
        if failed == 0 {
            out.push_str(&self.paint(&summary, |s| s.green()));
        } else {
            out.push_str(&self.paint(&summary, |s| s.yellow()));
        }
        out.push('\n');
        out
    }

    fn write_tree(&self, out: &mut String, issue: &Issue, depth: usize) {
        out.push_str(&format!("{}{}\n", "  ".repeat(depth), self.issue_line(issue)));
        for child in &issue.issues {
            self.write_tree(out, child, depth + 1);
        }
    }

    fn issue_line(&self, issue: &Issue) -> String {
        let line = if self.config.color && !issue.path.is_empty() {
            format!("{}: {}", issue.path.join(".").bold(), issue.message)
        } else {
            issue.to_string()
        };
        if self.config.show_scores {
            let score = format!("(score {})", issue.parse_score);
            format!("{} {}", line, self.paint(&score, |s| s.dimmed()))
        } else {
            line
        }
    }

    fn render_json(&self, reports: &[DocumentReport]) -> CliResult<String> {
        let entries: Vec<serde_json::Value> = reports
            .iter()
            .map(|report| match &report.outcome {
                Ok(value) => json!({
                    "file": display(&report.path),
                    "valid": true,
                    "value": value.to_json(),
                }),
                Err(issue) => json!({
                    "file": display(&report.path),
                    "valid": false,
                    "issue": issue,
                }),
            })
            .collect();
        Ok(serde_json::to_string_pretty(&entries)?)
    }
}

fn display(path: &Path) -> String {
    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use shapecheck::{integer, map, string};

    fn plain(flatten: bool, show_scores: bool) -> Reporter {
        Reporter::new(OutputConfig {
            format: OutputFormat::Text,
            color: false,
            flatten,
            show_scores,
        })
    }

    fn reports() -> Vec<DocumentReport> {
        let ty: Type = map([("name", Type::from(string())), ("age", Type::from(integer()))])
            .unwrap()
            .into();
        let good = Value::map([("name", Value::from("Ada")), ("age", Value::from(36))]);
        let bad = Value::map([("age", Value::from("old"))]);
        vec![
            DocumentReport {
                path: PathBuf::from("good.json"),
                outcome: ty.parse(&good),
            },
            DocumentReport {
                path: PathBuf::from("bad.json"),
                outcome: ty.parse(&bad),
            },
        ]
    }

    #[test]
    fn test_flattened_text() {
        let text = plain(true, false).render(&reports()).unwrap();
        assert_eq!(
            text,
            concat!(
                "✓ good.json\n",
                "✗ bad.json\n",
                "  age: expected integer, got string\n",
                "  name: is required\n",
                "1 of 2 document(s) valid\n",
            )
        );
    }

    #[test]
    fn test_tree_text_with_scores() {
        let text = plain(false, true).render(&reports()[1..]).unwrap();
        assert_eq!(
            text,
            concat!(
                "✗ bad.json\n",
                "  one or more fields failed validation (score 1)\n",
                "    age: expected integer, got string (score 0)\n",
                "    name: is required (score 0)\n",
                "0 of 1 document(s) valid\n",
            )
        );
    }

    #[test]
    fn test_json_report() {
        let reporter = Reporter::new(OutputConfig {
            format: OutputFormat::Json,
            ..OutputConfig::default()
        });
        let rendered = reporter.render(&reports()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed[0]["valid"], json!(true));
        assert_eq!(parsed[0]["value"]["name"], json!("Ada"));
        assert_eq!(parsed[1]["issue"]["code"], json!("AGGREGATE"));
        assert_eq!(parsed[1]["issue"]["issues"][1]["path"], json!(["name"]));
    }
}
