//! Property-based tests for shapecheck-cli.
//!
//! These tests verify configuration precedence and report counting
//! using the proptest framework.

use std::fs;
use std::path::PathBuf;

use proptest::prelude::*;
use tempfile::TempDir;

use shapecheck::{Type, integer, list};
use shapecheck_cli::{
    config::{CliArgs, Config, ConfigManager, OutputConfig, OutputFormat},
    report::{Reporter, check_documents},
};

fn arb_format() -> impl Strategy<Value = OutputFormat> {
    prop_oneof![Just(OutputFormat::Text), Just(OutputFormat::Json)]
}

fn arb_output_config() -> impl Strategy<Value = OutputConfig> {
    (arb_format(), any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
        |(format, color, flatten, show_scores)| OutputConfig {
            format,
            color,
            flatten,
            show_scores,
        },
    )
}

fn arb_cli_args() -> impl Strategy<Value = CliArgs> {
    (
        proptest::option::of(arb_format()),
        proptest::option::of(any::<bool>()),
        proptest::option::of(any::<bool>()),
        proptest::option::of(any::<bool>()),
    )
        .prop_map(|(format, color, flatten, show_scores)| CliArgs {
            format,
            color,
            flatten,
            show_scores,
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Every override that is set wins; every unset one keeps the file value.
    #[test]
    fn prop_cli_args_take_precedence(output in arb_output_config(), args in arb_cli_args()) {
        let merged = ConfigManager::merge_cli_args(Config { output: output.clone() }, &args);

        prop_assert_eq!(merged.output.format, args.format.unwrap_or(output.format));
        prop_assert_eq!(merged.output.color, args.color.unwrap_or(output.color));
        prop_assert_eq!(merged.output.flatten, args.flatten.unwrap_or(output.flatten));
        prop_assert_eq!(merged.output.show_scores, args.show_scores.unwrap_or(output.show_scores));
    }

    /// Merging with no overrides is the identity.
    #[test]
    fn prop_empty_args_change_nothing(output in arb_output_config()) {
        let config = Config { output };
        let merged = ConfigManager::merge_cli_args(config.clone(), &CliArgs::default());
        prop_assert_eq!(merged, config);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(30))]

    /// The summary counts exactly the documents the schema accepts.
    #[test]
    fn prop_summary_counts_valid_documents(
        docs in prop::collection::vec(prop::collection::vec(-5i64..5, 0..4), 1..6)
    ) {
        let dir = TempDir::new().unwrap();
        let mut paths: Vec<PathBuf> = Vec::new();
        for (i, doc) in docs.iter().enumerate() {
            let path = dir.path().join(format!("doc_{i}.json"));
            fs::write(&path, serde_json::to_string(doc).unwrap()).unwrap();
            paths.push(path);
        }

        let ty: Type = list(integer().gte(0)).into();
        let reports = check_documents(&ty, &paths).unwrap();
        let expected_valid = docs.iter().filter(|d| d.iter().all(|n| *n >= 0)).count();

        prop_assert_eq!(reports.iter().filter(|r| r.is_valid()).count(), expected_valid);

        let text = Reporter::new(OutputConfig {
            format: OutputFormat::Text,
            color: false,
            flatten: true,
            show_scores: false,
        })
        .render(&reports)
        .unwrap();
        let summary = format!("{} of {} document(s) valid\n", expected_valid, docs.len());
        prop_assert!(text.ends_with(&summary));
    }
}
