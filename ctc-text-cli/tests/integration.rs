//! Integration tests for the ctc-text CLI.

use clap::Parser;
use ctc_text_cli::cli::{Cli, run_cli};
use std::io::Write;
use tempfile::{Builder, NamedTempFile};

/// `a` = 0, `b` = 1, `c` = 2, blank = 3.
const ABC: &str = r#"{"symbols": ["a", "b", "c", "ϵ"]}"#;

fn json_file(content: &str) -> NamedTempFile {
    let mut file = Builder::new()
        .suffix(".json")
        .tempfile()
        .expect("failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("failed to write temp file");
    file
}

fn run(args: &[&str]) -> eyre::Result<String> {
    let argv = std::iter::once("ctc-text").chain(args.iter().copied());
    run_cli(Cli::parse_from(argv))
}

#[test]
fn normalize_prints_cleaned_text() {
    let output = run(&["normalize", "  Hello,   World!  "]).unwrap();

    assert_eq!(output, "hello world");
}

#[test]
fn encode_then_decode_with_alphabet_file() {
    let alphabet = json_file(ABC);
    let path = alphabet.path().to_str().unwrap();

    let encoded = run(&["encode", "CAB!", "-a", path]).unwrap();
    assert_eq!(encoded, "2 0 1");

    let decoded = run(&["decode", "2", "0", "1", "-a", path]).unwrap();
    assert_eq!(decoded, "cab");
}

#[test]
fn greedy_decodes_matrix_file() {
    let alphabet = json_file(ABC);
    // a a - b b - - c
    let matrix = json_file(
        r#"[
            [0.7, 0.1, 0.1, 0.1],
            [0.7, 0.1, 0.1, 0.1],
            [0.1, 0.1, 0.1, 0.7],
            [0.1, 0.7, 0.1, 0.1],
            [0.1, 0.7, 0.1, 0.1],
            [0.1, 0.1, 0.1, 0.7],
            [0.1, 0.1, 0.1, 0.7],
            [0.1, 0.1, 0.7, 0.1]
        ]"#,
    );

    let output = run(&[
        "greedy",
        matrix.path().to_str().unwrap(),
        "-a",
        alphabet.path().to_str().unwrap(),
    ])
    .unwrap();

    assert_eq!(output, "abc");
}

#[test]
fn beam_prints_ranked_hypotheses() {
    let alphabet = json_file(ABC);
    let matrix = json_file("[[0.5, 0.1, 0.1, 0.3], [0.5, 0.1, 0.1, 0.3]]");

    let output = run(&[
        "beam",
        matrix.path().to_str().unwrap(),
        "-a",
        alphabet.path().to_str().unwrap(),
        "--top",
        "3",
    ])
    .unwrap();
    let lines: Vec<&str> = output.lines().collect();

    // P(a) = 0.55, P("") = 0.09, P(b) = P(c) = 0.07
    assert_eq!(lines.len(), 3);
    assert!(lines[0].ends_with("\ta"), "{}", lines[0]);
    assert!(lines[1].ends_with('\t'), "{}", lines[1]);
    assert!(lines[2].ends_with("\tb"), "{}", lines[2]);
}

#[test]
fn beam_rejects_zero_beam_size() {
    let alphabet = json_file(ABC);
    let matrix = json_file("[[0.5, 0.1, 0.1, 0.3]]");

    let err = run(&[
        "beam",
        matrix.path().to_str().unwrap(),
        "-a",
        alphabet.path().to_str().unwrap(),
        "-b",
        "0",
    ])
    .unwrap_err();

    assert!(err.to_string().contains("beam size"), "{err}");
}

#[test]
fn beam_reads_null_as_impossible_log_score() {
    let alphabet = json_file(ABC);
    let matrix = json_file("[[null, null, null, 0.0]]");

    let output = run(&[
        "beam",
        matrix.path().to_str().unwrap(),
        "--log-probs",
        "-a",
        alphabet.path().to_str().unwrap(),
    ])
    .unwrap();

    assert_eq!(output, "0.000000\t");
}

#[test]
fn missing_matrix_file_is_reported() {
    let err = run(&["greedy", "does-not-exist.json"]).unwrap_err();

    assert!(err.to_string().contains("failed to read matrix"), "{err}");
}
