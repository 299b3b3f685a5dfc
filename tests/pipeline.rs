//! End-to-end runs of both filters through the public API.

use std::path::PathBuf;

use treeflat::filter::observer::RecordingObserver;
use treeflat::filter::NoopObserver;
use treeflat::{
    apply, build_filter, Attribute, ChangeCase, ChangeCaseOptions, Dataset, ErrorCode,
    FilterError, FilterSpec, LabelPattern, ParseTree, PartOfSpeechTagging, SentenceSplitter,
    TaggingOptions, TreeFlattener, Value,
};

fn english_model() -> PathBuf {
    PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/models/english.json"))
}

fn reviews() -> Dataset {
    Dataset::new(
        "reviews",
        vec![
            Attribute::numeric("id"),
            Attribute::nominal("label", ["pos", "neg"]),
            Attribute::string("text"),
        ],
    )
    .with_row(vec![Value::Number(1.0), "pos".into(), "The dog runs.".into()])
    .with_row(vec![Value::Number(2.0), "neg".into(), Value::Missing])
    .with_row(vec![Value::Number(3.0), "pos".into(), "The cat sleeps.".into()])
}

fn tagging(overrides: impl FnOnce(&mut TaggingOptions)) -> TaggingOptions {
    let mut options = TaggingOptions {
        model: english_model(),
        ..TaggingOptions::default()
    };
    overrides(&mut options);
    options
}

fn tag(options: TaggingOptions, dataset: Dataset) -> Result<Dataset, FilterError> {
    let splitter = SentenceSplitter::english();
    let mut filter = PartOfSpeechTagging::new(&splitter, options);
    apply(&mut filter, dataset, &mut NoopObserver).map(|(out, _)| out)
}

#[test]
fn test_tagging_with_defaults() {
    let out = tag(tagging(|_| {}), reviews()).unwrap();

    assert_eq!(out.rows[0][2], Value::from("DT:The NN:dog VBZ:runs."));
    assert!(out.rows[1][2].is_missing());
    assert_eq!(out.rows[2][2], Value::from("DT:The NN:cat VBZ:sleeps."));

    // Non-string columns are untouched.
    assert_eq!(out.rows[0][0], Value::Number(1.0));
    assert_eq!(out.rows[0][1], Value::from("pos"));
}

#[test]
fn test_counts_are_invariant() {
    let input = reviews();
    let out = tag(tagging(|_| {}), input.clone()).unwrap();
    assert_eq!(out.num_rows(), input.num_rows());
    assert_eq!(out.attributes, input.attributes);
}

#[test]
fn test_two_sentences_keep_double_space() {
    let dataset = Dataset::new("docs", vec![Attribute::string("text")])
        .with_row(vec!["The dog runs. The cat sleeps.".into()]);
    let out = tag(tagging(|_| {}), dataset).unwrap();
    assert_eq!(
        out.rows[0][0],
        Value::from("DT:The NN:dog VBZ:runs.  DT:The NN:cat VBZ:sleeps.")
    );
}

#[test]
fn test_stopwords_without_prefixes() {
    let options = tagging(|o| {
        o.stopwords = "list the,a".into();
        o.suppress_label_prefixes = true;
    });
    let out = tag(options, reviews()).unwrap();
    assert_eq!(out.rows[0][2], Value::from("dog runs."));
    assert_eq!(out.rows[2][2], Value::from("cat sleeps."));
}

#[test]
fn test_label_filter_drops_whole_sentences() {
    let options = tagging(|o| o.label_pattern = "VBZ".into());
    let out = tag(options, reviews()).unwrap();
    assert_eq!(out.rows[0][2], Value::from("VBZ:runs."));

    let options = tagging(|o| o.label_pattern = "CD".into());
    let out = tag(options, reviews()).unwrap();
    assert_eq!(out.rows[0][2], Value::from("."));
}

#[test]
fn test_ptb_tokenizer_keeps_punctuation() {
    let dataset = Dataset::new("docs", vec![Attribute::string("text")])
        .with_row(vec!["The dog isn't loud.".into()]);
    let options = tagging(|o| o.tokenizer = "ptb".into());
    let out = tag(options, dataset).unwrap();
    assert_eq!(
        out.rows[0][0],
        Value::from("DT:The NN:dog VBZ:is RB:n't JJ:loud .:..")
    );
}

#[test]
fn test_inverted_range_skips_text() {
    let options = tagging(|o| {
        o.range = "last".into();
        o.invert = true;
    });
    let input = reviews();
    let out = tag(options, input.clone()).unwrap();
    assert_eq!(out.rows, input.rows);
}

#[test]
fn test_every_configuration_problem_is_reported() {
    let options = TaggingOptions {
        range: "first-9".into(),
        label_pattern: "[".into(),
        tokenizer: "nope".into(),
        model: "/no/such/model.json".into(),
        ..TaggingOptions::default()
    };
    let err = tag(options, reviews()).unwrap_err();
    let codes: Vec<_> = err.config_errors().iter().map(|e| e.code).collect();
    assert_eq!(
        codes,
        vec![
            ErrorCode::RangeOutOfBounds,
            ErrorCode::InvalidRegex,
            ErrorCode::InvalidTokenizer,
            ErrorCode::ModelNotFound,
        ]
    );
}

#[test]
fn test_model_directory_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let options = tagging(|o| o.model = dir.path().to_path_buf());
    let err = tag(options, reviews()).unwrap_err();
    assert_eq!(err.config_errors()[0].code, ErrorCode::ModelIsDirectory);
    assert_eq!(err.config_errors()[0].path, "/options/model");
}

#[test]
fn test_long_sentences_fall_back_to_flat_tree() {
    let options = tagging(|o| o.additional = "-maxLength 2".into());
    let out = tag(options, reviews()).unwrap();
    assert_eq!(out.rows[0][2], Value::from("X:The X:dog X:runs."));
}

#[test]
fn test_change_case_round_trip_through_files() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.json");
    let output = dir.path().join("out.json");
    reviews().save(&input).unwrap();

    let mut filter = ChangeCase::new(ChangeCaseOptions {
        uppercase: true,
        ..ChangeCaseOptions::default()
    });
    let mut observer = RecordingObserver::default();
    let (out, report) = apply(&mut filter, Dataset::load(&input).unwrap(), &mut observer).unwrap();
    out.save(&output).unwrap();

    let back = Dataset::load(&output).unwrap();
    assert_eq!(back.rows[0][2], Value::from("THE DOG RUNS."));
    // Nominal values are not strings and keep their case.
    assert_eq!(back.rows[0][1], Value::from("pos"));
    assert!(back.rows[1][2].is_missing());
    assert_eq!(report.cells_changed, 2);
    assert_eq!(observer.rows.len(), 3);
}

#[test]
fn test_spec_file_drives_tagging() {
    let dir = tempfile::tempdir().unwrap();
    let spec_path = dir.path().join("spec.json");
    let spec = serde_json::json!({
        "v": 1,
        "filter": "pos_tagging",
        "options": {
            "model": english_model(),
            "range": "3",
            "label_pattern": "NN.*"
        }
    });
    std::fs::write(&spec_path, spec.to_string()).unwrap();

    let spec = FilterSpec::load(&spec_path).unwrap();
    let splitter = SentenceSplitter::english();
    let mut filter = build_filter(&spec, &splitter).unwrap();
    let (out, _) = apply(filter.as_mut(), reviews(), &mut NoopObserver).unwrap();
    assert_eq!(out.rows[0][2], Value::from("NN:dog."));
}

#[test]
fn test_strict_spec_rejects_unknown_options() {
    let spec = FilterSpec::from_json(
        r#"{ "v": 1, "filter": "change_case", "strict": true, "options": { "upper": true } }"#,
    )
    .unwrap();
    let splitter = SentenceSplitter::english();
    let Err(err) = build_filter(&spec, &splitter) else {
        panic!("strict spec with an unknown option must fail");
    };
    assert_eq!(err.config_errors()[0].code, ErrorCode::UnknownField);
    assert_eq!(err.config_errors()[0].path, "/options/upper");
}

#[test]
fn test_flatten_bracketed_trees() {
    let trees: Vec<ParseTree> = [
        "(S (NP (DT The) (NN dog)) (VP (VBZ runs)))",
        "(S (NP (PRP It)) (VP (VBZ barks)))",
    ]
    .iter()
    .map(|t| ParseTree::from_bracketed(t).unwrap())
    .collect();

    let stopwords = treeflat::nlp::NullStopwords;
    let labels = LabelPattern::match_all();
    let flattener = TreeFlattener::new(&stopwords, &labels);
    assert_eq!(
        flattener.flatten_document(&trees),
        "DT:The NN:dog VBZ:runs.  PRP:It VBZ:barks."
    );
    // Flattening is repeatable.
    assert_eq!(
        flattener.flatten_document(&trees),
        flattener.flatten_document(&trees)
    );
}
