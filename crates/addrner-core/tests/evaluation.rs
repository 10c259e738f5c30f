use std::fs;

use addrner_core::eval::{self, EvalConfig};
use addrner_core::{AddrnerError, BlankTokenizer, DocBin, DocSpec, LexiconModel, Tokenizer};

fn docs(json: &str) -> Vec<addrner_core::Document> {
    let specs: Vec<DocSpec> = serde_json::from_str(json).unwrap();
    specs
        .iter()
        .map(|spec| spec.to_document(&BlankTokenizer::new()).unwrap())
        .collect()
}

#[test]
fn test_eval_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let model_dir = dir.path().join("models").join("model-last");
    let dev_set = dir.path().join("dev.spacy");
    let report = dir.path().join("reports").join("eval.html");

    let train = docs(
        r#"[
  {"text": "123 Main St", "ents": [
    {"text": "123", "label": "AddressNumber"},
    {"text": "Main", "label": "StreetName"},
    {"text": "St", "label": "StreetNamePostType"}]},
  {"text": "Chicago IL 60614", "ents": [
    {"text": "Chicago", "label": "PlaceName"},
    {"text": "IL", "label": "StateName"},
    {"text": "60614", "label": "ZipCode"}]}
]"#,
    );
    LexiconModel::fit(&train).save(&model_dir).unwrap();

    let dev = docs(
        r#"[
  {"text": "123 Main St", "ents": [
    {"text": "123", "label": "AddressNumber"},
    {"text": "Main", "label": "StreetName"},
    {"text": "St", "label": "StreetNamePostType"}]},
  {"text": "Main St, Chicago", "ents": [
    {"text": "Main St", "label": "StreetName"},
    {"text": "Chicago", "label": "PlaceName"}]}
]"#,
    );
    let docbin: DocBin = dev.iter().collect();
    docbin.to_disk(&dev_set).unwrap();

    let config = EvalConfig::new()
        .with_model_dir(&model_dir)
        .with_dev_set(&dev_set)
        .with_output(&report);
    let summary = eval::run(&config).unwrap();
    assert_eq!(summary.total, 2);
    assert_eq!(summary.mispredicted, 1);

    let html = fs::read_to_string(&report).unwrap();
    assert!(html.contains("1 of 2 documents mispredicted."));
    assert!(html.contains("<tr><td>1</td>"));
    assert!(!html.contains("<tr><td>0</td>"));
}

#[test]
fn test_eval_missing_model() {
    let dir = tempfile::tempdir().unwrap();
    let dev_set = dir.path().join("dev.spacy");
    let doc = BlankTokenizer::new().make_doc("1 Elm St");
    DocBin::from_iter([&doc]).to_disk(&dev_set).unwrap();

    let config = EvalConfig::new()
        .with_model_dir(dir.path().join("missing"))
        .with_dev_set(&dev_set)
        .with_output(dir.path().join("eval.html"));
    let err = eval::run(&config).unwrap_err();
    assert!(matches!(err, AddrnerError::ModelLoad(_)));
    assert!(!dir.path().join("eval.html").exists());
}
