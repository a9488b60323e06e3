//! Integration tests for loading feature documents from disk.

use camino::Utf8Path;
use gherkin_runner::parser::parse_file;

const FIXTURE: &str = "tests/features/calculator.feature";

#[test]
fn loads_and_parses_a_feature_document() {
    let feature = parse_file(Utf8Path::new(FIXTURE))
        .unwrap_or_else(|err| panic!("fixture should load: {err}"));

    assert_eq!(feature.name, "Calculator");
    assert_eq!(feature.description, "A calculator that keeps a running total.");
    assert_eq!(feature.background.len(), 1);

    let names: Vec<&str> = feature
        .scenarios
        .iter()
        .map(|scenario| scenario.name.as_str())
        .collect();
    assert_eq!(
        names,
        vec![
            "Addition",
            "Tabulated addition",
            "Annotated addition",
            "Repeated addition (Example 1)",
            "Repeated addition (Example 2)",
        ]
    );
}

#[test]
fn table_and_docstring_survive_the_round_trip_from_disk() {
    let feature = parse_file(Utf8Path::new(FIXTURE))
        .unwrap_or_else(|err| panic!("fixture should load: {err}"));

    let tabulated = feature
        .scenario("Tabulated addition")
        .unwrap_or_else(|| panic!("tabulated scenario should parse"));
    let table = tabulated
        .steps
        .first()
        .and_then(|step| step.table.as_ref())
        .unwrap_or_else(|| panic!("first step should carry the table"));
    assert_eq!(table.len(), 4);
    assert_eq!(table.first().map(Vec::as_slice), Some(&["value".to_string()][..]));

    let annotated = feature
        .scenario("Annotated addition")
        .unwrap_or_else(|| panic!("annotated scenario should parse"));
    let docstring = annotated
        .steps
        .first()
        .and_then(|step| step.docstring.as_deref());
    assert_eq!(docstring, Some("      carried over from\n      last session"));
}

#[test]
fn missing_documents_report_the_offending_path() {
    let err = match parse_file(Utf8Path::new("tests/features/absent.feature")) {
        Err(err) => err,
        Ok(_) => panic!("missing file should fail"),
    };
    assert_eq!(err.path, "tests/features/absent.feature");
    assert!(err.to_string().contains("absent.feature"));
}
