use serde_json::{Value, json};

use content_spec::{FormSubmission, Manifest, Question, QuestionDef, Section};

fn question(value: Value) -> Question {
    let definition: QuestionDef = serde_json::from_value(value).expect("definition");
    Question::from_definition(definition).expect("question")
}

fn lot_question(id: &str, being: Value) -> Question {
    question(json!({
        "id": id,
        "type": "text",
        "depends": [{ "on": "lot", "being": being }]
    }))
}

fn lot_manifest() -> Manifest {
    Manifest::new(vec![
        Section::new("scs", "SCS", true, None, vec![lot_question("scsQ", json!(["SCS"]))]),
        Section::new("saas", "SaaS", false, None, vec![lot_question("saasQ", json!(["SaaS"]))]),
        Section::new("paas", "PaaS", true, None, vec![lot_question("paasQ", json!("PaaS"))]),
    ])
}

fn section_ids(manifest: &Manifest) -> Vec<&str> {
    manifest.sections().iter().map(Section::id).collect()
}

fn numbers(manifest: &Manifest) -> Vec<Option<usize>> {
    manifest
        .sections()
        .iter()
        .flat_map(|section| section.questions())
        .map(Question::number)
        .collect()
}

#[test]
fn filtering_is_not_cumulative() {
    let manifest = lot_manifest();

    let scs = manifest.filter(&json!({ "lot": "SCS" }));
    assert_eq!(section_ids(&scs), vec!["scs"]);

    let saas = manifest.filter(&json!({ "lot": "SaaS" }));
    assert_eq!(section_ids(&saas), vec!["saas"]);

    let paas = manifest.filter(&json!({ "lot": "PaaS" }));
    assert_eq!(section_ids(&paas), vec!["paas"]);

    assert_eq!(section_ids(&manifest), vec!["scs", "saas", "paas"]);
}

#[test]
fn filtering_twice_gives_the_same_view() {
    let manifest = lot_manifest();
    let answers = json!({ "lot": "SaaS" });
    assert_eq!(manifest.filter(&answers), manifest.filter(&answers));
    assert!(manifest.filter(&json!({ "lot": "IaaS" })).is_empty());
    assert_eq!(manifest.filter(&json!({ "lot": "SCS" })).sections().len(), 1);
}

#[test]
fn list_dependencies_check_membership() {
    let manifest = Manifest::new(vec![Section::new(
        "shared",
        "Shared",
        true,
        None,
        vec![
            lot_question("cloudQ", json!(["SCS", "SaaS"])),
            question(json!({ "id": "alwaysQ", "type": "text" })),
        ],
    )]);

    for lot in ["SCS", "SaaS"] {
        let filtered = manifest.filter(&json!({ "lot": lot }));
        assert_eq!(filtered.get_question_ids(), vec!["cloudQ", "alwaysQ"], "{lot}");
    }
    for answers in [json!({ "lot": "PaaS" }), json!({}), json!(null)] {
        let filtered = manifest.filter(&answers);
        assert_eq!(filtered.get_question_ids(), vec!["alwaysQ"], "{answers}");
    }
}

#[test]
fn every_dependency_must_hold() {
    let manifest = Manifest::new(vec![Section::new(
        "both",
        "Both",
        true,
        None,
        vec![question(json!({
            "id": "q",
            "depends": [
                { "on": "lot", "being": ["SaaS"] },
                { "on": "hosted", "being": [true] }
            ]
        }))],
    )]);
    assert!(manifest.filter(&json!({ "lot": "SaaS" })).is_empty());
    assert!(manifest.filter(&json!({ "lot": "SaaS", "hosted": false })).is_empty());
    assert!(!manifest.filter(&json!({ "lot": "SaaS", "hosted": true })).is_empty());
}

#[test]
fn filtered_questions_keep_original_numbers() {
    let manifest = Manifest::new(vec![
        Section::new("one", "One", true, None, vec![question(json!({ "id": "q1" }))]),
        Section::new("two", "Two", true, None, vec![lot_question("q2", json!(["SaaS"]))]),
        Section::new("three", "Three", true, None, vec![question(json!({ "id": "q3" }))]),
    ]);
    assert_eq!(numbers(&manifest), vec![Some(1), Some(2), Some(3)]);

    let filtered = manifest.filter(&json!({ "lot": "SCS" }));
    assert_eq!(section_ids(&filtered), vec!["one", "three"]);
    assert_eq!(numbers(&filtered), vec![Some(1), Some(3)]);
}

#[test]
fn filtered_sections_keep_their_metadata() {
    let manifest = Manifest::new(vec![Section::new(
        "mixed",
        "Mixed",
        false,
        Some("Some questions are lot specific".into()),
        vec![
            lot_question("saasQ", json!(["SaaS"])),
            question(json!({ "id": "general" })),
        ],
    )]);
    let filtered = manifest.filter(&json!({ "lot": "SCS" }));
    let section = filtered.get_section("mixed").expect("section");
    assert_eq!(section.name(), "Mixed");
    assert!(!section.editable());
    assert_eq!(section.description(), Some("Some questions are lot specific"));
    assert_eq!(section.get_question_ids(None), vec!["general"]);
    assert_eq!(manifest.sections()[0].questions().len(), 2);
}

#[test]
fn next_section_walks_in_order() {
    let manifest = lot_manifest();
    assert_eq!(manifest.get_next_section_id(None, false), Some("scs"));
    assert_eq!(manifest.get_next_section_id(Some("scs"), false), Some("saas"));
    assert_eq!(manifest.get_next_section_id(Some("saas"), false), Some("paas"));
    assert_eq!(manifest.get_next_section_id(Some("paas"), false), None);
    assert_eq!(manifest.get_next_section_id(Some("nope"), false), None);
}

#[test]
fn next_editable_section_skips_read_only_sections() {
    let manifest = lot_manifest();
    assert_eq!(manifest.get_next_section_id(Some("scs"), true), Some("paas"));
    assert_eq!(manifest.get_next_section_id(Some("saas"), true), Some("paas"));
    assert_eq!(manifest.get_next_editable_section_id(Some("paas")), None);

    let read_only_first = Manifest::new(vec![
        Section::new("intro", "Intro", false, None, vec![question(json!({ "id": "a" }))]),
        Section::new("body", "Body", true, None, vec![question(json!({ "id": "b" }))]),
    ]);
    assert_eq!(read_only_first.get_next_editable_section_id(None), Some("body"));
    assert_eq!(read_only_first.get_next_section_id(None, false), Some("intro"));
}

#[test]
fn lookups_return_none_when_missing() {
    let manifest = lot_manifest();
    assert!(manifest.get_section("missing").is_none());
    assert!(manifest.get_question("missing").is_none());
    assert_eq!(
        manifest.get_question("saasQ").and_then(Question::number),
        Some(2)
    );
}

#[test]
fn all_data_merges_sections() {
    let manifest = Manifest::new(vec![
        Section::new("one", "One", true, None, vec![question(json!({ "id": "name" }))]),
        Section::new(
            "two",
            "Two",
            true,
            None,
            vec![question(json!({ "id": "flag", "type": "boolean" }))],
        ),
    ]);
    let submission: FormSubmission = [("name", "Acme"), ("flag", "yes"), ("other", "x")]
        .into_iter()
        .collect();
    let data = manifest.get_all_data(&submission).expect("data");
    assert_eq!(Value::Object(data), json!({ "name": "Acme", "flag": true }));
}
