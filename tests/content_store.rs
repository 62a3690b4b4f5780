use portfolio::content::{ContentDocument, PartialContent, SectionKey, WorkProject};
use portfolio::store::{ContentError, ContentStore, parse_document};
use tempfile::tempdir;

#[test]
fn missing_file_is_created_with_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data").join("content.json");
    let store = ContentStore::new(&path);

    let doc = store.read().unwrap();
    assert_eq!(doc, ContentDocument::default(), "Missing file should read as defaults");
    assert!(path.exists(), "Default document should be written to disk");

    let on_disk: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(on_disk["about"], "");
    assert_eq!(on_disk["howIStarted"], "");
    assert_eq!(on_disk["workProjects"], serde_json::json!([]));
}

#[test]
fn written_document_reads_back() {
    let dir = tempdir().unwrap();
    let store = ContentStore::new(dir.path().join("content.json"));

    let mut doc = ContentDocument::default();
    doc.about = "I build things".to_string();
    doc.hero_name = "Ada".to_string();
    doc.skills = vec!["Rust".to_string(), "SQL".to_string()];
    doc.work_projects.push(WorkProject {
        title: "Compiler".to_string(),
        technologies: vec!["Rust".to_string()],
        github: Some("https://github.com/ada/compiler".to_string()),
        featured: true,
        ..WorkProject::default()
    });

    store.write(&doc).unwrap();
    assert_eq!(store.read().unwrap(), doc, "Stored document should be unchanged");

    // Overwrites replace the whole document
    store.write(&ContentDocument::default()).unwrap();
    assert_eq!(store.read().unwrap(), ContentDocument::default());
}

#[test]
fn stored_file_missing_keys_gets_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("content.json");
    std::fs::write(&path, r#"{"about":"Hello","skills":["Go"]}"#).unwrap();

    let doc = ContentStore::new(&path).read().unwrap();
    assert_eq!(doc.about, "Hello");
    assert_eq!(doc.skills, vec!["Go".to_string()]);
    assert_eq!(doc.contact, "", "Absent keys should default to empty");
    assert!(doc.experience_jobs.is_empty());
}

#[test]
fn corrupt_file_is_an_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("content.json");
    std::fs::write(&path, "{ not json").unwrap();

    let err = ContentStore::new(&path).read().unwrap_err();
    assert!(matches!(err, ContentError::Corrupt(_)), "Got {:?}", err);
    assert!(!err.is_client_error());
}

#[test]
fn parse_document_fills_defaults_and_treats_null_as_absent() {
    let doc = parse_document(br#"{"heroName":"Ada","work":null,"futureVision":"Mars"}"#).unwrap();
    assert_eq!(doc.hero_name, "Ada");
    assert_eq!(doc.work, "");
    assert_eq!(doc.field(SectionKey::FutureVision), "Mars");
}

#[test]
fn parse_document_rejects_bad_payloads() {
    for body in [&b"[1,2,3]"[..], b"\"text\"", b"not json", br#"{"skills":"Rust"}"#] {
        let err = parse_document(body).unwrap_err();
        assert!(
            matches!(err, ContentError::InvalidBody(_)),
            "{:?} should be rejected as an invalid body",
            String::from_utf8_lossy(body)
        );
        assert!(err.is_client_error());
    }
}

const NULLY_ENTRIES: &str = r#"{
    "workProjects": [
        {"title": "a", "description": null, "image": null, "technologies": null,
         "github": null, "live": null, "featured": null}
    ],
    "experienceJobs": [
        {"title": null, "company": "Acme", "period": null, "description": null,
         "technologies": null}
    ]
}"#;

fn assert_nulls_defaulted(doc: &ContentDocument) {
    let project = &doc.work_projects[0];
    assert_eq!(project.title, "a");
    assert_eq!(project.image, "", "Null inside an entry should become empty");
    assert!(project.technologies.is_empty());
    assert_eq!(project.github, None);
    assert!(!project.featured);

    let job = &doc.experience_jobs[0];
    assert_eq!(job.company, "Acme");
    assert_eq!(job.title, "");
    assert_eq!(job.period, "");
    assert!(job.technologies.is_empty());
}

#[test]
fn nulls_inside_entries_are_accepted_on_submit() {
    let doc = parse_document(NULLY_ENTRIES.as_bytes()).unwrap();
    assert_nulls_defaulted(&doc);
}

#[test]
fn nulls_inside_entries_are_accepted_from_disk() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("content.json");
    std::fs::write(&path, NULLY_ENTRIES).unwrap();

    let doc = ContentStore::new(&path).read().unwrap();
    assert_nulls_defaulted(&doc);
}

#[test]
fn overlay_only_replaces_provided_fields() {
    let mut doc = ContentDocument::default();
    doc.about = "old about".to_string();
    doc.contact = "old contact".to_string();

    doc.overlay(PartialContent {
        about: Some("new about".to_string()),
        ..PartialContent::default()
    });

    assert_eq!(doc.about, "new about");
    assert_eq!(doc.contact, "old contact");
}

#[test]
fn section_keys_match_json_names() {
    for key in SectionKey::ALL {
        let parsed: SectionKey = key.as_str().parse().unwrap();
        assert_eq!(parsed, key);
    }
    assert!("notASection".parse::<SectionKey>().is_err());

    let mut doc = ContentDocument::default();
    *doc.field_mut(SectionKey::HowIStarted) = "Tinkering".to_string();
    let json = serde_json::to_value(&doc).unwrap();
    assert_eq!(json["howIStarted"], "Tinkering");
}
