use super::*;
use crate::search::{HISTORY_KEY, SortBy};
use crate::store::KeyValueStore;

fn create_test_service() -> PromptService {
    let db = Database::in_memory().expect("failed to create in-memory database");
    PromptService::new(db)
}

fn tags(values: &[&str]) -> Vec<String> {
    values.iter().map(|t| t.to_string()).collect()
}

// --- CRUD ---

#[test]
fn empty_library_lists_nothing() {
    let service = create_test_service();
    assert!(service.list_prompts().unwrap().is_empty());
}

#[test]
fn create_prompt_trims_fields_and_sets_timestamps() {
    let service = create_test_service();

    let prompt = service
        .create_prompt("  Code Review  ", "\tExplain this code\n", &tags(&["programming"]))
        .expect("failed to create prompt");

    assert_eq!(prompt.title, "Code Review");
    assert_eq!(prompt.content, "Explain this code");
    assert_eq!(prompt.tags, vec!["programming"]);
    assert_eq!(prompt.created_at, prompt.updated_at);
    assert!(!prompt.id.as_str().is_empty());
}

#[test]
fn create_prompt_deduplicates_tags_case_sensitively() {
    let service = create_test_service();
    let prompt = service
        .create_prompt("T", "C", &tags(&["code", "Code", "code", " "]))
        .unwrap();
    assert_eq!(prompt.tags, vec!["code", "Code"]);
}

#[test]
fn create_prompt_rejects_blank_content() {
    let service = create_test_service();
    let err = service.create_prompt("Title", "   ", &[]).unwrap_err();

    let prompt_error = err.downcast_ref::<PromptError>().expect("should be a PromptError");
    assert!(matches!(prompt_error, PromptError::EmptyField("content")));
    assert!(service.list_prompts().unwrap().is_empty());
}

#[test]
fn create_prompt_rejects_blank_title() {
    let service = create_test_service();
    let err = service.create_prompt("", "content", &[]).unwrap_err();
    assert!(err.to_string().contains("title cannot be empty"));
}

#[test]
fn created_prompts_keep_insertion_order() {
    let service = create_test_service();
    let first = service.create_prompt("First", "one", &[]).unwrap();
    let second = service.create_prompt("Second", "two", &[]).unwrap();

    let ids: Vec<PromptId> = service.list_prompts().unwrap().into_iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![first.id, second.id]);
}

#[test]
fn get_prompt_returns_none_for_unknown_id() {
    let service = create_test_service();
    assert_eq!(service.get_prompt(&PromptId::new("missing")).unwrap(), None);
}

#[test]
fn update_prompt_changes_fields_but_not_id() {
    let service = create_test_service();
    let original = service.create_prompt("Draft", "old text", &tags(&["a"])).unwrap();

    let updated = service
        .update_prompt(
            &original.id,
            PromptUpdate {
                content: Some("new text".to_string()),
                tags: Some(tags(&["b", "c"])),
                ..Default::default()
            },
        )
        .unwrap();

    assert_eq!(updated.id, original.id);
    assert_eq!(updated.title, "Draft");
    assert_eq!(updated.content, "new text");
    assert_eq!(updated.tags, vec!["b", "c"]);
    assert_eq!(updated.created_at, original.created_at);
    assert!(updated.updated_at >= updated.created_at);

    let stored = service.get_prompt(&original.id).unwrap().unwrap();
    assert_eq!(stored, updated);
}

#[test]
fn update_unknown_prompt_is_not_found() {
    let service = create_test_service();
    let err = service
        .update_prompt(&PromptId::new("nope"), PromptUpdate::default())
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<PromptError>(),
        Some(PromptError::NotFound(_))
    ));
}

#[test]
fn delete_prompt_removes_only_that_prompt() {
    let service = create_test_service();
    let keep = service.create_prompt("Keep", "k", &[]).unwrap();
    let gone = service.create_prompt("Gone", "g", &[]).unwrap();

    service.delete_prompt(&gone.id).unwrap();

    let remaining = service.list_prompts().unwrap();
    assert_eq!(remaining, vec![keep]);
    assert!(service.delete_prompt(&gone.id).is_err());
}

#[test]
fn all_tags_are_sorted_and_distinct() {
    let service = create_test_service();
    service.create_prompt("A", "a", &tags(&["writing", "creative"])).unwrap();
    service.create_prompt("B", "b", &tags(&["code", "writing"])).unwrap();

    assert_eq!(service.all_tags().unwrap(), vec!["code", "creative", "writing"]);
}

// --- Seeding, import and export ---

#[test]
fn seed_examples_only_fills_empty_library() {
    let service = create_test_service();
    assert_eq!(service.seed_examples().unwrap(), 2);
    assert_eq!(service.seed_examples().unwrap(), 0);

    let prompts = service.list_prompts().unwrap();
    assert_eq!(prompts.len(), 2);
    assert_eq!(prompts[0].id.as_str(), "example1");
    assert_eq!(prompts[1].tags, vec!["programming", "code"]);
}

#[test]
fn export_then_import_into_fresh_library() {
    let source = create_test_service();
    source.seed_examples().unwrap();
    let exported = source.export_json().unwrap();

    let target = create_test_service();
    let report = target.import_json(&exported).unwrap();

    assert_eq!(report, ImportReport { total: 2, imported: 2 });
    assert_eq!(target.list_prompts().unwrap(), source.list_prompts().unwrap());
}

#[test]
fn import_skips_existing_and_repeated_ids() {
    let service = create_test_service();
    service.seed_examples().unwrap();

    let payload = r#"[
        {"id": "example1", "title": "Dup", "content": "dup", "tags": [],
         "createdAt": "2024-01-01T00:00:00Z", "updatedAt": "2024-01-01T00:00:00Z"},
        {"id": "n1", "title": "New", "content": "new", "tags": ["x"],
         "createdAt": "2024-01-01T00:00:00Z", "updatedAt": "2024-01-02T00:00:00Z"},
        {"id": "n1", "title": "New again", "content": "again", "tags": [],
         "createdAt": "2024-01-01T00:00:00Z", "updatedAt": "2024-01-01T00:00:00Z"}
    ]"#;

    let report = service.import_json(payload).unwrap();
    assert_eq!(report.total, 3);
    assert_eq!(report.imported, 1);
    assert_eq!(report.skipped(), 2);

    let prompts = service.list_prompts().unwrap();
    assert_eq!(prompts.len(), 3);
    assert_eq!(prompts[2].title, "New");
}

#[test]
fn import_rejects_non_array_payload() {
    let service = create_test_service();
    let err = service.import_json(r#"{"prompts": []}"#).unwrap_err();
    let prompt_error = err.downcast_ref::<PromptError>().unwrap();
    assert!(matches!(prompt_error, PromptError::InvalidImport(_)));
    assert!(prompt_error.is_user_error());
}

#[test]
fn import_rejects_unparsable_payload() {
    let service = create_test_service();
    let err = service.import_json("not json at all").unwrap_err();
    assert!(err.to_string().contains("not valid JSON"));
}

#[test]
fn import_rejects_malformed_entries() {
    let service = create_test_service();
    let err = service.import_json(r#"[{"title": "no id"}]"#).unwrap_err();
    assert!(err.to_string().contains("malformed prompt"));
    assert!(service.list_prompts().unwrap().is_empty());
}

// --- Search, history and analysis ---

#[test]
fn search_returns_owned_matches_and_records_history() {
    let mut service = create_test_service();
    service
        .create_prompt("Creative Writing", "Write a story about dragons", &tags(&["writing"]))
        .unwrap();
    service
        .create_prompt("Code Review", "Explain this code", &tags(&["programming"]))
        .unwrap();

    let results = service.search(&SearchOptions::query("story")).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].title, "Creative Writing");
    assert_eq!(service.history().recent(1), vec!["story"]);
}

#[test]
fn history_persists_across_service_instances() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prompts.db");

    {
        let mut service = PromptService::new(Database::open(&path).unwrap());
        service.search(&SearchOptions::query("dragons")).unwrap();
        service.search(&SearchOptions::query("code")).unwrap();
    }

    let mut service = PromptService::new(Database::open(&path).unwrap());
    assert!(service.history().is_empty());
    let history = service.load_history().unwrap();
    assert_eq!(history.recent(10), vec!["code", "dragons"]);

    service.clear_history().unwrap();
    assert!(service.history().is_empty());
    assert!(service.load_history().unwrap().is_empty());
}

#[test]
fn search_succeeds_when_history_cannot_be_saved() {
    let mut service = create_test_service();
    service.create_prompt("Creative Writing", "Write a story about dragons", &[]).unwrap();
    service
        .database()
        .connection()
        .execute_batch(
            "CREATE TRIGGER reject_history BEFORE INSERT ON kv
             WHEN NEW.key = 'searchHistory'
             BEGIN SELECT RAISE(ABORT, 'history is read-only'); END;",
        )
        .unwrap();

    let results = service.search(&SearchOptions::query("story")).unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(service.history().recent(1), vec!["story"]);
    assert_eq!(service.database().get(HISTORY_KEY).unwrap(), None);
}

#[test]
fn suggestions_include_library_tags() {
    let mut service = create_test_service();
    service.create_prompt("A", "a", &tags(&["programming", "prose"])).unwrap();
    service.search(&SearchOptions::query("project plan")).unwrap();

    let suggestions = service.suggestions("pro").unwrap();
    assert_eq!(suggestions, vec!["project plan", "programming", "prose"]);
}

#[test]
fn search_sorted_by_title() {
    let mut service = create_test_service();
    service.create_prompt("Zeta", "story", &[]).unwrap();
    service.create_prompt("alpha", "story", &[]).unwrap();

    let options = SearchOptions {
        sort_by: SortBy::Title,
        ..SearchOptions::query("story")
    };
    let titles: Vec<String> = service
        .search(&options)
        .unwrap()
        .into_iter()
        .map(|p| p.title)
        .collect();
    assert_eq!(titles, vec!["alpha", "Zeta"]);
}

#[test]
fn similar_to_excludes_target() {
    let service = create_test_service();
    let target = service
        .create_prompt("Rust async guide", "tokio runtime futures", &tags(&["programming"]))
        .unwrap();
    service
        .create_prompt("Rust async", "tokio runtime", &tags(&["programming"]))
        .unwrap();
    service.create_prompt("Gardening", "tomatoes", &[]).unwrap();

    let similar = service.similar_to(&target.id, 3).unwrap();
    assert_eq!(similar.len(), 1);
    assert_eq!(similar[0].0.title, "Rust async");
    assert!(similar.iter().all(|(p, _)| p.id != target.id));
}

#[test]
fn similar_to_unknown_id_is_not_found() {
    let service = create_test_service();
    let err = service.similar_to(&PromptId::new("ghost"), 3).unwrap_err();
    assert!(err.to_string().contains("Prompt not found: ghost"));
}

#[test]
fn analyze_reports_tags_and_intent() {
    let service = create_test_service();
    service.seed_examples().unwrap();

    let analysis = service.analyze(&PromptId::new("example1"), 5, 1).unwrap();
    assert_eq!(analysis.suggested_tags, vec!["writing"]);
    assert_eq!(analysis.intent, crate::nlp::Intent::Instruction);
}
