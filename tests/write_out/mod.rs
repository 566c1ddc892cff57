/// Write-out tests
///
/// Drains snapshots into the in-memory store and checks that every
/// relationship lands on a row that already existed.
use forge_tables::records::{IssueFields, MilestoneFields};
use forge_tables::{MemorySink, Registry, State, TableKind, write_in_order};
use serde_json::json;

fn depviz_snapshot() -> serde_json::Value {
    // listed dependents-first on purpose
    json!({
        "issue": [{
            "fields": {
                "id": "moul/depviz#1",
                "title": "Initial design",
                "state": "open",
                "repository": ["moul/depviz"],
                "milestone": ["moul/depviz/v1"],
                "author": ["moul"],
                "labels": ["bug", "help-wanted"],
                "assignees": ["moul", "bob"]
            }
        }],
        "milestone": [{
            "fields": {
                "id": "moul/depviz/v1",
                "title": "v1",
                "creator": ["moul"],
                "repository": ["moul/depviz"]
            }
        }],
        "repository": [{
            "fields": {"id": "moul/depviz", "title": "depviz", "provider": ["github"], "owner": ["moul"]}
        }],
        "account": [
            {"fields": {"id": "moul", "login": "moul", "provider": ["github"]}},
            {"fields": {"id": "bob", "login": "bob", "provider": ["github"]}}
        ],
        "label": [
            {"fields": {"id": "bug", "name": "bug", "color": "d73a4a"}},
            {"fields": {"id": "help-wanted", "name": "help wanted", "color": "008672"}}
        ],
        "provider": [{"fields": {"id": "github", "driver": "github", "url": "https://github.com"}}]
    })
}

#[tokio::test]
async fn test_full_snapshot_writes_in_dependency_order() {
    let mut registry = Registry::new();
    assert_eq!(registry.load_snapshot(&depviz_snapshot()).unwrap(), 8);

    let sink = MemorySink::new();
    let report = write_in_order(&mut registry, &sink, &TableKind::ALL)
        .await
        .unwrap();

    assert_eq!(report.created(), 8);
    assert_eq!(report.updated(), 0);

    let created: Vec<TableKind> = sink.created().into_iter().map(|(kind, _)| kind).collect();
    let mut sorted = created.clone();
    sorted.sort();
    assert_eq!(created, sorted);

    let issue = &registry.records::<IssueFields>()[0];
    let accounts = registry.table(TableKind::Account);
    assert_eq!(
        issue.fields.assignees,
        vec![
            accounts.store_id_for("moul").unwrap().to_string(),
            accounts.store_id_for("bob").unwrap().to_string(),
        ]
    );
    let labels = registry.table(TableKind::Label);
    assert_eq!(
        issue.fields.labels,
        vec![
            labels.store_id_for("bug").unwrap().to_string(),
            labels.store_id_for("help-wanted").unwrap().to_string(),
        ]
    );
    assert_eq!(issue.state, State::Unchanged);

    let milestone = &registry.records::<MilestoneFields>()[0];
    assert_eq!(issue.fields.milestone, vec![milestone.store_id().unwrap().to_string()]);

    let stored = sink
        .get(TableKind::Issue, issue.store_id().unwrap())
        .unwrap();
    assert_eq!(stored["labels"], json!(issue.fields.labels));
    assert!(stored.get("createdTime").is_none());
}

#[tokio::test]
async fn test_partial_selection_stops_on_unresolved_reference() {
    let mut registry = Registry::new();
    registry.load_snapshot(&depviz_snapshot()).unwrap();

    let sink = MemorySink::new();
    let result = write_in_order(
        &mut registry,
        &sink,
        &[TableKind::Provider, TableKind::Label, TableKind::Issue],
    )
    .await;

    assert!(result.is_err());
    assert_eq!(sink.len(TableKind::Provider), 1);
    assert_eq!(sink.len(TableKind::Label), 2);
    assert_eq!(sink.len(TableKind::Issue), 0);
}

#[tokio::test]
async fn test_empty_registry_writes_nothing() {
    let mut registry = Registry::new();
    let sink = MemorySink::new();

    let report = write_in_order(&mut registry, &sink, &TableKind::ALL)
        .await
        .unwrap();

    assert_eq!(report.tables.len(), TableKind::ALL.len());
    assert_eq!(report.created() + report.updated() + report.skipped(), 0);
    assert!(sink.created().is_empty());
}
