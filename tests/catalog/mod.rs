/// Record catalog and registry tests
///
/// Exercises the public API the way a population step would: build a
/// registry, fill tables in arbitrary order, then walk it in write order.
use forge_tables::records::{
    AccountFields, AccountRecord, IssueRecord, ProviderRecord, RepositoryRecord,
};
use forge_tables::{NUM_TABLES, Record, Registry, State, TableKind, lookup};
use serde_json::{Value, json};

fn position(order: &[TableKind], kind: TableKind) -> usize {
    order.iter().position(|k| *k == kind).unwrap()
}

#[test]
fn test_iteration_visits_dependencies_first() {
    let registry = Registry::new();
    let order: Vec<TableKind> = registry.iter_in_order().map(|(kind, _)| kind).collect();
    assert_eq!(order.len(), NUM_TABLES);

    let repository = position(&order, TableKind::Repository);
    assert!(position(&order, TableKind::Provider) < repository);
    assert!(position(&order, TableKind::Account) < repository);

    let issue = position(&order, TableKind::Issue);
    for dep in [
        TableKind::Repository,
        TableKind::Milestone,
        TableKind::Account,
        TableKind::Label,
    ] {
        assert!(position(&order, dep) < issue, "{} must come before issue", dep);
    }
}

#[test]
fn test_repository_example_visits_owner_and_provider_first() {
    let mut registry = Registry::new();

    let mut repo = RepositoryRecord::default();
    repo.fields.owner = vec!["acct123".to_string()];
    repo.fields.provider = vec!["prov1".to_string()];
    registry.push(repo);

    let mut account = AccountRecord::default();
    account.identity.id = Some("acct123".to_string());
    registry.push(account);

    let mut provider = ProviderRecord::default();
    provider.identity.id = Some("prov1".to_string());
    registry.push(provider);

    let mut seen: Vec<String> = Vec::new();
    for (kind, table) in registry.iter_in_order() {
        for idx in 0..table.len() {
            if kind == TableKind::Repository {
                assert!(seen.contains(&"acct123".to_string()));
                assert!(seen.contains(&"prov1".to_string()));
            }
            if let Some(id) = table.store_id_at(idx) {
                seen.push(id.to_string());
            }
        }
    }
    assert_eq!(seen, vec!["prov1", "acct123"]);
}

#[test]
fn test_lookup_by_name() {
    let registry = Registry::new();
    let idx = lookup("repository").unwrap();
    assert_eq!(registry.table_at(idx).unwrap().kind(), TableKind::Repository);
    assert!(lookup("nonexistent").is_none());
    assert!(lookup("ISSUE").is_none());
}

#[test]
fn test_render_hides_state_outside_debug() {
    let mut issue = IssueRecord::default();
    issue.state = State::New;
    issue.fields.title = "Support GitLab epics".to_string();
    issue.fields.is_epic = true;

    let external: Value = serde_json::from_str(&issue.to_string()).unwrap();
    assert!(external.get("state").is_none());
    assert_eq!(external["fields"]["is-epic"], true);

    let debug: Value = serde_json::from_str(&issue.to_debug_string()).unwrap();
    assert_eq!(debug["state"], "new");
}

#[test]
fn test_issue_relationships_round_trip_in_order() {
    let source = json!({
        "id": "recIssue0000001",
        "createdTime": "2019-06-01T10:00:00Z",
        "fields": {
            "id": "https://github.com/moul/depviz/issues/42",
            "title": "dependency graph",
            "comments": 3,
            "repository": ["recRepo"],
            "milestone": ["recV1"],
            "author": ["recMoul"],
            "labels": ["recC", "recA", "recB"],
            "assignees": ["recZ", "recY"]
        }
    });

    let issue = IssueRecord::from_value(source.clone()).unwrap();
    assert_eq!(issue.state, State::Unsynced);
    assert_eq!(issue.store_id(), Some("recIssue0000001"));

    let reparsed = IssueRecord::from_external_str(&issue.to_external_string()).unwrap();
    assert_eq!(reparsed.fields.repository, vec!["recRepo"]);
    assert_eq!(reparsed.fields.milestone, vec!["recV1"]);
    assert_eq!(reparsed.fields.author, vec!["recMoul"]);
    assert_eq!(reparsed.fields.labels, vec!["recC", "recA", "recB"]);
    assert_eq!(reparsed.fields.assignees, vec!["recZ", "recY"]);
    assert_eq!(reparsed, issue);
}

#[test]
fn test_typed_and_untyped_access_agree() {
    let mut registry = Registry::new();
    registry
        .table_mut(TableKind::Account)
        .append_json(json!({"fields": {"id": "moul", "login": "moul", "provider": ["github"]}}))
        .unwrap();

    let accounts: &Vec<Record<AccountFields>> = registry.records::<AccountFields>();
    assert_eq!(accounts.len(), 1);
    assert_eq!(accounts[0].fields.login, "moul");
    assert_eq!(accounts[0].kind(), TableKind::Account);
    assert_eq!(registry.table(TableKind::Account).find_by_base_id("moul"), Some(0));
}
