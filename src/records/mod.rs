//! Record shapes mirrored into the external table store
//!
//! Every record is a [`Record`] wrapping one of the six kind-specific fields
//! types. The internal [`State`] marker lives next to the store identity but
//! never leaves the process: the external representation is the store
//! identity plus the `fields` object.

mod models;

pub use models::{
    AccountFields, IssueFields, LabelFields, MilestoneFields, ProviderFields, RepositoryFields,
};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::tables::{Table, TableKind};

pub type ProviderRecord = Record<ProviderFields>;
pub type LabelRecord = Record<LabelFields>;
pub type AccountRecord = Record<AccountFields>;
pub type RepositoryRecord = Record<RepositoryFields>;
pub type MilestoneRecord = Record<MilestoneFields>;
pub type IssueRecord = Record<IssueFields>;

/// Synchronization marker, internal only
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum State {
    /// Not yet compared against the store
    #[default]
    Unsynced,
    /// Known to be absent from the store
    New,
    /// Present in the store with different fields
    Changed,
    /// Present in the store and identical
    Unchanged,
}

impl State {
    pub fn as_str(&self) -> &'static str {
        match self {
            State::Unsynced => "unsynced",
            State::New => "new",
            State::Changed => "changed",
            State::Unchanged => "unchanged",
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata shared by every kind, flattened into the kind's fields object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Base {
    /// Identifier of the object on the forge side
    pub id: String,
    #[serde(rename = "created-at", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "updated-at", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    pub errors: String,
}

/// Identity assigned by the store once a row has been created there
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreIdentity {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "createdTime", skip_serializing_if = "Option::is_none")]
    pub created_time: Option<DateTime<Utc>>,
}

/// A relationship column and the kind its identifiers point at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelationshipColumn {
    pub column: &'static str,
    pub target: TableKind,
}

/// Behaviour common to the six fields types.
///
/// `links` and `links_mut` return the identifier lists in the same order as
/// [`RecordFields::RELATIONSHIPS`].
pub trait RecordFields:
    Serialize + DeserializeOwned + Default + Clone + PartialEq + fmt::Debug + Send + Sync + 'static
{
    const KIND: TableKind;
    const RELATIONSHIPS: &'static [RelationshipColumn];

    fn base(&self) -> &Base;
    fn links(&self) -> Vec<&Vec<String>>;
    fn links_mut(&mut self) -> Vec<&mut Vec<String>>;

    /// The typed rows of `table`, if it holds this kind
    fn records(table: &Table) -> Option<&Vec<Record<Self>>>;
    fn records_mut(table: &mut Table) -> Option<&mut Vec<Record<Self>>>;
}

/// One row of a table: internal state, store identity and the kind's fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "F: Serialize",
    deserialize = "F: Deserialize<'de> + Default"
))]
pub struct Record<F> {
    #[serde(skip)]
    pub state: State,
    #[serde(flatten)]
    pub identity: StoreIdentity,
    #[serde(default)]
    pub fields: F,
}

impl<F: RecordFields> Record<F> {
    pub fn new(fields: F) -> Self {
        Self {
            state: State::default(),
            identity: StoreIdentity::default(),
            fields,
        }
    }

    pub fn kind(&self) -> TableKind {
        F::KIND
    }

    pub fn base_id(&self) -> &str {
        &self.fields.base().id
    }

    pub fn store_id(&self) -> Option<&str> {
        self.identity.id.as_deref()
    }

    /// Relationship columns paired with their current identifiers
    pub fn relationships(&self) -> Vec<(RelationshipColumn, &[String])> {
        F::RELATIONSHIPS
            .iter()
            .copied()
            .zip(self.fields.links().into_iter().map(Vec::as_slice))
            .collect()
    }

    /// Rewrite relationship identifiers through `resolve`.
    ///
    /// Identifiers for which `resolve` returns `None` are kept as they are.
    /// Returns how many identifiers were rewritten.
    pub fn resolve_relationships<R>(&mut self, mut resolve: R) -> usize
    where
        R: FnMut(TableKind, &str) -> Option<String>,
    {
        let mut rewritten = 0;
        for (column, ids) in F::RELATIONSHIPS.iter().zip(self.fields.links_mut()) {
            for id in ids.iter_mut() {
                if let Some(resolved) = resolve(column.target, id) {
                    if resolved != *id {
                        *id = resolved;
                        rewritten += 1;
                    }
                }
            }
        }
        rewritten
    }

    /// The `fields` object exactly as the store receives it
    pub fn fields_value(&self) -> Value {
        serde_json::to_value(&self.fields).unwrap_or(Value::Null)
    }

    /// External representation, without the internal state
    pub fn to_external_string(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Debug representation: the external one plus a `state` key
    pub fn to_debug_string(&self) -> String {
        match serde_json::to_value(self) {
            Ok(Value::Object(mut map)) => {
                map.insert("state".to_string(), Value::String(self.state.to_string()));
                serde_json::to_string(&Value::Object(map)).unwrap_or_default()
            }
            _ => String::new(),
        }
    }

    /// Parse a record from its external representation. State starts over as `Unsynced`.
    pub fn from_external_str(input: &str) -> serde_json::Result<Self> {
        serde_json::from_str(input)
    }

    pub fn from_value(value: Value) -> serde_json::Result<Self> {
        serde_json::from_value(value)
    }
}

impl<F: RecordFields> fmt::Display for Record<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_external_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_zero_value_records_for_every_kind() {
        fn check<F: RecordFields>() {
            let record = Record::<F>::default();
            assert_eq!(record.state, State::Unsynced);
            assert_eq!(record.kind(), F::KIND);
            assert!(record.store_id().is_none());
            assert!(record.identity.created_time.is_none());
            assert_eq!(record.base_id(), "");
            assert_eq!(record.fields.base(), &Base::default());
            assert_eq!(record.relationships().len(), F::RELATIONSHIPS.len());
            for (column, ids) in record.relationships() {
                assert!(ids.is_empty(), "{} of {} is not empty", column.column, F::KIND);
            }
            assert_eq!(Record::new(F::default()), record);
        }
        check::<ProviderFields>();
        check::<LabelFields>();
        check::<AccountFields>();
        check::<RepositoryFields>();
        check::<MilestoneFields>();
        check::<IssueFields>();
    }

    #[test]
    fn test_zero_value_records() {
        let account = AccountRecord::default();
        assert_eq!(account.state, State::Unsynced);
        assert!(account.store_id().is_none());
        assert!(account.fields.provider.is_empty());
        assert_eq!(account.fields.login, "");

        let issue = IssueRecord::default();
        assert_eq!(issue.state, State::Unsynced);
        assert!(issue.fields.completed_at.is_none());
        assert_eq!(issue.fields.comments, 0);
        assert!(!issue.fields.is_pr);
        for (_, ids) in issue.relationships() {
            assert!(ids.is_empty());
        }
    }

    #[test]
    fn test_external_string_excludes_state() {
        let mut record = LabelRecord::new(LabelFields {
            name: "bug".to_string(),
            color: "d73a4a".to_string(),
            ..Default::default()
        });
        record.state = State::Changed;

        let external = record.to_external_string();
        assert!(!external.contains("state"));
        assert!(!external.contains("changed"));
        assert!(external.contains("\"name\":\"bug\""));
        assert_eq!(external, record.to_string());

        let debug: Value = serde_json::from_str(&record.to_debug_string()).unwrap();
        assert_eq!(debug["state"], "changed");
        assert_eq!(debug["fields"]["color"], "d73a4a");
    }

    #[test]
    fn test_store_identity_only_when_present() {
        let mut record = ProviderRecord::new(ProviderFields {
            url: "https://github.com".to_string(),
            driver: "github".to_string(),
            ..Default::default()
        });
        let value: Value = serde_json::from_str(&record.to_external_string()).unwrap();
        assert!(value.get("id").is_none());
        assert!(value.get("createdTime").is_none());

        record.identity = StoreIdentity {
            id: Some("recAAAAAAAAAAAAAA".to_string()),
            created_time: Some(Utc.with_ymd_and_hms(2019, 5, 1, 12, 0, 0).unwrap()),
        };
        let value: Value = serde_json::from_str(&record.to_external_string()).unwrap();
        assert_eq!(value["id"], "recAAAAAAAAAAAAAA");
        assert_eq!(value["createdTime"], "2019-05-01T12:00:00Z");
        assert_eq!(value["fields"]["driver"], "github");
    }

    #[test]
    fn test_base_is_flattened_into_fields() {
        let mut record = AccountRecord::default();
        record.fields.base.id = "https://github.com/moul".to_string();
        record.fields.login = "moul".to_string();
        record.fields.avatar_url = "https://avatars.example/moul".to_string();

        let fields = record.fields_value();
        assert_eq!(fields["id"], "https://github.com/moul");
        assert_eq!(fields["login"], "moul");
        assert_eq!(fields["avatar-url"], "https://avatars.example/moul");
        assert!(fields.get("created-at").is_none());
        assert!(fields.get("base").is_none());
    }

    #[test]
    fn test_issue_relationships_survive_parse() {
        let mut issue = IssueRecord::default();
        issue.state = State::New;
        issue.fields.title = "crash on start".to_string();
        issue.fields.repository = vec!["recRepo".to_string()];
        issue.fields.milestone = vec!["recMilestone".to_string()];
        issue.fields.author = vec!["recAuthor".to_string()];
        issue.fields.labels = vec!["recBug".to_string(), "recUrgent".to_string()];
        issue.fields.assignees = vec!["recB".to_string(), "recA".to_string()];

        let parsed = IssueRecord::from_external_str(&issue.to_external_string()).unwrap();
        assert_eq!(parsed.state, State::Unsynced);
        assert_eq!(parsed.fields, issue.fields);
        assert_eq!(parsed.fields.labels, vec!["recBug", "recUrgent"]);
        assert_eq!(parsed.fields.assignees, vec!["recB", "recA"]);
    }

    #[test]
    fn test_parse_tolerates_missing_columns() {
        let record = RepositoryRecord::from_value(json!({
            "fields": {"title": "depviz", "is-fork": true, "owner": ["recOwner"]}
        }))
        .unwrap();
        assert_eq!(record.fields.title, "depviz");
        assert!(record.fields.is_fork);
        assert!(record.fields.provider.is_empty());
        assert_eq!(record.fields.owner, vec!["recOwner"]);
        assert!(record.fields.pushed_at.is_none());
    }

    #[test]
    fn test_resolve_relationships() {
        let mut repo = RepositoryRecord::default();
        repo.fields.provider = vec!["github".to_string()];
        repo.fields.owner = vec!["moul".to_string(), "recKept".to_string()];

        let rewritten = repo.resolve_relationships(|target, id| match (target, id) {
            (TableKind::Provider, "github") => Some("recProvider".to_string()),
            (TableKind::Account, "moul") => Some("recMoul".to_string()),
            _ => None,
        });

        assert_eq!(rewritten, 2);
        assert_eq!(repo.fields.provider, vec!["recProvider"]);
        assert_eq!(repo.fields.owner, vec!["recMoul", "recKept"]);
    }
}
