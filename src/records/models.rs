//! Fields of the six record kinds, with their store column names

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Base, Record, RecordFields, RelationshipColumn};
use crate::tables::{Table, TableKind};

//
// provider
//

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderFields {
    #[serde(flatten)]
    pub base: Base,

    pub url: String,
    pub driver: String,
}

impl RecordFields for ProviderFields {
    const KIND: TableKind = TableKind::Provider;
    const RELATIONSHIPS: &'static [RelationshipColumn] = &[];

    fn base(&self) -> &Base {
        &self.base
    }

    fn links(&self) -> Vec<&Vec<String>> {
        Vec::new()
    }

    fn links_mut(&mut self) -> Vec<&mut Vec<String>> {
        Vec::new()
    }

    fn records(table: &Table) -> Option<&Vec<Record<Self>>> {
        match table {
            Table::Provider(records) => Some(records),
            _ => None,
        }
    }

    fn records_mut(table: &mut Table) -> Option<&mut Vec<Record<Self>>> {
        match table {
            Table::Provider(records) => Some(records),
            _ => None,
        }
    }
}

//
// label
//

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelFields {
    #[serde(flatten)]
    pub base: Base,

    pub url: String,
    pub name: String,
    pub color: String,
    pub description: String,
}

impl RecordFields for LabelFields {
    const KIND: TableKind = TableKind::Label;
    const RELATIONSHIPS: &'static [RelationshipColumn] = &[];

    fn base(&self) -> &Base {
        &self.base
    }

    fn links(&self) -> Vec<&Vec<String>> {
        Vec::new()
    }

    fn links_mut(&mut self) -> Vec<&mut Vec<String>> {
        Vec::new()
    }

    fn records(table: &Table) -> Option<&Vec<Record<Self>>> {
        match table {
            Table::Label(records) => Some(records),
            _ => None,
        }
    }

    fn records_mut(table: &mut Table) -> Option<&mut Vec<Record<Self>>> {
        match table {
            Table::Label(records) => Some(records),
            _ => None,
        }
    }
}

//
// account
//

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountFields {
    #[serde(flatten)]
    pub base: Base,

    pub url: String,
    pub login: String,
    #[serde(rename = "fullname")]
    pub full_name: String,
    #[serde(rename = "type")]
    pub account_type: String,
    pub bio: String,
    pub location: String,
    pub company: String,
    pub blog: String,
    pub email: String,
    #[serde(rename = "avatar-url")]
    pub avatar_url: String,

    // relationships
    pub provider: Vec<String>,
}

impl RecordFields for AccountFields {
    const KIND: TableKind = TableKind::Account;
    const RELATIONSHIPS: &'static [RelationshipColumn] = &[RelationshipColumn {
        column: "provider",
        target: TableKind::Provider,
    }];

    fn base(&self) -> &Base {
        &self.base
    }

    fn links(&self) -> Vec<&Vec<String>> {
        vec![&self.provider]
    }

    fn links_mut(&mut self) -> Vec<&mut Vec<String>> {
        vec![&mut self.provider]
    }

    fn records(table: &Table) -> Option<&Vec<Record<Self>>> {
        match table {
            Table::Account(records) => Some(records),
            _ => None,
        }
    }

    fn records_mut(table: &mut Table) -> Option<&mut Vec<Record<Self>>> {
        match table {
            Table::Account(records) => Some(records),
            _ => None,
        }
    }
}

//
// repository
//

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoryFields {
    #[serde(flatten)]
    pub base: Base,

    pub url: String,
    pub title: String,
    pub description: String,
    pub homepage: String,
    #[serde(rename = "pushed-at", skip_serializing_if = "Option::is_none")]
    pub pushed_at: Option<DateTime<Utc>>,
    #[serde(rename = "is-fork")]
    pub is_fork: bool,

    // relationships
    pub provider: Vec<String>,
    pub owner: Vec<String>,
}

impl RecordFields for RepositoryFields {
    const KIND: TableKind = TableKind::Repository;
    const RELATIONSHIPS: &'static [RelationshipColumn] = &[
        RelationshipColumn {
            column: "provider",
            target: TableKind::Provider,
        },
        RelationshipColumn {
            column: "owner",
            target: TableKind::Account,
        },
    ];

    fn base(&self) -> &Base {
        &self.base
    }

    fn links(&self) -> Vec<&Vec<String>> {
        vec![&self.provider, &self.owner]
    }

    fn links_mut(&mut self) -> Vec<&mut Vec<String>> {
        vec![&mut self.provider, &mut self.owner]
    }

    fn records(table: &Table) -> Option<&Vec<Record<Self>>> {
        match table {
            Table::Repository(records) => Some(records),
            _ => None,
        }
    }

    fn records_mut(table: &mut Table) -> Option<&mut Vec<Record<Self>>> {
        match table {
            Table::Repository(records) => Some(records),
            _ => None,
        }
    }
}

//
// milestone
//

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MilestoneFields {
    #[serde(flatten)]
    pub base: Base,

    pub url: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "closed-at", skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<DateTime<Utc>>,
    #[serde(rename = "due-on", skip_serializing_if = "Option::is_none")]
    pub due_on: Option<DateTime<Utc>>,

    // relationships
    pub creator: Vec<String>,
    pub repository: Vec<String>,
}

impl RecordFields for MilestoneFields {
    const KIND: TableKind = TableKind::Milestone;
    const RELATIONSHIPS: &'static [RelationshipColumn] = &[
        RelationshipColumn {
            column: "creator",
            target: TableKind::Account,
        },
        RelationshipColumn {
            column: "repository",
            target: TableKind::Repository,
        },
    ];

    fn base(&self) -> &Base {
        &self.base
    }

    fn links(&self) -> Vec<&Vec<String>> {
        vec![&self.creator, &self.repository]
    }

    fn links_mut(&mut self) -> Vec<&mut Vec<String>> {
        vec![&mut self.creator, &mut self.repository]
    }

    fn records(table: &Table) -> Option<&Vec<Record<Self>>> {
        match table {
            Table::Milestone(records) => Some(records),
            _ => None,
        }
    }

    fn records_mut(table: &mut Table) -> Option<&mut Vec<Record<Self>>> {
        match table {
            Table::Milestone(records) => Some(records),
            _ => None,
        }
    }
}

//
// issue
//

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IssueFields {
    #[serde(flatten)]
    pub base: Base,

    pub url: String,
    #[serde(rename = "completed-at", skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    pub title: String,
    /// Forge-side state ("open", "closed", ...), unrelated to the sync marker
    pub state: String,
    pub body: String,
    #[serde(rename = "is-pr")]
    pub is_pr: bool,
    #[serde(rename = "is-locked")]
    pub is_locked: bool,
    pub comments: i64,
    pub upvotes: i64,
    pub downvotes: i64,
    #[serde(rename = "is-orphan")]
    pub is_orphan: bool,
    #[serde(rename = "is-hidden")]
    pub is_hidden: bool,
    pub weight: i64,
    #[serde(rename = "is-epic")]
    pub is_epic: bool,
    #[serde(rename = "has-epic")]
    pub has_epic: bool,

    // relationships
    pub repository: Vec<String>,
    pub milestone: Vec<String>,
    pub author: Vec<String>,
    pub labels: Vec<String>,
    pub assignees: Vec<String>,
}

impl RecordFields for IssueFields {
    const KIND: TableKind = TableKind::Issue;
    const RELATIONSHIPS: &'static [RelationshipColumn] = &[
        RelationshipColumn {
            column: "repository",
            target: TableKind::Repository,
        },
        RelationshipColumn {
            column: "milestone",
            target: TableKind::Milestone,
        },
        RelationshipColumn {
            column: "author",
            target: TableKind::Account,
        },
        RelationshipColumn {
            column: "labels",
            target: TableKind::Label,
        },
        RelationshipColumn {
            column: "assignees",
            target: TableKind::Account,
        },
    ];

    fn base(&self) -> &Base {
        &self.base
    }

    fn links(&self) -> Vec<&Vec<String>> {
        vec![
            &self.repository,
            &self.milestone,
            &self.author,
            &self.labels,
            &self.assignees,
        ]
    }

    fn links_mut(&mut self) -> Vec<&mut Vec<String>> {
        vec![
            &mut self.repository,
            &mut self.milestone,
            &mut self.author,
            &mut self.labels,
            &mut self.assignees,
        ]
    }

    fn records(table: &Table) -> Option<&Vec<Record<Self>>> {
        match table {
            Table::Issue(records) => Some(records),
            _ => None,
        }
    }

    fn records_mut(table: &mut Table) -> Option<&mut Vec<Record<Self>>> {
        match table {
            Table::Issue(records) => Some(records),
            _ => None,
        }
    }
}
