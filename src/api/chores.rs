use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{timestamp, Id, Query, Resource};

pub enum Chores {}

impl Resource for Chores {
    const PATH: &'static str = "/chores";

    type Item = Chore;
    type New = NewChore;
    type Patch = ChorePatch;
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Chore {
    pub id: Id,
    pub title: String,
    pub description: Option<String>,
    pub assignee: Option<String>,
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, deserialize_with = "timestamp::option::deserialize")]
    pub completed_at: Option<DateTime<Utc>>,
    pub category_id: Option<Id>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NewChore {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Id>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChorePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Id>,
}

impl ChorePatch {
    pub fn completed(completed: bool) -> Self {
        Self {
            completed: Some(completed),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChoreFilter {
    pub completed: Option<bool>,
    pub assignee: Option<String>,
}

impl From<&ChoreFilter> for Query {
    fn from(filter: &ChoreFilter) -> Self {
        Self::new()
            .opt("completed", filter.completed)
            .opt("assignee", filter.assignee.as_deref())
    }
}
