use serde::{Deserialize, Serialize};

use super::{Id, Resource};

pub enum TodoLists {}

impl Resource for TodoLists {
    const PATH: &'static str = "/lists";

    type Item = TodoList;
    type New = NewTodoList;
    type Patch = TodoListPatch;
}

/// Items of one list, mounted below `/lists/{id}/items`.
pub enum TodoItems {}

impl Resource for TodoItems {
    const PATH: &'static str = "/items";

    type Item = TodoItem;
    type New = NewTodoItem;
    type Patch = TodoItemPatch;
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TodoList {
    pub id: Id,
    pub title: String,
    pub color: Option<String>,
    pub category_id: Option<Id>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NewTodoList {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Id>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TodoListPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Id>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TodoItem {
    pub id: Id,
    pub list_id: Id,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub sort_order: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NewTodoItem {
    pub title: String,
    pub sort_order: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TodoItemPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i32>,
}
