use serde::{Deserialize, Serialize};

use super::{Id, Resource};

pub const CATEGORY_DEFAULT_COLOR: &str = "#6366f1";

pub enum Categories {}

impl Resource for Categories {
    const PATH: &'static str = "/categories";

    type Item = Category;
    type New = NewCategory;
    type Patch = CategoryPatch;
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Category {
    pub id: Id,
    pub name: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewCategory {
    pub name: String,
    pub color: String,
}

impl NewCategory {
    pub fn new(name: impl Into<String>, color: Option<String>) -> Self {
        Self {
            name: name.into(),
            color: color.unwrap_or_else(|| CATEGORY_DEFAULT_COLOR.to_owned()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}
