use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A persisted todo row as the frontend sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow, TS)]
#[ts(export, export_to = "../ui/bindings/")]
pub struct TodoItem {
    #[ts(type = "number")]
    pub id: i64,
    pub title: String,
    pub description: String,
    pub completed: bool,
    #[serde(rename = "dueDate")]
    #[sqlx(rename = "dueDate")]
    pub due_date: String,
}

/// Fields accepted by the create operation. Missing fields default to empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewTodo {
    pub title: String,
    pub description: String,
    pub completed: bool,
    #[serde(rename = "dueDate")]
    pub due_date: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn todo_item_uses_frontend_field_names() {
        let item = TodoItem {
            id: 4,
            title: "Buy milk".into(),
            description: "2 litres".into(),
            completed: true,
            due_date: "2024-05-01".into(),
        };
        let value = serde_json::to_value(&item).expect("serialize item");
        assert_eq!(
            value,
            json!({
                "id": 4,
                "title": "Buy milk",
                "description": "2 litres",
                "completed": true,
                "dueDate": "2024-05-01"
            })
        );
    }

    #[test]
    fn new_todo_defaults_missing_fields() {
        let new: NewTodo = serde_json::from_value(json!({ "title": "A" })).expect("decode");
        assert_eq!(new.title, "A");
        assert_eq!(new.description, "");
        assert!(!new.completed);
        assert_eq!(new.due_date, "");
    }
}
