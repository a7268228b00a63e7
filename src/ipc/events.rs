use serde_json::Value;

use super::payload::{
    decode_description_edit, decode_item_id, decode_new_todo, decode_window_label, PayloadError,
};
use crate::model::{NewTodo, TodoItem};
use crate::AppResult;

pub const REQUEST_TODOS: &str = "requestTodos";
pub const CREATE_TODO: &str = "createTodo";
pub const DELETE_TODO: &str = "deleteTodo";
pub const REQUEST_SINGLE_ITEM: &str = "requestSingleItem";
pub const TOGGLE_TODO_COMPLETED: &str = "toggleTodoCompleted";
pub const EDIT_DESCRIPTION: &str = "editDescription";
pub const OPEN_ITEM_WINDOW: &str = "openItemWindow";
pub const CLOSE_WINDOW: &str = "close-window";

/// Every event name the backend listens to.
pub const INBOUND_EVENTS: &[&str] = &[
    REQUEST_TODOS,
    CREATE_TODO,
    DELETE_TODO,
    REQUEST_SINGLE_ITEM,
    TOGGLE_TODO_COMPLETED,
    EDIT_DESCRIPTION,
    OPEN_ITEM_WINDOW,
    CLOSE_WINDOW,
];

pub const RESPONSE_TODOS: &str = "responseTodos";
pub const RESPONSE_SINGLE_ITEM: &str = "responseSingleItem";
pub const FEEDBACK_CREATED: &str = "feedbackCreated";
pub const FEEDBACK_SAVED: &str = "feedbackSaved";
pub const TIME: &str = "time";

pub const CREATED_MESSAGE: &str = "Created!!!";

/// A decoded inbound event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    RequestTodos,
    CreateTodo(NewTodo),
    DeleteTodo(i64),
    RequestSingleItem(i64),
    ToggleTodoCompleted(i64),
    EditDescription { id: i64, description: String },
    OpenItemWindow(i64),
    CloseWindow { label: Option<String> },
}

impl Inbound {
    /// Decode the raw JSON `payload` delivered with the event `name`.
    pub fn decode(name: &str, payload: &str) -> Result<Self, PayloadError> {
        let request = match name {
            REQUEST_TODOS => Inbound::RequestTodos,
            CREATE_TODO => Inbound::CreateTodo(decode_new_todo(CREATE_TODO, payload)?),
            DELETE_TODO => Inbound::DeleteTodo(decode_item_id(DELETE_TODO, payload)?.into()),
            REQUEST_SINGLE_ITEM => {
                Inbound::RequestSingleItem(decode_item_id(REQUEST_SINGLE_ITEM, payload)?.into())
            }
            TOGGLE_TODO_COMPLETED => Inbound::ToggleTodoCompleted(
                decode_item_id(TOGGLE_TODO_COMPLETED, payload)?.into(),
            ),
            EDIT_DESCRIPTION => {
                let edit = decode_description_edit(EDIT_DESCRIPTION, payload)?;
                Inbound::EditDescription {
                    id: edit.0.into(),
                    description: edit.1,
                }
            }
            OPEN_ITEM_WINDOW => {
                Inbound::OpenItemWindow(decode_item_id(OPEN_ITEM_WINDOW, payload)?.into())
            }
            CLOSE_WINDOW => Inbound::CloseWindow {
                label: decode_window_label(payload),
            },
            other => return Err(PayloadError::UnknownEvent(other.to_string())),
        };
        Ok(request)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Inbound::RequestTodos => REQUEST_TODOS,
            Inbound::CreateTodo(_) => CREATE_TODO,
            Inbound::DeleteTodo(_) => DELETE_TODO,
            Inbound::RequestSingleItem(_) => REQUEST_SINGLE_ITEM,
            Inbound::ToggleTodoCompleted(_) => TOGGLE_TODO_COMPLETED,
            Inbound::EditDescription { .. } => EDIT_DESCRIPTION,
            Inbound::OpenItemWindow(_) => OPEN_ITEM_WINDOW,
            Inbound::CloseWindow { .. } => CLOSE_WINDOW,
        }
    }
}

/// An event the backend emits to the frontend.
///
/// List and item responses carry a JSON *string*; the frontend parses it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    Todos(String),
    SingleItem(String),
    FeedbackCreated,
    FeedbackSaved(i64),
    Time(String),
}

impl Outbound {
    #[allow(clippy::result_large_err)]
    pub fn todos(items: &[TodoItem]) -> AppResult<Self> {
        Ok(Outbound::Todos(serde_json::to_string(items)?))
    }

    #[allow(clippy::result_large_err)]
    pub fn single_item(item: &TodoItem) -> AppResult<Self> {
        Ok(Outbound::SingleItem(serde_json::to_string(item)?))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Outbound::Todos(_) => RESPONSE_TODOS,
            Outbound::SingleItem(_) => RESPONSE_SINGLE_ITEM,
            Outbound::FeedbackCreated => FEEDBACK_CREATED,
            Outbound::FeedbackSaved(_) => FEEDBACK_SAVED,
            Outbound::Time(_) => TIME,
        }
    }

    pub fn payload(&self) -> Value {
        match self {
            Outbound::Todos(json) | Outbound::SingleItem(json) => Value::String(json.clone()),
            Outbound::FeedbackCreated => Value::String(CREATED_MESSAGE.to_string()),
            Outbound::FeedbackSaved(id) => Value::from(*id),
            Outbound::Time(stamp) => Value::String(stamp.clone()),
        }
    }
}
