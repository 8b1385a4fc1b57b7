//! Transport-agnostic request/response contract for the tree store.
//!
//! Raw request fields are validated here, before the store is touched:
//! ids must be UUIDs, names must satisfy the name rule and file types must be
//! `directory` or `cards`.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::application::services::TreeStore;
use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{DomainError, FileType, Node, NodeId, NodeName};

/// One operation requested by a collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum Request {
    List,
    Find {
        id: String,
    },
    Remove {
        id: String,
    },
    Add {
        id: String,
        #[serde(rename = "fileType")]
        file_type: String,
        name: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    BadRequest,
    NotFound,
    InternalServerError,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Response {
    Ok {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tree: Option<Node>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        node: Option<Node>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        parent: Option<NodeId>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<NodeId>,
    },
    Error {
        code: ErrorCode,
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        field: Option<String>,
    },
}

impl Response {
    fn success() -> Self {
        Response::Ok {
            tree: None,
            node: None,
            parent: None,
            id: None,
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Response::Ok { .. })
    }

    fn bad_request(message: impl Into<String>, field: Option<&str>) -> Self {
        Response::Error {
            code: ErrorCode::BadRequest,
            message: message.into(),
            field: field.map(str::to_string),
        }
    }
}

impl From<ApplicationError> for Response {
    fn from(err: ApplicationError) -> Self {
        match err {
            ApplicationError::Validation { field, message } => {
                Response::bad_request(message, Some(&field))
            }
            ApplicationError::Domain(DomainError::NotFound(id)) => Response::Error {
                code: ErrorCode::NotFound,
                message: format!("not found: {id}"),
                field: None,
            },
            ApplicationError::Domain(DomainError::CannotRemoveRoot) => {
                Response::bad_request("Cannot remove root directory!", None)
            }
            ApplicationError::Domain(DomainError::InvalidName { message, .. }) => {
                Response::bad_request(message, Some("name"))
            }
            ApplicationError::Domain(e @ DomainError::InvalidFileType(_)) => {
                Response::bad_request(e.to_string(), Some("fileType"))
            }
            ApplicationError::Domain(e) if e.is_invalid_argument() => {
                Response::bad_request(e.to_string(), None)
            }
            other => Response::Error {
                code: ErrorCode::InternalServerError,
                message: other.to_string(),
                field: None,
            },
        }
    }
}

/// Parse a request id field.
pub fn parse_id(raw: &str) -> ApplicationResult<NodeId> {
    Uuid::parse_str(raw).map_err(|_| ApplicationError::validation("id", "Invalid uuid"))
}

/// Parse a request name field.
pub fn parse_name(raw: &str) -> ApplicationResult<NodeName> {
    NodeName::parse(raw).map_err(|e| match e {
        DomainError::InvalidName { message, .. } => ApplicationError::validation("name", message),
        other => other.into(),
    })
}

/// Parse a request file type field.
pub fn parse_file_type(raw: &str) -> ApplicationResult<FileType> {
    raw.parse().map_err(|_| {
        ApplicationError::validation(
            "fileType",
            format!("Invalid enum value. Expected 'cards' | 'directory', received '{raw}'"),
        )
    })
}

fn execute(store: &TreeStore, request: Request) -> ApplicationResult<Response> {
    match request {
        Request::List => Ok(Response::Ok {
            tree: Some(Node::Directory(store.get_all())),
            node: None,
            parent: None,
            id: None,
        }),
        Request::Find { id } => {
            let located = store.find_by_id(parse_id(&id)?)?;
            Ok(Response::Ok {
                tree: None,
                node: Some(located.node),
                parent: located.parent,
                id: None,
            })
        }
        Request::Remove { id } => {
            store.delete(parse_id(&id)?)?;
            Ok(Response::success())
        }
        Request::Add {
            id,
            file_type,
            name,
        } => {
            let target = parse_id(&id)?;
            let file_type = parse_file_type(&file_type)?;
            let name = parse_name(&name)?;
            let new_id = store.insert(target, file_type, name)?;
            Ok(Response::Ok {
                tree: None,
                node: None,
                parent: None,
                id: Some(new_id),
            })
        }
    }
}

/// Execute one request against the store.
pub fn dispatch(store: &TreeStore, request: Request) -> Response {
    debug!("dispatch: {:?}", request);
    execute(store, request).unwrap_or_else(|e| {
        debug!("dispatch failed: {}", e);
        Response::from(e)
    })
}

/// Handle one JSON-encoded request and return the JSON-encoded response.
pub fn handle_json(store: &TreeStore, line: &str) -> String {
    let response = match serde_json::from_str::<Request>(line) {
        Ok(request) => dispatch(store, request),
        Err(e) => {
            warn!("malformed request: {}", e);
            Response::bad_request(format!("malformed request: {e}"), None)
        }
    };
    serde_json::to_string(&response).unwrap_or_else(|e| internal_error_json(&e.to_string()))
}

fn internal_error_json(message: &str) -> String {
    serde_json::json!({
        "status": "error",
        "code": ErrorCode::InternalServerError,
        "message": message,
    })
    .to_string()
}
