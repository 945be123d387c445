//! Route descriptors: the fixed mapping from an API operation to an HTTP
//! method, a path relative to the API base URL, and an optional JSON body.
//!
//! Only create, update, search and bulk operations carry a body.

use std::fmt;

use reqwest::Method;

use super::params::Params;

/// One API operation, ready to be executed.
pub trait Route: fmt::Debug + Send + Sync {
    /// The HTTP method.
    fn method(&self) -> Method;

    /// The path relative to the base URL, e.g. `stories/7/tasks`.
    fn path(&self) -> String;

    /// The path as individual segments, each percent-encoded on its own
    /// when appended to the base URL.
    fn segments(&self) -> Vec<String> {
        self.path().split('/').map(str::to_string).collect()
    }

    /// The JSON body, if this operation sends one.
    fn body(&self) -> Option<&Params> {
        None
    }
}

/// Epic operations.
#[derive(Debug, Clone, PartialEq)]
pub enum EpicRoute {
    Get { epic_id: i64 },
    Update { epic_id: i64, params: Params },
    Delete { epic_id: i64 },
    List,
    Create { params: Params },
}

impl Route for EpicRoute {
    fn method(&self) -> Method {
        match self {
            EpicRoute::Get { .. } | EpicRoute::List => Method::GET,
            EpicRoute::Update { .. } => Method::PUT,
            EpicRoute::Delete { .. } => Method::DELETE,
            EpicRoute::Create { .. } => Method::POST,
        }
    }

    fn path(&self) -> String {
        match self {
            EpicRoute::Get { epic_id }
            | EpicRoute::Update { epic_id, .. }
            | EpicRoute::Delete { epic_id } => format!("epics/{}", epic_id),
            EpicRoute::List | EpicRoute::Create { .. } => "epics".to_string(),
        }
    }

    fn body(&self) -> Option<&Params> {
        match self {
            EpicRoute::Update { params, .. } | EpicRoute::Create { params } => Some(params),
            _ => None,
        }
    }
}

/// Story, task and comment operations.
#[derive(Debug, Clone, PartialEq)]
pub enum StoryRoute {
    Get { story_id: i64 },
    Update { story_id: i64, params: Params },
    Create { params: Params },
    Delete { story_id: i64 },
    BulkUpdate { params: Params },
    Search { params: Params },
    GetTask { story_id: i64, task_id: i64 },
    CreateTask { story_id: i64, params: Params },
    UpdateTask { story_id: i64, task_id: i64, params: Params },
    DeleteTask { story_id: i64, task_id: i64 },
    GetComment { story_id: i64, comment_id: i64 },
    CreateComment { story_id: i64, params: Params },
    UpdateComment { story_id: i64, comment_id: i64, params: Params },
    DeleteComment { story_id: i64, comment_id: i64 },
}

impl Route for StoryRoute {
    fn method(&self) -> Method {
        match self {
            StoryRoute::Get { .. } | StoryRoute::GetTask { .. } | StoryRoute::GetComment { .. } => {
                Method::GET
            }
            StoryRoute::Update { .. }
            | StoryRoute::BulkUpdate { .. }
            | StoryRoute::UpdateTask { .. }
            | StoryRoute::UpdateComment { .. } => Method::PUT,
            StoryRoute::Create { .. }
            | StoryRoute::Search { .. }
            | StoryRoute::CreateTask { .. }
            | StoryRoute::CreateComment { .. } => Method::POST,
            StoryRoute::Delete { .. }
            | StoryRoute::DeleteTask { .. }
            | StoryRoute::DeleteComment { .. } => Method::DELETE,
        }
    }

    fn path(&self) -> String {
        match self {
            StoryRoute::Get { story_id }
            | StoryRoute::Update { story_id, .. }
            | StoryRoute::Delete { story_id } => format!("stories/{}", story_id),
            StoryRoute::Create { .. } => "stories".to_string(),
            StoryRoute::BulkUpdate { .. } => "stories/bulk".to_string(),
            StoryRoute::Search { .. } => "stories/search".to_string(),
            StoryRoute::CreateTask { story_id, .. } => format!("stories/{}/tasks", story_id),
            StoryRoute::GetTask { story_id, task_id }
            | StoryRoute::UpdateTask { story_id, task_id, .. }
            | StoryRoute::DeleteTask { story_id, task_id } => {
                format!("stories/{}/tasks/{}", story_id, task_id)
            }
            StoryRoute::CreateComment { story_id, .. } => format!("stories/{}/comments", story_id),
            StoryRoute::GetComment { story_id, comment_id }
            | StoryRoute::UpdateComment { story_id, comment_id, .. }
            | StoryRoute::DeleteComment { story_id, comment_id } => {
                format!("stories/{}/comments/{}", story_id, comment_id)
            }
        }
    }

    fn body(&self) -> Option<&Params> {
        match self {
            StoryRoute::Update { params, .. }
            | StoryRoute::Create { params }
            | StoryRoute::BulkUpdate { params }
            | StoryRoute::Search { params }
            | StoryRoute::CreateTask { params, .. }
            | StoryRoute::UpdateTask { params, .. }
            | StoryRoute::CreateComment { params, .. }
            | StoryRoute::UpdateComment { params, .. } => Some(params),
            StoryRoute::Get { .. }
            | StoryRoute::Delete { .. }
            | StoryRoute::GetTask { .. }
            | StoryRoute::DeleteTask { .. }
            | StoryRoute::GetComment { .. }
            | StoryRoute::DeleteComment { .. } => None,
        }
    }
}

/// Project operations.
#[derive(Debug, Clone, PartialEq)]
pub enum ProjectRoute {
    List,
    Create { params: Params },
    ListStories { project_id: i64 },
    Get { project_id: i64 },
    Update { project_id: i64, params: Params },
    Delete { project_id: i64 },
}

impl Route for ProjectRoute {
    fn method(&self) -> Method {
        match self {
            ProjectRoute::List | ProjectRoute::ListStories { .. } | ProjectRoute::Get { .. } => {
                Method::GET
            }
            ProjectRoute::Create { .. } => Method::POST,
            ProjectRoute::Update { .. } => Method::PUT,
            ProjectRoute::Delete { .. } => Method::DELETE,
        }
    }

    fn path(&self) -> String {
        match self {
            ProjectRoute::List | ProjectRoute::Create { .. } => "projects".to_string(),
            ProjectRoute::ListStories { project_id } => format!("projects/{}/stories", project_id),
            ProjectRoute::Get { project_id }
            | ProjectRoute::Update { project_id, .. }
            | ProjectRoute::Delete { project_id } => format!("projects/{}", project_id),
        }
    }

    fn body(&self) -> Option<&Params> {
        match self {
            ProjectRoute::Create { params } | ProjectRoute::Update { params, .. } => Some(params),
            _ => None,
        }
    }
}

/// Label operations.
#[derive(Debug, Clone, PartialEq)]
pub enum LabelRoute {
    List,
    Create { params: Params },
    Update { label_id: i64, params: Params },
    Delete { label_id: i64 },
}

impl Route for LabelRoute {
    fn method(&self) -> Method {
        match self {
            LabelRoute::List => Method::GET,
            LabelRoute::Create { .. } => Method::POST,
            LabelRoute::Update { .. } => Method::PUT,
            LabelRoute::Delete { .. } => Method::DELETE,
        }
    }

    fn path(&self) -> String {
        match self {
            LabelRoute::List | LabelRoute::Create { .. } => "labels".to_string(),
            LabelRoute::Update { label_id, .. } | LabelRoute::Delete { label_id } => {
                format!("labels/{}", label_id)
            }
        }
    }

    fn body(&self) -> Option<&Params> {
        match self {
            LabelRoute::Create { params } | LabelRoute::Update { params, .. } => Some(params),
            _ => None,
        }
    }
}

/// File operations.
#[derive(Debug, Clone, PartialEq)]
pub enum FileRoute {
    Get { file_id: i64 },
    Delete { file_id: i64 },
    List,
}

impl Route for FileRoute {
    fn method(&self) -> Method {
        match self {
            FileRoute::Get { .. } | FileRoute::List => Method::GET,
            FileRoute::Delete { .. } => Method::DELETE,
        }
    }

    fn path(&self) -> String {
        match self {
            FileRoute::Get { file_id } | FileRoute::Delete { file_id } => {
                format!("files/{}", file_id)
            }
            FileRoute::List => "files".to_string(),
        }
    }
}

/// User operations. Users are identified by UUID.
#[derive(Debug, Clone, PartialEq)]
pub enum UserRoute {
    List,
    Get { user_id: String },
}

impl Route for UserRoute {
    fn method(&self) -> Method {
        Method::GET
    }

    fn path(&self) -> String {
        match self {
            UserRoute::List => "users".to_string(),
            UserRoute::Get { user_id } => format!("users/{}", user_id),
        }
    }

    // The UUID is caller-supplied and must stay a single segment.
    fn segments(&self) -> Vec<String> {
        match self {
            UserRoute::List => vec!["users".to_string()],
            UserRoute::Get { user_id } => vec!["users".to_string(), user_id.clone()],
        }
    }
}

/// Workflow operations.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowRoute {
    List,
}

impl Route for WorkflowRoute {
    fn method(&self) -> Method {
        Method::GET
    }

    fn path(&self) -> String {
        "workflows".to_string()
    }
}

/// Story-link operations.
#[derive(Debug, Clone, PartialEq)]
pub enum StoryLinkRoute {
    Create { params: Params },
    Get { story_link_id: i64 },
    Delete { story_link_id: i64 },
}

impl Route for StoryLinkRoute {
    fn method(&self) -> Method {
        match self {
            StoryLinkRoute::Create { .. } => Method::POST,
            StoryLinkRoute::Get { .. } => Method::GET,
            StoryLinkRoute::Delete { .. } => Method::DELETE,
        }
    }

    fn path(&self) -> String {
        match self {
            StoryLinkRoute::Create { .. } => "story-links".to_string(),
            StoryLinkRoute::Get { story_link_id } | StoryLinkRoute::Delete { story_link_id } => {
                format!("story-links/{}", story_link_id)
            }
        }
    }

    fn body(&self) -> Option<&Params> {
        match self {
            StoryLinkRoute::Create { params } => Some(params),
            _ => None,
        }
    }
}
