//! Background dispatch of API calls.
//!
//! The client's async methods can be awaited directly. This module offers
//! the callback-style alternative: a call is spawned on a tokio task and its
//! result arrives later, exactly once, as an [`ApiMessage`] on a channel.
//!
//! # Architecture
//!
//! 1. The caller creates a channel with [`create_task_channel`]
//! 2. Calls are spawned through the returned [`TaskSpawner`]
//! 3. Each spawned task sends one `ApiMessage` when its call completes
//! 4. The caller drains the receiver with `recv()` or `try_recv()`
//!
//! Completions arrive in whatever order the calls finish.

use tokio::sync::mpsc;
use tracing::debug;

use crate::api::error::ApiError;
use crate::api::transport::{HttpTransport, Transport};
use crate::api::types::{Comment, Epic, Label, Project, Story, Task, User, Workflow};
use crate::api::{ClubhouseClient, StoryParam, TaskParam};

type ApiResult<T> = Result<T, ApiError>;

/// Messages sent from background tasks to the receiver.
#[derive(Debug)]
pub enum ApiMessage {
    /// All epics
    EpicsFetched(ApiResult<Vec<Epic>>),

    /// All projects
    ProjectsFetched(ApiResult<Vec<Project>>),

    /// Stories in a project
    StoriesFetched {
        project_id: i64,
        result: ApiResult<Vec<Story>>,
    },

    /// A single story
    StoryFetched {
        story_id: i64,
        result: ApiResult<Story>,
    },

    /// Story search results
    StoriesFound(ApiResult<Vec<Story>>),

    /// Story update result
    StoryUpdated {
        story_id: i64,
        result: ApiResult<Story>,
    },

    /// Comment posted on a story
    CommentCreated {
        story_id: i64,
        result: ApiResult<Comment>,
    },

    /// Task marked complete
    TaskCompleted {
        story_id: i64,
        task_id: i64,
        result: ApiResult<Task>,
    },

    WorkflowsFetched(ApiResult<Vec<Workflow>>),

    UsersFetched(ApiResult<Vec<User>>),

    LabelsFetched(ApiResult<Vec<Label>>),
}

impl ApiMessage {
    /// Whether the underlying call failed.
    pub fn is_err(&self) -> bool {
        match self {
            ApiMessage::EpicsFetched(r) => r.is_err(),
            ApiMessage::ProjectsFetched(r) => r.is_err(),
            ApiMessage::StoriesFetched { result, .. } => result.is_err(),
            ApiMessage::StoryFetched { result, .. } => result.is_err(),
            ApiMessage::StoriesFound(r) => r.is_err(),
            ApiMessage::StoryUpdated { result, .. } => result.is_err(),
            ApiMessage::CommentCreated { result, .. } => result.is_err(),
            ApiMessage::TaskCompleted { result, .. } => result.is_err(),
            ApiMessage::WorkflowsFetched(r) => r.is_err(),
            ApiMessage::UsersFetched(r) => r.is_err(),
            ApiMessage::LabelsFetched(r) => r.is_err(),
        }
    }
}

/// Spawns API calls as background tasks.
///
/// Each method clones the client, spawns a tokio task, and sends the
/// result through the channel. A dropped receiver discards results.
#[derive(Debug)]
pub struct TaskSpawner<T = HttpTransport> {
    client: ClubhouseClient<T>,
    tx: mpsc::UnboundedSender<ApiMessage>,
}

impl<T: Clone> Clone for TaskSpawner<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            tx: self.tx.clone(),
        }
    }
}

impl<T> TaskSpawner<T>
where
    T: Transport + Clone + 'static,
{
    /// Create a TaskSpawner with the given client and channel sender.
    pub fn new(client: ClubhouseClient<T>, tx: mpsc::UnboundedSender<ApiMessage>) -> Self {
        Self { client, tx }
    }

    pub fn client(&self) -> &ClubhouseClient<T> {
        &self.client
    }

    fn dispatch<F, Fut>(&self, call: F)
    where
        F: FnOnce(ClubhouseClient<T>) -> Fut + Send + 'static,
        Fut: std::future::Future<Output = ApiMessage> + Send + 'static,
    {
        let tx = self.tx.clone();
        let client = self.client.clone();
        tokio::spawn(async move {
            let message = call(client).await;
            if tx.send(message).is_err() {
                debug!("Task receiver dropped, discarding result");
            }
        });
    }

    /// Spawn a task to list all epics.
    pub fn spawn_fetch_epics(&self) {
        self.dispatch(|client| async move { ApiMessage::EpicsFetched(client.list_epics().await) });
    }

    /// Spawn a task to list all projects.
    pub fn spawn_fetch_projects(&self) {
        self.dispatch(|client| async move {
            ApiMessage::ProjectsFetched(client.list_projects().await)
        });
    }

    /// Spawn a task to list the stories in a project.
    pub fn spawn_fetch_stories(&self, project_id: i64) {
        self.dispatch(move |client| async move {
            let result = client.list_stories(project_id).await;
            ApiMessage::StoriesFetched { project_id, result }
        });
    }

    /// Spawn a task to fetch a single story.
    pub fn spawn_fetch_story(&self, story_id: i64) {
        self.dispatch(move |client| async move {
            let result = client.get_story(story_id).await;
            ApiMessage::StoryFetched { story_id, result }
        });
    }

    /// Spawn a story search.
    pub fn spawn_search_stories(&self, params: Vec<StoryParam>) {
        self.dispatch(move |client| async move {
            ApiMessage::StoriesFound(client.search_stories(&params).await)
        });
    }

    /// Spawn a task to update a story.
    pub fn spawn_update_story(&self, story_id: i64, params: Vec<StoryParam>) {
        self.dispatch(move |client| async move {
            let result = client.update_story(story_id, &params).await;
            ApiMessage::StoryUpdated { story_id, result }
        });
    }

    /// Spawn a task to comment on a story.
    pub fn spawn_create_comment(&self, story_id: i64, text: String) {
        self.dispatch(move |client| async move {
            let result = client.create_comment(story_id, &text, &[]).await;
            ApiMessage::CommentCreated { story_id, result }
        });
    }

    /// Spawn a task to mark a story task complete.
    pub fn spawn_complete_task(&self, story_id: i64, task_id: i64) {
        self.dispatch(move |client| async move {
            let result = client
                .update_task(story_id, task_id, &[TaskParam::Complete(true)])
                .await;
            ApiMessage::TaskCompleted {
                story_id,
                task_id,
                result,
            }
        });
    }

    pub fn spawn_fetch_workflows(&self) {
        self.dispatch(|client| async move {
            ApiMessage::WorkflowsFetched(client.list_workflows().await)
        });
    }

    pub fn spawn_fetch_users(&self) {
        self.dispatch(|client| async move { ApiMessage::UsersFetched(client.list_users().await) });
    }

    pub fn spawn_fetch_labels(&self) {
        self.dispatch(|client| async move { ApiMessage::LabelsFetched(client.list_labels().await) });
    }
}

/// Create a new task channel and spawner for `client`.
///
/// Returns a tuple of (receiver, spawner).
pub fn create_task_channel<T>(
    client: ClubhouseClient<T>,
) -> (mpsc::UnboundedReceiver<ApiMessage>, TaskSpawner<T>)
where
    T: Transport + Clone + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel();
    (rx, TaskSpawner::new(client, tx))
}
