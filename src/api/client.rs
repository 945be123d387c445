//! Clubhouse API client.
//!
//! One async method per API operation. Each call builds a route from its
//! arguments, executes it, and decodes the payload into the declared
//! entity type. Transport failures are returned to the caller unchanged.

use std::sync::OnceLock;

use tracing::{debug, info, instrument};

use super::decode::{decode, decode_list, DecodePolicy, Entity};
use super::error::Result;
use super::executor::Executor;
use super::params::{
    to_params, CommentParam, EpicParam, LabelParam, ProjectParam, StoryLinkParam, StoryParam,
    TaskParam,
};
use super::routes::{
    EpicRoute, FileRoute, LabelRoute, ProjectRoute, Route, StoryLinkRoute, StoryRoute, UserRoute,
    WorkflowRoute,
};
use super::transport::{HttpTransport, Transport};
use super::types::{Comment, Epic, File, Label, Project, Story, StoryLink, Task, User, Verb, Workflow};
use crate::config::{Config, ConfigError};

/// The process-wide client installed by [`ClubhouseClient::configure`].
static SHARED: OnceLock<ClubhouseClient> = OnceLock::new();

/// The Clubhouse API client.
///
/// Cloning is cheap; clones share configuration and the HTTP connection pool.
/// Calls are independent and may run concurrently.
#[derive(Debug, Clone)]
pub struct ClubhouseClient<T = HttpTransport> {
    executor: Executor<T>,
}

impl ClubhouseClient<HttpTransport> {
    /// Create a client using the default HTTP transport.
    pub fn new(config: Config) -> Result<Self> {
        Ok(Self::with_transport(config, HttpTransport::new()?))
    }

    /// Install the process-wide client for `api_token`.
    ///
    /// # Errors
    ///
    /// Fails if the token is empty or a client was already configured.
    pub fn configure(api_token: &str) -> crate::Result<&'static Self> {
        let client = Self::new(Config::new(api_token)?)?;
        Self::configure_with(client)
    }

    /// Install an already-built client as the process-wide client.
    pub fn configure_with(client: Self) -> crate::Result<&'static Self> {
        SHARED
            .set(client)
            .map_err(|_| ConfigError::AlreadyConfigured)?;
        info!("Shared Clubhouse client configured");
        Ok(Self::shared())
    }

    /// The process-wide client.
    ///
    /// # Panics
    ///
    /// Panics if [`ClubhouseClient::configure`] has not been called. Using the
    /// API without a token is a programming error.
    pub fn shared() -> &'static Self {
        match SHARED.get() {
            Some(client) => client,
            None => panic!(
                "Clubhouse API token must be configured before use; call ClubhouseClient::configure first"
            ),
        }
    }

    /// The process-wide client, if one has been configured.
    pub fn try_shared() -> Option<&'static Self> {
        SHARED.get()
    }
}

impl<T: Transport> ClubhouseClient<T> {
    /// Create a client over a custom transport.
    pub fn with_transport(config: Config, transport: T) -> Self {
        Self {
            executor: Executor::new(config, transport),
        }
    }

    pub fn config(&self) -> &Config {
        self.executor.config()
    }

    fn policy(&self) -> DecodePolicy {
        self.config().decode_policy()
    }

    async fn fetch<E: Entity>(&self, route: &dyn Route) -> Result<E> {
        let value = self.executor.execute(route).await?;
        decode(value, self.policy())
    }

    async fn fetch_list<E: Entity>(&self, route: &dyn Route) -> Result<Vec<E>> {
        let value = self.executor.execute(route).await?;
        let entities = decode_list(value, self.policy())?;
        debug!("Decoded {} {} records", entities.len(), E::NAME);
        Ok(entities)
    }

    async fn send(&self, route: &dyn Route) -> Result<()> {
        self.executor.execute(route).await.map(|_| ())
    }

    // Epics

    /// Get an epic by id.
    #[instrument(skip(self))]
    pub async fn get_epic(&self, epic_id: i64) -> Result<Epic> {
        self.fetch(&EpicRoute::Get { epic_id }).await
    }

    /// List all epics.
    #[instrument(skip(self))]
    pub async fn list_epics(&self) -> Result<Vec<Epic>> {
        self.fetch_list(&EpicRoute::List).await
    }

    /// Create an epic. `name` takes precedence over any `EpicParam::Name`.
    #[instrument(skip(self))]
    pub async fn create_epic(&self, name: &str, params: &[EpicParam]) -> Result<Epic> {
        let mut params = params.to_vec();
        params.push(EpicParam::Name(name.to_string()));
        self.fetch(&EpicRoute::Create {
            params: to_params(&params),
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn update_epic(&self, epic_id: i64, params: &[EpicParam]) -> Result<Epic> {
        self.fetch(&EpicRoute::Update {
            epic_id,
            params: to_params(params),
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn delete_epic(&self, epic_id: i64) -> Result<()> {
        self.send(&EpicRoute::Delete { epic_id }).await
    }

    // Stories

    /// Get a story by id, including its tasks, comments and other nested records.
    #[instrument(skip(self))]
    pub async fn get_story(&self, story_id: i64) -> Result<Story> {
        self.fetch(&StoryRoute::Get { story_id }).await
    }

    /// Create a story in a project.
    #[instrument(skip(self))]
    pub async fn create_story(
        &self,
        name: &str,
        project_id: i64,
        params: &[StoryParam],
    ) -> Result<Story> {
        let mut params = params.to_vec();
        params.push(StoryParam::Name(name.to_string()));
        params.push(StoryParam::ProjectId(project_id));
        self.fetch(&StoryRoute::Create {
            params: to_params(&params),
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn update_story(&self, story_id: i64, params: &[StoryParam]) -> Result<Story> {
        self.fetch(&StoryRoute::Update {
            story_id,
            params: to_params(params),
        })
        .await
    }

    /// Apply the same changes to several stories at once.
    #[instrument(skip(self))]
    pub async fn update_stories(&self, story_ids: &[i64], params: &[StoryParam]) -> Result<()> {
        let mut body = to_params(params);
        body.insert("story_ids".to_string(), serde_json::json!(story_ids));
        self.send(&StoryRoute::BulkUpdate { params: body }).await
    }

    #[instrument(skip(self))]
    pub async fn delete_story(&self, story_id: i64) -> Result<()> {
        self.send(&StoryRoute::Delete { story_id }).await
    }

    /// Search stories; the parameters act as filters.
    #[instrument(skip(self))]
    pub async fn search_stories(&self, params: &[StoryParam]) -> Result<Vec<Story>> {
        self.fetch_list(&StoryRoute::Search {
            params: to_params(params),
        })
        .await
    }

    // Comments

    #[instrument(skip(self))]
    pub async fn get_comment(&self, story_id: i64, comment_id: i64) -> Result<Comment> {
        self.fetch(&StoryRoute::GetComment {
            story_id,
            comment_id,
        })
        .await
    }

    #[instrument(skip(self, text))]
    pub async fn create_comment(
        &self,
        story_id: i64,
        text: &str,
        params: &[CommentParam],
    ) -> Result<Comment> {
        let mut params = params.to_vec();
        params.push(CommentParam::Text(text.to_string()));
        self.fetch(&StoryRoute::CreateComment {
            story_id,
            params: to_params(&params),
        })
        .await
    }

    #[instrument(skip(self, text))]
    pub async fn update_comment(
        &self,
        story_id: i64,
        comment_id: i64,
        text: &str,
    ) -> Result<Comment> {
        self.fetch(&StoryRoute::UpdateComment {
            story_id,
            comment_id,
            params: to_params(&[CommentParam::Text(text.to_string())]),
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn delete_comment(&self, story_id: i64, comment_id: i64) -> Result<()> {
        self.send(&StoryRoute::DeleteComment {
            story_id,
            comment_id,
        })
        .await
    }

    // Tasks

    #[instrument(skip(self))]
    pub async fn get_task(&self, story_id: i64, task_id: i64) -> Result<Task> {
        self.fetch(&StoryRoute::GetTask { story_id, task_id }).await
    }

    #[instrument(skip(self))]
    pub async fn create_task(
        &self,
        story_id: i64,
        description: &str,
        params: &[TaskParam],
    ) -> Result<Task> {
        let mut params = params.to_vec();
        params.push(TaskParam::Description(description.to_string()));
        self.fetch(&StoryRoute::CreateTask {
            story_id,
            params: to_params(&params),
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn update_task(
        &self,
        story_id: i64,
        task_id: i64,
        params: &[TaskParam],
    ) -> Result<Task> {
        self.fetch(&StoryRoute::UpdateTask {
            story_id,
            task_id,
            params: to_params(params),
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn delete_task(&self, story_id: i64, task_id: i64) -> Result<()> {
        self.send(&StoryRoute::DeleteTask { story_id, task_id }).await
    }

    // Projects

    #[instrument(skip(self))]
    pub async fn list_projects(&self) -> Result<Vec<Project>> {
        self.fetch_list(&ProjectRoute::List).await
    }

    #[instrument(skip(self))]
    pub async fn get_project(&self, project_id: i64) -> Result<Project> {
        self.fetch(&ProjectRoute::Get { project_id }).await
    }

    #[instrument(skip(self))]
    pub async fn create_project(&self, name: &str, params: &[ProjectParam]) -> Result<Project> {
        let mut params = params.to_vec();
        params.push(ProjectParam::Name(name.to_string()));
        self.fetch(&ProjectRoute::Create {
            params: to_params(&params),
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn update_project(&self, project_id: i64, params: &[ProjectParam]) -> Result<Project> {
        self.fetch(&ProjectRoute::Update {
            project_id,
            params: to_params(params),
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn delete_project(&self, project_id: i64) -> Result<()> {
        self.send(&ProjectRoute::Delete { project_id }).await
    }

    /// List the stories in a project.
    #[instrument(skip(self))]
    pub async fn list_stories(&self, project_id: i64) -> Result<Vec<Story>> {
        self.fetch_list(&ProjectRoute::ListStories { project_id }).await
    }

    // Labels

    #[instrument(skip(self))]
    pub async fn list_labels(&self) -> Result<Vec<Label>> {
        self.fetch_list(&LabelRoute::List).await
    }

    /// Create a label. A `LabelParam::Name` in `params` overrides `name`.
    #[instrument(skip(self))]
    pub async fn create_label(&self, name: &str, params: &[LabelParam]) -> Result<Label> {
        let mut all = vec![LabelParam::Name(name.to_string())];
        all.extend_from_slice(params);
        self.fetch(&LabelRoute::Create {
            params: to_params(&all),
        })
        .await
    }

    /// Rename a label.
    #[instrument(skip(self))]
    pub async fn update_label(&self, label_id: i64, name: &str) -> Result<Label> {
        self.fetch(&LabelRoute::Update {
            label_id,
            params: to_params(&[LabelParam::Name(name.to_string())]),
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn delete_label(&self, label_id: i64) -> Result<()> {
        self.send(&LabelRoute::Delete { label_id }).await
    }

    // Files

    #[instrument(skip(self))]
    pub async fn get_file(&self, file_id: i64) -> Result<File> {
        self.fetch(&FileRoute::Get { file_id }).await
    }

    #[instrument(skip(self))]
    pub async fn list_files(&self) -> Result<Vec<File>> {
        self.fetch_list(&FileRoute::List).await
    }

    #[instrument(skip(self))]
    pub async fn delete_file(&self, file_id: i64) -> Result<()> {
        self.send(&FileRoute::Delete { file_id }).await
    }

    // Users

    #[instrument(skip(self))]
    pub async fn list_users(&self) -> Result<Vec<User>> {
        self.fetch_list(&UserRoute::List).await
    }

    /// Get a user by UUID.
    #[instrument(skip(self))]
    pub async fn get_user(&self, user_id: &str) -> Result<User> {
        self.fetch(&UserRoute::Get {
            user_id: user_id.to_string(),
        })
        .await
    }

    // Workflows

    #[instrument(skip(self))]
    pub async fn list_workflows(&self) -> Result<Vec<Workflow>> {
        self.fetch_list(&WorkflowRoute::List).await
    }

    // Story links

    /// Link two stories: `subject` <verb> `object`.
    #[instrument(skip(self))]
    pub async fn create_story_link(&self, object: i64, verb: Verb, subject: i64) -> Result<StoryLink> {
        let params = [
            StoryLinkParam::Object(object),
            StoryLinkParam::Subject(subject),
            StoryLinkParam::Verb(verb),
        ];
        self.fetch(&StoryLinkRoute::Create {
            params: to_params(&params),
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn get_story_link(&self, story_link_id: i64) -> Result<StoryLink> {
        self.fetch(&StoryLinkRoute::Get { story_link_id }).await
    }

    #[instrument(skip(self))]
    pub async fn delete_story_link(&self, story_link_id: i64) -> Result<()> {
        self.send(&StoryLinkRoute::Delete { story_link_id }).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::error::ApiError;
    use crate::api::transport::testing::StubTransport;
    use crate::api::types::EpicState;
    use reqwest::Method;
    use serde_json::json;

    fn client(transport: StubTransport) -> ClubhouseClient<StubTransport> {
        ClubhouseClient::with_transport(Config::new("t1").unwrap(), transport)
    }

    #[tokio::test]
    async fn test_get_epic_decodes_payload() {
        let transport =
            StubTransport::returning(json!({ "id": 42, "name": "Launch", "stat": "in progress" }));
        let epic = client(transport.clone()).get_epic(42).await.unwrap();

        assert_eq!(epic.id, 42);
        assert_eq!(epic.name, "Launch");
        assert_eq!(epic.epic_state(), Some(EpicState::InProgress));

        let requests = transport.requests();
        assert_eq!(requests[0].method, Method::GET);
        assert_eq!(requests[0].url.as_str(), "https://api.clubhouse.io/api/v1/epics/42?token=t1");
    }

    #[tokio::test]
    async fn test_create_epic_required_name_wins() {
        let transport = StubTransport::returning(json!({ "id": 1, "name": "Real" }));
        client(transport.clone())
            .create_epic(
                "Real",
                &[EpicParam::Name("Ignored".into()), EpicParam::State(EpicState::ToDo)],
            )
            .await
            .unwrap();

        let body = transport.requests()[0].body.clone().unwrap();
        assert_eq!(body, json!({ "name": "Real", "state": "to do" }));
    }

    #[tokio::test]
    async fn test_create_label_optional_name_wins() {
        let transport = StubTransport::returning(json!({ "id": 1, "name": "override" }));
        client(transport.clone())
            .create_label("base", &[LabelParam::Name("override".into())])
            .await
            .unwrap();

        let body = transport.requests()[0].body.clone().unwrap();
        assert_eq!(body, json!({ "name": "override" }));
    }

    #[tokio::test]
    async fn test_create_story_sends_required_fields() {
        let transport = StubTransport::returning(json!({ "id": 99, "name": "New" }));
        let story = client(transport.clone())
            .create_story("New", 4, &[StoryParam::StoryType("bug".into())])
            .await
            .unwrap();
        assert_eq!(story.id, 99);

        let request = &transport.requests()[0];
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.path(), "/api/v1/stories");
        assert_eq!(
            request.body,
            Some(json!({ "name": "New", "project_id": 4, "story_type": "bug" }))
        );
    }

    #[tokio::test]
    async fn test_update_stories_sends_ids() {
        let transport = StubTransport::returning(serde_json::Value::Null);
        client(transport.clone())
            .update_stories(&[1, 2, 3], &[StoryParam::Archived(true)])
            .await
            .unwrap();

        let request = &transport.requests()[0];
        assert_eq!(request.method, Method::PUT);
        assert_eq!(request.path(), "/api/v1/stories/bulk");
        assert_eq!(request.body, Some(json!({ "archived": true, "story_ids": [1, 2, 3] })));
    }

    #[tokio::test]
    async fn test_search_stories_returns_list() {
        let transport = StubTransport::returning(json!([{ "id": 1 }, { "id": 2, "name": "B" }]));
        let stories = client(transport.clone())
            .search_stories(&[StoryParam::ProjectId(4)])
            .await
            .unwrap();

        assert_eq!(stories.len(), 2);
        assert_eq!(stories[1].title(), "B");
        assert_eq!(transport.requests()[0].body, Some(json!({ "project_id": 4 })));
    }

    #[tokio::test]
    async fn test_task_and_comment_bodies() {
        let transport = StubTransport::returning(json!({ "id": 5 }));
        let client = client(transport.clone());

        client.create_task(7, "write tests", &[TaskParam::Complete(false)]).await.unwrap();
        client.update_comment(7, 9, "edited").await.unwrap();
        client.create_comment(7, "hello", &[CommentParam::AuthorId("u-1".into())]).await.unwrap();

        let requests = transport.requests();
        assert_eq!(requests[0].path(), "/api/v1/stories/7/tasks");
        assert_eq!(requests[0].body, Some(json!({ "complete": false, "description": "write tests" })));
        assert_eq!(requests[1].path(), "/api/v1/stories/7/comments/9");
        assert_eq!(requests[1].body, Some(json!({ "text": "edited" })));
        assert_eq!(requests[2].body, Some(json!({ "author_id": "u-1", "text": "hello" })));
    }

    #[tokio::test]
    async fn test_create_story_link_body() {
        let transport = StubTransport::returning(json!({ "id": 3, "object": 1, "subject": 2, "verb": "blocks" }));
        let link = client(transport.clone())
            .create_story_link(1, Verb::Blocks, 2)
            .await
            .unwrap();
        assert_eq!(link.verb, Some(Verb::Blocks));
        assert_eq!(
            transport.requests()[0].body,
            Some(json!({ "object": 1, "subject": 2, "verb": "blocks" }))
        );
    }

    #[tokio::test]
    async fn test_delete_has_no_body_and_ignores_payload() {
        let transport = StubTransport::returning(serde_json::Value::Null);
        client(transport.clone()).delete_story(3).await.unwrap();

        let request = &transport.requests()[0];
        assert_eq!(request.method, Method::DELETE);
        assert!(request.body.is_none());
    }

    #[tokio::test]
    async fn test_non_object_payload_is_invalid_response() {
        let transport = StubTransport::returning(json!("unexpected"));
        let err = client(transport).get_story(1).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_non_array_payload_is_invalid_response() {
        let transport = StubTransport::returning(json!({ "id": 1 }));
        let err = client(transport).list_projects().await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_transport_failure_surfaces_unchanged() {
        let transport = StubTransport::new(|_| Err(ApiError::NotFound("/api/v1/files/8".into())));
        let err = client(transport).get_file(8).await.unwrap_err();
        match err {
            ApiError::NotFound(path) => assert_eq!(path, "/api/v1/files/8"),
            other => panic!("Expected NotFound error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_strict_policy_rejects_incomplete_entity() {
        let transport = StubTransport::returning(json!({ "id": 5, "name": "Widget" }));
        let config = Config::new("t1").unwrap().with_decode_policy(DecodePolicy::Strict);
        let client = ClubhouseClient::with_transport(config, transport);

        let err = client.get_project(5).await.unwrap_err();
        assert!(matches!(err, ApiError::Decode { entity: "Project", .. }));
    }

    #[tokio::test]
    async fn test_get_user_by_uuid() {
        let transport = StubTransport::returning(json!({ "id": "abc-123", "name": "Ada", "username": "ada" }));
        let user = client(transport.clone()).get_user("abc-123").await.unwrap();
        assert_eq!(user.id, "abc-123");
        assert_eq!(transport.requests()[0].path(), "/api/v1/users/abc-123");
    }
}
