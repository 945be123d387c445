//! Typed optional arguments for Clubhouse API requests.
//!
//! Each resource has a closed set of parameters. A parameter resolves to a
//! single `(wire key, wire value)` pair, and a slice of parameters reduces
//! to the JSON object sent as the request body.

use serde_json::{json, Map, Value};

use super::types::{EpicState, Verb};

/// A JSON request body built from parameters.
pub type Params = Map<String, Value>;

/// A named optional argument contributing one key/value pair to a request body.
pub trait Param {
    /// The wire key and value of this parameter.
    fn param(&self) -> (&'static str, Value);
}

/// Reduce parameters left to right into a request body.
///
/// When two parameters share a wire key the later one wins.
pub fn to_params<P: Param>(params: &[P]) -> Params {
    params.iter().fold(Params::new(), |mut body, param| {
        let (key, value) = param.param();
        body.insert(key.to_string(), value);
        body
    })
}

/// Optional arguments for story calls.
#[derive(Debug, Clone, PartialEq)]
pub enum StoryParam {
    BeforeId(i64),
    FollowerIds(Vec<String>),
    OwnerIds(Vec<String>),
    Estimate(i64),
    AfterId(i64),
    StoryType(String),
    FileIds(Vec<i64>),
    /// Label names; sent as `[{"name": ...}]`.
    Labels(Vec<String>),
    ProjectId(i64),
    EpicId(i64),
    Name(String),
    Deadline(String),
    Description(String),
    Archived(bool),
    RequestedById(String),
    WorkflowStateId(i64),
}

impl Param for StoryParam {
    fn param(&self) -> (&'static str, Value) {
        match self {
            StoryParam::BeforeId(id) => ("before_id", json!(id)),
            StoryParam::FollowerIds(ids) => ("follower_ids", json!(ids)),
            StoryParam::OwnerIds(ids) => ("owner_ids", json!(ids)),
            StoryParam::Estimate(estimate) => ("estimate", json!(estimate)),
            StoryParam::AfterId(id) => ("after_id", json!(id)),
            StoryParam::StoryType(story_type) => ("story_type", json!(story_type)),
            StoryParam::FileIds(ids) => ("file_ids", json!(ids)),
            StoryParam::Labels(names) => (
                "labels",
                Value::Array(names.iter().map(|name| json!({ "name": name })).collect()),
            ),
            StoryParam::ProjectId(id) => ("project_id", json!(id)),
            StoryParam::EpicId(id) => ("epic_id", json!(id)),
            StoryParam::Name(name) => ("name", json!(name)),
            StoryParam::Deadline(deadline) => ("deadline", json!(deadline)),
            StoryParam::Description(description) => ("description", json!(description)),
            StoryParam::Archived(archived) => ("archived", json!(archived)),
            StoryParam::RequestedById(id) => ("requested_by_id", json!(id)),
            StoryParam::WorkflowStateId(id) => ("workflow_state_id", json!(id)),
        }
    }
}

/// Optional arguments for task calls.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskParam {
    Description(String),
    Complete(bool),
}

impl Param for TaskParam {
    fn param(&self) -> (&'static str, Value) {
        match self {
            TaskParam::Description(description) => ("description", json!(description)),
            TaskParam::Complete(complete) => ("complete", json!(complete)),
        }
    }
}

/// Optional arguments for comment calls.
#[derive(Debug, Clone, PartialEq)]
pub enum CommentParam {
    AuthorId(String),
    CreatedAt(String),
    ExternalId(String),
    UpdatedAt(String),
    Text(String),
}

impl Param for CommentParam {
    fn param(&self) -> (&'static str, Value) {
        match self {
            CommentParam::AuthorId(id) => ("author_id", json!(id)),
            CommentParam::CreatedAt(at) => ("created_at", json!(at)),
            CommentParam::ExternalId(id) => ("external_id", json!(id)),
            CommentParam::UpdatedAt(at) => ("updated_at", json!(at)),
            CommentParam::Text(text) => ("text", json!(text)),
        }
    }
}

/// Optional arguments for epic calls.
#[derive(Debug, Clone, PartialEq)]
pub enum EpicParam {
    BeforeId(i64),
    FollowerIds(Vec<String>),
    Deadline(String),
    OwnerIds(Vec<String>),
    Name(String),
    Archived(bool),
    Description(String),
    State(EpicState),
    AfterId(i64),
}

impl Param for EpicParam {
    fn param(&self) -> (&'static str, Value) {
        match self {
            EpicParam::BeforeId(id) => ("before_id", json!(id)),
            EpicParam::FollowerIds(ids) => ("follower_ids", json!(ids)),
            EpicParam::Deadline(deadline) => ("deadline", json!(deadline)),
            EpicParam::OwnerIds(ids) => ("owner_ids", json!(ids)),
            EpicParam::Name(name) => ("name", json!(name)),
            EpicParam::Archived(archived) => ("archived", json!(archived)),
            EpicParam::Description(description) => ("description", json!(description)),
            EpicParam::State(state) => ("state", json!(state.as_str())),
            EpicParam::AfterId(id) => ("after_id", json!(id)),
        }
    }
}

/// Optional arguments for project calls.
#[derive(Debug, Clone, PartialEq)]
pub enum ProjectParam {
    FollowerIds(Vec<String>),
    StartTime(String),
    Name(String),
    Description(String),
    CreatedAt(String),
    Color(String),
    ExternalId(String),
    UpdatedAt(String),
    Abbreviation(String),
    IterationLength(i64),
}

impl Param for ProjectParam {
    fn param(&self) -> (&'static str, Value) {
        match self {
            ProjectParam::FollowerIds(ids) => ("follower_ids", json!(ids)),
            ProjectParam::StartTime(at) => ("start_time", json!(at)),
            ProjectParam::Name(name) => ("name", json!(name)),
            ProjectParam::Description(description) => ("description", json!(description)),
            ProjectParam::CreatedAt(at) => ("created_at", json!(at)),
            ProjectParam::Color(color) => ("color", json!(color)),
            ProjectParam::ExternalId(id) => ("external_id", json!(id)),
            ProjectParam::UpdatedAt(at) => ("updated_at", json!(at)),
            ProjectParam::Abbreviation(abbreviation) => ("abbreviation", json!(abbreviation)),
            ProjectParam::IterationLength(weeks) => ("iteration_length", json!(weeks)),
        }
    }
}

/// Optional arguments for label calls.
#[derive(Debug, Clone, PartialEq)]
pub enum LabelParam {
    ExternalId(String),
    Name(String),
}

impl Param for LabelParam {
    fn param(&self) -> (&'static str, Value) {
        match self {
            LabelParam::ExternalId(id) => ("external_id", json!(id)),
            LabelParam::Name(name) => ("name", json!(name)),
        }
    }
}

/// Arguments for story-link calls.
#[derive(Debug, Clone, PartialEq)]
pub enum StoryLinkParam {
    Object(i64),
    Verb(Verb),
    Subject(i64),
}

impl Param for StoryLinkParam {
    fn param(&self) -> (&'static str, Value) {
        match self {
            StoryLinkParam::Object(id) => ("object", json!(id)),
            StoryLinkParam::Verb(verb) => ("verb", json!(verb.as_str())),
            StoryLinkParam::Subject(id) => ("subject", json!(id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_params_reduce_to_empty_body() {
        let params: Vec<StoryParam> = vec![];
        assert!(to_params(&params).is_empty());
    }

    #[test]
    fn test_duplicate_keys_last_wins() {
        let body = to_params(&[StoryParam::Name("a".into()), StoryParam::Name("b".into())]);
        assert_eq!(body.len(), 1);
        assert_eq!(body["name"], json!("b"));
    }

    #[test]
    fn test_reduction_is_ordered() {
        let forward = to_params(&[LabelParam::Name("first".into()), LabelParam::Name("second".into())]);
        let backward = to_params(&[LabelParam::Name("second".into()), LabelParam::Name("first".into())]);
        assert_eq!(forward["name"], json!("second"));
        assert_eq!(backward["name"], json!("first"));
    }

    #[test]
    fn test_distinct_keys_all_present() {
        let body = to_params(&[
            StoryParam::Name("Fix login".into()),
            StoryParam::ProjectId(7),
            StoryParam::Archived(false),
            StoryParam::FileIds(vec![1, 2]),
        ]);
        assert_eq!(
            Value::Object(body),
            json!({
                "name": "Fix login",
                "project_id": 7,
                "archived": false,
                "file_ids": [1, 2]
            })
        );
    }

    #[test]
    fn test_story_labels_sent_as_objects() {
        let (key, value) = StoryParam::Labels(vec!["backend".into(), "bug".into()]).param();
        assert_eq!(key, "labels");
        assert_eq!(value, json!([{ "name": "backend" }, { "name": "bug" }]));
    }

    #[test]
    fn test_epic_state_and_owner_keys() {
        assert_eq!(
            EpicParam::State(EpicState::InProgress).param(),
            ("state", json!("in progress"))
        );
        assert_eq!(
            EpicParam::OwnerIds(vec!["u-1".into()]).param(),
            ("owner_ids", json!(["u-1"]))
        );
    }

    #[test]
    fn test_story_link_verb_value() {
        assert_eq!(
            StoryLinkParam::Verb(Verb::RelatesTo).param(),
            ("verb", json!("relates to"))
        );
    }

    #[test]
    fn test_task_params() {
        let body = to_params(&[TaskParam::Complete(true), TaskParam::Description("write docs".into())]);
        assert_eq!(Value::Object(body), json!({ "complete": true, "description": "write docs" }));
    }

    #[test]
    fn test_comment_and_project_keys() {
        assert_eq!(CommentParam::AuthorId("u".into()).param().0, "author_id");
        assert_eq!(CommentParam::ExternalId("x".into()).param().0, "external_id");
        assert_eq!(ProjectParam::IterationLength(2).param(), ("iteration_length", json!(2)));
        assert_eq!(ProjectParam::StartTime("t".into()).param().0, "start_time");
    }
}
