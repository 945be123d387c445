//! Clubhouse API entities.
//!
//! Entities are decoded from API responses and never constructed directly.
//! Field names follow the wire keys. Where the API has been seen using a
//! misspelled key (`stat`, `respository`, `titltle`, `commnts`) the entity
//! lists it in [`Entity::ALIASES`] and decoding maps it onto the correct key.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::decode::{lenient, Entity, Field, Kind};

/// Declares the strict-mode required fields of an entity, and optionally
/// the misspelled keys it accepts.
macro_rules! entity {
    (
        $ty:ident { $($($key:literal)|+ => $kind:ident),* $(,)? }
        $(aliases { $($alias:literal => $canonical:literal),* $(,)? })?
    ) => {
        impl Entity for $ty {
            const NAME: &'static str = stringify!($ty);
            const REQUIRED: &'static [Field] = &[$(Field::new(&[$($key),+], Kind::$kind)),*];
            $(const ALIASES: &'static [(&'static str, &'static str)] = &[$(($alias, $canonical)),*];)?
        }
    };
}

/// The kind of a story.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoryType {
    Feature,
    Bug,
    Chore,
}

impl StoryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoryType::Feature => "feature",
            StoryType::Bug => "bug",
            StoryType::Chore => "chore",
        }
    }
}

impl fmt::Display for StoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How two stories in a story link relate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verb {
    #[serde(rename = "blocks")]
    Blocks,
    #[serde(rename = "duplicates")]
    Duplicates,
    #[serde(rename = "relates to")]
    RelatesTo,
}

impl Verb {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Blocks => "blocks",
            Verb::Duplicates => "duplicates",
            Verb::RelatesTo => "relates to",
        }
    }

    /// Parse a wire value such as `"relates to"`.
    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "blocks" => Some(Verb::Blocks),
            "duplicates" => Some(Verb::Duplicates),
            "relates to" => Some(Verb::RelatesTo),
            _ => None,
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Workflow state of an epic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EpicState {
    #[serde(rename = "to do")]
    ToDo,
    #[serde(rename = "in progress")]
    InProgress,
    #[serde(rename = "done")]
    Done,
}

impl EpicState {
    pub fn as_str(&self) -> &'static str {
        match self {
            EpicState::ToDo => "to do",
            EpicState::InProgress => "in progress",
            EpicState::Done => "done",
        }
    }

    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "to do" => Some(EpicState::ToDo),
            "in progress" => Some(EpicState::InProgress),
            "done" => Some(EpicState::Done),
            _ => None,
        }
    }
}

impl fmt::Display for EpicState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A VCS branch attached to a story.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
#[non_exhaustive]
pub struct Branch {
    #[serde(deserialize_with = "lenient::or_default")]
    pub repository: RepoSlim,
    #[serde(deserialize_with = "lenient::optional")]
    pub repository_name: Option<String>,
    #[serde(deserialize_with = "lenient::optional")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient::boolean")]
    pub deleted: bool,
    #[serde(deserialize_with = "lenient::boolean")]
    pub persistent: bool,
    #[serde(deserialize_with = "lenient::date")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "lenient::list")]
    pub pull_requests: Option<Vec<PullRequest>>,
    #[serde(deserialize_with = "lenient::date")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "lenient::list")]
    pub merges: Option<Vec<BranchSlim>>,
    #[serde(deserialize_with = "lenient::string")]
    pub url: String,
    #[serde(deserialize_with = "lenient::int")]
    pub id: i64,
}

entity!(Branch {
    "id" => Int,
    "url" => Str,
    "deleted" => Bool,
    "persistent" => Bool,
} aliases {
    "respository" => "repository",
});

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
#[non_exhaustive]
pub struct BranchSlim {
    #[serde(deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(deserialize_with = "lenient::boolean")]
    pub deleted: bool,
    #[serde(deserialize_with = "lenient::int")]
    pub id: i64,
    #[serde(deserialize_with = "lenient::boolean")]
    pub persistent: bool,
}

entity!(BranchSlim { "id" => Int, "name" => Str, "deleted" => Bool, "persistent" => Bool });

/// A directed relationship between two stories.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
#[non_exhaustive]
pub struct StoryLink {
    #[serde(deserialize_with = "lenient::int")]
    pub id: i64,
    #[serde(deserialize_with = "lenient::date")]
    pub created_at: Option<DateTime<Utc>>,
    /// The story being acted upon.
    #[serde(deserialize_with = "lenient::int")]
    pub object: i64,
    #[serde(deserialize_with = "lenient::date")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "lenient::optional")]
    pub verb: Option<Verb>,
    /// The story doing the acting.
    #[serde(deserialize_with = "lenient::int")]
    pub subject: i64,
    #[serde(deserialize_with = "lenient::optional")]
    pub description: Option<String>,
}

entity!(StoryLink { "id" => Int, "object" => Int, "subject" => Int });

/// A comment on a story.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
#[non_exhaustive]
pub struct Comment {
    #[serde(deserialize_with = "lenient::int")]
    pub id: i64,
    #[serde(deserialize_with = "lenient::int")]
    pub story_id: i64,
    #[serde(deserialize_with = "lenient::date")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "lenient::date")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "lenient::optional")]
    pub text: Option<String>,
    #[serde(deserialize_with = "lenient::int")]
    pub position: i64,
    #[serde(deserialize_with = "lenient::optional")]
    pub author_id: Option<String>,
}

entity!(Comment { "id" => Int, "story_id" => Int, "position" => Int });

/// A commit attached to a story.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
#[non_exhaustive]
pub struct Commit {
    #[serde(deserialize_with = "lenient::or_default")]
    pub repository: RepoSlim,
    #[serde(deserialize_with = "lenient::or_default")]
    pub author_identity: IdentitySlim,
    #[serde(deserialize_with = "lenient::string")]
    pub author_email: String,
    #[serde(deserialize_with = "lenient::or_default")]
    pub author: UserSlim,
    #[serde(deserialize_with = "lenient::string")]
    pub message: String,
    #[serde(deserialize_with = "lenient::string")]
    pub hash: String,
    #[serde(deserialize_with = "lenient::date")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "lenient::date")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "lenient::date")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "lenient::string")]
    pub url: String,
    #[serde(deserialize_with = "lenient::int")]
    pub id: i64,
}

entity!(Commit {
    "id" => Int,
    "hash" => Str,
    "message" => Str,
    "author_email" => Str,
    "url" => Str,
});

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
#[non_exhaustive]
pub struct Email {
    #[serde(deserialize_with = "lenient::string")]
    pub email_address: String,
    #[serde(deserialize_with = "lenient::date")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "lenient::boolean")]
    pub confirmed: bool,
    #[serde(deserialize_with = "lenient::date")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "lenient::boolean")]
    pub primary: bool,
    #[serde(deserialize_with = "lenient::string")]
    pub id: String,
}

entity!(Email {
    "id" => Str,
    "email_address" => Str,
    "confirmed" => Bool,
    "primary" => Bool,
});

/// A collection of stories.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
#[non_exhaustive]
pub struct Epic {
    #[serde(deserialize_with = "lenient::int")]
    pub id: i64,
    #[serde(deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(deserialize_with = "lenient::date")]
    pub deadline: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "lenient::optional")]
    pub position: Option<i64>,
    #[serde(deserialize_with = "lenient::list")]
    pub comments: Option<Vec<ThreadedComment>>,
    #[serde(deserialize_with = "lenient::boolean")]
    pub archived: bool,
    #[serde(deserialize_with = "lenient::string")]
    pub description: String,
    /// Raw state, e.g. `"in progress"`. See [`Epic::epic_state`].
    #[serde(deserialize_with = "lenient::string")]
    pub state: String,
    #[serde(deserialize_with = "lenient::optional")]
    pub owner_ids: Option<Vec<String>>,
    #[serde(deserialize_with = "lenient::date")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "lenient::date")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "lenient::list")]
    pub followers: Option<Vec<UserSlim>>,
}

entity!(Epic {
    "id" => Int,
    "name" => Str,
    "archived" => Bool,
    "description" => Str,
    "state" => Str,
} aliases {
    "stat" => "state",
});

impl Epic {
    /// The state as a known variant, if it is one.
    pub fn epic_state(&self) -> Option<EpicState> {
        EpicState::from_wire(&self.state)
    }
}

impl fmt::Display for Epic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}: {}", self.id, self.name)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
#[non_exhaustive]
pub struct EpicSlim {
    #[serde(deserialize_with = "lenient::int")]
    pub id: i64,
}

entity!(EpicSlim { "id" => Int });

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
#[non_exhaustive]
pub struct Estimate {
    #[serde(deserialize_with = "lenient::int")]
    pub value: i64,
    #[serde(deserialize_with = "lenient::int")]
    pub id: i64,
}

entity!(Estimate { "id" => Int, "value" => Int });

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
#[non_exhaustive]
pub struct EstimateScale {
    #[serde(deserialize_with = "lenient::list")]
    pub estimates: Option<Vec<Estimate>>,
    #[serde(deserialize_with = "lenient::optional")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient::int")]
    pub id: i64,
}

entity!(EstimateScale { "id" => Int });

/// An uploaded file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
#[non_exhaustive]
pub struct File {
    #[serde(deserialize_with = "lenient::int")]
    pub id: i64,
    #[serde(deserialize_with = "lenient::string")]
    pub url: String,
    #[serde(deserialize_with = "lenient::optional")]
    pub file_name: Option<String>,
    #[serde(deserialize_with = "lenient::optional")]
    pub thumbnail_url: Option<String>,
    #[serde(deserialize_with = "lenient::optional")]
    pub size: Option<i64>,
    #[serde(deserialize_with = "lenient::optional")]
    pub content_type: Option<String>,
    #[serde(deserialize_with = "lenient::date")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "lenient::or_default")]
    pub uploader: UserSlim,
}

entity!(File { "id" => Int, "url" => Str });

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
#[non_exhaustive]
pub struct IdentitySlim {
    #[serde(deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(rename = "type", deserialize_with = "lenient::string")]
    pub kind: String,
}

entity!(IdentitySlim { "name" => Str, "type" => Str });

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
#[non_exhaustive]
pub struct Integration {
    #[serde(deserialize_with = "lenient::boolean")]
    pub disabled: bool,
    #[serde(deserialize_with = "lenient::optional")]
    pub webhook_url: Option<String>,
    #[serde(deserialize_with = "lenient::date")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "lenient::date")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(rename = "type", deserialize_with = "lenient::optional")]
    pub kind: Option<String>,
    #[serde(deserialize_with = "lenient::int")]
    pub id: i64,
}

entity!(Integration { "id" => Int, "disabled" => Bool });

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
#[non_exhaustive]
pub struct Label {
    #[serde(deserialize_with = "lenient::int")]
    pub id: i64,
    #[serde(deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(deserialize_with = "lenient::optional")]
    pub external_id: Option<String>,
    #[serde(deserialize_with = "lenient::date")]
    pub updated_at: Option<DateTime<Utc>>,
}

entity!(Label { "id" => Int, "name" => Str } aliases { "updatedAt" => "updated_at" });

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
#[non_exhaustive]
pub struct LabelSlim {
    #[serde(deserialize_with = "lenient::string")]
    pub name: String,
}

entity!(LabelSlim { "name" => Str });

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
#[non_exhaustive]
pub struct Organization {
    #[serde(deserialize_with = "lenient::boolean")]
    pub locked_out: bool,
    #[serde(deserialize_with = "lenient::boolean")]
    pub disabled: bool,
    #[serde(deserialize_with = "lenient::optional")]
    pub location: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(deserialize_with = "lenient::boolean")]
    pub beta: bool,
    #[serde(deserialize_with = "lenient::optional")]
    pub public_url: Option<String>,
    #[serde(deserialize_with = "lenient::or_default")]
    pub estimate_scale: EstimateScale,
    #[serde(deserialize_with = "lenient::optional")]
    pub signup_domain: Option<String>,
    #[serde(deserialize_with = "lenient::list")]
    pub integrations: Option<Vec<Integration>>,
    #[serde(deserialize_with = "lenient::optional")]
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient::optional")]
    pub url_slug: Option<String>,
}

entity!(Organization {
    "name" => Str,
    "locked_out" => Bool,
    "disabled" => Bool,
    "beta" => Bool,
});

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
#[non_exhaustive]
pub struct PullRequest {
    #[serde(deserialize_with = "lenient::boolean")]
    pub closed: bool,
    #[serde(deserialize_with = "lenient::int")]
    pub num_added: i64,
    #[serde(deserialize_with = "lenient::int")]
    pub number: i64,
    #[serde(deserialize_with = "lenient::int")]
    pub num_commits: i64,
    #[serde(deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(deserialize_with = "lenient::date")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "lenient::int")]
    pub id: i64,
    #[serde(deserialize_with = "lenient::string")]
    pub url: String,
    #[serde(deserialize_with = "lenient::int")]
    pub num_removed: i64,
    #[serde(deserialize_with = "lenient::int")]
    pub num_modified: i64,
    #[serde(deserialize_with = "lenient::date")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "lenient::or_default")]
    pub target_branch: BranchSlim,
}

entity!(PullRequest {
    "id" => Int,
    "number" => Int,
    "title" => Str,
    "url" => Str,
    "closed" => Bool,
} aliases {
    "titltle" => "title",
});

/// A project groups stories by team or product area.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
#[non_exhaustive]
pub struct Project {
    #[serde(deserialize_with = "lenient::int")]
    pub id: i64,
    #[serde(deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(deserialize_with = "lenient::date")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "lenient::boolean")]
    pub archived: bool,
    #[serde(deserialize_with = "lenient::string")]
    pub description: String,
    #[serde(deserialize_with = "lenient::optional")]
    pub days_to_thermometer: Option<i64>,
    #[serde(deserialize_with = "lenient::date")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "lenient::string")]
    pub color: String,
    #[serde(deserialize_with = "lenient::date")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "lenient::optional")]
    pub abbreviation: Option<String>,
    #[serde(deserialize_with = "lenient::boolean")]
    pub show_thermometer: bool,
    #[serde(deserialize_with = "lenient::list")]
    pub followers: Option<Vec<UserSlim>>,
    #[serde(deserialize_with = "lenient::optional")]
    pub iteration_length: Option<i64>,
    #[serde(deserialize_with = "lenient::or_default")]
    pub organization: Organization,
}

entity!(Project {
    "id" => Int,
    "name" => Str,
    "archived" => Bool,
    "description" => Str,
    "color" => Str,
    "show_thermometer" => Bool,
});

impl fmt::Display for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}: {}", self.id, self.name)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
#[non_exhaustive]
pub struct RepoSlim {
    #[serde(deserialize_with = "lenient::int")]
    pub id: i64,
    #[serde(deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(deserialize_with = "lenient::string")]
    pub full_name: String,
    #[serde(deserialize_with = "lenient::string")]
    pub url: String,
}

entity!(RepoSlim { "id" => Int, "name" => Str, "full_name" => Str, "url" => Str });

/// A unit of work: feature, bug or chore.
///
/// Only `id` is guaranteed; everything else is optional because search
/// and listing endpoints return partial stories.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
#[non_exhaustive]
pub struct Story {
    #[serde(deserialize_with = "lenient::int")]
    pub id: i64,
    #[serde(deserialize_with = "lenient::optional")]
    pub position: Option<i64>,
    #[serde(deserialize_with = "lenient::optional")]
    pub estimate: Option<i64>,
    #[serde(deserialize_with = "lenient::optional")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient::optional")]
    pub story_type: Option<StoryType>,
    #[serde(deserialize_with = "lenient::optional")]
    pub project_id: Option<i64>,
    #[serde(deserialize_with = "lenient::optional")]
    pub epic_id: Option<i64>,
    #[serde(deserialize_with = "lenient::optional")]
    pub description: Option<String>,
    #[serde(deserialize_with = "lenient::optional")]
    pub archived: Option<bool>,
    #[serde(deserialize_with = "lenient::optional")]
    pub workflow_state_id: Option<i64>,
    #[serde(deserialize_with = "lenient::date")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "lenient::date")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "lenient::date")]
    pub deadline: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "lenient::list")]
    pub files: Option<Vec<File>>,
    #[serde(deserialize_with = "lenient::list")]
    pub comments: Option<Vec<Comment>>,
    #[serde(deserialize_with = "lenient::optional")]
    pub requested_by: Option<UserSlim>,
    #[serde(deserialize_with = "lenient::list")]
    pub epic: Option<Vec<Epic>>,
    #[serde(deserialize_with = "lenient::list")]
    pub owners: Option<Vec<UserSlim>>,
    #[serde(deserialize_with = "lenient::list")]
    pub labels: Option<Vec<Label>>,
    #[serde(deserialize_with = "lenient::list")]
    pub followers: Option<Vec<UserSlim>>,
    #[serde(deserialize_with = "lenient::list")]
    pub branches: Option<Vec<Branch>>,
    #[serde(deserialize_with = "lenient::list")]
    pub tasks: Option<Vec<Task>>,
    #[serde(deserialize_with = "lenient::list")]
    pub commits: Option<Vec<Commit>>,
}

entity!(Story { "id" => Int } aliases { "commnts" => "comments", "authors" => "owners" });

impl Story {
    /// Get the story name, or an empty string if not set.
    pub fn title(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    /// Number of completed tasks and total tasks, when tasks were included.
    pub fn task_progress(&self) -> Option<(usize, usize)> {
        self.tasks
            .as_ref()
            .map(|tasks| (tasks.iter().filter(|t| t.complete).count(), tasks.len()))
    }
}

impl fmt::Display for Story {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}: {}", self.id, self.title())
    }
}

/// A checklist item on a story.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
#[non_exhaustive]
pub struct Task {
    #[serde(deserialize_with = "lenient::int")]
    pub id: i64,
    #[serde(deserialize_with = "lenient::string")]
    pub description: String,
    #[serde(deserialize_with = "lenient::int")]
    pub position: i64,
    #[serde(deserialize_with = "lenient::date")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "lenient::date")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "lenient::boolean")]
    pub complete: bool,
    #[serde(deserialize_with = "lenient::date")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "lenient::int")]
    pub story_id: i64,
}

entity!(Task {
    "id" => Int,
    "description" => Str,
    "position" => Int,
    "complete" => Bool,
    "story_id" => Int,
});

/// An API token belonging to a user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
#[non_exhaustive]
pub struct Token {
    #[serde(deserialize_with = "lenient::date")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "lenient::optional")]
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient::date")]
    pub last_used: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "lenient::optional")]
    pub description: Option<String>,
}

entity!(Token {});

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
#[non_exhaustive]
pub struct ThreadedComment {
    #[serde(deserialize_with = "lenient::date")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "lenient::string")]
    pub text: String,
    #[serde(deserialize_with = "lenient::boolean")]
    pub deleted: bool,
    #[serde(deserialize_with = "lenient::or_default")]
    pub author: UserSlim,
    #[serde(deserialize_with = "lenient::int")]
    pub id: i64,
}

entity!(ThreadedComment { "id" => Int, "text" => Str, "deleted" => Bool });

/// A member of the organization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
#[non_exhaustive]
pub struct User {
    #[serde(deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(deserialize_with = "lenient::optional")]
    pub initials: Option<String>,
    #[serde(deserialize_with = "lenient::optional")]
    pub gravatar_id: Option<String>,
    #[serde(deserialize_with = "lenient::boolean")]
    pub disabled: bool,
    #[serde(deserialize_with = "lenient::boolean")]
    pub two_factor_auth_activated: bool,
    #[serde(deserialize_with = "lenient::list")]
    pub tokens: Option<Vec<Token>>,
    #[serde(deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(deserialize_with = "lenient::boolean")]
    pub email_alerts: bool,
    #[serde(deserialize_with = "lenient::string")]
    pub username: String,
    #[serde(deserialize_with = "lenient::string")]
    pub email: String,
    #[serde(deserialize_with = "lenient::list")]
    pub emails: Option<Vec<Email>>,
    #[serde(deserialize_with = "lenient::boolean")]
    pub two_factor_auth: bool,
    #[serde(deserialize_with = "lenient::string")]
    pub role: String,
    #[serde(deserialize_with = "lenient::or_default")]
    pub organization: Organization,
}

entity!(User {
    "id" => Str,
    "name" => Str,
    "username" => Str,
    "email" => Str,
    "role" => Str,
    "disabled" => Bool,
});

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (@{})", self.name, self.username)
    }
}

/// A reference to a user by id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
#[non_exhaustive]
pub struct UserSlim {
    #[serde(deserialize_with = "lenient::optional")]
    pub id: Option<String>,
}

entity!(UserSlim {});

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
#[non_exhaustive]
pub struct Workflow {
    #[serde(deserialize_with = "lenient::int")]
    pub id: i64,
    #[serde(deserialize_with = "lenient::date")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "lenient::date")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "lenient::list")]
    pub states: Option<Vec<WorkflowState>>,
    #[serde(deserialize_with = "lenient::optional")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient::optional")]
    pub default_state_id: Option<i64>,
    #[serde(deserialize_with = "lenient::optional")]
    pub description: Option<String>,
}

entity!(Workflow { "id" => Int });

impl Workflow {
    /// Look up one of this workflow's states by id.
    pub fn state(&self, id: i64) -> Option<&WorkflowState> {
        self.states.as_ref()?.iter().find(|s| s.id == id)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
#[non_exhaustive]
pub struct WorkflowState {
    #[serde(deserialize_with = "lenient::int")]
    pub id: i64,
    #[serde(deserialize_with = "lenient::optional")]
    pub position: Option<i64>,
    #[serde(deserialize_with = "lenient::optional")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient::optional")]
    pub description: Option<String>,
    #[serde(deserialize_with = "lenient::date")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "lenient::optional")]
    pub color: Option<String>,
    #[serde(deserialize_with = "lenient::int")]
    pub num_stories: i64,
    #[serde(deserialize_with = "lenient::optional")]
    pub verb: Option<String>,
    #[serde(deserialize_with = "lenient::date")]
    pub updated_at: Option<DateTime<Utc>>,
    /// `unstarted`, `started` or `done`.
    #[serde(rename = "type", deserialize_with = "lenient::optional")]
    pub kind: Option<String>,
}

entity!(WorkflowState { "id" => Int, "num_stories" => Int });

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::decode::{decode, decode_list, DecodePolicy};
    use crate::api::error::ApiError;
    use chrono::TimeZone;
    use serde_json::json;

    fn lenient<T: Entity>(value: serde_json::Value) -> T {
        decode(value, DecodePolicy::Lenient).unwrap()
    }

    #[test]
    fn test_parse_minimal_project() {
        let project: Project = lenient(json!({ "id": 5, "name": "Widget" }));
        assert_eq!(project.id, 5);
        assert_eq!(project.name, "Widget");
        assert!(project.start_time.is_none());
        assert!(project.abbreviation.is_none());
        assert!(project.followers.is_none());
        assert!(project.iteration_length.is_none());
        assert!(project.days_to_thermometer.is_none());
        assert_eq!(project.organization.name, "");
    }

    #[test]
    fn test_parse_full_project() {
        let project: Project = lenient(json!({
            "id": 9,
            "name": "Mobile",
            "archived": true,
            "description": "iOS and Android",
            "color": "#ff0000",
            "abbreviation": "MOB",
            "show_thermometer": true,
            "iteration_length": 2,
            "start_time": "2016-03-01T09:00:00+0000",
            "followers": [{ "id": "u-1" }, { "id": "u-2" }],
            "organization": { "name": "Acme", "beta": true }
        }));
        assert!(project.archived);
        assert_eq!(project.abbreviation.as_deref(), Some("MOB"));
        assert_eq!(project.iteration_length, Some(2));
        assert_eq!(
            project.start_time,
            Some(Utc.with_ymd_and_hms(2016, 3, 1, 9, 0, 0).unwrap())
        );
        assert_eq!(project.followers.as_ref().unwrap().len(), 2);
        assert_eq!(project.organization.name, "Acme");
        assert!(project.organization.beta);
        assert_eq!(project.to_string(), "#9: Mobile");
    }

    #[test]
    fn test_story_with_null_or_missing_tasks() {
        let story: Story = lenient(json!({ "id": 1, "tasks": null }));
        assert!(story.tasks.is_none());

        let story: Story = lenient(json!({ "id": 1 }));
        assert!(story.tasks.is_none());
        assert!(story.task_progress().is_none());
    }

    #[test]
    fn test_story_with_malformed_lists() {
        let story: Story = lenient(json!({
            "id": 1,
            "tasks": { "id": 3 },
            "labels": "bug",
            "files": 12
        }));
        assert!(story.tasks.is_none());
        assert!(story.labels.is_none());
        assert!(story.files.is_none());
    }

    #[test]
    fn test_parse_full_story() {
        let story: Story = lenient(json!({
            "id": 12,
            "name": "Login button",
            "story_type": "bug",
            "estimate": 3,
            "position": 1000,
            "project_id": 4,
            "archived": false,
            "workflow_state_id": 500,
            "created_at": "2016-03-20T12:30:00Z",
            "deadline": "not a date",
            "requested_by": { "id": "u-9" },
            "labels": [{ "id": 1, "name": "frontend" }],
            "tasks": [
                { "id": 1, "description": "a", "complete": true, "story_id": 12 },
                { "id": 2, "description": "b", "complete": false, "story_id": 12 }
            ],
            "comments": [{ "id": 7, "text": "looks good", "story_id": 12 }],
            "branches": [{ "id": 3, "name": "fix-login", "respository": { "name": "web" } }]
        }));
        assert_eq!(story.title(), "Login button");
        assert_eq!(story.story_type, Some(StoryType::Bug));
        assert_eq!(story.estimate, Some(3));
        assert_eq!(story.position, Some(1000));
        assert_eq!(story.archived, Some(false));
        assert!(story.created_at.is_some());
        assert!(story.deadline.is_none());
        assert_eq!(story.requested_by.as_ref().unwrap().id.as_deref(), Some("u-9"));
        assert_eq!(story.task_progress(), Some((1, 2)));
        assert_eq!(story.comments.unwrap()[0].text.as_deref(), Some("looks good"));
        assert_eq!(story.branches.unwrap()[0].repository.name, "web");
        assert_eq!(story.labels.unwrap()[0].name, "frontend");
    }

    #[test]
    fn test_unknown_story_type_is_absent() {
        let story: Story = lenient(json!({ "id": 1, "story_type": "epic" }));
        assert!(story.story_type.is_none());
    }

    #[test]
    fn test_epic_state_from_stat_key() {
        let epic: Epic = lenient(json!({ "id": 42, "name": "Launch", "stat": "in progress" }));
        assert_eq!(epic.id, 42);
        assert_eq!(epic.name, "Launch");
        assert_eq!(epic.state, "in progress");
        assert_eq!(epic.epic_state(), Some(EpicState::InProgress));
    }

    #[test]
    fn test_epic_state_from_state_key() {
        let epic: Epic = lenient(json!({ "id": 1, "state": "done" }));
        assert_eq!(epic.epic_state(), Some(EpicState::Done));
    }

    #[test]
    fn test_pull_request_title_alias() {
        let pr: PullRequest = lenient(json!({ "id": 1, "titltle": "Fix crash" }));
        assert_eq!(pr.title, "Fix crash");
        let pr: PullRequest = lenient(json!({ "id": 1, "title": "Fix crash" }));
        assert_eq!(pr.title, "Fix crash");
    }

    #[test]
    fn test_label_id_coerced_from_string() {
        let label: Label = lenient(json!({ "id": "31", "name": "ops", "updatedAt": "2016-01-01T00:00:00+0000" }));
        assert_eq!(label.id, 31);
        assert!(label.updated_at.is_some());
    }

    #[test]
    fn test_story_link_verb() {
        let link: StoryLink = lenient(json!({ "id": 4, "object": 1, "subject": 2, "verb": "relates to" }));
        assert_eq!(link.verb, Some(Verb::RelatesTo));

        let link: StoryLink = lenient(json!({ "id": 4, "verb": "eats" }));
        assert!(link.verb.is_none());
    }

    #[test]
    fn test_parse_user_with_nested_lists() {
        let user: User = lenient(json!({
            "id": "56d8a839-1c52-437f-b981-c3a15a11d6d4",
            "name": "Ada",
            "username": "ada",
            "emails": [{ "id": "e-1", "email_address": "ada@example.com", "primary": true }],
            "tokens": null,
            "organization": { "name": "Acme", "integrations": [{ "id": 1, "type": "github" }] }
        }));
        assert_eq!(user.to_string(), "Ada (@ada)");
        let emails = user.emails.unwrap();
        assert!(emails[0].primary);
        assert!(!emails[0].confirmed);
        assert!(user.tokens.is_none());
        let integrations = user.organization.integrations.unwrap();
        assert_eq!(integrations[0].kind.as_deref(), Some("github"));
    }

    #[test]
    fn test_workflow_state_lookup() {
        let workflow: Workflow = lenient(json!({
            "id": 1,
            "states": [
                { "id": 10, "name": "Unstarted", "type": "unstarted", "num_stories": 4 },
                { "id": 11, "name": "Done", "type": "done" }
            ]
        }));
        assert_eq!(workflow.state(10).unwrap().num_stories, 4);
        assert_eq!(workflow.state(11).unwrap().kind.as_deref(), Some("done"));
        assert!(workflow.state(99).is_none());
    }

    #[test]
    fn test_strict_epic_accepts_stat_key() {
        let epic: Epic = decode(
            json!({
                "id": 1,
                "name": "E",
                "archived": false,
                "description": "",
                "stat": "to do"
            }),
            DecodePolicy::Strict,
        )
        .unwrap();
        assert_eq!(epic.epic_state(), Some(EpicState::ToDo));
    }

    #[test]
    fn test_strict_project_reports_first_missing_field() {
        let err = decode::<Project>(json!({ "id": 5, "name": "Widget" }), DecodePolicy::Strict)
            .unwrap_err();
        assert!(matches!(
            err,
            ApiError::Decode { entity: "Project", field: "archived", .. }
        ));
    }

    #[test]
    fn test_decode_list_of_files() {
        let files: Vec<File> = decode_list(
            json!([
                { "id": 1, "url": "https://files/1", "size": 1024, "uploader": { "id": "u" } },
                { "id": 2, "url": "https://files/2", "size": "big" }
            ]),
            DecodePolicy::Lenient,
        )
        .unwrap();
        assert_eq!(files[0].size, Some(1024));
        assert_eq!(files[0].uploader.id.as_deref(), Some("u"));
        assert!(files[1].size.is_none());
        assert!(files[1].uploader.id.is_none());
    }

    #[test]
    fn test_entity_names() {
        assert_eq!(<Story as Entity>::NAME, "Story");
        assert_eq!(<WorkflowState as Entity>::NAME, "WorkflowState");
        assert!(<UserSlim as Entity>::REQUIRED.is_empty());
    }

    #[test]
    fn test_story_with_both_comment_keys() {
        let story: Story = lenient(json!({
            "id": 1,
            "comments": [{ "id": 7, "text": "kept" }],
            "commnts": [{ "id": 8, "text": "dropped" }],
            "owners": [],
            "authors": [{ "id": "u-1" }]
        }));
        let comments = story.comments.unwrap();
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].id, 7);
        assert!(story.owners.unwrap().is_empty());
    }

    #[test]
    fn test_story_list_keeps_entries_with_both_keys() {
        let stories: Vec<Story> = decode_list(
            json!([
                { "id": 1, "comments": [], "commnts": [] },
                { "id": 2 }
            ]),
            DecodePolicy::Lenient,
        )
        .unwrap();
        let ids: Vec<i64> = stories.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_epic_prefers_state_over_stat() {
        let epic: Epic = decode(
            json!({
                "id": 1,
                "name": "E",
                "archived": false,
                "description": "",
                "state": "done",
                "stat": "to do"
            }),
            DecodePolicy::Strict,
        )
        .unwrap();
        assert_eq!(epic.epic_state(), Some(EpicState::Done));
    }
}
