//! Clubhouse API client and types.
//!
//! This module provides the interface for communicating with the Clubhouse
//! REST API (v1): request routes, parameter encoding, response decoding and
//! the [`ClubhouseClient`] facade that ties them together.

pub mod auth;
mod client;
pub mod decode;
pub mod error;
mod executor;
pub mod params;
pub mod routes;
pub mod transport;
pub mod types;

pub use client::ClubhouseClient;
pub use decode::{DecodePolicy, Entity};
pub use error::ApiError;
pub use executor::Executor;
pub use params::{
    CommentParam, EpicParam, LabelParam, Params, ProjectParam, StoryLinkParam, StoryParam,
    TaskParam,
};
pub use transport::{HttpTransport, Transport, TransportRequest};
pub use types::{
    Comment, Epic, EpicState, File, Label, Project, Story, StoryLink, StoryType, Task, User, Verb,
    Workflow, WorkflowState,
};
