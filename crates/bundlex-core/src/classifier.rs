//! Maps dot-delimited event names onto a category and phase.
//!
//! The table is closed: every legal name is listed in [`KNOWN_EVENTS`] and
//! anything else is a [`BundleError::Classification`].

use crate::error::{BundleError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Event family requiring its own method, fields and augmenters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    TriggerPoll,
    HookCatch,
    HookPrePost,
    HookSubscribe,
    HookUnsubscribe,
    Create,
    Search,
    SearchResource,
    OAuth2TokenRefresh,
    Session,
    ConnectionLabel,
}

impl Category {
    pub const ALL: [Category; 11] = [
        Category::TriggerPoll,
        Category::HookCatch,
        Category::HookPrePost,
        Category::HookSubscribe,
        Category::HookUnsubscribe,
        Category::Create,
        Category::Search,
        Category::SearchResource,
        Category::OAuth2TokenRefresh,
        Category::Session,
        Category::ConnectionLabel,
    ];

    /// HTTP method of the request descriptor for this category.
    pub fn method(&self) -> HttpMethod {
        match self {
            Category::HookSubscribe | Category::Create | Category::OAuth2TokenRefresh => {
                HttpMethod::Post
            }
            Category::HookUnsubscribe => HttpMethod::Delete,
            Category::TriggerPoll
            | Category::HookCatch
            | Category::HookPrePost
            | Category::Search
            | Category::SearchResource
            | Category::Session
            | Category::ConnectionLabel => HttpMethod::Get,
        }
    }

    pub fn is_trigger(&self) -> bool {
        matches!(
            self,
            Category::TriggerPoll
                | Category::HookCatch
                | Category::HookPrePost
                | Category::HookSubscribe
                | Category::HookUnsubscribe
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::TriggerPoll => "Polling Trigger",
            Category::HookCatch => "Hook Catch",
            Category::HookPrePost => "Hook Pre/Post",
            Category::HookSubscribe => "Hook Subscribe",
            Category::HookUnsubscribe => "Hook Unsubscribe",
            Category::Create => "Create",
            Category::Search => "Search",
            Category::SearchResource => "Search Resource",
            Category::OAuth2TokenRefresh => "OAuth2 Token/Refresh",
            Category::Session => "Session Auth",
            Category::ConnectionLabel => "Connection Label",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Whether input travels in the body rather than the query string.
    pub fn carries_body(&self) -> bool {
        !matches!(self, HttpMethod::Get)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `Pre` covers every phase that runs before the real HTTP call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Pre,
    Post,
}

impl Phase {
    pub fn is_post(&self) -> bool {
        matches!(self, Phase::Post)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedEvent {
    pub category: Category,
    pub phase: Phase,
}

/// An event name accepted by [`classify`], with the key it needs, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnownEvent {
    pub name: &'static str,
    pub key: Option<&'static str>,
}

const fn named(name: &'static str) -> KnownEvent {
    KnownEvent { name, key: None }
}

/// Every legal event name, in category order.
pub const KNOWN_EVENTS: &[KnownEvent] = &[
    named("trigger.pre"),
    named("trigger.poll"),
    named("trigger.output.pre"),
    named("trigger.post"),
    named("trigger.output.post"),
    KnownEvent {
        name: "trigger.hook",
        key: Some("hook"),
    },
    named("trigger.hook.pre"),
    named("trigger.hook.post"),
    named("trigger.hook.subscribe.pre"),
    named("trigger.hook.subscribe.post"),
    named("trigger.hook.unsubscribe.pre"),
    named("create.pre"),
    named("create.write"),
    named("create.input"),
    named("create.input.pre"),
    named("create.output.pre"),
    named("create.post"),
    named("create.input.post"),
    named("create.output.post"),
    named("search.pre"),
    named("search.search"),
    named("search.input"),
    named("search.input.pre"),
    named("search.output.pre"),
    named("search.post"),
    named("search.input.post"),
    named("search.output.post"),
    named("search.resource.pre"),
    named("search.resource"),
    named("search.resource.post"),
    named("auth.oauth2.token.pre"),
    named("auth.oauth2.refresh.pre"),
    named("auth.oauth2.token.post"),
    named("auth.session"),
    named("auth.connectionLabel"),
];

/// Resolve an event name (and optional discriminator key) to its category and phase.
pub fn classify(name: &str, key: Option<&str>) -> Result<ClassifiedEvent> {
    use Category::*;
    use Phase::*;

    let segments: Vec<&str> = name.split('.').collect();
    let (category, phase) = match segments.as_slice() {
        ["trigger", "hook"] if key == Some("hook") => (HookCatch, Pre),
        ["trigger", "pre" | "poll"] | ["trigger", "output", "pre"] => (TriggerPoll, Pre),
        ["trigger", "post"] | ["trigger", "output", "post"] => (TriggerPoll, Post),
        ["trigger", "hook", "pre"] => (HookPrePost, Pre),
        ["trigger", "hook", "post"] => (HookPrePost, Post),
        ["trigger", "hook", "subscribe", "pre"] => (HookSubscribe, Pre),
        ["trigger", "hook", "subscribe", "post"] => (HookSubscribe, Post),
        ["trigger", "hook", "unsubscribe", "pre"] => (HookUnsubscribe, Pre),

        ["create", "pre" | "write" | "input"] | ["create", "input" | "output", "pre"] => {
            (Create, Pre)
        }
        ["create", "post"] | ["create", "input" | "output", "post"] => (Create, Post),

        ["search", "resource", "pre"] | ["search", "resource"] => (SearchResource, Pre),
        ["search", "resource", "post"] => (SearchResource, Post),
        ["search", "pre" | "search" | "input"] | ["search", "input" | "output", "pre"] => {
            (Search, Pre)
        }
        ["search", "post"] | ["search", "input" | "output", "post"] => (Search, Post),

        ["auth", "oauth2", "token" | "refresh", "pre"] => (OAuth2TokenRefresh, Pre),
        ["auth", "oauth2", "token", "post"] => (OAuth2TokenRefresh, Post),
        ["auth", "session"] => (Session, Pre),
        ["auth", "connectionLabel"] => (ConnectionLabel, Pre),

        _ => {
            return Err(BundleError::Classification {
                name: name.to_string(),
                key: key.map(str::to_string),
            })
        }
    };

    tracing::debug!(event = name, ?category, ?phase, "classified event");
    Ok(ClassifiedEvent { category, phase })
}
