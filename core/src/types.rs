//! Domain records mapped from the server's XML feeds.
//!
//! # Design
//! All three records are immutable value types constructed fresh on every
//! client call. `Project` additionally carries a reference to the client it
//! came from so it can answer relationship queries; those queries re-fetch
//! the full collections on every invocation — nothing is memoized, and two
//! calls may differ if the server state changed in between.

use std::collections::HashSet;
use std::fmt;

use crate::client::TeamcityClient;
use crate::error::Error;

/// A TeamCity project, with `href` already resolved to an absolute URL.
///
/// Borrowed from the client that fetched it, for the lifetime of that client.
#[derive(Debug, Clone)]
pub struct Project<'a> {
    client: &'a TeamcityClient,
    pub name: String,
    pub id: String,
    pub href: String,
}

impl<'a> Project<'a> {
    pub(crate) fn new(client: &'a TeamcityClient, name: String, id: String, href: String) -> Self {
        Project {
            client,
            name,
            id,
            href,
        }
    }

    /// The build configurations belonging to this project, in server order.
    ///
    /// Fetches the full build-type collection and filters it by project id;
    /// every call is a fresh network round-trip.
    pub fn build_types(&self) -> Result<Vec<BuildType>, Error> {
        Ok(self
            .client
            .build_types()?
            .into_iter()
            .filter(|bt| bt.project_id == self.id)
            .collect())
    }

    /// The builds of this project's build configurations, in server order.
    ///
    /// Fetches build types and builds, so this costs two network round-trips
    /// per call.
    pub fn builds(&self) -> Result<Vec<Build>, Error> {
        let build_type_ids: HashSet<String> =
            self.build_types()?.into_iter().map(|bt| bt.id).collect();
        Ok(self
            .client
            .builds()?
            .into_iter()
            .filter(|b| build_type_ids.contains(&b.build_type_id))
            .collect())
    }
}

// Equality is by fetched fields; the owning client is not part of identity.
impl PartialEq for Project<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.id == other.id && self.href == other.href
    }
}

/// A build configuration. `project_id` is a weak reference by value to the
/// owning `Project`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildType {
    pub id: String,
    pub name: String,
    pub href: String,
    pub project_name: String,
    pub project_id: String,
    pub web_url: String,
}

/// One executed run of a build configuration.
///
/// `start_date` is empty when the server omitted the attribute, which it
/// does for some builds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Build {
    pub id: String,
    pub number: String,
    pub status: BuildStatus,
    pub build_type_id: String,
    pub start_date: String,
    pub href: String,
    pub web_url: String,
}

impl Build {
    /// True iff the build finished with `SUCCESS`.
    pub fn is_success(&self) -> bool {
        self.status == BuildStatus::Success
    }
}

/// Build outcome as reported by the server's `status` attribute.
///
/// The server's status vocabulary is open-ended, so unrecognized strings are
/// preserved verbatim in `Other` rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildStatus {
    Success,
    Failure,
    Error,
    Unknown,
    Other(String),
}

impl BuildStatus {
    pub fn parse(status: &str) -> Self {
        match status {
            "SUCCESS" => BuildStatus::Success,
            "FAILURE" => BuildStatus::Failure,
            "ERROR" => BuildStatus::Error,
            "UNKNOWN" => BuildStatus::Unknown,
            other => BuildStatus::Other(other.to_string()),
        }
    }
}

impl fmt::Display for BuildStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildStatus::Success => write!(f, "SUCCESS"),
            BuildStatus::Failure => write!(f, "FAILURE"),
            BuildStatus::Error => write!(f, "ERROR"),
            BuildStatus::Unknown => write!(f, "UNKNOWN"),
            BuildStatus::Other(other) => write!(f, "{other}"),
        }
    }
}
