//! Synchronous client for the TeamCity REST API.
//!
//! # Design
//! `TeamcityClient` holds only immutable configuration: host, port, and the
//! authentication mode fixed at construction. Each read operation performs
//! one blocking GET, checks the body for the server's HTML login page, and
//! maps the XML elements into records. Nothing is cached and no pagination
//! is followed (`nextHref` is ignored), so every call reflects the server
//! state at the moment it was made.

use std::fmt;
use std::sync::OnceLock;

use log::debug;
use regex::Regex;

use crate::auth::Authentication;
use crate::error::Error;
use crate::types::{Build, BuildStatus, BuildType, Project};
use crate::xml;

/// Read-only client for one TeamCity server.
#[derive(Debug, Clone)]
pub struct TeamcityClient {
    host: String,
    port: u16,
    authentication: Authentication,
}

impl TeamcityClient {
    /// Build a client for `host:port`.
    ///
    /// HTTP Basic authentication is used only when both `user` and
    /// `password` are given and non-empty; one without the other falls back
    /// to anonymous guest access.
    pub fn new(host: &str, port: u16, user: Option<&str>, password: Option<&str>) -> Self {
        let authentication = match (user, password) {
            (Some(user), Some(password)) if !user.is_empty() && !password.is_empty() => {
                Authentication::basic(host, port, user, password)
            }
            _ => Authentication::open(host, port),
        };
        TeamcityClient {
            host: host.to_string(),
            port,
            authentication,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn authentication(&self) -> &Authentication {
        &self.authentication
    }

    /// Fetch all projects from `/app/rest/projects`.
    ///
    /// Each project's `href` is resolved to an absolute URL through the
    /// active authentication mode.
    pub fn projects(&self) -> Result<Vec<Project<'_>>, Error> {
        let body = self.fetch("/app/rest/projects")?;
        self.parse_projects(&body)
    }

    /// Fetch all build configurations from `/app/rest/buildTypes`.
    pub fn build_types(&self) -> Result<Vec<BuildType>, Error> {
        let body = self.fetch("/app/rest/buildTypes")?;
        self.parse_build_types(&body)
    }

    /// Fetch all builds from `/app/rest/builds`.
    ///
    /// The server emits unescaped `&buildTypeId` ampersands in `webUrl`
    /// attributes on this endpoint only; those are repaired before parsing
    /// so the literal `&` survives into the mapped field.
    pub fn builds(&self) -> Result<Vec<Build>, Error> {
        let body = self.fetch("/app/rest/builds")?;
        self.parse_builds(&repair_build_type_ampersands(&body))
    }

    /// Look up a single project by name or id.
    ///
    /// Specs matching `project\d+` anywhere are treated as ids, everything
    /// else as names. This mirrors the server's conventional id scheme but
    /// is a heuristic: a project literally *named* "project99" is routed to
    /// the id lookup and will not be found by name. Performs a full
    /// `projects()` fetch on every call.
    pub fn project(&self, spec: &str) -> Result<Project<'_>, Error> {
        let by_id = looks_like_project_id(spec);
        self.projects()?
            .into_iter()
            .find(|project| lookup_field(project, by_id) == spec)
            .ok_or_else(|| Error::ProjectNotFound(spec.to_string()))
    }

    /// GET a REST path and reject HTML bodies before any parsing happens.
    fn fetch(&self, path: &str) -> Result<String, Error> {
        let body = self.authentication.get(path)?;
        if looks_like_html(&body) {
            return Err(Error::ServerReturnedHtml);
        }
        debug!("GET {path} returned {} bytes", body.len());
        Ok(body)
    }

    fn parse_projects(&self, body: &str) -> Result<Vec<Project<'_>>, Error> {
        xml::elements(body, "project")?
            .iter()
            .map(|e| {
                Ok(Project::new(
                    self,
                    e.attribute("name")?.to_string(),
                    e.attribute("id")?.to_string(),
                    self.authentication.url(e.attribute("href")?),
                ))
            })
            .collect()
    }

    fn parse_build_types(&self, body: &str) -> Result<Vec<BuildType>, Error> {
        xml::elements(body, "buildType")?
            .iter()
            .map(|e| {
                Ok(BuildType {
                    id: e.attribute("id")?.to_string(),
                    name: e.attribute("name")?.to_string(),
                    href: self.authentication.url(e.attribute("href")?),
                    project_name: e.attribute("projectName")?.to_string(),
                    project_id: e.attribute("projectId")?.to_string(),
                    web_url: e.attribute("webUrl")?.to_string(),
                })
            })
            .collect()
    }

    fn parse_builds(&self, body: &str) -> Result<Vec<Build>, Error> {
        xml::elements(body, "build")?
            .iter()
            .map(|e| {
                Ok(Build {
                    id: e.attribute("id")?.to_string(),
                    number: e.attribute("number")?.to_string(),
                    status: BuildStatus::parse(e.attribute("status")?),
                    build_type_id: e.attribute("buildTypeId")?.to_string(),
                    start_date: e.attribute_or("startDate", "").to_string(),
                    href: self.authentication.url(e.attribute("href")?),
                    web_url: e.attribute("webUrl")?.to_string(),
                })
            })
            .collect()
    }
}

impl fmt::Display for TeamcityClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Teamcity @ http://{}:{}", self.host, self.port)
    }
}

/// Select id or name lookup for `TeamcityClient::project`.
fn lookup_field<'p>(project: &'p Project<'_>, by_id: bool) -> &'p str {
    if by_id {
        &project.id
    } else {
        &project.name
    }
}

/// Unanchored match, like the server's conventional project id scheme.
fn looks_like_project_id(spec: &str) -> bool {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"project\d+").expect("hard-coded pattern compiles"))
        .is_match(spec)
}

/// The server answers unauthenticated requests with a 200 HTML login page
/// rather than an error status, so the body itself is the only signal.
fn looks_like_html(body: &str) -> bool {
    let lower = body.to_lowercase();
    lower.contains("<html") && lower.contains("</html>")
}

/// Targeted repair for the one known spot where the server emits raw `&`:
/// `webUrl` attributes on the builds feed. Already-escaped bodies are left
/// alone since `&buildTypeId` never occurs inside `&amp;buildTypeId`.
fn repair_build_type_ampersands(body: &str) -> String {
    body.replace("&buildTypeId", "&amp;buildTypeId")
}
