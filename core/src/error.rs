//! Error types for the TeamCity REST client.
//!
//! # Design
//! `ServerReturnedHtml` gets a dedicated variant because the server answers
//! unauthenticated requests with a 200 HTML login page instead of an error
//! status — callers need to distinguish "check your credentials" from a real
//! transport failure. Nothing is retried or suppressed; every failure
//! propagates directly to the caller, and a single bad element aborts the
//! whole collection fetch.

use std::fmt;

/// Errors returned by `TeamcityClient` operations.
#[derive(Debug)]
pub enum Error {
    /// The connection could not be established, or the server returned a
    /// non-success HTTP status.
    Transport(String),

    /// The response body was an HTML document instead of XML — the server
    /// redirected to its login page.
    ServerReturnedHtml,

    /// The response body could not be parsed as XML.
    Xml(String),

    /// A required attribute was absent from a response element.
    MissingAttribute { element: String, attribute: String },

    /// `TeamcityClient::project` found no project matching the given spec.
    ProjectNotFound(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Transport(msg) => write!(f, "transport error: {msg}"),
            Error::ServerReturnedHtml => {
                write!(f, "Teamcity returned html, perhaps you need to use authentication??")
            }
            Error::Xml(msg) => write!(f, "xml parse error: {msg}"),
            Error::MissingAttribute { element, attribute } => {
                write!(f, "missing attribute '{attribute}' on element '{element}'")
            }
            Error::ProjectNotFound(spec) => {
                write!(f, "Sorry, cannot find project with name or id '{spec}'")
            }
        }
    }
}

impl std::error::Error for Error {}
