//! URL construction and HTTP fetch for the two TeamCity access modes.
//!
//! # Design
//! TeamCity serves the same REST tree under two prefixes: the plain one for
//! guest access and `/httpAuth` for credentialed access. `Authentication`
//! captures that split as an enum with exactly two variants; no further
//! variants are anticipated. `get` returns the raw body and never inspects
//! it — deciding whether the body is usable XML is the client's job.

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use log::debug;

use crate::error::Error;

/// How requests to the server are addressed and authenticated.
#[derive(Debug, Clone)]
pub enum Authentication {
    /// Guest access: plain GETs against the unprefixed REST tree.
    Open { host: String, port: u16 },

    /// HTTP Basic credentials sent on every request, against the
    /// `/httpAuth`-prefixed REST tree.
    Basic {
        host: String,
        port: u16,
        user: String,
        password: String,
    },
}

impl Authentication {
    pub fn open(host: &str, port: u16) -> Self {
        Authentication::Open {
            host: host.to_string(),
            port,
        }
    }

    pub fn basic(host: &str, port: u16, user: &str, password: &str) -> Self {
        Authentication::Basic {
            host: host.to_string(),
            port,
            user: user.to_string(),
            password: password.to_string(),
        }
    }

    /// Resolve a server-relative path into a fully-qualified URL for this
    /// access mode.
    pub fn url(&self, path: &str) -> String {
        match self {
            Authentication::Open { host, port } => format!("http://{host}:{port}{path}"),
            Authentication::Basic { host, port, .. } => {
                format!("http://{host}:{port}/httpAuth{path}")
            }
        }
    }

    /// Issue a blocking GET for the given path and return the raw body.
    ///
    /// Connection failures and non-success statuses surface as
    /// `Error::Transport`; the body is returned untouched otherwise.
    pub fn get(&self, path: &str) -> Result<String, Error> {
        let url = self.url(path);
        debug!("GET {url}");

        let request = ureq::get(&url);
        let request = match self {
            Authentication::Open { .. } => request,
            Authentication::Basic { user, password, .. } => {
                let credentials = STANDARD.encode(format!("{user}:{password}"));
                request.header("Authorization", format!("Basic {credentials}"))
            }
        };

        let mut response = request.call().map_err(|e| Error::Transport(e.to_string()))?;
        response
            .body_mut()
            .read_to_string()
            .map_err(|e| Error::Transport(e.to_string()))
    }
}

impl fmt::Display for Authentication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Authentication::Open { .. } => write!(f, "No Authentication"),
            Authentication::Basic { user, .. } => write!(f, "HttpBasicAuthentication {user}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_url_has_no_prefix() {
        let auth = Authentication::open("auth.example.com", 2233);
        assert_eq!(
            auth.url("/something"),
            "http://auth.example.com:2233/something"
        );
    }

    #[test]
    fn basic_url_adds_http_auth_prefix() {
        let auth = Authentication::basic("auth.example.com", 2233, "john", "wayne");
        assert_eq!(
            auth.url("/something"),
            "http://auth.example.com:2233/httpAuth/something"
        );
    }

    #[test]
    fn display_never_shows_password() {
        let auth = Authentication::basic("auth.example.com", 2233, "john", "wayne");
        let shown = auth.to_string();
        assert!(shown.contains("john"));
        assert!(!shown.contains("wayne"));
    }

    #[test]
    fn open_display() {
        let auth = Authentication::open("auth.example.com", 2233);
        assert_eq!(auth.to_string(), "No Authentication");
    }

    #[test]
    fn get_against_closed_port_is_a_transport_error() {
        // Grab a free port and release it so nothing is listening there.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let auth = Authentication::open("127.0.0.1", port);
        let err = auth.get("/app/rest/projects").unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
    }
}
