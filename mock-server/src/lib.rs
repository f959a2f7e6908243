//! Mock TeamCity server used by the client integration tests.
//!
//! # Design
//! Serves canned XML for the three REST collection endpoints. The payloads
//! reproduce the server's known quirks on purpose: the builds feed carries a
//! raw, unescaped `&buildTypeId` inside `webUrl` attributes plus `nextHref`
//! and `count` wrapper attributes clients must ignore, and one build omits
//! `startDate`. `protected_app` mimics an auth-required instance: anonymous
//! paths answer with a 200 HTML login page and `/httpAuth` paths demand
//! matching Basic credentials.

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use tokio::net::TcpListener;

pub const PROJECTS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<projects>
  <project name="Amazon API client" id="project54" href="/app/rest/projects/id:project54"/>
  <project name="Apache Ant" id="project28" href="/app/rest/projects/id:project28"/>
</projects>
"#;

pub const BUILD_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<buildTypes>
  <buildType id="bt297" name="Build" href="/app/rest/buildTypes/id:bt297" projectName="Amazon API client" projectId="project54" webUrl="http://teamcity.example.com/viewType.html?buildTypeId=bt297"/>
  <buildType id="bt296" name="Download missing jar" href="/app/rest/buildTypes/id:bt296" projectName="Amazon API client" projectId="project54" webUrl="http://teamcity.example.com/viewType.html?buildTypeId=bt296"/>
  <buildType id="bt301" name="Nightly" href="/app/rest/buildTypes/id:bt301" projectName="Apache Ant" projectId="project28" webUrl="http://teamcity.example.com/viewType.html?buildTypeId=bt301"/>
</buildTypes>
"#;

// Raw `&buildTypeId` in webUrl is intentional: the real server emits it
// unescaped on this endpoint, and the client must repair it before parsing.
pub const BUILDS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<builds nextHref="/app/rest/builds?count=100&amp;start=100" count="3">
  <build id="56264" number="126" status="FAILURE" buildTypeId="bt297" startDate="20111021T123714+0400" href="/app/rest/builds/id:56264" webUrl="http://teamcity.example.com/viewLog.html?buildId=56264&buildTypeId=bt297"/>
  <build id="56262" number="568" status="SUCCESS" buildTypeId="bt296" startDate="20111021T120639+0400" href="/app/rest/builds/id:56262" webUrl="http://teamcity.example.com/viewLog.html?buildId=56262&buildTypeId=bt296"/>
  <build id="56260" number="12" status="SUCCESS" buildTypeId="bt301" href="/app/rest/builds/id:56260" webUrl="http://teamcity.example.com/viewLog.html?buildId=56260&buildTypeId=bt301"/>
</builds>
"#;

pub const LOGIN_HTML: &str = r#"<!DOCTYPE html>
<html id="htmlId">
<head><title>Log in to TeamCity</title></head>
<body>something</body>
</html>
"#;

#[derive(Clone)]
struct AuthConfig {
    expected: String,
}

/// Router for a guest-accessible instance: the three REST endpoints, no auth.
pub fn app() -> Router {
    Router::new()
        .route("/app/rest/projects", get(|| async { xml(PROJECTS_XML) }))
        .route("/app/rest/buildTypes", get(|| async { xml(BUILD_TYPES_XML) }))
        .route("/app/rest/builds", get(|| async { xml(BUILDS_XML) }))
}

/// Router for an auth-required instance.
///
/// Anonymous REST paths answer with the login page (status 200, like the
/// real server); `/httpAuth` paths require the given Basic credentials and
/// answer 401 otherwise.
pub fn protected_app(user: &str, password: &str) -> Router {
    let auth = AuthConfig {
        expected: expected_authorization(user, password),
    };
    Router::new()
        .route("/app/rest/projects", get(|| async { login_page() }))
        .route("/app/rest/buildTypes", get(|| async { login_page() }))
        .route("/app/rest/builds", get(|| async { login_page() }))
        .route("/httpAuth/app/rest/projects", get(guarded_projects))
        .route("/httpAuth/app/rest/buildTypes", get(guarded_build_types))
        .route("/httpAuth/app/rest/builds", get(guarded_builds))
        .with_state(auth)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_protected(
    listener: TcpListener,
    user: &str,
    password: &str,
) -> Result<(), std::io::Error> {
    axum::serve(listener, protected_app(user, password)).await
}

fn expected_authorization(user: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{user}:{password}")))
}

fn xml(body: &'static str) -> Response {
    ([(header::CONTENT_TYPE, "application/xml")], body).into_response()
}

fn login_page() -> Response {
    ([(header::CONTENT_TYPE, "text/html")], LOGIN_HTML).into_response()
}

async fn guarded_projects(State(auth): State<AuthConfig>, headers: HeaderMap) -> Response {
    guarded(&auth, &headers, PROJECTS_XML)
}

async fn guarded_build_types(State(auth): State<AuthConfig>, headers: HeaderMap) -> Response {
    guarded(&auth, &headers, BUILD_TYPES_XML)
}

async fn guarded_builds(State(auth): State<AuthConfig>, headers: HeaderMap) -> Response {
    guarded(&auth, &headers, BUILDS_XML)
}

fn guarded(auth: &AuthConfig, headers: &HeaderMap, body: &'static str) -> Response {
    let presented = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());
    if presented == Some(auth.expected.as_str()) {
        xml(body)
    } else {
        StatusCode::UNAUTHORIZED.into_response()
    }
}
