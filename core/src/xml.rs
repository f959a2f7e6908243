//! Attribute extraction from the server's XML payloads.
//!
//! # Design
//! The REST feeds carry everything in attributes of flat, repeated elements,
//! so there is no need for a DOM: a single streaming pass with `quick-xml`
//! collects every element with the requested tag into an owned `Element`.
//! Wrapper-level attributes the client does not consume (`nextHref`, `count`
//! on `<builds>`) are skipped simply by asking for the child tag.

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::Error;

/// One matched element: its tag and unescaped attributes, in document order.
#[derive(Debug, Clone)]
pub struct Element {
    tag: String,
    attributes: Vec<(String, String)>,
}

impl Element {
    /// The value of a required attribute.
    pub fn attribute(&self, name: &str) -> Result<&str, Error> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
            .ok_or_else(|| Error::MissingAttribute {
                element: self.tag.clone(),
                attribute: name.to_string(),
            })
    }

    /// The value of an optional attribute, or `default` when absent.
    pub fn attribute_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
            .unwrap_or(default)
    }
}

/// Collect every element named `tag` from `xml`, in document order.
///
/// Both start tags and self-closing tags match. Attribute values are
/// unescaped, so `&amp;` comes back as a literal `&`.
pub fn elements(xml: &str, tag: &str) -> Result<Vec<Element>, Error> {
    let mut reader = Reader::from_str(xml);
    let mut found = Vec::new();

    loop {
        match reader.read_event().map_err(|e| Error::Xml(e.to_string()))? {
            Event::Start(e) | Event::Empty(e) if e.name().as_ref() == tag.as_bytes() => {
                let mut attributes = Vec::new();
                for attr in e.attributes() {
                    let attr = attr.map_err(|e| Error::Xml(e.to_string()))?;
                    let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
                    let value = attr
                        .unescape_value()
                        .map_err(|e| Error::Xml(e.to_string()))?
                        .into_owned();
                    attributes.push((key, value));
                }
                found.push(Element {
                    tag: tag.to_string(),
                    attributes,
                });
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROJECTS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<projects>
  <project name="Amazon API client" id="project54" href="/app/rest/projects/id:project54"/>
  <project name="Apache Ant" id="project28" href="/app/rest/projects/id:project28"/>
</projects>"#;

    #[test]
    fn collects_matching_elements_in_document_order() {
        let found = elements(PROJECTS, "project").unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].attribute("id").unwrap(), "project54");
        assert_eq!(found[1].attribute("id").unwrap(), "project28");
    }

    #[test]
    fn wrapper_element_does_not_match() {
        let found = elements(PROJECTS, "projects").unwrap();
        assert_eq!(found.len(), 1);
        let found = elements(PROJECTS, "build").unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn start_tags_match_like_self_closing_tags() {
        let xml = r#"<projects><project id="p1"></project></projects>"#;
        let found = elements(xml, "project").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].attribute("id").unwrap(), "p1");
    }

    #[test]
    fn missing_attribute_is_an_error() {
        let found = elements(PROJECTS, "project").unwrap();
        let err = found[0].attribute("webUrl").unwrap_err();
        assert!(matches!(
            err,
            Error::MissingAttribute { ref element, ref attribute }
                if element == "project" && attribute == "webUrl"
        ));
    }

    #[test]
    fn attribute_or_falls_back_to_default() {
        let found = elements(PROJECTS, "project").unwrap();
        assert_eq!(found[0].attribute_or("startDate", ""), "");
        assert_eq!(found[0].attribute_or("id", "fallback"), "project54");
    }

    #[test]
    fn attribute_values_are_unescaped() {
        let xml = r#"<builds><build webUrl="http://example.com/viewLog.html?buildId=1&amp;buildTypeId=bt2"/></builds>"#;
        let found = elements(xml, "build").unwrap();
        assert_eq!(
            found[0].attribute("webUrl").unwrap(),
            "http://example.com/viewLog.html?buildId=1&buildTypeId=bt2"
        );
    }

    #[test]
    fn malformed_xml_is_an_error() {
        let err = elements("<projects><project id=></projects>", "project").unwrap_err();
        assert!(matches!(err, Error::Xml(_)));
    }
}
