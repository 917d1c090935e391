/*
 * Responsibility
 * - parse route templates ("{controller}/{id}", "api/{*rest}", "items/{id?}")
 * - match a request path against the parsed segments
 *
 * Only whole-segment parameters are supported: "{a}.{b}" style complex
 * segments are rejected at parse time. Path segments are percent-decoded
 * before they are compared or captured.
 */
use std::borrow::Cow;
use std::collections::HashSet;

use percent_encoding::percent_decode_str;

use super::error::RouteError;
use super::values::{RouteValue, RouteValueDictionary};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSegment {
    Literal(String),
    Parameter { name: String, optional: bool },
    CatchAll { name: String },
}

impl TemplateSegment {
    pub fn parameter_name(&self) -> Option<&str> {
        match self {
            Self::Literal(_) => None,
            Self::Parameter { name, .. } | Self::CatchAll { name } => Some(name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTemplate {
    raw: String,
    segments: Vec<TemplateSegment>,
}

impl RouteTemplate {
    pub fn parse(raw: &str) -> Result<Self, RouteError> {
        if raw.starts_with('/') || raw.starts_with('~') {
            return Err(RouteError::invalid(raw, "template cannot start with '/' or '~'"));
        }

        if raw.is_empty() {
            return Ok(Self {
                raw: String::new(),
                segments: Vec::new(),
            });
        }

        let parts: Vec<&str> = raw.split('/').collect();
        let mut seen = HashSet::new();
        let mut segments = Vec::with_capacity(parts.len());

        for (index, part) in parts.iter().enumerate() {
            let segment = parse_segment(raw, part)?;

            if let Some(name) = segment.parameter_name()
                && !seen.insert(name.to_ascii_lowercase())
            {
                return Err(RouteError::invalid(raw, "parameter names must be unique"));
            }
            if matches!(segment, TemplateSegment::CatchAll { .. }) && index + 1 != parts.len() {
                return Err(RouteError::invalid(raw, "a catch-all parameter must be the last segment"));
            }

            segments.push(segment);
        }

        Ok(Self {
            raw: raw.to_owned(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[TemplateSegment] {
        &self.segments
    }

    pub fn parameter_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(TemplateSegment::parameter_name)
    }

    /// Matches `path` (no query string) against the template.
    ///
    /// Returns the captured values merged with `defaults`, or `None` when the
    /// path does not fit. A leading `/` and a single trailing `/` are ignored.
    pub fn match_path(
        &self,
        path: &str,
        defaults: &RouteValueDictionary,
    ) -> Option<RouteValueDictionary> {
        let request = split_path(path);
        let mut values = RouteValueDictionary::new();
        let mut consumed = 0;

        for segment in &self.segments {
            match segment {
                TemplateSegment::Literal(literal) => {
                    let part = request.get(consumed)?;
                    if !part.eq_ignore_ascii_case(literal) {
                        return None;
                    }
                    consumed += 1;
                }
                TemplateSegment::Parameter { name, optional } => match request.get(consumed) {
                    Some(part) if part.is_empty() => return None,
                    Some(part) => {
                        values.insert(name, part.to_string());
                        consumed += 1;
                    }
                    None => match defaults.get(name) {
                        Some(RouteValue::Value(value)) => {
                            values.insert(name, value.clone());
                        }
                        Some(RouteValue::Optional) => {}
                        None if *optional => {}
                        None => return None,
                    },
                },
                TemplateSegment::CatchAll { name } => {
                    let rest = request.get(consumed..).unwrap_or_default().join("/");
                    if !rest.is_empty() {
                        values.insert(name, rest);
                    } else if let Some(default) = defaults.get_str(name) {
                        values.insert(name, default);
                    }
                    consumed = request.len();
                }
            }
        }

        if consumed < request.len() {
            return None;
        }

        for (name, value) in defaults.iter() {
            if let RouteValue::Value(value) = value
                && !values.contains_key(name)
            {
                values.insert(name, value.clone());
            }
        }

        Some(values)
    }
}

impl std::fmt::Display for RouteTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

fn split_path(path: &str) -> Vec<Cow<'_, str>> {
    let path = path.strip_prefix('/').unwrap_or(path);
    let path = path.strip_suffix('/').unwrap_or(path);
    if path.is_empty() {
        Vec::new()
    } else {
        path.split('/')
            .map(|segment| percent_decode_str(segment).decode_utf8_lossy())
            .collect()
    }
}

fn parse_segment(raw: &str, part: &str) -> Result<TemplateSegment, RouteError> {
    if part.is_empty() {
        return Err(RouteError::invalid(raw, "template contains an empty segment"));
    }

    let Some(inner) = part.strip_prefix('{') else {
        if part.contains(['{', '}', '?']) {
            return Err(RouteError::invalid(raw, "literal segments cannot contain '{', '}' or '?'"));
        }
        return Ok(TemplateSegment::Literal(part.to_owned()));
    };

    let inner = inner
        .strip_suffix('}')
        .ok_or_else(|| RouteError::invalid(raw, "unterminated parameter"))?;
    if inner.contains(['{', '}']) {
        return Err(RouteError::invalid(raw, "complex segments are not supported"));
    }

    if let Some(name) = inner.strip_prefix('*') {
        validate_name(raw, name)?;
        return Ok(TemplateSegment::CatchAll {
            name: name.to_owned(),
        });
    }

    let (name, optional) = match inner.strip_suffix('?') {
        Some(name) => (name, true),
        None => (inner, false),
    };
    validate_name(raw, name)?;

    Ok(TemplateSegment::Parameter {
        name: name.to_owned(),
        optional,
    })
}

fn validate_name(raw: &str, name: &str) -> Result<(), RouteError> {
    if name.is_empty() {
        return Err(RouteError::invalid(raw, "parameter name cannot be empty"));
    }
    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(RouteError::invalid(raw, "parameter names may only contain [A-Za-z0-9_]"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn optional_id() -> RouteValueDictionary {
        RouteValueDictionary::new().with("id", RouteValue::Optional)
    }

    #[test]
    fn parses_literals_and_parameters() {
        let template = RouteTemplate::parse("api/{controller}/{id?}").unwrap();

        assert_eq!(
            vec![
                TemplateSegment::Literal("api".into()),
                TemplateSegment::Parameter {
                    name: "controller".into(),
                    optional: false
                },
                TemplateSegment::Parameter {
                    name: "id".into(),
                    optional: true
                },
            ],
            template.segments()
        );
        assert_eq!(
            vec!["controller", "id"],
            template.parameter_names().collect::<Vec<_>>()
        );
    }

    #[rstest]
    #[case("/widgets/{id}")]
    #[case("~/widgets")]
    #[case("widgets//{id}")]
    #[case("widgets/{id")]
    #[case("widgets/{}")]
    #[case("widgets/{id}/{ID}")]
    #[case("{*rest}/tail")]
    #[case("widgets/{a}.{b}")]
    #[case("widgets?x")]
    #[case("widgets/{i-d}")]
    fn rejects_malformed_templates(#[case] raw: &str) {
        let err = RouteTemplate::parse(raw).unwrap_err();
        assert!(matches!(err, RouteError::InvalidTemplate { .. }), "{raw}: {err}");
    }

    #[rstest]
    #[case("widgets/7", Some("7"))]
    #[case("/widgets/7", Some("7"))]
    #[case("widgets/7/", Some("7"))]
    #[case("WIDGETS/7", Some("7"))]
    #[case("widgets", None)]
    fn matches_optional_id(#[case] path: &str, #[case] id: Option<&str>) {
        let template = RouteTemplate::parse("widgets/{id}").unwrap();
        let values = template.match_path(path, &optional_id()).unwrap();

        assert_eq!(id, values.get_str("id"));
        assert_eq!(id.is_some(), values.contains_key("id"));
    }

    #[rstest]
    #[case("gadgets/7")]
    #[case("widgets/7/extra")]
    #[case("widgets//7")]
    fn rejects_non_matching_paths(#[case] path: &str) {
        let template = RouteTemplate::parse("widgets/{id}").unwrap();
        assert!(template.match_path(path, &optional_id()).is_none());
    }

    #[test]
    fn required_parameter_without_default_must_be_present() {
        let template = RouteTemplate::parse("widgets/{id}").unwrap();
        assert!(template.match_path("widgets", &RouteValueDictionary::new()).is_none());
    }

    #[test]
    fn inline_optional_parameter_may_be_omitted() {
        let template = RouteTemplate::parse("widgets/{id?}").unwrap();
        let values = template.match_path("widgets", &RouteValueDictionary::new()).unwrap();
        assert!(values.is_empty());
    }

    #[test]
    fn defaults_fill_missing_values_and_unbound_names() {
        let template = RouteTemplate::parse("{controller}/{action}").unwrap();
        let defaults = RouteValueDictionary::new()
            .with("action", "index")
            .with("area", "admin");

        let values = template.match_path("widgets", &defaults).unwrap();

        assert_eq!(Some("widgets"), values.get_str("controller"));
        assert_eq!(Some("index"), values.get_str("action"));
        assert_eq!(Some("admin"), values.get_str("area"));
    }

    #[test]
    fn catch_all_takes_the_rest_of_the_path() {
        let template = RouteTemplate::parse("files/{*path}").unwrap();
        let defaults = RouteValueDictionary::new();

        let values = template.match_path("files/a/b/c.txt", &defaults).unwrap();
        assert_eq!(Some("a/b/c.txt"), values.get_str("path"));

        let values = template.match_path("files", &defaults).unwrap();
        assert!(!values.contains_key("path"));
    }

    #[rstest]
    #[case("widgets/a%20b", "a b")]
    #[case("widgets/caf%C3%A9", "café")]
    #[case("widgets/50%25", "50%")]
    #[case("%77idgets/7", "7")]
    fn captured_segments_are_percent_decoded(#[case] path: &str, #[case] id: &str) {
        let template = RouteTemplate::parse("widgets/{id}").unwrap();
        let values = template.match_path(path, &optional_id()).unwrap();

        assert_eq!(Some(id), values.get_str("id"));
    }

    #[test]
    fn catch_all_remainder_is_percent_decoded() {
        let template = RouteTemplate::parse("files/{*path}").unwrap();

        let values = template
            .match_path("files/my%20docs/a%2Bb.txt", &RouteValueDictionary::new())
            .unwrap();

        assert_eq!(Some("my docs/a+b.txt"), values.get_str("path"));
    }

    #[test]
    fn empty_template_matches_root_only() {
        let template = RouteTemplate::parse("").unwrap();
        let defaults = RouteValueDictionary::new();

        assert!(template.match_path("/", &defaults).is_some());
        assert!(template.match_path("widgets", &defaults).is_none());
    }
}
