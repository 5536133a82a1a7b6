//! REST-style path templates
//!
//! A template is a `/`-delimited pattern whose segments are classified at
//! parse time as literals or `%name%` variables. Matching a template against
//! an actual path extracts the variable bindings.

use std::collections::HashMap;

const VARIABLE_DELIMITER: char = '%';

/// Why a path failed to match a template. Not HTTP-typed; callers decide the
/// status (the route table maps both variants to 404).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatchError {
    #[error("number of components in path and template do not match. template={template:?}, path={path:?}")]
    SegmentCount { template: String, path: String },
    #[error("path and template do not match. template={template:?}, path={path:?}")]
    LiteralMismatch { template: String, path: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Variable(String),
}

/// A parsed path template such as `/customer/%id%/%action%`.
///
/// Splitting is plain `str::split('/')` with no normalization: a leading or
/// trailing delimiter produces an empty segment and therefore changes the
/// segment count. A template that should accept a trailing slash must end in
/// one itself.
#[derive(Debug, Clone)]
pub struct PathTemplate {
    raw: String,
    segments: Vec<Segment>,
}

impl PathTemplate {
    /// Parses `format` into literal and variable segments.
    ///
    /// A segment is a variable only when it is exactly a non-empty name
    /// wrapped in `%`; everything else (including `%` and `%%`) is a literal.
    /// Duplicate variable names are allowed; on match the later occurrence
    /// silently overwrites the earlier binding.
    pub fn parse(format: &str) -> Self {
        let segments = format.split('/').map(classify).collect();
        Self {
            raw: format.to_string(),
            segments,
        }
    }

    /// The template string this was parsed from.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Matches `path` against this template and extracts variable bindings.
    ///
    /// Single linear pass: segment counts must be equal, literal segments must
    /// compare byte-for-byte equal, and each variable segment binds its name
    /// to the path segment at the same position. Fails fast on the first
    /// mismatch; no partial mapping is ever returned.
    pub fn capture(&self, path: &str) -> Result<HashMap<String, String>, MatchError> {
        let parts: Vec<&str> = path.split('/').collect();

        if parts.len() != self.segments.len() {
            return Err(MatchError::SegmentCount {
                template: self.raw.clone(),
                path: path.to_string(),
            });
        }

        let mut variables = HashMap::new();
        for (segment, part) in self.segments.iter().zip(&parts) {
            match segment {
                Segment::Variable(name) => {
                    variables.insert(name.clone(), (*part).to_string());
                }
                Segment::Literal(literal) if literal == part => {}
                Segment::Literal(_) => {
                    return Err(MatchError::LiteralMismatch {
                        template: self.raw.clone(),
                        path: path.to_string(),
                    });
                }
            }
        }

        Ok(variables)
    }
}

fn classify(segment: &str) -> Segment {
    segment
        .strip_prefix(VARIABLE_DELIMITER)
        .and_then(|rest| rest.strip_suffix(VARIABLE_DELIMITER))
        .filter(|name| !name.is_empty())
        .map_or_else(
            || Segment::Literal(segment.to_string()),
            |name| Segment::Variable(name.to_string()),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_extracts_variables() {
        let template = PathTemplate::parse("/customer/%id%/%action%");
        let vars = template.capture("/customer/44/edit").unwrap();
        assert_eq!(vars.len(), 2);
        assert_eq!(vars["id"], "44");
        assert_eq!(vars["action"], "edit");
    }

    #[test]
    fn capture_without_variables_yields_empty_map() {
        let template = PathTemplate::parse("/customer/new");
        let vars = template.capture("/customer/new").unwrap();
        assert!(vars.is_empty());
    }

    #[test]
    fn segment_count_mismatch_fails() {
        let template = PathTemplate::parse("/customer");
        let err = template.capture("/customer/44/edit").unwrap_err();
        assert_eq!(
            err,
            MatchError::SegmentCount {
                template: "/customer".to_string(),
                path: "/customer/44/edit".to_string(),
            }
        );
    }

    #[test]
    fn too_few_variables_fails() {
        let template = PathTemplate::parse("/customer/%id%");
        assert!(matches!(
            template.capture("/customer/44/edit"),
            Err(MatchError::SegmentCount { .. })
        ));
    }

    #[test]
    fn literal_mismatch_fails() {
        let template = PathTemplate::parse("/customer/%id%/add");
        assert!(matches!(
            template.capture("/customer/44/edit"),
            Err(MatchError::LiteralMismatch { .. })
        ));
    }

    #[test]
    fn bare_variable_matches_bare_segment() {
        let template = PathTemplate::parse("%id%");
        let vars = template.capture("44").unwrap();
        assert_eq!(vars["id"], "44");
    }

    #[test]
    fn trailing_slash_changes_segment_count() {
        let template = PathTemplate::parse("/customer/%id%");
        assert!(matches!(
            template.capture("/customer/44/"),
            Err(MatchError::SegmentCount { .. })
        ));
        // A template ending in a slash accepts one.
        let trailing = PathTemplate::parse("/customer/%id%/");
        assert_eq!(trailing.capture("/customer/44/").unwrap()["id"], "44");
    }

    #[test]
    fn malformed_variable_syntax_is_literal() {
        let template = PathTemplate::parse("/%%/%id");
        assert!(template.capture("/%%/%id").unwrap().is_empty());
        assert!(matches!(
            template.capture("/x/%id"),
            Err(MatchError::LiteralMismatch { .. })
        ));
    }

    #[test]
    fn duplicate_variable_name_keeps_last_binding() {
        let template = PathTemplate::parse("/%id%/%id%");
        let vars = template.capture("/first/second").unwrap();
        assert_eq!(vars.len(), 1);
        assert_eq!(vars["id"], "second");
    }

    #[test]
    fn capture_is_pure() {
        let template = PathTemplate::parse("/customer/%id%");
        let first = template.capture("/customer/44").unwrap();
        let second = template.capture("/customer/44").unwrap();
        assert_eq!(first, second);
    }
}
