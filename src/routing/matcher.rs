//! Path pattern matching module
//!
//! Patterns are `/`-separated segments; a `{name}` segment captures whatever
//! sits at that position. Empty segments are ignored on both sides, so a
//! trailing slash or a doubled slash does not change the match.

/// A single pattern segment
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// Compiled path pattern such as `/clients/{id}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    pub fn parse(pattern: &str) -> Self {
        let segments = split_path(pattern)
            .map(|segment| {
                match segment
                    .strip_prefix('{')
                    .and_then(|rest| rest.strip_suffix('}'))
                {
                    Some(name) => Segment::Param(name.to_string()),
                    None => Segment::Literal(segment.to_string()),
                }
            })
            .collect();

        Self {
            raw: pattern.to_string(),
            segments,
        }
    }

    /// The pattern as it was registered
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Match a request path, returning captured parameters on success
    pub fn matches(&self, path: &str) -> Option<PathParams> {
        let mut params = PathParams::default();
        let mut parts = split_path(path);

        for segment in &self.segments {
            let part = parts.next()?;
            match segment {
                Segment::Literal(literal) => {
                    if literal != part {
                        return None;
                    }
                }
                Segment::Param(name) => params.push(name, part),
            }
        }

        // Path is longer than the pattern
        if parts.next().is_some() {
            return None;
        }

        Some(params)
    }
}

/// Parameters captured from `{name}` segments, in pattern order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams(Vec<(String, String)>);

impl PathParams {
    fn push(&mut self, name: &str, value: &str) {
        self.0.push((name.to_string(), value.to_string()));
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

fn split_path(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|segment| !segment.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_pattern() {
        let pattern = PathPattern::parse("/clients");
        assert!(pattern.matches("/clients").is_some());
        assert!(pattern.matches("/clients/").is_some());
        assert!(pattern.matches("/clients/1").is_none());
        assert!(pattern.matches("/client").is_none());
        assert!(pattern.matches("/").is_none());
    }

    #[test]
    fn test_param_capture() {
        let pattern = PathPattern::parse("/clients/{id}");
        let params = pattern.matches("/clients/42").unwrap();
        assert_eq!(params.get("id"), Some("42"));
        assert_eq!(params.get("name"), None);

        // Captures are raw text, conversion is up to the handler
        let params = pattern.matches("/clients/abc").unwrap();
        assert_eq!(params.get("id"), Some("abc"));

        assert!(pattern.matches("/clients").is_none());
        assert!(pattern.matches("/clients/1/orders").is_none());
    }

    #[test]
    fn test_root_pattern() {
        let pattern = PathPattern::parse("/");
        assert!(pattern.matches("/").is_some());
        assert!(pattern.matches("/clients").is_none());
    }

    #[test]
    fn test_as_str_keeps_registration_text() {
        assert_eq!(PathPattern::parse("/clients/{id}").as_str(), "/clients/{id}");
    }
}
