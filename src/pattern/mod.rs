//! Pattern matching for expect operations

use regex::Regex;

/// A pattern to wait for in process output.
///
/// Two kinds are supported: exact substrings and regular expressions.
/// Anything convertible into one of these can be passed to
/// [`Session::expect`](crate::Session::expect) directly; the type system
/// rejects everything else.
///
/// # Examples
///
/// ```
/// use ptyexpect::Pattern;
/// use regex::Regex;
///
/// let p1 = Pattern::exact("password: ");
/// let p2 = Pattern::regex(r"\d+").unwrap();
/// let p3: Pattern = "login: ".into();
/// let p4: Pattern = Regex::new("ready|done").unwrap().into();
/// ```
#[derive(Debug, Clone)]
pub enum Pattern {
    /// Exact substring match.
    Exact(String),
    /// Regular expression match.
    Regex(Regex),
}

/// Location of a match inside the live window.
#[derive(Debug, Clone)]
pub struct Found {
    /// Byte offset where the match starts.
    pub start: usize,
    /// Byte offset one past the end of the match.
    pub end: usize,
    /// Captured groups (regex patterns only; index 0 is the full match).
    pub captures: Vec<String>,
}

impl Pattern {
    /// Create an exact substring pattern.
    pub fn exact(s: impl Into<String>) -> Self {
        Pattern::Exact(s.into())
    }

    /// Create a regex pattern.
    ///
    /// # Errors
    ///
    /// Returns a regex error if the pattern is invalid.
    pub fn regex(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Pattern::Regex(Regex::new(pattern)?))
    }

    /// Find the first match in `text`.
    ///
    /// `text` is the already-normalized live window, so matching never has
    /// to cope with invalid encoding; bytes that were not valid UTF-8 were
    /// replaced when the buffer was filled.
    pub fn find(&self, text: &str) -> Option<Found> {
        match self {
            Pattern::Exact(s) => text.find(s.as_str()).map(|start| Found {
                start,
                end: start + s.len(),
                captures: Vec::new(),
            }),
            Pattern::Regex(re) => {
                let caps = re.captures(text)?;
                let whole = caps.get(0)?;
                let captures = caps
                    .iter()
                    .flatten()
                    .map(|m| m.as_str().to_string())
                    .collect();
                Some(Found {
                    start: whole.start(),
                    end: whole.end(),
                    captures,
                })
            }
        }
    }
}

impl From<&str> for Pattern {
    fn from(s: &str) -> Self {
        Pattern::Exact(s.to_string())
    }
}

impl From<String> for Pattern {
    fn from(s: String) -> Self {
        Pattern::Exact(s)
    }
}

impl From<Regex> for Pattern {
    fn from(re: Regex) -> Self {
        Pattern::Regex(re)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_find() {
        let p = Pattern::exact("hello");
        let found = p.find("world hello there").unwrap();
        assert_eq!(found.start, 6);
        assert_eq!(found.end, 11);
        assert!(found.captures.is_empty());
    }

    #[test]
    fn exact_not_found() {
        let p = Pattern::exact("missing");
        assert!(p.find("this text does not contain it").is_none());
    }

    #[test]
    fn regex_find() {
        let p = Pattern::regex(r"\d+").unwrap();
        let found = p.find("test 123 end").unwrap();
        assert_eq!(found.start, 5);
        assert_eq!(found.end, 8);
        assert_eq!(found.captures[0], "123");
    }

    #[test]
    fn regex_captures() {
        let p = Pattern::regex(r"(\w+)@(\w+)\.(\w+)").unwrap();
        let found = p.find("Email: user@example.com is valid").unwrap();
        assert_eq!(found.captures[0], "user@example.com");
        assert_eq!(found.captures[1], "user");
        assert_eq!(found.captures[2], "example");
        assert_eq!(found.captures[3], "com");
    }

    #[test]
    fn invalid_regex_rejected() {
        assert!(Pattern::regex("[invalid(").is_err());
    }

    #[test]
    fn from_conversions() {
        assert!(matches!(Pattern::from("x"), Pattern::Exact(_)));
        assert!(matches!(Pattern::from(String::from("x")), Pattern::Exact(_)));
        assert!(matches!(
            Pattern::from(Regex::new("x").unwrap()),
            Pattern::Regex(_)
        ));
    }

    #[test]
    fn matches_replacement_characters() {
        // Binary garbage is normalized before matching; the replacement
        // character is just another char as far as patterns are concerned.
        let text = String::from_utf8_lossy(&[0xFF, 0xFE, b'o', b'k']).into_owned();
        let p = Pattern::exact("ok");
        assert!(p.find(&text).is_some());
    }

    #[test]
    fn utf8_offsets_are_byte_offsets() {
        let p = Pattern::exact("世界");
        let found = p.find("hello 世界!").unwrap();
        assert_eq!(found.start, 6);
        assert_eq!(found.end, 6 + "世界".len());
    }
}
