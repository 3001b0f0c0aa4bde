//! Address filter for the received-message view.
//!
//! The operator types a pattern into the filter box.  Three rules are checked
//! top to bottom and the first that applies decides:
//!
//! 1. Empty pattern: every address matches.
//! 2. Pattern ends in `*`: the address must start with the pattern minus that
//!    trailing `*`.  This is a plain prefix match; a `*` anywhere else in the
//!    pattern is an ordinary character.
//! 3. Anything else: the address must contain the pattern as a substring.
//!
//! | Pattern    | Address       | Match |
//! |------------|---------------|-------|
//! | `""`       | `/any/thing`  | yes   |
//! | `/test*`   | `/test/foo`   | yes   |
//! | `/test*`   | `/other`      | no    |
//! | `foo`      | `/a/foo/b`    | yes   |
//! | `foo`      | `/bar`        | no    |

/// A parsed filter pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressFilter {
    /// Empty pattern; shows everything.
    All,
    /// Pattern with a trailing `*`; holds the prefix without the `*`.
    Prefix(String),
    /// Any other pattern; matched anywhere in the address.
    Substring(String),
}

impl AddressFilter {
    pub fn parse(pattern: &str) -> Self {
        if pattern.is_empty() {
            AddressFilter::All
        } else if let Some(prefix) = pattern.strip_suffix('*') {
            AddressFilter::Prefix(prefix.to_string())
        } else {
            AddressFilter::Substring(pattern.to_string())
        }
    }

    pub fn matches(&self, address: &str) -> bool {
        match self {
            AddressFilter::All => true,
            AddressFilter::Prefix(prefix) => address.starts_with(prefix.as_str()),
            AddressFilter::Substring(needle) => address.contains(needle.as_str()),
        }
    }
}

impl From<&str> for AddressFilter {
    fn from(pattern: &str) -> Self {
        AddressFilter::parse(pattern)
    }
}

/// Returns `true` when `address` passes the filter `pattern`.
pub fn matches(pattern: &str, address: &str) -> bool {
    AddressFilter::parse(pattern).matches(address)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_pattern_matches_everything() {
        assert!(matches("", "/any/address"));
        assert!(matches("", ""));
    }

    #[test]
    fn test_trailing_star_is_prefix_match() {
        assert!(matches("/test*", "/test/foo"));
        assert!(matches("/test*", "/test"));
        assert!(matches("/test*", "/testing"));
        assert!(!matches("/test*", "/other"));
        assert!(!matches("/test*", "/a/test/foo"));
    }

    #[test]
    fn test_lone_star_matches_everything() {
        // "*" strips to the empty prefix, which every address starts with.
        assert!(matches("*", "/whatever"));
    }

    #[test]
    fn test_plain_pattern_is_unanchored_substring() {
        assert!(matches("foo", "/a/foo/b"));
        assert!(matches("foo", "/foobar"));
        assert!(!matches("foo", "/bar"));
    }

    #[test]
    fn test_embedded_star_is_literal() {
        // Not a glob: "/a*/b" has no trailing star, so it is a substring search
        // for the literal text "/a*/b".
        assert!(!matches("/a*/b", "/abc/b"));
        assert!(matches("/a*/b", "/x/a*/b"));
    }

    #[test]
    fn test_only_final_star_is_stripped() {
        assert_eq!(
            AddressFilter::parse("/a/**"),
            AddressFilter::Prefix("/a/*".to_string())
        );
        assert!(matches("/a/**", "/a/*/c"));
        assert!(!matches("/a/**", "/a/b"));
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        assert!(!matches("FOO", "/foo"));
    }

    #[test]
    fn test_parse_classifies_patterns() {
        assert_eq!(AddressFilter::parse(""), AddressFilter::All);
        assert_eq!(
            AddressFilter::parse("/osc/*"),
            AddressFilter::Prefix("/osc/".to_string())
        );
        assert_eq!(
            AddressFilter::from("vol"),
            AddressFilter::Substring("vol".to_string())
        );
    }
}
