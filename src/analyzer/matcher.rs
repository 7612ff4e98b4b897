//! Service name matchers used by discovery rules and the summary ignore list.

use regex::Regex;

/// How a rule selects services by name.
#[derive(Debug, Clone)]
pub enum Matcher {
    /// Matches every service.
    Wildcard,
    /// Compiled pattern anchored at the start of the name. Case sensitive
    /// unless the pattern itself starts with `(?i)`.
    PrefixRegex(Regex),
}

impl Matcher {
    /// Compile a regex body that must match at the beginning of the name.
    pub fn prefix(pattern: &str) -> Result<Self, regex::Error> {
        Regex::new(&format!("^(?:{})", pattern)).map(Matcher::PrefixRegex)
    }

    pub fn matches(&self, name: &str) -> bool {
        match self {
            Matcher::Wildcard => true,
            Matcher::PrefixRegex(re) => re.is_match(name),
        }
    }
}

/// Compile a list of prefix patterns.
pub fn compile_all<S: AsRef<str>>(patterns: &[S]) -> Result<Vec<Matcher>, regex::Error> {
    patterns.iter().map(|p| Matcher::prefix(p.as_ref())).collect()
}
