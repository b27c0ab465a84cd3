//! Anchor phrases that pin a question's option order.
//!
//! Options such as "all of the above" refer to the other options by
//! position, so a question containing one is never option-shuffled.

/// Phrases that always anchor a question, matched as lowercase substrings.
pub const BUILTIN_ANCHORS: &[&str] = &[
    "all of the above",
    "none of the above",
    "both are correct",
    "are correct",
    "are false",
    "todas las anteriores",
    "ninguna de las anteriores",
    "ambas son",
    "son correctas",
    "son falsas",
];

/// The set of phrases checked when deciding whether a question is anchored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorSet {
    phrases: Vec<String>,
}

impl Default for AnchorSet {
    fn default() -> Self {
        Self::builtin()
    }
}

impl AnchorSet {
    /// Only the built-in phrases.
    pub fn builtin() -> Self {
        Self {
            phrases: BUILTIN_ANCHORS.iter().map(|p| p.to_string()).collect(),
        }
    }

    /// Built-in phrases plus extras. Extras are trimmed and lowercased;
    /// blank entries are dropped.
    pub fn with_extra<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::builtin();
        for phrase in extra {
            let phrase = phrase.as_ref().trim().to_lowercase();
            if !phrase.is_empty() && !set.phrases.contains(&phrase) {
                set.phrases.push(phrase);
            }
        }
        set
    }

    /// Parse a comma-separated list of extra phrases.
    pub fn parse_extra(list: &str) -> Vec<String> {
        list.split(',')
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect()
    }

    pub fn phrases(&self) -> &[String] {
        &self.phrases
    }

    /// Returns `true` if the text contains any anchor phrase, ignoring case.
    pub fn matches(&self, text: &str) -> bool {
        let text = text.to_lowercase();
        self.phrases.iter().any(|p| text.contains(p.as_str()))
    }

    /// Returns `true` if any of the options contains an anchor phrase.
    pub fn is_anchored<S: AsRef<str>>(&self, options: &[S]) -> bool {
        options.iter().any(|o| self.matches(o.as_ref()))
    }
}
