//! Who the assistant is talking to.

use serde::{Deserialize, Serialize};

/// Identity fields used for text substitution only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// First name from the Telegram profile.
    pub first_name: Option<String>,
    /// Platform username, stored upstream as `telegram_username`.
    #[serde(alias = "telegram_username")]
    pub username: Option<String>,
    /// Platform level.
    pub level: Option<u32>,
    /// Self-declared skills.
    #[serde(default)]
    pub skills: Vec<String>,
    /// Self-declared interests.
    #[serde(default)]
    pub interests: Vec<String>,
}

impl Identity {
    /// Creates an identity with a first name.
    pub fn named(first_name: impl Into<String>) -> Self {
        Self {
            first_name: Some(first_name.into()),
            ..Default::default()
        }
    }

    /// Sets the username.
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Sets the level.
    pub fn with_level(mut self, level: u32) -> Self {
        self.level = Some(level);
        self
    }

    /// Sets skills.
    pub fn with_skills<I, S>(mut self, skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skills = skills.into_iter().map(Into::into).collect();
        self
    }

    /// Sets interests.
    pub fn with_interests<I, S>(mut self, interests: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.interests = interests.into_iter().map(Into::into).collect();
        self
    }

    /// Name to address the user by: first name, then username.
    ///
    /// Blank values count as missing.
    pub fn display_name(&self) -> Option<&str> {
        non_blank(self.first_name.as_deref()).or_else(|| non_blank(self.username.as_deref()))
    }

    /// Display name, or `fallback` when none is known.
    pub fn display_name_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.display_name().unwrap_or(fallback)
    }
}

pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_name_wins_over_username() {
        let identity = Identity::named("Аня").with_username("anya_tg");
        assert_eq!(identity.display_name(), Some("Аня"));
    }

    #[test]
    fn username_used_when_first_name_missing_or_blank() {
        let mut identity = Identity::default().with_username("anya_tg");
        assert_eq!(identity.display_name(), Some("anya_tg"));

        identity.first_name = Some("  ".to_string());
        assert_eq!(identity.display_name(), Some("anya_tg"));
    }

    #[test]
    fn fallback_used_when_nothing_known() {
        assert_eq!(Identity::default().display_name_or("друг"), "друг");
    }

    #[test]
    fn deserializes_store_field_names() {
        let identity: Identity = serde_json::from_str(
            r#"{"first_name": null, "telegram_username": "neo", "level": 3}"#,
        )
        .unwrap();

        assert_eq!(identity.display_name(), Some("neo"));
        assert_eq!(identity.level, Some(3));
        assert!(identity.skills.is_empty());
    }
}
