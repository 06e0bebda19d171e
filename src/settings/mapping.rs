//! Conversion between stored setting strings and typed values.

use std::fmt;

use crate::bookmarks::GroupOrder;

/// A type that settings can hold.
///
/// Free-form mappings store the value's own text; types without a textual
/// form cannot be used with them and decode to nothing.
pub trait SettingValue: Clone + PartialEq + fmt::Debug + Send + Sync + 'static {
    fn parse_text(_raw: &str) -> Option<Self> {
        None
    }

    fn to_text(&self) -> Option<String> {
        None
    }
}

impl SettingValue for String {
    fn parse_text(raw: &str) -> Option<Self> {
        Some(raw.to_string())
    }

    fn to_text(&self) -> Option<String> {
        Some(self.clone())
    }
}

impl SettingValue for bool {}

impl SettingValue for GroupOrder {
    fn parse_text(raw: &str) -> Option<Self> {
        raw.parse().ok()
    }

    fn to_text(&self) -> Option<String> {
        Some(self.to_string())
    }
}

/// Valid stored strings of one setting and the values they stand for.
#[derive(Debug, Clone)]
pub enum Mapping<T> {
    /// A fixed table. The first pair is the default.
    Closed(Vec<(String, T)>),
    /// Any string the value type can parse.
    FreeForm { default: T },
}

impl<T: SettingValue> Mapping<T> {
    /// A closed table with `default` first, followed by `others`.
    pub fn closed(default: (&str, T), others: impl IntoIterator<Item = (&'static str, T)>) -> Self {
        let mut pairs = vec![(default.0.to_string(), default.1)];
        pairs.extend(others.into_iter().map(|(text, value)| (text.to_string(), value)));
        Mapping::Closed(pairs)
    }

    pub fn free_form(default: T) -> Self {
        Mapping::FreeForm { default }
    }

    pub fn default_value(&self) -> T {
        match self {
            Mapping::Closed(pairs) => pairs[0].1.clone(),
            Mapping::FreeForm { default } => default.clone(),
        }
    }

    /// Stored form of the default value.
    pub fn default_text(&self) -> String {
        match self {
            Mapping::Closed(pairs) => pairs[0].0.clone(),
            Mapping::FreeForm { default } => default.to_text().unwrap_or_default(),
        }
    }

    /// Value stored as `raw`, `None` if `raw` is not valid for this mapping.
    pub fn decode(&self, raw: &str) -> Option<T> {
        match self {
            Mapping::Closed(pairs) => pairs
                .iter()
                .find(|(text, _)| text == raw)
                .map(|(_, value)| value.clone()),
            Mapping::FreeForm { .. } => T::parse_text(raw),
        }
    }

    /// Stored form of `value`, `None` if the mapping cannot represent it.
    pub fn encode(&self, value: &T) -> Option<String> {
        match self {
            Mapping::Closed(pairs) => pairs
                .iter()
                .find(|(_, candidate)| candidate == value)
                .map(|(text, _)| text.clone()),
            Mapping::FreeForm { .. } => value.to_text(),
        }
    }

    /// Every valid stored string of a closed mapping, empty for free-form ones.
    pub fn texts(&self) -> Vec<&str> {
        match self {
            Mapping::Closed(pairs) => pairs.iter().map(|(text, _)| text.as_str()).collect(),
            Mapping::FreeForm { .. } => Vec::new(),
        }
    }
}

impl Mapping<bool> {
    /// `"true"`/`"false"` with the given default.
    pub fn flag(default: bool) -> Self {
        Mapping::closed(
            (if default { "true" } else { "false" }, default),
            [(if default { "false" } else { "true" }, !default)],
        )
    }
}

impl Mapping<String> {
    /// Strings that stand for themselves, `default` first.
    pub fn choices(default: &str, others: &[&'static str]) -> Self {
        Mapping::closed(
            (default, default.to_string()),
            others.iter().map(|text| (*text, text.to_string())),
        )
    }
}
