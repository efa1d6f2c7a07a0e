//! Path parameter extraction.

use std::collections::HashMap;

/// Leading character of a dynamic pattern segment.
pub const PARAM_SIGIL: char = ':';

/// Splits a path or pattern into segments, dropping the empty segment a
/// leading `/` would produce.
pub(crate) fn segments(path: &str) -> std::str::Split<'_, char> {
    path.strip_prefix('/').unwrap_or(path).split('/')
}

/// Named values captured from the dynamic segments of a matched pattern.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(HashMap<String, String>);

impl Params {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Recover the values of `pattern`'s dynamic segments from `path`.
///
/// Values are taken verbatim: no decoding, no validation, and an empty
/// segment is a legal value. When the two have a different number of
/// segments nothing is extracted and the result is empty.
pub fn extract_params(path: &str, pattern: &str) -> Params {
    let path_parts: Vec<&str> = segments(path).collect();
    let pattern_parts: Vec<&str> = segments(pattern).collect();

    if path_parts.len() != pattern_parts.len() {
        return Params::default();
    }

    pattern_parts
        .iter()
        .zip(path_parts)
        .filter_map(|(part, value)| part.strip_prefix(PARAM_SIGIL).map(|name| (name, value)))
        .collect()
}
