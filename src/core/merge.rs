//! Deep merge of two configuration trees.
//!
//! `copy_tree(original, other, policy)` copies the settings of `original`
//! into `other`. Data arrays of the target survive by default, and series are
//! paired up so each keeps its own data.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::value::{JsObject, JsValue};

/// Keys whose arrays hold chart data rather than configuration.
const DATA_KEYS: [&str; 2] = ["data", "points"];
const SERIES_KEY: &str = "series";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyPolicy {
    /// Values already set in the target are replaced by the source's.
    pub overwrite: bool,
    /// The target keeps its `data`/`points` arrays and series data.
    pub preserve_data: bool,
}

impl Default for CopyPolicy {
    fn default() -> Self {
        Self {
            overwrite: true,
            preserve_data: true,
        }
    }
}

impl CopyPolicy {
    #[must_use]
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    #[must_use]
    pub fn with_preserve_data(mut self, preserve_data: bool) -> Self {
        self.preserve_data = preserve_data;
        self
    }
}

/// Returns `other` updated with the settings of `original`.
#[must_use]
pub fn copy_tree(original: &JsValue, other: &JsValue, policy: CopyPolicy) -> JsValue {
    merge_value(None, original, Some(other), policy).unwrap_or_else(|| other.clone())
}

/// `None` means the key is absent from the merged result.
fn merge_value(
    key: Option<&str>,
    original: &JsValue,
    other: Option<&JsValue>,
    policy: CopyPolicy,
) -> Option<JsValue> {
    if policy.preserve_data {
        if key.is_some_and(|key| DATA_KEYS.contains(&key)) {
            return other.cloned();
        }
        if key == Some(SERIES_KEY) {
            if let (JsValue::Array(source), Some(JsValue::Array(target))) = (original, other) {
                return Some(JsValue::Array(merge_series(source, target, policy)));
            }
        }
    }

    match (original, other) {
        (JsValue::Object(source), Some(JsValue::Object(target))) => {
            Some(JsValue::Object(merge_objects(source, target, policy)))
        }
        (JsValue::Object(_), Some(target)) if !policy.overwrite => Some(target.clone()),
        (JsValue::Object(source), _) => {
            Some(JsValue::Object(merge_objects(source, &JsObject::new(), policy)))
        }
        (JsValue::Array(_), Some(target)) if !policy.overwrite => Some(target.clone()),
        (_, Some(target)) if !policy.overwrite => Some(target.clone()),
        _ => Some(original.clone()),
    }
}

fn merge_objects(source: &JsObject, target: &JsObject, policy: CopyPolicy) -> JsObject {
    let mut merged = target.clone();
    for (key, value) in source {
        match merge_value(Some(key), value, target.get(key), policy) {
            Some(value) => {
                merged.insert(key.clone(), value);
            }
            None => {
                merged.shift_remove(key);
            }
        }
    }
    merged
}

fn conflicting_ids(target: Option<&JsValue>, source: Option<&JsValue>) -> bool {
    matches!((target, source), (Some(target), Some(source)) if target != source)
}

/// Pairs source and target series, merges each pair and keeps the rest.
///
/// Pairing is by `id`, then by `name`; series with neither are paired by
/// their order among the remaining anonymous series. Series whose ids differ
/// never pair.
fn merge_series(source: &[JsValue], target: &[JsValue], policy: CopyPolicy) -> Vec<JsValue> {
    if target.is_empty() {
        return source.to_vec();
    }

    let mut source_used = vec![false; source.len()];
    let mut pairs: Vec<Option<usize>> = vec![None; target.len()];

    for field in ["id", "name"] {
        for (target_index, target_series) in target.iter().enumerate() {
            if pairs[target_index].is_some() {
                continue;
            }
            let Some(identity) = series_field(target_series, field) else {
                continue;
            };
            let target_id = series_field(target_series, "id");
            let found = source.iter().enumerate().position(|(source_index, series)| {
                !source_used[source_index]
                    && series_field(series, field) == Some(identity)
                    && !conflicting_ids(target_id, series_field(series, "id"))
            });
            if let Some(source_index) = found {
                source_used[source_index] = true;
                pairs[target_index] = Some(source_index);
            }
        }
    }

    let mut anonymous_sources = source
        .iter()
        .enumerate()
        .filter(|(index, series)| !source_used[*index] && is_anonymous(series))
        .map(|(index, _)| index)
        .collect::<Vec<_>>()
        .into_iter();
    for (target_index, target_series) in target.iter().enumerate() {
        if pairs[target_index].is_none() && is_anonymous(target_series) {
            if let Some(source_index) = anonymous_sources.next() {
                source_used[source_index] = true;
                pairs[target_index] = Some(source_index);
            }
        }
    }

    let mut merged = Vec::with_capacity(target.len() + source.len());
    for (target_series, pair) in target.iter().zip(&pairs) {
        match pair {
            Some(source_index) => merged.push(
                merge_value(None, &source[*source_index], Some(target_series), policy)
                    .unwrap_or_else(|| target_series.clone()),
            ),
            None => merged.push(target_series.clone()),
        }
    }

    let matched = pairs.iter().filter(|pair| pair.is_some()).count();
    let appended = source_used.iter().filter(|used| !**used).count();
    merged.extend(
        source
            .iter()
            .zip(&source_used)
            .filter(|(_, used)| !**used)
            .map(|(series, _)| series.clone()),
    );

    debug!(
        source_count = source.len(),
        target_count = target.len(),
        matched,
        appended,
        "merged series"
    );
    merged
}

fn series_field<'a>(series: &'a JsValue, field: &str) -> Option<&'a JsValue> {
    series
        .as_object()
        .and_then(|members| members.get(field))
        .filter(|value| !value.is_null())
}

fn is_anonymous(series: &JsValue) -> bool {
    series_field(series, "id").is_none() && series_field(series, "name").is_none()
}

#[cfg(test)]
mod tests {
    use super::{CopyPolicy, copy_tree};
    use crate::core::{JsValue, parse_js_literal};

    fn literal(source: &str) -> JsValue {
        parse_js_literal(source).expect("valid literal")
    }

    #[test]
    fn scalar_overwrite_respects_policy() {
        let original = literal("{title: {text: 'new'}, colors: ['#000']}");
        let other = literal("{title: {text: 'old', align: 'left'}, colors: ['#fff']}");

        let overwritten = copy_tree(&original, &other, CopyPolicy::default());
        assert_eq!(overwritten.get_path("title.text"), Some(&JsValue::from("new")));
        assert_eq!(overwritten.get_path("title.align"), Some(&JsValue::from("left")));
        assert_eq!(
            overwritten.get_path("colors"),
            Some(&JsValue::from(vec!["#000"]))
        );

        let kept = copy_tree(&original, &other, CopyPolicy::default().with_overwrite(false));
        assert_eq!(kept.get_path("title.text"), Some(&JsValue::from("old")));
        assert_eq!(kept.get_path("colors"), Some(&JsValue::from(vec!["#fff"])));
    }

    #[test]
    fn missing_target_keys_are_filled_even_without_overwrite() {
        let original = literal("{chart: {type: 'bar'}, colors: ['#000']}");
        let other = literal("{}");
        let merged = copy_tree(&original, &other, CopyPolicy::default().with_overwrite(false));
        assert_eq!(merged.get_path("chart.type"), Some(&JsValue::from("bar")));
        assert_eq!(merged.get_path("colors"), Some(&JsValue::from(vec!["#000"])));
    }
}
