use std::{cmp::Ordering, collections::BTreeMap};

use geo::{unary_union, MultiPolygon};
use serde::Deserialize;

use crate::geofile::feature::{Feature, FeatureMap};

use super::{error::DissolveError, repair::RepairedFeature};

/// How attributes other than the grouping key are carried into a dissolved feature.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AttributePolicy {
    /// Take each attribute from the first member feature that has a non-null value for it. An
    /// attribute that is null in every member that carries it stays null.
    #[default]
    First,
    /// Only keep the grouping key.
    Drop,
}

/// Numeric grouping value, compared by magnitude: `1` and `1.0` are one key and `9` sorts before
/// `10`.
#[derive(Debug, Clone, Copy)]
pub struct NumericKey(f64);

impl NumericKey {
    pub fn new(value: f64) -> Self {
        // -0.0 and 0.0 are the same district.
        if value == 0.0 {
            NumericKey(0.0)
        } else {
            NumericKey(value)
        }
    }

    /// Integral keys are written back as JSON integers.
    pub fn to_value(&self) -> serde_json::Value {
        if self.0.fract() == 0.0 && self.0.abs() < i64::MAX as f64 {
            serde_json::Value::from(self.0 as i64)
        } else {
            serde_json::Number::from_f64(self.0)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null)
        }
    }
}

impl PartialEq for NumericKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for NumericKey {}

impl PartialOrd for NumericKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for NumericKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Value of the grouping attribute.
///
/// Strings are compared exactly as found in the input. Numbers are kept apart from strings, so
/// `1` and `"1"` are different groups.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum GroupKey {
    Text(String),
    Number(NumericKey),
}

impl GroupKey {
    pub fn from_value(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::String(text) => Some(GroupKey::Text(text.clone())),
            serde_json::Value::Number(number) => {
                number.as_f64().map(NumericKey::new).map(GroupKey::Number)
            }
            _ => None,
        }
    }

    /// The key as a JSON value of its original type.
    pub fn to_value(&self) -> serde_json::Value {
        match self {
            GroupKey::Text(text) => serde_json::Value::String(text.clone()),
            GroupKey::Number(number) => number.to_value(),
        }
    }
}

/// Extract the grouping key of every feature, in feature order.
pub fn extract_group_keys(
    features: &[Feature],
    field: &str,
) -> Result<Vec<GroupKey>, DissolveError> {
    features
        .iter()
        .enumerate()
        .map(|(index, feature)| {
            let value = feature
                .attribute(field)
                .ok_or_else(|| DissolveError::MissingGroupKey {
                    index,
                    field: field.to_string(),
                })?;
            GroupKey::from_value(value).ok_or_else(|| DissolveError::InvalidGroupKey {
                index,
                field: field.to_string(),
                value: value.clone(),
            })
        })
        .collect()
}

/// Features sharing one grouping key value, in input order.
#[derive(Debug)]
pub struct DistrictGroup {
    pub key: GroupKey,
    pub members: Vec<RepairedFeature>,
}

/// Partition features by key. Groups come out sorted by key.
///
/// `keys` must hold one key per feature, as returned by `extract_group_keys`.
pub fn group_features(features: Vec<RepairedFeature>, keys: Vec<GroupKey>) -> Vec<DistrictGroup> {
    debug_assert_eq!(features.len(), keys.len());
    let mut groups: BTreeMap<GroupKey, Vec<RepairedFeature>> = BTreeMap::new();
    for (feature, key) in features.into_iter().zip(keys) {
        groups.entry(key).or_default().push(feature);
    }
    groups
        .into_iter()
        .map(|(key, members)| DistrictGroup { key, members })
        .collect()
}

fn first_attribute_values(members: &[RepairedFeature]) -> FeatureMap {
    let mut attributes = FeatureMap::new();
    for member_attributes in members.iter().flat_map(|member| &member.attributes) {
        for (name, value) in member_attributes {
            let unset = attributes
                .get(name)
                .map_or(true, serde_json::Value::is_null);
            if unset {
                attributes.insert(name.clone(), value.clone());
            }
        }
    }
    attributes
}

impl DistrictGroup {
    /// Union all member geometries into one feature carrying the `field` attribute.
    ///
    /// The geometry is `None` when no member has one.
    pub fn dissolve(self, field: &str, policy: AttributePolicy) -> Feature {
        let geometries: Vec<&MultiPolygon> = self
            .members
            .iter()
            .filter_map(|member| member.geometry.as_ref())
            .collect();
        let geometry = if geometries.is_empty() {
            log::warn!("No feature of {:?} has a geometry", self.key);
            None
        } else {
            Some(geo::Geometry::MultiPolygon(unary_union(geometries)))
        };
        let mut attributes = match policy {
            AttributePolicy::First => first_attribute_values(&self.members),
            AttributePolicy::Drop => FeatureMap::new(),
        };
        attributes.insert(field.to_string(), self.key.to_value());
        log::debug!(
            "Dissolved {} features into {:?}",
            self.members.len(),
            self.key
        );
        Feature::new(geometry, Some(attributes))
    }
}
