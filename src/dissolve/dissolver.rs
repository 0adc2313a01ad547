use std::path::PathBuf;

use crate::geofile::geojson::{read_features_from_geojson, write_features_to_geojson};

use super::{
    error::DissolveError,
    group::{extract_group_keys, group_features, AttributePolicy},
    repair::repair_features,
};

#[derive(Debug, Clone)]
pub struct DissolveParams {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    /// Attribute whose value identifies the district a feature belongs to.
    pub group_key: String,
    pub attribute_policy: AttributePolicy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DissolveSummary {
    pub input_feature_count: usize,
    pub output_feature_count: usize,
}

/// Merge the features of `params.input_path` by their `params.group_key` value and write one
/// feature per distinct value to `params.output_path`.
///
/// The output is written as the very last step, so on any error no output file is created.
pub fn run(params: &DissolveParams) -> Result<DissolveSummary, DissolveError> {
    log::info!("Reading {:?}", params.input_path);
    if !params.input_path.exists() {
        return Err(DissolveError::MissingInput(params.input_path.clone()));
    }

    let features = read_features_from_geojson(&params.input_path).map_err(DissolveError::Load)?;
    let input_feature_count = features.len();
    log::info!("Loaded {} constituencies", input_feature_count);

    if !features
        .iter()
        .any(|feature| feature.has_attribute(&params.group_key))
    {
        return Err(DissolveError::MissingField(params.group_key.clone()));
    }
    let keys = extract_group_keys(&features, &params.group_key)?;

    log::info!("Fixing invalid geometries");
    let repaired_features = repair_features(features)?;

    log::info!("Dissolving by '{}'", params.group_key);
    let districts: Vec<_> = group_features(repaired_features, keys)
        .into_iter()
        .map(|group| group.dissolve(&params.group_key, params.attribute_policy))
        .collect();
    log::info!("Merged into {} districts", districts.len());

    log::info!("Saving to {:?}", params.output_path);
    write_features_to_geojson(&districts, &params.output_path).map_err(DissolveError::Save)?;
    log::info!("Done");

    Ok(DissolveSummary {
        input_feature_count,
        output_feature_count: districts.len(),
    })
}
