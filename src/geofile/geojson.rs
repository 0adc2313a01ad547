use anyhow::{anyhow, Context};
use std::{fs, io::BufReader, path::Path};

use super::feature::Feature;

/// Read all features of a GeoJSON file.
///
/// The root object must be a FeatureCollection or a single Feature. Geometries are converted to
/// `geo` types; a feature with a null geometry is kept with `geometry: None`.
pub fn read_features_from_geojson(filepath: &Path) -> anyhow::Result<Vec<Feature>> {
    let file = fs::File::open(filepath).with_context(|| format!("Opening {:?}", filepath))?;
    let geojson = geojson::GeoJson::from_reader(BufReader::new(file))
        .with_context(|| format!("Parsing GeoJSON from {:?}", filepath))?;

    let geojson_features = match geojson {
        geojson::GeoJson::FeatureCollection(feature_collection) => feature_collection.features,
        geojson::GeoJson::Feature(feature) => vec![feature],
        geojson::GeoJson::Geometry(_) => {
            return Err(anyhow!(
                "{:?} holds a bare geometry, expected a FeatureCollection",
                filepath
            ))
        }
    };

    geojson_features
        .into_iter()
        .enumerate()
        .map(|(index, geojson_feature)| {
            let geometry = match geojson_feature.geometry {
                Some(geometry) => Some(
                    geo::Geometry::<f64>::try_from(geometry)
                        .with_context(|| format!("Converting geometry of feature {}", index))?,
                ),
                None => None,
            };
            Ok(Feature::new(geometry, geojson_feature.properties))
        })
        .collect()
}

fn to_geojson_feature(feature: &Feature) -> geojson::Feature {
    geojson::Feature {
        bbox: None,
        geometry: feature
            .geometry
            .as_ref()
            .map(|geometry| geojson::Geometry::new(geojson::Value::from(geometry))),
        id: None,
        properties: feature.attributes.clone(),
        foreign_members: None,
    }
}

/// Write features to `output_filepath` as a GeoJSON FeatureCollection, replacing any existing file.
pub fn write_features_to_geojson(
    features: &[Feature],
    output_filepath: &Path,
) -> anyhow::Result<()> {
    let feature_collection: geojson::FeatureCollection =
        features.iter().map(to_geojson_feature).collect();
    let geojson_contents = geojson::GeoJson::from(feature_collection);
    log::debug!(
        "Writing {} features to {:?}",
        features.len(),
        output_filepath
    );
    fs::write(output_filepath, geojson_contents.to_string())
        .with_context(|| format!("Writing GeoJSON to {:?}", output_filepath))
}
