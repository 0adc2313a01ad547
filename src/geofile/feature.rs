/// Attributes of a feature, as found in the `properties` member of a GeoJSON feature.
pub type FeatureMap = geojson::JsonObject;

#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    /// GeoJSON allows a feature without geometry, hence the option.
    pub geometry: Option<geo::Geometry>,
    pub attributes: Option<FeatureMap>,
}

impl Feature {
    pub fn new(geometry: Option<geo::Geometry>, attributes: Option<FeatureMap>) -> Self {
        Self {
            geometry,
            attributes,
        }
    }

    /// Value of the attribute `name`. A JSON null counts as absent.
    pub fn attribute(&self, name: &str) -> Option<&serde_json::Value> {
        self.attributes
            .as_ref()
            .and_then(|attributes| attributes.get(name))
            .filter(|value| !value.is_null())
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }
}

impl From<geo::Geometry> for Feature {
    fn from(value: geo::Geometry) -> Self {
        Self {
            geometry: Some(value),
            attributes: None,
        }
    }
}
