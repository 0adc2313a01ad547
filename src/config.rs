use anyhow::{anyhow, Context};
use serde::Deserialize;
use std::{
    fs::read_to_string,
    path::{Path, PathBuf},
};

use crate::dissolve::{dissolver::DissolveParams, group::AttributePolicy};

pub const DEFAULT_INPUT_PATH: &str = "public/data/nepal_constituencies.geojson";
pub const DEFAULT_OUTPUT_PATH: &str = "public/data/nepal_districts.geojson";
pub const DEFAULT_GROUP_KEY: &str = "district";

/// Run configuration. Every field is optional in the YAML file and falls back to the defaults
/// above.
#[derive(Deserialize, Debug, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub group_key: String,
    pub attribute_policy: AttributePolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_INPUT_PATH),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            group_key: DEFAULT_GROUP_KEY.to_string(),
            attribute_policy: AttributePolicy::default(),
        }
    }
}

impl From<Config> for DissolveParams {
    fn from(config: Config) -> Self {
        Self {
            input_path: config.input_path,
            output_path: config.output_path,
            group_key: config.group_key,
            attribute_policy: config.attribute_policy,
        }
    }
}

pub fn load_config(config_filepath: &Path) -> anyhow::Result<Config> {
    if !config_filepath.exists() {
        return Err(anyhow!("Config file {:?} not found", config_filepath));
    }
    let config_contents = read_to_string(config_filepath)?;
    // An empty file parses as YAML null rather than an empty mapping.
    if config_contents.trim().is_empty() {
        return Ok(Config::default());
    }
    serde_yaml::from_str(&config_contents)
        .with_context(|| format!("Parsing config file {:?}", config_filepath))
}

#[cfg(test)]
mod tests {
    use std::{fs, path::PathBuf};

    use rstest::rstest;
    use testdir::testdir;

    use crate::dissolve::group::AttributePolicy;

    use super::{load_config, Config, DEFAULT_GROUP_KEY, DEFAULT_OUTPUT_PATH};

    #[rstest]
    fn test_load_config_overrides_subset() {
        let test_dir = testdir!();
        let config_filepath = test_dir.join("config.yaml");
        fs::write(
            &config_filepath,
            "input_path: data/constituencies.geojson\nattribute_policy: drop\n",
        )
        .unwrap();

        let config = load_config(&config_filepath).unwrap();
        assert_eq!(
            Config {
                input_path: PathBuf::from("data/constituencies.geojson"),
                output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
                group_key: DEFAULT_GROUP_KEY.to_string(),
                attribute_policy: AttributePolicy::Drop,
            },
            config
        );
    }

    #[rstest]
    fn test_load_empty_config_uses_defaults() {
        let test_dir = testdir!();
        let config_filepath = test_dir.join("config.yaml");
        fs::write(&config_filepath, "").unwrap();

        assert_eq!(Config::default(), load_config(&config_filepath).unwrap());
    }

    #[rstest]
    #[case("group_key: [district]\n")]
    #[case("attribute_policy: sum\n")]
    #[case("grouping_key: province\n")]
    fn test_load_invalid_config(#[case] contents: &str) {
        let test_dir = testdir!();
        let config_filepath = test_dir.join("config.yaml");
        fs::write(&config_filepath, contents).unwrap();

        assert!(load_config(&config_filepath).is_err());
    }

    #[rstest]
    fn test_load_missing_config() {
        let test_dir = testdir!();
        assert!(load_config(&test_dir.join("absent.yaml")).is_err());
    }
}
