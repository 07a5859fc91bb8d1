use mask_polygons::ConversionCommand;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    SerdeError(#[from] serde_json::Error),
    #[error(transparent)]
    TomlDeError(#[from] toml::de::Error),
    #[error(transparent)]
    TomlSerError(#[from] toml::ser::Error),
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    #[error("Unsupported file format. Please use .toml or .json files")]
    UnsupportedFileFormat,
}

/// A job file: one conversion command plus an optional note
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ConversionJob {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub command: ConversionCommand,
}

impl ConversionJob {
    pub fn new(command: ConversionCommand) -> Self {
        Self {
            description: None,
            command,
        }
    }

    /// Load a job from a TOML file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, CliError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, CliError> {
        Ok(toml::from_str(content)?)
    }

    /// Load a job from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, CliError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, CliError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Auto-detect file format and load the job
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CliError> {
        let path_ref = path.as_ref();
        match path_ref.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_file(path),
            Some("json") => Self::from_json_file(path),
            _ => Err(CliError::UnsupportedFileFormat),
        }
    }

    pub fn to_toml_file<P: AsRef<Path>>(&self, path: P) -> Result<(), CliError> {
        fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String, CliError> {
        Ok(toml::to_string_pretty(&self)?)
    }

    pub fn to_json_file<P: AsRef<Path>>(&self, path: P) -> Result<(), CliError> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, CliError> {
        Ok(serde_json::to_string_pretty(&self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mask_polygons::{LoadParams, OutputPathPolicy, PixelAnchor, VectorizeParams};
    use std::path::PathBuf;

    fn vectorize_job() -> ConversionJob {
        ConversionJob {
            description: Some("tile 7 rooftops".to_string()),
            command: ConversionCommand::Vectorize(VectorizeParams {
                mask_path: PathBuf::from("masks/tile_07.tif"),
                image_path: PathBuf::from("images/tile_07.tif"),
                label: "roof".to_string(),
                geo: true,
                anchor: PixelAnchor::UpperLeft,
                output_policy: OutputPathPolicy::LegacyTifSubstring,
                ..Default::default()
            }),
        }
    }

    #[test]
    fn test_toml_job() {
        let content = r#"
            [command]
            type = "vectorize"

            [command.params]
            mask_path = "masks/tile_07.tif"
            image_path = "images/tile_07.tif"
            label = "roof"
            geo = true
        "#;
        let job = ConversionJob::from_toml(content).unwrap();
        match job.command {
            ConversionCommand::Vectorize(params) => {
                assert_eq!(params.label, "roof");
                assert!(params.geo);
                assert_eq!(params.anchor, PixelAnchor::Center);
            }
            other => panic!("unexpected command {}", other),
        }
    }

    #[test]
    fn test_toml_round_trip() {
        let job = vectorize_job();
        let parsed = ConversionJob::from_toml(&job.to_toml().unwrap()).unwrap();
        assert_eq!(parsed, job);
    }

    #[test]
    fn test_json_round_trip() {
        let job = ConversionJob::new(ConversionCommand::Load(LoadParams {
            json_path: PathBuf::from("images/tile_07.json"),
            geojson_output: Some(PathBuf::from("tile_07.geojson")),
        }));
        let parsed = ConversionJob::from_json(&job.to_json().unwrap()).unwrap();
        assert_eq!(parsed, job);
    }

    #[test]
    fn test_from_file_detects_format() {
        let dir = tempfile::tempdir().unwrap();
        let job = vectorize_job();

        let toml_path = dir.path().join("job.toml");
        job.to_toml_file(&toml_path).unwrap();
        assert_eq!(ConversionJob::from_file(&toml_path).unwrap(), job);

        let json_path = dir.path().join("job.json");
        job.to_json_file(&json_path).unwrap();
        assert_eq!(ConversionJob::from_file(&json_path).unwrap(), job);

        assert!(matches!(
            ConversionJob::from_file(dir.path().join("job.yaml")),
            Err(CliError::UnsupportedFileFormat)
        ));
    }
}
