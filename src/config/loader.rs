//! Configuration file loading and validation.
//!
//! The pipeline configuration is a single YAML file passed to every stage
//! with `--config`. It is parsed and validated eagerly, before any step
//! runs, so a bad configuration never creates partial state.

use crate::config::schema::PipelineConfig;
use crate::error::{Result, SeqpipeError};
use std::fs;
use std::path::Path;

/// Load and validate the pipeline config at `path`.
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file doesn't exist,
/// `ConfigParseError` if the YAML is invalid, and
/// `ConfigValidationError` / `MissingInputFile` for structural problems.
pub fn load_config(path: &Path) -> Result<PipelineConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            SeqpipeError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            SeqpipeError::Io(e)
        }
    })?;

    let config = parse_config(&content, path)?;
    validate_config(&config)?;
    Ok(config)
}

/// Parse YAML content into a [`PipelineConfig`].
pub fn parse_config(content: &str, source_path: &Path) -> Result<PipelineConfig> {
    serde_yaml::from_str(content).map_err(|e| SeqpipeError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Validate a parsed configuration.
///
/// Required fields must be present and the reference resources must exist
/// on disk. Tool paths are not checked here: bare names like `bwa` are
/// resolved through `PATH` at spawn time on the compute node.
pub fn validate_config(config: &PipelineConfig) -> Result<()> {
    if config.reference.as_os_str().is_empty() {
        return Err(SeqpipeError::ConfigValidationError {
            message: "missing required field 'reference'".into(),
        });
    }
    if config.dbsnp.as_os_str().is_empty() {
        return Err(SeqpipeError::ConfigValidationError {
            message: "missing required field 'dbsnp'".into(),
        });
    }
    if config.genome_build.is_empty() {
        return Err(SeqpipeError::ConfigValidationError {
            message: "missing required field 'genome_build'".into(),
        });
    }
    if config.threads == 0 {
        return Err(SeqpipeError::ConfigValidationError {
            message: "'threads' must be at least 1".into(),
        });
    }

    for path in [&config.reference, &config.dbsnp] {
        if !path.exists() {
            return Err(SeqpipeError::MissingInputFile { path: path.clone() });
        }
    }
    if let Some(key) = &config.phone_home_key {
        if !key.exists() {
            return Err(SeqpipeError::MissingInputFile { path: key.clone() });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_resources(dir: &TempDir) -> (std::path::PathBuf, std::path::PathBuf) {
        let reference = dir.path().join("genome.fa");
        let dbsnp = dir.path().join("dbsnp.vcf");
        fs::write(&reference, ">chr1\nACGT\n").unwrap();
        fs::write(&dbsnp, "##fileformat=VCFv4.2\n").unwrap();
        (reference, dbsnp)
    }

    #[test]
    fn load_valid_config() {
        let dir = TempDir::new().unwrap();
        let (reference, dbsnp) = write_resources(&dir);
        let path = dir.path().join("pipeline.yml");
        fs::write(
            &path,
            format!(
                "reference: {}\ndbsnp: {}\ngenome_build: GRCh38\n",
                reference.display(),
                dbsnp.display()
            ),
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.genome_build, "GRCh38");
    }

    #[test]
    fn missing_file_is_config_not_found() {
        let err = load_config(Path::new("/nonexistent/pipeline.yml")).unwrap_err();
        assert!(matches!(err, SeqpipeError::ConfigNotFound { .. }));
    }

    #[test]
    fn invalid_yaml_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pipeline.yml");
        fs::write(&path, "reference: [unclosed\n").unwrap();
        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, SeqpipeError::ConfigParseError { .. }));
    }

    #[test]
    fn missing_genome_build_fails_validation() {
        let dir = TempDir::new().unwrap();
        let (reference, dbsnp) = write_resources(&dir);
        let path = dir.path().join("pipeline.yml");
        fs::write(
            &path,
            format!("reference: {}\ndbsnp: {}\n", reference.display(), dbsnp.display()),
        )
        .unwrap();
        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, SeqpipeError::ConfigValidationError { .. }));
    }

    #[test]
    fn absent_reference_is_missing_input() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pipeline.yml");
        fs::write(
            &path,
            "reference: /no/such/genome.fa\ndbsnp: /no/such/dbsnp.vcf\ngenome_build: hg19\n",
        )
        .unwrap();
        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, SeqpipeError::MissingInputFile { .. }));
    }
}
