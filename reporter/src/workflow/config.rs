use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::generator::sample::SampleConfig;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DriverConfig {
    pub out_dir: PathBuf,
    pub count: usize,
    pub seed: u64,
}

impl DriverConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading driver config {}", path_ref.display()))?;
        let config: DriverConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing driver config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(out_dir: PathBuf, count: usize, seed: u64) -> Self {
        Self {
            out_dir,
            count,
            seed,
        }
    }

    pub fn to_sample_config(&self) -> SampleConfig {
        SampleConfig {
            count: self.count,
            seed: self.seed,
            ..SampleConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn config_from_args_produces_sample_config() {
        let cfg = DriverConfig::from_args(PathBuf::from("out"), 20, 99);
        let sample = cfg.to_sample_config();
        assert_eq!(sample.count, 20);
        assert_eq!(sample.seed, 99);
    }

    #[test]
    fn config_load_reads_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"out_dir: reports\ncount: 3\nseed: 11\n")
            .unwrap();
        let path = temp.into_temp_path();
        let cfg = DriverConfig::load(&path).unwrap();
        assert_eq!(cfg.count, 3);
        assert_eq!(cfg.out_dir, PathBuf::from("reports"));
    }
}
