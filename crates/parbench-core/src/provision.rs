//! Input provisioning for dataset-backed algorithms.
//!
//! A dataset is keyed by (protocol token, effective size). It is generated
//! once, persisted, and reused by every process count and trial of that key
//! so timing differences come from execution alone.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::catalog::{AlgorithmSpec, InputMode};
use crate::error::BenchError;
use crate::matrix::effective_size;

/// A persisted, read-only integer sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    pub path: PathBuf,
    /// Number of values, equal to the effective size.
    pub size: u64,
}

impl Dataset {
    /// Read the values back.
    ///
    /// Fails unless the file holds exactly `size` integers, each below `size`.
    pub fn load(&self) -> Result<Vec<u64>, BenchError> {
        let content = fs::read_to_string(&self.path).map_err(|e| provision_err(&self.path, e))?;
        let values = content
            .split_ascii_whitespace()
            .map(|tok| {
                tok.parse::<u64>()
                    .map_err(|e| self.invalid(e.to_string()))
                    .and_then(|v| {
                        if v < self.size {
                            Ok(v)
                        } else {
                            Err(self.invalid(format!("value {v} out of range")))
                        }
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        if values.len() as u64 != self.size {
            return Err(self.invalid(format!(
                "{} values, expected {}",
                values.len(),
                self.size
            )));
        }
        Ok(values)
    }

    fn invalid(&self, reason: String) -> BenchError {
        provision_err(
            &self.path,
            std::io::Error::new(std::io::ErrorKind::InvalidData, reason),
        )
    }
}

/// Generates datasets on first use and hands out the same file afterwards.
pub struct DatasetProvisioner {
    dir: PathBuf,
    seed: u64,
    cache: HashMap<(&'static str, u64), Dataset>,
}

impl DatasetProvisioner {
    /// Provisioner writing under `dir`, drawing values from `seed`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>, seed: u64) -> Self {
        Self {
            dir: dir.into(),
            seed,
            cache: HashMap::new(),
        }
    }

    /// Directory datasets are written to.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Keyed location of a dataset.
    #[must_use]
    pub fn dataset_path(&self, token: &str, size: u64) -> PathBuf {
        self.dir.join(format!("input_{token}_{size}.txt"))
    }

    /// Ensure the dataset for `spec` at `requested` size exists.
    ///
    /// Returns `None` for parameter-only algorithms.
    pub fn provision(
        &mut self,
        spec: &AlgorithmSpec,
        requested: u64,
    ) -> Result<Option<Dataset>, BenchError> {
        if spec.input_mode() == InputMode::Parameters {
            return Ok(None);
        }

        let size = effective_size(spec, requested);
        let key = (spec.token, size);
        if let Some(ds) = self.cache.get(&key) {
            return Ok(Some(ds.clone()));
        }

        let ds = Dataset {
            path: self.dataset_path(spec.token, size),
            size,
        };
        if !ds.path.exists() {
            self.generate(spec.token, size, &ds.path)?;
        } else if let Err(e) = ds.load() {
            tracing::warn!(
                path = %ds.path.display(),
                size,
                error = %e,
                "regenerating stale dataset"
            );
            self.generate(spec.token, size, &ds.path)?;
        } else {
            tracing::info!(path = %ds.path.display(), size, "reusing existing dataset");
        }

        self.cache.insert(key, ds.clone());
        Ok(Some(ds))
    }

    fn generate(&self, token: &str, size: u64, path: &Path) -> Result<(), BenchError> {
        fs::create_dir_all(&self.dir).map_err(|e| provision_err(&self.dir, e))?;

        let tmp = path.with_extension("txt.tmp");
        let mut rng = StdRng::seed_from_u64(dataset_seed(self.seed, token, size));
        let mut write = || -> std::io::Result<()> {
            let mut out = BufWriter::new(File::create(&tmp)?);
            for i in 0..size {
                if i > 0 {
                    out.write_all(b" ")?;
                }
                write!(out, "{}", rng.random_range(0..size))?;
            }
            out.write_all(b"\n")?;
            out.flush()
        };
        write().map_err(|e| provision_err(&tmp, e))?;
        fs::rename(&tmp, path).map_err(|e| provision_err(path, e))?;

        tracing::info!(path = %path.display(), size, "generated dataset");
        Ok(())
    }
}

/// Per-key seed so each dataset is reproducible on its own.
#[must_use]
pub fn dataset_seed(seed: u64, token: &str, size: u64) -> u64 {
    let mut h = seed ^ 0xCBF2_9CE4_8422_2325;
    for b in token.bytes().chain(size.to_le_bytes()) {
        h ^= u64::from(b);
        h = h.wrapping_mul(0x0100_0000_01B3);
    }
    h
}

fn provision_err(path: &Path, source: std::io::Error) -> BenchError {
    BenchError::Provision {
        path: path.display().to_string(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::find;
    use tempfile::TempDir;

    #[test]
    fn parameter_algorithms_need_no_dataset() {
        let dir = TempDir::new().unwrap();
        let mut prov = DatasetProvisioner::new(dir.path(), 1);
        assert!(prov.provision(find("prime").unwrap(), 1000).unwrap().is_none());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn dataset_is_padded_and_bounded() {
        let dir = TempDir::new().unwrap();
        let mut prov = DatasetProvisioner::new(dir.path(), 7);
        let ds = prov
            .provision(find("radix").unwrap(), 1000)
            .unwrap()
            .unwrap();
        assert_eq!(ds.size, 1024);
        assert!(ds.path.ends_with("input_4_1024.txt"));
        let values = ds.load().unwrap();
        assert_eq!(values.len(), 1024);
        assert!(values.iter().all(|&v| v < 1024));
    }

    #[test]
    fn same_key_is_not_regenerated() {
        let dir = TempDir::new().unwrap();
        let mut prov = DatasetProvisioner::new(dir.path(), 3);
        let spec = find("bitonic").unwrap();
        let first = prov.provision(spec, 64).unwrap().unwrap();
        let before = fs::read_to_string(&first.path).unwrap();
        let mtime = fs::metadata(&first.path).unwrap().modified().unwrap();

        let second = prov.provision(spec, 60).unwrap().unwrap();
        assert_eq!(first, second);
        assert_eq!(fs::read_to_string(&second.path).unwrap(), before);
        assert_eq!(fs::metadata(&second.path).unwrap().modified().unwrap(), mtime);
    }

    #[test]
    fn existing_file_survives_a_new_provisioner() {
        let dir = TempDir::new().unwrap();
        let spec = find("sample").unwrap();
        let path = {
            let mut prov = DatasetProvisioner::new(dir.path(), 3);
            prov.provision(spec, 32).unwrap().unwrap().path
        };
        let before = fs::read_to_string(&path).unwrap();

        // different seed would produce different data if it regenerated
        let mut prov = DatasetProvisioner::new(dir.path(), 99);
        prov.provision(spec, 32).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), before);
    }

    #[test]
    fn load_rejects_wrong_count_and_range() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("input_4_4.txt");
        let ds = Dataset {
            path: path.clone(),
            size: 4,
        };

        fs::write(&path, "0 3 1 2\n").unwrap();
        assert_eq!(ds.load().unwrap(), [0, 3, 1, 2]);
        for bad in ["0 1 2", "0 1 2 3 0", "0 1 2 4", "0 1 x 3", ""] {
            fs::write(&path, bad).unwrap();
            assert!(
                matches!(ds.load(), Err(BenchError::Provision { .. })),
                "{bad:?} should not load"
            );
        }
    }

    #[test]
    fn out_of_range_file_is_regenerated() {
        let dir = TempDir::new().unwrap();
        let mut prov = DatasetProvisioner::new(dir.path(), 3);
        let path = prov.dataset_path("4", 4);
        fs::write(&path, "9 9 9 9").unwrap();

        let ds = prov.provision(find("radix").unwrap(), 4).unwrap().unwrap();
        assert!(ds.load().unwrap().iter().all(|&v| v < 4));
    }

    #[test]
    fn stale_file_is_regenerated() {
        let dir = TempDir::new().unwrap();
        let mut prov = DatasetProvisioner::new(dir.path(), 3);
        let path = prov.dataset_path("4", 16);
        fs::write(&path, "1 2 3").unwrap();

        let ds = prov.provision(find("radix").unwrap(), 16).unwrap().unwrap();
        assert_eq!(ds.load().unwrap().len(), 16);
    }

    #[test]
    fn datasets_are_keyed_by_token() {
        let dir = TempDir::new().unwrap();
        let mut prov = DatasetProvisioner::new(dir.path(), 3);
        let a = prov.provision(find("radix").unwrap(), 8).unwrap().unwrap();
        let b = prov.provision(find("sample").unwrap(), 8).unwrap().unwrap();
        assert_ne!(a.path, b.path);
    }

    #[test]
    fn generation_is_deterministic_per_seed() {
        let a = TempDir::new().unwrap();
        let b = TempDir::new().unwrap();
        let spec = find("quick-search").unwrap();
        let da = DatasetProvisioner::new(a.path(), 42)
            .provision(spec, 100)
            .unwrap()
            .unwrap();
        let db = DatasetProvisioner::new(b.path(), 42)
            .provision(spec, 100)
            .unwrap()
            .unwrap();
        assert_eq!(da.load().unwrap(), db.load().unwrap());
    }

    #[test]
    fn no_temp_file_left_behind() {
        let dir = TempDir::new().unwrap();
        let mut prov = DatasetProvisioner::new(dir.path(), 3);
        prov.provision(find("radix").unwrap(), 8).unwrap();
        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["input_4_8.txt"]);
    }

    #[test]
    fn dataset_seed_varies_by_key() {
        assert_ne!(dataset_seed(1, "3", 8), dataset_seed(1, "5", 8));
        assert_ne!(dataset_seed(1, "3", 8), dataset_seed(1, "3", 16));
        assert_eq!(dataset_seed(1, "3", 8), dataset_seed(1, "3", 8));
    }
}
