//! Run storage API.
//!
//! Layout: `<root>/<run_id>/manifest.json` plus `trajectory.jsonl` with one
//! [`SampleRecord`] per line.

use std::fs;
use std::path::{Path, PathBuf};

use sf_core::Trajectory;
use tracing::debug;

use crate::types::{RunManifest, SampleRecord};
use crate::{ResultsError, ResultsResult};

const MANIFEST_FILE: &str = "manifest.json";
const TRAJECTORY_FILE: &str = "trajectory.jsonl";

#[derive(Clone, Debug)]
pub struct RunStore {
    root_dir: PathBuf,
}

impl RunStore {
    pub fn new(root_dir: impl Into<PathBuf>) -> ResultsResult<Self> {
        let root_dir = root_dir.into();
        fs::create_dir_all(&root_dir)?;
        Ok(Self { root_dir })
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    fn run_dir(&self, run_id: &str) -> PathBuf {
        self.root_dir.join(run_id)
    }

    pub fn has_run(&self, run_id: &str) -> bool {
        self.run_dir(run_id).join(MANIFEST_FILE).exists()
    }

    /// Write a run, replacing any earlier run with the same id.
    pub fn save_run(&self, manifest: &RunManifest, trajectory: &Trajectory) -> ResultsResult<()> {
        let run_dir = self.run_dir(&manifest.run_id);
        fs::create_dir_all(&run_dir)?;

        let manifest_json = serde_json::to_string_pretty(manifest)?;
        fs::write(run_dir.join(MANIFEST_FILE), manifest_json)?;

        let mut content = String::new();
        for (j, t) in trajectory.times.iter().enumerate() {
            let record = SampleRecord {
                t: *t,
                y: trajectory.states.column(j).iter().copied().collect(),
            };
            content.push_str(&serde_json::to_string(&record)?);
            content.push('\n');
        }
        fs::write(run_dir.join(TRAJECTORY_FILE), content)?;

        debug!(
            run_id = %manifest.run_id,
            samples = trajectory.len(),
            "saved run"
        );
        Ok(())
    }

    pub fn load_manifest(&self, run_id: &str) -> ResultsResult<RunManifest> {
        let manifest_path = self.run_dir(run_id).join(MANIFEST_FILE);

        if !manifest_path.exists() {
            return Err(ResultsError::RunNotFound {
                run_id: run_id.to_string(),
            });
        }

        let content = fs::read_to_string(manifest_path)?;
        let manifest = serde_json::from_str(&content)?;
        Ok(manifest)
    }

    /// Rebuild the stored trajectory; every record must carry the manifest's
    /// number of dimensions.
    pub fn load_trajectory(&self, run_id: &str) -> ResultsResult<Trajectory> {
        let manifest = self.load_manifest(run_id)?;
        let path = self.run_dir(run_id).join(TRAJECTORY_FILE);
        if !path.exists() {
            return Err(ResultsError::RunNotFound {
                run_id: run_id.to_string(),
            });
        }

        let content = fs::read_to_string(path)?;
        let mut times = Vec::new();
        let mut rows = vec![Vec::new(); manifest.dimensions];
        for (i, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let record: SampleRecord = serde_json::from_str(line)?;
            if record.y.len() != manifest.dimensions {
                return Err(ResultsError::CorruptRecord {
                    line: i + 1,
                    message: format!(
                        "expected {} state values, found {}",
                        manifest.dimensions,
                        record.y.len()
                    ),
                });
            }
            times.push(record.t);
            for (row, v) in rows.iter_mut().zip(record.y) {
                row.push(v);
            }
        }

        Ok(Trajectory::from_rows(times, &rows)?)
    }

    /// Runs of `system_id`, oldest first.
    pub fn list_runs(&self, system_id: &str) -> ResultsResult<Vec<RunManifest>> {
        let mut runs = Vec::new();

        if !self.root_dir.exists() {
            return Ok(runs);
        }

        for entry in fs::read_dir(&self.root_dir)? {
            let entry = entry?;
            if entry.path().is_dir() {
                let run_id = entry.file_name().to_string_lossy().to_string();
                if let Ok(manifest) = self.load_manifest(&run_id)
                    && manifest.system_id == system_id
                {
                    runs.push(manifest);
                }
            }
        }

        runs.sort_by(|a, b| {
            a.timestamp
                .cmp(&b.timestamp)
                .then_with(|| a.run_id.cmp(&b.run_id))
        });
        Ok(runs)
    }

    pub fn delete_run(&self, run_id: &str) -> ResultsResult<()> {
        let run_dir = self.run_dir(run_id);
        if run_dir.exists() {
            fs::remove_dir_all(run_dir)?;
        }
        Ok(())
    }
}
