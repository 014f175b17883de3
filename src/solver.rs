use indexmap::IndexMap;
use rayon::prelude::*;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Persistence seam between the generator and an external hydraulic
/// solver: patterns are handed over and recovered by trial id.
pub trait PatternStore {
    fn write_patterns(
        &self,
        trial_id: &str,
        patterns: &IndexMap<String, Vec<f64>>,
    ) -> anyhow::Result<()>;

    fn read_patterns(&self, trial_id: &str) -> anyhow::Result<IndexMap<String, Vec<f64>>>;
}

/// File-backed [`PatternStore`] keeping one JSON document per trial.
/// Patterns survive the round trip bit for bit, so a solver run can be
/// re-driven from the store without regenerating the trial.
pub struct JsonPatternStore {
    dir: PathBuf,
}

impl JsonPatternStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, trial_id: &str) -> PathBuf {
        self.dir.join(format!("{trial_id}_patterns.json"))
    }
}

impl PatternStore for JsonPatternStore {
    fn write_patterns(
        &self,
        trial_id: &str,
        patterns: &IndexMap<String, Vec<f64>>,
    ) -> anyhow::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let writer = BufWriter::new(File::create(self.path_for(trial_id))?);
        serde_json::to_writer(writer, patterns)?;
        Ok(())
    }

    fn read_patterns(&self, trial_id: &str) -> anyhow::Result<IndexMap<String, Vec<f64>>> {
        let reader = BufReader::new(File::open(self.path_for(trial_id))?);
        Ok(serde_json::from_reader(reader)?)
    }
}

/// Read access to one completed solver run.
pub trait SolverResults {
    /// Solved quantity at a node and timestep, None when the run does not
    /// cover that node or step.
    fn value(&self, node_label: &str, step: usize) -> Option<f64>;
}

/// An external hydraulic solver driven once per trial.
pub trait Solver {
    type Results: SolverResults;

    fn solve(
        &self,
        trial_id: &str,
        patterns: &IndexMap<String, Vec<f64>>,
    ) -> anyhow::Result<Self::Results>;
}

/// Fan a batch of solver runs out across the thread pool. One failed trial
/// is logged and reported as None in its slot rather than aborting the
/// rest of the batch; output order matches input order.
pub fn run_batch<S>(
    solver: &S,
    trials: &[(String, IndexMap<String, Vec<f64>>)],
) -> Vec<Option<S::Results>>
where
    S: Solver + Sync,
    S::Results: Send,
{
    trials
        .par_iter()
        .map(|(trial_id, patterns)| match solver.solve(trial_id, patterns) {
            Ok(results) => Some(results),
            Err(error) => {
                warn!(trial_id = %trial_id, %error, "solver run failed");
                None
            }
        })
        .collect()
}

/// Best-effort removal of intermediate solver artifacts with the given
/// extensions. Cleanup problems are logged, never fatal.
pub fn clean_artifacts(dir: &Path, extensions: &[&str]) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(error) => {
            warn!(dir = %dir.display(), %error, "could not scan artifact directory");
            return;
        }
    };
    for entry in entries.flatten() {
        let path = entry.path();
        let matches = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| extensions.contains(&ext));
        if matches {
            if let Err(error) = fs::remove_file(&path) {
                warn!(path = %path.display(), %error, "could not remove artifact");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;
    use std::fs;

    fn scratch_dir(label: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("ppm-{label}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    fn sample_patterns() -> IndexMap<String, Vec<f64>> {
        IndexMap::from([
            ("F1CP".to_string(), vec![0., 2., 2., 0.]),
            ("F1HP".to_string(), vec![0., 0., 0.5, 0.]),
            ("SourceCP".to_string(), vec![0., 2., 2.5, 0.]),
        ])
    }

    #[rstest]
    fn patterns_survive_the_store_round_trip() {
        let dir = scratch_dir("store");
        let store = JsonPatternStore::new(&dir);
        let patterns = sample_patterns();
        store.write_patterns("MC-P1_model-0", &patterns).unwrap();
        let read_back = store.read_patterns("MC-P1_model-0").unwrap();
        assert_eq!(read_back, patterns);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[rstest]
    fn reading_an_unknown_trial_fails() {
        let dir = scratch_dir("missing");
        let store = JsonPatternStore::new(&dir);
        assert!(store.read_patterns("no-such-trial").is_err());
        let _ = fs::remove_dir_all(&dir);
    }

    struct PeakDemand(f64);

    impl SolverResults for PeakDemand {
        fn value(&self, node_label: &str, step: usize) -> Option<f64> {
            (node_label == "SourceC" && step == 0).then_some(self.0)
        }
    }

    /// Test double standing in for an external hydraulic solver.
    struct FakeSolver;

    impl Solver for FakeSolver {
        type Results = PeakDemand;

        fn solve(
            &self,
            trial_id: &str,
            patterns: &IndexMap<String, Vec<f64>>,
        ) -> anyhow::Result<Self::Results> {
            if trial_id.ends_with("-bad") {
                anyhow::bail!("hydraulics did not converge");
            }
            let peak = patterns
                .get("SourceCP")
                .and_then(|pattern| pattern.iter().copied().reduce(f64::max))
                .unwrap_or_default();
            Ok(PeakDemand(peak))
        }
    }

    #[rstest]
    fn batch_preserves_order_and_isolates_failures() {
        let trials = vec![
            ("t-0".to_string(), sample_patterns()),
            ("t-bad".to_string(), sample_patterns()),
            ("t-2".to_string(), sample_patterns()),
        ];
        let results = run_batch(&FakeSolver, &trials);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap().value("SourceC", 0), Some(2.5));
        assert!(results[1].is_none());
        assert!(results[2].is_some());
    }

    #[rstest]
    fn clean_artifacts_removes_only_matching_extensions() {
        let dir = scratch_dir("clean");
        fs::create_dir_all(&dir).unwrap();
        for name in ["run.rpt", "run.bin", "keep.json"] {
            fs::write(dir.join(name), b"x").unwrap();
        }
        clean_artifacts(&dir, &["rpt", "bin"]);
        assert!(!dir.join("run.rpt").exists());
        assert!(!dir.join("run.bin").exists());
        assert!(dir.join("keep.json").exists());
        fs::remove_dir_all(&dir).unwrap();
    }

    #[rstest]
    fn clean_artifacts_tolerates_a_missing_directory() {
        clean_artifacts(Path::new("/definitely/not/here"), &["rpt"]);
    }
}
