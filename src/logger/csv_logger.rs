use std::{
    collections::{hash_map::Entry, HashMap},
    fs::{self, File, OpenOptions},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde_json::Value;

use super::ExperimentLogger;

/// Logs an experiment to CSV files under `<log_dir>/<exp_name>`
///
/// Every scalar gets its own `scalars/<name>.csv` with `step,value` rows. Hyperparameters go to
/// `hparams.csv`.
pub struct CsvLogger {
    exp_dir: PathBuf,
    writers: HashMap<String, csv::Writer<File>>,
}

impl CsvLogger {
    pub fn new(log_dir: impl AsRef<Path>, exp_name: &str) -> Result<Self> {
        let exp_dir = log_dir.as_ref().join(exp_name);
        let scalars = exp_dir.join("scalars");
        fs::create_dir_all(&scalars)
            .with_context(|| format!("failed to create log directory {}", scalars.display()))?;
        Ok(Self {
            exp_dir,
            writers: HashMap::new(),
        })
    }

    pub fn exp_dir(&self) -> &Path {
        &self.exp_dir
    }

    fn writer(&mut self, name: &str) -> Result<&mut csv::Writer<File>> {
        let writer = match self.writers.entry(name.to_string()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let path = self.exp_dir.join("scalars").join(format!("{name}.csv"));
                let fresh = !path.exists();
                let file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(&path)
                    .with_context(|| format!("failed to open {}", path.display()))?;
                let mut writer = csv::Writer::from_writer(file);
                if fresh {
                    writer.write_record(["step", "value"])?;
                }
                entry.insert(writer)
            }
        };
        Ok(writer)
    }
}

impl ExperimentLogger for CsvLogger {
    fn log_scalar(&mut self, name: &str, value: f64, step: u64) -> Result<()> {
        let writer = self.writer(name)?;
        writer.write_record([step.to_string(), value.to_string()])?;
        writer.flush()?;
        Ok(())
    }

    fn log_hparams(&mut self, hparams: &Value) -> Result<()> {
        let path = self.exp_dir.join("hparams.csv");
        let mut writer = csv::Writer::from_path(&path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        writer.write_record(["key", "value"])?;
        if let Value::Object(map) = hparams {
            for (key, value) in map {
                let value = match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                writer.write_record([key.as_str(), value.as_str()])?;
            }
        }
        writer.flush()?;
        Ok(())
    }
}
