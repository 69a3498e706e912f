use anyhow::Result;
use serde_json::Value;

use crate::config::TrainConfig;

mod csv_logger;

pub use csv_logger::CsvLogger;

/// A sink for experiment metrics
pub trait ExperimentLogger {
    /// Record `value` for the scalar `name` at `step`
    fn log_scalar(&mut self, name: &str, value: f64, step: u64) -> Result<()>;

    /// Record the run's hyperparameters, given as a JSON object
    fn log_hparams(&mut self, hparams: &Value) -> Result<()>;
}

impl<T: ExperimentLogger + ?Sized> ExperimentLogger for Box<T> {
    fn log_scalar(&mut self, name: &str, value: f64, step: u64) -> Result<()> {
        (**self).log_scalar(name, value, step)
    }

    fn log_hparams(&mut self, hparams: &Value) -> Result<()> {
        (**self).log_hparams(hparams)
    }
}

/// Open the experiment logger for a run
///
/// `tracker` builds a remote experiment tracker from the run's configuration, which carries
/// the experiment name, its `tags` and whether the run is `offline`. If it fails, metrics go
/// to a [`CsvLogger`] under `<output_dir>/<exp_name>` instead.
pub fn open_logger<P, F>(config: &TrainConfig, tracker: F) -> Result<Box<dyn ExperimentLogger>>
where
    P: ExperimentLogger + 'static,
    F: FnOnce(&TrainConfig) -> Result<P>,
{
    match tracker(config) {
        Ok(logger) => {
            log::info!(
                "tracking {} (offline: {}, tags: {:?})",
                config.exp_name,
                config.offline,
                config.tags
            );
            Ok(Box::new(logger))
        }
        Err(e) => {
            log::warn!("experiment tracker unavailable ({e:#}); falling back to CSV logging");
            Ok(Box::new(CsvLogger::new(&config.output_dir, &config.exp_name)?))
        }
    }
}
