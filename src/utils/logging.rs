// src/utils/logging.rs - Logging helpers for per-group analysis
use env_logger::{Builder, Env};
use log::{info, warn, LevelFilter};
use std::time::Instant;

/// Logger reading `RUST_LOG` with an `info` default. `verbose` forces debug
/// output regardless of the environment filter.
pub fn logger_builder(env: Env<'_>, verbose: bool) -> Builder {
    let mut builder = Builder::from_env(env.default_filter_or("info"));
    if verbose {
        builder.filter_level(LevelFilter::Debug);
    }
    builder
}

pub fn init_logger(verbose: bool) {
    logger_builder(Env::default(), verbose).init();
}

#[derive(Clone)]
pub struct GroupLogger {
    group_name: &'static str,
    start_time: Instant,
}

impl GroupLogger {
    pub fn new(group_name: &'static str) -> Self {
        Self {
            group_name,
            start_time: Instant::now(),
        }
    }

    pub fn log_start(&self, training_rows: usize, evaluation_rows: usize) {
        info!(
            "[{}] 🚀 Starting analysis ({} training records, {} evaluation records)",
            self.group_name, training_rows, evaluation_rows
        );
    }

    pub fn log_phase(&self, phase: &str, details: Option<&str>) {
        let elapsed = self.start_time.elapsed();
        if let Some(details) = details {
            info!(
                "[{}] 🔄 Phase: {} - {} [+{:.3}s]",
                self.group_name,
                phase,
                details,
                elapsed.as_secs_f32()
            );
        } else {
            info!(
                "[{}] 🔄 Phase: {} [+{:.3}s]",
                self.group_name,
                phase,
                elapsed.as_secs_f32()
            );
        }
    }

    pub fn log_feature_auc(&self, feature: &str, auc: f64) {
        info!("[{}] 📊 AUC for {} = {:.4}", self.group_name, feature, auc);
    }

    pub fn log_missing_evaluation(&self, position: usize, available: usize) {
        warn!(
            "[{}] ⚠️ Evaluation record {} requested but only {} available; skipping probability",
            self.group_name, position, available
        );
    }

    pub fn log_complete(&self, boundary_segments: usize) {
        info!(
            "[{}] ✅ Complete: {} boundary segments [+{:.3}s]",
            self.group_name,
            boundary_segments,
            self.start_time.elapsed().as_secs_f32()
        );
    }
}
