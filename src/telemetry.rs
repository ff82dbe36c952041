//! CSV export for per-step episode telemetry.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::env::types::TwoAgentStep;

/// Schema v1 column header for CSV telemetry export.
const HEADER: &str = "step,main_soc,support_soc,support_soh,energy_demand,\
                      res_amount,reward_main,reward_support,done";

/// One exported telemetry row, taken from a step outcome.
#[derive(Debug, Clone)]
pub struct EpisodeRow {
    /// 1-based step index within the episode.
    pub step: u32,
    pub main_soc: f32,
    pub support_soc: f32,
    pub support_soh: f32,
    pub energy_demand: f32,
    pub res_amount: f32,
    pub reward_main: f32,
    pub reward_support: f32,
    pub done: bool,
}

impl EpisodeRow {
    /// Builds a row from a step outcome and its 1-based index.
    pub fn from_step(step: u32, outcome: &TwoAgentStep) -> Self {
        Self {
            step,
            main_soc: outcome.observation.main[0],
            support_soc: outcome.observation.support[0],
            support_soh: outcome.observation.support[3],
            energy_demand: outcome.observation.main[1],
            res_amount: outcome.observation.main[2],
            reward_main: outcome.rewards.main,
            reward_support: outcome.rewards.support,
            done: outcome.done,
        }
    }
}

/// Exports episode telemetry to a CSV file at the given path.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(rows: &[EpisodeRow], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(rows, buf)
}

/// Writes episode telemetry as CSV to any writer.
///
/// Writes a header row followed by one data row per step using the schema
/// v1 column layout. Produces deterministic output for identical inputs.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(rows: &[EpisodeRow], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(',').map(str::trim))?;

    for r in rows {
        wtr.write_record(&[
            r.step.to_string(),
            format!("{:.4}", r.main_soc),
            format!("{:.4}", r.support_soc),
            format!("{:.4}", r.support_soh),
            format!("{:.4}", r.energy_demand),
            format!("{:.4}", r.res_amount),
            format!("{:.4}", r.reward_main),
            format!("{:.4}", r.reward_support),
            r.done.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
