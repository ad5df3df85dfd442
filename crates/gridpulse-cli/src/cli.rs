use clap::{Parser, ValueEnum, ValueHint};
use gridpulse_core::CalendarConfig;
use gridpulse_io::ColumnMapping;
use std::path::PathBuf;

/// Interactive load analytics over a three-zone power consumption export.
#[derive(Parser, Debug)]
#[command(name = "gridpulse", author, version, about, long_about = None)]
pub struct Cli {
    /// CSV export with a timestamp column and three zone load columns
    #[arg(value_hint = ValueHint::FilePath)]
    pub input: PathBuf,

    /// Set the logging level (written to stderr)
    #[arg(long, default_value = "warn")]
    pub log_level: tracing::Level,

    /// Output format for operation results
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// First hour of the peak window (inclusive)
    #[arg(long, default_value_t = 18)]
    pub peak_start: u32,

    /// Last hour of the peak window (inclusive)
    #[arg(long, default_value_t = 22)]
    pub peak_end: u32,

    /// First weekday (0 = Monday) counted as weekend
    #[arg(long, default_value_t = 5)]
    pub weekend_start: u32,

    /// Timestamp column name
    #[arg(long, default_value = "Datetime")]
    pub timestamp_column: String,

    /// Zone load column names, in Zone1, Zone2, Zone3 order
    #[arg(
        long,
        value_delimiter = ',',
        default_values_t = [
            "PowerConsumption_Zone1".to_string(),
            "PowerConsumption_Zone2".to_string(),
            "PowerConsumption_Zone3".to_string(),
        ]
    )]
    pub zone_columns: Vec<String>,

    /// Number of trailing rows shown by the rolling trend table
    #[arg(long, default_value_t = 10)]
    pub trend_tail: usize,
}

impl Cli {
    pub fn calendar(&self) -> anyhow::Result<CalendarConfig> {
        Ok(CalendarConfig::new(
            self.peak_start,
            self.peak_end,
            self.weekend_start,
        )?)
    }

    pub fn column_mapping(&self) -> anyhow::Result<ColumnMapping> {
        let zones: [String; 3] = self.zone_columns.clone().try_into().map_err(|cols: Vec<String>| {
            anyhow::anyhow!("expected exactly 3 zone columns, got {}", cols.len())
        })?;
        Ok(ColumnMapping {
            timestamp: self.timestamp_column.clone(),
            zones,
        })
    }
}

/// Output format for operation results.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable tables and the interactive menu (default)
    #[default]
    Table,
    /// One JSON document per operation; the menu text is suppressed
    Json,
}
