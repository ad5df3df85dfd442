//! Presentation sink: renders core results as tables or JSON documents.

use crate::cli::OutputFormat;
use anyhow::{Context, Result};
use gridpulse_core::{
    BalancingAdvice, CalendarConfig, DayType, PeakType, RiskAssessment, RollingTrend, SegmentMeans,
    StatAnomalyReport, TimeSeriesFrame, WastageReport, ZoneScore,
};
use serde::Serialize;
use std::fmt::Display;
use std::io::Write;
use tabwriter::TabWriter;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Serialize)]
struct Envelope<'a, T: Serialize> {
    operation: &'a str,
    result: &'a T,
}

#[derive(Serialize)]
struct ErrorEnvelope<'a> {
    operation: &'a str,
    error: String,
}

#[derive(Serialize)]
struct TrendSeries<'a> {
    timestamps: Vec<String>,
    total_load: Vec<f64>,
    rolling_7: &'a [Option<f64>],
    rolling_30: &'a [Option<f64>],
}

pub struct Presenter<'a> {
    out: &'a mut dyn Write,
    format: OutputFormat,
    trend_tail: usize,
}

impl<'a> Presenter<'a> {
    pub fn new(out: &'a mut dyn Write, format: OutputFormat, trend_tail: usize) -> Self {
        Self {
            out,
            format,
            trend_tail,
        }
    }

    /// Free text shown only in table mode (menu, prompts, notices).
    pub fn text(&mut self, line: impl Display) -> Result<()> {
        if self.format == OutputFormat::Table {
            writeln!(self.out, "{line}")?;
        }
        Ok(())
    }

    pub fn prompt(&mut self, prompt: &str) -> Result<()> {
        if self.format == OutputFormat::Table {
            write!(self.out, "{prompt}")?;
            self.out.flush()?;
        }
        Ok(())
    }

    pub fn error(&mut self, operation: &str, err: impl Display) -> Result<()> {
        match self.format {
            OutputFormat::Table => writeln!(self.out, "⚠ {err}")?,
            OutputFormat::Json => self.json(&ErrorEnvelope {
                operation,
                error: err.to_string(),
            })?,
        }
        Ok(())
    }

    pub fn wastage(&mut self, report: &WastageReport) -> Result<()> {
        if self.format == OutputFormat::Json {
            return self.envelope("wastage_detection", report);
        }
        writeln!(self.out, "\nTotal Wastage Events: {}", report.flagged)?;
        writeln!(
            self.out,
            "  baseline mean {:.2} kW, std {:.2} kW, threshold {:.2} kW",
            report.baseline.mean(),
            report.baseline.std(),
            report.threshold
        )?;
        Ok(())
    }

    pub fn peak_offpeak(
        &mut self,
        means: &SegmentMeans<PeakType>,
        calendar: &CalendarConfig,
    ) -> Result<()> {
        self.segments("peak_offpeak", "Average Load (Peak vs Off-Peak)", means)?;
        self.text(format!(
            "  peak window {:02}:00-{:02}:59",
            calendar.peak_start_hour, calendar.peak_end_hour
        ))
    }

    pub fn weekday_weekend(&mut self, means: &SegmentMeans<DayType>) -> Result<()> {
        self.segments("weekday_weekend", "Weekday vs Weekend Load", means)
    }

    pub fn rolling_trend(&mut self, frame: &TimeSeriesFrame, trend: &RollingTrend) -> Result<()> {
        let rows = frame.rows();
        if self.format == OutputFormat::Json {
            let series = TrendSeries {
                timestamps: rows
                    .iter()
                    .map(|row| row.reading.timestamp.format(TIMESTAMP_FORMAT).to_string())
                    .collect(),
                total_load: frame.total_loads(),
                rolling_7: &trend.short,
                rolling_30: &trend.long,
            };
            return self.envelope("rolling_trend", &series);
        }

        writeln!(
            self.out,
            "\nRolling Load Trend (last {} of {} readings)",
            self.trend_tail.min(rows.len()),
            rows.len()
        )?;
        let start = rows.len().saturating_sub(self.trend_tail);
        let mut writer = TabWriter::new(&mut *self.out);
        writeln!(writer, "TIMESTAMP\tTOTAL LOAD\tROLLING 7\tROLLING 30")?;
        for (i, row) in rows.iter().enumerate().skip(start) {
            writeln!(
                writer,
                "{}\t{:.2}\t{}\t{}",
                row.reading.timestamp.format(TIMESTAMP_FORMAT),
                row.total_load,
                optional(trend.short[i]),
                optional(trend.long[i])
            )?;
        }
        writer.flush().context("writing rolling trend table")?;
        Ok(())
    }

    pub fn risk(&mut self, assessment: &RiskAssessment) -> Result<()> {
        if self.format == OutputFormat::Json {
            return self.envelope("peak_load_risk", assessment);
        }
        writeln!(
            self.out,
            "\nHigh Risk Peak Hours (threshold {:.2} kW):",
            assessment.threshold
        )?;
        if assessment.high_risk.is_empty() {
            writeln!(self.out, "  none")?;
            return Ok(());
        }
        let mut writer = TabWriter::new(&mut *self.out);
        writeln!(writer, "HOUR\tMEAN LOAD (kW)")?;
        for hour in assessment.high_risk.iter() {
            writeln!(writer, "{:02}\t{:.2}", hour.hour, hour.mean_load)?;
        }
        writer.flush().context("writing risk table")?;
        Ok(())
    }

    pub fn zone_scores(&mut self, scores: &[ZoneScore]) -> Result<()> {
        if self.format == OutputFormat::Json {
            return self.envelope("zone_efficiency", &scores);
        }
        writeln!(self.out, "\nZone Efficiency Scores:")?;
        let mut writer = TabWriter::new(&mut *self.out);
        writeln!(writer, "ZONE\tMEAN LOAD (kW)\tSCORE")?;
        for score in scores {
            writeln!(
                writer,
                "{}\t{:.2}\t{:.2}",
                score.zone, score.mean_load, score.score
            )?;
        }
        writer.flush().context("writing zone score table")?;
        Ok(())
    }

    pub fn stat_anomalies(&mut self, report: &StatAnomalyReport) -> Result<()> {
        if self.format == OutputFormat::Json {
            return self.envelope("statistical_anomalies", report);
        }
        writeln!(self.out, "\nStatistical Anomalies: {}", report.flagged)?;
        if report.anomalies.is_empty() {
            return Ok(());
        }
        let mut writer = TabWriter::new(&mut *self.out);
        writeln!(writer, "TIMESTAMP\tTOTAL LOAD (kW)\tZ-SCORE")?;
        for anomaly in &report.anomalies {
            writeln!(
                writer,
                "{}\t{:.2}\t{:+.2}",
                anomaly.timestamp.format(TIMESTAMP_FORMAT),
                anomaly.total_load,
                anomaly.z_score
            )?;
        }
        writer.flush().context("writing anomaly table")?;
        Ok(())
    }

    pub fn balancing(&mut self, advice: &BalancingAdvice) -> Result<()> {
        if self.format == OutputFormat::Json {
            return self.envelope("demand_balancing", advice);
        }
        writeln!(self.out, "\nDemand Balancing Suggestions:")?;
        writeln!(
            self.out,
            "  peak mean {:.2} kW, off-peak mean {:.2} kW, {} high-risk hour(s)",
            advice.peak_mean, advice.off_peak_mean, advice.high_risk_hours
        )?;
        if advice.recommendations.is_empty() {
            writeln!(self.out, "  no balancing rule triggered")?;
        }
        for recommendation in &advice.recommendations {
            writeln!(self.out, "✔ {recommendation}")?;
        }
        Ok(())
    }

    fn segments<K: Display + Serialize + Copy + PartialEq>(
        &mut self,
        operation: &str,
        title: &str,
        means: &SegmentMeans<K>,
    ) -> Result<()> {
        if self.format == OutputFormat::Json {
            return self.envelope(operation, means);
        }
        writeln!(self.out, "\n{title}")?;
        let mut writer = TabWriter::new(&mut *self.out);
        writeln!(writer, "SEGMENT\tMEAN LOAD (kW)\tREADINGS")?;
        for segment in means.iter() {
            writeln!(
                writer,
                "{}\t{:.2}\t{}",
                segment.key, segment.mean_load, segment.rows
            )?;
        }
        writer.flush().context("writing segment table")?;
        Ok(())
    }

    fn envelope<T: Serialize>(&mut self, operation: &str, result: &T) -> Result<()> {
        self.json(&Envelope { operation, result })
    }

    fn json<T: Serialize>(&mut self, value: &T) -> Result<()> {
        serde_json::to_writer_pretty(&mut *self.out, value)
            .map_err(|err| anyhow::anyhow!("serializing result to JSON: {err}"))?;
        writeln!(self.out)?;
        Ok(())
    }
}

fn optional(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.2}"))
}
