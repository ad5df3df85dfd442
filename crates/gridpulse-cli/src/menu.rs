//! Interactive menu dispatcher.
//!
//! Operator input is parsed into a [`MenuCommand`] before anything runs, and
//! each command maps to its handler through [`HANDLERS`]. Analysis errors are
//! reported and the loop continues; only output failures end the session.

use crate::render::Presenter;
use anyhow::{anyhow, Result};
use gridpulse_core::AnalysisSession;
use std::fmt;
use std::io::BufRead;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuCommand {
    PeakOffPeak,
    RollingTrend,
    WeekdayWeekend,
    PeakLoadRisk,
    ZoneEfficiency,
    StatisticalAnomalies,
    DemandBalancing,
    Exit,
}

impl MenuCommand {
    pub const ALL: [MenuCommand; 8] = [
        MenuCommand::PeakOffPeak,
        MenuCommand::RollingTrend,
        MenuCommand::WeekdayWeekend,
        MenuCommand::PeakLoadRisk,
        MenuCommand::ZoneEfficiency,
        MenuCommand::StatisticalAnomalies,
        MenuCommand::DemandBalancing,
        MenuCommand::Exit,
    ];

    /// Menu number shown to the operator.
    pub fn number(self) -> u8 {
        match self {
            MenuCommand::PeakOffPeak => 1,
            MenuCommand::RollingTrend => 2,
            MenuCommand::WeekdayWeekend => 3,
            MenuCommand::PeakLoadRisk => 4,
            MenuCommand::ZoneEfficiency => 5,
            MenuCommand::StatisticalAnomalies => 6,
            MenuCommand::DemandBalancing => 7,
            MenuCommand::Exit => 8,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MenuCommand::PeakOffPeak => "Peak vs Off-Peak Analysis",
            MenuCommand::RollingTrend => "Rolling Average Trend",
            MenuCommand::WeekdayWeekend => "Weekday vs Weekend Analysis",
            MenuCommand::PeakLoadRisk => "Peak Load Risk Identification",
            MenuCommand::ZoneEfficiency => "Zone Efficiency Scoring",
            MenuCommand::StatisticalAnomalies => "Statistical Anomaly Detection",
            MenuCommand::DemandBalancing => "Demand Balancing Strategy",
            MenuCommand::Exit => "Exit",
        }
    }

    /// Operation name used in JSON output.
    pub fn operation(self) -> &'static str {
        match self {
            MenuCommand::PeakOffPeak => "peak_offpeak",
            MenuCommand::RollingTrend => "rolling_trend",
            MenuCommand::WeekdayWeekend => "weekday_weekend",
            MenuCommand::PeakLoadRisk => "peak_load_risk",
            MenuCommand::ZoneEfficiency => "zone_efficiency",
            MenuCommand::StatisticalAnomalies => "statistical_anomalies",
            MenuCommand::DemandBalancing => "demand_balancing",
            MenuCommand::Exit => "exit",
        }
    }
}

impl fmt::Display for MenuCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {}", self.number(), self.label())
    }
}

impl FromStr for MenuCommand {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let number: u8 = s
            .trim()
            .parse()
            .map_err(|_| anyhow!("'{}' is not a menu number", s.trim()))?;
        MenuCommand::ALL
            .into_iter()
            .find(|command| command.number() == number)
            .ok_or_else(|| anyhow!("{number} is not on the menu"))
    }
}

/// Outcome of one handler: `Ok` carries rendering failures, the inner result
/// carries analysis failures that are reported without ending the loop.
pub type Handler = fn(&mut AnalysisSession, &mut Presenter<'_>) -> Result<Result<()>>;

pub const HANDLERS: [(MenuCommand, Handler); 7] = [
    (MenuCommand::PeakOffPeak, peak_offpeak),
    (MenuCommand::RollingTrend, rolling_trend),
    (MenuCommand::WeekdayWeekend, weekday_weekend),
    (MenuCommand::PeakLoadRisk, peak_load_risk),
    (MenuCommand::ZoneEfficiency, zone_efficiency),
    (MenuCommand::StatisticalAnomalies, statistical_anomalies),
    (MenuCommand::DemandBalancing, demand_balancing),
];

fn peak_offpeak(session: &mut AnalysisSession, out: &mut Presenter<'_>) -> Result<Result<()>> {
    out.peak_offpeak(&session.peak_offpeak(), session.config())?;
    Ok(Ok(()))
}

fn rolling_trend(session: &mut AnalysisSession, out: &mut Presenter<'_>) -> Result<Result<()>> {
    let trend = session.rolling_trend();
    out.rolling_trend(session.frame(), &trend)?;
    Ok(Ok(()))
}

fn weekday_weekend(session: &mut AnalysisSession, out: &mut Presenter<'_>) -> Result<Result<()>> {
    out.weekday_weekend(&session.weekday_weekend())?;
    Ok(Ok(()))
}

fn peak_load_risk(session: &mut AnalysisSession, out: &mut Presenter<'_>) -> Result<Result<()>> {
    match session.identify_risk() {
        Ok(assessment) => out.risk(&assessment).map(Ok),
        Err(err) => Ok(Err(err.into())),
    }
}

fn zone_efficiency(session: &mut AnalysisSession, out: &mut Presenter<'_>) -> Result<Result<()>> {
    match session.zone_efficiency() {
        Ok(scores) => out.zone_scores(&scores).map(Ok),
        Err(err) => Ok(Err(err.into())),
    }
}

fn statistical_anomalies(
    session: &mut AnalysisSession,
    out: &mut Presenter<'_>,
) -> Result<Result<()>> {
    match session.statistical_anomalies() {
        Ok(report) => out.stat_anomalies(&report).map(Ok),
        Err(err) => Ok(Err(err.into())),
    }
}

fn demand_balancing(session: &mut AnalysisSession, out: &mut Presenter<'_>) -> Result<Result<()>> {
    match session.demand_balancing() {
        Ok(advice) => out.balancing(&advice).map(Ok),
        Err(err) => Ok(Err(err.into())),
    }
}

fn handler_for(command: MenuCommand) -> Option<Handler> {
    HANDLERS
        .iter()
        .find(|(candidate, _)| *candidate == command)
        .map(|(_, handler)| *handler)
}

fn print_menu(out: &mut Presenter<'_>) -> Result<()> {
    out.text("\nSMART ENERGY ANALYTICS SYSTEM")?;
    for command in MenuCommand::ALL {
        out.text(command)?;
    }
    Ok(())
}

/// Run the menu until the operator exits or input ends.
pub fn run_menu<R: BufRead>(
    session: &mut AnalysisSession,
    mut input: R,
    out: &mut Presenter<'_>,
) -> Result<()> {
    let mut buf = Vec::new();
    loop {
        print_menu(out)?;
        out.prompt("Enter your choice: ")?;
        buf.clear();
        if input.read_until(b'\n', &mut buf)? == 0 {
            out.text("")?;
            break;
        }
        // undecodable bytes fall through to the invalid-choice path
        let line = String::from_utf8_lossy(&buf);

        let command = match line.parse::<MenuCommand>() {
            Ok(command) => command,
            Err(err) => {
                tracing::debug!(input = line.trim(), "rejected menu input");
                out.error("menu", format!("Invalid choice ({err}). Try again."))?;
                continue;
            }
        };

        let Some(handler) = handler_for(command) else {
            out.text("Exiting System... Thank You!")?;
            break;
        };
        tracing::debug!(operation = command.operation(), "dispatching");
        if let Err(err) = handler(session, out)? {
            tracing::warn!(operation = command.operation(), "{err}");
            out.error(command.operation(), err)?;
        }
    }
    Ok(())
}
