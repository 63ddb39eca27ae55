/// Trend reporting across several years of indicators.
///
/// Produces the text summary printed by the `fwii` and `fwii_trend`
/// binaries (year-on-year composite changes, overall change from the first
/// year, component bars, highest/lowest activity) and a JSON export of the
/// underlying `NormalizedIndicators` for downstream tools.

use std::fmt::{self, Write};

use crate::analysis::indicators::BASELINE_INDEX;
use crate::error::Result;
use crate::model::NormalizedIndicators;

/// Index points represented by one bar segment.
const BAR_SCALE: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Flat,
}

impl Direction {
    fn of(change: f64) -> Self {
        if change > 0.0 {
            Direction::Up
        } else if change < 0.0 {
            Direction::Down
        } else {
            Direction::Flat
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "↑"),
            Direction::Down => write!(f, "↓"),
            Direction::Flat => write!(f, "→"),
        }
    }
}

/// Index tracked by a trend line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    Composite,
    Fluvial,
    Coastal,
}

impl Component {
    pub fn value(self, indicators: &NormalizedIndicators) -> f64 {
        match self {
            Component::Composite => indicators.composite_fwii,
            Component::Fluvial => indicators.fluvial_index,
            Component::Coastal => indicators.coastal_index,
        }
    }
}

/// Change in one index between two years.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexChange {
    pub component: Component,
    pub from_year: i32,
    pub to_year: i32,
    /// Difference in index points.
    pub points: f64,
    /// Relative change in percent; `None` when the earlier value is zero.
    pub percent: Option<f64>,
    pub direction: Direction,
}

impl IndexChange {
    fn between(
        component: Component,
        from: &NormalizedIndicators,
        to: &NormalizedIndicators,
    ) -> Self {
        let (before, after) = (component.value(from), component.value(to));
        let points = after - before;
        let percent = if before != 0.0 {
            Some((after / before - 1.0) * 100.0)
        } else {
            None
        };
        IndexChange {
            component,
            from_year: from.year,
            to_year: to.year,
            points,
            percent,
            direction: Direction::of(points),
        }
    }
}

/// One-paragraph reading of a year's composite against the baseline.
pub fn interpret(indicators: &NormalizedIndicators, baseline_year: i32) -> String {
    if indicators.year == baseline_year {
        return "This is the BASELINE year. All indices normalized to 100.".to_string();
    }
    let diff = indicators.composite_fwii - BASELINE_INDEX;
    match Direction::of(diff) {
        Direction::Up => format!(
            "{:.1}% HIGHER flood warning activity than {} baseline",
            diff, baseline_year
        ),
        Direction::Down => format!(
            "{:.1}% LOWER flood warning activity than {} baseline",
            -diff, baseline_year
        ),
        Direction::Flat => format!("Same flood warning activity as {} baseline", baseline_year),
    }
}

/// Indicators for a run of years, ordered by year.
#[derive(Debug, Clone)]
pub struct TrendReport {
    years: Vec<NormalizedIndicators>,
}

impl TrendReport {
    pub fn build(mut indicators: Vec<NormalizedIndicators>) -> Self {
        indicators.sort_by_key(|i| i.year);
        TrendReport { years: indicators }
    }

    pub fn years(&self) -> &[NormalizedIndicators] {
        &self.years
    }

    /// Composite change between consecutive years.
    pub fn year_on_year(&self) -> Vec<IndexChange> {
        self.years
            .windows(2)
            .map(|pair| IndexChange::between(Component::Composite, &pair[0], &pair[1]))
            .collect()
    }

    /// Composite change from the first to the last year.
    pub fn overall(&self) -> Option<IndexChange> {
        self.overall_component(Component::Composite)
    }

    /// Change in one index from the first to the last year; `None` with
    /// fewer than two years.
    pub fn overall_component(&self, component: Component) -> Option<IndexChange> {
        match (self.years.first(), self.years.last()) {
            (Some(first), Some(last)) if self.years.len() > 1 => {
                Some(IndexChange::between(component, first, last))
            }
            _ => None,
        }
    }

    pub fn highest(&self) -> Option<&NormalizedIndicators> {
        self.years
            .iter()
            .max_by(|a, b| a.composite_fwii.total_cmp(&b.composite_fwii))
    }

    pub fn lowest(&self) -> Option<&NormalizedIndicators> {
        self.years
            .iter()
            .min_by(|a, b| a.composite_fwii.total_cmp(&b.composite_fwii))
    }

    pub fn total_warnings(&self) -> usize {
        self.years.iter().map(|i| i.total_events).sum()
    }

    pub fn average_warnings_per_year(&self) -> f64 {
        if self.years.is_empty() {
            0.0
        } else {
            self.total_warnings() as f64 / self.years.len() as f64
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.years)?)
    }

    /// Text report. Writing to a `String` cannot fail.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = self.write_report(&mut out);
        out
    }

    fn write_report(&self, out: &mut String) -> fmt::Result {
        writeln!(out, "ANNUAL SUMMARY")?;
        writeln!(out, "{}", "-".repeat(80))?;
        writeln!(
            out,
            "  {:>4}  {:>8}  {:>8}  {:>8}  {:>8}  {:>8}",
            "Year", "Warnings", "Fluvial", "Coastal", "Fluv.Idx", "FWII"
        )?;
        for i in &self.years {
            writeln!(
                out,
                "  {:>4}  {:>8}  {:>8}  {:>8}  {:>8.1}  {:>8.1}",
                i.year,
                i.total_events,
                i.fluvial_events,
                i.coastal_events,
                i.fluvial_index,
                i.composite_fwii
            )?;
        }
        writeln!(out)?;

        let changes = self.year_on_year();
        if !changes.is_empty() {
            writeln!(out, "Year-on-Year Changes in Composite FWII:")?;
            for change in &changes {
                write_change(out, &format!("{} → {}", change.from_year, change.to_year), change)?;
            }
            writeln!(out)?;
        }

        if let Some(overall) = self.overall() {
            writeln!(out, "Overall Trend ({}-{}):", overall.from_year, overall.to_year)?;
            write_change(out, "from first year", &overall)?;
            writeln!(out)?;
        }

        writeln!(out, "Fluvial (River) Flooding:")?;
        for i in &self.years {
            writeln!(out, "  {}: {:6.1} {}", i.year, i.fluvial_index, bar(i.fluvial_index))?;
        }
        writeln!(out)?;
        writeln!(out, "Coastal/Tidal Flooding:")?;
        for i in &self.years {
            writeln!(out, "  {}: {:6.1} {}", i.year, i.coastal_index, bar(i.coastal_index))?;
        }
        writeln!(out)?;

        if let (Some(low), Some(high)) = (self.lowest(), self.highest()) {
            writeln!(out, "KEY FINDINGS")?;
            writeln!(out, "{}", "-".repeat(80))?;
            writeln!(out, "• Lowest Activity: {} (FWII = {:.1})", low.year, low.composite_fwii)?;
            writeln!(
                out,
                "• Highest Activity: {} (FWII = {:.1})",
                high.year, high.composite_fwii
            )?;
            let components = [(Component::Fluvial, "Fluvial"), (Component::Coastal, "Coastal")];
            for (component, label) in components {
                if let Some(change) = self.overall_component(component) {
                    write_component_trend(out, label, &change)?;
                }
            }
            writeln!(out, "• Total warnings: {}", self.total_warnings())?;
            let average = self.average_warnings_per_year();
            writeln!(out, "• Average warnings per year: {:.0}", average)?;
        }
        Ok(())
    }
}

fn write_change(out: &mut String, label: &str, change: &IndexChange) -> fmt::Result {
    match change.percent {
        Some(pct) => writeln!(
            out,
            "  {}: {} {:5.1} points ({:+6.1}%)",
            label,
            change.direction,
            change.points.abs(),
            pct
        ),
        None => writeln!(
            out,
            "  {}: {} {:5.1} points",
            label,
            change.direction,
            change.points.abs()
        ),
    }
}

fn write_component_trend(out: &mut String, label: &str, change: &IndexChange) -> fmt::Result {
    let verb = match change.direction {
        Direction::Up => "INCREASED",
        Direction::Down => "DECREASED",
        Direction::Flat => {
            return writeln!(out, "• {} flooding warnings are UNCHANGED", label);
        }
    };
    write!(
        out,
        "• {} flooding warnings have {} by {:.1} points",
        label,
        verb,
        change.points.abs()
    )?;
    match change.percent {
        Some(pct) => writeln!(out, " ({:+.0}%)", pct),
        None => writeln!(out),
    }
}

fn bar(index: f64) -> String {
    let len = (index / BAR_SCALE).max(0.0) as usize;
    "█".repeat(len)
}
