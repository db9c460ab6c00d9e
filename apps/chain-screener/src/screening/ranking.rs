//! Ranking, truncation and tabular projection of candidates.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize, Serializer};

use crate::strategy::{Shape, Strategy};

/// Ordering applied to a candidate list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankKey {
    /// Reward to risk, highest first (unbounded first of all).
    #[default]
    Rr,
    /// Max gain, highest first.
    Gain,
    /// Max loss, lowest first.
    Loss,
    /// Net cost, cheapest first.
    Cost,
    /// Generation order.
    Unranked,
}

impl RankKey {
    /// Parse a key name. Unrecognised names keep generation order.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "rr" => Self::Rr,
            "gain" => Self::Gain,
            "loss" => Self::Loss,
            "cost" => Self::Cost,
            _ => Self::Unranked,
        }
    }
}

/// Stable in-place sort by `key`.
pub fn rank(strategies: &mut [Strategy<'_>], key: RankKey) {
    match key {
        RankKey::Rr => strategies.sort_by(|a, b| b.rr().total_cmp(&a.rr())),
        RankKey::Gain => strategies.sort_by(|a, b| b.max_gain().total_cmp(&a.max_gain())),
        RankKey::Loss => strategies.sort_by(|a, b| a.max_loss().total_cmp(&b.max_loss())),
        RankKey::Cost => strategies.sort_by(|a, b| a.cost().total_cmp(&b.cost())),
        RankKey::Unranked => {}
    }
}

/// The first `n` elements, or all of them when fewer exist.
#[must_use]
pub fn top<T>(sequence: &[T], n: usize) -> &[T] {
    &sequence[..n.min(sequence.len())]
}

/// One row of the tabular projection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyRow {
    /// Human-readable description.
    pub label: String,
    /// Strategy family.
    pub shape: Shape,
    /// Net cost (positive = debit).
    pub cost: f64,
    /// Maximum gain.
    #[serde(serialize_with = "serialize_unbounded")]
    pub max_gain: f64,
    /// Maximum loss.
    #[serde(serialize_with = "serialize_unbounded")]
    pub max_loss: f64,
    /// Reward to risk.
    #[serde(serialize_with = "serialize_unbounded")]
    pub rr: f64,
    /// Net delta.
    pub net_delta: f64,
    /// Net theta.
    pub net_theta: f64,
    /// Net vega.
    pub net_vega: f64,
    /// Mean leg IV.
    pub avg_iv: Option<f64>,
}

impl From<&Strategy<'_>> for StrategyRow {
    fn from(strategy: &Strategy<'_>) -> Self {
        let net = strategy.net_greeks();
        Self {
            label: strategy.label(),
            shape: strategy.shape(),
            cost: strategy.cost(),
            max_gain: strategy.max_gain(),
            max_loss: strategy.max_loss(),
            rr: strategy.rr(),
            net_delta: net.delta,
            net_theta: net.theta,
            net_vega: net.vega,
            avg_iv: strategy.avg_iv(),
        }
    }
}

/// Project strategies to rows, preserving order.
#[must_use]
pub fn project(strategies: &[Strategy<'_>]) -> Vec<StrategyRow> {
    strategies.iter().map(StrategyRow::from).collect()
}

/// JSON has no infinity; unbounded values are written as `"inf"`.
fn serialize_unbounded<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.is_finite() {
        serializer.serialize_f64(*value)
    } else if value.is_nan() {
        serializer.serialize_none()
    } else if value.is_sign_positive() {
        serializer.serialize_str("inf")
    } else {
        serializer.serialize_str("-inf")
    }
}

fn format_number(value: f64) -> String {
    if value.is_infinite() {
        if value > 0.0 { "inf" } else { "-inf" }.to_string()
    } else {
        format!("{value:.2}")
    }
}

const HEADERS: [&str; 9] = [
    "Strategy", "Cost", "MaxGain", "MaxLoss", "RR", "Delta", "Theta", "Vega", "AvgIV",
];

/// Render rows as a fixed-width text table.
#[must_use]
pub fn render_table(rows: &[StrategyRow]) -> String {
    let cells: Vec<[String; 9]> = rows
        .iter()
        .map(|row| {
            [
                row.label.clone(),
                format_number(row.cost),
                format_number(row.max_gain),
                format_number(row.max_loss),
                format_number(row.rr),
                format_number(row.net_delta),
                format_number(row.net_theta),
                format_number(row.net_vega),
                row.avg_iv
                    .map_or_else(|| "-".to_string(), |iv| format!("{iv:.4}")),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(str::len);
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    let mut out = String::new();
    write_line(&mut out, &HEADERS.map(str::to_string), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let _ = writeln!(out, "{}", rule.join("  "));
    for row in &cells {
        write_line(&mut out, row, &widths);
    }
    out
}

fn write_line(out: &mut String, cells: &[String; 9], widths: &[usize; 9]) {
    let mut line = String::new();
    for (i, (cell, &width)) in cells.iter().zip(widths).enumerate() {
        if i > 0 {
            line.push_str("  ");
        }
        if i == 0 {
            let _ = write!(line, "{cell:<width$}");
        } else {
            let _ = write!(line, "{cell:>width$}");
        }
    }
    let _ = writeln!(out, "{}", line.trim_end());
}
