use serde::{Deserialize, Serialize};

/// The four metrics the performance dashboard charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    RelativePerformance,
    MovingZScore,
    Alpha,
    CumulativeAlpha,
}

impl MetricKind {
    pub const ALL: [MetricKind; 4] = [
        MetricKind::RelativePerformance,
        MetricKind::MovingZScore,
        MetricKind::Alpha,
        MetricKind::CumulativeAlpha,
    ];

    /// The key used for this metric in the JSON payload.
    pub fn key(&self) -> &'static str {
        match self {
            MetricKind::RelativePerformance => "relative_performance",
            MetricKind::MovingZScore => "moving_z_score",
            MetricKind::Alpha => "alpha",
            MetricKind::CumulativeAlpha => "cumulative_alpha",
        }
    }

    /// How the latest value and the day change are rendered for this metric.
    ///
    /// The precisions differ per metric and the frontend shows the strings
    /// verbatim, so they are part of the external contract.
    pub fn format(&self) -> MetricFormat {
        match self {
            // Relative performance is a fraction internally, shown as a percentage.
            MetricKind::RelativePerformance => MetricFormat::new(100.0, 2, "%"),
            MetricKind::MovingZScore => MetricFormat::new(1.0, 2, ""),
            MetricKind::Alpha => MetricFormat::new(1.0, 3, ""),
            MetricKind::CumulativeAlpha => MetricFormat::new(1.0, 2, ""),
        }
    }
}

/// Display rule for a metric: `value * scale` with an explicit sign, a fixed
/// number of decimals and an optional suffix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricFormat {
    pub scale: f64,
    pub precision: usize,
    pub suffix: &'static str,
}

impl MetricFormat {
    pub const fn new(scale: f64, precision: usize, suffix: &'static str) -> Self {
        Self { scale, precision, suffix }
    }

    /// The same rule without scaling, for series that are already in display units.
    pub fn unscaled(self) -> Self {
        Self { scale: 1.0, ..self }
    }

    /// Renders `value`, e.g. `+1.23%` or `-0.004`.
    pub fn render(&self, value: f64) -> String {
        format!("{:+.*}{}", self.precision, value * self.scale, self.suffix)
    }
}


/// Coarse tone of a news item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}
