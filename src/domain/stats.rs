//! Win/loss aggregation over closed trades.

use crate::domain::trade::{Segment, TradeRecord};

/// Win/loss counts and accuracy for one slice of the closed-trade history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SegmentStats {
    pub total: usize,
    pub profitable: usize,
    pub losing: usize,
    /// Percentage of profitable trades, rounded to the nearest integer.
    /// Zero for an empty slice.
    pub accuracy: u32,
}

/// Aggregate the closed records in `trades`, optionally restricted to one
/// segment. Active records are ignored.
///
/// A trade counts as profitable only when its persisted realized P/L is
/// strictly positive; a flat 0% close is losing by policy, not oversight.
pub fn aggregate(trades: &[TradeRecord], segment: Option<Segment>) -> SegmentStats {
    let mut total = 0usize;
    let mut profitable = 0usize;

    for trade in trades {
        let Some(exit) = &trade.exit else {
            continue;
        };
        if let Some(wanted) = segment {
            if trade.segment != wanted {
                continue;
            }
        }
        total += 1;
        if exit.profit_loss_percent > 0.0 {
            profitable += 1;
        }
    }

    let accuracy = if total > 0 {
        (profitable as f64 / total as f64 * 100.0).round() as u32
    } else {
        0
    };

    SegmentStats {
        total,
        profitable,
        losing: total - profitable,
        accuracy,
    }
}

/// Per-segment breakdown plus the overall figure.
///
/// Overall is recomputed from the full closed set; averaging the per-segment
/// accuracies would average an average.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PerformanceReport {
    pub overall: SegmentStats,
    pub equity: SegmentStats,
    pub futures: SegmentStats,
    pub options: SegmentStats,
}

impl PerformanceReport {
    pub fn compute(trades: &[TradeRecord]) -> Self {
        PerformanceReport {
            overall: aggregate(trades, None),
            equity: aggregate(trades, Some(Segment::Equity)),
            futures: aggregate(trades, Some(Segment::Futures)),
            options: aggregate(trades, Some(Segment::Options)),
        }
    }

    pub fn segment(&self, segment: Segment) -> SegmentStats {
        match segment {
            Segment::Equity => self.equity,
            Segment::Futures => self.futures,
            Segment::Options => self.options,
        }
    }
}
