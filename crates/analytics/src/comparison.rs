use crate::report::MetricsReport;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which of the two compared portfolios a verdict refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Candidate {
    A,
    B,
}

/// The qualitative ranking of two completed analyses.
///
/// `BothBetter` means the named portfolio strictly dominates on both CAGR and
/// Sharpe Ratio. `HigherReturn` means it wins on CAGR only, with its risk
/// profile *not* confirmed superior. `Comparable` means the CAGRs are equal
/// within floating tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    BothBetter(Candidate),
    HigherReturn(Candidate),
    Comparable,
}

/// Absolute tolerance inside which two CAGRs are considered equal.
pub const CAGR_EQUALITY_TOLERANCE: f64 = 1e-9;

/// Ranks two metrics reports against each other.
///
/// CAGR and Sharpe Ratio are compared independently; only strict dominance on
/// both earns an outright win. The function is pure and order-independent:
/// swapping the arguments swaps A and B in the verdict.
pub fn compare(a: &MetricsReport, b: &MetricsReport) -> Verdict {
    let cagr_gap = a.cagr - b.cagr;
    if cagr_gap.abs() <= CAGR_EQUALITY_TOLERANCE {
        return Verdict::Comparable;
    }

    let (leader, leader_wins_sharpe) = if cagr_gap > 0.0 {
        (Candidate::A, a.sharpe_ratio > b.sharpe_ratio)
    } else {
        (Candidate::B, b.sharpe_ratio > a.sharpe_ratio)
    };

    if leader_wins_sharpe {
        Verdict::BothBetter(leader)
    } else {
        Verdict::HigherReturn(leader)
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Candidate::A => write!(f, "Portfolio A"),
            Candidate::B => write!(f, "Portfolio B"),
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::BothBetter(winner) => {
                write!(f, "{} wins on both growth (CAGR) and risk-adjusted return (Sharpe)", winner)
            }
            Verdict::HigherReturn(winner) => write!(
                f,
                "{} delivered the higher CAGR, but its risk-adjusted return was not confirmed superior",
                winner
            ),
            Verdict::Comparable => write!(f, "The portfolios delivered comparable growth"),
        }
    }
}
