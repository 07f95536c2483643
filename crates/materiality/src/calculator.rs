//! Materiality threshold computation
//!
//! ```text
//! overall         = benchmark_value * overall_pct / 100
//! performance     = overall * performance_pct / 100
//! clearly_trivial = overall * trivial_pct / 100
//! ```

use auditcalc_core::{CalcError, CalcResult, Percentage};
use auditcalc_guidance::GuidanceRecommendation;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::calculation::{MaterialityInputs, MaterialityThresholds};
use crate::config::AdvisoryRanges;

/// Which of the three percentages an advisory refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdKind {
    Overall,
    Performance,
    ClearlyTrivial,
}

impl ThresholdKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThresholdKind::Overall => "overall",
            ThresholdKind::Performance => "performance",
            ThresholdKind::ClearlyTrivial => "clearly_trivial",
        }
    }
}

/// Non-blocking observations about a computation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Advisory {
    /// Benchmark value was zero or negative; all thresholds are zero
    NonPositiveBenchmark { benchmark_value: Decimal },

    /// A percentage lies outside the conventional range
    OutsideConventionalRange {
        threshold: ThresholdKind,
        percentage: Decimal,
        min: Decimal,
        max: Decimal,
    },
}

impl Advisory {
    /// Whether the caller should treat the result as not approvable
    pub fn blocks_approval(&self) -> bool {
        matches!(self, Advisory::NonPositiveBenchmark { .. })
    }
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::NonPositiveBenchmark { benchmark_value } => write!(
                f,
                "benchmark value {} is not positive; thresholds are zero and not approvable",
                benchmark_value
            ),
            Advisory::OutsideConventionalRange {
                threshold,
                percentage,
                min,
                max,
            } => write!(
                f,
                "{} percentage {}% is outside the conventional range {}%-{}%",
                threshold.as_str(),
                percentage.normalize(),
                min.normalize(),
                max.normalize()
            ),
        }
    }
}

/// Thresholds plus any advisories raised while computing them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialityResult {
    pub thresholds: MaterialityThresholds,
    pub advisories: Vec<Advisory>,
}

impl MaterialityResult {
    pub fn is_approvable(&self) -> bool {
        !self.advisories.iter().any(Advisory::blocks_approval)
    }
}

/// Pure materiality calculator
#[derive(Debug, Clone, Default)]
pub struct MaterialityEngine {
    ranges: AdvisoryRanges,
}

impl MaterialityEngine {
    pub fn new(ranges: AdvisoryRanges) -> Self {
        Self { ranges }
    }

    pub fn ranges(&self) -> &AdvisoryRanges {
        &self.ranges
    }

    /// Compute thresholds and advisories.
    ///
    /// Never blocks on unconventional percentages. Fails only on arithmetic
    /// overflow.
    pub fn compute(&self, inputs: &MaterialityInputs) -> CalcResult<MaterialityResult> {
        let mut advisories = self.range_advisories(inputs);

        if inputs.benchmark_value <= Decimal::ZERO {
            advisories.insert(
                0,
                Advisory::NonPositiveBenchmark {
                    benchmark_value: inputs.benchmark_value,
                },
            );
            tracing::debug!(
                benchmark_value = %inputs.benchmark_value,
                "Non-positive benchmark, thresholds are zero"
            );
            return Ok(MaterialityResult {
                thresholds: MaterialityThresholds::ZERO,
                advisories,
            });
        }

        let overall = apply("overall", inputs.overall_pct, inputs.benchmark_value)?;
        let performance = apply("performance", inputs.performance_pct, overall)?;
        let clearly_trivial = apply("clearly_trivial", inputs.trivial_pct, overall)?;

        tracing::debug!(
            benchmark = %inputs.benchmark_type,
            overall = %overall,
            performance = %performance,
            clearly_trivial = %clearly_trivial,
            advisories = advisories.len(),
            "Materiality computed"
        );

        Ok(MaterialityResult {
            thresholds: MaterialityThresholds {
                overall,
                performance,
                clearly_trivial,
            },
            advisories,
        })
    }

    fn range_advisories(&self, inputs: &MaterialityInputs) -> Vec<Advisory> {
        let checks = [
            (
                ThresholdKind::Overall,
                inputs.overall_pct,
                self.ranges.overall_min,
                self.ranges.overall_max,
            ),
            (
                ThresholdKind::Performance,
                inputs.performance_pct,
                self.ranges.performance_min,
                self.ranges.performance_max,
            ),
            (
                ThresholdKind::ClearlyTrivial,
                inputs.trivial_pct,
                self.ranges.trivial_min,
                self.ranges.trivial_max,
            ),
        ];

        checks
            .into_iter()
            .filter(|(_, pct, min, max)| !pct.within(*min, *max))
            .map(|(threshold, pct, min, max)| Advisory::OutsideConventionalRange {
                threshold,
                percentage: pct.value(),
                min,
                max,
            })
            .collect()
    }
}

fn apply(what: &str, pct: Percentage, base: Decimal) -> CalcResult<Decimal> {
    pct.of(base)
        .ok_or_else(|| CalcError::degenerate(format!("{} materiality overflow", what)))
}

/// Compute thresholds with the given advisory ranges
pub fn compute_materiality(
    inputs: &MaterialityInputs,
    ranges: &AdvisoryRanges,
) -> CalcResult<MaterialityResult> {
    MaterialityEngine::new(ranges.clone()).compute(inputs)
}

/// Copy a guidance recommendation into the inputs.
///
/// Percentages and industry are replaced; rationale texts are only filled
/// where the auditor has not written one.
pub fn apply_guidance(
    mut inputs: MaterialityInputs,
    recommendation: &GuidanceRecommendation,
) -> MaterialityInputs {
    inputs.overall_pct = recommendation.recommended_overall_pct;
    inputs.performance_pct = recommendation.recommended_performance_pct;
    inputs.trivial_pct = recommendation.recommended_trivial_pct;
    inputs.industry = Some(recommendation.industry.clone());

    if inputs.rationale.overall.is_none() {
        inputs.rationale.overall = Some(recommendation.rationale.clone());
    }

    inputs
}
