//! CLI commands

use auditcalc_core::{BenchmarkType, Percentage, RiskLevel};
use auditcalc_guidance::{normalize_industry, GuidanceRecommendation, IndustryGuidance};
use auditcalc_materiality::{
    apply_guidance, Advisory, MaterialityCalculation, MaterialityEngine, MaterialityInputs,
    MaterialityResult, MaterialityThresholds, Rationale, SaveOutcome,
};
use auditcalc_sampling::{SamplingInput, SamplingResult, SamplingStatus};
use chrono::Utc;
use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::json;

use crate::context::AppContext;

/// Materiality inputs shared by `compute` and `save`
#[derive(Debug, Clone, Args)]
pub struct MaterialityArgs {
    /// Benchmark type (revenue, total_assets, net_income, equity, expenses)
    #[arg(long)]
    pub benchmark: BenchmarkType,
    /// Benchmark amount from the financial statements
    #[arg(long, allow_hyphen_values = true)]
    pub value: Decimal,
    /// Overall materiality, % of benchmark
    #[arg(long)]
    pub overall: Option<Percentage>,
    /// Performance materiality, % of overall
    #[arg(long)]
    pub performance: Option<Percentage>,
    /// Clearly trivial threshold, % of overall
    #[arg(long)]
    pub trivial: Option<Percentage>,
    /// Apply the industry's recommended percentages first
    #[arg(long)]
    pub industry: Option<String>,
    #[arg(long, default_value = "moderate")]
    pub risk: RiskLevel,
    #[arg(long)]
    pub benchmark_rationale: Option<String>,
    #[arg(long)]
    pub overall_rationale: Option<String>,
    #[arg(long)]
    pub performance_rationale: Option<String>,
    #[arg(long)]
    pub trivial_rationale: Option<String>,
}

impl MaterialityArgs {
    /// Arguments with explicit percentages and no guidance
    pub fn new(
        benchmark: BenchmarkType,
        value: Decimal,
        overall: Percentage,
        performance: Percentage,
        trivial: Percentage,
    ) -> Self {
        Self {
            benchmark,
            value,
            overall: Some(overall),
            performance: Some(performance),
            trivial: Some(trivial),
            industry: None,
            risk: RiskLevel::default(),
            benchmark_rationale: None,
            overall_rationale: None,
            performance_rationale: None,
            trivial_rationale: None,
        }
    }
}

/// Build materiality inputs, applying industry guidance when requested.
///
/// Explicit percentages always win over the recommendation.
pub async fn build_inputs(
    ctx: &AppContext,
    args: &MaterialityArgs,
) -> Result<MaterialityInputs, anyhow::Error> {
    let mut inputs = MaterialityInputs::new(
        args.benchmark,
        args.value,
        Percentage::ZERO,
        Percentage::ZERO,
        Percentage::ZERO,
    );
    inputs.risk_level = args.risk;
    inputs.rationale = Rationale {
        benchmark: args.benchmark_rationale.clone(),
        overall: args.overall_rationale.clone(),
        performance: args.performance_rationale.clone(),
        trivial: args.trivial_rationale.clone(),
    };

    if let Some(industry) = &args.industry {
        let recommendation = ctx.guidance.lookup_or_general(industry, args.benchmark).await?;
        tracing::debug!(
            industry = %industry,
            matched = %recommendation.industry,
            "Applying guidance"
        );
        inputs = apply_guidance(inputs, &recommendation);
        inputs.industry = Some(normalize_industry(industry));
    } else {
        let missing: Vec<&str> = [
            ("--overall", args.overall),
            ("--performance", args.performance),
            ("--trivial", args.trivial),
        ]
        .iter()
        .filter(|(_, pct)| pct.is_none())
        .map(|(flag, _)| *flag)
        .collect();
        if !missing.is_empty() {
            anyhow::bail!("{} required unless --industry is given", missing.join(", "));
        }
    }

    if let Some(pct) = args.overall {
        inputs.overall_pct = pct;
    }
    if let Some(pct) = args.performance {
        inputs.performance_pct = pct;
    }
    if let Some(pct) = args.trivial {
        inputs.trivial_pct = pct;
    }

    Ok(inputs)
}

/// Compute thresholds without saving
pub async fn materiality_compute(
    ctx: &AppContext,
    args: &MaterialityArgs,
) -> Result<MaterialityResult, anyhow::Error> {
    let inputs = build_inputs(ctx, args).await?;
    let engine = MaterialityEngine::new(ctx.config.advisory.clone());
    let result = engine.compute(&inputs)?;

    if ctx.json {
        print_json(&json!({ "inputs": inputs, "result": result }))?;
    } else {
        print_thresholds(&inputs, &result);
    }
    Ok(result)
}

/// Compute and save a new version for an engagement
pub async fn materiality_save(
    ctx: &mut AppContext,
    engagement_id: &str,
    expected_version: Option<&str>,
    author: &str,
    args: &MaterialityArgs,
) -> Result<SaveOutcome, anyhow::Error> {
    let inputs = build_inputs(ctx, args).await?;
    let json_output = ctx.json;
    let outcome = ctx
        .service()?
        .save(engagement_id, expected_version, inputs, author)?;

    if json_output {
        let status = if outcome.is_created() { "created" } else { "unchanged" };
        print_json(&json!({ "outcome": status, "version": outcome.version() }))?;
    } else {
        let calc = outcome.version();
        match &outcome {
            SaveOutcome::Created(_) => println!(
                "✅ Saved version {} ({}) for {}",
                calc.version, calc.id, calc.engagement_id
            ),
            SaveOutcome::Unchanged(_) => println!(
                "ℹ️  Inputs unchanged, current version is still {} ({})",
                calc.version, calc.id
            ),
        }
        print_version_thresholds(calc);
    }
    Ok(outcome)
}

/// Approve a specific version
pub fn materiality_approve(
    ctx: &mut AppContext,
    version_id: &str,
    approver: &str,
) -> Result<MaterialityCalculation, anyhow::Error> {
    let json_output = ctx.json;
    let approved = ctx.service()?.approve(version_id, approver, Utc::now())?;

    if json_output {
        print_json(&approved)?;
    } else {
        println!(
            "✅ Approved version {} ({}) for {} by {}",
            approved.version, approved.id, approved.engagement_id, approver
        );
        print_version_thresholds(&approved);
    }
    Ok(approved)
}

/// List all versions for an engagement
pub fn materiality_history(
    ctx: &mut AppContext,
    engagement_id: &str,
) -> Result<Vec<MaterialityCalculation>, anyhow::Error> {
    let json_output = ctx.json;
    let history = ctx.service()?.history(engagement_id)?;

    if json_output {
        print_json(&history)?;
        return Ok(history);
    }

    if history.is_empty() {
        println!("No materiality versions for {}", engagement_id);
        return Ok(history);
    }

    println!("Materiality history for {} ({} versions)", engagement_id, history.len());
    for calc in &history {
        let current = if calc.is_current { "*" } else { " " };
        let approval = match (&calc.approved_by, calc.approved_at) {
            (Some(by), Some(at)) => {
                format!("approved by {} at {}", by, at.format("%Y-%m-%d %H:%M"))
            }
            _ => "not approved".to_string(),
        };
        println!(
            "{} v{:<3} {}  overall {}  by {} at {}  {}",
            current,
            calc.version,
            calc.id,
            calc.thresholds.overall,
            calc.created_by,
            calc.created_at.format("%Y-%m-%d %H:%M"),
            approval
        );
    }
    Ok(history)
}

/// Compute a sample size and print its working
pub fn sampling(ctx: &AppContext, input: &SamplingInput) -> Result<SamplingResult, anyhow::Error> {
    let result = ctx.sampling.compute(input)?;

    if ctx.json {
        print_json(&result)?;
        return Ok(result);
    }

    match &result.status {
        SamplingStatus::Complete => {
            println!("Sample size: {} ({})", result.sample_size, result.method);
        }
        SamplingStatus::Incomplete { missing } => {
            println!(
                "Sample size: 0 ({}, incomplete - missing {})",
                result.method,
                missing.join(", ")
            );
        }
    }

    if let Some(trace) = &result.trace {
        if let serde_json::Value::Object(fields) = serde_json::to_value(trace)? {
            for (name, value) in fields.iter().filter(|(name, _)| name.as_str() != "method") {
                let value = match value {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                println!("   {}: {}", name, value);
            }
        }
    }
    Ok(result)
}

/// Look up the recommendation for an industry and benchmark
pub async fn guidance(
    ctx: &AppContext,
    industry: &str,
    benchmark: BenchmarkType,
) -> Result<GuidanceRecommendation, anyhow::Error> {
    let recommendation = ctx.guidance.lookup_or_general(industry, benchmark).await?;

    if ctx.json {
        print_json(&recommendation)?;
    } else {
        println!(
            "Guidance for {} / {}",
            recommendation.industry,
            recommendation.benchmark_type.label()
        );
        println!("   Overall:         {} of benchmark", recommendation.recommended_overall_pct);
        println!("   Performance:     {} of overall", recommendation.recommended_performance_pct);
        println!("   Clearly trivial: {} of overall", recommendation.recommended_trivial_pct);
        println!("   {}", recommendation.rationale);
    }
    Ok(recommendation)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), anyhow::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_thresholds(inputs: &MaterialityInputs, result: &MaterialityResult) {
    println!(
        "{} {} | overall {} | performance {} | trivial {}",
        inputs.benchmark_type.label(),
        inputs.benchmark_value,
        inputs.overall_pct,
        inputs.performance_pct,
        inputs.trivial_pct
    );
    print_amounts(&result.thresholds, &result.advisories);
}

fn print_version_thresholds(calc: &MaterialityCalculation) {
    print_amounts(&calc.thresholds, &calc.advisories);
}

fn print_amounts(thresholds: &MaterialityThresholds, advisories: &[Advisory]) {
    println!("   Overall materiality:     {}", thresholds.overall);
    println!("   Performance materiality: {}", thresholds.performance);
    println!("   Clearly trivial:         {}", thresholds.clearly_trivial);
    for advisory in advisories {
        println!("⚠️  {}", advisory);
    }
}
