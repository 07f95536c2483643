//! Integration tests for the AuditCalc CLI commands
//!
//! These drive the command functions end to end against a SQLite ledger in a
//! temporary directory.

use auditcalc_cli::commands::{self, MaterialityArgs};
use auditcalc_cli::AppContext;
use auditcalc_core::{BenchmarkType, ConfidenceLevel, Percentage};
use auditcalc_materiality::{MaterialityConfig, MaterialityError};
use auditcalc_sampling::{MusInput, SamplingInput};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::io::Write;
use tempfile::TempDir;

fn pct(value: Decimal) -> Percentage {
    Percentage::new(value).unwrap()
}

fn context(temp_dir: &TempDir) -> AppContext {
    let db_path = temp_dir.path().join("data").join("materiality.db");
    AppContext::from_config(MaterialityConfig::default(), db_path, false).unwrap()
}

fn revenue_args(value: Decimal) -> MaterialityArgs {
    MaterialityArgs::new(
        BenchmarkType::Revenue,
        value,
        pct(dec!(1)),
        pct(dec!(75)),
        pct(dec!(5)),
    )
}

/// Test: save → unchanged save → edit → approve → fork → history
#[tokio::test]
async fn test_full_workflow() {
    let temp_dir = TempDir::new().unwrap();
    let mut ctx = context(&temp_dir);

    let v1 = commands::materiality_save(
        &mut ctx,
        "ENG-1",
        None,
        "alice",
        &revenue_args(dec!(10000000)),
    )
    .await
    .unwrap()
    .into_version();
    assert_eq!(v1.version, 1);
    assert_eq!(v1.thresholds.overall, dec!(100000));
    assert!(ctx.db_path().exists());

    let same = commands::materiality_save(
        &mut ctx,
        "ENG-1",
        Some(&v1.id),
        "alice",
        &revenue_args(dec!(10000000)),
    )
    .await
    .unwrap();
    assert!(!same.is_created());

    let v2 = commands::materiality_save(
        &mut ctx,
        "ENG-1",
        Some(&v1.id),
        "bob",
        &revenue_args(dec!(12000000)),
    )
    .await
    .unwrap()
    .into_version();
    assert_eq!(v2.version, 2);

    let approved = commands::materiality_approve(&mut ctx, &v2.id, "partner").unwrap();
    assert_eq!(approved.approved_by.as_deref(), Some("partner"));

    let err = commands::materiality_approve(&mut ctx, &v2.id, "partner").unwrap_err();
    assert!(matches!(
        err.downcast_ref::<MaterialityError>(),
        Some(MaterialityError::AlreadyApproved { .. })
    ));

    let v3 = commands::materiality_save(
        &mut ctx,
        "ENG-1",
        Some(&v2.id),
        "alice",
        &revenue_args(dec!(12000000)),
    )
    .await
    .unwrap();
    assert!(v3.is_created());

    let history = commands::materiality_history(&mut ctx, "ENG-1").unwrap();
    assert_eq!(history.len(), 3);
    assert!(history[1].is_approved());
    assert!(history[2].is_current);
}

#[tokio::test]
async fn test_stale_expected_version_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let mut ctx = context(&temp_dir);

    let v1 = commands::materiality_save(
        &mut ctx,
        "ENG-2",
        None,
        "alice",
        &revenue_args(dec!(1000000)),
    )
    .await
    .unwrap()
    .into_version();
    commands::materiality_save(&mut ctx, "ENG-2", Some(&v1.id), "bob", &revenue_args(dec!(2000000)))
        .await
        .unwrap();

    let err = commands::materiality_save(
        &mut ctx,
        "ENG-2",
        Some(&v1.id),
        "alice",
        &revenue_args(dec!(3000000)),
    )
    .await
    .unwrap_err();
    let err = err.downcast_ref::<MaterialityError>().unwrap();
    assert!(err.is_version_conflict());
}

#[tokio::test]
async fn test_ledger_survives_new_context() {
    let temp_dir = TempDir::new().unwrap();

    let v1_id = {
        let mut ctx = context(&temp_dir);
        commands::materiality_save(&mut ctx, "ENG-3", None, "alice", &revenue_args(dec!(500000)))
            .await
            .unwrap()
            .into_version()
            .id
    };

    let mut ctx = context(&temp_dir);
    let history = commands::materiality_history(&mut ctx, "ENG-3").unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].id, v1_id);
}

#[tokio::test]
async fn test_industry_guidance_with_override() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = context(&temp_dir);

    let mut args = revenue_args(dec!(40000000));
    args.overall = None;
    args.performance = None;
    args.trivial = Some(pct(dec!(4)));
    args.industry = Some("Retail".to_string());

    let inputs = commands::build_inputs(&ctx, &args).await.unwrap();
    assert_eq!(inputs.overall_pct.value(), dec!(0.5));
    assert_eq!(inputs.performance_pct.value(), dec!(75));
    assert_eq!(inputs.trivial_pct.value(), dec!(4));
    assert_eq!(inputs.industry.as_deref(), Some("retail"));

    let result = commands::materiality_compute(&ctx, &args).await.unwrap();
    assert_eq!(result.thresholds.overall, dec!(200000));
    assert_eq!(result.thresholds.clearly_trivial, dec!(8000));
}

#[tokio::test]
async fn test_unknown_industry_falls_back_to_general() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = context(&temp_dir);

    let recommendation = commands::guidance(&ctx, "shipbuilding", BenchmarkType::Revenue)
        .await
        .unwrap();
    assert_eq!(recommendation.industry, "general");
    assert_eq!(recommendation.recommended_overall_pct.value(), dec!(1.0));
}

#[tokio::test]
async fn test_missing_percentages_without_industry() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = context(&temp_dir);

    let mut args = revenue_args(dec!(1000000));
    args.performance = None;
    args.trivial = None;

    let err = commands::build_inputs(&ctx, &args).await.unwrap_err();
    assert!(err.to_string().contains("--performance, --trivial"));
}

#[test]
fn test_sampling_command() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = context(&temp_dir);

    let input = SamplingInput::Mus(MusInput {
        population_value: Some(dec!(5000000)),
        tolerable_error: Some(dec!(250000)),
        expected_misstatements: 0,
        confidence_level: ConfidenceLevel::NinetyFive,
    });
    let result = commands::sampling(&ctx, &input).unwrap();
    assert_eq!(result.sample_size, 61);

    let incomplete = commands::sampling(&ctx, &SamplingInput::Mus(MusInput::default())).unwrap();
    assert_eq!(incomplete.sample_size, 0);
    assert_eq!(incomplete.missing_fields().len(), 2);

    // Sampling never opens the ledger
    assert!(!ctx.db_path().exists());
}

#[tokio::test]
async fn test_config_file_with_guidance_override() {
    let temp_dir = TempDir::new().unwrap();

    let guidance_path = temp_dir.path().join("guidance.json");
    let mut guidance_file = std::fs::File::create(&guidance_path).unwrap();
    write!(
        guidance_file,
        r#"[{{"industry":"Mining","benchmark_type":"total_assets","recommended_overall_pct":"1.5","recommended_performance_pct":"60","recommended_trivial_pct":"4","rationale":"Capital intensive"}}]"#
    )
    .unwrap();

    let config_path = temp_dir.path().join("auditcalc.json");
    let mut config_file = std::fs::File::create(&config_path).unwrap();
    write!(
        config_file,
        r#"{{"advisory": {{"overall_max": "10"}}, "guidance_path": {:?}}}"#,
        guidance_path.to_string_lossy()
    )
    .unwrap();

    let db_path = temp_dir.path().join("ledger.db");
    let ctx = AppContext::new(Some(db_path.clone()), Some(&config_path), true).unwrap();
    assert_eq!(ctx.db_path(), db_path.as_path());
    assert_eq!(ctx.config.advisory.overall_max, dec!(10));

    let recommendation = commands::guidance(&ctx, "mining", BenchmarkType::TotalAssets)
        .await
        .unwrap();
    assert_eq!(recommendation.recommended_overall_pct.value(), dec!(1.5));

    // 8% is inside the configured range, so no advisories
    let mut args = revenue_args(dec!(1000000));
    args.overall = Some(pct(dec!(8)));
    let result = commands::materiality_compute(&ctx, &args).await.unwrap();
    assert!(result.advisories.is_empty());
}
