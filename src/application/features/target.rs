use crate::domain::errors::FeatureError;
use crate::domain::market::feature_table::FeatureTable;
use crate::domain::ml::feature_registry::{FUTURE_RETURNS, TARGET};
use crate::domain::ml::target::{Label, LabelDistribution, TargetMethod, TargetSpec};
use tracing::info;

/// Adds `Future_Returns` and `Target`.
///
/// The last `horizon` rows have no future close and stay undefined in both
/// columns. For classification the label distribution is logged and returned.
pub fn create_target(
    table: FeatureTable,
    spec: &TargetSpec,
) -> Result<(FeatureTable, Option<LabelDistribution>), FeatureError> {
    spec.validate()?;
    info!(
        "Creating target variable (horizon={}, threshold={}%)...",
        spec.horizon,
        spec.threshold * 100.0
    );

    let close = table.require("Close")?.clone();
    let future_returns = close
        .lead(spec.horizon)
        .zip_with_opt(&close, |future, now| {
            if now == 0.0 {
                None
            } else {
                Some(future / now - 1.0)
            }
        })?;

    let (target, distribution) = match spec.method {
        TargetMethod::Classification => {
            let labels = future_returns.map(|r| Label::from_return(r, spec.threshold).as_f64());
            let distribution = LabelDistribution::from_labels(&labels);
            log_distribution(&distribution);
            (labels, Some(distribution))
        }
        TargetMethod::Regression => (future_returns.clone(), None),
    };

    let table = table
        .with_column(FUTURE_RETURNS, future_returns)?
        .with_column(TARGET, target)?;
    Ok((table, distribution))
}

fn log_distribution(distribution: &LabelDistribution) {
    info!("Target distribution:");
    for (label, tag) in [(Label::Buy, "Buy (1)"), (Label::Hold, "Hold (0)"), (Label::Sell, "Sell (-1)")] {
        info!(
            "  {}: {} ({:.1}%)",
            tag,
            distribution.count(label),
            distribution.percentage(label)
        );
    }
}
