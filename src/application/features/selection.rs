use crate::domain::errors::FeatureError;
use crate::domain::market::feature_table::FeatureTable;
use crate::domain::market::series::Series;
use crate::domain::ml::feature_registry::{TARGET, is_feature_column};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

/// A feature and its absolute correlation with the target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCorrelation {
    pub feature: String,
    pub correlation: f64,
}

/// Every column that is a model input, in table order
pub fn feature_names(table: &FeatureTable) -> Vec<String> {
    table
        .column_names()
        .filter(|name| is_feature_column(name))
        .map(str::to_string)
        .collect()
}

/// Pearson correlation over rows where both series are defined.
///
/// None with fewer than two paired rows or when either side has zero variance.
pub fn pearson(x: &Series, y: &Series) -> Option<f64> {
    let (xs, ys): (Vec<f64>, Vec<f64>) = x
        .iter()
        .zip(y.iter())
        .filter_map(|(a, b)| Some((a?, b?)))
        .unzip();
    if xs.len() < 2 {
        return None;
    }

    let sx = xs.iter().std_dev();
    let sy = ys.iter().std_dev();
    if sx == 0.0 || sy == 0.0 || !sx.is_finite() || !sy.is_finite() {
        return None;
    }

    let r = xs.iter().covariance(ys.iter()) / (sx * sy);
    r.is_finite().then_some(r.clamp(-1.0, 1.0))
}

/// Top `top_n` features ranked by absolute correlation with `Target`.
/// Ties keep table order.
pub fn correlation_with_target(
    table: &FeatureTable,
    top_n: usize,
) -> Result<Vec<FeatureCorrelation>, FeatureError> {
    let target = table.column(TARGET).ok_or(FeatureError::NoTarget)?;

    let mut ranked: Vec<FeatureCorrelation> = feature_names(table)
        .into_iter()
        .filter_map(|feature| {
            let values = table.column(&feature)?;
            let r = pearson(values, target)?;
            Some(FeatureCorrelation {
                feature,
                correlation: r.abs(),
            })
        })
        .collect();

    ranked.sort_by(|a, b| b.correlation.total_cmp(&a.correlation));
    ranked.truncate(top_n);
    Ok(ranked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::features::test_support::table_from_closes;

    #[test]
    fn test_feature_names_exclude_reserved_columns() {
        let table = table_from_closes(&[1.0, 2.0])
            .with_column("Target", Series::from(vec![1.0, 0.0]))
            .unwrap()
            .with_column("Future_Returns", Series::from(vec![0.1, 0.0]))
            .unwrap()
            .with_column("RSI_14", Series::from(vec![50.0, 60.0]))
            .unwrap();
        assert_eq!(feature_names(&table), vec!["RSI_14".to_string()]);
    }

    #[test]
    fn test_pearson_perfect_and_inverse() {
        let x = Series::from(vec![1.0, 2.0, 3.0, 4.0]);
        let y = Series::from(vec![2.0, 4.0, 6.0, 8.0]);
        let z = Series::from(vec![4.0, 3.0, 2.0, 1.0]);
        assert!((pearson(&x, &y).unwrap() - 1.0).abs() < 1e-12);
        assert!((pearson(&x, &z).unwrap() + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_skips_undefined_and_flat() {
        let x = Series::new(vec![Some(1.0), None, Some(3.0)]);
        let y = Series::new(vec![Some(1.0), Some(5.0), None]);
        assert_eq!(pearson(&x, &y), None);
        let flat = Series::from(vec![2.0, 2.0, 2.0]);
        let y = Series::from(vec![1.0, 2.0, 3.0]);
        assert_eq!(pearson(&flat, &y), None);
    }

    #[test]
    fn test_ranking_by_absolute_correlation() {
        let table = table_from_closes(&[1.0, 2.0, 3.0, 4.0])
            .with_column("Noise", Series::from(vec![1.0, 3.0, 2.0, 4.0]))
            .unwrap()
            .with_column("Inverse", Series::from(vec![8.0, 6.0, 4.0, 2.0]))
            .unwrap()
            .with_column("Flat", Series::from(vec![1.0; 4]))
            .unwrap()
            .with_column("Target", Series::from(vec![1.0, 2.0, 3.0, 4.0]))
            .unwrap();

        let ranked = correlation_with_target(&table, 5).unwrap();
        let names: Vec<&str> = ranked.iter().map(|c| c.feature.as_str()).collect();
        assert_eq!(names, vec!["Inverse", "Noise"]);
        assert!((ranked[0].correlation - 1.0).abs() < 1e-12);

        assert_eq!(correlation_with_target(&table, 1).unwrap().len(), 1);
    }

    #[test]
    fn test_no_target() {
        let table = table_from_closes(&[1.0, 2.0]);
        assert!(matches!(
            correlation_with_target(&table, 3),
            Err(FeatureError::NoTarget)
        ));
    }
}
