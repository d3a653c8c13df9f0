use crate::application::indicators::{roc, sma};
use crate::domain::errors::FeatureError;
use crate::domain::market::feature_table::FeatureTable;
use tracing::info;

/// Volume averages, relative volume and price-volume product
pub fn volume_features(table: FeatureTable) -> Result<FeatureTable, FeatureError> {
    info!("Adding volume features...");
    let close = table.require("Close")?.clone();
    let volume = table.require("Volume")?.clone();

    let sma_5 = sma(&volume, 5)?;
    let sma_10 = sma(&volume, 10)?;
    let sma_20 = sma(&volume, 20)?;
    let ratio_5 = volume.try_div(&sma_5)?;
    let ratio_20 = volume.try_div(&sma_20)?;

    table.with_columns([
        ("Volume_SMA_5", sma_5),
        ("Volume_SMA_10", sma_10),
        ("Volume_SMA_20", sma_20),
        ("Volume_Ratio_5", ratio_5),
        ("Volume_Ratio_20", ratio_20),
        ("Volume_ROC_5", roc(&volume, 5)?),
        ("PV_Trend", close.try_mul(&volume)?),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::features::test_support::{constant_table, sample_table};
    use crate::domain::ml::feature_registry::VOLUME_FEATURE_COLUMNS;

    #[test]
    fn test_column_order() {
        let table = volume_features(sample_table(30)).unwrap();
        let added: Vec<&str> = table.column_names().skip(5).collect();
        assert_eq!(added, VOLUME_FEATURE_COLUMNS);
    }

    #[test]
    fn test_constant_volume_ratio_is_one() {
        let table = volume_features(constant_table(30, 10.0)).unwrap();
        let ratio = table.column("Volume_Ratio_20").unwrap();
        assert_eq!(ratio.first_defined_index(), Some(19));
        for v in ratio.iter().flatten() {
            assert!((v - 1.0).abs() < 1e-12);
        }
        assert_eq!(table.column("Volume_ROC_5").unwrap().get(5), Some(0.0));
    }
}
