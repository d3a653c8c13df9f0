// Technical indicator library
pub mod indicators;

// Feature engineering pipeline and target construction
pub mod features;

// Market regime classification
pub mod regime;
