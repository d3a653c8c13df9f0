// Domain-specific error types
pub mod errors;

// Market data domain
pub mod market;

// Feature column registry
pub mod ml;

// Port interfaces
pub mod ports;

// Input data checks
pub mod validation;
