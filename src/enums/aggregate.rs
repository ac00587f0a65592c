//! # **Aggregate Module** - *Aggregation Kinds, Requests and Typing*
//!
//! The tagged aggregation variant with per-variant parameter fields,
//! structural equality, and the source-type → accumulator-type table used by
//! both group-by and the column reductions.

use crate::{DataType, Interpolation, KernelError, Result};

/// Default delta-degrees-of-freedom for variance and standard deviation.
pub const DEFAULT_DDOF: usize = 1;

/// # Aggregation
///
/// Aggregation kind with its parameters. Two aggregations with identical
/// fields compare equal.
#[derive(Debug, Clone, PartialEq)]
pub enum Aggregation {
    Sum,
    Min,
    Max,
    Count,
    Mean,
    /// `Σ(x − mean)² / (N − ddof)`.
    Variance { ddof: usize },
    /// `√VARIANCE`.
    Std { ddof: usize },
    /// 50th percentile with `Linear` interpolation; delegates to
    /// `Quantile(0.5, Linear)`.
    Median,
    Quantile {
        quantile: f64,
        interpolation: Interpolation,
    },
}

impl Aggregation {
    /// Variance with the default `ddof = 1`.
    pub fn variance() -> Self {
        Aggregation::Variance { ddof: DEFAULT_DDOF }
    }

    /// Standard deviation with the default `ddof = 1`.
    pub fn std() -> Self {
        Aggregation::Std { ddof: DEFAULT_DDOF }
    }

    /// Short lowercase label used for output column naming.
    pub fn label(&self) -> &'static str {
        match self {
            Aggregation::Sum => "sum",
            Aggregation::Min => "min",
            Aggregation::Max => "max",
            Aggregation::Count => "count",
            Aggregation::Mean => "mean",
            Aggregation::Variance { .. } => "var",
            Aggregation::Std { .. } => "std",
            Aggregation::Median => "median",
            Aggregation::Quantile { .. } => "quantile",
        }
    }

    /// Result element type for this aggregation over `source`, per the
    /// accumulator-type table:
    ///
    /// | source | SUM | MIN/MAX | COUNT | MEAN/VAR/STD/QUANTILE |
    /// |---|---|---|---|---|
    /// | integer | int64 | source | int64 | float64 |
    /// | float | source | source | int64 | float64 |
    /// | temporal | — | source | int64 | — |
    /// | string | — | source | int64 | — |
    pub fn target_type(&self, source: &DataType) -> Result<DataType> {
        let numeric = source.is_numeric();
        let orderable = numeric
            || source.is_temporal()
            || matches!(source, DataType::String | DataType::Dictionary | DataType::Bool8);
        match self {
            Aggregation::Count => Ok(DataType::Int64),
            Aggregation::Min | Aggregation::Max => {
                if orderable {
                    Ok(source.clone())
                } else {
                    Err(KernelError::type_mismatch(format!(
                        "{} is not supported for {}",
                        self.label(),
                        source
                    )))
                }
            }
            Aggregation::Sum => {
                if source.is_integer() || matches!(source, DataType::Bool8) {
                    Ok(DataType::Int64)
                } else if source.is_float() {
                    Ok(source.clone())
                } else {
                    Err(KernelError::type_mismatch(format!(
                        "sum is not supported for {}",
                        source
                    )))
                }
            }
            Aggregation::Mean
            | Aggregation::Variance { .. }
            | Aggregation::Std { .. }
            | Aggregation::Median
            | Aggregation::Quantile { .. } => {
                if numeric {
                    Ok(DataType::Float64)
                } else {
                    Err(KernelError::type_mismatch(format!(
                        "{} is not supported for {}",
                        self.label(),
                        source
                    )))
                }
            }
        }
    }
}

/// One group-by request: aggregations to run against a values column.
///
/// `column` indexes into the values table passed alongside the keys.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregationRequest {
    pub column: usize,
    pub aggs: Vec<Aggregation>,
}

impl AggregationRequest {
    pub fn new(column: usize, aggs: Vec<Aggregation>) -> Self {
        Self { column, aggs }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_equality() {
        assert_eq!(Aggregation::variance(), Aggregation::Variance { ddof: 1 });
        assert_ne!(
            Aggregation::Variance { ddof: 0 },
            Aggregation::Variance { ddof: 1 }
        );
        assert_eq!(
            Aggregation::Quantile {
                quantile: 0.5,
                interpolation: Interpolation::Linear
            },
            Aggregation::Quantile {
                quantile: 0.5,
                interpolation: Interpolation::Linear
            }
        );
    }

    #[test]
    fn test_target_types() {
        assert_eq!(
            Aggregation::Sum.target_type(&DataType::Int32).unwrap(),
            DataType::Int64
        );
        assert_eq!(
            Aggregation::Sum.target_type(&DataType::Float32).unwrap(),
            DataType::Float32
        );
        assert_eq!(
            Aggregation::Min.target_type(&DataType::String).unwrap(),
            DataType::String
        );
        assert_eq!(
            Aggregation::Mean.target_type(&DataType::UInt8).unwrap(),
            DataType::Float64
        );
        assert_eq!(
            Aggregation::Count.target_type(&DataType::String).unwrap(),
            DataType::Int64
        );
        assert!(Aggregation::Sum.target_type(&DataType::String).is_err());
        assert!(
            Aggregation::Mean
                .target_type(&DataType::Timestamp(crate::TimeUnit::Seconds))
                .is_err()
        );
    }
}
