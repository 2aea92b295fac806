pub mod config;
pub mod engine;
pub mod factors;
pub mod validation;

pub use config::{FactorWeights, ScoringConfig, StrategyKind, Thresholds, WEIGHT_SUM_TOLERANCE};
pub use engine::{
    classify_budgeted, classify_proportional, strategy_for, BudgetedStrategy, Classification,
    FactorScore, ScoringResult, Strategy, WeightedStrategy,
};
pub use factors::{Factor, FactorReading, PointScale};
pub use validation::validate_config;
