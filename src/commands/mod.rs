pub mod list_strategies;
pub mod simulate;
