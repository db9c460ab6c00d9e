//! Screening pipeline: option filter, factory, strategy filter and ranking.
//!
//! A run is synchronous and deterministic. The same quotes, spot and
//! configuration always yield the same candidates in the same order.

mod factory;
mod option_filter;
mod ranking;
mod strategy_filter;

pub use factory::StrategyFactory;
pub use option_filter::OptionFilter;
pub use ranking::{RankKey, StrategyRow, project, rank, render_table, top};
pub use strategy_filter::StrategyFilter;
