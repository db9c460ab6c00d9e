// Allow unwrap/expect in tests - tests should panic on unexpected errors
// Allow test-specific patterns and pedantic lints in test code
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::needless_collect,
        clippy::default_trait_access,
        clippy::items_after_statements
    )
)]

//! Chain Screener - Rust Core Library
//!
//! Screens one underlying's option chain for candidate structures and ranks
//! them.
//!
//! # Pipeline
//!
//! 1. **Acquire** a [`feed::ChainUniverse`] from a snapshot document or live
//!    from Tradier.
//! 2. **Filter options** against the liquidity, pricing and Greek bounds of
//!    a [`config::ConstraintSet`].
//! 3. **Generate** every candidate of each enabled shape: single calls,
//!    iron condors, straddles, strangles and forward-volatility pairs.
//! 4. **Filter strategies** on cost, payoff, reward/risk and net Greeks.
//! 5. **Rank**, truncate and project into flat rows for display.
//!
//! Steps 2 to 5 are synchronous and pure; only acquisition touches the
//! network or the filesystem.
//!
//! # Modules
//!
//! - `options`: quotes, derived metrics and Greeks
//! - `strategy`: strategy shapes, their payoff metrics and generators
//! - `screening`: option and strategy filters, the factory and ranking
//! - `config`: run configuration loading and validation
//! - `feed`: snapshot loading and live chain acquisition
//! - `observability` / `telemetry`: metrics and tracing setup

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod error;
pub mod feed;
pub mod observability;
pub mod options;
pub mod screening;
pub mod strategy;
pub mod telemetry;

pub use config::{ConstraintSet, ScreenConfig, ShapeSelector, load_config};
pub use error::{ErrorCode, ScreenerError};
pub use feed::{ChainUniverse, load_snapshot};
pub use options::{OptionQuote, OptionSide};
pub use screening::{RankKey, StrategyFactory, StrategyRow, project, rank, top};
pub use strategy::{Direction, Shape, Strategy};
