pub mod balances;
pub mod clock;
pub mod config;
pub mod duration;
pub mod format;
pub mod market_data;
pub mod models;
pub mod normalize;
pub mod swap;
