#[cfg(feature = "market_data")]
pub mod price_list;
mod static_source;

#[cfg(feature = "market_data")]
pub use price_list::HttpPriceListSource;
pub use static_source::StaticPriceSource;
