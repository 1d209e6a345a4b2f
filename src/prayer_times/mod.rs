pub mod calculator;
pub mod provider;

pub use provider::TimingsProvider;
