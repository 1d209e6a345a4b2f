pub mod aladhan;
pub mod alquran;
pub mod client;
pub mod error;
pub mod radio;

pub use client::HttpClient;
pub use error::ApiError;
