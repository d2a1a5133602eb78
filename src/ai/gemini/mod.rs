pub mod client;
pub mod stylist;
pub mod types;

pub use client::GeminiHttpClient;
pub use stylist::GeminiStylistClient;
