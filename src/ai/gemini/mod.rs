pub mod client;
pub mod stone;
pub mod types;

pub use client::GeminiHttpClient;
pub use stone::GeminiStoneClient;
