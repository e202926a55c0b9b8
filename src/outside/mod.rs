pub mod http;

pub use http::{ClientConfig, HttpClient, PageFetcher};
