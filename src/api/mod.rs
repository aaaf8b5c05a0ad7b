pub mod client;
pub mod models;
pub mod route53;
mod sign;
mod xml;

pub use client::DnsApiClient;
pub use route53::Route53Client;
