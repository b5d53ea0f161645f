//! ## 日本語
//!
//! 認証サービスへの HTTP トランスポートです。
//!
//! `http` feature により [`AuthServiceClient`] が利用可能になります。
//!
//! ## English
//!
//! HTTP transport to the auth service.
//!
//! Enabling the `http` feature makes [`AuthServiceClient`] available.

mod auth_service_client;
mod wire;

pub use auth_service_client::AuthServiceClient;
