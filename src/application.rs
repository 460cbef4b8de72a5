// アプリケーション層
// ユースケースの調整を担当する。ビジネスロジックはドメイン層に委譲する

pub mod error;
pub mod service;

pub use error::ApplicationError;
