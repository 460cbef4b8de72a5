// バス座席予約システム
// ヘキサゴナルアーキテクチャによるドメイン駆動設計

pub mod adapter;
pub mod application;
pub mod domain;
