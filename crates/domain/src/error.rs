//! # ドメイン層エラー定義
//!
//! 値オブジェクトの制約違反を表現するエラー型。
//!
//! ## エラーの種類と HTTP ステータスの対応
//!
//! | エラー種別 | HTTP ステータス | 用途 |
//! |-----------|----------------|------|
//! | `Validation` | 400 Bad Request | 入力値の検証失敗 |
//!
//! リソースの不在はドメインの関心ではなく、ユースケース層が
//! リポジトリの戻り値（`None` / `false`）から判定する。

use thiserror::Error;

/// ドメイン層で発生するエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    /// バリデーションエラー
    ///
    /// 値が制約に違反している場合に使用する（例: ページサイズが 0）。
    #[error("バリデーションエラー: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validationのメッセージにプレフィックスが付く() {
        let err = DomainError::Validation("ページサイズは 1 以上である必要があります".to_string());

        assert_eq!(
            err.to_string(),
            "バリデーションエラー: ページサイズは 1 以上である必要があります"
        );
    }
}
