//! # ページネーション
//!
//! 1 始まりのページ番号と固定のページサイズから、
//! オフセット・リミットを算出する値オブジェクト。
//!
//! 総件数は扱わない。データ件数を超えるページは空の結果になるだけで、
//! エラーにはしない。

use crate::DomainError;

/// 1 ページあたりの件数
///
/// # 不変条件
///
/// - 1 以上
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSize(u32);

impl PageSize {
    /// デフォルトのページサイズ
    pub const DEFAULT: u32 = 10;

    pub fn new(value: u32) -> Result<Self, DomainError> {
        if value == 0 {
            return Err(DomainError::Validation(
                "ページサイズは 1 以上である必要があります".to_string(),
            ));
        }
        Ok(Self(value))
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

/// ページ指定
///
/// `offset = (page - 1) * page_size`、`limit = page_size` を表す。
/// 1 未満のページ番号は 1 ページ目として扱う。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page:      i64,
    page_size: PageSize,
}

impl PageRequest {
    pub fn new(page: i64, page_size: PageSize) -> Self {
        Self {
            page: page.max(1),
            page_size,
        }
    }

    /// 1 ページ目
    pub fn first(page_size: PageSize) -> Self {
        Self::new(1, page_size)
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    /// 読み飛ばす件数
    ///
    /// 極端に大きなページ番号では `i64::MAX` に飽和する（結果は空になる）。
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit())
    }

    /// 取得する最大件数
    pub fn limit(&self) -> i64 {
        i64::from(self.page_size.as_u32())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn size(value: u32) -> PageSize {
        PageSize::new(value).unwrap()
    }

    #[test]
    fn test_ページサイズ0はバリデーションエラー() {
        let result = PageSize::new(0);

        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_ページサイズのデフォルトは10() {
        assert_eq!(PageSize::default().as_u32(), 10);
    }

    #[rstest]
    #[case(1, 10, 0)]
    #[case(2, 10, 10)]
    #[case(3, 25, 50)]
    #[case(100, 1, 99)]
    fn test_offsetはページ番号とサイズから算出される(
        #[case] page: i64,
        #[case] page_size: u32,
        #[case] expected: i64,
    ) {
        let sut = PageRequest::new(page, size(page_size));

        assert_eq!(sut.offset(), expected);
        assert_eq!(sut.limit(), i64::from(page_size));
    }

    #[rstest]
    #[case(0)]
    #[case(-1)]
    #[case(i64::MIN)]
    fn test_1未満のページは1ページ目として扱う(#[case] page: i64) {
        let sut = PageRequest::new(page, size(10));

        assert_eq!(sut.page(), 1);
        assert_eq!(sut.offset(), 0);
    }

    #[test]
    fn test_巨大なページ番号でもオーバーフローしない() {
        let sut = PageRequest::new(i64::MAX, size(10));

        assert_eq!(sut.offset(), i64::MAX);
    }

    #[test]
    fn test_firstは1ページ目() {
        assert_eq!(PageRequest::first(size(5)), PageRequest::new(1, size(5)));
    }
}
