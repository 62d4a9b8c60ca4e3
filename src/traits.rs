use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::FetchError;
use crate::models::{DeliveryOption, PackageDimensions};

/// Fetcherに渡す取得要求
///
/// フォームのエンコードやヘッダーはFetcher実装側の責務。
#[derive(Debug, Clone, PartialEq)]
pub enum FetchRequest {
    /// 住所検索ページ（HTML）
    AddressSearch { query: String },
    /// 住所検索API（JSON）
    AddressLookup { zip_code: String },
    /// 追跡ページ（HTML）
    PackageTracking { code: String },
    /// 送料計算ページ（HTML）。配送サービス1つにつき1回
    DeliveryPrice {
        option: DeliveryOption,
        post_date: NaiveDate,
        origin_zip: String,
        destination_zip: String,
        dimensions: PackageDimensions,
    },
}

#[async_trait]
pub trait Fetcher: Send + Sync {
    /// 生のテキスト（HTMLまたはJSON）を取得
    async fn fetch(&self, request: FetchRequest) -> Result<String, FetchError>;
}

#[async_trait]
impl<F: Fetcher + ?Sized> Fetcher for Arc<F> {
    async fn fetch(&self, request: FetchRequest) -> Result<String, FetchError> {
        (**self).fetch(request).await
    }
}
