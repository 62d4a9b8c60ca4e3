//! Correios（ブラジル郵便）ページパーサー
//!
//! - 住所検索ページ → 住所一覧
//! - 追跡ページ → 荷物と追跡イベント
//! - 送料計算ページ → 送料見積もり
//!
//! HTTP通信は行わない。取得は [`Fetcher`] 実装に任せる。
//!
//! # パーサー使用例
//!
//! ```rust,ignore
//! use correios_scraper::{parse_package, parse_price};
//!
//! let package = parse_package(&tracking_html)?;
//! for event in package.events() {
//!     println!("{} {} {}", event.timestamp, event.location, event.status);
//! }
//!
//! let quote = parse_price("SEDEX", &price_html)?;
//! println!("R$ {} / {} dias", quote.price, quote.days);
//! ```
//!
//! # サービス使用例
//!
//! ```rust,ignore
//! use correios_scraper::{CorreiosRequest, CorreiosService};
//! use tower::Service;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut service = CorreiosService::new(MyHttpFetcher::new());
//!
//!     let request = CorreiosRequest::track_package("PN123456789BR");
//!     let response = service.call(request).await.unwrap();
//!     println!("{:?}", response);
//! }
//! ```

pub mod config;
pub mod document;
pub mod error;
pub mod locale;
pub mod models;
pub mod parser;
pub mod service;
pub mod text;
pub mod traits;

// 主要な型をリエクスポート
pub use config::ParserConfig;
pub use error::{FetchError, ParseError, ParseErrorKind, ServiceError};
pub use locale::{LocaleFormat, PtBr};
pub use models::{
    Address, DeliveryOption, DeliveryPrice, Package, PackageDimensions, PackageTrackingEvent,
    Price,
};
pub use parser::{
    parse_address_lookup, parse_addresses, parse_package, parse_price, Parser, TrackingLayout,
};
pub use service::{CorreiosRequest, CorreiosResponse, CorreiosService, PriceQuery};
pub use traits::{FetchRequest, Fetcher};
