use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use chrono::NaiveDate;
use futures::future::try_join_all;
use tower::Service;
use tracing::{debug, info};

use crate::error::{ParseError, ServiceError};
use crate::models::{Address, DeliveryOption, DeliveryPrice, Package, PackageDimensions};
use crate::parser::Parser;
use crate::text::strip_non_numeric;
use crate::traits::{FetchRequest, Fetcher};

/// 送料見積もりの条件
#[derive(Debug, Clone, PartialEq)]
pub struct PriceQuery {
    pub post_date: NaiveDate,
    pub origin_zip: String,
    pub destination_zip: String,
    pub options: Vec<DeliveryOption>,
    pub dimensions: PackageDimensions,
}

impl PriceQuery {
    /// CEPは数字以外を除去して保持
    pub fn new(
        post_date: NaiveDate,
        origin_zip: impl AsRef<str>,
        destination_zip: impl AsRef<str>,
    ) -> Self {
        Self {
            post_date,
            origin_zip: strip_non_numeric(origin_zip.as_ref()),
            destination_zip: strip_non_numeric(destination_zip.as_ref()),
            options: vec![DeliveryOption::Sedex, DeliveryOption::Pac],
            dimensions: PackageDimensions::default(),
        }
    }

    pub fn with_options(mut self, options: impl IntoIterator<Item = DeliveryOption>) -> Self {
        self.options = options.into_iter().collect();
        self
    }

    pub fn with_dimensions(mut self, dimensions: PackageDimensions) -> Self {
        self.dimensions = dimensions;
        self
    }

    /// 重複を除いた配送サービス（指定順）
    fn distinct_options(&self) -> Vec<DeliveryOption> {
        let mut seen = Vec::with_capacity(self.options.len());
        for option in &self.options {
            if !seen.contains(option) {
                seen.push(*option);
            }
        }
        seen
    }

    fn fetch_request(&self, option: DeliveryOption) -> FetchRequest {
        FetchRequest::DeliveryPrice {
            option,
            post_date: self.post_date,
            origin_zip: self.origin_zip.clone(),
            destination_zip: self.destination_zip.clone(),
            dimensions: self.dimensions,
        }
    }
}

/// サービスへのリクエスト
#[derive(Debug, Clone, PartialEq)]
pub enum CorreiosRequest {
    SearchAddresses { query: String },
    LookupZip { zip_code: String },
    TrackPackage { code: String },
    QuotePrices(PriceQuery),
}

impl CorreiosRequest {
    pub fn search_addresses(query: impl Into<String>) -> Self {
        Self::SearchAddresses {
            query: query.into(),
        }
    }

    pub fn lookup_zip(zip_code: impl AsRef<str>) -> Self {
        Self::LookupZip {
            zip_code: strip_non_numeric(zip_code.as_ref()),
        }
    }

    pub fn track_package(code: impl Into<String>) -> Self {
        Self::TrackPackage {
            code: code.into().trim().to_string(),
        }
    }

    pub fn quote_prices(query: PriceQuery) -> Self {
        Self::QuotePrices(query)
    }
}

/// サービスの応答
#[derive(Debug, Clone, PartialEq)]
pub enum CorreiosResponse {
    Addresses(Vec<Address>),
    Package(Package),
    Prices(Vec<DeliveryPrice>),
}

/// tower::Serviceを実装したCorreiosサービス
///
/// 取得は注入された [`Fetcher`] に任せ、パースはブロッキングスレッドで行う。
pub struct CorreiosService<F> {
    fetcher: Arc<F>,
    parser: Arc<Parser>,
}

impl<F> Clone for CorreiosService<F> {
    fn clone(&self) -> Self {
        Self {
            fetcher: Arc::clone(&self.fetcher),
            parser: Arc::clone(&self.parser),
        }
    }
}

impl<F: Fetcher + 'static> CorreiosService<F> {
    pub fn new(fetcher: F) -> Self {
        Self::with_parser(fetcher, Parser::new())
    }

    pub fn with_parser(fetcher: F, parser: Parser) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            parser: Arc::new(parser),
        }
    }

    /// 住所検索（HTML）
    pub async fn search_addresses(&self, query: &str) -> Result<Vec<Address>, ServiceError> {
        let html = self
            .fetcher
            .fetch(FetchRequest::AddressSearch {
                query: query.to_string(),
            })
            .await?;
        self.parse_blocking(move |parser| parser.parse_addresses(&html))
            .await
    }

    /// 住所検索（JSON API）。該当なしは空の一覧
    pub async fn lookup_zip(&self, zip_code: &str) -> Result<Vec<Address>, ServiceError> {
        let json = self
            .fetcher
            .fetch(FetchRequest::AddressLookup {
                zip_code: zip_code.to_string(),
            })
            .await?;
        self.parse_blocking(move |parser| parser.parse_address_lookup(&json))
            .await
    }

    pub async fn track_package(&self, code: &str) -> Result<Package, ServiceError> {
        let html = self
            .fetcher
            .fetch(FetchRequest::PackageTracking {
                code: code.to_string(),
            })
            .await?;
        self.parse_blocking(move |parser| parser.parse_package(&html))
            .await
    }

    /// 配送サービスごとに並行して取得し、指定順で返す
    pub async fn quote_prices(&self, query: &PriceQuery) -> Result<Vec<DeliveryPrice>, ServiceError> {
        let options = query.distinct_options();
        debug!("送料見積もり: {} サービス", options.len());
        try_join_all(
            options
                .into_iter()
                .map(|option| self.quote_price(option, query)),
        )
        .await
    }

    async fn quote_price(
        &self,
        option: DeliveryOption,
        query: &PriceQuery,
    ) -> Result<DeliveryPrice, ServiceError> {
        let html = self.fetcher.fetch(query.fetch_request(option)).await?;
        self.parse_blocking(move |parser| parser.parse_price(option.label(), &html))
            .await
    }

    async fn dispatch(&self, req: CorreiosRequest) -> Result<CorreiosResponse, ServiceError> {
        match req {
            CorreiosRequest::SearchAddresses { query } => self
                .search_addresses(&query)
                .await
                .map(CorreiosResponse::Addresses),
            CorreiosRequest::LookupZip { zip_code } => self
                .lookup_zip(&zip_code)
                .await
                .map(CorreiosResponse::Addresses),
            CorreiosRequest::TrackPackage { code } => self
                .track_package(&code)
                .await
                .map(CorreiosResponse::Package),
            CorreiosRequest::QuotePrices(query) => self
                .quote_prices(&query)
                .await
                .map(CorreiosResponse::Prices),
        }
    }

    async fn parse_blocking<T, P>(&self, parse: P) -> Result<T, ServiceError>
    where
        T: Send + 'static,
        P: FnOnce(&Parser) -> Result<T, ParseError> + Send + 'static,
    {
        let parser = Arc::clone(&self.parser);
        let parsed = tokio::task::spawn_blocking(move || parse(&parser))
            .await
            .map_err(|e| ServiceError::Task(e.to_string()))?;
        Ok(parsed?)
    }
}

impl<F: Fetcher + 'static> Service<CorreiosRequest> for CorreiosService<F> {
    type Response = CorreiosResponse;
    type Error = ServiceError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: CorreiosRequest) -> Self::Future {
        info!("リクエスト受信: {:?}", req);

        let service = self.clone();
        Box::pin(async move {
            let response = service.dispatch(req).await?;

            match &response {
                CorreiosResponse::Addresses(addresses) => {
                    info!("住所取得完了: {} 件", addresses.len())
                }
                CorreiosResponse::Package(package) => info!(
                    "追跡取得完了: code={}, events={}",
                    package.code(),
                    package.events().len()
                ),
                CorreiosResponse::Prices(prices) => info!("送料取得完了: {} 件", prices.len()),
            }

            Ok(response)
        })
    }
}
