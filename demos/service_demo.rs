//! CorreiosService のテスト（保存済みページを返すFetcher）
//!
//! 実行方法:
//! ```
//! CORREIOS_PAGES=./pages cargo run --example service_demo -- PN123456789BR
//! ```
//!
//! `./pages` に `rastreamento.html`, `prazos_<サービスコード>.html` を置く。

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::Local;
use correios_scraper::{
    CorreiosRequest, CorreiosResponse, CorreiosService, DeliveryOption, FetchError, FetchRequest,
    Fetcher, PriceQuery,
};
use tower::Service;
use tracing_subscriber::EnvFilter;

/// ディレクトリ内のファイルを返すFetcher
struct DirectoryFetcher {
    root: PathBuf,
}

#[async_trait]
impl Fetcher for DirectoryFetcher {
    async fn fetch(&self, request: FetchRequest) -> Result<String, FetchError> {
        let file = match request {
            FetchRequest::AddressSearch { .. } => "enderecos.html".to_string(),
            FetchRequest::AddressLookup { .. } => "enderecos.json".to_string(),
            FetchRequest::PackageTracking { .. } => "rastreamento.html".to_string(),
            FetchRequest::DeliveryPrice { option, .. } => {
                format!("prazos_{}.html", option.service_code())
            }
        };
        tokio::fs::read_to_string(self.root.join(&file))
            .await
            .map_err(|e| FetchError::Transport(format!("{}: {}", file, e)))
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ログ設定
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let root = std::env::var("CORREIOS_PAGES").unwrap_or_else(|_| "./pages".to_string());
    let code = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "PN123456789BR".to_string());

    let mut service = CorreiosService::new(DirectoryFetcher {
        root: PathBuf::from(root),
    });

    println!("=== Tracking ===");
    match service.call(CorreiosRequest::track_package(&code)).await {
        Ok(CorreiosResponse::Package(package)) => {
            for event in package.events() {
                println!(
                    "{} | {} | {} | {}",
                    event.timestamp, event.location, event.status, event.details
                );
            }
        }
        Ok(other) => println!("想定外の応答: {:?}", other),
        Err(e) => eprintln!("エラー: {}", e),
    }

    println!();
    println!("=== Prices ===");
    let query = PriceQuery::new(Local::now().date_naive(), "01310-100", "20040-020")
        .with_options(DeliveryOption::ALL);
    match service.call(CorreiosRequest::quote_prices(query)).await {
        Ok(CorreiosResponse::Prices(prices)) => {
            for price in prices {
                println!("{}: R$ {} ({} dias)", price.mode, price.price, price.days);
            }
        }
        Ok(other) => println!("想定外の応答: {:?}", other),
        Err(e) => eprintln!("エラー: {}", e),
    }

    Ok(())
}
