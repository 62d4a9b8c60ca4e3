//! 保存済みページのパーステスト
//!
//! 実行方法:
//! ```
//! cargo run --example parse_file -- package ./rastreamento.html
//! cargo run --example parse_file -- price ./prazos.html SEDEX
//! ```

use correios_scraper::{parse_address_lookup, parse_addresses, parse_package, parse_price};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ログ設定
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (kind, path) = match args.as_slice() {
        [kind, path, ..] => (kind.as_str(), path.as_str()),
        _ => {
            eprintln!("usage: parse_file <addresses|lookup|package|price> <file> [mode]");
            std::process::exit(2);
        }
    };
    let text = std::fs::read_to_string(path)?;

    let json = match kind {
        "addresses" => serde_json::to_string_pretty(&parse_addresses(&text)?)?,
        "lookup" => serde_json::to_string_pretty(&parse_address_lookup(&text)?)?,
        "package" => serde_json::to_string_pretty(&parse_package(&text)?)?,
        "price" => {
            let mode = args.get(2).map(String::as_str).unwrap_or("SEDEX");
            serde_json::to_string_pretty(&parse_price(mode, &text)?)?
        }
        other => {
            eprintln!("不明な種類: {}", other);
            std::process::exit(2);
        }
    };

    println!("{}", json);
    Ok(())
}
