//! 送料計算結果ページのパース

use std::sync::LazyLock;

use regex::Regex;
use scraper::ElementRef;
use tracing::{debug, warn};

use crate::config::Selectors;
use crate::document::{text_of, Document};
use crate::error::{messages, ParseError};
use crate::locale::LocaleFormat;
use crate::models::{Address, DeliveryPrice, Price};
use crate::text::{collapse_line_breaks, strip_hyphens};

use super::address::split_city_state;

static RE_DAYS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+").expect("invalid regex: days"));

/// 発送元/配送先ブロックのセル位置（0, 1 は見出し）
const ROUTE_CELLS: usize = 10;
const ZIP: usize = 2;
const STREET: usize = 4;
const DISTRICT: usize = 6;
const CITY_STATE: usize = 8;

pub(crate) fn parse(
    selectors: &Selectors,
    locale: &dyn LocaleFormat,
    mode: &str,
    html: &str,
) -> Result<DeliveryPrice, ParseError> {
    let document = Document::load(html);

    let errors: Vec<String> = document
        .select_all(&selectors.price_errors)
        .into_iter()
        .map(text_of)
        .collect();

    if !errors.is_empty() {
        debug!("送料計算エラー表示 {} 件: mode={}", errors.len(), mode);
        return Err(ParseError::external(messages::DELIVERY_PRICE_FAILED, errors));
    }

    let content = document
        .select_first(&selectors.content)
        .ok_or_else(|| ParseError::mismatch(messages::DELIVERY_PRICE_FAILED))?;

    let cells: Vec<ElementRef<'_>> = content.select(&selectors.price_result_cells).collect();
    let [term_cell, price_cell, ..] = cells.as_slice() else {
        return Err(ParseError::mismatch(messages::DELIVERY_PRICE_FAILED));
    };

    let term_text = collapse_line_breaks(&text_of(*term_cell));
    let price_text = collapse_line_breaks(&text_of(*price_cell));

    let days = parse_days(&term_text);
    if days == DeliveryPrice::UNKNOWN_DAYS {
        debug!("配送日数なし: mode={}, text={:?}", mode, term_text);
    }

    // 解釈できない金額は 0 として扱う
    let price = locale.parse_currency(&price_text).unwrap_or_else(|| {
        warn!("金額を解釈できません: mode={}, text={:?}", mode, price_text);
        Price::ZERO
    });

    let (origin, destination) = match parse_route(content, selectors) {
        Some((origin, destination)) => (Some(origin), Some(destination)),
        None => (None, None),
    };

    Ok(DeliveryPrice {
        mode: mode.to_string(),
        price,
        days,
        origin,
        destination,
    })
}

/// 最初のASCII数字列。無い（または範囲外）なら -1
fn parse_days(text: &str) -> i32 {
    RE_DAYS
        .find(text)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(DeliveryPrice::UNKNOWN_DAYS)
}

/// 発送元と配送先。ブロックが無い・不完全な場合は `None`
fn parse_route(content: ElementRef<'_>, selectors: &Selectors) -> Option<(Address, Address)> {
    let cells: Vec<String> = content
        .select(&selectors.price_route_cells)
        .map(|cell| collapse_line_breaks(&text_of(cell)))
        .collect();

    if cells.is_empty() {
        return None;
    }
    if cells.len() < ROUTE_CELLS {
        warn!("発送元/配送先ブロックのセル数不足: {}", cells.len());
        return None;
    }

    let origin = route_address(&cells, 0);
    let destination = route_address(&cells, 1);
    if origin.is_none() || destination.is_none() {
        warn!("発送元/配送先の市/州を分割できません");
    }
    Some((origin?, destination?))
}

/// `side`: 0 = 発送元, 1 = 配送先
fn route_address(cells: &[String], side: usize) -> Option<Address> {
    let (city, state) = split_city_state(&cells[CITY_STATE + side])?;
    Some(Address {
        street: cells[STREET + side].clone(),
        district: cells[DISTRICT + side].clone(),
        city,
        state,
        zip_code: strip_hyphens(&cells[ZIP + side]),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseErrorKind;
    use crate::parser::parse_price;

    fn result_page(term: &str, price: &str) -> String {
        format!(
            r#"<html><body><div class="ctrlcontent">
                <table class="comparaResult">
                    <tr><th>Prazo</th><th>Valor</th></tr>
                    <tr class="destaque"><td>{}</td><td>{}</td></tr>
                </table>
            </div></body></html>"#,
            term, price
        )
    }

    const ROUTE_BLOCK: &str = r#"
        <div class="contentexpodados">
            <table class="comparaResult">
                <tr><td>Origem</td><td>Destino</td></tr>
                <tr><td>01310-100</td><td>20040-020</td></tr>
                <tr><td>Avenida Paulista</td><td>Avenida Rio Branco</td></tr>
                <tr><td>Bela Vista</td><td>Centro</td></tr>
                <tr><td>São Paulo/SP</td><td>Rio de Janeiro / RJ</td></tr>
            </table>
        </div>
    "#;

    #[test]
    fn test_days_and_price() {
        let price = parse_price("SEDEX", &result_page("Prazo: 3 dias", "R$ 25,50")).unwrap();
        assert_eq!(price.mode, "SEDEX");
        assert_eq!(price.days, 3);
        assert_eq!(price.price, Price::from_cents(2550));
        assert!(price.origin.is_none());
        assert!(price.destination.is_none());
    }

    #[test]
    fn test_missing_days_is_sentinel() {
        let price = parse_price("SEDEX", &result_page("sem prazo definido", "R$ 25,50")).unwrap();
        assert_eq!(price.days, DeliveryPrice::UNKNOWN_DAYS);
        assert!(!price.has_estimate());
        assert_eq!(price.price, Price::from_cents(2550));
    }

    #[test]
    fn test_unparseable_price_defaults_to_zero() {
        let price = parse_price("PAC", &result_page("8 dias úteis", "indisponível")).unwrap();
        assert_eq!(price.days, 8);
        assert_eq!(price.price, Price::ZERO);
    }

    #[test]
    fn test_error_banners_are_carried_verbatim() {
        let html = r#"
            <div class="ctrlcontent">
                <div class="info error">CEP de origem não encontrado na base de dados.</div>
                <div class="info error">
                    Peso acima do limite.
                </div>
                <table class="comparaResult"><tr class="destaque"><td>3</td><td>R$ 1,00</td></tr></table>
            </div>
        "#;
        let err = parse_price("SEDEX", html).unwrap_err();
        assert_eq!(err.kind(), ParseErrorKind::External);
        assert_eq!(err.message(), messages::DELIVERY_PRICE_FAILED);
        assert_eq!(
            err.details(),
            [
                "CEP de origem não encontrado na base de dados.",
                "\n                    Peso acima do limite.\n                ",
            ]
        );
    }

    #[test]
    fn test_error_banner_whitespace_is_kept() {
        let html = "<div class=\"info error\">\n  Peso\tacima\n</div>";
        let err = parse_price("PAC", html).unwrap_err();
        assert_eq!(err.details(), ["\n  Peso\tacima\n"]);
    }

    #[test]
    fn test_missing_result_row_is_mismatch() {
        let html = r#"<div class="ctrlcontent"><table class="comparaResult"></table></div>"#;
        let err = parse_price("SEDEX", html).unwrap_err();
        assert_eq!(err.kind(), ParseErrorKind::StructuralMismatch);
    }

    #[test]
    fn test_route_block() {
        let html = result_page("2 dias", "R$ 1.045,90")
            .replace("</div></body>", &format!("{}</div></body>", ROUTE_BLOCK));
        let price = parse_price("SEDEX 10", &html).unwrap();

        assert_eq!(price.price, Price::from_cents(104_590));
        let origin = price.origin.unwrap();
        assert_eq!(origin.zip_code, "01310100");
        assert_eq!(origin.street, "Avenida Paulista");
        assert_eq!(origin.city, "São Paulo");
        assert_eq!(origin.state, "SP");

        let destination = price.destination.unwrap();
        assert_eq!(destination.zip_code, "20040020");
        assert_eq!(destination.district, "Centro");
        assert_eq!(destination.city, "Rio de Janeiro");
        assert_eq!(destination.state, "RJ");
    }

    #[test]
    fn test_incomplete_route_block_is_ignored() {
        let html = result_page("2 dias", "R$ 10,00").replace(
            "</div></body>",
            r#"<div class="contentexpodados"><table class="comparaResult"><tr><td>Origem</td><td>Destino</td></tr></table></div></div></body>"#,
        );
        let price = parse_price("SEDEX", &html).unwrap();
        assert!(price.origin.is_none());
        assert_eq!(price.days, 2);
    }

    #[test]
    fn test_parse_days() {
        assert_eq!(parse_days("Entrega em até 12 dias úteis"), 12);
        assert_eq!(parse_days("D+1"), 1);
        assert_eq!(parse_days(""), -1);
        assert_eq!(parse_days("99999999999 dias"), -1);
        // ASCII以外の数字は読み飛ばす
        assert_eq!(parse_days("Prazo \u{0663} / 3 dias"), 3);
    }

    #[test]
    fn test_reparsing_is_idempotent() {
        let html = result_page("Prazo: 3 dias", "R$ 25,50");
        assert_eq!(parse_price("SEDEX", &html).unwrap(), parse_price("SEDEX", &html).unwrap());
    }
}
