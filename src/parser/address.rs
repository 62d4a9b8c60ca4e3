//! 住所検索結果ページのパース

use tracing::debug;

use crate::config::Selectors;
use crate::document::{child_elements, text_of, Document};
use crate::error::{messages, ParseError};
use crate::models::Address;
use crate::text::{collapse_line_breaks, strip_hyphens};

/// 1行あたりの列数（logradouro, bairro, localidade/UF, CEP）
const ADDRESS_COLUMNS: usize = 4;

pub(crate) fn parse(
    selectors: &Selectors,
    not_found_sentinel: &str,
    html: &str,
) -> Result<Vec<Address>, ParseError> {
    let document = Document::load(html);
    let content = document
        .select_first(&selectors.content)
        .ok_or_else(|| ParseError::not_found(messages::ADDRESS_NOT_FOUND))?;

    let response_text = content
        .select(&selectors.content_paragraph)
        .next()
        .map(|p| collapse_line_breaks(&text_of(p)))
        .unwrap_or_default();

    if response_text == not_found_sentinel {
        return Err(ParseError::not_found(messages::ADDRESS_NOT_FOUND));
    }

    // 先頭はヘッダー行
    let rows = selectors.address_rows.select(content);
    if rows.len() <= 1 {
        return Err(ParseError::not_found(messages::ADDRESS_NOT_FOUND));
    }

    let addresses = rows
        .into_iter()
        .skip(1)
        .map(|row| {
            let cells: Vec<String> = child_elements(row).map(text_of).collect();
            parse_row(&cells)
        })
        .collect::<Result<Vec<_>, _>>()?;

    debug!("住所 {} 件を抽出", addresses.len());
    Ok(addresses)
}

fn parse_row(cells: &[String]) -> Result<Address, ParseError> {
    if cells.len() < ADDRESS_COLUMNS {
        return Err(ParseError::mismatch(messages::ADDRESS_COLUMNS_MISMATCH));
    }

    let street = collapse_line_breaks(&cells[0]);
    let district = collapse_line_breaks(&cells[1]);
    let city_state = collapse_line_breaks(&cells[2]);
    let (city, state) = split_city_state(&city_state)
        .ok_or_else(|| ParseError::mismatch(messages::CITY_STATE_NOT_EXTRACTED))?;
    let zip_code = strip_hyphens(&collapse_line_breaks(&cells[3]));

    Ok(Address {
        street,
        district,
        city,
        state,
        zip_code,
    })
}

/// `"São Paulo/SP"` → `("São Paulo", "SP")`。ちょうど2つに分かれない場合は `None`
pub(crate) fn split_city_state(text: &str) -> Option<(String, String)> {
    let parts: Vec<&str> = text.split('/').collect();
    match parts.as_slice() {
        [city, state] => Some((city.trim().to_string(), state.trim().to_string())),
        _ => None,
    }
}
