//! 住所検索API（JSON）のレスポンス変換

use serde::Deserialize;
use tracing::debug;

use crate::error::{messages, ParseError};
use crate::models::Address;
use crate::text::strip_hyphens;

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    erro: bool,
    #[serde(default)]
    dados: Option<Vec<LookupRecord>>,
}

#[derive(Debug, Deserialize)]
struct LookupRecord {
    #[serde(rename = "logradouroDNEC", default)]
    street: String,
    #[serde(rename = "bairro", default)]
    district: String,
    #[serde(rename = "localidade", default)]
    city: String,
    #[serde(rename = "uf", default)]
    state: String,
    #[serde(rename = "cep", default)]
    zip_code: String,
}

impl From<LookupRecord> for Address {
    fn from(record: LookupRecord) -> Self {
        Address {
            street: record.street.trim().to_string(),
            district: record.district.trim().to_string(),
            city: record.city.trim().to_string(),
            state: record.state.trim().to_string(),
            zip_code: strip_hyphens(&record.zip_code),
        }
    }
}

/// `erro = true`・`dados = null`・`null` 文書はいずれも「結果なし」（空の一覧）
pub(crate) fn parse(json: &str) -> Result<Vec<Address>, ParseError> {
    let response: Option<LookupResponse> = serde_json::from_str(json)
        .map_err(|e| ParseError::chained(messages::ADDRESS_LOOKUP_NOT_CONVERTED, e))?;

    let addresses: Vec<Address> = match response {
        Some(LookupResponse {
            erro: false,
            dados: Some(records),
        }) => records.into_iter().map(Address::from).collect(),
        _ => Vec::new(),
    };

    debug!("住所検索API: {} 件", addresses.len());
    Ok(addresses)
}
