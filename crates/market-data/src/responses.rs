//! Deserialization structs for the provider's chart payload, plus the pure
//! conversion from a raw payload into a validated `PriceSeries`.

use crate::error::MarketDataError;
use chrono::DateTime;
use core_types::PriceSeries;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ChartResponse {
    pub chart: Chart,
}

#[derive(Debug, Deserialize)]
pub struct Chart {
    pub result: Option<Vec<ChartResult>>,
    pub error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
pub struct ChartError {
    pub code: String,
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct ChartResult {
    #[serde(default)]
    pub timestamp: Vec<i64>,
    pub indicators: Indicators,
}

#[derive(Debug, Deserialize)]
pub struct Indicators {
    pub quote: Vec<Quote>,
}

#[derive(Debug, Deserialize)]
pub struct Quote {
    /// Closes are nullable: the provider emits `null` for holidays and
    /// partially-settled sessions. Those rows are dropped, not zero-filled.
    #[serde(default)]
    pub close: Vec<Option<f64>>,
}

/// Converts a raw chart payload into a `PriceSeries` for `display_symbol`
/// (the caller strips any exchange suffix before passing it in).
pub fn into_price_series(
    response: ChartResponse,
    display_symbol: &str,
) -> Result<PriceSeries, MarketDataError> {
    if let Some(error) = response.chart.error {
        return Err(MarketDataError::Deserialization(format!(
            "provider error {}: {}",
            error.code, error.description
        )));
    }

    let result = response
        .chart
        .result
        .and_then(|mut results| if results.is_empty() { None } else { Some(results.remove(0)) })
        .ok_or_else(|| MarketDataError::NoData(display_symbol.to_string()))?;

    let quote = result
        .indicators
        .quote
        .first()
        .ok_or_else(|| MarketDataError::NoData(display_symbol.to_string()))?;

    if result.timestamp.len() != quote.close.len() {
        return Err(MarketDataError::Deserialization(format!(
            "timestamp/close length mismatch for '{}': {} vs {}",
            display_symbol,
            result.timestamp.len(),
            quote.close.len()
        )));
    }

    let mut dates = Vec::with_capacity(result.timestamp.len());
    let mut closes = Vec::with_capacity(result.timestamp.len());
    for (timestamp, close) in result.timestamp.iter().zip(&quote.close) {
        // Null closes (holidays, unsettled sessions) are skipped entirely so
        // the series only ever holds real observations.
        let Some(close) = close else { continue };
        let date = DateTime::from_timestamp(*timestamp, 0)
            .ok_or_else(|| {
                MarketDataError::Deserialization(format!(
                    "invalid timestamp {timestamp} for '{display_symbol}'"
                ))
            })?
            .date_naive();
        let close = Decimal::from_f64(*close).ok_or_else(|| {
            MarketDataError::Deserialization(format!(
                "close {close} for '{display_symbol}' is not representable"
            ))
        })?;
        dates.push(date);
        closes.push(close);
    }

    if dates.is_empty() {
        return Err(MarketDataError::NoData(display_symbol.to_string()));
    }

    Ok(PriceSeries::new(display_symbol, dates, closes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn parse(json: &str) -> ChartResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn parses_a_well_formed_payload() {
        let response = parse(
            r#"{"chart":{"result":[{
                "timestamp":[1704067200,1704153600,1704240000],
                "indicators":{"quote":[{"close":[101.5,102.25,100.0]}]}
            }],"error":null}}"#,
        );
        let series = into_price_series(response, "INFY").unwrap();
        assert_eq!(series.symbol(), "INFY");
        assert_eq!(series.len(), 3);
        assert_eq!(series.closes()[1], dec!(102.25));
    }

    #[test]
    fn null_closes_are_dropped_with_their_dates() {
        let response = parse(
            r#"{"chart":{"result":[{
                "timestamp":[1704067200,1704153600,1704240000],
                "indicators":{"quote":[{"close":[101.5,null,100.0]}]}
            }],"error":null}}"#,
        );
        let series = into_price_series(response, "INFY").unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.closes(), &[dec!(101.5), dec!(100.0)]);
    }

    #[test]
    fn provider_error_surfaces_as_deserialization_failure() {
        let response = parse(
            r#"{"chart":{"result":null,"error":{
                "code":"Not Found","description":"No data found, symbol may be delisted"
            }}}"#,
        );
        let result = into_price_series(response, "BOGUS");
        assert!(matches!(result, Err(MarketDataError::Deserialization(_))));
    }

    #[test]
    fn empty_result_is_no_data() {
        let response = parse(r#"{"chart":{"result":[],"error":null}}"#);
        assert!(matches!(
            into_price_series(response, "INFY"),
            Err(MarketDataError::NoData(_))
        ));
    }

    #[test]
    fn all_null_closes_is_no_data() {
        let response = parse(
            r#"{"chart":{"result":[{
                "timestamp":[1704067200],
                "indicators":{"quote":[{"close":[null]}]}
            }],"error":null}}"#,
        );
        assert!(matches!(
            into_price_series(response, "INFY"),
            Err(MarketDataError::NoData(_))
        ));
    }
}
