//! Prediction loader — permissive parsing, strict per-record validation.
//!
//! Accepts the loose field spellings real submission feeds carry (user/uid,
//! id, time, user_confidence, "0.4%" move strings) and normalizes them into
//! the strict `Prediction` shape. Schema violations reject the record with
//! a reason and the batch continues; nothing is batch-fatal here.

use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use signalrank_core::domain::{Direction, Prediction};

/// Horizons are capped at one trading day.
const MAX_HORIZON_HOURS: u32 = 24;

/// A record excluded from scoring, with the reason recorded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectedPrediction {
    pub source: Option<String>,
    pub submission_id: Option<String>,
    pub asset: Option<String>,
    pub reason: String,
}

/// Outcome of loading a batch: normalized predictions plus per-record rejections.
#[derive(Debug, Default)]
pub struct LoadedPredictions {
    pub predictions: Vec<Prediction>,
    pub rejected: Vec<RejectedPrediction>,
}

/// Raw prediction as it appears on the wire, before normalization.
#[derive(Debug, Deserialize)]
struct RawPrediction {
    #[serde(default, alias = "user", alias = "uid")]
    user_id: Option<String>,
    #[serde(default, alias = "id")]
    submission_id: Option<String>,
    #[serde(default, alias = "time")]
    timestamp: Option<String>,
    #[serde(default)]
    asset: Option<String>,
    #[serde(default)]
    direction: Option<String>,
    #[serde(default, alias = "user_confidence")]
    confidence: Option<f64>,
    #[serde(default)]
    horizon_hours: Option<i64>,
    #[serde(default)]
    entry_price: Option<f64>,
    /// Number or string; "0.4%" and bare percent values are accepted.
    #[serde(default)]
    move_pct: Option<serde_json::Value>,
}

/// Load predictions from a JSON file: either a bare list or a
/// `{"predictions": [...]}` wrapper.
pub fn load_predictions_json(path: &Path) -> Result<LoadedPredictions> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read predictions file {}", path.display()))?;
    parse_predictions_str(&content)
}

/// Parse a predictions JSON document from a string.
pub fn parse_predictions_str(content: &str) -> Result<LoadedPredictions> {
    let root: serde_json::Value =
        serde_json::from_str(content).context("predictions file is not valid JSON")?;

    let items = match &root {
        serde_json::Value::Array(items) => items.clone(),
        serde_json::Value::Object(map) => match map.get("predictions") {
            Some(serde_json::Value::Array(items)) => items.clone(),
            _ => bail!("expected a list or an object with a 'predictions' list"),
        },
        _ => bail!("expected a list or an object with a 'predictions' list"),
    };

    let mut loaded = LoadedPredictions::default();
    for (index, item) in items.into_iter().enumerate() {
        let raw: RawPrediction = match serde_json::from_value(item) {
            Ok(raw) => raw,
            Err(e) => {
                loaded.rejected.push(RejectedPrediction {
                    source: None,
                    submission_id: None,
                    asset: None,
                    reason: format!("record {index}: {e}"),
                });
                continue;
            }
        };
        match normalize(raw, index) {
            Ok(prediction) => loaded.predictions.push(prediction),
            Err(rejected) => loaded.rejected.push(rejected),
        }
    }

    Ok(loaded)
}

fn normalize(raw: RawPrediction, index: usize) -> Result<Prediction, RejectedPrediction> {
    let reject = |raw: &RawPrediction, reason: String| RejectedPrediction {
        source: raw.user_id.clone(),
        submission_id: raw.submission_id.clone(),
        asset: raw.asset.clone(),
        reason,
    };

    let source = match raw.user_id.as_deref().map(str::trim) {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => return Err(reject(&raw, "missing source id".into())),
    };

    let asset = match raw.asset.as_deref().map(str::trim) {
        Some(a) if !a.is_empty() => a.to_string(),
        _ => return Err(reject(&raw, "missing asset symbol".into())),
    };

    let issued_at = match raw.timestamp.as_deref() {
        Some(ts) => match parse_timestamp(ts) {
            Some(dt) => dt,
            None => return Err(reject(&raw, format!("unparseable timestamp '{ts}'"))),
        },
        // Identity (and so the resampling seed) depends on issued_at;
        // substituting "now" would make re-scoring irreproducible.
        None => return Err(reject(&raw, "missing issued_at timestamp".into())),
    };

    let direction = match raw.direction.as_deref().and_then(Direction::parse) {
        Some(d) => d,
        None => {
            return Err(reject(
                &raw,
                format!(
                    "unrecognized direction '{}'",
                    raw.direction.as_deref().unwrap_or("")
                ),
            ))
        }
    };

    let confidence = raw.confidence.unwrap_or(0.5);

    let horizon_hours = match raw.horizon_hours {
        Some(h) if h <= 0 => {
            return Err(reject(&raw, format!("non-positive horizon_hours {h}")))
        }
        Some(h) => Some((h as u32).min(MAX_HORIZON_HOURS)),
        None => None,
    };

    let move_pct = match raw.move_pct.as_ref().map(normalize_move_pct) {
        Some(Ok(v)) => v,
        Some(Err(reason)) => return Err(reject(&raw, reason)),
        None => None,
    };

    let submission_id = raw
        .submission_id
        .clone()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| format!("{source}-{index}"));

    let prediction = Prediction {
        source,
        submission_id,
        asset,
        direction,
        confidence,
        issued_at,
        entry_price: raw.entry_price,
        move_pct,
        horizon_hours,
    };

    // Field-level checks (confidence range, positive entry price, ...)
    if let Err(e) = prediction.validate() {
        return Err(RejectedPrediction {
            source: Some(prediction.source),
            submission_id: Some(prediction.submission_id),
            asset: Some(prediction.asset),
            reason: e.to_string(),
        });
    }

    Ok(prediction)
}

fn parse_timestamp(ts: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(ts)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Normalize a predicted move into a fraction.
///
/// Accepts 0.004 (already a fraction), "0.4%" (percent string), and bare
/// percent-looking numbers: anything above 0.2 is read as a percentage,
/// so 0.4 → 0.004 and 2 → 0.02.
fn normalize_move_pct(value: &serde_json::Value) -> Result<Option<f64>, String> {
    let raw = match value {
        serde_json::Value::Null => return Ok(None),
        serde_json::Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| format!("unparseable move_pct {n}"))?,
        serde_json::Value::String(s) => {
            let t = s.trim();
            if t.is_empty() {
                return Ok(None);
            }
            if let Some(pct) = t.strip_suffix('%') {
                let v: f64 = pct
                    .trim()
                    .parse()
                    .map_err(|_| format!("unparseable move_pct '{s}'"))?;
                return Ok(Some(v.abs() / 100.0));
            }
            t.parse()
                .map_err(|_| format!("unparseable move_pct '{s}'"))?
        }
        other => return Err(format!("unparseable move_pct {other}")),
    };

    if !raw.is_finite() {
        return Err("move_pct is not finite".into());
    }

    let v = raw.abs();
    if v > 0.2 {
        Ok(Some(v / 100.0))
    } else {
        Ok(Some(v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_wrapper_and_aliases() {
        let loaded = parse_predictions_str(
            r#"{"predictions": [
                {"user": "U1", "id": "S1", "time": "2026-01-23T08:00:00Z",
                 "asset": "BTCUSDT", "direction": "BUY", "user_confidence": 0.72,
                 "horizon_hours": 4, "entry_price": 64000, "move_pct": "0.4%"}
            ]}"#,
        )
        .unwrap();

        assert!(loaded.rejected.is_empty());
        let p = &loaded.predictions[0];
        assert_eq!(p.source, "U1");
        assert_eq!(p.submission_id, "S1");
        assert_eq!(p.direction, Direction::Long);
        assert_eq!(p.confidence, 0.72);
        assert_eq!(p.horizon_hours, Some(4));
        assert!((p.move_pct.unwrap() - 0.004).abs() < 1e-12);
    }

    #[test]
    fn bare_list_works() {
        let loaded = parse_predictions_str(
            r#"[{"user_id": "U1", "timestamp": "2026-01-23T08:00:00Z",
                 "asset": "ETH", "direction": "SELL"}]"#,
        )
        .unwrap();
        assert_eq!(loaded.predictions.len(), 1);
        assert_eq!(loaded.predictions[0].direction, Direction::Short);
        // Missing confidence defaults to neutral
        assert_eq!(loaded.predictions[0].confidence, 0.5);
        // Missing submission_id gets a stable fallback
        assert_eq!(loaded.predictions[0].submission_id, "U1-0");
    }

    #[test]
    fn out_of_range_confidence_is_rejected_not_clamped() {
        let loaded = parse_predictions_str(
            r#"[{"user_id": "U1", "timestamp": "2026-01-23T08:00:00Z",
                 "asset": "BTC", "direction": "BUY", "confidence": 1.2}]"#,
        )
        .unwrap();
        assert!(loaded.predictions.is_empty());
        assert_eq!(loaded.rejected.len(), 1);
        assert!(loaded.rejected[0].reason.contains("1.2"));
    }

    #[test]
    fn negative_horizon_is_rejected() {
        let loaded = parse_predictions_str(
            r#"[{"user_id": "U1", "timestamp": "2026-01-23T08:00:00Z",
                 "asset": "BTC", "direction": "BUY", "horizon_hours": -4}]"#,
        )
        .unwrap();
        assert!(loaded.predictions.is_empty());
        assert!(loaded.rejected[0].reason.contains("horizon"));
    }

    #[test]
    fn oversized_horizon_is_capped() {
        let loaded = parse_predictions_str(
            r#"[{"user_id": "U1", "timestamp": "2026-01-23T08:00:00Z",
                 "asset": "BTC", "direction": "BUY", "horizon_hours": 72}]"#,
        )
        .unwrap();
        assert_eq!(loaded.predictions[0].horizon_hours, Some(24));
    }

    #[test]
    fn missing_asset_and_timestamp_are_rejected() {
        let loaded = parse_predictions_str(
            r#"[{"user_id": "U1", "timestamp": "2026-01-23T08:00:00Z", "direction": "BUY"},
                {"user_id": "U2", "asset": "BTC", "direction": "BUY"}]"#,
        )
        .unwrap();
        assert!(loaded.predictions.is_empty());
        assert_eq!(loaded.rejected.len(), 2);
        assert!(loaded.rejected[0].reason.contains("asset"));
        assert!(loaded.rejected[1].reason.contains("timestamp"));
    }

    #[test]
    fn unknown_direction_is_rejected() {
        let loaded = parse_predictions_str(
            r#"[{"user_id": "U1", "timestamp": "2026-01-23T08:00:00Z",
                 "asset": "BTC", "direction": "HOLD"}]"#,
        )
        .unwrap();
        assert!(loaded.predictions.is_empty());
        assert!(loaded.rejected[0].reason.contains("HOLD"));
    }

    #[test]
    fn move_pct_heuristics() {
        let check = |json_value: &str, expected: f64| {
            let doc = format!(
                r#"[{{"user_id": "U1", "timestamp": "2026-01-23T08:00:00Z",
                     "asset": "BTC", "direction": "BUY", "move_pct": {json_value}}}]"#
            );
            let loaded = parse_predictions_str(&doc).unwrap();
            let got = loaded.predictions[0].move_pct.unwrap();
            assert!(
                (got - expected).abs() < 1e-12,
                "move_pct {json_value}: expected {expected}, got {got}"
            );
        };

        check("0.004", 0.004); // fraction passes through
        check("0.4", 0.004); // bare percent
        check("2", 0.02); // whole percent
        check("40", 0.40); // 40% → 0.40
        check("\"0.4%\"", 0.004); // percent string
        check("\"-0.3%\"", 0.003); // sign dropped
    }

    #[test]
    fn rejections_do_not_abort_the_batch() {
        let loaded = parse_predictions_str(
            r#"[{"user_id": "U1", "timestamp": "2026-01-23T08:00:00Z",
                 "asset": "BTC", "direction": "BUY"},
                {"user_id": "U2", "timestamp": "not-a-date",
                 "asset": "ETH", "direction": "SELL"},
                {"user_id": "U3", "timestamp": "2026-01-23T09:00:00Z",
                 "asset": "SOL", "direction": "SELL"}]"#,
        )
        .unwrap();
        assert_eq!(loaded.predictions.len(), 2);
        assert_eq!(loaded.rejected.len(), 1);
    }
}
