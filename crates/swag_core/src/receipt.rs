//! Outcome receipts
//!
//! Every analysis and monitoring decision can be committed to a receipt: a
//! JSON body plus a content hash over its canonical form. Canonicalization
//! sorts object keys recursively, so two receipts with the same content
//! always hash identically regardless of construction order.
//!
//! The hash function is pluggable through [`ReceiptDigest`]. [`FnvDigest`]
//! is cheap and suitable for in-process dedup; [`Sha256Digest`] produces
//! hashes safe to publish or compare across systems.
//!
//! # Example
//!
//! ```ignore
//! use swag_core::receipt::{OutcomePayload, Sha256Digest, make_outcome_receipt};
//!
//! let payload = OutcomePayload::new("hh-42");
//! let receipt = make_outcome_receipt(&payload, &Sha256Digest);
//! assert_eq!(receipt.hash.len(), 64);
//! ```

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use sha2::{Digest, Sha256};

use crate::model::{AssetClass, PhaseMetrics};

const DEFAULT_POLICY_HASH: &str = "policy-unversioned";
const DEFAULT_MODEL_HASH: &str = "model-unversioned";
const DEFAULT_SEED: &str = "default";

// =============================================================================
// Digests
// =============================================================================

/// Content hash over canonical receipt bytes.
pub trait ReceiptDigest {
    fn algorithm(&self) -> &'static str;
    fn digest(&self, bytes: &[u8]) -> String;
}

/// FNV-1a 64-bit. Fast, not collision-resistant.
pub struct FnvDigest;

impl ReceiptDigest for FnvDigest {
    fn algorithm(&self) -> &'static str {
        "fnv1a64"
    }

    fn digest(&self, bytes: &[u8]) -> String {
        const BASIS: u64 = 0xcbf29ce484222325;
        const PRIME: u64 = 0x100000001b3;
        let mut hash = BASIS;
        for &byte in bytes {
            hash ^= u64::from(byte);
            hash = hash.wrapping_mul(PRIME);
        }
        format!("{hash:016x}")
    }
}

/// SHA-256, for receipts that leave the process.
pub struct Sha256Digest;

impl ReceiptDigest for Sha256Digest {
    fn algorithm(&self) -> &'static str {
        "sha256"
    }

    fn digest(&self, bytes: &[u8]) -> String {
        hex::encode(Sha256::digest(bytes))
    }
}

// =============================================================================
// Canonical form
// =============================================================================

/// Serialize a JSON value with all object keys sorted, recursively.
pub fn canonical(value: &Value) -> String {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let fields: Vec<String> = keys
                .iter()
                .map(|&key| {
                    format!("{}:{}", Value::String(key.clone()), canonical(&map[key]))
                })
                .collect();
            format!("{{{}}}", fields.join(","))
        }
        Value::Array(items) => {
            let items: Vec<String> = items.iter().map(canonical).collect();
            format!("[{}]", items.join(","))
        }
        _ => value.to_string(),
    }
}

// =============================================================================
// Receipts
// =============================================================================

/// A hashed record of a decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receipt {
    pub body: Value,
    /// Digest of the canonical body.
    pub hash: String,
}

/// One asset-class trade recorded on an outcome receipt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeDelta {
    pub asset_class: AssetClass,
    pub amount: f64,
}

/// One tax-lot movement recorded on an outcome receipt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LotDelta {
    pub lot_id: String,
    pub quantity: f64,
}

/// Inputs to an outcome receipt. Unset hashes and seed fall back to
/// unversioned placeholders when the receipt is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomePayload {
    pub household_id: String,
    pub policy_hash: Option<String>,
    pub model_hash: Option<String>,
    pub seed: Option<String>,
    pub phase_metrics: Vec<PhaseMetrics>,
    pub trades: Vec<TradeDelta>,
    pub lots: Vec<LotDelta>,
}

impl OutcomePayload {
    pub fn new(household_id: impl Into<String>) -> Self {
        Self {
            household_id: household_id.into(),
            policy_hash: None,
            model_hash: None,
            seed: None,
            phase_metrics: Vec::new(),
            trades: Vec::new(),
            lots: Vec::new(),
        }
    }
}

/// Build and hash an outcome receipt.
///
/// The body carries a creation timestamp and the digest algorithm name, so
/// a verifier can pick the matching [`ReceiptDigest`] later.
pub fn make_outcome_receipt(payload: &OutcomePayload, digest: &dyn ReceiptDigest) -> Receipt {
    let body = json!({
        "kind": "outcome",
        "household_id": payload.household_id,
        "policy_hash": payload
            .policy_hash
            .clone()
            .unwrap_or_else(|| DEFAULT_POLICY_HASH.to_string()),
        "model_hash": payload
            .model_hash
            .clone()
            .unwrap_or_else(|| DEFAULT_MODEL_HASH.to_string()),
        "seed": payload.seed.clone().unwrap_or_else(|| DEFAULT_SEED.to_string()),
        "phase_metrics": payload.phase_metrics,
        "trades": payload.trades,
        "lots": payload.lots,
        "created_at": jiff::Timestamp::now().to_string(),
        "digest_algorithm": digest.algorithm(),
    });
    let hash = digest.digest(canonical(&body).as_bytes());
    Receipt { body, hash }
}

/// Inputs to a monitoring receipt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitoringPayload {
    pub household_id: String,
    pub breached: Vec<String>,
    pub observed: FxHashMap<String, f64>,
    pub policy: FxHashMap<String, f64>,
}

/// Build and hash a monitoring receipt.
pub fn make_monitoring_receipt(
    payload: &MonitoringPayload,
    digest: &dyn ReceiptDigest,
) -> Receipt {
    let body = json!({
        "kind": "monitoring",
        "household_id": payload.household_id,
        "breached": payload.breached,
        "observed": payload.observed,
        "policy": payload.policy,
        "created_at": jiff::Timestamp::now().to_string(),
        "digest_algorithm": digest.algorithm(),
    });
    let hash = digest.digest(canonical(&body).as_bytes());
    Receipt { body, hash }
}

/// Recompute the canonical digest and compare it to the stored hash.
pub fn verify_receipt(receipt: &Receipt, digest: &dyn ReceiptDigest) -> bool {
    digest.digest(canonical(&receipt.body).as_bytes()) == receipt.hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_ignores_insertion_order() {
        let a = json!({"b": 2, "a": 1, "nested": {"z": true, "y": [1, 2]}});
        let b = json!({"nested": {"y": [1, 2], "z": true}, "a": 1, "b": 2});
        assert_eq!(canonical(&a), canonical(&b));
        assert_eq!(
            canonical(&a),
            r#"{"a":1,"b":2,"nested":{"y":[1,2],"z":true}}"#
        );
    }

    #[test]
    fn canonical_preserves_array_order() {
        let a = json!([3, 1, 2]);
        let b = json!([1, 2, 3]);
        assert_ne!(canonical(&a), canonical(&b));
    }

    #[test]
    fn sha256_matches_known_vector() {
        assert_eq!(
            Sha256Digest.digest(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn outcome_receipt_fills_defaults() {
        let receipt = make_outcome_receipt(&OutcomePayload::new("hh-1"), &FnvDigest);
        assert_eq!(receipt.body["kind"], "outcome");
        assert_eq!(receipt.body["policy_hash"], "policy-unversioned");
        assert_eq!(receipt.body["model_hash"], "model-unversioned");
        assert_eq!(receipt.body["seed"], "default");
        assert_eq!(receipt.body["digest_algorithm"], "fnv1a64");
        assert!(receipt.body["created_at"].is_string());
    }

    #[test]
    fn explicit_hashes_survive() {
        let mut payload = OutcomePayload::new("hh-1");
        payload.policy_hash = Some("policy-v3".to_string());
        payload.seed = Some("hh-1-2026q1".to_string());

        let receipt = make_outcome_receipt(&payload, &FnvDigest);
        assert_eq!(receipt.body["policy_hash"], "policy-v3");
        assert_eq!(receipt.body["seed"], "hh-1-2026q1");
    }

    #[test]
    fn verify_detects_tampering() {
        let mut receipt = make_outcome_receipt(&OutcomePayload::new("hh-1"), &Sha256Digest);
        assert!(verify_receipt(&receipt, &Sha256Digest));

        receipt.body["household_id"] = json!("hh-2");
        assert!(!verify_receipt(&receipt, &Sha256Digest));
    }

    #[test]
    fn digests_are_swappable() {
        let payload = OutcomePayload::new("hh-1");
        let fnv = make_outcome_receipt(&payload, &FnvDigest);
        let sha = make_outcome_receipt(&payload, &Sha256Digest);

        assert_eq!(fnv.hash.len(), 16);
        assert_eq!(sha.hash.len(), 64);
        assert_eq!(fnv.body["digest_algorithm"], "fnv1a64");
        assert_eq!(sha.body["digest_algorithm"], "sha256");
    }

    #[test]
    fn monitoring_receipt_round_trips() {
        let payload = MonitoringPayload {
            household_id: "hh-1".to_string(),
            breached: vec!["drawdown".to_string()],
            observed: [("drawdown".to_string(), 0.24)].into_iter().collect(),
            policy: [("drawdown".to_string(), 0.20)].into_iter().collect(),
        };
        let receipt = make_monitoring_receipt(&payload, &Sha256Digest);
        assert_eq!(receipt.body["kind"], "monitoring");
        assert!(verify_receipt(&receipt, &Sha256Digest));
    }
}
