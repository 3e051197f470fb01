//! Transfer intents and the canonical transaction they sign as.
//!
//! The canonical transaction is a JSON object whose field order is part of
//! the protocol:
//!
//! ```json
//! {"transactionAction":"Transfer 5 DCL value to <to>","from":"<hex>","to":"<to>","value":5,"transactionFee":0,"gasPrice":0}
//! ```
//!
//! The ledger node rebuilds this exact string to check a signature, so
//! numbers are written with ECMAScript `Number::toString` rules: `5`, not
//! `5.0`; `0.000001`, not `1e-6`; `10000000000000000`, not `1e16`. Exponent
//! form only appears below `1e-6` and from `1e21` up.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::value::RawValue;

use super::signing::SignError;
use crate::config::{GAS_PRICE, TRANSACTION_FEE};

/// What the user asked to send. Built fresh for every send attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionIntent {
    /// Sender address (public key hex).
    pub from: String,
    /// Recipient address.
    pub to: String,
    /// Amount in whole display units; may be fractional.
    pub value: f64,
    pub token_name: String,
}

impl TransactionIntent {
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        value: f64,
        token_name: impl Into<String>,
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            value,
            token_name: token_name.into(),
        }
    }
}

/// The object the signature covers. Field order is significant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalTransaction {
    pub transaction_action: String,
    pub from: String,
    pub to: String,
    pub value: JsNumber,
    pub transaction_fee: u64,
    pub gas_price: u64,
}

impl CanonicalTransaction {
    pub fn from_intent(intent: &TransactionIntent) -> Result<Self, SignError> {
        let value = js_number(intent.value).ok_or(SignError::InvalidValue(intent.value))?;
        Ok(Self {
            transaction_action: transaction_action(&value, &intent.token_name, &intent.to),
            from: intent.from.clone(),
            to: intent.to.clone(),
            value,
            transaction_fee: TRANSACTION_FEE,
            gas_price: GAS_PRICE,
        })
    }

    /// Compact JSON in declaration order. This string is what gets hashed
    /// or signed, depending on the message encoding.
    pub fn to_json(&self) -> Result<String, SignError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// `"Transfer {value} {token} value to {to}"`.
pub fn transaction_action(value: &JsNumber, token_name: &str, to: &str) -> String {
    format!("Transfer {value} {token_name} value to {to}")
}

/// A finite amount in its ECMAScript textual form. Serializes as a bare
/// JSON number with exactly that text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JsNumber(String);

impl JsNumber {
    /// `None` for NaN and infinities, which have no JSON form.
    pub fn from_f64(value: f64) -> Option<Self> {
        value.is_finite().then(|| Self(format_js(value)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JsNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for JsNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let raw = RawValue::from_string(self.0.clone()).map_err(serde::ser::Error::custom)?;
        raw.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for JsNumber {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        JsNumber::from_f64(value)
            .ok_or_else(|| serde::de::Error::custom(format!("non-finite number {value}")))
    }
}

/// Convert an amount to its ECMAScript textual form.
pub fn js_number(value: f64) -> Option<JsNumber> {
    JsNumber::from_f64(value)
}

/// ECMAScript `Number::toString(10)` for a finite `value`.
///
/// Starts from the shortest round-trip digits `d1..dk` and decimal point
/// position `n` (value = 0.d1..dk × 10^n), then picks plain or exponent
/// layout by the same thresholds.
fn format_js(value: f64) -> String {
    if value == 0.0 {
        // Covers -0.
        return "0".to_string();
    }
    let sign = if value < 0.0 { "-" } else { "" };

    // `{:e}` yields the shortest round-trip digits, e.g. "1.2345e20".
    let sci = format!("{:e}", value.abs());
    let (mantissa, exponent) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let k = digits.len() as i32;
    let n = exponent.parse::<i32>().unwrap_or(0) + 1;

    let body = if k <= n && n <= 21 {
        format!("{digits}{}", "0".repeat((n - k) as usize))
    } else if 0 < n && n <= 21 {
        let (int, frac) = digits.split_at(n as usize);
        format!("{int}.{frac}")
    } else if -6 < n && n <= 0 {
        format!("0.{}{digits}", "0".repeat(n.unsigned_abs() as usize))
    } else {
        let e = n - 1;
        let exp_sign = if e >= 0 { '+' } else { '-' };
        let (first, rest) = digits.split_at(1);
        if rest.is_empty() {
            format!("{first}e{exp_sign}{}", e.unsigned_abs())
        } else {
            format!("{first}.{rest}e{exp_sign}{}", e.unsigned_abs())
        }
    };
    format!("{sign}{body}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(v: f64) -> String {
        js_number(v).unwrap().to_string()
    }

    #[test]
    fn integers_have_no_decimal_point() {
        assert_eq!(render(5.0), "5");
        assert_eq!(render(0.0), "0");
        assert_eq!(render(-0.0), "0");
        assert_eq!(render(-3.0), "-3");
        assert_eq!(render(1_000_000.0), "1000000");
    }

    #[test]
    fn fractions_use_shortest_form() {
        assert_eq!(render(2.5), "2.5");
        assert_eq!(render(0.1), "0.1");
        assert_eq!(render(0.30000000000000004), "0.30000000000000004");
    }

    #[test]
    fn plain_decimal_between_thresholds() {
        assert_eq!(render(0.000001), "0.000001");
        assert_eq!(render(0.0000015), "0.0000015");
        assert_eq!(render(1e16), "10000000000000000");
        assert_eq!(render(123456789012345680000.0), "123456789012345680000");
        assert_eq!(render(9_007_199_254_740_993.0), "9007199254740992");
        assert_eq!(render(1152921504606846976.0), "1152921504606847000");
    }

    #[test]
    fn exponent_form_outside_thresholds() {
        assert_eq!(render(1e21), "1e+21");
        assert_eq!(render(1.5e21), "1.5e+21");
        assert_eq!(render(1e-7), "1e-7");
        assert_eq!(render(-2.5e-8), "-2.5e-8");
    }

    #[test]
    fn large_amounts_serialize_as_plain_json_numbers() {
        let intent = TransactionIntent::new("a", "b", 1e16, "DCL");
        let canonical = CanonicalTransaction::from_intent(&intent).unwrap();
        assert_eq!(
            canonical.transaction_action,
            "Transfer 10000000000000000 DCL value to b"
        );
        let json = canonical.to_json().unwrap();
        assert!(json.contains(r#""value":10000000000000000,"#));

        let back: CanonicalTransaction = serde_json::from_str(&json).unwrap();
        assert_eq!(back, canonical);
    }

    #[test]
    fn non_finite_values_have_no_json_form() {
        assert!(js_number(f64::NAN).is_none());
        assert!(js_number(f64::INFINITY).is_none());
    }

    #[test]
    fn action_sentence() {
        let value = js_number(5.0).unwrap();
        assert_eq!(
            transaction_action(&value, "DCL", "bob"),
            "Transfer 5 DCL value to bob"
        );
    }

    #[test]
    fn canonical_json_field_order() {
        let intent = TransactionIntent::new("alice", "bob", 5.0, "DCL");
        let json = CanonicalTransaction::from_intent(&intent)
            .unwrap()
            .to_json()
            .unwrap();
        assert_eq!(
            json,
            r#"{"transactionAction":"Transfer 5 DCL value to bob","from":"alice","to":"bob","value":5,"transactionFee":0,"gasPrice":0}"#
        );
    }

    #[test]
    fn fractional_value_in_json() {
        let intent = TransactionIntent::new("a", "b", 1.25, "DCL");
        let canonical = CanonicalTransaction::from_intent(&intent).unwrap();
        assert_eq!(canonical.transaction_action, "Transfer 1.25 DCL value to b");
        assert!(canonical.to_json().unwrap().contains(r#""value":1.25,"#));
    }

    #[test]
    fn nan_value_is_rejected() {
        let intent = TransactionIntent::new("a", "b", f64::NAN, "DCL");
        assert!(matches!(
            CanonicalTransaction::from_intent(&intent),
            Err(SignError::InvalidValue(_))
        ));
    }
}
