//! Serde helpers for big integer fields
//!
//! Minimal-unit amounts and pool liquidity are carried as decimal strings on the wire
//! so they survive JSON consumers that would otherwise coerce them to doubles.

/// (De)serializes a `BigUint` as a base-10 string
pub mod biguint_string {
	use num_bigint::BigUint;
	use serde::{de, Deserialize, Deserializer, Serializer};

	pub fn serialize<S>(value: &BigUint, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_str(&value.to_string())
	}

	pub fn deserialize<'de, D>(deserializer: D) -> Result<BigUint, D::Error>
	where
		D: Deserializer<'de>,
	{
		let value = String::deserialize(deserializer)?;
		crate::math::parse_unsigned(&value).map_err(de::Error::custom)
	}
}

#[cfg(test)]
mod tests {
	use num_bigint::BigUint;
	use serde::{Deserialize, Serialize};

	#[derive(Debug, Serialize, Deserialize, PartialEq)]
	struct Amount {
		#[serde(with = "super::biguint_string")]
		raw: BigUint,
	}

	#[test]
	fn test_biguint_string_serialization() {
		let amount = Amount {
			raw: "340282366920938463463374607431768211456".parse().unwrap(),
		};
		let json = serde_json::to_string(&amount).unwrap();
		assert_eq!(json, r#"{"raw":"340282366920938463463374607431768211456"}"#);

		let parsed: Amount = serde_json::from_str(&json).unwrap();
		assert_eq!(parsed, amount);
	}

	#[test]
	fn test_biguint_string_rejects_non_digits() {
		assert!(serde_json::from_str::<Amount>(r#"{"raw":"12e5"}"#).is_err());
		assert!(serde_json::from_str::<Amount>(r#"{"raw":""}"#).is_err());
	}
}
