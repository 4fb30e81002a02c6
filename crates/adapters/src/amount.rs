//! Minimal-unit amounts as they appear in provider payloads

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use xfee_types::math::parse_unsigned;
use xfee_types::{AdapterError, AdapterResult};

/// Integer amount sent either as a decimal string or a JSON integer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawAmount {
	Text(String),
	Integer(u64),
}

impl RawAmount {
	pub fn to_biguint(&self, field: &str) -> AdapterResult<BigUint> {
		match self {
			RawAmount::Integer(value) => Ok(BigUint::from(*value)),
			RawAmount::Text(text) => parse_unsigned(text).map_err(|e| AdapterError::InvalidResponse {
				reason: format!("Field {} is not a minimal-unit amount: {}", field, e),
			}),
		}
	}
}
