//! Fixed-point price and fee math
//!
//! Conversions between sqrt-encoded pool prices, human decimal amounts, minimal token
//! units and basis-point fee ratios. Every step runs on `BigUint` or `Decimal`;
//! nothing here goes through `f64`.

pub mod errors;

pub use errors::{MathError, MathResult};

use num_bigint::BigUint;
use num_traits::{One, ToPrimitive, Zero};
use rust_decimal::Decimal;

/// Fractional digits kept when descaling a sqrt-encoded price
pub const SQRT_PRICE_FRACTION_DIGITS: u32 = 40;

/// Basis points in one whole
pub const BASIS_POINTS_PER_UNIT: u32 = 10_000;

/// Fractional bits of a Q64.96 sqrt price; the squared value carries twice as many
const Q96_FRACTION_BITS: usize = 96;

/// `Decimal` keeps at most 28 fractional digits
const DECIMAL_MAX_SCALE: u32 = 28;

/// `Decimal` mantissas are 96 bits wide
const DECIMAL_MAX_MANTISSA: u128 = (1u128 << 96) - 1;

/// Returns `10^exp` as a big integer
pub fn pow10(exp: u32) -> BigUint {
	BigUint::from(10u32).pow(exp)
}

/// Parses a non-negative base-10 integer string
pub fn parse_unsigned(value: &str) -> MathResult<BigUint> {
	let trimmed = value.trim();
	if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
		return Err(MathError::invalid_input(format!(
			"'{}' is not a non-negative integer",
			value
		)));
	}

	trimmed
		.parse::<BigUint>()
		.map_err(|e| MathError::invalid_input(format!("'{}': {}", value, e)))
}

/// Human price of token0 denominated in token1 from a Q64.96 sqrt price
///
/// The quote direction is token1 per one token0. A USDC (6) / WETH (18) pool at a raw
/// price of 1 reads `0.000000000001` here; use [`inverse_price_from_sqrt_encoding`] for
/// token0 per one token1 (`1000000000000`).
///
/// Computes `(sqrt_price² / 2¹⁹²) × 10^(decimals0 − decimals1)` with
/// [`SQRT_PRICE_FRACTION_DIGITS`] fractional digits, truncated toward zero, and trailing
/// zeros removed.
pub fn price_from_sqrt_encoding(
	sqrt_price_raw: &str,
	decimals0: u8,
	decimals1: u8,
) -> MathResult<String> {
	let sqrt_price = parse_unsigned(sqrt_price_raw)?;
	let squared = &sqrt_price * &sqrt_price;
	let q192 = BigUint::one() << (2 * Q96_FRACTION_BITS);

	let (numerator, denominator) = apply_decimal_shift(squared, q192, decimals0, decimals1);
	Ok(format_ratio(
		&numerator,
		&denominator,
		SQRT_PRICE_FRACTION_DIGITS,
	))
}

/// Human price of token1 denominated in token0 from a Q64.96 sqrt price
///
/// The quote direction is token0 per one token1.
///
/// The reciprocal of [`price_from_sqrt_encoding`]: `2¹⁹² / sqrt_price² × 10^(decimals1 −
/// decimals0)`. A zero sqrt price has no reciprocal and is rejected.
pub fn inverse_price_from_sqrt_encoding(
	sqrt_price_raw: &str,
	decimals0: u8,
	decimals1: u8,
) -> MathResult<String> {
	let sqrt_price = parse_unsigned(sqrt_price_raw)?;
	if sqrt_price.is_zero() {
		return Err(MathError::invalid_input(
			"sqrt price of zero has no inverse",
		));
	}
	let squared = &sqrt_price * &sqrt_price;
	let q192 = BigUint::one() << (2 * Q96_FRACTION_BITS);

	let (numerator, denominator) = apply_decimal_shift(q192, squared, decimals1, decimals0);
	Ok(format_ratio(
		&numerator,
		&denominator,
		SQRT_PRICE_FRACTION_DIGITS,
	))
}

/// Multiplies the ratio `numerator / denominator` by `10^(exp_plus − exp_minus)`
/// keeping both sides integral
fn apply_decimal_shift(
	numerator: BigUint,
	denominator: BigUint,
	exp_plus: u8,
	exp_minus: u8,
) -> (BigUint, BigUint) {
	if exp_plus >= exp_minus {
		(numerator * pow10(u32::from(exp_plus - exp_minus)), denominator)
	} else {
		(numerator, denominator * pow10(u32::from(exp_minus - exp_plus)))
	}
}

/// Formats `numerator / denominator` in base 10 with at most `fraction_digits`
/// fractional digits, truncating the rest
pub fn format_ratio(numerator: &BigUint, denominator: &BigUint, fraction_digits: u32) -> String {
	let scaled = (numerator * pow10(fraction_digits)) / denominator;
	format_scaled(&scaled, fraction_digits as usize)
}

fn format_scaled(scaled: &BigUint, fraction_digits: usize) -> String {
	let digits = scaled.to_string();
	let (int_part, frac_part) = if digits.len() > fraction_digits {
		let split = digits.len() - fraction_digits;
		(digits[..split].to_string(), digits[split..].to_string())
	} else {
		(
			"0".to_string(),
			format!("{:0>width$}", digits, width = fraction_digits),
		)
	};

	let frac_part = frac_part.trim_end_matches('0');
	if frac_part.is_empty() {
		int_part
	} else {
		format!("{}.{}", int_part, frac_part)
	}
}

/// Converts a human amount into minimal token units, truncating toward zero
pub fn to_minimal_units(human_amount: Decimal, decimals: u8) -> MathResult<BigUint> {
	if human_amount.is_sign_negative() && !human_amount.is_zero() {
		return Err(MathError::invalid_input(format!(
			"amount {} is negative",
			human_amount
		)));
	}

	let mantissa = BigUint::from(human_amount.mantissa().unsigned_abs());
	let scaled = mantissa * pow10(u32::from(decimals));
	Ok(scaled / pow10(human_amount.scale()))
}

/// Converts minimal token units into a human amount
///
/// Exact whenever the value fits a `Decimal`. Otherwise the lowest fractional digits
/// are dropped (never rounded up), so converting back never exceeds `raw`.
pub fn from_minimal_units(raw: &BigUint, decimals: u8) -> MathResult<Decimal> {
	let max_mantissa = BigUint::from(DECIMAL_MAX_MANTISSA);
	let mut mantissa = raw.clone();
	let mut scale = u32::from(decimals);

	while scale > DECIMAL_MAX_SCALE || mantissa > max_mantissa {
		if scale == 0 {
			return Err(MathError::invalid_input(format!(
				"{} minimal units with {} decimals exceeds the decimal range",
				raw, decimals
			)));
		}
		mantissa /= 10u32;
		scale -= 1;
	}

	let mantissa = mantissa
		.to_i128()
		.ok_or_else(|| MathError::invalid_input(format!("{} does not fit i128", raw)))?;
	Decimal::try_from_i128_with_scale(mantissa, scale)
		.map_err(|e| MathError::invalid_input(format!("{}: {}", raw, e)))
}

/// Fee as a basis-point ratio of the total, floored
///
/// A zero total yields `0` rather than an error.
pub fn basis_points(fee_raw: &BigUint, total_raw: &BigUint) -> u64 {
	if total_raw.is_zero() {
		return 0;
	}

	let ratio = (fee_raw * BigUint::from(BASIS_POINTS_PER_UNIT)) / total_raw;
	ratio.to_u64().unwrap_or(u64::MAX)
}

/// USD value of a minimal-unit fee
pub fn fee_usd(fee_raw: &BigUint, decimals: u8, price_usd: Decimal) -> MathResult<Decimal> {
	let fee = from_minimal_units(fee_raw, decimals)?;
	fee.checked_mul(price_usd).ok_or_else(|| {
		MathError::invalid_input(format!("fee {} x price {} overflows", fee, price_usd))
	})
}

/// Token amount worth `usd_amount` at `price_usd` per token
pub fn human_amount_from_usd(usd_amount: Decimal, price_usd: Decimal) -> MathResult<Decimal> {
	if price_usd <= Decimal::ZERO {
		return Err(MathError::invalid_input(format!(
			"price {} must be positive",
			price_usd
		)));
	}
	if usd_amount.is_sign_negative() && !usd_amount.is_zero() {
		return Err(MathError::invalid_input(format!(
			"USD amount {} is negative",
			usd_amount
		)));
	}

	usd_amount.checked_div(price_usd).ok_or_else(|| {
		MathError::invalid_input(format!("{} / {} overflows", usd_amount, price_usd))
	})
}
