//! Generation parameters with validated ranges.
//!
//! Setters never clamp: a value outside its bounds is rejected with
//! [`ChatError::Range`] and the stored value is left as it was.

use std::ops::RangeInclusive;

use crate::error::{ChatError, ChatResult};

pub const TEMPERATURE_RANGE: RangeInclusive<f64> = 0.0..=1.2;
pub const TOP_P_RANGE: RangeInclusive<f64> = 0.1..=1.0;
pub const MAX_TOKENS_RANGE: RangeInclusive<u32> = 1..=u32::MAX;

pub const DEFAULT_TEMPERATURE: f64 = 0.9;
pub const DEFAULT_TOP_P: f64 = 0.95;
pub const DEFAULT_MAX_TOKENS: u32 = 120;

/// An immutable copy of the parameters, handed to the chat engine per call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSnapshot {
    pub temperature: f64,
    pub top_p: f64,
    pub max_tokens: u32,
}

/// The live generation parameters of a session.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSet {
    temperature: f64,
    top_p: f64,
    max_tokens: u32,
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            top_p: DEFAULT_TOP_P,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

impl ParameterSet {
    /// Builds a parameter set from startup values, validating each one.
    pub fn from_values(temperature: f64, top_p: f64, max_tokens: u32) -> ChatResult<Self> {
        let mut params = Self::default();
        params.set_temperature(temperature)?;
        params.set_top_p(top_p)?;
        params.set_max_tokens(max_tokens)?;
        Ok(params)
    }

    pub fn set_temperature(&mut self, value: f64) -> ChatResult<f64> {
        check_float("temperature", value, &TEMPERATURE_RANGE)?;
        self.temperature = value;
        tracing::debug!(temperature = value, "parameter updated");
        Ok(value)
    }

    pub fn set_top_p(&mut self, value: f64) -> ChatResult<f64> {
        check_float("top_p", value, &TOP_P_RANGE)?;
        self.top_p = value;
        tracing::debug!(top_p = value, "parameter updated");
        Ok(value)
    }

    /// Takes a signed value so that zero and negative input is reported as
    /// out of range rather than unparseable.
    pub fn set_max_tokens(&mut self, value: impl Into<i64>) -> ChatResult<u32> {
        let value = value.into();
        let accepted = u32::try_from(value)
            .ok()
            .filter(|v| MAX_TOKENS_RANGE.contains(v))
            .ok_or_else(|| max_tokens_range_error(value.to_string()))?;
        self.max_tokens = accepted;
        tracing::debug!(max_tokens = accepted, "parameter updated");
        Ok(accepted)
    }

    pub const fn temperature(&self) -> f64 {
        self.temperature
    }

    pub const fn top_p(&self) -> f64 {
        self.top_p
    }

    pub const fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    pub const fn snapshot(&self) -> ParamSnapshot {
        ParamSnapshot {
            temperature: self.temperature,
            top_p: self.top_p,
            max_tokens: self.max_tokens,
        }
    }
}

/// The error for a `max_tokens` value outside its bounds, including integers
/// too large to parse.
pub fn max_tokens_range_error(value: String) -> ChatError {
    ChatError::Range {
        parameter: "max_tokens",
        value,
        bounds: format!(
            "[{}, {}]",
            MAX_TOKENS_RANGE.start(),
            MAX_TOKENS_RANGE.end()
        ),
    }
}

// NaN fails `contains`, so it is rejected like any other out-of-range value.
fn check_float(parameter: &'static str, value: f64, range: &RangeInclusive<f64>) -> ChatResult<()> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(ChatError::Range {
            parameter,
            value: format!("{value:?}"),
            bounds: format!("[{:.1}, {:.1}]", range.start(), range.end()),
        })
    }
}
