//! Built-in argument transformers
//!
//! Each function has the shape expected by [`ArgTransformer::new`](crate::ArgTransformer::new)
//! and fails with a [`TransformError`].

use crate::context::Context;
use crate::error::{BoxError, TransformError};
use crate::types::ArgValue;

/// Pass the raw text through unchanged
pub fn string(_ctx: &Context<'_>, raw: &str) -> Result<ArgValue, BoxError> {
    Ok(ArgValue::String(raw.to_string()))
}

/// Strip one pair of surrounding double quotes, if present
pub fn unquoted(_ctx: &Context<'_>, raw: &str) -> Result<ArgValue, BoxError> {
    let inner = raw
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(raw);
    Ok(ArgValue::String(inner.to_string()))
}

/// Parse a signed 64-bit integer
pub fn integer(_ctx: &Context<'_>, raw: &str) -> Result<ArgValue, BoxError> {
    raw.parse::<i64>()
        .map(ArgValue::Integer)
        .map_err(|_| TransformError::InvalidInteger(raw.to_string()).into())
}

/// Parse an unsigned 64-bit integer
pub fn unsigned(_ctx: &Context<'_>, raw: &str) -> Result<ArgValue, BoxError> {
    raw.parse::<u64>()
        .map(ArgValue::UInt)
        .map_err(|_| TransformError::InvalidUnsigned(raw.to_string()).into())
}

/// Parse a floating point number; NaN is rejected
pub fn float(_ctx: &Context<'_>, raw: &str) -> Result<ArgValue, BoxError> {
    match raw.parse::<f64>() {
        Ok(n) if !n.is_nan() => Ok(ArgValue::Float(n)),
        _ => Err(TransformError::InvalidFloat(raw.to_string()).into()),
    }
}

/// Parse a boolean from the usual spellings
pub fn boolean(_ctx: &Context<'_>, raw: &str) -> Result<ArgValue, BoxError> {
    match raw.to_lowercase().as_str() {
        "true" | "yes" | "y" | "1" | "on" => Ok(ArgValue::Boolean(true)),
        "false" | "no" | "n" | "0" | "off" => Ok(ArgValue::Boolean(false)),
        _ => Err(TransformError::InvalidBoolean(raw.to_string()).into()),
    }
}

/// Parse an absolute URL
pub fn url(_ctx: &Context<'_>, raw: &str) -> Result<ArgValue, BoxError> {
    url::Url::parse(raw).map(ArgValue::Url).map_err(|e| {
        TransformError::InvalidUrl {
            input: raw.to_string(),
            reason: e.to_string(),
        }
        .into()
    })
}

/// Accept only one of a fixed set of strings
pub fn choice<I, S>(
    options: I,
) -> impl Fn(&Context<'_>, &str) -> Result<ArgValue, BoxError> + Send + Sync + 'static
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let options: Vec<String> = options.into_iter().map(Into::into).collect();
    move |_ctx: &Context<'_>, raw: &str| -> Result<ArgValue, BoxError> {
        if options.iter().any(|o| o == raw) {
            Ok(ArgValue::String(raw.to_string()))
        } else {
            Err(TransformError::NotAChoice {
                input: raw.to_string(),
                options: options.clone(),
            }
            .into())
        }
    }
}
