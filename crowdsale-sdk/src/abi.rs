//! JSON arguments in, ABI bytes out.
//!
//! Arguments arrive as JSON values (straight from the input files) and are
//! coerced to whatever type the artifact's JSON ABI declares, so a supply can
//! be written as `1000000`, `"1000000"` or `"0xf4240"`. Encoding and decoding
//! are alloy's dynamic ABI codec.

use alloy::dyn_abi::{DynSolType, JsonAbiExt, Specifier};
use alloy::json_abi::{Function, JsonAbi, Param};
use alloy::primitives::U256;
use serde_json::Value;

pub use alloy::dyn_abi::DynSolValue;

/// Largest integer a JSON number can carry without losing precision.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

#[derive(Debug, thiserror::Error)]
pub enum AbiError {
    #[error("cannot encode {value} as {expected}")]
    InvalidArgument { expected: String, value: String },
    #[error("{value} does not fit in {expected}")]
    OutOfRange { expected: String, value: String },
    #[error("contract has no function `{0}`")]
    UnknownFunction(String),
    #[error("`{name}` takes {expected} arguments, got {got}")]
    ArityMismatch {
        name: String,
        expected: usize,
        got: usize,
    },
    #[error(transparent)]
    Codec(#[from] alloy::dyn_abi::Error),
}

/// Coerce a JSON value to the declared parameter type.
pub fn coerce(kind: &DynSolType, value: &Value) -> Result<DynSolValue, AbiError> {
    let invalid = || AbiError::InvalidArgument {
        expected: kind.sol_type_name().into_owned(),
        value: value.to_string(),
    };
    match (kind, value) {
        (DynSolType::Uint(bits), v) => {
            let n = json_to_uint(v).ok_or_else(invalid)?;
            if n.bit_len() > *bits {
                return Err(AbiError::OutOfRange {
                    expected: kind.sol_type_name().into_owned(),
                    value: n.to_string(),
                });
            }
            Ok(DynSolValue::Uint(n, *bits))
        }
        (DynSolType::Bool, Value::Bool(b)) => Ok(DynSolValue::Bool(*b)),
        (DynSolType::String, Value::String(s)) => Ok(DynSolValue::String(s.clone())),
        (DynSolType::Array(inner), Value::Array(items)) => items
            .iter()
            .map(|item| coerce(inner, item))
            .collect::<Result<Vec<_>, _>>()
            .map(DynSolValue::Array),
        (DynSolType::FixedArray(inner, len), Value::Array(items)) if items.len() == *len => items
            .iter()
            .map(|item| coerce(inner, item))
            .collect::<Result<Vec<_>, _>>()
            .map(DynSolValue::FixedArray),
        (DynSolType::Address | DynSolType::Bytes | DynSolType::FixedBytes(_), Value::String(s)) => {
            kind.coerce_str(s).map_err(|_| invalid())
        }
        _ => Err(invalid()),
    }
}

fn json_to_uint(value: &Value) -> Option<U256> {
    match value {
        Value::Number(n) => {
            if let Some(v) = n.as_u64() {
                return Some(U256::from(v));
            }
            let f = n.as_f64()?;
            if f.fract() == 0.0 && (0.0..=MAX_SAFE_INTEGER).contains(&f) {
                Some(U256::from(f as u64))
            } else {
                None
            }
        }
        Value::String(s) => {
            let s = s.trim();
            let hex = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X"));
            match hex {
                Some(digits) => U256::from_str_radix(digits, 16).ok(),
                None if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => {
                    U256::from_str_radix(s, 10).ok()
                }
                None => None,
            }
        }
        _ => None,
    }
}

fn resolve(params: &[Param]) -> Result<Vec<DynSolType>, AbiError> {
    params
        .iter()
        .map(|p| p.resolve().map_err(AbiError::from))
        .collect()
}

/// Coerce `args` against a parameter list of the same length.
pub fn coerce_params(name: &str, params: &[Param], args: &[Value]) -> Result<Vec<DynSolValue>, AbiError> {
    if params.len() != args.len() {
        return Err(AbiError::ArityMismatch {
            name: name.to_string(),
            expected: params.len(),
            got: args.len(),
        });
    }
    resolve(params)?
        .iter()
        .zip(args)
        .map(|(kind, arg)| coerce(kind, arg))
        .collect()
}

/// Decode ABI-encoded parameters (no selector).
pub fn decode_params(params: &[Param], data: &[u8]) -> Result<Vec<DynSolValue>, AbiError> {
    match DynSolType::Tuple(resolve(params)?).abi_decode_params(data)? {
        DynSolValue::Tuple(values) => Ok(values),
        other => Ok(vec![other]),
    }
}

/// The overload of `name` taking `arity` arguments.
pub fn function<'a>(abi: &'a JsonAbi, name: &str, arity: usize) -> Result<&'a Function, AbiError> {
    let overloads = abi
        .function(name)
        .filter(|o| !o.is_empty())
        .ok_or_else(|| AbiError::UnknownFunction(name.to_string()))?;
    overloads
        .iter()
        .find(|f| f.inputs.len() == arity)
        .ok_or_else(|| AbiError::ArityMismatch {
            name: name.to_string(),
            expected: overloads[0].inputs.len(),
            got: arity,
        })
}

/// Selector plus encoded arguments.
pub fn encode_call(function: &Function, args: &[Value]) -> Result<Vec<u8>, AbiError> {
    let values = coerce_params(&function.name, &function.inputs, args)?;
    Ok(function.abi_encode_input(&values)?)
}

/// Encoded constructor arguments, to be appended to the creation bytecode.
pub fn encode_constructor(abi: &JsonAbi, args: &[Value]) -> Result<Vec<u8>, AbiError> {
    match abi.constructor() {
        Some(constructor) => {
            let values = coerce_params("constructor", &constructor.inputs, args)?;
            Ok(constructor.abi_encode_input(&values)?)
        }
        None if args.is_empty() => Ok(Vec::new()),
        None => Err(AbiError::ArityMismatch {
            name: "constructor".to_string(),
            expected: 0,
            got: args.len(),
        }),
    }
}

/// Decode a function's return data.
pub fn decode_output(function: &Function, data: &[u8]) -> Result<Vec<DynSolValue>, AbiError> {
    decode_params(&function.outputs, data)
}
