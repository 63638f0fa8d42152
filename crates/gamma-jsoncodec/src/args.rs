//! # Typed Contract Arguments
//!
//! Request files and node responses carry contract arguments as
//! `{"Type": tag, "Value": ...}` pairs. `Value` is a string for scalar
//! tags and a list of strings for `*Array` tags. This module converts
//! between that wire form ([`Arg`]) and native values ([`ArgValue`]).
//!
//! ## Encoding rules
//!
//! | Tag | Wire value |
//! |-----|------------|
//! | `uint32`, `uint64` | decimal |
//! | `bool` | `"1"` / `"0"` |
//! | `string` | as is |
//! | `bytes`, `bytes20`, `bytes32` | hex, `0x` optional on input, always emitted |
//! | `uint256` | 32 bytes big-endian hex |
//! | `gamma:address` | checksummed hex, input only |
//! | `gamma:keys-file-address` | id in the keys file, input only |

use gamma_crypto::{decode_hex, decode_plain_hex};
use primitive_types::U256;
use serde::{Deserialize, Serialize};

use crate::CodecError;

/// Listing shown whenever an unknown tag is met.
pub const SUPPORTED_TYPES: &str = "Supported types are: uint32 uint64 uint256 bool string bytes bytes20 bytes32 uint32Array uint64Array uint256Array boolArray stringArray bytesArray bytes20Array bytes32Array gamma:address gamma:keys-file-address";

const ARRAY_SUFFIX: &str = "Array";
const GAMMA_PREFIX: &str = "gamma:";

const EXPECT_NUMERIC: &str = "a numeric value";
const EXPECT_BOOL: &str = "1 or 0";
const EXPECT_TEXT: &str = "text";
const EXPECT_BYTES: &str = "bytes in hex format";
const EXPECT_BYTES20: &str = "bytes20 in hex format (40 hexes)";
const EXPECT_BYTES32: &str = "bytes32 in hex format (64 hexes)";
const EXPECT_UINT256: &str = "uint256 value in bytes in hex format (64 hexes)";
const EXPECT_ADDRESS: &str = "an address in hex format";

/// Wire value of an argument.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    /// Scalar tags.
    Scalar(String),
    /// `*Array` tags.
    Array(Vec<String>),
    /// Anything else; always rejected by structural validation.
    Other(serde_json::Value),
}

impl RawValue {
    /// Build an array value from parsed JSON items, keeping non-string
    /// content around so validation can report it.
    pub fn from_json_items(items: Vec<serde_json::Value>) -> Self {
        if items.iter().all(serde_json::Value::is_string) {
            RawValue::Array(
                items
                    .into_iter()
                    .filter_map(|item| match item {
                        serde_json::Value::String(s) => Some(s),
                        _ => None,
                    })
                    .collect(),
            )
        } else {
            RawValue::Other(serde_json::Value::Array(items))
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            RawValue::Scalar(_) => "a string",
            RawValue::Array(_) => "an array of strings",
            RawValue::Other(serde_json::Value::Null) => "null",
            RawValue::Other(serde_json::Value::Bool(_)) => "a boolean",
            RawValue::Other(serde_json::Value::Number(_)) => "a number",
            RawValue::Other(serde_json::Value::String(_)) => "a string",
            RawValue::Other(serde_json::Value::Array(_)) => "an array with non-string elements",
            RawValue::Other(serde_json::Value::Object(_)) => "an object",
        }
    }
}

impl Default for RawValue {
    fn default() -> Self {
        RawValue::Other(serde_json::Value::Null)
    }
}

/// A contract argument in wire form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Arg {
    /// Type tag.
    #[serde(rename = "Type")]
    pub arg_type: String,
    /// Value, shaped by the tag.
    #[serde(rename = "Value", default)]
    pub value: RawValue,
}

impl Arg {
    /// Scalar argument.
    pub fn scalar(arg_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            arg_type: arg_type.into(),
            value: RawValue::Scalar(value.into()),
        }
    }

    /// Array argument.
    pub fn array(arg_type: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            arg_type: arg_type.into(),
            value: RawValue::Array(values),
        }
    }

    /// Whether the tag names an array type.
    pub fn is_array(&self) -> bool {
        self.arg_type.ends_with(ARRAY_SUFFIX)
    }

    /// Replace the value with a command-line override.
    ///
    /// Array tags take a JSON array; anything that does not parse as one
    /// becomes a single-element array.
    pub fn set_override(&mut self, value: &str) {
        self.value = if self.is_array() {
            match serde_json::from_str::<serde_json::Value>(value) {
                Ok(serde_json::Value::Array(items)) => RawValue::from_json_items(items),
                _ => RawValue::Array(vec![value.to_string()]),
            }
        } else {
            RawValue::Scalar(value.to_string())
        };
    }
}

/// Supported type tags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ArgType {
    Uint32,
    Uint64,
    Uint256,
    Bool,
    String,
    Bytes,
    Bytes20,
    Bytes32,
    Uint32Array,
    Uint64Array,
    Uint256Array,
    BoolArray,
    StringArray,
    BytesArray,
    Bytes20Array,
    Bytes32Array,
    /// Checksummed address, decoded to `bytes`.
    GammaAddress,
    /// Keys file id, resolved to that key's address as `bytes`.
    GammaKeysFileAddress,
}

impl ArgType {
    /// Every tag, in the order of [`SUPPORTED_TYPES`].
    pub const ALL: [ArgType; 18] = [
        ArgType::Uint32,
        ArgType::Uint64,
        ArgType::Uint256,
        ArgType::Bool,
        ArgType::String,
        ArgType::Bytes,
        ArgType::Bytes20,
        ArgType::Bytes32,
        ArgType::Uint32Array,
        ArgType::Uint64Array,
        ArgType::Uint256Array,
        ArgType::BoolArray,
        ArgType::StringArray,
        ArgType::BytesArray,
        ArgType::Bytes20Array,
        ArgType::Bytes32Array,
        ArgType::GammaAddress,
        ArgType::GammaKeysFileAddress,
    ];

    /// Wire tag.
    pub fn tag(self) -> &'static str {
        match self {
            ArgType::Uint32 => "uint32",
            ArgType::Uint64 => "uint64",
            ArgType::Uint256 => "uint256",
            ArgType::Bool => "bool",
            ArgType::String => "string",
            ArgType::Bytes => "bytes",
            ArgType::Bytes20 => "bytes20",
            ArgType::Bytes32 => "bytes32",
            ArgType::Uint32Array => "uint32Array",
            ArgType::Uint64Array => "uint64Array",
            ArgType::Uint256Array => "uint256Array",
            ArgType::BoolArray => "boolArray",
            ArgType::StringArray => "stringArray",
            ArgType::BytesArray => "bytesArray",
            ArgType::Bytes20Array => "bytes20Array",
            ArgType::Bytes32Array => "bytes32Array",
            ArgType::GammaAddress => "gamma:address",
            ArgType::GammaKeysFileAddress => "gamma:keys-file-address",
        }
    }

    /// Parse a wire tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.tag() == tag)
    }
}

/// A native contract argument value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArgValue {
    Uint32(u32),
    Uint64(u64),
    Uint256(U256),
    Bool(bool),
    String(String),
    Bytes(Vec<u8>),
    Bytes20([u8; 20]),
    Bytes32([u8; 32]),
    Uint32Array(Vec<u32>),
    Uint64Array(Vec<u64>),
    Uint256Array(Vec<U256>),
    BoolArray(Vec<bool>),
    StringArray(Vec<String>),
    BytesArray(Vec<Vec<u8>>),
    Bytes20Array(Vec<[u8; 20]>),
    Bytes32Array(Vec<[u8; 32]>),
}

impl ArgValue {
    /// Tag this value is emitted with.
    pub fn arg_type(&self) -> ArgType {
        match self {
            ArgValue::Uint32(_) => ArgType::Uint32,
            ArgValue::Uint64(_) => ArgType::Uint64,
            ArgValue::Uint256(_) => ArgType::Uint256,
            ArgValue::Bool(_) => ArgType::Bool,
            ArgValue::String(_) => ArgType::String,
            ArgValue::Bytes(_) => ArgType::Bytes,
            ArgValue::Bytes20(_) => ArgType::Bytes20,
            ArgValue::Bytes32(_) => ArgType::Bytes32,
            ArgValue::Uint32Array(_) => ArgType::Uint32Array,
            ArgValue::Uint64Array(_) => ArgType::Uint64Array,
            ArgValue::Uint256Array(_) => ArgType::Uint256Array,
            ArgValue::BoolArray(_) => ArgType::BoolArray,
            ArgValue::StringArray(_) => ArgType::StringArray,
            ArgValue::BytesArray(_) => ArgType::BytesArray,
            ArgValue::Bytes20Array(_) => ArgType::Bytes20Array,
            ArgValue::Bytes32Array(_) => ArgType::Bytes32Array,
        }
    }

    /// Convert to wire form.
    pub fn to_arg(&self) -> Arg {
        let tag = self.arg_type().tag();
        match self {
            ArgValue::Uint32(v) => Arg::scalar(tag, v.to_string()),
            ArgValue::Uint64(v) => Arg::scalar(tag, v.to_string()),
            ArgValue::Uint256(v) => Arg::scalar(tag, format_u256(v)),
            ArgValue::Bool(v) => Arg::scalar(tag, format_bool(*v)),
            ArgValue::String(v) => Arg::scalar(tag, v.clone()),
            ArgValue::Bytes(v) => Arg::scalar(tag, format_hex(v)),
            ArgValue::Bytes20(v) => Arg::scalar(tag, format_hex(v)),
            ArgValue::Bytes32(v) => Arg::scalar(tag, format_hex(v)),
            ArgValue::Uint32Array(vs) => Arg::array(tag, vs.iter().map(u32::to_string).collect()),
            ArgValue::Uint64Array(vs) => Arg::array(tag, vs.iter().map(u64::to_string).collect()),
            ArgValue::Uint256Array(vs) => Arg::array(tag, vs.iter().map(format_u256).collect()),
            ArgValue::BoolArray(vs) => Arg::array(tag, vs.iter().map(|v| format_bool(*v)).collect()),
            ArgValue::StringArray(vs) => Arg::array(tag, vs.clone()),
            ArgValue::BytesArray(vs) => Arg::array(tag, vs.iter().map(|v| format_hex(v)).collect()),
            ArgValue::Bytes20Array(vs) => Arg::array(tag, vs.iter().map(|v| format_hex(v)).collect()),
            ArgValue::Bytes32Array(vs) => Arg::array(tag, vs.iter().map(|v| format_hex(v)).collect()),
        }
    }
}

/// Convert wire arguments to native values.
///
/// The whole list is checked for shape first (array tags hold lists,
/// scalar tags hold strings), then converted in order. `resolve_key`
/// maps a `gamma:keys-file-address` id to the address of that key.
pub fn unmarshal_args<F>(args: &[Arg], mut resolve_key: F) -> Result<Vec<ArgValue>, CodecError>
where
    F: FnMut(&str) -> Result<Vec<u8>, String>,
{
    validate_structure(args)?;

    args.iter()
        .enumerate()
        .map(|(i, arg)| unmarshal_arg(i + 1, arg, &mut resolve_key))
        .collect()
}

/// Convert native values to wire arguments.
pub fn marshal_args(values: &[ArgValue]) -> Vec<Arg> {
    values.iter().map(ArgValue::to_arg).collect()
}

/// Decode output arguments reported by a node.
///
/// The `gamma:` tags are client-side conveniences and are rejected here.
pub fn decode_output_args(args: &[Arg]) -> Result<Vec<ArgValue>, CodecError> {
    if let Some((i, arg)) = args
        .iter()
        .enumerate()
        .find(|(_, arg)| arg.arg_type.starts_with(GAMMA_PREFIX))
    {
        return Err(CodecError::UnsupportedType {
            position: i + 1,
            tag: arg.arg_type.clone(),
        });
    }
    unmarshal_args(args, |_| Err("key ids are not allowed in node output".to_string()))
}

/// Apply `-argN` overrides; `overrides[0]` replaces argument 1.
pub fn apply_overrides(args: &mut [Arg], overrides: &[Option<String>]) -> Result<(), CodecError> {
    let available = args.len();
    for (i, value) in overrides.iter().enumerate() {
        let Some(value) = value.as_deref().filter(|v| !v.is_empty()) else {
            continue;
        };
        let arg = args.get_mut(i).ok_or(CodecError::MissingArgument {
            position: i + 1,
            available,
        })?;
        arg.set_override(value);
    }
    Ok(())
}

fn validate_structure(args: &[Arg]) -> Result<(), CodecError> {
    for (i, arg) in args.iter().enumerate() {
        let position = i + 1;
        match (arg.is_array(), &arg.value) {
            (true, RawValue::Array(_)) | (false, RawValue::Scalar(_)) => {}
            (true, other) => {
                return Err(CodecError::ExpectedArray {
                    position,
                    found: other.kind(),
                })
            }
            (false, other) => {
                return Err(CodecError::ExpectedScalar {
                    position,
                    found: other.kind(),
                })
            }
        }
    }
    Ok(())
}

fn unmarshal_arg<F>(position: usize, arg: &Arg, resolve_key: &mut F) -> Result<ArgValue, CodecError>
where
    F: FnMut(&str) -> Result<Vec<u8>, String>,
{
    let arg_type = ArgType::from_tag(&arg.arg_type).ok_or_else(|| CodecError::UnsupportedType {
        position,
        tag: arg.arg_type.clone(),
    })?;

    let value = match arg_type {
        ArgType::Uint32 => ArgValue::Uint32(scalar(position, arg, EXPECT_NUMERIC, parse_u32)?),
        ArgType::Uint64 => ArgValue::Uint64(scalar(position, arg, EXPECT_NUMERIC, parse_u64)?),
        ArgType::Uint256 => ArgValue::Uint256(scalar(position, arg, EXPECT_UINT256, parse_u256)?),
        ArgType::Bool => ArgValue::Bool(scalar(position, arg, EXPECT_BOOL, parse_bool)?),
        ArgType::String => ArgValue::String(scalar(position, arg, EXPECT_TEXT, parse_string)?),
        ArgType::Bytes => ArgValue::Bytes(scalar(position, arg, EXPECT_BYTES, parse_bytes)?),
        ArgType::Bytes20 => ArgValue::Bytes20(scalar(position, arg, EXPECT_BYTES20, parse_fixed::<20>)?),
        ArgType::Bytes32 => ArgValue::Bytes32(scalar(position, arg, EXPECT_BYTES32, parse_fixed::<32>)?),
        ArgType::Uint32Array => ArgValue::Uint32Array(elements(position, arg, EXPECT_NUMERIC, parse_u32)?),
        ArgType::Uint64Array => ArgValue::Uint64Array(elements(position, arg, EXPECT_NUMERIC, parse_u64)?),
        ArgType::Uint256Array => ArgValue::Uint256Array(elements(position, arg, EXPECT_UINT256, parse_u256)?),
        ArgType::BoolArray => ArgValue::BoolArray(elements(position, arg, EXPECT_BOOL, parse_bool)?),
        ArgType::StringArray => ArgValue::StringArray(elements(position, arg, EXPECT_TEXT, parse_string)?),
        ArgType::BytesArray => ArgValue::BytesArray(elements(position, arg, EXPECT_BYTES, parse_bytes)?),
        ArgType::Bytes20Array => {
            ArgValue::Bytes20Array(elements(position, arg, EXPECT_BYTES20, parse_fixed::<20>)?)
        }
        ArgType::Bytes32Array => {
            ArgValue::Bytes32Array(elements(position, arg, EXPECT_BYTES32, parse_fixed::<32>)?)
        }
        ArgType::GammaAddress => ArgValue::Bytes(scalar(position, arg, EXPECT_ADDRESS, parse_address)?),
        ArgType::GammaKeysFileAddress => {
            let id = scalar_str(position, arg)?;
            let address =
                resolve_key(id).map_err(|reason| CodecError::KeyResolution { position, reason })?;
            ArgValue::Bytes(address)
        }
    };
    Ok(value)
}

fn scalar_str(position: usize, arg: &Arg) -> Result<&str, CodecError> {
    match &arg.value {
        RawValue::Scalar(value) => Ok(value),
        other => Err(CodecError::ExpectedScalar {
            position,
            found: other.kind(),
        }),
    }
}

fn scalar<T>(
    position: usize,
    arg: &Arg,
    expected: &'static str,
    parse: fn(&str) -> Result<T, String>,
) -> Result<T, CodecError> {
    let value = scalar_str(position, arg)?;
    parse(value).map_err(|reason| CodecError::InvalidValue {
        position,
        expected,
        reason,
        value: value.to_string(),
    })
}

fn elements<T>(
    position: usize,
    arg: &Arg,
    expected: &'static str,
    parse: fn(&str) -> Result<T, String>,
) -> Result<Vec<T>, CodecError> {
    let RawValue::Array(values) = &arg.value else {
        return Err(CodecError::ExpectedArray {
            position,
            found: arg.value.kind(),
        });
    };
    values
        .iter()
        .enumerate()
        .map(|(j, value)| {
            parse(value).map_err(|reason| CodecError::InvalidElement {
                position,
                element: j + 1,
                expected,
                reason,
                value: value.clone(),
            })
        })
        .collect()
}

// Parsers return a newline-terminated detail line on failure (or nothing).

fn parse_u32(value: &str) -> Result<u32, String> {
    decimal(value)?.parse().map_err(|_| String::new())
}

fn parse_u64(value: &str) -> Result<u64, String> {
    decimal(value)?.parse().map_err(|_| String::new())
}

/// Unsigned decimal digits only; `str::parse` would also take a `+` sign.
fn decimal(value: &str) -> Result<&str, String> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(String::new());
    }
    Ok(value)
}

fn parse_bool(value: &str) -> Result<bool, String> {
    match value {
        "1" => Ok(true),
        "0" => Ok(false),
        _ => Err(String::new()),
    }
}

fn parse_string(value: &str) -> Result<String, String> {
    Ok(value.to_string())
}

fn parse_bytes(value: &str) -> Result<Vec<u8>, String> {
    decode_plain_hex(value).map_err(|e| format!("Hex decoder returned error: {}\n", e))
}

fn parse_fixed<const N: usize>(value: &str) -> Result<[u8; N], String> {
    let bytes = parse_bytes(value)?;
    let actual = bytes.len();
    bytes
        .try_into()
        .map_err(|_| format!("Actual size: {} bytes, expected {}\n", actual, N))
}

fn parse_u256(value: &str) -> Result<U256, String> {
    parse_fixed::<32>(value).map(|bytes| U256::from_big_endian(&bytes))
}

fn parse_address(value: &str) -> Result<Vec<u8>, String> {
    decode_hex(value).map_err(|e| format!("Hex decoder returned error: {}\n", e))
}

fn format_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

fn format_bool(value: bool) -> String {
    if value { "1" } else { "0" }.to_string()
}

fn format_u256(value: &U256) -> String {
    let mut bytes = [0u8; 32];
    value.to_big_endian(&mut bytes);
    format_hex(&bytes)
}
