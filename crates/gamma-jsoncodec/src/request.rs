//! Request files given to `send-tx` and `run-query`.
//!
//! ```json
//! {
//!   "ContractName": "Counter",
//!   "MethodName": "add",
//!   "Arguments": [{"Type": "uint64", "Value": "17"}]
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::args::Arg;

/// A contract method call.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MethodCall {
    #[serde(default)]
    pub contract_name: String,
    #[serde(default)]
    pub method_name: String,
    #[serde(default)]
    pub arguments: Vec<Arg>,
}

/// Parse a request file.
pub fn parse_method_call(bytes: &[u8]) -> Result<MethodCall, serde_json::Error> {
    serde_json::from_slice(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::RawValue;

    #[test]
    fn test_parse_method_call() {
        let call = parse_method_call(
            br#"{
                "ContractName": "Counter",
                "MethodName": "add",
                "Arguments": [
                    {"Type": "uint64", "Value": "17"},
                    {"Type": "stringArray", "Value": ["a", "b"]}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(call.contract_name, "Counter");
        assert_eq!(call.method_name, "add");
        assert_eq!(call.arguments[0], Arg::scalar("uint64", "17"));
        assert_eq!(call.arguments[1].value, RawValue::Array(vec!["a".into(), "b".into()]));
    }

    #[test]
    fn test_arguments_optional() {
        let call = parse_method_call(br#"{"ContractName": "Counter", "MethodName": "get"}"#).unwrap();
        assert!(call.arguments.is_empty());
    }

    #[test]
    fn test_not_json_rejected() {
        assert!(parse_method_call(b"ContractName: Counter").is_err());
    }
}
