//! Commands that talk to a node: deploy, transactions and queries.

use std::fs;
use std::path::{Path, PathBuf};

use gamma_jsoncodec::{
    apply_overrides, marshal_read_response, marshal_send_tx_response, marshal_tx_proof_response,
    marshal_tx_status_response, parse_method_call, unmarshal_args, ArgValue, MethodCall,
};
use tracing::{debug, info};

use crate::api::{create_query, create_transaction, ApiError, NodeClient};
use crate::config::{resolve_endpoint, selected_environment};
use crate::constants::{DEPLOY_SYSTEM_CONTRACT_NAME, DEPLOY_SYSTEM_METHOD_NAME, PROCESSOR_TYPE_NATIVE};
use crate::error::{CliError, Result};
use crate::keys::load_test_key;
use crate::options::GlobalOptions;

/// `deploy <CODE_FILE>`: deploy a native contract from a file or directory.
pub async fn deploy(code_path: &str, options: &GlobalOptions) -> Result<()> {
    let contract_name = if options.name.is_empty() {
        filename_without_extension(code_path)
    } else {
        options.name.clone()
    };

    let sources = read_sources(Path::new(code_path)).map_err(CliError::SourceNotFound)?;
    info!(contract = %contract_name, files = sources.len(), "deploying");

    let signer = load_test_key(&options.keys_path(), &options.signer)?;
    let client = connect(options).await?;

    let args = deploy_args(&contract_name, sources);
    let (tx, tx_id) = create_transaction(
        &signer,
        client.virtual_chain(),
        DEPLOY_SYSTEM_CONTRACT_NAME,
        DEPLOY_SYSTEM_METHOD_NAME,
        &args,
    )?;

    let response = client
        .send_transaction(&tx)
        .await
        .map_err(|e| request_error("transaction", &client, e))?;

    let output = marshal_send_tx_response(&response, &tx_id).map_err(|source| CliError::ResponseEncode {
        command: "send-tx",
        source,
    })?;
    println!("{}\n", output);
    Ok(())
}

/// `send-tx <INPUT_FILE>`: sign and send a transaction.
pub async fn send_tx(input_path: &str, options: &GlobalOptions) -> Result<()> {
    let signer = load_test_key(&options.keys_path(), &options.signer)?;
    let (call, args) = read_method_call(input_path, options)?;

    let client = connect(options).await?;
    let (tx, tx_id) = create_transaction(
        &signer,
        client.virtual_chain(),
        &call.contract_name,
        &call.method_name,
        &args,
    )?;
    debug!(%tx_id, contract = %call.contract_name, method = %call.method_name, "sending transaction");

    let response = client
        .send_transaction(&tx)
        .await
        .map_err(|e| request_error("transaction", &client, e))?;

    let output = marshal_send_tx_response(&response, &tx_id).map_err(|source| CliError::ResponseEncode {
        command: "send-tx",
        source,
    })?;
    println!("{}\n", output);
    Ok(())
}

/// `run-query <INPUT_FILE>`: run a read-only method.
pub async fn run_query(input_path: &str, options: &GlobalOptions) -> Result<()> {
    let signer = load_test_key(&options.keys_path(), &options.signer)?;
    let (call, args) = read_method_call(input_path, options)?;

    let client = connect(options).await?;
    let query = create_query(
        &signer.public_key,
        client.virtual_chain(),
        &call.contract_name,
        &call.method_name,
        &args,
    );

    let response = client
        .run_query(&query)
        .await
        .map_err(|e| request_error("query", &client, e))?;

    let output = marshal_read_response(&response).map_err(|source| CliError::ResponseEncode {
        command: "run-query",
        source,
    })?;
    println!("{}\n", output);
    Ok(())
}

/// `tx-status <TX_ID>`
pub async fn tx_status(tx_id: &str, options: &GlobalOptions) -> Result<()> {
    let client = connect(options).await?;

    let response = client
        .get_transaction_status(tx_id)
        .await
        .map_err(|e| request_error("status", &client, e))?;

    let output = marshal_tx_status_response(&response).map_err(|source| CliError::ResponseEncode {
        command: "tx-status",
        source,
    })?;
    println!("{}\n", output);
    Ok(())
}

/// `tx-proof <TX_ID>`
pub async fn tx_proof(tx_id: &str, options: &GlobalOptions) -> Result<()> {
    let client = connect(options).await?;

    let response = client
        .get_transaction_receipt_proof(tx_id)
        .await
        .map_err(|e| request_error("proof", &client, e))?;

    let output = marshal_tx_proof_response(&response).map_err(|source| CliError::ResponseEncode {
        command: "tx-proof",
        source,
    })?;
    println!("{}\n", output);
    Ok(())
}

/// Read an input file and turn its arguments into native values, after
/// `-name` and `-argN` overrides.
pub fn read_method_call(input_path: &str, options: &GlobalOptions) -> Result<(MethodCall, Vec<ArgValue>)> {
    let bytes = fs::read(input_path).map_err(CliError::InputOpen)?;
    let mut call = parse_method_call(&bytes).map_err(|source| CliError::InputParse {
        path: PathBuf::from(input_path),
        source,
    })?;

    if !options.name.is_empty() {
        call.contract_name = options.name.clone();
    }

    apply_overrides(&mut call.arguments, &options.arg_overrides())?;

    let keys_path = options.keys_path();
    let args = unmarshal_args(&call.arguments, |id| {
        load_test_key(&keys_path, id)
            .map(|key| key.address)
            .map_err(|e| e.to_string())
    })?;

    Ok((call, args))
}

/// `_Deployments.deployService` arguments.
pub fn deploy_args(contract_name: &str, sources: Vec<Vec<u8>>) -> Vec<ArgValue> {
    let mut args = vec![
        ArgValue::String(contract_name.to_string()),
        ArgValue::Uint32(PROCESSOR_TYPE_NATIVE),
    ];
    args.extend(sources.into_iter().map(ArgValue::Bytes));
    args
}

/// Source files of a contract: the file itself, or every non-test `.go`
/// file in the directory, by name.
pub fn read_sources(path: &Path) -> std::io::Result<Vec<Vec<u8>>> {
    if !path.is_dir() {
        return Ok(vec![fs::read(path)?]);
    }

    let mut files: Vec<PathBuf> = fs::read_dir(path)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && is_contract_source(p))
        .collect();
    files.sort();

    files.iter().map(fs::read).collect()
}

fn is_contract_source(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    name.ends_with(".go") && !name.ends_with("_test.go")
}

/// `contracts/MyToken.go` becomes `MyToken`.
pub fn filename_without_extension(path: &str) -> String {
    let base = Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(path);
    base.split('.').next().unwrap_or(base).to_string()
}

async fn connect(options: &GlobalOptions) -> Result<NodeClient> {
    let env = selected_environment(options)?;
    let endpoint = resolve_endpoint(&env, options).await?;
    debug!(%endpoint, virtual_chain = env.virtual_chain, "node endpoint");
    NodeClient::new(endpoint, env.virtual_chain).map_err(|source| CliError::RequestFailed {
        command: "connection",
        source,
    })
}

fn request_error(command: &'static str, client: &NodeClient, error: ApiError) -> CliError {
    match error {
        ApiError::Connection(_) => CliError::NoConnection {
            endpoint: client.endpoint().to_string(),
        },
        source => CliError::RequestFailed { command, source },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_filename_without_extension() {
        assert_eq!(filename_without_extension("MyToken.go"), "MyToken");
        assert_eq!(filename_without_extension("contracts/counter/contract.go"), "contract");
        assert_eq!(filename_without_extension("contracts/counter"), "counter");
        assert_eq!(filename_without_extension("a.b.go"), "a");
    }

    #[test]
    fn test_deploy_args_layout() {
        let args = deploy_args("Counter", vec![b"package a".to_vec(), b"package b".to_vec()]);

        assert_eq!(
            args,
            vec![
                ArgValue::String("Counter".into()),
                ArgValue::Uint32(1),
                ArgValue::Bytes(b"package a".to_vec()),
                ArgValue::Bytes(b"package b".to_vec()),
            ]
        );
    }

    #[test]
    fn test_read_sources_from_directory() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.go"), "B").unwrap();
        fs::write(dir.path().join("a.go"), "A").unwrap();
        fs::write(dir.path().join("a_test.go"), "T").unwrap();
        fs::write(dir.path().join("README.md"), "R").unwrap();

        let sources = read_sources(dir.path()).unwrap();

        assert_eq!(sources, vec![b"A".to_vec(), b"B".to_vec()]);
    }

    #[test]
    fn test_read_sources_single_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("Counter.go");
        fs::write(&file, "package main").unwrap();

        assert_eq!(read_sources(&file).unwrap(), vec![b"package main".to_vec()]);
        assert!(read_sources(&dir.path().join("missing.go")).is_err());
    }

    #[test]
    fn test_read_method_call_applies_overrides() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("add.json");
        fs::write(
            &input,
            r#"{
                "ContractName": "Counter",
                "MethodName": "add",
                "Arguments": [
                    {"Type": "uint64", "Value": "1"},
                    {"Type": "string", "Value": "hello"}
                ]
            }"#,
        )
        .unwrap();

        let options = GlobalOptions {
            name: "Counter2".into(),
            arg1: Some("25".into()),
            keys: dir.path().join("keys.json"),
            ..GlobalOptions::default()
        };

        let (call, args) = read_method_call(input.to_str().unwrap(), &options).unwrap();

        assert_eq!(call.contract_name, "Counter2");
        assert_eq!(args, vec![ArgValue::Uint64(25), ArgValue::String("hello".into())]);
    }

    #[test]
    fn test_read_method_call_resolves_key_ids() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("transfer.json");
        fs::write(
            &input,
            r#"{"ContractName": "Token", "MethodName": "transfer", "Arguments": [{"Type": "gamma:keys-file-address", "Value": "user2"}]}"#,
        )
        .unwrap();
        let options = GlobalOptions {
            keys: dir.path().join("keys.json"),
            ..GlobalOptions::default()
        };

        let (_, args) = read_method_call(input.to_str().unwrap(), &options).unwrap();

        let expected = load_test_key(&options.keys, "user2").unwrap().address;
        assert_eq!(args, vec![ArgValue::Bytes(expected)]);
    }

    #[test]
    fn test_read_method_call_errors() {
        let dir = TempDir::new().unwrap();
        let options = GlobalOptions::default();

        let missing = dir.path().join("missing.json");
        assert!(matches!(
            read_method_call(missing.to_str().unwrap(), &options),
            Err(CliError::InputOpen(_))
        ));

        let bad = dir.path().join("bad.json");
        fs::write(&bad, "{not json").unwrap();
        assert!(matches!(
            read_method_call(bad.to_str().unwrap(), &options),
            Err(CliError::InputParse { .. })
        ));
    }

    #[test]
    fn test_override_past_end_rejected() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("one.json");
        fs::write(&input, r#"{"ContractName": "C", "MethodName": "m", "Arguments": [{"Type": "uint32", "Value": "1"}]}"#)
            .unwrap();
        let options = GlobalOptions {
            arg3: Some("7".into()),
            ..GlobalOptions::default()
        };

        let err = read_method_call(input.to_str().unwrap(), &options).unwrap_err();

        assert!(matches!(err, CliError::Codec(_)));
    }
}
