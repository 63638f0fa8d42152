//! # CLI Integration Tests
//!
//! Drive `gamma_cli::run` end to end for everything that does not need a
//! docker daemon: dispatch errors, key generation, request files and
//! unreachable nodes.

use std::fs;

use gamma_cli::{parse_invocation, render_help, run, CliError, CommandId};
use gamma_jsoncodec::{KeysFile, TEST_KEY_COUNT};
use tempfile::TempDir;

/// Config with one remote environment pointing at a closed port.
fn unreachable_config(dir: &TempDir) -> String {
    let path = dir.path().join("orbs-gamma-config.json");
    fs::write(
        &path,
        r#"{"Environments": {"testnet": {"VirtualChain": 1000, "Endpoints": ["http://127.0.0.1:9"]}}}"#,
    )
    .unwrap();
    path.to_str().unwrap().to_string()
}

#[tokio::test]
async fn test_unknown_command() {
    let err = run(&["frobnicate"]).await.unwrap_err();

    assert_eq!(
        err.to_string(),
        "Command 'frobnicate' not found, run 'gamma-cli help' to see available commands."
    );
}

#[tokio::test]
async fn test_missing_required_argument() {
    let err = run(&["deploy"]).await.unwrap_err();

    assert_eq!(
        err.to_string(),
        "Command 'deploy' is missing required arguments [<CODE_FILE> - path of file with source code]."
    );
}

#[tokio::test]
async fn test_option_in_place_of_positional() {
    let err = run(&["send-tx", "-signer", "user2"]).await.unwrap_err();

    assert!(matches!(err, CliError::BadArgument { position: 1, .. }));
    assert!(err.to_string().starts_with("Command 'send-tx' argument 1 should be <INPUT_FILE>"));
}

#[tokio::test]
async fn test_invalid_options_show_help() {
    let err = run(&["gen-test-keys", "-bogus"]).await.unwrap_err();
    assert!(matches!(err, CliError::HelpShown));
}

#[tokio::test]
async fn test_help_command() {
    assert!(matches!(run(&["help"]).await, Err(CliError::HelpShown)));
    assert!(matches!(run::<&str>(&[]).await, Err(CliError::HelpShown)));
}

#[test]
fn test_help_layout() {
    let help = render_help();

    assert!(help.starts_with("Usage:\n\ngamma-cli COMMAND [OPTIONS]\n\nCommands:\n\n"));
    assert!(help.contains(&format!(
        "  start-local {} start a local Orbs personal blockchain instance listening on port\n",
        " ".repeat(4)
    )));
    assert!(help.contains(&format!("{}example: gamma-cli deploy MyToken.go -signer user1\n", " ".repeat(19))));
    assert!(help.contains(&format!("\n{}gamma-cli deploy contract.go -name MyToken\n", " ".repeat(28))));
    assert!(help.ends_with("See https://orbs.gitbook.io for more info.\n\n"));
}

#[test]
fn test_parse_invocation_splits_positionals_and_options() {
    let invocation = parse_invocation(&["run-query", "get.json", "-signer", "user3", "-arg1", "-5"]).unwrap();

    assert_eq!(invocation.command.id, CommandId::RunQuery);
    assert_eq!(invocation.positionals, vec!["get.json"]);
    assert_eq!(invocation.options.signer, "user3");
    assert_eq!(invocation.options.arg1.as_deref(), Some("-5"));
}

#[tokio::test]
async fn test_gen_test_keys_writes_full_batch() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let keys = dir.path().join("keys.json");

    // Act
    run(&["gen-test-keys", "-keys", keys.to_str().unwrap()]).await.unwrap();

    // Assert
    let file: KeysFile = serde_json::from_slice(&fs::read(&keys).unwrap()).unwrap();
    assert_eq!(file.len(), TEST_KEY_COUNT);
    for i in 1..=TEST_KEY_COUNT {
        let key = &file[&format!("user{}", i)];
        assert!(key.private_key.starts_with("0x"));
        assert_eq!(key.private_key.len(), 66);
        assert!(key.public_key.starts_with("0x"));
        assert_eq!(key.public_key.len(), 66);
        assert!(key.address.starts_with("0x"));
        assert_eq!(key.address.len(), 42);
    }
}

#[tokio::test]
async fn test_gen_test_keys_replaces_existing_file() {
    let dir = TempDir::new().unwrap();
    let keys = dir.path().join("keys.json");
    let keys = keys.to_str().unwrap();

    run(&["gen-test-keys", "-keys", keys]).await.unwrap();
    let first = fs::read_to_string(keys).unwrap();
    run(&["gen-test-keys", "-keys", keys]).await.unwrap();
    let second = fs::read_to_string(keys).unwrap();

    assert_ne!(first, second);
}

#[tokio::test]
async fn test_unreachable_node_reports_endpoint() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let config = unreachable_config(&dir);

    // Act
    let err = run(&["tx-status", "0xABCD", "-env", "testnet", "-config", &config])
        .await
        .unwrap_err();

    // Assert
    match err {
        CliError::NoConnection { endpoint } => assert_eq!(endpoint, "http://127.0.0.1:9"),
        other => panic!("expected NoConnection, got {:?}", other),
    }
}

#[tokio::test]
async fn test_send_tx_generates_keys_before_sending() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let config = unreachable_config(&dir);
    let keys = dir.path().join("keys.json");
    let input = dir.path().join("add.json");
    fs::write(
        &input,
        r#"{"ContractName": "Counter", "MethodName": "add", "Arguments": [{"Type": "uint64", "Value": "1"}]}"#,
    )
    .unwrap();

    // Act
    let err = run(&[
        "send-tx",
        input.to_str().unwrap(),
        "-env",
        "testnet",
        "-config",
        &config,
        "-keys",
        keys.to_str().unwrap(),
    ])
    .await
    .unwrap_err();

    // Assert
    assert!(matches!(err, CliError::NoConnection { .. }), "{:?}", err);
    assert!(keys.exists());
}

#[tokio::test]
async fn test_send_tx_rejects_bad_argument_before_connecting() {
    let dir = TempDir::new().unwrap();
    let config = unreachable_config(&dir);
    let keys = dir.path().join("keys.json");
    let input = dir.path().join("add.json");
    fs::write(
        &input,
        r#"{"ContractName": "Counter", "MethodName": "add", "Arguments": [{"Type": "uint64", "Value": "one"}]}"#,
    )
    .unwrap();

    let err = run(&[
        "send-tx",
        input.to_str().unwrap(),
        "-env",
        "testnet",
        "-config",
        &config,
        "-keys",
        keys.to_str().unwrap(),
    ])
    .await
    .unwrap_err();

    assert!(matches!(err, CliError::Codec(_)), "{:?}", err);
}

#[tokio::test]
async fn test_unknown_signer() {
    let dir = TempDir::new().unwrap();
    let keys = dir.path().join("keys.json");
    let input = dir.path().join("get.json");
    fs::write(&input, r#"{"ContractName": "Counter", "MethodName": "get"}"#).unwrap();

    let err = run(&[
        "run-query",
        input.to_str().unwrap(),
        "-signer",
        "user99",
        "-keys",
        keys.to_str().unwrap(),
    ])
    .await
    .unwrap_err();

    assert!(matches!(err, CliError::KeyNotFound { ref id, .. } if id == "user99"), "{:?}", err);
}

#[tokio::test]
async fn test_deploy_missing_source() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("Missing.go");

    let err = run(&["deploy", missing.to_str().unwrap()]).await.unwrap_err();

    assert!(matches!(err, CliError::SourceNotFound(_)));
    assert!(err.to_string().starts_with("Could not find path\n\n"));
}
