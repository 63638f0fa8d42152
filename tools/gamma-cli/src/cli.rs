//! Command table, invocation parsing and usage text.
//!
//! ```text
//! gamma-cli COMMAND [POSITIONALS...] [OPTIONS]
//! ```
//!
//! Positionals are required, counted exactly, and may not look like
//! options. Everything after them is parsed as options.

use tracing::debug;

use crate::commands;
use crate::constants::CONFIG_FILENAME;
use crate::error::{CliError, Result};
use crate::options::{parse_flags, GlobalOptions, FLAGS};

/// Command identity; each maps to one handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandId {
    StartLocal,
    StopLocal,
    GenTestKeys,
    Deploy,
    SendTx,
    RunQuery,
    TxStatus,
    TxProof,
    UpgradeServer,
    Logs,
    Version,
    Help,
}

/// Static command descriptor.
#[derive(Debug, Clone)]
pub struct Command {
    pub id: CommandId,
    pub name: &'static str,
    pub desc: &'static str,
    pub args: &'static str,
    pub example: &'static str,
    pub example2: &'static str,
    /// Position in usage.
    pub sort: usize,
    /// One description per required positional.
    pub required_options: &'static [&'static str],
}

const TX_ID_REQUIRED: &[&str] = &["<TX_ID> - txid of previously sent transaction, from send-tx response"];

/// All commands.
pub static COMMANDS: &[Command] = &[
    Command {
        id: CommandId::StartLocal,
        name: "start-local",
        desc: "start a local Orbs personal blockchain instance listening on port",
        args: "-port <PORT> -wait -no-ui -override-config <JSON>",
        example: "gamma-cli start-local -port 8080",
        example2: "gamma-cli start-local -wait -no-ui",
        sort: 0,
        required_options: &[],
    },
    Command {
        id: CommandId::StopLocal,
        name: "stop-local",
        desc: "stop a locally running Orbs personal blockchain instance",
        args: "",
        example: "",
        example2: "",
        sort: 1,
        required_options: &[],
    },
    Command {
        id: CommandId::GenTestKeys,
        name: "gen-test-keys",
        desc: "generate a new batch of 10 test keys and store in orbs-test-keys.json (default filename)",
        args: "-keys [OUTPUT_FILE]",
        example: "gamma-cli gen-test-keys -keys orbs-test-keys.json",
        example2: "",
        sort: 2,
        required_options: &[],
    },
    Command {
        id: CommandId::Deploy,
        name: "deploy",
        desc: "deploy a smart contract with the code specified in the source file <CODE_FILE>",
        args: "<CODE_FILE> -name [CONTRACT_NAME] -signer [ID_FROM_KEYS_JSON]",
        example: "gamma-cli deploy MyToken.go -signer user1",
        example2: "gamma-cli deploy contract.go -name MyToken",
        sort: 3,
        required_options: &["<CODE_FILE> - path of file with source code"],
    },
    Command {
        id: CommandId::SendTx,
        name: "send-tx",
        desc: "sign and send the transaction specified in the JSON file <INPUT_FILE>",
        args: "<INPUT_FILE> -arg# [OVERRIDE_ARG_#] -signer [ID_FROM_KEYS_JSON]",
        example: "gamma-cli send-tx transfer.json -signer user1",
        example2: "gamma-cli send-tx transfer.json -arg2 0x5B63Ca66637316A0D7f84Ebf60E50963c10059aD",
        sort: 4,
        required_options: &["<INPUT_FILE> - path of JSON file with transaction details"],
    },
    Command {
        id: CommandId::RunQuery,
        name: "run-query",
        desc: "read state or run a read-only contract method as specified in the JSON file <INPUT_FILE>",
        args: "<INPUT_FILE> -arg# [OVERRIDE_ARG_#] -signer [ID_FROM_KEYS_JSON]",
        example: "gamma-cli run-query get-balance.json -signer user1",
        example2: "gamma-cli run-query get-balance.json -arg1 0x5B63Ca66637316A0D7f84Ebf60E50963c10059aD",
        sort: 5,
        required_options: &["<INPUT_FILE> - path of JSON file with query details"],
    },
    Command {
        id: CommandId::TxStatus,
        name: "tx-status",
        desc: "get the current status of a sent transaction with txid <TX_ID> (from send-tx response)",
        args: "<TX_ID>",
        example: concat!("gamma-cli tx-status ", "0xB68fa95B7f397815Ddf41150d79b27a888448a22e08DeAf8600E7a495c406303659f8C3782614660"),
        example2: "",
        sort: 6,
        required_options: TX_ID_REQUIRED,
    },
    Command {
        id: CommandId::TxProof,
        name: "tx-proof",
        desc: "get cryptographic proof for transaction receipt with txid <TX_ID> (from send-tx response)",
        args: "<TX_ID>",
        example: concat!("gamma-cli tx-proof ", "0xB68fa95B7f397815Ddf41150d79b27a888448a22e08DeAf8600E7a495c406303659f8C3782614660"),
        example2: "",
        sort: 7,
        required_options: TX_ID_REQUIRED,
    },
    Command {
        id: CommandId::UpgradeServer,
        name: "upgrade-server",
        desc: "upgrade to the latest stable version of Gamma server",
        args: "",
        example: "gamma-cli upgrade-server",
        example2: "gamma-cli upgrade-server -env experimental",
        sort: 8,
        required_options: &[],
    },
    Command {
        id: CommandId::Logs,
        name: "logs",
        desc: "streams logs from Gamma server, showing only output printed by contracts",
        args: "",
        example: "gamma-cli logs",
        example2: "",
        sort: 9,
        required_options: &[],
    },
    Command {
        id: CommandId::Version,
        name: "version",
        desc: "print gamma-cli and Gamma server versions",
        args: "",
        example: "",
        example2: "",
        sort: 10,
        required_options: &[],
    },
    Command {
        id: CommandId::Help,
        name: "help",
        desc: "print this help screen",
        args: "",
        example: "",
        example2: "",
        sort: 11,
        required_options: &[],
    },
];

/// Look up a command by name.
pub fn find_command(name: &str) -> Option<&'static Command> {
    COMMANDS.iter().find(|cmd| cmd.name == name)
}

/// Commands in usage order.
pub fn sorted_commands() -> Vec<&'static Command> {
    let mut commands: Vec<&Command> = COMMANDS.iter().collect();
    commands.sort_by_key(|cmd| cmd.sort);
    commands
}

/// A parsed command line.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub command: &'static Command,
    pub positionals: Vec<String>,
    pub options: GlobalOptions,
}

/// Split the command line (without the program name) into command,
/// required positionals and options.
pub fn parse_invocation<S: AsRef<str>>(args: &[S]) -> Result<Invocation> {
    let Some(name) = args.first().map(|arg| arg.as_ref()) else {
        return Ok(help_invocation());
    };
    let command = find_command(name).ok_or_else(|| CliError::UnknownCommand(name.to_string()))?;

    let required = command.required_options.len();
    if args.len() < 1 + required {
        return Err(CliError::MissingArguments {
            command: command.name.to_string(),
            required: command.required_options.iter().map(|s| s.to_string()).collect(),
        });
    }

    let positionals: Vec<String> = args[1..1 + required].iter().map(|s| s.as_ref().to_string()).collect();
    for (i, value) in positionals.iter().enumerate() {
        if value.starts_with('-') {
            return Err(CliError::BadArgument {
                command: command.name.to_string(),
                position: i + 1,
                expected: command.required_options[i].to_string(),
            });
        }
    }

    let options = parse_flags(&args[1 + required..])?;
    if !options.trailing.is_empty() {
        debug!(trailing = ?options.trailing, "ignoring extra arguments");
    }

    Ok(Invocation {
        command,
        positionals,
        options,
    })
}

fn help_invocation() -> Invocation {
    Invocation {
        // the table always has a help entry
        command: &COMMANDS[COMMANDS.len() - 1],
        positionals: Vec::new(),
        options: GlobalOptions::default(),
    }
}

/// Full usage text.
pub fn render_help() -> String {
    let indent = " ".repeat(15);
    let mut out = String::new();

    out.push_str("Usage:\n\n");
    out.push_str("gamma-cli COMMAND [OPTIONS]\n\n");

    out.push_str("Commands:\n\n");
    for cmd in sorted_commands() {
        let pad = " ".repeat(15usize.saturating_sub(cmd.name.len()));
        out.push_str(&format!("  {} {} {}\n", cmd.name, pad, cmd.desc));
        if !cmd.args.is_empty() {
            out.push_str(&format!("  {}  options: {}\n", indent, cmd.args));
        }
        if !cmd.example.is_empty() {
            out.push_str(&format!("  {}  example: {}\n", indent, cmd.example));
        }
        if !cmd.example2.is_empty() {
            out.push_str(&format!("  {}           {}\n", indent, cmd.example2));
        }
        out.push('\n');
    }
    out.push('\n');

    out.push_str("Options:\n\n");
    for flag in FLAGS {
        let mut line = format!("  -{}", flag.name);
        if !flag.value_name.is_empty() {
            line.push(' ');
            line.push_str(flag.value_name);
        }
        line.push_str("\n    \t");
        line.push_str(flag.usage);
        if let Some(default) = flag.default {
            line.push_str(&format!(" (default {:?})", default));
        }
        out.push_str(&line);
        out.push('\n');
    }
    out.push('\n');

    out.push_str(&format!(
        "Multiple environments (eg. local and testnet) can be defined in {} configuration file.\n",
        CONFIG_FILENAME
    ));
    out.push_str("See https://orbs.gitbook.io for more info.\n\n");
    out
}

/// Parse and run one command line.
pub async fn run<S: AsRef<str>>(args: &[S]) -> Result<()> {
    let invocation = match parse_invocation(args) {
        Ok(invocation) => invocation,
        Err(CliError::InvalidOptions(message)) => {
            eprintln!("{}\n", message);
            eprint!("{}", render_help());
            return Err(CliError::HelpShown);
        }
        Err(e) => return Err(e),
    };
    commands::execute(invocation).await
}
