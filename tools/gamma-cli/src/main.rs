//! gamma-cli entry point.

use std::process::ExitCode;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use gamma_cli::{run, CliError};

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time();

    // a second init only happens in tests; ignore it
    let _ = tracing_subscriber::registry().with(env_filter).with(fmt_layer).try_init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match run(args.as_slice()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(CliError::HelpShown) => ExitCode::from(2),
        Err(e) => {
            eprint!("ERROR:\n  {}\n\n", e);
            ExitCode::from(2)
        }
    }
}
