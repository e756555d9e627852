//! The `routescope` command-line utility.

use std::process::ExitCode;

use routescope::cli::{build_cli, execute};
use routescope::core::settings_loader;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let matches = build_cli().get_matches();
    let settings = settings_loader::from_env();

    match execute(&matches, &settings).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(error = ?err, "command failed");
            eprintln!("{err}");
            ExitCode::from(u8::try_from(err.exit_code()).unwrap_or(1))
        }
    }
}
