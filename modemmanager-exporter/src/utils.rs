use color_eyre::{Result, eyre::eyre};
use tokio::process::Command;
use tracing::trace;

/// Runs `cmd` to completion and returns its trimmed stdout.
///
/// The child is killed if the returned future is dropped, so an elapsed scrape
/// deadline does not leave `mmcli` processes behind.
pub async fn run_cmd(cmd: &str, args: &[&str]) -> Result<String> {
    trace!("running {cmd} {}", args.join(" "));

    let output = Command::new(cmd)
        .args(args)
        .kill_on_drop(true)
        .output()
        .await?;

    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    } else {
        let err = String::from_utf8_lossy(&output.stderr);
        let args = args.join(" ");
        Err(eyre!("failed to run {cmd} {args}. error: {}", err.trim()))
    }
}
