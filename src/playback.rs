use std::path::Path;
use std::process::{Command, Stdio};

/// Opens `path` with the platform's default player and returns immediately.
///
/// The player outlives this process. Launch failures are logged, never
/// returned.
pub fn play_detached(path: &Path) {
    let mut cmd = opener_command(path);
    let spawned = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn();

    match spawned {
        Ok(mut child) => {
            let shown = path.display().to_string();
            log::debug!("Playing {} (pid {})", shown, child.id());
            std::thread::spawn(move || match child.wait() {
                Ok(status) if !status.success() => {
                    log::warn!("Player for {} exited with {}", shown, status);
                }
                Err(e) => log::warn!("Lost track of player for {}: {}", shown, e),
                Ok(_) => {}
            });
        }
        Err(e) => log::warn!("Failed to play {}: {}", path.display(), e),
    }
}

fn opener_command(path: &Path) -> Command {
    if cfg!(target_os = "windows") {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", "start", ""]).arg(path);
        cmd
    } else if cfg!(target_os = "macos") {
        let mut cmd = Command::new("open");
        cmd.arg(path);
        cmd
    } else {
        let mut cmd = Command::new("xdg-open");
        cmd.arg(path);
        cmd
    }
}
