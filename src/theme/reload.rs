// ============================================================================
// Environment Reload
// ============================================================================
// Best-effort refresh of programs that cache colors.

use std::env;
use std::ffi::OsStr;
use std::path::Path;
use std::process::{Command, Stdio};

use log::debug;

pub fn env(cache_dir: &Path) {
    let xresources = cache_dir.join("colors.Xresources");
    if env::var_os("DISPLAY").is_some() && xresources.is_file() {
        run("xrdb", &[OsStr::new("-merge"), xresources.as_os_str()]);
    }
    run("pkill", &[OsStr::new("-USR1"), OsStr::new("-x"), OsStr::new("polybar")]);
}

fn run(program: &str, args: &[&OsStr]) {
    let status = Command::new(program)
        .args(args)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();
    match status {
        Ok(status) => debug!("{} exited with {}", program, status),
        Err(e) => debug!("{} not run: {}", program, e),
    }
}
