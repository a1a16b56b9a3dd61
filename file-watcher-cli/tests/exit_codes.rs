use std::io::{BufRead, BufReader};
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use assert_cmd::prelude::*;
use predicates::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

use file_watcher_core::{INVALID_PATH_EXIT_CODE, TRIGGER_EXIT_CODE};

fn watcher_cmd(home: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("file-watcher"));
    cmd.env("HOME", home).env("USERPROFILE", home);
    cmd
}

// tempfile's default ".tmp" prefix is itself on the ignore list.
fn profile_dir() -> TempDir {
    tempfile::Builder::new()
        .prefix("profile-")
        .tempdir()
        .expect("tempdir")
}

fn expected_trigger_status() -> i32 {
    if cfg!(unix) {
        TRIGGER_EXIT_CODE & 0xff
    } else {
        TRIGGER_EXIT_CODE
    }
}

/// Running watcher whose stdout lines are forwarded over a channel.
struct WatcherProcess {
    child: Child,
    lines: mpsc::Receiver<String>,
}

impl WatcherProcess {
    fn start(home: &Path) -> Self {
        let mut child = watcher_cmd(home)
            .env("RUST_LOG", "info")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .expect("spawn file-watcher");

        let stdout = child.stdout.take().expect("piped stdout");
        let (tx, lines) = mpsc::channel();
        thread::spawn(move || {
            for line in BufReader::new(stdout).lines().map_while(Result::ok) {
                if tx.send(line).is_err() {
                    break;
                }
            }
        });

        Self { child, lines }
    }

    fn wait_for_line(&self, needle: &str, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while let Some(remaining) = deadline.checked_duration_since(Instant::now()) {
            match self.lines.recv_timeout(remaining) {
                Ok(line) if line.contains(needle) => return true,
                Ok(_) => continue,
                Err(_) => return false,
            }
        }
        false
    }

    fn wait_for_exit(&mut self, timeout: Duration) -> Option<i32> {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if let Ok(Some(status)) = self.child.try_wait() {
                return status.code();
            }
            thread::sleep(Duration::from_millis(50));
        }
        None
    }
}

impl Drop for WatcherProcess {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

#[test]
fn missing_watch_directory_exits_with_invalid_path_code() {
    let home = profile_dir();
    let missing = home.path().join("no-such-profile");

    watcher_cmd(&missing)
        .assert()
        .code(INVALID_PATH_EXIT_CODE)
        .stdout(contains("Error"))
        .stdout(contains("Invalid path"))
        .stdout(contains("no-such-profile"))
        .stdout(contains("Monitoring").not());
}

#[test]
fn version_flag_reports_crate_version() {
    let home = profile_dir();
    watcher_cmd(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn first_non_ignored_change_exits_with_trigger_code() {
    let home = profile_dir();
    let mut watcher = WatcherProcess::start(home.path());

    assert!(
        watcher.wait_for_line("Monitoring File System Activity on", Duration::from_secs(10)),
        "watcher did not report an active watch in time",
    );

    std::fs::write(home.path().join("report.docx"), b"quarterly numbers").expect("write");

    let code = watcher.wait_for_exit(Duration::from_secs(10));
    assert_eq!(code, Some(expected_trigger_status()));
}

#[test]
fn ignored_change_keeps_watching() {
    let home = profile_dir();
    std::fs::create_dir_all(home.path().join("AppData").join("Local")).expect("mkdir");
    let mut watcher = WatcherProcess::start(home.path());

    assert!(
        watcher.wait_for_line("Monitoring File System Activity on", Duration::from_secs(10)),
        "watcher did not report an active watch in time",
    );

    std::fs::write(
        home.path().join("AppData").join("Local").join("cache.bin"),
        b"noise",
    )
    .expect("write ignored");
    std::fs::write(home.path().join("~lock.report.tmp"), b"noise").expect("write ignored");

    assert!(
        watcher.wait_for_line("Ignoring file", Duration::from_secs(10)),
        "ignored write was not reported",
    );
    assert_eq!(
        watcher.wait_for_exit(Duration::from_millis(500)),
        None,
        "ignored writes must not end the watch",
    );

    std::fs::write(home.path().join("notes.md"), b"real change").expect("write");
    assert_eq!(
        watcher.wait_for_exit(Duration::from_secs(10)),
        Some(expected_trigger_status())
    );
}
