//! cmdtree CLI - command definition admin and interactive shell.

#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

use std::process::ExitCode;

fn main() -> ExitCode {
    cmdtree::cli::run()
}
