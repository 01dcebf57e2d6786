//! Fetch pseudo-trending GitHub repositories and publish a daily digest.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

use repo_trends::{Host, run};
use std::io::Write;
use std::io::{stderr, stdout};

/// Host backed by the real process environment.
#[derive(Debug, Clone, Default)]
pub struct RealHost;

#[cfg_attr(coverage_nightly, coverage(off))]
impl Host for RealHost {
    fn output(&mut self) -> impl Write {
        stdout()
    }

    fn error(&mut self) -> impl Write {
        stderr()
    }

    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }

    fn exit(&mut self, code: i32) {
        std::process::exit(code);
    }
}

#[tokio::main(flavor = "current_thread")]
#[cfg_attr(coverage_nightly, coverage(off))]
async fn main() -> Result<(), ohno::AppError> {
    // .env is optional
    let _ = dotenvy::dotenv();

    run(&mut RealHost, std::env::args()).await
}
