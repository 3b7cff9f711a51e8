use std::process::ExitCode;

use clap::Parser;
use mapi_core::package_manager::SystemPackageManager;
use mapi_core::prompt::StdinConfirm;
use mapi_core::{Args, Context, FileStore, Settings};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Diagnostics go to stderr; stdout carries the user-facing messages.
fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    let settings = Settings::new(&args);

    let store = FileStore::from_settings(&settings.store);
    let package_manager = SystemPackageManager::new(&settings.package_manager);
    let ctx = Context {
        store: &store,
        package_manager: &package_manager,
        confirm: &StdinConfirm,
    };

    let report = mapi_core::run(args.tokens.as_slice(), &ctx);
    println!("{}", report.message);
    ExitCode::from(report.exit_code)
}
