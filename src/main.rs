use std::collections::HashMap;
use std::env;
use std::error::Error;
use std::process::{self, ExitCode};

use crate::cli::{Args, Invocation};
use crate::config::Config;
use crate::dmi::data::FieldValue;
use crate::dmi::{Dmidecode, HostQueryConfig};
use crate::vbox::{DryRun, VBoxManage};

mod cli;
mod config;
mod constants;
mod deps;
mod dmi;
mod injector;
mod vbox;

#[tokio::main]
async fn main() -> ExitCode {
    let (vm, args) = match cli::resolve(env::args_os()) {
        Ok(Invocation::Run { vm, args }) => (vm, args),
        Ok(Invocation::Usage) => {
            let _ = cli::print_usage();
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    let log_level = if args.debug {
        "trace".to_string()
    } else {
        env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string())
    };
    env_logger::Builder::new().parse_filters(&log_level).init();
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    log::debug!("Starting hostdmi v{}", VERSION);

    // Setup CTRL+C handler
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("Interrupted, the VM configuration may be incomplete");
            process::exit(1);
        }
    });

    match run(vm, args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(vm: String, args: Args) -> Result<(), Box<dyn Error>> {
    let host = HostQueryConfig::new(args.dmidecode.clone());
    let mut programs = vec![args.vboxmanage.clone()];
    programs.extend(host.required_programs());
    deps::check(&programs)?;

    let overrides: HashMap<&'static str, FieldValue> = match args.config.as_ref() {
        Some(path) => {
            log::debug!("Loading config from {path:?}");
            Config::from_yaml_path(path)?.overrides()?
        }
        None => HashMap::new(),
    };

    let vbox = VBoxManage::new(args.vboxmanage.clone());
    let hardware = Dmidecode::new(host);
    if args.dry_run {
        injector::inject(&vbox, &hardware, &DryRun::stdout(), &vm, &overrides).await?;
    } else {
        injector::inject(&vbox, &hardware, &vbox, &vm, &overrides).await?;
    }

    Ok(())
}
