
use std::ffi::OsString;
use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Name or UUID of the VirtualBox machine to configure
    pub vm: Option<String>,
    /// Trace every command and resolved field
    #[arg(short, long)]
    pub debug: bool,
    /// Print the extra-data keys instead of writing them
    #[arg(short = 'n', long)]
    pub dry_run: bool,
    /// YAML file with DMI values to use instead of the host's
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// VirtualBox management program
    #[arg(long, value_name = "PATH", env = "HOSTDMI_VBOXMANAGE", default_value = "VBoxManage")]
    pub vboxmanage: String,
    /// DMI table decoder program
    #[arg(long, value_name = "PATH", env = "HOSTDMI_DMIDECODE", default_value = "dmidecode")]
    pub dmidecode: String,
}

/// What the command line asks for
#[derive(Debug)]
pub enum Invocation {
    /// No arguments were given, show usage
    Usage,
    /// Configure the named VM
    Run { vm: String, args: Args },
}

/// Resolve the command line. Help and version requests surface as a clap
/// error that prints to stdout ([clap::Error::use_stderr] is false).
pub fn resolve<I, T>(argv: I) -> Result<Invocation, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let argv: Vec<OsString> = argv.into_iter().map(Into::into).collect();
    if argv.len() <= 1 {
        return Ok(Invocation::Usage);
    }

    let args = Args::try_parse_from(argv)?;
    let Some(vm) = args.vm.clone() else {
        let mut command = Args::command();
        let usage = command.render_usage();
        return Err(command.error(
            ErrorKind::MissingRequiredArgument,
            format!("a virtual machine name is required\n\n{usage}"),
        ));
    };

    Ok(Invocation::Run { vm, args })
}

/// Print the full usage text
pub fn print_usage() -> std::io::Result<()> {
    Args::command().print_help()
}
