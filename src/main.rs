use clap::Parser;
use std::str::FromStr;

mod capability;
mod color;
mod commands;
mod control;
mod device;
mod directory;
mod platform_api;
mod rest_api;
mod sunrise;
mod transport;

/// Control Govee lights from the command line, and wake up
/// to a simulated sunrise.
#[derive(clap::Parser, Debug)]
#[command(version, arg_required_else_help = true)]
pub struct Args {
    #[command(flatten)]
    api_args: platform_api::GoveeApiArguments,

    #[command(subcommand)]
    cmd: SubCommand,
}

#[derive(clap::Subcommand, Debug)]
pub enum SubCommand {
    /// List the devices on the account, merged from both APIs.
    /// The position shown in brackets is the index accepted
    /// by the other commands.
    List(commands::list::ListCommand),
    #[command(flatten)]
    Control(commands::control::ControlCommand),
    /// Turn a device on and slowly ramp it from a dim warm glow
    /// to bright daylight
    Sunrise(commands::sunrise::SunriseCommand),
}

impl Args {
    async fn run(&self) -> anyhow::Result<()> {
        match &self.cmd {
            SubCommand::List(cmd) => cmd.run(self).await,
            SubCommand::Control(cmd) => cmd.run(self).await,
            SubCommand::Sunrise(cmd) => cmd.run(self).await,
        }
    }
}

pub fn opt_env_var<T: FromStr>(name: &str) -> anyhow::Result<Option<T>>
where
    <T as FromStr>::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(p) => {
            Ok(Some(p.parse().map_err(|err| {
                anyhow::anyhow!("parsing ${name}: {err:#}")
            })?))
        }
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(err) => anyhow::bail!("${name} is invalid: {err:#}"),
    }
}

fn setup_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    color_backtrace::install();
    if let Ok(path) = dotenvy::dotenv() {
        eprintln!("Loaded some environment variables from {path:?}");
    }
    setup_logger();

    match parse_args(std::env::args_os()) {
        Some(args) => args.run().await,
        None => Ok(()),
    }
}

/// Parses the command line. Help, version and usage errors are
/// printed and yield None; none of them are treated as a failure
/// of the program.
fn parse_args<I, T>(argv: I) -> Option<Args>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    match Args::try_parse_from(argv) {
        Ok(args) => Some(args),
        Err(err) => {
            if let Err(print_err) = err.print() {
                log::error!("failed to print usage: {print_err:#}");
            }
            None
        }
    }
}
