use crate::commands::DeviceIndex;
use crate::sunrise::{run_sunrise, SunriseOptions};
use tokio::time::Duration;

#[derive(clap::Parser, Debug, PartialEq)]
pub struct SunriseCommand {
    #[command(flatten)]
    device: DeviceIndex,

    /// How long the sunrise takes, in seconds
    #[arg(long, default_value_t = 300)]
    duration_secs: u64,

    /// Time between steps, in seconds. Each step makes two
    /// requests, so keep this large enough to avoid the
    /// API rate limits.
    #[arg(long, default_value_t = 15, value_parser = clap::value_parser!(u64).range(1..))]
    interval_secs: u64,

    /// Color temperature to finish at
    #[arg(long, default_value_t = 5200.)]
    end_kelvin: f64,
}

impl SunriseCommand {
    fn options(&self) -> SunriseOptions {
        SunriseOptions {
            duration: Duration::from_secs(self.duration_secs),
            step_interval: Duration::from_secs(self.interval_secs),
            end_kelvin: self.end_kelvin,
            ..SunriseOptions::default()
        }
    }

    pub async fn run(&self, args: &crate::Args) -> anyhow::Result<()> {
        let client = args.api_args.client()?;
        let Some(device) = self.device.resolve(&client).await else {
            return Ok(());
        };

        run_sunrise(&client, &device, &self.options()).await
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{Args, SubCommand};
    use clap::Parser;

    fn parse(argv: &[&str]) -> SunriseCommand {
        let args =
            Args::try_parse_from(std::iter::once("govee-sunrise").chain(argv.iter().copied()))
                .unwrap();
        match args.cmd {
            SubCommand::Sunrise(cmd) => cmd,
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn defaults() {
        let cmd = parse(&["sunrise"]);
        k9::assert_equal!(cmd.device, DeviceIndex { index: 0 });
        let options = cmd.options();
        k9::assert_equal!(options.duration, Duration::from_secs(300));
        k9::assert_equal!(options.step_interval, Duration::from_secs(15));
        k9::assert_equal!(options.end_kelvin, 5200.);
        k9::assert_equal!(options.step_count(), 21);
    }

    #[test]
    fn overrides() {
        let cmd = parse(&[
            "sunrise",
            "2",
            "--duration-secs",
            "60",
            "--interval-secs",
            "10",
            "--end-kelvin",
            "6500",
        ]);
        k9::assert_equal!(cmd.device, DeviceIndex { index: 2 });
        let options = cmd.options();
        k9::assert_equal!(options.duration, Duration::from_secs(60));
        k9::assert_equal!(options.step_interval, Duration::from_secs(10));
        k9::assert_equal!(options.end_kelvin, 6500.);
        k9::assert_equal!(options.step_count(), 7);
    }

    #[test]
    fn zero_interval_is_rejected() {
        assert!(Args::try_parse_from(["govee-sunrise", "sunrise", "--interval-secs", "0"]).is_err());
    }
}
