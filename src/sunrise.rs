//! A slow, stepped ramp of color and brightness that simulates dawn.
//!
//! Each step issues two requests (color, then brightness) and the
//! steps are spaced out so that the total request rate stays below
//! the per-device limits of the Govee cloud APIs; with the default
//! 15 second interval that is about 8 requests per minute.

use crate::capability::DeviceCapabilities;
use crate::color::{kelvin_to_rgb_approx, DeviceColor};
use crate::control::{set_brightness, set_color, set_color_temperature, turn_on};
use crate::device::Device;
use crate::transport::GoveeTransport;
use tokio::time::{sleep, Duration};

#[derive(Clone, Debug)]
pub struct SunriseOptions {
    pub duration: Duration,
    pub step_interval: Duration,
    /// Pause between the color and brightness requests of a step
    pub settle_delay: Duration,
    pub start_kelvin: f64,
    pub end_kelvin: f64,
    pub min_brightness: f64,
    pub max_brightness: f64,
    /// Fraction of the run during which RGB capable devices are
    /// driven through a warm amber ramp instead of a color temperature
    pub amber_phase: f64,
}

impl Default for SunriseOptions {
    fn default() -> Self {
        Self {
            duration: Duration::from_secs(5 * 60),
            step_interval: Duration::from_secs(15),
            settle_delay: Duration::from_millis(150),
            start_kelvin: 2000.,
            // Slightly warm, so that it ends up as morning sun rather
            // than harsh office lighting
            end_kelvin: 5200.,
            min_brightness: 1.,
            max_brightness: 100.,
            amber_phase: 0.35,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SunriseColor {
    Rgb(DeviceColor),
    Kelvin(f64),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SunriseStep {
    pub index: usize,
    /// Elapsed fraction of the run, `0..=1`
    pub t: f64,
    pub brightness: f64,
    pub kelvin: f64,
    pub color: SunriseColor,
}

pub fn ease_in_out_cubic(t: f64) -> f64 {
    if t < 0.5 {
        4. * t * t * t
    } else {
        1. - (-2. * t + 2.).powi(3) / 2.
    }
}

impl SunriseOptions {
    /// One step per interval, plus the final step at the end
    pub fn step_count(&self) -> usize {
        match self.duration.as_millis().checked_div(self.step_interval.as_millis()) {
            Some(n) => n as usize + 1,
            None => 1,
        }
    }

    pub fn step(
        &self,
        index: usize,
        steps: usize,
        supports_rgb: bool,
        supports_color_temperature: bool,
    ) -> SunriseStep {
        let t = if steps <= 1 {
            1.
        } else {
            index as f64 / (steps - 1) as f64
        };

        let brightness = self.min_brightness
            + (self.max_brightness - self.min_brightness) * ease_in_out_cubic(t);

        // Stay warm for longer, then shift faster towards the end
        let kelvin = self.start_kelvin + (self.end_kelvin - self.start_kelvin) * t.powf(1.7);

        let color = if supports_rgb && t <= self.amber_phase {
            let u = t / self.amber_phase;
            // Deep amber through to golden
            SunriseColor::Rgb(DeviceColor::clamped(255., 60. + 150. * u, 20. * u))
        } else if supports_color_temperature {
            SunriseColor::Kelvin(kelvin)
        } else {
            SunriseColor::Rgb(kelvin_to_rgb_approx(kelvin))
        };

        SunriseStep {
            index,
            t,
            brightness,
            kelvin,
            color,
        }
    }

    pub fn plan<D: DeviceCapabilities + ?Sized>(&self, device: &D) -> Vec<SunriseStep> {
        let steps = self.step_count();
        let rgb = device.supports_rgb();
        let temperature = device.supports_color_temperature();
        (0..steps)
            .map(|i| self.step(i, steps, rgb, temperature))
            .collect()
    }
}

/// Turns the device on and then runs the sunrise to completion.
/// The first failing request aborts the run.
pub async fn run_sunrise<T: GoveeTransport + ?Sized>(
    transport: &T,
    device: &Device,
    options: &SunriseOptions,
) -> anyhow::Result<()> {
    let plan = options.plan(device);

    log::info!(
        "Starting sunrise on {} | sku={} | device={}",
        device.name().unwrap_or("(unnamed)"),
        device.sku(),
        device.device_id()
    );
    log::info!(
        "Duration: {}s | Steps: {} | Step interval: {}s",
        options.duration.as_secs(),
        plan.len(),
        options.step_interval.as_secs_f64()
    );

    turn_on(transport, device).await?;

    for step in &plan {
        match step.color {
            SunriseColor::Rgb(color) => set_color(transport, device, color).await?,
            SunriseColor::Kelvin(kelvin) => {
                set_color_temperature(transport, device, kelvin).await?
            }
        };
        sleep(options.settle_delay).await;
        set_brightness(transport, device, step.brightness).await?;

        log::info!(
            "Sunrise {}% | ~{}K | {}%",
            (step.t * 100.).round(),
            step.kelvin.round(),
            step.brightness.round()
        );

        if step.index + 1 < plan.len() {
            sleep(options.step_interval).await;
        }
    }

    log::info!("Sunrise complete.");
    Ok(())
}
