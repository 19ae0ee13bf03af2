//! Plays a named generator on the default audio output device.
//!
//! Usage:
//!   play <generator> [--exponent X] [--highpass N] [--distance MS]
//!                    [--randomness MS] [--frequency HZ] [--amplitude A]
//!                    [--seconds S]
//!
//! `<generator>` is one of: colored_noise, pulse_noise, gated_noise, sine,
//! gated_sine.

use anyhow::{Context, Result, anyhow, bail};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SampleFormat, StreamConfig};
use murmur::{
    ColoredNoise, GeneratorKind, GeneratorParams, Product, PulseTrain, SampleGenerator,
    SineOscillator, gaussian_pulse,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::time::Duration;

fn main() -> Result<()> {
    let (kind, params, seconds) = parse_args()?;

    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| anyhow!("no output device available"))?;
    let config = device.default_output_config()?;

    // Stream at the device's native rate so no resampling is needed.
    let params = GeneratorParams {
        sample_rate: config.sample_rate().0,
        ..params
    };
    let generator = build_sendable(kind, &params)?;

    println!(
        "Playing {} at {} Hz for {} s (Ctrl+C to stop early)",
        kind.name(),
        params.sample_rate,
        seconds
    );

    let stream = match config.sample_format() {
        SampleFormat::F32 => stream_generator::<f32>(&device, &config.into(), generator)?,
        SampleFormat::I16 => stream_generator::<i16>(&device, &config.into(), generator)?,
        SampleFormat::U16 => stream_generator::<u16>(&device, &config.into(), generator)?,
        sample_format => bail!("unsupported sample format: {sample_format}"),
    };

    std::thread::sleep(Duration::from_secs(seconds));
    drop(stream);
    Ok(())
}

/// Builds a `Send` generator so it can move into the audio callback.
///
/// The library's convenience constructors default to `ThreadRng`, which is
/// not `Send`; here every stochastic generator gets its own entropy-seeded
/// `StdRng` instead.
fn build_sendable(
    kind: GeneratorKind,
    params: &GeneratorParams,
) -> Result<Box<dyn SampleGenerator + Send>> {
    let size = params.buffer_size;
    let rate = params.sample_rate;
    let generator: Box<dyn SampleGenerator + Send> = match kind {
        GeneratorKind::ColoredNoise => {
            let mut noise = ColoredNoise::with_rng(
                size,
                rate,
                params.exponent,
                params.high_pass,
                StdRng::from_entropy(),
            )?;
            noise.set_amplitude(params.amplitude);
            Box::new(noise)
        }
        GeneratorKind::PulseNoise => {
            let mut train = PulseTrain::with_rng(
                size,
                rate,
                params.distance_ms,
                params.randomness_ms,
                gate_pulse(),
                StdRng::from_entropy(),
            )?;
            train.set_amplitude(params.amplitude);
            Box::new(train)
        }
        GeneratorKind::GatedNoise => {
            let carrier = ColoredNoise::with_rng(
                size,
                rate,
                params.exponent,
                params.high_pass,
                StdRng::from_entropy(),
            )?;
            let gate = PulseTrain::with_rng(
                size,
                rate,
                params.distance_ms,
                params.randomness_ms,
                gate_pulse(),
                StdRng::from_entropy(),
            )?;
            Box::new(Product::new(carrier, gate)?)
        }
        GeneratorKind::Sine => {
            let mut osc = SineOscillator::new(size, rate, params.frequency)?;
            osc.set_amplitude(params.amplitude);
            Box::new(osc)
        }
        GeneratorKind::GatedSine => {
            let carrier = SineOscillator::new(size, rate, params.frequency)?;
            let gate = PulseTrain::with_rng(
                size,
                rate,
                params.distance_ms,
                params.randomness_ms,
                gate_pulse(),
                StdRng::from_entropy(),
            )?;
            Box::new(Product::new(carrier, gate)?)
        }
    };
    Ok(generator)
}

/// The default Gaussian gate pulse used by the library's presets.
fn gate_pulse() -> Vec<f32> {
    gaussian_pulse(3610, 180.0)
}

/// Opens an output stream feeding the generator's blocks to the device,
/// duplicating the mono signal across all channels.
fn stream_generator<T>(
    device: &cpal::Device,
    config: &StreamConfig,
    mut generator: Box<dyn SampleGenerator + Send>,
) -> Result<cpal::Stream>
where
    T: Sample + FromSample<f32> + cpal::SizedSample,
{
    let channels = config.channels as usize;
    let mut block: Vec<f32> = Vec::new();
    let mut position = 0usize;

    let stream = device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            for frame in data.chunks_mut(channels) {
                if position >= block.len() {
                    block.clear();
                    block.extend_from_slice(generator.next_buffer());
                    position = 0;
                }
                let value = T::from_sample(block[position]);
                position += 1;
                for sample in frame.iter_mut() {
                    *sample = value;
                }
            }
        },
        |err| eprintln!("audio stream error: {err}"),
        None,
    )?;

    stream.play()?;
    Ok(stream)
}

/// Parses `<generator> [--flag value]...` without a CLI framework; this
/// binary is demo glue, not part of the library surface.
fn parse_args() -> Result<(GeneratorKind, GeneratorParams, u64)> {
    let mut args = std::env::args().skip(1);
    let name = args.next().ok_or_else(|| {
        anyhow!(
            "usage: play <generator> [--flag value]...\n  generators: {}",
            GeneratorKind::all().map(|k| k.name()).join(", ")
        )
    })?;
    let kind: GeneratorKind = name.parse()?;

    let mut params = GeneratorParams::default();
    let mut seconds = 5u64;
    while let Some(flag) = args.next() {
        let value = args
            .next()
            .ok_or_else(|| anyhow!("missing value for {flag}"))?;
        match flag.as_str() {
            "--exponent" => params.exponent = value.parse().context("--exponent")?,
            "--highpass" => params.high_pass = value.parse().context("--highpass")?,
            "--distance" => params.distance_ms = value.parse().context("--distance")?,
            "--randomness" => params.randomness_ms = value.parse().context("--randomness")?,
            "--frequency" => params.frequency = value.parse().context("--frequency")?,
            "--amplitude" => params.amplitude = value.parse().context("--amplitude")?,
            "--seconds" => seconds = value.parse().context("--seconds")?,
            other => bail!("unknown flag: {other}"),
        }
    }
    Ok((kind, params, seconds))
}
