use anyhow::Context;
use clap::Parser;
use ds18b20::Ds18b20;
use std::{thread, time::Duration};
use uart_onewire::{SerialPortTransport, UartOneWire};

/// Read a DS18B20 through a USB-serial adapter wired as a 1-Wire master
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the serial port (e.g., /dev/ttyUSB0)
    #[arg(short, long)]
    path: String,
    /// Serial read timeout in milliseconds
    #[arg(short, long, default_value_t = 1000)]
    timeout_ms: u64,
    /// Time allowed for a temperature conversion in milliseconds
    #[arg(short, long, default_value_t = 1000)]
    conversion_delay_ms: u32,
    /// Number of temperature readings, 0 to keep reading
    #[arg(short = 'n', long, default_value_t = 1)]
    samples: u32,
    /// Pause between readings in milliseconds
    #[arg(short, long, default_value_t = 0)]
    interval_ms: u64,
}

fn main() -> anyhow::Result<()> {
    // Initialize the logger
    env_logger::init();
    // Parse command line arguments
    let args = Args::parse();
    // Open the serial port
    let port = SerialPortTransport::open(&args.path, Duration::from_millis(args.timeout_ms))
        .with_context(|| format!("failed to open {}", args.path))?;
    let mut bus = UartOneWire::new(port);
    let res = run(&mut bus, &args);
    bus.release().close();
    res
}

fn run(bus: &mut UartOneWire<SerialPortTransport>, args: &Args) -> anyhow::Result<()> {
    let sensor = Ds18b20::default().with_conversion_delay_ms(args.conversion_delay_ms);
    let mut delay = linux_embedded_hal::Delay;
    let rom = sensor.read_rom(bus).context("failed to read ROM")?;
    println!("Device ROM is {rom}");
    let mut taken = 0;
    loop {
        let temp = sensor
            .read_temperature(bus, &mut delay)
            .context("failed to read temperature")?;
        println!("Temperature is {temp:.2} °C");
        taken += 1;
        if args.samples != 0 && taken >= args.samples {
            break;
        }
        log::debug!("sleeping {} ms before next reading", args.interval_ms);
        thread::sleep(Duration::from_millis(args.interval_ms));
    }
    Ok(())
}
