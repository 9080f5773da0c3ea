//! Runs every lighting command once and prints pad presses until asked to quit.
use std::sync::mpsc::channel;
use std::time::Duration;

use clap::Parser;
use launchpad_pro::runner::{self, CommonArgs};
use launchpad_pro::{LaunchpadPro, LedFrame};

#[derive(Parser, Debug)]
#[command(about = "Walk through the Launchpad Pro lighting commands, then echo pad presses")]
struct Args {
    #[command(flatten)]
    common: CommonArgs,

    /// Pause between the steps, in milliseconds
    #[arg(short, long, default_value_t = 300)]
    delay_ms: u64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    runner::init_logging(args.common.log_level.as_deref());

    let device = match LaunchpadPro::discover(args.common.mode) {
        Ok(device) => device,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    let frame = LedFrame::from_path(&args.common.csv)?;

    let (sender, events) = channel();
    runner::forward_interrupts(sender.clone())?;

    let mut session = device.open_with_handler(runner::print_message)?;
    runner::showcase(&mut session, &frame, Duration::from_millis(args.delay_ms))?;

    runner::forward_lines(std::io::BufReader::new(std::io::stdin()), sender);
    let reason = runner::wait_for_exit(&events, std::io::stdout());
    log::info!("Exiting ({:?})", reason);

    runner::shut_down(&mut session);
    Ok(())
}
