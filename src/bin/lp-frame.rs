//! Lights the Launchpad Pro from a CSV frame and keeps it lit until asked to quit.
use std::sync::mpsc::channel;

use clap::Parser;
use launchpad_pro::runner::{self, CommonArgs};
use launchpad_pro::{LaunchpadPro, LedFrame, PaletteColor};

#[derive(Parser, Debug)]
#[command(about = "Light the Launchpad Pro grid from a CSV file of palette indices")]
struct Args {
    #[command(flatten)]
    common: CommonArgs,

    /// Color for the whole grid before the frame is drawn: a palette index or a color name
    #[arg(short, long, default_value = "dark_gray")]
    fill: PaletteColor,
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
    log::info!("Read {} colors from {}", frame.len(), args.common.csv.display());

    let (sender, events) = channel();
    runner::forward_interrupts(sender.clone())?;

    let mut session = device.open()?;
    runner::light_frame(&mut session, &frame, args.fill.id())?;

    runner::forward_lines(std::io::BufReader::new(std::io::stdin()), sender);
    let reason = runner::wait_for_exit(&events, std::io::stdout());
    log::info!("Exiting ({:?})", reason);

    runner::shut_down(&mut session);
    Ok(())
}
