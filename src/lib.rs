/*!
A small control layer for the Novation Launchpad Pro: finds the device's MIDI ports, lights its
pads with the sysex commands from the "Launchpad Pro Programmers Reference Guide", and hands pad
presses to a callback.

# Finding and opening the device

The Launchpad Pro exposes one MIDI interface per [Mode]. [LaunchpadPro::discover] looks for
exactly one input and one output port of that interface and fails if there are none or several.

```no_run
use launchpad_pro::{Channel, LaunchpadPro, Layout, Mode, PaletteColor};

let device = LaunchpadPro::discover(Mode::Standalone)?;
let mut session = device.open_with_handler(|_timestamp, msg| println!("{}", msg))?;

session.change_layout(Layout::Programmer)?;
session.all_lit(PaletteColor::BLUE.into())?;
session.column_lit(0, &[5, 9, 13, 17, 21, 37, 45, 53])?;
session.all_on(Channel::new(1)?)?;

// Clears the pads and releases both ports. Dropping the session does the same.
session.close()?;
# Ok::<(), launchpad_pro::MidiError>(())
```

# Messages without a device

Every lighting command is available as a pure function in [message], which makes the exact bytes
easy to inspect:

```
use launchpad_pro::message;

let msg = message::row_lit(2, &[5, 5, 5]);
assert_eq!(msg.to_bytes(), vec![240, 0, 32, 41, 2, 16, 13, 2, 5, 5, 5, 247]);
```

For tests, [MockBackend] stands in for the system's MIDI ports and records everything a
[Session] sends.

# Features

- `cli` (default): the `lp-frame` and `lp-showcase` programs and the `runner` module behind
  them. Library users can turn it off with `default-features = false` to drop `clap`, `ctrlc`
  and `env_logger`.
- `serde`: `Serialize`/`Deserialize` for [Mode], [PortBinding], [Layout] and [PaletteColor].
*/

pub mod util;

mod errors;
pub use errors::*;

pub mod midi_io;
pub use midi_io::{MidiBackend, MidirBackend};

pub mod mock;
pub use mock::MockBackend;

pub mod mode;
pub use mode::{resolve, Direction, Mode, PortBinding};

mod color;
pub use color::*;

pub mod message;
pub use message::{Channel, Layout, SysexMessage};

mod input;
pub use input::*;

mod session;
pub use session::*;

mod frame;
pub use frame::*;

#[cfg(feature = "cli")]
pub mod runner;

pub mod prelude {
    pub use crate::message::{Channel, Layout};
    pub use crate::midi_io::{InputConnection, MidiBackend, OutputConnection};
    pub use crate::{LaunchpadPro, Message, Mode, PaletteColor, Session};
}

/// Identifier used for e.g. the midi port names etc.
const APPLICATION_NAME: &str = "Launchpad Pro";
