//! Blink a pin through a running pinbus daemon.
//!
//! Start the daemon first (`pinbus serve --backend sim`), then:
//! `cargo run --example blink -- 23`

use std::time::Duration;

use pinbus::client::PinClient;
use pinbus::proto::PinMode;
use pinbus::server::DEFAULT_SOCKET_PATH;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let pin: u16 = std::env::args()
        .nth(1)
        .map(|arg| arg.parse())
        .transpose()?
        .unwrap_or(23);

    let mut client = PinClient::connect(DEFAULT_SOCKET_PATH)?;

    let status = client.set_mode(pin, PinMode::OutputPushPull)?;
    if status != 0 {
        return Err(format!("set-mode rejected with status {status}").into());
    }

    let mut level = 0u8;
    loop {
        level ^= 1;
        let status = client.write(pin, level)?;
        if status != 0 {
            return Err(format!("write rejected with status {status}").into());
        }
        std::thread::sleep(Duration::from_secs(1));
    }
}
