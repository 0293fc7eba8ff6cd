use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use accesskey_lib::checksum::V0Packet;
use accesskey_lib::signature::V1Packet;
use accesskey_lib::{CapturedPacket, PacketVersion};

/// Show the checksum or signature an access key gives a captured packet.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Access key to check, e.g. 6f599f81.
    key: String,
    /// Hex dump of the captured packet.
    packet: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let packet = CapturedPacket::from_hex(&cli.packet).context("Failed to decode packet")?;
    let version = packet.version();
    println!("Version: {}", version);

    let matches = match version {
        PacketVersion::V0 => {
            let parsed = V0Packet::parse(packet.as_ref())?;
            let computed = parsed.compute(&cli.key);
            println!("Computed checksum: {:#04x}", computed);
            println!("Packet checksum:   {:#04x}", parsed.checksum);
            computed == parsed.checksum
        }
        PacketVersion::V1 => {
            let parsed = V1Packet::parse(packet.as_ref())?;
            info!(
                packet_type = %parsed.packet_type(),
                options = parsed.options().len(),
                "Parsed V1 header: {:?}",
                parsed.header()
            );
            let computed = parsed.compute(&cli.key)?;
            let expected = parsed.expected_signature();
            println!("Computed signature: {}", hex::encode(computed));
            println!("Packet signature:   {}", hex::encode(expected));
            parsed.verify(&cli.key)?
        }
    };

    println!("Match: {}", if matches { "yes" } else { "no" });
    Ok(())
}
