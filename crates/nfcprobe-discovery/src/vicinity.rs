//! ISO15693 (Vicinity) discovery.
//!
//! A single-slot inventory at high data rate, one subcarrier. The inventory
//! is sent once: unlike Type A there is no retry on an empty answer.

use crate::DiscoveryOptions;
use nfcprobe_core::constants::{
    INVENTORY, INVENTORY_FLAGS, INVENTORY_MASK_LEN, ISO_CONTROL_15693_HIGH, MODULATOR_13_56_MHZ,
    VICINITY_SETTLE_MS, VICINITY_TIMEOUT_MS, VICINITY_UID_MAX,
};
use nfcprobe_core::{DiscoveryResult, SessionMode};
use nfcprobe_hardware::{Console, ReaderLink, Register, Result, Transceive};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Run one Vicinity discovery attempt.
///
/// The whole inventory answer (flags, DSFID and UID) is reported as the
/// identifier. The field is switched off exactly once, also on error.
pub async fn discover<L: ReaderLink>(
    link: &mut L,
    console: &mut dyn Console,
    options: &DiscoveryOptions,
) -> Result<DiscoveryResult> {
    options.begin_attempt();
    let mut result = DiscoveryResult::no_tag(SessionMode::Vicinity);

    let exchange = exchange(link, console, options, &mut result).await;
    let field_off = link.field_off().await;
    let (irq_count, irq_seen) = options.end_attempt();
    debug!(irq_count, irq_seen, "Vicinity attempt finished");

    exchange?;
    field_off?;
    Ok(result)
}

async fn exchange<L: ReaderLink>(
    link: &mut L,
    console: &mut dyn Console,
    options: &DiscoveryOptions,
    result: &mut DiscoveryResult,
) -> Result<()> {
    link.initialize().await?;
    link.reset().await?;

    link.write_register(Register::ModulatorControl, MODULATOR_13_56_MHZ)
        .await?;
    link.write_register(Register::IsoControl, ISO_CONTROL_15693_HIGH)
        .await?;

    link.field_on().await?;
    tokio::time::sleep(Duration::from_millis(VICINITY_SETTLE_MS)).await;

    let inventory = link
        .transceive(
            Transceive::bytes(&[INVENTORY_FLAGS, INVENTORY, INVENTORY_MASK_LEN])
                .max_response(VICINITY_UID_MAX)
                .timeout_ms(VICINITY_TIMEOUT_MS)
                .with_crc(),
        )
        .await?;
    if inventory.is_empty() {
        console.write_line("No tag found.");
        return Ok(());
    }

    let rendered: Vec<String> = inventory.iter().map(|b| format!("0x{b:02X}")).collect();
    console.write_line(&format!("UID: {}", rendered.join(" ")));
    result.wake_response = inventory.clone();
    result.uid = inventory;
    info!(
        uid = %result.uid_hex(),
        at = %result.discovered_at.to_rfc3339(),
        "Vicinity tag discovered"
    );

    let rssi = link.read_register(Register::RssiLevels).await?;
    result.rssi = Some(rssi);
    if rssi < options.rssi_threshold {
        result.signal_quality_ok = false;
        warn!(rssi, "weak signal");
        console.write_line(&format!(
            "RSSI error: 0x{rssi:02X} (should be > 0x{:02X})",
            options.rssi_threshold
        ));
    }

    Ok(())
}
