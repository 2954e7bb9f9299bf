//! ISO14443-A (MIFARE) discovery.
//!
//! Sequence, in order:
//!
//! 1. initial settings and reset
//! 2. modulator at 13.56 MHz
//! 3. ISO control for 106 kbps RX without CRC, read back and checked
//! 4. field on
//! 5. REQA (7 bits), retried once when nothing answers
//! 6. anti-collision CL1, UID + BCC check
//! 7. RSSI check
//! 8. ISO control for RX with CRC
//! 9. SELECT with the UID and BCC
//! 10. HLTA
//! 11. field off, on every path
//!
//! Every exchange is bounded by its own timeout.

use crate::DiscoveryOptions;
use nfcprobe_core::constants::{
    HALT_TIMEOUT_MS, HLTA, ISO_CONTROL_14443A_CRC, ISO_CONTROL_14443A_NO_CRC,
    MODULATOR_13_56_MHZ, NVB_ANTICOLLISION, NVB_SELECT, REQA, REQA_BITS, SEL_CL1,
    TYPE_A_DATA_MAX, TYPE_A_TIMEOUT_MS, TYPE_A_UID_MAX,
};
use nfcprobe_core::{DiscoveryResult, SessionMode, hex_string};
use nfcprobe_hardware::{Console, ReaderLink, Register, Result, Transceive};
use tracing::{debug, info, warn};

/// XOR of all bytes.
pub fn bcc(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0, |acc, b| acc ^ b)
}

/// Split an anti-collision answer into UID bytes and the trailing check
/// byte, and tell whether the check byte matches.
///
/// Returns `None` for an empty answer.
///
/// # Examples
///
/// ```
/// use nfcprobe_discovery::type_a::check_uid;
///
/// let (uid, check, ok) = check_uid(&[0x12, 0x34, 0x56, 0x78, 0x3E]).unwrap();
/// assert_eq!(uid, &[0x12, 0x34, 0x56, 0x78]);
/// assert_eq!(check, 0x3E);
/// assert!(ok);
/// ```
pub fn check_uid(answer: &[u8]) -> Option<(&[u8], u8, bool)> {
    let (&check, uid) = answer.split_last()?;
    Some((uid, check, bcc(uid) == check))
}

/// Run one Type A discovery attempt.
///
/// "No tag" and integrity problems are reported on `console` and reflected
/// in the result. Only a link failure returns `Err`, after the field has
/// been switched off.
pub async fn discover<L: ReaderLink>(
    link: &mut L,
    console: &mut dyn Console,
    options: &DiscoveryOptions,
) -> Result<DiscoveryResult> {
    options.begin_attempt();
    let mut result = DiscoveryResult::no_tag(SessionMode::TypeA);

    let exchange = exchange(link, console, options, &mut result).await;
    let field_off = link.field_off().await;
    let (irq_count, irq_seen) = options.end_attempt();
    debug!(irq_count, irq_seen, "Type A attempt finished");

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
    link.write_register(Register::IsoControl, ISO_CONTROL_14443A_NO_CRC)
        .await?;

    let readback = link.read_register(Register::IsoControl).await?;
    if readback != ISO_CONTROL_14443A_NO_CRC {
        warn!(readback, "ISO control read-back mismatch");
        console.write_line(&format!(
            "Error ISO Control Register read=0x{readback:02X} (should be 0x{ISO_CONTROL_14443A_NO_CRC:02X})"
        ));
    }

    link.field_on().await?;

    let wake = || {
        Transceive::bits(REQA, REQA_BITS)
            .max_response(TYPE_A_DATA_MAX)
            .timeout_ms(TYPE_A_TIMEOUT_MS)
    };
    let mut atqa = link.transceive(wake()).await?;
    if atqa.is_empty() {
        debug!("REQA unanswered, retrying once");
        atqa = link.transceive(wake()).await?;
    }
    if atqa.is_empty() {
        console.write_line("No tag found.");
        return Ok(());
    }
    console.write_line(&format!("ATQA: {}", hex_string(&atqa, " ")));
    result.wake_response = atqa;

    let anticollision = link
        .transceive(
            Transceive::bytes(&[SEL_CL1, NVB_ANTICOLLISION])
                .max_response(TYPE_A_UID_MAX)
                .timeout_ms(TYPE_A_TIMEOUT_MS),
        )
        .await?;
    let Some((uid, check, checksum_ok)) = check_uid(&anticollision) else {
        console.write_line("No anti-collision answer.");
        return Ok(());
    };
    result.uid = uid.to_vec();
    result.checksum_ok = checksum_ok;
    console.write_line(&format!(
        "UID: {} (BCC {check:02X} {})",
        hex_string(uid, " "),
        if checksum_ok { "ok" } else { "NOT OK" }
    ));
    if checksum_ok {
        info!(
            uid = %result.uid_hex(),
            at = %result.discovered_at.to_rfc3339(),
            "Type A tag discovered"
        );
    } else {
        warn!(uid = %result.uid_hex(), check, "BCC mismatch");
    }

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

    link.write_register(Register::IsoControl, ISO_CONTROL_14443A_CRC)
        .await?;

    let mut select = vec![SEL_CL1, NVB_SELECT];
    select.extend_from_slice(&anticollision);
    let sak = link
        .transceive(
            Transceive::bytes(&select)
                .max_response(TYPE_A_DATA_MAX)
                .timeout_ms(TYPE_A_TIMEOUT_MS)
                .with_crc(),
        )
        .await?;
    if !sak.is_empty() {
        console.write_line(&format!("SAK: {}", hex_string(&sak, " ")));
    }
    result.select_ack = sak;

    let halt = link
        .transceive(
            Transceive::bytes(&[HLTA, 0x00])
                .max_response(TYPE_A_DATA_MAX)
                .timeout_ms(HALT_TIMEOUT_MS)
                .with_crc(),
        )
        .await?;
    if !halt.is_empty() {
        console.write_line(&format!("HALT: {}", hex_string(&halt, " ")));
    }

    Ok(())
}
