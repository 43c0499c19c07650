//! Command grammar shared by the serial and wireless channels
//!
//! | Token        | Payload                | Command                           |
//! |--------------|------------------------|-----------------------------------|
//! | `SDDS:`      | integer Hz             | [`Command::SetDdsFrequency`]      |
//! | `DDSA:`      | float                  | [`Command::SetDdsAmplification`]  |
//! | `DDSO:`      | float, -3.3..=3.3      | [`Command::SetDdsOffset`]         |
//! | `P1:` `P2:`  | integer 0..=7          | [`Command::ConfigurePga`]         |
//! | `D0:`..`D3:` | integer 0..=255        | [`Command::SetDigipot`]           |
//! | `M:`         | one digit 0..=7        | [`Command::SetMux`]               |
//! | `SCO:`       | float, -3.3..=3.3      | [`Command::SetSignalChainOffset`] |
//! | `SCA:`       | float, 1.0..=7000.0    | [`Command::SetSignalChainAmplification`] |
//! | `IDDS`       |                        | [`Command::StartDds`]             |
//! | `DDSOFF`     |                        | [`Command::StopDds`]              |
//! | `ON`         |                        | [`Command::PowerOn`]              |
//! | `START`      |                        | [`Command::Start`]                |
//! | `OFF`        |                        | [`Command::PowerOff`]             |
//!
//! `DDSA:` has no fixed range here; the signal chain decides what it accepts.

use core::str::FromStr;

use platform::signal_chain::{OFFSET_RANGE_V, SIGNAL_CHAIN_GAIN_RANGE};
use platform::PgaStage;

/// Highest PGA gain setting.
pub const PGA_SETTING_MAX: u8 = 7;
/// Highest digipot channel index.
pub const DIGIPOT_CHANNEL_MAX: u8 = 3;
/// Highest multiplexer selection.
pub const MUX_MAX: u8 = 7;

/// One decoded operator command.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Change waveform frequency (Hz).
    SetDdsFrequency(u32),
    /// Change waveform amplification.
    SetDdsAmplification(f32),
    /// Change waveform DC offset (V).
    SetDdsOffset(f32),
    /// Select a gain setting on one PGA stage.
    ConfigurePga {
        /// Stage 1 or 2
        stage: PgaStage,
        /// Gain setting 0..=7
        setting: u8,
    },
    /// Move a digipot wiper.
    SetDigipot {
        /// Channel 0..=3
        channel: u8,
        /// Wiper position
        wiper: u8,
    },
    /// Select the input multiplexer position.
    SetMux(u8),
    /// Change signal-chain offset (V).
    SetSignalChainOffset(f32),
    /// Change signal-chain amplification.
    SetSignalChainAmplification(f32),
    /// Start waveform output at the default frequency.
    StartDds,
    /// Stop waveform output.
    StopDds,
    /// Request power-up.
    PowerOn,
    /// Request acquisition start.
    Start,
    /// Power the front end down.
    PowerOff,
}

impl Command {
    /// Whether the command moves the phase gate rather than configuring the
    /// signal chain.
    #[must_use]
    pub fn is_phase_request(&self) -> bool {
        matches!(self, Self::PowerOn | Self::Start)
    }
}

/// Why a command buffer was discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandError {
    /// Token is not part of the vocabulary.
    #[error("unrecognized command")]
    Unrecognized,
    /// Token known but its payload does not parse.
    #[error("malformed payload")]
    Malformed,
    /// Payload parsed but lies outside the accepted range.
    #[error("value out of range")]
    OutOfRange,
    /// Write longer than a command buffer.
    #[error("command too long")]
    TooLong,
}

/// Parse one command buffer.
///
/// Trailing NUL, CR and LF bytes are ignored.
pub fn parse(raw: &[u8]) -> Result<Command, CommandError> {
    let text = core::str::from_utf8(trim_terminators(raw)).map_err(|_| CommandError::Malformed)?;

    let Some((token, value)) = text.split_once(':') else {
        return match text {
            "ON" => Ok(Command::PowerOn),
            "START" => Ok(Command::Start),
            "OFF" => Ok(Command::PowerOff),
            "IDDS" => Ok(Command::StartDds),
            "DDSOFF" => Ok(Command::StopDds),
            _ => Err(CommandError::Unrecognized),
        };
    };

    match token {
        "SDDS" => number::<u32>(value).map(Command::SetDdsFrequency),
        "DDSA" => float(value).map(Command::SetDdsAmplification),
        "DDSO" => ranged(value, &OFFSET_RANGE_V).map(Command::SetDdsOffset),
        "SCO" => ranged(value, &OFFSET_RANGE_V).map(Command::SetSignalChainOffset),
        "SCA" => ranged(value, &SIGNAL_CHAIN_GAIN_RANGE).map(Command::SetSignalChainAmplification),
        "M" => mux(value).map(Command::SetMux),
        _ => indexed(token, value),
    }
}

/// `P{1,2}:` and `D{0..3}:`
fn indexed(token: &str, value: &str) -> Result<Command, CommandError> {
    let mut chars = token.chars();
    let (Some(kind), Some(index), None) = (chars.next(), chars.next(), chars.next()) else {
        return Err(CommandError::Unrecognized);
    };
    let index = index
        .to_digit(10)
        .and_then(|d| u8::try_from(d).ok())
        .ok_or(CommandError::Unrecognized)?;

    match kind {
        'P' => {
            let stage = PgaStage::from_number(index).ok_or(CommandError::Unrecognized)?;
            let setting = bounded(value, PGA_SETTING_MAX)?;
            Ok(Command::ConfigurePga { stage, setting })
        }
        'D' if index <= DIGIPOT_CHANNEL_MAX => {
            let wiper = bounded(value, u8::MAX)?;
            Ok(Command::SetDigipot { channel: index, wiper })
        }
        _ => Err(CommandError::Unrecognized),
    }
}

fn trim_terminators(raw: &[u8]) -> &[u8] {
    let end = raw
        .iter()
        .rposition(|b| !matches!(b, b'\0' | b'\r' | b'\n'))
        .map_or(0, |i| i.saturating_add(1));
    raw.get(..end).unwrap_or_default()
}

fn number<T: FromStr>(value: &str) -> Result<T, CommandError> {
    value.parse().map_err(|_| CommandError::Malformed)
}

fn float(value: &str) -> Result<f32, CommandError> {
    let v: f32 = number(value)?;
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CommandError::OutOfRange)
    }
}

fn ranged(value: &str, range: &core::ops::RangeInclusive<f32>) -> Result<f32, CommandError> {
    let v = float(value)?;
    if range.contains(&v) {
        Ok(v)
    } else {
        Err(CommandError::OutOfRange)
    }
}

fn bounded(value: &str, max: u8) -> Result<u8, CommandError> {
    let v: u32 = number(value)?;
    u8::try_from(v)
        .ok()
        .filter(|v| *v <= max)
        .ok_or(CommandError::OutOfRange)
}

fn mux(value: &str) -> Result<u8, CommandError> {
    let mut chars = value.chars();
    let (Some(c), None) = (chars.next(), chars.next()) else {
        return Err(CommandError::Malformed);
    };
    let digit = c.to_digit(10).ok_or(CommandError::Malformed)?;
    u8::try_from(digit)
        .ok()
        .filter(|d| *d <= MUX_MAX)
        .ok_or(CommandError::OutOfRange)
}
