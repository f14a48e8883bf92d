//! Segment codes for the 5 digit displays.
//!
//! A display is 5 bytes, leftmost digit first. Digits are `0x00..=0x09`,
//! `BLANK` is an empty digit and `DECIMAL_POINT` is ORed onto a digit to
//! light the point after it. The minus sign differs between panel types
//! and is carried by [`SegmentStyle`].
use crate::error::ValidationError;

pub const DIGITS: usize = 5;
pub const BLANK: u8 = 0x0f;
/// Written to every digit by `display_off`.
pub const OFF: u8 = 0xff;
pub const DECIMAL_POINT: u8 = 0xd0;
pub const MAX_DECIMALS: u32 = 5;
/// Largest magnitude of the scaled value.
pub const MAX_MAGNITUDE: f64 = 99_999.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SegmentStyle {
    pub minus: u8,
    pub decimal_point: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Slot {
    /// `None` keeps whatever the display currently shows.
    code: Option<u8>,
    point: bool,
}

impl Slot {
    const BLANK: Slot = Slot {
        code: Some(BLANK),
        point: false,
    };
}

/// The encoded form of a string, ready to be applied over a display region.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SegmentText {
    slots: [Slot; DIGITS],
}

impl SegmentText {
    /// Writes the text over `region`. Positions holding characters the
    /// display cannot show are left as they are, so a display can be
    /// updated piecewise.
    pub fn apply(&self, region: &mut [u8]) {
        for (byte, slot) in region.iter_mut().zip(self.slots.iter()) {
            let mask = if slot.point { DECIMAL_POINT } else { 0 };
            match slot.code {
                Some(code) => *byte = code | mask,
                None if takes_point(*byte) => *byte |= mask,
                None => {}
            }
        }
    }

    /// The text applied over a blank display.
    pub fn to_bytes(&self) -> [u8; DIGITS] {
        let mut bytes = [BLANK; DIGITS];
        self.apply(&mut bytes);
        bytes
    }

    /// Whether every position is written, i.e. applying the text does not
    /// depend on what the display showed before.
    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(|s| s.code.is_some())
    }
}

/// Whether the point can be lit on `code`. Minus codes already use the
/// point bits (the radio's minus with a point would read as `OFF`).
fn takes_point(code: u8) -> bool {
    code & DECIMAL_POINT == 0
}

/// Encodes `text` right aligned into 5 digits.
///
/// Digits, space and `-` take one position each. `.` lights the point of
/// the previous position; a `.` with nothing before it, following another
/// `.` or following a `-` gets a blank position of its own. Any other character
/// takes a position that is left unchanged. Text beyond 5 positions is cut
/// off.
pub fn encode_string(text: &str, style: SegmentStyle) -> SegmentText {
    let mut slots: Vec<Slot> = Vec::with_capacity(DIGITS);
    for c in text.chars() {
        if c == '.' && style.decimal_point {
            match slots.last_mut() {
                Some(last) if !last.point && last.code.map_or(true, takes_point) => {
                    last.point = true;
                    continue;
                }
                _ => {
                    if slots.len() == DIGITS {
                        break;
                    }
                    slots.push(Slot {
                        code: Some(BLANK),
                        point: true,
                    });
                    continue;
                }
            }
        }
        if slots.len() == DIGITS {
            break;
        }
        slots.push(Slot {
            code: char_code(c, style),
            point: false,
        });
    }

    let mut out = [Slot::BLANK; DIGITS];
    out[DIGITS - slots.len()..].copy_from_slice(&slots);
    SegmentText { slots: out }
}

fn char_code(c: char, style: SegmentStyle) -> Option<u8> {
    match c {
        '0'..='9' => Some(c as u8 - b'0'),
        ' ' => Some(BLANK),
        '-' => Some(style.minus),
        _ => None,
    }
}

/// Encodes `value` with `decimals` digits after the point.
///
/// The value is rounded to the shown precision. Blank positions pad the
/// left, the sign sits directly before the first digit, and enough zeros
/// are shown for the point to have a digit before it. When the units digit
/// does not fit (5 decimals, or 4 decimals with a sign) the point is left
/// out and the scaled digits fill the remaining positions.
///
/// The scaled magnitude is bounded by 99999 on both sides, but a negative
/// value whose scaled digits need all five positions leaves no room for the
/// sign and is rejected, so at 0 decimals the usable range is
/// `-9999..=99999`.
pub fn encode_number(
    value: f64,
    decimals: u32,
    style: SegmentStyle,
) -> Result<[u8; DIGITS], ValidationError> {
    if decimals > MAX_DECIMALS {
        return Err(ValidationError::DecimalsOutOfRange(decimals));
    }
    if decimals > 0 && !style.decimal_point {
        return Err(ValidationError::DecimalsOutOfRange(decimals));
    }
    if !value.is_finite() {
        return Err(ValidationError::NotFinite);
    }

    let scaled = (value * 10f64.powi(decimals as i32)).round();
    if scaled.abs() > MAX_MAGNITUDE {
        return Err(ValidationError::ValueOutOfRange(value));
    }

    let text = format_scaled(scaled as i64, decimals as usize);
    // A negative value using all five digits has no room for its sign.
    if text.chars().filter(|&c| c != '.').count() > DIGITS {
        return Err(ValidationError::ValueOutOfRange(value));
    }
    Ok(encode_string(&text, style).to_bytes())
}

pub fn encode_int(value: i64, style: SegmentStyle) -> Result<[u8; DIGITS], ValidationError> {
    encode_number(value as f64, 0, style)
}

fn format_scaled(scaled: i64, decimals: usize) -> String {
    let sign = if scaled < 0 { "-" } else { "" };
    let room = DIGITS - sign.len();
    let digits = scaled.unsigned_abs();
    if decimals > 0 && decimals < room {
        let padded = format!("{:0>width$}", digits, width = decimals + 1);
        let (int, frac) = padded.split_at(padded.len() - decimals);
        format!("{}{}.{}", sign, int, frac)
    } else {
        let width = if decimals == 0 { 1 } else { room };
        format!("{}{:0>width$}", sign, digits, width = width)
    }
}
