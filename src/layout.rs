//! The `RobotIoState` record and its frozen binary layout.
//!
//! This struct is the PAYLOAD of the Romi bridge shared-memory segment. Two
//! independent processes (the robot control runtime and the hardware or
//! simulation backend) map the same region and read/write fields directly,
//! so the layout is a cross-process wire format: field order, widths,
//! signedness, and offsets must stay byte-identical to the C `struct Data`
//! produced by the firmware's `gen-shmem` generator.
//!
//! `#[repr(C)]` with natural alignment. Fixed-size primitive fields only,
//! no padding anywhere (verified by the const assertions below).
//!
//! ## Layout
//!
//! | field                 | type        | offset | size |
//! |-----------------------|-------------|--------|------|
//! | `heartbeat`           | `bool`      | 0      | 1    |
//! | `builtin_config`      | `u8`        | 1      | 1    |
//! | `builtin_dio_values`  | `[bool; 4]` | 2      | 4    |
//! | `dio8_input`          | `bool`      | 6      | 1    |
//! | `dio8_value`          | `bool`      | 7      | 1    |
//! | `analog`              | `[u16; 2]`  | 8      | 4    |
//! | `pwm`                 | `[i16; 4]`  | 12     | 8    |
//! | `battery_millivolts`  | `u16`       | 20     | 2    |
//! | `reset_left_encoder`  | `bool`      | 22     | 1    |
//! | `reset_right_encoder` | `bool`      | 23     | 1    |
//! | `left_encoder`        | `i16`       | 24     | 2    |
//! | `right_encoder`       | `i16`       | 26     | 2    |
//!
//! Total: 28 bytes, alignment 2, host-native byte order.

use crate::error::{LayoutError, LayoutResult};
use serde::{Deserialize, Serialize};
use static_assertions::{const_assert, const_assert_eq};

// ─── Channel counts ─────────────────────────────────────────────────

/// Number of built-in digital I/O lines.
pub const BUILTIN_DIO_COUNT: usize = 4;

/// Number of analog input channels.
pub const ANALOG_COUNT: usize = 2;

/// Number of PWM output channels.
pub const PWM_COUNT: usize = 4;

/// Total record size in bytes.
pub const STATE_SIZE: usize = core::mem::size_of::<RobotIoState>();

/// Record alignment in bytes (widest field is 2 bytes).
pub const STATE_ALIGN: usize = core::mem::align_of::<RobotIoState>();

// ─── Record ─────────────────────────────────────────────────────────

/// Romi bridge I/O state, laid out for shared-memory placement.
///
/// This is pure shape: no field is range-validated here and no
/// synchronization is provided. Concurrent cross-process access requires an
/// externally defined discipline (heartbeat staleness checks, tolerating
/// torn multi-field snapshots, or an imposed lock). See the crate docs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[repr(C)]
pub struct RobotIoState {
    /// Liveness toggle, flipped periodically by one side. Timeout and
    /// ownership policy belong to the embedding system, not this record.
    pub heartbeat: bool,
    /// Configuration mode selector for the built-in I/O lines.
    pub builtin_config: u8,
    /// State of the 4 built-in digital I/O lines.
    pub builtin_dio_values: [bool; BUILTIN_DIO_COUNT],
    /// Direction flag for DIO line 8 (true = input).
    pub dio8_input: bool,
    /// Value of DIO line 8.
    pub dio8_value: bool,
    /// Analog input readings, raw counts.
    pub analog: [u16; ANALOG_COUNT],
    /// PWM output commands, signed to carry direction.
    pub pwm: [i16; PWM_COUNT],
    /// Battery voltage in millivolts.
    pub battery_millivolts: u16,
    /// One-shot request to zero the left encoder count.
    pub reset_left_encoder: bool,
    /// One-shot request to zero the right encoder count.
    pub reset_right_encoder: bool,
    /// Left wheel encoder tick count.
    pub left_encoder: i16,
    /// Right wheel encoder tick count.
    pub right_encoder: i16,
}

// ─── Field offsets ──────────────────────────────────────────────────

/// Byte offset of every field, for cross-language agreement checks and for
/// the volatile accessors in [`crate::view`].
pub mod offsets {
    use super::RobotIoState;
    use core::mem::offset_of;

    /// Offset of `heartbeat`.
    pub const HEARTBEAT: usize = offset_of!(RobotIoState, heartbeat);
    /// Offset of `builtin_config`.
    pub const BUILTIN_CONFIG: usize = offset_of!(RobotIoState, builtin_config);
    /// Offset of `builtin_dio_values[0]`.
    pub const BUILTIN_DIO_VALUES: usize = offset_of!(RobotIoState, builtin_dio_values);
    /// Offset of `dio8_input`.
    pub const DIO8_INPUT: usize = offset_of!(RobotIoState, dio8_input);
    /// Offset of `dio8_value`.
    pub const DIO8_VALUE: usize = offset_of!(RobotIoState, dio8_value);
    /// Offset of `analog[0]`.
    pub const ANALOG: usize = offset_of!(RobotIoState, analog);
    /// Offset of `pwm[0]`.
    pub const PWM: usize = offset_of!(RobotIoState, pwm);
    /// Offset of `battery_millivolts`.
    pub const BATTERY_MILLIVOLTS: usize = offset_of!(RobotIoState, battery_millivolts);
    /// Offset of `reset_left_encoder`.
    pub const RESET_LEFT_ENCODER: usize = offset_of!(RobotIoState, reset_left_encoder);
    /// Offset of `reset_right_encoder`.
    pub const RESET_RIGHT_ENCODER: usize = offset_of!(RobotIoState, reset_right_encoder);
    /// Offset of `left_encoder`.
    pub const LEFT_ENCODER: usize = offset_of!(RobotIoState, left_encoder);
    /// Offset of `right_encoder`.
    pub const RIGHT_ENCODER: usize = offset_of!(RobotIoState, right_encoder);
}

/// Offsets of every boolean byte in the record, in ascending order.
/// Used by [`RobotIoState::read_from`] to validate raw images before a
/// `bool` is ever materialized.
pub(crate) const BOOL_OFFSETS: [usize; 9] = [
    offsets::HEARTBEAT,
    offsets::BUILTIN_DIO_VALUES,
    offsets::BUILTIN_DIO_VALUES + 1,
    offsets::BUILTIN_DIO_VALUES + 2,
    offsets::BUILTIN_DIO_VALUES + 3,
    offsets::DIO8_INPUT,
    offsets::DIO8_VALUE,
    offsets::RESET_LEFT_ENCODER,
    offsets::RESET_RIGHT_ENCODER,
];

// ─── Layout pins ────────────────────────────────────────────────────
//
// Any drift in field order, widths, or alignment must fail compilation.
// The expected values match the C `struct Data` under natural alignment.

const_assert_eq!(STATE_SIZE, 28);
const_assert_eq!(STATE_ALIGN, 2);
const_assert!(STATE_SIZE % STATE_ALIGN == 0);

const _: () = assert!(offsets::HEARTBEAT == 0);
const _: () = assert!(offsets::BUILTIN_CONFIG == 1);
const _: () = assert!(offsets::BUILTIN_DIO_VALUES == 2);
const _: () = assert!(offsets::DIO8_INPUT == 6);
const _: () = assert!(offsets::DIO8_VALUE == 7);
const _: () = assert!(offsets::ANALOG == 8);
const _: () = assert!(offsets::PWM == 12);
const _: () = assert!(offsets::BATTERY_MILLIVOLTS == 20);
const _: () = assert!(offsets::RESET_LEFT_ENCODER == 22);
const _: () = assert!(offsets::RESET_RIGHT_ENCODER == 23);
const _: () = assert!(offsets::LEFT_ENCODER == 24);
const _: () = assert!(offsets::RIGHT_ENCODER == 26);

// No padding: every byte of the record belongs to a field.
const _: () = assert!(
    STATE_SIZE
        == 1 + 1
            + BUILTIN_DIO_COUNT
            + 1
            + 1
            + 2 * ANALOG_COUNT
            + 2 * PWM_COUNT
            + 2
            + 1
            + 1
            + 2
            + 2
);

// ─── Byte conversion ────────────────────────────────────────────────

impl RobotIoState {
    /// View the record as its raw byte image.
    pub fn as_bytes(&self) -> &[u8; STATE_SIZE] {
        // SAFETY: repr(C) with no padding (pinned above), so all STATE_SIZE
        // bytes are initialized field bytes. bool fields are single 0/1
        // bytes by Rust's layout guarantee.
        unsafe { &*(self as *const Self as *const [u8; STATE_SIZE]) }
    }

    /// Decode a record from a raw byte image.
    ///
    /// The image must be exactly [`STATE_SIZE`] bytes and every boolean
    /// byte must be 0 or 1; a foreign writer that stored anything else has
    /// broken the contract and the image is rejected rather than turned
    /// into an invalid `bool`.
    pub fn read_from(bytes: &[u8]) -> LayoutResult<Self> {
        if bytes.len() != STATE_SIZE {
            return Err(LayoutError::SizeMismatch {
                expected: STATE_SIZE,
                actual: bytes.len(),
            });
        }

        for offset in BOOL_OFFSETS {
            let value = bytes[offset];
            if value > 1 {
                tracing::warn!(offset, value, "rejecting image with invalid boolean byte");
                return Err(LayoutError::InvalidBool { offset, value });
            }
        }

        let mut state = Self::default();
        // SAFETY: length checked, boolean bytes validated, and every other
        // field is an integer type for which any bit pattern is valid.
        unsafe {
            core::ptr::copy_nonoverlapping(
                bytes.as_ptr(),
                (&mut state as *mut Self).cast::<u8>(),
                STATE_SIZE,
            );
        }
        Ok(state)
    }

    /// Encode the record into a caller-provided byte region.
    ///
    /// The region must be exactly [`STATE_SIZE`] bytes.
    pub fn write_to(&self, bytes: &mut [u8]) -> LayoutResult<()> {
        if bytes.len() != STATE_SIZE {
            return Err(LayoutError::SizeMismatch {
                expected: STATE_SIZE,
                actual: bytes.len(),
            });
        }
        bytes.copy_from_slice(self.as_bytes());
        Ok(())
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
