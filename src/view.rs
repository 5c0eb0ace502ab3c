//! Field-granular volatile access over a mapped `RobotIoState` region.
//!
//! The crate does not map shared memory itself; the process that owns the
//! segment hands [`IoStateView`] the mapped bytes. Every accessor is a
//! single volatile load or store at the field's frozen offset, so the
//! compiler never caches a value across polls and never widens an access
//! beyond one field. Reads and writes of an individual field are therefore
//! exactly as atomic as the hardware makes a 1- or 2-byte access.
//!
//! There is no synchronization between fields: a multi-field snapshot taken
//! while the peer process is writing may be torn. The embedding system's
//! heartbeat/staleness discipline governs whether that matters.

use crate::error::{LayoutError, LayoutResult};
use crate::layout::{
    offsets, RobotIoState, ANALOG_COUNT, BUILTIN_DIO_COUNT, PWM_COUNT, STATE_ALIGN, STATE_SIZE,
};
use core::marker::PhantomData;
use core::ptr;

/// Volatile view over an externally mapped `RobotIoState` region.
///
/// Accessors take `&self`: the underlying bytes are shared with another
/// process regardless, so interior mutability through the raw base pointer
/// is the honest model. Within one process the view still holds the
/// region's borrow for its lifetime.
pub struct IoStateView<'a> {
    base: *mut u8,
    _region: PhantomData<&'a mut [u8]>,
}

impl<'a> IoStateView<'a> {
    /// Create a view over a mapped byte region.
    ///
    /// The region must be exactly [`STATE_SIZE`] bytes and its base must be
    /// [`STATE_ALIGN`]-aligned (any page-aligned mapping satisfies this).
    pub fn new(region: &'a mut [u8]) -> LayoutResult<Self> {
        if region.len() != STATE_SIZE {
            return Err(LayoutError::SizeMismatch {
                expected: STATE_SIZE,
                actual: region.len(),
            });
        }
        let base = region.as_mut_ptr();
        Self::check_alignment(base as usize)?;
        tracing::trace!(base = base as usize, "attached I/O state view");
        Ok(Self {
            base,
            _region: PhantomData,
        })
    }

    /// Create a view over an owned record.
    ///
    /// Infallible: the record's own size and alignment satisfy the layout
    /// by construction. Useful for in-process loopback and simulation
    /// backends that never leave the local address space.
    pub fn over(state: &'a mut RobotIoState) -> Self {
        Self {
            base: (state as *mut RobotIoState).cast::<u8>(),
            _region: PhantomData,
        }
    }

    /// Create a view from a raw base pointer.
    ///
    /// For callers that only hold a pointer into their mapping. The
    /// alignment check still runs; everything else is on the caller.
    ///
    /// # Safety
    ///
    /// `base` must be non-null and point to a region of at least
    /// [`STATE_SIZE`] bytes that is readable and writable for the lifetime
    /// `'a`, with no `&`/`&mut` references into it held elsewhere in this
    /// process.
    pub unsafe fn from_raw(base: *mut u8) -> LayoutResult<Self> {
        Self::check_alignment(base as usize)?;
        tracing::trace!(base = base as usize, "attached I/O state view (raw)");
        Ok(Self {
            base,
            _region: PhantomData,
        })
    }

    fn check_alignment(address: usize) -> LayoutResult<()> {
        if address % STATE_ALIGN != 0 {
            return Err(LayoutError::Misaligned {
                address,
                alignment: STATE_ALIGN,
            });
        }
        Ok(())
    }

    // ─── Raw volatile primitives ────────────────────────────────────

    #[inline]
    fn load_u8(&self, offset: usize) -> u8 {
        // SAFETY: offset is one of the frozen field offsets, all < STATE_SIZE;
        // the constructor guaranteed the region covers STATE_SIZE bytes.
        unsafe { ptr::read_volatile(self.base.add(offset)) }
    }

    #[inline]
    fn store_u8(&self, offset: usize, value: u8) {
        // SAFETY: as in load_u8.
        unsafe { ptr::write_volatile(self.base.add(offset), value) }
    }

    #[inline]
    fn load_u16(&self, offset: usize) -> u16 {
        // SAFETY: as in load_u8; 16-bit field offsets are even and the base
        // is 2-byte aligned, so the access is aligned.
        unsafe { ptr::read_volatile(self.base.add(offset).cast::<u16>()) }
    }

    #[inline]
    fn store_u16(&self, offset: usize, value: u16) {
        // SAFETY: as in load_u16.
        unsafe { ptr::write_volatile(self.base.add(offset).cast::<u16>(), value) }
    }

    #[inline]
    fn load_i16(&self, offset: usize) -> i16 {
        self.load_u16(offset) as i16
    }

    #[inline]
    fn store_i16(&self, offset: usize, value: i16) {
        self.store_u16(offset, value as u16);
    }

    // Boolean bytes are read as u8 and compared against zero so a peer that
    // stored a nonzero-but-not-1 byte can never materialize an invalid
    // `bool` in this process. Writes only ever store 0 or 1.
    #[inline]
    fn load_bool(&self, offset: usize) -> bool {
        self.load_u8(offset) != 0
    }

    #[inline]
    fn store_bool(&self, offset: usize, value: bool) {
        self.store_u8(offset, value as u8);
    }

    // ─── Field accessors ────────────────────────────────────────────

    /// Read the heartbeat flag.
    #[inline]
    pub fn heartbeat(&self) -> bool {
        self.load_bool(offsets::HEARTBEAT)
    }

    /// Write the heartbeat flag.
    #[inline]
    pub fn set_heartbeat(&self, value: bool) {
        self.store_bool(offsets::HEARTBEAT, value);
    }

    /// Read the built-in I/O configuration selector.
    #[inline]
    pub fn builtin_config(&self) -> u8 {
        self.load_u8(offsets::BUILTIN_CONFIG)
    }

    /// Write the built-in I/O configuration selector.
    #[inline]
    pub fn set_builtin_config(&self, value: u8) {
        self.store_u8(offsets::BUILTIN_CONFIG, value);
    }

    /// Read built-in DIO line `ch` (0..[`BUILTIN_DIO_COUNT`]).
    #[inline]
    pub fn builtin_dio(&self, ch: usize) -> bool {
        debug_assert!(ch < BUILTIN_DIO_COUNT, "builtin DIO channel {ch} out of range");
        self.load_bool(offsets::BUILTIN_DIO_VALUES + ch)
    }

    /// Write built-in DIO line `ch` (0..[`BUILTIN_DIO_COUNT`]).
    #[inline]
    pub fn set_builtin_dio(&self, ch: usize, value: bool) {
        debug_assert!(ch < BUILTIN_DIO_COUNT, "builtin DIO channel {ch} out of range");
        self.store_bool(offsets::BUILTIN_DIO_VALUES + ch, value);
    }

    /// Read the DIO-8 direction flag (true = input).
    #[inline]
    pub fn dio8_input(&self) -> bool {
        self.load_bool(offsets::DIO8_INPUT)
    }

    /// Write the DIO-8 direction flag.
    #[inline]
    pub fn set_dio8_input(&self, value: bool) {
        self.store_bool(offsets::DIO8_INPUT, value);
    }

    /// Read the DIO-8 value.
    #[inline]
    pub fn dio8_value(&self) -> bool {
        self.load_bool(offsets::DIO8_VALUE)
    }

    /// Write the DIO-8 value.
    #[inline]
    pub fn set_dio8_value(&self, value: bool) {
        self.store_bool(offsets::DIO8_VALUE, value);
    }

    /// Read analog input `ch` (0..[`ANALOG_COUNT`]).
    #[inline]
    pub fn analog(&self, ch: usize) -> u16 {
        debug_assert!(ch < ANALOG_COUNT, "analog channel {ch} out of range");
        self.load_u16(offsets::ANALOG + 2 * ch)
    }

    /// Write analog input `ch` (0..[`ANALOG_COUNT`]).
    #[inline]
    pub fn set_analog(&self, ch: usize, value: u16) {
        debug_assert!(ch < ANALOG_COUNT, "analog channel {ch} out of range");
        self.store_u16(offsets::ANALOG + 2 * ch, value);
    }

    /// Read PWM command `ch` (0..[`PWM_COUNT`]).
    #[inline]
    pub fn pwm(&self, ch: usize) -> i16 {
        debug_assert!(ch < PWM_COUNT, "PWM channel {ch} out of range");
        self.load_i16(offsets::PWM + 2 * ch)
    }

    /// Write PWM command `ch` (0..[`PWM_COUNT`]).
    #[inline]
    pub fn set_pwm(&self, ch: usize, value: i16) {
        debug_assert!(ch < PWM_COUNT, "PWM channel {ch} out of range");
        self.store_i16(offsets::PWM + 2 * ch, value);
    }

    /// Read the battery voltage in millivolts.
    #[inline]
    pub fn battery_millivolts(&self) -> u16 {
        self.load_u16(offsets::BATTERY_MILLIVOLTS)
    }

    /// Write the battery voltage in millivolts.
    #[inline]
    pub fn set_battery_millivolts(&self, value: u16) {
        self.store_u16(offsets::BATTERY_MILLIVOLTS, value);
    }

    /// Read the left-encoder reset request.
    #[inline]
    pub fn reset_left_encoder(&self) -> bool {
        self.load_bool(offsets::RESET_LEFT_ENCODER)
    }

    /// Write the left-encoder reset request.
    #[inline]
    pub fn set_reset_left_encoder(&self, value: bool) {
        self.store_bool(offsets::RESET_LEFT_ENCODER, value);
    }

    /// Read the right-encoder reset request.
    #[inline]
    pub fn reset_right_encoder(&self) -> bool {
        self.load_bool(offsets::RESET_RIGHT_ENCODER)
    }

    /// Write the right-encoder reset request.
    #[inline]
    pub fn set_reset_right_encoder(&self, value: bool) {
        self.store_bool(offsets::RESET_RIGHT_ENCODER, value);
    }

    /// Read the left encoder tick count.
    #[inline]
    pub fn left_encoder(&self) -> i16 {
        self.load_i16(offsets::LEFT_ENCODER)
    }

    /// Write the left encoder tick count.
    #[inline]
    pub fn set_left_encoder(&self, value: i16) {
        self.store_i16(offsets::LEFT_ENCODER, value);
    }

    /// Read the right encoder tick count.
    #[inline]
    pub fn right_encoder(&self) -> i16 {
        self.load_i16(offsets::RIGHT_ENCODER)
    }

    /// Write the right encoder tick count.
    #[inline]
    pub fn set_right_encoder(&self, value: i16) {
        self.store_i16(offsets::RIGHT_ENCODER, value);
    }

    // ─── Whole-record transfer ──────────────────────────────────────

    /// Copy the current field values out into an owned record.
    ///
    /// Field-by-field volatile reads; boolean bytes are normalized, so the
    /// result is always a valid record. The snapshot is NOT atomic across
    /// fields: a concurrent peer write can land between two reads.
    pub fn snapshot(&self) -> RobotIoState {
        RobotIoState {
            heartbeat: self.heartbeat(),
            builtin_config: self.builtin_config(),
            builtin_dio_values: core::array::from_fn(|ch| self.builtin_dio(ch)),
            dio8_input: self.dio8_input(),
            dio8_value: self.dio8_value(),
            analog: core::array::from_fn(|ch| self.analog(ch)),
            pwm: core::array::from_fn(|ch| self.pwm(ch)),
            battery_millivolts: self.battery_millivolts(),
            reset_left_encoder: self.reset_left_encoder(),
            reset_right_encoder: self.reset_right_encoder(),
            left_encoder: self.left_encoder(),
            right_encoder: self.right_encoder(),
        }
    }

    /// Copy an owned record into the region, field by field.
    ///
    /// Same non-atomicity caveat as [`snapshot`](Self::snapshot).
    pub fn store(&self, state: &RobotIoState) {
        self.set_heartbeat(state.heartbeat);
        self.set_builtin_config(state.builtin_config);
        for (ch, &value) in state.builtin_dio_values.iter().enumerate() {
            self.set_builtin_dio(ch, value);
        }
        self.set_dio8_input(state.dio8_input);
        self.set_dio8_value(state.dio8_value);
        for (ch, &value) in state.analog.iter().enumerate() {
            self.set_analog(ch, value);
        }
        for (ch, &value) in state.pwm.iter().enumerate() {
            self.set_pwm(ch, value);
        }
        self.set_battery_millivolts(state.battery_millivolts);
        self.set_reset_left_encoder(state.reset_left_encoder);
        self.set_reset_right_encoder(state.reset_right_encoder);
        self.set_left_encoder(state.left_encoder);
        self.set_right_encoder(state.right_encoder);
    }
}
