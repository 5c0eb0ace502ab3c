//! # Romi shared-memory I/O layout
//!
//! Fixed binary layout of the I/O record exchanged between the robot
//! control framework and the hardware/simulation backend of the Romi
//! control bridge. Both processes map the same named shared-memory segment
//! and access this record in place, with no serialization step, so the
//! record is a cross-process wire format: the layout defined here is frozen
//! and byte-identical to the C struct generated for the firmware side.
//!
//! The crate is deliberately passive. It defines shape and safe access to
//! that shape, nothing more:
//!
//! - [`RobotIoState`] is the 28-byte `#[repr(C)]` record, with per-field
//!   offset constants in [`layout::offsets`] and compile-time assertions
//!   pinning every offset, the total size, and the alignment.
//! - [`IoStateView`] gives field-granular volatile access over a region the
//!   caller has already mapped.
//! - [`RobotIoState::read_from`] / [`RobotIoState::write_to`] convert
//!   between owned records and raw byte images, rejecting images whose
//!   boolean bytes are not 0/1.
//!
//! ## What this crate does NOT do
//!
//! Allocating, mapping, and releasing the shared-memory segment, the
//! producer/consumer synchronization protocol, and the transport feeding
//! the backend all live in the embedding system. In particular the record
//! carries a `heartbeat` flag but no staleness policy: one side flips it
//! periodically and the peer decides what "stale" means. Individual field
//! accesses through [`IoStateView`] are volatile and at most 2 bytes wide,
//! so per-field reads are never torn on mainstream hardware, but nothing
//! orders one field against another. Callers that need a consistent
//! multi-field snapshot must impose their own discipline.
//!
//! ## Usage
//!
//! ```rust
//! use romi_shmem::{IoStateView, RobotIoState};
//!
//! // The region normally comes from the process's shared-memory mapping
//! // (via `IoStateView::new`); an owned record stands in here.
//! let mut record = RobotIoState::default();
//! let view = IoStateView::over(&mut record);
//!
//! // Control side: command the motors, request an encoder reset.
//! view.set_pwm(0, 400);
//! view.set_pwm(1, -400);
//! view.set_reset_left_encoder(true);
//!
//! // Backend side: publish sensor state.
//! view.set_battery_millivolts(9123);
//! view.set_analog(0, 512);
//!
//! assert_eq!(view.pwm(0), 400);
//! let snapshot: RobotIoState = view.snapshot();
//! assert_eq!(snapshot.battery_millivolts, 9123);
//! ```

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod layout;
pub mod view;

pub use error::{LayoutError, LayoutResult};
pub use layout::{
    offsets, RobotIoState, ANALOG_COUNT, BUILTIN_DIO_COUNT, PWM_COUNT, STATE_ALIGN, STATE_SIZE,
};
pub use view::IoStateView;
