//! Cross-implementation layout compatibility tests.
//!
//! The byte images here are assembled by hand, directly from the documented
//! offset table, so they stand in for a second independent implementation
//! of the layout (the C firmware side) writing into the shared region.

use proptest::prelude::*;
use romi_shmem::{offsets, IoStateView, LayoutError, RobotIoState, STATE_SIZE};

fn init_logs() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}

/// Byte buffer carrying the record's alignment, for view-based tests.
#[repr(C, align(2))]
struct Aligned([u8; STATE_SIZE]);

/// Assemble a byte image the way the firmware side would: raw stores at the
/// agreed offsets, host-native byte order for the 16-bit fields.
fn firmware_image() -> [u8; STATE_SIZE] {
    let mut img = [0u8; STATE_SIZE];
    img[offsets::HEARTBEAT] = 1;
    img[offsets::BUILTIN_CONFIG] = 0x2A;
    img[offsets::BUILTIN_DIO_VALUES] = 1;
    img[offsets::BUILTIN_DIO_VALUES + 1] = 0;
    img[offsets::BUILTIN_DIO_VALUES + 2] = 0;
    img[offsets::BUILTIN_DIO_VALUES + 3] = 1;
    img[offsets::DIO8_INPUT] = 0;
    img[offsets::DIO8_VALUE] = 1;
    img[offsets::ANALOG..offsets::ANALOG + 2].copy_from_slice(&1023u16.to_ne_bytes());
    img[offsets::ANALOG + 2..offsets::ANALOG + 4].copy_from_slice(&u16::MAX.to_ne_bytes());
    img[offsets::PWM..offsets::PWM + 2].copy_from_slice(&i16::MIN.to_ne_bytes());
    img[offsets::PWM + 2..offsets::PWM + 4].copy_from_slice(&(-1i16).to_ne_bytes());
    img[offsets::PWM + 4..offsets::PWM + 6].copy_from_slice(&0i16.to_ne_bytes());
    img[offsets::PWM + 6..offsets::PWM + 8].copy_from_slice(&i16::MAX.to_ne_bytes());
    img[offsets::BATTERY_MILLIVOLTS..offsets::BATTERY_MILLIVOLTS + 2]
        .copy_from_slice(&9123u16.to_ne_bytes());
    img[offsets::RESET_LEFT_ENCODER] = 0;
    img[offsets::RESET_RIGHT_ENCODER] = 1;
    img[offsets::LEFT_ENCODER..offsets::LEFT_ENCODER + 2]
        .copy_from_slice(&(-12345i16).to_ne_bytes());
    img[offsets::RIGHT_ENCODER..offsets::RIGHT_ENCODER + 2]
        .copy_from_slice(&12345i16.to_ne_bytes());
    img
}

#[test]
fn decodes_firmware_image_field_for_field() {
    init_logs();
    let state = RobotIoState::read_from(&firmware_image()).unwrap();

    assert!(state.heartbeat);
    assert_eq!(state.builtin_config, 0x2A);
    assert_eq!(state.builtin_dio_values, [true, false, false, true]);
    assert!(!state.dio8_input);
    assert!(state.dio8_value);
    assert_eq!(state.analog, [1023, u16::MAX]);
    assert_eq!(state.pwm, [i16::MIN, -1, 0, i16::MAX]);
    assert_eq!(state.battery_millivolts, 9123);
    assert!(!state.reset_left_encoder);
    assert!(state.reset_right_encoder);
    assert_eq!(state.left_encoder, -12345);
    assert_eq!(state.right_encoder, 12345);
}

#[test]
fn view_and_owned_decode_agree_on_firmware_image() {
    let mut img = Aligned(firmware_image());
    let owned = RobotIoState::read_from(&img.0).unwrap();
    let view = IoStateView::new(&mut img.0).unwrap();
    assert_eq!(view.snapshot(), owned);
}

#[test]
fn encoded_image_matches_firmware_image() {
    // The Rust side writing the same values must emit the same bytes the
    // firmware side would.
    let state = RobotIoState {
        heartbeat: true,
        builtin_config: 0x2A,
        builtin_dio_values: [true, false, false, true],
        dio8_input: false,
        dio8_value: true,
        analog: [1023, u16::MAX],
        pwm: [i16::MIN, -1, 0, i16::MAX],
        battery_millivolts: 9123,
        reset_left_encoder: false,
        reset_right_encoder: true,
        left_encoder: -12345,
        right_encoder: 12345,
    };

    let mut img = [0u8; STATE_SIZE];
    state.write_to(&mut img).unwrap();
    assert_eq!(img, firmware_image());
}

#[test]
fn full_range_boundary_values() {
    let mut record = RobotIoState::default();
    let view = IoStateView::over(&mut record);

    for value in [i16::MIN, -1, 0, 1, i16::MAX] {
        for ch in 0..4 {
            view.set_pwm(ch, value);
            assert_eq!(view.pwm(ch), value);
        }
        view.set_left_encoder(value);
        view.set_right_encoder(value);
        assert_eq!(view.left_encoder(), value);
        assert_eq!(view.right_encoder(), value);
    }

    for value in [0u16, 1, u16::MAX] {
        for ch in 0..2 {
            view.set_analog(ch, value);
            assert_eq!(view.analog(ch), value);
        }
        view.set_battery_millivolts(value);
        assert_eq!(view.battery_millivolts(), value);
    }
}

#[test]
fn rejects_image_with_out_of_contract_bool() {
    let mut img = firmware_image();
    img[offsets::HEARTBEAT] = 0x7F;
    assert_eq!(
        RobotIoState::read_from(&img),
        Err(LayoutError::InvalidBool {
            offset: offsets::HEARTBEAT,
            value: 0x7F
        })
    );
}

#[test]
fn diagnostic_dump_is_valid_json() {
    let state = RobotIoState::read_from(&firmware_image()).unwrap();
    let json = serde_json::to_string(&state).unwrap();
    let back: RobotIoState = serde_json::from_str(&json).unwrap();
    assert_eq!(back, state);
}

proptest! {
    #[test]
    fn any_record_roundtrips_through_bytes(
        heartbeat in any::<bool>(),
        builtin_config in any::<u8>(),
        builtin_dio_values in any::<[bool; 4]>(),
        dio8_input in any::<bool>(),
        dio8_value in any::<bool>(),
        analog in any::<[u16; 2]>(),
        pwm in any::<[i16; 4]>(),
        battery_millivolts in any::<u16>(),
        reset_left_encoder in any::<bool>(),
        reset_right_encoder in any::<bool>(),
        left_encoder in any::<i16>(),
        right_encoder in any::<i16>(),
    ) {
        let state = RobotIoState {
            heartbeat,
            builtin_config,
            builtin_dio_values,
            dio8_input,
            dio8_value,
            analog,
            pwm,
            battery_millivolts,
            reset_left_encoder,
            reset_right_encoder,
            left_encoder,
            right_encoder,
        };

        let mut img = Aligned([0u8; STATE_SIZE]);
        state.write_to(&mut img.0).unwrap();
        prop_assert_eq!(RobotIoState::read_from(&img.0).unwrap(), state);

        // And through the volatile view.
        let view = IoStateView::new(&mut img.0).unwrap();
        view.store(&state);
        prop_assert_eq!(view.snapshot(), state);
    }
}
