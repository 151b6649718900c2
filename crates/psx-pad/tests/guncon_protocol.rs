use proptest::prelude::*;
use psx_io_snapshot::io::state::{IoSnapshot, SnapshotWriter};
use psx_pad::{
    BeamGeometry, Controller, GunConAxis, GunConButton, GunConTransferPhase, GunPosition,
    NamcoGunCon,
};

const TAG_BUTTONS: u16 = 2;
const TAG_POSITION_X: u16 = 3;
const TAG_POSITION_Y: u16 = 4;

/// Builds a gun whose live state is exactly `buttons` / `position`, without going through the
/// pointer mapper.
fn gun_with(buttons: u16, position: GunPosition) -> NamcoGunCon {
    let mut w = SnapshotWriter::new(NamcoGunCon::DEVICE_ID, NamcoGunCon::DEVICE_VERSION);
    w.field_u16(TAG_BUTTONS, buttons);
    w.field_u16(TAG_POSITION_X, position.x);
    w.field_u16(TAG_POSITION_Y, position.y);

    let mut gun = NamcoGunCon::new();
    gun.load_state(&w.finish()).unwrap();
    gun
}

fn read_packet(gun: &mut NamcoGunCon) -> Vec<(u8, bool)> {
    (0..8)
        .map(|i| {
            let reply = gun.transfer(if i == 0 { 0x42 } else { 0x00 });
            (reply.data, reply.ack)
        })
        .collect()
}

#[test]
fn idle_buttons_and_fixed_position() {
    let mut gun = gun_with(0xFFFF, GunPosition::new(0x1234, 0x5678));
    assert_eq!(
        read_packet(&mut gun),
        [
            (0x63, true),
            (0x5A, true),
            (0xFF, true),
            (0xFF, true),
            (0x34, true),
            (0x12, true),
            (0x78, true),
            (0x56, false),
        ]
    );
    assert_eq!(gun.transfer_phase(), GunConTransferPhase::Idle);
}

#[test]
fn address_byte_then_read_command() {
    let mut gun = gun_with(0xFFFF, GunPosition::new(0x1234, 0x5678));
    let reply = gun.transfer(0x01);
    assert_eq!((reply.data, reply.ack), (0xFF, true));
    assert_eq!(gun.transfer_phase(), GunConTransferPhase::Idle);
    assert_eq!(read_packet(&mut gun)[0], (0x63, true));
}

#[test]
fn unsupported_command_is_not_acknowledged() {
    let mut gun = NamcoGunCon::new();
    for cmd in [0x00, 0x43, 0x4D, 0xFF] {
        let reply = gun.transfer(cmd);
        assert_eq!((reply.data, reply.ack), (0xFF, false), "cmd {cmd:#04x}");
        assert_eq!(gun.transfer_phase(), GunConTransferPhase::Idle);
    }
}

#[test]
fn each_button_press_release_restores_idle_mask() {
    for button in GunConButton::ALL {
        let mut gun = NamcoGunCon::new();
        gun.set_button_state(button as i32, true);
        assert_ne!(gun.button_state(), 0xFFFF, "{button:?}");
        gun.set_button_state(button as i32, false);
        assert_eq!(gun.button_state(), 0xFFFF, "{button:?}");
    }
}

#[test]
fn off_screen_pointer_reports_sentinel() {
    let mut gun = NamcoGunCon::new();
    gun.set_axis_state(GunConAxis::X as i32, -0.2);
    let packet = read_packet(&mut gun);
    assert_eq!(
        &packet[4..],
        &[(0x01, true), (0x00, true), (0x0A, true), (0x00, false)]
    );
}

#[test]
fn update_between_packets_is_visible() {
    let mut gun = NamcoGunCon::new();
    read_packet(&mut gun);
    gun.set_button(GunConButton::Trigger, true);
    gun.set_axis(GunConAxis::X, 0.0);
    gun.set_axis(GunConAxis::Y, 0.0);

    let packet = read_packet(&mut gun);
    assert_eq!(packet[2].0, 0xFF);
    assert_eq!(packet[3].0, 0xDF);
    assert_eq!(packet[4].0, 90);
    assert_eq!(packet[6].0, 0x10);
}

#[test]
fn update_during_packet_waits_for_next_packet() {
    let mut gun = NamcoGunCon::new();
    gun.set_axis(GunConAxis::X, 0.0);
    gun.set_axis(GunConAxis::Y, 0.0);
    let expected = read_packet(&mut gun);

    // Start a packet, then move and shoot between its bytes.
    let mut during = Vec::new();
    let first = gun.transfer(0x42);
    during.push((first.data, first.ack));
    gun.set_button(GunConButton::Trigger, true);
    gun.set_axis(GunConAxis::X, 1.0);
    for _ in 1..4 {
        let r = gun.transfer(0x00);
        during.push((r.data, r.ack));
    }
    gun.set_axis(GunConAxis::Y, 1.0);
    for _ in 4..8 {
        let r = gun.transfer(0x00);
        during.push((r.data, r.ack));
    }
    assert_eq!(during, expected);

    let next = read_packet(&mut gun);
    assert_eq!(next[3].0, 0xDF);
    let x = u16::from_le_bytes([next[4].0, next[5].0]);
    let y = u16::from_le_bytes([next[6].0, next[7].0]);
    assert_eq!(GunPosition::new(x, y), BeamGeometry::NTSC.map(1.0, 1.0));
}

fn arb_gun() -> impl Strategy<Value = NamcoGunCon> {
    (
        proptest::array::uniform3(any::<bool>()),
        -0.5f32..1.5,
        -0.5f32..1.5,
    )
        .prop_map(|(pressed, x, y)| {
            let mut gun = NamcoGunCon::new();
            for (button, pressed) in GunConButton::ALL.into_iter().zip(pressed) {
                gun.set_button(button, pressed);
            }
            gun.set_axis(GunConAxis::X, x);
            gun.set_axis(GunConAxis::Y, y);
            gun
        })
}

proptest! {
    #[test]
    fn packet_shape(mut gun in arb_gun()) {
        let buttons = gun.button_state();
        let pos = gun.position();
        let packet = read_packet(&mut gun);

        let data: Vec<u8> = packet.iter().map(|p| p.0).collect();
        let [b_lo, b_hi] = buttons.to_le_bytes();
        let [x_lo, x_hi] = pos.x.to_le_bytes();
        let [y_lo, y_hi] = pos.y.to_le_bytes();
        prop_assert_eq!(data, vec![0x63, 0x5A, b_lo, b_hi, x_lo, x_hi, y_lo, y_hi]);

        let acks: Vec<bool> = packet.iter().map(|p| p.1).collect();
        prop_assert_eq!(acks, vec![true, true, true, true, true, true, true, false]);

        // Bits the gun does not define stay released.
        prop_assert_eq!(buttons | 0x6008, 0xFFFF);
    }

    #[test]
    fn reset_from_any_phase_behaves_like_fresh(mut gun in arb_gun(), cut in 0usize..8) {
        for _ in 0..cut {
            gun.transfer(0x42);
        }
        gun.reset_transfer_state();
        prop_assert_eq!(gun.transfer_phase(), GunConTransferPhase::Idle);

        let mut fresh = NamcoGunCon::new();
        fresh.load_state(&gun.save_state()).unwrap();
        prop_assert_eq!(read_packet(&mut gun), read_packet(&mut fresh));
    }

    #[test]
    fn snapshot_resume_at_every_cut(mut gun in arb_gun(), cut in 0usize..8) {
        let mut reference = NamcoGunCon::new();
        reference.load_state(&gun.save_state()).unwrap();
        let expected = read_packet(&mut reference);

        let mut got = Vec::new();
        for i in 0..cut {
            let r = gun.transfer(if i == 0 { 0x42 } else { 0x00 });
            got.push((r.data, r.ack));
        }
        let saved = gun.save_state();

        let mut restored = NamcoGunCon::new();
        restored.load_state(&saved).unwrap();
        // Live inputs changing after the save must not leak into the resumed packet.
        restored.set_button(GunConButton::B, true);
        restored.set_axis(GunConAxis::X, 0.75);

        for i in cut..8 {
            let r = restored.transfer(if i == 0 { 0x42 } else { 0x00 });
            got.push((r.data, r.ack));
        }
        if cut == 0 {
            // The packet had not started yet, so it samples the post-restore inputs.
            let mut after = NamcoGunCon::new();
            after.load_state(&saved).unwrap();
            after.set_button(GunConButton::B, true);
            after.set_axis(GunConAxis::X, 0.75);
            let buttons = after.button_state();
            let pos = after.position();
            prop_assert_eq!(buttons & GunConButton::B.bits().bits(), 0);
            prop_assert_eq!(got[3].0, buttons.to_le_bytes()[1]);
            prop_assert_eq!(&got[4..6], &[(pos.x as u8, true), ((pos.x >> 8) as u8, true)]);
            prop_assert_eq!(got, read_packet(&mut after));
        } else {
            prop_assert_eq!(got, expected);
        }
    }

    #[test]
    fn mapper_never_clamps_off_screen_to_edge(x in -10.0f32..10.0, y in -10.0f32..10.0) {
        let pos = BeamGeometry::NTSC.map(x, y);
        let inside = (0.0..=1.0).contains(&x) && (0.0..=1.0).contains(&y);
        prop_assert_eq!(pos.is_off_screen(), !inside);
    }
}
