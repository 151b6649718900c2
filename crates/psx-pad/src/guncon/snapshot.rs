use psx_io_snapshot::io::state::codec::{Decoder, Encoder};
use psx_io_snapshot::io::state::{
    IoSnapshot, SnapshotError, SnapshotReader, SnapshotResult, SnapshotVersion, SnapshotWriter,
};

use super::transfer::{GunConTransferPhase, Report, TransferState};
use super::{NamcoGunCon, POWER_ON_POINTER};
use crate::beam::GunPosition;

const TAG_TRANSFER_STATE: u16 = 1;
const TAG_BUTTONS: u16 = 2;
const TAG_POSITION_X: u16 = 3;
const TAG_POSITION_Y: u16 = 4;
const TAG_LATCHED_REPORT: u16 = 5;
const TAG_POINTER_X: u16 = 6;
const TAG_POINTER_Y: u16 = 7;

fn encode_report(r: Report) -> Vec<u8> {
    Encoder::new().u16(r.buttons).u16(r.x).u16(r.y).finish()
}

fn decode_report(buf: &[u8]) -> SnapshotResult<Report> {
    let mut d = Decoder::new(buf);
    let report = Report {
        buttons: d.u16()?,
        x: d.u16()?,
        y: d.u16()?,
    };
    d.finish()?;
    Ok(report)
}

impl IoSnapshot for NamcoGunCon {
    const DEVICE_ID: [u8; 4] = *b"GCON";
    const DEVICE_VERSION: SnapshotVersion = SnapshotVersion::new(1, 0);

    fn save_state(&self) -> Vec<u8> {
        let mut w = SnapshotWriter::new(Self::DEVICE_ID, Self::DEVICE_VERSION);

        w.field_u8(TAG_TRANSFER_STATE, self.transfer_state.phase() as u8);
        w.field_u16(TAG_BUTTONS, self.button_state);
        w.field_u16(TAG_POSITION_X, self.position.x);
        w.field_u16(TAG_POSITION_Y, self.position.y);
        if let Some(report) = self.transfer_state.report() {
            w.field_bytes(TAG_LATCHED_REPORT, encode_report(report));
        }
        w.field_f32(TAG_POINTER_X, self.pointer[0]);
        w.field_f32(TAG_POINTER_Y, self.pointer[1]);

        w.finish()
    }

    fn load_state(&mut self, bytes: &[u8]) -> SnapshotResult<()> {
        let r = SnapshotReader::parse(bytes, Self::DEVICE_ID)?;
        r.ensure_device_major(Self::DEVICE_VERSION.major)?;

        let phase = match r.u8(TAG_TRANSFER_STATE)? {
            None => GunConTransferPhase::Idle,
            Some(v) => GunConTransferPhase::from_u8(v)
                .ok_or(SnapshotError::InvalidFieldEncoding("guncon transfer state"))?,
        };
        let report = r.bytes(TAG_LATCHED_REPORT).map(decode_report).transpose()?;
        let transfer_state = TransferState::from_parts(phase, report).ok_or(
            SnapshotError::InvalidFieldEncoding("guncon transfer state without latched report"),
        )?;

        let button_state = r.u16(TAG_BUTTONS)?.unwrap_or(0xFFFF);
        let pointer = [
            r.f32(TAG_POINTER_X)?.unwrap_or(POWER_ON_POINTER[0]),
            r.f32(TAG_POINTER_Y)?.unwrap_or(POWER_ON_POINTER[1]),
        ];
        // A missing coordinate is recomputed from the (restored) pointer.
        let mapped = self.beam.map(pointer[0], pointer[1]);
        let position = GunPosition::new(
            r.u16(TAG_POSITION_X)?.unwrap_or(mapped.x),
            r.u16(TAG_POSITION_Y)?.unwrap_or(mapped.y),
        );

        // Everything validated; commit.
        self.transfer_state = transfer_state;
        self.button_state = button_state;
        self.position = position;
        self.pointer = pointer;
        Ok(())
    }
}
