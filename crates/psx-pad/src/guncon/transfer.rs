use crate::controller::{TransferReply, CMD_ADDRESS, CMD_READ, REPLY_HIGH_Z};

/// GunCon device ID, sent low byte first.
pub(crate) const ID: u16 = 0x5A63;

/// Everything one read packet reports, latched when the packet starts.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Report {
    pub buttons: u16,
    pub x: u16,
    pub y: u16,
}

/// Position within a read packet, named after the byte the *next* call shifts out.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[repr(u8)]
pub enum GunConTransferPhase {
    Idle = 0,
    IdMsb = 1,
    ButtonsLsb = 2,
    ButtonsMsb = 3,
    XLsb = 4,
    XMsb = 5,
    YLsb = 6,
    YMsb = 7,
}

impl GunConTransferPhase {
    pub(crate) fn from_u8(v: u8) -> Option<Self> {
        Some(match v {
            0 => Self::Idle,
            1 => Self::IdMsb,
            2 => Self::ButtonsLsb,
            3 => Self::ButtonsMsb,
            4 => Self::XLsb,
            5 => Self::XMsb,
            6 => Self::YLsb,
            7 => Self::YMsb,
            _ => return None,
        })
    }
}

/// Transfer cursor. Every state past `Idle` carries the report latched at packet start, so a
/// packet can never mix values sampled at different times.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) enum TransferState {
    #[default]
    Idle,
    IdMsb(Report),
    ButtonsLsb(Report),
    ButtonsMsb(Report),
    XLsb(Report),
    XMsb(Report),
    YLsb(Report),
    YMsb(Report),
}

impl TransferState {
    /// Clocks one byte. `sample` is only called when a new packet starts.
    pub(crate) fn step(
        self,
        data_in: u8,
        sample: impl FnOnce() -> Report,
    ) -> (TransferReply, Self) {
        use TransferState::*;

        let [id_lo, id_hi] = ID.to_le_bytes();
        match self {
            Idle => match data_in {
                CMD_READ => {
                    let report = sample();
                    tracing::trace!(?report, "guncon read packet started");
                    (TransferReply::more(id_lo), IdMsb(report))
                }
                CMD_ADDRESS => (TransferReply::more(REPLY_HIGH_Z), Idle),
                _ => (TransferReply::last(REPLY_HIGH_Z), Idle),
            },
            IdMsb(r) => (TransferReply::more(id_hi), ButtonsLsb(r)),
            ButtonsLsb(r) => (TransferReply::more(r.buttons as u8), ButtonsMsb(r)),
            ButtonsMsb(r) => (TransferReply::more((r.buttons >> 8) as u8), XLsb(r)),
            XLsb(r) => (TransferReply::more(r.x as u8), XMsb(r)),
            XMsb(r) => (TransferReply::more((r.x >> 8) as u8), YLsb(r)),
            YLsb(r) => (TransferReply::more(r.y as u8), YMsb(r)),
            YMsb(r) => (TransferReply::last((r.y >> 8) as u8), Idle),
        }
    }

    pub(crate) fn phase(self) -> GunConTransferPhase {
        match self {
            Self::Idle => GunConTransferPhase::Idle,
            Self::IdMsb(_) => GunConTransferPhase::IdMsb,
            Self::ButtonsLsb(_) => GunConTransferPhase::ButtonsLsb,
            Self::ButtonsMsb(_) => GunConTransferPhase::ButtonsMsb,
            Self::XLsb(_) => GunConTransferPhase::XLsb,
            Self::XMsb(_) => GunConTransferPhase::XMsb,
            Self::YLsb(_) => GunConTransferPhase::YLsb,
            Self::YMsb(_) => GunConTransferPhase::YMsb,
        }
    }

    pub(crate) fn report(self) -> Option<Report> {
        match self {
            Self::Idle => None,
            Self::IdMsb(r)
            | Self::ButtonsLsb(r)
            | Self::ButtonsMsb(r)
            | Self::XLsb(r)
            | Self::XMsb(r)
            | Self::YLsb(r)
            | Self::YMsb(r) => Some(r),
        }
    }

    /// Rebuilds a cursor from its persisted parts. `None` if a mid-packet phase has no report.
    pub(crate) fn from_parts(phase: GunConTransferPhase, report: Option<Report>) -> Option<Self> {
        use GunConTransferPhase as P;

        if phase == P::Idle {
            return Some(Self::Idle);
        }
        let r = report?;
        Some(match phase {
            P::Idle => Self::Idle,
            P::IdMsb => Self::IdMsb(r),
            P::ButtonsLsb => Self::ButtonsLsb(r),
            P::ButtonsMsb => Self::ButtonsMsb(r),
            P::XLsb => Self::XLsb(r),
            P::XMsb => Self::XMsb(r),
            P::YLsb => Self::YLsb(r),
            P::YMsb => Self::YMsb(r),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPORT: Report = Report {
        buttons: 0xDFF7,
        x: 0x1234,
        y: 0x5678,
    };

    #[test]
    fn read_packet_sequence() {
        let mut state = TransferState::Idle;
        let mut out = Vec::new();
        for _ in 0..8 {
            let (reply, next) = state.step(CMD_READ, || REPORT);
            out.push((reply.data, reply.ack));
            state = next;
        }
        assert_eq!(
            out,
            [
                (0x63, true),
                (0x5A, true),
                (0xF7, true),
                (0xDF, true),
                (0x34, true),
                (0x12, true),
                (0x78, true),
                (0x56, false),
            ]
        );
        assert_eq!(state, TransferState::Idle);
    }

    #[test]
    fn idle_handles_address_and_unknown_commands() {
        let (reply, next) = TransferState::Idle.step(CMD_ADDRESS, || unreachable!());
        assert_eq!(reply, TransferReply::more(0xFF));
        assert_eq!(next, TransferState::Idle);

        let (reply, next) = TransferState::Idle.step(0x43, || unreachable!());
        assert_eq!(reply, TransferReply::last(0xFF));
        assert_eq!(next, TransferState::Idle);
    }

    #[test]
    fn mid_packet_ignores_host_byte_and_never_resamples() {
        let state = TransferState::XLsb(REPORT);
        let (a, _) = state.step(0x00, || unreachable!());
        let (b, _) = state.step(0x42, || unreachable!());
        assert_eq!(a, b);
    }

    #[test]
    fn phase_and_parts_round_trip() {
        let mut state = TransferState::Idle;
        for _ in 0..8 {
            let rebuilt = TransferState::from_parts(state.phase(), state.report()).unwrap();
            assert_eq!(rebuilt, state);
            assert_eq!(
                GunConTransferPhase::from_u8(state.phase() as u8),
                Some(state.phase())
            );
            state = state.step(CMD_READ, || REPORT).1;
        }
        assert_eq!(GunConTransferPhase::from_u8(8), None);
        assert_eq!(
            TransferState::from_parts(GunConTransferPhase::YLsb, None),
            None
        );
    }
}
