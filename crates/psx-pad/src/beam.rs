//! Pointer to CRT beam mapping for light guns.
//!
//! A light gun does not know where it points; it latches the GPU's beam position at the moment
//! its photodiode sees the beam pass. We reverse that: given where the player aims inside the
//! visible picture, compute which dot-clock tick and scanline the beam would be on there.

/// Clock the GunCon counts its X coordinate in.
pub const GUN_CLOCK_HZ: u32 = 8_000_000;

/// Position reported by the gun, in hardware units (X: 8 MHz ticks since hsync, Y: scanline).
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct GunPosition {
    pub x: u16,
    pub y: u16,
}

impl GunPosition {
    /// What a real GunCon reports when it did not see the beam at all: X=0001h, Y=000Ah.
    pub const OFF_SCREEN: Self = Self { x: 0x0001, y: 0x000A };

    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }

    pub fn is_off_screen(self) -> bool {
        self == Self::OFF_SCREEN
    }
}

/// Active scan window of the emulated display.
///
/// Horizontal bounds are in GPU dot-clock ticks from hsync, vertical bounds in scanlines from
/// vsync, both as programmed through GP1(06h)/GP1(07h).
///
/// The visible window must start below line `0x0A`, otherwise a hit could encode as
/// [`GunPosition::OFF_SCREEN`]. A geometry that does not is treated as having no visible
/// picture.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BeamGeometry {
    pub crtc_frequency_hz: u32,
    pub horizontal_start: u16,
    pub horizontal_end: u16,
    pub vertical_start: u16,
    pub vertical_end: u16,
}

impl BeamGeometry {
    pub const NTSC: Self = Self {
        crtc_frequency_hz: 53_693_175,
        horizontal_start: 0x260,
        horizontal_end: 0xC60,
        vertical_start: 0x010,
        vertical_end: 0x100,
    };

    pub const PAL: Self = Self {
        crtc_frequency_hz: 53_203_425,
        horizontal_start: 0x260,
        horizontal_end: 0xC60,
        vertical_start: 0x023,
        vertical_end: 0x123,
    };

    fn is_valid(&self) -> bool {
        self.crtc_frequency_hz != 0
            && self.horizontal_start < self.horizontal_end
            && self.vertical_start < self.vertical_end
            && self.vertical_start > GunPosition::OFF_SCREEN.y
    }

    /// Beam `(tick, line)` under a normalized pointer, or `None` if the pointer is outside the
    /// visible picture. `(0, 0)` is the top-left corner, `(1, 1)` the bottom-right one.
    pub fn beam_position(&self, x: f32, y: f32) -> Option<(u32, u32)> {
        if !self.is_valid() || !(0.0..=1.0).contains(&x) || !(0.0..=1.0).contains(&y) {
            return None;
        }

        let width = f64::from(self.horizontal_end - self.horizontal_start);
        let height = f64::from(self.vertical_end - self.vertical_start);
        let tick = u32::from(self.horizontal_start) + (f64::from(x) * width) as u32;
        let line = u32::from(self.vertical_start) + (f64::from(y) * height) as u32;
        Some((tick, line))
    }

    /// Hardware coordinates the gun reports for a normalized pointer position.
    pub fn map(&self, x: f32, y: f32) -> GunPosition {
        let Some((tick, line)) = self.beam_position(x, y) else {
            return GunPosition::OFF_SCREEN;
        };

        let divider = f64::from(self.crtc_frequency_hz) / f64::from(GUN_CLOCK_HZ);
        let gun_x = (f64::from(tick) / divider).min(f64::from(u16::MAX)) as u16;
        let gun_y = line.min(u32::from(u16::MAX)) as u16;
        GunPosition::new(gun_x, gun_y)
    }
}

impl Default for BeamGeometry {
    fn default() -> Self {
        Self::NTSC
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ntsc_corners() {
        let g = BeamGeometry::NTSC;
        // 0x260 ticks * 8 MHz / 53.693175 MHz = 90.58
        assert_eq!(g.map(0.0, 0.0), GunPosition::new(90, 0x10));
        // 0xC60 ticks -> 472.02
        assert_eq!(g.map(1.0, 1.0), GunPosition::new(472, 0x100));
    }

    #[test]
    fn pal_uses_its_own_window() {
        assert_eq!(BeamGeometry::PAL.map(0.0, 0.0).y, 0x23);
        assert_eq!(BeamGeometry::PAL.map(0.5, 0.5).y, 0x23 + 0x80);
    }

    #[test]
    fn outside_picture_is_off_screen() {
        let g = BeamGeometry::NTSC;
        for (x, y) in [(-0.01, 0.5), (0.5, 1.01), (f32::NAN, 0.5), (0.5, f32::INFINITY)] {
            assert!(g.map(x, y).is_off_screen(), "({x}, {y})");
        }
    }

    #[test]
    fn degenerate_geometry_is_off_screen() {
        let g = BeamGeometry {
            crtc_frequency_hz: 0,
            ..BeamGeometry::NTSC
        };
        assert_eq!(g.map(0.5, 0.5), GunPosition::OFF_SCREEN);

        let g = BeamGeometry {
            horizontal_end: BeamGeometry::NTSC.horizontal_start,
            ..BeamGeometry::NTSC
        };
        assert_eq!(g.beam_position(0.5, 0.5), None);
    }

    #[test]
    fn window_reaching_sentinel_line_is_rejected() {
        // At this clock tick 8 is gun X 1, so the top-left hit would read as (1, 0x0A).
        let g = BeamGeometry {
            crtc_frequency_hz: GUN_CLOCK_HZ * 8,
            horizontal_start: 0x08,
            horizontal_end: 0x10,
            vertical_start: 0x0A,
            vertical_end: 0x20,
        };
        assert_eq!(g.beam_position(0.0, 0.0), None);
        assert_eq!(g.beam_position(0.5, 0.5), None);

        let g = BeamGeometry {
            vertical_start: 0x0B,
            ..g
        };
        assert_eq!(g.map(0.0, 0.0), GunPosition::new(1, 0x0B));
        assert!(!g.map(0.0, 0.0).is_off_screen());
    }
}
