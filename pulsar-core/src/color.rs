//! LED colors
//!
//! WS2812 parts expect green first, then red, then blue. [`Grb`] stores a
//! color already in wire order so the encoder can shift bits straight out.

/// 24-bit color in GRB wire order (`0x00GGRRBB`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Grb(u32);

impl Grb {
    pub const OFF: Grb = Grb(0);

    pub const fn new(green: u8, red: u8, blue: u8) -> Self {
        Self((green as u32) << 16 | (red as u32) << 8 | blue as u32)
    }

    /// Convert a `0x00RRGGBB` value
    pub const fn from_rgb(rgb: u32) -> Self {
        Self(rgb_to_grb(rgb))
    }

    /// Raw `0x00GGRRBB` value
    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn green(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub const fn red(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub const fn blue(self) -> u8 {
        self.0 as u8
    }
}

impl From<u32> for Grb {
    /// Takes a value already in GRB order; the top byte is ignored
    fn from(bits: u32) -> Self {
        Self(bits & 0x00FF_FFFF)
    }
}

/// Swap the red and green bytes of a `0x00RRGGBB` value
pub const fn rgb_to_grb(rgb: u32) -> u32 {
    (rgb & 0x00FF_0000) >> 8 | (rgb & 0x0000_FF00) << 8 | rgb & 0x0000_00FF
}

/// Color as small per-channel weights, scaled up by a brightness
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BaseColor {
    pub g: u8,
    pub r: u8,
    pub b: u8,
}

impl BaseColor {
    pub const RED: BaseColor = BASE_COLORS[0];
    pub const ORANGE: BaseColor = BASE_COLORS[1];
    pub const YELLOW: BaseColor = BASE_COLORS[2];
    pub const GREEN: BaseColor = BASE_COLORS[3];
    pub const CYAN: BaseColor = BASE_COLORS[5];
    pub const BLUE: BaseColor = BASE_COLORS[6];
    pub const PURPLE: BaseColor = BASE_COLORS[7];
    pub const WHITE: BaseColor = BASE_COLORS[9];

    const fn new(g: u8, r: u8, b: u8) -> Self {
        Self { g, r, b }
    }

    /// Multiply every weight by `brightness`, saturating at 255
    ///
    /// Brightness below 3 leaves too few distinct levels for mixed colors.
    pub const fn scaled(self, brightness: u8) -> Grb {
        Grb::new(
            self.g.saturating_mul(brightness),
            self.r.saturating_mul(brightness),
            self.b.saturating_mul(brightness),
        )
    }
}

/// Stops of the color wheel, 32 wheel steps apart
///
/// The wheel runs from red back to red; the white stop sits past the end
/// and is only reachable as [`BaseColor::WHITE`].
pub const BASE_COLORS: [BaseColor; 10] = [
    BaseColor::new(0, 2, 0),
    BaseColor::new(1, 2, 0),
    BaseColor::new(1, 1, 0),
    BaseColor::new(2, 0, 0),
    BaseColor::new(2, 0, 1),
    BaseColor::new(1, 0, 1),
    BaseColor::new(0, 0, 2),
    BaseColor::new(0, 1, 1),
    BaseColor::new(0, 2, 0),
    BaseColor::new(1, 1, 1),
];

const WHEEL_SEGMENT: u8 = 32;

/// Color at `index` on a 256-step wheel through [`BASE_COLORS`]
///
/// Each segment blends linearly from one stop to the next. Channel
/// differences are divided truncating toward zero.
pub fn color_wheel(index: u8, brightness: u8) -> Grb {
    let segment = usize::from(index / WHEEL_SEGMENT);
    let offset = i32::from(index % WHEEL_SEGMENT);
    let from = BASE_COLORS[segment];
    let to = BASE_COLORS[segment + 1];

    let blend = |a: u8, b: u8| {
        let a = i32::from(a) * i32::from(brightness);
        let b = i32::from(b) * i32::from(brightness);
        (a + offset * (b - a) / i32::from(WHEEL_SEGMENT)).clamp(0, 255) as u8
    };
    Grb::new(blend(from.g, to.g), blend(from.r, to.r), blend(from.b, to.b))
}
