// THEORY:
// The `Color` module is the most fundamental building block of the picture engine.
// It is a "dumb" value type: an immutable RGB triple that is copied in and out of a
// `PixelGrid`. A color never points back into grid storage, so reading a color and
// writing it elsewhere can never alias two pixels together.
//
// Key architectural principles:
// 1.  **Data Purity**: It holds the raw `u8` channel values without interpretation.
//     There is no alpha channel; transparency is not part of this engine.
// 2.  **Intrinsic Knowledge**: `average` depends only on the color itself. It is the
//     grayscale intensity used by both `grayscale` and the posterizer, and it must
//     truncate (never round) so the two stages agree bit-for-bit.
// 3.  **Pairwise Lens**: `distance` is the only method taking a second color. It is
//     the Euclidean distance over the RGB cube and drives edge detection.

pub mod color {
    use std::fmt;

    pub type Channel = u8;
    pub type Intensity = u8;
    pub type ColorDistance = f64;

    /// An immutable RGB triple with each channel in 0..=255.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Color {
        /// The red channel value (0-255).
        pub red: Channel,
        /// The green channel value (0-255).
        pub green: Channel,
        /// The blue channel value (0-255).
        pub blue: Channel,
    }

    impl Color {
        pub const BLACK: Color = Color::new(0, 0, 0);
        pub const WHITE: Color = Color::new(255, 255, 255);
        pub const PURPLE: Color = Color::new(167, 86, 255);
        pub const ORANGE: Color = Color::new(255, 89, 0);
        pub const CYAN: Color = Color::new(157, 254, 225);
        pub const YELLOW: Color = Color::new(255, 243, 71);

        pub const fn new(red: Channel, green: Channel, blue: Channel) -> Self {
            Self { red, green, blue }
        }

        /// A gray color with all three channels set to `value`.
        pub const fn gray(value: Intensity) -> Self {
            Self::new(value, value, value)
        }

        /// Integer mean of the three channels, truncated toward zero.
        pub fn average(&self) -> Intensity {
            let sum = self.red as u16 + self.green as u16 + self.blue as u16;
            (sum / 3) as Intensity
        }

        /// Euclidean distance between two colors in RGB space.
        pub fn distance(&self, other: &Color) -> ColorDistance {
            let dr = self.red as f64 - other.red as f64;
            let dg = self.green as f64 - other.green as f64;
            let db = self.blue as f64 - other.blue as f64;
            (dr * dr + dg * dg + db * db).sqrt()
        }

        /// Parses a six digit `rrggbb` hex string, with or without a leading `#`.
        pub fn from_hex(hex: &str) -> Option<Self> {
            let digits = hex.strip_prefix('#').unwrap_or(hex);
            if digits.len() != 6 || !digits.is_ascii() {
                return None;
            }
            let channel =
                |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16).ok();
            Some(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
        }
    }

    impl fmt::Display for Color {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
        }
    }

    impl From<image::Rgb<u8>> for Color {
        fn from(rgb: image::Rgb<u8>) -> Self {
            let [red, green, blue] = rgb.0;
            Self::new(red, green, blue)
        }
    }

    impl From<Color> for image::Rgb<u8> {
        fn from(color: Color) -> Self {
            image::Rgb([color.red, color.green, color.blue])
        }
    }
}
