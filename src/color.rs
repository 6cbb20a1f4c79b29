//! RGB colours and colour space conversion.
//!
//! Colours are authored the way they are displayed (sRGB, gamma encoded) and
//! have to be moved into linear space before any lighting math touches them.

/// An RGB colour with components in `0.0..=1.0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Build a colour from a `0xRRGGBB` literal.
    pub fn from_hex(hex: u32) -> Self {
        let channel = |shift: u32| ((hex >> shift) & 0xff) as f32 / 255.0;
        Self::new(channel(16), channel(8), channel(0))
    }

    /// Look up one of the CSS colour keywords the scene uses.
    pub fn from_name(name: &str) -> Option<Self> {
        let hex = match name.to_ascii_lowercase().as_str() {
            "skyblue" => 0x87ceeb,
            _ => return None,
        };
        Some(Self::from_hex(hex))
    }

    /// Remap every channel from the sRGB transfer curve into linear space.
    pub fn srgb_to_linear(self) -> Self {
        Self::new(
            srgb_channel_to_linear(self.r),
            srgb_channel_to_linear(self.g),
            srgb_channel_to_linear(self.b),
        )
    }

    pub fn linear_to_srgb(self) -> Self {
        Self::new(
            linear_channel_to_srgb(self.r),
            linear_channel_to_srgb(self.g),
            linear_channel_to_srgb(self.b),
        )
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    /// Pack into a vec4 for uniforms, `w` carries an extra scalar.
    pub fn to_vec4(self, w: f32) -> [f32; 4] {
        [self.r, self.g, self.b, w]
    }
}

impl From<Color> for wgpu::Color {
    fn from(color: Color) -> Self {
        wgpu::Color {
            r: f64::from(color.r),
            g: f64::from(color.g),
            b: f64::from(color.b),
            a: 1.0,
        }
    }
}

fn srgb_channel_to_linear(c: f32) -> f32 {
    if c < 0.04045 {
        c * 0.0773993808
    } else {
        (c * 0.9478672986 + 0.0521327014).powf(2.4)
    }
}

fn linear_channel_to_srgb(c: f32) -> f32 {
    if c < 0.0031308 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f32, expected: f32) {
        assert!(
            (actual - expected).abs() < 1e-4,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn hex_channels_are_split_in_rgb_order() {
        let c = Color::from_hex(0xff3333);
        assert_close(c.r, 1.0);
        assert_close(c.g, 0.2);
        assert_close(c.b, 0.2);
    }

    #[test]
    fn srgb_to_linear_keeps_extremes() {
        let white = Color::WHITE.srgb_to_linear();
        assert_close(white.r, 1.0);
        assert_close(white.b, 1.0);
        assert_eq!(Color::BLACK.srgb_to_linear(), Color::BLACK);
    }

    #[test]
    fn srgb_to_linear_darkens_mid_tones() {
        let linear = Color::from_hex(0x333333).srgb_to_linear();
        assert_close(linear.r, 0.0331048);
        assert_eq!(linear.r, linear.g);
        assert_eq!(linear.g, linear.b);
    }

    #[test]
    fn low_values_use_the_linear_segment() {
        let linear = Color::new(0.02, 0.02, 0.02).srgb_to_linear();
        assert_close(linear.r, 0.02 * 0.0773993808);
    }

    #[test]
    fn conversion_round_trips() {
        let original = Color::from_hex(0x87ceeb);
        let back = original.srgb_to_linear().linear_to_srgb();
        assert_close(back.r, original.r);
        assert_close(back.g, original.g);
        assert_close(back.b, original.b);
    }

    #[test]
    fn skyblue_is_a_known_name() {
        assert_eq!(Color::from_name("SkyBlue"), Some(Color::from_hex(0x87ceeb)));
        assert_eq!(Color::from_name("not-a-colour"), None);
    }
}
