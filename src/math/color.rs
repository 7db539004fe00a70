/// Split a `0xRRGGBB` color into sRGB channels in `[0, 1]`
pub fn hex_to_rgb(hex: u32) -> [f32; 3] {
    let channel = |shift: u32| ((hex >> shift) & 0xff) as f32 / 255.0;
    [channel(16), channel(8), channel(0)]
}

/// sRGB transfer function inverse, for writing into linear render targets
pub fn srgb_to_linear(rgb: [f32; 3]) -> [f32; 3] {
    rgb.map(|c| {
        if c <= 0.04045 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    })
}
