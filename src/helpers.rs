use crate::state::Color;

/// Composites `fg` over an opaque `bg`, blending in gamma-2.2 space.
pub fn alpha_blend(bg: Color, fg: Color) -> Color {
    let gamma = 2.2;
    let alpha = fg.alpha as f32 / 255.0;
    let blend = |b: u8, f: u8| -> u8 {
        f32::powf(
            (1.0 - alpha) * f32::powf(b as f32, gamma) + alpha * f32::powf(f as f32, gamma),
            1.0 / gamma,
        )
        .round() as u8
    };
    Color::rgb(
        blend(bg.red, fg.red),
        blend(bg.green, fg.green),
        blend(bg.blue, fg.blue),
    )
}

/// Relative luminance (0-1) of the color's RGB components, ignoring alpha.
pub fn luminance(c: Color) -> f32 {
    let linear = |v: u8| f32::powf(v as f32 / 255.0, 2.2);
    0.2126 * linear(c.red) + 0.7152 * linear(c.green) + 0.0722 * linear(c.blue)
}

/// Black or white, whichever reads better on top of `bg`.
pub fn contrast_color(bg: Color) -> Color {
    if luminance(bg) > 0.18 {
        Color::BLACK
    } else {
        Color::WHITE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alpha_blend_extremes() {
        let fg = Color::rgba(10, 20, 30, 255);
        assert_eq!(alpha_blend(Color::WHITE, fg), Color::rgb(10, 20, 30));
        let clear = Color::rgba(10, 20, 30, 0);
        assert_eq!(alpha_blend(Color::WHITE, clear), Color::WHITE);
    }

    #[test]
    fn test_alpha_blend_half() {
        let c = alpha_blend(Color::WHITE, Color::rgba(0, 0, 0, 128));
        assert!(c.red > 100 && c.red < 255);
        assert_eq!(c.red, c.green);
        assert_eq!(c.alpha, 255);
    }

    #[test]
    fn test_contrast_color() {
        assert_eq!(contrast_color(Color::WHITE), Color::BLACK);
        assert_eq!(contrast_color(Color::BLACK), Color::WHITE);
        assert_eq!(contrast_color(Color::CYAN), Color::BLACK);
    }
}
