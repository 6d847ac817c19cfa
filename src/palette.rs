// Terminal color handling
// Maps the game palette onto whatever color depth the terminal offers

use ratatui::style::Color;
use term_color_support::ColorSupport;

/// Extension trait resolving an ANSI color to the closest representation the
/// current terminal supports: exact RGB under truecolor, a stable 256-color
/// index otherwise, the plain ANSI variant as the last resort.
pub trait Tuned {
    fn tuned(self) -> Color;
}

impl Tuned for Color {
    fn tuned(self) -> Color {
        let support = ColorSupport::stdout();

        // ((R, G, B), 256-color index) for the colors the board uses
        let mapping = match self {
            Color::Black => Some(((12, 12, 12), 232)),
            Color::Red => Some(((197, 15, 31), 160)),
            Color::Green => Some(((19, 161, 14), 28)),
            Color::Yellow => Some(((193, 156, 0), 178)),
            Color::Blue => Some(((0, 55, 218), 20)),
            Color::Magenta => Some(((136, 23, 152), 90)),
            Color::Cyan => Some(((58, 150, 221), 38)),
            Color::Gray => Some(((204, 204, 204), 250)),
            Color::DarkGray => Some(((118, 118, 118), 243)),
            Color::LightRed => Some(((231, 72, 86), 203)),
            Color::White => Some(((242, 242, 242), 255)),
            _ => None,
        };

        match mapping {
            Some((rgb, index256)) => {
                if support.has_16m {
                    Color::Rgb(rgb.0, rgb.1, rgb.2)
                } else if support.has_256 {
                    Color::Indexed(index256)
                } else {
                    self
                }
            }
            None => self,
        }
    }
}

/// Numeral color for an adjacency count of 1..=8.
pub fn number_color(count: u8) -> Color {
    match count {
        1 => Color::Blue,
        2 => Color::Green,
        3 => Color::Red,
        4 => Color::Magenta,
        5 => Color::LightRed,
        6 => Color::Cyan,
        7 => Color::Black,
        _ => Color::DarkGray,
    }
    .tuned()
}
