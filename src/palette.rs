// Fixed color scales used by the charts

/// Gender scale for the scatter chart (domain, range)
pub const GENDER_SCALE: [(&str, &str); 2] = [("Female", "#E15759"), ("Male", "#5DA5DA")];

/// Color for labels outside the gender domain
pub const UNMAPPED_COLOR: &str = "#BAB0AC";

/// Qualitative "set1" scheme
pub const SET1: [&str; 9] = [
    "#E41A1C", "#377EB8", "#4DAF4A", "#984EA3", "#FF7F00", "#FFFF33", "#A65628", "#F781BF",
    "#999999",
];

pub fn gender_color(gender: &str) -> &'static str {
    GENDER_SCALE
        .iter()
        .find(|(label, _)| *label == gender)
        .map(|(_, color)| *color)
        .unwrap_or(UNMAPPED_COLOR)
}

/// Set1 color for the `index`-th category, cycling past the end
pub fn set1_color(index: usize) -> &'static str {
    SET1[index % SET1.len()]
}

/// Parse "#RRGGBB" into its components
pub fn parse_hex(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gender_color() {
        assert_eq!(gender_color("Female"), "#E15759");
        assert_eq!(gender_color("Male"), "#5DA5DA");
        assert_eq!(gender_color("Unknown"), UNMAPPED_COLOR);
    }

    #[test]
    fn test_set1_cycles() {
        assert_eq!(set1_color(0), "#E41A1C");
        assert_eq!(set1_color(8), "#999999");
        assert_eq!(set1_color(9), "#E41A1C");
    }

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex("#E15759"), Some((0xE1, 0x57, 0x59)));
        assert_eq!(parse_hex("#5da5da"), Some((0x5D, 0xA5, 0xDA)));
        assert_eq!(parse_hex("E15759"), None);
        assert_eq!(parse_hex("#E157"), None);
        assert_eq!(parse_hex("#GGGGGG"), None);
    }
}
