pub mod wheel;

use ratatui::style::Color;
use uuid::Uuid;

/// A single restaurant on the wheel.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub id: Uuid,
    pub name: String,
    pub color: Color,
}

/// The outcome of a completed spin.
#[derive(Debug, Clone)]
pub struct RouletteResult {
    pub winner: Entry,
    pub comment: Option<String>,
}

/// Parse the raw list text into wheel entries.
///
/// One entry per non-empty line, trimmed. Colors cycle through the palette
/// by position, so the assignment is deterministic for a given list order.
/// The whole list is rebuilt on every text change; entries carry fresh ids.
pub fn parse_entries(text: &str, palette: &[Color]) -> Vec<Entry> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .enumerate()
        .map(|(index, name)| Entry {
            id: Uuid::new_v4(),
            name: name.to_string(),
            color: palette[index % palette.len()],
        })
        .collect()
}

/// A spin needs at least two entries to be meaningful.
pub const MIN_ENTRIES: usize = 2;

#[cfg(test)]
mod tests {
    use super::*;

    fn palette() -> Vec<Color> {
        vec![Color::Red, Color::Green, Color::Blue]
    }

    #[test]
    fn test_parse_trims_and_skips_empty_lines() {
        let entries = parse_entries("  Katsu House \n\n\tPho 99\n   \nTaqueria\n", &palette());
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Katsu House", "Pho 99", "Taqueria"]);
    }

    #[test]
    fn test_parse_empty_text() {
        assert!(parse_entries("", &palette()).is_empty());
        assert!(parse_entries("\n  \n\n", &palette()).is_empty());
    }

    #[test]
    fn test_colors_cycle_by_position() {
        let entries = parse_entries("a\nb\nc\nd\ne", &palette());
        assert_eq!(entries[0].color, Color::Red);
        assert_eq!(entries[1].color, Color::Green);
        assert_eq!(entries[2].color, Color::Blue);
        assert_eq!(entries[3].color, Color::Red);
        assert_eq!(entries[4].color, Color::Green);
    }

    #[test]
    fn test_color_assignment_is_deterministic() {
        let a = parse_entries("x\ny\nz", &palette());
        let b = parse_entries("x\ny\nz", &palette());
        for (ea, eb) in a.iter().zip(&b) {
            assert_eq!(ea.color, eb.color);
        }
    }

    #[test]
    fn test_ids_unique_per_parse() {
        let entries = parse_entries("a\nb\nc", &palette());
        assert_ne!(entries[0].id, entries[1].id);
        assert_ne!(entries[1].id, entries[2].id);
    }
}
