// ANSI colour glue for user-facing output.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Colour {
    Red,
    Green,
    Yellow,
    Cyan,
    Bold,
}

impl Colour {
    fn code(self) -> &'static str {
        match self {
            Colour::Red => "\x1b[91m",
            Colour::Green => "\x1b[92m",
            Colour::Yellow => "\x1b[93m",
            Colour::Cyan => "\x1b[96m",
            Colour::Bold => "\x1b[1m",
        }
    }
}

const RESET: &str = "\x1b[0m";

/// Wraps `text` in the colour's escape codes when colour output is enabled.
pub fn paint(text: &str, colour: Colour, enabled: bool) -> String {
    if enabled {
        format!("{}{}{}", colour.code(), text, RESET)
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paint_disabled_is_identity() {
        assert_eq!(paint("hello", Colour::Red, false), "hello");
    }

    #[test]
    fn test_paint_enabled_wraps_with_reset() {
        let painted = paint("hello", Colour::Green, true);
        assert!(painted.starts_with("\x1b[92m"));
        assert!(painted.ends_with(RESET));
        assert!(painted.contains("hello"));
    }
}
