//! Settings for decoding and model generation.

/// Indentation unit used by the emitter for each nesting level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Indent {
    #[default]
    Tab,
    Spaces(usize),
}

impl Indent {
    pub fn unit(&self) -> String {
        match self {
            Indent::Tab => "\t".to_string(),
            Indent::Spaces(n) => " ".repeat(*n),
        }
    }
}

/// Settings that control decoding and emission.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    /// When true, a named definition that fails to decode is dropped from the
    /// document instead of failing the whole run. Nested properties of a
    /// definition are always decoded strictly.
    ///
    /// **Default: false (strict).**
    pub lenient: bool,

    /// Indentation for nested declarations and fields.
    pub indent: Indent,
}

impl Settings {
    pub fn lenient(mut self, lenient: bool) -> Self {
        self.lenient = lenient;
        self
    }

    pub fn indent(mut self, indent: Indent) -> Self {
        self.indent = indent;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_strict_with_tabs() {
        let s = Settings::default();
        assert!(!s.lenient);
        assert_eq!(s.indent.unit(), "\t");
    }

    #[test]
    fn test_builder() {
        let s = Settings::default().lenient(true).indent(Indent::Spaces(4));
        assert!(s.lenient);
        assert_eq!(s.indent.unit(), "    ");
    }
}
