/// Indentation-aware line builder for emitting declarations.
/// Produces a list of lines rather than one string so finished blocks can be
/// nested inside other blocks.
use crate::settings::Indent;

pub struct LineWriter {
    lines: Vec<String>,
    depth: usize,
    indent: String,
}

impl Default for LineWriter {
    fn default() -> Self {
        Self::new(Indent::default())
    }
}

impl LineWriter {
    pub fn new(indent: Indent) -> Self {
        Self {
            lines: Vec::new(),
            depth: 0,
            indent: indent.unit(),
        }
    }

    /// Write a line at the current indentation level.
    pub fn line(&mut self, text: &str) {
        let line = format!("{}{}", self.prefix(), text);
        self.lines.push(line);
    }

    /// Open a block: write `text {` and increase indent.
    pub fn open(&mut self, text: &str) {
        self.line(&format!("{text} {{"));
        self.depth += 1;
    }

    /// Close a block: decrease indent and write `}`.
    pub fn close(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.line("}");
    }

    /// Append already-rendered lines, shifted to the current level.
    pub fn block(&mut self, lines: &[String]) {
        for line in lines {
            self.line(line);
        }
    }

    /// Consume and return the built lines.
    pub fn finish(self) -> Vec<String> {
        self.lines
    }

    fn prefix(&self) -> String {
        self.indent.repeat(self.depth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line() {
        let mut w = LineWriter::default();
        w.line("let x: Int");
        assert_eq!(w.finish(), vec!["let x: Int"]);
    }

    #[test]
    fn test_open_close() {
        let mut w = LineWriter::default();
        w.open("struct A");
        w.line("let x: Int");
        w.close();
        assert_eq!(w.finish(), vec!["struct A {", "\tlet x: Int", "}"]);
    }

    #[test]
    fn test_block_is_shifted_one_level() {
        let nested = vec![
            "struct B {".to_string(),
            "\tlet y: Bool".to_string(),
            "}".to_string(),
        ];
        let mut w = LineWriter::default();
        w.open("struct A");
        w.block(&nested);
        w.close();
        assert_eq!(
            w.finish(),
            vec!["struct A {", "\tstruct B {", "\t\tlet y: Bool", "\t}", "}"]
        );
    }

    #[test]
    fn test_spaces() {
        let mut w = LineWriter::new(Indent::Spaces(2));
        w.open("struct A");
        w.line("let x: Int");
        w.close();
        assert_eq!(w.finish(), vec!["struct A {", "  let x: Int", "}"]);
    }

    #[test]
    fn test_close_never_underflows() {
        let mut w = LineWriter::default();
        w.close();
        w.line("x");
        assert_eq!(w.finish(), vec!["}", "x"]);
    }
}
