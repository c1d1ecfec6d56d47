use std::fmt;
use std::ops::Range;
use std::str::FromStr;

/// Command-line value for "through end of file"
pub const UNBOUNDED_END: i64 = -1;

/// A half-open window `[start, end)` over zero-based line numbers
///
/// `end == None` means the window runs to the end of the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineWindow {
    pub start: usize,
    pub end: Option<usize>,
}

impl Default for LineWindow {
    fn default() -> Self {
        Self::whole_file()
    }
}

impl LineWindow {
    pub const fn new(start: usize, end: Option<usize>) -> Self {
        Self { start, end }
    }

    pub const fn bounded(start: usize, end: usize) -> Self {
        Self::new(start, Some(end))
    }

    pub const fn from_start(start: usize) -> Self {
        Self::new(start, None)
    }

    pub const fn whole_file() -> Self {
        Self::new(0, None)
    }

    pub fn contains(&self, line: usize) -> bool {
        line >= self.start && !matches!(self.end, Some(end) if line >= end)
    }

    /// Clamp against the real number of lines in a file
    ///
    /// An unbounded end becomes `total`, a bounded end is capped at `total`,
    /// and start is capped at the resulting end.
    pub fn clamp_to(&self, total: usize) -> Range<usize> {
        let end = self.end.map_or(total, |end| end.min(total));
        self.start.min(end)..end
    }

    /// Build a window from the optional `START[:END]` and `END` arguments
    ///
    /// Accepted shapes: nothing (whole file), `START`, `START:END`, `START END`.
    /// `END` may be `-1` for "to end of file".
    pub fn parse_args(start: Option<&str>, end: Option<&str>) -> Result<Self, WindowError> {
        let Some(start) = start else {
            return Ok(Self::whole_file());
        };

        let mut window: LineWindow = start.parse()?;
        if let Some(end) = end {
            if start.contains(':') {
                return Err(WindowError::ConflictingEnd {
                    compact: start.to_string(),
                    extra: end.to_string(),
                });
            }
            window.end = parse_end(end)?;
        }
        Ok(window)
    }
}

impl FromStr for LineWindow {
    type Err = WindowError;

    /// Parse `START` or `START:END`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((start, end)) => Ok(Self::new(parse_start(start)?, parse_end(end)?)),
            None => Ok(Self::from_start(parse_start(s)?)),
        }
    }
}

impl fmt::Display for LineWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.end {
            Some(end) => write!(f, "{}:{}", self.start, end),
            None => write!(f, "{}:{}", self.start, UNBOUNDED_END),
        }
    }
}

fn parse_number(s: &str) -> Result<i64, WindowError> {
    s.trim()
        .parse()
        .map_err(|_| WindowError::InvalidNumber(s.to_string()))
}

fn parse_start(s: &str) -> Result<usize, WindowError> {
    let value = parse_number(s)?;
    usize::try_from(value).map_err(|_| WindowError::NegativeStart(value))
}

fn parse_end(s: &str) -> Result<Option<usize>, WindowError> {
    match parse_number(s)? {
        UNBOUNDED_END => Ok(None),
        value => usize::try_from(value)
            .map(Some)
            .map_err(|_| WindowError::NegativeEnd(value)),
    }
}

/// A line range argument that doesn't match any accepted shape
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WindowError {
    #[error("invalid line number {0:?}")]
    InvalidNumber(String),
    #[error("start line must not be negative (got {0})")]
    NegativeStart(i64),
    #[error("end line must be -1 or not negative (got {0})")]
    NegativeEnd(i64),
    #[error("end line given twice: {compact:?} already has an end, {extra:?} is extra")]
    ConflictingEnd { compact: String, extra: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_no_args() {
        assert_eq!(LineWindow::parse_args(None, None), Ok(LineWindow::whole_file()));
    }

    #[test]
    fn test_parse_start_only() {
        assert_eq!(
            LineWindow::parse_args(Some("3"), None),
            Ok(LineWindow::from_start(3))
        );
    }

    #[test]
    fn test_parse_compact_and_split_forms_agree() {
        let compact = LineWindow::parse_args(Some("2:5"), None).unwrap();
        let split = LineWindow::parse_args(Some("2"), Some("5")).unwrap();
        assert_eq!(compact, LineWindow::bounded(2, 5));
        assert_eq!(compact, split);
    }

    #[test]
    fn test_parse_unbounded_sentinel() {
        assert_eq!(
            LineWindow::parse_args(Some("2"), Some("-1")),
            Ok(LineWindow::from_start(2))
        );
        assert_eq!("2:-1".parse(), Ok(LineWindow::from_start(2)));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            LineWindow::parse_args(Some("abc"), None),
            Err(WindowError::InvalidNumber("abc".into()))
        );
        assert_eq!(
            LineWindow::parse_args(Some("5:"), None),
            Err(WindowError::InvalidNumber("".into()))
        );
        assert_eq!(
            LineWindow::parse_args(Some("1:2:3"), None),
            Err(WindowError::InvalidNumber("2:3".into()))
        );
        assert_eq!(
            LineWindow::parse_args(Some("-3"), None),
            Err(WindowError::NegativeStart(-3))
        );
        assert_eq!(
            LineWindow::parse_args(Some("0"), Some("-2")),
            Err(WindowError::NegativeEnd(-2))
        );
        assert!(matches!(
            LineWindow::parse_args(Some("1:3"), Some("5")),
            Err(WindowError::ConflictingEnd { .. })
        ));
    }

    #[test]
    fn test_clamp_to() {
        assert_eq!(LineWindow::whole_file().clamp_to(10), 0..10);
        assert_eq!(LineWindow::from_start(2).clamp_to(10), 2..10);
        assert_eq!(LineWindow::bounded(2, 50).clamp_to(10), 2..10);
        assert_eq!(LineWindow::bounded(1_000_000, 1_000_005).clamp_to(5), 5..5);
        assert_eq!(LineWindow::from_start(1_000_000).clamp_to(5), 5..5);
        assert_eq!(LineWindow::bounded(6, 2).clamp_to(10), 2..2);
        assert_eq!(LineWindow::whole_file().clamp_to(0), 0..0);
    }

    #[test]
    fn test_contains() {
        let window = LineWindow::bounded(1, 3);
        assert!(!window.contains(0));
        assert!(window.contains(1));
        assert!(window.contains(2));
        assert!(!window.contains(3));
        assert!(LineWindow::from_start(4).contains(usize::MAX));
    }

    #[test]
    fn test_display() {
        assert_eq!(LineWindow::bounded(1, 3).to_string(), "1:3");
        assert_eq!(LineWindow::from_start(4).to_string(), "4:-1");
    }
}
