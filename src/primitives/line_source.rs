use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use crate::view::window::LineWindow;

/// One line of a source file with its line terminator stripped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    /// Zero-based position of the line in the file
    pub index: usize,
    pub text: String,
}

/// Forward-only iterator over the lines of a file that fall inside a window
///
/// Lines before `window.start` are read and dropped; reading stops as soon as
/// `window.end` is reached, so a bounded window never scans the rest of the
/// file. The reader is owned by the iterator and released when it drops.
///
/// A read error is yielded once and ends the iteration.
pub struct LineSource<R> {
    reader: R,
    window: LineWindow,
    /// Index of the line the next `read_until` will produce
    next_index: usize,
    buf: Vec<u8>,
    done: bool,
}

impl LineSource<BufReader<File>> {
    /// Open `path` and stream the lines inside `window`
    pub fn open<P: AsRef<Path>>(path: P, window: LineWindow) -> io::Result<Self> {
        let file = File::open(path.as_ref())?;
        Ok(Self::from_reader(BufReader::new(file), window))
    }
}

impl<R: BufRead> LineSource<R> {
    pub fn from_reader(reader: R, window: LineWindow) -> Self {
        Self {
            reader,
            window,
            next_index: 0,
            buf: Vec::new(),
            done: false,
        }
    }
}

impl<R: BufRead> Iterator for LineSource<R> {
    type Item = io::Result<SourceLine>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            if self.window.end.is_some_and(|end| self.next_index >= end) {
                self.done = true;
                break;
            }

            self.buf.clear();
            match self.reader.read_until(b'\n', &mut self.buf) {
                Ok(0) => self.done = true,
                Ok(_) => {
                    let index = self.next_index;
                    self.next_index += 1;
                    if !self.window.contains(index) {
                        continue;
                    }
                    let text = String::from_utf8_lossy(strip_line_ending(&self.buf)).into_owned();
                    return Some(Ok(SourceLine { index, text }));
                }
                Err(e) => {
                    tracing::error!("LineSource: read failed at line {}: {}", self.next_index, e);
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
        None
    }
}

/// Read a whole file as text, decoding invalid UTF-8 lossily like [`LineSource`] does
pub fn read_to_string<P: AsRef<Path>>(path: P) -> io::Result<String> {
    let bytes = std::fs::read(path.as_ref())?;
    Ok(match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    })
}

/// Split text into lines the same way [`LineSource`] does
///
/// A break is a `\n`; a trailing break does not start an extra empty line, and
/// `\r\n` endings lose their `\r`. `"a\nb\n"` and `"a\nb"` both give two lines,
/// `""` gives none.
pub fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split_inclusive('\n').map(trim_line_ending)
}

/// Strip one trailing `\n`, `\r\n` or `\r`
pub fn trim_line_ending(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

fn strip_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}
