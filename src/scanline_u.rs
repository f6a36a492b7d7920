//! Unpacked scanline container.
//!
//! Holds the runs of one swept row. Partial pixels keep one coverage byte
//! each and adjacent ones coalesce into a single per-pixel run; interior
//! spans are stored as one solid value. The container is reused from row
//! to row so sweeping allocates only while a row is wider than any before.

/// Coverage of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coverage<'a> {
    /// Every pixel of the run has the same coverage.
    Solid(u8),
    /// One coverage byte per pixel; the slice length equals the run length.
    PerPixel(&'a [u8]),
}

/// A horizontal run of covered pixels. `len > 0`, coverage never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run<'a> {
    pub x: i32,
    pub len: u32,
    pub coverage: Coverage<'a>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SpanKind {
    Solid(u8),
    PerPixel { offset: usize },
}

#[derive(Debug, Clone, Copy)]
struct Span {
    x: i32,
    len: u32,
    kind: SpanKind,
}

/// Scanline with 8-bit coverage.
///
/// Protocol: `reset_spans()`, then `add_cell()` / `add_span()` with x
/// strictly increasing, then `finalize(y)`, then read with [`runs`](Self::runs).
#[derive(Debug, Clone, Default)]
pub struct ScanlineU8 {
    y: i32,
    spans: Vec<Span>,
    covers: Vec<u8>,
}

impl ScanlineU8 {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset_spans(&mut self) {
        self.spans.clear();
        self.covers.clear();
    }

    /// Add one partial pixel.
    pub fn add_cell(&mut self, x: i32, cover: u8) {
        if let Some(last) = self.spans.last_mut() {
            if let SpanKind::PerPixel { .. } = last.kind {
                if last.x as i64 + last.len as i64 == x as i64 {
                    last.len += 1;
                    self.covers.push(cover);
                    return;
                }
            }
        }
        self.spans.push(Span {
            x,
            len: 1,
            kind: SpanKind::PerPixel {
                offset: self.covers.len(),
            },
        });
        self.covers.push(cover);
    }

    /// Add `len` pixels of identical coverage.
    pub fn add_span(&mut self, x: i32, len: u32, cover: u8) {
        self.spans.push(Span {
            x,
            len,
            kind: SpanKind::Solid(cover),
        });
    }

    pub fn finalize(&mut self, y: i32) {
        self.y = y;
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    pub fn num_spans(&self) -> usize {
        self.spans.len()
    }

    pub fn runs(&self) -> Runs<'_> {
        Runs {
            spans: self.spans.iter(),
            covers: &self.covers,
        }
    }
}

/// Iterator over the runs of a [`ScanlineU8`].
#[derive(Debug, Clone)]
pub struct Runs<'a> {
    spans: std::slice::Iter<'a, Span>,
    covers: &'a [u8],
}

impl<'a> Iterator for Runs<'a> {
    type Item = Run<'a>;

    fn next(&mut self) -> Option<Run<'a>> {
        let span = self.spans.next()?;
        let coverage = match span.kind {
            SpanKind::Solid(c) => Coverage::Solid(c),
            SpanKind::PerPixel { offset } => {
                Coverage::PerPixel(&self.covers[offset..offset + span.len as usize])
            }
        };
        Some(Run {
            x: span.x,
            len: span.len,
            coverage,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.spans.size_hint()
    }
}

impl ExactSizeIterator for Runs<'_> {}
