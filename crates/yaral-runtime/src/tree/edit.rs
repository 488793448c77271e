//! Old-to-new offset map built from the edits applied to a tree.

/// Edited byte range, in the coordinates of the text before this edit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InputEdit {
    pub start_byte: usize,
    pub old_end_byte: usize,
    pub new_end_byte: usize,
}

impl InputEdit {
    /// Replace `old` with `new_len` bytes.
    pub fn replace(old: std::ops::Range<usize>, new_len: usize) -> Self {
        Self {
            start_byte: old.start,
            old_end_byte: old.end,
            new_end_byte: old.start + new_len,
        }
    }
}

/// Unchanged old range `[old_start, old_end)` now found at `new_start`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Segment {
    pub old_start: usize,
    pub old_end: usize,
    pub new_start: usize,
}

impl Segment {
    fn new_end(&self) -> usize {
        self.new_start + (self.old_end - self.old_start)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct EditMap {
    segments: Vec<Segment>,
}

impl EditMap {
    /// Nothing edited yet. The map covers one byte past the end so that
    /// lookahead into the end of input is tracked too.
    pub fn identity(len: usize) -> Self {
        Self {
            segments: vec![Segment {
                old_start: 0,
                old_end: len + 1,
                new_start: 0,
            }],
        }
    }

    pub fn apply(&mut self, edit: &InputEdit) {
        let start = edit.start_byte;
        let old_end = edit.old_end_byte.max(start);
        let new_end = edit.new_end_byte.max(start);

        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        for segment in &self.segments {
            let segment_end = segment.new_end();
            if segment.new_start < start {
                let end = segment_end.min(start);
                segments.push(Segment {
                    old_start: segment.old_start,
                    old_end: segment.old_start + (end - segment.new_start),
                    new_start: segment.new_start,
                });
            }
            if segment_end > old_end {
                let begin = segment.new_start.max(old_end);
                segments.push(Segment {
                    old_start: segment.old_start + (begin - segment.new_start),
                    old_end: segment.old_end,
                    new_start: begin - old_end + new_end,
                });
            }
        }
        segments.retain(|s| s.old_start < s.old_end);
        self.segments = segments;
    }

    /// New offset of old range `[start, end)` if the whole range is unchanged.
    pub fn translate(&self, start: usize, end: usize) -> Option<usize> {
        let index = self
            .segments
            .partition_point(|segment| segment.old_end <= start);
        let segment = self.segments.get(index)?;
        (segment.old_start <= start && end <= segment.old_end)
            .then(|| segment.new_start + (start - segment.old_start))
    }

    #[cfg(test)]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }
}
