use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: usize,
    pub end: usize,
}

impl ByteRange {
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockRange {
    pub name: String,
    pub range: ByteRange,
}

/// Placement of every block inside a character's payload area.
///
/// Blocks are kept in declaration order; [`BlockLayout::storage_order`]
/// gives the order they appear in the area.
#[derive(Debug, Clone)]
pub struct BlockLayout {
    pub area_offset: usize,
    pub area_len: usize,
    pub blocks: Vec<BlockRange>,
}

impl BlockLayout {
    /// Indices into `blocks` sorted by start offset. Ties keep declaration order.
    pub fn storage_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.blocks.len()).collect();
        order.sort_by_key(|&index| self.blocks[index].range.start);
        order
    }

    pub fn validate(&self) -> Result<()> {
        for block in &self.blocks {
            if block.range.end < block.range.start || block.range.end > self.area_len {
                return Err(Error::format(
                    self.area_offset + block.range.start.min(self.area_len),
                    format!(
                        "block {:?} range {}..{} lies outside the {}-byte payload area",
                        block.name, block.range.start, block.range.end, self.area_len
                    ),
                ));
            }
        }

        let order = self.storage_order();
        for pair in order.windows(2) {
            let prev = &self.blocks[pair[0]];
            let next = &self.blocks[pair[1]];
            if next.range.start < prev.range.end && !next.range.is_empty() {
                return Err(Error::format(
                    self.area_offset + next.range.start,
                    format!(
                        "block {:?} overlaps block {:?}: {}..{} vs {}..{}",
                        next.name,
                        prev.name,
                        next.range.start,
                        next.range.end,
                        prev.range.start,
                        prev.range.end
                    ),
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn block(name: &str, start: usize, end: usize) -> BlockRange {
        BlockRange {
            name: name.to_string(),
            range: ByteRange { start, end },
        }
    }

    #[test]
    fn storage_order_sorts_by_start() {
        let layout = BlockLayout {
            area_offset: 0,
            area_len: 30,
            blocks: vec![block("b", 10, 30), block("a", 0, 10)],
        };
        layout.validate().unwrap();
        assert_eq!(layout.storage_order(), vec![1, 0]);
    }

    #[test]
    fn rejects_out_of_range_and_overlap() {
        let past_end = BlockLayout {
            area_offset: 100,
            area_len: 8,
            blocks: vec![block("a", 4, 12)],
        };
        assert_eq!(past_end.validate().unwrap_err().kind(), ErrorKind::Format);

        let overlap = BlockLayout {
            area_offset: 0,
            area_len: 20,
            blocks: vec![block("a", 0, 10), block("b", 5, 20)],
        };
        assert_eq!(overlap.validate().unwrap_err().kind(), ErrorKind::Format);
    }
}
