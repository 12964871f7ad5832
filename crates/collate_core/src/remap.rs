//! Block index remapping for merged streams.

use crate::aggregate::DestinationGroup;
use crate::error::{MergeError, MergeResult};
use crate::resolver::FragmentId;
use collate_manifest::{FileSegment, Locator};
use tracing::error;

/// A segment whose block index points into the merged block list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemappedSegment {
    /// Fragment the segment came from.
    pub fragment: FragmentId,
    /// The segment with its merged block index.
    pub segment: FileSegment,
}

/// A destination stream after remapping, before name deduplication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemappedStream {
    /// Destination stream path.
    pub path: String,
    /// Merged block list.
    pub locators: Vec<Locator>,
    /// Segments in member order.
    pub segments: Vec<RemappedSegment>,
}

/// Rewrites segment block indices from fragment-local to merged positions.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockIndexRemapper;

impl BlockIndexRemapper {
    /// Remaps every segment of `group` to `base + original index`.
    ///
    /// # Errors
    ///
    /// Returns [`MergeError::RemapInvariantViolation`] if a remapped index
    /// falls outside the merged block list. This only happens when a
    /// fragment's segments reference blocks it does not carry.
    pub fn remap(group: DestinationGroup) -> MergeResult<RemappedStream> {
        let len = group.locators.len();
        let mut segments = Vec::new();
        for member in group.members {
            for mut segment in member.segments {
                let index = member.base + segment.block_index;
                if index >= len {
                    error!(
                        stream = %group.path,
                        fragment = %member.fragment,
                        index,
                        len,
                        "Remapped block index out of range"
                    );
                    return Err(MergeError::RemapInvariantViolation {
                        stream: group.path,
                        index,
                        len,
                    });
                }
                segment.block_index = index;
                segments.push(RemappedSegment {
                    fragment: member.fragment,
                    segment,
                });
            }
        }
        Ok(RemappedStream {
            path: group.path,
            locators: group.locators,
            segments,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::GroupMember;

    fn loc(hash_byte: char, size: u64) -> Locator {
        Locator::new(hash_byte.to_string().repeat(32), size).unwrap()
    }

    #[test]
    fn offsets_by_member_base() {
        let group = DestinationGroup {
            path: ".".into(),
            locators: vec![loc('a', 3), loc('b', 5), loc('c', 7)],
            members: vec![
                GroupMember {
                    fragment: FragmentId(0),
                    base: 0,
                    segments: vec![FileSegment::new(0, 0, 3, "foo")],
                },
                GroupMember {
                    fragment: FragmentId(1),
                    base: 1,
                    segments: vec![
                        FileSegment::new(1, 2, 5, "bar"),
                        FileSegment::new(0, 0, 5, "baz"),
                    ],
                },
            ],
        };
        let stream = BlockIndexRemapper::remap(group).unwrap();
        let indices: Vec<usize> = stream
            .segments
            .iter()
            .map(|s| s.segment.block_index)
            .collect();
        assert_eq!(indices, vec![0, 2, 1]);
        assert_eq!(stream.segments[1].segment.offset, 2);
        assert_eq!(stream.segments[1].fragment, FragmentId(1));
    }

    #[test]
    fn out_of_range_is_invariant_violation() {
        let group = DestinationGroup {
            path: "./dir1".into(),
            locators: vec![loc('a', 3)],
            members: vec![GroupMember {
                fragment: FragmentId(0),
                base: 0,
                segments: vec![FileSegment::new(1, 0, 3, "foo")],
            }],
        };
        match BlockIndexRemapper::remap(group) {
            Err(MergeError::RemapInvariantViolation { stream, index, len }) => {
                assert_eq!(stream, "./dir1");
                assert_eq!(index, 1);
                assert_eq!(len, 1);
            }
            other => panic!("unexpected result {other:?}"),
        }
    }
}
