//! Grouping of fragments by destination stream.

use crate::resolver::{Fragment, FragmentId};
use collate_manifest::{FileSegment, Locator};
use std::collections::BTreeMap;
use tracing::debug;

/// The segments one fragment contributes to a destination stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupMember {
    /// Contributing fragment.
    pub fragment: FragmentId,
    /// Number of blocks already in the destination block list when this
    /// fragment's blocks were appended.
    pub base: usize,
    /// Segments with their original, fragment-local block indices.
    pub segments: Vec<FileSegment>,
}

/// Everything written to one destination stream, before remapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationGroup {
    /// Destination stream path.
    pub path: String,
    /// Concatenated block lists of all members, in member order.
    pub locators: Vec<Locator>,
    /// Contributing fragments in selector order.
    pub members: Vec<GroupMember>,
}

impl DestinationGroup {
    fn new(path: String) -> Self {
        Self {
            path,
            locators: Vec::new(),
            members: Vec::new(),
        }
    }
}

/// Groups fragments by destination and concatenates their block lists.
#[derive(Debug, Clone, Copy, Default)]
pub struct StreamAggregator;

impl StreamAggregator {
    /// Groups `fragments`, which must be in selector order.
    ///
    /// Duplicate locators from different fragments are kept; a block list
    /// is only ever shared within one destination stream.
    #[must_use]
    pub fn aggregate(fragments: Vec<Fragment>) -> BTreeMap<String, DestinationGroup> {
        let mut groups: BTreeMap<String, DestinationGroup> = BTreeMap::new();
        for fragment in fragments {
            let group = groups
                .entry(fragment.destination.clone())
                .or_insert_with(|| DestinationGroup::new(fragment.destination));
            let base = group.locators.len();
            group.locators.extend(fragment.locators);
            debug!(
                fragment = %fragment.id,
                destination = %group.path,
                base,
                "Appended fragment blocks"
            );
            group.members.push(GroupMember {
                fragment: fragment.id,
                base,
                segments: fragment.segments,
            });
        }
        groups
    }
}
