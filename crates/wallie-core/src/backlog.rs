use crate::size::{Size, BUCKETS, SELECTABLE};
use serde::Serialize;

/// A backlog item as shown on the boards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Story {
    pub id: String,
    pub title: String,
    pub description: String,
    pub author: String,
    pub size: Size,
}

/// Stories that still need sizing or have not been started, in tracker rank
/// order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Backlog {
    pub project: String,
    pub stories: Vec<Story>,
    /// Prefix for story links, e.g. `https://jira.example.com/browse/`.
    pub base_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Group {
    pub name: Size,
    pub stories: Vec<Story>,
}

impl Backlog {
    /// Sizes a story can be given from the estimation dialogue.
    pub fn sizes(&self) -> &'static [Size] {
        &SELECTABLE
    }

    pub fn by_size(&self) -> Vec<Group> {
        group_by_size(&self.stories)
    }

    pub fn link(&self, story: &Story) -> String {
        format!("{}{}", self.base_url, story.id)
    }
}

/// Partitions stories into one group per column of [`BUCKETS`].
///
/// Stories keep their input order inside a group. Anything without a
/// column of its own lands in the `Unsized` group.
pub fn group_by_size(stories: &[Story]) -> Vec<Group> {
    let mut groups: Vec<Group> = BUCKETS
        .iter()
        .map(|&name| Group {
            name,
            stories: Vec::new(),
        })
        .collect();

    for story in stories {
        let bucket = story.size.bucket();
        let index = BUCKETS.iter().position(|&b| b == bucket).unwrap_or(0);
        groups[index].stories.push(story.clone());
    }

    groups
}
