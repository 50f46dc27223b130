//! crates/summaries_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or serialization format.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A persisted reading summary: a titled document broken into an ordered
/// sequence of chapters.
#[derive(Debug, Clone)]
pub struct Summary {
    pub id: Uuid,
    pub title: String,
    pub created_at: DateTime<Utc>,
    /// Chapters in reading order. Non-empty once persisted; positions are
    /// the contiguous 1-based ordinals `1..=len`.
    pub chapters: Vec<Chapter>,
}

impl Summary {
    /// The chapter a reader starts from.
    pub fn first_chapter(&self) -> Option<&Chapter> {
        self.chapters.first()
    }
}

/// One ordinal unit of content within a summary. A chapter belongs to its
/// parent summary and has no identity outside the parent's list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    /// 1-based ordinal within the parent summary.
    pub position: u32,
    pub content: String,
}

/// The data needed to persist a new summary. Chapter contents arrive in
/// reading order; positions are assigned from that order.
#[derive(Debug, Clone)]
pub struct NewSummary {
    pub title: String,
    pub chapters: Vec<String>,
}

impl NewSummary {
    /// Builds the full aggregate, assigning the identifier, the creation
    /// time, and contiguous 1-based chapter positions.
    pub fn into_summary(self, id: Uuid, created_at: DateTime<Utc>) -> Summary {
        let chapters = self
            .chapters
            .into_iter()
            .enumerate()
            .map(|(index, content)| Chapter {
                position: (index + 1) as u32,
                content,
            })
            .collect();
        Summary {
            id,
            title: self.title,
            created_at,
            chapters,
        }
    }
}

/// Selects which neighboring chapter a navigation request resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationDirection {
    Next,
    Previous,
}

impl NavigationDirection {
    /// Resolves the chapter one step from `current_position` in this
    /// direction, or `None` when the target ordinal falls outside
    /// `1..=chapters.len()`.
    ///
    /// Total over every `i32` input: negative, zero, and beyond-the-list
    /// positions resolve to `None` rather than panicking. The caller maps
    /// `None` to a not-found response.
    pub fn resolve<'a>(
        self,
        chapters: &'a [Chapter],
        current_position: i32,
    ) -> Option<&'a Chapter> {
        // Widened to i64 so stepping from i32::MAX cannot overflow.
        let target = match self {
            NavigationDirection::Next => i64::from(current_position) + 1,
            NavigationDirection::Previous => i64::from(current_position) - 1,
        };
        if target < 1 {
            return None;
        }
        let index = usize::try_from(target - 1).ok()?;
        chapters.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary_with(chapter_count: usize) -> Summary {
        let contents = (1..=chapter_count)
            .map(|n| format!("chapter {n} text"))
            .collect();
        NewSummary {
            title: "test summary".to_string(),
            chapters: contents,
        }
        .into_summary(Uuid::new_v4(), Utc::now())
    }

    #[test]
    fn next_resolves_the_following_chapter() {
        let summary = summary_with(3);
        let chapter = NavigationDirection::Next
            .resolve(&summary.chapters, 1)
            .unwrap();
        assert_eq!(chapter.position, 2);
    }

    #[test]
    fn next_at_the_last_chapter_resolves_nothing() {
        let summary = summary_with(3);
        assert!(NavigationDirection::Next
            .resolve(&summary.chapters, 3)
            .is_none());
    }

    #[test]
    fn previous_resolves_the_preceding_chapter() {
        let summary = summary_with(3);
        let chapter = NavigationDirection::Previous
            .resolve(&summary.chapters, 3)
            .unwrap();
        assert_eq!(chapter.position, 2);
    }

    #[test]
    fn previous_at_the_first_chapter_resolves_nothing() {
        let summary = summary_with(3);
        assert!(NavigationDirection::Previous
            .resolve(&summary.chapters, 1)
            .is_none());
    }

    #[test]
    fn every_valid_position_steps_as_specified() {
        // For all lengths L and positions p in [1, L]: Next hits p+1 iff
        // p+1 <= L, Previous hits p-1 iff p-1 >= 1.
        for len in 1..=5usize {
            let summary = summary_with(len);
            for p in 1..=len as i32 {
                let next = NavigationDirection::Next.resolve(&summary.chapters, p);
                if (p as usize) < len {
                    assert_eq!(next.map(|c| c.position), Some(p as u32 + 1));
                } else {
                    assert!(next.is_none());
                }

                let previous = NavigationDirection::Previous.resolve(&summary.chapters, p);
                if p > 1 {
                    assert_eq!(previous.map(|c| c.position), Some(p as u32 - 1));
                } else {
                    assert!(previous.is_none());
                }
            }
        }
    }

    #[test]
    fn out_of_range_positions_resolve_nothing() {
        let summary = summary_with(3);
        for direction in [NavigationDirection::Next, NavigationDirection::Previous] {
            assert!(direction.resolve(&summary.chapters, -1).is_none());
            assert!(direction.resolve(&summary.chapters, 42).is_none());
        }
        // The extremes stay total instead of overflowing.
        assert!(NavigationDirection::Next
            .resolve(&summary.chapters, i32::MAX)
            .is_none());
        assert!(NavigationDirection::Previous
            .resolve(&summary.chapters, i32::MIN)
            .is_none());
    }

    #[test]
    fn navigation_is_read_only_and_repeatable() {
        let summary = summary_with(3);
        let before = summary.chapters.clone();
        let first = NavigationDirection::Next
            .resolve(&summary.chapters, 1)
            .cloned();
        let second = NavigationDirection::Next
            .resolve(&summary.chapters, 1)
            .cloned();
        assert_eq!(first, second);
        assert_eq!(summary.chapters, before);
    }

    #[test]
    fn new_summary_assigns_contiguous_positions() {
        let summary = summary_with(4);
        let positions: Vec<u32> = summary.chapters.iter().map(|c| c.position).collect();
        assert_eq!(positions, vec![1, 2, 3, 4]);
        assert_eq!(summary.first_chapter().map(|c| c.position), Some(1));
    }

    #[test]
    fn empty_summary_has_no_first_chapter() {
        let summary = NewSummary {
            title: "empty".to_string(),
            chapters: Vec::new(),
        }
        .into_summary(Uuid::new_v4(), Utc::now());
        assert!(summary.first_chapter().is_none());
    }
}
