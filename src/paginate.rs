use std::ops::Range;

/// Posts shown on each page of a topic.
pub const POSTS_PER_PAGE: i64 = 20;

/// Topics with more pages than this only link to the first few.
pub const MANY_PAGES: u32 = 6;

/// How many pages a topic with this many posts spans.
///
/// This is one more than the usual ceiling division: a topic always advertises a trailing page.
/// Links out there already point at it, so it stays.
pub fn page_count(post_count: i64) -> u32 {
    let post_count = post_count.max(0);
    let full_pages = (post_count + POSTS_PER_PAGE - 1) / POSTS_PER_PAGE;
    #[allow(clippy::cast_possible_truncation)] // 4 billion pages would be 80 billion posts.
    let pages = full_pages as u32;
    pages + 1
}

pub fn has_many_pages(page_count: u32) -> bool {
    page_count > MANY_PAGES
}

/// The page numbers to link to from a topic listing.
pub fn page_range(page_count: u32) -> Range<u32> {
    if has_many_pages(page_count) {
        1..5
    } else {
        1..page_count + 1
    }
}

/// Number of posts to skip to reach the start of a 1-based page. Page 0 is page 1.
pub fn offset(page: u32) -> i64 {
    i64::from(page.max(1) - 1) * POSTS_PER_PAGE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_topic_has_one_page() {
        assert_eq!(page_count(0), 1);
    }

    #[test]
    fn counts_one_extra_page() {
        assert_eq!(page_count(1), 2);
        assert_eq!(page_count(20), 2);
        assert_eq!(page_count(21), 3);
        assert_eq!(page_count(100), 6);
        assert_eq!(page_count(101), 7);
    }

    #[test]
    fn many_pages_starts_after_six() {
        assert!(!has_many_pages(6));
        assert!(has_many_pages(7));
    }

    #[test]
    fn short_range_covers_every_page() {
        assert_eq!(page_range(1), 1..2);
        assert_eq!(page_range(6).collect::<Vec<_>>(), vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn long_range_is_capped() {
        assert_eq!(page_range(7), 1..5);
        assert_eq!(page_range(500).collect::<Vec<_>>(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn offsets() {
        assert_eq!(offset(0), 0);
        assert_eq!(offset(1), 0);
        assert_eq!(offset(2), 20);
        assert_eq!(offset(5), 80);
    }
}
