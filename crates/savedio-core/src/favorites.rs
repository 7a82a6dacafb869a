//! Smart favorites selection

use crate::models::{sort_bookmarks, Bookmark, BookmarkId, SortOrder};

/// Maximum number of favorites chosen automatically
pub const MAX_SMART_FAVORITES: usize = 10;

/// What a click does to the favorites when smart favorites are enabled
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Promotion {
    /// Favorites stay as they are
    Skip,
    /// The clicked bookmark becomes a favorite
    Add,
    /// The clicked bookmark replaces the given favorite
    Swap(BookmarkId),
}

/// Pick the most clicked bookmarks, at most [`MAX_SMART_FAVORITES`].
///
/// Bookmarks that were never opened are not eligible.
pub fn select_smart_favorites(bookmarks: &[Bookmark]) -> Vec<BookmarkId> {
    let mut clicked: Vec<Bookmark> = bookmarks
        .iter()
        .filter(|bookmark| bookmark.click_counter > 0)
        .cloned()
        .collect();
    sort_bookmarks(&mut clicked, SortOrder::Clicks);

    clicked
        .into_iter()
        .take(MAX_SMART_FAVORITES)
        .map(|bookmark| bookmark.id)
        .collect()
}

/// Decide whether a just clicked bookmark should become a favorite.
///
/// `clicked` must already carry the incremented click counter. When the
/// favorites are full, the first favorite with fewer clicks is replaced.
pub fn promote_on_click(clicked: &Bookmark, favorites: &[Bookmark]) -> Promotion {
    if clicked.is_favorite {
        return Promotion::Skip;
    }
    if favorites.len() < MAX_SMART_FAVORITES {
        return Promotion::Add;
    }

    favorites
        .iter()
        .find(|favorite| favorite.click_counter < clicked.click_counter)
        .map_or(Promotion::Skip, |favorite| {
            Promotion::Swap(favorite.id.clone())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bookmark(id: &str, clicks: i64, is_favorite: bool) -> Bookmark {
        let mut bookmark = Bookmark::new(format!("https://example.com/{id}"), id);
        bookmark.id = BookmarkId::from(id);
        bookmark.click_counter = clicks;
        bookmark.is_favorite = is_favorite;
        bookmark
    }

    #[test]
    fn test_select_ignores_unclicked() {
        let bookmarks = vec![bookmark("a", 0, false), bookmark("b", 2, false)];
        assert_eq!(
            select_smart_favorites(&bookmarks),
            vec![BookmarkId::from("b")]
        );
    }

    #[test]
    fn test_select_caps_at_maximum() {
        let bookmarks: Vec<Bookmark> = (1..=15)
            .map(|clicks| bookmark(&format!("b{clicks}"), clicks, false))
            .collect();

        let selected = select_smart_favorites(&bookmarks);
        assert_eq!(selected.len(), MAX_SMART_FAVORITES);
        assert_eq!(selected[0], BookmarkId::from("b15"));
        assert!(!selected.contains(&BookmarkId::from("b5")));
    }

    #[test]
    fn test_promote_skips_existing_favorite() {
        let clicked = bookmark("a", 3, true);
        assert_eq!(promote_on_click(&clicked, &[]), Promotion::Skip);
    }

    #[test]
    fn test_promote_adds_when_room_left() {
        let clicked = bookmark("a", 1, false);
        let favorites = vec![bookmark("f", 50, true)];
        assert_eq!(promote_on_click(&clicked, &favorites), Promotion::Add);
    }

    #[test]
    fn test_promote_swaps_first_weaker_favorite() {
        let favorites: Vec<Bookmark> = (0..10)
            .map(|i| bookmark(&format!("f{i}"), if i < 3 { 20 } else { 4 }, true))
            .collect();

        let clicked = bookmark("a", 5, false);
        assert_eq!(
            promote_on_click(&clicked, &favorites),
            Promotion::Swap(BookmarkId::from("f3"))
        );

        let weak = bookmark("w", 4, false);
        assert_eq!(promote_on_click(&weak, &favorites), Promotion::Skip);
    }
}
