use crate::{models::Movie, store::CatalogStore};

/// Lists catalog movies for the title picker
///
/// Without a query every movie is returned in catalog order. A non-blank
/// query keeps titles containing it, ignoring case.
pub fn search_titles<'a>(catalog: &'a CatalogStore, query: Option<&str>) -> Vec<&'a Movie> {
    let needle = query
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(str::to_lowercase);

    match needle {
        Some(needle) => catalog
            .movies()
            .iter()
            .filter(|movie| movie.title.to_lowercase().contains(&needle))
            .collect(),
        None => catalog.movies().iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SimilarityMatrix;

    fn store() -> CatalogStore {
        let movies = vec![
            Movie::new(1, "The Dark Knight"),
            Movie::new(2, "Avatar"),
            Movie::new(3, "The Dark Knight Rises"),
        ];
        CatalogStore::new(movies, SimilarityMatrix::new(vec![vec![0.0; 3]; 3])).unwrap()
    }

    #[test]
    fn test_no_query_lists_everything_in_order() {
        let store = store();
        let ids: Vec<u64> = search_titles(&store, None).iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_blank_query_lists_everything() {
        let store = store();
        assert_eq!(search_titles(&store, Some("   ")).len(), 3);
    }

    #[test]
    fn test_query_is_case_insensitive_substring() {
        let store = store();
        let ids: Vec<u64> = search_titles(&store, Some("dark KNIGHT"))
            .iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_query_without_match() {
        let store = store();
        assert!(search_titles(&store, Some("Inception")).is_empty());
    }
}
