use crate::graph::ArtistGraph;
use unidecode::unidecode;

/// ASCII-folded, lowercased, whitespace-collapsed form of a name.
pub fn clean_str(input: &str) -> String {
    unidecode(input)
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<&str>>()
        .join(" ")
}

/// Artists whose cleaned name contains the cleaned query. Names starting
/// with the query come first, then shorter names, then alphabetical.
pub fn search_artists(graph: &ArtistGraph, query: &str, limit: usize) -> Vec<String> {
    let normalized_query = clean_str(query);
    if normalized_query.is_empty() {
        return Vec::new();
    }

    let mut results: Vec<(bool, &str)> = graph
        .artists()
        .filter_map(|artist| {
            let normalized_name = clean_str(&artist.name);
            normalized_name
                .contains(&normalized_query)
                .then(|| (normalized_name.starts_with(&normalized_query), artist.name.as_str()))
        })
        .collect();

    results.sort_by(|a, b| {
        b.0.cmp(&a.0)
            .then_with(|| a.1.len().cmp(&b.1.len()))
            .then_with(|| a.1.cmp(b.1))
    });

    results
        .into_iter()
        .take(limit)
        .map(|(_, name)| name.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Attributes;

    #[test]
    fn clean_str_folds_case_accents_and_spacing() {
        assert_eq!(clean_str("  Sigur   Rós "), "sigur ros");
        assert_eq!(clean_str("BJÖRK"), "bjork");
    }

    #[test]
    fn prefix_matches_rank_first() {
        let mut graph = ArtistGraph::new();
        for name in ["The Beach Boys", "Beach House", "Beachwood Sparks", "Slowdive"] {
            graph.add_artist(name, Attributes::new());
        }

        assert_eq!(
            search_artists(&graph, "beach", 10),
            vec!["Beach House", "Beachwood Sparks", "The Beach Boys"]
        );
        assert_eq!(search_artists(&graph, "BEACH", 1), vec!["Beach House"]);
        assert!(search_artists(&graph, "   ", 10).is_empty());
    }
}
