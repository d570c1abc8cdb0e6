use artistgraph_core::graph_id::is_graph_id;
use artistgraph_core::search::{clean_str, search_artists};
use artistgraph_core::{ArtistGraph, GraphCache, QueryEngine};
use std::{error::Error, path::PathBuf};

pub struct ArtistGraphApp {
    pub graph_id: String,
    pub data_dir: PathBuf,
    pub graph: ArtistGraph,
}

impl ArtistGraphApp {
    pub fn open(graph_id: &str, data_dir: Option<PathBuf>) -> Result<Self, Box<dyn Error>> {
        let data_dir = match data_dir {
            Some(path) => {
                if !path.exists() {
                    return Err(format!("Data path does not exist: {:?}", path).into());
                }
                path
            }
            None => default_data_dir()?,
        };

        if !is_graph_id(graph_id) {
            return Err(format!("'{}' is not a graph id (expected 64 hex characters)", graph_id).into());
        }

        let graph = GraphCache::new(&data_dir)
            .load(graph_id)
            .ok_or_else(|| format!("Graph {} not found in {:?}", graph_id, data_dir))?;

        Ok(Self {
            graph_id: graph_id.to_string(),
            data_dir,
            graph,
        })
    }

    pub fn engine(&self) -> QueryEngine<'_> {
        QueryEngine::new(&self.graph)
    }

    /// Resolves user input to an artist in the graph: exact name first,
    /// then a case and accent insensitive match.
    pub fn resolve_artist(&self, name: &str) -> Result<String, String> {
        if self.graph.contains(name) {
            return Ok(name.to_string());
        }

        let clean_query = clean_str(name);
        let lowercase_query = name.to_lowercase();
        let mut matches: Vec<&str> = self
            .graph
            .artists()
            .map(|artist| artist.name.as_str())
            .filter(|candidate| clean_str(candidate) == clean_query)
            .collect();

        if matches.len() > 1 {
            if let Some(exact) = matches
                .iter()
                .find(|candidate| candidate.to_lowercase() == lowercase_query)
            {
                return Ok(exact.to_string());
            }
            matches.sort();
        }

        match matches.first() {
            Some(found) => Ok(found.to_string()),
            None => {
                let suggestions = search_artists(&self.graph, name, 3);
                if suggestions.is_empty() {
                    Err(format!("Artist '{}' not found in graph", name))
                } else {
                    Err(format!(
                        "Artist '{}' not found in graph (did you mean: {}?)",
                        name,
                        suggestions.join(", ")
                    ))
                }
            }
        }
    }
}

fn default_data_dir() -> Result<PathBuf, Box<dyn Error>> {
    let home = dirs::home_dir().ok_or("Could not determine home directory")?;
    Ok(home.join(".artistgraph").join("graphs"))
}
