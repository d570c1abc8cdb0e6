use crate::graph::{ArtistGraph, Attributes};
use serde::{Deserialize, Serialize};
use serde_json::Map;

/// Node-link exchange shape of an [`ArtistGraph`]:
/// `{directed, multigraph, graph, nodes: [{id, ...attrs}], links: [{source, target, weight, playlists}]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkGraph {
    #[serde(default)]
    pub directed: bool,
    #[serde(default)]
    pub multigraph: bool,
    #[serde(default)]
    pub graph: Map<String, serde_json::Value>,
    pub nodes: Vec<LinkNode>,
    pub links: Vec<Link>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkNode {
    pub id: String,
    #[serde(flatten)]
    pub attributes: Attributes,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub source: String,
    pub target: String,
    pub weight: u64,
    #[serde(default)]
    pub playlists: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LinkGraphError {
    #[error("directed or multigraph records are not artist graphs")]
    UnsupportedKind,
    #[error("link {from} - {to} references a missing node or loops on itself")]
    InvalidLink { from: String, to: String },
}

impl From<&ArtistGraph> for LinkGraph {
    fn from(graph: &ArtistGraph) -> Self {
        let nodes = graph
            .artists()
            .map(|node| {
                // `id` is the node key in the record; an attribute of that name would clash.
                let mut attributes = node.attributes.clone();
                attributes.remove("id");
                LinkNode {
                    id: node.name.clone(),
                    attributes,
                }
            })
            .collect();

        let links = graph
            .connections()
            .map(|(source, target, connection)| Link {
                source: source.to_string(),
                target: target.to_string(),
                weight: connection.weight,
                playlists: connection.playlists.clone(),
            })
            .collect();

        Self {
            directed: false,
            multigraph: false,
            graph: Map::new(),
            nodes,
            links,
        }
    }
}

impl TryFrom<LinkGraph> for ArtistGraph {
    type Error = LinkGraphError;

    fn try_from(record: LinkGraph) -> Result<Self, Self::Error> {
        if record.directed || record.multigraph {
            return Err(LinkGraphError::UnsupportedKind);
        }

        let mut graph = ArtistGraph::new();
        for node in record.nodes {
            graph.add_artist(&node.id, node.attributes);
        }

        for link in record.links {
            let valid = graph.connection(&link.source, &link.target).is_none()
                && graph.add_connection(&link.source, &link.target, link.weight, &link.playlists);
            if !valid {
                return Err(LinkGraphError::InvalidLink {
                    from: link.source,
                    to: link.target,
                });
            }
        }
        Ok(graph)
    }
}
