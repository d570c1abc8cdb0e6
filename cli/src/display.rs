use artistgraph_core::ArtistDetails;
use artistgraph_core::query::{ExtendedConnections, Influence, PathSearch, PopularArtist};

use crate::colors::ColorScheme;
use crate::utils::format_number;

fn quoted(name: &str) -> String {
    format!("\"{}\"", name)
}

pub fn format_path(path: &[String], colors: &ColorScheme) -> String {
    path.iter()
        .map(|name| colors.artist_name(&quoted(name)).to_string())
        .collect::<Vec<_>>()
        .join(" → ")
}

pub fn display_path(from: &str, to: &str, search: &PathSearch, verbose: bool, colors: &ColorScheme) {
    println!(
        "🎵 Finding path from {} to {}",
        colors.artist_name(&quoted(from)),
        colors.artist_name(&quoted(to))
    );

    match &search.path {
        Some(path) => {
            println!(
                "{} Found path with {} steps:\n",
                colors.success("✅"),
                colors.number(&path.len().saturating_sub(1).to_string())
            );
            println!("{}", format_path(path, colors));
        }
        None => {
            println!(
                "{} {} and {}",
                colors.error("❌ No path found between"),
                colors.artist_name(&quoted(from)),
                colors.artist_name(&quoted(to))
            );
        }
    }

    if verbose {
        println!("\n---\n");
        println!(
            "{} Explored {} artists in {} ms",
            colors.stats("📊"),
            colors.number(&format_number(search.artists_visited)),
            colors.number(&search.duration_ms.to_string())
        );
    }
}

pub fn format_popular(artists: &[PopularArtist], colors: &ColorScheme) -> Vec<String> {
    artists
        .iter()
        .enumerate()
        .map(|(index, artist)| {
            format!(
                "{:3} {} {}",
                colors.step_number(&format!("{}.", index + 1)),
                colors.artist_name(&quoted(&artist.name)),
                colors.number(&format!("({})", format_number(artist.total_weight as usize)))
            )
        })
        .collect()
}

pub fn display_popular(artists: &[PopularArtist], colors: &ColorScheme) {
    if artists.is_empty() {
        println!("{}", colors.error("❌ The graph has no artists"));
        return;
    }
    println!("{}", colors.heading("Most connected artists"));
    for line in format_popular(artists, colors) {
        println!("{}", line);
    }
}

pub fn format_artist(details: &ArtistDetails, colors: &ColorScheme) -> Vec<String> {
    let mut lines = vec![colors.artist_name(&quoted(&details.name)).to_string()];

    if !details.genres.is_empty() {
        let genres = details
            .genres
            .iter()
            .map(|genre| colors.genre(genre).to_string())
            .collect::<Vec<_>>()
            .join(", ");
        lines.push(format!("Genres: {}", genres));
    }

    lines.push(format!(
        "{} ({})",
        colors.heading("Connections"),
        colors.number(&details.connections.len().to_string())
    ));
    for connection in &details.connections {
        let playlists = connection
            .shared_playlists
            .iter()
            .map(|playlist| colors.playlist(playlist).to_string())
            .collect::<Vec<_>>()
            .join(", ");
        lines.push(format!(
            "  {} - {}",
            colors.artist_name(&quoted(&connection.artist_name)),
            playlists
        ));
    }

    lines.push(format!(
        "{} {}",
        colors.heading("Shared playlists:"),
        colors.number(&details.playlists.len().to_string())
    ));
    lines
}

pub fn display_artist(details: &ArtistDetails, colors: &ColorScheme) {
    for line in format_artist(details, colors) {
        println!("{}", line);
    }
}

pub fn display_influence(name: &str, influence: &Influence, colors: &ColorScheme) {
    println!("{}", colors.artist_name(&quoted(name)));
    println!(
        "Degree centrality:      {}",
        colors.number(&format!("{:.4}", influence.degree_centrality))
    );
    println!(
        "Betweenness centrality: {}",
        colors.number(&format!("{:.4}", influence.betweenness_centrality))
    );
}

pub fn format_extended(name: &str, extended: &ExtendedConnections, colors: &ColorScheme) -> Vec<String> {
    let mut lines = vec![format!(
        "{} {}",
        colors.artist_name(&quoted(name)),
        colors.heading("connects to:")
    )];
    for neighbor in &extended.first_degree {
        lines.push(format!("  {}", colors.artist_name(&quoted(neighbor))));
        if let Some(second) = extended.extended.get(neighbor) {
            for artist in second.iter().filter(|artist| artist.as_str() != name) {
                lines.push(format!("    ↳ {}", colors.artist_name(&quoted(artist))));
            }
        }
    }
    lines
}

pub fn display_extended(name: &str, extended: &ExtendedConnections, colors: &ColorScheme) {
    if extended.first_degree.is_empty() {
        println!(
            "{} {} has no connections",
            colors.error("❌"),
            colors.artist_name(&quoted(name))
        );
        return;
    }
    for line in format_extended(name, extended, colors) {
        println!("{}", line);
    }
}

pub fn display_search(query: &str, results: &[String], colors: &ColorScheme) {
    if results.is_empty() {
        println!("{} No artists match '{}'", colors.error("❌"), query);
        return;
    }
    for name in results {
        println!("{}", colors.artist_name(&quoted(name)));
    }
}
