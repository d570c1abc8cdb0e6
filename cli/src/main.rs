use artistgraph::display::{
    display_artist, display_extended, display_influence, display_path, display_popular,
    display_search,
};
use artistgraph::{ArtistGraphApp, Args, Command, colors::ColorScheme};
use artistgraph_core::search::search_artists;
use clap::Parser;

fn main() {
    let args = Args::parse();
    let colors = ColorScheme::new(!args.no_color);

    let app = match ArtistGraphApp::open(&args.graph_id, args.data_dir.clone()) {
        Ok(app) => app,
        Err(e) => exit_with_error(&colors, &e.to_string()),
    };

    if let Err(message) = run(&app, &args, &colors) {
        exit_with_error(&colors, &message);
    }
}

fn run(app: &ArtistGraphApp, args: &Args, colors: &ColorScheme) -> Result<(), String> {
    let engine = app.engine();

    match &args.command {
        Command::Path { from, to } => {
            let from = app.resolve_artist(from)?;
            let to = app.resolve_artist(to)?;
            let search = engine.shortest_path(&from, &to);
            display_path(&from, &to, &search, args.verbose, colors);
        }
        Command::Popular { top_n } => {
            display_popular(&engine.popular_artists(*top_n), colors);
        }
        Command::Artist { name } => {
            let name = app.resolve_artist(name)?;
            let details = engine
                .artist_details(&name)
                .ok_or_else(|| format!("Artist '{}' not found in graph", name))?;
            display_artist(&details, colors);
        }
        Command::Influence { name } => {
            let name = app.resolve_artist(name)?;
            display_influence(&name, &engine.influence(&name), colors);
        }
        Command::Extended { name } => {
            let name = app.resolve_artist(name)?;
            display_extended(&name, &engine.extended_connections(&name), colors);
        }
        Command::Search { query, limit } => {
            display_search(query, &search_artists(&app.graph, query, *limit), colors);
        }
    }
    Ok(())
}

fn exit_with_error(colors: &ColorScheme, message: &str) -> ! {
    eprintln!("{} {}", colors.error("❌ Error:"), message);
    std::process::exit(1);
}
