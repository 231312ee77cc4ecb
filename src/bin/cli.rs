// src/bin/cli.rs
fn main() -> color_eyre::Result<()> {
    statscraper::cli::run()
}
