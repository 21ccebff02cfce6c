mod app;
use flashcard_engine::*;

use app::MyApp;
use config::AppConfig;
use database::SqliteStorage;
use log::info;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::load(AppConfig::default_path())?;
    let mut store = CardStore::open(SqliteStorage::open(&config.database_path)?)?;

    if store.is_empty() && config.seed_sample_cards {
        let added = store.import(seed::sample_cards()?)?;
        info!("Sample data created: {} cards", added);
    }

    let stats = Stats::compute(store.all());
    info!(
        "{} cards loaded ({} reviewed, {} mastered)",
        stats.total_cards, stats.reviewed_cards, stats.mastered_cards
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([640.0, 760.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Interview Flashcards",
        options,
        Box::new(move |_cc| Ok(Box::new(MyApp::new(store, config.session_seed)))),
    )
    .map_err(|e| e.to_string())?;
    Ok(())
}
