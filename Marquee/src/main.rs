use std::env;
use std::fs;
use std::sync::Arc;

use anyhow::{Context, Result};
use mqconfig::get_config;
use mqengine::{
    EngineConfigExt, FileActionFactory, FsMediaLister, NullScraper, RunContext, SequenceProcessor,
};
use mqplayable::Feature;
use mqsequence::Sequence;
use mqstore::{Store, StoreConfigExt};
use tracing::info;
use tracing_subscriber::filter::LevelFilter;

fn main() -> Result<()> {
    // ========== PHASE 1 : Configuration et journalisation ==========

    let config = get_config();
    init_logging(&config);

    let Some(sequence_path) = env::args().nth(1) else {
        eprintln!("Usage: marquee <sequence.json> [features.json]");
        std::process::exit(2);
    };
    let features_path = env::args().nth(2);

    // ========== PHASE 2 : Préparation de la séance ==========

    info!("🎞️ Loading sequence {sequence_path}");
    let sequence = Sequence::load(&sequence_path)
        .with_context(|| format!("Cannot load sequence {sequence_path}"))?;

    let db_path = config.store_db_path();
    let store = Store::open(&db_path)
        .with_context(|| format!("Cannot open store {}", db_path.display()))?;

    let ctx = RunContext::new(
        config.clone(),
        Arc::new(store),
        Arc::new(NullScraper),
        Arc::new(FsMediaLister),
        Arc::new(FileActionFactory),
        config.content_path(),
    );
    let mut processor = SequenceProcessor::new(sequence, ctx);

    if let Some(path) = features_path {
        info!("🎬 Loading features {path}");
        let data =
            fs::read_to_string(&path).with_context(|| format!("Cannot read features {path}"))?;
        let features: Vec<Feature> =
            serde_json::from_str(&data).with_context(|| format!("Cannot parse features {path}"))?;
        info!("✅ {} feature(s) queued", features.len());
        for feature in features {
            processor.add_feature(feature);
        }
    }

    // ========== PHASE 3 : Compilation et sortie ==========

    processor.process()?;

    // Une unité JSON par ligne, dans l'ordre de lecture
    while let Some(unit) = processor.next() {
        println!("{}", serde_json::to_string(&*unit)?);
    }

    info!("✅ Marquee done");
    Ok(())
}

/// Initialise la journalisation sur stderr, au niveau minimum configuré.
/// stdout reste réservé à la timeline JSON.
fn init_logging(config: &mqconfig::Config) {
    let level = config
        .get_log_min_level()
        .unwrap_or_else(|_| "INFO".to_string());

    tracing_subscriber::fmt()
        .with_max_level(level_filter(&level))
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();
}

fn level_filter(level: &str) -> LevelFilter {
    match level.to_uppercase().as_str() {
        "ERROR" => LevelFilter::ERROR,
        "WARN" => LevelFilter::WARN,
        "INFO" => LevelFilter::INFO,
        "DEBUG" => LevelFilter::DEBUG,
        "TRACE" => LevelFilter::TRACE,
        _ => LevelFilter::INFO,
    }
}
