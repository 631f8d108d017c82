//! # mqengine - Le moteur de séquence du pré-programme
//!
//! Cette crate assemble le tout : elle interprète un programme
//! ([`mqsequence::Sequence`]) contre un contexte d'exécution et produit la
//! timeline jouable servie au lecteur hôte.
//!
//! - [`SequenceProcessor`] : la machine à états (parcours du programme,
//!   sauts `skip`/`back` conditionnels, curseur bidirectionnel)
//! - [`handlers`] : un handler par catégorie d'item (feature, trivia,
//!   trailer, bumpers, action), chacun avec sa sélection aléatoire
//!   filtrée par l'historique
//! - [`RunContext`] : l'état partagé d'une séance (file de features,
//!   classifications et genres accumulés, collaborateurs de l'hôte)
//!
//! # Architecture
//!
//! Le moteur ne touche ni le réseau ni l'écran : les découvertes de
//! trailers ([`TrailerScraper`]), le disque ([`MediaLister`]) et
//! l'exécution des actions ([`ActionFactory`]) sont des traits fournis
//! par l'hôte. Tout le travail est synchrone, sur un seul fil.
//!
//! # Exemple
//!
//! ```no_run
//! use std::collections::BTreeMap;
//! use std::sync::Arc;
//!
//! use mqengine::{
//!     FileActionFactory, FsMediaLister, NullScraper, RunContext, SequenceProcessor,
//! };
//! use mqsequence::Sequence;
//! use mqstore::Store;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let sequence = Sequence::load("pre_show.json")?;
//! let ctx = RunContext::new(
//!     Arc::new(BTreeMap::new()),
//!     Arc::new(Store::open_in_memory()?),
//!     Arc::new(NullScraper),
//!     Arc::new(FsMediaLister),
//!     Arc::new(FileActionFactory),
//!     None,
//! );
//!
//! let mut processor = SequenceProcessor::new(sequence, ctx);
//! processor.process()?;
//! while let Some(unit) = processor.next() {
//!     println!("{unit}");
//! }
//! # Ok(())
//! # }
//! ```

mod actions;
mod config_ext;
mod context;
mod error;
mod fs;
pub mod handlers;
mod processor;
mod scraper;

// Réexports publics
pub use actions::{ActionFactory, FileActionFactory, FileActionProcessor};
pub use config_ext::EngineConfigExt;
pub use context::RunContext;
pub use error::{Error, Result};
pub use fs::{FsMediaLister, MediaLister};
pub use processor::SequenceProcessor;
pub use scraper::{rewrite_quality, NullScraper, ScrapedTrailer, TrailerScraper};
