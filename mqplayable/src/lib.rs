//! # mqplayable - Unités jouables et files du pré-programme
//!
//! Cette crate définit ce que le moteur produit et ce que le lecteur hôte
//! consomme :
//! - Les unités jouables : `Image`, `Video`, `Song`, `Action` — des
//!   enregistrements sérialisables sans logique d'hôte
//! - Les fiches `Feature` mises en file par l'hôte avant une séance
//! - Les deux files spécialisées : `ImageQueue` (diaporama à extension
//!   paresseuse, coupure de durée aux frontières de set) et `VideoQueue`
//! - `PlayableItem` : l'entrée de la timeline aplatie, terminée par `End`
//!
//! # Architecture
//!
//! Les files ne connaissent ni la base ni les réglages : elles reçoivent à
//! la construction une capacité ([`SlideFeed`] / [`VideoFeed`]) qui sait
//! produire la suite du contenu et consigner ce qui a été vu.
//!
//! # Exemple
//!
//! ```
//! use mqplayable::{Image, ImageQueue};
//!
//! let mut queue = ImageQueue::new(300.0);
//! queue.append_all(vec![
//!     Image::new("/trivia/q1.jpg", 10.0),
//!     Image::new("/trivia/a1.jpg", 10.0),
//! ]);
//!
//! assert_eq!(queue.duration, 20.0);
//! let first = queue.next(None, false).unwrap();
//! assert_eq!(first.path, "/trivia/q1.jpg");
//! ```

mod feature;
mod item;
mod queue;
mod units;

// Réexports publics
pub use feature::{AudioFormat, Feature};
pub use item::PlayableItem;
pub use queue::{ImageQueue, SlideFeed, VideoFeed, VideoQueue};
pub use units::{Action, ActionProcessor, Image, Song, Video};
