//! Accès SQLite au catalogue et aux registres de visionnage
//!
//! Une seule connexion protégée par mutex ; les tables et index sont créés
//! à l'ouverture. Les horodatages sont des chaînes RFC 3339, dont l'ordre
//! lexicographique est l'ordre chronologique.

use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::Mutex;

use crate::rows::{
    AudioFormatBumper, RatingBumper, SongRow, TriviaEntry, VideoBumper, WatchedTrailer,
    WatchedTrivia, BROKEN_URL,
};
use crate::Result;

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS watched_trailers (
        wid TEXT PRIMARY KEY,
        source TEXT NOT NULL,
        watched INTEGER NOT NULL DEFAULT 0,
        date TEXT,
        title TEXT NOT NULL DEFAULT '',
        url TEXT NOT NULL DEFAULT '',
        user_agent TEXT,
        rating TEXT,
        genres TEXT
    )",
    "CREATE INDEX IF NOT EXISTS idx_watched_trailers_rotation
        ON watched_trailers (source, watched, date)",
    "CREATE TABLE IF NOT EXISTS watched_trivia (
        wid TEXT PRIMARY KEY,
        watched INTEGER NOT NULL DEFAULT 0,
        date TEXT
    )",
    "CREATE INDEX IF NOT EXISTS idx_watched_trivia_rotation
        ON watched_trivia (watched, date)",
    "CREATE TABLE IF NOT EXISTS trivia (
        tid TEXT PRIMARY KEY,
        kind TEXT NOT NULL,
        name TEXT,
        rating TEXT,
        question_path TEXT,
        clue_path0 TEXT,
        clue_path1 TEXT,
        clue_path2 TEXT,
        clue_path3 TEXT,
        clue_path4 TEXT,
        clue_path5 TEXT,
        clue_path6 TEXT,
        clue_path7 TEXT,
        clue_path8 TEXT,
        clue_path9 TEXT,
        answer_path TEXT,
        duration REAL NOT NULL DEFAULT 0
    )",
    "CREATE INDEX IF NOT EXISTS idx_trivia_kind ON trivia (kind)",
    "CREATE TABLE IF NOT EXISTS rating_bumpers (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        system TEXT NOT NULL,
        name TEXT NOT NULL,
        is_3d INTEGER NOT NULL DEFAULT 0,
        is_image INTEGER NOT NULL DEFAULT 0,
        style TEXT,
        path TEXT NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_rating_bumpers_selector
        ON rating_bumpers (system, name, is_3d, is_image)",
    "CREATE TABLE IF NOT EXISTS video_bumpers (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        kind TEXT NOT NULL,
        is_3d INTEGER NOT NULL DEFAULT 0,
        path TEXT NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_video_bumpers_selector
        ON video_bumpers (kind, is_3d)",
    "CREATE TABLE IF NOT EXISTS audio_format_bumpers (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        format TEXT NOT NULL,
        is_3d INTEGER NOT NULL DEFAULT 0,
        path TEXT NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_audio_format_bumpers_selector
        ON audio_format_bumpers (format, is_3d)",
    "CREATE TABLE IF NOT EXISTS songs (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        path TEXT NOT NULL,
        duration REAL NOT NULL DEFAULT 0
    )",
];

/// Base de données du moteur de pré-séance
///
/// Regroupe les catalogues de contenus et les registres de visionnage :
/// - catalogues : trivia, bumpers de classification, bumpers vidéo,
///   bumpers de format audio, morceaux
/// - registres : bandes-annonces et trivia déjà servis
#[derive(Debug)]
pub struct Store {
    conn: Mutex<Connection>,
}

impl Store {
    /// Ouvre (ou crée) la base à l'emplacement donné
    ///
    /// # Arguments
    ///
    /// * `path` - Chemin du fichier SQLite ; le répertoire parent est créé
    ///   si nécessaire
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        Self::init_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Base en mémoire, pour les tests
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn init_schema(conn: &Connection) -> Result<()> {
        for sql in SCHEMA {
            conn.execute(sql, [])?;
        }
        Ok(())
    }

    // ==================== Registre des bandes-annonces ====================

    /// La bande-annonce a-t-elle déjà été servie ?
    pub fn trailer_is_watched(&self, wid: &str) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let result = conn.query_row(
            "SELECT watched FROM watched_trailers WHERE wid = ?1",
            [wid],
            |row| row.get::<_, bool>(0),
        );

        match result {
            Ok(watched) => Ok(watched),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Récupère une ligne du registre par identifiant
    pub fn watched_trailer(&self, wid: &str) -> Result<Option<WatchedTrailer>> {
        let conn = self.conn.lock().unwrap();
        let result = conn.query_row(
            "SELECT wid, source, watched, date, title, url, user_agent, rating, genres
             FROM watched_trailers WHERE wid = ?1",
            [wid],
            trailer_from_row,
        );

        match result {
            Ok(entry) => Ok(Some(entry)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Ajoute ou met à jour une ligne du registre des bandes-annonces
    ///
    /// Chaque service d'une bande-annonce réécrit sa ligne complète : état
    /// vu, date, URL résolue (ou [`BROKEN_URL`]), classification et genres.
    pub fn record_trailer(&self, t: &WatchedTrailer) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO watched_trailers
                 (wid, source, watched, date, title, url, user_agent, rating, genres)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
             ON CONFLICT(wid) DO UPDATE SET
                 source = excluded.source,
                 watched = excluded.watched,
                 date = excluded.date,
                 title = excluded.title,
                 url = excluded.url,
                 user_agent = excluded.user_agent,
                 rating = excluded.rating,
                 genres = excluded.genres",
            params![
                t.wid,
                t.source,
                t.watched,
                t.date,
                t.title,
                t.url,
                t.user_agent,
                t.rating,
                t.genres
            ],
        )?;

        Ok(())
    }

    /// Lignes vues les plus anciennes d'abord, lignes BROKEN exclues
    ///
    /// # Arguments
    ///
    /// * `source` - Restreint à une source ("iTunes", ...) si fournie
    pub fn oldest_trailers(&self, source: Option<&str>) -> Result<Vec<WatchedTrailer>> {
        let conn = self.conn.lock().unwrap();

        let entries = match source {
            Some(src) => {
                let mut stmt = conn.prepare(
                    "SELECT wid, source, watched, date, title, url, user_agent, rating, genres
                     FROM watched_trailers
                     WHERE watched = 1 AND url <> ?1 AND source = ?2
                     ORDER BY date ASC",
                )?;
                let rows = stmt.query_map(params![BROKEN_URL, src], trailer_from_row)?;
                rows.collect::<rusqlite::Result<Vec<_>>>()?
            }
            None => {
                let mut stmt = conn.prepare(
                    "SELECT wid, source, watched, date, title, url, user_agent, rating, genres
                     FROM watched_trailers
                     WHERE watched = 1 AND url <> ?1
                     ORDER BY date ASC",
                )?;
                let rows = stmt.query_map(params![BROKEN_URL], trailer_from_row)?;
                rows.collect::<rusqlite::Result<Vec<_>>>()?
            }
        };

        Ok(entries)
    }

    /// Re-marque une ligne comme vue à la date donnée (rotation)
    pub fn restamp_trailer(&self, wid: &str, date: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "UPDATE watched_trailers SET watched = 1, date = ?1 WHERE wid = ?2",
            params![date, wid],
        )?;
        Ok(())
    }

    /// Vide le registre des bandes-annonces vues
    ///
    /// # Returns
    ///
    /// Le nombre de lignes supprimées
    pub fn clear_watched_trailers(&self) -> Result<usize> {
        let conn = self.conn.lock().unwrap();
        let deleted = conn.execute("DELETE FROM watched_trailers", [])?;
        Ok(deleted)
    }

    // ==================== Registre des trivia ====================

    /// Le trivia a-t-il déjà été servi ?
    pub fn trivia_is_watched(&self, tid: &str) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let result = conn.query_row(
            "SELECT watched FROM watched_trivia WHERE wid = ?1",
            [tid],
            |row| row.get::<_, bool>(0),
        );

        match result {
            Ok(watched) => Ok(watched),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Marque un trivia comme vu à la date donnée (création si absent)
    pub fn mark_trivia_watched(&self, tid: &str, date: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO watched_trivia (wid, watched, date) VALUES (?1, 1, ?2)
             ON CONFLICT(wid) DO UPDATE SET watched = 1, date = excluded.date",
            params![tid, date],
        )?;
        Ok(())
    }

    /// Identifiants de tous les trivia déjà vus
    pub fn watched_trivia_ids(&self) -> Result<Vec<String>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT wid FROM watched_trivia WHERE watched = 1")?;
        let ids = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(ids)
    }

    /// Lignes vues, les plus anciennes d'abord (pour la rotation)
    pub fn oldest_watched_trivia(&self) -> Result<Vec<WatchedTrivia>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT wid, watched, date FROM watched_trivia
             WHERE watched = 1
             ORDER BY date ASC",
        )?;
        let entries = stmt
            .query_map([], |row| {
                Ok(WatchedTrivia {
                    wid: row.get(0)?,
                    watched: row.get(1)?,
                    date: row.get(2)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(entries)
    }

    /// Vide le registre des trivia vus
    pub fn clear_watched_trivia(&self) -> Result<usize> {
        let conn = self.conn.lock().unwrap();
        let deleted = conn.execute("DELETE FROM watched_trivia", [])?;
        Ok(deleted)
    }

    // ==================== Catalogue de trivia ====================

    /// Ajoute ou met à jour une entrée du catalogue de trivia
    pub fn add_trivia(&self, t: &TriviaEntry) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO trivia
                 (tid, kind, name, rating, question_path,
                  clue_path0, clue_path1, clue_path2, clue_path3, clue_path4,
                  clue_path5, clue_path6, clue_path7, clue_path8, clue_path9,
                  answer_path, duration)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13,
                     ?14, ?15, ?16, ?17)
             ON CONFLICT(tid) DO UPDATE SET
                 kind = excluded.kind,
                 name = excluded.name,
                 rating = excluded.rating,
                 question_path = excluded.question_path,
                 clue_path0 = excluded.clue_path0,
                 clue_path1 = excluded.clue_path1,
                 clue_path2 = excluded.clue_path2,
                 clue_path3 = excluded.clue_path3,
                 clue_path4 = excluded.clue_path4,
                 clue_path5 = excluded.clue_path5,
                 clue_path6 = excluded.clue_path6,
                 clue_path7 = excluded.clue_path7,
                 clue_path8 = excluded.clue_path8,
                 clue_path9 = excluded.clue_path9,
                 answer_path = excluded.answer_path,
                 duration = excluded.duration",
            params![
                t.tid,
                t.kind,
                t.name,
                t.rating,
                t.question_path,
                t.clue_paths[0],
                t.clue_paths[1],
                t.clue_paths[2],
                t.clue_paths[3],
                t.clue_paths[4],
                t.clue_paths[5],
                t.clue_paths[6],
                t.clue_paths[7],
                t.clue_paths[8],
                t.clue_paths[9],
                t.answer_path,
                t.duration
            ],
        )?;

        Ok(())
    }

    /// Entrées du catalogue en ordre aléatoire
    ///
    /// # Arguments
    ///
    /// * `videos` - `true` pour les quiz vidéo, `false` pour tout le
    ///   reste (diaporamas, quelle que soit leur sous-catégorie)
    pub fn trivia_shuffled(&self, videos: bool) -> Result<Vec<TriviaEntry>> {
        let conn = self.conn.lock().unwrap();
        let clause = if videos {
            "kind = 'video'"
        } else {
            "kind <> 'video'"
        };
        let mut stmt = conn.prepare(&format!(
            "SELECT tid, kind, name, rating, question_path,
                    clue_path0, clue_path1, clue_path2, clue_path3, clue_path4,
                    clue_path5, clue_path6, clue_path7, clue_path8, clue_path9,
                    answer_path, duration
             FROM trivia WHERE {clause}
             ORDER BY RANDOM()"
        ))?;
        let entries = stmt
            .query_map([], trivia_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(entries)
    }

    /// Récupère une entrée du catalogue par identifiant
    pub fn trivia_by_id(&self, tid: &str) -> Result<Option<TriviaEntry>> {
        let conn = self.conn.lock().unwrap();
        let result = conn.query_row(
            "SELECT tid, kind, name, rating, question_path,
                    clue_path0, clue_path1, clue_path2, clue_path3, clue_path4,
                    clue_path5, clue_path6, clue_path7, clue_path8, clue_path9,
                    answer_path, duration
             FROM trivia WHERE tid = ?1",
            [tid],
            trivia_from_row,
        );

        match result {
            Ok(entry) => Ok(Some(entry)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    // ==================== Bumpers de classification ====================

    /// Ajoute un bumper de classification au catalogue
    ///
    /// # Returns
    ///
    /// L'identifiant de la ligne insérée
    pub fn add_rating_bumper(
        &self,
        system: &str,
        name: &str,
        is_3d: bool,
        is_image: bool,
        style: Option<&str>,
        path: &str,
    ) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO rating_bumpers (system, name, is_3d, is_image, style, path)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![system, name, is_3d, is_image, style, path],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Premier bumper correspondant au style demandé, dans l'ordre du
    /// catalogue
    pub fn rating_bumper_with_style(
        &self,
        system: &str,
        name: &str,
        is_3d: bool,
        is_image: bool,
        style: &str,
    ) -> Result<Option<RatingBumper>> {
        let conn = self.conn.lock().unwrap();
        let result = conn.query_row(
            "SELECT id, system, name, is_3d, is_image, style, path
             FROM rating_bumpers
             WHERE system = ?1 AND name = ?2 AND is_3d = ?3 AND is_image = ?4
                   AND style = ?5
             ORDER BY id LIMIT 1",
            params![system, name, is_3d, is_image, style],
            rating_bumper_from_row,
        );

        match result {
            Ok(entry) => Ok(Some(entry)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Tous les bumpers correspondant à une classification
    pub fn rating_bumpers(
        &self,
        system: &str,
        name: &str,
        is_3d: bool,
        is_image: bool,
    ) -> Result<Vec<RatingBumper>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, system, name, is_3d, is_image, style, path
             FROM rating_bumpers
             WHERE system = ?1 AND name = ?2 AND is_3d = ?3 AND is_image = ?4
             ORDER BY id",
        )?;
        let entries = stmt
            .query_map(params![system, name, is_3d, is_image], rating_bumper_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(entries)
    }

    // ==================== Bumpers vidéo ====================

    /// Ajoute un bumper vidéo au catalogue
    pub fn add_video_bumper(&self, kind: &str, is_3d: bool, path: &str) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO video_bumpers (kind, is_3d, path) VALUES (?1, ?2, ?3)",
            params![kind, is_3d, path],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Bumpers d'un type donné
    ///
    /// # Arguments
    ///
    /// * `kind` - Étiquette du type ("countdown", "trivia.intro", ...)
    /// * `is_3d` - Variante recherchée, ou `None` pour ignorer la
    ///   dimension (repli 2D)
    pub fn video_bumpers(&self, kind: &str, is_3d: Option<bool>) -> Result<Vec<VideoBumper>> {
        let conn = self.conn.lock().unwrap();

        let map_row = |row: &rusqlite::Row<'_>| -> rusqlite::Result<VideoBumper> {
            Ok(VideoBumper {
                id: row.get(0)?,
                kind: row.get(1)?,
                is_3d: row.get(2)?,
                path: row.get(3)?,
            })
        };

        let entries = match is_3d {
            Some(flag) => {
                let mut stmt = conn.prepare(
                    "SELECT id, kind, is_3d, path FROM video_bumpers
                     WHERE kind = ?1 AND is_3d = ?2
                     ORDER BY id",
                )?;
                let rows = stmt.query_map(params![kind, flag], map_row)?;
                rows.collect::<rusqlite::Result<Vec<_>>>()?
            }
            None => {
                let mut stmt = conn.prepare(
                    "SELECT id, kind, is_3d, path FROM video_bumpers
                     WHERE kind = ?1
                     ORDER BY id",
                )?;
                let rows = stmt.query_map(params![kind], map_row)?;
                rows.collect::<rusqlite::Result<Vec<_>>>()?
            }
        };

        Ok(entries)
    }

    // ==================== Bumpers de format audio ====================

    /// Ajoute un bumper de format audio au catalogue
    pub fn add_audio_format_bumper(&self, format: &str, is_3d: bool, path: &str) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO audio_format_bumpers (format, is_3d, path) VALUES (?1, ?2, ?3)",
            params![format, is_3d, path],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Bumpers annonçant un format audio donné
    ///
    /// # Arguments
    ///
    /// * `format` - Nom canonique du format ("Dolby Digital", ...)
    /// * `is_3d` - Variante recherchée, ou `None` pour ignorer la
    ///   dimension (repli 2D)
    pub fn audio_format_bumpers(
        &self,
        format: &str,
        is_3d: Option<bool>,
    ) -> Result<Vec<AudioFormatBumper>> {
        let conn = self.conn.lock().unwrap();

        let map_row = |row: &rusqlite::Row<'_>| -> rusqlite::Result<AudioFormatBumper> {
            Ok(AudioFormatBumper {
                id: row.get(0)?,
                format: row.get(1)?,
                is_3d: row.get(2)?,
                path: row.get(3)?,
            })
        };

        let entries = match is_3d {
            Some(flag) => {
                let mut stmt = conn.prepare(
                    "SELECT id, format, is_3d, path FROM audio_format_bumpers
                     WHERE format = ?1 AND is_3d = ?2
                     ORDER BY id",
                )?;
                let rows = stmt.query_map(params![format, flag], map_row)?;
                rows.collect::<rusqlite::Result<Vec<_>>>()?
            }
            None => {
                let mut stmt = conn.prepare(
                    "SELECT id, format, is_3d, path FROM audio_format_bumpers
                     WHERE format = ?1
                     ORDER BY id",
                )?;
                let rows = stmt.query_map(params![format], map_row)?;
                rows.collect::<rusqlite::Result<Vec<_>>>()?
            }
        };

        Ok(entries)
    }

    // ==================== Fonds musical ====================

    /// Ajoute un morceau au fonds musical des diaporamas
    pub fn add_song(&self, path: &str, duration: f64) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO songs (path, duration) VALUES (?1, ?2)",
            params![path, duration],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Tous les morceaux, en ordre aléatoire
    pub fn songs_shuffled(&self) -> Result<Vec<SongRow>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt =
            conn.prepare("SELECT id, path, duration FROM songs ORDER BY RANDOM()")?;
        let entries = stmt
            .query_map([], |row| {
                Ok(SongRow {
                    id: row.get(0)?,
                    path: row.get(1)?,
                    duration: row.get(2)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(entries)
    }
}

fn trailer_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<WatchedTrailer> {
    Ok(WatchedTrailer {
        wid: row.get(0)?,
        source: row.get(1)?,
        watched: row.get(2)?,
        date: row.get(3)?,
        title: row.get(4)?,
        url: row.get(5)?,
        user_agent: row.get(6)?,
        rating: row.get(7)?,
        genres: row.get(8)?,
    })
}

fn trivia_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<TriviaEntry> {
    Ok(TriviaEntry {
        tid: row.get(0)?,
        kind: row.get(1)?,
        name: row.get(2)?,
        rating: row.get(3)?,
        question_path: row.get(4)?,
        clue_paths: [
            row.get(5)?,
            row.get(6)?,
            row.get(7)?,
            row.get(8)?,
            row.get(9)?,
            row.get(10)?,
            row.get(11)?,
            row.get(12)?,
            row.get(13)?,
            row.get(14)?,
        ],
        answer_path: row.get(15)?,
        duration: row.get(16)?,
    })
}

fn rating_bumper_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RatingBumper> {
    Ok(RatingBumper {
        id: row.get(0)?,
        system: row.get(1)?,
        name: row.get(2)?,
        is_3d: row.get(3)?,
        is_image: row.get(4)?,
        style: row.get(5)?,
        path: row.get(6)?,
    })
}
