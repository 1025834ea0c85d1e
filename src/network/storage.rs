//! Flat-file persistence for the network store
//!
//! Two tab-separated tables live in the storage directory: `cities.txt`
//! and `roads.txt`. Every save rewrites one whole file. The roads table
//! carries a stable integer id ("Nbr") per road; ids are never held in
//! memory, so each save merges the in-memory roads against whatever is
//! already on disk to keep them stable. Loading is best-effort: a line
//! that cannot be parsed or resolved is skipped, never fatal.

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use super::error::NetworkError;
use super::store::NetworkStore;
use super::types::{is_valid_budget, MAX_CITIES};

const CITIES_FILE: &str = "cities.txt";
const ROADS_FILE: &str = "roads.txt";
const CITIES_HEADER: &str = "Index\tCity Name";
const ROADS_HEADER: &str = "Nbr\tRoad\t\t\tBudget";
const PAIR_SEPARATOR: &str = " - ";

/// Largest road id accepted from the file. Ids above this leave no
/// headroom for the ids a save may assign after them (a full network
/// holds fewer than MAX_CITIES^2 roads), so such records are dropped
/// like any other malformed line.
const MAX_NBR: u64 = u64::MAX - (MAX_CITIES * MAX_CITIES) as u64;

/// One parsed data line of the roads table.
#[derive(Debug, Clone)]
struct RoadRecord {
    nbr: u64,
    city_a: String,
    city_b: String,
    budget: f64,
}

impl RoadRecord {
    /// Whether this record connects the given unordered name pair.
    fn connects(&self, first: &str, second: &str) -> bool {
        (self.city_a == first && self.city_b == second)
            || (self.city_a == second && self.city_b == first)
    }
}

/// Parses `<nbr>\t<cityA> - <cityB>\t<budget>`. Returns None for any
/// malformed line so the caller can drop it.
fn parse_road_line(line: &str) -> Option<RoadRecord> {
    let (nbr_field, rest) = line.split_once('\t')?;
    let (road_field, budget_field) = rest.split_once('\t')?;
    let nbr: u64 = nbr_field.trim().parse().ok()?;
    if nbr > MAX_NBR {
        return None;
    }
    let budget = budget_field.trim().parse().ok()?;
    let (city_a, city_b) = road_field.split_once(PAIR_SEPARATOR)?;
    Some(RoadRecord {
        nbr,
        city_a: city_a.to_string(),
        city_b: city_b.to_string(),
        budget,
    })
}

/// Handle on the storage directory holding the two persisted tables.
/// The directory is created on first save.
pub struct Storage {
    dir: PathBuf,
}

impl Storage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn cities_path(&self) -> PathBuf {
        self.dir.join(CITIES_FILE)
    }

    pub fn roads_path(&self) -> PathBuf {
        self.dir.join(ROADS_FILE)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn ensure_dir(&self) -> Result<(), NetworkError> {
        fs::create_dir_all(&self.dir)?;
        Ok(())
    }

    /// Rewrites the cities table in full. The index column is
    /// positional, so there is no identifier to preserve here.
    pub fn save_cities(&self, store: &NetworkStore) -> Result<(), NetworkError> {
        self.ensure_dir()?;
        let mut out = String::from(CITIES_HEADER);
        out.push('\n');
        for (index, name) in store.list_cities() {
            out.push_str(&format!("{}\t{}\n", index, name));
        }
        fs::write(self.cities_path(), out)?;
        Ok(())
    }

    /// Rewrites the roads table, preserving the stable id of every
    /// road that is already on disk.
    pub fn save_roads(&self, store: &NetworkStore) -> Result<(), NetworkError> {
        self.save_roads_merged(store, None)
    }

    /// Like [`save_roads`](Self::save_roads), but aware that one city
    /// was just renamed: records carrying the old name keep their id
    /// and come out with the new name.
    pub fn save_roads_after_rename(
        &self,
        store: &NetworkStore,
        old_name: &str,
        new_name: &str,
    ) -> Result<(), NetworkError> {
        self.save_roads_merged(store, Some((old_name, new_name)))
    }

    fn save_roads_merged(
        &self,
        store: &NetworkStore,
        rename: Option<(&str, &str)>,
    ) -> Result<(), NetworkError> {
        self.ensure_dir()?;

        let mut existing = self.read_road_records();
        if let Some((old_name, new_name)) = rename {
            for record in &mut existing {
                if record.city_a == old_name {
                    record.city_a = new_name.to_string();
                }
                if record.city_b == old_name {
                    record.city_b = new_name.to_string();
                }
            }
        }

        // Merge: a pair already on disk keeps its id and takes the
        // in-memory budget; a new pair gets max-seen-id + 1. Records
        // whose road is gone from memory are dropped.
        let mut next_nbr = existing.iter().map(|r| r.nbr).max().unwrap_or(0);
        let mut updated: Vec<RoadRecord> = Vec::new();
        for (first, second, budget) in store.roads_with_budgets() {
            let nbr = match existing.iter().find(|r| r.connects(first, second)) {
                Some(found) => found.nbr,
                None => {
                    next_nbr += 1;
                    next_nbr
                }
            };
            updated.push(RoadRecord {
                nbr,
                city_a: first.to_string(),
                city_b: second.to_string(),
                budget,
            });
        }
        updated.sort_by_key(|r| r.nbr);

        let mut out = String::from(ROADS_HEADER);
        out.push('\n');
        for record in &updated {
            out.push_str(&format!(
                "{}\t{}{}{}\t{:.1}\n",
                record.nbr, record.city_a, PAIR_SEPARATOR, record.city_b, record.budget
            ));
        }
        fs::write(self.roads_path(), out)?;
        Ok(())
    }

    /// Reads every parseable record from the roads table. A missing or
    /// unreadable file yields an empty list.
    fn read_road_records(&self) -> Vec<RoadRecord> {
        let text = match fs::read_to_string(self.roads_path()) {
            Ok(text) => text,
            Err(_) => return Vec::new(),
        };
        let mut records = Vec::new();
        for line in text.lines().skip(1) {
            match parse_road_line(line) {
                Some(record) => records.push(record),
                None => debug!("dropping malformed road line: {:?}", line),
            }
        }
        records
    }

    /// Loads both tables into a fresh store.
    ///
    /// Cities load first, unconditionally, so both matrices reach their
    /// final dimension before any road line is resolved. Roads store
    /// city names rather than indices, so a line referencing an unknown
    /// name is skipped, as is any line whose budget fails validation.
    /// Load never fails startup; missing files mean an empty store.
    pub fn load(&self) -> NetworkStore {
        let mut store = NetworkStore::new();
        self.load_cities(&mut store);
        self.load_roads(&mut store);
        store
    }

    fn load_cities(&self, store: &mut NetworkStore) {
        let text = match fs::read_to_string(self.cities_path()) {
            Ok(text) => text,
            Err(_) => return,
        };
        for line in text.lines().skip(1) {
            let Some((_, name)) = line.split_once('\t') else {
                debug!("skipping malformed city line: {:?}", line);
                continue;
            };
            if let Err(err) = store.add_city(name) {
                debug!("skipping city line {:?}: {}", line, err);
            }
        }
    }

    fn load_roads(&self, store: &mut NetworkStore) {
        let text = match fs::read_to_string(self.roads_path()) {
            Ok(text) => text,
            Err(_) => return,
        };
        for line in text.lines().skip(1) {
            let Some(record) = parse_road_line(line) else {
                debug!("skipping malformed road line: {:?}", line);
                continue;
            };
            if !is_valid_budget(record.budget) {
                debug!("skipping road line with invalid budget: {:?}", line);
                continue;
            }
            if let Err(err) = store.add_road(&record.city_a, &record.city_b) {
                debug!("skipping road line {:?}: {}", line, err);
                continue;
            }
            if let Err(err) = store.set_budget(&record.city_a, &record.city_b, record.budget) {
                debug!("could not apply budget from line {:?}: {}", line, err);
            }
        }
    }
}
