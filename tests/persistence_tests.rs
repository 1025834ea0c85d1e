//! Round-trip, merge-protocol, and corruption-tolerance tests for the
//! two persisted tables

use std::fs;

use road_ledger::network::{NetworkStore, Storage};
use tempfile::TempDir;

/// Kigali--Huye (budget 250.5) and Kigali--Musanze (budget 100.0)
fn sample_store() -> NetworkStore {
    let mut store = NetworkStore::new();
    for name in ["Kigali", "Huye", "Musanze"] {
        store.add_city(name).unwrap();
    }
    store.add_road("Kigali", "Huye").unwrap();
    store.set_budget("Kigali", "Huye", 250.5).unwrap();
    store.add_road("Kigali", "Musanze").unwrap();
    store.set_budget("Kigali", "Musanze", 100.0).unwrap();
    store
}

#[test]
fn test_cities_table_format() {
    let dir = TempDir::new().unwrap();
    let storage = Storage::new(dir.path());

    storage.save_cities(&sample_store()).unwrap();

    let text = fs::read_to_string(storage.cities_path()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines,
        vec!["Index\tCity Name", "1\tKigali", "2\tHuye", "3\tMusanze"]
    );
}

#[test]
fn test_roads_table_format() {
    let dir = TempDir::new().unwrap();
    let storage = Storage::new(dir.path());

    storage.save_roads(&sample_store()).unwrap();

    let text = fs::read_to_string(storage.roads_path()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines,
        vec![
            "Nbr\tRoad\t\t\tBudget",
            "1\tKigali - Huye\t250.5",
            "2\tKigali - Musanze\t100.0",
        ]
    );
}

#[test]
fn test_round_trip_reproduces_state() {
    let dir = TempDir::new().unwrap();
    let storage = Storage::new(dir.path());
    let store = sample_store();

    storage.save_cities(&store).unwrap();
    storage.save_roads(&store).unwrap();

    let reloaded = storage.load();
    let names: Vec<String> = reloaded
        .list_cities()
        .map(|(_, name)| name.to_string())
        .collect();
    assert_eq!(names, vec!["Kigali", "Huye", "Musanze"]);
    assert!(reloaded.has_road("Kigali", "Huye"));
    assert!(reloaded.has_road("Huye", "Kigali"));
    assert!(reloaded.has_road("Musanze", "Kigali"));
    assert!(!reloaded.has_road("Huye", "Musanze"));
    assert_eq!(reloaded.budget_between("Kigali", "Huye"), Some(250.5));
    assert_eq!(reloaded.budget_between("Kigali", "Musanze"), Some(100.0));
    assert_eq!(reloaded.road_matrix(), store.road_matrix());
    assert_eq!(reloaded.budget_matrix(), store.budget_matrix());
}

#[test]
fn test_saving_roads_twice_is_byte_identical() {
    let dir = TempDir::new().unwrap();
    let storage = Storage::new(dir.path());
    let store = sample_store();

    storage.save_roads(&store).unwrap();
    let first = fs::read(storage.roads_path()).unwrap();
    storage.save_roads(&store).unwrap();
    let second = fs::read(storage.roads_path()).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_new_road_gets_next_id_existing_keep_theirs() {
    let dir = TempDir::new().unwrap();
    let storage = Storage::new(dir.path());
    let mut store = sample_store();

    storage.save_roads(&store).unwrap();

    store.add_road("Huye", "Musanze").unwrap();
    store.set_budget("Huye", "Musanze", 50.0).unwrap();
    storage.save_roads(&store).unwrap();

    let text = fs::read_to_string(storage.roads_path()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines,
        vec![
            "Nbr\tRoad\t\t\tBudget",
            "1\tKigali - Huye\t250.5",
            "2\tKigali - Musanze\t100.0",
            "3\tHuye - Musanze\t50.0",
        ]
    );
}

#[test]
fn test_road_id_survives_city_rename() {
    let dir = TempDir::new().unwrap();
    let storage = Storage::new(dir.path());
    let mut store = sample_store();

    storage.save_cities(&store).unwrap();
    storage.save_roads(&store).unwrap();

    store.rename_city(1, "Kigali City").unwrap();
    storage.save_cities(&store).unwrap();
    storage
        .save_roads_after_rename(&store, "Kigali", "Kigali City")
        .unwrap();

    let text = fs::read_to_string(storage.roads_path()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines,
        vec![
            "Nbr\tRoad\t\t\tBudget",
            "1\tKigali City - Huye\t250.5",
            "2\tKigali City - Musanze\t100.0",
        ]
    );
}

#[test]
fn test_load_skips_corrupt_and_unresolvable_road_lines() {
    let dir = TempDir::new().unwrap();
    let storage = Storage::new(dir.path());
    let store = sample_store();
    storage.save_cities(&store).unwrap();

    let roads = concat!(
        "Nbr\tRoad\t\t\tBudget\n",
        "1\tKigali - Huye\t250.5\n",
        "no tabs at all\n",
        "x\tKigali - Musanze\t100.0\n",
        "3\tKigali - Musanze\tabc\n",
        "4\tKigaliMusanze\t100.0\n",
        "5\tKigali - Gisenyi\t100.0\n",
        "6\tHuye - Musanze\t0.0\n",
        "7\tHuye - Musanze\t2000.0\n",
    );
    fs::write(storage.roads_path(), roads).unwrap();

    let reloaded = storage.load();
    assert!(reloaded.has_road("Kigali", "Huye"));
    assert_eq!(reloaded.budget_between("Kigali", "Huye"), Some(250.5));
    // Non-numeric id, non-numeric budget, missing separator, unknown
    // city, and out-of-range budgets are all dropped silently.
    assert!(!reloaded.has_road("Kigali", "Musanze"));
    assert!(!reloaded.has_road("Huye", "Musanze"));
}

#[test]
fn test_load_skips_bad_city_lines() {
    let dir = TempDir::new().unwrap();
    let storage = Storage::new(dir.path());

    let cities = concat!(
        "Index\tCity Name\n",
        "1\tKigali\n",
        "no tab here\n",
        "2\tKigali\n",
        "3\t!\n",
        "4\tHuye\n",
    );
    fs::write(storage.cities_path(), cities).unwrap();

    let reloaded = storage.load();
    let names: Vec<String> = reloaded
        .list_cities()
        .map(|(_, name)| name.to_string())
        .collect();
    assert_eq!(names, vec!["Kigali", "Huye"]);
}

#[test]
fn test_load_from_missing_files_yields_empty_store() {
    let dir = TempDir::new().unwrap();
    let storage = Storage::new(dir.path().join("nonexistent"));

    let store = storage.load();
    assert_eq!(store.city_count(), 0);
}

#[test]
fn test_unbudgeted_road_is_dropped_on_reload() {
    let dir = TempDir::new().unwrap();
    let storage = Storage::new(dir.path());

    let mut store = NetworkStore::new();
    store.add_city("Kigali").unwrap();
    store.add_city("Huye").unwrap();
    store.add_road("Kigali", "Huye").unwrap();
    storage.save_cities(&store).unwrap();
    storage.save_roads(&store).unwrap();

    // The road serializes with the 0.0 default, which fails budget
    // validation on the way back in.
    let text = fs::read_to_string(storage.roads_path()).unwrap();
    assert!(text.contains("1\tKigali - Huye\t0.0"));

    let reloaded = storage.load();
    assert!(!reloaded.has_road("Kigali", "Huye"));
}

#[test]
fn test_stale_records_dropped_but_their_ids_stay_reserved() {
    let dir = TempDir::new().unwrap();
    let storage = Storage::new(dir.path());

    let roads = concat!(
        "Nbr\tRoad\t\t\tBudget\n",
        "7\tGisenyi - Rubavu\t300.0\n",
    );
    fs::write(storage.roads_path(), roads).unwrap();

    let mut store = NetworkStore::new();
    store.add_city("Kigali").unwrap();
    store.add_city("Huye").unwrap();
    store.add_road("Kigali", "Huye").unwrap();
    store.set_budget("Kigali", "Huye", 10.0).unwrap();
    storage.save_roads(&store).unwrap();

    // The record for the vanished road is not resurrected, and the new
    // road numbers from one past the highest id ever seen.
    let text = fs::read_to_string(storage.roads_path()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines, vec!["Nbr\tRoad\t\t\tBudget", "8\tKigali - Huye\t10.0"]);
}

#[test]
fn test_save_survives_record_with_huge_id() {
    let dir = TempDir::new().unwrap();
    let storage = Storage::new(dir.path());

    // A well-formed record can carry an arbitrarily large id; the next
    // assignment must still step past it without overflowing.
    let roads = concat!(
        "Nbr\tRoad\t\t\tBudget\n",
        "4294967295\tGisenyi - Rubavu\t300.0\n",
    );
    fs::write(storage.roads_path(), roads).unwrap();

    let mut store = NetworkStore::new();
    store.add_city("Kigali").unwrap();
    store.add_city("Huye").unwrap();
    store.add_road("Kigali", "Huye").unwrap();
    store.set_budget("Kigali", "Huye", 10.0).unwrap();
    storage.save_roads(&store).unwrap();

    let text = fs::read_to_string(storage.roads_path()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines,
        vec!["Nbr\tRoad\t\t\tBudget", "4294967296\tKigali - Huye\t10.0"]
    );
}

#[test]
fn test_id_without_assignment_headroom_is_dropped() {
    let dir = TempDir::new().unwrap();
    let storage = Storage::new(dir.path());

    // u64::MAX leaves no room for ids assigned after it, so the record
    // counts as malformed and the road renumbers from scratch.
    let roads = concat!(
        "Nbr\tRoad\t\t\tBudget\n",
        "18446744073709551615\tKigali - Huye\t77.0\n",
    );
    fs::write(storage.roads_path(), roads).unwrap();

    let mut store = NetworkStore::new();
    store.add_city("Kigali").unwrap();
    store.add_city("Huye").unwrap();
    store.add_road("Kigali", "Huye").unwrap();
    store.set_budget("Kigali", "Huye", 77.0).unwrap();
    storage.save_roads(&store).unwrap();

    let text = fs::read_to_string(storage.roads_path()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines, vec!["Nbr\tRoad\t\t\tBudget", "1\tKigali - Huye\t77.0"]);
}

#[test]
fn test_merge_updates_budget_in_place() {
    let dir = TempDir::new().unwrap();
    let storage = Storage::new(dir.path());
    let mut store = sample_store();

    storage.save_roads(&store).unwrap();
    store.set_budget("Kigali", "Huye", 999.9).unwrap();
    storage.save_roads(&store).unwrap();

    let text = fs::read_to_string(storage.roads_path()).unwrap();
    assert!(text.contains("1\tKigali - Huye\t999.9"));
    assert!(!text.contains("250.5"));
}

#[test]
fn test_merge_matches_pair_in_either_order() {
    let dir = TempDir::new().unwrap();
    let storage = Storage::new(dir.path());

    // Record stored with the pair reversed relative to index order
    let roads = concat!(
        "Nbr\tRoad\t\t\tBudget\n",
        "4\tHuye - Kigali\t77.0\n",
    );
    fs::write(storage.roads_path(), roads).unwrap();

    let mut store = NetworkStore::new();
    store.add_city("Kigali").unwrap();
    store.add_city("Huye").unwrap();
    store.add_road("Kigali", "Huye").unwrap();
    store.set_budget("Kigali", "Huye", 77.0).unwrap();
    storage.save_roads(&store).unwrap();

    let text = fs::read_to_string(storage.roads_path()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines, vec!["Nbr\tRoad\t\t\tBudget", "4\tKigali - Huye\t77.0"]);
}

#[test]
fn test_storage_directory_created_on_demand() {
    let dir = TempDir::new().unwrap();
    let nested = dir.path().join("data");
    let storage = Storage::new(&nested);
    assert!(!nested.exists());

    storage.save_cities(&sample_store()).unwrap();
    assert!(nested.exists());
    assert!(storage.cities_path().exists());
}
