use std::fmt;
use std::io::{self, Write};

use anyhow::Result;
use clap::Parser;
use log::error;

use road_ledger::network::{NetworkStore, Storage, BUDGET_MAX, MAX_CITIES};

#[derive(Parser)]
#[command(name = "road_ledger")]
#[command(about = "Console registry of cities, roads, and road budgets")]
struct Cli {
    /// Directory holding the persisted city and road tables
    #[arg(long, default_value = "data")]
    data_dir: String,
}

/// Raised when stdin closes mid-prompt so the menu loop can exit
/// instead of spinning on empty input.
#[derive(Debug)]
struct InputClosed;

impl fmt::Display for InputClosed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "input stream closed")
    }
}

impl std::error::Error for InputClosed {}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let storage = Storage::new(&cli.data_dir);
    let mut store = storage.load();

    println!();
    println!("Welcome to the Road Ledger");
    println!("--------------------------");
    println!("Cities, roads, and road budgets");
    println!();

    loop {
        print_menu();
        let choice = match prompt("Enter your choice: ") {
            Ok(choice) => choice,
            Err(err) if err.is::<InputClosed>() => break,
            Err(err) => return Err(err),
        };
        let done = match choice.trim() {
            "1" => run_action(add_cities_action(&mut store, &storage)),
            "2" => run_action(add_road_action(&mut store, &storage)),
            "3" => run_action(add_budget_action(&mut store, &storage)),
            "4" => run_action(edit_city_action(&mut store, &storage)),
            "5" => run_action(search_city_action(&store)),
            "6" => {
                display_cities(&store);
                false
            }
            "7" => {
                display_roads(&store);
                false
            }
            "8" => {
                display_recorded_data(&store);
                false
            }
            "9" => {
                println!("Exiting...");
                true
            }
            _ => {
                println!("Error: Invalid choice. Enter a number between 1 and 9.");
                false
            }
        };
        if done {
            break;
        }
    }
    Ok(())
}

fn print_menu() {
    println!();
    println!("Menu:");
    println!("1. Add new city(ies)");
    println!("2. Add roads between cities");
    println!("3. Add the budget for roads");
    println!("4. Edit city");
    println!("5. Search for a city using its index");
    println!("6. Display cities");
    println!("7. Display roads");
    println!("8. Display recorded data on console");
    println!("9. Exit");
}

/// Maps a closed stdin to a clean exit; anything else is printed and
/// the menu keeps running.
fn run_action(result: Result<()>) -> bool {
    match result {
        Ok(()) => false,
        Err(err) if err.is::<InputClosed>() => true,
        Err(err) => {
            println!("Error: {:#}", err);
            false
        }
    }
}

/// Prints a prompt and reads one line, trimmed of the trailing newline.
fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    io::stdout().flush()?;
    let mut buf = String::new();
    if io::stdin().read_line(&mut buf)? == 0 {
        return Err(anyhow::Error::new(InputClosed));
    }
    Ok(buf.trim_end_matches(['\r', '\n']).to_string())
}

/// Re-prompts until the user names a city that exists.
fn prompt_existing_city(store: &NetworkStore, message: &str) -> Result<String> {
    loop {
        let name = prompt(message)?;
        if store.city_exists(&name) {
            return Ok(name);
        }
        println!("Error: City '{}' does not exist.", name);
    }
}

fn persist_cities(store: &NetworkStore, storage: &Storage) {
    if let Err(err) = storage.save_cities(store) {
        error!("failed to save cities table: {}", err);
        println!("Error: Cannot save to cities.txt. Check permissions.");
    }
}

fn persist_roads(store: &NetworkStore, storage: &Storage) {
    if let Err(err) = storage.save_roads(store) {
        error!("failed to save roads table: {}", err);
        println!("Error: Cannot save to roads.txt.");
    }
}

fn add_cities_action(store: &mut NetworkStore, storage: &Storage) -> Result<()> {
    let capacity = store.remaining_capacity();
    if capacity == 0 {
        println!("Error: The city limit of {} has been reached.", MAX_CITIES);
        return Ok(());
    }

    let count = loop {
        let input = prompt("Enter the number of cities to add: ")?;
        match input.trim().parse::<usize>() {
            Ok(k) if (1..=capacity).contains(&k) => break k,
            _ => println!("Error: Enter a number between 1 and {}.", capacity),
        }
    };

    for _ in 0..count {
        loop {
            let message = format!("Enter name for city {}: ", store.city_count() + 1);
            let name = prompt(&message)?;
            match store.add_city(&name) {
                Ok(_) => break,
                Err(err) => println!("Error: {}", err),
            }
        }
    }

    println!("{} cities added successfully.", count);
    persist_cities(store, storage);
    Ok(())
}

fn add_road_action(store: &mut NetworkStore, storage: &Storage) -> Result<()> {
    if store.city_count() == 0 {
        println!("No cities recorded.");
        return Ok(());
    }
    let first = prompt_existing_city(store, "Enter the name of the first city: ")?;
    loop {
        let second = prompt("Enter the name of the second city: ")?;
        match store.add_road(&first, &second) {
            Ok(()) => {
                println!("Road added between {} and {}.", first, second);
                break;
            }
            Err(err) => println!("Error: {}", err),
        }
    }
    persist_roads(store, storage);
    Ok(())
}

fn add_budget_action(store: &mut NetworkStore, storage: &Storage) -> Result<()> {
    if store.city_count() == 0 {
        println!("No cities recorded.");
        return Ok(());
    }
    let first = prompt_existing_city(store, "Enter the name of the first city: ")?;
    let second = loop {
        let name = prompt("Enter the name of the second city: ")?;
        if !store.city_exists(&name) {
            println!("Error: City '{}' does not exist.", name);
        } else if !store.has_road(&first, &name) {
            println!("Error: No road exists between {} and {}.", first, name);
        } else {
            break name;
        }
    };

    loop {
        let input = prompt("Enter the budget for the road: ")?;
        let Ok(amount) = input.trim().parse::<f64>() else {
            println!(
                "Error: Budget must be a number between 0 and {}.",
                BUDGET_MAX
            );
            continue;
        };
        match store.set_budget(&first, &second, amount) {
            Ok(()) => break,
            Err(err) => println!("Error: {}", err),
        }
    }

    println!(
        "Budget added for the road between {} and {}.",
        first, second
    );
    persist_roads(store, storage);
    Ok(())
}

fn edit_city_action(store: &mut NetworkStore, storage: &Storage) -> Result<()> {
    if store.city_count() == 0 {
        println!("No cities recorded.");
        return Ok(());
    }
    let index = prompt_index(store, "Enter the index of the city to be edited: ")?;
    let old_name = store.find_city_by_index(index)?.to_string();

    loop {
        let new_name = prompt("Enter the new name of the city: ")?;
        match store.rename_city(index, &new_name) {
            Ok(()) => break,
            Err(err) => println!("Error: {}", err),
        }
    }

    println!("City edited successfully.");
    persist_cities(store, storage);
    // Roads are persisted by name, so the rename has to reach the
    // roads table without disturbing the stable road ids.
    let new_name = store.find_city_by_index(index)?.to_string();
    if let Err(err) = storage.save_roads_after_rename(store, &old_name, &new_name) {
        error!("failed to save roads table: {}", err);
        println!("Error: Cannot save to roads.txt.");
    }
    Ok(())
}

fn search_city_action(store: &NetworkStore) -> Result<()> {
    if store.city_count() == 0 {
        println!("No cities recorded.");
        return Ok(());
    }
    let index = prompt_index(store, "Enter the index of the city: ")?;
    println!(
        "City at index {}: {}",
        index,
        store.find_city_by_index(index)?
    );
    Ok(())
}

/// Re-prompts until the user enters a 1-based index within range.
fn prompt_index(store: &NetworkStore, message: &str) -> Result<usize> {
    loop {
        let input = prompt(message)?;
        match input.trim().parse::<usize>() {
            Ok(index) if index >= 1 && index <= store.city_count() => break Ok(index),
            _ => println!(
                "Error: Invalid index. Enter a number between 1 and {}.",
                store.city_count()
            ),
        }
    }
}

fn display_cities(store: &NetworkStore) {
    if store.city_count() == 0 {
        println!("No cities recorded.");
        return;
    }
    println!("Cities:");
    for (index, name) in store.list_cities() {
        println!("{}: {}", index, name);
    }
}

fn display_roads(store: &NetworkStore) {
    if store.city_count() == 0 {
        println!("No roads recorded.");
        return;
    }
    display_cities(store);
    print_road_matrix(store);
}

fn display_recorded_data(store: &NetworkStore) {
    if store.city_count() == 0 {
        println!("No data recorded.");
        return;
    }
    display_cities(store);
    print_road_matrix(store);
    print_budget_matrix(store);
}

fn print_road_matrix(store: &NetworkStore) {
    println!();
    println!("Roads Adjacency Matrix:");
    for row in store.road_matrix() {
        let cells: Vec<&str> = row.iter().map(|&cell| if cell { "1" } else { "0" }).collect();
        println!("{}", cells.join(" "));
    }
}

fn print_budget_matrix(store: &NetworkStore) {
    println!();
    println!("Budgets Adjacency Matrix:");
    for row in store.budget_matrix() {
        let cells: Vec<String> = row.iter().map(|value| format!("{:.1}", value)).collect();
        println!("{}", cells.join(" "));
    }
}
