//! In-memory city, road, and budget state
//!
//! The store owns an ordered list of city names plus two symmetric
//! adjacency matrices over city indices: one boolean matrix for road
//! existence and one f64 matrix for budgets. Every mutation validates
//! its inputs before touching state.

use super::error::NetworkError;
use super::types::{is_valid_budget, is_valid_city_name, MAX_CITIES};

/// The in-memory road network.
///
/// Cities are append-only and indexed by insertion order (0-based
/// internally, 1-based at the API surface where an index is taken or
/// returned). Both matrices always stay square, symmetric, and sized
/// to the city count.
#[derive(Debug, Default)]
pub struct NetworkStore {
    city_names: Vec<String>,
    roads: Vec<Vec<bool>>,
    budgets: Vec<Vec<f64>>,
}

impl NetworkStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cities currently recorded
    pub fn city_count(&self) -> usize {
        self.city_names.len()
    }

    /// How many more cities fit under the capacity ceiling
    pub fn remaining_capacity(&self) -> usize {
        MAX_CITIES - self.city_names.len()
    }

    /// 0-based index of a city by exact name
    pub fn city_index(&self, name: &str) -> Option<usize> {
        self.city_names.iter().position(|n| n == name)
    }

    pub fn city_exists(&self, name: &str) -> bool {
        self.city_index(name).is_some()
    }

    /// Looks up a city name by its 1-based index.
    pub fn find_city_by_index(&self, index: usize) -> Result<&str, NetworkError> {
        if index < 1 || index > self.city_names.len() {
            return Err(NetworkError::IndexOutOfRange(self.city_names.len()));
        }
        Ok(&self.city_names[index - 1])
    }

    /// Ordered (1-based index, name) pairs for display.
    pub fn list_cities(&self) -> impl Iterator<Item = (usize, &str)> {
        self.city_names
            .iter()
            .enumerate()
            .map(|(i, name)| (i + 1, name.as_str()))
    }

    /// Appends one city, growing both matrices by a zeroed row and
    /// column before the new index can be referenced. Returns the new
    /// city's 0-based index.
    pub fn add_city(&mut self, name: &str) -> Result<usize, NetworkError> {
        if !is_valid_city_name(name) {
            return Err(NetworkError::InvalidCityName(name.to_string()));
        }
        if self.city_exists(name) {
            return Err(NetworkError::CityAlreadyExists(name.to_string()));
        }
        if self.city_names.len() >= MAX_CITIES {
            return Err(NetworkError::CityLimitReached(MAX_CITIES));
        }

        self.city_names.push(name.to_string());
        let n = self.city_names.len();
        for row in &mut self.roads {
            row.push(false);
        }
        for row in &mut self.budgets {
            row.push(0.0);
        }
        self.roads.push(vec![false; n]);
        self.budgets.push(vec![0.0; n]);
        Ok(n - 1)
    }

    /// Adds a batch of cities in order.
    ///
    /// Validation happens sequentially, one name at a time, so a
    /// failure partway through leaves the earlier names committed.
    pub fn add_cities(&mut self, names: &[String]) -> Result<(), NetworkError> {
        let capacity = self.remaining_capacity();
        if capacity == 0 {
            return Err(NetworkError::CityLimitReached(MAX_CITIES));
        }
        if names.is_empty() || names.len() > capacity {
            return Err(NetworkError::CityCountOutOfRange(capacity));
        }
        for name in names {
            self.add_city(name)?;
        }
        Ok(())
    }

    /// Connects two distinct existing cities, setting both symmetric
    /// matrix cells.
    pub fn add_road(&mut self, first: &str, second: &str) -> Result<(), NetworkError> {
        let i = self
            .city_index(first)
            .ok_or_else(|| NetworkError::CityNotFound(first.to_string()))?;
        if first == second {
            return Err(NetworkError::SelfReference);
        }
        let j = self
            .city_index(second)
            .ok_or_else(|| NetworkError::CityNotFound(second.to_string()))?;
        if self.roads[i][j] {
            return Err(NetworkError::RoadAlreadyExists(
                first.to_string(),
                second.to_string(),
            ));
        }

        self.roads[i][j] = true;
        self.roads[j][i] = true;
        Ok(())
    }

    /// Sets the budget on an existing road, overwriting any prior
    /// value in both symmetric cells.
    pub fn set_budget(&mut self, first: &str, second: &str, amount: f64) -> Result<(), NetworkError> {
        let i = self
            .city_index(first)
            .ok_or_else(|| NetworkError::CityNotFound(first.to_string()))?;
        let j = self
            .city_index(second)
            .ok_or_else(|| NetworkError::CityNotFound(second.to_string()))?;
        if !self.roads[i][j] {
            return Err(NetworkError::RoadNotFound(
                first.to_string(),
                second.to_string(),
            ));
        }
        if !is_valid_budget(amount) {
            return Err(NetworkError::BudgetOutOfRange(amount));
        }

        self.budgets[i][j] = amount;
        self.budgets[j][i] = amount;
        Ok(())
    }

    /// Renames the city at a 1-based index. The matrices are untouched
    /// because indices do not change; callers are responsible for
    /// re-saving the roads table, which stores cities by name.
    pub fn rename_city(&mut self, index: usize, new_name: &str) -> Result<(), NetworkError> {
        if index < 1 || index > self.city_names.len() {
            return Err(NetworkError::IndexOutOfRange(self.city_names.len()));
        }
        if !is_valid_city_name(new_name) {
            return Err(NetworkError::InvalidCityName(new_name.to_string()));
        }
        if let Some(existing) = self.city_index(new_name) {
            if existing != index - 1 {
                return Err(NetworkError::CityAlreadyExists(new_name.to_string()));
            }
        }

        self.city_names[index - 1] = new_name.to_string();
        Ok(())
    }

    /// Whether a road connects the two named cities. Symmetric; false
    /// when either city is unknown.
    pub fn has_road(&self, first: &str, second: &str) -> bool {
        match (self.city_index(first), self.city_index(second)) {
            (Some(i), Some(j)) => self.roads[i][j],
            _ => false,
        }
    }

    /// Budget of the road between two cities, or None when no road
    /// exists. A road that exists but never had a budget set reports 0.
    pub fn budget_between(&self, first: &str, second: &str) -> Option<f64> {
        let i = self.city_index(first)?;
        let j = self.city_index(second)?;
        self.roads[i][j].then(|| self.budgets[i][j])
    }

    /// Read-only view of the road adjacency matrix
    pub fn road_matrix(&self) -> &[Vec<bool>] {
        &self.roads
    }

    /// Read-only view of the budget matrix
    pub fn budget_matrix(&self) -> &[Vec<f64>] {
        &self.budgets
    }

    /// Iterates every road as (first name, second name, budget) in
    /// upper-triangle order, for serialization and display.
    pub fn roads_with_budgets(&self) -> impl Iterator<Item = (&str, &str, f64)> {
        let names = &self.city_names;
        let budgets = &self.budgets;
        self.roads.iter().enumerate().flat_map(move |(i, row)| {
            row.iter()
                .enumerate()
                .skip(i + 1)
                .filter(|(_, cell)| **cell)
                .map(move |(j, _)| (names[i].as_str(), names[j].as_str(), budgets[i][j]))
        })
    }
}
