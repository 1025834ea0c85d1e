//! Validation primitives and capacity limits for the network store

/// Maximum number of cities the store will accept
pub const MAX_CITIES: usize = 500;

/// Upper bound (inclusive) for a road budget
pub const BUDGET_MAX: f64 = 1000.0;

/// Checks a candidate city name: at least two characters, at least one
/// letter, and only alphanumeric characters, spaces, or hyphens.
pub fn is_valid_city_name(name: &str) -> bool {
    if name.chars().count() < 2 {
        return false;
    }
    let mut has_letter = false;
    for c in name.chars() {
        if c.is_alphabetic() {
            has_letter = true;
        }
        if !c.is_alphanumeric() && c != ' ' && c != '-' {
            return false;
        }
    }
    has_letter
}

/// Checks a budget amount against the open-closed range (0, BUDGET_MAX].
pub fn is_valid_budget(amount: f64) -> bool {
    amount > 0.0 && amount <= BUDGET_MAX
}
