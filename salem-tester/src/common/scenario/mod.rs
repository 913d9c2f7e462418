pub mod catalog;

use crate::logic::SimulationPlan;
use catalog::find_catalog_scenario;

// Logic test scenario
#[derive(Debug, Clone)]
pub struct TestScenario {
    pub name: String,
    pub plan: SimulationPlan,
}

impl TestScenario {
    #[must_use]
    pub fn simulation(name: impl Into<String>, plan: SimulationPlan) -> Self {
        Self {
            name: name.into(),
            plan,
        }
    }
}

pub fn get_scenario(name: &str) -> Option<TestScenario> {
    match name.to_lowercase().as_str() {
        "smoke" => find_catalog_scenario("Smoke Test"),
        "deterministic" | "replay" => find_catalog_scenario("Deterministic Replay"),
        "roster-scaling" | "scaling" => find_catalog_scenario("Roster Scaling"),
        "invariants" => find_catalog_scenario("Engine Invariants"),
        "small-table" | "small" => find_catalog_scenario("Small Table"),
        "day-cap" => find_catalog_scenario("Day Cap"),
        _ => None,
    }
}

pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    vec![
        ("smoke", "Smoke Test"),
        ("deterministic", "Deterministic Replay"),
        ("roster-scaling", "Roster Scaling"),
        ("invariants", "Engine Invariants"),
        ("small-table", "Small Table"),
        ("day-cap", "Day Cap"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_scenario_resolves() {
        for (key, description) in list_scenarios() {
            let scenario = get_scenario(key).unwrap_or_else(|| panic!("missing {key}"));
            assert_eq!(scenario.name, description);
        }
    }

    #[test]
    fn lookup_is_case_insensitive_and_rejects_unknowns() {
        assert!(get_scenario("SMOKE").is_some());
        assert!(get_scenario("replay").is_some());
        assert!(get_scenario("night-zero").is_none());
    }
}
