//! The fixed step script.
//!
//! `script` expands a `FixtureSet` into the ordered list of steps a run
//! executes. The order is part of the contract: later steps rely on the
//! remote effects of earlier ones (created ids, prepped combatants).

use crate::fixtures::{FixtureSet, MealFixture};
use crate::marker::SuccessMarker;
use serde_json::{Value, json};
use std::fmt;

/// HTTP methods used by the script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One request, relative to the configured base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSpec {
    pub method: Method,
    /// Unencoded path segments; the transport percent-encodes them.
    pub segments: Vec<String>,
    pub body: Option<Value>,
    pub query: Vec<(String, String)>,
}

impl RequestSpec {
    pub fn new(method: Method, path: &str) -> Self {
        Self {
            method,
            segments: path
                .split('/')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            body: None,
            query: Vec::new(),
        }
    }

    pub fn get(path: &str) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: &str) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn delete(path: &str) -> Self {
        Self::new(Method::Delete, path)
    }

    /// Appends a single path segment taken verbatim (may contain spaces or '/').
    pub fn segment(mut self, segment: impl Into<String>) -> Self {
        self.segments.push(segment.into());
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Human-readable path with query, e.g. `/leaderboard?sort=wins`.
    pub fn display_path(&self) -> String {
        let mut path = format!("/{}", self.segments.join("/"));
        if !self.query.is_empty() {
            let pairs: Vec<String> = self
                .query
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            path.push('?');
            path.push_str(&pairs.join("&"));
        }
        path
    }
}

/// What a step does to the service, which decides whether echo mode prints
/// its response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepKind {
    /// Liveness checks.
    Probe,
    /// Changes remote state.
    Mutation,
    /// Returns data worth showing in echo mode, printed under `heading`.
    Read { heading: String },
}

/// One request/validate unit of the run.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub name: &'static str,
    pub kind: StepKind,
    pub request: RequestSpec,
    pub marker: SuccessMarker,
    pub progress: String,
    pub success: String,
    pub failure: String,
}

impl Step {
    fn new(name: &'static str, kind: StepKind, request: RequestSpec) -> Self {
        Self {
            name,
            kind,
            request,
            marker: SuccessMarker::success(),
            progress: String::new(),
            success: String::new(),
            failure: String::new(),
        }
    }

    fn marker(mut self, marker: SuccessMarker) -> Self {
        self.marker = marker;
        self
    }

    fn messages(
        mut self,
        progress: impl Into<String>,
        success: impl Into<String>,
        failure: impl Into<String>,
    ) -> Self {
        self.progress = progress.into();
        self.success = success.into();
        self.failure = failure.into();
        self
    }

    fn read(name: &'static str, request: RequestSpec, heading: impl Into<String>) -> Self {
        Self::new(
            name,
            StepKind::Read {
                heading: heading.into(),
            },
            request,
        )
    }

    /// Heading echo mode prints above this step's response body, if it echoes.
    pub fn echo_heading(&self) -> Option<&str> {
        match &self.kind {
            StepKind::Read { heading } => Some(heading),
            StepKind::Probe | StepKind::Mutation => None,
        }
    }
}

/// Builds the ordered step list for a run over `fixtures`.
pub fn script(fixtures: &FixtureSet) -> Vec<Step> {
    let mut steps = Vec::with_capacity(fixtures.call_count());

    steps.push(
        Step::new("health", StepKind::Probe, RequestSpec::get("/health"))
            .marker(SuccessMarker::healthy())
            .messages(
                "Checking health status...",
                "Service is healthy.",
                "Health check failed.",
            ),
    );

    steps.push(
        Step::new("db-check", StepKind::Probe, RequestSpec::get("/db-check"))
            .marker(SuccessMarker::database_healthy())
            .messages(
                "Checking database connection...",
                "Database connection is healthy.",
                "Database check failed.",
            ),
    );

    steps.push(
        Step::new(
            "clear-meals",
            StepKind::Mutation,
            RequestSpec::delete("/clear-meals"),
        )
        .messages(
            "Clearing the meals...",
            "Meals cleared successfully.",
            "Failed to clear meals.",
        ),
    );

    steps.extend(fixtures.meals.iter().map(create_meal));

    let id = fixtures.delete_meal_id;
    steps.push(
        Step::new(
            "delete-meal-by-id",
            StepKind::Mutation,
            RequestSpec::delete("/delete-meal").segment(id.to_string()),
        )
        .messages(
            format!("Deleting meal by ID ({id})..."),
            format!("Meal deleted successfully by ID ({id})."),
            format!("Failed to delete meal by ID ({id})."),
        ),
    );

    let name = &fixtures.lookup_name;
    steps.push(
        Step::read(
            "get-meal-by-name",
            RequestSpec::get("/get-meal-by-name").segment(name.clone()),
            format!("Meal JSON (name {name}):"),
        )
        .messages(
            format!("Getting meal by name ({name})..."),
            format!("Meal retrieved successfully by name ({name})."),
            format!("Failed to get meal by name ({name})."),
        ),
    );

    let id = fixtures.lookup_id;
    steps.push(
        Step::read(
            "get-meal-by-id",
            RequestSpec::get("/get-meal-by-id").segment(id.to_string()),
            format!("Meal JSON (ID {id}):"),
        )
        .messages(
            format!("Getting meal by ID ({id})..."),
            format!("Meal retrieved successfully by ID ({id})."),
            format!("Failed to get meal by ID ({id})."),
        ),
    );

    steps.push(
        Step::new(
            "clear-combatants",
            StepKind::Mutation,
            RequestSpec::post("/clear-combatants"),
        )
        .messages(
            "Clearing combatants...",
            "Combatants cleared successfully.",
            "Failed to clear combatants.",
        ),
    );

    steps.extend(fixtures.combatants.iter().map(|meal| prep_combatant(meal)));

    steps.push(
        Step::read("battle", RequestSpec::get("/battle"), "Battle JSON:").messages(
            "Initiating battle...",
            "Battle completed successfully.",
            "Battle failed.",
        ),
    );

    steps.push(
        Step::read(
            "get-combatants",
            RequestSpec::get("/get-combatants"),
            "Combatants JSON:",
        )
        .messages(
            "Retrieving combatants...",
            "Combatants retrieved successfully.",
            "Failed to retrieve combatants.",
        ),
    );

    let sort = &fixtures.leaderboard_sort;
    steps.push(
        Step::read(
            "leaderboard",
            RequestSpec::get("/leaderboard").query("sort", sort.clone()),
            format!("Leaderboard JSON (sorted by {sort}):"),
        )
        .messages(
            format!("Getting meal leaderboard sorted by {sort}..."),
            "Meal leaderboard retrieved successfully.",
            "Failed to get meal leaderboard.",
        ),
    );

    steps
}

fn create_meal(meal: &MealFixture) -> Step {
    let body = json!({
        "meal": meal.meal,
        "cuisine": meal.cuisine,
        "price": meal.price,
        "difficulty": meal.difficulty,
    });

    Step::new(
        "create-meal",
        StepKind::Mutation,
        RequestSpec::post("/create-meal").json(body),
    )
    .messages(
        format!(
            "Adding meal ({}, {}, {}) to the kitchen...",
            meal.meal, meal.cuisine, meal.price
        ),
        "Meal added successfully.",
        format!("Failed to add meal ({}).", meal.meal),
    )
}

fn prep_combatant(meal: &str) -> Step {
    Step::new(
        "prep-combatant",
        StepKind::Mutation,
        RequestSpec::post("/prep-combatant").json(json!({ "meal": meal })),
    )
    .messages(
        format!("Preparing combatant ({meal})..."),
        format!("Combatant prepared successfully ({meal})."),
        format!("Failed to prepare combatant ({meal})."),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_script() -> Vec<Step> {
        script(&FixtureSet::default())
    }

    #[test]
    fn test_default_script_order() {
        let names: Vec<&str> = default_script().iter().map(|s| s.name).collect();
        assert_eq!(
            names,
            vec![
                "health",
                "db-check",
                "clear-meals",
                "create-meal",
                "create-meal",
                "create-meal",
                "create-meal",
                "create-meal",
                "delete-meal-by-id",
                "get-meal-by-name",
                "get-meal-by-id",
                "clear-combatants",
                "prep-combatant",
                "prep-combatant",
                "battle",
                "get-combatants",
                "leaderboard",
            ]
        );
    }

    #[test]
    fn test_default_script_paths_and_methods() {
        let calls: Vec<(Method, String)> = default_script()
            .iter()
            .map(|s| (s.request.method, s.request.display_path()))
            .collect();

        assert_eq!(calls[0], (Method::Get, "/health".to_string()));
        assert_eq!(calls[1], (Method::Get, "/db-check".to_string()));
        assert_eq!(calls[2], (Method::Delete, "/clear-meals".to_string()));
        assert_eq!(calls[3], (Method::Post, "/create-meal".to_string()));
        assert_eq!(calls[8], (Method::Delete, "/delete-meal/1".to_string()));
        assert_eq!(calls[9], (Method::Get, "/get-meal-by-name/udon".to_string()));
        assert_eq!(calls[10], (Method::Get, "/get-meal-by-id/4".to_string()));
        assert_eq!(calls[11], (Method::Post, "/clear-combatants".to_string()));
        assert_eq!(calls[12], (Method::Post, "/prep-combatant".to_string()));
        assert_eq!(calls[14], (Method::Get, "/battle".to_string()));
        assert_eq!(calls[15], (Method::Get, "/get-combatants".to_string()));
        assert_eq!(calls[16], (Method::Get, "/leaderboard?sort=wins".to_string()));
    }

    #[test]
    fn test_markers() {
        let steps = default_script();
        assert_eq!(steps[0].marker, SuccessMarker::healthy());
        assert_eq!(steps[1].marker, SuccessMarker::database_healthy());
        assert!(
            steps[2..]
                .iter()
                .all(|s| s.marker == SuccessMarker::success())
        );
    }

    #[test]
    fn test_create_meal_bodies() {
        let steps = default_script();
        let body = steps[4].request.body.as_ref().unwrap();

        assert_eq!(body["meal"], "shakshuka");
        assert_eq!(body["cuisine"], "mediterranean");
        assert_eq!(body["price"], 18.20);
        assert_eq!(body["difficulty"], "MED");
        assert_eq!(body.as_object().unwrap().len(), 4);
    }

    #[test]
    fn test_prep_combatant_bodies() {
        let steps = default_script();
        assert_eq!(steps[12].request.body, Some(json!({ "meal": "udon" })));
        assert_eq!(steps[13].request.body, Some(json!({ "meal": "vindaloo" })));
    }

    #[test]
    fn test_only_reads_echo() {
        let echoing: Vec<&str> = default_script()
            .iter()
            .filter(|s| s.echo_heading().is_some())
            .map(|s| s.name)
            .collect();
        assert_eq!(
            echoing,
            vec![
                "get-meal-by-name",
                "get-meal-by-id",
                "battle",
                "get-combatants",
                "leaderboard"
            ]
        );
        assert!(
            default_script()
                .iter()
                .filter(|s| s.echo_heading().is_none())
                .all(|s| matches!(s.kind, StepKind::Probe | StepKind::Mutation))
        );
    }

    #[test]
    fn test_echo_heading_follows_kind() {
        let read = Step::read("battle", RequestSpec::get("/battle"), "Battle JSON:");
        assert_eq!(read.echo_heading(), Some("Battle JSON:"));

        let mut probe = read.clone();
        probe.kind = StepKind::Probe;
        assert_eq!(probe.echo_heading(), None);

        let mutation = Step::new(
            "clear-meals",
            StepKind::Mutation,
            RequestSpec::delete("/clear-meals"),
        );
        assert_eq!(mutation.echo_heading(), None);
    }

    #[test]
    fn test_get_meal_by_id_failure_names_the_meal_id() {
        let steps = default_script();
        let step = steps.iter().find(|s| s.name == "get-meal-by-id").unwrap();
        assert_eq!(step.failure, "Failed to get meal by ID (4).");
    }

    #[test]
    fn test_lookup_name_kept_as_single_segment() {
        let mut fixtures = FixtureSet::default();
        fixtures.lookup_name = "coconut curry".to_string();
        let steps = script(&fixtures);
        let step = steps.iter().find(|s| s.name == "get-meal-by-name").unwrap();

        assert_eq!(
            step.request.segments,
            vec!["get-meal-by-name".to_string(), "coconut curry".to_string()]
        );
    }

    #[test]
    fn test_script_length_follows_fixtures() {
        let mut fixtures = FixtureSet::default();
        fixtures.meals.truncate(2);
        fixtures.combatants.push("shakshuka".to_string());

        assert_eq!(script(&fixtures).len(), fixtures.call_count());
        assert_eq!(script(&fixtures).len(), 10 + 2 + 3);
    }

    #[test]
    fn test_request_spec_path_parsing() {
        let spec = RequestSpec::get("//leaderboard/").query("sort", "win_pct");
        assert_eq!(spec.segments, vec!["leaderboard".to_string()]);
        assert_eq!(spec.display_path(), "/leaderboard?sort=win_pct");
    }
}
