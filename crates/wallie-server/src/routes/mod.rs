pub mod estimation;
pub mod pages;
pub mod sizing;

use serde::Deserialize;

/// `?project=ID` on the board routes. A missing value is validated like any
/// other bad ID.
#[derive(Debug, Default, Deserialize)]
pub struct ProjectQuery {
    #[serde(default)]
    pub project: String,
}
