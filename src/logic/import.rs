//! Bulk roster import from CSV (columns: name, team, rating).

use crate::models::{normalize_team, parse_rating, Competitor};
use serde::Deserialize;
use std::io;

/// Errors that can occur while reading a roster file.
#[derive(Debug)]
pub enum ImportError {
    /// The file is not valid CSV (bad quoting, unreadable input, ...).
    Csv(csv::Error),
}

impl std::fmt::Display for ImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportError::Csv(e) => write!(f, "Invalid roster CSV: {}", e),
        }
    }
}

impl std::error::Error for ImportError {}

impl From<csv::Error> for ImportError {
    fn from(e: csv::Error) -> Self {
        ImportError::Csv(e)
    }
}

/// Raw row as typed by a user. Ratings stay strings so bad values can be defaulted.
#[derive(Debug, Deserialize)]
struct RosterRow {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    team: Option<String>,
    #[serde(default)]
    rating: Option<String>,
}

/// Read competitors from CSV with a `name,team,rating` header (any letter case).
///
/// Unknown or blank teams become "no team" (see [`normalize_team`]), unparseable ratings
/// take the default rating, and rows without a name are skipped.
pub fn import_roster<R: io::Read>(
    reader: R,
    known_teams: &[String],
) -> Result<Vec<Competitor>, ImportError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers: csv::StringRecord = rdr.headers()?.iter().map(str::to_ascii_lowercase).collect();
    rdr.set_headers(headers);

    let mut competitors = Vec::new();
    for (line, row) in rdr.deserialize::<RosterRow>().enumerate() {
        let row = row?;
        let name = match row.name.as_deref().map(str::trim) {
            Some(n) if !n.is_empty() => n.to_string(),
            _ => {
                log::warn!("Skipping roster row {}: missing name", line + 2);
                continue;
            }
        };
        let mut competitor = Competitor::new(name, None, parse_rating(row.rating.as_deref()));
        competitor.team = row
            .team
            .as_deref()
            .and_then(|t| normalize_team(t, known_teams));
        competitors.push(competitor);
    }
    log::info!("Imported {} competitors from roster CSV", competitors.len());
    Ok(competitors)
}
