//! Column-role inference for report header rows.
//!
//! The daily report layout changed several times (`Province/State` became
//! `Province_State`, `Country/Region` became `Country_Region`, extra columns
//! were inserted), so each report's header is mapped independently.

use std::fmt;

use crate::constants::schema::{
    ROLE_CONFIRMED, ROLE_COUNTRY, ROLE_DEATHS, ROLE_RECOVERED, ROLE_REGION,
};
use crate::errors::CaseCountError;
use crate::types::RoleName;

/// Semantic column roles every report must provide.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColumnRole {
    Country,
    Region,
    Confirmed,
    Deaths,
    Recovered,
}

impl ColumnRole {
    /// Roles in matching priority order.
    pub const ALL: [ColumnRole; 5] = [
        ColumnRole::Country,
        ColumnRole::Region,
        ColumnRole::Confirmed,
        ColumnRole::Deaths,
        ColumnRole::Recovered,
    ];

    /// Role name used in mappings and error reports.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ColumnRole::Country => ROLE_COUNTRY,
            ColumnRole::Region => ROLE_REGION,
            ColumnRole::Confirmed => ROLE_CONFIRMED,
            ColumnRole::Deaths => ROLE_DEATHS,
            ColumnRole::Recovered => ROLE_RECOVERED,
        }
    }

    /// Substrings that identify this role in a normalized header field.
    const fn patterns(&self) -> &'static [&'static str] {
        match self {
            ColumnRole::Country => &["country"],
            ColumnRole::Region => &["region", "province"],
            ColumnRole::Confirmed => &["confirm"],
            ColumnRole::Deaths => &["death"],
            ColumnRole::Recovered => &["recover"],
        }
    }

    fn matches(&self, field: &str) -> bool {
        self.patterns().iter().any(|pattern| field.contains(pattern))
    }

    fn index(&self) -> usize {
        match self {
            ColumnRole::Country => 0,
            ColumnRole::Region => 1,
            ColumnRole::Confirmed => 2,
            ColumnRole::Deaths => 3,
            ColumnRole::Recovered => 4,
        }
    }
}

impl fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Zero-based column index for each required role.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HeaderMapping {
    pub country: usize,
    pub region: usize,
    pub confirmed: usize,
    pub deaths: usize,
    pub recovered: usize,
}

impl HeaderMapping {
    /// Infer the mapping from a raw header line.
    ///
    /// Each column is claimed by the first role (in `ColumnRole::ALL` order)
    /// whose pattern it contains. A role keeps the first column that claims
    /// it; later columns claiming the same role are ignored. Fails with
    /// `SchemaMapping` unless all five roles are found.
    pub fn from_header(line: &str, source_id: &str) -> Result<Self, CaseCountError> {
        let normalized = normalize_header(line);
        let mut slots: [Option<usize>; 5] = [None; 5];
        for (index, field) in normalized.split(',').enumerate() {
            let field = field.trim();
            let Some(role) = ColumnRole::ALL.iter().find(|role| role.matches(field)) else {
                continue;
            };
            let slot = &mut slots[role.index()];
            if slot.is_none() {
                *slot = Some(index);
            }
        }

        match slots {
            [
                Some(country),
                Some(region),
                Some(confirmed),
                Some(deaths),
                Some(recovered),
            ] => Ok(Self {
                country,
                region,
                confirmed,
                deaths,
                recovered,
            }),
            _ => {
                let (found, missing): (Vec<ColumnRole>, Vec<ColumnRole>) = ColumnRole::ALL
                    .into_iter()
                    .partition(|role| slots[role.index()].is_some());
                Err(CaseCountError::SchemaMapping {
                    source_id: source_id.to_string(),
                    found: role_names(&found),
                    missing: role_names(&missing),
                })
            }
        }
    }

    /// Column index assigned to `role`.
    pub fn column(&self, role: ColumnRole) -> usize {
        match role {
            ColumnRole::Country => self.country,
            ColumnRole::Region => self.region,
            ColumnRole::Confirmed => self.confirmed,
            ColumnRole::Deaths => self.deaths,
            ColumnRole::Recovered => self.recovered,
        }
    }
}

/// Lowercase, treat `/` as a word separator, and drop quotes and any BOM.
fn normalize_header(line: &str) -> String {
    line.trim_start_matches('\u{feff}')
        .to_lowercase()
        .replace('/', "_")
        .replace('"', "")
}

fn role_names(roles: &[ColumnRole]) -> Vec<RoleName> {
    roles.iter().map(|role| role.as_str().to_string()).collect()
}
