//! Photometric system, filter, and filter-set registry.
//!
//! The toolkit identifies systems and filters by small integer codes; callers
//! work with names. The registry holds the name ↔ code tables and the named
//! filter-set definitions, built once and immutable afterwards.
//!
//! The legacy table let several systems reuse the same filter names (SDSS and
//! SkyMapper both called their bands `u, g, r, i, z`); whichever entry was
//! applied last won, and the earlier code became unresolvable in the inverse
//! direction. Here the tables are enumerated `(name, code)` pairs and
//! [`Registry::from_tables`] rejects any duplicate at construction, so both
//! lookup directions are total over the table. The built-in table keeps SDSS
//! on the bare names and suffixes the later systems (`u_st`, `u_sm`, `g_p1`).

use crate::errors::{BoloError, BoloResult};
use crate::output::BC_SLOTS;
use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Largest filter code representable in the selection file's 2-column field.
pub const MAX_FILTER_CODE: i32 = 99;

/// One named filter set: the unit of selection for a computation run.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FilterSet {
    pub name: String,

    pub system: i32,

    pub filters: Vec<i32>,
}

impl FilterSet {
    /// Build a filter set, enforcing the output schema's slot reservation.
    ///
    /// The results file hard-reserves exactly [`BC_SLOTS`] correction
    /// columns, so a set may never select more filters than that.
    pub fn new(name: impl Into<String>, system: i32, filters: Vec<i32>) -> BoloResult<Self> {
        let name = name.into();
        if filters.is_empty() {
            return Err(BoloError::invalid_table(format!(
                "filter set '{}' selects no filters",
                name
            )));
        }
        if filters.len() > BC_SLOTS {
            return Err(BoloError::invalid_table(format!(
                "filter set '{}' selects {} filters, output schema reserves {}",
                name,
                filters.len(),
                BC_SLOTS
            )));
        }
        Ok(Self {
            name,
            system,
            filters,
        })
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

/// Photometric systems of the toolkit, codes 1-27.
const SYSTEMS: &[(&str, i32)] = &[
    ("UBVRI", 1),
    ("2MASS", 2),
    ("SAAO_JHK", 3),
    ("Stromgren", 4),
    ("SkyMapper", 5),
    ("Tycho", 6),
    ("Hipparcos", 7),
    ("PanSTARRS1", 8),
    ("SDSS", 9),
    ("Gaia", 10),
    ("HST_WFC3_UVIS", 11),
    ("HST_WFC3_IR", 12),
    ("HST_ACS_WFC", 13),
    ("JWST_NIRCam", 14),
    ("Kepler", 15),
    ("TESS", 16),
    ("CoRoT", 17),
    ("Spitzer_IRAC", 18),
    ("WISE", 19),
    ("Washington", 20),
    ("DDO", 21),
    ("Geneva", 22),
    ("Vilnius", 23),
    ("APASS", 24),
    ("DECam", 25),
    ("VISTA", 26),
    ("UKIDSS", 27),
];

/// Flat filter name table. Codes are globally unique and fit the selection
/// file's 2-column field. Colliding band names carry a system suffix
/// (`_st` Strömgren, `_sm` SkyMapper, `_p1` Pan-STARRS1); SDSS keeps the
/// bare `ugriz` names.
const FILTERS: &[(&str, i32)] = &[
    // Johnson-Cousins UBVRI
    ("U", 1),
    ("B", 2),
    ("V", 3),
    ("R_c", 4),
    ("I_c", 5),
    // 2MASS
    ("J", 6),
    ("H", 7),
    ("K_s", 8),
    // Stromgren
    ("u_st", 9),
    ("v_st", 10),
    ("b_st", 11),
    ("y_st", 12),
    // SkyMapper
    ("u_sm", 13),
    ("v_sm", 14),
    ("g_sm", 15),
    ("r_sm", 16),
    ("i_sm", 17),
    ("z_sm", 18),
    // Tycho
    ("B_T", 19),
    ("V_T", 20),
    // Hipparcos
    ("Hp", 21),
    // Pan-STARRS1
    ("g_p1", 22),
    ("r_p1", 23),
    ("i_p1", 24),
    ("z_p1", 25),
    ("y_p1", 26),
    // SDSS
    ("u", 27),
    ("g", 28),
    ("r", 29),
    ("i", 30),
    ("z", 31),
    // Gaia
    ("G", 32),
    ("G_BP", 33),
    ("G_RP", 34),
];

/// Built-in named filter sets: `(name, system code, filter codes)`.
const SETS: &[(&str, i32, &[i32])] = &[
    ("ubv", 1, &[1, 2, 3]),
    ("bvi", 1, &[2, 3, 5]),
    ("jhk", 2, &[6, 7, 8]),
    ("vby", 4, &[10, 11, 12]),
    ("gri", 9, &[28, 29, 30]),
    ("gaia", 10, &[32, 33, 34]),
];

/// Immutable name ↔ code registry. Built once, side-effect free.
#[derive(Debug, Clone)]
pub struct Registry {
    systems_by_name: HashMap<String, i32>,

    filters_by_name: HashMap<String, i32>,

    filters_by_code: HashMap<i32, String>,

    sets_by_name: HashMap<String, FilterSet>,
}

impl Registry {
    /// Build a registry from enumerated tables, failing on any duplicate
    /// name, duplicate code, out-of-range filter code, or set that references
    /// an unknown system or filter.
    pub fn from_tables(
        systems: &[(&str, i32)],
        filters: &[(&str, i32)],
        sets: &[(&str, i32, &[i32])],
    ) -> BoloResult<Self> {
        let mut systems_by_name = HashMap::with_capacity(systems.len());
        let mut system_codes = HashMap::with_capacity(systems.len());
        for &(name, code) in systems {
            if systems_by_name.insert(name.to_string(), code).is_some() {
                return Err(BoloError::invalid_table(format!(
                    "duplicate system name '{}'",
                    name
                )));
            }
            if system_codes.insert(code, name).is_some() {
                return Err(BoloError::invalid_table(format!(
                    "duplicate system code {}",
                    code
                )));
            }
        }

        let mut filters_by_name = HashMap::with_capacity(filters.len());
        let mut filters_by_code = HashMap::with_capacity(filters.len());
        for &(name, code) in filters {
            if code < 1 || code > MAX_FILTER_CODE {
                return Err(BoloError::invalid_table(format!(
                    "filter code {} for '{}' outside 1..={}",
                    code, name, MAX_FILTER_CODE
                )));
            }
            if filters_by_name.insert(name.to_string(), code).is_some() {
                return Err(BoloError::invalid_table(format!(
                    "duplicate filter name '{}'",
                    name
                )));
            }
            if filters_by_code.insert(code, name.to_string()).is_some() {
                return Err(BoloError::invalid_table(format!(
                    "duplicate filter code {}",
                    code
                )));
            }
        }

        let mut sets_by_name = HashMap::with_capacity(sets.len());
        for &(name, system, codes) in sets {
            if !system_codes.contains_key(&system) {
                return Err(BoloError::invalid_table(format!(
                    "filter set '{}' references unknown system code {}",
                    name, system
                )));
            }
            for code in codes {
                if !filters_by_code.contains_key(code) {
                    return Err(BoloError::invalid_table(format!(
                        "filter set '{}' references unknown filter code {}",
                        name, code
                    )));
                }
            }
            let set = FilterSet::new(name, system, codes.to_vec())?;
            if sets_by_name.insert(name.to_string(), set).is_some() {
                return Err(BoloError::invalid_table(format!(
                    "duplicate filter set name '{}'",
                    name
                )));
            }
        }

        Ok(Self {
            systems_by_name,
            filters_by_name,
            filters_by_code,
            sets_by_name,
        })
    }

    /// The built-in toolkit tables.
    pub fn standard() -> BoloResult<Self> {
        Self::from_tables(SYSTEMS, FILTERS, SETS)
    }

    pub fn system_code(&self, name: &str) -> BoloResult<i32> {
        self.systems_by_name
            .get(name)
            .copied()
            .ok_or_else(|| BoloError::lookup("photometric system", name))
    }

    pub fn filter_code(&self, name: &str) -> BoloResult<i32> {
        self.filters_by_name
            .get(name)
            .copied()
            .ok_or_else(|| BoloError::lookup("filter", name))
    }

    /// Inverse filter lookup. Total over the table: the duplicate-rejecting
    /// construction guarantees no code was orphaned by a name collision.
    pub fn filter_name(&self, code: i32) -> BoloResult<&str> {
        self.filters_by_code
            .get(&code)
            .map(String::as_str)
            .ok_or_else(|| BoloError::lookup("filter code", code.to_string()))
    }

    pub fn filter_set(&self, name: &str) -> BoloResult<&FilterSet> {
        self.sets_by_name
            .get(name)
            .ok_or_else(|| BoloError::lookup("filter set", name))
    }

    /// Names of all defined filter sets, sorted.
    pub fn filter_set_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.sets_by_name.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
