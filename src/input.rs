//! Star-parameter input encoder.
//!
//! The toolkit reads one whitespace-delimited line per star. Values are
//! written with their direct textual representation; no fixed decimal
//! formatting is imposed, the Fortran list-directed reader does not need it.

use crate::errors::{BoloError, BoloResult};
use std::fmt::Write as _;
use std::path::Path;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Per-star physical parameters as supplied by the caller.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StarRecord {
    pub id: String,

    /// Surface gravity, log g.
    pub logg: f64,

    /// Metallicity, [Fe/H].
    pub feh: f64,

    /// Effective temperature in K.
    pub teff: f64,

    /// Reddening, E(B-V).
    pub ebv: f64,
}

/// Encode five parallel slices into the toolkit's input file, one line per
/// star: `"<id> <logg> <feh> <teff> <ebv>"`. The destination is fully
/// overwritten.
///
/// All five slices must have equal length; a mismatch fails with
/// [`BoloError::IndexMismatch`] before any byte is written, so a partial
/// input file is never left behind.
pub fn write_star_records<S: AsRef<str>>(
    path: &Path,
    ids: &[S],
    logg: &[f64],
    feh: &[f64],
    teff: &[f64],
    ebv: &[f64],
) -> BoloResult<()> {
    let n = ids.len();
    for (name, len) in [
        ("logg", logg.len()),
        ("feh", feh.len()),
        ("teff", teff.len()),
        ("ebv", ebv.len()),
    ] {
        if len != n {
            return Err(BoloError::index_mismatch(name, n, len));
        }
    }

    let mut buf = String::new();
    for i in 0..n {
        let _ = writeln!(
            buf,
            "{} {} {} {} {}",
            ids[i].as_ref(),
            logg[i],
            feh[i],
            teff[i],
            ebv[i]
        );
    }

    std::fs::write(path, buf).map_err(|e| BoloError::io(path, e))?;
    log::debug!("wrote {} star records to {}", n, path.display());
    Ok(())
}

/// [`write_star_records`] for callers holding structured records.
pub fn write_stars(path: &Path, stars: &[StarRecord]) -> BoloResult<()> {
    let ids: Vec<&str> = stars.iter().map(|s| s.id.as_str()).collect();
    let logg: Vec<f64> = stars.iter().map(|s| s.logg).collect();
    let feh: Vec<f64> = stars.iter().map(|s| s.feh).collect();
    let teff: Vec<f64> = stars.iter().map(|s| s.teff).collect();
    let ebv: Vec<f64> = stars.iter().map(|s| s.ebv).collect();
    write_star_records(path, &ids, &logg, &feh, &teff, &ebv)
}
