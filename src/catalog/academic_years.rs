use chrono::{DateTime, TimeZone, Utc};

use super::PeriodCatalog;
use crate::error::{AppError, Result};
use crate::types::Period;

/// Bounds are midnight Pacific (07:00 UTC). Each year runs from the first day
/// of fall instruction to the last day of spring finals; summer is a gap.
const ACADEMIC_YEARS: &[(&str, (i32, u32, u32), (i32, u32, u32))] = &[
    ("2017-2018", (2017, 9, 25), (2018, 6, 16)),
    ("2018-2019", (2018, 9, 24), (2019, 6, 15)),
    ("2019-2020", (2019, 9, 23), (2020, 6, 13)),
    ("2020-2021", (2020, 9, 28), (2021, 6, 12)),
    ("2021-2022", (2021, 9, 20), (2022, 6, 11)),
    ("2022-2023", (2022, 9, 19), (2023, 6, 17)),
    ("2023-2024", (2023, 9, 25), (2024, 6, 15)),
    ("2024-2025", (2024, 9, 23), (2025, 6, 14)),
    ("2025-2026", (2025, 9, 22), (2026, 6, 13)),
    ("2026-2027", (2026, 9, 21), (2027, 6, 12)),
    ("2027-2028", (2027, 9, 20), (2028, 6, 10)),
];

impl PeriodCatalog {
    /// Built-in academic-year catalog, used when no CATALOG_PATH is configured.
    pub fn academic_years() -> Result<Self> {
        let periods = ACADEMIC_YEARS
            .iter()
            .enumerate()
            .map(|(i, &(name, start, end))| {
                Ok(Period {
                    name: name.to_string(),
                    start: pacific_midnight(start)?,
                    end: pacific_midnight(end)?,
                    order: i as i64,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(periods)
    }
}

fn pacific_midnight((y, m, d): (i32, u32, u32)) -> Result<DateTime<Utc>> {
    Utc.with_ymd_and_hms(y, m, d, 7, 0, 0)
        .single()
        .ok_or_else(|| AppError::Catalog(format!("invalid date {y}-{m:02}-{d:02}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_is_valid_and_ordered() {
        let catalog = PeriodCatalog::academic_years().unwrap();
        assert_eq!(catalog.len(), ACADEMIC_YEARS.len());
        let names = catalog.all_period_names();
        assert_eq!(names[0], "All Time");
        assert_eq!(names[1], "2017-2018");
        assert_eq!(names.last().unwrap(), "2027-2028");
    }

    #[test]
    fn builtin_years_leave_a_summer_gap() {
        let catalog = PeriodCatalog::academic_years().unwrap();
        for pair in catalog.periods().windows(2) {
            assert!(pair[0].end < pair[1].start, "{} overlaps {}", pair[0].name, pair[1].name);
        }
    }
}
