pub mod academic_years;

use std::collections::HashSet;
use std::path::Path;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::config::ALL_TIME_LABEL;
use crate::error::{AppError, Result};
use crate::types::Period;

/// Fixed registry of academic periods, sorted by `order` ascending.
/// Loaded once at start-up and passed explicitly to whoever needs it.
#[derive(Debug, Clone)]
pub struct PeriodCatalog {
    periods: Vec<Period>,
}

impl PeriodCatalog {
    /// Validates and sorts `periods`. Rejects empty or reserved names,
    /// duplicate names or orders, periods with `start >= end` or starting
    /// before the unix epoch, and orders whose starts do not strictly increase.
    pub fn new(mut periods: Vec<Period>) -> Result<Self> {
        let mut names = HashSet::new();
        let mut orders = HashSet::new();
        for p in &periods {
            if p.name.trim().is_empty() {
                return Err(AppError::Catalog("period with an empty name".to_string()));
            }
            if p.name == ALL_TIME_LABEL {
                return Err(AppError::Catalog(format!("{ALL_TIME_LABEL:?} is reserved")));
            }
            if p.start >= p.end {
                return Err(AppError::Catalog(format!(
                    "{}: start {} is not before end {}",
                    p.name, p.start, p.end
                )));
            }
            if p.start.timestamp() < 0 {
                return Err(AppError::Catalog(format!(
                    "{}: start {} is before the unix epoch",
                    p.name, p.start
                )));
            }
            if !names.insert(p.name.as_str()) {
                return Err(AppError::Catalog(format!("duplicate period name {}", p.name)));
            }
            if !orders.insert(p.order) {
                return Err(AppError::Catalog(format!("duplicate period order {}", p.order)));
            }
        }
        periods.sort_by_key(|p| p.order);
        // a window ends at its successor's start, so starts must increase with order
        if let Some(pair) = periods.windows(2).find(|pair| pair[1].start <= pair[0].start) {
            return Err(AppError::Catalog(format!(
                "{} (order {}) starts at {}, not after {} (order {})",
                pair[1].name, pair[1].order, pair[1].start, pair[0].name, pair[0].order
            )));
        }
        Ok(Self { periods })
    }

    /// Parse a JSON array of `{name, start, end, order}` with RFC 3339 instants.
    pub fn from_json(raw: &str) -> Result<Self> {
        let periods: Vec<Period> = serde_json::from_str(raw)?;
        Self::new(periods)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let catalog = Self::from_json(&raw)?;
        info!(path = %path.display(), periods = catalog.len(), "Loaded period catalog");
        Ok(catalog)
    }

    pub fn periods(&self) -> &[Period] {
        &self.periods
    }

    pub fn len(&self) -> usize {
        self.periods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    /// The period whose `[start, end)` contains `now`, if any.
    /// `None` between terms (e.g. during summer recess).
    pub fn current_period(&self, now: DateTime<Utc>) -> Option<&Period> {
        self.periods.iter().find(|p| p.start <= now && now < p.end)
    }

    /// `"All Time"` followed by every period name in catalog order.
    pub fn all_period_names(&self) -> Vec<String> {
        std::iter::once(ALL_TIME_LABEL.to_string())
            .chain(self.periods.iter().map(|p| p.name.clone()))
            .collect()
    }

    pub fn bounds(&self, name: &str) -> Result<&Period> {
        self.position(name).map(|i| &self.periods[i])
    }

    /// The period right after `name` in catalog order; `None` for the last one.
    pub fn successor(&self, name: &str) -> Result<Option<&Period>> {
        let i = self.position(name)?;
        Ok(self.periods.get(i + 1))
    }

    fn position(&self, name: &str) -> Result<usize> {
        self.periods
            .iter()
            .position(|p| p.name == name)
            .ok_or_else(|| AppError::PeriodNotFound(name.to_string()))
    }
}
