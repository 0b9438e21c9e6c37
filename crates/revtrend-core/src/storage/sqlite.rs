//! SQLite history of imported revenue series.

use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use crate::error::RevtrendError;
use crate::model::{
    FiscalPeriod, RecordFlag, ReportingUnit, RevenueRecord, RevenueSeries, Segment, TotalSource,
};

/// One completed import, as listed by [`SeriesStore::import_history`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportRecord {
    pub source: String,
    pub imported_at: String,
    pub records: usize,
    pub latest_period: Option<FiscalPeriod>,
    pub unit: ReportingUnit,
}

/// Quarterly records keyed by fiscal period. Re-importing a period replaces
/// the stored record, so the newest document wins for restated quarters.
///
/// Amounts are stored as decimal text to keep them exact.
#[derive(Debug)]
pub struct SeriesStore {
    conn: Connection,
}

impl SeriesStore {
    /// Open (or create) a store at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RevtrendError> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Create an in-memory store. Data is lost when the store is dropped.
    pub fn in_memory() -> Result<Self, RevtrendError> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    fn initialize_schema(&self) -> Result<(), RevtrendError> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS revenue_records (
                fiscal_year INTEGER NOT NULL,
                quarter INTEGER NOT NULL,
                total TEXT NOT NULL,
                total_source TEXT NOT NULL,
                flags_json TEXT NOT NULL,
                unit TEXT NOT NULL,
                source TEXT NOT NULL,
                PRIMARY KEY (fiscal_year, quarter)
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS segment_amounts (
                fiscal_year INTEGER NOT NULL,
                quarter INTEGER NOT NULL,
                segment TEXT NOT NULL,
                amount TEXT NOT NULL,
                PRIMARY KEY (fiscal_year, quarter, segment)
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS import_metadata (
                source TEXT PRIMARY KEY,
                imported_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
                records INTEGER NOT NULL,
                latest_year INTEGER,
                latest_quarter INTEGER,
                unit TEXT NOT NULL
            )",
            [],
        )?;

        debug!("series store schema initialized");
        Ok(())
    }

    /// Upsert every record of `series` and log the import under `source`.
    /// Returns the number of records written.
    pub fn save_series(
        &mut self,
        series: &RevenueSeries,
        source: &str,
    ) -> Result<usize, RevtrendError> {
        let unit = series.unit();
        let tx = self.conn.transaction()?;

        for record in series {
            let (year, quarter) = (record.period.year(), record.period.quarter());
            tx.execute(
                "INSERT OR REPLACE INTO revenue_records
                 (fiscal_year, quarter, total, total_source, flags_json, unit, source)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    year,
                    quarter,
                    record.total.to_string(),
                    record.total_source.as_str(),
                    serde_json::to_string(&record.flags)?,
                    unit.as_str(),
                    source,
                ],
            )?;
            tx.execute(
                "DELETE FROM segment_amounts WHERE fiscal_year = ?1 AND quarter = ?2",
                params![year, quarter],
            )?;
            for (segment, amount) in &record.segment_amounts {
                tx.execute(
                    "INSERT INTO segment_amounts (fiscal_year, quarter, segment, amount)
                     VALUES (?1, ?2, ?3, ?4)",
                    params![year, quarter, segment.key(), amount.to_string()],
                )?;
            }
        }

        let latest = series.last().map(|r| r.period);
        tx.execute(
            "INSERT OR REPLACE INTO import_metadata
             (source, imported_at, records, latest_year, latest_quarter, unit)
             VALUES (?1, CURRENT_TIMESTAMP, ?2, ?3, ?4, ?5)",
            params![
                source,
                series.len() as i64,
                latest.map(|p| p.year()),
                latest.map(|p| p.quarter()),
                unit.as_str(),
            ],
        )?;

        tx.commit()?;
        debug!(source, records = series.len(), "saved series");
        Ok(series.len())
    }

    /// Every stored record in period order.
    pub fn load_series(&self) -> Result<RevenueSeries, RevtrendError> {
        self.load_where("1 = 1", &[], None)
    }

    /// Records from `start` through `end`, inclusive.
    pub fn load_range(
        &self,
        start: FiscalPeriod,
        end: FiscalPeriod,
    ) -> Result<RevenueSeries, RevtrendError> {
        self.load_where(
            "fiscal_year * 4 + quarter BETWEEN ?1 AND ?2",
            &[&ordinal(start), &ordinal(end)],
            None,
        )
    }

    /// The `n` most recent records, in period order.
    pub fn load_latest(&self, n: usize) -> Result<RevenueSeries, RevtrendError> {
        self.load_where("1 = 1", &[], Some(n))
    }

    fn load_where(
        &self,
        filter: &str,
        args: &[&dyn rusqlite::ToSql],
        limit: Option<usize>,
    ) -> Result<RevenueSeries, RevtrendError> {
        let mut sql = format!(
            "SELECT fiscal_year, quarter, total, total_source, flags_json, unit
             FROM revenue_records WHERE {filter}
             ORDER BY fiscal_year DESC, quarter DESC"
        );
        if let Some(n) = limit {
            sql.push_str(&format!(" LIMIT {n}"));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(args, |row| {
                Ok((
                    row.get::<_, i32>(0)?,
                    row.get::<_, u8>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, String>(5)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        // Rows are newest first; the latest record decides the series unit.
        let unit = rows
            .first()
            .and_then(|r| ReportingUnit::from_key(&r.5))
            .unwrap_or_default();

        let mut records = Vec::with_capacity(rows.len());
        for (year, quarter, total, total_source, flags_json, _) in rows {
            let period = FiscalPeriod::new(year, quarter)?;
            let total_source = TotalSource::from_key(&total_source).ok_or_else(|| {
                RevtrendError::InvalidSeries(format!("{period}: unknown total source '{total_source}'"))
            })?;
            let flags: Vec<RecordFlag> = serde_json::from_str(&flags_json)?;
            records.push(RevenueRecord {
                period,
                segment_amounts: self.segment_amounts(period)?,
                total: parse_decimal(&total, period)?,
                total_source,
                flags,
            });
        }

        debug!(records = records.len(), "loaded series from store");
        RevenueSeries::new(unit, records)
    }

    fn segment_amounts(
        &self,
        period: FiscalPeriod,
    ) -> Result<BTreeMap<Segment, Decimal>, RevtrendError> {
        let mut stmt = self.conn.prepare(
            "SELECT segment, amount FROM segment_amounts
             WHERE fiscal_year = ?1 AND quarter = ?2",
        )?;
        let rows = stmt
            .query_map(params![period.year(), period.quarter()], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut amounts = BTreeMap::new();
        for (key, amount) in rows {
            let segment = Segment::from_key(&key).ok_or_else(|| {
                RevtrendError::InvalidSeries(format!("{period}: unknown segment key '{key}'"))
            })?;
            amounts.insert(segment, parse_decimal(&amount, period)?);
        }
        Ok(amounts)
    }

    /// Past imports, most recent first.
    pub fn import_history(&self) -> Result<Vec<ImportRecord>, RevtrendError> {
        let mut stmt = self.conn.prepare(
            "SELECT source, imported_at, records, latest_year, latest_quarter, unit
             FROM import_metadata
             ORDER BY imported_at DESC, rowid DESC",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, i64>(2)?,
                    row.get::<_, Option<i32>>(3)?,
                    row.get::<_, Option<u8>>(4)?,
                    row.get::<_, String>(5)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(source, imported_at, records, year, quarter, unit)| {
                let latest_period = match (year, quarter) {
                    (Some(y), Some(q)) => Some(FiscalPeriod::new(y, q)?),
                    _ => None,
                };
                Ok(ImportRecord {
                    source,
                    imported_at,
                    records: records.max(0) as usize,
                    latest_period,
                    unit: ReportingUnit::from_key(&unit).unwrap_or_default(),
                })
            })
            .collect()
    }

    /// Whether a document has already been imported under this name.
    pub fn has_import(&self, source: &str) -> Result<bool, RevtrendError> {
        let found = self
            .conn
            .query_row(
                "SELECT 1 FROM import_metadata WHERE source = ?1",
                params![source],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }
}

fn ordinal(period: FiscalPeriod) -> i64 {
    i64::from(period.year()) * 4 + i64::from(period.quarter())
}

fn parse_decimal(raw: &str, period: FiscalPeriod) -> Result<Decimal, RevtrendError> {
    Decimal::from_str(raw).map_err(|e| {
        RevtrendError::InvalidSeries(format!("{period}: stored amount '{raw}' is invalid: {e}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn q(year: i32, quarter: u8) -> FiscalPeriod {
        FiscalPeriod::new(year, quarter).unwrap()
    }

    fn series(points: &[((i32, u8), Decimal, Decimal)]) -> RevenueSeries {
        let records = points
            .iter()
            .map(|&((y, qn), dc, gaming)| {
                let mut amounts = BTreeMap::new();
                amounts.insert(Segment::DataCenter, dc);
                amounts.insert(Segment::Gaming, gaming);
                RevenueRecord::assemble(q(y, qn), amounts, None, dec!(1000000), vec![])
            })
            .collect();
        RevenueSeries::new(ReportingUnit::Millions, records).unwrap()
    }

    #[test]
    fn test_round_trip() {
        let mut store = SeriesStore::in_memory().unwrap();
        let original = series(&[
            ((2025, 3), dec!(30771000000), dec!(3279000000)),
            ((2025, 4), dec!(35580000000), dec!(2544000000)),
            ((2024, 4), dec!(18404000000), dec!(2865000000)),
        ]);
        assert_eq!(store.save_series(&original, "a.pdf").unwrap(), 3);
        assert_eq!(store.load_series().unwrap(), original);
    }

    #[test]
    fn test_reimport_replaces_period() {
        let mut store = SeriesStore::in_memory().unwrap();
        store
            .save_series(&series(&[((2025, 1), dec!(100), dec!(10))]), "old.pdf")
            .unwrap();
        store
            .save_series(&series(&[((2025, 1), dec!(120), dec!(10))]), "new.pdf")
            .unwrap();
        let loaded = store.load_series().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.records()[0].amount(Segment::DataCenter), Some(dec!(120)));
    }

    #[test]
    fn test_load_range_and_latest() {
        let mut store = SeriesStore::in_memory().unwrap();
        let all = series(&[
            ((2024, 3), dec!(1), dec!(1)),
            ((2024, 4), dec!(2), dec!(1)),
            ((2025, 1), dec!(3), dec!(1)),
            ((2025, 2), dec!(4), dec!(1)),
        ]);
        store.save_series(&all, "a.pdf").unwrap();

        let range = store.load_range(q(2024, 4), q(2025, 1)).unwrap();
        assert_eq!(range.periods(), vec![q(2024, 4), q(2025, 1)]);

        let latest = store.load_latest(3).unwrap();
        assert_eq!(latest.periods(), vec![q(2024, 4), q(2025, 1), q(2025, 2)]);
    }

    #[test]
    fn test_import_history() {
        let mut store = SeriesStore::in_memory().unwrap();
        store
            .save_series(&series(&[((2025, 2), dec!(1), dec!(1))]), "Q225.pdf")
            .unwrap();
        let history = store.import_history().unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].source, "Q225.pdf");
        assert_eq!(history[0].records, 1);
        assert_eq!(history[0].latest_period, Some(q(2025, 2)));
        assert!(store.has_import("Q225.pdf").unwrap());
        assert!(!store.has_import("other.pdf").unwrap());
    }

    #[test]
    fn test_empty_store_loads_empty_series() {
        let store = SeriesStore::in_memory().unwrap();
        assert!(store.load_series().unwrap().is_empty());
    }

    #[test]
    fn test_open_file_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("revenue.db");
        {
            let mut store = SeriesStore::open(&path).unwrap();
            store
                .save_series(&series(&[((2025, 1), dec!(5), dec!(2))]), "a.pdf")
                .unwrap();
        }
        let store = SeriesStore::open(&path).unwrap();
        assert_eq!(store.load_series().unwrap().len(), 1);
    }
}
