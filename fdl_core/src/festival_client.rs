//! This client fetches the festival listing and parses it into festival records.

use anyhow::Result;
use log::{info, warn};
use scraper::{ElementRef, Html, Selector};
use serde::Serialize;

use crate::date_range::{DateRangeParser, InvalidDateError};
use crate::short_id::ShortIdRegistry;

/// Reference year applied to every date token of a run.
pub const DEFAULT_YEAR: i32 = 2026;

/// Date, name, country, postal code and venue columns.
const COLUMN_COUNT: usize = 5;

static EXCLUDED_NAME_PREFIX: &str = "Irish ";
static USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/115.0.0.0 Safari/537.36";

/// One festival extracted from the listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FestivalRecord {
    pub id: String,
    pub name: String,
    pub venue: String,
    pub country: String,
    pub postal_code: String,
    /// ISO date, `None` when the raw token matched no date pattern.
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub slug: String,
    /// The unmodified date cell, retained for auditability.
    pub raw_date: String,
}

/// Why a table row produced no record.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SkipReason {
    #[error("row has {found} columns, expected at least {expected}")]
    TooFewColumns { found: usize, expected: usize },
    #[error("name {name:?} belongs to an excluded category")]
    ExcludedName { name: String },
    #[error(transparent)]
    InvalidDate(#[from] InvalidDateError),
}

/// A dropped row, kept so callers can audit data loss.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRow {
    /// 1-based row count across all event tables.
    pub row: usize,
    pub reason: SkipReason,
}

/// Everything one run extracted from the listing page.
#[derive(Debug, Default)]
pub struct Harvest {
    pub festivals: Vec<FestivalRecord>,
    pub skipped: Vec<SkippedRow>,
}

/// Fetch the listing at `url` and harvest festival records for `year`.
///
/// A non-success response is logged and yields an empty harvest, so a failed
/// fetch still produces a valid (empty) output artifact.
pub async fn get(url: &str, year: i32) -> Result<Harvest> {
    info!("fetching {url}");
    let client = reqwest::Client::new();
    let response = client
        .get(url)
        .header(reqwest::header::USER_AGENT, USER_AGENT)
        .send()
        .await?;
    let status = response.status();
    if !status.is_success() {
        warn!("fetching {url} failed with status {status}");
        return Ok(Harvest::default());
    }
    parse(&response.text().await?, year)
}

/// Parse the listing HTML into a harvest.
fn parse(html: &str, year: i32) -> Result<Harvest> {
    let dom = Html::parse_document(html);
    let table_selector = Selector::parse("tbody.vevent").unwrap();
    let row_selector = Selector::parse("tr").unwrap();
    let cell_selector = Selector::parse("td").unwrap();
    let link_selector = Selector::parse("a").unwrap();

    let tables: Vec<_> = dom.select(&table_selector).collect();
    info!("found {} festival tables", tables.len());

    let parser = DateRangeParser::new(year);
    let mut ids = ShortIdRegistry::new();
    let mut harvest = Harvest::default();
    let mut row_number = 0;
    for table in tables {
        for row in table.select(&row_selector) {
            row_number += 1;
            let cells: Vec<_> = row.select(&cell_selector).collect();
            if cells.len() < COLUMN_COUNT {
                harvest.skipped.push(SkippedRow {
                    row: row_number,
                    reason: SkipReason::TooFewColumns {
                        found: cells.len(),
                        expected: COLUMN_COUNT,
                    },
                });
                continue;
            }
            let raw_date = cell_text(&cells[0]);
            let name = cell_text(&cells[1]);
            let country = cell_text(&cells[2]);
            let postal_code = cell_text(&cells[3]);
            let venue = cell_text(&cells[4]);
            if name.starts_with(EXCLUDED_NAME_PREFIX) {
                harvest.skipped.push(SkippedRow {
                    row: row_number,
                    reason: SkipReason::ExcludedName { name },
                });
                continue;
            }
            let range = match parser.parse(&raw_date) {
                Ok(range) => range,
                Err(err) => {
                    harvest.skipped.push(SkippedRow {
                        row: row_number,
                        reason: SkipReason::InvalidDate(err),
                    });
                    continue;
                }
            };
            let (start_date, end_date) = match range {
                Some(range) => (Some(range.start_iso()), Some(range.end_iso())),
                None => (None, None),
            };
            let link = cells[1]
                .select(&link_selector)
                .next()
                .and_then(|a| a.value().attr("href"))
                .unwrap_or("");
            let slug = slug_from_link(link);
            let content = match &start_date {
                Some(start) => format!("{name}{start}"),
                None => name.clone(),
            };
            let id = ids.assign(&content)?;
            harvest.festivals.push(FestivalRecord {
                id,
                name,
                venue,
                country,
                postal_code,
                start_date,
                end_date,
                slug,
                raw_date,
            });
        }
    }
    Ok(harvest)
}

fn cell_text(cell: &ElementRef) -> String {
    cell.text().map(str::trim).collect()
}

/// Keep only the final path segment of an event link.
fn slug_from_link(link: &str) -> String {
    link.trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or("")
        .to_string()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::short_id::SHORT_ID_LENGTH;

    /// Test whether the listing HTML is parsed correctly.
    ///
    /// This test is offline.
    #[test]
    fn test_parse() {
        let html = include_str!("festival_client/tests/listing.html");
        let harvest = parse(html, 2026).unwrap();

        let names: Vec<&str> = harvest.festivals.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(
            names,
            ["Folkfest am Rhein", "Herbstklänge", "Winterfolk", "Bardentreffen"]
        );

        let folkfest = &harvest.festivals[0];
        assert_eq!(folkfest.raw_date, "04.06.");
        assert_eq!(folkfest.start_date.as_deref(), Some("2026-06-04"));
        assert_eq!(folkfest.end_date.as_deref(), Some("2026-06-04"));
        assert_eq!(folkfest.country, "DE");
        assert_eq!(folkfest.postal_code, "55411");
        assert_eq!(folkfest.venue, "Bingen");
        assert_eq!(folkfest.slug, "folkfest-am-rhein");

        let herbstklaenge = &harvest.festivals[1];
        assert_eq!(herbstklaenge.start_date.as_deref(), Some("2026-11-02"));
        assert_eq!(herbstklaenge.end_date.as_deref(), Some("2026-11-06"));
        assert_eq!(herbstklaenge.slug, "");

        let winterfolk = &harvest.festivals[2];
        assert_eq!(winterfolk.raw_date, "TBA");
        assert_eq!(winterfolk.start_date, None);
        assert_eq!(winterfolk.end_date, None);

        let bardentreffen = &harvest.festivals[3];
        assert_eq!(bardentreffen.start_date.as_deref(), Some("2026-07-24"));
        assert_eq!(bardentreffen.end_date.as_deref(), Some("2026-07-26"));
        assert_eq!(bardentreffen.slug, "bardentreffen");
    }

    /// Dropped rows surface as typed audit entries instead of vanishing.
    #[test]
    fn test_parse_audits_skipped_rows() {
        let html = include_str!("festival_client/tests/listing.html");
        let harvest = parse(html, 2026).unwrap();

        assert_eq!(harvest.skipped.len(), 4);
        assert_eq!(harvest.skipped[0].row, 1);
        assert_eq!(
            harvest.skipped[0].reason,
            SkipReason::TooFewColumns {
                found: 0,
                expected: COLUMN_COUNT
            }
        );
        assert_eq!(
            harvest.skipped[1].reason,
            SkipReason::ExcludedName {
                name: "Irish Spring Festival".to_string()
            }
        );
        assert_eq!(harvest.skipped[2].row, 6);
        assert!(matches!(
            harvest.skipped[2].reason,
            SkipReason::InvalidDate(_)
        ));
        assert_eq!(
            harvest.skipped[3].reason,
            SkipReason::TooFewColumns {
                found: 3,
                expected: COLUMN_COUNT
            }
        );
    }

    #[test]
    fn test_parse_issues_unique_short_ids() {
        let html = include_str!("festival_client/tests/listing.html");
        let harvest = parse(html, 2026).unwrap();

        let ids: HashSet<&str> = harvest.festivals.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids.len(), harvest.festivals.len());
        for festival in &harvest.festivals {
            assert!(festival.id.len() >= SHORT_ID_LENGTH);
        }
    }

    #[test]
    fn test_records_serialize_with_camel_case_and_literal_umlauts() {
        let html = include_str!("festival_client/tests/listing.html");
        let harvest = parse(html, 2026).unwrap();

        let json = serde_json::to_string_pretty(&harvest.festivals).unwrap();
        assert!(json.contains("\"postalCode\""));
        assert!(json.contains("\"startDate\""));
        assert!(json.contains("\"rawDate\""));
        assert!(json.contains("Herbstklänge"));
        assert!(json.contains("\"startDate\": null"));
    }

    #[test]
    fn test_empty_harvest_serializes_to_empty_array() {
        let harvest = Harvest::default();
        let json = serde_json::to_string_pretty(&harvest.festivals).unwrap();
        assert_eq!(json, "[]");
    }

    #[test]
    fn test_slug_from_link() {
        assert_eq!(
            slug_from_link("https://festivalkalender.example/events/folkfest-am-rhein/"),
            "folkfest-am-rhein"
        );
        assert_eq!(
            slug_from_link("https://festivalkalender.example/events/bardentreffen"),
            "bardentreffen"
        );
        assert_eq!(slug_from_link(""), "");
    }
}
