//! Country-level economic indicators from the global CSV.
//!
//! Rows keep their raw string values; numeric columns are parsed when read
//! so a malformed cell only affects the series that needs it.

use std::collections::BTreeMap;

use serde::Serialize;

/// Column holding the country name.
pub const COUNTRY_COLUMN: &str = "Country";
/// Column holding the observation year.
pub const YEAR_COLUMN: &str = "Year";
/// Column holding headline consumer price inflation, in percent.
pub const INFLATION_COLUMN: &str = "Headline Consumer Price Inflation";
/// Column holding GDP per capita in US dollars.
pub const GDP_COLUMN: &str = "GDP per Capita";
/// Column holding the happiness score.
pub const HAPPINESS_COLUMN: &str = "Score";

/// Countries plotted on the inflation comparison chart.
pub const COMPARISON_COUNTRIES: [&str; 5] = ["Tunisia", "Morocco", "Egypt", "France", "Germany"];

/// One CSV row keyed by header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct IndicatorRow {
    values: BTreeMap<String, String>,
}

impl IndicatorRow {
    /// Pair `headers` with `fields` positionally.
    ///
    /// Surplus fields or headers are ignored; callers are expected to have
    /// rejected rows of the wrong width already.
    #[must_use]
    pub fn from_fields<H, F>(headers: &[H], fields: &[F]) -> Self
    where
        H: AsRef<str>,
        F: AsRef<str>,
    {
        let values = headers
            .iter()
            .zip(fields)
            .map(|(header, field)| (header.as_ref().to_owned(), field.as_ref().to_owned()))
            .collect();
        Self { values }
    }

    /// Raw value of `column`.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&str> {
        self.values.get(column).map(String::as_str)
    }

    /// Value of `column` parsed as a finite number.
    #[must_use]
    pub fn number(&self, column: &str) -> Option<f64> {
        self.get(column)
            .and_then(|raw| raw.parse::<f64>().ok())
            .filter(|value| value.is_finite())
    }

    /// Country name.
    #[must_use]
    pub fn country(&self) -> Option<&str> {
        self.get(COUNTRY_COLUMN)
    }

    /// Observation year.
    #[must_use]
    pub fn year(&self) -> Option<i32> {
        self.get(YEAR_COLUMN).and_then(|raw| raw.parse().ok())
    }
}

/// Line-chart series for a single country.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    /// Country the series belongs to.
    pub country: String,
    /// `(year, value)` points in ascending year order.
    pub points: Vec<(i32, f64)>,
}

/// A country-year on the happiness/GDP scatter plot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    /// Country name.
    pub country: String,
    /// Observation year, when parseable.
    pub year: Option<i32>,
    /// GDP per capita in US dollars.
    pub gdp_per_capita: f64,
    /// Happiness score.
    pub happiness: f64,
}

/// The global indicator dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GlobalIndicators {
    rows: Vec<IndicatorRow>,
}

impl GlobalIndicators {
    /// Wrap rows in source order.
    #[must_use]
    pub const fn new(rows: Vec<IndicatorRow>) -> Self {
        Self { rows }
    }

    /// All rows in source order.
    #[must_use]
    pub fn rows(&self) -> &[IndicatorRow] {
        &self.rows
    }

    /// Rows recorded for `country`.
    pub fn for_country<'a, 'b>(
        &'a self,
        country: &'b str,
    ) -> impl Iterator<Item = &'a IndicatorRow> + use<'a, 'b> {
        self.rows
            .iter()
            .filter(move |row| row.country() == Some(country))
    }

    /// The row with the latest year for `country`.
    ///
    /// When several rows share the latest year, the first one wins. Rows
    /// without a parseable year are only used if no row has one.
    #[must_use]
    pub fn latest_for(&self, country: &str) -> Option<&IndicatorRow> {
        let mut latest: Option<&IndicatorRow> = None;
        for row in self.for_country(country) {
            let newer = match latest {
                None => true,
                Some(current) => row.year() > current.year(),
            };
            if newer {
                latest = Some(row);
            }
        }
        latest
    }

    /// Headline inflation for `country`, sorted by year.
    ///
    /// Rows with an unparseable year or inflation value are skipped.
    #[must_use]
    pub fn inflation_series(&self, country: &str) -> Series {
        let mut points: Vec<(i32, f64)> = self
            .for_country(country)
            .filter_map(|row| Some((row.year()?, row.number(INFLATION_COLUMN)?)))
            .collect();
        points.sort_by_key(|&(year, _)| year);
        Series {
            country: country.to_owned(),
            points,
        }
    }

    /// Inflation series for each of [`COMPARISON_COUNTRIES`].
    #[must_use]
    pub fn comparison_series(&self) -> Vec<Series> {
        COMPARISON_COUNTRIES
            .iter()
            .map(|country| self.inflation_series(country))
            .collect()
    }

    /// GDP per capita against happiness for every row where both are
    /// positive.
    #[must_use]
    pub fn happiness_vs_gdp(&self) -> Vec<ScatterPoint> {
        self.rows
            .iter()
            .filter_map(|row| {
                let gdp_per_capita = row.number(GDP_COLUMN).filter(|v| *v > 0.0)?;
                let happiness = row.number(HAPPINESS_COLUMN).filter(|v| *v > 0.0)?;
                Some(ScatterPoint {
                    country: row.country().unwrap_or_default().to_owned(),
                    year: row.year(),
                    gdp_per_capita,
                    happiness,
                })
            })
            .collect()
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Report whether there are no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl FromIterator<IndicatorRow> for GlobalIndicators {
    fn from_iter<I: IntoIterator<Item = IndicatorRow>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    const HEADERS: [&str; 5] = [
        COUNTRY_COLUMN,
        YEAR_COLUMN,
        INFLATION_COLUMN,
        GDP_COLUMN,
        HAPPINESS_COLUMN,
    ];

    #[fixture]
    fn indicators() -> GlobalIndicators {
        [
            ["Tunisia", "2021", "5.7", "3807", "4.5"],
            ["Tunisia", "2019", "6.7", "3317", "4.4"],
            ["Morocco", "2020", "0.7", "3009", "5.0"],
            ["Tunisia", "2020", "5.6", "n/a", "4.7"],
            ["Egypt", "2020", "", "3548", "0"],
        ]
        .iter()
        .map(|fields| IndicatorRow::from_fields(&HEADERS, fields))
        .collect()
    }

    #[rstest]
    fn latest_row_has_highest_year(indicators: GlobalIndicators) {
        let latest = indicators.latest_for("Tunisia").expect("Tunisia rows");
        assert_eq!(latest.year(), Some(2021));
        assert_eq!(latest.get(INFLATION_COLUMN), Some("5.7"));
    }

    #[rstest]
    fn latest_for_unknown_country_is_none(indicators: GlobalIndicators) {
        assert!(indicators.latest_for("Atlantis").is_none());
    }

    #[rstest]
    fn inflation_series_is_sorted_by_year(indicators: GlobalIndicators) {
        let series = indicators.inflation_series("Tunisia");
        assert_eq!(series.points, vec![(2019, 6.7), (2020, 5.6), (2021, 5.7)]);
    }

    #[rstest]
    fn inflation_series_skips_blank_values(indicators: GlobalIndicators) {
        assert!(indicators.inflation_series("Egypt").points.is_empty());
    }

    #[rstest]
    fn comparison_covers_fixed_countries(indicators: GlobalIndicators) {
        let countries: Vec<_> = indicators
            .comparison_series()
            .into_iter()
            .map(|s| s.country)
            .collect();
        assert_eq!(countries, COMPARISON_COUNTRIES.map(str::to_owned).to_vec());
    }

    #[rstest]
    fn scatter_keeps_positive_pairs_only(indicators: GlobalIndicators) {
        let points = indicators.happiness_vs_gdp();
        assert_eq!(points.len(), 3);
        assert!(points.iter().all(|p| p.gdp_per_capita > 0.0 && p.happiness > 0.0));
        assert!(points.iter().all(|p| p.country != "Egypt"));
    }
}
