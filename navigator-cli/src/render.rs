//! Plain-text rendering of command results.

use std::io::{self, Write};

use navigator_core::{
    GovernorateDetails, IndicatorRow, RankedEntry, ScoreOrigin, ScoreRecord, Sector,
    display_value,
};
use serde_json::{Map, Value};

const NOT_AVAILABLE: &str = "N/A";

/// `(label, attribute key, unit suffix)` rows shown under a recommendation.
type Highlight = (&'static str, &'static str, &'static str);

const AGRICULTURE_HIGHLIGHTS: &[Highlight] = &[
    ("Arable land", "arable_land_percentage", "%"),
    ("Main crops", "main_crops", ""),
    ("Water availability", "water_availability_score", "/10"),
];
const TOURISM_HIGHLIGHTS: &[Highlight] = &[
    ("Hotel capacity", "hotel_capacity", " beds"),
    ("Annual visitors", "annual_visitors", ""),
    ("Cultural sites", "cultural_sites", ""),
];
const MANUFACTURING_HIGHLIGHTS: &[Highlight] = &[
    ("Industrial zones", "industrial_zones", ""),
    ("Skilled labour", "skilled_labor_percentage", "%"),
    ("Export infrastructure", "export_infrastructure", "/10"),
];

fn highlights_for(sector: &Sector) -> Option<&'static [Highlight]> {
    match sector.as_str() {
        "agriculture" => Some(AGRICULTURE_HIGHLIGHTS),
        "tourism" => Some(TOURISM_HIGHLIGHTS),
        "manufacturing" => Some(MANUFACTURING_HIGHLIGHTS),
        _ => None,
    }
}

/// Score as `88/100`, or `unscored` when no record exists.
pub(crate) fn score_label(score: &ScoreRecord, origin: ScoreOrigin) -> String {
    match (origin, score.recorded_total()) {
        (ScoreOrigin::Recorded, Some(total)) => format!("{total}/100"),
        _ => "unscored".to_owned(),
    }
}

fn count_or_na(value: u64) -> String {
    if value == 0 {
        NOT_AVAILABLE.to_owned()
    } else {
        value.to_string()
    }
}

fn number_or_na(value: f64, suffix: &str) -> String {
    if value == 0.0 || !value.is_finite() {
        NOT_AVAILABLE.to_owned()
    } else {
        format!("{value}{suffix}")
    }
}

fn attribute_or_na(attributes: &Map<String, Value>, key: &str, suffix: &str) -> String {
    match attributes.get(key) {
        None | Some(Value::Null) => NOT_AVAILABLE.to_owned(),
        Some(Value::Array(items)) if items.is_empty() => NOT_AVAILABLE.to_owned(),
        Some(value) => format!("{}{suffix}", display_value(value)),
    }
}

fn write_list(writer: &mut dyn Write, label: &str, items: &[String]) -> io::Result<()> {
    if items.is_empty() {
        return Ok(());
    }
    writeln!(writer, "   {label}:")?;
    for item in items {
        writeln!(writer, "     - {item}")?;
    }
    Ok(())
}

fn write_sector_highlights(
    writer: &mut dyn Write,
    sector: &Sector,
    attributes: Option<&Map<String, Value>>,
) -> io::Result<()> {
    let Some(attributes) = attributes.filter(|map| !map.is_empty()) else {
        return writeln!(writer, "   No detailed sector data available.");
    };
    let Some(rows) = highlights_for(sector) else {
        return writeln!(writer, "   Sector details not specified.");
    };
    writeln!(writer, "   Sector highlights:")?;
    for (label, key, suffix) in rows {
        writeln!(
            writer,
            "     {label}: {}",
            attribute_or_na(attributes, key, suffix)
        )?;
    }
    Ok(())
}

/// Recommendation cards for `sector`.
pub(crate) fn write_ranking(
    writer: &mut dyn Write,
    sector: &Sector,
    entries: &[RankedEntry<'_>],
) -> io::Result<()> {
    if entries.is_empty() {
        return writeln!(
            writer,
            "No recommendations available for {}.",
            sector.title()
        );
    }
    writeln!(writer, "Top investment opportunities: {}", sector.title())?;
    for (position, entry) in entries.iter().enumerate() {
        let governorate = entry.governorate;
        writeln!(
            writer,
            "{}. {} ({})",
            position + 1,
            governorate.name,
            score_label(entry.score, entry.origin)
        )?;
        writeln!(
            writer,
            "   Population: {} | Unemployment: {}",
            count_or_na(governorate.population),
            number_or_na(governorate.unemployment_rate, "%")
        )?;
        write_sector_highlights(writer, sector, entry.sector_attributes())?;
        write_list(writer, "Strengths", &entry.score.strengths)?;
        write_list(writer, "Opportunities", &entry.score.opportunities)?;
        write_list(writer, "Challenges", &entry.score.challenges)?;
    }
    Ok(())
}

/// Reference data, sector attributes and score for one governorate.
pub(crate) fn write_details(writer: &mut dyn Write, details: &GovernorateDetails) -> io::Result<()> {
    let governorate = &details.governorate;
    if governorate.name_ar.is_empty() {
        writeln!(writer, "{}", governorate.name)?;
    } else {
        writeln!(writer, "{} ({})", governorate.name, governorate.name_ar)?;
    }
    let text_or_na = |text: &str| {
        if text.is_empty() {
            NOT_AVAILABLE.to_owned()
        } else {
            text.to_owned()
        }
    };
    writeln!(writer, "Region: {}", text_or_na(&governorate.region))?;
    writeln!(writer, "Capital: {}", text_or_na(&governorate.capital))?;
    writeln!(writer, "Population: {}", count_or_na(governorate.population))?;
    writeln!(writer, "Area: {}", number_or_na(governorate.area_km2, " km²"))?;
    writeln!(
        writer,
        "Coastal access: {}",
        if governorate.coastal_access { "Yes" } else { "No" }
    )?;
    writeln!(
        writer,
        "Unemployment rate: {}",
        number_or_na(governorate.unemployment_rate, "%")
    )?;
    writeln!(
        writer,
        "Youth unemployment: {}",
        number_or_na(governorate.youth_unemployment, "%")
    )?;
    writeln!(
        writer,
        "Population density: {}",
        number_or_na(governorate.population_density, " per km²")
    )?;
    writeln!(
        writer,
        "Urban population: {}",
        number_or_na(governorate.urban_percentage, "%")
    )?;

    let Some(sector) = &details.sector else {
        return writeln!(writer, "Select a sector to see specific data.");
    };
    writeln!(writer)?;
    writeln!(writer, "{} data", sector.title())?;
    if details.attributes.is_empty() {
        writeln!(writer, "  No specific data for {sector} in this governorate.")?;
    }
    for (label, value) in details.display_attributes() {
        writeln!(writer, "  {label}: {value}")?;
    }
    writeln!(
        writer,
        "Investment score: {}",
        score_label(&details.score, details.origin)
    )
}

/// Latest indicator values for a country, or a not-available note.
pub(crate) fn write_highlights(
    writer: &mut dyn Write,
    country: &str,
    latest: Option<&IndicatorRow>,
    columns: &[(&str, &str, &str)],
) -> io::Result<()> {
    let Some(row) = latest else {
        return writeln!(writer, "{country} data not available.");
    };
    match row.year() {
        Some(year) => writeln!(writer, "{country} highlights ({year})")?,
        None => writeln!(writer, "{country} highlights")?,
    }
    for (label, column, suffix) in columns {
        let value = row
            .number(column)
            .map_or_else(|| NOT_AVAILABLE.to_owned(), |value| format!("{value}{suffix}"));
        writeln!(writer, "  {label}: {value}")?;
    }
    Ok(())
}
