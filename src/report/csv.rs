use crate::error::{Result, SiteScoreError};
use crate::types::catalog::Catalog;
use crate::types::scoring::TotalScore;
use crate::types::site::Site;
use std::io::Write;

/// Spreadsheet-friendly export, one row per site. Pending scores are left empty.
pub fn export_sites<W: Write>(sites: &[&Site], catalog: &Catalog, writer: W) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new().delimiter(b';').from_writer(writer);

    let mut header = vec![
        "name".to_string(),
        "date".to_string(),
        "address".to_string(),
        "latitude".to_string(),
        "longitude".to_string(),
        "area".to_string(),
        "environmental_class".to_string(),
        "notes".to_string(),
    ];
    header.extend(catalog.categories().iter().map(|category| category.name.clone()));
    header.push("total".to_string());
    header.push("disqualified".to_string());
    csv_writer.write_record(&header)?;

    for site in sites {
        let mut record = vec![
            site.name.clone(),
            site.date.to_string(),
            site.address.clone().unwrap_or_default(),
            site.coordinates
                .map(|coordinates| coordinates.latitude.to_string())
                .unwrap_or_default(),
            site.coordinates
                .map(|coordinates| coordinates.longitude.to_string())
                .unwrap_or_default(),
            site.area.map(|area| area.to_string()).unwrap_or_default(),
            site.environmental_class
                .map(|class| class.to_string())
                .unwrap_or_default(),
            site.notes.clone(),
        ];
        for category in catalog.categories() {
            record.push(
                site.scores
                    .category_score(&category.id)
                    .and_then(|score| score.value())
                    .map(|value| value.to_string())
                    .unwrap_or_default(),
            );
        }
        record.push(match site.scores.total {
            TotalScore::Pending => String::new(),
            TotalScore::Points(points) => points.to_string(),
            TotalScore::Percent(percent) => format!("{percent:.1}"),
        });
        record.push(site.disqualified().to_string());
        csv_writer.write_record(&record)?;
    }

    csv_writer.flush()?;
    Ok(())
}

pub fn to_string(sites: &[&Site], catalog: &Catalog) -> Result<String> {
    let mut buffer = Vec::new();
    export_sites(sites, catalog, &mut buffer)?;
    String::from_utf8(buffer)
        .map_err(|err| SiteScoreError::Validation(format!("csv output is not utf-8: {err}")))
}
