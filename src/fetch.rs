use tracing::{debug, info, warn};

use crate::apis::nominatim::NominatimClient;
use crate::error::{QueryError, Result};
use crate::export::CsvExport;
use crate::overpass::{self, OverpassClient};
use crate::settings::Settings;
use crate::types::QueryParams;

/// What gets sent: parameters for the built-in query, or a hand-written query text.
#[derive(Clone, Debug)]
pub enum QuerySource {
    Params(QueryParams),
    Text(String),
}

impl QuerySource {
    /// The query as written, with any `{{geocodeArea:...}}` shortcut still in place.
    pub fn template(&self) -> Result<String> {
        match self {
            QuerySource::Params(params) => overpass::build_overpass_query_string(params),
            QuerySource::Text(text) => Ok(text.clone()),
        }
    }
}

/// Geocodes, submits and validates one export.
#[derive(Clone)]
pub struct Exporter {
    pub overpass: OverpassClient,
    pub geocoder: NominatimClient,
}

impl Exporter {
    pub fn new(overpass: OverpassClient, geocoder: NominatimClient) -> Self {
        Exporter { overpass, geocoder }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Exporter::new(
            OverpassClient::from_settings(settings),
            NominatimClient::from_settings(settings),
        )
    }

    /// Returns the query ready for the raw interpreter, geocoding any area shortcut.
    pub fn resolve(&self, source: &QuerySource) -> Result<String> {
        let template = source.template()?;
        overpass::expand_shortcuts(&template, |name| self.geocoder.resolve_area(name))
    }

    /// Runs the whole export and returns the checked CSV.
    pub fn run(&self, source: &QuerySource) -> Result<CsvExport> {
        let query = self.resolve(source)?;
        let columns = overpass::output_columns(&query).ok_or_else(|| {
            QueryError::Config("query has no [out:csv(...)] output directive".into())
        })?;
        debug!("Query: {}", query);

        let body = self.overpass.send_overpass_query_string(&query)?;
        let expected: Vec<&str> = columns.iter().map(String::as_str).collect();
        let export = CsvExport::parse(&body, &expected)?;

        if export.is_empty() {
            warn!("Overpass returned no matching elements");
        } else {
            info!("Got {} rows", export.rows().len());
        }
        Ok(export)
    }
}
