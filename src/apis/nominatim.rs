use serde::Deserialize;
use tracing::{debug, info};
use ureq::Agent;

use crate::error::{QueryError, Result};
use crate::settings::Settings;

// https://nominatim.openstreetmap.org/search?q=Alicante&format=jsonv2&limit=10

pub const DEFAULT_SEARCH_URL: &str = "https://nominatim.openstreetmap.org/search";

/// Offsets Overpass adds to OSM ids to form area ids.
pub const RELATION_AREA_OFFSET: u64 = 3_600_000_000;
pub const WAY_AREA_OFFSET: u64 = 2_400_000_000;

//------------------------------------------------------------------------------
// Functions
//------------------------------------------------------------------------------

#[derive(Clone)]
pub struct NominatimClient {
    url: String,
    agent: Agent,
    user_agent: String,
}

impl NominatimClient {
    pub fn new(url: &str) -> Self {
        let mut client = NominatimClient::from_settings(&Settings::default());
        client.url = url.to_string();
        client
    }

    pub fn from_settings(settings: &Settings) -> Self {
        NominatimClient {
            url: settings.nominatim_url.clone(),
            agent: settings.agent(),
            user_agent: settings.user_agent.clone(),
        }
    }

    /// Runs a free-form search and returns the places in Nominatim's ranking order.
    pub fn search(&self, name: &str) -> Result<Vec<Place>> {
        debug!("Geocoding '{}' via {}", name, self.url);
        let mut response = self
            .agent
            .get(&self.url)
            .query("q", name)
            .query("format", "jsonv2")
            .query("limit", "10")
            .header("User-Agent", &self.user_agent)
            .call()?;

        let status = response.status().as_u16();
        if status != 200 {
            let message = match response.body_mut().read_to_string() {
                Ok(body) => format!("geocoder: {}", body.trim()),
                Err(e) => format!("geocoder: could not read error body: {e}"),
            };
            return Err(QueryError::Api { status, message });
        }
        let body = response.body_mut().read_to_string()?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Resolves `name` to an Overpass area id, the way Overpass Turbo's `geocodeArea` does.
    pub fn resolve_area(&self, name: &str) -> Result<u64> {
        let places = self.search(name)?;
        let (place, id) = best_area(&places).ok_or_else(|| QueryError::AreaNotFound(name.to_string()))?;
        info!("Area '{}' resolved to {} ({})", name, id, place.display_name);
        Ok(id)
    }
}

/// First result that bounds an area, relation or way, in Nominatim's order. Nodes are skipped.
pub fn best_area(places: &[Place]) -> Option<(&Place, u64)> {
    places
        .iter()
        .find_map(|place| place.area_id().map(|id| (place, id)))
}

//------------------------------------------------------------------------------
// Types
//------------------------------------------------------------------------------

#[derive(Default, Debug, Clone, PartialEq, Deserialize)]
pub struct Place {
    #[serde(default)]
    pub place_id: u64,
    #[serde(default)]
    pub osm_type: String,
    #[serde(default)]
    pub osm_id: u64,
    #[serde(default)]
    pub display_name: String,
}

impl Place {
    pub fn area_id(&self) -> Option<u64> {
        match self.osm_type.as_str() {
            "relation" => Some(RELATION_AREA_OFFSET + self.osm_id),
            "way" => Some(WAY_AREA_OFFSET + self.osm_id),
            _ => None,
        }
    }
}
