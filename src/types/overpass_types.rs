use std::fmt;

use serde::{Deserialize, Serialize};

/// The OSM element kinds a query can select.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Node,
    Way,
    Relation,
}

impl ElementKind {
    pub const ALL: [ElementKind; 3] = [ElementKind::Node, ElementKind::Way, ElementKind::Relation];

    pub fn as_str(&self) -> &'static str {
        match self {
            ElementKind::Node => "node",
            ElementKind::Way => "way",
            ElementKind::Relation => "relation",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One element selector inside the query union, e.g. `node["toilets:wheelchair"="yes"]`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagFilter {
    pub element: ElementKind,
    pub key: String,
    pub value: Option<String>, // None = key only has to be present
}

impl TagFilter {
    pub fn present(element: ElementKind, key: &str) -> Self {
        TagFilter {
            element,
            key: key.to_string(),
            value: None,
        }
    }

    pub fn equals(element: ElementKind, key: &str, value: &str) -> Self {
        TagFilter {
            element,
            key: key.to_string(),
            value: Some(value.to_string()),
        }
    }

    /// The same presence filter for nodes, ways and relations.
    pub fn present_on_all(key: &str) -> Vec<Self> {
        ElementKind::ALL
            .iter()
            .map(|element| TagFilter::present(*element, key))
            .collect()
    }
}

/// Metadata fields Overpass can write into CSV output with the `::` prefix.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetaField {
    Id,
    Type,
    Lat,
    Lon,
}

impl MetaField {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetaField::Id => "id",
            MetaField::Type => "type",
            MetaField::Lat => "lat",
            MetaField::Lon => "lon",
        }
    }
}

/// A column of the CSV output.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Column {
    Meta(MetaField),
    Tag(String),
}

impl Column {
    pub fn tag(key: &str) -> Self {
        Column::Tag(key.to_string())
    }

    /// Name of the column as it appears in the CSV header (without the `@` the API adds).
    pub fn header_name(&self) -> &str {
        match self {
            Column::Meta(field) => field.as_str(),
            Column::Tag(key) => key,
        }
    }
}

/// Where the query searches.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AreaRef {
    /// A place name, left for the geocoder to resolve.
    Geocode(String),
    /// An Overpass area id (3600000000 + relation id, 2400000000 + way id).
    Id(u64),
}

impl AreaRef {
    pub fn label(&self) -> String {
        match self {
            AreaRef::Geocode(name) => name.clone(),
            AreaRef::Id(id) => format!("area-{id}"),
        }
    }
}

pub const DEFAULT_AREA: &str = "Alicante";
pub const DEFAULT_QUERY_TIMEOUT: u32 = 25;

/// Everything needed to render one accessibility query.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QueryParams {
    pub area: AreaRef,
    pub filters: Vec<TagFilter>,
    pub columns: Vec<Column>,
    pub timeout: u32,
}

impl Default for QueryParams {
    fn default() -> Self {
        QueryParams::accessibility(AreaRef::Geocode(DEFAULT_AREA.to_string()), DEFAULT_QUERY_TIMEOUT)
    }
}

impl QueryParams {
    /// Wheelchair-tagged features of any kind plus nodes with wheelchair-accessible toilets.
    pub fn accessibility(area: AreaRef, timeout: u32) -> Self {
        let mut filters = TagFilter::present_on_all("wheelchair");
        filters.push(TagFilter::equals(ElementKind::Node, "toilets:wheelchair", "yes"));

        QueryParams {
            area,
            filters,
            columns: accessibility_columns(),
            timeout,
        }
    }

    pub fn header_names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::header_name).collect()
    }
}

/// `id, type, name, wheelchair, toilets:wheelchair, lat, lon`
pub fn accessibility_columns() -> Vec<Column> {
    vec![
        Column::Meta(MetaField::Id),
        Column::Meta(MetaField::Type),
        Column::tag("name"),
        Column::tag("wheelchair"),
        Column::tag("toilets:wheelchair"),
        Column::Meta(MetaField::Lat),
        Column::Meta(MetaField::Lon),
    ]
}
