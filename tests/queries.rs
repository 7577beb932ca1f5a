mod common;

use access_map::overpass::{build_overpass_query_string, canonicalize, equivalent, output_columns};
use access_map::{Exporter, QueryParams, QuerySource};
use common::{Canned, MockServer, settings_for};

const ACCESSIBILITY: &str = include_str!("../queries/accessibility.overpassql");
const ACCESSIBILITY_CSV: &str = include_str!("../queries/accessibility_csv.overpassql");

#[test]
fn shipped_definitions_only_differ_in_comments() {
    assert_ne!(ACCESSIBILITY, ACCESSIBILITY_CSV);
    assert!(equivalent(ACCESSIBILITY, ACCESSIBILITY_CSV));
}

#[test]
fn shipped_definitions_match_the_builder() {
    let built = build_overpass_query_string(&QueryParams::default()).unwrap();
    for text in [ACCESSIBILITY, ACCESSIBILITY_CSV] {
        assert_eq!(canonicalize(text), canonicalize(&built));
    }
}

#[test]
fn definition_with_bare_name_column_matches_the_builder() {
    // accessibility_csv.overpassql is kept exactly as first written: `name` unquoted
    assert!(ACCESSIBILITY_CSV.contains("    name, \n"));
    let built = build_overpass_query_string(&QueryParams::default()).unwrap();
    assert!(built.contains("\"name\""));
    assert!(equivalent(ACCESSIBILITY_CSV, &built));
}

#[test]
fn shipped_definitions_declare_the_seven_columns() {
    for text in [ACCESSIBILITY, ACCESSIBILITY_CSV] {
        assert_eq!(
            output_columns(text).unwrap(),
            vec!["id", "type", "name", "wheelchair", "toilets:wheelchair", "lat", "lon"]
        );
    }
}

#[test]
fn query_file_is_expanded_and_submitted() {
    let nominatim = MockServer::start(vec![Canned::json(
        r#"[{"place_id": 2, "osm_type": "relation", "osm_id": 349047, "display_name": "Alacant / Alicante"}]"#,
    )]);
    let overpass = MockServer::start(vec![Canned::csv(
        "@id,@type,name,wheelchair,toilets:wheelchair,@lat,@lon\n1,node,Aseo,yes,yes,38.34,-0.48\n",
    )]);
    let settings = settings_for(&overpass.url("/api/interpreter"), &nominatim.url("/search"));

    let export = Exporter::from_settings(&settings)
        .run(&QuerySource::Text(ACCESSIBILITY_CSV.to_string()))
        .unwrap();
    assert_eq!(export.summary().accessible_toilets, 1);

    let sent = &overpass.requests()[0].body;
    assert!(sent.contains("area(id:3600349047)->.searchArea;"));
    // comments travel with the file; the interpreter ignores them
    assert!(sent.contains("out center;"));
}
