use std::path::Path;

use chrono::Utc;
use tracing::info;

use super::args::{Cli, Command, QueryTarget};
use crate::error::{QueryError, Result};
use crate::export::CsvExport;
use crate::fetch::{Exporter, QuerySource};
use crate::output::OutputSink;
use crate::overpass;
use crate::settings::Settings;
use crate::types::{AreaRef, QueryParams};

pub fn execute(cli: Cli) -> Result<()> {
    let settings = Settings::load(cli.config.as_deref())?;

    match cli.command {
        Command::Query { target, resolve } => {
            let source = QuerySource::Params(query_params(&target, &settings));
            let query = if resolve {
                Exporter::from_settings(&settings).resolve(&source)?
            } else {
                source.template()?
            };
            print!("{query}");
            Ok(())
        }
        Command::Fetch {
            target,
            endpoint,
            query_file,
            output,
        } => {
            let mut settings = settings;
            if let Some(endpoint) = endpoint {
                settings.overpass_url = endpoint;
            }

            let (source, label) = match query_file {
                Some(path) => {
                    let text = std::fs::read_to_string(&path)?;
                    check_query_text(&text)?;
                    (QuerySource::Text(text), file_label(&path))
                }
                None => {
                    let params = query_params(&target, &settings);
                    let label = params.area.label();
                    (QuerySource::Params(params), label)
                }
            };

            let export = Exporter::from_settings(&settings).run(&source)?;
            info!("{}", export.summary());

            let sink = match output {
                Some(arg) => OutputSink::from_arg(&arg),
                None => OutputSink::timestamped(&settings.output_dir, &label, Utc::now()),
            };
            sink.write(export.raw().as_bytes())
        }
        Command::Check { file } => {
            let body = std::fs::read_to_string(&file)?;
            let params = QueryParams::default();
            let export = CsvExport::parse(&body, &params.header_names())?;
            println!("{}: {}", file.display(), export.summary());
            Ok(())
        }
    }
}

/// Flags over settings over the built-in defaults.
pub fn query_params(target: &QueryTarget, settings: &Settings) -> QueryParams {
    let area = match (&target.area_id, &target.area) {
        (Some(id), _) => AreaRef::Id(*id),
        (None, Some(name)) => AreaRef::Geocode(name.clone()),
        (None, None) => AreaRef::Geocode(settings.area.clone()),
    };
    let timeout = target.timeout.unwrap_or(settings.query_timeout_secs);
    QueryParams::accessibility(area, timeout)
}

fn file_label(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "query".to_string())
}

/// Rejects query files that cannot produce a checkable CSV before any request is made.
pub fn check_query_text(text: &str) -> Result<()> {
    if overpass::output_columns(text).is_none() {
        return Err(QueryError::Config(
            "query has no [out:csv(...)] output directive".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_settings() {
        let settings = Settings {
            area: "Elche".into(),
            query_timeout_secs: 40,
            ..Default::default()
        };

        let params = query_params(&QueryTarget::default(), &settings);
        assert_eq!(params.area, AreaRef::Geocode("Elche".into()));
        assert_eq!(params.timeout, 40);

        let target = QueryTarget {
            area_id: Some(3600349047),
            timeout: Some(90),
            ..Default::default()
        };
        let params = query_params(&target, &settings);
        assert_eq!(params.area, AreaRef::Id(3600349047));
        assert_eq!(params.timeout, 90);
    }

    #[test]
    fn json_query_file_is_rejected() {
        assert!(check_query_text("[out:json];node(1);out;").is_err());
        assert!(check_query_text("[out:csv(::id;true)];node(1);out;").is_ok());
    }
}
