use quick_xml::events::Event;
use quick_xml::Reader;

use crate::errors::TrendError;
use crate::models::CandidateTerm;
use crate::trends::parse_approx_traffic;

/// Which child of the current `<item>` the cursor is inside.
enum Field {
    Title,
    Traffic,
}

/// Parse the trending RSS feed into candidates.
///
/// The feed exposes the term and an approximate traffic figure (in the
/// `ht:` namespace) but no growth or category data, so candidates come out
/// with zero growth and an "unknown" category.
pub fn parse_trending_rss(xml: &str) -> Result<Vec<CandidateTerm>, TrendError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut candidates = Vec::new();
    let mut in_item = false;
    let mut field: Option<Field> = None;
    let mut title = String::new();
    let mut traffic = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"item" => {
                    in_item = true;
                    title.clear();
                    traffic.clear();
                }
                b"title" if in_item => field = Some(Field::Title),
                b"approx_traffic" if in_item => field = Some(Field::Traffic),
                _ => field = None,
            },
            Ok(Event::Text(t)) => {
                let text = t.unescape().map_err(rss_error)?;
                append_field(&field, &text, &mut title, &mut traffic);
            }
            Ok(Event::CData(t)) => {
                let text = String::from_utf8_lossy(&t);
                append_field(&field, &text, &mut title, &mut traffic);
            }
            Ok(Event::End(e)) => {
                if e.local_name().as_ref() == b"item" {
                    in_item = false;
                    if !title.trim().is_empty() {
                        candidates.push(CandidateTerm::new(
                            title.trim(),
                            parse_approx_traffic(&traffic),
                            0.0,
                            "unknown",
                        ));
                    }
                }
                field = None;
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(rss_error(e)),
            _ => {}
        }
    }

    Ok(candidates)
}

fn append_field(field: &Option<Field>, text: &str, title: &mut String, traffic: &mut String) {
    match field {
        Some(Field::Title) => title.push_str(text),
        Some(Field::Traffic) => traffic.push_str(text),
        None => {}
    }
}

fn rss_error(e: impl std::fmt::Display) -> TrendError {
    TrendError::ProviderUnavailable(format!("could not parse trending RSS feed: {e}"))
}
