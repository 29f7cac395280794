//! State-vector feed parsing.
//!
//! Turns an OEM-style XML document into an ordered list of state vectors.
//! Any `stateVector` element in the tree is picked up; its `EPOCH`, `X`, `Y`,
//! `Z`, `X_DOT`, `Y_DOT` and `Z_DOT` children are required, everything else
//! (unit attributes, comments, extra children) is ignored.

use orbit_core::{parse_feed_epoch, Error, Result, StateVector};
use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::{debug, warn};

const STATE_VECTOR_TAG: &[u8] = b"stateVector";

/// Required children of a `stateVector` element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Epoch,
    X,
    Y,
    Z,
    XDot,
    YDot,
    ZDot,
}

impl Field {
    fn from_tag(tag: &[u8]) -> Option<Self> {
        match tag {
            b"EPOCH" => Some(Field::Epoch),
            b"X" => Some(Field::X),
            b"Y" => Some(Field::Y),
            b"Z" => Some(Field::Z),
            b"X_DOT" => Some(Field::XDot),
            b"Y_DOT" => Some(Field::YDot),
            b"Z_DOT" => Some(Field::ZDot),
            _ => None,
        }
    }

    fn tag(self) -> &'static str {
        match self {
            Field::Epoch => "EPOCH",
            Field::X => "X",
            Field::Y => "Y",
            Field::Z => "Z",
            Field::XDot => "X_DOT",
            Field::YDot => "Y_DOT",
            Field::ZDot => "Z_DOT",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Raw text collected for one `stateVector` element.
#[derive(Debug, Default)]
struct PendingVector {
    values: [Option<String>; 7],
}

impl PendingVector {
    fn set(&mut self, field: Field, text: &str) {
        self.values[field.index()]
            .get_or_insert_with(String::new)
            .push_str(text);
    }

    fn text(&self, field: Field, position: usize) -> Result<&str> {
        self.values[field.index()]
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                Error::parse(format!("state vector #{position}: missing {}", field.tag()))
            })
    }

    fn number(&self, field: Field, position: usize) -> Result<f64> {
        let raw = self.text(field, position)?;
        let value: f64 = raw.parse().map_err(|_| {
            Error::parse(format!(
                "state vector #{position}: {} is not numeric ('{raw}')",
                field.tag()
            ))
        })?;
        if !value.is_finite() {
            return Err(Error::parse(format!(
                "state vector #{position}: {} is not finite",
                field.tag()
            )));
        }
        Ok(value)
    }

    fn finish(self, position: usize) -> Result<StateVector> {
        let epoch_raw = self.text(Field::Epoch, position)?;
        let epoch = parse_feed_epoch(epoch_raw)
            .map_err(|e| Error::parse(format!("state vector #{position}: {e}")))?;

        Ok(StateVector {
            epoch,
            x: self.number(Field::X, position)?,
            y: self.number(Field::Y, position)?,
            z: self.number(Field::Z, position)?,
            x_dot: self.number(Field::XDot, position)?,
            y_dot: self.number(Field::YDot, position)?,
            z_dot: self.number(Field::ZDot, position)?,
        })
    }
}

/// Parser for state-vector feed documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeedParser;

impl FeedParser {
    /// Create a new parser.
    pub fn new() -> Self {
        Self
    }

    /// Parse a whole document. Fails without partial output on the first bad element.
    pub fn parse(&self, document: &str) -> Result<Vec<StateVector>> {
        let mut reader = Reader::from_str(document);
        reader.config_mut().trim_text(true);

        let mut vectors = Vec::new();
        let mut pending: Option<PendingVector> = None;
        let mut field: Option<Field> = None;
        let mut saw_root = false;
        let mut depth = 0usize;

        loop {
            let event = reader.read_event().map_err(|e| {
                Error::parse(format!(
                    "malformed document at byte {}: {e}",
                    reader.buffer_position()
                ))
            })?;

            match event {
                Event::Start(e) => {
                    saw_root = true;
                    depth += 1;
                    let name = e.name();
                    if name.as_ref() == STATE_VECTOR_TAG {
                        pending = Some(PendingVector::default());
                        field = None;
                    } else if pending.is_some() {
                        field = Field::from_tag(name.as_ref());
                    }
                }
                Event::Empty(_) => saw_root = true,
                Event::Text(t) => {
                    if let (Some(pv), Some(f)) = (pending.as_mut(), field) {
                        let text = t
                            .unescape()
                            .map_err(|e| Error::parse(format!("bad text in {}: {e}", f.tag())))?;
                        pv.set(f, &text);
                    }
                }
                Event::End(e) => {
                    depth = depth.saturating_sub(1);
                    if e.name().as_ref() == STATE_VECTOR_TAG {
                        if let Some(pv) = pending.take() {
                            vectors.push(pv.finish(vectors.len())?);
                        }
                    }
                    field = None;
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !saw_root {
            return Err(Error::parse("document has no root element"));
        }
        if pending.is_some() {
            return Err(Error::parse("document ended inside a stateVector element"));
        }
        if depth != 0 {
            return Err(Error::parse(format!(
                "document ended before the root element closed ({depth} open)"
            )));
        }

        if vectors.is_empty() {
            warn!("feed document contains no state vectors");
        } else {
            debug!(count = vectors.len(), "parsed state vectors");
        }

        Ok(vectors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::Timelike;

    fn vector_xml(epoch: &str, x: &str) -> String {
        format!(
            r#"<stateVector>
                <EPOCH>{epoch}</EPOCH>
                <X units="km">{x}</X>
                <Y units="km">-2000.5</Y>
                <Z units="km">3000.25</Z>
                <X_DOT units="km/s">1.5</X_DOT>
                <Y_DOT units="km/s">-6.0</Y_DOT>
                <Z_DOT units="km/s">4.25</Z_DOT>
            </stateVector>"#
        )
    }

    fn document(vectors: &[String]) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
            <ndm><oem><body><segment>
                <metadata><OBJECT_NAME>ISS</OBJECT_NAME></metadata>
                <data>
                    <COMMENT>Units are km and km/s</COMMENT>
                    {}
                </data>
            </segment></body></oem></ndm>"#,
            vectors.join("\n")
        )
    }

    #[test]
    fn test_parse_preserves_order() {
        let doc = document(&[
            vector_xml("2024-047T12:00:00.000Z", "100.0"),
            vector_xml("2024-047T12:04:00.000Z", "200.0"),
            vector_xml("2024-047T12:08:00.000Z", "300.0"),
        ]);

        let vectors = FeedParser::new().parse(&doc).unwrap();

        assert_eq!(vectors.len(), 3);
        assert_relative_eq!(vectors[0].x, 100.0);
        assert_relative_eq!(vectors[2].x, 300.0);
        assert_eq!(vectors[1].epoch.minute(), 4);
        assert_relative_eq!(vectors[0].y, -2000.5);
        assert_relative_eq!(vectors[0].z_dot, 4.25);
    }

    #[test]
    fn test_parse_keeps_fractional_seconds() {
        let doc = document(&[vector_xml("2024-047T12:00:00.250000Z", "1.0")]);
        let vectors = FeedParser::new().parse(&doc).unwrap();
        assert_eq!(vectors[0].epoch.nanosecond(), 250_000_000);
    }

    #[test]
    fn test_empty_document_yields_no_vectors() {
        let vectors = FeedParser::new().parse(&document(&[])).unwrap();
        assert!(vectors.is_empty());
    }

    #[test]
    fn test_malformed_xml() {
        let err = FeedParser::new()
            .parse("<ndm><stateVector><EPOCH>2024-047T12:00:00.000Z</X></ndm>")
            .unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn test_truncated_document_yields_nothing() {
        let doc = document(&[
            vector_xml("2024-047T12:00:00.000Z", "1.0"),
            vector_xml("2024-047T12:04:00.000Z", "2.0"),
        ]);
        let cut = doc.find("</data>").unwrap();

        let err = FeedParser::new().parse(&doc[..cut]).unwrap_err();
        match err {
            Error::Parse(msg) => assert!(msg.contains("root element"), "{msg}"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_not_xml_at_all() {
        let err = FeedParser::new().parse("").unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn test_missing_field_fails_whole_parse() {
        let incomplete = r#"<stateVector>
                <EPOCH>2024-047T12:04:00.000Z</EPOCH>
                <X>1.0</X><Y>2.0</Y><Z>3.0</Z>
                <X_DOT>1.0</X_DOT><Y_DOT>1.0</Y_DOT>
            </stateVector>"#
            .to_string();
        let doc = document(&[vector_xml("2024-047T12:00:00.000Z", "1.0"), incomplete]);

        let err = FeedParser::new().parse(&doc).unwrap_err();
        match err {
            Error::Parse(msg) => assert!(msg.contains("Z_DOT"), "{msg}"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_non_numeric_field() {
        let doc = document(&[vector_xml("2024-047T12:00:00.000Z", "north")]);
        let err = FeedParser::new().parse(&doc).unwrap_err();
        match err {
            Error::Parse(msg) => assert!(msg.contains("not numeric"), "{msg}"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_non_finite_field() {
        let doc = document(&[vector_xml("2024-047T12:00:00.000Z", "NaN")]);
        assert!(matches!(FeedParser::new().parse(&doc), Err(Error::Parse(_))));
    }

    #[test]
    fn test_bad_epoch() {
        let doc = document(&[vector_xml("2024-02-16T12:00:00Z", "1.0")]);
        assert!(matches!(FeedParser::new().parse(&doc), Err(Error::Parse(_))));
    }
}
