use serde::{Deserialize, Serialize};
use snafu::ResultExt;
use tabcrop_page::Rect;

use crate::caption::Captions;
use crate::error::{DecodeRecordSnafu, EncodeRecordSnafu, TableResult};

/// Persisted form of a detected table.
///
/// The page itself is not stored; whoever restores a record supplies the page again. A
/// present `angle` marks a rotated table, its absence a level one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRecord {
    #[serde(alias = "filename")]
    pub file: String,
    pub page_no: usize,
    pub bbox: Rect,
    pub confidence_score: f32,
    pub label: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub angle: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub captions: Option<Captions>,
}

impl TableRecord {
    pub fn to_json(&self) -> TableResult<String> {
        serde_json::to_string(self).context(EncodeRecordSnafu {
            stage: "encode-table-record",
        })
    }

    pub fn from_json(raw: &str) -> TableResult<Self> {
        serde_json::from_str(raw).context(DecodeRecordSnafu {
            stage: "decode-table-record",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TableError;

    #[test]
    fn level_record_omits_angle() {
        let record = TableRecord {
            file: "report.pdf".to_string(),
            page_no: 3,
            bbox: Rect::new(10.0, 20.0, 110.0, 70.0),
            confidence_score: 0.5,
            label: 0,
            angle: None,
            captions: None,
        };

        let json = record.to_json().unwrap();
        assert_eq!(
            json,
            r#"{"file":"report.pdf","page_no":3,"bbox":[10.0,20.0,110.0,70.0],"confidence_score":0.5,"label":0}"#
        );
        assert_eq!(TableRecord::from_json(&json).unwrap(), record);
    }

    #[test]
    fn accepts_filename_key() {
        let record = TableRecord::from_json(
            r#"{"filename":"a.pdf","page_no":0,"bbox":[0,0,1,1],"confidence_score":1.0,"label":1,"angle":90,"captions":["Table 1","Source: survey"]}"#,
        )
        .unwrap();

        assert_eq!(record.file, "a.pdf");
        assert_eq!(record.angle, Some(90));
        assert_eq!(
            record.captions,
            Some(Captions::new("Table 1", "Source: survey"))
        );
    }

    #[test]
    fn missing_required_field_is_an_error() {
        for raw in [
            r#"{"file":"a.pdf","page_no":0,"confidence_score":1.0,"label":0}"#,
            r#"{"file":"a.pdf","page_no":0,"bbox":[0,0,1,1],"label":0}"#,
            r#"{"file":"a.pdf","page_no":0,"bbox":[0,0,1,1],"confidence_score":1.0}"#,
        ] {
            assert!(matches!(
                TableRecord::from_json(raw),
                Err(TableError::DecodeRecord { .. })
            ));
        }
    }
}
