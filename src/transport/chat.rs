use serde::{Deserialize, Serialize};

use super::TransportError;
use crate::domain::{NumberCheck, RecipientId};

#[derive(Debug, Serialize)]
struct WhatsappNumbersBody<'a> {
    numbers: Vec<&'a str>,
}

#[derive(Debug, Clone, Deserialize)]
struct NumberCheckJson {
    #[serde(default)]
    number: Option<String>,
    /// Absent means the gateway did not confirm the number.
    #[serde(default)]
    exists: bool,
    #[serde(default)]
    jid: Option<String>,
}

pub fn encode_whatsapp_numbers_body(numbers: &[RecipientId]) -> Result<String, TransportError> {
    let body = WhatsappNumbersBody {
        numbers: numbers.iter().map(RecipientId::raw).collect(),
    };
    Ok(serde_json::to_string(&body)?)
}

pub fn decode_whatsapp_numbers_response(json: &str) -> Result<Vec<NumberCheck>, TransportError> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    let serde_json::Value::Array(items) = value else {
        return Err(TransportError::UnexpectedShape {
            expected: "an array of number checks",
        });
    };

    // Malformed entries are dropped one by one; the rest of the batch still counts.
    Ok(items
        .into_iter()
        .filter_map(|item| serde_json::from_value::<NumberCheckJson>(item).ok())
        .filter_map(|item| {
            // Entries the gateway could not attribute to a number are useless to callers.
            let number = item.number?.trim().to_owned();
            if number.is_empty() {
                return None;
            }
            Some(NumberCheck {
                number,
                exists: item.exists,
                jid: item.jid.filter(|jid| !jid.is_empty()),
            })
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_lists_numbers_in_order() {
        let numbers = vec![
            RecipientId::new("55911111111").unwrap(),
            RecipientId::new("55922222222").unwrap(),
        ];
        assert_eq!(
            encode_whatsapp_numbers_body(&numbers).unwrap(),
            r#"{"numbers":["55911111111","55922222222"]}"#
        );
    }

    #[test]
    fn decode_maps_exists_and_jid() {
        let json = r#"
        [
          {"exists": true, "jid": "55911111111@s.whatsapp.net", "number": "55911111111"},
          {"exists": false, "jid": "", "number": " 55922222222 "},
          {"exists": false}
        ]
        "#;
        let checks = decode_whatsapp_numbers_response(json).unwrap();
        assert_eq!(
            checks,
            vec![
                NumberCheck {
                    number: "55911111111".to_owned(),
                    exists: true,
                    jid: Some("55911111111@s.whatsapp.net".to_owned()),
                },
                NumberCheck {
                    number: "55922222222".to_owned(),
                    exists: false,
                    jid: None,
                },
            ]
        );
    }

    #[test]
    fn entry_without_exists_counts_as_unregistered() {
        let json = r#"[{"number":"A","exists":true},{"number":"B","exists":false},{"number":"C"}]"#;
        let checks = decode_whatsapp_numbers_response(json).unwrap();
        let flags = checks
            .iter()
            .map(|check| (check.number.as_str(), check.exists))
            .collect::<Vec<_>>();
        assert_eq!(flags, [("A", true), ("B", false), ("C", false)]);

        let json = r#"[{"number":"A","exists":"yes"},{"number":"B","exists":false}]"#;
        let checks = decode_whatsapp_numbers_response(json).unwrap();
        assert_eq!(checks.len(), 1);
        assert_eq!(checks[0].number, "B");
    }

    #[test]
    fn decode_rejects_non_array_bodies() {
        let err = decode_whatsapp_numbers_response(r#"{"status":"ok"}"#).unwrap_err();
        assert!(matches!(err, TransportError::UnexpectedShape { .. }));

        let err = decode_whatsapp_numbers_response("not json").unwrap_err();
        assert!(matches!(err, TransportError::Json(_)));
    }
}
