use anyhow::Result;
use serde_json::json;
use vcard_codec::{JCardFormatter, Kind, Parser, Telephone, VCard};

#[test]
fn jcard_shape_matches_rfc7095_minimal_example() -> Result<()> {
    let mut card = VCard::new();
    card.formatted_name = "Jane Doe".to_string();

    let value = JCardFormatter::new().to_json(&card)?;
    assert_eq!(value[0], "vcard");
    let properties = value[1].as_array().unwrap();
    assert!(properties
        .iter()
        .any(|p| p[0] == "fn" && p[3] == "Jane Doe"));
    Ok(())
}

#[test]
fn jcard_round_trips_through_text() -> Result<()> {
    let input = "BEGIN:VCARD\r\nVERSION:4.0\r\nFN:Jane Doe\r\n\
         TEL;TYPE=work,voice;PREF=1:tel:+1-555-0100\r\nKIND:individual\r\nEND:VCARD\r\n";
    let card = Parser::new().parse_single(input)?;

    let formatter = JCardFormatter::new();
    let json = formatter.to_json(&card)?;
    let reparsed = formatter.from_json(&json)?;

    assert_eq!(reparsed.formatted_name, card.formatted_name);
    assert_eq!(reparsed.telephones, card.telephones);
    assert_eq!(reparsed.kind, Some(Kind::Individual));
    Ok(())
}

#[test]
fn jcard_group_entry_matches_array_shape() -> Result<()> {
    let mut card = VCard::new();
    card.formatted_name = "Jane Doe".to_string();
    card.telephones.push(Telephone {
        number: "+1-555-0100".to_string(),
        ext: None,
        types: vec!["work".to_string()],
        pref: None,
    });

    let value = JCardFormatter::new().to_json(&card)?;
    let properties = value[1].as_array().unwrap();
    let tel = properties.iter().find(|p| p[0] == "tel").unwrap();
    assert_eq!(tel[1], json!({"type": "work"}));
    assert_eq!(tel[2], "uri");
    Ok(())
}
