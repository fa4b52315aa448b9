use anyhow::Result;
use vcard_codec::{Parser, StructuredName, VCard, XCardFormatter};

#[test]
fn xcard_wraps_properties_in_vcards_root() -> Result<()> {
    let mut card = VCard::new();
    card.formatted_name = "Jane Doe".to_string();

    let xml = XCardFormatter::new().to_xml(&[card])?;
    assert!(xml.starts_with("<vcards xmlns=\"urn:ietf:params:xml:ns:vcard-4.0\">"));
    assert!(xml.contains("<vcard><fn><text>Jane Doe</text></fn></vcard>"));
    Ok(())
}

#[test]
fn xcard_round_trips_through_text() -> Result<()> {
    let input = "BEGIN:VCARD\r\nVERSION:4.0\r\nFN:Jane Doe\r\n\
         N:Doe;Jane;;;\r\nEMAIL;TYPE=home:jane@example.com\r\nEND:VCARD\r\n";
    let card = Parser::new().parse_single(input)?;

    let formatter = XCardFormatter::new();
    let xml = formatter.to_xml(&[card.clone()])?;
    let reparsed = formatter.from_xml(&xml)?;

    assert_eq!(reparsed.len(), 1);
    assert_eq!(reparsed[0].formatted_name, card.formatted_name);
    assert_eq!(reparsed[0].emails, card.emails);
    assert!(matches!(reparsed[0].name, Some(StructuredName::Structured { .. })));
    Ok(())
}

#[test]
fn xcard_parses_multiple_vcards() -> Result<()> {
    let mut a = VCard::new();
    a.formatted_name = "Jane Doe".to_string();
    let mut b = VCard::new();
    b.formatted_name = "John Smith".to_string();

    let formatter = XCardFormatter::new();
    let xml = formatter.to_xml(&[a, b])?;
    let cards = formatter.from_xml(&xml)?;
    assert_eq!(cards.len(), 2);
    assert_eq!(cards[0].formatted_name, "Jane Doe");
    assert_eq!(cards[1].formatted_name, "John Smith");
    Ok(())
}
