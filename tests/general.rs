mod test_helpers;

use anyhow::Result;
use test_helpers::assert_round_trip;
use vcard_codec::{Kind, Parser, StructuredAddress, StructuredName, VCard};

#[test]
fn parse_minimal_card() -> Result<()> {
    let input = "BEGIN:VCARD\r\nVERSION:4.0\r\nFN:Mr. John Q. Public\\, Esq.\r\nEND:VCARD\r\n";
    let card = Parser::new().parse_single(input)?;
    assert_eq!(card.formatted_name, "Mr. John Q. Public, Esq.");
    assert_round_trip(&card)?;
    Ok(())
}

#[test]
fn parses_multiple_vcards_in_one_stream() -> Result<()> {
    let input = "BEGIN:VCARD\r\nVERSION:4.0\r\nFN:Jane Doe\r\nEND:VCARD\r\n\
         BEGIN:VCARD\r\nVERSION:3.0\r\nFN:John Smith\r\nEND:VCARD\r\n";
    let cards = Parser::new().parse(input)?;
    assert_eq!(cards.len(), 2);
    assert_eq!(cards[0].formatted_name, "Jane Doe");
    assert_eq!(cards[1].formatted_name, "John Smith");
    Ok(())
}

#[test]
fn structured_name_and_address_round_trip() -> Result<()> {
    let input = "BEGIN:VCARD\r\nVERSION:4.0\r\nFN:Jane Doe\r\n\
         N:Doe;Jane;Middle;Dr.;Jr.\r\n\
         ADR;TYPE=work:;Suite 200;123 Main St;Anytown;CA;12345;USA\r\n\
         END:VCARD\r\n";
    let card = Parser::new().parse_single(input)?;

    let name = card.name.as_ref().unwrap();
    assert!(name.is_structured());
    if let StructuredName::Structured { family, given, .. } = name {
        assert_eq!(family, &["Doe".to_string()]);
        assert_eq!(given, &["Jane".to_string()]);
    }

    let addr = &card.addresses[0];
    assert_eq!(addr.types, vec!["work".to_string()]);
    if let StructuredAddress::Structured { street, city, .. } = &addr.value {
        assert_eq!(street, &["123 Main St".to_string()]);
        assert_eq!(city, &["Anytown".to_string()]);
    }

    assert_round_trip(&card)?;
    Ok(())
}

#[test]
fn group_kind_with_members() -> Result<()> {
    let mut card = VCard::new();
    card.formatted_name = "The Doe Family".to_string();
    card.kind = Some(Kind::Group);
    card.members.push(vcard_codec::UriEntry {
        uri: "urn:uuid:03a0e51f-d1aa-4385-8a53-e29025acd8af".to_string(),
        pref: None,
    });
    assert_round_trip(&card)?;
    Ok(())
}

#[test]
fn extension_properties_survive_round_trip() -> Result<()> {
    let input = "BEGIN:VCARD\r\nVERSION:4.0\r\nFN:Jane Doe\r\nX-CUSTOM-FIELD:hello world\r\nEND:VCARD\r\n";
    let card = Parser::new().parse_single(input)?;
    assert_eq!(card.extended_properties[0].name, "X-CUSTOM-FIELD");
    assert_round_trip(&card)?;
    Ok(())
}
