mod test_helpers;

use anyhow::Result;
use test_helpers::assert_round_trip;
use vcard_codec::Parser;

#[test]
fn type_and_pref_parameters() -> Result<()> {
    let input = "BEGIN:VCARD\r\nVERSION:4.0\r\nFN:Mr. John Q. Public\\, Esq.\r\n\
         NICKNAME;TYPE=work:Boss\r\nEND:VCARD\r\n";
    let card = Parser::new().parse_single(input)?;
    assert_eq!(card.nicknames, vec!["Boss".to_string()]);
    assert_round_trip(&card)?;
    Ok(())
}

#[test]
fn multi_valued_type_parameter() -> Result<()> {
    let input = "BEGIN:VCARD\r\nVERSION:4.0\r\nFN:Jane Doe\r\n\
         TEL;TYPE=work,voice;PREF=1:tel:+1-555-0100\r\nEND:VCARD\r\n";
    let card = Parser::new().parse_single(input)?;
    let tel = &card.telephones[0];
    assert_eq!(tel.types, vec!["work".to_string(), "voice".to_string()]);
    assert_eq!(tel.pref, Some(1));
    assert_round_trip(&card)?;
    Ok(())
}

#[test]
fn bare_v21_type_tokens_become_types() -> Result<()> {
    let input = "BEGIN:VCARD\r\nVERSION:2.1\r\nFN:Jane Doe\r\nTEL;WORK;VOICE:+1-555-0100\r\nEND:VCARD\r\n";
    let card = Parser::new().parse_single(input)?;
    assert_eq!(
        card.telephones[0].types,
        vec!["work".to_string(), "voice".to_string()]
    );
    assert!(card.telephones[0].number.contains("555-0100"));
    Ok(())
}

#[test]
fn quoted_parameter_value_with_special_characters() -> Result<()> {
    let input = "BEGIN:VCARD\r\nVERSION:4.0\r\nFN:Jane Doe\r\n\
         ADR;LABEL=\"123 Main St, Suite 4\":;;123 Main St;Anytown;CA;12345;USA\r\nEND:VCARD\r\n";
    let card = Parser::new().parse_single(input)?;
    assert_eq!(
        card.addresses[0].label.as_deref(),
        Some("123 Main St, Suite 4")
    );
    assert_round_trip(&card)?;
    Ok(())
}
