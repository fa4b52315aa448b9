mod test_helpers;

use anyhow::Result;
use test_helpers::assert_round_trip;
use vcard_codec::Parser;

#[test]
fn parse_folded_space() -> Result<()> {
    let input = "BEGIN:VCARD\r\nVERSION:4.0\r\nFN:Mr. \r\n John Q. \r\n Public\\, \r\n Esq.\r\nEND:VCARD\r\n";
    let card = Parser::new().parse_single(input)?;
    assert_eq!("Mr. John Q. Public, Esq.", card.formatted_name);
    assert_round_trip(&card)?;
    Ok(())
}

#[test]
fn parse_folded_tab() -> Result<()> {
    let input = "BEGIN:VCARD\r\nVERSION:4.0\r\nFN:Mr. \r\n\u{0009}John Q. \r\n\u{0009}Public\\, \r\n\u{0009}Esq.\r\nEND:VCARD\r\n";
    let card = Parser::new().parse_single(input)?;
    assert_eq!("Mr. John Q. Public, Esq.", card.formatted_name);
    assert_round_trip(&card)?;
    Ok(())
}

#[test]
fn long_unfolded_line_refolds_under_75_octets() -> Result<()> {
    let mut card = vcard_codec::VCard::new();
    card.formatted_name = "A".repeat(200);
    let text = vcard_codec::Generator::new().generate(&card)?;
    for line in text.split("\r\n") {
        assert!(line.as_bytes().len() <= 75 || line.is_empty());
    }
    assert_round_trip(&card)?;
    Ok(())
}
