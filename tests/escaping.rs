mod test_helpers;

use anyhow::Result;
use test_helpers::assert_round_trip;
use vcard_codec::Parser;

#[test]
fn escape_semi_colon() -> Result<()> {
    let input = "BEGIN:VCARD\r\nVERSION:4.0\r\nFN:Mr. John Q. Public\\; Esq.\r\nEND:VCARD\r\n";
    let card = Parser::new().parse_single(input)?;
    assert_eq!("Mr. John Q. Public; Esq.", card.formatted_name);
    assert_round_trip(&card)?;
    Ok(())
}

#[test]
fn escape_comma() -> Result<()> {
    let input = "BEGIN:VCARD\r\nVERSION:4.0\r\nFN:Mr. John Q. Public\\, Esq.\r\nEND:VCARD\r\n";
    let card = Parser::new().parse_single(input)?;
    assert_eq!("Mr. John Q. Public, Esq.", card.formatted_name);
    assert_round_trip(&card)?;
    Ok(())
}

#[test]
fn escape_newline_in_note() -> Result<()> {
    let input = "BEGIN:VCARD\r\nVERSION:4.0\r\nFN:Jane Doe\r\n\
         NOTE:Mythical Manager\\nHyjinx Software Division\\n\
         BabsCo\\, Inc.\\n\r\nEND:VCARD\r\n";
    let card = Parser::new().parse_single(input)?;
    let expected = "Mythical Manager\nHyjinx Software Division\nBabsCo, Inc.\n";
    assert_eq!(expected, card.note.as_deref().unwrap());
    assert_round_trip(&card)?;
    Ok(())
}

#[test]
fn quoted_printable_decodes_on_v21() -> Result<()> {
    let input = "BEGIN:VCARD\r\nVERSION:2.1\r\nFN;ENCODING=QUOTED-PRINTABLE:Caf=C3=A9\r\nEND:VCARD\r\n";
    let card = Parser::new().parse_single(input)?;
    assert_eq!("Café", card.formatted_name);
    Ok(())
}
