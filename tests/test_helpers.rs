use anyhow::Result;

use vcard_codec::{Generator, Parser, VCard};

#[allow(dead_code)]
pub fn assert_round_trip(card: &VCard) -> Result<()> {
    let encoded = Generator::new().generate(card)?;
    let decoded = Parser::new().parse_single(&encoded)?;
    assert_eq!(card, &decoded);
    Ok(())
}
