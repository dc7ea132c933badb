use serde::{Deserialize, Deserializer};
use std::io::Read;

use super::LenderContact;

pub(crate) fn parse_contacts<R: Read>(reader: R) -> Result<Vec<LenderContact>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut contacts = Vec::new();

    for record in csv_reader.deserialize::<PayoffRow>() {
        let row = record?;
        let (Some(lender), Some(payoff_phone)) = (row.lender, row.payoff_phone) else {
            continue;
        };

        contacts.push(LenderContact {
            lender: lender.trim_start_matches('\u{feff}').to_string(),
            payoff_phone,
            notes: row.notes,
        });
    }

    Ok(contacts)
}

#[derive(Debug, Deserialize)]
struct PayoffRow {
    #[serde(
        rename = "Lender",
        alias = "\u{feff}Lender",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    lender: Option<String>,
    #[serde(
        rename = "Payoff Phone",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    payoff_phone: Option<String>,
    #[serde(rename = "Notes", default, deserialize_with = "empty_string_as_none")]
    notes: Option<String>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
