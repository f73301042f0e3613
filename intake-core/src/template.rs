//! Blank spreadsheet for land deals covering several parcels.

use std::io::Write;

use csv::{Terminator, WriterBuilder};

pub const PARCEL_TEMPLATE_HEADERS: [&str; 6] = [
    "Parcel Number",
    "APN",
    "Acreage",
    "Zoning",
    "Purchase Price",
    "Notes",
];

/// Rows pre-numbered in the template.
pub const PARCEL_TEMPLATE_ROWS: u32 = 3;

pub const PARCEL_TEMPLATE_FILE_NAME: &str = "multi-parcel-template.csv";

/// Writes the header and numbered blank rows to `writer`.
pub fn write_parcel_template<W: Write>(writer: W) -> Result<(), csv::Error> {
    let mut csv = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(writer);

    csv.write_record(PARCEL_TEMPLATE_HEADERS)?;
    for parcel in 1..=PARCEL_TEMPLATE_ROWS {
        let number = parcel.to_string();
        csv.write_record([number.as_str(), "", "", "", "", ""])?;
    }
    csv.flush()?;
    Ok(())
}

/// The template as a string.
pub fn parcel_template() -> Result<String, csv::Error> {
    let mut buffer = Vec::new();
    write_parcel_template(&mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
