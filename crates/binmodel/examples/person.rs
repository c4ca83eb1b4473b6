//! Encodes and decodes a person record.
//!
//! Usage:
//!   cargo run -p binmodel --example person

use binmodel::{DataType, FieldOptions, Record, Schema, Timestamp};

fn main() -> binmodel::Result<()> {
    let person = Schema::from_fields([
        ("name", FieldOptions::required(DataType::String)),
        ("emailAddress", FieldOptions::optional(DataType::String)),
        ("userType", DataType::UInt8.into()),
        ("balance", DataType::Double.into()),
        ("createDate", DataType::Date.into()),
        ("metaData", DataType::Json.into()),
    ]);

    let mut user = Record::new();
    user.insert("name".into(), "My Name".into());
    user.insert("emailAddress".into(), "my.name@mydomain.com".into());
    user.insert("userType".into(), 99.into());
    user.insert("balance".into(), 10000.25.into());
    if let Some(created) = Timestamp::from_ymd_hms_milli(2018, 1, 1, 0, 0, 0, 0) {
        user.insert("createDate".into(), created.into());
    }

    let encoded = person.encode(&user)?;
    let hex: String = encoded.iter().map(|b| format!("{b:02x}")).collect();
    println!("Encoded ({} bytes): {hex}", encoded.len());

    let decoded = person.decode(&encoded)?;
    println!("Decoded: {decoded:#?}");
    Ok(())
}
