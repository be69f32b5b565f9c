//! CSV import/export helpers.
//!
//! Exports quote every field so the files match what the dashboard's
//! download buttons have always produced; imports accept a header row with
//! the well-known contact columns and treat any extra column as a custom
//! field value.

use std::collections::HashMap;

use crate::domain::contact::{Contact, Lifecycle, NewContact};
use crate::domain::event::{AttendanceRecord, Event};
use crate::services::{ServiceError, ServiceResult};

fn writer(buffer: Vec<u8>) -> csv::Writer<Vec<u8>> {
    csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .from_writer(buffer)
}

fn finish(writer: csv::Writer<Vec<u8>>) -> ServiceResult<String> {
    let bytes = writer
        .into_inner()
        .map_err(|e| ServiceError::Validation(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| ServiceError::Validation(e.to_string()))
}

/// One header line plus one row per event.
pub fn events_csv(events: &[Event]) -> ServiceResult<String> {
    let mut w = writer(Vec::new());
    w.write_record(["id", "name", "starts_at", "location", "description", "status"])
        .map_err(|e| ServiceError::Validation(e.to_string()))?;

    for event in events {
        w.write_record([
            event.id.to_string(),
            event.name.clone(),
            event.starts_at.format("%Y-%m-%d %H:%M").to_string(),
            event.location.clone().unwrap_or_default(),
            event.description.clone().unwrap_or_default(),
            event.status.clone(),
        ])
        .map_err(|e| ServiceError::Validation(e.to_string()))?;
    }

    finish(w)
}

/// Attendance sheet for one event: who checked in, when, and how.
pub fn attendance_csv(records: &[(AttendanceRecord, Contact)]) -> ServiceResult<String> {
    let mut w = writer(Vec::new());
    w.write_record(["contact", "email", "phone", "checked_in_at", "method"])
        .map_err(|e| ServiceError::Validation(e.to_string()))?;

    for (record, contact) in records {
        w.write_record([
            contact.full_name(),
            contact.email.clone().unwrap_or_default(),
            contact.phone.clone().unwrap_or_default(),
            record.checked_in_at.format("%Y-%m-%d %H:%M").to_string(),
            record.method.clone(),
        ])
        .map_err(|e| ServiceError::Validation(e.to_string()))?;
    }

    finish(w)
}

/// Parses an uploaded contacts CSV. Recognized headers: `first_name`,
/// `last_name`, `email`, `phone`, `address`, `lifecycle`; anything else
/// lands in the contact's custom field map.
pub fn parse_contacts_csv(data: &[u8], church_id: i32) -> ServiceResult<Vec<NewContact>> {
    let mut reader = csv::Reader::from_reader(data);
    let headers = reader
        .headers()
        .map_err(|e| ServiceError::Validation(e.to_string()))?
        .clone();

    let mut contacts = Vec::new();

    for result in reader.records() {
        let record = result.map_err(|e| ServiceError::Validation(e.to_string()))?;

        let mut first_name = String::new();
        let mut last_name = String::new();
        let mut email = None;
        let mut phone = None;
        let mut address = None;
        let mut lifecycle = Lifecycle::Visitor;
        let mut fields = HashMap::new();

        for (i, value) in record.iter().enumerate() {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            match headers.get(i) {
                Some("first_name") => first_name = value.to_string(),
                Some("last_name") => last_name = value.to_string(),
                Some("email") => email = Some(value.to_string()),
                Some("phone") => phone = Some(value.to_string()),
                Some("address") => address = Some(value.to_string()),
                Some("lifecycle") => {
                    lifecycle = value.parse::<Lifecycle>().map_err(|_| {
                        ServiceError::Validation(format!("unknown lifecycle: {value}"))
                    })?;
                }
                Some(header) => {
                    fields.insert(header.to_string(), value.to_string());
                }
                None => continue,
            }
        }

        if first_name.is_empty() && last_name.is_empty() {
            continue;
        }

        contacts.push(NewContact::new(
            church_id,
            first_name,
            last_name,
            email,
            phone,
            address,
            lifecycle,
            if fields.is_empty() { None } else { Some(fields) },
        ));
    }

    Ok(contacts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    fn event(id: i32, name: &str) -> Event {
        let now = Utc::now().naive_utc();
        Event {
            id,
            church_id: 1,
            name: name.to_string(),
            starts_at: NaiveDate::from_ymd_opt(2026, 4, 5)
                .unwrap()
                .and_hms_opt(10, 30, 0)
                .unwrap(),
            location: Some("Main Hall".to_string()),
            description: None,
            status: "upcoming".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn export_of_n_events_has_n_plus_one_lines() {
        let events = vec![event(1, "Easter Service"), event(2, "Youth Night")];
        let csv = events_csv(&events).unwrap();
        let lines: Vec<&str> = csv.trim_end().lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("\"id\""));
    }

    #[test]
    fn export_quotes_every_field() {
        let csv = events_csv(&[event(1, "Easter, Service")]).unwrap();
        let row = csv.trim_end().lines().nth(1).unwrap();
        assert!(row.contains("\"Easter, Service\""));
        assert!(row.starts_with("\"1\""));
    }

    #[test]
    fn contacts_csv_maps_known_and_custom_columns() {
        let data = b"first_name,last_name,email,shirt_size\nGrace,Lee,Grace@Example.com,M\n";
        let contacts = parse_contacts_csv(data, 7).unwrap();

        assert_eq!(contacts.len(), 1);
        let contact = &contacts[0];
        assert_eq!(contact.church_id, 7);
        assert_eq!(contact.first_name, "Grace");
        assert_eq!(contact.email.as_deref(), Some("grace@example.com"));
        assert_eq!(
            contact.fields.as_ref().unwrap().get("shirt_size"),
            Some(&"M".to_string())
        );
    }

    #[test]
    fn rows_without_names_are_skipped() {
        let data = b"first_name,last_name,email\n,,\nGrace,Lee,\n";
        let contacts = parse_contacts_csv(data, 1).unwrap();
        assert_eq!(contacts.len(), 1);
    }

    #[test]
    fn bad_lifecycle_is_rejected() {
        let data = b"first_name,last_name,lifecycle\nGrace,Lee,archbishop\n";
        assert!(parse_contacts_csv(data, 1).is_err());
    }
}
