//! Upload fixtures shaped like real ChiroTouch exports.

#![allow(dead_code)]

use std::io::{Cursor, Write};

use zip::write::FileOptions;
use zip::ZipWriter;

pub const PATIENTS_A_CSV: &[u8] = b"\
PatientID,FirstName,LastName,DOB\n\
1001,Jane,Doe,1980-04-12\n\
1002,John,Roe,1975-11-02\n\
1003,Maya,Lin,1990-06-23\n";

pub const PATIENTS_B_CSV: &[u8] = b"\
PatientID,FirstName,LastName,DOB\n\
1004,Ada,Byron,1985-12-10\n\
1005,Alan,Turing,1982-06-23\n\
1006,Grace,Hopper,1979-12-09\n\
1007,Edsger,Dijkstra,1972-05-11\n";

pub const APPOINTMENTS_CSV: &[u8] = b"\
ApptID,PatientID,ApptDate,Provider\n\
5001,1001,2023-01-09,DC Smith\n\
5002,1002,2023-01-10,DC Smith\n\
5003,1003,2023-01-12,DC Jones\n";

pub const LEDGER_CSV: &[u8] = b"\
EntryID,PatientID,PostedDate,Amount,Description\n\
9001,1001,2023-01-09,75.00,Adjustment CMT 98940\n\
9002,1001,2023-01-09,-75.00,Payment - Insurance\n\
9003,1002,2023-01-10,125.00,Exam 99203\n\
9004,1003,2023-01-12,75.00,Adjustment CMT 98940\n";

/// Build an in-memory ZIP archive from (entry name, content) pairs.
pub fn build_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut buffer = Vec::new();
    {
        let mut zip = ZipWriter::new(Cursor::new(&mut buffer));
        let options = FileOptions::default();
        for (name, content) in entries {
            zip.start_file(*name, options).expect("Failed to start zip entry");
            zip.write_all(content).expect("Failed to write zip entry");
        }
        zip.finish().expect("Failed to finish zip");
    }
    buffer
}

/// A recognizable ChiroTouch export: patients split across two table files,
/// plus appointments, ledger history, and both document buckets.
pub fn chirotouch_export_zip() -> Vec<u8> {
    build_zip(&[
        ("00_Tables/Patients_A.csv", PATIENTS_A_CSV),
        ("00_Tables/Patients_B.csv", PATIENTS_B_CSV),
        ("00_Tables/Appointments.csv", APPOINTMENTS_CSV),
        ("01_LedgerHistory/Ledger_2023.csv", LEDGER_CSV),
        ("02_ScannedDocs/xray-front.pdf", b"%PDF-1.4 scanned"),
        ("02_ScannedDocs/xray-side.pdf", b"%PDF-1.4 scanned"),
        ("03_ChartNotes/note-2023-01-12.pdf", b"%PDF-1.4 note"),
    ])
}

/// A ZIP with files only in document buckets; not a recognizable export.
pub fn documents_only_zip() -> Vec<u8> {
    build_zip(&[
        ("02_ScannedDocs/xray-front.pdf", b"%PDF-1.4 scanned"),
        ("03_ChartNotes/note-2023-01-12.pdf", b"%PDF-1.4 note"),
    ])
}
