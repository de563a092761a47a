//! Tests for the SINEX block reader

use super::super::reader::SinexReader;
use super::super::records::SiteReceiver;
use super::*;
use crate::Error;
use crate::constants::sinex;

#[test]
fn test_reader_decodes_header_and_file_reference() {
    let text = sample_sinex();
    let reader = SinexReader::new(text.as_bytes()).unwrap();

    assert_eq!(reader.header().agency, "IGN");
    assert_eq!(reader.header().num_estimates, 6);
    assert_eq!(reader.file_reference().description, "IGN daily combination");
    assert_eq!(reader.file_reference().software, "CATREF");
    assert_eq!(reader.current_block(), sinex::FILE_REFERENCE);
}

#[test]
fn test_reader_walks_blocks_in_order() {
    let text = sample_sinex();
    let mut reader = SinexReader::new(text.as_bytes()).unwrap();

    let mut blocks = Vec::new();
    while reader.advance_block().unwrap() {
        blocks.push(reader.current_block().to_string());
    }

    assert_eq!(
        blocks,
        vec![
            sinex::SITE_ID,
            sinex::SITE_RECEIVER,
            sinex::SITE_ANTENNA,
            sinex::SITE_ECCENTRICITY,
            sinex::SOLUTION_EPOCHS,
            sinex::SOLUTION_ESTIMATE,
        ]
    );
}

#[test]
fn test_reader_stops_at_trailer() {
    let text = format!("{}+SITE/ID\n-SITE/ID\n", sample_sinex());
    let mut reader = SinexReader::new(text.as_bytes()).unwrap();

    let mut count = 0;
    while reader.advance_block().unwrap() {
        count += 1;
    }
    assert_eq!(count, 6);
}

#[test]
fn test_reader_requires_file_reference_first() {
    let text = format!(
        "{}\n+SITE/ID\n{}\n-SITE/ID\n%ENDSNX\n",
        TEST_HEADER,
        site_id_line("ABMF", "97103M001", "Les Abymes, FR", "298 28 20.9", "16 15 44.3", "-25.6")
    );

    match SinexReader::new(text.as_bytes()) {
        Err(Error::MandatoryBlockNotFound { block }) => {
            assert_eq!(block, sinex::FILE_REFERENCE);
        }
        other => panic!("Expected missing block error, got {:?}", other),
    }
}

#[test]
fn test_reader_rejects_header_only_input() {
    let text = format!("{}\n", TEST_HEADER);
    assert!(matches!(
        SinexReader::new(text.as_bytes()),
        Err(Error::MandatoryBlockNotFound { .. })
    ));
}

#[test]
fn test_reader_rejects_empty_input() {
    match SinexReader::new("".as_bytes()) {
        Err(Error::Format { line, field, .. }) => {
            assert_eq!(line, 1);
            assert_eq!(field, "HEADER");
        }
        other => panic!("Expected format error, got {:?}", other),
    }
}

#[test]
fn test_advance_record_skips_comments_and_blank_lines() {
    let text = [
        TEST_HEADER.to_string(),
        file_reference_block(),
        "+SITE/RECEIVER".to_string(),
        "*CODE PT SOLN T _DATA START_ __DATA_END__ ___RECEIVER_TYPE____".to_string(),
        String::new(),
        receiver_line("ABMF", "09:054:00000", "00:000:00000", "TRIMBLE NETR9", "5034K", "4.85"),
        "* trailing comment".to_string(),
        receiver_line("WTZR", "16:001:00000", "00:000:00000", "LEICA GR50", "17201", "4.30"),
        "-SITE/RECEIVER".to_string(),
    ]
    .join("\n");

    let mut reader = SinexReader::new(text.as_bytes()).unwrap();
    assert!(reader.advance_block().unwrap());

    let mut codes = Vec::new();
    while reader.advance_record().unwrap() {
        let record: SiteReceiver = reader.decode().unwrap();
        codes.push(record.key.code);
    }

    assert_eq!(codes, vec!["ABMF", "WTZR"]);
    assert!(!reader.advance_block().unwrap());
}

#[test]
fn test_unterminated_block_keeps_next_begin_marker() {
    let text = [
        TEST_HEADER.to_string(),
        file_reference_block(),
        "+SITE/RECEIVER".to_string(),
        receiver_line("ABMF", "09:054:00000", "00:000:00000", "TRIMBLE NETR9", "5034K", "4.85"),
        "+SITE/ANTENNA".to_string(),
        antenna_line("ABMF", "09:054:00000", "00:000:00000", "TRM57971.00", "NONE", "14411"),
        "-SITE/ANTENNA".to_string(),
    ]
    .join("\n");

    let mut reader = SinexReader::new(text.as_bytes()).unwrap();
    assert!(reader.advance_block().unwrap());
    assert!(reader.advance_record().unwrap());
    assert!(!reader.advance_record().unwrap());

    assert!(reader.advance_block().unwrap());
    assert_eq!(reader.current_block(), sinex::SITE_ANTENNA);
    assert!(reader.advance_record().unwrap());
}

#[test]
fn test_non_data_line_ends_record_scan() {
    let text = [
        TEST_HEADER.to_string(),
        file_reference_block(),
        "+SITE/RECEIVER".to_string(),
        "%ENDSNX".to_string(),
    ]
    .join("\n");

    let mut reader = SinexReader::new(text.as_bytes()).unwrap();
    assert!(reader.advance_block().unwrap());
    assert!(!reader.advance_record().unwrap());
}

#[test]
fn test_decode_reports_line_and_field() {
    let text = [
        TEST_HEADER.to_string(),
        file_reference_block(),
        "+SITE/RECEIVER".to_string(),
        receiver_line("ABMF", "09:054:0000x", "00:000:00000", "TRIMBLE NETR9", "5034K", "4.85"),
        "-SITE/RECEIVER".to_string(),
    ]
    .join("\n");

    let mut reader = SinexReader::new(text.as_bytes()).unwrap();
    assert!(reader.advance_block().unwrap());
    assert!(reader.advance_record().unwrap());

    match reader.decode::<SiteReceiver>() {
        Err(Error::Format {
            line, field, raw, ..
        }) => {
            assert_eq!(line, reader.line_number());
            assert_eq!(field, "DATA_START");
            assert_eq!(raw, "09:054:0000x");
        }
        other => panic!("Expected format error, got {:?}", other),
    }
}

#[test]
fn test_decode_with_custom_decoder() {
    let text = sample_sinex();
    let mut reader = SinexReader::new(text.as_bytes()).unwrap();
    assert!(reader.advance_block().unwrap());
    assert!(reader.advance_record().unwrap());

    let domes = reader
        .decode_with(|columns| Ok(columns.text(9..18).to_string()))
        .unwrap();
    assert_eq!(domes, "97103M001");
}

#[test]
fn test_reader_handles_crlf_line_endings() {
    let text = sample_sinex().replace('\n', "\r\n");
    let mut reader = SinexReader::new(text.as_bytes()).unwrap();

    assert!(reader.advance_block().unwrap());
    assert_eq!(reader.current_block(), sinex::SITE_ID);
    assert!(reader.advance_record().unwrap());
    assert!(!reader.current_line().ends_with('\r'));
}
