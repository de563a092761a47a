//! Tests for assembling sites from SINEX blocks

use super::super::sites::decode_sinex_sites;
use super::*;
use crate::Error;
use crate::constants::sinex;

#[test]
fn test_decode_sample_sites() {
    let text = sample_sinex();
    let decoded = decode_sinex_sites(text.as_bytes()).unwrap();

    assert_eq!(decoded.sites.len(), 2);
    assert!(decoded.warnings.is_empty(), "{:?}", decoded.warnings);
    assert_eq!(decoded.epochs.len(), 2);
    assert_eq!(decoded.estimates.len(), 6);

    let abmf = decoded.site("abmf").unwrap();
    assert_eq!(abmf.site_code(), "ABMF");
    assert_eq!(abmf.station_name(), "Les Abymes, FR");
    assert_eq!(abmf.domes_number(), "97103M001");
    assert_eq!(abmf.receivers.len(), 2);
    assert_eq!(abmf.antennas.len(), 1);
    assert_eq!(abmf.receivers[1].receiver_type, "SEPT POLARX5");
    assert!(abmf.receivers[1].time_range.is_open());
    assert!((abmf.location.x.unwrap() - 2_919_785.793_172_68).abs() < 1e-6);
    assert!(abmf.location.longitude.unwrap() < 0.0);
}

#[test]
fn test_eccentricities_attach_to_matching_antennas() {
    let text = sample_sinex();
    let decoded = decode_sinex_sites(text.as_bytes()).unwrap();

    let wtzr = decoded.site("WTZR").unwrap();
    assert!((wtzr.antennas[0].marker_arp_up - 0.071).abs() < 1e-9);
    assert_eq!(wtzr.antennas[0].radome, "LEIT");
}

#[test]
fn test_malformed_record_becomes_warning() {
    let text = sample_sinex().replace(
        &receiver_line("WTZR", "16:001:00000", "00:000:00000", "LEICA GR50", "17201", "4.30/7.403"),
        &receiver_line("WTZR", "16:400:00000", "00:000:00000", "LEICA GR50", "17201", "4.30/7.403"),
    );

    let decoded = decode_sinex_sites(text.as_bytes()).unwrap();

    assert!(decoded.site("WTZR").unwrap().receivers.is_empty());
    assert_eq!(decoded.warnings.len(), 1);
    assert_eq!(decoded.warnings[0].field, "DATA_START");
    assert!(decoded.warnings[0].line.is_some());
}

#[test]
fn test_warnings_from_several_blocks_are_merged_in_order() {
    let text = sample_sinex()
        .replace(
            &receiver_line("WTZR", "16:001:00000", "00:000:00000", "LEICA GR50", "17201", "4.30/7.403"),
            &receiver_line("WTZR", "16:400:00000", "00:000:00000", "LEICA GR50", "17201", "4.30/7.403"),
        )
        .replace(
            &antenna_line("WTZR", "16:001:00000", "00:000:00000", "LEIAR25.R3", "LEIT", "09350"),
            &antenna_line("WTZR", "16:400:00000", "00:000:00000", "LEIAR25.R3", "LEIT", "09350"),
        );

    let decoded = decode_sinex_sites(text.as_bytes()).unwrap();

    let fields: Vec<_> = decoded.warnings.iter().map(|w| w.field.as_str()).collect();
    assert_eq!(fields, vec!["DATA_START", "DATA_START", sinex::SITE_ECCENTRICITY]);
    assert!(decoded.warnings[0].line < decoded.warnings[1].line);
    assert!(decoded.site("WTZR").unwrap().antennas.is_empty());
}

#[test]
fn test_estimate_count_mismatch_is_reported() {
    let text = sample_sinex().replace(
        TEST_HEADER,
        "%=SNX 2.02 IGN 20:225:43202 IGN 20:208:75600 20:210:43200 P     9 2 S",
    );

    let decoded = decode_sinex_sites(text.as_bytes()).unwrap();

    assert_eq!(decoded.warnings.len(), 1);
    assert_eq!(decoded.warnings[0].field, sinex::SOLUTION_ESTIMATE);
}

#[test]
fn test_devices_without_site_id_create_bare_site() {
    let text = [
        TEST_HEADER.to_string(),
        file_reference_block(),
        "+SITE/ANTENNA".to_string(),
        antenna_line("ZIMM", "93:110:00000", "00:000:00000", "TRM29659.00", "NONE", "99390"),
        "-SITE/ANTENNA".to_string(),
        "%ENDSNX".to_string(),
    ]
    .join("\n");

    let decoded = decode_sinex_sites(text.as_bytes()).unwrap();

    let zimm = decoded.site("ZIMM").unwrap();
    assert!(zimm.station_name().is_empty());
    assert_eq!(zimm.antennas.len(), 1);
    assert!(zimm.receivers.is_empty());
}

#[test]
fn test_unmatched_eccentricity_is_reported() {
    let text = [
        TEST_HEADER.to_string(),
        file_reference_block(),
        "+SITE/ECCENTRICITY".to_string(),
        eccentricity_line("NOPE", "09:054:00000", "00:000:00000", 0.1, 0.0, 0.0),
        "-SITE/ECCENTRICITY".to_string(),
    ]
    .join("\n");

    let decoded = decode_sinex_sites(text.as_bytes()).unwrap();

    assert!(decoded.sites.is_empty());
    assert_eq!(decoded.warnings.len(), 1);
    assert_eq!(decoded.warnings[0].field, sinex::SITE_ECCENTRICITY);
}

#[test]
fn test_unknown_blocks_are_skipped() {
    let text = sample_sinex().replace(
        "+SITE/ECCENTRICITY",
        "+SOLUTION/MATRIX_ESTIMATE L COVA\n 1 1 1.0\n-SOLUTION/MATRIX_ESTIMATE L COVA\n+SITE/ECCENTRICITY",
    );

    let decoded = decode_sinex_sites(text.as_bytes()).unwrap();
    assert_eq!(decoded.sites.len(), 2);
}

#[test]
fn test_take_site_removes_it() {
    let text = sample_sinex();
    let mut decoded = decode_sinex_sites(text.as_bytes()).unwrap();

    let wtzr = decoded.take_site("wtzr").unwrap();
    assert_eq!(wtzr.site_code(), "WTZR");
    assert_eq!(decoded.sites.len(), 1);
    assert!(decoded.take_site("WTZR").is_none());
}

#[test]
fn test_structural_errors_still_abort() {
    let text = sample_sinex().replace("%=SNX", "%=XYZ");
    assert!(matches!(
        decode_sinex_sites(text.as_bytes()),
        Err(Error::Format { .. })
    ));
}
