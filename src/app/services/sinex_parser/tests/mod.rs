//! Shared test utilities and fixtures for SINEX decoder tests

pub mod reader_tests;
pub mod sites_tests;

/// Header line used across the tests (declares six estimates)
pub const TEST_HEADER: &str =
    "%=SNX 2.02 IGN 20:225:43202 IGN 20:208:75600 20:210:43200 P     6 2 S";

/// Build a FILE/REFERENCE block
pub fn file_reference_block() -> String {
    [
        "+FILE/REFERENCE".to_string(),
        "*INFO_TYPE_________ INFO________________________________________________________"
            .to_string(),
        reference_line("DESCRIPTION", "IGN daily combination"),
        reference_line("OUTPUT", "Station coordinates"),
        reference_line("CONTACT", "igs@ign.fr"),
        reference_line("SOFTWARE", "CATREF"),
        "-FILE/REFERENCE".to_string(),
    ]
    .join("\n")
}

pub fn reference_line(info_type: &str, value: &str) -> String {
    format!(" {:<18} {}", info_type, value)
}

pub fn site_id_line(code: &str, domes: &str, description: &str, lon: &str, lat: &str, height: &str) -> String {
    format!(
        " {:<4} {:>2} {:<9} P {:<22} {:>11} {:>11} {:>7}",
        code, "A", domes, description, lon, lat, height
    )
}

pub fn receiver_line(
    code: &str,
    start: &str,
    end: &str,
    receiver_type: &str,
    serial: &str,
    firmware: &str,
) -> String {
    format!(
        " {:<4} {:>2} {:>4} P {} {} {:<20} {:<5} {}",
        code, "A", "1", start, end, receiver_type, serial, firmware
    )
}

pub fn antenna_line(
    code: &str,
    start: &str,
    end: &str,
    antenna_type: &str,
    radome: &str,
    serial: &str,
) -> String {
    format!(
        " {:<4} {:>2} {:>4} P {} {} {:<16}{:>4} {:<5}",
        code, "A", "1", start, end, antenna_type, radome, serial
    )
}

pub fn eccentricity_line(code: &str, start: &str, end: &str, up: f64, north: f64, east: f64) -> String {
    format!(
        " {:<4} {:>2} {:>4} P {} {} UNE {:>8.4} {:>8.4} {:>8.4}",
        code, "A", "1", start, end, up, north, east
    )
}

pub fn epoch_line(code: &str, start: &str, end: &str, mean: &str) -> String {
    format!(" {:<4} {:>2} {:>4} P {} {} {}", code, "A", "1", start, end, mean)
}

pub fn estimate_line(index: usize, parameter: &str, code: &str, value: &str) -> String {
    format!(
        " {:>5} {:<6} {:<4} {:>2} {:>4} {} {:<4} {} {:>21} {:>11}",
        index, parameter, code, "A", "1", "20:209:43200", "m", 2, value, "5.36564e-04"
    )
}

/// A complete SINEX document with two sites
pub fn sample_sinex() -> String {
    let mut lines = vec![TEST_HEADER.to_string(), file_reference_block()];

    lines.push("+SITE/ID".to_string());
    lines.push(
        "*CODE PT __DOMES__ T _STATION DESCRIPTION__ APPROX_LON_ APPROX_LAT_ _APP_H_".to_string(),
    );
    lines.push(site_id_line("ABMF", "97103M001", "Les Abymes, FR", "298 28 20.9", "16 15 44.3", "-25.6"));
    lines.push(site_id_line("WTZR", "14201M010", "Bad Koetzting, DE", " 12 52 44.1", "49 08 39.1", "666.0"));
    lines.push("-SITE/ID".to_string());

    lines.push("+SITE/RECEIVER".to_string());
    lines.push(
        "*CODE PT SOLN T _DATA START_ __DATA_END__ ___RECEIVER_TYPE____ _S/N_ _FIRMWARE__"
            .to_string(),
    );
    lines.push(receiver_line("ABMF", "09:054:00000", "17:123:43199", "TRIMBLE NETR9", "5034K", "4.85"));
    lines.push(receiver_line("ABMF", "17:123:43200", "00:000:00000", "SEPT POLARX5", "45012", "5.3.2"));
    lines.push(receiver_line("WTZR", "16:001:00000", "00:000:00000", "LEICA GR50", "17201", "4.30/7.403"));
    lines.push("-SITE/RECEIVER".to_string());

    lines.push("+SITE/ANTENNA".to_string());
    lines.push(
        "*CODE PT SOLN T _DATA START_ __DATA_END__ ____ANTENNA_TYPE____ _S/N_".to_string(),
    );
    lines.push(antenna_line("ABMF", "09:054:00000", "00:000:00000", "TRM57971.00", "NONE", "14411"));
    lines.push(antenna_line("WTZR", "16:001:00000", "00:000:00000", "LEIAR25.R3", "LEIT", "09350"));
    lines.push("-SITE/ANTENNA".to_string());

    lines.push("+SITE/ECCENTRICITY".to_string());
    lines.push(eccentricity_line("ABMF", "09:054:00000", "00:000:00000", 0.0, 0.0, 0.0));
    lines.push(eccentricity_line("WTZR", "16:001:00000", "00:000:00000", 0.071, 0.0, 0.0));
    lines.push("-SITE/ECCENTRICITY".to_string());

    lines.push("+SOLUTION/EPOCHS".to_string());
    lines.push(epoch_line("ABMF", "20:208:75600", "20:210:43170", "20:209:59385"));
    lines.push(epoch_line("WTZR", "20:208:75600", "20:210:43170", "20:209:59385"));
    lines.push("-SOLUTION/EPOCHS".to_string());

    lines.push("+SOLUTION/ESTIMATE".to_string());
    lines.push(estimate_line(1, "STAX", "ABMF", "2.91978579317268e+06"));
    lines.push(estimate_line(2, "STAY", "ABMF", "-5.38374690432541e+06"));
    lines.push(estimate_line(3, "STAZ", "ABMF", "1.77460206203822e+06"));
    lines.push(estimate_line(4, "STAX", "WTZR", "4.07557805547214e+06"));
    lines.push(estimate_line(5, "STAY", "WTZR", "9.31853899811519e+05"));
    lines.push(estimate_line(6, "STAZ", "WTZR", "4.80117044116087e+06"));
    lines.push("-SOLUTION/ESTIMATE".to_string());

    lines.push("%ENDSNX".to_string());
    lines.join("\n") + "\n"
}
