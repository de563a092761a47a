//! History cleaning rules

use super::*;
use crate::app::services::site_history::{
    clean_antennas, clean_receivers, clean_site_history,
};
use crate::app::services::sitelog_parser::tests::{SAMPLE_LOG, parse};
use crate::config::HistoryConfig;
use crate::Error;
use chrono::Duration;

#[test]
fn test_ordered_history_is_unchanged() {
    let mut receivers = vec![
        receiver("ASHTECH Z-XII3", "1.0", Some(day(2006, 7, 7)), Some(at(2008, 3, 19, 8, 45))),
        receiver("LEICA GRX1200", "2.0", Some(at(2008, 3, 19, 9, 0)), None),
    ];
    let original = receivers.clone();

    let warnings = clean_receivers(&mut receivers, &HistoryConfig::default()).unwrap();

    assert!(warnings.is_empty(), "{:?}", warnings);
    assert_eq!(receivers, original);
}

#[test]
fn test_equal_boundary_is_shifted_without_force() {
    for config in [HistoryConfig::default(), HistoryConfig::forced()] {
        let mut receivers = vec![
            receiver("A", "1", Some(day(2008, 1, 1)), Some(day(2010, 1, 1))),
            receiver("B", "1", Some(day(2010, 1, 1)), None),
        ];

        let warnings = clean_receivers(&mut receivers, &config).unwrap();

        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].field, "receiver 0");
        assert_eq!(
            receivers[0].time_range.removed,
            Some(day(2010, 1, 1) - Duration::seconds(1))
        );
        assert_eq!(receivers[1].time_range.installed, Some(day(2010, 1, 1)));
    }
}

#[test]
fn test_antennas_fifteen_minutes_apart_are_unchanged() {
    let mut antennas = vec![
        antenna("ASH700936D_M", Some(day(2006, 7, 7)), Some(at(2008, 3, 19, 8, 45))),
        antenna("LEIAT504GG", Some(at(2008, 3, 19, 9, 0)), None),
    ];
    let original = antennas.clone();

    let warnings = clean_antennas(&mut antennas, &HistoryConfig::default()).unwrap();

    assert!(warnings.is_empty(), "{:?}", warnings);
    assert_eq!(antennas, original);
}

#[test]
fn test_equal_antenna_boundary_is_shifted_with_or_without_force() {
    for config in [HistoryConfig::default(), HistoryConfig::forced()] {
        let mut antennas = vec![
            antenna("TRM55971.00", Some(day(2008, 1, 1)), Some(at(2012, 1, 20, 10, 0))),
            antenna("TRM57971.00", Some(at(2012, 1, 20, 10, 0)), None),
        ];

        let warnings = clean_antennas(&mut antennas, &config).unwrap();

        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].field, "antenna 0");
        assert_eq!(
            antennas[0].time_range.removed,
            Some(at(2012, 1, 20, 10, 0) - Duration::seconds(1))
        );
        assert_eq!(antennas[1].time_range.installed, Some(at(2012, 1, 20, 10, 0)));
    }
}

#[test]
fn test_overlap_fails_without_force() {
    let mut antennas = vec![
        antenna("TRM55971.00", Some(day(2008, 1, 1)), Some(day(2011, 1, 1))),
        antenna("TRM57971.00", Some(day(2010, 1, 1)), None),
    ];

    match clean_antennas(&mut antennas, &HistoryConfig::default()) {
        Err(Error::Chronological {
            item,
            index_prev,
            index_curr,
        }) => {
            assert_eq!(item, "antenna");
            assert_eq!(index_prev, 0);
            assert_eq!(index_curr, 1);
        }
        other => panic!("Expected chronological error, got {:?}", other),
    }
}

#[test]
fn test_overlap_is_cut_back_when_forced() {
    let mut antennas = vec![
        antenna("TRM55971.00", Some(day(2008, 1, 1)), Some(day(2011, 1, 1))),
        antenna("TRM57971.00", Some(day(2010, 1, 1)), None),
    ];

    let warnings = clean_antennas(&mut antennas, &HistoryConfig::forced()).unwrap();

    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].message.contains("overlaps"));
    assert_eq!(
        antennas[0].time_range.removed,
        Some(day(2010, 1, 1) - Duration::seconds(1))
    );
}

#[test]
fn test_overlap_past_predecessor_installation_is_fatal_when_forced() {
    let mut receivers = vec![
        receiver("A", "1", Some(day(2010, 1, 1)), Some(day(2012, 1, 1))),
        receiver("B", "1", Some(day(2009, 1, 1)), None),
    ];

    assert!(matches!(
        clean_receivers(&mut receivers, &HistoryConfig::forced()),
        Err(Error::Chronological { .. })
    ));
}

#[test]
fn test_missing_installation_inferred_from_predecessor() {
    let mut receivers = vec![
        receiver("A", "1", Some(day(2008, 1, 1)), Some(day(2010, 1, 1))),
        receiver("B", "1", None, None),
    ];

    let warnings = clean_receivers(&mut receivers, &HistoryConfig::default()).unwrap();

    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].field, "receiver 1");
    assert_eq!(
        receivers[1].time_range.installed,
        Some(day(2010, 1, 1) + Duration::seconds(1))
    );
}

#[test]
fn test_missing_removal_inferred_from_successor() {
    let mut receivers = vec![
        receiver("A", "1", Some(day(2008, 1, 1)), None),
        receiver("B", "1", Some(day(2010, 1, 1)), None),
    ];

    let warnings = clean_receivers(&mut receivers, &HistoryConfig::default()).unwrap();

    assert_eq!(warnings.len(), 1);
    assert_eq!(
        receivers[0].time_range.removed,
        Some(day(2010, 1, 1) - Duration::seconds(1))
    );
    assert!(receivers[1].time_range.is_open());
}

#[test]
fn test_missing_first_installation_is_fatal() {
    let mut receivers = vec![receiver("A", "1", None, Some(day(2010, 1, 1)))];

    assert!(matches!(
        clean_receivers(&mut receivers, &HistoryConfig::forced()),
        Err(Error::MissingDate { index: 0, .. })
    ));
}

#[test]
fn test_uninferable_installation_is_fatal() {
    let mut receivers = vec![
        receiver("A", "1", Some(day(2008, 1, 1)), None),
        receiver("B", "1", None, None),
    ];

    match clean_receivers(&mut receivers, &HistoryConfig::default()) {
        Err(Error::MissingDate { item, index }) => {
            assert_eq!(item, "receiver");
            assert_eq!(index, 1);
        }
        other => panic!("Expected missing date error, got {:?}", other),
    }
}

#[test]
fn test_installed_after_removed_is_fatal_even_when_forced() {
    let mut antennas = vec![antenna("TRM55971.00", Some(day(2012, 1, 1)), Some(day(2010, 1, 1)))];

    assert!(matches!(
        clean_antennas(&mut antennas, &HistoryConfig::forced()),
        Err(Error::Chronological {
            index_prev: 0,
            index_curr: 0,
            ..
        })
    ));
}

#[test]
fn test_cleaning_is_idempotent() {
    let mut receivers = vec![
        receiver("A", "1", Some(day(2008, 1, 1)), None),
        receiver("B", "1", Some(day(2010, 1, 1)), Some(day(2013, 1, 1))),
        receiver("C", "1", Some(day(2012, 6, 1)), Some(day(2014, 1, 1))),
        receiver("D", "1", None, None),
    ];

    let first = clean_receivers(&mut receivers, &HistoryConfig::forced()).unwrap();
    assert_eq!(first.len(), 3);
    let cleaned = receivers.clone();

    let second = clean_receivers(&mut receivers, &HistoryConfig::forced()).unwrap();
    assert!(second.is_empty(), "{:?}", second);
    assert_eq!(receivers, cleaned);

    for pair in receivers.windows(2) {
        assert!(pair[0].time_range.removed < pair[1].time_range.installed);
    }
}

#[test]
fn test_custom_shift() {
    let config = HistoryConfig {
        shift_seconds: 60,
        ..HistoryConfig::default()
    };
    let mut receivers = vec![
        receiver("A", "1", Some(day(2008, 1, 1)), Some(day(2010, 1, 1))),
        receiver("B", "1", Some(day(2010, 1, 1)), None),
    ];

    clean_receivers(&mut receivers, &config).unwrap();

    assert_eq!(receivers[0].time_range.removed, Some(at(2009, 12, 31, 23, 59)));
}

#[test]
fn test_invalid_shift_rejected() {
    let config = HistoryConfig {
        shift_seconds: 0,
        ..HistoryConfig::default()
    };
    let mut receivers = vec![receiver("A", "1", Some(day(2008, 1, 1)), None)];

    assert!(matches!(
        clean_receivers(&mut receivers, &config),
        Err(Error::Configuration { .. })
    ));
}

#[test]
fn test_empty_history_is_clean() {
    let mut receivers: Vec<crate::Receiver> = Vec::new();
    assert!(clean_receivers(&mut receivers, &HistoryConfig::default()).unwrap().is_empty());
}

#[test]
fn test_sample_log_touching_boundaries_are_separated() {
    let mut site = parse(SAMPLE_LOG).unwrap();

    clean_site_history(&mut site, &HistoryConfig::default()).unwrap();

    assert_eq!(site.warnings.len(), 3, "{:?}", site.warnings);
    assert_eq!(
        site.receivers[0].time_range.removed,
        Some(at(2009, 10, 15, 19, 59) + Duration::seconds(59))
    );
    assert_eq!(
        site.antennas[0].time_range.removed,
        Some(at(2012, 1, 20, 9, 59) + Duration::seconds(59))
    );
    assert_eq!(site.receivers[1].time_range.installed, Some(at(2009, 10, 15, 20, 0)));
}
