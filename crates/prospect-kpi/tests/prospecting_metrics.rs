use std::collections::BTreeSet;

use prospect_kpi::workflows::prospecting::{
    apply_filters, compute_distribution, compute_metrics, Dataset, FilterCriteria, MetricValue,
    ProspectingMetrics,
};

const CALL_TS: &str = "Last Aircall call timestamp";
const CALL_TAGS: &str = "Last used Aircall tags";
const LEAD_STATUS: &str = "lemlist lead status";
const LIFECYCLE: &str = "Phase du cycle de vie";

const MIXED_HEADERS: [&str; 6] = [CALL_TS, CALL_TAGS, LEAD_STATUS, LIFECYCLE, "Campagne", "Secteur"];

const MIXED_ROWS: [[&str; 6]; 8] = [
    ["2024-03-01 09:00", "Meeting", "Email replied", "RDV - Bon contact", "Spring", "SaaS"],
    ["2024-03-01 10:00", "Pitch; Sans Suite", "Email opened", "", "Spring", "Retail"],
    ["2024-03-02 11:00", "No answer", "Email sent", "", "Autumn", "SaaS"],
    ["2024-03-02 12:00", "Numéro Faux|Rappel", "", "", "Autumn", ""],
    ["", "Pitch", "Email replied", "RDV - Bon contact", "Spring", "Industry"],
    ["2024-03-03 15:30", "Standard", "Email replied", "RDV - Bon contact", "", "SaaS"],
    ["garbage", "Meeting", "Email opened", "", "Autumn", "Retail"],
    ["", "", "", "", "", ""],
];

fn mixed_export() -> Dataset {
    mixed_export_without(None)
}

fn mixed_export_without(dropped: Option<&str>) -> Dataset {
    let kept: Vec<usize> = MIXED_HEADERS
        .iter()
        .enumerate()
        .filter(|(_, header)| Some(**header) != dropped)
        .map(|(index, _)| index)
        .collect();

    Dataset::new(
        kept.iter().map(|&index| MIXED_HEADERS[index].to_string()).collect(),
        MIXED_ROWS
            .iter()
            .map(|row| kept.iter().map(|&index| row[index].to_string()).collect())
            .collect(),
    )
}

fn changed_metrics(
    before: &ProspectingMetrics,
    after: &ProspectingMetrics,
) -> BTreeSet<&'static str> {
    before
        .entries()
        .into_iter()
        .zip(after.entries())
        .filter(|((_, old), (_, new))| old != new)
        .map(|((name, _), _)| name)
        .collect()
}

fn rates(metrics: &ProspectingMetrics) -> Vec<(&'static str, f64)> {
    metrics
        .entries()
        .into_iter()
        .filter_map(|(name, value)| match value {
            MetricValue::Rate(rate) => Some((name, rate)),
            MetricValue::Count(_) => None,
        })
        .collect()
}

fn cells(dataset: &Dataset) -> Vec<Vec<String>> {
    dataset.rows().iter().map(|row| row.cells().to_vec()).collect()
}

#[test]
fn empty_dataset_yields_zero_metrics_and_no_distribution() {
    let dataset = Dataset::empty();
    let metrics = compute_metrics(&dataset);

    assert_eq!(metrics, ProspectingMetrics::default());
    for (name, value) in metrics.entries() {
        assert_eq!(value.as_f64(), 0.0, "{name} should be zero");
    }
    assert!(compute_distribution(&dataset).is_empty());
}

#[test]
fn phone_funnel_and_distribution_follow_call_tags() {
    let dataset = Dataset::from_table(
        &[CALL_TS, CALL_TAGS],
        &[
            &["2024-03-04 09:00:00", "Meeting, Pitch"],
            &["2024-03-04 10:00:00", "Standard"],
            &["", "Pitch"],
        ],
    );

    let metrics = compute_metrics(&dataset);
    assert_eq!(metrics.calls_total, 2);
    assert_eq!(metrics.calls_connected, 2);
    assert_eq!(metrics.calls_pitched, 1);
    assert_eq!(metrics.rdv_phone, 1);
    assert_eq!(metrics.connection_rate, 1.0);
    assert_eq!(metrics.pitch_rate, 0.5);

    let distribution = compute_distribution(&dataset);
    let rows: Vec<(&str, u64, f64)> = distribution
        .iter()
        .map(|row| (row.tag.as_str(), row.count, row.rate))
        .collect();
    assert_eq!(
        rows,
        vec![("Pitch", 2, 1.0), ("Meeting", 1, 0.5), ("Standard", 1, 0.5)]
    );
}

#[test]
fn email_meetings_count_replied_contacts_in_meeting_phase() {
    let dataset = Dataset::from_table(
        &[CALL_TS, LEAD_STATUS, LIFECYCLE],
        &[
            &["", "Email opened", ""],
            &["", "Email replied", "RDV - Bon contact"],
        ],
    );

    let metrics = compute_metrics(&dataset);
    assert_eq!(metrics.contacts_email, 2);
    assert_eq!(metrics.contacts_opened, 1);
    assert_eq!(metrics.contacts_replied, 1);
    assert_eq!(metrics.rdv_email, 1);
    assert_eq!(metrics.rdv_total, metrics.rdv_phone + 1);
    assert_eq!(metrics.email_conv_rate, 0.5);
    assert_eq!(metrics.overall_conv_rate, 0.5);
}

#[test]
fn segment_filter_on_absent_column_is_a_no_op() {
    let dataset = Dataset::from_table(&[CALL_TS, CALL_TAGS], &[&["2024-03-04", "Pitch"], &["", ""]]);
    let criteria = FilterCriteria {
        job_titles: vec!["CTO".to_string()],
        locations: vec!["Lyon".to_string()],
        ..FilterCriteria::default()
    };

    let filtered = apply_filters(&dataset, &criteria);
    assert_eq!(cells(&filtered), cells(&dataset));
}

#[test]
fn rates_stay_within_unit_interval_and_funnel_is_monotonic() {
    let dataset = mixed_export();
    let metrics = compute_metrics(&dataset);

    for (name, rate) in rates(&metrics) {
        assert!((0.0..=1.0).contains(&rate), "{name} = {rate} out of bounds");
    }
    for (name, value) in metrics.entries() {
        if let MetricValue::Count(count) = value {
            assert!(count as usize <= dataset.len(), "{name} exceeds row count");
        }
    }

    assert!(metrics.rdv_phone <= metrics.calls_pitched);
    assert!(metrics.calls_pitched <= metrics.calls_connected);
    assert!(metrics.calls_connected <= metrics.calls_total);
    assert_eq!(metrics.rdv_total, metrics.rdv_phone + metrics.rdv_email);
}

#[test]
fn mixed_export_matches_hand_counts() {
    let metrics = compute_metrics(&mixed_export());

    // "garbage" is not a timestamp, so that row is not a call.
    assert_eq!(metrics.calls_total, 5);
    assert_eq!(metrics.calls_connected, 3);
    assert_eq!(metrics.calls_pitched, 2);
    assert_eq!(metrics.rdv_phone, 1);
    assert_eq!(metrics.contacts_email, 6);
    assert_eq!(metrics.contacts_opened, 2);
    assert_eq!(metrics.contacts_replied, 3);
    // The first row booked by phone, so only rows five and six count here.
    assert_eq!(metrics.rdv_email, 2);
    assert_eq!(metrics.rdv_total, 3);
    // Row six is an e-mail meeting that was also called.
    assert_eq!(metrics.overall_conv_rate, 3.0 / 10.0);
}

#[test]
fn distribution_covers_every_tag_once_per_row() {
    let dataset = mixed_export();
    let distribution = compute_distribution(&dataset);

    let mut expected: Vec<String> = dataset
        .rows()
        .iter()
        .flat_map(|row| row.tags().iter().map(str::to_string).collect::<Vec<_>>())
        .collect();
    expected.sort();
    expected.dedup();

    let mut observed: Vec<String> = distribution.iter().map(|row| row.tag.clone()).collect();
    observed.sort();
    assert_eq!(observed, expected);

    for row in &distribution {
        let containing = dataset
            .rows()
            .iter()
            .filter(|contact| contact.tags().contains(&row.tag))
            .count() as u64;
        assert_eq!(row.count, containing, "count for {}", row.tag);
    }

    let counts: Vec<u64> = distribution.iter().map(|row| row.count).collect();
    let mut sorted = counts.clone();
    sorted.sort_by(|a, b| b.cmp(a));
    assert_eq!(counts, sorted);
}

#[test]
fn filtering_twice_equals_filtering_once() {
    let dataset = mixed_export();
    let criteria_sets = [
        FilterCriteria {
            campaigns: vec!["Spring".to_string(), "Autumn".to_string()],
            sectors: vec!["SaaS".to_string()],
            ..FilterCriteria::default()
        },
        FilterCriteria {
            start: chrono::NaiveDate::from_ymd_opt(2024, 3, 2)
                .and_then(|date| date.and_hms_opt(0, 0, 0)),
            ..FilterCriteria::default()
        },
        FilterCriteria {
            end: chrono::NaiveDate::from_ymd_opt(2023, 1, 1)
                .and_then(|date| date.and_hms_opt(0, 0, 0)),
            ..FilterCriteria::default()
        },
    ];

    for criteria in criteria_sets {
        let once = apply_filters(&dataset, &criteria);
        let twice = apply_filters(&once, &criteria);
        assert_eq!(cells(&twice), cells(&once), "criteria {criteria:?}");
    }
}

#[test]
fn missing_columns_degrade_to_zero() {
    let dataset = Dataset::from_table(
        &["Email", "Notes"],
        &[&["a@example.com", "called twice"], &["b@example.com", ""]],
    );

    let metrics = compute_metrics(&dataset);
    assert_eq!(metrics, ProspectingMetrics::default());
    assert!(compute_distribution(&dataset).is_empty());

    let criteria = FilterCriteria {
        campaigns: vec!["Spring".to_string()],
        start: chrono::NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|date| date.and_hms_opt(0, 0, 0)),
        ..FilterCriteria::default()
    };
    let filtered = apply_filters(&dataset, &criteria);
    assert_eq!(filtered.len(), 2);
}

#[test]
fn dropping_one_column_only_moves_the_metrics_it_feeds() {
    let baseline = compute_metrics(&mixed_export());

    // Without tags nothing is booked by phone, so the first row's e-mail
    // meeting is no longer excluded.
    let cases: [(&str, &[&str], &[&str]); 5] = [
        (
            LIFECYCLE,
            &["rdv_email", "email_conv_rate"],
            &["rdv_email", "email_conv_rate", "rdv_total", "overall_conv_rate"],
        ),
        (
            LEAD_STATUS,
            &[
                "contacts_email",
                "contacts_opened",
                "contacts_replied",
                "open_rate",
                "reply_rate",
                "rdv_email",
                "email_conv_rate",
            ],
            &[
                "contacts_email",
                "contacts_opened",
                "contacts_replied",
                "open_rate",
                "reply_rate",
                "rdv_email",
                "email_conv_rate",
                "rdv_total",
                "overall_conv_rate",
            ],
        ),
        (
            CALL_TAGS,
            &[
                "calls_connected",
                "calls_pitched",
                "rdv_phone",
                "connection_rate",
                "pitch_rate",
                "rdv_phone_rate",
                "phone_conv_rate",
            ],
            &[
                "calls_connected",
                "calls_pitched",
                "rdv_phone",
                "connection_rate",
                "pitch_rate",
                "rdv_phone_rate",
                "phone_conv_rate",
                "rdv_email",
                "email_conv_rate",
                "overall_conv_rate",
            ],
        ),
        (
            CALL_TS,
            &[
                "calls_total",
                "calls_connected",
                "calls_pitched",
                "rdv_phone",
                "connection_rate",
                "pitch_rate",
                "rdv_phone_rate",
                "phone_conv_rate",
            ],
            &[
                "calls_total",
                "calls_connected",
                "calls_pitched",
                "rdv_phone",
                "connection_rate",
                "pitch_rate",
                "rdv_phone_rate",
                "phone_conv_rate",
                "rdv_email",
                "email_conv_rate",
                "overall_conv_rate",
            ],
        ),
        ("Campagne", &[], &[]),
    ];

    for (dropped, zeroed, changed) in cases {
        let metrics = compute_metrics(&mixed_export_without(Some(dropped)));

        for name in zeroed {
            let value = metrics.get(name).expect("known metric");
            assert_eq!(value.as_f64(), 0.0, "{name} without {dropped}");
        }
        let expected: BTreeSet<&str> = changed.iter().copied().collect();
        assert_eq!(
            changed_metrics(&baseline, &metrics),
            expected,
            "metrics moved by dropping {dropped}"
        );
    }

    let without_lifecycle = compute_metrics(&mixed_export_without(Some(LIFECYCLE)));
    assert_eq!(without_lifecycle.rdv_total, baseline.rdv_phone);
    assert_eq!(without_lifecycle.overall_conv_rate, 1.0 / 11.0);

    let without_tags = compute_metrics(&mixed_export_without(Some(CALL_TAGS)));
    assert_eq!(without_tags.rdv_email, 3);
    assert_eq!(without_tags.overall_conv_rate, 3.0 / 9.0);
}
