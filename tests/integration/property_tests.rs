use proptest::prelude::*;

use promcheck::format::perfdata::sanitize_label;
use promcheck::format::report::{Aggregator, ReportTemplate};
use promcheck::{Severity, Threshold, Verdict};

fn severity() -> impl Strategy<Value = Severity> {
    prop::sample::select(Severity::ALL.to_vec())
}

proptest! {
    #[test]
    fn plain_upper_bound_flags_only_larger_values(bound in -1.0e6f64..1.0e6, value in -1.0e6f64..1.0e6) {
        let threshold = Threshold::parse(&bound.to_string()).unwrap();
        prop_assert_eq!(threshold.violates(value), value > bound);
    }

    #[test]
    fn inverting_a_range_flips_finite_verdicts(lo in -1000i32..1000, width in 0i32..1000, value in -5000.0f64..5000.0) {
        let hi = lo + width;
        let outside = Threshold::parse(&format!("{lo}:{hi}")).unwrap();
        let inside = Threshold::parse(&format!("@{lo}:{hi}")).unwrap();
        prop_assert_ne!(outside.violates(value), inside.violates(value));
    }

    #[test]
    fn non_finite_values_never_violate(spec in prop::sample::select(vec!["10", "10:", "~:10", ":10", "@0:10", "@~:0", "-5:5"])) {
        let threshold = Threshold::parse(spec).unwrap();
        for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            prop_assert!(!threshold.violates(value));
        }
    }

    #[test]
    fn overall_state_is_the_worst_item(states in prop::collection::vec(severity(), 1..20)) {
        let mut aggregator = Aggregator::new(ReportTemplate::metrics("No status information"), Severity::Unknown);
        for (i, state) in states.iter().enumerate() {
            aggregator.add_verdict(Verdict::new(*state, format!("item {i}")));
        }
        let expected = states.iter().copied().max_by_key(|s| s.rank()).unwrap();

        let report = aggregator.finalize();
        prop_assert_eq!(report.severity, expected);
        prop_assert_eq!(report.exit_code(), expected.exit_code());
    }

    #[test]
    fn empty_report_takes_the_default(default in severity(), counted in any::<bool>()) {
        let template = if counted {
            ReportTemplate::alerts("No alerts retrieved")
        } else {
            ReportTemplate::metrics("No status information")
        };

        let report = Aggregator::new(template, default).finalize();
        prop_assert_eq!(report.severity, default);
        prop_assert_eq!(report.lines.len(), 1);
        prop_assert_eq!(report.lines[0].severity, default);
    }

    #[test]
    fn rendering_is_deterministic(states in prop::collection::vec(severity(), 0..10), show_all in any::<bool>()) {
        let build = || {
            let mut aggregator = Aggregator::new(ReportTemplate::alerts("No alerts retrieved"), Severity::Ok)
                .show_all(show_all);
            for (i, state) in states.iter().enumerate() {
                aggregator.add_verdict(Verdict::new(*state, format!("[Rule{i}] is something")));
            }
            aggregator.finalize()
        };

        let report = build();
        prop_assert_eq!(report.render(), report.render());
        prop_assert_eq!(report.render(), build().render());
    }

    #[test]
    fn sanitized_labels_stay_within_the_perfdata_grammar(raw in ".{0,40}") {
        let label = sanitize_label(&raw);
        prop_assert!(label
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | ':' | '-')));
        prop_assert_eq!(label.chars().count(), raw.chars().count());
    }
}
