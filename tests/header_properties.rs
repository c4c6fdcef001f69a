use proptest::prelude::*;
use runbound::exec::Origin;
use runbound::exec::multiplex::HeaderTracker;

fn origin_strategy() -> impl Strategy<Value = Origin> {
    prop_oneof![Just(Origin::Stdout), Just(Origin::Stderr)]
}

proptest! {
    #[test]
    fn headers_equal_one_plus_origin_switches(
        seq in proptest::collection::vec(origin_strategy(), 1..64)
    ) {
        let mut tracker = HeaderTracker::new();
        let headers = seq.iter().filter(|o| tracker.switch_to(**o)).count();
        let switches = seq.windows(2).filter(|w| w[0] != w[1]).count();
        prop_assert_eq!(headers, 1 + switches);
    }

    #[test]
    fn no_header_for_a_repeated_origin(
        seq in proptest::collection::vec(origin_strategy(), 2..64)
    ) {
        let mut tracker = HeaderTracker::new();
        let mut prev: Option<Origin> = None;
        for origin in seq {
            let header = tracker.switch_to(origin);
            prop_assert_eq!(header, prev != Some(origin));
            prev = Some(origin);
        }
    }
}
